//! End-to-end behavior of the pattern machine and drawing sessions.

use std::cell::RefCell;
use std::rc::Rc;
use tilelock::core::{declare_enum, DeclarationViolation};
use tilelock::deferred::{build_deferred, SelfRef};
use tilelock::equality::{equals, Value};
use tilelock::machine::{TransitionError, TransitionEvent};
use tilelock::observer::listener;
use tilelock::puzzle::{
    pointer_machine, LineSnapshot, Point, PointerKey, PointerState, PuzzleConfig, Session, Tile,
    TileTrail,
};

type Event = (PointerState, PointerState, usize);

fn recorded_machine() -> (tilelock::puzzle::PointerMachine, Rc<RefCell<Vec<Event>>>) {
    let machine = pointer_machine(Rc::new(TileTrail::new())).unwrap();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let handle = listener(move |event: &TransitionEvent<PointerState, TileTrail>| {
        sink.borrow_mut()
            .push((event.previous, event.next, event.data.len()));
        Ok(())
    });
    machine.add_listener(&handle);
    (machine, events)
}

#[test]
fn pointer_machine_walks_through_a_gesture() {
    let (machine, events) = recorded_machine();
    let committed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&committed);
    let on_commit = listener(move |tiles: &Vec<Tile>| {
        sink.borrow_mut().push(tiles.clone());
        Ok(())
    });
    machine.data().add_listener(&on_commit);

    assert_eq!(machine.current_state(), PointerState::Up);

    let err = machine
        .change(PointerKey::Intersect, Tile::new(0, 0))
        .unwrap_err();
    assert!(matches!(err, TransitionError::InvalidTransition { .. }));
    assert_eq!(machine.current_state(), PointerState::Up);

    machine.change(PointerKey::Press, Tile::new(0, 0)).unwrap();
    assert_eq!(machine.current_state(), PointerState::Down);

    machine.change(PointerKey::Intersect, Tile::new(1, 0)).unwrap();
    assert_eq!(machine.current_state(), PointerState::Down);
    assert_eq!(machine.data().len(), 2);

    machine.change(PointerKey::Intersect, Tile::new(0, 0)).unwrap();
    assert_eq!(machine.data().len(), 2);

    machine.change(PointerKey::Release, None).unwrap();
    assert_eq!(machine.current_state(), PointerState::Up);
    assert!(machine.data().is_empty());

    assert_eq!(
        *committed.borrow(),
        vec![vec![Tile::new(0, 0), Tile::new(1, 0)]]
    );
    assert_eq!(
        *events.borrow(),
        vec![
            (PointerState::Up, PointerState::Down, 1),
            (PointerState::Down, PointerState::Down, 2),
            (PointerState::Down, PointerState::Down, 2),
            (PointerState::Down, PointerState::Up, 0),
        ]
    );
}

#[test]
fn press_is_unavailable_while_down() {
    let (machine, events) = recorded_machine();
    machine.change(PointerKey::Press, Tile::new(1, 1)).unwrap();

    let err = machine
        .change(PointerKey::Press, Tile::new(2, 2))
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Could not find valid transition Press from current state Down"
    );
    assert_eq!(events.borrow().len(), 1);
}

#[test]
fn session_reports_patterns_and_lines() {
    let mut session = Session::new(PuzzleConfig::default()).unwrap();
    let patterns = Rc::new(RefCell::new(Vec::new()));
    let snapshots = Rc::new(RefCell::new(Vec::new()));

    let pattern_sink = Rc::clone(&patterns);
    let on_pattern = listener(move |tiles: &Vec<Tile>| {
        pattern_sink.borrow_mut().push(tiles.clone());
        Ok(())
    });
    let line_sink = Rc::clone(&snapshots);
    let on_lines = listener(move |snapshot: &LineSnapshot| {
        line_sink.borrow_mut().push(snapshot.clone());
        Ok(())
    });
    session.on_pattern(&on_pattern);
    session.on_lines(&on_lines);

    session.press(Tile::new(0, 0)).unwrap();
    session
        .hover(Some(Tile::new(0, 0)), Point::new(2.0, 3.0))
        .unwrap();
    session
        .hover(Some(Tile::new(0, 1)), Point::new(2.0, 14.0))
        .unwrap();
    session
        .hover(Some(Tile::new(0, 1)), Point::new(3.0, 15.0))
        .unwrap();
    session.hover(None, Point::new(9.0, 20.0)).unwrap();
    session
        .hover(Some(Tile::new(1, 2)), Point::new(14.0, 25.0))
        .unwrap();
    session.release().unwrap();

    assert_eq!(
        *patterns.borrow(),
        vec![vec![Tile::new(0, 0), Tile::new(0, 1), Tile::new(1, 2)]]
    );

    let snapshots = snapshots.borrow();
    let longest = snapshots
        .iter()
        .map(|snapshot| snapshot.completed.len())
        .max();
    assert_eq!(longest, Some(2));
    assert_eq!(snapshots.last(), Some(&LineSnapshot::default()));
}

#[test]
fn sessions_are_independent() {
    let mut first = Session::new(PuzzleConfig::default()).unwrap();
    let second = Session::new(PuzzleConfig::default()).unwrap();

    first.press(Tile::new(1, 1)).unwrap();

    assert_eq!(first.state(), PointerState::Down);
    assert_eq!(second.state(), PointerState::Up);
    assert!(second.trail().is_empty());
}

#[test]
fn rejected_declarations_report_each_rule() {
    let no_keys = declare_enum("T", Vec::<&str>::new()).unwrap_err();
    assert!(no_keys.has(&DeclarationViolation::NoKeys));

    let duplicate = declare_enum("T", ["a", "a"]).unwrap_err();
    assert!(duplicate.has(&DeclarationViolation::DuplicateKey {
        key: "a".to_string()
    }));

    let unnamed = declare_enum("", ["a"]).unwrap_err();
    assert!(unnamed.has(&DeclarationViolation::EmptyTypeName));

    let empty_key = declare_enum("T", ["a", ""]).unwrap_err();
    assert!(empty_key.has(&DeclarationViolation::EmptyKey { index: 1 }));
}

#[test]
fn comparator_handles_the_documented_cases() {
    let list = |items: &[i32]| Value::array(items.iter().map(|n| Value::from(*n)));
    assert!(equals(&list(&[1, 2, 3]), &list(&[1, 2, 3])).unwrap());
    assert!(!equals(&list(&[1, 2]), &list(&[1, 2, 3])).unwrap());

    let set = |items: &[i32]| Value::set(items.iter().map(|n| Value::from(*n)));
    assert!(equals(&set(&[1, 2]), &set(&[2, 1])).unwrap());

    let a = Value::map([(Value::from("x"), Value::from(1)), (Value::from("y"), Value::from(2))]);
    let b = Value::map([(Value::from("y"), Value::from(2)), (Value::from("x"), Value::from(1))]);
    assert!(equals(&a, &b).unwrap());

    assert!(equals(&Value::from(f64::NAN), &Value::from(f64::NAN)).unwrap());
    assert!(!equals(&Value::from(0.0), &Value::from(-0.0)).unwrap());

    let looped = || {
        let value = Value::record([("name", Value::from("node"))]);
        if let Some(object) = value.as_object() {
            object.set_field("me", value.clone());
        }
        value
    };
    assert!(equals(&looped(), &looped()).unwrap());
}

#[test]
fn deferred_closures_see_sibling_fields() {
    struct Record {
        name: String,
        describe: Box<dyn Fn() -> Option<String>>,
    }

    let record = build_deferred(|me: SelfRef<Record>| Record {
        name: "lines".to_string(),
        describe: Box::new(move || me.get().ok().map(|record| record.name.clone())),
    });

    assert_eq!((record.describe)(), Some("lines".to_string()));
}
