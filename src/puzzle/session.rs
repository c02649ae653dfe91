//! Pointer-driven pattern drawing session.

use super::config::{ConfigError, PuzzleConfig};
use super::lines::{segments_of, LineBuffer, LineSnapshot, PendingSegment, Point};
use super::tiles::{Tile, TileTrail};
use crate::builder::{BuildError, Row, TransitionTable};
use crate::equality::{Comparator, EqualityError, SuppressUnlessChanged};
use crate::machine::{Machine, MachineOptions, TransitionError, TransitionEvent};
use crate::observer::{listener, CallbackError, CallbackResult, ListenerHandle};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

crate::enumeration! {
    /// Whether the pointer is held down.
    pub enum PointerState {
        Up,
        Down,
    }
}

crate::enumeration! {
    /// Pointer events that drive the pattern machine.
    pub enum PointerKey {
        Press,
        Release,
        Intersect,
    }
}

/// The pattern machine: pointer states over a shared tile trail.
pub type PointerMachine = Machine<PointerState, PointerKey, TileTrail, Tile>;

/// Errors raised while driving a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Equality(#[from] EqualityError),

    #[error(transparent)]
    Callback(#[from] CallbackError),
}

/// Build the pattern machine over `trail`.
///
/// Pressing pushes the first tile, intersecting pushes the next one, and
/// releasing commits the trail. Press and intersect require a tile payload.
pub fn pointer_machine(trail: Rc<TileTrail>) -> Result<PointerMachine, BuildError> {
    Machine::create(
        |trail: &Rc<TileTrail>, action| {
            TransitionTable::exhaustive(|state| match state {
                PointerState::Up => Row::new().on(
                    PointerKey::Press,
                    action.to(PointerState::Down, push_tile(trail)),
                ),
                PointerState::Down => Row::new()
                    .on(
                        PointerKey::Release,
                        action.to(PointerState::Up, commit_trail(trail)),
                    )
                    .on(
                        PointerKey::Intersect,
                        action.to(PointerState::Down, push_tile(trail)),
                    ),
            })
        },
        MachineOptions::new(trail),
    )
}

fn push_tile(trail: &Rc<TileTrail>) -> impl Fn(Option<Tile>) -> CallbackResult + 'static {
    let trail = Rc::clone(trail);
    move |tile| {
        let tile = tile.ok_or_else(|| CallbackError::msg("transition requires a tile"))?;
        trail.push(tile);
        Ok(())
    }
}

fn commit_trail(trail: &Rc<TileTrail>) -> impl Fn(Option<Tile>) -> CallbackResult + 'static {
    let trail = Rc::clone(trail);
    move |_| trail.commit()
}

type IntersectFn = Box<dyn FnMut(&Tile) -> Result<(), TransitionError>>;

/// One drawing session: the context object owning the trail, the pattern
/// machine, the line buffer and the intersect filter.
///
/// Pointer events enter through [`press`](Session::press),
/// [`hover`](Session::hover) and [`release`](Session::release). Each returns
/// whether the event applied to the current state; events that do not apply
/// are ignored rather than treated as errors. Completed patterns are
/// delivered to [`on_pattern`](Session::on_pattern) listeners and line
/// changes to [`on_lines`](Session::on_lines) listeners.
pub struct Session {
    config: PuzzleConfig,
    trail: Rc<TileTrail>,
    machine: Rc<PointerMachine>,
    lines: Rc<LineBuffer>,
    intersect: SuppressUnlessChanged<Tile, IntersectFn>,
}

impl Session {
    pub fn new(config: PuzzleConfig) -> Result<Self, SessionError> {
        config.validate()?;

        let trail = Rc::new(TileTrail::new());
        let machine = Rc::new(pointer_machine(Rc::clone(&trail))?);
        let lines = LineBuffer::new();

        let sink = Rc::clone(&lines);
        let redraw = listener(move |event: &TransitionEvent<PointerState, TileTrail>| {
            sink.set_completed(segments_of(&event.data.tiles()))
        });
        machine.add_listener(&redraw);

        let driver = Rc::clone(&machine);
        let intersect: IntersectFn =
            Box::new(move |tile: &Tile| driver.change(PointerKey::Intersect, *tile));

        Ok(Self {
            config,
            trail,
            machine,
            lines,
            intersect: SuppressUnlessChanged::with_comparator(
                intersect,
                Comparator::new(config.equality),
            ),
        })
    }

    /// Start a gesture on `tile`. Ignored unless the pointer is up and the
    /// tile is on the grid.
    pub fn press(&mut self, tile: Tile) -> Result<bool, SessionError> {
        if self.state() != PointerState::Up || !self.config.contains(tile) {
            tracing::trace!(%tile, "press ignored");
            return Ok(false);
        }

        self.intersect.reset();
        self.machine.change(PointerKey::Press, tile)?;
        Ok(true)
    }

    /// Move the pointer to `pointer`, over `tile` if it is above one.
    ///
    /// While the pointer is down this redraws the in-progress line, then
    /// adds `tile` to the trail unless it is the tile intersected last.
    pub fn hover(&mut self, tile: Option<Tile>, pointer: Point) -> Result<bool, SessionError> {
        if self.state() != PointerState::Down {
            return Ok(false);
        }

        if self.lines.completed().len() < self.config.max_segments {
            if let Some(anchor) = self.trail.last() {
                self.lines
                    .set_incomplete(Some(PendingSegment { anchor, pointer }))?;
            }
        } else {
            self.lines.set_incomplete(None)?;
        }

        if let Some(tile) = tile.filter(|tile| self.config.contains(*tile)) {
            self.intersect.call(tile)?.transpose()?;
        }
        Ok(true)
    }

    /// End the gesture, committing the trail. Ignored unless the pointer is
    /// down.
    pub fn release(&mut self) -> Result<bool, SessionError> {
        if self.state() != PointerState::Down {
            return Ok(false);
        }

        self.lines.set_incomplete(None)?;
        self.machine.change(PointerKey::Release, None)?;
        Ok(true)
    }

    /// Subscribe to completed patterns.
    pub fn on_pattern(&self, listener: &ListenerHandle<Vec<Tile>>) -> bool {
        self.trail.add_listener(listener)
    }

    /// Subscribe to line snapshots.
    pub fn on_lines(&self, listener: &ListenerHandle<LineSnapshot>) -> bool {
        self.lines.add_listener(listener)
    }

    pub fn state(&self) -> PointerState {
        self.machine.current_state()
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn trail(&self) -> &TileTrail {
        &self.trail
    }

    pub fn lines(&self) -> &LineBuffer {
        &self.lines
    }

    pub fn machine(&self) -> &PointerMachine {
        &self.machine
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("state", &self.state())
            .field("trail", &self.trail)
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn session() -> Session {
        Session::new(PuzzleConfig::default()).unwrap()
    }

    fn patterns(session: &Session) -> Rc<RefCell<Vec<Vec<Tile>>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let handle = listener(move |tiles: &Vec<Tile>| {
            sink.borrow_mut().push(tiles.clone());
            Ok(())
        });
        session.on_pattern(&handle);
        seen
    }

    fn over(session: &mut Session, column: u32, row: u32) {
        let pointer = Point::new(column as f64 * 10.0, row as f64 * 10.0);
        session
            .hover(Some(Tile::new(column, row)), pointer)
            .unwrap();
    }

    #[test]
    fn pointer_machine_starts_up() {
        let machine = pointer_machine(Rc::new(TileTrail::new())).unwrap();
        assert_eq!(machine.current_state(), PointerState::Up);
    }

    #[test]
    fn intersect_from_up_is_invalid() {
        let machine = pointer_machine(Rc::new(TileTrail::new())).unwrap();

        let err = machine.change(PointerKey::Intersect, Tile::new(0, 0)).unwrap_err();

        assert!(matches!(err, TransitionError::InvalidTransition { .. }));
        assert_eq!(machine.current_state(), PointerState::Up);
    }

    #[test]
    fn press_without_tile_fails() {
        let machine = pointer_machine(Rc::new(TileTrail::new())).unwrap();

        assert!(machine.change(PointerKey::Press, None).is_err());
        assert_eq!(machine.current_state(), PointerState::Up);
    }

    #[test]
    fn gesture_commits_visited_tiles() {
        let mut session = session();
        let seen = patterns(&session);

        assert!(session.press(Tile::new(0, 0)).unwrap());
        over(&mut session, 1, 0);
        over(&mut session, 1, 0);
        over(&mut session, 2, 1);
        assert!(session.release().unwrap());

        assert_eq!(
            *seen.borrow(),
            vec![vec![Tile::new(0, 0), Tile::new(1, 0), Tile::new(2, 1)]]
        );
        assert_eq!(session.state(), PointerState::Up);
        assert!(session.trail().is_empty());
    }

    #[test]
    fn events_outside_their_state_are_ignored() {
        let mut session = session();

        assert!(!session.release().unwrap());
        assert!(!session.hover(Some(Tile::new(1, 1)), Point::default()).unwrap());
        assert!(session.press(Tile::new(1, 1)).unwrap());
        assert!(!session.press(Tile::new(2, 2)).unwrap());
        assert_eq!(session.trail().tiles(), vec![Tile::new(1, 1)]);
    }

    #[test]
    fn tiles_off_the_grid_are_ignored() {
        let mut session = session();

        assert!(!session.press(Tile::new(3, 0)).unwrap());
        session.press(Tile::new(0, 0)).unwrap();
        over(&mut session, 0, 7);

        assert_eq!(session.trail().len(), 1);
    }

    #[test]
    fn completed_lines_follow_the_trail() {
        let mut session = session();

        session.press(Tile::new(0, 0)).unwrap();
        over(&mut session, 0, 1);
        over(&mut session, 1, 1);

        let completed = session.lines().completed();
        assert_eq!(completed.len(), 2);
        assert_eq!(completed[1].to_string(), "(0,1)->(1,1)");

        session.release().unwrap();
        assert!(session.lines().completed().is_empty());
        assert!(session.lines().incomplete().is_none());
    }

    #[test]
    fn pending_line_starts_at_last_tile() {
        let mut session = session();

        session.press(Tile::new(2, 2)).unwrap();
        session.hover(None, Point::new(5.0, 6.0)).unwrap();

        assert_eq!(
            session.lines().incomplete(),
            Some(PendingSegment {
                anchor: Tile::new(2, 2),
                pointer: Point::new(5.0, 6.0),
            })
        );
    }

    #[test]
    fn pending_line_stops_at_segment_limit() {
        let config = PuzzleConfig {
            max_segments: 1,
            ..PuzzleConfig::default()
        };
        let mut session = Session::new(config).unwrap();

        session.press(Tile::new(0, 0)).unwrap();
        over(&mut session, 1, 0);
        assert!(session.lines().incomplete().is_some());

        session.hover(None, Point::new(1.0, 1.0)).unwrap();
        assert!(session.lines().incomplete().is_none());
    }

    #[test]
    fn new_gesture_can_revisit_last_intersected_tile() {
        let mut session = session();
        let seen = patterns(&session);

        session.press(Tile::new(0, 0)).unwrap();
        over(&mut session, 1, 1);
        session.release().unwrap();

        session.press(Tile::new(2, 2)).unwrap();
        over(&mut session, 1, 1);
        session.release().unwrap();

        assert_eq!(seen.borrow()[1], vec![Tile::new(2, 2), Tile::new(1, 1)]);
    }

    #[test]
    fn line_listeners_see_every_change() {
        let mut session = session();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let handle = listener(move |_: &LineSnapshot| {
            *sink.borrow_mut() += 1;
            Ok(())
        });
        session.on_lines(&handle);

        session.press(Tile::new(0, 0)).unwrap();
        session.release().unwrap();

        // press redraw, cleared pending line, release redraw
        assert_eq!(*count.borrow(), 3);
    }

    #[test]
    fn empty_grid_config_is_rejected() {
        let config = PuzzleConfig {
            columns: 0,
            ..PuzzleConfig::default()
        };

        assert!(matches!(
            Session::new(config),
            Err(SessionError::Config(ConfigError::EmptyGrid { .. }))
        ));
    }
}
