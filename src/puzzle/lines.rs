//! Line segments drawn between visited tiles.

use super::tiles::Tile;
use crate::deferred::{build_deferred, ObservedProperty, SelfRef};
use crate::observer::{CallbackError, CallbackResult, ListenerHandle, ObserverHub};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// A pointer position in surface coordinates.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A completed line between two consecutive tiles of a gesture.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Segment {
    pub from: Tile,
    pub to: Tile,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// The line being dragged from the last visited tile to the pointer.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct PendingSegment {
    pub anchor: Tile,
    pub pointer: Point,
}

/// Everything a renderer needs to draw the lines.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub completed: Vec<Segment>,
    pub incomplete: Option<PendingSegment>,
}

/// Segments joining each pair of consecutive tiles.
pub fn segments_of(tiles: &[Tile]) -> Vec<Segment> {
    tiles
        .windows(2)
        .map(|pair| Segment {
            from: pair[0],
            to: pair[1],
        })
        .collect()
}

/// Observed record of the lines on screen.
///
/// Setting either property broadcasts a [`LineSnapshot`] holding the new
/// value through the buffer's own hub.
pub struct LineBuffer {
    completed: ObservedProperty<Vec<Segment>>,
    incomplete: ObservedProperty<Option<PendingSegment>>,
    observers: ObserverHub<LineSnapshot>,
}

impl LineBuffer {
    pub fn new() -> Rc<Self> {
        build_deferred(|me: SelfRef<LineBuffer>| {
            let on_completed = me.clone();
            LineBuffer {
                completed: ObservedProperty::new("completed", Vec::new())
                    .on_set(move |_, _, _| broadcast(&on_completed)),
                incomplete: ObservedProperty::new("incomplete", None)
                    .on_set(move |_, _, _| broadcast(&me)),
                observers: ObserverHub::new(),
            }
        })
    }

    pub fn completed(&self) -> Vec<Segment> {
        self.completed.get()
    }

    pub fn incomplete(&self) -> Option<PendingSegment> {
        self.incomplete.get()
    }

    pub fn set_completed(&self, segments: Vec<Segment>) -> CallbackResult {
        self.completed.set(segments)
    }

    pub fn set_incomplete(&self, pending: Option<PendingSegment>) -> CallbackResult {
        self.incomplete.set(pending)
    }

    pub fn snapshot(&self) -> LineSnapshot {
        LineSnapshot {
            completed: self.completed(),
            incomplete: self.incomplete(),
        }
    }

    /// Broadcast the current snapshot.
    pub fn notify_all(&self) -> CallbackResult {
        self.observers.notify(&self.snapshot())
    }

    pub fn observers(&self) -> &ObserverHub<LineSnapshot> {
        &self.observers
    }

    pub fn add_listener(&self, listener: &ListenerHandle<LineSnapshot>) -> bool {
        self.observers.add_listener(listener)
    }
}

fn broadcast(buffer: &SelfRef<LineBuffer>) -> CallbackResult {
    let buffer = buffer
        .get()
        .map_err(|err| CallbackError::Source(Box::new(err)))?;
    buffer.notify_all()
}

impl fmt::Debug for LineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineBuffer")
            .field("completed", &self.completed)
            .field("incomplete", &self.incomplete)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::listener;
    use std::cell::RefCell;

    fn recorded(buffer: &LineBuffer) -> Rc<RefCell<Vec<LineSnapshot>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let handle = listener(move |snapshot: &LineSnapshot| {
            sink.borrow_mut().push(snapshot.clone());
            Ok(())
        });
        buffer.add_listener(&handle);
        seen
    }

    #[test]
    fn segments_join_consecutive_tiles() {
        let tiles = [Tile::new(0, 0), Tile::new(1, 0), Tile::new(1, 1)];
        let segments = segments_of(&tiles);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].to_string(), "(0,0)->(1,0)");
        assert_eq!(segments[1].to_string(), "(1,0)->(1,1)");
        assert!(segments_of(&tiles[..1]).is_empty());
        assert!(segments_of(&[]).is_empty());
    }

    #[test]
    fn setting_completed_broadcasts_new_value() {
        let buffer = LineBuffer::new();
        let seen = recorded(&buffer);
        let segments = segments_of(&[Tile::new(0, 0), Tile::new(0, 1)]);

        buffer.set_completed(segments.clone()).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![LineSnapshot {
                completed: segments,
                incomplete: None,
            }]
        );
    }

    #[test]
    fn setting_incomplete_includes_sibling_property() {
        let buffer = LineBuffer::new();
        let segments = segments_of(&[Tile::new(0, 0), Tile::new(0, 1)]);
        buffer.set_completed(segments.clone()).unwrap();
        let seen = recorded(&buffer);
        let pending = PendingSegment {
            anchor: Tile::new(0, 1),
            pointer: Point::new(12.5, 40.0),
        };

        buffer.set_incomplete(Some(pending)).unwrap();
        buffer.set_incomplete(None).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].completed, segments);
        assert_eq!(seen[0].incomplete, Some(pending));
        assert_eq!(seen[1].incomplete, None);
    }

    #[test]
    fn listener_failures_fail_the_write() {
        let buffer = LineBuffer::new();
        let failing = listener(|_: &LineSnapshot| Err(CallbackError::msg("render failed")));
        buffer.add_listener(&failing);

        assert!(buffer.set_completed(Vec::new()).is_err());
    }
}
