//! Mapping raw input (key names, drags) to move directions.

use log::trace;

use crate::engine::Direction;

/// Minimum drag distance, in pixels, before a gesture counts as a move.
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 30.0;

impl Direction {
    /// Map a key name (arrow keys or WASD, any case) to a direction.
    ///
    /// ```
    /// use twenty48_board::engine::Direction;
    /// assert_eq!(Direction::from_key("ArrowUp"), Some(Direction::Up));
    /// assert_eq!(Direction::from_key("W"), Some(Direction::Up));
    /// assert_eq!(Direction::from_key("Enter"), None);
    /// ```
    pub fn from_key(name: &str) -> Option<Direction> {
        match name.to_ascii_lowercase().as_str() {
            "arrowleft" | "a" => Some(Direction::Left),
            "arrowright" | "d" => Some(Direction::Right),
            "arrowup" | "w" => Some(Direction::Up),
            "arrowdown" | "s" => Some(Direction::Down),
            _ => None,
        }
    }
}

/// A point in screen space; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Displacement of a completed single-finger drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swipe {
    pub dx: f64,
    pub dy: f64,
}

impl Swipe {
    pub fn between(start: Point, end: Point) -> Self {
        Swipe {
            dx: end.x - start.x,
            dy: end.y - start.y,
        }
    }

    /// Direction along the dominant axis, or `None` when the drag stays
    /// under `threshold` on both axes. Ties go to the vertical axis.
    ///
    /// ```
    /// use twenty48_board::engine::Direction;
    /// use twenty48_board::input::{Swipe, DEFAULT_SWIPE_THRESHOLD};
    /// let left = Swipe { dx: -40.0, dy: 5.0 };
    /// assert_eq!(left.direction(DEFAULT_SWIPE_THRESHOLD), Some(Direction::Left));
    /// let tap = Swipe { dx: 10.0, dy: 10.0 };
    /// assert_eq!(tap.direction(DEFAULT_SWIPE_THRESHOLD), None);
    /// ```
    pub fn direction(&self, threshold: f64) -> Option<Direction> {
        let (ax, ay) = (self.dx.abs(), self.dy.abs());
        if ax < threshold && ay < threshold {
            return None;
        }
        if ax > ay {
            Some(if self.dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            })
        } else {
            Some(if self.dy > 0.0 {
                Direction::Down
            } else {
                Direction::Up
            })
        }
    }
}

/// Tracks one touch from press to release and turns it into a direction.
///
/// Only gestures that start and end with exactly one active touch count;
/// everything else is dropped.
#[derive(Debug, Clone)]
pub struct TouchTracker {
    threshold: f64,
    start: Option<Point>,
}

impl Default for TouchTracker {
    fn default() -> Self {
        TouchTracker::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

impl TouchTracker {
    pub fn new(threshold: f64) -> Self {
        TouchTracker {
            threshold,
            start: None,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Record the start of a gesture. `touches` are all currently active points.
    pub fn touch_start(&mut self, touches: &[Point]) {
        match touches {
            [only] => self.start = Some(*only),
            _ => {
                trace!("ignoring {}-finger touch start", touches.len());
                self.start = None;
            }
        }
    }

    /// Finish a gesture. `changed` are the points released by this event.
    pub fn touch_end(&mut self, changed: &[Point]) -> Option<Direction> {
        let start = self.start.take()?;
        let [end] = changed else {
            trace!("ignoring {}-finger touch end", changed.len());
            return None;
        };
        Swipe::between(start, *end).direction(self.threshold)
    }

    /// Drop any gesture in progress.
    pub fn cancel(&mut self) {
        self.start = None;
    }
}
