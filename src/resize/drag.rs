//! Pointer tracking for a single drag.

use crate::geometry::Point;

/// Pointer movement since the previous tracked position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    pub x_delta: f64,
    pub y_delta: f64,
}

/// Tracks one pointer drag at a time inside a container.
///
/// `off` disables tracking entirely: `go` refuses to start and an active
/// drag is dropped.
#[derive(Debug)]
pub struct Dragger<E> {
    enabled: bool,
    container: Option<E>,
    last: Option<Point>,
}

impl<E> Default for Dragger<E> {
    fn default() -> Self {
        Self {
            enabled: true,
            container: None,
            last: None,
        }
    }
}

impl<E> Dragger<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self) {
        self.enabled = true;
    }

    pub fn off(&mut self) {
        self.enabled = false;
        self.destroy();
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.container.is_some()
    }

    /// Start tracking inside `container` from `start`. Returns `false` when
    /// disabled.
    pub fn go(&mut self, container: E, start: Point) -> bool {
        if !self.enabled {
            return false;
        }
        self.container = Some(container);
        self.last = Some(start);
        true
    }

    /// Feed a pointer position; returns the movement since the last one.
    pub fn track(&mut self, point: Point) -> Option<DragUpdate> {
        if !self.enabled || self.container.is_none() {
            return None;
        }
        let last = self.last.replace(point)?;
        Some(DragUpdate {
            x_delta: point.x - last.x,
            y_delta: point.y - last.y,
        })
    }

    /// Finish the drag. Returns whether one was in progress.
    pub fn stop(&mut self) -> bool {
        self.last = None;
        self.container.take().is_some()
    }

    /// Drop any drag in progress without reporting it.
    pub fn destroy(&mut self) {
        self.container = None;
        self.last = None;
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_deltas_are_incremental() {
        let mut d: Dragger<u8> = Dragger::new();
        assert!(d.track(Point::new(5.0, 5.0)).is_none());
        assert!(d.go(0, Point::new(10.0, 10.0)));
        let u = d.track(Point::new(13.0, 20.0)).unwrap();
        assert_eq!((u.x_delta, u.y_delta), (3.0, 10.0));
        let u = d.track(Point::new(13.0, 15.0)).unwrap();
        assert_eq!((u.x_delta, u.y_delta), (0.0, -5.0));
        assert!(d.stop());
        assert!(!d.stop());
    }

    #[test]
    fn test_off_refuses_and_drops() {
        let mut d: Dragger<u8> = Dragger::new();
        assert!(d.go(0, Point::default()));
        d.off();
        assert!(!d.is_tracking());
        assert!(!d.go(0, Point::default()));
        d.on();
        assert!(d.go(0, Point::default()));
    }
}
