use std::time::{Duration, Instant};

use winit::dpi::PhysicalPosition;

pub(crate) const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);
pub(crate) const DOUBLE_CLICK_SLOP: f64 = 8.0;

/// Recognises two left-button presses close together in time and space.
#[derive(Debug, Default)]
pub(crate) struct DoubleClickDetector {
    last_press: Option<(Instant, PhysicalPosition<f64>)>,
}

impl DoubleClickDetector {
    /// Records a press and reports whether it completes a double click. A
    /// completed double click is consumed, so a third press starts over.
    pub(crate) fn press(&mut self, at: Instant, position: PhysicalPosition<f64>) -> bool {
        if let Some((previous_at, previous_position)) = self.last_press.take() {
            let elapsed = at.saturating_duration_since(previous_at);
            let dx = position.x - previous_position.x;
            let dy = position.y - previous_position.y;
            if elapsed <= DOUBLE_CLICK_WINDOW && dx.hypot(dy) <= DOUBLE_CLICK_SLOP {
                return true;
            }
        }
        self.last_press = Some((at, position));
        false
    }
}

/// Last known cursor position, needed because winit reports button presses
/// without coordinates.
#[derive(Debug, Default)]
pub(crate) struct CursorTracker {
    position: Option<PhysicalPosition<f64>>,
}

impl CursorTracker {
    pub(crate) fn moved(&mut self, position: PhysicalPosition<f64>) {
        self.position = Some(position);
    }

    pub(crate) fn position(&self) -> PhysicalPosition<f64> {
        self.position.unwrap_or(PhysicalPosition::new(0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f64, y: f64) -> PhysicalPosition<f64> {
        PhysicalPosition::new(x, y)
    }

    #[test]
    fn two_quick_presses_in_place_toggle() {
        let mut detector = DoubleClickDetector::default();
        let start = Instant::now();
        assert!(!detector.press(start, at(100.0, 100.0)));
        assert!(detector.press(start + Duration::from_millis(250), at(103.0, 98.0)));
    }

    #[test]
    fn slow_second_press_starts_over() {
        let mut detector = DoubleClickDetector::default();
        let start = Instant::now();
        assert!(!detector.press(start, at(10.0, 10.0)));
        assert!(!detector.press(start + Duration::from_millis(600), at(10.0, 10.0)));
        assert!(detector.press(start + Duration::from_millis(700), at(10.0, 10.0)));
    }

    #[test]
    fn distant_second_press_is_not_a_double_click() {
        let mut detector = DoubleClickDetector::default();
        let start = Instant::now();
        assert!(!detector.press(start, at(0.0, 0.0)));
        assert!(!detector.press(start + Duration::from_millis(100), at(20.0, 0.0)));
    }

    #[test]
    fn third_press_does_not_retrigger() {
        let mut detector = DoubleClickDetector::default();
        let start = Instant::now();
        detector.press(start, at(5.0, 5.0));
        assert!(detector.press(start + Duration::from_millis(100), at(5.0, 5.0)));
        assert!(!detector.press(start + Duration::from_millis(200), at(5.0, 5.0)));
    }

    #[test]
    fn cursor_defaults_to_origin() {
        let mut cursor = CursorTracker::default();
        assert_eq!(cursor.position(), at(0.0, 0.0));
        cursor.moved(at(4.0, 2.0));
        assert_eq!(cursor.position(), at(4.0, 2.0));
    }
}
