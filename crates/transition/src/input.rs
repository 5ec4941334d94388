use crate::state::TransitionState;

/// Pixels reported per wheel "line" when a device scrolls in line units.
pub const LINE_HEIGHT_PIXELS: f64 = 100.0;

/// Raw vertical wheel movement as reported by the windowing layer.
///
/// Positive values mean "scroll up / towards the user" there, which is the
/// opposite sign of the browser-style `deltaY` the sensitivity is tuned for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollDelta {
    Lines(f64),
    Pixels(f64),
}

impl ScrollDelta {
    /// Converts to a browser-style `deltaY`: positive scrolls forward.
    pub fn delta_y(self) -> f64 {
        match self {
            ScrollDelta::Lines(lines) => -lines * LINE_HEIGHT_PIXELS,
            ScrollDelta::Pixels(pixels) => -pixels,
        }
    }
}

/// Turns wheel deltas into speed impulses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollInput {
    sensitivity: f64,
}

impl ScrollInput {
    pub fn new(sensitivity: f64) -> Self {
        Self { sensitivity }
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Adds `delta_y * sensitivity` to the state's speed, unbounded.
    pub fn on_scroll(&self, state: &mut TransitionState, delta_y: f64) {
        if !delta_y.is_finite() {
            tracing::debug!(delta_y, "ignoring non-finite scroll delta");
            return;
        }
        let impulse = delta_y * self.sensitivity;
        if !impulse.is_finite() {
            tracing::debug!(delta_y, sensitivity = self.sensitivity, "ignoring overflowing scroll impulse");
            return;
        }
        state.add_impulse(impulse);
    }

    pub fn on_wheel(&self, state: &mut TransitionState, delta: ScrollDelta) {
        self.on_scroll(state, delta.delta_y());
    }
}

impl Default for ScrollInput {
    fn default() -> Self {
        Self::new(crate::TransitionParams::default().sensitivity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransitionParams;

    fn fresh() -> TransitionState {
        TransitionState::new(5, TransitionParams::default())
    }

    #[test]
    fn impulse_scales_with_sensitivity() {
        let mut state = fresh();
        ScrollInput::default().on_scroll(&mut state, 1000.0);
        assert!((state.speed() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn events_between_frames_sum() {
        let input = ScrollInput::new(0.0003);
        let mut split = fresh();
        input.on_scroll(&mut split, 400.0);
        input.on_scroll(&mut split, 600.0);

        let mut single = fresh();
        input.on_scroll(&mut single, 1000.0);

        assert!((split.speed() - single.speed()).abs() < 1e-12);
        split.advance();
        single.advance();
        assert!((split.position() - single.position()).abs() < 1e-12);
    }

    #[test]
    fn non_finite_deltas_are_dropped() {
        let mut state = fresh();
        let input = ScrollInput::default();
        input.on_scroll(&mut state, f64::NAN);
        input.on_scroll(&mut state, f64::INFINITY);
        assert_eq!(state.speed(), 0.0);
    }

    #[test]
    fn overflowing_impulses_keep_the_state_finite() {
        let mut state = fresh();
        ScrollInput::new(10.0).on_scroll(&mut state, 1e308);
        assert_eq!(state.speed(), 0.0);

        let input = ScrollInput::new(1.0);
        input.on_scroll(&mut state, 1.5e308);
        input.on_scroll(&mut state, 1.5e308);
        assert_eq!(state.speed(), 1.5e308);

        for _ in 0..5 {
            let frame = state.advance();
            assert!(state.position().is_finite());
            assert_eq!(frame.next_slide, (frame.current_slide + 1) % 5);
        }
    }

    #[test]
    fn device_deltas_flip_to_browser_sign() {
        assert_eq!(ScrollDelta::Lines(1.0).delta_y(), -100.0);
        assert_eq!(ScrollDelta::Lines(-2.5).delta_y(), 250.0);
        assert_eq!(ScrollDelta::Pixels(-48.0).delta_y(), 48.0);

        let mut state = fresh();
        ScrollInput::new(0.001).on_wheel(&mut state, ScrollDelta::Lines(-1.0));
        assert!((state.speed() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn unbounded_impulses_accumulate() {
        let mut state = fresh();
        let input = ScrollInput::new(1.0);
        for _ in 0..10 {
            input.on_scroll(&mut state, 1.0e6);
        }
        assert_eq!(state.speed(), 1.0e7);
    }
}
