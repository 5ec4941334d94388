use std::fmt;
use std::str::FromStr;

/// Speed magnitude below which a snapped position counts as settled.
const REST_SPEED: f64 = 1e-6;

/// How `position` is brought back into range after each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Forward wrap fires once `position > N` and resets to 0; a negative
    /// position is replaced by the rounding target of the same step. The
    /// bounds are asymmetric, so a flick backwards can settle below zero.
    #[default]
    Inherited,
    /// Euclidean remainder into `0..N` after every step.
    Modular,
}

impl WrapMode {
    pub fn as_str(self) -> &'static str {
        match self {
            WrapMode::Inherited => "inherited",
            WrapMode::Modular => "modular",
        }
    }
}

impl fmt::Display for WrapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WrapMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "inherited" => Ok(WrapMode::Inherited),
            "modular" | "mod" => Ok(WrapMode::Modular),
            other => Err(format!(
                "unknown wrap mode '{other}'; expected inherited or modular"
            )),
        }
    }
}

/// Tuning for one [`TransitionState`]. Coefficients are applied once per
/// `advance()`, so the feel scales with the display refresh rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionParams {
    pub friction: f64,
    pub pull: f64,
    pub snap_tolerance: f64,
    pub sensitivity: f64,
    pub wrap: WrapMode,
}

impl Default for TransitionParams {
    fn default() -> Self {
        Self {
            friction: 0.7,
            pull: 0.035,
            snap_tolerance: 0.001,
            sensitivity: 0.0003,
            wrap: WrapMode::Inherited,
        }
    }
}

/// Values handed to the shader bridge for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendFrame {
    pub progress: f32,
    pub current_slide: usize,
    pub next_slide: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionState {
    position: f64,
    speed: f64,
    slide_count: usize,
    params: TransitionParams,
}

impl TransitionState {
    /// `slide_count` is clamped to at least one so the derived indices stay
    /// defined; `GalleryStore` already refuses empty galleries.
    pub fn new(slide_count: usize, params: TransitionParams) -> Self {
        Self {
            position: 0.0,
            speed: 0.0,
            slide_count: slide_count.max(1),
            params,
        }
    }

    pub fn with_motion(mut self, position: f64, speed: f64) -> Self {
        self.position = position;
        self.speed = speed;
        self
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn params(&self) -> &TransitionParams {
        &self.params
    }

    /// Nearest integer to the current position, halves rounding up.
    pub fn theta(&self) -> f64 {
        round_half_up(self.position)
    }

    pub fn current_slide(&self) -> usize {
        self.wrap_index(self.position.floor())
    }

    pub fn next_slide(&self) -> usize {
        self.wrap_index(self.position.floor() + 1.0)
    }

    pub fn frame(&self) -> BlendFrame {
        BlendFrame {
            progress: self.position as f32,
            current_slide: self.current_slide(),
            next_slide: self.next_slide(),
        }
    }

    pub fn is_at_rest(&self) -> bool {
        self.position.fract() == 0.0 && self.speed.abs() < REST_SPEED
    }

    /// Adds to the current speed. Impulses landing between two frames sum.
    /// An impulse that would leave the speed non-finite is dropped.
    pub fn add_impulse(&mut self, impulse: f64) {
        let speed = self.speed + impulse;
        if !speed.is_finite() {
            tracing::debug!(speed = self.speed, impulse, "dropping impulse that overflows speed");
            return;
        }
        self.speed = speed;
    }

    pub fn reset(&mut self) {
        self.position = 0.0;
        self.speed = 0.0;
    }

    /// Steps the simulation by one frame and returns the blend it settled on.
    pub fn advance(&mut self) -> BlendFrame {
        let params = self.params;

        self.speed *= params.friction;
        self.position += self.speed;
        if !self.position.is_finite() {
            tracing::warn!(speed = self.speed, "transition position overflowed; resetting motion");
            self.reset();
        }

        let theta = round_half_up(self.position);
        let delta = theta - self.position;
        self.position += delta * params.pull;

        if (theta - self.position).abs() < params.snap_tolerance {
            self.position = theta;
        }

        let n = self.slide_count as f64;
        match params.wrap {
            WrapMode::Inherited => {
                if self.position > n {
                    self.position = 0.0;
                }
                if self.position < 0.0 {
                    self.position = theta;
                }
            }
            WrapMode::Modular => {
                self.position = self.position.rem_euclid(n);
                // rem_euclid of a tiny negative value can round up to n itself
                if self.position >= n {
                    self.position = 0.0;
                }
            }
        }

        let frame = self.frame();
        tracing::trace!(
            position = self.position,
            speed = self.speed,
            current = frame.current_slide,
            next = frame.next_slide,
            "advanced transition"
        );
        frame
    }

    fn wrap_index(&self, slot: f64) -> usize {
        let n = self.slide_count as i64;
        (slot as i64).rem_euclid(n) as usize
    }
}

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn state(n: usize) -> TransitionState {
        TransitionState::new(n, TransitionParams::default())
    }

    fn modular(n: usize) -> TransitionState {
        TransitionState::new(
            n,
            TransitionParams {
                wrap: WrapMode::Modular,
                ..TransitionParams::default()
            },
        )
    }

    fn settle(state: &mut TransitionState, max_frames: usize) -> usize {
        for frame in 1..=max_frames {
            state.advance();
            if state.is_at_rest() {
                return frame;
            }
        }
        panic!(
            "did not settle within {max_frames} frames: position={} speed={}",
            state.position(),
            state.speed()
        );
    }

    #[test]
    fn rounding_sends_halves_up() {
        assert_eq!(round_half_up(0.5), 1.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(-1.5), -1.0);
        assert_eq!(round_half_up(2.49), 2.0);
    }

    #[test]
    fn rest_state_is_stable() {
        let mut s = state(5);
        for _ in 0..1000 {
            let frame = s.advance();
            assert_eq!(frame.current_slide, 0);
            assert_eq!(frame.next_slide, 1);
        }
        assert_eq!(s.position(), 0.0);
        assert_eq!(s.speed(), 0.0);
        assert!(s.is_at_rest());
    }

    #[test]
    fn single_impulse_first_frame() {
        let mut s = state(5);
        s.add_impulse(1000.0 * 0.0003);
        assert!((s.speed() - 0.3).abs() < EPS);

        let frame = s.advance();
        assert!((s.speed() - 0.21).abs() < EPS);
        assert!((s.position() - 0.20265).abs() < EPS);
        assert_eq!(frame.current_slide, 0);
        assert_eq!(frame.next_slide, 1);
        assert!((frame.progress - 0.20265).abs() < 1e-6);
    }

    #[test]
    fn forward_wrap_boundary_sits_above_slide_count() {
        for start in [4.999, 5.0, 5.0001] {
            let mut s = state(5).with_motion(start, 0.0);
            let frame = s.advance();
            assert_eq!(s.position(), 5.0, "start {start}");
            assert_eq!(frame.current_slide, 0);
            assert_eq!(frame.next_slide, 1);
            s.advance();
            assert_eq!(s.position(), 5.0, "start {start} second frame");
        }

        let mut past = state(5).with_motion(5.2, 0.0);
        past.advance();
        assert_eq!(past.position(), 0.0);
    }

    #[test]
    fn large_flick_settles_on_integer() {
        let mut s = state(5);
        s.add_impulse(2.0);
        let frames = settle(&mut s, 200);
        assert!(frames <= 200);
        assert_eq!(s.position(), 5.0);
        assert_eq!(s.current_slide(), 0);
        assert_eq!(s.next_slide(), 1);
    }

    #[test]
    fn large_flick_settles_inside_range_when_modular() {
        let mut s = modular(5);
        s.add_impulse(2.0);
        settle(&mut s, 200);
        assert_eq!(s.position(), 0.0);
    }

    #[test]
    fn resting_on_any_slot_is_a_no_op() {
        for slot in 1..5 {
            let mut s = state(5).with_motion(slot as f64, 0.0);
            for _ in 0..100 {
                s.advance();
                assert_eq!(s.position(), slot as f64);
                assert_eq!(s.speed(), 0.0);
            }
        }

        let mut s = modular(5).with_motion(3.0, 0.0);
        for _ in 0..100 {
            s.advance();
        }
        assert_eq!((s.position(), s.speed()), (3.0, 0.0));
    }

    #[test]
    fn resting_below_zero_is_a_no_op_when_inherited() {
        let mut s = state(5);
        s.add_impulse(-2.0);
        settle(&mut s, 200);
        let rest = s.position();
        assert!(rest < 0.0);
        for _ in 0..100 {
            s.advance();
            assert_eq!(s.position(), rest);
        }

        let mut seeded = state(5).with_motion(-3.0, 0.0);
        for _ in 0..100 {
            seeded.advance();
            assert_eq!(seeded.position(), -3.0);
            assert_eq!(seeded.speed(), 0.0);
        }
    }

    #[test]
    fn overflowing_impulse_leaves_speed_untouched() {
        let mut s = state(5);
        s.add_impulse(1.5e308);
        s.add_impulse(1.5e308);
        assert_eq!(s.speed(), 1.5e308);
        s.add_impulse(f64::INFINITY);
        assert_eq!(s.speed(), 1.5e308);
    }

    #[test]
    fn overflowing_position_resets_to_a_valid_rest() {
        for wrap in [WrapMode::Inherited, WrapMode::Modular] {
            let params = TransitionParams {
                wrap,
                ..TransitionParams::default()
            };
            let mut s = TransitionState::new(5, params).with_motion(-1.5e308, -1.5e308);
            for _ in 0..5 {
                let frame = s.advance();
                assert!(s.position().is_finite());
                assert!(s.speed().is_finite());
                assert_eq!(frame.next_slide, (frame.current_slide + 1) % 5);
            }
        }

        let mut s = state(5).with_motion(0.0, f64::INFINITY);
        s.advance();
        assert_eq!((s.position(), s.speed()), (0.0, 0.0));
    }

    #[test]
    fn backward_flick_inherited_rests_on_negative_integer() {
        let mut s = state(5);
        s.add_impulse(-2.0);
        settle(&mut s, 200);
        assert_eq!(s.position().fract(), 0.0);
        assert!(s.position() < 0.0);
        assert!(s.current_slide() < 5);
        assert!(s.next_slide() < 5);
    }

    #[test]
    fn backward_flick_modular_stays_in_range() {
        let mut s = modular(5);
        s.add_impulse(-0.6);
        for _ in 0..300 {
            s.advance();
            assert!(s.position() >= 0.0 && s.position() < 5.0);
        }
        assert!(s.is_at_rest());
        assert_eq!(s.position(), 4.0);
    }

    #[test]
    fn derived_indices_are_always_valid() {
        let impulses = [0.3, -0.45, 1.7, -2.2, 0.05, 3.1, -0.9];
        for wrap in [WrapMode::Inherited, WrapMode::Modular] {
            let mut s = TransitionState::new(
                4,
                TransitionParams {
                    wrap,
                    ..TransitionParams::default()
                },
            );
            for (i, impulse) in impulses.iter().cycle().take(60).enumerate() {
                if i % 3 == 0 {
                    s.add_impulse(*impulse);
                }
                let frame = s.advance();
                assert!(frame.current_slide < 4);
                assert!(frame.next_slide < 4);
                assert_eq!(frame.next_slide, (frame.current_slide + 1) % 4);
            }
        }
    }

    #[test]
    fn friction_decays_speed_monotonically() {
        let mut s = state(8);
        s.add_impulse(0.9);
        let mut previous = s.speed().abs();
        for _ in 0..50 {
            s.advance();
            let current = s.speed().abs();
            assert!(current < previous || current == 0.0);
            previous = current;
        }
    }

    #[test]
    fn settles_within_bound_for_mixed_impulses() {
        let sequences: [&[f64]; 4] = [
            &[0.3],
            &[1.2, -0.4, 0.8],
            &[-0.05, -0.05, -0.05],
            &[2.5, 2.5],
        ];
        for impulses in sequences {
            let mut s = state(6);
            for impulse in impulses {
                s.add_impulse(*impulse);
                s.advance();
            }
            settle(&mut s, 200);
            assert_eq!(s.position().fract(), 0.0);
        }
    }

    #[test]
    fn identical_inputs_give_identical_outputs() {
        let run = || {
            let mut s = state(5);
            s.add_impulse(0.42);
            (0..40).map(|_| s.advance()).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn single_slide_gallery_always_maps_to_zero() {
        let mut s = state(1);
        s.add_impulse(0.7);
        for _ in 0..200 {
            let frame = s.advance();
            assert_eq!(frame.current_slide, 0);
            assert_eq!(frame.next_slide, 0);
        }
    }

    #[test]
    fn reset_clears_motion() {
        let mut s = state(3).with_motion(1.4, 0.2);
        s.reset();
        assert_eq!(s.position(), 0.0);
        assert_eq!(s.speed(), 0.0);
        assert_eq!(s.slide_count(), 3);
    }

    #[test]
    fn wrap_mode_parses_names() {
        assert_eq!("inherited".parse::<WrapMode>().unwrap(), WrapMode::Inherited);
        assert_eq!("Modular".parse::<WrapMode>().unwrap(), WrapMode::Modular);
        assert!("circular".parse::<WrapMode>().is_err());
        assert_eq!(WrapMode::Modular.to_string(), "modular");
    }
}
