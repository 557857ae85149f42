use crate::data::config::IntroConfig;

/// Stage of the intro, derived purely from elapsed time. `Free` persists
/// indefinitely once reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntroPhase {
    Typing,
    Hold,
    Explosion,
    Free,
}

impl IntroPhase {
    pub fn at(elapsed: f32, timings: &PhaseTimings) -> IntroPhase {
        if elapsed < timings.typing_end {
            IntroPhase::Typing
        } else if elapsed < timings.hold_end {
            IntroPhase::Hold
        } else if elapsed < timings.explosion_end {
            IntroPhase::Explosion
        } else {
            IntroPhase::Free
        }
    }
}

/// Cumulative phase boundaries in seconds. Half-open windows, no gaps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseTimings {
    pub typing_end: f32,
    pub hold_end: f32,
    pub explosion_end: f32,
    pub total: f32,
}

impl PhaseTimings {
    pub fn from_config(config: &IntroConfig) -> Self {
        let typing_end = config.typing_secs.max(0.0);
        let hold_end = typing_end + config.hold_secs.max(0.0);
        let explosion_end = hold_end + config.explosion_secs.max(0.0);
        Self {
            typing_end,
            hold_end,
            explosion_end,
            total: config.total_secs.max(explosion_end),
        }
    }

    /// Normalized explosion progress, clamped to `[0, 1]`.
    pub fn explosion_progress(&self, elapsed: f32) -> f32 {
        let span = self.explosion_end - self.hold_end;
        if span <= 0.0 {
            return 1.0;
        }
        ((elapsed - self.hold_end) / span).clamp(0.0, 1.0)
    }
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self::from_config(&IntroConfig::default())
    }
}

pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

pub fn ease_in_cubic(t: f32) -> f32 {
    t * t * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timings() -> PhaseTimings {
        PhaseTimings::default()
    }

    #[test]
    fn phase_windows_are_half_open_and_contiguous() {
        let t = timings();
        assert_eq!(IntroPhase::at(0.0, &t), IntroPhase::Typing);
        assert_eq!(IntroPhase::at(t.typing_end - 1e-4, &t), IntroPhase::Typing);
        assert_eq!(IntroPhase::at(t.typing_end, &t), IntroPhase::Hold);
        assert_eq!(IntroPhase::at(t.hold_end, &t), IntroPhase::Explosion);
        assert_eq!(IntroPhase::at(t.explosion_end, &t), IntroPhase::Free);
        assert_eq!(IntroPhase::at(t.total * 100.0, &t), IntroPhase::Free);
    }

    #[test]
    fn phase_never_regresses() {
        let t = timings();
        let mut previous = IntroPhase::Typing;
        for step in 0..2_000 {
            let elapsed = step as f32 * 0.005;
            let phase = IntroPhase::at(elapsed, &t);
            assert!(phase >= previous, "regressed at {elapsed}");
            previous = phase;
        }
        assert_eq!(previous, IntroPhase::Free);
    }

    #[test]
    fn explosion_progress_is_clamped_and_monotonic() {
        let t = timings();
        assert_eq!(t.explosion_progress(0.0), 0.0);
        assert_eq!(t.explosion_progress(t.hold_end), 0.0);
        assert_eq!(t.explosion_progress(t.explosion_end), 1.0);
        assert_eq!(t.explosion_progress(t.total + 10.0), 1.0);
        let mut previous = 0.0;
        for step in 0..100 {
            let progress = t.explosion_progress(t.hold_end + step as f32 * 0.02);
            assert!(progress >= previous);
            previous = progress;
        }
    }

    #[test]
    fn easing_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_in_cubic(0.0), 0.0);
        assert_eq!(ease_in_cubic(1.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
        assert!(ease_in_cubic(0.5) < 0.5);
    }
}
