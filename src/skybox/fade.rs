//! Day-cycle fading.
//!
//! Each frame the fade window yields a ceiling for the skybox alpha; the
//! stored alpha then moves toward it by at most `transition_speed`, or snaps
//! down when it is already above it. Environment gating overrides the
//! window: a skybox whose conditions fail fades toward zero.

use crate::skybox::time::{TimeOfDay, ticks_between};
use crate::skybox::{Properties, Rgba};

/// Alpha above which a fog-changing skybox takes over the fog color.
pub const FOG_ALPHA_THRESHOLD: f32 = 0.1;

// ---------------------------------------------------------------------------
// Fade window
// ---------------------------------------------------------------------------

/// Four tick offsets bounding fade-in and fade-out, or always-on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fade {
    pub start_fade_in: i32,
    pub end_fade_in: i32,
    pub start_fade_out: i32,
    pub end_fade_out: i32,
    pub always_on: bool,
}

/// Where the current time falls inside a [`Fade`] window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadePhase {
    Hidden,
    FadingIn,
    FullyVisible,
    FadingOut,
}

impl Fade {
    pub fn new(start_fade_in: i32, end_fade_in: i32, start_fade_out: i32, end_fade_out: i32) -> Self {
        Self {
            start_fade_in,
            end_fade_in,
            start_fade_out,
            end_fade_out,
            always_on: false,
        }
    }

    pub fn always_on() -> Self {
        Self {
            always_on: true,
            ..Default::default()
        }
    }

    /// Length of the fade-in in ticks. Also scales the fade-out ramp.
    pub fn duration(&self) -> i32 {
        ticks_between(self.start_fade_in, self.end_fade_in)
    }

    /// Phase lookup on raw tick values; lower bounds exclusive, upper inclusive.
    pub fn phase(&self, time: TimeOfDay) -> FadePhase {
        let t = time.ticks();
        if self.start_fade_in < t && self.end_fade_in >= t {
            FadePhase::FadingIn
        } else if self.end_fade_in < t && self.start_fade_out >= t {
            FadePhase::FullyVisible
        } else if self.start_fade_out < t && self.end_fade_out >= t {
            FadePhase::FadingOut
        } else {
            FadePhase::Hidden
        }
    }

    /// Unscaled alpha ceiling in `[0.0, 1.0]` for the given time.
    pub fn ceiling(&self, time: TimeOfDay) -> f32 {
        let t = time.ticks();
        let duration = self.duration();
        let raw = match self.phase(time) {
            FadePhase::FadingIn => (t - self.start_fade_in) as f32 / duration as f32,
            FadePhase::FullyVisible => 1.0,
            // A zero-length fade-in gives the fade-out nothing to scale by
            FadePhase::FadingOut if duration == 0 => 0.0,
            FadePhase::FadingOut => (self.end_fade_out - t) as f32 / duration as f32,
            FadePhase::Hidden => 0.0,
        };
        raw.clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Per-frame step
// ---------------------------------------------------------------------------

/// Result of one fade step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeOutput {
    pub alpha: f32,
    /// Fog color this skybox requests for the current frame.
    pub fog: Option<Rgba>,
}

/// Advance `alpha` by one frame.
///
/// `matches` is the verdict of [`Conditions::matches`](crate::skybox::Conditions::matches)
/// for this frame. Always-on skyboxes pin alpha to 1.0 and never touch fog.
pub fn step(properties: &Properties, matches: bool, time: TimeOfDay, alpha: &mut f32) -> FadeOutput {
    if properties.fade.always_on {
        *alpha = 1.0;
        return FadeOutput { alpha: 1.0, fog: None };
    }

    let ceiling = properties.fade.ceiling(time) * properties.max_alpha;

    if matches {
        if *alpha >= ceiling {
            *alpha = ceiling;
        } else {
            *alpha = (*alpha + properties.transition_speed).min(ceiling);
        }
    } else {
        *alpha = (*alpha - properties.transition_speed).max(0.0);
    }

    let fog = (*alpha > FOG_ALPHA_THRESHOLD && properties.change_fog).then_some(properties.fog_color);

    FadeOutput { alpha: *alpha, fog }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ticks: i64) -> TimeOfDay {
        TimeOfDay::from_world_time(ticks)
    }

    /// Fade in 1000..2000, visible until 10000, fade out until 11000.
    fn window() -> Fade {
        Fade::new(1_000, 2_000, 10_000, 11_000)
    }

    fn props(max_alpha: f32, speed: f32) -> Properties {
        Properties {
            max_alpha,
            transition_speed: speed,
            ..Properties::with_fade(window())
        }
    }

    #[test]
    fn test_phase_boundaries() {
        let fade = window();
        assert_eq!(fade.phase(at(1_000)), FadePhase::Hidden);
        assert_eq!(fade.phase(at(1_001)), FadePhase::FadingIn);
        assert_eq!(fade.phase(at(2_000)), FadePhase::FadingIn);
        assert_eq!(fade.phase(at(2_001)), FadePhase::FullyVisible);
        assert_eq!(fade.phase(at(10_000)), FadePhase::FullyVisible);
        assert_eq!(fade.phase(at(10_001)), FadePhase::FadingOut);
        assert_eq!(fade.phase(at(11_000)), FadePhase::FadingOut);
        assert_eq!(fade.phase(at(11_001)), FadePhase::Hidden);
    }

    #[test]
    fn test_hidden_outside_window() {
        let fade = window();
        for t in [0, 500, 1_000, 11_001, 15_000, 23_999] {
            assert_eq!(fade.ceiling(at(t)), 0.0, "tick {t}");
        }
    }

    #[test]
    fn test_fade_in_monotonic_and_reaches_max() {
        let p = props(0.8, 1.0);
        let mut previous = 0.0;
        for t in 1_000..=2_000 {
            let ceiling = p.fade.ceiling(at(t)) * p.max_alpha;
            assert!(ceiling >= previous, "ceiling dropped at tick {t}");
            previous = ceiling;
        }
        assert_eq!(p.fade.ceiling(at(2_000)) * p.max_alpha, 0.8);
    }

    #[test]
    fn test_fade_out_ramp() {
        let fade = window();
        assert!((fade.ceiling(at(10_500)) - 0.5).abs() < 1e-6);
        assert_eq!(fade.ceiling(at(11_000)), 0.0);
    }

    #[test]
    fn test_fade_out_longer_than_fade_in_is_clamped() {
        let fade = Fade::new(1_000, 1_100, 5_000, 6_000);
        assert_eq!(fade.ceiling(at(5_001)), 1.0);
    }

    #[test]
    fn test_zero_length_fade_in() {
        let fade = Fade::new(1_000, 1_000, 5_000, 6_000);
        assert_eq!(fade.phase(at(1_000)), FadePhase::Hidden);
        assert_eq!(fade.ceiling(at(3_000)), 1.0);
        assert_eq!(fade.ceiling(at(5_500)), 0.0);
    }

    #[test]
    fn test_step_moves_by_transition_speed() {
        let p = props(1.0, 0.1);
        let mut alpha = 0.0;
        let out = step(&p, true, at(5_000), &mut alpha);
        assert!((out.alpha - 0.1).abs() < 1e-6);
        step(&p, true, at(5_000), &mut alpha);
        assert!((alpha - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_step_snaps_down_to_lower_ceiling() {
        let p = props(1.0, 0.01);
        let mut alpha = 1.0;
        step(&p, true, at(10_500), &mut alpha);
        assert!((alpha - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_step_fades_out_when_conditions_fail() {
        let p = props(1.0, 0.25);
        let mut alpha = 0.6;
        step(&p, false, at(5_000), &mut alpha);
        assert!((alpha - 0.35).abs() < 1e-6);
        step(&p, false, at(5_000), &mut alpha);
        step(&p, false, at(5_000), &mut alpha);
        assert_eq!(alpha, 0.0);
    }

    #[test]
    fn test_alpha_stays_in_bounds() {
        let p = props(0.7, 0.3);
        let mut alpha = 0.0;
        for frame in 0..2_000i64 {
            let matches = frame % 7 != 0;
            step(&p, matches, at(frame * 13), &mut alpha);
            assert!((0.0..=0.7).contains(&alpha), "alpha {alpha} at frame {frame}");
        }
    }

    #[test]
    fn test_always_on_pins_alpha() {
        let p = Properties::with_fade(Fade::always_on());
        let mut alpha = 0.0;
        let out = step(&p, false, at(0), &mut alpha);
        assert_eq!(out.alpha, 1.0);
        assert_eq!(out.fog, None);
    }

    #[test]
    fn test_fog_emitted_above_threshold() {
        let mut p = props(1.0, 0.05);
        p.change_fog = true;
        p.fog_color = Rgba::rgb(0.2, 0.3, 0.4);
        let mut alpha = 0.0;

        let out = step(&p, true, at(5_000), &mut alpha);
        assert_eq!(out.fog, None); // alpha 0.05

        step(&p, true, at(5_000), &mut alpha);
        let out = step(&p, true, at(5_000), &mut alpha);
        assert_eq!(out.fog, Some(Rgba::rgb(0.2, 0.3, 0.4)));
    }

    #[test]
    fn test_no_fog_without_change_fog() {
        let p = props(1.0, 1.0);
        let mut alpha = 0.0;
        assert_eq!(step(&p, true, at(5_000), &mut alpha).fog, None);
    }
}
