//! Wipe-transition state: the uniform record shared by the CPU-side frame
//! driver and the composite shader.
//!
//! [`WipeUniforms`] is the single source of truth for the transition. The
//! frame driver writes `time` into it once per frame, the input surface
//! writes `time_start`/`action` when a scene switch is triggered, and the
//! wipe pass uploads the whole record to the GPU before compositing. The
//! same math the shader evaluates per pixel is mirrored here
//! ([`WipeUniforms::progress`], [`WipeUniforms::blend_factor`]) so the
//! transition can be reasoned about and tested without a GPU.
//!
//! # The wipe
//!
//! A vertical band of width [`WAVE_WIDTH`] sweeps across the frame from
//! left to right over [`DURATION`] seconds. Behind the band the destination
//! scene is fully visible, ahead of it the source scene; inside the band the
//! two are blended with a cubic smoothstep. The band starts half a width
//! off the left edge and ends half a width past the right edge, so both
//! endpoints of the sweep show a single pure scene.

/// Fixed transition length in seconds.
pub const DURATION: f32 = 3.0;

/// Width of the blend band in normalized screen coordinates.
pub const WAVE_WIDTH: f32 = 0.25;

/// Startup sentinel for `time_start`. Far enough in the past that progress
/// clamps to 1 before any transition is triggered, so the destination
/// buffer is what reaches the screen at startup.
pub const TIME_START_IDLE: f32 = -1000.0;

/// Direction tag recorded when a transition is triggered.
///
/// Stored in the uniform record as `action` (0 or 1). The sweep itself is
/// direction-agnostic; the tag identifies which trigger fired last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WipeDirection {
    /// Trigger 1 (`action = 0`).
    Forward,
    /// Trigger 2 (`action = 1`).
    Reverse,
}

impl WipeDirection {
    /// The value written into the `action` uniform.
    pub fn as_uniform(self) -> f32 {
        match self {
            WipeDirection::Forward => 0.0,
            WipeDirection::Reverse => 1.0,
        }
    }
}

/// The five-float uniform record driving the wipe shader.
///
/// Created once at startup and mutated in place; the wipe pass reads it by
/// reference every frame, so updates are visible to the shader without any
/// re-binding step.
///
/// Invariants:
/// - `time` is monotonically non-decreasing (the frame clock guarantees it).
/// - `time_start <= time` once a transition has been triggered.
/// - Re-triggering while a transition is in flight overwrites `time_start`
///   and `action`; there is no queueing.
#[derive(Clone, Copy, Debug)]
pub struct WipeUniforms {
    aspect: f32,
    action: f32,
    time_start: f32,
    duration: f32,
    time: f32,
}

impl WipeUniforms {
    /// Creates the record sized to the initial viewport, with no transition
    /// active.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            action: WipeDirection::Forward.as_uniform(),
            time_start: TIME_START_IDLE,
            duration: DURATION,
            time: 0.0,
        }
    }

    /// Per-frame update entry point. Must be called before compositing.
    pub fn advance_time(&mut self, now: f32) {
        self.time = now;
    }

    /// Starts (or restarts) a transition at `now`. Last trigger wins.
    pub fn begin_transition(&mut self, now: f32, direction: WipeDirection) {
        self.time_start = now;
        self.action = direction.as_uniform();
    }

    /// Updates the aspect ratio from a new viewport size. Touches nothing
    /// else in the record.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    /// Viewport width / height.
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Direction tag of the most recent trigger (0 or 1).
    pub fn action(&self) -> f32 {
        self.action
    }

    /// Clock time at which the current transition began.
    pub fn time_start(&self) -> f32 {
        self.time_start
    }

    /// Transition length in seconds.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Current clock time.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Linear transition progress: 0 at the trigger, 1 after `duration`
    /// seconds, clamped outside that window.
    pub fn progress(&self) -> f32 {
        ((self.time - self.time_start) / self.duration).clamp(0.0, 1.0)
    }

    /// Center of the blend band in normalized screen coordinates. Sweeps
    /// from `-WAVE_WIDTH / 2` (just off the left edge) to
    /// `1 + WAVE_WIDTH / 2` (just past the right edge).
    pub fn wave_position(&self) -> f32 {
        -WAVE_WIDTH * 0.5 + (1.0 + WAVE_WIDTH) * self.progress()
    }

    /// Blend factor at horizontal position `d` in [0, 1]: 0 shows the
    /// source scene, 1 the destination.
    ///
    /// The smoothstep edges are deliberately descending (`edge0 > edge1`).
    /// Behind the band (`d` below the trailing edge) the factor is 1, ahead
    /// of it 0, so the destination is revealed left to right. Swapping the
    /// edges would flip which scene is in front as the band passes.
    pub fn blend_factor(&self, d: f32) -> f32 {
        let half_wave = WAVE_WIDTH * 0.5;
        let wave_position = self.wave_position();
        smooth_hermite(wave_position + half_wave, wave_position - half_wave, d)
    }
}

/// Cubic smoothstep between two edges.
///
/// Mirrors the shader built-in: `t = clamp((x - edge0) / (edge1 - edge0))`,
/// then `t * t * (3 - 2t)`. Works with either edge ordering; the wipe
/// evaluates it with `edge0 > edge1`.
pub fn smooth_hermite(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_positions() -> impl Iterator<Item = f32> {
        (0..=100).map(|i| i as f32 / 100.0)
    }

    #[test]
    fn pure_source_before_trigger() {
        let mut u = WipeUniforms::new(800, 600);
        u.begin_transition(10.0, WipeDirection::Reverse);
        u.advance_time(9.0);

        for d in sample_positions() {
            assert_eq!(u.blend_factor(d), 0.0, "d = {d}");
        }
    }

    #[test]
    fn pure_destination_after_completion() {
        let mut u = WipeUniforms::new(800, 600);
        u.begin_transition(10.0, WipeDirection::Reverse);
        u.advance_time(10.0 + u.duration());

        for d in sample_positions() {
            assert_eq!(u.blend_factor(d), 1.0, "d = {d}");
        }

        // Well past the end it stays pinned.
        u.advance_time(100.0);
        assert_eq!(u.blend_factor(0.5), 1.0);
    }

    #[test]
    fn progress_midpoint_is_exact() {
        let mut u = WipeUniforms::new(800, 600);
        u.begin_transition(10.0, WipeDirection::Forward);
        u.advance_time(10.0 + DURATION / 2.0);
        assert_eq!(u.progress(), 0.5);
    }

    #[test]
    fn startup_sentinel_shows_destination() {
        let mut u = WipeUniforms::new(800, 600);
        u.advance_time(0.0);
        assert_eq!(u.progress(), 1.0);
        assert_eq!(u.blend_factor(0.0), 1.0);
        assert_eq!(u.blend_factor(1.0), 1.0);
    }

    #[test]
    fn retrigger_restarts_from_new_time() {
        let mut u = WipeUniforms::new(800, 600);
        u.begin_transition(10.0, WipeDirection::Reverse);
        u.advance_time(11.5);
        assert_eq!(u.progress(), 0.5);

        // A second trigger mid-flight resets the start; sampling with the
        // same clock value shows no progress for the new transition.
        u.begin_transition(11.5, WipeDirection::Forward);
        u.advance_time(11.5);
        assert_eq!(u.time_start(), 11.5);
        assert_eq!(u.action(), 0.0);
        assert_eq!(u.progress(), 0.0);
    }

    #[test]
    fn band_sweeps_left_to_right() {
        let mut u = WipeUniforms::new(800, 600);
        u.begin_transition(10.0, WipeDirection::Reverse);

        // At the trigger the band is centered at -WAVE_WIDTH / 2, entirely
        // off screen: every visible pixel is pure source.
        u.advance_time(10.0);
        assert_eq!(u.wave_position(), -WAVE_WIDTH * 0.5);
        for d in sample_positions() {
            assert_eq!(u.blend_factor(d), 0.0, "d = {d}");
        }

        // Halfway through the band is centered mid-frame: destination
        // behind it, source ahead of it, half-and-half at the center.
        u.advance_time(11.5);
        assert_eq!(u.wave_position(), 0.5);
        assert_eq!(u.blend_factor(0.5), 0.5);
        assert_eq!(u.blend_factor(0.2), 1.0);
        assert_eq!(u.blend_factor(0.8), 0.0);

        // Done: pure destination.
        u.advance_time(13.0);
        for d in sample_positions() {
            assert_eq!(u.blend_factor(d), 1.0, "d = {d}");
        }
    }

    #[test]
    fn descending_edges_put_destination_behind_the_band() {
        let mut u = WipeUniforms::new(800, 600);
        u.begin_transition(0.0, WipeDirection::Forward);
        u.advance_time(DURATION / 2.0);

        // Inside the band the factor falls as d rises: the left (already
        // swept) side shows destination, the right side still source.
        assert!(u.blend_factor(0.45) > u.blend_factor(0.55));
    }

    #[test]
    fn smooth_hermite_matches_shader_builtin() {
        // Ascending edges: the usual convention.
        assert_eq!(smooth_hermite(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smooth_hermite(0.0, 1.0, 0.5), 0.5);
        assert_eq!(smooth_hermite(0.0, 1.0, 2.0), 1.0);
        // Descending edges invert the ramp.
        assert_eq!(smooth_hermite(1.0, 0.0, 2.0), 0.0);
        assert_eq!(smooth_hermite(1.0, 0.0, -1.0), 1.0);
        assert_eq!(smooth_hermite(1.0, 0.0, 0.5), 0.5);
    }

    #[test]
    fn set_aspect_leaves_timing_untouched() {
        let mut u = WipeUniforms::new(800, 600);
        u.begin_transition(4.0, WipeDirection::Reverse);
        u.advance_time(5.0);

        u.set_aspect(1600, 900);

        assert_eq!(u.aspect(), 1600.0 / 900.0);
        assert_eq!(u.time(), 5.0);
        assert_eq!(u.time_start(), 4.0);
        assert_eq!(u.action(), 1.0);
        assert_eq!(u.duration(), DURATION);
    }
}
