//! Scene-pair bookkeeping and the per-frame composite ordering.
//!
//! The [`Compositor`] owns the [`WipeUniforms`] record and the assignment of
//! the two scenes to the off-screen target pair. It does not touch the GPU
//! itself; all rendering goes through the [`SceneRenderer`] capability
//! trait, so the ordering contract (source, then destination, then
//! composite) can be exercised in tests with a fake that records calls.

use crate::wipe::{WipeDirection, WipeUniforms};

/// Type-safe handle for one of the two populated scenes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneId(pub usize);

/// Which off-screen buffer of the pair a scene is rendered into.
///
/// Slot 0 holds the scene the wipe moves away from, slot 1 the scene it
/// reveals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetSlot {
    Source,
    Destination,
}

impl TargetSlot {
    /// Buffer index of this slot.
    pub fn index(self) -> usize {
        match self {
            TargetSlot::Source => 0,
            TargetSlot::Destination => 1,
        }
    }
}

/// Minimal rendering capability the compositor drives.
///
/// The production implementation records wgpu passes
/// ([`GpuSceneRenderer`](crate::wipe_pass::GpuSceneRenderer)); tests use a
/// fake that records the call sequence.
pub trait SceneRenderer {
    /// Renders one scene into the given off-screen slot.
    fn render_scene(&mut self, scene: SceneId, slot: TargetSlot);

    /// Blends both off-screen buffers onto the visible framebuffer
    /// according to the uniform record.
    fn composite(&mut self, uniforms: &WipeUniforms);

    /// Resizes both off-screen buffers to the given viewport.
    fn resize_targets(&mut self, width: u32, height: u32);
}

/// Owns the transition state and orders the work of a frame.
///
/// Per frame, after [`advance_time`](Compositor::advance_time), a call to
/// [`render_frame`](Compositor::render_frame) renders the source scene into
/// slot 0, the destination scene into slot 1, and composites both to the
/// screen. The three steps are strictly ordered and the renderer's target
/// binding is not restored in between, so callers must not assume any
/// particular binding after the call.
pub struct Compositor {
    uniforms: WipeUniforms,
    source: SceneId,
    destination: SceneId,
}

impl Compositor {
    /// Creates the compositor sized to the initial viewport.
    ///
    /// The pair starts as if a transition into scene 0 completed long ago:
    /// the idle sentinel clamps progress to 1, so the destination buffer —
    /// scene 0 — is what reaches the screen until the first trigger.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            uniforms: WipeUniforms::new(width, height),
            source: SceneId(1),
            destination: SceneId(0),
        }
    }

    /// Reassigns which scenes the target pair holds. Pure bookkeeping; the
    /// buffers themselves are untouched until the next
    /// [`render_frame`](Compositor::render_frame).
    pub fn set_scene_pair(&mut self, source: SceneId, destination: SceneId) {
        self.source = source;
        self.destination = destination;
    }

    /// The current (source, destination) assignment.
    pub fn scene_pair(&self) -> (SceneId, SceneId) {
        (self.source, self.destination)
    }

    /// Starts (or restarts) the wipe at `now`. Re-triggering mid-flight
    /// restarts from the new time; last trigger wins.
    pub fn begin_transition(&mut self, now: f32, direction: WipeDirection) {
        self.uniforms.begin_transition(now, direction);
    }

    /// Forwards the frame clock into the uniform record. Must be called
    /// before [`render_frame`](Compositor::render_frame) each frame.
    pub fn advance_time(&mut self, now: f32) {
        self.uniforms.advance_time(now);
    }

    /// Renders both scenes into their slots, then composites to the screen.
    pub fn render_frame(&self, renderer: &mut impl SceneRenderer) {
        renderer.render_scene(self.source, TargetSlot::Source);
        renderer.render_scene(self.destination, TargetSlot::Destination);
        renderer.composite(&self.uniforms);
    }

    /// Updates the aspect uniform and resizes both off-screen buffers.
    /// Idempotent; every other uniform is left untouched.
    pub fn resize(&mut self, renderer: &mut impl SceneRenderer, width: u32, height: u32) {
        self.uniforms.set_aspect(width, height);
        renderer.resize_targets(width, height);
    }

    /// Read access to the uniform record.
    pub fn uniforms(&self) -> &WipeUniforms {
        &self.uniforms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Op {
        Render(SceneId, TargetSlot),
        Composite { time: f32, time_start: f32 },
        Resize(u32, u32),
    }

    #[derive(Default)]
    struct RecordingRenderer {
        ops: Vec<Op>,
    }

    impl SceneRenderer for RecordingRenderer {
        fn render_scene(&mut self, scene: SceneId, slot: TargetSlot) {
            self.ops.push(Op::Render(scene, slot));
        }

        fn composite(&mut self, uniforms: &WipeUniforms) {
            self.ops.push(Op::Composite {
                time: uniforms.time(),
                time_start: uniforms.time_start(),
            });
        }

        fn resize_targets(&mut self, width: u32, height: u32) {
            self.ops.push(Op::Resize(width, height));
        }
    }

    #[test]
    fn frame_renders_source_then_destination_then_composites() {
        let compositor = Compositor::new(800, 600);
        let mut fake = RecordingRenderer::default();

        compositor.render_frame(&mut fake);

        assert_eq!(
            fake.ops,
            vec![
                Op::Render(SceneId(1), TargetSlot::Source),
                Op::Render(SceneId(0), TargetSlot::Destination),
                Op::Composite {
                    time: 0.0,
                    time_start: crate::wipe::TIME_START_IDLE,
                },
            ]
        );
    }

    #[test]
    fn set_scene_pair_reassigns_slots() {
        let mut compositor = Compositor::new(800, 600);
        let mut fake = RecordingRenderer::default();

        compositor.set_scene_pair(SceneId(0), SceneId(1));
        compositor.render_frame(&mut fake);

        assert_eq!(fake.ops[0], Op::Render(SceneId(0), TargetSlot::Source));
        assert_eq!(fake.ops[1], Op::Render(SceneId(1), TargetSlot::Destination));
    }

    #[test]
    fn composite_sees_uniform_updates_without_rebinding() {
        let mut compositor = Compositor::new(800, 600);
        let mut fake = RecordingRenderer::default();

        compositor.begin_transition(10.0, WipeDirection::Reverse);
        compositor.advance_time(11.5);
        compositor.render_frame(&mut fake);

        assert_eq!(
            fake.ops[2],
            Op::Composite {
                time: 11.5,
                time_start: 10.0,
            }
        );
    }

    #[test]
    fn resize_updates_aspect_and_targets_only() {
        let mut compositor = Compositor::new(800, 600);
        let mut fake = RecordingRenderer::default();

        compositor.begin_transition(4.0, WipeDirection::Reverse);
        compositor.advance_time(5.0);
        compositor.resize(&mut fake, 1600, 900);

        assert_eq!(fake.ops, vec![Op::Resize(1600, 900)]);
        let u = compositor.uniforms();
        assert_eq!(u.aspect(), 1600.0 / 900.0);
        assert_eq!(u.time(), 5.0);
        assert_eq!(u.time_start(), 4.0);
        assert_eq!(u.action(), 1.0);
        assert_eq!(u.duration(), crate::wipe::DURATION);
    }

    #[test]
    fn resize_is_idempotent() {
        let mut compositor = Compositor::new(800, 600);
        let mut fake = RecordingRenderer::default();

        compositor.resize(&mut fake, 1600, 900);
        compositor.resize(&mut fake, 1600, 900);

        assert_eq!(fake.ops, vec![Op::Resize(1600, 900), Op::Resize(1600, 900)]);
        assert_eq!(compositor.uniforms().aspect(), 1600.0 / 900.0);
    }
}
