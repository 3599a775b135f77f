use rand::Rng;
use tracing::debug;

use crate::error::VizError;
use crate::frame::{rotation_speed, CancelToken, RunLoop, TILT_RATIO};
use crate::page::{Display, Page};
use crate::render::SceneRenderer;
use crate::scene::{Group, Scene};
use crate::tween::{Animatable, Animator, Completion, Property};

/// Toggle flags. Overlay visibility is deliberately absent: it is read back
/// from the page each time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppState {
    pub fibers_visible: bool,
    pub surgical: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            fibers_visible: true,
            surgical: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Rendered,
    Stopped,
}

/// Everything the visualization owns for the lifetime of the page.
pub struct App<P, R> {
    pub scene: Scene,
    pub state: AppState,
    pub animator: Animator,
    pub page: P,
    pub renderer: R,
    run_loop: RunLoop,
}

impl<P: Page, R: SceneRenderer> App<P, R> {
    pub fn new<G: Rng + ?Sized>(page: P, renderer: R, rng: &mut G, token: CancelToken) -> Self {
        let (width, height) = renderer.size();
        let scene = Scene::compose(aspect_ratio(width, height), rng);
        Self {
            scene,
            state: AppState::default(),
            animator: Animator::new(),
            page,
            renderer,
            run_loop: RunLoop::new(token),
        }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.run_loop.token()
    }

    pub fn frames(&self) -> u64 {
        self.run_loop.frames()
    }

    /// One display refresh: advance tweens, spin the group, draw once.
    pub fn frame(&mut self, timestamp_ms: f64) -> Result<FrameOutcome, VizError> {
        let Some(dt) = self.run_loop.begin_frame(timestamp_ms) else {
            return Ok(FrameOutcome::Stopped);
        };

        let Self {
            scene,
            animator,
            page,
            ..
        } = self;
        animator.tick(
            dt,
            &mut Targets {
                group: &mut scene.group,
                page,
            },
        );

        let speed = rotation_speed(self.state.surgical);
        self.scene.group.rotation.y += speed;
        self.scene.group.rotation.x += speed * TILT_RATIO;

        self.renderer.render(&self.scene)?;
        Ok(FrameOutcome::Rendered)
    }

    /// Runs `count` frames spaced `frame_ms` apart after the last one seen.
    /// Returns how many actually rendered before a cancellation.
    pub fn step(&mut self, count: u32, start_ms: f64, frame_ms: f64) -> Result<u32, VizError> {
        let mut rendered = 0;
        for i in 0..count {
            match self.frame(start_ms + f64::from(i) * frame_ms)? {
                FrameOutcome::Rendered => rendered += 1,
                FrameOutcome::Stopped => break,
            }
        }
        Ok(rendered)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        debug!(width, height, "viewport resized");
        self.scene.camera.set_aspect(aspect_ratio(width, height));
        self.renderer.set_size(width, height);
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

/// Routes tween writes to the scene group or the page.
struct Targets<'a, P> {
    group: &'a mut Group,
    page: &'a mut P,
}

impl<P: Page> Animatable for Targets<'_, P> {
    fn get(&self, property: Property) -> f32 {
        match property {
            Property::GroupScale => self.group.scale,
            Property::GroupRotationY => self.group.rotation.y,
            Property::OverlayOpacity => self.page.overlay_opacity(),
            Property::OverlayOffsetX => self.page.overlay_offset(),
        }
    }

    fn set(&mut self, property: Property, value: f32) {
        match property {
            Property::GroupScale => self.group.scale = value,
            Property::GroupRotationY => self.group.rotation.y = value,
            Property::OverlayOpacity => self.page.set_overlay_opacity(value),
            Property::OverlayOffsetX => self.page.set_overlay_offset(value),
        }
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::HideOverlay => self.page.set_overlay_display(Display::Hidden),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::MemoryPage;
    use crate::render::HeadlessRenderer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn app() -> App<MemoryPage, HeadlessRenderer> {
        App::new(
            MemoryPage::default(),
            HeadlessRenderer::new(800, 600),
            &mut StdRng::seed_from_u64(5),
            CancelToken::new(),
        )
    }

    #[test]
    fn startup_aspect_comes_from_renderer() {
        let app = app();
        assert_eq!(app.scene.camera.aspect, 800.0 / 600.0);
        assert_eq!(app.state, AppState::default());
    }

    #[test]
    fn each_frame_renders_once() {
        let mut app = app();
        assert_eq!(app.step(3, 0.0, 16.0).unwrap(), 3);
        assert_eq!(app.renderer.frames, 3);
        assert_eq!(app.renderer.last_rotation, Some(app.scene.group.rotation));
    }

    #[test]
    fn zero_height_keeps_a_finite_aspect() {
        let mut app = app();
        app.resize(640, 0);
        assert_eq!(app.scene.camera.aspect, 1.0);
        assert_eq!(app.renderer.size(), (640, 0));
    }

    #[test]
    fn cancel_token_handle_stops_the_loop() {
        let mut app = app();
        let token = app.cancel_token();
        assert_eq!(app.step(2, 0.0, 16.0).unwrap(), 2);
        token.cancel();
        assert_eq!(app.frame(48.0).unwrap(), FrameOutcome::Stopped);
        assert_eq!(app.renderer.frames, 2);
    }
}
