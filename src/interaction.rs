//! Click handlers for the three page toggles.

use tracing::debug;

use crate::app::App;
use crate::page::{
    Display, Page, BUTTON_ACTIVE_CLASS, BUTTON_IDLE_CLASS, SURGICAL_BODY_CLASS, SURGICAL_START_LABEL,
    SURGICAL_STOP_LABEL,
};
use crate::render::SceneRenderer;
use crate::tween::{Completion, Ease, Property, Track, Tween};

pub const FIBER_FADE_SECS: f32 = 0.5;
pub const OVERLAY_SLIDE_SECS: f32 = 0.3;
pub const OVERLAY_SLIDE_PX: f32 = 50.0;
pub const SURGICAL_KICK_RAD: f32 = 10.0;
pub const SURGICAL_KICK_SECS: f32 = 1.0;

impl<P: Page, R: SceneRenderer> App<P, R> {
    /// Shrinks the whole group away or grows it back. Geometry is kept.
    pub fn toggle_fibers(&mut self) {
        self.state.fibers_visible = !self.state.fibers_visible;
        let target = if self.state.fibers_visible { 1.0 } else { 0.0 };
        debug!(visible = self.state.fibers_visible, "fiber toggle");
        self.animator.start(
            Tween::new(FIBER_FADE_SECS, Ease::Power2InOut).track(Track::to(Property::GroupScale, target)),
        );
    }

    /// Slides the overlay panel out (then hides it) or shows it and slides it in.
    pub fn toggle_overlay(&mut self) {
        let Some(shown) = self.page.overlay_display() else {
            return;
        };
        debug!(?shown, "overlay toggle");
        match shown {
            Display::Shown => self.animator.start(
                Tween::new(OVERLAY_SLIDE_SECS, Ease::Power1Out)
                    .track(Track::to(Property::OverlayOpacity, 0.0))
                    .track(Track::to(Property::OverlayOffsetX, OVERLAY_SLIDE_PX))
                    .then(Completion::HideOverlay),
            ),
            Display::Hidden => {
                self.page.set_overlay_display(Display::Shown);
                self.page.set_overlay_opacity(0.0);
                self.page.set_overlay_offset(OVERLAY_SLIDE_PX);
                self.animator.start(
                    Tween::new(OVERLAY_SLIDE_SECS, Ease::Power1Out)
                        .track(Track::to(Property::OverlayOpacity, 1.0).from(0.0))
                        .track(Track::to(Property::OverlayOffsetX, 0.0).from(OVERLAY_SLIDE_PX)),
                );
            }
        }
    }

    /// Flips surgical mode. Turning it on also gives the group a one-shot
    /// spin on top of the faster continuous rotation; turning it off does
    /// not take that spin back.
    pub fn toggle_surgical(&mut self) {
        self.state.surgical = !self.state.surgical;
        debug!(surgical = self.state.surgical, "surgical toggle");
        if self.state.surgical {
            self.page.set_body_class(SURGICAL_BODY_CLASS, true);
            self.page
                .set_surgical_button(SURGICAL_STOP_LABEL, BUTTON_IDLE_CLASS, BUTTON_ACTIVE_CLASS);
            self.animator.start(
                Tween::new(SURGICAL_KICK_SECS, Ease::Power2In)
                    .track(Track::by(Property::GroupRotationY, SURGICAL_KICK_RAD)),
            );
        } else {
            self.page.set_body_class(SURGICAL_BODY_CLASS, false);
            self.page
                .set_surgical_button(SURGICAL_START_LABEL, BUTTON_ACTIVE_CLASS, BUTTON_IDLE_CLASS);
        }
    }
}
