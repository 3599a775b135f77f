//! Small property tween engine driven from the frame loop.
//!
//! Start values are captured on a tween's first tick. Starting a tween on a
//! property another tween is already driving takes that property away from
//! the older tween. Additive tweens never conflict and simply stack.

use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    /// Quadratic ease-out, the default for page element tweens.
    Power1Out,
    /// Cubic ease-in.
    Power2In,
    /// Cubic ease-in-out.
    Power2InOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Power2In => t * t * t,
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    /// Uniform scale of the scene group.
    GroupScale,
    GroupRotationY,
    OverlayOpacity,
    /// Horizontal offset of the overlay panel, in CSS pixels.
    OverlayOffsetX,
}

/// Where a property tween is headed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Goal {
    /// Interpolate from the captured start value to this value.
    To(f32),
    /// Add this much over the tween's run, on top of whatever else moves the
    /// property meanwhile.
    By(f32),
}

/// Deferred side effect that runs once the last value has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    HideOverlay,
}

pub trait Animatable {
    fn get(&self, property: Property) -> f32;
    fn set(&mut self, property: Property, value: f32);
    fn complete(&mut self, completion: Completion);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub property: Property,
    pub from: Option<f32>,
    pub goal: Goal,
    applied: f32,
}

impl Track {
    pub fn to(property: Property, value: f32) -> Self {
        Self {
            property,
            from: None,
            goal: Goal::To(value),
            applied: 0.0,
        }
    }

    pub fn by(property: Property, delta: f32) -> Self {
        Self {
            property,
            from: None,
            goal: Goal::By(delta),
            applied: 0.0,
        }
    }

    /// Pins the start value instead of reading it on the first tick.
    pub fn from(mut self, value: f32) -> Self {
        self.from = Some(value);
        self
    }

    fn advance(&mut self, target: &mut dyn Animatable, eased: f32) {
        match self.goal {
            Goal::To(end) => {
                let start = *self.from.get_or_insert_with(|| target.get(self.property));
                target.set(self.property, start + (end - start) * eased);
            }
            Goal::By(delta) => {
                let wanted = delta * eased;
                let current = target.get(self.property);
                target.set(self.property, current + (wanted - self.applied));
                self.applied = wanted;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub tracks: Vec<Track>,
    pub duration: f32,
    pub ease: Ease,
    pub on_complete: Option<Completion>,
    elapsed: f32,
}

impl Tween {
    pub fn new(duration: f32, ease: Ease) -> Self {
        Self {
            tracks: Vec::new(),
            duration,
            ease,
            on_complete: None,
            elapsed: 0.0,
        }
    }

    pub fn track(mut self, track: Track) -> Self {
        self.tracks.push(track);
        self
    }

    pub fn then(mut self, completion: Completion) -> Self {
        self.on_complete = Some(completion);
        self
    }

    pub fn progress(&self) -> f32 {
        // Summed frame deltas drift below the duration; snap the last step.
        if self.elapsed + 1e-5 >= self.duration {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }

    /// Returns true once the tween has reached its end.
    fn tick(&mut self, dt: f32, target: &mut dyn Animatable) -> bool {
        self.elapsed += dt;
        let eased = self.ease.apply(self.progress());
        for track in &mut self.tracks {
            track.advance(target, eased);
        }
        self.progress() >= 1.0
    }
}

#[derive(Debug, Default)]
pub struct Animator {
    tweens: Vec<Tween>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `tween`; it first moves on the next [`Animator::tick`].
    pub fn start(&mut self, tween: Tween) {
        for track in &tween.tracks {
            if matches!(track.goal, Goal::To(_)) {
                self.release(track.property);
            }
        }
        trace!(tracks = tween.tracks.len(), duration = tween.duration, "tween started");
        self.tweens.push(tween);
    }

    /// Stops every absolute track driving `property`. A tween left with no
    /// tracks is dropped without running its completion.
    fn release(&mut self, property: Property) {
        for tween in &mut self.tweens {
            tween
                .tracks
                .retain(|t| !(t.property == property && matches!(t.goal, Goal::To(_))));
        }
        self.tweens.retain(|tween| !tween.tracks.is_empty());
    }

    /// Advances every tween by `dt` seconds, retiring the finished ones.
    pub fn tick(&mut self, dt: f32, target: &mut dyn Animatable) {
        let mut finished = Vec::new();
        self.tweens.retain_mut(|tween| {
            if tween.tick(dt, target) {
                finished.extend(tween.on_complete);
                false
            } else {
                true
            }
        });
        for completion in finished {
            target.complete(completion);
        }
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Values {
        values: HashMap<&'static str, f32>,
        completions: Vec<Completion>,
    }

    fn key(p: Property) -> &'static str {
        match p {
            Property::GroupScale => "scale",
            Property::GroupRotationY => "rot",
            Property::OverlayOpacity => "opacity",
            Property::OverlayOffsetX => "x",
        }
    }

    impl Animatable for Values {
        fn get(&self, p: Property) -> f32 {
            self.values.get(key(p)).copied().unwrap_or(0.0)
        }
        fn set(&mut self, p: Property, v: f32) {
            self.values.insert(key(p), v);
        }
        fn complete(&mut self, c: Completion) {
            self.completions.push(c);
        }
    }

    #[test]
    fn eases_hit_their_endpoints() {
        for ease in [Ease::Linear, Ease::Power1Out, Ease::Power2In, Ease::Power2InOut] {
            assert_eq!(ease.apply(0.0), 0.0, "{ease:?}");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-6, "{ease:?}");
        }
        assert!((Ease::Power2InOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!(Ease::Power2In.apply(0.5) < 0.5);
        assert!(Ease::Power1Out.apply(0.5) > 0.5);
    }

    #[test]
    fn absolute_tween_lands_on_goal_and_completes() {
        let mut values = Values::default();
        values.set(Property::OverlayOpacity, 1.0);
        let mut animator = Animator::new();
        animator.start(
            Tween::new(0.3, Ease::Power1Out)
                .track(Track::to(Property::OverlayOpacity, 0.0))
                .then(Completion::HideOverlay),
        );

        animator.tick(0.1, &mut values);
        let mid = values.get(Property::OverlayOpacity);
        assert!(mid > 0.0 && mid < 1.0);
        assert!(values.completions.is_empty());

        animator.tick(0.25, &mut values);
        assert_eq!(values.get(Property::OverlayOpacity), 0.0);
        assert_eq!(values.completions, vec![Completion::HideOverlay]);
        assert!(animator.is_idle());
    }

    #[test]
    fn newer_tween_takes_over_the_property() {
        let mut values = Values::default();
        let mut animator = Animator::new();
        animator.start(Tween::new(0.5, Ease::Linear).track(Track::to(Property::GroupScale, 0.0)));
        animator.start(Tween::new(0.5, Ease::Linear).track(Track::to(Property::GroupScale, 1.0)));
        assert_eq!(animator.tweens().len(), 1);

        animator.tick(1.0, &mut values);
        assert_eq!(values.get(Property::GroupScale), 1.0);
    }

    #[test]
    fn additive_tweens_stack_with_outside_changes() {
        let mut values = Values::default();
        let mut animator = Animator::new();
        animator.start(Tween::new(1.0, Ease::Power2In).track(Track::by(Property::GroupRotationY, 10.0)));
        animator.start(Tween::new(1.0, Ease::Power2In).track(Track::by(Property::GroupRotationY, 10.0)));

        for _ in 0..10 {
            animator.tick(0.1, &mut values);
            // something else spinning the same axis
            let r = values.get(Property::GroupRotationY);
            values.set(Property::GroupRotationY, r + 0.5);
        }
        assert!(animator.is_idle());
        assert!((values.get(Property::GroupRotationY) - 25.0).abs() < 1e-3);
    }

    #[test]
    fn pinned_start_value_wins_over_current() {
        let mut values = Values::default();
        values.set(Property::OverlayOffsetX, 7.0);
        let mut animator = Animator::new();
        animator.start(
            Tween::new(0.3, Ease::Linear).track(Track::to(Property::OverlayOffsetX, 0.0).from(50.0)),
        );
        animator.tick(0.15, &mut values);
        assert!((values.get(Property::OverlayOffsetX) - 25.0).abs() < 1e-4);
    }
}
