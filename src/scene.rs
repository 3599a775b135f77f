use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;
use tracing::info;

use crate::geometry::{generate_fibers, Color, Fiber};
use crate::icosphere::CoreShape;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov_y_deg,
            aspect,
            near,
            far,
            position: Vec3::new(0.0, 0.0, 8.0),
            target: Vec3::ZERO,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection();
    }

    pub fn update_projection(&mut self) {
        self.projection =
            Mat4::perspective_rh_gl(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient { color: Color, intensity: f32 },
    Point { color: Color, intensity: f32, position: Vec3 },
}

pub fn default_lights() -> Vec<Light> {
    vec![
        Light::Ambient {
            color: Color::from_hex(0xffffff),
            intensity: 0.5,
        },
        Light::Point {
            color: Color::from_hex(0x00f2ff),
            intensity: 2.0,
            position: Vec3::new(10.0, 10.0, 10.0),
        },
        Light::Point {
            color: Color::from_hex(0x0055ff),
            intensity: 1.0,
            position: Vec3::new(-10.0, -10.0, -10.0),
        },
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Fiber(Fiber),
    Core(CoreShape),
}

/// Root node the frame loop spins and the fiber toggle scales.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    pub scale: f32,
    pub children: Vec<Primitive>,
}

impl Default for Group {
    fn default() -> Self {
        Self {
            rotation: Vec3::ZERO,
            scale: 1.0,
            children: Vec::new(),
        }
    }
}

impl Group {
    /// Drops whatever was generated before and builds a fresh set of fibers
    /// around a new core.
    pub fn populate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.children.clear();
        self.children
            .extend(generate_fibers(rng).into_iter().map(Primitive::Fiber));
        self.children.push(Primitive::Core(CoreShape::new()));
    }

    pub fn fibers(&self) -> impl Iterator<Item = &Fiber> {
        self.children.iter().filter_map(|child| match child {
            Primitive::Fiber(fiber) => Some(fiber),
            Primitive::Core(_) => None,
        })
    }

    pub fn cores(&self) -> impl Iterator<Item = &CoreShape> {
        self.children.iter().filter_map(|child| match child {
            Primitive::Core(core) => Some(core),
            Primitive::Fiber(_) => None,
        })
    }

    pub fn model_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), rotation, Vec3::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub camera: PerspectiveCamera,
    pub lights: Vec<Light>,
    pub group: Group,
}

impl Scene {
    /// Camera, lights and a freshly generated group, assembled once at startup.
    pub fn compose<R: Rng + ?Sized>(aspect: f32, rng: &mut R) -> Self {
        let mut group = Group::default();
        group.populate(rng);
        info!(
            fibers = group.fibers().count(),
            cores = group.cores().count(),
            "scene composed"
        );
        Self {
            camera: PerspectiveCamera::new(75.0, aspect, 0.1, 1000.0),
            lights: default_lights(),
            group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn composed_scene_holds_fibers_and_one_core() {
        let scene = Scene::compose(16.0 / 9.0, &mut StdRng::seed_from_u64(1));
        assert_eq!(scene.group.children.len(), 201);
        assert_eq!(scene.group.fibers().count(), 200);
        assert_eq!(scene.group.cores().count(), 1);
        assert_eq!(scene.lights.len(), 3);
    }

    #[test]
    fn repopulating_replaces_content() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut group = Group::default();
        group.populate(&mut rng);
        let first = group.children.clone();
        group.populate(&mut rng);
        assert_eq!(group.children.len(), 201);
        assert_ne!(group.children, first);
    }

    #[test]
    fn zero_scale_collapses_the_group() {
        let group = Group {
            scale: 0.0,
            ..Group::default()
        };
        let p = group.model_matrix().transform_point3(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Vec3::ZERO);
    }

    #[test]
    fn camera_sits_on_positive_z_looking_in() {
        let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0);
        let eye_space = camera.view().transform_point3(Vec3::ZERO);
        assert!((eye_space.z + 8.0).abs() < 1e-5);
    }
}
