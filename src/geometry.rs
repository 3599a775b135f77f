//! Procedural fiber curves.
//!
//! Each fiber is a quadratic Bezier from a point on a loose shell around the
//! vertical axis to a point near the origin, bent through a jittered midpoint.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

pub const FIBER_COUNT: usize = 200;
/// Segments per fiber; the polyline has one more point than this.
pub const FIBER_SEGMENTS: usize = 20;
pub const FIBER_OPACITY: f32 = 0.4;

const SHELL_RADIUS: f32 = 3.0;
const SHELL_HALF_HEIGHT: f32 = 2.5;
const END_HALF_WIDTH: f32 = 1.0;
const MID_JITTER: f32 = 1.5;

pub const PALETTE: [u32; 4] = [0x00f2ff, 0x0055ff, 0x00ff88, 0xff00ff];

/// sRGB components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier {
    pub start: Vec3,
    pub control: Vec3,
    pub end: Vec3,
}

impl QuadraticBezier {
    pub fn point_at(&self, t: f32) -> Vec3 {
        let u = 1.0 - t;
        self.start * (u * u) + self.control * (2.0 * u * t) + self.end * (t * t)
    }

    /// `segments + 1` evenly spaced samples, both endpoints included.
    pub fn sample(&self, segments: usize) -> Vec<Vec3> {
        (0..=segments)
            .map(|i| self.point_at(i as f32 / segments as f32))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fiber {
    pub curve: QuadraticBezier,
    pub points: Vec<Vec3>,
    pub color: Color,
    pub opacity: f32,
}

impl Fiber {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let angle = rng.gen_range(0.0..TAU);
        let height = rng.gen_range(-SHELL_HALF_HEIGHT..=SHELL_HALF_HEIGHT);

        // x and z get their own radial stretch, so the shell is a loose band
        // rather than a cylinder.
        let start = Vec3::new(
            angle.cos() * SHELL_RADIUS * rng.gen_range(0.5..=1.5),
            height,
            angle.sin() * SHELL_RADIUS * rng.gen_range(0.5..=1.5),
        );
        let end = Vec3::new(
            rng.gen_range(-END_HALF_WIDTH..=END_HALF_WIDTH),
            rng.gen_range(-END_HALF_WIDTH..=END_HALF_WIDTH),
            rng.gen_range(-END_HALF_WIDTH..=END_HALF_WIDTH),
        );
        let control = start.lerp(end, 0.5)
            + Vec3::new(
                rng.gen_range(-MID_JITTER..=MID_JITTER),
                rng.gen_range(-MID_JITTER..=MID_JITTER),
                rng.gen_range(-MID_JITTER..=MID_JITTER),
            );

        let curve = QuadraticBezier {
            start,
            control,
            end,
        };
        Self {
            points: curve.sample(FIBER_SEGMENTS),
            curve,
            color: Color::from_hex(PALETTE[rng.gen_range(0..PALETTE.len())]),
            opacity: FIBER_OPACITY,
        }
    }
}

pub fn generate_fibers<R: Rng + ?Sized>(rng: &mut R) -> Vec<Fiber> {
    (0..FIBER_COUNT).map(|_| Fiber::random(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn fibers_stay_inside_their_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let fibers = generate_fibers(&mut rng);
        assert_eq!(fibers.len(), FIBER_COUNT);

        for fiber in &fibers {
            assert_eq!(fiber.points.len(), FIBER_SEGMENTS + 1);
            assert!(PALETTE.iter().any(|&hex| Color::from_hex(hex) == fiber.color));
            assert_eq!(fiber.opacity, FIBER_OPACITY);

            let start = fiber.curve.start;
            let planar = (start.x * start.x + start.z * start.z).sqrt();
            assert!((1.5 - 1e-4..=4.5 + 1e-4).contains(&planar), "planar={planar}");
            assert!(start.y.abs() <= 2.5);

            let end = fiber.curve.end;
            assert!(end.abs().max_element() <= 1.0);
        }
    }

    #[test]
    fn polyline_runs_from_start_to_end() {
        let mut rng = StdRng::seed_from_u64(3);
        let fiber = Fiber::random(&mut rng);
        assert_eq!(fiber.points[0], fiber.curve.start);
        assert!(fiber.points[FIBER_SEGMENTS].abs_diff_eq(fiber.curve.end, 1e-6));
    }

    #[test]
    fn bezier_midpoint_is_pulled_toward_control() {
        let curve = QuadraticBezier {
            start: Vec3::ZERO,
            control: Vec3::new(0.0, 2.0, 0.0),
            end: Vec3::new(2.0, 0.0, 0.0),
        };
        assert_eq!(curve.point_at(0.5), Vec3::new(0.5, 1.0, 0.0));
    }

    #[test]
    fn same_seed_same_fibers() {
        let a = generate_fibers(&mut StdRng::seed_from_u64(11));
        let b = generate_fibers(&mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[test]
    fn palette_decodes_hex() {
        assert_eq!(Color::from_hex(0xff00ff).to_array(), [1.0, 0.0, 1.0]);
    }
}
