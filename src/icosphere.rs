//! Subdivided icosahedron used as the translucent core.

use std::collections::{BTreeSet, HashMap};

use glam::Vec3;

use crate::geometry::Color;

pub const CORE_RADIUS: f32 = 2.5;
pub const CORE_DETAIL: u32 = 4;
pub const CORE_OPACITY: f32 = 0.1;
pub const CORE_COLOR: u32 = 0x222222;

#[rustfmt::skip]
const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
    [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
    [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
    [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
];

fn icosahedron_vertices() -> [Vec3; 12] {
    let t = (1.0 + 5f32.sqrt()) / 2.0;
    [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
}

/// Wireframe sphere: shared vertices plus the unique edge list.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreShape {
    pub radius: f32,
    pub positions: Vec<Vec3>,
    pub edges: Vec<[u32; 2]>,
    pub color: Color,
    pub opacity: f32,
}

impl CoreShape {
    pub fn new() -> Self {
        Self::icosphere(CORE_RADIUS, CORE_DETAIL)
    }

    /// Splits every icosahedron face into `(detail + 1)^2` triangles and
    /// pushes the new vertices out to the sphere.
    pub fn icosphere(radius: f32, detail: u32) -> Self {
        let base = icosahedron_vertices();
        let n = detail as usize + 1;

        let mut welder = Welder::default();
        let mut edges = BTreeSet::new();

        for face in ICOSAHEDRON_FACES {
            let [a, b, c] = face.map(|i| base[i]);
            // grid[i][j] = a + (b - a) * i/n + (c - a) * j/n, for i + j <= n
            let mut grid = vec![Vec::new(); n + 1];
            for (i, row) in grid.iter_mut().enumerate() {
                for j in 0..=(n - i) {
                    let key = WeldKey::new([(face[0], n - i - j), (face[1], i), (face[2], j)]);
                    let p = a + (b - a) * (i as f32 / n as f32) + (c - a) * (j as f32 / n as f32);
                    row.push(welder.index_of(key, p.normalize() * radius));
                }
            }

            for i in 0..n {
                for j in 0..(n - i) {
                    let tri = [grid[i][j], grid[i + 1][j], grid[i][j + 1]];
                    add_triangle(&mut edges, tri);
                    if i + j + 1 < n {
                        let tri = [grid[i + 1][j], grid[i + 1][j + 1], grid[i][j + 1]];
                        add_triangle(&mut edges, tri);
                    }
                }
            }
        }

        Self {
            radius,
            positions: welder.positions,
            edges: edges.into_iter().collect(),
            color: Color::from_hex(CORE_COLOR),
            opacity: CORE_OPACITY,
        }
    }

    /// Outward normals; on a sphere these are the normalized positions.
    pub fn normals(&self) -> Vec<Vec3> {
        self.positions.iter().map(|p| p.normalize()).collect()
    }
}

impl Default for CoreShape {
    fn default() -> Self {
        Self::new()
    }
}

fn add_triangle(edges: &mut BTreeSet<[u32; 2]>, [a, b, c]: [u32; 3]) {
    for (u, v) in [(a, b), (b, c), (c, a)] {
        edges.insert([u.min(v), u.max(v)]);
    }
}

/// A grid point named by its integer weights over the base vertices, so the
/// same point reached from two neighbouring faces gets the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct WeldKey(Vec<(usize, usize)>);

impl WeldKey {
    fn new(weights: [(usize, usize); 3]) -> Self {
        let mut weights: Vec<_> = weights.into_iter().filter(|&(_, w)| w > 0).collect();
        weights.sort_unstable();
        Self(weights)
    }
}

#[derive(Default)]
struct Welder {
    positions: Vec<Vec3>,
    lookup: HashMap<WeldKey, u32>,
}

impl Welder {
    fn index_of(&mut self, key: WeldKey, p: Vec3) -> u32 {
        *self.lookup.entry(key).or_insert_with(|| {
            self.positions.push(p);
            (self.positions.len() - 1) as u32
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_four_counts() {
        let core = CoreShape::new();
        // 10n^2 + 2 vertices and 30n^2 edges for n = detail + 1.
        assert_eq!(core.positions.len(), 252);
        assert_eq!(core.edges.len(), 750);
    }

    #[test]
    fn detail_zero_is_the_plain_icosahedron() {
        let core = CoreShape::icosphere(1.0, 0);
        assert_eq!(core.positions.len(), 12);
        assert_eq!(core.edges.len(), 30);
    }

    #[test]
    fn vertices_sit_on_the_sphere() {
        let core = CoreShape::new();
        for p in &core.positions {
            assert!((p.length() - CORE_RADIUS).abs() < 1e-5);
        }
        assert!(core.edges.iter().all(|[a, b]| a < b));
    }

    #[test]
    fn core_material() {
        let core = CoreShape::new();
        assert_eq!(core.opacity, 0.1);
        assert_eq!(core.color, Color::from_hex(0x222222));
    }
}
