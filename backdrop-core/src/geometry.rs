/// Wireframe primitives for the skill shapes
use nalgebra::Point3;

/// The primitive solids the skill group cycles through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Icosahedron,
    Octahedron,
    Tetrahedron,
    Cube,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Icosahedron,
        ShapeKind::Octahedron,
        ShapeKind::Tetrahedron,
        ShapeKind::Cube,
    ];

    /// Kind used by the `index`-th shape instance
    pub fn for_instance(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit-radius solids; the cube uses a 1.2 edge
    pub fn wireframe(self) -> Wireframe {
        match self {
            ShapeKind::Icosahedron => {
                let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
                Wireframe::from_hull(
                    &[
                        [-1.0, t, 0.0],
                        [1.0, t, 0.0],
                        [-1.0, -t, 0.0],
                        [1.0, -t, 0.0],
                        [0.0, -1.0, t],
                        [0.0, 1.0, t],
                        [0.0, -1.0, -t],
                        [0.0, 1.0, -t],
                        [t, 0.0, -1.0],
                        [t, 0.0, 1.0],
                        [-t, 0.0, -1.0],
                        [-t, 0.0, 1.0],
                    ],
                    Some(1.0),
                )
            }
            ShapeKind::Octahedron => Wireframe::from_hull(
                &[
                    [1.0, 0.0, 0.0],
                    [-1.0, 0.0, 0.0],
                    [0.0, 1.0, 0.0],
                    [0.0, -1.0, 0.0],
                    [0.0, 0.0, 1.0],
                    [0.0, 0.0, -1.0],
                ],
                Some(1.0),
            ),
            ShapeKind::Tetrahedron => Wireframe::from_hull(
                &[
                    [1.0, 1.0, 1.0],
                    [-1.0, -1.0, 1.0],
                    [-1.0, 1.0, -1.0],
                    [1.0, -1.0, -1.0],
                ],
                Some(1.0),
            ),
            ShapeKind::Cube => {
                let h = 0.6;
                let mut corners = Vec::with_capacity(8);
                for x in [-h, h] {
                    for y in [-h, h] {
                        for z in [-h, h] {
                            corners.push([x, y, z]);
                        }
                    }
                }
                Wireframe::from_hull(&corners, None)
            }
        }
    }
}

/// Line-segment geometry: vertices plus index pairs
#[derive(Debug, Clone)]
pub struct Wireframe {
    pub vertices: Vec<Point3<f32>>,
    pub edges: Vec<[u16; 2]>,
}

impl Wireframe {
    /// Build a regular solid from its corner points.
    ///
    /// Corners are optionally pushed out onto a sphere of `radius`; edges join
    /// every pair of corners at the minimal corner-to-corner distance, which
    /// holds for the platonic solids used here.
    fn from_hull(corners: &[[f32; 3]], radius: Option<f32>) -> Self {
        let vertices: Vec<Point3<f32>> = corners
            .iter()
            .map(|&[x, y, z]| {
                let p = Point3::new(x, y, z);
                match radius {
                    Some(r) => Point3::from(p.coords.normalize() * r),
                    None => p,
                }
            })
            .collect();

        let mut shortest = f32::INFINITY;
        for (i, a) in vertices.iter().enumerate() {
            for b in &vertices[i + 1..] {
                shortest = shortest.min((a - b).norm());
            }
        }

        let mut edges = Vec::new();
        for (i, a) in vertices.iter().enumerate() {
            for (j, b) in vertices.iter().enumerate().skip(i + 1) {
                if ((a - b).norm() - shortest).abs() < 1e-4 {
                    edges.push([i as u16, j as u16]);
                }
            }
        }

        Self { vertices, edges }
    }

    /// Endpoints of every edge
    pub fn segments(&self) -> impl Iterator<Item = (Point3<f32>, Point3<f32>)> + '_ {
        self.edges
            .iter()
            .map(|&[a, b]| (self.vertices[a as usize], self.vertices[b as usize]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_counts() {
        let counts: Vec<(usize, usize)> = ShapeKind::ALL
            .iter()
            .map(|kind| {
                let wire = kind.wireframe();
                (wire.vertices.len(), wire.edges.len())
            })
            .collect();
        assert_eq!(counts, vec![(12, 30), (6, 12), (4, 6), (8, 12)]);
    }

    #[test]
    fn test_solids_have_unit_radius() {
        for kind in [ShapeKind::Icosahedron, ShapeKind::Octahedron, ShapeKind::Tetrahedron] {
            for vertex in kind.wireframe().vertices {
                assert!((vertex.coords.norm() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_cube_edge_length() {
        let cube = ShapeKind::Cube.wireframe();
        for (a, b) in cube.segments() {
            assert!(((a - b).norm() - 1.2).abs() < 1e-5);
        }
    }

    #[test]
    fn test_instances_cycle_kinds() {
        let kinds: Vec<ShapeKind> = (0..6).map(ShapeKind::for_instance).collect();
        assert_eq!(kinds[0], ShapeKind::Icosahedron);
        assert_eq!(kinds[4], ShapeKind::Icosahedron);
        assert_eq!(kinds[5], ShapeKind::Octahedron);
    }
}
