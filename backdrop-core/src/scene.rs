/// Scene graph construction: star field, skill shapes and lights
use log::info;
use nalgebra::{Point3, Vector2, Vector3};
use rand::Rng;

use crate::config::{ParticleConfig, SceneConfig};
use crate::geometry::{ShapeKind, Wireframe};
use crate::theme::{Color, Theme};
use crate::transform::{Pose, RotationState};

/// Static star points scattered in a cube around the origin
#[derive(Debug, Clone)]
pub struct ParticleField {
    pub positions: Vec<Point3<f32>>,
    pub rotation: RotationState,
    pub size: f32,
    pub opacity: f32,
}

impl ParticleField {
    pub fn scatter<R: Rng + ?Sized>(config: &ParticleConfig, rng: &mut R) -> Self {
        let spread = config.spread;
        let mut coordinate = || (rng.gen::<f32>() - 0.5) * spread;
        let positions = (0..config.count)
            .map(|_| Point3::new(coordinate(), coordinate(), coordinate()))
            .collect();

        Self {
            positions,
            rotation: RotationState::zero(),
            size: config.size,
            opacity: config.opacity,
        }
    }
}

/// One wireframe solid inside the skill group
#[derive(Debug, Clone)]
pub struct SkillShape {
    pub kind: ShapeKind,
    pub pose: Pose,
    /// Radians added to rotation x / y every frame; fixed for life
    pub spin: Vector2<f32>,
}

/// The skill shapes, animated and drawn as a unit
#[derive(Debug, Clone)]
pub struct SkillGroup {
    pub shapes: Vec<SkillShape>,
    pub pose: Pose,
    /// Render eligibility; the group is parked whenever this is false
    pub visible: bool,
    pub opacity: f32,
}

impl SkillGroup {
    pub fn build<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Self {
        let skills = &config.skills;
        let mut centered = |extent: f32| (rng.gen::<f32>() - 0.5) * extent;

        let shapes = (0..skills.count)
            .map(|i| {
                let offset = Vector3::new(
                    centered(skills.spread[0]),
                    centered(skills.spread[1]),
                    centered(skills.spread[2]),
                );
                let spin = Vector2::new(centered(skills.max_spin), centered(skills.max_spin));
                SkillShape {
                    kind: ShapeKind::for_instance(i),
                    pose: Pose {
                        position: offset,
                        rotation: RotationState::zero(),
                    },
                    spin,
                }
            })
            .collect();

        Self {
            shapes,
            pose: Pose::at(0.0, 0.0, skills.parked_z),
            visible: false,
            opacity: skills.opacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Ambient,
    Point { position: Point3<f32> },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
}

/// Linear distance fog in the background color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

impl Fog {
    /// Fog blend factor for a view-space distance, 0 = clear, 1 = fully fogged
    pub fn factor(&self, distance: f32) -> f32 {
        if self.far <= self.near {
            return 0.0;
        }
        ((distance - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
    }
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Color,
    pub accent: Color,
    pub fog: Fog,
    pub particles: ParticleField,
    pub skills: SkillGroup,
    pub lights: Vec<Light>,
    geometries: Vec<Wireframe>,
}

impl Scene {
    /// Build the scene once from configuration; nothing here can fail
    pub fn build<R: Rng + ?Sized>(config: &SceneConfig, theme: &Theme, rng: &mut R) -> Self {
        let particles = ParticleField::scatter(&config.particles, rng);

        let skills = SkillGroup::build(config, rng);

        let lights = vec![
            Light {
                kind: LightKind::Ambient,
                color: Color::WHITE,
                intensity: 0.5,
            },
            Light {
                kind: LightKind::Point {
                    position: Point3::new(5.0, 5.0, 5.0),
                },
                color: theme.accent,
                intensity: 1.0,
            },
        ];

        info!(
            "built scene: {} particles, {} skill shapes",
            particles.positions.len(),
            skills.shapes.len()
        );

        Self {
            background: theme.background,
            accent: theme.accent,
            fog: Fog {
                color: theme.background,
                near: config.theme.fog_near,
                far: config.theme.fog_far,
            },
            particles,
            skills,
            lights,
            geometries: ShapeKind::ALL.iter().map(|kind| kind.wireframe()).collect(),
        }
    }

    /// Shared line geometry for a shape kind
    pub fn wireframe(&self, kind: ShapeKind) -> &Wireframe {
        &self.geometries[kind.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn build(seed: u64) -> Scene {
        let config = SceneConfig::default();
        let theme = config.theme().unwrap();
        Scene::build(&config, &theme, &mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_particles_fill_the_cube() {
        let scene = build(1);
        assert_eq!(scene.particles.positions.len(), 1000);
        for p in &scene.particles.positions {
            assert!(p.x >= -30.0 && p.x < 30.0);
            assert!(p.y >= -30.0 && p.y < 30.0);
            assert!(p.z >= -30.0 && p.z < 30.0);
        }
    }

    #[test]
    fn test_scatter_takes_particle_config() {
        let config = ParticleConfig {
            count: 12,
            spread: 2.0,
            size: 0.2,
            opacity: 0.8,
        };
        let field = ParticleField::scatter(&config, &mut StdRng::seed_from_u64(7));
        assert_eq!(field.positions.len(), 12);
        assert_eq!((field.size, field.opacity), (0.2, 0.8));
        assert!(field.positions.iter().all(|p| p.x.abs() <= 1.0 && p.z.abs() <= 1.0));
    }

    #[test]
    fn test_six_shapes_cycle_four_kinds() {
        let scene = build(2);
        let shapes = &scene.skills.shapes;
        assert_eq!(shapes.len(), 6);

        for (i, shape) in shapes.iter().enumerate() {
            assert_eq!(shape.kind, ShapeKind::ALL[i % 4]);
        }
        let distinct: HashSet<ShapeKind> = shapes.iter().map(|s| s.kind).collect();
        assert_eq!(distinct.len(), 4);
    }

    #[test]
    fn test_shape_offsets_and_spin_ranges() {
        let scene = build(3);
        for shape in &scene.skills.shapes {
            let p = shape.pose.position;
            assert!(p.x.abs() <= 5.0 && p.y.abs() <= 5.0 && p.z.abs() <= 2.5);
            assert!(shape.spin.x.abs() <= 0.01 && shape.spin.y.abs() <= 0.01);
        }
    }

    #[test]
    fn test_group_starts_parked_and_hidden() {
        let scene = build(4);
        assert!(!scene.skills.visible);
        assert_eq!(scene.skills.pose.position.z, -20.0);
        assert_eq!(scene.fog.color, scene.background);
    }

    #[test]
    fn test_point_light_uses_accent() {
        let scene = build(5);
        let point = scene
            .lights
            .iter()
            .find(|light| matches!(light.kind, LightKind::Point { .. }))
            .unwrap();
        assert_eq!(point.color, scene.accent);
    }

    #[test]
    fn test_fog_factor() {
        let fog = build(6).fog;
        assert_eq!(fog.factor(5.0), 0.0);
        assert!((fog.factor(30.0) - 0.5).abs() < 1e-6);
        assert_eq!(fog.factor(80.0), 1.0);
    }
}
