/// Per-frame motion: star drift, group spin and pointer parallax
use log::trace;

use crate::config::MotionConfig;
use crate::pointer::PointerState;
use crate::scene::Scene;
use crate::transform::RotationState;

/// Star-field rotation for a moment in time.
///
/// Yaw drifts with elapsed time and is nudged by the pointer; pitch follows
/// the pointer alone.
pub fn particle_rotation(elapsed: f64, pointer: PointerState, motion: &MotionConfig) -> RotationState {
    RotationState::new(
        pointer.y * motion.particle_parallax,
        elapsed as f32 * motion.drift_rate + pointer.x * motion.particle_parallax,
        0.0,
    )
}

/// Apply one frame of motion to the scene.
///
/// Group and shape increments are per call rather than per second, so their
/// speed follows the display refresh rate.
pub fn advance_scene(scene: &mut Scene, elapsed: f64, pointer: PointerState, motion: &MotionConfig) {
    scene.particles.rotation = particle_rotation(elapsed, pointer, motion);

    let group = &mut scene.skills;
    if !group.visible {
        return;
    }

    group.pose.rotation.y += motion.group_spin_per_frame;
    for shape in &mut group.shapes {
        shape.pose.rotation.rotate(shape.spin.x, shape.spin.y, 0.0);
    }
    group.pose.rotation.x = pointer.y * motion.group_parallax;
    group.pose.rotation.z = pointer.x * motion.group_parallax;

    trace!("group rotation {:?}", group.pose.rotation);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scene() -> Scene {
        let config = SceneConfig::default();
        let theme = config.theme().unwrap();
        Scene::build(&config, &theme, &mut StdRng::seed_from_u64(11))
    }

    #[test]
    fn test_pointer_offset_is_linear_and_bounded() {
        let motion = MotionConfig::default();
        let still = particle_rotation(3.0, PointerState::default(), &motion);

        let steps = [-0.5, -0.25, 0.0, 0.25, 0.5];
        for &px in &steps {
            for &py in &steps {
                let moved = particle_rotation(3.0, PointerState::new(px, py), &motion);
                let dx = moved.x - still.x;
                let dy = moved.y - still.y;
                assert!((dx - py * 0.1).abs() < 1e-6);
                assert!((dy - px * 0.1).abs() < 1e-6);
                assert!(dx.abs() <= 0.05 + 1e-6 && dy.abs() <= 0.05 + 1e-6);
            }
        }
    }

    #[test]
    fn test_star_drift_follows_time() {
        let motion = MotionConfig::default();
        let rotation = particle_rotation(10.0, PointerState::default(), &motion);
        assert!((rotation.y - 0.5).abs() < 1e-6);
        assert_eq!(rotation.x, 0.0);
    }

    #[test]
    fn test_hidden_group_is_untouched() {
        let mut scene = scene();
        let before = scene.skills.clone();
        advance_scene(&mut scene, 1.0, PointerState::new(0.3, -0.2), &MotionConfig::default());

        assert_eq!(scene.skills.pose, before.pose);
        for (after, before) in scene.skills.shapes.iter().zip(&before.shapes) {
            assert_eq!(after.pose, before.pose);
        }
    }

    #[test]
    fn test_visible_group_spins_and_tilts() {
        let mut scene = scene();
        scene.skills.visible = true;
        let motion = MotionConfig::default();
        let pointer = PointerState::new(0.4, -0.2);

        for _ in 0..10 {
            advance_scene(&mut scene, 1.0, pointer, &motion);
        }

        let rotation = scene.skills.pose.rotation;
        assert!((rotation.y - 0.05).abs() < 1e-5);
        // Tilt is set, not accumulated
        assert!((rotation.x + 0.1).abs() < 1e-6);
        assert!((rotation.z - 0.2).abs() < 1e-6);

        for shape in &scene.skills.shapes {
            assert!((shape.pose.rotation.x - shape.spin.x * 10.0).abs() < 1e-5);
            assert!((shape.pose.rotation.y - shape.spin.y * 10.0).abs() < 1e-5);
        }
    }
}
