/// Scroll-driven visibility state machine for the skill group
///
/// The group flies in (and spins half a turn) when the target section scrolls
/// into view, and flies back to its parked depth when the section leaves.
/// Tweens are sampled by `VisibilityController::advance` from the frame
/// loop, never from a timer of their own.
use std::f32::consts::PI;

use log::debug;

use crate::config::SkillConfig;
use crate::scene::SkillGroup;
use crate::tween::{Easing, Tween};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityState {
    Hidden,
    Entering,
    Visible,
    Exiting,
}

/// Drives the skill group between parked and flown-in
#[derive(Debug, Clone)]
pub struct VisibilityController {
    state: VisibilityState,
    parked_z: f32,
    near_z: f32,
    enter_duration: f64,
    exit_duration: f64,
    /// Tween on `position.z`
    lift: Option<Tween>,
    /// Tween on `rotation.y`
    spin: Option<Tween>,
}

impl VisibilityController {
    pub fn new(config: &SkillConfig) -> Self {
        Self {
            state: VisibilityState::Hidden,
            parked_z: config.parked_z,
            near_z: config.near_z,
            enter_duration: config.enter_duration,
            exit_duration: config.exit_duration,
            lift: None,
            spin: None,
        }
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    /// Active tween on the group's depth, if any
    pub fn lift(&self) -> Option<&Tween> {
        self.lift.as_ref()
    }

    /// Active tween on the group's yaw, if any
    pub fn spin(&self) -> Option<&Tween> {
        self.spin.as_ref()
    }

    /// React to a recomputed section visibility.
    ///
    /// Returns `true` when a transition started. Repeated calls with the same
    /// visibility are no-ops.
    pub fn on_scroll(&mut self, section_visible: bool, group: &mut SkillGroup, now: f64) -> bool {
        if section_visible {
            if group.visible {
                return false;
            }

            group.visible = true;
            self.lift = Some(Tween::new(
                group.pose.position.z,
                self.near_z,
                now,
                self.enter_duration,
                Easing::Power2Out,
            ));
            self.spin = Some(Tween::new(
                group.pose.rotation.y,
                PI,
                now,
                self.enter_duration,
                Easing::default(),
            ));
            self.transition(VisibilityState::Entering);
            true
        } else {
            let can_exit = matches!(
                self.state,
                VisibilityState::Entering | VisibilityState::Visible
            );
            if !can_exit || !group.visible || group.pose.position.z <= 0.0 {
                return false;
            }

            // Replaces any fly-in still running on the same property
            self.lift = Some(Tween::new(
                group.pose.position.z,
                self.parked_z,
                now,
                self.exit_duration,
                Easing::default(),
            ));
            self.transition(VisibilityState::Exiting);
            true
        }
    }

    /// Sample active tweens into the group and settle finished transitions
    pub fn advance(&mut self, group: &mut SkillGroup, now: f64) {
        if let Some(lift) = self.lift {
            group.pose.position.z = lift.sample(now);
            if lift.is_finished(now) {
                self.lift = None;
            }
        }
        if let Some(spin) = self.spin {
            group.pose.rotation.y = spin.sample(now);
            if spin.is_finished(now) {
                self.spin = None;
            }
        }

        match self.state {
            VisibilityState::Entering if self.lift.is_none() && self.spin.is_none() => {
                self.transition(VisibilityState::Visible);
            }
            VisibilityState::Exiting if self.lift.is_none() => {
                group.visible = false;
                self.transition(VisibilityState::Hidden);
            }
            _ => {}
        }
    }

    fn transition(&mut self, next: VisibilityState) {
        debug!("skill group {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
