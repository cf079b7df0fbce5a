//! Roll Controller State
//!
//! The roll controller owns the die orientation while a session runs. It is
//! advanced one step per frame by [`RollController::tick`] and pushes its
//! state out through a [`DieView`].

use std::f64::consts::{PI, TAU};

use bevy::log::{debug, info};
use bevy::math::{DQuat, DVec2, DVec3};
use bevy::prelude::Resource;

use super::orientation::{alignment_error, extra_turn, face_to_camera, EulerPose};
use super::random::RollRandom;
use crate::dice3d::meshes::D20Model;
use crate::dice3d::types::FACE_COUNT;

/// Angular speed of the spin before energy is applied.
pub const BASE_SPEED: f64 = 0.3;
/// Multiplier on the base speed so the die turns several times.
pub const INITIAL_ENERGY: f64 = 4.0;
/// Progress added per spin tick.
pub const PROGRESS_STEP: f64 = 0.004;
/// Number of ticks in the spin phase (progress 0 to 1).
pub const SPIN_TICKS: u32 = 250;
/// Progress below which there is no friction.
pub const FRICTION_ONSET: f64 = 0.4;
pub const FRICTION_BASE: f64 = 0.975;
pub const FRICTION_EXPONENT: f64 = 80.0;
/// Applied to the angular velocity every spin tick.
pub const VELOCITY_DECAY: f64 = 0.985;
/// Angular distance the die must travel before it starts locking on.
pub const MINIMUM_ROTATION: f64 = 6.0 * PI;
/// Slerp strength during spin is `progress^3 * SPIN_ALIGNMENT_GAIN`.
pub const SPIN_ALIGNMENT_GAIN: f64 = 0.05;
/// Slerp fraction per tick while aligning.
pub const SETTLE_FRACTION: f64 = 0.1;
/// Orientation error (radians) at which the die snaps onto its target.
pub const SETTLE_THRESHOLD: f64 = 0.001;
/// Highlight opacity added per tick.
pub const HIGHLIGHT_STEP: f64 = 0.03;
/// Drag releases at or below this speed (sum of absolute axes) do not roll.
pub const DRAG_RELEASE_THRESHOLD: f64 = 0.01;
/// Upper bound on ticks for [`RollController::run_to_completion`].
pub const MAX_SESSION_TICKS: u32 = 10_000;

/// Render side of the controller.
pub trait DieView {
    fn set_orientation(&mut self, orientation: DQuat);
    fn set_face_highlight(&mut self, face: u8, visible: bool, opacity: f64);
}

/// View that discards everything, for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl DieView for NullView {
    fn set_orientation(&mut self, _orientation: DQuat) {}
    fn set_face_highlight(&mut self, _face: u8, _visible: bool, _opacity: f64) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollPhase {
    /// Free tumble under friction, blending toward the target once far enough.
    Spinning,
    /// Fixed-fraction slerp toward the target.
    Aligning,
    /// Snapped onto the target; highlight revealed at zero opacity.
    Settling,
    HighlightFading,
    Done,
}

/// One roll animation from trigger to settle.
#[derive(Debug, Clone, PartialEq)]
pub struct RollSession {
    pub target_face: u8,
    pub target_orientation: DQuat,
    pub angular_velocity: DVec3,
    /// 0.0 to 1.0 over the spin phase.
    pub progress: f64,
    /// Sum of per-axis absolute Euler increments applied while spinning.
    pub total_rotation: f64,
    /// Distance after which spin-phase blending starts.
    pub minimum_rotation: f64,
    pub highlight_opacity: f64,
    pub phase: RollPhase,
    /// The outcome matched the previous roll.
    pub repeat: bool,
    pub ticks: u32,
    spin_ticks: u32,
}

impl RollSession {
    fn new(target_face: u8, target_orientation: DQuat, spin: DVec3, repeat: bool) -> Self {
        // A repeated outcome gets one extra full turn worth of travel.
        let (minimum_rotation, energy) = if repeat {
            (
                MINIMUM_ROTATION + TAU,
                INITIAL_ENERGY * (MINIMUM_ROTATION + TAU) / MINIMUM_ROTATION,
            )
        } else {
            (MINIMUM_ROTATION, INITIAL_ENERGY)
        };

        Self {
            target_face,
            target_orientation,
            angular_velocity: spin.normalize_or_zero() * BASE_SPEED * energy,
            progress: 0.0,
            total_rotation: 0.0,
            minimum_rotation,
            highlight_opacity: 0.0,
            phase: RollPhase::Spinning,
            repeat,
            ticks: 0,
            spin_ticks: 0,
        }
    }

    /// Friction multiplier for the given spin progress.
    pub fn friction(progress: f64) -> f64 {
        if progress < FRICTION_ONSET {
            1.0
        } else {
            FRICTION_BASE.powf(progress * FRICTION_EXPONENT)
        }
    }

    /// Advance one tick. Returns true once the session is done.
    fn advance(&mut self, pose: &mut EulerPose, view: &mut dyn DieView) -> bool {
        self.ticks += 1;
        match self.phase {
            RollPhase::Spinning => {
                self.spin_ticks += 1;
                self.progress = (f64::from(self.spin_ticks) * PROGRESS_STEP).min(1.0);

                let step = self.angular_velocity * Self::friction(self.progress);
                pose.rotate_by(step);
                self.total_rotation += step.abs().element_sum();
                self.angular_velocity *= VELOCITY_DECAY;

                if self.total_rotation > self.minimum_rotation {
                    let strength = self.progress.powi(3) * SPIN_ALIGNMENT_GAIN;
                    let blended = pose.orientation().slerp(self.target_orientation, strength);
                    pose.set_orientation(blended);
                }

                if self.spin_ticks >= SPIN_TICKS {
                    debug!(
                        "Spin finished after {:.2} rad, aligning to face {}",
                        self.total_rotation, self.target_face
                    );
                    self.phase = RollPhase::Aligning;
                }
            }
            RollPhase::Aligning => {
                let blended = pose.orientation().slerp(self.target_orientation, SETTLE_FRACTION);
                pose.set_orientation(blended);
                if pose.orientation().angle_between(self.target_orientation) < SETTLE_THRESHOLD {
                    pose.set_orientation(self.target_orientation);
                    debug!("Snapped onto face {} after {} ticks", self.target_face, self.ticks);
                    self.phase = RollPhase::Settling;
                }
            }
            RollPhase::Settling => {
                pose.set_orientation(self.target_orientation);
                view.set_face_highlight(self.target_face, true, 0.0);
                self.phase = RollPhase::HighlightFading;
            }
            RollPhase::HighlightFading => {
                self.highlight_opacity = (self.highlight_opacity + HIGHLIGHT_STEP).min(1.0);
                view.set_face_highlight(self.target_face, true, self.highlight_opacity);
                if self.highlight_opacity >= 1.0 {
                    self.phase = RollPhase::Done;
                }
            }
            RollPhase::Done => {}
        }
        view.set_orientation(pose.orientation());
        self.phase == RollPhase::Done
    }
}

/// Published when a session reaches [`RollPhase::Done`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollOutcome {
    pub rolled: u8,
    /// Ticks the session took from trigger to done.
    pub ticks: u32,
}

/// Owns the die orientation and at most one roll session.
#[derive(Resource)]
pub struct RollController {
    /// Face normals in double precision, indexed by `number - 1`. Always
    /// [`FACE_COUNT`] long since only `build_die` makes a [`D20Model`].
    normals: Vec<DVec3>,
    camera_dir: DVec3,
    random: Box<dyn RollRandom + Send + Sync>,
    pose: EulerPose,
    session: Option<RollSession>,
    finished: Option<RollSession>,
    last_result: Option<u8>,
}

impl RollController {
    pub fn new(
        model: &D20Model,
        camera_dir: DVec3,
        random: impl RollRandom + Send + Sync + 'static,
    ) -> Self {
        Self {
            normals: model
                .faces()
                .iter()
                .map(|face| face.normal.as_dvec3().normalize())
                .collect(),
            camera_dir: camera_dir.try_normalize().unwrap_or(DVec3::Z),
            random: Box::new(random),
            pose: EulerPose::IDENTITY,
            session: None,
            finished: None,
            last_result: None,
        }
    }

    /// Direction used for targets of rolls triggered from now on.
    pub fn set_camera_direction(&mut self, camera_dir: DVec3) {
        if let Some(dir) = camera_dir.try_normalize() {
            self.camera_dir = dir;
        }
    }

    pub fn camera_direction(&self) -> DVec3 {
        self.camera_dir
    }

    pub fn orientation(&self) -> DQuat {
        self.pose.orientation()
    }

    /// Accumulated XYZ Euler angles behind [`Self::orientation`].
    pub fn euler_angles(&self) -> DVec3 {
        self.pose.angles()
    }

    pub fn is_rolling(&self) -> bool {
        self.session.is_some()
    }

    pub fn phase(&self) -> Option<RollPhase> {
        self.session.as_ref().map(|s| s.phase)
    }

    pub fn session(&self) -> Option<&RollSession> {
        self.session.as_ref()
    }

    /// The most recently completed session.
    pub fn finished_session(&self) -> Option<&RollSession> {
        self.finished.as_ref()
    }

    pub fn last_result(&self) -> Option<u8> {
        self.last_result
    }

    /// Unit normal of a face in die-local space.
    pub fn face_normal(&self, face: u8) -> Option<DVec3> {
        self.normals.get(usize::from(face).checked_sub(1)?).copied()
    }

    /// Angle between the face's current world normal and the camera direction.
    pub fn face_alignment_error(&self, face: u8) -> Option<f64> {
        let normal = self.face_normal(face)?;
        Some(alignment_error(self.pose.orientation(), normal, self.camera_dir))
    }

    /// Start a new roll, discarding any session in flight. Returns the face
    /// the die will land on.
    pub fn trigger(&mut self, view: &mut dyn DieView) -> u8 {
        if let Some(old) = self.session.take() {
            info!(
                "Roll toward face {} pre-empted during {:?}",
                old.target_face, old.phase
            );
        }

        for face in 1..=FACE_COUNT {
            view.set_face_highlight(face, false, 0.0);
        }

        let result = self.random.roll_face().clamp(1, FACE_COUNT);
        let repeat = self.last_result == Some(result);
        self.last_result = Some(result);

        let normal = self.face_normal(result).unwrap_or(self.camera_dir);
        let mut target = face_to_camera(normal, self.camera_dir);
        if repeat {
            target = (extra_turn() * target).normalize();
        }

        let spin = self.random.spin_direction();
        info!("Rolling: landing on {} (repeat: {})", result, repeat);
        self.session = Some(RollSession::new(result, target, spin, repeat));
        result
    }

    /// Immediate click or tap.
    pub fn on_trigger_gesture(&mut self, view: &mut dyn DieView) -> u8 {
        self.trigger(view)
    }

    /// End of a manual drag. Rolls only if the release speed clears the
    /// threshold; returns whether a roll started.
    pub fn on_drag_release(&mut self, speed: DVec2, view: &mut dyn DieView) -> bool {
        if speed.abs().element_sum() > DRAG_RELEASE_THRESHOLD {
            self.trigger(view);
            true
        } else {
            false
        }
    }

    /// Manual rotation by Euler angles (x, y). Ignored while a roll runs.
    pub fn nudge(&mut self, delta: DVec2) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.pose.rotate_by(delta.extend(0.0));
        true
    }

    /// Advance the active session by one frame. The orientation is pushed to
    /// the view on every call, rolling or not.
    pub fn tick(&mut self, view: &mut dyn DieView) -> Option<RollOutcome> {
        let Some(session) = self.session.as_mut() else {
            view.set_orientation(self.pose.orientation());
            return None;
        };

        if !session.advance(&mut self.pose, view) {
            return None;
        }

        let outcome = RollOutcome {
            rolled: session.target_face,
            ticks: session.ticks,
        };
        info!("Rolled {} in {} ticks", outcome.rolled, outcome.ticks);
        self.finished = self.session.take();
        Some(outcome)
    }

    /// Tick until the active session finishes. `None` if nothing is rolling.
    pub fn run_to_completion(&mut self, view: &mut dyn DieView) -> Option<RollOutcome> {
        for _ in 0..MAX_SESSION_TICKS {
            self.session.as_ref()?;
            if let Some(outcome) = self.tick(view) {
                return Some(outcome);
            }
        }
        None
    }
}
