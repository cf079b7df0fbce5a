//! Tests for the roll controller: outcome distribution, alignment, settle,
//! pre-emption, repeats, drag releases and highlight sequencing

use d20roller::dice3d::{
    build_die, DQuat, DVec2, DVec3, DieView, FixedSequence, NullView, RollController, RollPhase,
    RollRandom, Roller, SETTLE_THRESHOLD,
};

const CAMERA: DVec3 = DVec3::new(4.0, 4.0, 4.0);

fn controller_with(random: impl RollRandom + Send + Sync + 'static) -> RollController {
    let model = build_die(1.0, 0.03).unwrap();
    RollController::new(&model, CAMERA, random)
}

/// Tracks the latest highlight state per face and whether any face other
/// than `expected` was ever shown.
struct HighlightRecorder {
    expected: u8,
    state: [(bool, f64); 20],
    stray: bool,
    orientation: Option<DQuat>,
}

impl HighlightRecorder {
    fn new(expected: u8) -> Self {
        Self {
            expected,
            state: [(false, 0.0); 20],
            stray: false,
            orientation: None,
        }
    }
}

impl DieView for HighlightRecorder {
    fn set_orientation(&mut self, orientation: DQuat) {
        self.orientation = Some(orientation);
    }

    fn set_face_highlight(&mut self, face: u8, visible: bool, opacity: f64) {
        if face != self.expected && (visible || opacity != 0.0) {
            self.stray = true;
        }
        self.state[usize::from(face - 1)] = (visible, opacity);
    }
}

#[test]
fn test_outcomes_are_uniform_and_independent() {
    let mut roll = controller_with(Roller::from_seed(20_24));
    let mut view = NullView;
    let mut counts = [0u32; 20];
    let mut repeats = 0;
    let mut previous = None;

    for _ in 0..10_000 {
        let face = roll.trigger(&mut view);
        assert!((1..=20).contains(&face));
        counts[usize::from(face - 1)] += 1;
        if previous == Some(face) {
            repeats += 1;
        }
        previous = Some(face);
    }

    let expected = 10_000.0 / 20.0;
    let chi_square: f64 = counts
        .iter()
        .map(|&c| (f64::from(c) - expected).powi(2) / expected)
        .sum();
    // 19 degrees of freedom; 50 is far beyond the 0.999 quantile (43.8).
    assert!(chi_square < 50.0, "chi-square {chi_square} for {counts:?}");
    // One in twenty consecutive pairs should repeat.
    assert!((350..=650).contains(&repeats), "{repeats} repeats");
}

#[test]
fn test_every_face_ends_up_facing_the_camera() {
    for face in 1..=20u8 {
        let mut roll = controller_with(FixedSequence::new([face]));
        let mut view = NullView;
        assert_eq!(roll.trigger(&mut view), face);
        let outcome = roll.run_to_completion(&mut view).unwrap();
        assert_eq!(outcome.rolled, face);
        assert!(!roll.is_rolling());

        let error = roll.face_alignment_error(face).unwrap();
        assert!(error < SETTLE_THRESHOLD, "face {face} off by {error}");
    }
}

#[test]
fn test_camera_direction_change_moves_target() {
    let mut roll = controller_with(FixedSequence::new([8]));
    roll.set_camera_direction(DVec3::new(0.0, 0.0, 5.0));
    let mut view = NullView;
    roll.trigger(&mut view);
    roll.run_to_completion(&mut view).unwrap();

    let world_normal = roll.orientation() * roll.face_normal(8).unwrap();
    assert!(world_normal.angle_between(DVec3::Z) < SETTLE_THRESHOLD);
}

#[test]
fn test_settled_orientation_is_exact_and_stable() {
    let mut roll = controller_with(FixedSequence::new([13]));
    let mut view = HighlightRecorder::new(13);
    roll.trigger(&mut view);
    roll.run_to_completion(&mut view).unwrap();

    let target = roll.finished_session().unwrap().target_orientation;
    assert_eq!(roll.orientation(), target);

    for _ in 0..200 {
        assert!(roll.tick(&mut view).is_none());
    }
    assert_eq!(roll.orientation(), target);
    assert_eq!(view.orientation, Some(target));
}

#[test]
fn test_new_trigger_discards_spinning_session() {
    let mut roll = controller_with(FixedSequence::new([3, 17]));
    let mut view = NullView;
    roll.trigger(&mut view);
    for _ in 0..100 {
        roll.tick(&mut view);
    }
    assert_eq!(roll.phase(), Some(RollPhase::Spinning));

    assert_eq!(roll.trigger(&mut view), 17);
    let session = roll.session().unwrap();
    assert_eq!(session.phase, RollPhase::Spinning);
    assert_eq!(session.ticks, 0);
    assert_eq!(session.progress, 0.0);

    let outcome = roll.run_to_completion(&mut view).unwrap();
    assert_eq!(outcome.rolled, 17);
    assert!(roll.face_alignment_error(17).unwrap() < SETTLE_THRESHOLD);
}

#[test]
fn test_new_trigger_discards_fading_session_and_its_highlight() {
    let mut roll = controller_with(FixedSequence::new([6, 11]));
    let mut view = HighlightRecorder::new(6);
    roll.trigger(&mut view);
    while roll.phase() != Some(RollPhase::HighlightFading) {
        roll.tick(&mut view);
    }
    roll.tick(&mut view);
    assert!(view.state[5].0);
    assert!(view.state[5].1 > 0.0);

    view.expected = 11;
    roll.trigger(&mut view);
    assert_eq!(view.state[5], (false, 0.0));

    let outcome = roll.run_to_completion(&mut view).unwrap();
    assert_eq!(outcome.rolled, 11);
    assert_eq!(view.state[5], (false, 0.0));
    assert_eq!(view.state[10], (true, 1.0));
}

#[test]
fn test_repeated_outcome_travels_further() {
    let spin = DVec3::new(0.2, -0.7, 0.4);
    let mut repeated = controller_with(FixedSequence::new([5, 5]).with_spin(spin));
    let mut different = controller_with(FixedSequence::new([5, 6]).with_spin(spin));
    let mut view = NullView;

    for roll in [&mut repeated, &mut different] {
        roll.trigger(&mut view);
        roll.run_to_completion(&mut view).unwrap();
        roll.trigger(&mut view);
        roll.run_to_completion(&mut view).unwrap();
    }

    let repeated = repeated.finished_session().unwrap();
    let different = different.finished_session().unwrap();
    assert!(repeated.repeat);
    assert!(!different.repeat);
    assert!(repeated.total_rotation > different.total_rotation);
}

#[test]
fn test_repeated_outcome_still_faces_camera() {
    let mut roll = controller_with(FixedSequence::new([19, 19]));
    let mut view = NullView;
    for _ in 0..2 {
        roll.trigger(&mut view);
        assert_eq!(roll.run_to_completion(&mut view).unwrap().rolled, 19);
    }
    assert!(roll.face_alignment_error(19).unwrap() < SETTLE_THRESHOLD);
}

#[test]
fn test_slow_drag_release_does_not_roll() {
    let mut roll = controller_with(FixedSequence::new([2]));
    let mut view = NullView;
    assert!(!roll.on_drag_release(DVec2::new(0.005, 0.0), &mut view));
    assert!(!roll.is_rolling());
    assert!(roll.last_result().is_none());
}

#[test]
fn test_fast_drag_release_rolls() {
    let mut roll = controller_with(FixedSequence::new([2]));
    let mut view = NullView;
    assert!(roll.on_drag_release(DVec2::new(0.02, 0.0), &mut view));
    assert!(roll.is_rolling());
    assert_eq!(roll.last_result(), Some(2));
}

#[test]
fn test_forced_one_highlights_only_face_one() {
    let mut roll = controller_with(FixedSequence::new([1]));
    let mut view = HighlightRecorder::new(1);
    roll.on_trigger_gesture(&mut view);

    let mut saw_fading = false;
    while roll.is_rolling() {
        if roll.phase() == Some(RollPhase::HighlightFading) {
            saw_fading = true;
        }
        roll.tick(&mut view);
        assert!(!view.stray, "another face was highlighted");
    }

    assert!(saw_fading);
    assert_eq!(view.state[0], (true, 1.0));
    for (visible, opacity) in &view.state[1..] {
        assert!(!visible);
        assert_eq!(*opacity, 0.0);
    }
}

#[test]
fn test_manual_rotation_only_while_idle() {
    let mut roll = controller_with(FixedSequence::new([4]));
    let mut view = NullView;
    assert!(roll.nudge(DVec2::new(0.3, -0.2)));
    assert_ne!(roll.orientation(), DQuat::IDENTITY);

    roll.trigger(&mut view);
    assert!(!roll.nudge(DVec2::new(0.3, -0.2)));
    roll.run_to_completion(&mut view).unwrap();
    assert!(roll.nudge(DVec2::new(0.3, -0.2)));
}

#[test]
fn test_seeded_rollers_replay_the_same_session() {
    let mut a = controller_with(Roller::from_seed(77));
    let mut b = controller_with(Roller::from_seed(77));
    let mut view = NullView;
    for _ in 0..5 {
        assert_eq!(a.trigger(&mut view), b.trigger(&mut view));
        let outcome_a = a.run_to_completion(&mut view).unwrap();
        let outcome_b = b.run_to_completion(&mut view).unwrap();
        assert_eq!(outcome_a, outcome_b);
        assert_eq!(a.orientation(), b.orientation());
    }
}
