//! Tests for die construction and the per-face data the roller relies on

use d20roller::dice3d::{
    build_die, label_geometry, FixedSequence, GeometryError, RollController, DVec3, FACE_COUNT,
};

#[test]
fn test_default_die_is_valid() {
    let model = build_die(1.0, 0.03).unwrap();
    assert_eq!(model.faces().len(), usize::from(FACE_COUNT));
    assert_eq!(model.vertices().len(), 12);
    assert_eq!(model.edges().len(), 30);
}

#[test]
fn test_face_numbers_are_a_bijection() {
    let model = build_die(1.0, 0.03).unwrap();
    let mut numbers: Vec<u8> = model.faces().iter().map(|f| f.number).collect();
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=20).collect::<Vec<u8>>());
}

#[test]
fn test_normals_cover_the_sphere() {
    let model = build_die(1.0, 0.03).unwrap();
    let sum = model
        .faces()
        .iter()
        .fold(bevy::math::Vec3::ZERO, |acc, f| acc + f.normal);
    assert!(sum.length() < 1e-4);
}

#[test]
fn test_scaled_die_keeps_normals() {
    let small = build_die(1.0, 0.03).unwrap();
    let large = build_die(3.0, 0.5).unwrap();
    for (a, b) in small.faces().iter().zip(large.faces()) {
        assert!(a.normal.dot(b.normal) > 0.9999);
        assert!(b.center.length() > a.center.length());
    }
}

#[test]
fn test_geometry_errors_describe_the_problem() {
    let err = build_die(-1.0, 0.0).unwrap_err();
    assert_eq!(err, GeometryError::NonPositiveRadius { radius: -1.0 });
    assert!(err.to_string().contains("-1"));

    let err = build_die(1.0, 2.0).unwrap_err();
    assert!(matches!(err, GeometryError::InvalidBevel { .. }));
}

#[test]
fn test_every_face_has_a_label() {
    let model = build_die(1.0, 0.03).unwrap();
    for face in model.faces() {
        let (positions, indices) = label_geometry(face.number);
        assert!(positions.len() >= 4);
        assert!(!indices.is_empty());
    }
}

#[test]
fn test_controller_has_a_normal_for_every_face() {
    let model = build_die(2.0, 0.1).unwrap();
    let roll = RollController::new(&model, DVec3::Z, FixedSequence::new([1]));
    for face in 1..=FACE_COUNT {
        let normal = roll.face_normal(face).unwrap();
        assert!((normal.length() - 1.0).abs() < 1e-9);
    }
    assert!(roll.face_normal(0).is_none());
    assert!(roll.face_normal(FACE_COUNT + 1).is_none());
}
