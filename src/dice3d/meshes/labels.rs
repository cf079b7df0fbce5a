//! Face number labels
//!
//! Numbers are built from flat strokes (straight segments and arcs) laid out
//! in the XY plane facing +Z, then placed on each face centroid.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;

use crate::dice3d::types::Face;

/// Label height relative to the die radius.
pub const LABEL_SCALE: f32 = 0.25;
/// Gap between the face and its label, along the face normal.
pub const LABEL_OFFSET: f32 = 0.02;

const STROKE_WIDTH: f32 = 0.12;
const DIGIT_WIDTH: f32 = 0.6;
const DIGIT_SPACING: f32 = 0.1;
const ARC_SEGMENTS: usize = 6;
// Half height / half width of a digit cell.
const H: f32 = 0.5;
const W: f32 = 0.35;

#[derive(Debug, Clone, Copy)]
enum Stroke {
    Line(f32, f32, f32, f32),
    /// Center, radius, start angle, end angle.
    Arc(f32, f32, f32, f32, f32),
}

fn digit_strokes(digit: u8) -> Vec<Stroke> {
    use Stroke::{Arc, Line};
    match digit {
        0 => vec![
            Arc(0.0, H * 0.5, W * 0.6, FRAC_PI_2, PI + FRAC_PI_2),
            Arc(0.0, -H * 0.5, W * 0.6, -FRAC_PI_2, FRAC_PI_2),
            Line(-W * 0.6, H * 0.5, -W * 0.6, -H * 0.5),
            Line(W * 0.6, H * 0.5, W * 0.6, -H * 0.5),
        ],
        1 => vec![
            Line(0.0, H, 0.0, -H),
            Line(-W * 0.3, H * 0.6, 0.0, H),
        ],
        2 => vec![
            Arc(0.0, H * 0.5, W * 0.5, 0.0, PI),
            Line(W * 0.5, H * 0.5, -W * 0.6, -H),
            Line(-W * 0.6, -H, W * 0.6, -H),
        ],
        3 => vec![
            Arc(0.0, H * 0.5, W * 0.5, -FRAC_PI_2, PI),
            Arc(0.0, -H * 0.5, W * 0.5, -PI, FRAC_PI_2),
        ],
        4 => vec![
            Line(-W * 0.6, H, -W * 0.6, 0.0),
            Line(-W * 0.6, 0.0, W * 0.6, 0.0),
            Line(W * 0.4, H, W * 0.4, -H),
        ],
        5 => vec![
            Line(W * 0.5, H, -W * 0.5, H),
            Line(-W * 0.5, H, -W * 0.5, 0.0),
            Line(-W * 0.5, 0.0, W * 0.3, 0.0),
            Arc(W * 0.1, -H * 0.5, W * 0.5, FRAC_PI_2, -PI),
        ],
        6 => vec![
            Arc(0.0, H * 0.3, W * 0.5, 0.0, PI),
            Line(-W * 0.5, H * 0.3, -W * 0.5, -H * 0.3),
            Arc(0.0, -H * 0.4, W * 0.5, 0.0, TAU),
        ],
        7 => vec![
            Line(-W * 0.5, H, W * 0.5, H),
            Line(W * 0.5, H, -W * 0.2, -H),
        ],
        8 => vec![
            Arc(0.0, H * 0.5, W * 0.4, 0.0, TAU),
            Arc(0.0, -H * 0.45, W * 0.5, 0.0, TAU),
        ],
        _ => vec![
            Arc(0.0, H * 0.4, W * 0.5, 0.0, TAU),
            Line(W * 0.5, H * 0.2, W * 0.5, -H * 0.3),
            Arc(0.0, -H * 0.3, W * 0.5, 0.0, -PI),
        ],
    }
}

/// Quad strip of `STROKE_WIDTH` between two points, appended to the buffers.
fn push_segment(
    positions: &mut Vec<[f32; 3]>,
    indices: &mut Vec<u32>,
    offset_x: f32,
    from: Vec2,
    to: Vec2,
) {
    let along = to - from;
    if along.length() < 0.001 {
        return;
    }
    let side = along.perp().normalize() * (STROKE_WIDTH / 2.0);
    let base = positions.len() as u32;
    for p in [from - side, to - side, to + side, from + side] {
        positions.push([offset_x + p.x, p.y, 0.0]);
    }
    indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

fn push_stroke(positions: &mut Vec<[f32; 3]>, indices: &mut Vec<u32>, offset_x: f32, stroke: Stroke) {
    match stroke {
        Stroke::Line(x1, y1, x2, y2) => {
            push_segment(positions, indices, offset_x, Vec2::new(x1, y1), Vec2::new(x2, y2));
        }
        Stroke::Arc(cx, cy, radius, start, end) => {
            let center = Vec2::new(cx, cy);
            let point = |t: f32| center + Vec2::from_angle(start + (end - start) * t) * radius;
            for i in 0..ARC_SEGMENTS {
                let t1 = i as f32 / ARC_SEGMENTS as f32;
                let t2 = (i + 1) as f32 / ARC_SEGMENTS as f32;
                push_segment(positions, indices, offset_x, point(t1), point(t2));
            }
        }
    }
}

fn digits(value: u8) -> Vec<u8> {
    value.to_string().bytes().map(|b| b - b'0').collect()
}

/// Vertex positions and triangle indices for a number, centered on the origin.
pub fn label_geometry(value: u8) -> (Vec<[f32; 3]>, Vec<u32>) {
    let digits = digits(value);
    let count = digits.len() as f32;
    let total_width = count * DIGIT_WIDTH + (count - 1.0) * DIGIT_SPACING;
    let start_x = -total_width / 2.0 + DIGIT_WIDTH / 2.0;

    let mut positions = Vec::new();
    let mut indices = Vec::new();
    for (i, digit) in digits.into_iter().enumerate() {
        let offset_x = start_x + i as f32 * (DIGIT_WIDTH + DIGIT_SPACING);
        for stroke in digit_strokes(digit) {
            push_stroke(&mut positions, &mut indices, offset_x, stroke);
        }
    }
    (positions, indices)
}

/// Flat label mesh facing +Z.
pub fn create_label_mesh(value: u8) -> Mesh {
    let (positions, indices) = label_geometry(value);
    let normals = vec![[0.0, 0.0, 1.0]; positions.len()];
    let uvs = vec![[0.5, 0.5]; positions.len()];

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(indices))
}

/// Place a label on its face, just above the surface, reading outward.
pub fn label_transform(face: &Face, die_radius: f32) -> Transform {
    Transform {
        translation: face.center + face.normal * LABEL_OFFSET,
        rotation: Quat::from_rotation_arc(Vec3::Z, face.normal),
        scale: Vec3::splat(LABEL_SCALE * die_radius),
    }
}
