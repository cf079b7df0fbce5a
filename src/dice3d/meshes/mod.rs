pub mod d20;
pub mod labels;

pub use d20::{
    build_die, create_d20_mesh, create_face_outline_mesh, create_wireframe_mesh, D20Model,
    MIN_FACE_AREA,
};
pub use labels::{create_label_mesh, label_geometry, label_transform, LABEL_OFFSET, LABEL_SCALE};
