//! Scene setup system
//!
//! This module contains the setup function that initializes the 3D scene:
//! camera, lights, the die with its wireframe, labels and face highlights,
//! and the result text.

use bevy::prelude::*;

use crate::dice3d::meshes::{
    create_d20_mesh, create_face_outline_mesh, create_label_mesh, create_wireframe_mesh,
    label_transform, D20Model,
};
use crate::dice3d::texture::init_smoke_texture;
use crate::dice3d::types::*;

/// Main setup system - initializes the entire 3D scene
pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    settings: Res<RollerSettings>,
    model: Res<D20Model>,
) {
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: 45.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        Transform::from_translation(settings.camera_position()).looking_at(Vec3::ZERO, Vec3::Y),
        AmbientLight {
            color: Color::WHITE,
            brightness: 400.0,
            ..default()
        },
        MainCamera,
    ));

    // Front and top key lights
    for position in [Vec3::new(2.0, 4.0, 6.0), Vec3::new(-4.0, 8.0, -2.0)] {
        commands.spawn((
            DirectionalLight {
                illuminance: 6000.0,
                ..default()
            },
            Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y),
        ));
    }

    let smoke = init_smoke_texture(&settings, &mut images);
    let die_material = materials.add(StandardMaterial {
        base_color: settings.die_color.to_color(),
        base_color_texture: Some(smoke.image.clone()),
        alpha_mode: AlphaMode::Blend,
        reflectance: 0.6,
        perceptual_roughness: 0.2,
        ..default()
    });
    commands.insert_resource(smoke);

    let wireframe_material = materials.add(StandardMaterial {
        base_color: settings.wireframe_color.to_color(),
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    let label_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    let highlight_color = settings.highlight_color.to_color().with_alpha(0.0);

    commands
        .spawn((
            Mesh3d(meshes.add(create_d20_mesh(&model))),
            MeshMaterial3d(die_material),
            Transform::IDENTITY,
            D20Die,
        ))
        .with_children(|die| {
            die.spawn((
                Mesh3d(meshes.add(create_wireframe_mesh(&model))),
                MeshMaterial3d(wireframe_material),
            ));

            for face in model.faces() {
                die.spawn((
                    Mesh3d(meshes.add(create_label_mesh(face.number))),
                    MeshMaterial3d(label_material.clone()),
                    label_transform(face, model.radius()),
                ));

                // Own material per face so opacities animate independently
                die.spawn((
                    Mesh3d(meshes.add(create_face_outline_mesh(face))),
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color: highlight_color,
                        unlit: true,
                        alpha_mode: AlphaMode::Blend,
                        ..default()
                    })),
                    Visibility::Hidden,
                    FaceHighlight {
                        number: face.number,
                    },
                ));
            }
        });

    commands.spawn((
        Text::new(RollDisplay::IDLE_PROMPT),
        TextFont {
            font_size: 28.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(20.0),
            left: Val::Px(20.0),
            ..default()
        },
        ResultsText,
    ));

    info!("Scene ready: d20 with {} faces", model.faces().len());
}
