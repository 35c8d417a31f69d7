use bevy::prelude::*;

use crate::app::resources::EngineRes;

pub fn setup_scene(mut commands: Commands, engine: Res<EngineRes>) {
    commands.spawn(PointLightBundle {
        point_light: PointLight {
            intensity: 2_000_000.0,
            range: 400.0,
            shadows_enabled: false,
            ..default()
        },
        transform: Transform::from_xyz(40.0, 120.0, 60.0),
        ..default()
    });
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
    });

    let cam = engine.0.camera();
    commands.spawn(Camera3dBundle {
        projection: Projection::Perspective(PerspectiveProjection {
            fov: cam.fov_y(),
            near: cam.config().near,
            far: cam.config().far,
            ..default()
        }),
        transform: Transform::from_translation(cam.position()).looking_at(cam.target(), Vec3::Y),
        ..default()
    });
}

/// The engine owns the orbit state; the bevy camera only mirrors it.
pub fn sync_camera(engine: Res<EngineRes>, mut cam_q: Query<(&mut Transform, &mut Projection), With<Camera3d>>) {
    let Ok((mut tf, mut projection)) = cam_q.get_single_mut() else {
        return;
    };
    let cam = engine.0.camera();
    *tf = Transform::from_translation(cam.position()).looking_at(cam.target(), Vec3::Y);
    if let Projection::Perspective(p) = projection.as_mut() {
        p.fov = cam.fov_y();
        p.near = cam.config().near;
        p.far = cam.config().far;
    }
}
