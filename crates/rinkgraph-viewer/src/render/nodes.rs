use bevy::prelude::*;
use rinkgraph_engine::NodeIndex;

use crate::app::resources::{EngineRes, ViewerState};

#[derive(Component)]
pub struct NodeMarker {
    pub index: NodeIndex,
}

/// Nodes live for the whole session, so their entities are spawned once and
/// only updated afterwards.
pub fn spawn_nodes(
    mut commands: Commands,
    engine: Res<EngineRes>,
    st: Res<ViewerState>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut mats: ResMut<Assets<StandardMaterial>>,
) {
    let sphere = meshes.add(Sphere::new(1.0));
    for (index, node) in engine.0.nodes().iter() {
        let [r, g, b] = node.color;
        let material = mats.add(StandardMaterial {
            base_color: Color::srgba(r, g, b, 1.0),
            alpha_mode: AlphaMode::Blend,
            unlit: node.is_filler,
            ..default()
        });
        commands.spawn((
            PbrBundle {
                mesh: sphere.clone(),
                material,
                transform: Transform::from_translation(node.position)
                    .with_scale(Vec3::splat(node.size * st.cfg.node_radius)),
                ..default()
            },
            NodeMarker { index },
        ));
    }
    tracing::info!(nodes = engine.0.nodes().len(), "node meshes spawned");
}

pub fn update_nodes(
    engine: Res<EngineRes>,
    st: Res<ViewerState>,
    mut query: Query<(&NodeMarker, &mut Transform, &Handle<StandardMaterial>)>,
    mut mats: ResMut<Assets<StandardMaterial>>,
) {
    let Some(out) = engine.0.output() else {
        return;
    };
    for (marker, mut tf, handle) in query.iter_mut() {
        let i = marker.index.0;
        let (Some(p), Some(size), Some(color), Some(alpha), Some(energy)) = (
            out.positions.get(i),
            out.sizes.get(i),
            out.colors.get(i),
            out.alphas.get(i),
            out.energies.get(i),
        ) else {
            continue;
        };
        tf.translation = Vec3::from_array(*p);
        tf.scale = Vec3::splat(size * st.cfg.node_radius);

        let Some(mat) = mats.get_mut(handle) else {
            continue;
        };
        let [r, g, b] = *color;
        mat.base_color = Color::srgba(r, g, b, *alpha);
        mat.emissive = if out.selected == Some(marker.index) {
            LinearRgba::rgb(1.0, 0.9, 0.4)
        } else {
            LinearRgba::rgb(r * energy, g * energy, b * energy)
        };
    }
}
