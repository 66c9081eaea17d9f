use crate::config::SimConfig;
use crate::sim::rng::CityRng;
use crate::sim::viewpoint::Viewpoint;
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::view::NoFrustumCulling;
use rand::Rng;
use constants::palette::hex_color;

/// Particles below this height get recycled back to the sky.
const RAIN_FLOOR: f32 = -150.0;

/// Rain is one point-topology mesh whose vertex positions are rewritten
/// every tick; particles recycle vertically the same way buildings recycle
/// in depth.
#[derive(Resource)]
pub struct RainState {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
    pub positions: Vec<Vec3>,
}

pub fn setup_rain(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut rng: ResMut<CityRng>,
    config: Res<SimConfig>,
    viewpoint: Res<Viewpoint>,
) {
    let effects = &config.effects;
    if !effects.enable_rain || effects.rain_count == 0 {
        return;
    }

    let cam_z = viewpoint.position.z;
    let offset_range = (config.misc.visible_depth - effects.rain_recycle_min_z_offset).max(0.0);
    let positions: Vec<Vec3> = (0..effects.rain_count)
        .map(|_| {
            Vec3::new(
                (rng.0.random::<f32>() - 0.5) * config.city.corridor_width * 1.2,
                config.camera.base_height + rng.0.random::<f32>() * 400.0 - 100.0,
                cam_z
                    - (effects.rain_recycle_min_z_offset
                        + rng.0.random::<f32>() * offset_range),
            )
        })
        .collect();

    let mut mesh = Mesh::new(
        PrimitiveTopology::PointList,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(
        Mesh::ATTRIBUTE_POSITION,
        positions.iter().map(|p| p.to_array()).collect::<Vec<_>>(),
    );
    let mesh = meshes.add(mesh);
    let material = materials.add(StandardMaterial {
        base_color: hex_color(constants::palette::RAIN_COLOR).with_alpha(effects.rain_max_opacity),
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    let entity_mesh = mesh.clone();
    let entity_material = material.clone();
    commands.spawn((
        Mesh3d(entity_mesh),
        MeshMaterial3d(entity_material),
        Transform::IDENTITY,
        NoFrustumCulling,
    ));
    commands.insert_resource(RainState {
        mesh,
        material,
        positions,
    });
}

pub fn animate_rain(
    time: Res<Time>,
    config: Res<SimConfig>,
    viewpoint: Res<Viewpoint>,
    rain: Option<ResMut<RainState>>,
    mut rng: ResMut<CityRng>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(mut rain) = rain else { return };
    let effects = &config.effects;

    if effects.rain_fade_period > 0.0 {
        let wave = 0.5
            + 0.5
                * (time.elapsed_secs() * (std::f32::consts::TAU / effects.rain_fade_period)).sin();
        let min_opacity = effects.rain_min_opacity_factor * effects.rain_max_opacity;
        let opacity = min_opacity + (effects.rain_max_opacity - min_opacity) * wave;
        if let Some(material) = materials.get_mut(&rain.material) {
            material.base_color.set_alpha(opacity);
        }
    }

    let cam_z = viewpoint.position.z;
    let fall = effects.rain_speed * time.delta_secs();
    let offset_range = (config.misc.visible_depth - effects.rain_recycle_min_z_offset).max(0.0);
    for position in rain.positions.iter_mut() {
        let dz = position.z - cam_z;
        // particles passing right over the viewpoint are parked below the
        // floor instead of streaking across the lens
        if dz < 0.0 && dz > -effects.rain_cull_distance_z {
            position.y = RAIN_FLOOR - 100.0;
        } else {
            position.y -= fall;
        }
        if position.y < RAIN_FLOOR {
            position.y = config.camera.base_height + 150.0 + rng.0.random::<f32>() * 300.0;
            position.z = cam_z
                - (effects.rain_recycle_min_z_offset + rng.0.random::<f32>() * offset_range);
        }
    }

    if let Some(mesh) = meshes.get_mut(&rain.mesh) {
        mesh.insert_attribute(
            Mesh::ATTRIBUTE_POSITION,
            rain.positions
                .iter()
                .map(|p| p.to_array())
                .collect::<Vec<_>>(),
        );
    }
}
