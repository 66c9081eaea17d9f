use crate::config::SimConfig;
use crate::engine::scene::vehicle_spawner::spawn_vehicle;
use crate::sim::rng::CityRng;
use crate::sim::vehicles::simple_vehicle_plan;
use crate::sim::viewpoint::Viewpoint;
use bevy::asset::LoadState;
use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

/// The visible vehicle riding the viewpoint. The rig entity exists from
/// startup and tracks the viewpoint every tick; the model underneath it
/// arrives whenever its load resolves, or never does and a procedural
/// stand-in takes its place. The simulation doesn't care either way.
#[derive(Resource, Default)]
pub struct PlayerVehicle {
    pub rig: Option<Entity>,
    pub scene: Option<Handle<Scene>>,
    pub attached: bool,
}

pub fn setup_player_vehicle(
    mut commands: Commands,
    mut player: ResMut<PlayerVehicle>,
    asset_server: Res<AssetServer>,
    config: Res<SimConfig>,
    viewpoint: Res<Viewpoint>,
) {
    let rig = commands
        .spawn((
            Transform::from_translation(viewpoint.position),
            Visibility::default(),
        ))
        .id();
    player.rig = Some(rig);

    if let Some(path) = &config.misc.player_vehicle_model {
        info!("Loading player vehicle model from {path}");
        player.scene = Some(asset_server.load(GltfAssetLabel::Scene(0).from_asset(path.clone())));
    }
}

/// Resolve the player model without ever blocking a frame: attach the scene
/// once it loads, or fall back to the generated box-and-wheels car on
/// failure (or when no model was configured at all).
pub fn attach_player_model(
    mut commands: Commands,
    mut player: ResMut<PlayerVehicle>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut rng: ResMut<CityRng>,
    asset_server: Res<AssetServer>,
) {
    if player.attached {
        return;
    }
    let Some(rig) = player.rig else { return };

    match player.scene.clone() {
        Some(scene) => match asset_server.get_load_state(&scene) {
            Some(LoadState::Loaded) => {
                commands.spawn((
                    SceneRoot(scene),
                    Transform::from_rotation(Quat::from_rotation_y(FRAC_PI_2)),
                    ChildOf(rig),
                ));
                player.attached = true;
            }
            Some(LoadState::Failed(_)) => {
                warn!("Player vehicle model failed to load, using generated stand-in");
                attach_placeholder(
                    &mut commands,
                    &mut meshes,
                    &mut materials,
                    &mut rng,
                    rig,
                );
                player.attached = true;
            }
            _ => {}
        },
        None => {
            attach_placeholder(&mut commands, &mut meshes, &mut materials, &mut rng, rig);
            player.attached = true;
        }
    }
}

fn attach_placeholder(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    rng: &mut CityRng,
    rig: Entity,
) {
    let plan = simple_vehicle_plan(&mut rng.0);
    let (entity, _binding) = spawn_vehicle(commands, meshes, materials, &plan, Vec3::ZERO, 0.0);
    commands.entity(entity).insert(ChildOf(rig));
}
