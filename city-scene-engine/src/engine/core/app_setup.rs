use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::config::SimConfig;
use crate::engine::assets::media_manifest::{
    MediaCatalog, MediaManifest, poll_media_manifest, start_media_loading,
};
use crate::engine::assets::player_vehicle::{
    PlayerVehicle, attach_player_model, setup_player_vehicle,
};
use crate::engine::camera::chase::{spawn_chase_camera, update_chase_camera};
use crate::engine::core::app_state::{AppState, transition_to_running};
use crate::engine::scene::billboards::texture_media_billboards;
use crate::engine::scene::bindings::{NeonRegistry, RenderBindings};
use crate::engine::scene::lighting::spawn_lighting;
use crate::engine::scene::rain::{animate_rain, setup_rain};
use crate::engine::systems::fade::{apply_depth_fades, neon_flicker, shuffle_neon_colors};
use crate::engine::systems::fps_tracking::{spawn_fps_overlay, update_fps_readout};
use crate::engine::systems::simulation::{
    recycle_system, respawn_vehicles, setup_city, sync_render_transforms, traffic_system,
    viewpoint_controller,
};
use crate::sim::pools::CityPools;
use crate::sim::rng::CityRng;
use crate::sim::viewpoint::Viewpoint;
use constants::palette::hex_color;

pub fn create_app(config: SimConfig) -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(JsonAssetPlugin::<MediaManifest>::new(&["json"]))
        .init_state::<AppState>()
        .insert_resource(ClearColor(hex_color(0x060812)))
        .insert_resource(CityRng::from_seed(config.misc.rng_seed))
        .insert_resource(Viewpoint::new(&config.camera))
        .init_resource::<CityPools>()
        .init_resource::<RenderBindings>()
        .init_resource::<NeonRegistry>()
        .init_resource::<MediaCatalog>()
        .init_resource::<PlayerVehicle>()
        .insert_resource(config);

    app.add_systems(
        Startup,
        (
            setup_environment,
            setup_city,
            setup_rain,
            setup_player_vehicle,
            start_media_loading,
            spawn_fps_overlay,
        )
            .chain(),
    );

    // Loading only holds back media billboard texturing; the city runs from
    // the first frame.
    app.add_systems(
        Update,
        (poll_media_manifest, transition_to_running)
            .chain()
            .run_if(in_state(AppState::Loading)),
    )
    .add_systems(OnEnter(AppState::Running), texture_media_billboards);

    // One ordered pass per frame: move the viewpoint, move traffic, recycle
    // what fell out of the window, rebuild stale vehicles, push transforms
    // to the renderer, then restyle materials.
    app.add_systems(
        Update,
        (
            viewpoint_controller,
            traffic_system,
            recycle_system,
            respawn_vehicles,
            sync_render_transforms,
            update_chase_camera,
            apply_depth_fades,
            neon_flicker,
            shuffle_neon_colors,
            animate_rain,
            attach_player_model,
        )
            .chain(),
    );

    app.add_systems(Update, update_fps_readout);

    app
}

fn setup_environment(
    mut commands: Commands,
    config: Res<SimConfig>,
    viewpoint: Res<Viewpoint>,
) {
    spawn_lighting(&mut commands);
    spawn_chase_camera(&mut commands, &config, &viewpoint);
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(Window {
            title: "neon canyon".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
