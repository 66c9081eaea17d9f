use bevy::prelude::*;
use constants::palette::hex_color;

/// Cool ambient wash plus one warm directional so unlit neon pops against
/// dimly shaded towers.
pub fn spawn_lighting(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: hex_color(0x505060),
        brightness: 400.0,
        ..default()
    });
    commands.spawn((
        DirectionalLight {
            color: hex_color(0xffaa77),
            illuminance: 3_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(5.0, 3.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
