use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use constants::palette::{NEON_COLORS, hex_color};

#[derive(Component)]
pub struct FpsReadout;

/// Corner frame-rate readout dressed like the rest of the signage: neon
/// tint on a smoked glass strip, tucked out of the skyline.
pub fn spawn_fps_overlay(mut commands: Commands) {
    let tint = hex_color(NEON_COLORS[1]).with_alpha(0.85);
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(10.0),
                left: Val::Px(10.0),
                padding: UiRect::axes(Val::Px(8.0), Val::Px(3.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.02, 0.03, 0.07, 0.6)),
        ))
        .with_children(|strip| {
            strip.spawn((
                Text::new("-- fps"),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(tint),
                FpsReadout,
            ));
        });
}

pub fn update_fps_readout(
    diagnostics: Res<DiagnosticsStore>,
    mut readouts: Query<&mut Text, With<FpsReadout>>,
) {
    let Some(fps) = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
    else {
        return;
    };
    for mut text in &mut readouts {
        text.0 = format!("{fps:>5.1} fps");
    }
}
