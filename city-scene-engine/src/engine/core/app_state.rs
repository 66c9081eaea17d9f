use crate::engine::assets::media_manifest::MediaCatalog;
use bevy::prelude::*;

/// The simulation itself never waits on assets; Loading only gates the
/// systems that texture media billboards from the manifest.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

pub fn transition_to_running(
    catalog: Res<MediaCatalog>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if catalog.resolved {
        info!("Media manifest resolved, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}
