use crate::config::SimConfig;
use bevy::asset::LoadState;
use bevy::prelude::*;
use serde::Deserialize;

/// JSON asset listing the advert images media billboards may show.
/// Mirrors the file structure exactly.
#[derive(Asset, TypePath, Debug, Clone, Deserialize)]
pub struct MediaManifest {
    pub images: Vec<String>,
}

/// Tracks manifest loading. `resolved` flips on success or failure alike;
/// an unreachable manifest just means billboards stay on placeholders.
#[derive(Resource, Default)]
pub struct MediaCatalog {
    pub manifest: Option<Handle<MediaManifest>>,
    pub images: Vec<Handle<Image>>,
    pub resolved: bool,
}

pub fn start_media_loading(
    mut catalog: ResMut<MediaCatalog>,
    asset_server: Res<AssetServer>,
    config: Res<SimConfig>,
) {
    info!("Loading media manifest from {}", config.misc.media_manifest);
    catalog.manifest = Some(asset_server.load(config.misc.media_manifest.as_str()));
}

/// Poll the manifest each frame of the loading state and fan out image
/// loads once it lands.
pub fn poll_media_manifest(
    mut catalog: ResMut<MediaCatalog>,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<MediaManifest>>,
) {
    if catalog.resolved {
        return;
    }
    let Some(handle) = catalog.manifest.clone() else {
        return;
    };
    match asset_server.get_load_state(&handle) {
        Some(LoadState::Loaded) => {
            if let Some(manifest) = manifests.get(&handle) {
                info!("Media manifest lists {} images", manifest.images.len());
                catalog.images = manifest
                    .images
                    .iter()
                    .map(|path| asset_server.load(path.as_str()))
                    .collect();
                catalog.resolved = true;
            }
        }
        Some(LoadState::Failed(_)) => {
            warn!("Media manifest failed to load, billboards keep placeholders");
            catalog.resolved = true;
        }
        _ => {}
    }
}
