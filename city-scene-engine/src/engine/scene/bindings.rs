use crate::engine::scene::batch::BatchRole;
use crate::sim::windows::BatchInstance;
use bevy::prelude::*;

/// One material the fade controller drives, with its generation-time state
/// captured so recycling and fading can always restore the original look.
#[derive(Clone)]
pub struct FadeTarget {
    pub material: Handle<StandardMaterial>,
    pub base_color: Color,
    pub base_alpha: f32,
}

/// A spawned window batch plus the instance list it was built from, kept so
/// billboard placement can prune covered windows and rebuild the mesh.
pub struct WindowBatch {
    pub entity: Entity,
    pub mesh: Handle<Mesh>,
    pub role: BatchRole,
    /// Building-local offset of the host surface the instances are relative to.
    pub host_offset: Vec3,
    pub instances: Vec<BatchInstance>,
}

pub struct NeonBatchRef {
    pub entity: Entity,
    pub material: Handle<StandardMaterial>,
    pub segment: usize,
}

#[derive(Default)]
pub struct BuildingBinding {
    pub fade_targets: Vec<FadeTarget>,
    pub window_batches: Vec<WindowBatch>,
    pub neon: Vec<NeonBatchRef>,
}

pub struct VehicleBinding {
    pub fade_targets: Vec<FadeTarget>,
}

pub struct BillboardBinding {
    pub entity: Entity,
    pub material: Handle<StandardMaterial>,
    pub base_alpha: f32,
}

/// Render-side state for every pool slot, index-aligned with `CityPools`.
/// The simulation owns positions; this owns handles. Vehicle entries are
/// rebuilt whenever their slot respawns.
#[derive(Resource, Default)]
pub struct RenderBindings {
    pub buildings: Vec<BuildingBinding>,
    pub cars_z: Vec<Option<VehicleBinding>>,
    pub cars_x: Vec<Option<VehicleBinding>>,
    pub billboards: Vec<BillboardBinding>,
}

/// Process-wide list of live neon batches, consumed by the periodic color
/// shuffle. Registered once at spawn; batches live as long as their host
/// building, which is forever.
#[derive(Resource, Default)]
pub struct NeonRegistry {
    pub batches: Vec<RegisteredNeon>,
    pub last_shuffle: f32,
}

pub struct RegisteredNeon {
    pub entity: Entity,
    pub material: Handle<StandardMaterial>,
}

impl NeonRegistry {
    pub fn register(&mut self, entity: Entity, material: Handle<StandardMaterial>) {
        self.batches.push(RegisteredNeon { entity, material });
    }
}
