use crate::engine::assets::media_manifest::MediaCatalog;
use crate::engine::scene::batch::{BatchRole, build_batch_mesh, curved_panel_mesh};
use crate::engine::scene::bindings::{BillboardBinding, BuildingBinding, RenderBindings};
use crate::sim::billboards::{BillboardKind, BillboardPlan};
use crate::sim::pools::CityPools;
use crate::sim::windows::prune_inside;
use bevy::prelude::*;
use constants::layout::{WINDOW_QUAD_HEIGHT, WINDOW_QUAD_WIDTH};
use constants::palette::hex_color;

/// Attach one billboard to its host building. The panel is a child of the
/// building root, so every later recycle carries it along for free.
pub fn spawn_billboard(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    plan: &BillboardPlan,
    host: Entity,
) -> BillboardBinding {
    let (mesh, yaw) = match plan.kind {
        BillboardKind::Media { curved: true, .. } => (
            meshes.add(curved_panel_mesh(plan.width, plan.height, plan.width * 0.05)),
            plan.yaw,
        ),
        BillboardKind::Media { skew, .. } => {
            (meshes.add(Rectangle::new(plan.width, plan.height)), plan.yaw + skew)
        }
        BillboardKind::Neon { .. } => {
            (meshes.add(Rectangle::new(plan.width, plan.height)), plan.yaw)
        }
    };

    let (material, base_alpha, role) = match plan.kind {
        BillboardKind::Neon { color, opacity } => {
            let base_color = hex_color(color).with_alpha(opacity);
            (
                materials.add(StandardMaterial {
                    base_color,
                    unlit: true,
                    alpha_mode: AlphaMode::Add,
                    double_sided: true,
                    cull_mode: None,
                    ..default()
                }),
                opacity,
                BatchRole::Neon,
            )
        }
        // media panels start as dark placeholders until the manifest resolves
        BillboardKind::Media { .. } => (
            materials.add(StandardMaterial {
                base_color: Color::srgb(0.04, 0.05, 0.08),
                unlit: true,
                alpha_mode: AlphaMode::Blend,
                double_sided: true,
                cull_mode: None,
                ..default()
            }),
            1.0,
            BatchRole::Media,
        ),
    };

    let entity = commands
        .spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(plan.local).with_rotation(Quat::from_rotation_y(yaw)),
            role,
            ChildOf(host),
        ))
        .id();

    BillboardBinding {
        entity,
        material,
        base_alpha,
    }
}

/// Remove window instances the billboard would cover and rebuild the
/// affected batch meshes. Matching is by the explicit window batch role on
/// the binding, never by geometry identity.
pub fn prune_covered_windows(
    meshes: &mut Assets<Mesh>,
    binding: &mut BuildingBinding,
    plan: &BillboardPlan,
) {
    let (min, max) = plan.occlusion_aabb();
    let quad = Vec2::new(WINDOW_QUAD_WIDTH, WINDOW_QUAD_HEIGHT);
    for batch in &mut binding.window_batches {
        debug_assert!(matches!(
            batch.role,
            BatchRole::WindowLit | BatchRole::WindowDark
        ));
        let removed = prune_inside(
            &mut batch.instances,
            min - batch.host_offset,
            max - batch.host_offset,
        );
        if removed > 0 {
            meshes.insert(batch.mesh.id(), build_batch_mesh(quad, &batch.instances));
        }
    }
}

/// Swap placeholder media panels for textured ones once the manifest and its
/// images are in. Runs on entering the running state; failure to resolve any
/// media leaves the placeholders up, which is the designed degraded mode.
pub fn texture_media_billboards(
    mut commands: Commands,
    catalog: Res<MediaCatalog>,
    pools: Res<CityPools>,
    mut bindings: ResMut<RenderBindings>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if catalog.images.is_empty() {
        warn!("No billboard media available, keeping placeholder panels");
        return;
    }
    for (slot, binding) in pools.billboards.iter().zip(bindings.billboards.iter_mut()) {
        let BillboardKind::Media { media_index, .. } = slot.plan.kind else {
            continue;
        };
        let image = catalog.images[media_index % catalog.images.len()].clone();
        let material = materials.add(StandardMaterial {
            base_color_texture: Some(image),
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            double_sided: true,
            cull_mode: None,
            ..default()
        });
        commands
            .entity(binding.entity)
            .insert(MeshMaterial3d(material.clone()));
        binding.material = material;
        binding.base_alpha = 1.0;
    }
}
