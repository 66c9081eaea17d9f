use crate::engine::scene::batch::{BatchRole, build_batch_mesh};
use crate::engine::scene::bindings::{
    BuildingBinding, FadeTarget, NeonBatchRef, NeonRegistry, WindowBatch,
};
use crate::sim::buildings::{BuildingPlan, SegmentPrimitive, SurfaceMaterial};
use crate::sim::color;
use crate::sim::neon::NeonLayout;
use crate::sim::windows::WindowLayout;
use bevy::prelude::*;
use constants::layout::{WINDOW_QUAD_HEIGHT, WINDOW_QUAD_WIDTH};
use constants::materials::GREEBLE_PRESET;
use constants::palette::{WINDOW_DARK_COLOR, hex_color, srgb_components};

/// Realize a building plan as a renderable hierarchy. Returns the root
/// entity and the binding that tracks every material the fade controller
/// and billboard placement will touch. Called once per pool slot; recycling
/// never comes back here.
pub fn spawn_building(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    registry: &mut NeonRegistry,
    plan: &BuildingPlan,
) -> (Entity, BuildingBinding) {
    let mut binding = BuildingBinding::default();
    let root = commands
        .spawn((
            Transform::from_translation(plan.position),
            Visibility::default(),
        ))
        .id();

    let mut greeble_material: Option<Handle<StandardMaterial>> = None;

    for (segment_index, segment) in plan.segments.iter().enumerate() {
        let mesh = segment_mesh(meshes, &segment.primitive);
        let material = materials.add(standard_material(&segment.material));
        push_fade_target(&mut binding.fade_targets, &material, &segment.material);
        let segment_entity = commands
            .spawn((
                Mesh3d(mesh),
                MeshMaterial3d(material),
                Transform::from_translation(segment.offset),
                ChildOf(root),
            ))
            .id();

        if let Some(windows) = &segment.windows {
            spawn_window_batches(
                commands,
                meshes,
                materials,
                &mut binding,
                segment_entity,
                segment.offset,
                windows,
            );
        }

        if let Some(neon) = &segment.neon {
            spawn_neon_batch(
                commands,
                meshes,
                materials,
                registry,
                &mut binding,
                segment_entity,
                segment_index,
                neon,
            );
        }

        if !segment.greebles.is_empty() {
            let material = greeble_material
                .get_or_insert_with(|| {
                    let surface = SurfaceMaterial {
                        color: srgb_components(GREEBLE_PRESET.base_color),
                        roughness: GREEBLE_PRESET.roughness,
                        metalness: GREEBLE_PRESET.metalness,
                    };
                    let handle = materials.add(standard_material(&surface));
                    push_fade_target(&mut binding.fade_targets, &handle, &surface);
                    handle
                })
                .clone();
            for greeble in &segment.greebles {
                commands.spawn((
                    Mesh3d(meshes.add(Cuboid::new(
                        greeble.size.x,
                        greeble.size.y,
                        greeble.size.z,
                    ))),
                    MeshMaterial3d(material.clone()),
                    Transform::from_translation(greeble.offset),
                    ChildOf(segment_entity),
                ));
            }
        }
    }

    if let Some(antenna) = &plan.antenna {
        let material = materials.add(standard_material(&antenna.material));
        push_fade_target(&mut binding.fade_targets, &material, &antenna.material);
        commands.spawn((
            Mesh3d(meshes.add(
                ConicalFrustum {
                    radius_top: antenna.radius_top,
                    radius_bottom: antenna.radius_bottom,
                    height: antenna.height,
                }
                .mesh()
                .resolution(antenna.sides),
            )),
            MeshMaterial3d(material),
            Transform::from_xyz(0.0, antenna.offset_y, 0.0),
            ChildOf(root),
        ));
    }

    if let Some(foundation) = &plan.foundation {
        let material = materials.add(standard_material(&foundation.material));
        push_fade_target(&mut binding.fade_targets, &material, &foundation.material);
        let offset = Vec3::new(0.0, -foundation.height / 2.0, 0.0);
        let entity = commands
            .spawn((
                Mesh3d(meshes.add(Cuboid::new(
                    foundation.width,
                    foundation.height,
                    foundation.depth,
                ))),
                MeshMaterial3d(material),
                Transform::from_translation(offset),
                ChildOf(root),
            ))
            .id();
        if let Some(windows) = &foundation.windows {
            spawn_window_batches(
                commands, meshes, materials, &mut binding, entity, offset, windows,
            );
        }
    }

    (root, binding)
}

/// Attach the neon batch for one host surface and register it for the
/// periodic color shuffle. Dark surfaces simply carry no layout, so a
/// building's neon footprint is settled at generation time and recycling
/// only ever moves it.
fn spawn_neon_batch(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    registry: &mut NeonRegistry,
    binding: &mut BuildingBinding,
    host: Entity,
    segment_index: usize,
    layout: &NeonLayout,
) {
    let lit = color::scale(srgb_components(layout.color), layout.intensity);
    let base_color = Color::srgb(lit[0], lit[1], lit[2]).with_alpha(layout.opacity);
    let material = materials.add(StandardMaterial {
        base_color,
        unlit: true,
        alpha_mode: AlphaMode::Add,
        double_sided: true,
        cull_mode: None,
        ..default()
    });
    let entity = commands
        .spawn((
            Mesh3d(meshes.add(build_batch_mesh(Vec2::ONE, &layout.instances))),
            MeshMaterial3d(material.clone()),
            Transform::IDENTITY,
            BatchRole::Neon,
            ChildOf(host),
        ))
        .id();
    registry.register(entity, material.clone());
    binding.neon.push(NeonBatchRef {
        entity,
        material: material.clone(),
        segment: segment_index,
    });
    binding.fade_targets.push(FadeTarget {
        material,
        base_color,
        base_alpha: layout.opacity,
    });
}

fn spawn_window_batches(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    binding: &mut BuildingBinding,
    host: Entity,
    host_offset: Vec3,
    layout: &WindowLayout,
) {
    let quad = Vec2::new(WINDOW_QUAD_WIDTH, WINDOW_QUAD_HEIGHT);
    let groups = [
        (&layout.lit, BatchRole::WindowLit, hex_color(layout.lit_color)),
        (
            &layout.dark,
            BatchRole::WindowDark,
            hex_color(WINDOW_DARK_COLOR),
        ),
    ];
    for (instances, role, base_color) in groups {
        if instances.is_empty() {
            continue;
        }
        let mesh = meshes.add(build_batch_mesh(quad, instances));
        let material = materials.add(StandardMaterial {
            base_color,
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            ..default()
        });
        let entity = commands
            .spawn((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::IDENTITY,
                role,
                ChildOf(host),
            ))
            .id();
        binding.fade_targets.push(FadeTarget {
            material,
            base_color,
            base_alpha: 1.0,
        });
        binding.window_batches.push(WindowBatch {
            entity,
            mesh,
            role,
            host_offset,
            instances: instances.clone(),
        });
    }
}

pub(crate) fn standard_material(surface: &SurfaceMaterial) -> StandardMaterial {
    StandardMaterial {
        base_color: Color::srgb(surface.color[0], surface.color[1], surface.color[2]),
        perceptual_roughness: surface.roughness.clamp(0.089, 1.0),
        metallic: surface.metalness.clamp(0.0, 1.0),
        alpha_mode: AlphaMode::Blend,
        ..default()
    }
}

fn push_fade_target(
    targets: &mut Vec<FadeTarget>,
    handle: &Handle<StandardMaterial>,
    surface: &SurfaceMaterial,
) {
    targets.push(FadeTarget {
        material: handle.clone(),
        base_color: Color::srgb(surface.color[0], surface.color[1], surface.color[2]),
        base_alpha: 1.0,
    });
}

fn segment_mesh(meshes: &mut Assets<Mesh>, primitive: &SegmentPrimitive) -> Handle<Mesh> {
    match *primitive {
        SegmentPrimitive::Box {
            width,
            height,
            depth,
        } => meshes.add(Cuboid::new(width, height, depth)),
        SegmentPrimitive::Cylinder {
            radius_top,
            radius_bottom,
            height,
            sides,
        } => meshes.add(
            ConicalFrustum {
                radius_top,
                radius_bottom,
                height,
            }
            .mesh()
            .resolution(sides),
        ),
        SegmentPrimitive::Cone {
            radius,
            height,
            sides,
        } => meshes.add(Cone { radius, height }.mesh().resolution(sides)),
    }
}
