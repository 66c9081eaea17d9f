use crate::engine::scene::bindings::{FadeTarget, VehicleBinding};
use crate::engine::scene::building_spawner::standard_material;
use crate::sim::vehicles::{PartShape, VehiclePlan};
use bevy::prelude::*;

/// Realize a vehicle plan at a position. Unlike buildings these come and go:
/// the corridor recycler despawns the old hierarchy and calls this again
/// whenever a slot rolls a new body style.
pub fn spawn_vehicle(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    plan: &VehiclePlan,
    position: Vec3,
    yaw: f32,
) -> (Entity, VehicleBinding) {
    let mut fade_targets = Vec::new();
    let root = commands
        .spawn((
            Transform::from_translation(position).with_rotation(Quat::from_rotation_y(yaw)),
            Visibility::default(),
        ))
        .id();

    for part in &plan.parts {
        let material = materials.add(standard_material(&part.material));
        fade_targets.push(FadeTarget {
            material: material.clone(),
            base_color: Color::srgb(
                part.material.color[0],
                part.material.color[1],
                part.material.color[2],
            ),
            base_alpha: 1.0,
        });
        commands.spawn((
            Mesh3d(part_mesh(meshes, &part.shape)),
            MeshMaterial3d(material),
            Transform::from_translation(part.offset).with_rotation(part.rotation),
            ChildOf(root),
        ));
    }

    for lamp in &plan.lamps {
        let base_color = Color::srgb(lamp.color[0], lamp.color[1], lamp.color[2]);
        let material = materials.add(StandardMaterial {
            base_color,
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            ..default()
        });
        fade_targets.push(FadeTarget {
            material: material.clone(),
            base_color,
            base_alpha: 1.0,
        });
        commands.spawn((
            Mesh3d(part_mesh(meshes, &lamp.shape)),
            MeshMaterial3d(material),
            Transform::from_translation(lamp.offset),
            ChildOf(root),
        ));
    }

    (root, VehicleBinding { fade_targets })
}

fn part_mesh(meshes: &mut Assets<Mesh>, shape: &PartShape) -> Handle<Mesh> {
    match *shape {
        PartShape::Box(size) => meshes.add(Cuboid::new(size.x, size.y, size.z)),
        PartShape::Cylinder { radius, height } => meshes.add(Cylinder::new(radius, height)),
        PartShape::Sphere(radius) => meshes.add(Sphere::new(radius)),
    }
}
