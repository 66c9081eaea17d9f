use crate::sim::windows::BatchInstance;
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use std::f32::consts::PI;

/// What a batched quad mesh represents. Downstream passes (billboard window
/// pruning, flicker, media texturing) branch on this tag instead of
/// comparing geometry handles.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchRole {
    WindowLit,
    WindowDark,
    Neon,
    Media,
}

/// Merge many oriented quads into a single mesh so a whole window grid or
/// neon set is one renderable. `quad` is the base quad size; each instance
/// scales it and orients it about Y.
pub fn build_batch_mesh(quad: Vec2, instances: &[BatchInstance]) -> Mesh {
    let mut positions = Vec::with_capacity(instances.len() * 4);
    let mut normals = Vec::with_capacity(instances.len() * 4);
    let mut uvs = Vec::with_capacity(instances.len() * 4);
    let mut indices = Vec::with_capacity(instances.len() * 6);

    for (index, instance) in instances.iter().enumerate() {
        let rotation = Quat::from_rotation_y(instance.yaw);
        let half_w = quad.x * instance.scale.x / 2.0;
        let half_h = quad.y * instance.scale.y / 2.0;
        let corners = [
            Vec3::new(-half_w, -half_h, 0.0),
            Vec3::new(half_w, -half_h, 0.0),
            Vec3::new(half_w, half_h, 0.0),
            Vec3::new(-half_w, half_h, 0.0),
        ];
        let normal = (rotation * Vec3::Z).to_array();
        for corner in corners {
            positions.push((instance.translation + rotation * corner).to_array());
            normals.push(normal);
        }
        uvs.extend([[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]);
        let base = (index * 4) as u32;
        indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Advert panel twisted into a shallow S along its width, the way large
/// hoardings wrap around a corner of their host.
pub fn curved_panel_mesh(width: f32, height: f32, depth: f32) -> Mesh {
    let segments = 20usize;
    let mut positions = Vec::with_capacity((segments + 1) * 2);
    let mut normals = Vec::with_capacity((segments + 1) * 2);
    let mut uvs = Vec::with_capacity((segments + 1) * 2);
    let mut indices = Vec::with_capacity(segments * 6);

    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let x = -width / 2.0 + t * width;
        let z = ((x / width) * PI).sin() * depth;
        for (y, v) in [(-height / 2.0, 1.0), (height / 2.0, 0.0)] {
            positions.push([x, y, z]);
            normals.push([0.0, 0.0, 1.0]);
            uvs.push([t, v]);
        }
    }
    for i in 0..segments as u32 {
        let base = i * 2;
        indices.extend([base, base + 2, base + 3, base, base + 3, base + 1]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}
