/// Office window quad size in world units.
pub const WINDOW_QUAD_WIDTH: f32 = 2.0;
pub const WINDOW_QUAD_HEIGHT: f32 = 1.5;

/// Window grid spacing across a building face.
pub const WINDOW_SPACING_X: f32 = 5.0;
pub const WINDOW_SPACING_Y: f32 = 4.0;

/// Margin so windows start close to the segment edges.
pub const WINDOW_MARGIN: f32 = 1.0;

/// Surface offsets that keep quads clear of z-fighting with their host face.
pub const WINDOW_FACE_OFFSET: f32 = 0.1;
pub const NEON_FACE_OFFSET: f32 = 0.12;
pub const BILLBOARD_FACE_OFFSET: f32 = 0.05;

pub const COMMERCIAL_ASPECT_RATIO: f32 = 2.0 / 3.0;

pub const TUNNEL_WALL_THICKNESS: f32 = 30.0;
pub const TUNNEL_CORRIDOR_HEIGHT: f32 = 280.0;

/// How far building foundations extend below the lowest traffic lane.
pub const FOUNDATION_EXTRA_DEPTH: f32 = 300.0;
