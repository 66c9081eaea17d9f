use bevy::prelude::*;

/// Emissive sign colors shared by neon batches, billboards and vehicle
/// thrusters.
pub const NEON_COLORS: &[u32] = &[
    0xff4400, 0x00aaff, 0xffdd33, 0xff2222, 0xcc00ff, 0x00dd88, 0xeeeeff, 0x00ff66, 0xff00ff,
    0x00ffff, 0xff8800,
];

/// Depth-zone tints applied to building materials at generation time.
/// Indices at or past PASTEL_DISTRICT_START are pastel zones with shorter,
/// whiter towers.
pub const DISTRICT_COLORS: &[u32] = &[
    0x222233, 0x332222, 0x223322, 0x333333, 0xfaa0c8, 0xa0c8fa, 0xfca0a0, 0xa0fca0,
];

pub const PASTEL_DISTRICT_START: usize = 4;

/// Lit office-window colors; one is drawn per window batch.
pub const WINDOW_LIT_COLORS: &[u32] = &[0x99ccff, 0xff9933, 0xff99cc, 0xffeeaa];

pub const WINDOW_DARK_COLOR: u32 = 0x000000;

pub const RAIN_COLOR: u32 = 0x667788;

/// Split a 0xRRGGBB value into sRGB float components.
pub fn srgb_components(rgb: u32) -> [f32; 3] {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
    ]
}

pub fn hex_color(rgb: u32) -> Color {
    let [r, g, b] = srgb_components(rgb);
    Color::srgb(r, g, b)
}
