pub struct MaterialPreset {
    pub name: &'static str,
    pub base_color: u32,
    pub roughness: f32,
    pub metalness: f32,
}

/// Surface presets for building segments. Base colors are darkened and
/// district-tinted by the generator before use.
pub const BUILDING_MATERIAL_PRESETS: &[MaterialPreset] = &[
    MaterialPreset {
        name: "dark concrete",
        base_color: 0x202025,
        roughness: 0.95,
        metalness: 0.15,
    },
    MaterialPreset {
        name: "grimy metal",
        base_color: 0x25282a,
        roughness: 0.7,
        metalness: 0.8,
    },
    MaterialPreset {
        name: "coated panel",
        base_color: 0x181818,
        roughness: 0.4,
        metalness: 0.5,
    },
    MaterialPreset {
        name: "heavy duty structure",
        base_color: 0x202228,
        roughness: 0.85,
        metalness: 0.7,
    },
    MaterialPreset {
        name: "neon steel",
        base_color: 0x2f2a32,
        roughness: 0.6,
        metalness: 0.8,
    },
    MaterialPreset {
        name: "oxidized copper",
        base_color: 0x2d3d3f,
        roughness: 0.7,
        metalness: 0.6,
    },
    MaterialPreset {
        name: "wet asphalt",
        base_color: 0x1e1f27,
        roughness: 0.9,
        metalness: 0.2,
    },
    MaterialPreset {
        name: "reflective glass",
        base_color: 0x333333,
        roughness: 0.1,
        metalness: 1.0,
    },
];

pub const TUNNEL_WALL_PRESET: MaterialPreset = MaterialPreset {
    name: "tunnel wall",
    base_color: 0x2a2a32,
    roughness: 0.6,
    metalness: 0.5,
};

pub const GREEBLE_PRESET: MaterialPreset = MaterialPreset {
    name: "greeble",
    base_color: 0x050508,
    roughness: 0.8,
    metalness: 0.4,
};

/// Every vehicle body ships in this grey regardless of kind.
pub const VEHICLE_BODY_GREY: u32 = 0x666666;
