use crate::config::{CameraConfig, CityConfig};
use crate::sim::color;
use crate::sim::neon::{NeonLayout, layout_neon_signs};
use crate::sim::windows::{WindowLayout, layout_windows};
use bevy::math::Vec3;
use constants::layout::{
    FOUNDATION_EXTRA_DEPTH, TUNNEL_CORRIDOR_HEIGHT, TUNNEL_WALL_THICKNESS, WINDOW_MARGIN,
};
use constants::materials::{BUILDING_MATERIAL_PRESETS, TUNNEL_WALL_PRESET};
use constants::palette::{DISTRICT_COLORS, PASTEL_DISTRICT_START, srgb_components};
use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingKind {
    Tower,
    Tunnel,
}

/// Silhouette style, fixed at creation for the lifetime of the building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingStyle {
    TaperedCylinder,
    MixedSegments,
    StackedBoxes,
    Pyramid,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseDimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMaterial {
    pub color: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentPrimitive {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        sides: u32,
    },
    Cone {
        radius: f32,
        height: f32,
        sides: u32,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct GreeblePlan {
    pub size: Vec3,
    pub offset: Vec3,
}

/// One stacked primitive of a building, or one wall slab of a tunnel.
/// `width`/`height`/`depth` are the primitive's bounding dimensions, which
/// window, neon and billboard placement all key off.
#[derive(Debug, Clone)]
pub struct SegmentPlan {
    pub primitive: SegmentPrimitive,
    pub offset: Vec3,
    pub material: SurfaceMaterial,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub dark: bool,
    pub windows: Option<WindowLayout>,
    pub neon: Option<NeonLayout>,
    pub greebles: Vec<GreeblePlan>,
}

#[derive(Debug, Clone)]
pub struct AntennaPlan {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub sides: u32,
    pub offset_y: f32,
    pub material: SurfaceMaterial,
}

#[derive(Debug, Clone)]
pub struct FoundationPlan {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub material: SurfaceMaterial,
    pub windows: Option<WindowLayout>,
}

/// Complete description of one building; realized once by the scene layer
/// and never regenerated, recycling only moves the result.
#[derive(Debug, Clone)]
pub struct BuildingPlan {
    pub kind: BuildingKind,
    pub style: BuildingStyle,
    pub segments: Vec<SegmentPlan>,
    pub antenna: Option<AntennaPlan>,
    pub foundation: Option<FoundationPlan>,
    pub base: BaseDimensions,
    pub district: usize,
    pub position: Vec3,
}

impl BuildingPlan {
    pub fn is_tunnel(&self) -> bool {
        self.kind == BuildingKind::Tunnel
    }
}

pub fn district_index(z: f32, district_length: f32) -> usize {
    (z.abs() / district_length).floor() as usize % DISTRICT_COLORS.len()
}

/// Generate a building at the given depth. A small fraction come out as
/// drive-through tunnels instead of towers.
pub fn generate_building(
    rng: &mut SmallRng,
    city: &CityConfig,
    camera: &CameraConfig,
    z: f32,
) -> BuildingPlan {
    if rng.random_bool(city.tunnel_building_probability) {
        generate_tunnel(rng, city, camera, z)
    } else {
        generate_tower(rng, city, camera, z)
    }
}

fn generate_tower(
    rng: &mut SmallRng,
    city: &CityConfig,
    camera: &CameraConfig,
    z: f32,
) -> BuildingPlan {
    let district = district_index(z, city.district_length);
    let district_tint = srgb_components(DISTRICT_COLORS[district]);
    let pastel = district >= PASTEL_DISTRICT_START;

    let segment_count = if pastel {
        rng.random_range(1..=2)
    } else {
        rng.random_range(2..=5)
    };

    let mut dark_segments = vec![false; segment_count];
    if rng.random_bool(city.dark_middle_probability) {
        dark_segments[segment_count / 2] = true;
    }
    for dark in dark_segments.iter_mut() {
        if rng.random_bool(city.unlit_segment_probability) {
            *dark = true;
        }
    }

    let style = match rng.random::<f32>() {
        r if r < 0.25 => BuildingStyle::TaperedCylinder,
        r if r < 0.5 => BuildingStyle::MixedSegments,
        r if r < 0.75 => BuildingStyle::StackedBoxes,
        _ => BuildingStyle::Pyramid,
    };

    let mut curr_w = rng.random::<f32>() * 70.0 + 30.0;
    let mut curr_d = rng.random::<f32>() * 70.0 + 30.0;
    let mut y_cursor = 0.0f32;
    let mut max_w = 0.0f32;
    let mut max_d = 0.0f32;
    let mut segments = Vec::with_capacity(segment_count);

    for s in 0..segment_count {
        let height = if pastel {
            rng.random::<f32>() * 120.0 + 40.0
        } else {
            rng.random::<f32>() * 180.0 + 50.0
        };
        let dark = dark_segments[s];
        let material = segment_material(rng, district_tint, pastel);

        let mut use_cylinder = false;
        if s > 0 {
            use_cylinder = match style {
                BuildingStyle::TaperedCylinder => true,
                BuildingStyle::MixedSegments => rng.random_bool(0.5),
                _ => false,
            };
        }

        let mut skip_windows = false;
        let (primitive, seg_w, seg_d);
        if s > 0 && use_cylinder && curr_w > 5.0 && curr_d > 5.0 {
            let radius = curr_w.min(curr_d) / 2.0 * (0.8 + rng.random::<f32>() * 0.2);
            let radius_bottom = radius * (0.7 + rng.random::<f32>() * 0.3);
            let sides = 12 + rng.random_range(0..12u32);
            primitive = SegmentPrimitive::Cylinder {
                radius_top: radius,
                radius_bottom,
                height,
                sides,
            };
            seg_w = radius * 2.0;
            seg_d = radius * 2.0;
            skip_windows = true;
        } else if s > 0 && style == BuildingStyle::Pyramid && s == segment_count - 1 {
            let radius = curr_w.min(curr_d) / 2.0;
            primitive = SegmentPrimitive::Cone {
                radius,
                height,
                sides: 4,
            };
            seg_w = radius * 2.0;
            seg_d = radius * 2.0;
            skip_windows = true;
        } else {
            // degenerate cylinder dimensions also land here
            primitive = SegmentPrimitive::Box {
                width: curr_w,
                height,
                depth: curr_d,
            };
            seg_w = curr_w;
            seg_d = curr_d;
        }

        // a cylinder pick that fell back to a box still skips windows
        let windows = if !use_cylinder
            && !skip_windows
            && rng.random_bool(city.window_segment_probability)
        {
            let lit_probability = if dark {
                0.0
            } else {
                city.office_light_probability
            };
            Some(layout_windows(
                rng,
                seg_w,
                height,
                seg_d,
                WINDOW_MARGIN,
                lit_probability,
            ))
        } else {
            None
        };

        let mut greebles = Vec::new();
        if s > 0 && rng.random_bool(city.greeble_density) {
            greebles = generate_greebles(rng, seg_w, seg_d, height);
        }

        let neon = layout_neon_signs(rng, seg_w, seg_d, height, !dark);

        segments.push(SegmentPlan {
            primitive,
            offset: Vec3::new(0.0, y_cursor + height / 2.0, 0.0),
            material,
            width: seg_w,
            height,
            depth: seg_d,
            dark,
            windows,
            neon,
            greebles,
        });

        y_cursor += height;
        if style == BuildingStyle::Pyramid {
            curr_w *= 0.8;
            curr_d *= 0.8;
        } else {
            curr_w *= 0.6 + rng.random::<f32>() * 0.3;
            curr_d *= 0.6 + rng.random::<f32>() * 0.3;
        }
        max_w = max_w.max(seg_w);
        max_d = max_d.max(seg_d);
    }

    let antenna = if rng.random_bool(0.4) {
        let height = rng.random::<f32>() * 50.0 + 25.0;
        Some(if rng.random::<f32>() < 0.6 {
            AntennaPlan {
                radius_top: 0.8,
                radius_bottom: 0.8,
                height,
                sides: 8,
                offset_y: y_cursor + height / 2.0,
                material: SurfaceMaterial {
                    color: srgb_components(0x777788),
                    roughness: 0.3,
                    metalness: 0.9,
                },
            }
        } else {
            AntennaPlan {
                radius_top: rng.random::<f32>() * 2.0 + 1.0,
                radius_bottom: rng.random::<f32>() * 1.5 + 0.5,
                height,
                sides: if rng.random_bool(0.5) { 4 } else { 6 },
                offset_y: y_cursor + height / 2.0,
                material: SurfaceMaterial {
                    color: srgb_components(0x555566),
                    roughness: 0.6,
                    metalness: 0.7,
                },
            }
        })
    } else {
        None
    };

    // The foundation inherits the base segment color so the seam below the
    // lowest lane reads as part of the tower.
    let base_color = segments
        .first()
        .map(|segment| segment.material.color)
        .unwrap_or(srgb_components(0x333333));
    let foundation_height = camera.base_height + FOUNDATION_EXTRA_DEPTH;
    let foundation_windows = if rng.random_bool(city.window_segment_probability) {
        Some(layout_windows(
            rng,
            max_w * 0.9,
            foundation_height,
            max_d * 0.9,
            WINDOW_MARGIN,
            city.office_light_probability,
        ))
    } else {
        None
    };
    let foundation = Some(FoundationPlan {
        width: max_w * 0.9,
        height: foundation_height,
        depth: max_d * 0.9,
        material: SurfaceMaterial {
            color: base_color,
            roughness: 0.8,
            metalness: 0.3,
        },
        windows: foundation_windows,
    });

    let side = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
    let min_x = city.corridor_width / 2.0 + max_w / 2.0 + 6.0;
    let x = side * (min_x + rng.random::<f32>() * (city.city_radius - min_x));
    let y = city.building_min_y_offset + rng.random::<f32>() * city.building_y_random_range;

    BuildingPlan {
        kind: BuildingKind::Tower,
        style,
        segments,
        antenna,
        foundation,
        base: BaseDimensions {
            width: max_w,
            height: y_cursor,
            depth: max_d,
        },
        district,
        position: Vec3::new(x, y, z),
    }
}

fn generate_tunnel(
    rng: &mut SmallRng,
    city: &CityConfig,
    camera: &CameraConfig,
    z: f32,
) -> BuildingPlan {
    let wall = TUNNEL_WALL_THICKNESS;
    let corridor_w = city.corridor_width;
    let corridor_h = TUNNEL_CORRIDOR_HEIGHT;
    let depth = rng.random::<f32>() * 400.0 + 300.0;
    let full_h = corridor_h + wall * 2.0;
    let full_w = corridor_w + wall * 2.0;

    let material = SurfaceMaterial {
        color: srgb_components(TUNNEL_WALL_PRESET.base_color),
        roughness: TUNNEL_WALL_PRESET.roughness,
        metalness: TUNNEL_WALL_PRESET.metalness,
    };

    // left, right, top, bottom slabs around the drive-through opening
    let slabs = [
        (
            Vec3::new(-(corridor_w / 2.0 + wall / 2.0), full_h / 2.0, 0.0),
            wall,
            full_h,
        ),
        (
            Vec3::new(corridor_w / 2.0 + wall / 2.0, full_h / 2.0, 0.0),
            wall,
            full_h,
        ),
        (Vec3::new(0.0, full_h - wall / 2.0, 0.0), full_w, wall),
        (Vec3::new(0.0, wall / 2.0, 0.0), full_w, wall),
    ];

    let mut segments = Vec::with_capacity(4);
    for (offset, w, h) in slabs {
        let windows = Some(layout_windows(
            rng,
            w,
            h,
            depth,
            WINDOW_MARGIN,
            city.office_light_probability,
        ));
        let neon = layout_neon_signs(rng, w, depth, h, true);
        segments.push(SegmentPlan {
            primitive: SegmentPrimitive::Box {
                width: w,
                height: h,
                depth,
            },
            offset,
            material,
            width: w,
            height: h,
            depth,
            dark: false,
            windows,
            neon,
            greebles: Vec::new(),
        });
    }

    BuildingPlan {
        kind: BuildingKind::Tunnel,
        style: BuildingStyle::StackedBoxes,
        segments,
        antenna: None,
        foundation: None,
        base: BaseDimensions {
            width: full_w,
            height: full_h,
            depth,
        },
        district: district_index(z, city.district_length),
        position: Vec3::new(0.0, tunnel_y_offset(camera.base_height), z),
    }
}

/// Vertical offset that centers the tunnel opening on the main traffic lane.
pub fn tunnel_y_offset(base_height: f32) -> f32 {
    base_height - (TUNNEL_WALL_THICKNESS + TUNNEL_CORRIDOR_HEIGHT / 2.0)
}

fn segment_material(
    rng: &mut SmallRng,
    district_tint: [f32; 3],
    pastel: bool,
) -> SurfaceMaterial {
    let preset = BUILDING_MATERIAL_PRESETS
        .choose(&mut *rng)
        .unwrap_or(&BUILDING_MATERIAL_PRESETS[0]);
    let mut base = color::scale(
        srgb_components(preset.base_color),
        0.5 + rng.random::<f32>() * 0.3,
    );
    base = color::mul(base, district_tint);
    if pastel {
        base = color::lerp(base, [1.0, 1.0, 1.0], 0.3);
    }
    SurfaceMaterial {
        color: base,
        roughness: preset.roughness * (0.8 + rng.random::<f32>() * 0.4),
        metalness: preset.metalness * (0.8 + rng.random::<f32>() * 0.4),
    }
}

fn generate_greebles(rng: &mut SmallRng, width: f32, depth: f32, height: f32) -> Vec<GreeblePlan> {
    let count = rng.random_range(2..=7);
    let mut greebles = Vec::with_capacity(count);
    for _ in 0..count {
        let gw = rng.random::<f32>() * width * 0.1 + 0.5;
        let gh = rng.random::<f32>() * height * 0.2 + 0.5;
        let gd = rng.random::<f32>() * depth * 0.1 + 0.5;
        let face = rng.random_range(0..4u8);
        let ox = (rng.random::<f32>() - 0.5) * (width - gw);
        let oy = (rng.random::<f32>() - 0.5) * (height - gh);
        let oz = (rng.random::<f32>() - 0.5) * (depth - gd);
        let offset = match face {
            0 => Vec3::new(ox, oy, depth / 2.0 + gd / 2.0 - 0.1),
            1 => Vec3::new(ox, oy, -depth / 2.0 - gd / 2.0 + 0.1),
            2 => Vec3::new(width / 2.0 + gw / 2.0 - 0.1, oy, oz),
            _ => Vec3::new(-width / 2.0 - gw / 2.0 + 0.1, oy, oz),
        };
        greebles.push(GreeblePlan {
            size: Vec3::new(gw, gh, gd),
            offset,
        });
    }
    greebles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use rand::SeedableRng;

    fn config() -> SimConfig {
        SimConfig::default()
    }

    #[test]
    fn tower_segments_stack_without_gaps() {
        let cfg = config();
        for seed in 0..24 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let plan = generate_tower(&mut rng, &cfg.city, &cfg.camera, -600.0);
            let mut y = 0.0;
            for segment in &plan.segments {
                assert!((segment.offset.y - (y + segment.height / 2.0)).abs() < 1e-3);
                y += segment.height;
            }
            assert!((plan.base.height - y).abs() < 1e-3);
        }
    }

    #[test]
    fn dark_segments_have_no_lit_windows_and_no_neon() {
        let cfg = config();
        for seed in 0..64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let plan = generate_tower(&mut rng, &cfg.city, &cfg.camera, -300.0);
            for segment in &plan.segments {
                if segment.dark {
                    assert!(segment.neon.is_none());
                    if let Some(windows) = &segment.windows {
                        assert!(windows.lit.is_empty());
                    }
                }
            }
        }
    }

    #[test]
    fn cone_and_cylinder_segments_never_get_windows() {
        let cfg = config();
        for seed in 0..64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let plan = generate_tower(&mut rng, &cfg.city, &cfg.camera, -300.0);
            for segment in &plan.segments {
                match segment.primitive {
                    SegmentPrimitive::Box { .. } => {}
                    _ => assert!(segment.windows.is_none()),
                }
            }
        }
    }

    #[test]
    fn pyramid_ends_in_a_cone_and_shrinks_by_fixed_factor() {
        let cfg = config();
        let mut seen_pyramid = false;
        for seed in 0..200 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let plan = generate_tower(&mut rng, &cfg.city, &cfg.camera, -300.0);
            if plan.style != BuildingStyle::Pyramid || plan.segments.len() < 2 {
                continue;
            }
            seen_pyramid = true;
            let last = plan.segments.last().unwrap();
            assert!(matches!(
                last.primitive,
                SegmentPrimitive::Cone { sides: 4, .. }
            ));
        }
        assert!(seen_pyramid);
    }

    #[test]
    fn tunnel_has_four_walls_centered_on_the_corridor() {
        let cfg = config();
        let mut rng = SmallRng::seed_from_u64(17);
        let plan = generate_tunnel(&mut rng, &cfg.city, &cfg.camera, -900.0);
        assert!(plan.is_tunnel());
        assert_eq!(plan.segments.len(), 4);
        assert!((plan.position.x).abs() < f32::EPSILON);
        assert!((plan.base.width - (cfg.city.corridor_width + 60.0)).abs() < 1e-3);
        assert!(plan.base.depth >= 300.0 && plan.base.depth <= 700.0);
    }

    #[test]
    fn district_index_wraps_by_depth() {
        assert_eq!(district_index(0.0, 800.0), 0);
        assert_eq!(district_index(-799.0, 800.0), 0);
        assert_eq!(district_index(-800.0, 800.0), 1);
        assert_eq!(district_index(-6400.0, 800.0), 0);
    }

    #[test]
    fn same_seed_same_building() {
        let cfg = config();
        let a = generate_building(
            &mut SmallRng::seed_from_u64(23),
            &cfg.city,
            &cfg.camera,
            -450.0,
        );
        let b = generate_building(
            &mut SmallRng::seed_from_u64(23),
            &cfg.city,
            &cfg.camera,
            -450.0,
        );
        assert_eq!(a.segments.len(), b.segments.len());
        assert_eq!(a.position, b.position);
        assert_eq!(a.base, b.base);
    }
}
