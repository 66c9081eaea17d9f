use bevy::prelude::*;
use serde::Deserialize;

/// Simulation tunables, one section per subsystem. Mirrors the JSON config
/// exactly; a config file with any field missing is rejected at startup
/// rather than patched over, since every later system assumes presence.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    pub city: CityConfig,
    pub traffic_z: TrafficZConfig,
    pub traffic_x: TrafficXConfig,
    pub camera: CameraConfig,
    pub effects: EffectsConfig,
    pub misc: MiscConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CityConfig {
    pub num_buildings: usize,
    pub city_radius: f32,
    pub corridor_width: f32,
    pub building_min_y_offset: f32,
    pub building_y_random_range: f32,
    pub greeble_density: f64,
    pub district_length: f32,
    pub tunnel_building_probability: f64,
    pub dark_middle_probability: f64,
    pub office_light_probability: f64,
    pub unlit_segment_probability: f64,
    pub window_segment_probability: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrafficZConfig {
    pub num_cars: usize,
    pub speed_min: f32,
    pub speed_max: f32,
    pub truck_probability: f64,
    pub car_types: Vec<String>,
    pub y_spread_around_camera: f32,
    pub lane_vertical_separation: f32,
    pub lane_y_spread_factor: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrafficXConfig {
    pub num_junctions: usize,
    pub cars_per_junction: usize,
    pub junction_z_offsets: Vec<f32>,
    pub junction_x_travel_width: f32,
    pub junction_z_depth_variation: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub truck_probability: f64,
    pub car_types: Vec<String>,
    pub base_y_offset_from_z_traffic: f32,
    pub lane_vertical_separation: f32,
    pub lane_y_spread_factor: f32,
    pub y_spread_in_junction: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraConfig {
    pub forward_speed: f32,
    pub base_height: f32,
    pub x_pos_lerp_factor: f32,
    pub x_target_lerp_factor: f32,
    pub sway_amplitude: f32,
    pub sway_frequency: f32,
    pub min_lead_distance: f32,
    pub max_lead_distance: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EffectsConfig {
    pub bloom_strength: f32,
    pub bloom_threshold: f32,
    pub enable_rain: bool,
    pub rain_count: usize,
    pub rain_speed: f32,
    pub rain_particle_size: f32,
    pub rain_cull_distance_z: f32,
    pub rain_recycle_min_z_offset: f32,
    pub rain_max_opacity: f32,
    pub rain_min_opacity_factor: f32,
    pub rain_fade_period: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MiscConfig {
    pub visible_depth: f32,
    pub spawn_padding: f32,
    pub enable_flicker: bool,
    pub neon_shuffle_interval: f32,
    pub rng_seed: Option<u64>,
    pub player_vehicle_model: Option<String>,
    pub media_manifest: String,
}

impl SimConfig {
    /// Load the config JSON from disk. A missing file falls back to the
    /// compiled-in defaults; a present but incomplete or malformed file is a
    /// startup error.
    pub fn load(path: &str) -> Result<SimConfig, Box<dyn std::error::Error>> {
        if !std::path::Path::new(path).exists() {
            println!("No config at {path}, using built-in defaults");
            return Ok(SimConfig::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config: SimConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Cross-field checks serde cannot express. Runs once before the app is
    /// built; any failure aborts startup.
    pub fn validate(&self) -> Result<(), String> {
        if self.misc.visible_depth <= 0.0 {
            return Err("misc.visible_depth must be positive".into());
        }
        if self.misc.spawn_padding < 0.0 {
            return Err("misc.spawn_padding must not be negative".into());
        }
        if self.traffic_x.junction_z_offsets.len() < self.traffic_x.num_junctions {
            return Err(format!(
                "traffic_x.junction_z_offsets has {} entries but num_junctions is {}",
                self.traffic_x.junction_z_offsets.len(),
                self.traffic_x.num_junctions
            ));
        }
        for name in self
            .traffic_z
            .car_types
            .iter()
            .chain(self.traffic_x.car_types.iter())
        {
            if crate::sim::vehicles::VehicleKind::parse(name).is_none() {
                return Err(format!("unknown vehicle kind {name:?} in car_types"));
            }
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            city: CityConfig {
                num_buildings: 150,
                city_radius: 700.0,
                corridor_width: 120.0,
                building_min_y_offset: 0.0,
                building_y_random_range: 120.0,
                greeble_density: 0.1,
                district_length: 800.0,
                tunnel_building_probability: 0.03,
                dark_middle_probability: 0.4,
                office_light_probability: 0.05,
                unlit_segment_probability: 0.5,
                window_segment_probability: 0.7,
            },
            traffic_z: TrafficZConfig {
                num_cars: 80,
                speed_min: 30.0,
                speed_max: 90.0,
                truck_probability: 0.15,
                car_types: vec![
                    "normal".into(),
                    "van".into(),
                    "sporty".into(),
                    "bus".into(),
                    "hover".into(),
                    "suv".into(),
                    "police".into(),
                ],
                y_spread_around_camera: 40.0,
                lane_vertical_separation: 60.0,
                lane_y_spread_factor: 0.4,
            },
            traffic_x: TrafficXConfig {
                num_junctions: 3,
                cars_per_junction: 8,
                junction_z_offsets: vec![-200.0, -450.0, -700.0],
                junction_x_travel_width: 1000.0,
                junction_z_depth_variation: 30.0,
                speed_min: 35.0,
                speed_max: 80.0,
                truck_probability: 0.1,
                car_types: vec![
                    "normal".into(),
                    "van".into(),
                    "sporty".into(),
                    "hover".into(),
                    "suv".into(),
                    "police".into(),
                ],
                base_y_offset_from_z_traffic: -70.0,
                lane_vertical_separation: 30.0,
                lane_y_spread_factor: 0.3,
                y_spread_in_junction: 20.0,
            },
            camera: CameraConfig {
                forward_speed: 39.0,
                base_height: 450.0,
                x_pos_lerp_factor: 0.008,
                x_target_lerp_factor: 0.02,
                sway_amplitude: 4.0,
                sway_frequency: 0.2,
                min_lead_distance: 30.0,
                max_lead_distance: 250.0,
            },
            effects: EffectsConfig {
                bloom_strength: 1.5,
                bloom_threshold: 0.3,
                enable_rain: false,
                rain_count: 400,
                rain_speed: 330.0,
                rain_particle_size: 0.08,
                rain_cull_distance_z: 20.0,
                rain_recycle_min_z_offset: 50.0,
                rain_max_opacity: 0.25,
                rain_min_opacity_factor: 0.1,
                rain_fade_period: 0.0,
            },
            misc: MiscConfig {
                visible_depth: 1200.0,
                spawn_padding: 400.0,
                enable_flicker: true,
                neon_shuffle_interval: 8.0,
                rng_seed: None,
                player_vehicle_model: None,
                media_manifest: "billboard_media.json".into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_json_round_trips() {
        let text = r#"{
            "city": {
                "num_buildings": 10, "city_radius": 700.0, "corridor_width": 120.0,
                "building_min_y_offset": 0.0, "building_y_random_range": 120.0,
                "greeble_density": 0.1, "district_length": 800.0,
                "tunnel_building_probability": 0.03, "dark_middle_probability": 0.4,
                "office_light_probability": 0.05, "unlit_segment_probability": 0.5,
                "window_segment_probability": 0.7
            },
            "traffic_z": {
                "num_cars": 8, "speed_min": 30.0, "speed_max": 90.0,
                "truck_probability": 0.15, "car_types": ["normal"],
                "y_spread_around_camera": 40.0, "lane_vertical_separation": 60.0,
                "lane_y_spread_factor": 0.4
            },
            "traffic_x": {
                "num_junctions": 1, "cars_per_junction": 2,
                "junction_z_offsets": [-200.0], "junction_x_travel_width": 1000.0,
                "junction_z_depth_variation": 30.0, "speed_min": 35.0,
                "speed_max": 80.0, "truck_probability": 0.1, "car_types": ["normal"],
                "base_y_offset_from_z_traffic": -70.0,
                "lane_vertical_separation": 30.0, "lane_y_spread_factor": 0.3,
                "y_spread_in_junction": 20.0
            },
            "camera": {
                "forward_speed": 39.0, "base_height": 450.0,
                "x_pos_lerp_factor": 0.008, "x_target_lerp_factor": 0.02,
                "sway_amplitude": 4.0, "sway_frequency": 0.2,
                "min_lead_distance": 30.0, "max_lead_distance": 250.0
            },
            "effects": {
                "bloom_strength": 1.5, "bloom_threshold": 0.3, "enable_rain": false,
                "rain_count": 400, "rain_speed": 330.0, "rain_particle_size": 0.08,
                "rain_cull_distance_z": 20.0, "rain_recycle_min_z_offset": 50.0,
                "rain_max_opacity": 0.25, "rain_min_opacity_factor": 0.1,
                "rain_fade_period": 0.0
            },
            "misc": {
                "visible_depth": 1200.0, "spawn_padding": 400.0,
                "enable_flicker": true, "neon_shuffle_interval": 8.0,
                "rng_seed": 7, "player_vehicle_model": null,
                "media_manifest": "billboard_media.json"
            }
        }"#;
        let config: SimConfig = serde_json::from_str(text).expect("parse");
        assert_eq!(config.city.num_buildings, 10);
        assert_eq!(config.misc.rng_seed, Some(7));
    }

    #[test]
    fn missing_tunable_is_rejected() {
        // traffic_z.speed_max absent
        let text = r#"{
            "city": {
                "num_buildings": 10, "city_radius": 700.0, "corridor_width": 120.0,
                "building_min_y_offset": 0.0, "building_y_random_range": 120.0,
                "greeble_density": 0.1, "district_length": 800.0,
                "tunnel_building_probability": 0.03, "dark_middle_probability": 0.4,
                "office_light_probability": 0.05, "unlit_segment_probability": 0.5,
                "window_segment_probability": 0.7
            },
            "traffic_z": { "num_cars": 8, "speed_min": 30.0 }
        }"#;
        assert!(serde_json::from_str::<SimConfig>(text).is_err());
    }

    #[test]
    fn validate_rejects_unknown_vehicle_kinds() {
        assert!(SimConfig::default().validate().is_ok());
        let mut config = SimConfig::default();
        config.traffic_z.car_types.push("zeppelin".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_short_junction_offset_list() {
        let mut config = SimConfig::default();
        config.traffic_x.num_junctions = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut value = default_json();
        value["city"]["mystery_knob"] = serde_json::json!(1.0);
        let text = value.to_string();
        assert!(serde_json::from_str::<SimConfig>(&text).is_err());
    }

    // Serialize-shaped snapshot of the defaults, since SimConfig itself only
    // derives Deserialize.
    fn default_json() -> serde_json::Value {
        let d = SimConfig::default();
        serde_json::json!({
            "city": {
                "num_buildings": d.city.num_buildings,
                "city_radius": d.city.city_radius,
                "corridor_width": d.city.corridor_width,
                "building_min_y_offset": d.city.building_min_y_offset,
                "building_y_random_range": d.city.building_y_random_range,
                "greeble_density": d.city.greeble_density,
                "district_length": d.city.district_length,
                "tunnel_building_probability": d.city.tunnel_building_probability,
                "dark_middle_probability": d.city.dark_middle_probability,
                "office_light_probability": d.city.office_light_probability,
                "unlit_segment_probability": d.city.unlit_segment_probability,
                "window_segment_probability": d.city.window_segment_probability
            },
            "traffic_z": {
                "num_cars": d.traffic_z.num_cars,
                "speed_min": d.traffic_z.speed_min,
                "speed_max": d.traffic_z.speed_max,
                "truck_probability": d.traffic_z.truck_probability,
                "car_types": d.traffic_z.car_types,
                "y_spread_around_camera": d.traffic_z.y_spread_around_camera,
                "lane_vertical_separation": d.traffic_z.lane_vertical_separation,
                "lane_y_spread_factor": d.traffic_z.lane_y_spread_factor
            },
            "traffic_x": {
                "num_junctions": d.traffic_x.num_junctions,
                "cars_per_junction": d.traffic_x.cars_per_junction,
                "junction_z_offsets": d.traffic_x.junction_z_offsets,
                "junction_x_travel_width": d.traffic_x.junction_x_travel_width,
                "junction_z_depth_variation": d.traffic_x.junction_z_depth_variation,
                "speed_min": d.traffic_x.speed_min,
                "speed_max": d.traffic_x.speed_max,
                "truck_probability": d.traffic_x.truck_probability,
                "car_types": d.traffic_x.car_types,
                "base_y_offset_from_z_traffic": d.traffic_x.base_y_offset_from_z_traffic,
                "lane_vertical_separation": d.traffic_x.lane_vertical_separation,
                "lane_y_spread_factor": d.traffic_x.lane_y_spread_factor,
                "y_spread_in_junction": d.traffic_x.y_spread_in_junction
            },
            "camera": {
                "forward_speed": d.camera.forward_speed,
                "base_height": d.camera.base_height,
                "x_pos_lerp_factor": d.camera.x_pos_lerp_factor,
                "x_target_lerp_factor": d.camera.x_target_lerp_factor,
                "sway_amplitude": d.camera.sway_amplitude,
                "sway_frequency": d.camera.sway_frequency,
                "min_lead_distance": d.camera.min_lead_distance,
                "max_lead_distance": d.camera.max_lead_distance
            },
            "effects": {
                "bloom_strength": d.effects.bloom_strength,
                "bloom_threshold": d.effects.bloom_threshold,
                "enable_rain": d.effects.enable_rain,
                "rain_count": d.effects.rain_count,
                "rain_speed": d.effects.rain_speed,
                "rain_particle_size": d.effects.rain_particle_size,
                "rain_cull_distance_z": d.effects.rain_cull_distance_z,
                "rain_recycle_min_z_offset": d.effects.rain_recycle_min_z_offset,
                "rain_max_opacity": d.effects.rain_max_opacity,
                "rain_min_opacity_factor": d.effects.rain_min_opacity_factor,
                "rain_fade_period": d.effects.rain_fade_period
            },
            "misc": {
                "visible_depth": d.misc.visible_depth,
                "spawn_padding": d.misc.spawn_padding,
                "enable_flicker": d.misc.enable_flicker,
                "neon_shuffle_interval": d.misc.neon_shuffle_interval,
                "rng_seed": d.misc.rng_seed,
                "player_vehicle_model": d.misc.player_vehicle_model,
                "media_manifest": d.misc.media_manifest
            }
        })
    }
}
