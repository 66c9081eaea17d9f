pub mod batch;
pub mod billboards;
pub mod bindings;
pub mod building_spawner;
pub mod lighting;
pub mod rain;
pub mod vehicle_spawner;
