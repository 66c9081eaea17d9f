//! Pure simulation core: entity pools, procedural plans, the visibility
//! window manager, traffic integration and fade math. Everything here is
//! deterministic given a seeded RNG and touches no render state beyond the
//! `Entity` ids the scene layer hands back.
pub mod billboards;
pub mod buildings;
pub mod color;
pub mod fade;
pub mod neon;
pub mod pools;
pub mod recycle;
pub mod rng;
pub mod traffic;
pub mod vehicles;
pub mod viewpoint;
pub mod windows;
