pub mod layout;
pub mod materials;
pub mod palette;
