pub mod delivery;
pub mod whatsapp;

pub use delivery::*;
pub use whatsapp::*;
