pub mod appointment_service;
pub mod verification_service;

pub use appointment_service::*;
pub use verification_service::*;
