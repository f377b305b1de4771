pub mod appointment;
pub mod common;
pub mod otp;
pub mod verification_code;

pub use appointment::*;
pub use common::*;
pub use otp::*;
pub use verification_code::*;
