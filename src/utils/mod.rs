pub mod clock;
pub mod code_generator;
pub mod keyed_lock;

pub use clock::*;
pub use code_generator::generate_six_digit_code;
pub use keyed_lock::*;
