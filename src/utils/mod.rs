pub mod error;
pub mod math;

pub use error::SandboxError;
pub use math::Oscillator;
