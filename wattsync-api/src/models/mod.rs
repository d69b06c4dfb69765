mod device;
mod settings;

pub use device::*;
pub use settings::*;

pub type Id = i32;
