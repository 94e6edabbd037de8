pub mod settings;
pub mod statistics;

pub use settings::*;
pub use statistics::*;
