pub mod analysis;
pub mod error;
pub mod loader;
pub mod model;
pub mod prompt;
pub mod utils;
