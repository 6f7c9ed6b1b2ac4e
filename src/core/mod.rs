
pub mod config;
pub mod error;
pub mod pos;

pub use config::DetectionConfig;
pub use error::{DetectionError, Result};
pub use pos::{PosClass, PosTag};
