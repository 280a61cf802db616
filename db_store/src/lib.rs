mod error;
mod settings;

pub use error::{Error, Result};
pub use settings::Settings;
