pub mod api;
mod check_in;
mod error;
pub mod pagination;
pub mod payload;
pub mod resource;
pub mod seeder;
pub mod server;
pub mod settings;
pub mod store;
pub mod telemetry;
pub mod ui;
pub mod validation;

pub use check_in::{CheckIn, NewCheckIn};
pub use error::{Error, Result};
pub use store::{CheckInStore, MemoryStore};
