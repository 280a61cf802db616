mod memory;
mod postgres;

pub use memory::MemoryStore;

use crate::{CheckIn, NewCheckIn, Result};
use async_trait::async_trait;

/// Persistence for check-in records.
///
/// `update` and `delete` return `None` when no row has the given id so
/// callers can report not found without a separate lookup.
#[async_trait]
pub trait CheckInStore: Clone + Send + Sync + 'static {
    /// Most recently created first, ties broken by id descending.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<CheckIn>>;

    async fn get(&self, id: i64) -> Result<Option<CheckIn>>;

    async fn insert(&self, check_in: &NewCheckIn) -> Result<CheckIn>;

    async fn update(&self, id: i64, check_in: &NewCheckIn) -> Result<Option<CheckIn>>;

    async fn delete(&self, id: i64) -> Result<Option<CheckIn>>;
}
