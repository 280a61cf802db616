use super::CheckInStore;
use crate::{CheckIn, NewCheckIn, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::Mutex;

/// Process local store used when no database is configured. Contents are
/// lost on restart. Ids start at 1 and are never handed out twice.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

#[derive(Default)]
struct Tables {
    last_id: i64,
    check_ins: BTreeMap<i64, CheckIn>,
}

impl MemoryStore {
    pub async fn len(&self) -> usize {
        self.tables.lock().await.check_ins.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CheckInStore for MemoryStore {
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<CheckIn>> {
        let tables = self.tables.lock().await;
        let mut check_ins: Vec<&CheckIn> = tables.check_ins.values().collect();
        check_ins.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(check_ins
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Option<CheckIn>> {
        Ok(self.tables.lock().await.check_ins.get(&id).cloned())
    }

    async fn insert(&self, check_in: &NewCheckIn) -> Result<CheckIn> {
        let mut tables = self.tables.lock().await;
        tables.last_id += 1;
        let now = Utc::now();
        let row = CheckIn {
            id: tables.last_id,
            description: check_in.description.clone(),
            lat: check_in.lat,
            lng: check_in.lng,
            notes: check_in.notes.clone(),
            created_at: Some(now),
            updated_at: Some(now),
        };
        tables.check_ins.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, check_in: &NewCheckIn) -> Result<Option<CheckIn>> {
        let mut tables = self.tables.lock().await;
        let Some(row) = tables.check_ins.get_mut(&id) else {
            return Ok(None);
        };
        row.description = check_in.description.clone();
        row.lat = check_in.lat;
        row.lng = check_in.lng;
        row.notes = check_in.notes.clone();
        row.updated_at = Some(Utc::now()).max(row.created_at);
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> Result<Option<CheckIn>> {
        Ok(self.tables.lock().await.check_ins.remove(&id))
    }
}
