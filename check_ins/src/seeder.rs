use crate::{payload::Payload, validation, CheckIn, CheckInStore, Error, Result};
use rand::{seq::SliceRandom, Rng};
use serde_json::json;

pub const DEFAULT_SEED_COUNT: usize = 5;

const WORDS: &[&str] = &[
    "harbor", "market", "quiet", "bridge", "morning", "station", "coffee", "river", "garden",
    "museum", "library", "north", "corner", "sunny", "old", "square", "park", "trail", "summit",
    "bakery", "lunch", "meeting", "visit", "evening", "ferry", "plaza", "tower", "beach",
];

/// A generated check-in request body in the same shape a client sends.
pub fn fake_payload<R: Rng>(rng: &mut R) -> Payload {
    let lat: f64 = rng.gen_range(-90.0..=90.0);
    let lng: f64 = rng.gen_range(-180.0..=180.0);
    json_payload(json!({
        "description": words(rng, 4),
        "lat": lat,
        "lng": lng,
        "notes": words(rng, 6),
    }))
}

fn json_payload(value: serde_json::Value) -> Payload {
    Payload::from_json(value).unwrap_or_default()
}

fn words<R: Rng>(rng: &mut R, count: usize) -> String {
    WORDS
        .choose_multiple(rng, count)
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Insert `count` generated check-ins, validated exactly as Create would.
pub async fn seed<S: CheckInStore>(store: &S, count: usize) -> Result<Vec<CheckIn>> {
    let payloads: Vec<Payload> = {
        let mut rng = rand::thread_rng();
        (0..count).map(|_| fake_payload(&mut rng)).collect()
    };

    let mut inserted = Vec::with_capacity(count);
    for payload in payloads {
        let new_check_in = validation::validate(&payload).map_err(Error::Validation)?;
        inserted.push(store.insert(&new_check_in).await?);
    }
    tracing::info!(count = inserted.len(), "seeded check-ins");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn fake_payloads_always_validate() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let check_in = validation::validate(&fake_payload(&mut rng)).expect("valid");
            assert_eq!(check_in.description.split(' ').count(), 4);
            assert!(check_in.notes.is_some());
        }
    }

    #[tokio::test]
    async fn seeds_requested_count() {
        let store = MemoryStore::default();
        let seeded = seed(&store, DEFAULT_SEED_COUNT).await.unwrap();

        assert_eq!(seeded.len(), DEFAULT_SEED_COUNT);
        assert_eq!(store.len().await, DEFAULT_SEED_COUNT);
    }
}
