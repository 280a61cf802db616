use check_ins::{seeder, CheckInStore, NewCheckIn};
use rust_decimal_macros::dec;
use sqlx::PgPool;

fn new_check_in(description: &str) -> NewCheckIn {
    NewCheckIn {
        description: description.to_string(),
        lat: Some(dec!(40.7128)),
        lng: Some(dec!(-74.0060)),
        notes: Some("noted!".to_string()),
    }
}

#[sqlx::test]
#[ignore = "need postgres running in env"]
async fn insert_and_get(pool: PgPool) -> anyhow::Result<()> {
    let inserted = pool.insert(&new_check_in("Test check-in")).await?;

    let check_in = pool.get(inserted.id).await?.expect("check-in should exist");

    assert_eq!(check_in, inserted);
    assert_eq!(check_in.lat, Some(dec!(40.7128000)));
    assert_eq!(check_in.lng, Some(dec!(-74.0060000)));
    assert!(check_in.created_at.is_some());
    assert_eq!(check_in.created_at, check_in.updated_at);
    Ok(())
}

#[sqlx::test]
#[ignore = "need postgres running in env"]
async fn null_coordinates_are_stored_as_null(pool: PgPool) -> anyhow::Result<()> {
    let mut check_in = new_check_in("nowhere");
    check_in.lat = None;
    check_in.lng = None;
    check_in.notes = None;

    let inserted = pool.insert(&check_in).await?;

    assert_eq!(inserted.lat, None);
    assert_eq!(inserted.lng, None);
    assert_eq!(inserted.notes, None);
    Ok(())
}

#[sqlx::test]
#[ignore = "need postgres running in env"]
async fn update_replaces_fields_and_keeps_created_at(pool: PgPool) -> anyhow::Result<()> {
    let inserted = pool.insert(&new_check_in("before")).await?;

    let mut replacement = new_check_in("after");
    replacement.lat = Some(dec!(-33.8688));
    replacement.notes = None;
    let updated = pool
        .update(inserted.id, &replacement)
        .await?
        .expect("check-in should exist");

    assert_eq!(updated.id, inserted.id);
    assert_eq!(updated.description, "after");
    assert_eq!(updated.lat, Some(dec!(-33.8688)));
    assert_eq!(updated.notes, None);
    assert_eq!(updated.created_at, inserted.created_at);
    assert!(updated.updated_at >= inserted.updated_at);

    assert!(pool.update(999_999, &replacement).await?.is_none());
    Ok(())
}

#[sqlx::test]
#[ignore = "need postgres running in env"]
async fn delete_returns_removed_row(pool: PgPool) -> anyhow::Result<()> {
    let inserted = pool.insert(&new_check_in("short lived")).await?;

    let deleted = pool.delete(inserted.id).await?.expect("deleted");

    assert_eq!(deleted.id, inserted.id);
    assert!(pool.get(inserted.id).await?.is_none());
    assert!(pool.delete(inserted.id).await?.is_none());
    Ok(())
}

#[sqlx::test]
#[ignore = "need postgres running in env"]
async fn list_is_newest_first_and_windowed(pool: PgPool) -> anyhow::Result<()> {
    let seeded = seeder::seed(&pool, 7).await?;
    let mut expected: Vec<i64> = seeded.iter().map(|check_in| check_in.id).collect();
    // newest first
    expected.reverse();

    let first = pool.list(5, 0).await?;
    let second = pool.list(5, 5).await?;

    let ids: Vec<i64> = first.iter().chain(second.iter()).map(|c| c.id).collect();
    assert_eq!(first.len(), 5);
    assert_eq!(second.len(), 2);
    assert_eq!(ids, expected);
    Ok(())
}
