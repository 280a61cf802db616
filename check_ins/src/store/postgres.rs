use super::CheckInStore;
use crate::{CheckIn, Error, NewCheckIn, Result};
use async_trait::async_trait;
use sqlx::{Pool, Postgres};

#[async_trait]
impl CheckInStore for Pool<Postgres> {
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<CheckIn>> {
        sqlx::query_as::<_, CheckIn>(
            r#"
            select * from check_ins
            order by created_at desc, id desc
            limit $1 offset $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self)
        .await
        .map_err(Error::from)
    }

    async fn get(&self, id: i64) -> Result<Option<CheckIn>> {
        sqlx::query_as::<_, CheckIn>("select * from check_ins where id = $1")
            .bind(id)
            .fetch_optional(self)
            .await
            .map_err(Error::from)
    }

    async fn insert(&self, check_in: &NewCheckIn) -> Result<CheckIn> {
        sqlx::query_as::<_, CheckIn>(
            r#"
            insert into check_ins (description, lat, lng, notes, created_at, updated_at)
            values ($1, $2, $3, $4, now(), now())
            returning *
            "#,
        )
        .bind(&check_in.description)
        .bind(check_in.lat)
        .bind(check_in.lng)
        .bind(&check_in.notes)
        .fetch_one(self)
        .await
        .map_err(Error::from)
    }

    async fn update(&self, id: i64, check_in: &NewCheckIn) -> Result<Option<CheckIn>> {
        sqlx::query_as::<_, CheckIn>(
            r#"
            update check_ins set
                description = $2,
                lat = $3,
                lng = $4,
                notes = $5,
                updated_at = greatest(now(), created_at)
            where id = $1
            returning *
            "#,
        )
        .bind(id)
        .bind(&check_in.description)
        .bind(check_in.lat)
        .bind(check_in.lng)
        .bind(&check_in.notes)
        .fetch_optional(self)
        .await
        .map_err(Error::from)
    }

    async fn delete(&self, id: i64) -> Result<Option<CheckIn>> {
        sqlx::query_as::<_, CheckIn>("delete from check_ins where id = $1 returning *")
            .bind(id)
            .fetch_optional(self)
            .await
            .map_err(Error::from)
    }
}
