use super::ApiState;
use crate::{
    pagination::{self, Page, PageQuery},
    payload::Payload,
    resource::{CheckInResource, Deleted, Resource},
    telemetry, validation, CheckIn, CheckInStore, Error, Result,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    Json,
};
use service_metrics::record_duration;

/// The `:id` path segment as sent. A segment that does not decode can never
/// name a row, so it is reported as not found like any other unknown id.
pub struct CheckInId(String);

#[async_trait]
impl<S> FromRequestParts<S> for CheckInId
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(Self(id)),
            Err(rejection) => {
                tracing::debug!(%rejection, "undecodable check-in id");
                Err(Error::not_found("check-in not found"))
            }
        }
    }
}

/// Query strings are read as plain pairs so a repeated or odd `page` key
/// still lists, falling back to the first page.
pub async fn list_check_ins<S: CheckInStore>(
    State(api): State<ApiState<S>>,
    query: Option<Query<Vec<(String, String)>>>,
) -> Result<Json<Page<CheckInResource>>> {
    let query = PageQuery::from_pairs(query.map(|Query(pairs)| pairs).unwrap_or_default());
    let result = record_duration!(telemetry::LIST_DURATION, {
        list(&api, query.page()).await
    });
    telemetry::count_request("list", &result);
    result.map(Json)
}

pub async fn get_check_in<S: CheckInStore>(
    State(api): State<ApiState<S>>,
    CheckInId(id): CheckInId,
) -> Result<Json<Resource<CheckInResource>>> {
    let result = record_duration!(telemetry::GET_DURATION, {
        find(&api.store, &id).await
    });
    telemetry::count_request("get", &result);
    result.map(|check_in| Json(Resource::new(check_in.into())))
}

pub async fn create_check_in<S: CheckInStore>(
    State(api): State<ApiState<S>>,
    payload: Payload,
) -> Result<(StatusCode, Json<Resource<CheckInResource>>)> {
    let result = record_duration!(telemetry::CREATE_DURATION, {
        create(&api.store, &payload).await
    });
    telemetry::count_request("create", &result);
    result.map(|check_in| {
        (
            StatusCode::CREATED,
            Json(Resource::new(check_in.into())),
        )
    })
}

pub async fn update_check_in<S: CheckInStore>(
    State(api): State<ApiState<S>>,
    CheckInId(id): CheckInId,
    payload: Payload,
) -> Result<Json<Resource<CheckInResource>>> {
    let result = record_duration!(telemetry::UPDATE_DURATION, {
        update(&api.store, &id, &payload).await
    });
    telemetry::count_request("update", &result);
    result.map(|check_in| Json(Resource::new(check_in.into())))
}

/// `POST /check-ins/:id` for clients that can only send form posts. The
/// body's `_method` field or the `X-HTTP-Method-Override` header may name
/// PUT or PATCH; with neither present the post is still an update.
pub async fn override_check_in<S: CheckInStore>(
    state: State<ApiState<S>>,
    id: CheckInId,
    payload: Payload,
) -> Result<Json<Resource<CheckInResource>>> {
    match payload.method_override() {
        None => (),
        Some(method) if method.eq_ignore_ascii_case("put") => (),
        Some(method) if method.eq_ignore_ascii_case("patch") => (),
        Some(method) => {
            let err = Error::MethodNotAllowed(method.to_uppercase());
            telemetry::count_outcome("update", err.outcome());
            return Err(err);
        }
    }
    update_check_in(state, id, payload).await
}

pub async fn delete_check_in<S: CheckInStore>(
    State(api): State<ApiState<S>>,
    CheckInId(id): CheckInId,
) -> Result<Json<Deleted>> {
    let result = record_duration!(telemetry::DELETE_DURATION, {
        delete(&api.store, &id).await
    });
    telemetry::count_request("delete", &result);
    result.map(|check_in| Json(Deleted::new(check_in.into())))
}

async fn list<S: CheckInStore>(api: &ApiState<S>, page: u32) -> Result<Page<CheckInResource>> {
    let (limit, offset) = pagination::window(page);
    let rows = api.store.list(limit, offset).await?;
    Ok(Page::new(rows, page, &api.list_url).map(CheckInResource::from))
}

async fn find<S: CheckInStore>(store: &S, id: &str) -> Result<CheckIn> {
    let id = parse_id(id)?;
    store
        .get(id)
        .await?
        .ok_or_else(|| not_found(id))
}

async fn create<S: CheckInStore>(store: &S, payload: &Payload) -> Result<CheckIn> {
    let new_check_in = validation::validate(payload).map_err(Error::Validation)?;
    let check_in = store.insert(&new_check_in).await?;
    custom_tracing::record("check_in_id", check_in.id);
    tracing::info!(id = check_in.id, "check-in created");
    Ok(check_in)
}

async fn update<S: CheckInStore>(store: &S, id: &str, payload: &Payload) -> Result<CheckIn> {
    let existing = find(store, id).await?;
    let new_check_in = validation::validate(payload).map_err(Error::Validation)?;
    let check_in = store
        .update(existing.id, &new_check_in)
        .await?
        .ok_or_else(|| not_found(existing.id))?;
    tracing::info!(id = check_in.id, "check-in updated");
    Ok(check_in)
}

async fn delete<S: CheckInStore>(store: &S, id: &str) -> Result<CheckIn> {
    let id = parse_id(id)?;
    let check_in = store.delete(id).await?.ok_or_else(|| not_found(id))?;
    tracing::info!(id, "check-in deleted");
    Ok(check_in)
}

/// Ids that are not integers can never match a row, so they are reported
/// the same way as a missing one.
fn parse_id(id: &str) -> Result<i64> {
    custom_tracing::record("check_in_id", id);
    id.parse::<i64>().map_err(|_| not_found(id))
}

fn not_found<T: std::fmt::Display>(id: T) -> Error {
    Error::not_found(format!("check-in {id} not found"))
}
