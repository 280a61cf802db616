use super::{CheckInFields, CreateCheckIn, DeleteCheckIn, GetCheckIn, ListCheckIns, UpdateCheckIn};
use crate::{
    client::{self, CheckInClient, CheckInForm, UpdateMethod},
    Msg, PrettyJson, Result,
};
use check_ins::{api::CHECK_INS_PATH, pagination};

pub async fn list(args: ListCheckIns) -> Result<Msg> {
    let client = CheckInClient::new(&args.url)?;
    let cursor = match (args.cursor, args.page) {
        (Some(cursor), _) => Some(cursor),
        (None, Some(page)) => Some(pagination::page_url(CHECK_INS_PATH, page)),
        (None, None) => None,
    };
    let result = client.list(cursor.as_deref()).await;
    respond(result)
}

pub async fn get(args: GetCheckIn) -> Result<Msg> {
    let client = CheckInClient::new(&args.url)?;
    respond(client.get(args.id).await)
}

pub async fn create(args: CreateCheckIn) -> Result<Msg> {
    let client = CheckInClient::new(&args.url)?;
    respond(client.create(&args.fields.into()).await)
}

pub async fn update(args: UpdateCheckIn) -> Result<Msg> {
    let client = CheckInClient::new(&args.url)?;
    let method = if args.method_override {
        UpdateMethod::Override
    } else {
        UpdateMethod::Put
    };
    respond(client.update(args.id, &args.fields.into(), method).await)
}

pub async fn delete(args: DeleteCheckIn) -> Result<Msg> {
    let client = CheckInClient::new(&args.url)?;
    respond(client.delete(args.id).await)
}

impl From<CheckInFields> for CheckInForm {
    fn from(fields: CheckInFields) -> Self {
        Self {
            description: fields.description,
            lat: fields.lat,
            lng: fields.lng,
            notes: fields.notes,
        }
    }
}

/// Successful responses print as json, API errors as a message. Transport
/// failures are returned as errors.
fn respond<T: serde::Serialize>(result: client::Result<T>) -> Result<Msg> {
    match result {
        Ok(value) => Msg::ok(value.pretty_json()?),
        Err(client::Error::Validation { message, errors }) => {
            let mut msg = message;
            for (field, messages) in errors {
                for message in messages {
                    msg.push_str(&format!("\n  {field}: {message}"));
                }
            }
            Msg::err(msg)
        }
        Err(client::Error::NotFound(message)) => Msg::err(message),
        Err(client::Error::UnexpectedStatus(status, body)) => {
            Msg::err(format!("unexpected status {status}: {body}"))
        }
        Err(err) => Err(err.into()),
    }
}
