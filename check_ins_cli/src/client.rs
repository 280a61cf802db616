use check_ins::{
    api::CHECK_INS_PATH,
    pagination::Page,
    resource::{CheckInResource, Deleted, Resource},
};
use reqwest::{multipart::Form, RequestBuilder, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize};
use std::{collections::BTreeMap, time::Duration};

/// The default client useragent for check-ins http requests
static USERAGENT: &str = concat!("check-ins-cli/", env!("CARGO_PKG_VERSION"));
/// The default timeout for http requests
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub type Result<T = ()> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("{message}")]
    Validation {
        message: String,
        errors: BTreeMap<String, Vec<String>>,
    },
    #[error("{0}")]
    NotFound(String),
    #[error("unexpected status {0}: {1}")]
    UnexpectedStatus(StatusCode, String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    errors: BTreeMap<String, Vec<String>>,
}

/// Fields submitted by Create and Update. A `None` coordinate is sent as an
/// empty value, which the service stores as null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckInForm {
    pub description: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub notes: Option<String>,
}

impl CheckInForm {
    fn multipart(&self) -> Form {
        let optional = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
        Form::new()
            .text("description", self.description.clone())
            .text("lat", optional(self.lat))
            .text("lng", optional(self.lng))
            .text("notes", self.notes.clone().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMethod {
    Put,
    /// `POST` with `_method=PUT`, the way an html form submits
    Override,
}

#[derive(Clone, Debug)]
pub struct CheckInClient {
    client: reqwest::Client,
    base_url: Url,
}

impl CheckInClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|err| Error::InvalidUrl(err.to_string()))?;
        let client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(USERAGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Fetch a page of check-ins. `cursor` is a `links` url from a previous
    /// page, either absolute or relative to the base url.
    pub async fn list(&self, cursor: Option<&str>) -> Result<Page<CheckInResource>> {
        let url = self.url(cursor.unwrap_or(CHECK_INS_PATH))?;
        send(self.client.get(url)).await
    }

    pub async fn get(&self, id: i64) -> Result<CheckInResource> {
        let url = self.check_in_url(id)?;
        let resource: Resource<CheckInResource> = send(self.client.get(url)).await?;
        Ok(resource.data)
    }

    pub async fn create(&self, form: &CheckInForm) -> Result<CheckInResource> {
        let url = self.url(CHECK_INS_PATH)?;
        let resource: Resource<CheckInResource> =
            send(self.client.post(url).multipart(form.multipart())).await?;
        Ok(resource.data)
    }

    pub async fn update(
        &self,
        id: i64,
        form: &CheckInForm,
        method: UpdateMethod,
    ) -> Result<CheckInResource> {
        let url = self.check_in_url(id)?;
        let request = match method {
            UpdateMethod::Put => self.client.put(url).multipart(form.multipart()),
            UpdateMethod::Override => self
                .client
                .post(url)
                .multipart(form.multipart().text("_method", "PUT")),
        };
        let resource: Resource<CheckInResource> = send(request).await?;
        Ok(resource.data)
    }

    pub async fn delete(&self, id: i64) -> Result<Deleted> {
        let url = self.check_in_url(id)?;
        send(self.client.delete(url)).await
    }

    fn check_in_url(&self, id: i64) -> Result<Url> {
        self.url(&format!("{CHECK_INS_PATH}/{id}"))
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|err| Error::InvalidUrl(format!("{path}: {err}")))
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = request
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await?;
    let status = response.status();
    tracing::debug!(%status, url = %response.url(), "check-ins response");

    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await?;
    let parsed = serde_json::from_str::<ErrorBody>(&body).ok();
    match (status, parsed) {
        (StatusCode::UNPROCESSABLE_ENTITY, Some(error)) => Err(Error::Validation {
            message: error.message,
            errors: error.errors,
        }),
        (StatusCode::NOT_FOUND, Some(error)) => Err(Error::NotFound(error.message)),
        (StatusCode::NOT_FOUND, None) => Err(Error::NotFound(body)),
        (status, _) => Err(Error::UnexpectedStatus(status, body)),
    }
}
