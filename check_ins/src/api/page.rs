use axum::{http::header, response::Html, response::IntoResponse};

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const CHECKINS_JS: &str = include_str!("../../assets/checkins.js");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        CHECKINS_JS,
    )
}
