use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET /
/// The upload page: file picker, submit button, error banner, result viewer.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
