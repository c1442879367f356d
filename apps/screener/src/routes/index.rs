use axum::response::Html;

const INDEX_PAGE: &str = include_str!("../../static/index.html");

/// GET /
/// The upload form. Submits to `/api/v1/screenings`.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_PAGE)
}
