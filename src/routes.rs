use std::sync::Arc;

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use crate::aggregator::{AggregatedResult, Aggregator};
use crate::item::FeedItem;

const TIME_FORMAT: &str = "%d %b %Y, %I:%M %p IST";

pub struct AppState {
    pub aggregator: Arc<Aggregator>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .with_state(state)
}

// Template structs
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub hours_window: i64,
    pub generated_at: String,
    pub sources: Vec<String>,
    pub cards: Vec<Card>,
}

pub struct Card {
    pub source: String,
    pub title: String,
    pub link: String,
    pub published: String,
    pub summary: Option<String>,
    pub image: Option<String>,
}

impl From<&FeedItem> for Card {
    fn from(item: &FeedItem) -> Self {
        Self {
            source: item.source.clone(),
            title: item.title.clone(),
            link: item.link.clone(),
            published: item.published_at.format(TIME_FORMAT).to_string(),
            summary: item.summary.clone(),
            image: item.image.clone(),
        }
    }
}

impl IndexTemplate {
    pub fn new(result: &AggregatedResult, hours_window: i64) -> Self {
        Self {
            hours_window,
            generated_at: result.generated_at.format(TIME_FORMAT).to_string(),
            sources: result
                .source_names()
                .into_iter()
                .map(String::from)
                .collect(),
            cards: result.items.iter().map(Card::from).collect(),
        }
    }
}

// Wrapper for HTML responses
struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

// Route handlers
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let result = state.aggregator.aggregate().await;
    let hours_window = state.aggregator.window().num_hours();
    HtmlTemplate(IndexTemplate::new(&result, hours_window))
}

pub async fn health() -> impl IntoResponse {
    Html("OK")
}
