//! JSON and download endpoints mounted under `/api`

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    PlannerError,
    config::PlannerConfig,
    export::render_text,
    models::{DestinationCandidate, ItineraryBundle, TripRequest},
    planner::Planner,
    render::render_itinerary,
    session::SessionStore,
};

/// Shared state of every handler
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<Planner>,
    pub sessions: SessionStore<ItineraryBundle>,
    pub providers: ProviderStatus,
    /// Upper bound for handling one request
    pub request_timeout: Duration,
}

impl AppState {
    #[must_use]
    pub fn new(planner: Planner, config: &PlannerConfig) -> Self {
        Self {
            planner: Arc::new(planner),
            sessions: SessionStore::from_config(&config.session),
            providers: ProviderStatus::from(config),
            request_timeout: crate::planner::request_budget(config),
        }
    }
}

/// Which optional providers have a key
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderStatus {
    pub openai: bool,
    pub geoapify: bool,
    pub serpapi: bool,
    pub unsplash: bool,
    pub news: bool,
}

impl From<&PlannerConfig> for ProviderStatus {
    fn from(config: &PlannerConfig) -> Self {
        let providers = &config.providers;
        Self {
            openai: providers.openai.is_configured(),
            geoapify: providers.geoapify.is_configured(),
            serpapi: providers.serpapi.is_configured(),
            unsplash: providers.unsplash.is_configured(),
            news: providers.news.is_configured(),
        }
    }
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    pub providers: ProviderStatus,
}

#[derive(Deserialize)]
pub struct DestinationQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize, Deserialize)]
pub struct ApiDestination {
    pub label: String,
    #[serde(flatten)]
    pub candidate: DestinationCandidate,
}

impl From<DestinationCandidate> for ApiDestination {
    fn from(candidate: DestinationCandidate) -> Self {
        Self {
            label: candidate.label(),
            candidate,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub itinerary: ItineraryBundle,
}

#[derive(Serialize, Deserialize)]
pub struct VisualResponse {
    pub day: u32,
    pub url: String,
}

/// Planner errors rendered as `{ "error": ... }` with a matching status
pub struct ApiError(PlannerError);

impl From<PlannerError> for ApiError {
    fn from(error: PlannerError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PlannerError::Validation { .. } => StatusCode::BAD_REQUEST,
            PlannerError::NotFound { .. } => StatusCode::NOT_FOUND,
            PlannerError::Api { .. } => StatusCode::BAD_GATEWAY,
            PlannerError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!("Request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.user_message() }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(get_status))
        .route("/destinations", get(search_destinations))
        .route("/itineraries", post(create_itinerary))
        .route("/itineraries/{id}", get(get_itinerary))
        .route("/itineraries/{id}/view", get(view_itinerary))
        .route("/itineraries/{id}/days/{day}/visual", post(generate_day_visual))
        .route("/itineraries/{id}/export.txt", get(export_text))
        .route("/itineraries/{id}/export.html", get(export_document))
}

async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        version: crate::VERSION,
        providers: state.providers,
    })
}

async fn search_destinations(
    State(state): State<AppState>,
    Query(query): Query<DestinationQuery>,
) -> Json<Vec<ApiDestination>> {
    let candidates = state.planner.search_destinations(&query.q).await;
    Json(candidates.into_iter().map(ApiDestination::from).collect())
}

async fn create_itinerary(
    State(state): State<AppState>,
    Json(request): Json<TripRequest>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    let itinerary = state.planner.plan(&request).await?;
    let session_id = state.sessions.insert(itinerary.clone()).await;
    info!(%session_id, "Itinerary stored");
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id,
            itinerary,
        }),
    ))
}

async fn load(state: &AppState, id: &Uuid) -> ApiResult<ItineraryBundle> {
    state.sessions.get(id).await.ok_or_else(|| {
        PlannerError::not_found("This itinerary has expired. Please generate it again.").into()
    })
}

async fn get_itinerary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ItineraryBundle>> {
    Ok(Json(load(&state, &id).await?))
}

async fn view_itinerary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Html<String>> {
    let bundle = load(&state, &id).await?;
    Ok(Html(render_itinerary(&id, &bundle)))
}

async fn generate_day_visual(
    State(state): State<AppState>,
    Path((id, day)): Path<(Uuid, u32)>,
) -> ApiResult<Json<VisualResponse>> {
    let bundle = load(&state, &id).await?;
    if let Some(url) = bundle.day_visuals.get(&day) {
        return Ok(Json(VisualResponse {
            day,
            url: url.clone(),
        }));
    }
    let plan = bundle
        .day_plans
        .iter()
        .find(|plan| plan.day == day)
        .ok_or_else(|| PlannerError::not_found(format!("Day {day} is not part of this itinerary")))?;

    let url = state.planner.day_visual(plan).await?;
    state
        .sessions
        .update(&id, |bundle| {
            bundle.day_visuals.insert(day, url.clone());
        })
        .await
        .ok_or_else(|| PlannerError::not_found("This itinerary has expired. Please generate it again."))?;

    Ok(Json(VisualResponse { day, url }))
}

fn attachment(content_type: &'static str, file_name: String, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}

async fn export_text(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let bundle = load(&state, &id).await?;
    Ok(attachment(
        "text/plain; charset=utf-8",
        bundle.file_name("txt"),
        render_text(&bundle),
    ))
}

async fn export_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let bundle = load(&state, &id).await?;
    let document = state.planner.document(&bundle).await;
    Ok(attachment(
        "text/html; charset=utf-8",
        bundle.file_name("html"),
        document,
    ))
}
