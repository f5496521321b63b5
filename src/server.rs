use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::analytics::views;
use crate::analytics::{
    GenderTrend, PartyVoteShare, SeatShare, StateTurnout, WinnerMargin, YearSummary,
};
use crate::config::Config;
use crate::dataset::ElectionRecord;
use crate::store::{ElectionStore, LoadInfo};

#[derive(Clone)]
pub struct ApiState {
    config: Config,
    db_path: PathBuf,
}

impl ApiState {
    pub fn new(config: Config) -> Self {
        Self {
            db_path: config.resolved_db_path(),
            config,
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(status = %self.status, error = %self.message, "request failed");
        let body = Json(ApiErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
struct TopPartiesQuery {
    top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct MarginQuery {
    closest: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    query: String,
    year: i32,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    records: u64,
    last_load: Option<LoadInfo>,
}

#[derive(Debug, Serialize)]
struct YearsResponse {
    years: Vec<i32>,
}

#[derive(Debug, Serialize)]
struct ElectionsResponse {
    data: Vec<ElectionRecord>,
}

#[derive(Debug, Serialize)]
struct SeatShareResponse {
    seat_share: Vec<SeatShare>,
}

#[derive(Debug, Serialize)]
struct TurnoutResponse {
    turnout: Vec<StateTurnout>,
}

#[derive(Debug, Serialize)]
struct GenderTrendResponse {
    trend: Vec<GenderTrend>,
}

#[derive(Debug, Serialize)]
struct TopPartiesResponse {
    top_parties: Vec<PartyVoteShare>,
}

#[derive(Debug, Serialize)]
struct MarginResponse {
    margin: Vec<WinnerMargin>,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    results: Vec<ElectionRecord>,
}

#[derive(Debug, Serialize)]
struct SummaryResponse {
    summary: YearSummary,
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/years", get(years))
        .route("/api/elections/:year", get(elections))
        .route("/api/seat_share/:year", get(seat_share))
        .route("/api/state_turnout/:year", get(state_turnout))
        .route("/api/gender_trends", get(gender_trends))
        .route("/api/top_parties/:year", get(top_parties))
        .route("/api/margin/:year", get(margin))
        .route("/api/search", get(search))
        .route("/api/summary/:year", get(summary))
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let app = router(ApiState::new(config));
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("election API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(state): State<ApiState>) -> ApiResult<HealthResponse> {
    let store = open_store(&state)?;
    Ok(Json(HealthResponse {
        status: "ok",
        records: store.count().map_err(ApiError::internal)?,
        last_load: store.last_load().map_err(ApiError::internal)?,
    }))
}

async fn years(State(state): State<ApiState>) -> ApiResult<YearsResponse> {
    let store = open_store(&state)?;
    let years = views::years(&store).map_err(ApiError::internal)?;
    Ok(Json(YearsResponse { years }))
}

async fn elections(
    State(state): State<ApiState>,
    Path(year): Path<i32>,
) -> ApiResult<ElectionsResponse> {
    let store = open_store(&state)?;
    let data = views::elections_by_year(&store, year).map_err(ApiError::internal)?;
    Ok(Json(ElectionsResponse { data }))
}

async fn seat_share(
    State(state): State<ApiState>,
    Path(year): Path<i32>,
) -> ApiResult<SeatShareResponse> {
    let store = open_store(&state)?;
    let seat_share = views::seat_share(&store, year).map_err(ApiError::internal)?;
    Ok(Json(SeatShareResponse { seat_share }))
}

async fn state_turnout(
    State(state): State<ApiState>,
    Path(year): Path<i32>,
) -> ApiResult<TurnoutResponse> {
    let store = open_store(&state)?;
    let turnout = views::state_turnout(&store, year).map_err(ApiError::internal)?;
    Ok(Json(TurnoutResponse { turnout }))
}

async fn gender_trends(State(state): State<ApiState>) -> ApiResult<GenderTrendResponse> {
    let store = open_store(&state)?;
    let trend = views::gender_trends(&store).map_err(ApiError::internal)?;
    Ok(Json(GenderTrendResponse { trend }))
}

async fn top_parties(
    State(state): State<ApiState>,
    Path(year): Path<i32>,
    Query(query): Query<TopPartiesQuery>,
) -> ApiResult<TopPartiesResponse> {
    let top_n = query.top_n.unwrap_or(state.config.analysis.default_top_n);
    let store = open_store(&state)?;
    let top_parties = views::top_parties(&store, year, top_n).map_err(ApiError::internal)?;
    Ok(Json(TopPartiesResponse { top_parties }))
}

async fn margin(
    State(state): State<ApiState>,
    Path(year): Path<i32>,
    Query(query): Query<MarginQuery>,
) -> ApiResult<MarginResponse> {
    let store = open_store(&state)?;
    let margin = views::margin(&store, year, query.closest).map_err(ApiError::internal)?;
    Ok(Json(MarginResponse { margin }))
}

async fn search(
    State(state): State<ApiState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<SearchResponse> {
    let store = open_store(&state)?;
    let results = views::search(&store, query.year, &query.query).map_err(ApiError::internal)?;
    Ok(Json(SearchResponse { results }))
}

async fn summary(
    State(state): State<ApiState>,
    Path(year): Path<i32>,
) -> ApiResult<SummaryResponse> {
    let store = open_store(&state)?;
    let summary = views::year_summary(&store, year).map_err(ApiError::internal)?;
    Ok(Json(SummaryResponse { summary }))
}

fn open_store(state: &ApiState) -> std::result::Result<ElectionStore, ApiError> {
    ElectionStore::open(&state.db_path).map_err(ApiError::internal)
}
