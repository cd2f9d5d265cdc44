use demand_forecast_core::{
    AppConfig, ErrorKind, ErrorResult, ForecastEngine, ForecastError, ForecastOutcome, PolicyKind,
};
use demand_forecast_data::{
    categories, list_options, products_in_category, CsvSeriesPreparer, PrepareSettings,
    ProductOption,
};
use demand_forecast_model::AdditiveSeasonalModel;
use demand_forecast_strategy::policy_for;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared, read-only server state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    pub policy: Option<PolicyKind>,
    pub horizon: Option<usize>,
}

type ApiError = (StatusCode, Json<ErrorResult>);

fn status_for(kind: Option<ErrorKind>) -> StatusCode {
    match kind {
        Some(ErrorKind::NotFound) => StatusCode::NOT_FOUND,
        Some(ErrorKind::Schema) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(ErrorKind::ComputationFault) | None => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(err: ForecastError) -> ApiError {
    let result = ErrorResult::from(err);
    (status_for(result.kind), Json(result))
}

fn join_error(err: &tokio::task::JoinError) -> ApiError {
    tracing::error!("Blocking task failed: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResult {
            error: format!("Internal error: {err}"),
            kind: Some(ErrorKind::ComputationFault),
        }),
    )
}

async fn load_options(state: &AppState) -> Result<Vec<ProductOption>, ApiError> {
    let path = state.config.dataset.path.clone();
    tokio::task::spawn_blocking(move || list_options(path))
        .await
        .map_err(|e| join_error(&e))?
        .map_err(api_error)
}

/// Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Lists unique (product, category) pairs.
///
/// # Errors
/// Returns the dataset error as an `ErrorResult` with a matching status.
pub async fn get_options(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductOption>>, ApiError> {
    Ok(Json(load_options(&state).await?))
}

/// Lists sorted distinct categories.
///
/// # Errors
/// Returns the dataset error as an `ErrorResult` with a matching status.
pub async fn get_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let options = load_options(&state).await?;
    Ok(Json(categories(&options)))
}

/// Lists sorted product ids within one category.
///
/// # Errors
/// Returns the dataset error as an `ErrorResult` with a matching status.
pub async fn get_category_products(
    State(state): State<AppState>,
    Path(cat_id): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let options = load_options(&state).await?;
    Ok(Json(products_in_category(&options, &cat_id)))
}

/// Runs the forecast pipeline for one product.
///
/// The body is always a `ForecastResult` or an `ErrorResult`; the status code
/// reflects which. An unparseable query string is a schema error.
pub async fn get_forecast(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    query: Result<Query<ForecastQuery>, QueryRejection>,
) -> (StatusCode, Json<ForecastOutcome>) {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::warn!(
                product_id = %product_id,
                "Rejected forecast query: {}",
                rejection.body_text()
            );
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ForecastOutcome::Error(ErrorResult {
                    error: rejection.body_text(),
                    kind: Some(ErrorKind::Schema),
                })),
            );
        }
    };

    let config = state.config.clone();
    let policy = query.policy.unwrap_or(config.forecast.policy);
    let horizon = query.horizon.unwrap_or(config.forecast.horizon_days);

    let task = tokio::task::spawn_blocking(move || {
        let engine = ForecastEngine::new(
            CsvSeriesPreparer::new(
                config.dataset.path.clone(),
                PrepareSettings::from(&config.forecast),
            ),
            Arc::new(AdditiveSeasonalModel::from(&config.model)),
            policy_for(policy),
        )
        .with_horizon(horizon)
        .with_max_horizon(config.forecast.max_horizon_days);
        engine.run(&product_id)
    });

    match task.await {
        Ok(run) => {
            let status = match &run.outcome {
                ForecastOutcome::Forecast(_) => StatusCode::OK,
                ForecastOutcome::Error(err) => status_for(err.kind),
            };
            (status, Json(run.outcome))
        }
        Err(e) => {
            let (status, Json(err)) = join_error(&e);
            (status, Json(ForecastOutcome::Error(err)))
        }
    }
}
