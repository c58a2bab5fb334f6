use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::domain::SupplierId;
use super::record::{EvaluationRecord, EvaluationSummaryView};
use super::repository::{EvaluationRepository, SupplierDataSource};
use super::scoring::WeightConfig;
use super::service::{BatchSummaryView, SupplierEvaluationService};
use crate::error::AppError;

/// Body accepted by the evaluate and batch endpoints.
#[derive(Debug, Deserialize)]
pub struct EvaluationRequest {
    pub period: String,
    #[serde(default)]
    pub weights: Option<WeightConfig>,
}

#[derive(Debug, Deserialize)]
pub struct RankingQuery {
    pub period: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Router builder exposing evaluation, ranking, and batch endpoints.
pub fn evaluation_router<S, R>(service: Arc<SupplierEvaluationService<S, R>>) -> Router
where
    S: SupplierDataSource + 'static,
    R: EvaluationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/suppliers/:supplier_id/evaluations",
            post(evaluate_handler::<S, R>).get(history_handler::<S, R>),
        )
        .route("/api/v1/evaluations/ranking", get(ranking_handler::<S, R>))
        .route("/api/v1/evaluations/batch", post(batch_handler::<S, R>))
        .with_state(service)
}

pub(crate) async fn evaluate_handler<S, R>(
    State(service): State<Arc<SupplierEvaluationService<S, R>>>,
    Path(supplier_id): Path<String>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Json<EvaluationRecord>, AppError>
where
    S: SupplierDataSource + 'static,
    R: EvaluationRepository + 'static,
{
    let supplier_id = SupplierId(supplier_id);
    let record = service.evaluate(&supplier_id, &request.period, request.weights)?;
    Ok(Json(record))
}

pub(crate) async fn history_handler<S, R>(
    State(service): State<Arc<SupplierEvaluationService<S, R>>>,
    Path(supplier_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<EvaluationRecord>>, AppError>
where
    S: SupplierDataSource + 'static,
    R: EvaluationRepository + 'static,
{
    let supplier_id = SupplierId(supplier_id);
    let limit = query.limit.unwrap_or(service.ranking_limit());
    Ok(Json(service.history(&supplier_id, limit)?))
}

pub(crate) async fn ranking_handler<S, R>(
    State(service): State<Arc<SupplierEvaluationService<S, R>>>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<Vec<EvaluationSummaryView>>, AppError>
where
    S: SupplierDataSource + 'static,
    R: EvaluationRepository + 'static,
{
    let limit = query.limit.unwrap_or(service.ranking_limit());
    let rows = service
        .rank(&query.period, limit)?
        .iter()
        .map(EvaluationRecord::summary_view)
        .collect();
    Ok(Json(rows))
}

pub(crate) async fn batch_handler<S, R>(
    State(service): State<Arc<SupplierEvaluationService<S, R>>>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Json<BatchSummaryView>, AppError>
where
    S: SupplierDataSource + 'static,
    R: EvaluationRepository + 'static,
{
    let batch = service.batch_evaluate(&request.period, request.weights)?;
    Ok(Json(batch.summary_view()))
}
