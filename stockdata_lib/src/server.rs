//! HTTP boundary: `POST /stock_data/` runs one ingestion per request.

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::error::{ErrorKind, IngestError};
use crate::ingest::{IngestSummary, Ingestor};
use crate::record::TickerSymbol;

#[derive(Debug, Deserialize)]
pub struct StockRequest {
    pub ticker: String,
}

#[derive(Debug, Serialize)]
pub struct StockResponse {
    pub message: &'static str,
    pub ticker: TickerSymbol,
    pub rows_written: usize,
}

impl From<IngestSummary> for StockResponse {
    fn from(summary: IngestSummary) -> Self {
        Self {
            message: summary.message(),
            ticker: summary.ticker,
            rows_written: summary.rows_written,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// An ingestion failure rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub IngestError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::ProviderUnavailable | ErrorKind::ProviderAuth | ErrorKind::ParseFailure => {
                StatusCode::BAD_GATEWAY
            }
            ErrorKind::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(e: IngestError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.0.kind().as_str(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn create_app(ingestor: Arc<Ingestor>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stock_data/", post(create_stock_data))
        .with_state(ingestor)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn create_stock_data(
    State(ingestor): State<Arc<Ingestor>>,
    Json(request): Json<StockRequest>,
) -> Result<Json<StockResponse>, ApiError> {
    let summary = ingestor.ingest(&request.ticker).await?;
    Ok(Json(summary.into()))
}
