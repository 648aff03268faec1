use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    calculation::series::{self, Series, SeriesRequest},
    logging,
    web::{error::AppError, state::AppState},
};

#[derive(Debug, Deserialize)]
pub struct DataQuery {
    currency: Option<String>,
    period: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SeriesResponse {
    pub series: Vec<Series>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/data/{symbols}", get(api_data))
}

/// `GET /api/data/{symbols}?currency=EUR&period=6m`
async fn api_data(
    State(state): State<Arc<AppState>>,
    Path(symbols): Path<String>,
    Query(q): Query<DataQuery>,
) -> Result<Json<SeriesResponse>, AppError> {
    let request = SeriesRequest::parse(&symbols, q.currency.as_deref(), q.period.as_deref());

    match series::assemble(state.store.as_ref(), &request, (state.today)()).await {
        Ok(series) => Ok(Json(SeriesResponse { series })),
        Err(why) => {
            logging::error_file_async(format!(
                "Failed to api_data({}) because {:#}",
                symbols, why
            ));
            Err(why.into())
        }
    }
}
