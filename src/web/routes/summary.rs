use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{
    calculation::summary::{self, SummaryRow},
    logging,
    web::{error::AppError, state::AppState},
};

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub commodities: Vec<SummaryRow>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/summary", get(api_summary))
}

/// `GET /api/summary`
async fn api_summary(State(state): State<Arc<AppState>>) -> Result<Json<SummaryResponse>, AppError> {
    match summary::summarize(state.store.as_ref(), (state.today)()).await {
        Ok(commodities) => Ok(Json(SummaryResponse { commodities })),
        Err(why) => {
            logging::error_file_async(format!("Failed to api_summary because {:#}", why));
            Err(why.into())
        }
    }
}
