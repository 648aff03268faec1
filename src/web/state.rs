use std::sync::Arc;

use chrono::NaiveDate;

use crate::{config::System, database::PriceStore, util::datetime};

/// 所有 handler 共用的狀態，透過 `axum::extract::State` 傳入。
pub struct AppState {
    pub store: Arc<dyn PriceStore>,
    pub system: System,
    /// 回溯區間的基準日
    pub today: fn() -> NaiveDate,
}

impl AppState {
    pub fn new(store: Arc<dyn PriceStore>, system: System) -> Arc<Self> {
        Arc::new(Self {
            store,
            system,
            today: datetime::today,
        })
    }
}
