use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::database::table::commodity_price::{self, LatestPrice, PricePoint};

#[cfg(test)]
pub mod memory;
pub mod table;

/// 價格資料來源。
///
/// 所有方法都是唯讀查詢；任何底層錯誤都以 `anyhow::Error` 回傳，
/// 由 HTTP 層統一包成資料存取錯誤。
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// 取得 `since` 到 `until`（含）之間的價格走勢，依時間遞增排序。
    ///
    /// `currency` 不是 USD 時，以同一天的匯率換算，當天沒有匯率的資料價格為 `None`。
    async fn price_series(
        &self,
        symbol: &str,
        currency: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<PricePoint>>;

    /// 資料表內所有的代碼，依字母排序
    async fn symbols(&self) -> Result<Vec<String>>;

    /// 最新一筆價格
    async fn latest_price(&self, symbol: &str) -> Result<Option<LatestPrice>>;

    /// `date` 當天或之前最後一筆價格
    async fn price_on_or_before(&self, symbol: &str, date: NaiveDate) -> Result<Option<Decimal>>;
}

/// PostgreSQL 連線池封裝。
///
/// 由 `main` 建立後放進 router state，不使用全域變數。
#[derive(Debug)]
pub struct PostgresSQL {
    /// SQLx PostgreSQL 連線池實例。
    pub pool: PgPool,
}

impl PostgresSQL {
    /// 建立 PostgreSQL 連線池，第一次查詢時才會真正連線。
    ///
    /// # Errors
    /// 連線字串格式錯誤時回傳錯誤。
    pub fn new(database_url: &str) -> Result<PostgresSQL> {
        let db = PgPoolOptions::new()
            .max_lifetime(Some(Duration::from_secs(1800))) // 30 分鐘
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Some(Duration::from_secs(600))) // 10 分鐘
            .connect_lazy(database_url)
            .context("wrong database URL")?;

        Ok(Self { pool: db })
    }

    /// 取得連線池參考。
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PriceStore for PostgresSQL {
    async fn price_series(
        &self,
        symbol: &str,
        currency: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<PricePoint>> {
        if currency == crate::declare::USD {
            PricePoint::fetch_usd(self.pool(), symbol, since, until).await
        } else {
            PricePoint::fetch_converted(self.pool(), symbol, currency, since, until).await
        }
    }

    async fn symbols(&self) -> Result<Vec<String>> {
        commodity_price::fetch_symbols(self.pool()).await
    }

    async fn latest_price(&self, symbol: &str) -> Result<Option<LatestPrice>> {
        LatestPrice::fetch(self.pool(), symbol).await
    }

    async fn price_on_or_before(&self, symbol: &str, date: NaiveDate) -> Result<Option<Decimal>> {
        commodity_price::fetch_price_on_or_before(self.pool(), symbol, date).await
    }
}
