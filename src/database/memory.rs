//! 測試用的記憶體資料來源，語意與 PostgreSQL 查詢相同。

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::{
    database::{
        table::commodity_price::{LatestPrice, PricePoint},
        PriceStore,
    },
    declare,
};

#[derive(Default)]
pub struct MemoryStore {
    prices: Vec<(String, NaiveDateTime, Option<Decimal>)>,
    rates: Vec<(String, NaiveDateTime, Decimal)>,
    broken: bool,
}

fn timestamp(ts: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 每個查詢都回傳錯誤
    pub fn broken() -> Self {
        MemoryStore {
            broken: true,
            ..Default::default()
        }
    }

    pub fn price(mut self, symbol: &str, ts: &str, usd_price: Option<Decimal>) -> Self {
        self.prices.push((symbol.to_string(), timestamp(ts), usd_price));
        self
    }

    pub fn rate(mut self, currency: &str, ts: &str, rate: Decimal) -> Self {
        self.rates.push((currency.to_string(), timestamp(ts), rate));
        self
    }

    fn check(&self) -> Result<()> {
        if self.broken {
            return Err(anyhow!("connection refused"));
        }
        Ok(())
    }

    fn rows(&self, symbol: &str) -> Vec<&(String, NaiveDateTime, Option<Decimal>)> {
        let mut rows: Vec<_> = self.prices.iter().filter(|p| p.0 == symbol).collect();
        rows.sort_by_key(|p| p.1);
        rows
    }

    fn rate_on(&self, currency: &str, date: NaiveDate) -> Option<Decimal> {
        self.rates
            .iter()
            .filter(|r| r.0 == currency && r.1.date() == date)
            .max_by_key(|r| r.1)
            .map(|r| r.2)
    }
}

#[async_trait]
impl PriceStore for MemoryStore {
    async fn price_series(
        &self,
        symbol: &str,
        currency: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<PricePoint>> {
        self.check()?;
        Ok(self
            .rows(symbol)
            .into_iter()
            .filter(|p| p.1.date() >= since && p.1.date() <= until)
            .map(|p| {
                let price = if currency == declare::USD {
                    p.2
                } else {
                    p.2.zip(self.rate_on(currency, p.1.date()))
                        .map(|(usd, rate)| usd * rate)
                };
                PricePoint {
                    fetched_at: p.1,
                    price,
                }
            })
            .collect())
    }

    async fn symbols(&self) -> Result<Vec<String>> {
        self.check()?;
        let mut symbols: Vec<String> = self.prices.iter().map(|p| p.0.clone()).collect();
        symbols.sort();
        symbols.dedup();
        Ok(symbols)
    }

    async fn latest_price(&self, symbol: &str) -> Result<Option<LatestPrice>> {
        self.check()?;
        Ok(self.rows(symbol).last().map(|p| LatestPrice {
            usd_price: p.2,
            fetched_at: p.1,
        }))
    }

    async fn price_on_or_before(&self, symbol: &str, date: NaiveDate) -> Result<Option<Decimal>> {
        self.check()?;
        Ok(self
            .rows(symbol)
            .into_iter()
            .filter(|p| p.1.date() <= date)
            .last()
            .and_then(|p| p.2))
    }
}
