use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

#[derive(FromRow, Debug, Clone, PartialEq)]
/// 走勢圖上的一個點
pub struct PricePoint {
    pub fetched_at: NaiveDateTime,
    /// 換算後的價格，當天沒有匯率時為 None
    pub price: Option<Decimal>,
}

impl PricePoint {
    /// 取得 `since` 到 `until`（含）之間的美元報價
    pub async fn fetch_usd(
        pool: &PgPool,
        symbol: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<PricePoint>> {
        let sql = r#"
SELECT
    c.fetched_at::timestamp AS fetched_at,
    c.usd_price::numeric AS price
FROM
    commodityprice c
WHERE
    c.symbol = $1
    AND c.fetched_at >= $2
    AND CAST(c.fetched_at AS DATE) <= $3
ORDER BY
    c.fetched_at ASC
"#;

        sqlx::query_as::<_, PricePoint>(sql)
            .bind(symbol)
            .bind(since)
            .bind(until)
            .fetch_all(pool)
            .await
            .context(format!("Failed to PricePoint::fetch_usd({}) from database", symbol))
    }

    /// 取得 `since` 到 `until`（含）之間以 `currency` 計價的報價。
    ///
    /// 每筆報價對應同一天的匯率（同一天多筆時取最後一筆），
    /// 找不到匯率時保留該筆報價但價格為 NULL。
    pub async fn fetch_converted(
        pool: &PgPool,
        symbol: &str,
        currency: &str,
        since: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<PricePoint>> {
        let sql = r#"
SELECT
    c.fetched_at::timestamp AS fetched_at,
    (c.usd_price * er.rate_vs_usd)::numeric AS price
FROM
    commodityprice c
    LEFT JOIN LATERAL (
        SELECT
            f.rate_vs_usd
        FROM
            fxrate f
        WHERE
            f.currency = $2
            AND CAST(f.fetched_at AS DATE) = CAST(c.fetched_at AS DATE)
        ORDER BY
            f.fetched_at DESC
        LIMIT 1
    ) er ON TRUE
WHERE
    c.symbol = $1
    AND c.fetched_at >= $3
    AND CAST(c.fetched_at AS DATE) <= $4
ORDER BY
    c.fetched_at ASC
"#;

        sqlx::query_as::<_, PricePoint>(sql)
            .bind(symbol)
            .bind(currency)
            .bind(since)
            .bind(until)
            .fetch_all(pool)
            .await
            .context(format!(
                "Failed to PricePoint::fetch_converted({}, {}) from database",
                symbol, currency
            ))
    }
}

#[derive(FromRow, Debug, Clone, PartialEq)]
/// 最新一筆美元報價
pub struct LatestPrice {
    pub usd_price: Option<Decimal>,
    pub fetched_at: NaiveDateTime,
}

impl LatestPrice {
    pub async fn fetch(pool: &PgPool, symbol: &str) -> Result<Option<LatestPrice>> {
        let sql = r#"
SELECT
    usd_price::numeric AS usd_price,
    fetched_at::timestamp AS fetched_at
FROM
    commodityprice
WHERE
    symbol = $1
ORDER BY
    fetched_at DESC
LIMIT 1
"#;

        sqlx::query_as::<_, LatestPrice>(sql)
            .bind(symbol)
            .fetch_optional(pool)
            .await
            .context(format!("Failed to LatestPrice::fetch({}) from database", symbol))
    }
}

/// 取得資料表內所有的代碼
pub async fn fetch_symbols(pool: &PgPool) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>("SELECT DISTINCT symbol FROM commodityprice ORDER BY symbol")
        .fetch_all(pool)
        .await
        .context("Failed to fetch_symbols from database")
}

/// 取得 `date` 當天或之前最後一筆美元報價
pub async fn fetch_price_on_or_before(
    pool: &PgPool,
    symbol: &str,
    date: NaiveDate,
) -> Result<Option<Decimal>> {
    let sql = r#"
SELECT
    usd_price::numeric
FROM
    commodityprice
WHERE
    symbol = $1
    AND CAST(fetched_at AS DATE) <= $2
ORDER BY
    fetched_at DESC
LIMIT 1
"#;

    let price = sqlx::query_scalar::<_, Option<Decimal>>(sql)
        .bind(symbol)
        .bind(date)
        .fetch_optional(pool)
        .await
        .context(format!(
            "Failed to fetch_price_on_or_before({}, {}) from database",
            symbol, date
        ))?;

    Ok(price.flatten())
}
