use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    database::PriceStore,
    declare::{Period, USD},
    util::datetime,
};

/// 一條走勢線，名稱為 `"<代碼> in <幣別>"`
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub data: Vec<SeriesPoint>,
}

/// `[ISO 時間, 價格或 null]`
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SeriesPoint(
    pub String,
    #[serde(with = "rust_decimal::serde::float_option")] pub Option<Decimal>,
);

/// 一次走勢查詢的條件
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRequest {
    pub symbols: Vec<String>,
    pub currency: String,
    pub period: Period,
}

impl SeriesRequest {
    /// 解析路徑上的代碼清單與 query string。
    ///
    /// 代碼以逗號分隔、不分大小寫，空白項目會略過；
    /// 幣別預設 USD；無法辨識的 period 視為 1y。
    pub fn parse(symbols: &str, currency: Option<&str>, period: Option<&str>) -> Self {
        let symbols = symbols
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();

        let currency = currency
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| USD.to_string());

        SeriesRequest {
            symbols,
            currency,
            period: Period::parse_or_default(period),
        }
    }
}

/// 依請求順序為每個代碼查出一條走勢線，只取 `[today - period, today]` 之間的資料。
///
/// 查無資料的代碼得到空的走勢線；任一查詢失敗則整個請求失敗。
pub async fn assemble(
    store: &dyn PriceStore,
    request: &SeriesRequest,
    today: NaiveDate,
) -> Result<Vec<Series>> {
    let since = datetime::days_before(today, request.period.days());
    let mut series = Vec::with_capacity(request.symbols.len());

    for symbol in &request.symbols {
        let points = store
            .price_series(symbol, &request.currency, since, today)
            .await?;

        series.push(Series {
            name: format!("{} in {}", symbol, request.currency),
            data: points
                .iter()
                .map(|p| SeriesPoint(datetime::to_iso_string(&p.fetched_at), p.price))
                .collect(),
        });
    }

    Ok(series)
}
