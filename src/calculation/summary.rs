use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::{
    database::PriceStore,
    declare::{self, Lookback},
    logging,
    util::datetime,
};

/// 摘要表的一列
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub symbol: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub change_7d: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub change_1m: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub change_1y: Option<Decimal>,
}

/// 漲跌幅百分比，四捨五入到小數第 2 位。
///
/// 沒有比較價格或比較價格為 0 時回傳 `None`。
pub fn percent_change(current: Decimal, reference: Option<Decimal>) -> Option<Decimal> {
    let reference = reference.filter(|r| !r.is_zero())?;
    current
        .checked_sub(reference)?
        .checked_div(reference)?
        .checked_mul(dec!(100))
        .map(|change| change.round_dp(2))
}

/// 為每個代碼計算最新價格與 7 天、30 天、365 天的漲跌幅。
///
/// 沒有最新價格（或最新價格為 NULL）的代碼不列入；
/// 輸出順序與代碼掃描的順序相同。
pub async fn summarize(store: &dyn PriceStore, today: NaiveDate) -> Result<Vec<SummaryRow>> {
    let symbols = store.symbols().await?;
    let mut rows = Vec::with_capacity(symbols.len());

    for symbol in symbols {
        let latest = match store.latest_price(&symbol).await? {
            Some(latest) => latest,
            None => continue,
        };
        let current = match latest.usd_price {
            Some(price) => price,
            None => continue,
        };

        let week = reference_price(store, &symbol, today, Lookback::Week).await?;
        let month = reference_price(store, &symbol, today, Lookback::Month).await?;
        let year = reference_price(store, &symbol, today, Lookback::Year).await?;

        logging::debug_file_async(format!(
            "{} latest {} at {}, references {:?} {:?} {:?}",
            symbol, current, latest.fetched_at, week, month, year
        ));

        rows.push(SummaryRow {
            name: declare::display_name(&symbol),
            price: current.round_dp(declare::price_scale(&symbol)),
            change_7d: percent_change(current, week),
            change_1m: percent_change(current, month),
            change_1y: percent_change(current, year),
            symbol,
        });
    }

    Ok(rows)
}

async fn reference_price(
    store: &dyn PriceStore,
    symbol: &str,
    today: NaiveDate,
    lookback: Lookback,
) -> Result<Option<Decimal>> {
    store
        .price_on_or_before(symbol, datetime::days_before(today, lookback.days()))
        .await
}
