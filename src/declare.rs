use std::str::FromStr;

use strum::{AsRefStr, EnumIter, EnumString};

/// 美元的幣別代碼，不需要換匯
pub const USD: &str = "USD";

/// 已知的商品/加密貨幣代碼
#[derive(PartialEq, Eq, Debug, Copy, Clone, EnumString, AsRefStr, EnumIter)]
pub enum Instrument {
    /// 比特幣
    #[strum(serialize = "BTC")]
    Bitcoin,
    /// 黃金
    #[strum(serialize = "XAU")]
    Gold,
    /// 白銀
    #[strum(serialize = "XAG")]
    Silver,
    /// 鈀金
    #[strum(serialize = "XPD")]
    Palladium,
    /// 鉑金
    #[strum(serialize = "XPT")]
    Platinum,
    /// 銅
    #[strum(serialize = "HG")]
    Copper,
}

impl Instrument {
    pub fn from_symbol(symbol: &str) -> Option<Instrument> {
        Instrument::from_str(symbol).ok()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Instrument::Bitcoin => "Bitcoin",
            Instrument::Gold => "Gold",
            Instrument::Silver => "Silver",
            Instrument::Palladium => "Palladium",
            Instrument::Platinum => "Platinum",
            Instrument::Copper => "Copper",
        }
    }

    /// 摘要表顯示價格時保留的小數位數
    pub fn price_scale(&self) -> u32 {
        match self {
            Instrument::Bitcoin => 2,
            _ => DEFAULT_PRICE_SCALE,
        }
    }
}

/// 不在 [`Instrument`] 內的代碼一律以 4 位小數顯示
pub const DEFAULT_PRICE_SCALE: u32 = 4;

/// 回傳代碼的顯示名稱，未知代碼原樣回傳
pub fn display_name(symbol: &str) -> String {
    Instrument::from_symbol(symbol)
        .map(|i| i.name().to_string())
        .unwrap_or_else(|| symbol.to_string())
}

/// 回傳代碼的價格小數位數
pub fn price_scale(symbol: &str) -> u32 {
    Instrument::from_symbol(symbol)
        .map(|i| i.price_scale())
        .unwrap_or(DEFAULT_PRICE_SCALE)
}

/// 走勢圖的查詢區間
#[derive(PartialEq, Eq, Debug, Copy, Clone, Default, EnumString, AsRefStr, EnumIter)]
pub enum Period {
    #[strum(serialize = "1d")]
    OneDay,
    #[strum(serialize = "1w")]
    OneWeek,
    #[strum(serialize = "1m")]
    OneMonth,
    #[strum(serialize = "3m")]
    ThreeMonths,
    #[strum(serialize = "6m")]
    SixMonths,
    #[default]
    #[strum(serialize = "1y")]
    OneYear,
    #[strum(serialize = "2y")]
    TwoYears,
    #[strum(serialize = "5y")]
    FiveYears,
}

impl Period {
    /// 解析 query string 的 period，無法辨識時視為 1y
    pub fn parse_or_default(period: Option<&str>) -> Period {
        period
            .and_then(|p| Period::from_str(p.trim()).ok())
            .unwrap_or_default()
    }

    pub fn days(&self) -> i64 {
        match self {
            Period::OneDay => 1,
            Period::OneWeek => 7,
            Period::OneMonth => 30,
            Period::ThreeMonths => 90,
            Period::SixMonths => 180,
            Period::OneYear => 365,
            Period::TwoYears => 730,
            Period::FiveYears => 1825,
        }
    }
}

/// 摘要表比較漲跌幅用的回溯天數
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
#[repr(i64)]
pub enum Lookback {
    Week = 7,
    Month = 30,
    Year = 365,
}

impl Lookback {
    pub fn days(&self) -> i64 {
        *self as i64
    }
}
