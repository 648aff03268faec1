/// 商品價格與同日匯率換算
pub mod commodity_price;
