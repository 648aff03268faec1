/// 走勢圖資料組裝與幣別換算
pub mod series;
/// 摘要表漲跌幅計算
pub mod summary;
