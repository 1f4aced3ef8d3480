//! 交易記錄模型與外部資料結構轉換

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 需求資料來源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DemandSource {
    /// 銷售訂單明細
    #[default]
    SalesLines,
    /// 庫存異動（出庫/入庫）
    StockMoves,
}

/// 庫存異動方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// 內部庫位 → 外部（出貨）
    Outgoing,
    /// 外部 → 內部庫位（退貨）
    Incoming,
    /// 內部互轉或與內部無關
    Transfer,
}

/// 已解析的庫位旗標
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub source_internal: bool,
    pub destination_internal: bool,
}

impl Movement {
    pub fn new(source_internal: bool, destination_internal: bool) -> Self {
        Self {
            source_internal,
            destination_internal,
        }
    }

    pub fn direction(&self) -> Direction {
        match (self.source_internal, self.destination_internal) {
            (true, false) => Direction::Outgoing,
            (false, true) => Direction::Incoming,
            _ => Direction::Transfer,
        }
    }
}

/// 交易記錄（唯讀輸入）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// 物料ID
    pub item_id: String,

    /// 物料所屬類別ID
    pub category_id: Option<String>,

    /// 交易日期
    pub date: NaiveDate,

    /// 數量
    pub quantity: f64,

    /// 庫存異動旗標（僅庫存異動來源）
    pub movement: Option<Movement>,
}

impl TransactionRecord {
    /// 創建銷售明細類型的記錄
    pub fn new(item_id: String, date: NaiveDate, quantity: f64) -> Self {
        Self {
            item_id,
            category_id: None,
            date,
            quantity,
            movement: None,
        }
    }

    /// 建構器模式：設置類別
    pub fn with_category_id(mut self, category_id: String) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// 建構器模式：設置庫位旗標
    pub fn with_movement(mut self, movement: Movement) -> Self {
        self.movement = Some(movement);
        self
    }

    pub fn direction(&self) -> Option<Direction> {
        self.movement.map(|m| m.direction())
    }
}

/// 庫存異動（外部結構）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMove {
    pub item_id: String,
    pub category_id: Option<String>,
    pub date: NaiveDate,
    pub quantity: f64,
    pub source_internal: bool,
    pub destination_internal: bool,
}

impl StockMove {
    pub fn to_record(&self) -> TransactionRecord {
        TransactionRecord {
            item_id: self.item_id.clone(),
            category_id: self.category_id.clone(),
            date: self.date,
            quantity: self.quantity,
            movement: Some(Movement::new(
                self.source_internal,
                self.destination_internal,
            )),
        }
    }
}

impl From<StockMove> for TransactionRecord {
    fn from(mv: StockMove) -> Self {
        mv.to_record()
    }
}

/// 銷售訂單明細（外部結構）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLine {
    pub item_id: String,
    pub category_id: Option<String>,
    /// 訂單日期
    pub order_date: NaiveDate,
    pub quantity: f64,
}

impl SaleLine {
    pub fn to_record(&self) -> TransactionRecord {
        TransactionRecord {
            item_id: self.item_id.clone(),
            category_id: self.category_id.clone(),
            date: self.order_date,
            quantity: self.quantity,
            movement: None,
        }
    }
}

impl From<SaleLine> for TransactionRecord {
    fn from(line: SaleLine) -> Self {
        line.to_record()
    }
}
