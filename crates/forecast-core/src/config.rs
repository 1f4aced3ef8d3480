//! 預測執行配置模型

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::alert::AlertChannels;
use crate::record::DemandSource;
use crate::series::DateWindow;
use crate::ForecastError;

/// ETS 平滑係數超出 [0, 1] 時的預設值
pub const DEFAULT_ETS_ALPHA: f64 = 0.3;

/// 分組方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupMode {
    /// 按物料
    #[default]
    Item,
    /// 按物料類別
    Category,
}

/// 預測方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    /// 簡單移動平均
    #[default]
    Sma,
    /// 加權移動平均
    Wma,
    /// 簡單指數平滑
    Ets,
}

/// 資料範圍篩選（交給外部查詢使用）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationScope {
    /// 公司
    pub company_id: String,

    /// 倉庫
    pub warehouse_id: Option<String>,

    /// 指定庫位（優先於倉庫）
    pub location_ids: Vec<String>,

    /// 物料類別篩選（含子類別）
    pub category_id: Option<String>,
}

impl LocationScope {
    pub fn new(company_id: String) -> Self {
        Self {
            company_id,
            ..Self::default()
        }
    }
}

/// 單次預測執行的配置
///
/// 執行期間不可變；所有政策開關都在此明確傳入，不讀取全域狀態。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfiguration {
    /// 起始日期
    pub date_from: NaiveDate,

    /// 結束日期（含）
    pub date_to: NaiveDate,

    /// 分組方式
    pub group_by: GroupMode,

    /// 預測方法
    pub method: MethodKind,

    /// WMA 視窗（天）
    pub wma_window: i64,

    /// ETS 平滑係數
    pub ets_alpha: f64,

    /// 預測時界（天）
    pub horizon_days: u32,

    /// 只保留前 N 筆（0 或負數表示不限）
    pub top_n: i64,

    /// 缺貨預警天數
    pub warn_threshold_days: i64,

    /// 需求資料來源
    pub source: DemandSource,

    /// 退貨是否視為負需求（僅庫存異動來源）
    pub include_returns: bool,

    /// 預警通知管道
    pub alert_channels: AlertChannels,

    /// 資料範圍
    pub scope: LocationScope,

    /// 計算基準日（未設置時取本地今天）
    pub as_of: Option<NaiveDate>,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self::new(today - chrono::Duration::days(60), today)
    }
}

impl RunConfiguration {
    /// 創建新的配置
    pub fn new(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            date_from,
            date_to,
            group_by: GroupMode::Item,
            method: MethodKind::Sma,
            wma_window: 7,
            ets_alpha: DEFAULT_ETS_ALPHA,
            horizon_days: 30,
            top_n: 20,
            warn_threshold_days: 7,
            source: DemandSource::SalesLines,
            include_returns: true,
            alert_channels: AlertChannels::default(),
            scope: LocationScope::default(),
            as_of: None,
        }
    }

    /// 從 JSON 載入，缺少的欄位使用預設值
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| ForecastError::InvalidConfig(e.to_string()))
    }

    /// 建構器模式：設置分組方式
    pub fn with_group_by(mut self, group_by: GroupMode) -> Self {
        self.group_by = group_by;
        self
    }

    /// 建構器模式：設置預測方法
    pub fn with_method(mut self, method: MethodKind) -> Self {
        self.method = method;
        self
    }

    /// 建構器模式：設置 WMA 視窗
    pub fn with_wma_window(mut self, window: i64) -> Self {
        self.wma_window = window;
        self
    }

    /// 建構器模式：設置 ETS 平滑係數
    pub fn with_ets_alpha(mut self, alpha: f64) -> Self {
        self.ets_alpha = alpha;
        self
    }

    /// 建構器模式：設置預測時界
    pub fn with_horizon_days(mut self, days: u32) -> Self {
        self.horizon_days = days;
        self
    }

    /// 建構器模式：設置前 N 筆
    pub fn with_top_n(mut self, top_n: i64) -> Self {
        self.top_n = top_n;
        self
    }

    /// 建構器模式：設置預警天數
    pub fn with_warn_threshold_days(mut self, days: i64) -> Self {
        self.warn_threshold_days = days;
        self
    }

    /// 建構器模式：設置資料來源
    pub fn with_source(mut self, source: DemandSource) -> Self {
        self.source = source;
        self
    }

    /// 建構器模式：設置是否計入退貨
    pub fn with_include_returns(mut self, include: bool) -> Self {
        self.include_returns = include;
        self
    }

    /// 建構器模式：設置預警通知管道
    pub fn with_alert_channels(mut self, channels: AlertChannels) -> Self {
        self.alert_channels = channels;
        self
    }

    /// 建構器模式：設置資料範圍
    pub fn with_scope(mut self, scope: LocationScope) -> Self {
        self.scope = scope;
        self
    }

    /// 建構器模式：固定計算基準日
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    /// 驗證配置
    pub fn validate(&self) -> crate::Result<()> {
        self.window().map(|_| ())
    }

    /// 日期區間
    pub fn window(&self) -> crate::Result<DateWindow> {
        DateWindow::new(self.date_from, self.date_to)
    }

    /// 正規化後的 ETS 平滑係數
    pub fn normalized_ets_alpha(&self) -> f64 {
        if (0.0..=1.0).contains(&self.ets_alpha) {
            self.ets_alpha
        } else {
            DEFAULT_ETS_ALPHA
        }
    }

    /// 計算基準日
    pub fn today(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Local::now().date_naive())
    }

    /// 是否限制結果筆數
    pub fn result_limit(&self) -> Option<usize> {
        if self.top_n > 0 {
            Some(self.top_n as usize)
        } else {
            None
        }
    }
}
