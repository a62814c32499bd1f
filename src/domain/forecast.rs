// ==========================================
// 磨机给矿产量预测 - 预测快照
// ==========================================
// 每次依赖变化 (目标/给矿量/不确定度/磨机选择/时钟) 整体重建
// 只在进程内传递给图表, 序列化仅用于 CLI 输出
// ==========================================

use crate::domain::mill::PerMillSetpoint;
use crate::domain::shift::TimeWindow;
use crate::domain::types::Horizon;
use crate::domain::uncertainty::{StoppageEstimate, Uncertainty};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// HorizonForecast - 单口径 (班/日) 预测
// ==========================================
// 不变量: optimistic ≥ expected ≥ pessimistic (adjusted_rate ≥ 0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizonForecast {
    pub horizon: Horizon,
    pub target_t: f64,
    pub production_so_far_t: f64,
    pub hours_remaining: f64,

    // ===== 三点外推 (吨) =====
    pub optimistic_t: f64,
    pub expected_t: f64,
    pub pessimistic_t: f64,

    // ===== 达标所需给矿量 (t/h) =====
    /// 理想所需 (≥0, 0 表示已达标)
    pub required_rate: f64,
    /// 按可用率放大后的所需
    pub adjusted_required_rate: f64,

    pub can_meet_target: bool,
    pub stoppages: StoppageEstimate,
}

// ==========================================
// ForecastPoint - 小时序列点 (图表用)
// ==========================================
// 已过去的点不给出预测 (None)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// 距 06:00 的小时偏移 (0..=24)
    pub offset_hours: u32,
    /// 钟点 (0-23)
    pub clock_hour: u32,
    pub optimistic_t: Option<f64>,
    pub expected_t: Option<f64>,
    pub pessimistic_t: Option<f64>,
}

impl ForecastPoint {
    pub fn is_elapsed(&self) -> bool {
        self.expected_t.is_none()
    }
}

// ==========================================
// Forecast - 预测快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub computed_at: NaiveDateTime,
    pub window: TimeWindow,
    pub uncertainty: Uncertainty,

    /// 实时给矿量合计 (t/h)
    pub current_rate: f64,
    /// 剩余时段采用的给矿量 (t/h)
    pub adjusted_rate: f64,

    pub shift: HorizonForecast,
    pub day: HorizonForecast,
    pub can_meet_shift_target: bool,
    pub can_meet_day_target: bool,

    pub hourly: Vec<ForecastPoint>,
    pub setpoints: Vec<PerMillSetpoint>,
}
