// ==========================================
// 磨机给矿产量预测 - 不确定度
// ==========================================
// 由 0-30% 不确定度旋钮线性插值得到
// 不变量: availability_factor = (100 - percent) / 100
// ==========================================

use crate::domain::types::UncertaintyTier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Uncertainty {
    /// 钳制后的不确定度 (%)
    pub percent: f64,
    pub tier: UncertaintyTier,
    pub name: String,
    pub color_tag: String,

    /// 设备可用率 ∈ (0, 1]
    pub availability_factor: f64,

    /// 每分钟停机概率
    pub stoppage_probability_per_minute: f64,

    /// 平均停机时长 (分钟)
    pub average_stoppage_duration_minutes: f64,
}

// ==========================================
// StoppageEstimate - 预期停机
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StoppageEstimate {
    pub expected_stoppages: u32,
    pub expected_downtime_minutes: f64,
}
