// ==========================================
// 磨机给矿产量预测 - 班次与时间窗口
// ==========================================
// 生产日: 06:00 起算的滚动 24 小时, 跨越午夜
// ==========================================

use crate::domain::types::ShiftNumber;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 班次时长 (小时)
pub const SHIFT_HOURS: f64 = 8.0;

/// 生产日时长 (小时)
pub const DAY_HOURS: f64 = 24.0;

/// 生产日起点 (整点)
pub const DAY_START_HOUR: u32 = 6;

// ==========================================
// ShiftInfo - 当前班次
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftInfo {
    pub shift_number: ShiftNumber,
    pub name: String,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl ShiftInfo {
    pub fn for_shift(shift_number: ShiftNumber) -> Self {
        let start_hour = shift_number.start_hour();
        let end_hour = shift_number.end_hour();
        Self {
            shift_number,
            name: format!(
                "Shift {} ({:02}:00-{:02}:00)",
                shift_number.number(),
                start_hour,
                end_hour
            ),
            start_hour,
            end_hour,
        }
    }
}

// ==========================================
// TimeWindow - 时间窗口解析结果
// ==========================================
// 3 班期间 hours_to_shift_end == hours_to_day_end (生产日在 06:00 翻转)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub evaluated_at: NaiveDateTime,
    pub production_day: NaiveDate,
    pub shift: ShiftInfo,

    /// 当前时刻 (小数小时, 0-24)
    pub clock_hour: f64,

    pub hours_to_shift_end: f64,
    pub hours_to_day_end: f64,
    pub hours_elapsed_in_shift: f64,
    pub hours_elapsed_in_day: f64,
}
