// ==========================================
// 磨机给矿产量预测 - 时间窗口解析引擎
// ==========================================
// 职责: 由时刻判定当前班次, 计算班次/生产日剩余小时
// 输入: 墙钟时刻 (NaiveDateTime)
// 输出: TimeWindow
// ==========================================
// 说明: 3 班跨越 06:00 日界, 因此 3 班期间
//       "距班末" 与 "距日末" 相同
// ==========================================

use crate::domain::shift::{ShiftInfo, TimeWindow, DAY_HOURS, DAY_START_HOUR, SHIFT_HOURS};
use crate::domain::types::ShiftNumber;
use chrono::{Duration, NaiveDateTime, Timelike};

pub struct TimeWindowResolver {
    // 无状态引擎
}

impl TimeWindowResolver {
    pub fn new() -> Self {
        Self {}
    }

    /// 解析时间窗口 (纯函数)
    pub fn resolve(&self, now: NaiveDateTime) -> TimeWindow {
        let clock_hour = fractional_hour(now);
        let shift_number = ShiftNumber::from_hour(now.hour());

        let hours_to_shift_end = match shift_number {
            ShiftNumber::First | ShiftNumber::Second => shift_number.end_hour() as f64 - clock_hour,
            ShiftNumber::Third => hours_until_day_start(clock_hour),
        };
        let hours_to_day_end = hours_until_day_start(clock_hour);

        // 06:00 前仍属于前一生产日
        let production_day = if now.hour() < DAY_START_HOUR {
            (now - Duration::days(1)).date()
        } else {
            now.date()
        };

        TimeWindow {
            evaluated_at: now,
            production_day,
            shift: ShiftInfo::for_shift(shift_number),
            clock_hour,
            hours_to_shift_end,
            hours_to_day_end,
            hours_elapsed_in_shift: (SHIFT_HOURS - hours_to_shift_end).max(0.0),
            hours_elapsed_in_day: (DAY_HOURS - hours_to_day_end).max(0.0),
        }
    }
}

impl Default for TimeWindowResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// 小数小时 (含分、秒)
fn fractional_hour(t: NaiveDateTime) -> f64 {
    t.hour() as f64 + t.minute() as f64 / 60.0 + t.second() as f64 / 3600.0
}

/// 距下一个 06:00 的小时数, 取值 (0, 24]
fn hours_until_day_start(clock_hour: f64) -> f64 {
    let start = DAY_START_HOUR as f64;
    if clock_hour >= start {
        DAY_HOURS - clock_hour + start
    } else {
        start - clock_hour
    }
}
