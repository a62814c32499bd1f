// ==========================================
// 磨机给矿产量预测 - 预测计算引擎
// ==========================================
// 职责: 当前产量 + 剩余时段给矿量 + 不确定度 → 班/日三点预测
// 输入: ForecastInput (时间窗口/不确定度/目标/给矿量/已完成产量)
// 输出: ForecastOutcome (班/日 HorizonForecast + 小时序列)
// ==========================================
// 规则:
// 1) 乐观系数 1.0, 预期系数 = 可用率, 悲观系数 = 可用率 × 0.85
// 2) forecast = 已完成 + 剩余小时 × 给矿量 × 系数 (三次独立线性外推)
// 3) 所需给矿量 = (目标 - 已完成) / 剩余小时, 剩余小时为 0 时取 0
// 4) 调整后所需 = 所需 / 预期系数
// ==========================================

use crate::domain::forecast::{ForecastPoint, HorizonForecast};
use crate::domain::shift::{TimeWindow, DAY_HOURS, DAY_START_HOUR};
use crate::domain::types::Horizon;
use crate::domain::uncertainty::Uncertainty;
use crate::engine::uncertainty::UncertaintyModel;
use tracing::instrument;

/// 小时序列点数 (06:00 → 次日 06:00, 含两端)
pub const HOURLY_POINTS: u32 = 25;

/// 达标判定容差 (吨)
const MEET_TOLERANCE_T: f64 = 1e-6;

// ==========================================
// ForecastInput - 计算输入
// ==========================================
#[derive(Debug, Clone)]
pub struct ForecastInput<'a> {
    pub window: &'a TimeWindow,
    pub uncertainty: &'a Uncertainty,
    pub shift_target_t: f64,
    pub day_target_t: f64,

    /// 实时给矿量合计 (t/h), 用于推算缺失的已完成产量
    pub current_rate: f64,
    /// 剩余时段给矿量 (t/h)
    pub adjusted_rate: f64,

    /// 实时数据提供的已完成产量, None 时按 已过小时 × current_rate 推算
    pub shift_so_far_t: Option<f64>,
    pub day_so_far_t: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOutcome {
    pub shift: HorizonForecast,
    pub day: HorizonForecast,
    pub hourly: Vec<ForecastPoint>,
}

// ==========================================
// ForecastCalculator - 预测计算引擎
// ==========================================
pub struct ForecastCalculator {
    uncertainty_model: UncertaintyModel,
}

impl ForecastCalculator {
    pub fn new(uncertainty_model: UncertaintyModel) -> Self {
        Self { uncertainty_model }
    }

    /// 执行预测计算
    #[instrument(skip(self, input), fields(
        shift = %input.window.shift.shift_number,
        uncertainty_percent = input.uncertainty.percent,
        adjusted_rate = input.adjusted_rate
    ))]
    pub fn calculate(&self, input: &ForecastInput<'_>) -> ForecastOutcome {
        let window = input.window;
        let current_rate = sanitize_rate(input.current_rate);
        let adjusted_rate = sanitize_rate(input.adjusted_rate);
        if adjusted_rate != input.adjusted_rate {
            tracing::debug!(raw = input.adjusted_rate, "剩余给矿量非法, 按 0 处理");
        }

        let shift_so_far = input
            .shift_so_far_t
            .filter(|v| v.is_finite())
            .unwrap_or(window.hours_elapsed_in_shift * current_rate);
        let day_so_far = input
            .day_so_far_t
            .filter(|v| v.is_finite())
            .unwrap_or(window.hours_elapsed_in_day * current_rate);

        let shift = self.project_horizon(
            Horizon::Shift,
            input.uncertainty,
            input.shift_target_t,
            shift_so_far,
            window.hours_to_shift_end,
            adjusted_rate,
        );
        let day = self.project_horizon(
            Horizon::Day,
            input.uncertainty,
            input.day_target_t,
            day_so_far,
            window.hours_to_day_end,
            adjusted_rate,
        );
        let hourly = self.hourly_series(window, input.uncertainty, day_so_far, input.day_target_t);

        ForecastOutcome { shift, day, hourly }
    }

    /// 单口径三点外推
    pub fn project_horizon(
        &self,
        horizon: Horizon,
        uncertainty: &Uncertainty,
        target_t: f64,
        production_so_far_t: f64,
        hours_remaining: f64,
        adjusted_rate: f64,
    ) -> HorizonForecast {
        let hours = if hours_remaining.is_finite() { hours_remaining.max(0.0) } else { 0.0 };
        let expected_factor = uncertainty.availability_factor;
        let pessimistic_factor = self.uncertainty_model.pessimistic_factor(uncertainty);

        let extrapolate = |factor: f64| production_so_far_t + hours * adjusted_rate * factor;
        let optimistic_t = extrapolate(1.0);
        let expected_t = extrapolate(expected_factor);
        let pessimistic_t = extrapolate(pessimistic_factor);

        let required_rate = required_rate(target_t, production_so_far_t, hours);
        let adjusted_required_rate = safe_div(required_rate, expected_factor);

        HorizonForecast {
            horizon,
            target_t,
            production_so_far_t,
            hours_remaining: hours,
            optimistic_t,
            expected_t,
            pessimistic_t,
            required_rate,
            adjusted_required_rate,
            can_meet_target: expected_t + MEET_TOLERANCE_T >= target_t,
            stoppages: self.uncertainty_model.estimate_stoppages(uncertainty, hours),
        }
    }

    /// 小时序列 (图表用)
    ///
    /// - 已过去的整点: 不给出预测
    /// - 当前及未来整点: 由当前产量线性走向日目标,
    ///   上下带宽与不确定度成正比, 起点为 0, 向终点逐渐放大
    pub fn hourly_series(
        &self,
        window: &TimeWindow,
        uncertainty: &Uncertainty,
        day_so_far_t: f64,
        day_target_t: f64,
    ) -> Vec<ForecastPoint> {
        let elapsed = window.hours_elapsed_in_day;
        let remaining = DAY_HOURS - elapsed;
        let gap = day_target_t - day_so_far_t;
        let spread_ratio = uncertainty.percent / 100.0;

        (0..HOURLY_POINTS)
            .map(|offset| {
                let clock_hour = (DAY_START_HOUR + offset) % 24;
                let offset_f = offset as f64;

                if offset_f + 1.0 <= elapsed {
                    return ForecastPoint {
                        offset_hours: offset,
                        clock_hour,
                        optimistic_t: None,
                        expected_t: None,
                        pessimistic_t: None,
                    };
                }

                let progress = if remaining > 0.0 {
                    ((offset_f - elapsed) / remaining).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                let expected = day_so_far_t + gap * progress;
                let spread = gap.abs() * progress * spread_ratio;

                ForecastPoint {
                    offset_hours: offset,
                    clock_hour,
                    optimistic_t: Some(expected + spread),
                    expected_t: Some(expected),
                    pessimistic_t: Some((expected - spread).max(0.0)),
                }
            })
            .collect()
    }
}

impl Default for ForecastCalculator {
    fn default() -> Self {
        Self::new(UncertaintyModel::default())
    }
}

/// 达标所需给矿量, 剩余时间为 0 时返回 0, 已达标时返回 0
pub fn required_rate(target_t: f64, production_so_far_t: f64, hours_remaining: f64) -> f64 {
    safe_div(target_t - production_so_far_t, hours_remaining).max(0.0)
}

/// 除零保护: 分母非正或结果非有限时返回 0
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    let value = numerator / denominator;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn sanitize_rate(rate: f64) -> f64 {
    if rate.is_finite() {
        rate.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rate_zero_hours_is_zero() {
        assert_eq!(required_rate(1400.0, 200.0, 0.0), 0.0);
        assert_eq!(required_rate(1400.0, 200.0, -1.0), 0.0);
    }

    #[test]
    fn test_required_rate_target_met_is_zero() {
        assert_eq!(required_rate(1000.0, 1200.0, 2.0), 0.0);
        assert!((required_rate(1000.0, 600.0, 2.0) - 200.0).abs() < 1e-12);
    }

    #[test]
    fn test_safe_div_guards() {
        assert_eq!(safe_div(10.0, 0.0), 0.0);
        assert_eq!(safe_div(10.0, f64::NAN), 0.0);
        assert_eq!(safe_div(10.0, 4.0), 2.5);
    }
}
