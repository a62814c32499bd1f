// ==========================================
// ForecastCalculator 集成测试
// ==========================================
// 测试目标: 三点外推、所需给矿量、小时序列
// 覆盖范围: 系数顺序、班末零剩余时间、已完成产量推算
// ==========================================

mod test_helpers;

use ore_feed_forecast::domain::{Horizon, TimeWindow};
use ore_feed_forecast::engine::{
    ForecastCalculator, ForecastInput, TimeWindowResolver, UncertaintyModel, HOURLY_POINTS,
};
use test_helpers::{approx_eq, at, EPS};

fn window_at(hour: u32, minute: u32) -> TimeWindow {
    TimeWindowResolver::new().resolve(at(hour, minute))
}

// ==========================================
// 测试用例 1: 三点外推
// ==========================================

#[test]
fn test_optimistic_expected_pessimistic_ordering() {
    let calculator = ForecastCalculator::default();
    let model = UncertaintyModel::default();
    let window = window_at(9, 0);

    for percent in [1.0, 5.0, 12.5, 20.0, 30.0] {
        let uncertainty = model.evaluate(percent);
        for rate in [0.0, 50.0, 180.0, 900.0] {
            let outcome = calculator.calculate(&ForecastInput {
                window: &window,
                uncertainty: &uncertainty,
                shift_target_t: 1400.0,
                day_target_t: 4000.0,
                current_rate: 160.0,
                adjusted_rate: rate,
                shift_so_far_t: Some(450.0),
                day_so_far_t: Some(450.0),
            });

            for horizon in [&outcome.shift, &outcome.day] {
                assert!(horizon.optimistic_t >= horizon.expected_t);
                assert!(horizon.expected_t >= horizon.pessimistic_t);
            }
        }
    }
}

#[test]
fn test_linear_extrapolation_values() {
    let calculator = ForecastCalculator::default();
    let uncertainty = UncertaintyModel::default().evaluate(10.0);
    let window = window_at(10, 0); // 距班末 4h, 距日末 20h

    let outcome = calculator.calculate(&ForecastInput {
        window: &window,
        uncertainty: &uncertainty,
        shift_target_t: 1400.0,
        day_target_t: 4000.0,
        current_rate: 150.0,
        adjusted_rate: 200.0,
        shift_so_far_t: Some(600.0),
        day_so_far_t: Some(600.0),
    });

    let shift = &outcome.shift;
    assert_eq!(shift.horizon, Horizon::Shift);
    assert!(approx_eq(shift.optimistic_t, 600.0 + 4.0 * 200.0, EPS));
    assert!(approx_eq(shift.expected_t, 600.0 + 4.0 * 200.0 * 0.9, EPS));
    assert!(approx_eq(shift.pessimistic_t, 600.0 + 4.0 * 200.0 * 0.9 * 0.85, EPS));

    // 所需 = (1400 - 600) / 4 = 200, 调整后 = 200 / 0.9
    assert!(approx_eq(shift.required_rate, 200.0, EPS));
    assert!(approx_eq(shift.adjusted_required_rate, 200.0 / 0.9, EPS));
    assert!(!shift.can_meet_target);

    let day = &outcome.day;
    assert!(approx_eq(day.hours_remaining, 20.0, EPS));
    assert!(approx_eq(day.required_rate, (4000.0 - 600.0) / 20.0, EPS));
}

#[test]
fn test_production_so_far_falls_back_to_rate_times_elapsed() {
    let calculator = ForecastCalculator::default();
    let uncertainty = UncertaintyModel::default().evaluate(0.0);
    let window = window_at(9, 30); // 班内已过 3.5h, 日内已过 3.5h

    let outcome = calculator.calculate(&ForecastInput {
        window: &window,
        uncertainty: &uncertainty,
        shift_target_t: 1400.0,
        day_target_t: 4000.0,
        current_rate: 160.0,
        adjusted_rate: 160.0,
        shift_so_far_t: None,
        day_so_far_t: None,
    });

    assert!(approx_eq(outcome.shift.production_so_far_t, 3.5 * 160.0, EPS));
    assert!(approx_eq(outcome.day.production_so_far_t, 3.5 * 160.0, EPS));
}

// ==========================================
// 测试用例 2: 零剩余时间 / 已达标
// ==========================================

#[test]
fn test_zero_hours_remaining_yields_zero_required_rate() {
    let calculator = ForecastCalculator::default();
    let uncertainty = UncertaintyModel::default().evaluate(15.0);

    let horizon = calculator.project_horizon(Horizon::Shift, &uncertainty, 1400.0, 900.0, 0.0, 180.0);

    assert_eq!(horizon.required_rate, 0.0);
    assert_eq!(horizon.adjusted_required_rate, 0.0);
    assert!(horizon.required_rate.is_finite());
    assert_eq!(horizon.optimistic_t, 900.0);
    assert_eq!(horizon.stoppages.expected_stoppages, 0);
}

#[test]
fn test_target_already_met_requires_zero_rate() {
    let calculator = ForecastCalculator::default();
    let uncertainty = UncertaintyModel::default().evaluate(15.0);

    let horizon = calculator.project_horizon(Horizon::Day, &uncertainty, 4000.0, 4100.0, 3.0, 150.0);

    assert_eq!(horizon.required_rate, 0.0);
    assert!(horizon.can_meet_target);
}

#[test]
fn test_negative_adjusted_rate_is_treated_as_zero() {
    let calculator = ForecastCalculator::default();
    let uncertainty = UncertaintyModel::default().evaluate(20.0);
    let window = window_at(15, 0);

    let outcome = calculator.calculate(&ForecastInput {
        window: &window,
        uncertainty: &uncertainty,
        shift_target_t: 1300.0,
        day_target_t: 4000.0,
        current_rate: 100.0,
        adjusted_rate: -50.0,
        shift_so_far_t: Some(100.0),
        day_so_far_t: Some(1500.0),
    });

    assert_eq!(outcome.shift.optimistic_t, 100.0);
    assert_eq!(outcome.shift.pessimistic_t, 100.0);
}

// ==========================================
// 测试用例 3: 预期停机
// ==========================================

#[test]
fn test_expected_stoppages_formula() {
    let model = UncertaintyModel::default();
    let uncertainty = model.evaluate(30.0); // 0.25 / 25min

    // round(4 × 60 × 0.25 / 25) = round(2.4) = 2
    let estimate = model.estimate_stoppages(&uncertainty, 4.0);
    assert_eq!(estimate.expected_stoppages, 2);
    assert!(approx_eq(estimate.expected_downtime_minutes, 50.0, EPS));
}

// ==========================================
// 测试用例 4: 小时序列
// ==========================================

#[test]
fn test_hourly_series_shape() {
    let calculator = ForecastCalculator::default();
    let uncertainty = UncertaintyModel::default().evaluate(20.0);
    let window = window_at(10, 30); // 日内已过 4.5h

    let series = calculator.hourly_series(&window, &uncertainty, 700.0, 4000.0);

    assert_eq!(series.len(), HOURLY_POINTS as usize);
    assert_eq!(series[0].clock_hour, 6);
    assert_eq!(series[18].clock_hour, 0);
    assert_eq!(series[24].clock_hour, 6);

    // 06..09 点已过去
    for point in &series[0..4] {
        assert!(point.is_elapsed(), "offset={}", point.offset_hours);
    }

    // 当前整点 (10 点) 从当前产量出发, 带宽为 0
    let current = &series[4];
    assert_eq!(current.expected_t, Some(700.0));
    assert_eq!(current.optimistic_t, Some(700.0));
    assert_eq!(current.pessimistic_t, Some(700.0));

    // 终点到达日目标, 带宽 = 差额 × 20%
    let last = &series[24];
    assert!(approx_eq(last.expected_t.unwrap(), 4000.0, EPS));
    assert!(approx_eq(last.optimistic_t.unwrap(), 4000.0 + 3300.0 * 0.2, EPS));
    assert!(approx_eq(last.pessimistic_t.unwrap(), 4000.0 - 3300.0 * 0.2, EPS));

    // 带宽单调放大
    let spreads: Vec<f64> = series[4..]
        .iter()
        .map(|p| p.optimistic_t.unwrap() - p.expected_t.unwrap())
        .collect();
    assert!(spreads.windows(2).all(|w| w[1] >= w[0] - EPS));
}
