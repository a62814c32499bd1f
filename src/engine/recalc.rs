// ==========================================
// 磨机给矿产量预测 - 预测重算引擎
// ==========================================
// 职责: 由会话状态生成完整预测快照
// 规则: 依赖版本 (session_id + revision) 未变时复用上次结果,
//       每批变化最多重算一次
// ==========================================
// 数据源不可用时: 以剩余给矿量为全厂合计, 按已知磨机均分
// ==========================================

use crate::config::ForecastConfig;
use crate::domain::forecast::Forecast;
use crate::engine::forecast::{ForecastCalculator, ForecastInput};
use crate::engine::session::ForecastState;
use crate::engine::setpoint::{AllocationRequest, SetpointAllocator};
use crate::engine::time_window::TimeWindowResolver;
use crate::engine::uncertainty::UncertaintyModel;
use std::collections::BTreeMap;
use tracing::instrument;
use uuid::Uuid;

pub struct ForecastRecalc {
    resolver: TimeWindowResolver,
    uncertainty: UncertaintyModel,
    calculator: ForecastCalculator,
    allocator: SetpointAllocator,
    fallback_mill_ids: Vec<String>,

    // ===== 缓存 =====
    last: Option<(Uuid, u64, Forecast)>,
    recompute_count: u64,
}

impl ForecastRecalc {
    pub fn new(config: &ForecastConfig) -> Self {
        Self {
            resolver: TimeWindowResolver::new(),
            uncertainty: UncertaintyModel::new(config.uncertainty.clone()),
            calculator: ForecastCalculator::new(UncertaintyModel::new(config.uncertainty.clone())),
            allocator: SetpointAllocator::new(),
            fallback_mill_ids: config.mill_ids.clone(),
            last: None,
            recompute_count: 0,
        }
    }

    /// 依赖变化时重算, 否则返回缓存
    pub fn refresh(&mut self, state: &ForecastState) -> &Forecast {
        let forecast = match self.last.take() {
            Some((session_id, revision, forecast))
                if session_id == state.session_id && revision == state.revision =>
            {
                tracing::debug!(revision, "依赖未变化, 复用预测结果");
                forecast
            }
            _ => {
                self.recompute_count += 1;
                self.compute(state)
            }
        };
        &self.last.insert((state.session_id, state.revision, forecast)).2
    }

    /// 实际重算次数
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    /// 生成预测快照 (纯函数)
    #[instrument(skip(self, state), fields(revision = state.revision, has_feed = state.feed.is_some()))]
    pub fn compute(&self, state: &ForecastState) -> Forecast {
        let window = self.resolver.resolve(state.now);
        let uncertainty = self.uncertainty.evaluate(state.uncertainty_percent);
        let active = window.shift.shift_number;

        // 1. 实时数据 / 兜底
        let (rates, current_rate, shift_so_far, day_so_far) = match &state.feed {
            Some(feed) if !feed.is_empty() => (
                feed.current_rates(),
                feed.total_rate(),
                Some(feed.shift_actual_t(active)),
                Some(feed.day_actual_t()),
            ),
            _ => {
                let total = state.adjusted_rate.unwrap_or(0.0);
                let rates: BTreeMap<String, f64> =
                    SetpointAllocator::equal_split(&self.fallback_mill_ids, total);
                (rates, total, None, None)
            }
        };
        let adjusted_rate = state.adjusted_rate.unwrap_or(current_rate);
        let shift_target_t = state.shift_targets.target(active);

        // 2. 班/日预测
        let outcome = self.calculator.calculate(&ForecastInput {
            window: &window,
            uncertainty: &uncertainty,
            shift_target_t,
            day_target_t: state.day_target_t,
            current_rate,
            adjusted_rate,
            shift_so_far_t: shift_so_far,
            day_so_far_t: day_so_far,
        });

        // 3. 单机设定值
        let setpoints = self.allocator.allocate(&AllocationRequest {
            rates: &rates,
            selected: &state.selected_mills,
            mode: state.selection_mode,
            shift_target_t,
            shift_so_far_t: outcome.shift.production_so_far_t,
            hours_to_shift_end: window.hours_to_shift_end,
            day_target_t: state.day_target_t,
            day_so_far_t: outcome.day.production_so_far_t,
            hours_to_day_end: window.hours_to_day_end,
        });

        Forecast {
            computed_at: state.now,
            current_rate,
            adjusted_rate: if adjusted_rate.is_finite() { adjusted_rate.max(0.0) } else { 0.0 },
            can_meet_shift_target: outcome.shift.can_meet_target,
            can_meet_day_target: outcome.day.can_meet_target,
            shift: outcome.shift,
            day: outcome.day,
            hourly: outcome.hourly,
            setpoints,
            window,
            uncertainty,
        }
    }
}

impl Default for ForecastRecalc {
    fn default() -> Self {
        Self::new(&ForecastConfig::default())
    }
}
