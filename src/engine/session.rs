// ==========================================
// 磨机给矿产量预测 - 会话状态
// ==========================================
// 职责: 单会话的预测状态 + 纯函数式更新 (reducer)
// 规则: apply(state, action) 返回新状态, 不修改原状态
//       只有状态实际变化时 revision 才递增
// ==========================================

use crate::config::ForecastConfig;
use crate::domain::mill::FeedSnapshot;
use crate::domain::targets::ShiftTargets;
use crate::domain::types::{SelectionMode, ShiftNumber};
use crate::engine::error::{ensure_non_negative, ForecastError};
use crate::engine::redistributor::ShiftTargetRedistributor;
use crate::engine::time_window::TimeWindowResolver;
use crate::engine::uncertainty::UncertaintyModel;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// ForecastState - 会话状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastState {
    pub session_id: Uuid,
    /// 依赖版本号 (每次实际变化 +1)
    pub revision: u64,
    pub now: NaiveDateTime,

    pub day_target_t: f64,
    pub shift_targets: ShiftTargets,
    pub uncertainty_percent: f64,

    /// 剩余时段给矿量 (t/h), None 表示沿用实时给矿量
    pub adjusted_rate: Option<f64>,

    pub selected_mills: Vec<String>,
    pub selection_mode: SelectionMode,

    /// 最近一次实时数据, None 表示数据源不可用
    pub feed: Option<FeedSnapshot>,
}

// ==========================================
// ForecastAction - 更新操作
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastAction {
    SetDayTarget(f64),
    SetShiftTarget(ShiftNumber, f64),
    ToggleShiftLock(ShiftNumber),
    SetUncertaintyPercent(f64),
    SetAdjustedRate(Option<f64>),
    SetMillSelection(Vec<String>),
    SetSelectionMode(SelectionMode),
    ApplyFeed(FeedSnapshot),
    ClearFeed,
    Tick(NaiveDateTime),
}

// ==========================================
// ForecastSession - 状态更新器
// ==========================================
pub struct ForecastSession {
    resolver: TimeWindowResolver,
    redistributor: ShiftTargetRedistributor,
    uncertainty: UncertaintyModel,
    day_target_t: f64,
    initial_uncertainty_percent: f64,
    selection_mode: SelectionMode,
}

impl ForecastSession {
    pub fn new(config: &ForecastConfig) -> Self {
        Self {
            resolver: TimeWindowResolver::new(),
            redistributor: ShiftTargetRedistributor::new(config.shift_weights.clone()),
            uncertainty: UncertaintyModel::new(config.uncertainty.clone()),
            day_target_t: config.day_target_t,
            initial_uncertainty_percent: config.initial_uncertainty_percent,
            selection_mode: config.selection_mode,
        }
    }

    /// 初始状态: 按配置日目标拆分三班目标, 无锁定, 无实时数据
    pub fn initial_state(&self, now: NaiveDateTime) -> ForecastState {
        let active = self.active_shift(now);
        let shift_targets = self.redistributor.split_day_target(
            &ShiftTargets::default(),
            self.day_target_t,
            active,
        );

        ForecastState {
            session_id: Uuid::new_v4(),
            revision: 0,
            now,
            day_target_t: self.day_target_t,
            shift_targets,
            uncertainty_percent: self.uncertainty.clamp_percent(self.initial_uncertainty_percent),
            adjusted_rate: None,
            selected_mills: Vec::new(),
            selection_mode: self.selection_mode,
            feed: None,
        }
    }

    /// 应用一次更新
    pub fn apply(&self, state: &ForecastState, action: ForecastAction) -> Result<ForecastState, ForecastError> {
        let mut next = state.clone();

        match action {
            ForecastAction::SetDayTarget(value) => {
                let value = ensure_non_negative("day_target_t", value)?;
                next.day_target_t = value;
                next.shift_targets = self.redistributor.split_day_target(
                    &state.shift_targets,
                    value,
                    self.active_shift(state.now),
                );
            }
            ForecastAction::SetShiftTarget(shift, value) => {
                let value = ensure_non_negative("shift_target_t", value)?;
                next.shift_targets = self.redistributor.adjust_shift(
                    &state.shift_targets,
                    state.day_target_t,
                    shift,
                    value,
                );
            }
            ForecastAction::ToggleShiftLock(shift) => {
                let (targets, applied) =
                    self.redistributor
                        .toggle_lock(&state.shift_targets, state.day_target_t, shift);
                if !applied {
                    return Ok(next);
                }
                next.shift_targets = targets;
            }
            ForecastAction::SetUncertaintyPercent(percent) => {
                if percent.is_nan() {
                    return Err(ForecastError::InvalidInput("uncertainty_percent 不能为 NaN".to_string()));
                }
                next.uncertainty_percent = self.uncertainty.clamp_percent(percent);
            }
            ForecastAction::SetAdjustedRate(rate) => {
                next.adjusted_rate = match rate {
                    Some(r) => Some(ensure_non_negative("adjusted_rate", r)?),
                    None => None,
                };
            }
            ForecastAction::SetMillSelection(mut mills) => {
                mills.sort();
                mills.dedup();
                next.selected_mills = mills;
            }
            ForecastAction::SetSelectionMode(mode) => {
                next.selection_mode = mode;
            }
            ForecastAction::ApplyFeed(snapshot) => {
                tracing::info!(mills = snapshot.mills.len(), received_at = %snapshot.received_at, "应用实时数据");
                next.feed = Some(snapshot.into_finite());
            }
            ForecastAction::ClearFeed => {
                next.feed = None;
            }
            ForecastAction::Tick(now) => {
                next.now = now;
            }
        }

        if next != *state {
            next.revision = state.revision.wrapping_add(1);
        }
        Ok(next)
    }

    fn active_shift(&self, now: NaiveDateTime) -> ShiftNumber {
        self.resolver.resolve(now).shift.shift_number
    }
}

impl Default for ForecastSession {
    fn default() -> Self {
        Self::new(&ForecastConfig::default())
    }
}
