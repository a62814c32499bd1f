// ==========================================
// 磨机给矿产量预测 - 单机设定值分配引擎
// ==========================================
// 职责: 将达标所需给矿量按当前占比分配到可调磨机
// 输入: 磨机当前给矿量 + 选择列表 + 选择模式 + 目标/已完成/剩余时间
// 输出: Vec<PerMillSetpoint> (整体重建)
// ==========================================
// 规则:
// 1) 按选择模式划分固定/可调磨机
// 2) 固定磨机按当前给矿量贡献剩余时段吨位
// 3) 可调目标 = 目标 - 已完成 - 固定贡献
// 4) 可调磨机按 当前给矿量 / 可调总给矿量 分配 (总量为 0 时占比全为 0)
// 5) adjustment_needed = 所需班给矿量 - 当前给矿量 (有符号)
// ==========================================

use crate::domain::mill::PerMillSetpoint;
use crate::domain::types::SelectionMode;
use crate::engine::forecast::{required_rate, safe_div};
use std::collections::{BTreeMap, HashSet};
use tracing::instrument;

// ==========================================
// AllocationRequest - 分配输入
// ==========================================
#[derive(Debug, Clone)]
pub struct AllocationRequest<'a> {
    pub rates: &'a BTreeMap<String, f64>,
    pub selected: &'a [String],
    pub mode: SelectionMode,

    pub shift_target_t: f64,
    pub shift_so_far_t: f64,
    pub hours_to_shift_end: f64,

    pub day_target_t: f64,
    pub day_so_far_t: f64,
    pub hours_to_day_end: f64,
}

pub struct SetpointAllocator {
    // 无状态引擎
}

impl SetpointAllocator {
    pub fn new() -> Self {
        Self {}
    }

    /// 数据源不可用时的兜底: 全厂给矿量均分到已知磨机
    pub fn equal_split(mill_ids: &[String], total_rate: f64) -> BTreeMap<String, f64> {
        let per_mill = safe_div(total_rate.max(0.0), mill_ids.len() as f64);
        mill_ids.iter().map(|id| (id.clone(), per_mill)).collect()
    }

    /// 分配设定值
    #[instrument(skip(self, request), fields(
        mills = request.rates.len(),
        selected = request.selected.len(),
        mode = %request.mode
    ))]
    pub fn allocate(&self, request: &AllocationRequest<'_>) -> Vec<PerMillSetpoint> {
        let selected: HashSet<&str> = request.selected.iter().map(|s| s.as_str()).collect();

        let (adjustable, fixed): (Vec<(&String, f64)>, Vec<(&String, f64)>) = request
            .rates
            .iter()
            .map(|(id, rate)| (id, sanitize(*rate)))
            .partition(|(id, _)| request.mode.is_adjustable(selected.contains(id.as_str())));

        // 固定磨机剩余时段贡献
        let fixed_rate: f64 = fixed.iter().map(|(_, r)| r).sum();
        let fixed_shift_t = fixed_rate * request.hours_to_shift_end.max(0.0);
        let fixed_day_t = fixed_rate * request.hours_to_day_end.max(0.0);

        // 可调磨机合计所需给矿量
        let adjustable_shift_rate = required_rate(
            request.shift_target_t - fixed_shift_t,
            request.shift_so_far_t,
            request.hours_to_shift_end,
        );
        let adjustable_day_rate = required_rate(
            request.day_target_t - fixed_day_t,
            request.day_so_far_t,
            request.hours_to_day_end,
        );

        let adjustable_total: f64 = adjustable.iter().map(|(_, r)| r).sum();
        tracing::debug!(
            fixed_rate,
            adjustable_total,
            adjustable_shift_rate,
            adjustable_day_rate,
            "设定值分配"
        );

        let mut setpoints: Vec<PerMillSetpoint> = adjustable
            .iter()
            .map(|(id, rate)| {
                let share = safe_div(*rate, adjustable_total);
                let required_shift_rate = adjustable_shift_rate * share;
                PerMillSetpoint {
                    mill_id: (*id).clone(),
                    current_rate: *rate,
                    required_shift_rate,
                    required_day_rate: adjustable_day_rate * share,
                    adjustment_needed: required_shift_rate - rate,
                    share,
                    is_fixed: false,
                }
            })
            .collect();

        setpoints.extend(fixed.iter().map(|(id, rate)| PerMillSetpoint {
            mill_id: (*id).clone(),
            current_rate: *rate,
            required_shift_rate: *rate,
            required_day_rate: *rate,
            adjustment_needed: 0.0,
            share: 0.0,
            is_fixed: true,
        }));

        setpoints.sort_by(|a, b| a.mill_id.cmp(&b.mill_id));
        setpoints
    }
}

impl Default for SetpointAllocator {
    fn default() -> Self {
        Self::new()
    }
}

fn sanitize(rate: f64) -> f64 {
    if rate.is_finite() {
        rate.max(0.0)
    } else {
        0.0
    }
}
