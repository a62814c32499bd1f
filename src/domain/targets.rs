// ==========================================
// 磨机给矿产量预测 - 班次目标
// ==========================================
// 不变量: shift1 + shift2 + shift3 == day_target (锁定数 ≤ 2 时)
// 红线: 至少保留一个可调班次
// ==========================================

use crate::domain::types::ShiftNumber;
use serde::{Deserialize, Serialize};

/// 班次目标合计与日目标的比对容差 (吨)
pub const TARGET_SUM_TOLERANCE_T: f64 = 0.01;

/// 最多允许锁定的班次数
pub const MAX_LOCKED_SHIFTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShiftTargets {
    targets_t: [f64; 3],
    locked: [bool; 3],
}

impl ShiftTargets {
    pub fn new(targets_t: [f64; 3], locked: [bool; 3]) -> Self {
        Self { targets_t, locked }
    }

    /// 全部未锁定
    pub fn unlocked(targets_t: [f64; 3]) -> Self {
        Self::new(targets_t, [false; 3])
    }

    pub fn target(&self, shift: ShiftNumber) -> f64 {
        self.targets_t[shift.index()]
    }

    pub fn targets(&self) -> [f64; 3] {
        self.targets_t
    }

    pub fn is_locked(&self, shift: ShiftNumber) -> bool {
        self.locked[shift.index()]
    }

    pub fn locked_flags(&self) -> [bool; 3] {
        self.locked
    }

    pub fn locked_count(&self) -> usize {
        self.locked.iter().filter(|l| **l).count()
    }

    pub fn total_t(&self) -> f64 {
        self.targets_t.iter().sum()
    }

    /// 锁定班次目标合计
    pub fn locked_total_t(&self) -> f64 {
        ShiftNumber::ALL
            .iter()
            .filter(|s| self.is_locked(**s))
            .map(|s| self.target(*s))
            .sum()
    }

    /// 未锁定班次列表
    pub fn unlocked_shifts(&self) -> Vec<ShiftNumber> {
        ShiftNumber::ALL
            .iter()
            .copied()
            .filter(|s| !self.is_locked(*s))
            .collect()
    }

    /// 合计是否等于日目标 (容差内)
    pub fn sums_to(&self, day_target_t: f64) -> bool {
        (self.total_t() - day_target_t).abs() <= TARGET_SUM_TOLERANCE_T
    }

    pub(crate) fn set_target(&mut self, shift: ShiftNumber, value_t: f64) {
        self.targets_t[shift.index()] = value_t;
    }

    pub(crate) fn set_locked(&mut self, shift: ShiftNumber, locked: bool) {
        self.locked[shift.index()] = locked;
    }
}
