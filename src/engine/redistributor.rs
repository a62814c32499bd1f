// ==========================================
// 磨机给矿产量预测 - 班次目标再分配引擎
// ==========================================
// 职责: 维护三班目标, 始终满足 shift1 + shift2 + shift3 == 日目标
// 红线: 锁定班次目标不被改写; 最多锁定 2 个班次
// ==========================================
// 转换:
// 1) 设定日目标: 未锁定余量按班次权重拆分 (当前班略加权)
// 2) 直接调整某班目标: 差值反向按比例摊到其余未锁定班次, 再归一
// 3) 切换锁定: 超过 2 个锁定时拒绝 (记录日志, 不报错)
// ==========================================

use crate::config::ShiftWeightConfig;
use crate::domain::targets::{ShiftTargets, MAX_LOCKED_SHIFTS};
use crate::domain::types::ShiftNumber;
use tracing::instrument;

pub struct ShiftTargetRedistributor {
    weights: ShiftWeightConfig,
}

impl ShiftTargetRedistributor {
    pub fn new(weights: ShiftWeightConfig) -> Self {
        Self { weights }
    }

    // ==========================================
    // 权重
    // ==========================================

    /// 按当前班次修正后的拆分权重 (合计为 1)
    pub fn weights_for(&self, active: ShiftNumber) -> [f64; 3] {
        let nudge = self.weights.active_shift_nudge;
        let mut weights = self.weights.base_weights;
        for shift in ShiftNumber::ALL {
            let w = &mut weights[shift.index()];
            if shift == active {
                *w += 2.0 * nudge;
            } else {
                *w = (*w - nudge).max(0.0);
            }
        }

        let total: f64 = weights.iter().sum();
        if total > 0.0 {
            weights.map(|w| w / total)
        } else {
            [1.0 / 3.0; 3]
        }
    }

    // ==========================================
    // 转换 1: 设定日目标
    // ==========================================

    /// 按权重拆分日目标到未锁定班次, 锁定班次保持不变
    #[instrument(skip(self, targets), fields(locked = targets.locked_count()))]
    pub fn split_day_target(
        &self,
        targets: &ShiftTargets,
        day_target_t: f64,
        active: ShiftNumber,
    ) -> ShiftTargets {
        let mut next = targets.clone();
        let unlocked = targets.unlocked_shifts();
        if unlocked.is_empty() {
            tracing::debug!("三个班次全部锁定, 跳过重算");
            return next;
        }

        let remainder = self.unlocked_remainder(targets, day_target_t);
        let weights = self.weights_for(active);
        let weight_total: f64 = unlocked.iter().map(|s| weights[s.index()]).sum();

        for shift in &unlocked {
            let share = if weight_total > 0.0 {
                weights[shift.index()] / weight_total
            } else {
                1.0 / unlocked.len() as f64
            };
            next.set_target(*shift, remainder * share);
        }
        next
    }

    // ==========================================
    // 转换 2: 直接调整某班目标
    // ==========================================

    /// 调整单个班次目标, 其余未锁定班次按当前比例吸收差值
    #[instrument(skip(self, targets), fields(locked = targets.locked_count()))]
    pub fn adjust_shift(
        &self,
        targets: &ShiftTargets,
        day_target_t: f64,
        shift: ShiftNumber,
        new_value_t: f64,
    ) -> ShiftTargets {
        let mut next = targets.clone();
        if targets.is_locked(shift) {
            tracing::warn!(%shift, "班次已锁定, 忽略目标调整");
            return next;
        }

        let available = self.unlocked_remainder(targets, day_target_t);
        let others: Vec<ShiftNumber> = targets
            .unlocked_shifts()
            .into_iter()
            .filter(|s| *s != shift)
            .collect();

        // 其余班次全部锁定: 本班目标只能等于余量
        if others.is_empty() {
            tracing::debug!(%shift, available, "无其它可调班次, 目标由余量决定");
            next.set_target(shift, available);
            return next;
        }

        let new_value = if new_value_t.is_finite() {
            new_value_t.clamp(0.0, available)
        } else {
            targets.target(shift)
        };
        let delta = new_value - targets.target(shift);
        next.set_target(shift, new_value);

        // 差值反向按比例摊到其余未锁定班次
        let others_total: f64 = others.iter().map(|s| targets.target(*s)).sum();
        for other in &others {
            let share = if others_total > 0.0 {
                targets.target(*other) / others_total
            } else {
                1.0 / others.len() as f64
            };
            let value = (targets.target(*other) - delta * share).max(0.0);
            next.set_target(*other, value);
        }

        // 归一: 保证合计精确等于日目标
        distribute_exact(&mut next, &others, available - new_value);
        next
    }

    // ==========================================
    // 转换 3: 切换锁定
    // ==========================================

    /// 切换班次锁定状态
    ///
    /// # 返回
    /// (新目标, 是否生效)。锁定第 3 个班次时拒绝, 状态不变
    #[instrument(skip(self, targets), fields(locked = targets.locked_count()))]
    pub fn toggle_lock(
        &self,
        targets: &ShiftTargets,
        day_target_t: f64,
        shift: ShiftNumber,
    ) -> (ShiftTargets, bool) {
        let mut next = targets.clone();
        let locking = !targets.is_locked(shift);

        if locking && targets.locked_count() >= MAX_LOCKED_SHIFTS {
            tracing::warn!(
                %shift,
                locked = targets.locked_count(),
                "至少保留一个可调班次, 拒绝锁定"
            );
            return (next, false);
        }

        next.set_locked(shift, locking);
        (self.normalize(&next, day_target_t), true)
    }

    /// 按比例缩放未锁定班次, 使合计等于日目标
    pub fn normalize(&self, targets: &ShiftTargets, day_target_t: f64) -> ShiftTargets {
        let mut next = targets.clone();
        let unlocked = targets.unlocked_shifts();
        if unlocked.is_empty() {
            return next;
        }
        let remainder = self.unlocked_remainder(targets, day_target_t);
        distribute_exact(&mut next, &unlocked, remainder);
        next
    }

    /// 未锁定班次可分配余量 (≥0)
    fn unlocked_remainder(&self, targets: &ShiftTargets, day_target_t: f64) -> f64 {
        let locked_total = targets.locked_total_t();
        let remainder = day_target_t - locked_total;
        if remainder < 0.0 {
            tracing::warn!(
                day_target_t,
                locked_total,
                "锁定班次目标合计超过日目标, 未锁定班次置 0"
            );
            return 0.0;
        }
        remainder
    }
}

impl Default for ShiftTargetRedistributor {
    fn default() -> Self {
        Self::new(ShiftWeightConfig::default())
    }
}

/// 将 total 按 shifts 当前比例精确分配 (当前合计为 0 时均分)
fn distribute_exact(targets: &mut ShiftTargets, shifts: &[ShiftNumber], total: f64) {
    if shifts.is_empty() {
        return;
    }
    let total = total.max(0.0);
    let current: f64 = shifts.iter().map(|s| targets.target(*s)).sum();
    for shift in shifts {
        let value = if current > 0.0 {
            targets.target(*shift) / current * total
        } else {
            total / shifts.len() as f64
        };
        targets.set_target(*shift, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one_and_favor_active() {
        let r = ShiftTargetRedistributor::default();
        let w = r.weights_for(ShiftNumber::Second);
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((w[1] - 0.35).abs() < 1e-12);
        assert!((w[0] - 0.34).abs() < 1e-12);
        assert!((w[2] - 0.31).abs() < 1e-12);
    }

    #[test]
    fn test_all_locked_split_is_skipped() {
        let r = ShiftTargetRedistributor::default();
        let targets = ShiftTargets::new([1000.0, 1000.0, 1000.0], [true; 3]);
        let next = r.split_day_target(&targets, 4000.0, ShiftNumber::First);
        assert_eq!(next, targets);
    }
}
