// ==========================================
// 磨机给矿产量预测 - 不确定度模型
// ==========================================
// 职责: 0-30% 不确定度 → 可用率 / 停机概率 / 平均停机时长 / 等级
// 规则: 输入先钳制到 [0, max_percent], 全部线性插值
// ==========================================

use crate::config::UncertaintyConfig;
use crate::domain::types::UncertaintyTier;
use crate::domain::uncertainty::{StoppageEstimate, Uncertainty};

pub struct UncertaintyModel {
    config: UncertaintyConfig,
}

impl UncertaintyModel {
    pub fn new(config: UncertaintyConfig) -> Self {
        Self { config }
    }

    /// 钳制到 [0, max_percent], NaN 视为 0
    pub fn clamp_percent(&self, percent: f64) -> f64 {
        if percent.is_nan() {
            return 0.0;
        }
        percent.clamp(0.0, self.config.max_percent)
    }

    /// 评估不确定度
    pub fn evaluate(&self, percent: f64) -> Uncertainty {
        let c = &self.config;
        let p = self.clamp_percent(percent);
        let ratio = if c.max_percent > 0.0 { p / c.max_percent } else { 0.0 };

        let tier = self.classify(p);

        Uncertainty {
            percent: p,
            tier,
            name: tier.name().to_string(),
            color_tag: tier.color_tag().to_string(),
            availability_factor: (100.0 - p) / 100.0,
            stoppage_probability_per_minute: lerp(
                c.min_stoppage_probability,
                c.max_stoppage_probability,
                ratio,
            ),
            average_stoppage_duration_minutes: lerp(
                c.min_stoppage_minutes,
                c.max_stoppage_minutes,
                ratio,
            ),
        }
    }

    /// 等级划分: ≤low 低, ≤medium 中, 其余高
    pub fn classify(&self, percent: f64) -> UncertaintyTier {
        if percent <= self.config.low_threshold_percent {
            UncertaintyTier::Low
        } else if percent <= self.config.medium_threshold_percent {
            UncertaintyTier::Medium
        } else {
            UncertaintyTier::High
        }
    }

    /// 悲观系数 = 可用率 × 悲观乘数
    pub fn pessimistic_factor(&self, uncertainty: &Uncertainty) -> f64 {
        uncertainty.availability_factor * self.config.pessimistic_multiplier
    }

    /// 预期停机
    ///
    /// count = round(剩余小时 × 60 × 停机概率 / 平均停机时长)
    /// downtime = count × 平均停机时长
    pub fn estimate_stoppages(&self, uncertainty: &Uncertainty, hours_remaining: f64) -> StoppageEstimate {
        let avg = uncertainty.average_stoppage_duration_minutes;
        if avg <= 0.0 || !hours_remaining.is_finite() || hours_remaining <= 0.0 {
            return StoppageEstimate::default();
        }

        let count = (hours_remaining * 60.0 * uncertainty.stoppage_probability_per_minute / avg)
            .round()
            .max(0.0) as u32;

        StoppageEstimate {
            expected_stoppages: count,
            expected_downtime_minutes: count as f64 * avg,
        }
    }
}

impl Default for UncertaintyModel {
    fn default() -> Self {
        Self::new(UncertaintyConfig::default())
    }
}

fn lerp(from: f64, to: f64, ratio: f64) -> f64 {
    from + (to - from) * ratio
}
