// ==========================================
// 磨机给矿产量预测 - 磨机实时数据与设定值
// ==========================================
// 输入: 实时数据源 (每台磨机一条记录, 周期刷新)
// 输出: PerMillSetpoint (每次预测重算时整体重建)
// ==========================================

use crate::domain::types::ShiftNumber;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// MillReading - 单台磨机实时记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MillReading {
    /// 磨机标识
    pub title: String,

    /// 是否运行
    pub state: bool,

    /// 当前给矿量 (t/h)
    pub ore: f64,

    // ===== 班次累计 (吨) =====
    #[serde(default)]
    pub shift1: f64,
    #[serde(default)]
    pub shift2: f64,
    #[serde(default)]
    pub shift3: f64,

    /// 生产日累计 (吨)
    #[serde(default)]
    pub total: f64,
}

impl MillReading {
    /// 有效给矿量: 停机磨机计 0, 非法数值计 0
    pub fn effective_rate(&self) -> f64 {
        if self.state && self.ore.is_finite() {
            self.ore.max(0.0)
        } else {
            0.0
        }
    }

    pub fn shift_tons(&self, shift: ShiftNumber) -> f64 {
        let value = match shift {
            ShiftNumber::First => self.shift1,
            ShiftNumber::Second => self.shift2,
            ShiftNumber::Third => self.shift3,
        };
        finite_or_zero(value)
    }
}

// ==========================================
// FeedSnapshot - 一次轮询的全部磨机记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub received_at: NaiveDateTime,
    pub mills: Vec<MillReading>,
}

impl FeedSnapshot {
    pub fn new(received_at: NaiveDateTime, mills: Vec<MillReading>) -> Self {
        Self { received_at, mills }
    }

    /// 磨机 → 当前给矿量
    pub fn current_rates(&self) -> BTreeMap<String, f64> {
        self.mills
            .iter()
            .map(|m| (m.title.clone(), m.effective_rate()))
            .collect()
    }

    /// 全厂当前给矿量 (t/h)
    pub fn total_rate(&self) -> f64 {
        self.mills.iter().map(|m| m.effective_rate()).sum()
    }

    /// 指定班次实际产量合计 (吨)
    pub fn shift_actual_t(&self, shift: ShiftNumber) -> f64 {
        self.mills.iter().map(|m| m.shift_tons(shift)).sum()
    }

    /// 生产日实际产量合计 (吨)
    pub fn day_actual_t(&self) -> f64 {
        self.mills.iter().map(|m| finite_or_zero(m.total)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.mills.is_empty()
    }

    /// 非有限数值置 0 (NaN 会破坏状态比较)
    pub fn into_finite(mut self) -> Self {
        for m in &mut self.mills {
            m.ore = finite_or_zero(m.ore);
            m.shift1 = finite_or_zero(m.shift1);
            m.shift2 = finite_or_zero(m.shift2);
            m.shift3 = finite_or_zero(m.shift3);
            m.total = finite_or_zero(m.total);
        }
        self
    }
}

// ==========================================
// PerMillSetpoint - 单台磨机设定值建议
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerMillSetpoint {
    pub mill_id: String,
    pub current_rate: f64,
    pub required_shift_rate: f64,
    pub required_day_rate: f64,

    /// required_shift_rate - current_rate (有符号)
    pub adjustment_needed: f64,

    /// 在可调磨机总给矿量中的占比 (固定磨机为 0)
    pub share: f64,
    pub is_fixed: bool,
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
