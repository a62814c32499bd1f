// ==========================================
// 磨机给矿产量预测 - 领域类型定义
// ==========================================
// 班次编号 / 不确定度等级 / 选择模式 / 预测口径
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 班次编号 (Shift Number)
// ==========================================
// 1 班: [06,14)  2 班: [14,22)  3 班: [22,24)∪[00,06)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShiftNumber {
    First,
    Second,
    Third,
}

impl ShiftNumber {
    pub const ALL: [ShiftNumber; 3] = [ShiftNumber::First, ShiftNumber::Second, ShiftNumber::Third];

    /// 由整点小时判定班次
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=13 => ShiftNumber::First,
            14..=21 => ShiftNumber::Second,
            _ => ShiftNumber::Third,
        }
    }

    /// 数组下标 (0/1/2)
    pub fn index(self) -> usize {
        match self {
            ShiftNumber::First => 0,
            ShiftNumber::Second => 1,
            ShiftNumber::Third => 2,
        }
    }

    /// 班次序号 (1/2/3)
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn start_hour(self) -> u32 {
        match self {
            ShiftNumber::First => 6,
            ShiftNumber::Second => 14,
            ShiftNumber::Third => 22,
        }
    }

    pub fn end_hour(self) -> u32 {
        match self {
            ShiftNumber::First => 14,
            ShiftNumber::Second => 22,
            ShiftNumber::Third => 6,
        }
    }
}

impl fmt::Display for ShiftNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHIFT_{}", self.number())
    }
}

// ==========================================
// 不确定度等级 (Uncertainty Tier)
// ==========================================
// 顺序: Low < Medium < High
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UncertaintyTier {
    Low,    // 低 (绿)
    Medium, // 中 (橙)
    High,   // 高 (红)
}

impl UncertaintyTier {
    pub fn name(&self) -> &'static str {
        match self {
            UncertaintyTier::Low => "Low",
            UncertaintyTier::Medium => "Medium",
            UncertaintyTier::High => "High",
        }
    }

    pub fn color_tag(&self) -> &'static str {
        match self {
            UncertaintyTier::Low => "green",
            UncertaintyTier::Medium => "orange",
            UncertaintyTier::High => "red",
        }
    }
}

impl fmt::Display for UncertaintyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UncertaintyTier::Low => write!(f, "LOW"),
            UncertaintyTier::Medium => write!(f, "MEDIUM"),
            UncertaintyTier::High => write!(f, "HIGH"),
        }
    }
}

// ==========================================
// 磨机选择模式 (Selection Mode)
// ==========================================
// IncludeSelected: 选中的磨机可调, 其余固定
// ExcludeSelected: 选中的磨机固定, 其余可调
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionMode {
    IncludeSelected,
    ExcludeSelected,
}

impl SelectionMode {
    /// 判断某台磨机是否可调
    pub fn is_adjustable(&self, selected: bool) -> bool {
        match self {
            SelectionMode::IncludeSelected => selected,
            SelectionMode::ExcludeSelected => !selected,
        }
    }
}

impl Default for SelectionMode {
    fn default() -> Self {
        SelectionMode::ExcludeSelected
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::IncludeSelected => write!(f, "INCLUDE_SELECTED"),
            SelectionMode::ExcludeSelected => write!(f, "EXCLUDE_SELECTED"),
        }
    }
}

impl std::str::FromStr for SelectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "include" | "include_selected" | "include-selected" => Ok(SelectionMode::IncludeSelected),
            "exclude" | "exclude_selected" | "exclude-selected" => Ok(SelectionMode::ExcludeSelected),
            other => Err(format!("未知选择模式: {}", other)),
        }
    }
}

// ==========================================
// 预测口径 (Horizon)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Horizon {
    Shift, // 当班剩余
    Day,   // 生产日剩余 (06:00 起)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_from_hour_boundaries() {
        assert_eq!(ShiftNumber::from_hour(5), ShiftNumber::Third);
        assert_eq!(ShiftNumber::from_hour(6), ShiftNumber::First);
        assert_eq!(ShiftNumber::from_hour(13), ShiftNumber::First);
        assert_eq!(ShiftNumber::from_hour(14), ShiftNumber::Second);
        assert_eq!(ShiftNumber::from_hour(21), ShiftNumber::Second);
        assert_eq!(ShiftNumber::from_hour(22), ShiftNumber::Third);
        assert_eq!(ShiftNumber::from_hour(0), ShiftNumber::Third);
    }

    #[test]
    fn test_selection_mode_semantics() {
        assert!(SelectionMode::IncludeSelected.is_adjustable(true));
        assert!(!SelectionMode::IncludeSelected.is_adjustable(false));
        assert!(!SelectionMode::ExcludeSelected.is_adjustable(true));
        assert!(SelectionMode::ExcludeSelected.is_adjustable(false));
        assert_eq!("include".parse::<SelectionMode>(), Ok(SelectionMode::IncludeSelected));
    }
}
