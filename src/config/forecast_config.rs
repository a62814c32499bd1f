// ==========================================
// 磨机给矿产量预测 - 预测配置
// ==========================================
// 职责: 配置加载 (JSON 文件) / 环境变量覆写 / 校验
// 优先级: 环境变量 > 配置文件 > 默认值
// ==========================================

use crate::config::error::ConfigError;
use crate::domain::types::SelectionMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ==========================================
// 配置键 (环境变量)
// ==========================================
pub mod env_keys {
    pub const CONFIG_PATH: &str = "ORE_FEED_FORECAST_CONFIG";
    pub const DAY_TARGET: &str = "ORE_FEED_FORECAST_DAY_TARGET";
    pub const UNCERTAINTY: &str = "ORE_FEED_FORECAST_UNCERTAINTY";
    pub const FEED_PATH: &str = "ORE_FEED_FORECAST_FEED_PATH";
}

// ==========================================
// UncertaintyConfig - 不确定度插值参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UncertaintyConfig {
    /// 旋钮上限 (%)
    pub max_percent: f64,

    // ===== 停机概率 (每分钟) 插值端点 =====
    pub min_stoppage_probability: f64,
    pub max_stoppage_probability: f64,

    // ===== 平均停机时长 (分钟) 插值端点 =====
    pub min_stoppage_minutes: f64,
    pub max_stoppage_minutes: f64,

    // ===== 等级阈值 (%) =====
    pub low_threshold_percent: f64,
    pub medium_threshold_percent: f64,

    /// 悲观系数 = 可用率 × pessimistic_multiplier
    pub pessimistic_multiplier: f64,
}

impl Default for UncertaintyConfig {
    fn default() -> Self {
        Self {
            max_percent: 30.0,
            min_stoppage_probability: 0.02,
            max_stoppage_probability: 0.25,
            min_stoppage_minutes: 3.0,
            max_stoppage_minutes: 25.0,
            low_threshold_percent: 10.0,
            medium_threshold_percent: 20.0,
            pessimistic_multiplier: 0.85,
        }
    }
}

// ==========================================
// ShiftWeightConfig - 班次目标拆分权重
// ==========================================
// 当前班 +2·nudge, 其余两班各 -nudge (合计不变)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftWeightConfig {
    pub base_weights: [f64; 3],
    pub active_shift_nudge: f64,
}

impl Default for ShiftWeightConfig {
    fn default() -> Self {
        Self {
            base_weights: [0.35, 0.33, 0.32],
            active_shift_nudge: 0.01,
        }
    }
}

// ==========================================
// FeedConfig - 实时数据源
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// 数据文件路径 (.csv / .json)
    pub path: Option<PathBuf>,
    pub poll_interval_secs: u64,
    /// 失败后重试次数 (固定间隔, 不退避)
    pub retry_count: u32,
    pub retry_delay_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            path: None,
            poll_interval_secs: 20,
            retry_count: 3,
            retry_delay_secs: 2,
        }
    }
}

impl FeedConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

// ==========================================
// ForecastConfig - 顶层配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub day_target_t: f64,
    pub initial_uncertainty_percent: f64,

    /// 已知磨机列表 (数据源不可用时按此均分)
    pub mill_ids: Vec<String>,
    pub selection_mode: SelectionMode,

    pub uncertainty: UncertaintyConfig,
    pub shift_weights: ShiftWeightConfig,
    pub feed: FeedConfig,

    /// 时钟重算周期 (秒)
    pub tick_interval_secs: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            day_target_t: 4000.0,
            initial_uncertainty_percent: 10.0,
            mill_ids: (1..=12).map(|i| format!("Mill{:02}", i)).collect(),
            selection_mode: SelectionMode::default(),
            uncertainty: UncertaintyConfig::default(),
            shift_weights: ShiftWeightConfig::default(),
            feed: FeedConfig::default(),
            tick_interval_secs: 60,
        }
    }
}

impl ForecastConfig {
    /// 从 JSON 文件加载并校验
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: ForecastConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 按默认路径加载; 文件不存在时使用默认值, 最后应用环境变量覆写
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::info!(path = %path.display(), "加载配置文件");
                Self::load(&path)?
            }
            _ => {
                tracing::debug!("未找到配置文件, 使用默认配置");
                Self::default()
            }
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// 默认配置路径: $ORE_FEED_FORECAST_CONFIG 或 <config_dir>/ore-feed-forecast/config.json
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(p) = std::env::var(env_keys::CONFIG_PATH) {
            if !p.trim().is_empty() {
                return Some(PathBuf::from(p.trim()));
            }
        }
        dirs::config_dir().map(|d| d.join("ore-feed-forecast").join("config.json"))
    }

    /// 环境变量覆写
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(v) = read_env_f64(env_keys::DAY_TARGET)? {
            self.day_target_t = v;
        }
        if let Some(v) = read_env_f64(env_keys::UNCERTAINTY)? {
            self.initial_uncertainty_percent = v;
        }
        if let Ok(p) = std::env::var(env_keys::FEED_PATH) {
            if !p.trim().is_empty() {
                self.feed.path = Some(PathBuf::from(p.trim()));
            }
        }
        Ok(())
    }

    /// 配置校验
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.day_target_t.is_finite() || self.day_target_t <= 0.0 {
            return Err(invalid("day_target_t", format!("必须为正数, 实际 {}", self.day_target_t)));
        }

        let u = &self.uncertainty;
        if !u.max_percent.is_finite() || u.max_percent <= 0.0 || u.max_percent >= 100.0 {
            return Err(invalid("uncertainty.max_percent", format!("必须在 (0, 100) 内, 实际 {}", u.max_percent)));
        }
        if !self.initial_uncertainty_percent.is_finite() || self.initial_uncertainty_percent < 0.0 {
            return Err(invalid(
                "initial_uncertainty_percent",
                format!("不能为负, 实际 {}", self.initial_uncertainty_percent),
            ));
        }
        if u.min_stoppage_probability < 0.0 || u.min_stoppage_probability > u.max_stoppage_probability {
            return Err(invalid(
                "uncertainty.stoppage_probability",
                format!("区间无效 [{}, {}]", u.min_stoppage_probability, u.max_stoppage_probability),
            ));
        }
        if u.min_stoppage_minutes <= 0.0 || u.min_stoppage_minutes > u.max_stoppage_minutes {
            return Err(invalid(
                "uncertainty.stoppage_minutes",
                format!("区间无效 [{}, {}]", u.min_stoppage_minutes, u.max_stoppage_minutes),
            ));
        }
        if u.low_threshold_percent > u.medium_threshold_percent {
            return Err(invalid("uncertainty.thresholds", "low 阈值不能大于 medium 阈值".to_string()));
        }
        if !(0.0..=1.0).contains(&u.pessimistic_multiplier) {
            return Err(invalid(
                "uncertainty.pessimistic_multiplier",
                format!("必须在 [0, 1] 内, 实际 {}", u.pessimistic_multiplier),
            ));
        }

        let w = &self.shift_weights;
        if w.base_weights.iter().any(|x| !x.is_finite() || *x < 0.0) || w.base_weights.iter().sum::<f64>() <= 0.0 {
            return Err(invalid("shift_weights.base_weights", format!("权重无效 {:?}", w.base_weights)));
        }
        if !w.active_shift_nudge.is_finite() || w.active_shift_nudge < 0.0 {
            return Err(invalid(
                "shift_weights.active_shift_nudge",
                format!("不能为负, 实际 {}", w.active_shift_nudge),
            ));
        }

        if self.feed.poll_interval_secs == 0 {
            return Err(invalid("feed.poll_interval_secs", "必须大于 0".to_string()));
        }
        if self.tick_interval_secs == 0 {
            return Err(invalid("tick_interval_secs", "必须大于 0".to_string()));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }
}

fn invalid(key: &str, message: String) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        message,
    }
}

fn read_env_f64(key: &str) -> Result<Option<f64>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| ConfigError::Invalid {
                key: key.to_string(),
                message: format!("无法解析 '{}': {}", raw, e),
            }),
        _ => Ok(None),
    }
}
