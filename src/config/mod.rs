// ==========================================
// 磨机给矿产量预测 - 配置层
// ==========================================
// 职责: 预测参数加载与校验, 支持环境变量覆写
// 存储: JSON 文件 (不落库)
// ==========================================

pub mod error;
pub mod forecast_config;

// 重导出核心配置
pub use error::ConfigError;
pub use forecast_config::{
    env_keys, FeedConfig, ForecastConfig, ShiftWeightConfig, UncertaintyConfig,
};
