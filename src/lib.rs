// ==========================================
// 磨机给矿产量预测 - 核心库
// ==========================================
// 职责: 班次时间窗口 / 不确定度 / 班日产量预测 /
//       班次目标再分配 / 单机给矿设定值分配
// 定位: 进程内计算引擎, 由界面或 CLI 驱动
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 值对象与类型
pub mod domain;

// 引擎层 - 预测计算
pub mod engine;

// 数据层 - 磨机实时数据
pub mod feed;

// 配置层 - 预测参数
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    FeedSnapshot, Forecast, ForecastPoint, Horizon, HorizonForecast, MillReading,
    PerMillSetpoint, SelectionMode, ShiftInfo, ShiftNumber, ShiftTargets, TimeWindow,
    Uncertainty, UncertaintyTier,
};

pub use engine::{
    ForecastAction, ForecastCalculator, ForecastError, ForecastRecalc, ForecastSession,
    ForecastState, SetpointAllocator, ShiftTargetRedistributor, TimeWindowResolver,
    UncertaintyModel,
};

pub use config::{ConfigError, ForecastConfig};
pub use feed::{FeedError, FeedPoller, FileFeed, ProductionFeed};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "磨机给矿产量预测";
