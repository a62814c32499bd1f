// ==========================================
// 磨机给矿产量预测 - 领域模型层
// ==========================================
// 职责: 定义值对象与类型
// 红线: 不含引擎逻辑, 不含数据源访问
// ==========================================

pub mod forecast;
pub mod mill;
pub mod shift;
pub mod targets;
pub mod types;
pub mod uncertainty;

// 重导出核心类型
pub use forecast::{Forecast, ForecastPoint, HorizonForecast};
pub use mill::{FeedSnapshot, MillReading, PerMillSetpoint};
pub use shift::{ShiftInfo, TimeWindow, DAY_HOURS, DAY_START_HOUR, SHIFT_HOURS};
pub use targets::{ShiftTargets, MAX_LOCKED_SHIFTS, TARGET_SUM_TOLERANCE_T};
pub use types::{Horizon, SelectionMode, ShiftNumber, UncertaintyTier};
pub use uncertainty::{StoppageEstimate, Uncertainty};
