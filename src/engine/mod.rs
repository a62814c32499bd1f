// ==========================================
// 磨机给矿产量预测 - 引擎层
// ==========================================
// 职责: 时间窗口 / 不确定度 / 预测 / 班次目标再分配 / 单机设定值
// 红线: 引擎为纯计算, 所有除法必须有零保护
// ==========================================

pub mod error;
pub mod forecast;
pub mod recalc;
pub mod redistributor;
pub mod session;
pub mod setpoint;
pub mod time_window;
pub mod uncertainty;

// 重导出核心引擎
pub use error::ForecastError;
pub use forecast::{ForecastCalculator, ForecastInput, ForecastOutcome, HOURLY_POINTS};
pub use recalc::ForecastRecalc;
pub use redistributor::ShiftTargetRedistributor;
pub use session::{ForecastAction, ForecastSession, ForecastState};
pub use setpoint::{AllocationRequest, SetpointAllocator};
pub use time_window::TimeWindowResolver;
pub use uncertainty::UncertaintyModel;
