// ==========================================
// 磨机给矿产量预测 - 引擎层错误类型
// ==========================================
// 说明: 核心计算不产生错误 (除零均已保护),
//       仅会话更新操作校验外部输入
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("无效输入: {0}")]
    InvalidInput(String),
}

/// 校验吨位/给矿量: 有限且非负
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> Result<f64, ForecastError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ForecastError::InvalidInput(format!(
            "{} 必须为非负有限数, 实际 {}",
            field, value
        )));
    }
    Ok(value)
}
