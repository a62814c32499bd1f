// ==========================================
// 磨机给矿产量预测 - 实时数据源错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv/.json）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    // ===== 解析错误 =====
    #[error("CSV 解析失败: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("JSON 解析失败: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("数据为空: {0}")]
    Empty(String),

    // ===== 轮询错误 =====
    #[error("数据源不可用, 已尝试 {attempts} 次: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}
