// ==========================================
// 磨机给矿产量预测 - 数据文件解析
// ==========================================
// 支持: CSV (.csv) / JSON (.json)
// 列: title, state, ore, shift1, shift2, shift3, total
// ==========================================

use crate::domain::mill::MillReading;
use crate::feed::error::FeedError;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

/// CSV 原始行 (数值列允许为空)
#[derive(Debug, Deserialize)]
struct RawMillRow {
    title: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    ore: Option<f64>,
    #[serde(default)]
    shift1: Option<f64>,
    #[serde(default)]
    shift2: Option<f64>,
    #[serde(default)]
    shift3: Option<f64>,
    #[serde(default)]
    total: Option<f64>,
}

impl RawMillRow {
    fn into_reading(self) -> MillReading {
        MillReading {
            title: self.title,
            state: is_true(&self.state),
            ore: number_or_zero(self.ore),
            shift1: number_or_zero(self.shift1),
            shift2: number_or_zero(self.shift2),
            shift3: number_or_zero(self.shift3),
            total: number_or_zero(self.total),
        }
    }
}

/// JSON 原始记录 (缺失字段或 null 按 0 / 停机处理)
#[derive(Debug, Deserialize)]
struct RawJsonMill {
    title: String,
    #[serde(default)]
    state: bool,
    #[serde(default)]
    ore: Option<f64>,
    #[serde(default)]
    shift1: Option<f64>,
    #[serde(default)]
    shift2: Option<f64>,
    #[serde(default)]
    shift3: Option<f64>,
    #[serde(default)]
    total: Option<f64>,
}

impl RawJsonMill {
    fn into_reading(self) -> MillReading {
        MillReading {
            title: self.title,
            state: self.state,
            ore: number_or_zero(self.ore),
            shift1: number_or_zero(self.shift1),
            shift2: number_or_zero(self.shift2),
            shift3: number_or_zero(self.shift3),
            total: number_or_zero(self.total),
        }
    }
}

/// 空值与 NaN/inf 一律记 0, 快照中只保留有限数值
fn number_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on" | "active"
    )
}

/// 按扩展名解析数据文件
pub fn parse_feed_file(path: &Path) -> Result<Vec<MillReading>, FeedError> {
    if !path.exists() {
        return Err(FeedError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let mills = match ext.as_str() {
        "csv" => parse_csv(File::open(path)?)?,
        "json" => parse_json(&std::fs::read_to_string(path)?)?,
        other => return Err(FeedError::UnsupportedFormat(other.to_string())),
    };

    if mills.is_empty() {
        return Err(FeedError::Empty(path.display().to_string()));
    }
    Ok(mills)
}

/// 解析 CSV (跳过标题为空的行)
pub fn parse_csv<R: std::io::Read>(reader: R) -> Result<Vec<MillReading>, FeedError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut mills = Vec::new();
    for result in reader.deserialize::<RawMillRow>() {
        let row = result?;
        if row.title.is_empty() {
            continue;
        }
        mills.push(row.into_reading());
    }
    Ok(mills)
}

/// 解析 JSON 数组
pub fn parse_json(raw: &str) -> Result<Vec<MillReading>, FeedError> {
    let rows: Vec<RawJsonMill> = serde_json::from_str(raw)?;
    Ok(rows
        .into_iter()
        .filter(|r| !r.title.trim().is_empty())
        .map(RawJsonMill::into_reading)
        .collect())
}
