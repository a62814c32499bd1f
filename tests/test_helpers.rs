// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试时刻、磨机实时数据、临时数据文件等构造
// ==========================================

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use ore_feed_forecast::domain::{FeedSnapshot, MillReading};
use std::io::Write;
use tempfile::NamedTempFile;

/// 浮点比较容差
pub const EPS: f64 = 1e-6;

/// 2026-03-02 的指定时刻
pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 2)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// 运行中的磨机, 班次/日累计为 0
pub fn running_mill(title: &str, ore: f64) -> MillReading {
    MillReading {
        title: title.to_string(),
        state: true,
        ore,
        shift1: 0.0,
        shift2: 0.0,
        shift3: 0.0,
        total: 0.0,
    }
}

/// 带班次累计的磨机记录
pub fn mill_with_actuals(title: &str, ore: f64, shifts: [f64; 3], total: f64) -> MillReading {
    MillReading {
        title: title.to_string(),
        state: true,
        ore,
        shift1: shifts[0],
        shift2: shifts[1],
        shift3: shifts[2],
        total,
    }
}

pub fn snapshot(received_at: NaiveDateTime, mills: Vec<MillReading>) -> FeedSnapshot {
    FeedSnapshot::new(received_at, mills)
}

/// 写入临时数据文件 (需保持返回值存活)
pub fn write_temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("创建临时文件失败");
    file.write_all(content.as_bytes()).expect("写入临时文件失败");
    file.flush().expect("刷新临时文件失败");
    file
}
