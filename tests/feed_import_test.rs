// ==========================================
// 实时数据解析与轮询 集成测试
// ==========================================
// 测试目标: 数据文件解析、固定次数重试、失败降级
// ==========================================

mod test_helpers;

use async_trait::async_trait;
use ore_feed_forecast::domain::{FeedSnapshot, ShiftNumber};
use ore_feed_forecast::feed::{
    parse_feed_file, FeedError, FeedPoller, FileFeed, ProductionFeed,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use test_helpers::{approx_eq, at, running_mill, snapshot, write_temp_file, EPS};

const CSV_FEED: &str = "title,state,ore,shift1,shift2,shift3,total\n\
Mill01,true,160,1100,0,0,1100\n\
Mill02,true,140,950,0,0,950\n\
Mill03,false,0,300,0,0,300\n";

// ==========================================
// 测试用例 1: 文件解析
// ==========================================

#[test]
fn test_parse_csv_feed_file() {
    let file = write_temp_file(".csv", CSV_FEED);

    let mills = parse_feed_file(file.path()).expect("CSV 应解析成功");
    let snapshot = FeedSnapshot::new(at(10, 0), mills);

    assert_eq!(snapshot.mills.len(), 3);
    // 停机磨机不计入当前给矿量, 但计入累计产量
    assert!(approx_eq(snapshot.total_rate(), 300.0, EPS));
    assert!(approx_eq(snapshot.shift_actual_t(ShiftNumber::First), 2350.0, EPS));
    assert!(approx_eq(snapshot.day_actual_t(), 2350.0, EPS));
    assert_eq!(snapshot.current_rates().get("Mill03"), Some(&0.0));
}

#[test]
fn test_parse_json_feed_file() {
    let file = write_temp_file(
        ".json",
        r#"[
            {"title": "Mill01", "state": true, "ore": 155.5, "shift1": 800, "shift2": 0, "shift3": 0, "total": 800},
            {"title": "Mill02", "state": true, "ore": 149.5}
        ]"#,
    );

    let mills = parse_feed_file(file.path()).expect("JSON 应解析成功");

    assert_eq!(mills.len(), 2);
    assert_eq!(mills[1].total, 0.0);
    assert!(approx_eq(mills[0].ore + mills[1].ore, 305.0, EPS));
}

#[test]
fn test_json_missing_or_null_fields_default_to_zero() {
    let file = write_temp_file(
        ".json",
        r#"[
            {"title": "Mill01", "state": true, "ore": 150.0, "total": 900},
            {"title": "Mill02", "state": false},
            {"title": "Mill03", "ore": null, "shift1": null}
        ]"#,
    );

    let mills = parse_feed_file(file.path()).expect("缺失字段不应导致整文件失败");

    assert_eq!(mills.len(), 3);
    assert_eq!(mills[1].ore, 0.0);
    assert!(!mills[1].state);
    assert_eq!(mills[2].ore, 0.0);
    assert_eq!(mills[2].shift1, 0.0);
    assert!(!mills[2].state);

    let snapshot = FeedSnapshot::new(at(10, 0), mills);
    assert!(approx_eq(snapshot.total_rate(), 150.0, EPS));
}

#[test]
fn test_csv_nan_values_are_zeroed() {
    let file = write_temp_file(
        ".csv",
        "title,state,ore,shift1,shift2,shift3,total\n\
         Mill01,true,NaN,NaN,0,0,NaN\n\
         Mill02,true,120,500,0,0,500\n",
    );

    let mills = parse_feed_file(file.path()).expect("CSV 应解析成功");

    assert!(mills
        .iter()
        .all(|m| [m.ore, m.shift1, m.shift2, m.shift3, m.total].iter().all(|v| v.is_finite())));
    assert_eq!(mills[0].ore, 0.0);
}

#[test]
fn test_unsupported_extension() {
    let file = write_temp_file(".xlsx", "not a feed");

    assert!(matches!(
        parse_feed_file(file.path()),
        Err(FeedError::UnsupportedFormat(ext)) if ext == "xlsx"
    ));
}

#[test]
fn test_missing_feed_file() {
    let path = std::path::Path::new("/nonexistent/feed.csv");
    assert!(matches!(parse_feed_file(path), Err(FeedError::FileNotFound(_))));
}

#[test]
fn test_header_only_csv_is_empty() {
    let file = write_temp_file(".csv", "title,state,ore,shift1,shift2,shift3,total\n");
    assert!(matches!(parse_feed_file(file.path()), Err(FeedError::Empty(_))));
}

// ==========================================
// 测试用例 2: 轮询重试
// ==========================================

/// 前 N 次失败, 之后成功的测试桩
struct FlakyFeed {
    failures: u32,
    calls: AtomicU32,
}

impl FlakyFeed {
    fn new(failures: u32) -> Self {
        Self {
            failures,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl ProductionFeed for FlakyFeed {
    async fn fetch(&self) -> Result<FeedSnapshot, FeedError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures {
            return Err(FeedError::Empty(format!("第 {} 次调用", call)));
        }
        Ok(snapshot(at(10, 0), vec![running_mill("Mill01", 120.0)]))
    }
}

#[tokio::test]
async fn test_poll_succeeds_within_retry_budget() {
    let poller = FeedPoller::new(FlakyFeed::new(2), 3, Duration::ZERO);

    let snapshot = poller.poll().await.expect("第 3 次尝试应成功");

    assert_eq!(snapshot.mills.len(), 1);
}

#[tokio::test]
async fn test_poll_exhausts_fixed_retries() {
    let poller = FeedPoller::new(FlakyFeed::new(10), 3, Duration::ZERO);

    match poller.poll().await {
        Err(FeedError::RetriesExhausted { attempts, last_error }) => {
            assert_eq!(attempts, 4);
            assert!(last_error.contains("第 4 次调用"));
        }
        other => panic!("期望 RetriesExhausted, 实际 {:?}", other.map(|s| s.mills.len())),
    }
}

#[tokio::test]
async fn test_poll_or_degrade_returns_none() {
    let poller = FeedPoller::new(FlakyFeed::new(u32::MAX), 1, Duration::ZERO);
    assert!(poller.poll_or_degrade().await.is_none());
}

#[tokio::test]
async fn test_file_feed_reads_snapshot() {
    let file = write_temp_file(".csv", CSV_FEED);
    let poller = FeedPoller::new(FileFeed::new(file.path()), 0, Duration::ZERO);

    let snapshot = poller.poll_or_degrade().await.expect("文件数据源应可用");

    assert_eq!(snapshot.mills.len(), 3);
    assert!(approx_eq(snapshot.total_rate(), 300.0, EPS));
}
