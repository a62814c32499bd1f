// ==========================================
// 磨机给矿产量预测 - 实时数据轮询
// ==========================================
// 职责: 周期拉取磨机实时数据
// 规则: 固定次数重试, 固定间隔, 不退避;
//       全部失败时降级为 None (不中断预测)
// ==========================================

use crate::config::FeedConfig;
use crate::domain::mill::FeedSnapshot;
use crate::feed::error::FeedError;
use crate::feed::file_parser::parse_feed_file;
use async_trait::async_trait;
use chrono::Local;
use std::path::PathBuf;
use std::time::Duration;

// ==========================================
// ProductionFeed Trait
// ==========================================
// 实现者: FileFeed (本地文件), 测试桩
#[async_trait]
pub trait ProductionFeed: Send + Sync {
    /// 拉取一次全部磨机数据
    async fn fetch(&self) -> Result<FeedSnapshot, FeedError>;
}

// ==========================================
// FileFeed - 文件数据源
// ==========================================
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProductionFeed for FileFeed {
    async fn fetch(&self) -> Result<FeedSnapshot, FeedError> {
        let path = self.path.clone();
        let mills = tokio::task::spawn_blocking(move || parse_feed_file(&path))
            .await
            .map_err(|e| FeedError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))??;
        Ok(FeedSnapshot::new(Local::now().naive_local(), mills))
    }
}

// ==========================================
// FeedPoller - 带重试的轮询器
// ==========================================
pub struct FeedPoller<F: ProductionFeed> {
    feed: F,
    retry_count: u32,
    retry_delay: Duration,
}

impl<F: ProductionFeed> FeedPoller<F> {
    pub fn new(feed: F, retry_count: u32, retry_delay: Duration) -> Self {
        Self {
            feed,
            retry_count,
            retry_delay,
        }
    }

    pub fn from_config(feed: F, config: &FeedConfig) -> Self {
        Self::new(feed, config.retry_count, config.retry_delay())
    }

    /// 拉取一次 (含重试)
    pub async fn poll(&self) -> Result<FeedSnapshot, FeedError> {
        let attempts = self.retry_count.saturating_add(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.feed.fetch().await {
                Ok(snapshot) => {
                    tracing::debug!(attempt, mills = snapshot.mills.len(), "实时数据拉取成功");
                    return Ok(snapshot);
                }
                Err(e) => {
                    tracing::warn!(attempt, attempts, error = %e, "实时数据拉取失败");
                    last_error = e.to_string();
                    if attempt < attempts && !self.retry_delay.is_zero() {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Err(FeedError::RetriesExhausted {
            attempts,
            last_error,
        })
    }

    /// 拉取一次, 失败时降级为 None
    pub async fn poll_or_degrade(&self) -> Option<FeedSnapshot> {
        match self.poll().await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::error!(error = %e, "实时数据不可用, 使用兜底数据");
                None
            }
        }
    }
}
