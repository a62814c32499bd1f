// ==========================================
// 磨机给矿产量预测 - 实时数据层
// ==========================================
// 职责: 磨机实时数据解析与轮询
// 输出: FeedSnapshot
// ==========================================

pub mod error;
pub mod file_parser;
pub mod poller;

pub use error::FeedError;
pub use file_parser::{parse_csv, parse_feed_file, parse_json};
pub use poller::{FeedPoller, FileFeed, ProductionFeed};
