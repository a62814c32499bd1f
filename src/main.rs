// ==========================================
// 磨机给矿产量预测 - 命令行入口
// ==========================================
// 用法:
//   ore-feed-forecast forecast <feed.csv|feed.json> [--at YYYY-MM-DDTHH:MM]
//   ore-feed-forecast watch [feed.csv|feed.json]
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDateTime};
use ore_feed_forecast::config::ForecastConfig;
use ore_feed_forecast::engine::{ForecastAction, ForecastRecalc, ForecastSession, ForecastState};
use ore_feed_forecast::feed::{FeedPoller, FileFeed};
use ore_feed_forecast::{logging, Forecast};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_else(|| "help".to_string());
    let rest: Vec<String> = args.collect();

    let config = ForecastConfig::load_or_default().context("配置加载失败")?;

    tracing::info!("==================================================");
    tracing::info!("{} v{}", ore_feed_forecast::APP_NAME, ore_feed_forecast::VERSION);
    tracing::info!("==================================================");

    match command.as_str() {
        "forecast" => run_forecast(&config, &rest).await,
        "watch" => run_watch(&config, &rest).await,
        _ => {
            println!("用法:");
            println!("  ore-feed-forecast forecast <feed.csv|feed.json> [--at YYYY-MM-DDTHH:MM]");
            println!("  ore-feed-forecast watch [feed.csv|feed.json]");
            Ok(())
        }
    }
}

/// 单次预测, 以 JSON 输出快照
async fn run_forecast(config: &ForecastConfig, args: &[String]) -> Result<()> {
    let mut feed_path: Option<PathBuf> = None;
    let mut at: Option<NaiveDateTime> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--at" => {
                let raw = iter.next().ok_or_else(|| anyhow!("--at 缺少时间参数"))?;
                at = Some(
                    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
                        .with_context(|| format!("无法解析时间: {}", raw))?,
                );
            }
            other => feed_path = Some(PathBuf::from(other)),
        }
    }

    let feed_path = feed_path
        .or_else(|| config.feed.path.clone())
        .ok_or_else(|| anyhow!("未指定数据文件"))?;
    let now = at.unwrap_or_else(|| Local::now().naive_local());

    let session = ForecastSession::new(config);
    let mut recalc = ForecastRecalc::new(config);
    let poller = FeedPoller::from_config(FileFeed::new(feed_path), &config.feed);

    let mut state = session.initial_state(now);
    let snapshot = poller.poll().await.context("实时数据读取失败")?;
    state = session.apply(&state, ForecastAction::ApplyFeed(snapshot))?;

    let forecast = recalc.refresh(&state);
    println!("{}", serde_json::to_string_pretty(forecast)?);
    Ok(())
}

/// 轮询模式: 数据周期刷新 + 时钟周期重算
async fn run_watch(config: &ForecastConfig, args: &[String]) -> Result<()> {
    let feed_path = args
        .first()
        .map(PathBuf::from)
        .or_else(|| config.feed.path.clone());
    let Some(feed_path) = feed_path else {
        bail!("未指定数据文件 (参数或 feed.path 配置)");
    };

    tracing::info!(path = %feed_path.display(), "启动轮询");

    let session = ForecastSession::new(config);
    let mut recalc = ForecastRecalc::new(config);
    let poller = FeedPoller::from_config(FileFeed::new(feed_path), &config.feed);

    let mut state = session.initial_state(Local::now().naive_local());
    let mut feed_interval = tokio::time::interval(config.feed.poll_interval());
    let mut tick_interval = tokio::time::interval(config.tick_interval());
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = feed_interval.tick() => {
                let action = match poller.poll_or_degrade().await {
                    Some(snapshot) => ForecastAction::ApplyFeed(snapshot),
                    None => ForecastAction::ClearFeed,
                };
                state = apply_and_tick(&session, &state, action)?;
            }
            _ = tick_interval.tick() => {
                state = session.apply(&state, ForecastAction::Tick(Local::now().naive_local()))?;
            }
            _ = &mut ctrl_c => {
                tracing::info!("收到退出信号");
                break;
            }
        }

        let before = recalc.recompute_count();
        recalc.refresh(&state);
        if recalc.recompute_count() != before {
            log_summary(recalc.refresh(&state));
        }
    }

    Ok(())
}

/// 数据更新与时钟推进合并为一批
fn apply_and_tick(
    session: &ForecastSession,
    state: &ForecastState,
    action: ForecastAction,
) -> Result<ForecastState> {
    let next = session.apply(state, action)?;
    Ok(session.apply(&next, ForecastAction::Tick(Local::now().naive_local()))?)
}

fn log_summary(forecast: &Forecast) {
    tracing::info!(
        shift = %forecast.window.shift.name,
        uncertainty = %forecast.uncertainty.tier,
        hours_to_shift_end = forecast.window.hours_to_shift_end,
        shift_expected_t = forecast.shift.expected_t,
        shift_target_t = forecast.shift.target_t,
        day_expected_t = forecast.day.expected_t,
        day_target_t = forecast.day.target_t,
        required_shift_rate = forecast.shift.adjusted_required_rate,
        can_meet_shift = forecast.can_meet_shift_target,
        can_meet_day = forecast.can_meet_day_target,
        "预测已更新"
    );
}
