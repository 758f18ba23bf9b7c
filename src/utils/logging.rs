/// 日志工具模块
///
/// 初始化 tracing（控制台 + 日志文件），并提供启动与结束时的汇总输出
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
///
/// 每次运行都会覆盖并写入带时间戳的标题
pub fn init_log_file(log_file_path: &Path) -> Result<()> {
    let log_header = format!(
        "{}\n考勤检查日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .with_context(|| format!("无法写入日志文件 {}", log_file_path.display()))?;
    Ok(())
}

/// 初始化 tracing
///
/// - 控制台：带颜色，默认级别 info（可用 `RUST_LOG` 覆盖）
/// - 文件：追加到 `log_file_path`，不带颜色
pub fn init_logging(log_file_path: &Path) -> Result<()> {
    init_log_file(log_file_path)?;
    let file = OpenOptions::new()
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("无法打开日志文件 {}", log_file_path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("日志系统初始化失败")?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `mode`: 检查种类
/// - `output`: 输出方式
pub fn log_startup(mode: &str, output: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 考勤检查");
    info!("📋 检查种类: {}", mode);
    info!("📤 输出方式: {}", output);
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `found`: 检查结果件数（过滤后）
/// - `delivered`: 实际输出的去向（文件路径或收件人数），没有输出时为 `None`
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(found: usize, delivered: Option<&str>, log_file_path: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 检查完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("🔎 检查结果: {} 件", found);
    match delivered {
        Some(target) => info!("✅ 已输出: {}", target),
        None => info!("💤 无对象数据，未输出"),
    }
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path.display());
}
