//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use crate::config::Config;
use crate::models::{Session, SessionStatus};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 订阅器
///
/// `RUST_LOG` 优先；否则默认 `info`，verbose 时为 `debug`。重复调用不会报错。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - MCP 报告客户端");
    info!("🔌 传输方式: {:?}", config.transport);
    info!("🌐 服务地址: {}", config.endpoint());
    info!("⏱️ 超时: {} 秒", config.request_timeout_secs);
    info!("{}", "=".repeat(60));
}

/// 记录状态变化
pub fn log_status_change(session: &Session) {
    match session.status() {
        SessionStatus::Failed { reason } => warn!("🔄 状态: {} ({})", session.status(), reason),
        status => match session.progress() {
            Some(progress) => info!("🔄 状态: {} - {}", status, progress),
            None => info!("🔄 状态: {}", status),
        },
    }
}

/// 打印最终统计信息
pub fn log_final_summary(session: &Session, exported: Option<&std::path::Path>) {
    info!("\n{}", "=".repeat(60));
    info!("📊 处理完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📝 请求: {}", truncate_text(session.request_text(), 40));
    info!("🏷️ 标签: {}", session.routing_tag().label());
    match session.status() {
        SessionStatus::Completed { report } => {
            info!("✅ 成功: 报告 {} 字", report.chars().count())
        }
        SessionStatus::Failed { reason } => info!("❌ 失败: {}", reason),
        other => info!("状态: {}", other),
    }
    if let Some(path) = exported {
        info!("📄 导出文件: {}", path.display());
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
