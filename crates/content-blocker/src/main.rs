//! 可扫描拦截项检查工具
//!
//! 读取拦截项定义和扫描结果，逐个输出拦截项是否满足规则组配置（每行一个 JSON）。

use anyhow::Result;
use blocker_shared::config::AppConfig;
use blocker_shared::observability;
use clap::Parser;
use content_blocker::cli::{Cli, run_check};
use std::io;
use tracing::info;

const SERVICE_NAME: &str = "blockable-check";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(SERVICE_NAME).unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    observability::init(&config.observability)?;

    let (definitions_path, scan_results_path) = cli.resolve_paths(&config.scanner)?;
    let summary = run_check(&definitions_path, &scan_results_path, io::stdout().lock())?;

    info!(
        satisfied = summary.satisfied,
        total = summary.total,
        "Blockable check complete"
    );

    Ok(())
}
