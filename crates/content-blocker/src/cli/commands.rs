//! CLI 参数定义

use blocker_shared::config::ScannerConfig;
use blocker_shared::error::{BlockerError, Result};
use clap::Parser;
use std::path::PathBuf;

/// 可扫描拦截项检查工具
#[derive(Parser, Debug)]
#[command(name = "blockable-check")]
#[command(version, about = "检查扫描结果是否满足拦截项的规则组配置")]
pub struct Cli {
    /// 拦截项定义文件（JSON 数组），缺省时使用 scanner.definitions_path
    pub definitions: Option<PathBuf>,

    /// 扫描结果文件（JSON 对象），缺省时使用 scanner.scan_results_path
    pub scan_results: Option<PathBuf>,
}

impl Cli {
    /// 合并命令行与配置中的路径，命令行优先
    pub fn resolve_paths(&self, scanner: &ScannerConfig) -> Result<(PathBuf, PathBuf)> {
        let definitions = pick_path(
            self.definitions.clone(),
            scanner.definitions_path.clone(),
            "scanner.definitions_path",
        )?;
        let scan_results = pick_path(
            self.scan_results.clone(),
            scanner.scan_results_path.clone(),
            "scanner.scan_results_path",
        )?;

        Ok((definitions, scan_results))
    }
}

fn pick_path(arg: Option<PathBuf>, configured: Option<PathBuf>, field: &str) -> Result<PathBuf> {
    arg.or(configured)
        .ok_or_else(|| BlockerError::InvalidArgument {
            field: field.to_string(),
            message: "未通过参数或配置指定".to_string(),
        })
}
