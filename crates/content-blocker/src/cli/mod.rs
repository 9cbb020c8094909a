//! CLI 模块
//!
//! 读取拦截项定义和扫描结果，逐个输出拦截项是否满足规则组配置（每行一个 JSON）。
//!
//! # 使用示例
//!
//! ```bash
//! blockable-check data/blockables.json data/scan-results.json
//!
//! # 未给出的路径从配置 scanner.definitions_path / scanner.scan_results_path 读取
//! BLOCKER__SCANNER__DEFINITIONS_PATH=data/blockables.json blockable-check
//! ```

pub mod commands;
pub mod runner;

pub use commands::Cli;
pub use runner::{CheckReport, CheckSummary, check_blockables, run_check, write_reports};
