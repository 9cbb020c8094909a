//! 检查执行器
//!
//! 按定义逐个构建拦截项，对照扫描结果判定并输出报告。

use crate::definition::{BlockableDefinition, ScanResults, load_definitions, load_scan_results};
use crate::resolver::{FoundRules, GroupFailure, MatchCount};
use blocker_shared::error::{BlockerError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tracing::instrument;

/// 单个拦截项的检查结果
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub identifier: String,
    pub satisfied: bool,
    pub failure: Option<GroupFailure>,
    pub groups: BTreeMap<String, MatchCount>,
}

/// 检查汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub satisfied: usize,
    pub total: usize,
}

/// 判定每个拦截项，扫描结果中缺失的拦截项按没有任何命中处理
pub fn check_blockables(
    definitions: Vec<BlockableDefinition>,
    scan_results: &ScanResults,
) -> Vec<CheckReport> {
    let empty = FoundRules::new();

    definitions
        .into_iter()
        .map(|definition| {
            let blockable = definition.into_blockable();
            let found = scan_results
                .found_rules(blockable.identifier())
                .unwrap_or(&empty);
            let resolution = blockable.resolve(found);

            CheckReport {
                identifier: blockable.identifier().to_string(),
                satisfied: resolution.is_satisfied(),
                failure: resolution.failure,
                groups: resolution.groups,
            }
        })
        .collect()
}

/// 每个报告输出为一行 JSON
pub fn write_reports<W: Write>(reports: &[CheckReport], mut out: W) -> Result<CheckSummary> {
    let mut summary = CheckSummary::default();

    for report in reports {
        serde_json::to_writer(&mut out, report)?;
        writeln!(out).map_err(|e| BlockerError::io("<output>", e))?;

        summary.total += 1;
        if report.satisfied {
            summary.satisfied += 1;
        }
    }

    out.flush().map_err(|e| BlockerError::io("<output>", e))?;
    Ok(summary)
}

/// 读取文件、判定并输出
#[instrument(skip_all)]
pub fn run_check<W: Write>(
    definitions_path: &Path,
    scan_results_path: &Path,
    out: W,
) -> Result<CheckSummary> {
    let definitions = load_definitions(definitions_path)?;
    let scan_results = load_scan_results(scan_results_path)?;

    let reports = check_blockables(definitions, &scan_results);
    write_reports(&reports, out)
}
