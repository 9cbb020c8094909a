//! 声明式拦截项定义与扫描结果加载
//!
//! 定义文件是拦截项数组，每项包含标识、父模板和原始的规则 / 规则组配置；
//! 扫描结果文件按拦截项标识和规则组名组织命中的规则。

use crate::blockable::ScannableBlockable;
use crate::input::{RuleGroupSpec, RuleSpec};
use crate::resolver::FoundRules;
use blocker_shared::error::{BlockerError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

/// 拦截项定义
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockableDefinition {
    pub identifier: String,
    #[serde(default)]
    pub extended: Option<String>,
    #[serde(default)]
    pub rules: Vec<Value>,
    #[serde(default)]
    pub rule_groups: Vec<Value>,
}

impl BlockableDefinition {
    /// 构建拦截项，无法识别的规则和规则组被跳过
    pub fn into_blockable(self) -> ScannableBlockable {
        ScannableBlockable::new(
            self.identifier,
            self.extended,
            self.rules.iter().filter_map(RuleSpec::from_value),
            self.rule_groups.iter().filter_map(RuleGroupSpec::from_value),
        )
    }
}

/// 扫描结果：拦截项标识 -> 命中规则
#[derive(Debug, Clone, Default)]
pub struct ScanResults {
    found: HashMap<String, FoundRules>,
}

impl ScanResults {
    /// 从原始 JSON 构建，命中规则按规则输入形态识别，不做角色过滤
    pub fn from_raw(raw: HashMap<String, HashMap<String, Vec<Value>>>) -> Self {
        let found = raw
            .into_iter()
            .map(|(identifier, groups)| {
                let found_rules: FoundRules = groups
                    .into_iter()
                    .map(|(group, values)| {
                        let rules: Vec<_> = values
                            .iter()
                            .filter_map(RuleSpec::from_value)
                            .map(RuleSpec::normalize)
                            .collect();
                        (group, rules)
                    })
                    .collect();
                (identifier, found_rules)
            })
            .collect();

        Self { found }
    }

    /// 某个拦截项的命中规则
    pub fn found_rules(&self, identifier: &str) -> Option<&FoundRules> {
        self.found.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.found.len()
    }

    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).map_err(|e| BlockerError::io(path.display().to_string(), e))?;
    Ok(serde_json::from_str(&content)?)
}

/// 读取拦截项定义文件
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_definitions(path: impl AsRef<Path>) -> Result<Vec<BlockableDefinition>> {
    let definitions: Vec<BlockableDefinition> = read_json(path.as_ref())?;
    info!("Loaded {} blockable definitions", definitions.len());
    Ok(definitions)
}

/// 读取扫描结果文件
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_scan_results(path: impl AsRef<Path>) -> Result<ScanResults> {
    let raw: HashMap<String, HashMap<String, Vec<Value>>> = read_json(path.as_ref())?;
    let results = ScanResults::from_raw(raw);
    info!("Loaded scan results for {} blockables", results.len());
    Ok(results)
}
