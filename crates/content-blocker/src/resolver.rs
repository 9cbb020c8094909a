//! 规则组匹配判定
//!
//! 根据外部扫描得到的命中规则（按规则组划分），统计每个规则组的命中数量，
//! 再按规则组策略判断拦截项是否成立。

use crate::models::{Rule, RuleGroup};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// 扫描命中的规则：规则组名 -> 命中规则列表
pub type FoundRules = HashMap<String, Vec<Rule>>;

/// 规则组命中统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchCount {
    /// 同时出现在配置与扫描结果中的规则数
    pub matched: usize,
    /// 组内配置的规则数
    pub total: usize,
}

impl MatchCount {
    pub fn new(matched: usize, total: usize) -> Self {
        Self { matched, total }
    }

    /// 部分命中：至少一条但不是全部
    pub fn is_partial(&self) -> bool {
        self.matched > 0 && self.matched < self.total
    }
}

/// 规则组不满足的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// 严格模式的规则组只命中了部分规则
    PartialStrictMatch,
    /// 规则组要求至少命中一条规则，但一条也没有命中
    GroupUnresolved,
}

/// 第一个不满足的规则组
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupFailure {
    pub group: String,
    pub reason: FailureReason,
    pub count: MatchCount,
}

/// 判定结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct Resolution {
    /// 每个已声明规则组的命中统计
    pub groups: BTreeMap<String, MatchCount>,
    pub failure: Option<GroupFailure>,
}

impl Resolution {
    pub fn is_satisfied(&self) -> bool {
        self.failure.is_none()
    }
}

impl RuleGroup {
    /// 按策略检查一个规则组的命中统计
    ///
    /// 组内没有配置任何规则时，宽松模式的检查视为通过。
    pub fn check(&self, count: MatchCount) -> Option<FailureReason> {
        if self.must_all_rules_be_resolved && count.is_partial() {
            return Some(FailureReason::PartialStrictMatch);
        }

        if self.must_group_be_resolved && count.matched == 0 && count.total > 0 {
            return Some(FailureReason::GroupUnresolved);
        }

        None
    }
}

/// 统计每个规则组的命中数量
///
/// 扫描结果中的重复规则先去重，再统计配置中有多少规则出现在扫描结果里。
/// 没有扫描结果的规则组记为 `(0, total)`。
pub fn count_matches(
    groups_with_rules: &BTreeMap<&str, Vec<&Rule>>,
    found: &FoundRules,
) -> BTreeMap<String, MatchCount> {
    groups_with_rules
        .iter()
        .map(|(&group, rules)| {
            let observed: HashSet<&Rule> = found
                .get(group)
                .map(|found_rules| found_rules.iter().collect())
                .unwrap_or_default();

            let matched = rules.iter().filter(|rule| observed.contains(*rule)).count();

            (group.to_string(), MatchCount::new(matched, rules.len()))
        })
        .collect()
}

/// 按规则组策略判定
///
/// 已声明但没有配置规则的规则组按 `(0, 0)` 计算。遇到第一个不满足的规则组即返回。
pub fn resolve<'a>(
    rule_groups: impl IntoIterator<Item = &'a RuleGroup>,
    counts: BTreeMap<String, MatchCount>,
) -> Resolution {
    let mut resolution = Resolution {
        groups: counts,
        failure: None,
    };

    for group in rule_groups {
        let count = *resolution.groups.entry(group.id.clone()).or_default();

        if resolution.failure.is_some() {
            continue;
        }

        if let Some(reason) = group.check(count) {
            resolution.failure = Some(GroupFailure {
                group: group.id.clone(),
                reason,
                count,
            });
        }
    }

    resolution
}
