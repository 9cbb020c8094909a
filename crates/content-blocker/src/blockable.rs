//! 可扫描拦截项
//!
//! 持有一组扫描规则和规则组配置，判断一次扫描的命中结果是否满足规则组策略。

use crate::input::{RuleGroupSpec, RuleSpec};
use crate::models::{DEFAULT_GROUP, ROLE_SCANNER, Rule, RuleGroup};
use crate::registry::{BlockableRegistry, ExpressionRegistry};
use crate::resolver::{self, FoundRules, Resolution};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// 可扫描拦截项
///
/// 规则组按 id 保存；规则引用了尚未声明的规则组时会自动创建一个宽松模式的规则组。
/// 默认规则组 [`DEFAULT_GROUP`] 总是存在。
pub struct ScannableBlockable<R = ExpressionRegistry> {
    identifier: String,
    /// 父模板标识
    extended: Option<String>,
    rule_groups: BTreeMap<String, RuleGroup>,
    rules: Vec<Rule>,
    registry: R,
}

impl ScannableBlockable<ExpressionRegistry> {
    /// 使用内存表达式登记创建拦截项
    pub fn new(
        identifier: impl Into<String>,
        extended: Option<String>,
        rules: impl IntoIterator<Item = RuleSpec>,
        rule_groups: impl IntoIterator<Item = RuleGroupSpec>,
    ) -> Self {
        Self::with_registry(
            ExpressionRegistry::new(),
            identifier,
            extended,
            rules,
            rule_groups,
        )
    }
}

impl<R: BlockableRegistry> ScannableBlockable<R> {
    /// 创建拦截项，规则表达式会同步到给定的登记
    pub fn with_registry(
        registry: R,
        identifier: impl Into<String>,
        extended: Option<String>,
        rules: impl IntoIterator<Item = RuleSpec>,
        rule_groups: impl IntoIterator<Item = RuleGroupSpec>,
    ) -> Self {
        let mut blockable = Self {
            identifier: identifier.into(),
            extended,
            rule_groups: BTreeMap::new(),
            rules: Vec::new(),
            registry,
        };

        blockable.add_rules(rules, rule_groups, true);
        blockable
            .rule_groups
            .insert(DEFAULT_GROUP.to_string(), RuleGroup::new(DEFAULT_GROUP));

        blockable
    }

    /// 追加规则和规则组
    ///
    /// - 同 id 的规则组会被覆盖
    /// - 只保留带 scanner 角色的规则
    /// - `append_to_owner` 为 true 时把当前全部规则表达式同步给登记
    #[instrument(skip_all, fields(identifier = %self.identifier))]
    pub fn add_rules(
        &mut self,
        rules: impl IntoIterator<Item = RuleSpec>,
        rule_groups: impl IntoIterator<Item = RuleGroupSpec>,
        append_to_owner: bool,
    ) {
        for spec in rule_groups {
            let group = spec.normalize();
            self.rule_groups.insert(group.id.clone(), group);
        }

        for spec in rules {
            let rule = spec.normalize();
            if !rule.has_role(ROLE_SCANNER) {
                debug!(expression = %rule.expression(), "Skipping rule without scanner role");
                continue;
            }

            for group in rule.assigned_to_groups() {
                if !self.rule_groups.contains_key(group) {
                    debug!(group = %group, "Creating rule group on first reference");
                    self.rule_groups
                        .insert(group.clone(), RuleGroup::new(group.clone()));
                }
            }

            self.rules.push(rule);
        }

        if append_to_owner {
            let expressions = self.expressions();
            self.registry.append_from_string_array(&expressions);
        }
    }

    /// 从 JSON 配置追加规则和规则组，无法识别的项被跳过
    pub fn add_rule_values(
        &mut self,
        rules: &[Value],
        rule_groups: &[Value],
        append_to_owner: bool,
    ) {
        self.add_rules(
            rules.iter().filter_map(RuleSpec::from_value),
            rule_groups.iter().filter_map(RuleGroupSpec::from_value),
            append_to_owner,
        );
    }

    /// 外部向所属拦截项追加表达式
    ///
    /// 表达式先交给登记，再作为仅含表达式的规则加入本拦截项，且不会再次同步给登记。
    pub fn append_from_string_array(&mut self, expressions: &[String]) {
        self.registry.append_from_string_array(expressions);
        self.add_rules(
            expressions.iter().cloned().map(RuleSpec::Expression),
            [],
            false,
        );
    }

    /// 判断扫描命中的规则是否满足规则组配置
    pub fn is_satisfied(&self, found: &FoundRules) -> bool {
        self.resolve(found).is_satisfied()
    }

    /// 判断扫描命中的规则是否满足规则组配置，并返回每个规则组的统计
    pub fn resolve(&self, found: &FoundRules) -> Resolution {
        let counts = resolver::count_matches(&self.groups_with_rules_map(), found);
        let resolution = resolver::resolve(self.rule_groups.values(), counts);

        if let Some(failure) = &resolution.failure {
            debug!(
                identifier = %self.identifier,
                group = %failure.group,
                reason = ?failure.reason,
                matched = failure.count.matched,
                total = failure.count.total,
                "Rule group not resolved"
            );
        }

        resolution
    }

    /// 规则组 -> 组内规则
    ///
    /// 需要兄弟规则的规则不计入，每次调用都根据当前配置重新计算。
    pub fn groups_with_rules_map(&self) -> BTreeMap<&str, Vec<&Rule>> {
        let mut result: BTreeMap<&str, Vec<&Rule>> = BTreeMap::new();

        for rule in self
            .rules
            .iter()
            .filter(|rule| !rule.needs_required_sibling_rule())
        {
            for group in rule.assigned_to_groups() {
                result.entry(group.as_str()).or_default().push(rule);
            }
        }

        result
    }

    /// 所有表达式等于给定值的规则
    pub fn rules_by_expression(&self, expression: &str) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|rule| rule.expression() == expression)
            .collect()
    }

    /// 当前全部规则的表达式，按规则加入顺序
    pub fn expressions(&self) -> Vec<String> {
        self.rules
            .iter()
            .map(|rule| rule.expression().to_string())
            .collect()
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn extended(&self) -> Option<&str> {
        self.extended.as_deref()
    }

    /// 扫描场景下拦截项 id 即标识
    pub fn blocker_id(&self) -> &str {
        &self.identifier
    }

    /// 可扫描拦截项不依赖其它拦截项
    pub fn required_ids(&self) -> Vec<String> {
        Vec::new()
    }

    pub fn criteria(&self) -> &'static str {
        "scannable"
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule_groups(&self) -> &BTreeMap<String, RuleGroup> {
        &self.rule_groups
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }
}
