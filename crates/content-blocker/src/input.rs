//! 规则与规则组的输入形态
//!
//! 配置数据中的规则可以是现成的 [`Rule`]、字段映射或者仅有表达式的字符串，
//! 规则组可以是现成的 [`RuleGroup`] 或字段映射。所有形态在这里统一转换，
//! 之后的逻辑只面对 `Rule` / `RuleGroup`。
//!
//! 无法识别的输入一律跳过（返回 `None`），不视为错误。

use crate::models::{QueryArg, Rule, RuleGroup};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// 规则所属组，配置中可以写单个字符串或字符串数组
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum GroupNames {
    One(String),
    Many(Vec<String>),
}

impl Default for GroupNames {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl GroupNames {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(name) => vec![name],
            Self::Many(names) => names,
        }
    }
}

/// 规则字段映射
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleFields {
    pub expression: String,
    /// 缺省（或 null）时使用默认角色
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    #[serde(default)]
    pub assigned_to_groups: GroupNames,
    #[serde(default)]
    pub query_args: Vec<QueryArg>,
    #[serde(default)]
    pub needs_required_sibling_rule: bool,
}

/// 规则组字段映射
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleGroupFields {
    pub id: String,
    #[serde(default)]
    pub must_all_rules_be_resolved: bool,
    #[serde(default = "default_must_group_be_resolved")]
    pub must_group_be_resolved: bool,
}

fn default_must_group_be_resolved() -> bool {
    true
}

/// 规则输入
#[derive(Debug, Clone)]
pub enum RuleSpec {
    Rule(Rule),
    Fields(RuleFields),
    Expression(String),
}

impl RuleSpec {
    /// 从 JSON 值识别规则输入，形态不符时返回 None
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(expression) => Some(Self::Expression(expression.clone())),
            Value::Object(_) => match RuleFields::deserialize(value) {
                Ok(fields) => Some(Self::Fields(fields)),
                Err(e) => {
                    debug!(error = %e, "Skipping unrecognized rule specification");
                    None
                }
            },
            _ => {
                debug!(value = %value, "Skipping unrecognized rule specification");
                None
            }
        }
    }

    /// 转换为规则
    pub fn normalize(self) -> Rule {
        match self {
            Self::Rule(rule) => rule,
            Self::Expression(expression) => Rule::new(expression),
            Self::Fields(fields) => {
                let mut rule = Rule::new(fields.expression)
                    .with_groups(fields.assigned_to_groups.into_vec())
                    .with_query_args(fields.query_args)
                    .with_needs_required_sibling_rule(fields.needs_required_sibling_rule);
                if let Some(roles) = fields.roles {
                    rule = rule.with_roles(roles);
                }
                rule
            }
        }
    }
}

impl From<Rule> for RuleSpec {
    fn from(rule: Rule) -> Self {
        Self::Rule(rule)
    }
}

impl From<RuleFields> for RuleSpec {
    fn from(fields: RuleFields) -> Self {
        Self::Fields(fields)
    }
}

impl From<String> for RuleSpec {
    fn from(expression: String) -> Self {
        Self::Expression(expression)
    }
}

impl From<&str> for RuleSpec {
    fn from(expression: &str) -> Self {
        Self::Expression(expression.to_string())
    }
}

/// 规则组输入
#[derive(Debug, Clone)]
pub enum RuleGroupSpec {
    Group(RuleGroup),
    Fields(RuleGroupFields),
}

impl RuleGroupSpec {
    /// 从 JSON 值识别规则组输入，形态不符时返回 None
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            debug!(value = %value, "Skipping unrecognized rule group specification");
            return None;
        }

        match RuleGroupFields::deserialize(value) {
            Ok(fields) => Some(Self::Fields(fields)),
            Err(e) => {
                debug!(error = %e, "Skipping unrecognized rule group specification");
                None
            }
        }
    }

    /// 转换为规则组
    pub fn normalize(self) -> RuleGroup {
        match self {
            Self::Group(group) => group,
            Self::Fields(fields) => RuleGroup::with_policy(
                fields.id,
                fields.must_all_rules_be_resolved,
                fields.must_group_be_resolved,
            ),
        }
    }
}

impl From<RuleGroup> for RuleGroupSpec {
    fn from(group: RuleGroup) -> Self {
        Self::Group(group)
    }
}

impl From<RuleGroupFields> for RuleGroupSpec {
    fn from(fields: RuleGroupFields) -> Self {
        Self::Fields(fields)
    }
}
