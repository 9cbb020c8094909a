//! 规则与规则组领域模型

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 默认规则组，拦截项创建时总会存在
pub const DEFAULT_GROUP: &str = "__default__";

/// 规则用于内容拦截
pub const ROLE_BLOCKER: &str = "blocker";

/// 规则用于扫描，只有带此角色的规则参与规则组匹配
pub const ROLE_SCANNER: &str = "scanner";

/// 查询参数约束
///
/// 描述规则命中的 URL 上某个查询参数应满足的条件，例如 `id` 参数必须以 `UA-` 开头。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryArg {
    /// 参数名
    pub query_arg: String,
    /// 参数缺失时是否仍视为满足
    #[serde(default)]
    pub is_optional: bool,
    /// 参数值需要匹配的正则，支持 `/pattern/flags` 写法
    #[serde(default)]
    pub reg_exp: Option<String>,
}

impl QueryArg {
    pub fn new(query_arg: impl Into<String>) -> Self {
        Self {
            query_arg: query_arg.into(),
            is_optional: false,
            reg_exp: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    pub fn with_reg_exp(mut self, reg_exp: impl Into<String>) -> Self {
        self.reg_exp = Some(reg_exp.into());
        self
    }

    /// 编译正则表达式
    ///
    /// 未配置或无法编译时返回 None。
    pub fn compiled_reg_exp(&self) -> Option<Regex> {
        let raw = self.reg_exp.as_deref()?;
        let (pattern, flags) = split_delimited(raw).unwrap_or((raw, ""));

        let mut builder = RegexBuilder::new(pattern);
        for flag in flags.chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'x' => {
                    builder.ignore_whitespace(true);
                }
                _ => {}
            }
        }

        builder.build().ok()
    }

    /// 判断给定的参数值是否满足约束
    pub fn accepts(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return self.is_optional;
        };

        if self.reg_exp.is_none() {
            return true;
        }

        // 正则无效时拒绝所有非空值
        self.compiled_reg_exp()
            .is_some_and(|regex| regex.is_match(value))
    }
}

/// 拆分 `/pattern/flags` 形式的正则
fn split_delimited(raw: &str) -> Option<(&str, &str)> {
    let rest = raw.strip_prefix('/')?;
    let end = rest.rfind('/')?;
    Some((&rest[..end], &rest[end + 1..]))
}

/// 扫描规则
///
/// 相等性按全部字段比较，两个字段完全相同的规则视为同一条规则。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rule {
    expression: String,
    roles: BTreeSet<String>,
    assigned_to_groups: Vec<String>,
    query_args: Vec<QueryArg>,
    needs_required_sibling_rule: bool,
}

impl Rule {
    /// 仅由表达式创建规则，默认同时具备 blocker 和 scanner 角色，归属默认规则组
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            roles: Self::default_roles(),
            assigned_to_groups: vec![DEFAULT_GROUP.to_string()],
            query_args: Vec::new(),
            needs_required_sibling_rule: false,
        }
    }

    /// 未声明角色时使用的角色集合
    pub fn default_roles() -> BTreeSet<String> {
        [ROLE_BLOCKER, ROLE_SCANNER]
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let groups: Vec<String> = groups.into_iter().map(Into::into).collect();
        // 每条规则至少属于默认规则组
        self.assigned_to_groups = if groups.is_empty() {
            vec![DEFAULT_GROUP.to_string()]
        } else {
            groups
        };
        self
    }

    pub fn with_query_args(mut self, query_args: Vec<QueryArg>) -> Self {
        self.query_args = query_args;
        self
    }

    pub fn with_needs_required_sibling_rule(mut self, needs_required_sibling_rule: bool) -> Self {
        self.needs_required_sibling_rule = needs_required_sibling_rule;
        self
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn assigned_to_groups(&self) -> &[String] {
        &self.assigned_to_groups
    }

    pub fn query_args(&self) -> &[QueryArg] {
        &self.query_args
    }

    /// 该规则只在另一条规则同时命中时才有意义，不单独计入规则组
    pub fn needs_required_sibling_rule(&self) -> bool {
        self.needs_required_sibling_rule
    }
}

/// 规则组策略
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleGroup {
    pub id: String,
    /// 严格模式：组内规则要么全部命中，要么全部未命中
    pub must_all_rules_be_resolved: bool,
    /// 宽松模式：组内至少命中一条规则
    pub must_group_be_resolved: bool,
}

impl RuleGroup {
    /// 默认配置的规则组（宽松模式）
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            must_all_rules_be_resolved: false,
            must_group_be_resolved: true,
        }
    }

    /// 严格模式规则组
    pub fn strict(id: impl Into<String>) -> Self {
        Self {
            must_all_rules_be_resolved: true,
            ..Self::new(id)
        }
    }

    pub fn with_policy(
        id: impl Into<String>,
        must_all_rules_be_resolved: bool,
        must_group_be_resolved: bool,
    ) -> Self {
        Self {
            id: id.into(),
            must_all_rules_be_resolved,
            must_group_be_resolved,
        }
    }
}
