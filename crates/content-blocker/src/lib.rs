//! 可扫描拦截项
//!
//! 提供内容扫描器的规则组匹配能力，支持：
//! - 规则与规则组的声明式定义和增量追加
//! - 严格/宽松两种规则组策略
//! - 根据扫描命中的规则判断拦截项是否成立

pub mod blockable;
pub mod cli;
pub mod definition;
pub mod input;
pub mod models;
pub mod registry;
pub mod resolver;

pub use blockable::ScannableBlockable;
pub use definition::{BlockableDefinition, ScanResults, load_definitions, load_scan_results};
pub use input::{GroupNames, RuleFields, RuleGroupFields, RuleGroupSpec, RuleSpec};
pub use models::{DEFAULT_GROUP, QueryArg, ROLE_BLOCKER, ROLE_SCANNER, Rule, RuleGroup};
pub use registry::{BlockableRegistry, ExpressionRegistry};
pub use resolver::{FailureReason, FoundRules, GroupFailure, MatchCount, Resolution};
