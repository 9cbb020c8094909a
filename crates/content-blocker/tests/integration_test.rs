//! 可扫描拦截项集成测试
//!
//! 测试从声明式配置构建拦截项、追加规则到判定扫描结果的完整工作流。

use content_blocker::{
    BlockableDefinition, DEFAULT_GROUP, FailureReason, FoundRules, MatchCount, Rule, RuleGroup,
    RuleGroupSpec, RuleSpec, ScanResults, ScannableBlockable,
};
use serde_json::{Value, json};
use std::collections::HashMap;

/// 创建测试定义：谷歌分析，script 组为严格模式
fn create_analytics_definition() -> BlockableDefinition {
    serde_json::from_value(json!({
        "identifier": "google-analytics",
        "extended": "google",
        "rules": [
            {
                "expression": "*google-analytics.com/analytics.js*",
                "assignedToGroups": "script",
                "roles": ["blocker", "scanner"]
            },
            {
                "expression": "*googletagmanager.com/gtag/js*",
                "assignedToGroups": ["script"],
                "queryArgs": [
                    { "queryArg": "id", "isOptional": false, "regExp": "/^UA-/" }
                ]
            },
            {
                "expression": "*gtag(*",
                "assignedToGroups": "script"
            },
            {
                "expression": "*google-analytics.com/collect*",
                "assignedToGroups": "script",
                "needsRequiredSiblingRule": true
            },
            {
                "expression": "*www.google-analytics.com*",
                "roles": ["blocker"]
            }
        ],
        "ruleGroups": [
            { "id": "script", "mustAllRulesBeResolved": true }
        ]
    }))
    .unwrap()
}

/// 从定义中按表达式取出规则，模拟扫描引擎报告命中
fn found_for(blockable: &ScannableBlockable, group: &str, expressions: &[&str]) -> FoundRules {
    let rules = expressions
        .iter()
        .flat_map(|expression| blockable.rules_by_expression(expression))
        .cloned()
        .collect();
    HashMap::from([(group.to_string(), rules)])
}

// ==================== 完整工作流测试 ====================

#[test]
fn test_definition_workflow() {
    let blockable = create_analytics_definition().into_blockable();

    // blocker 专用规则被丢弃
    assert_eq!(blockable.rules().len(), 4);
    assert_eq!(
        blockable.registry().expressions(),
        [
            "*google-analytics.com/analytics.js*",
            "*googletagmanager.com/gtag/js*",
            "*gtag(*",
            "*google-analytics.com/collect*",
        ]
    );

    // 兄弟规则不计入规则组
    let map = blockable.groups_with_rules_map();
    assert_eq!(map["script"].len(), 3);
}

#[test]
fn test_strict_group_two_of_three_fails() {
    let blockable = create_analytics_definition().into_blockable();
    let found = found_for(
        &blockable,
        "script",
        &["*google-analytics.com/analytics.js*", "*gtag(*"],
    );

    let resolution = blockable.resolve(&found);

    assert!(!resolution.is_satisfied());
    let failure = resolution.failure.unwrap();
    assert_eq!(failure.reason, FailureReason::PartialStrictMatch);
    assert_eq!(failure.count, MatchCount::new(2, 3));
}

#[test]
fn test_strict_group_all_three_succeeds() {
    let blockable = create_analytics_definition().into_blockable();
    let found = found_for(
        &blockable,
        "script",
        &[
            "*google-analytics.com/analytics.js*",
            "*googletagmanager.com/gtag/js*",
            "*gtag(*",
        ],
    );

    assert!(blockable.is_satisfied(&found));
}

#[test]
fn test_duplicate_observations_do_not_inflate_count() {
    let blockable = create_analytics_definition().into_blockable();
    let found = found_for(
        &blockable,
        "script",
        &["*gtag(*", "*gtag(*", "*gtag(*"],
    );

    let resolution = blockable.resolve(&found);

    assert_eq!(resolution.groups["script"], MatchCount::new(1, 3));
    assert!(!resolution.is_satisfied());
}

#[test]
fn test_sibling_rule_alone_does_not_resolve_group() {
    let blockable = create_analytics_definition().into_blockable();
    let found = found_for(&blockable, "script", &["*google-analytics.com/collect*"]);

    let resolution = blockable.resolve(&found);

    assert_eq!(resolution.groups["script"], MatchCount::new(0, 3));
    assert_eq!(
        resolution.failure.map(|f| f.reason),
        Some(FailureReason::GroupUnresolved)
    );
}

// ==================== 规则组策略测试 ====================

#[test]
fn test_lenient_group_one_of_three_succeeds() {
    let rules: Vec<RuleSpec> = (0..3)
        .map(|i| Rule::new(format!("*cdn-{}*", i)).with_groups(["script"]).into())
        .collect();
    let blockable = ScannableBlockable::new(
        "cdn",
        None,
        rules,
        [RuleGroupSpec::from(RuleGroup::new("script"))],
    );

    let found = found_for(&blockable, "script", &["*cdn-1*"]);

    assert!(blockable.is_satisfied(&found));
}

#[test]
fn test_every_group_must_hold() {
    let blockable = ScannableBlockable::new(
        "youtube",
        None,
        [
            Rule::new("*youtube.com/embed*").with_groups(["iframe"]).into(),
            Rule::new("*youtube.com/iframe_api*").with_groups(["script"]).into(),
        ],
        [],
    );

    let only_iframe = found_for(&blockable, "iframe", &["*youtube.com/embed*"]);
    assert!(!blockable.is_satisfied(&only_iframe));

    let mut both = only_iframe.clone();
    both.extend(found_for(&blockable, "script", &["*youtube.com/iframe_api*"]));
    assert!(blockable.is_satisfied(&both));
}

#[test]
fn test_default_group_without_rules_is_exempt() {
    let blockable = ScannableBlockable::new("nothing", None, [], []);

    let resolution = blockable.resolve(&FoundRules::new());

    assert!(resolution.is_satisfied());
    assert_eq!(resolution.groups[DEFAULT_GROUP], MatchCount::new(0, 0));
}

#[test]
fn test_default_group_with_rules_requires_a_match() {
    let blockable = ScannableBlockable::new(
        "default",
        None,
        [Rule::new("*vimeo.com*").with_groups([DEFAULT_GROUP]).into()],
        [],
    );

    assert!(!blockable.is_satisfied(&FoundRules::new()));

    let found = found_for(&blockable, DEFAULT_GROUP, &["*vimeo.com*"]);
    assert!(blockable.is_satisfied(&found));
}

// ==================== 增量配置测试 ====================

#[test]
fn test_incremental_rules_and_external_expressions() {
    let mut blockable = create_analytics_definition().into_blockable();

    blockable.add_rule_values(
        &[json!({ "expression": "*analytics.google.com*", "assignedToGroups": "link" })],
        &[],
        true,
    );
    blockable.append_from_string_array(&["*ga.js*".to_string()]);

    assert!(blockable.rule_groups().contains_key("link"));
    assert_eq!(blockable.rules_by_expression("*ga.js*").len(), 1);
    assert!(
        blockable
            .registry()
            .expressions()
            .iter()
            .any(|e| e == "*analytics.google.com*")
    );
    assert!(blockable.registry().expressions().iter().any(|e| e == "*ga.js*"));
}

#[test]
fn test_scan_results_end_to_end() {
    let blockable = create_analytics_definition().into_blockable();

    let raw: HashMap<String, HashMap<String, Vec<Value>>> = serde_json::from_value(json!({
        "google-analytics": {
            "script": [
                { "expression": "*google-analytics.com/analytics.js*", "assignedToGroups": "script", "roles": ["blocker", "scanner"] },
                { "expression": "*gtag(*", "assignedToGroups": "script" },
                {
                    "expression": "*googletagmanager.com/gtag/js*",
                    "assignedToGroups": ["script"],
                    "queryArgs": [ { "queryArg": "id", "isOptional": false, "regExp": "/^UA-/" } ]
                }
            ]
        }
    }))
    .unwrap();
    let results = ScanResults::from_raw(raw);

    let found = results.found_rules("google-analytics").unwrap();
    assert!(blockable.is_satisfied(found));
}
