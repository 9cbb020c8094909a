//! 拦截项表达式登记
//!
//! 可扫描拦截项的规则表达式需要同步给所属的通用拦截项，由后者负责实际的内容拦截。

/// 所属拦截项的表达式登记接口
///
/// 每次调用都会收到当前完整的表达式列表，而不是增量。
#[cfg_attr(test, mockall::automock)]
pub trait BlockableRegistry {
    fn append_from_string_array(&mut self, expressions: &[String]);
}

/// 内存中的表达式登记
///
/// 按首次出现的顺序保存去重后的表达式。
#[derive(Debug, Clone, Default)]
pub struct ExpressionRegistry {
    expressions: Vec<String>,
}

impl ExpressionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expressions(&self) -> &[String] {
        &self.expressions
    }

    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }
}

impl BlockableRegistry for ExpressionRegistry {
    fn append_from_string_array(&mut self, expressions: &[String]) {
        for expression in expressions {
            if !self.expressions.contains(expression) {
                self.expressions.push(expression.clone());
            }
        }
    }
}
