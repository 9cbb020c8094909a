//! 共享库
//!
//! 包含内容拦截器各组件共用的配置、错误处理和日志初始化代码。

pub mod config;
pub mod error;
pub mod observability;
