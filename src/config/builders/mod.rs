//! # 配置构建器模块
//!
//! 提供所有配置类型的构建器实现，支持链式调用

pub mod config_builder;
pub mod options_builder;

pub use config_builder::MgormConfigBuilder;
pub use options_builder::ConnectionOptionsBuilder;
