//! # 配置管理模块
//!
//! 别名到连接选项的配置，以及链式构建器

pub mod builders;
pub mod core;

pub use builders::{ConnectionOptionsBuilder, MgormConfigBuilder};
pub use core::MgormConfig;
