//! 会话注册表模块
//!
//! 管理 别名 -> MongoDB客户端 的映射，并为每次操作提供租约

mod registry;
mod lease;

pub use registry::SessionRegistry;
pub use lease::SessionLease;
