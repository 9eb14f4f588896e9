//! rat_mgorm - MongoDB ORM便捷层
//!
//! - 按别名管理MongoDB客户端的会话注册表，读写锁保护，按操作签出租约
//! - `Model` 提供插入、更新、删除、查询、计数与游标等辅助方法
//! - `Oid` 在 JSON、BSON、MessagePack 三种格式中保持一致的 ObjectId 表示

pub mod error;
pub mod i18n;
pub mod types;
pub mod config;
pub mod registry;
pub mod collection;
pub mod model;

// 重新导出常用类型和函数
pub use error::{MgormError, MgormResult, ErrorClass, classify, is_not_found, is_duplicate};
pub use types::*;
pub use types::oid::codec;
pub use config::{MgormConfig, MgormConfigBuilder, ConnectionOptionsBuilder};
pub use registry::{SessionRegistry, SessionLease};
pub use collection::{
    CollectionSource, QueryableCollection, MongoCollection, DocumentStream, UpdateOutcome,
    is_operator_update,
};
pub use model::{Model, ModelCursor};

// 条件编译调试宏 - 只有在 debug 模式下才输出调试信息
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        rat_logger::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        // 在 release 模式下不输出调试信息
    };
}

/// 初始化rat_mgorm库
///
/// 注册多语言错误消息，可重复调用。
///
/// 注意：日志系统由调用者自行初始化，本库不初始化日志
pub fn init() {
    i18n::ErrorMessageI18n::init();
    debug_log!("rat_mgorm 初始化完成: {}", get_info());
}

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 获取库信息
pub fn get_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
