//! 错误类型定义
//!
//! 统一的错误枚举、结果别名，以及“未找到 / 重复键”两类错误的分类判定

use thiserror::Error;

/// rat_mgorm 统一错误类型
#[derive(Error, Debug)]
pub enum MgormError {
    /// ObjectId 文本格式非法
    #[error("invalid object id '{input}'")]
    InvalidObjectId {
        /// 原始输入
        input: String,
    },

    /// 建立连接失败
    #[error("connect to mongodb '{alias}' ({address}): {message}")]
    ConnectionError {
        alias: String,
        /// 已脱敏的连接地址
        address: String,
        message: String,
    },

    /// 配置错误
    #[error("{message}")]
    ConfigError { message: String },

    /// 别名未注册
    #[error("{}", crate::i18n::tf("error.alias_not_found", &[("alias", alias.as_str())]))]
    AliasNotFound { alias: String },

    /// 没有匹配的文档
    #[error("not found")]
    NotFound,

    /// 唯一索引冲突
    #[error("{message}")]
    DuplicateKey { code: i32, message: String },

    /// 其他驱动层错误
    #[error("{message}")]
    DriverError { code: Option<i32>, message: String },

    /// 带集合名与操作名上下文的错误
    #[error("{collection}: {action}: {source}")]
    OperationError {
        collection: String,
        action: &'static str,
        #[source]
        source: Box<MgormError>,
    },

    /// 序列化 / 反序列化失败
    #[error("{message}")]
    SerializationError { message: String },

    /// 文件读写错误
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// 结果类型别名
pub type MgormResult<T> = Result<T, MgormError>;

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// 没有匹配的文档
    NotFound,
    /// 唯一键冲突
    Duplicate,
    /// 其他
    Other,
}

/// MongoDB 的重复键错误码
pub(crate) const DUPLICATE_KEY_CODES: [i32; 3] = [11000, 11001, 12582];

impl MgormError {
    /// 为错误附加集合名与操作名
    pub fn with_context(self, collection: &str, action: &'static str) -> Self {
        MgormError::OperationError {
            collection: collection.to_string(),
            action,
            source: Box::new(self),
        }
    }

    /// 剥离上下文包装，返回最内层错误
    pub fn root(&self) -> &MgormError {
        match self {
            MgormError::OperationError { source, .. } => source.root(),
            other => other,
        }
    }

    /// 剥离上下文包装，取得最内层错误的所有权
    pub fn into_root(self) -> MgormError {
        match self {
            MgormError::OperationError { source, .. } => source.into_root(),
            other => other,
        }
    }

    /// 错误分类，优先使用结构化信息，其次回退到驱动错误文本匹配
    pub fn class(&self) -> ErrorClass {
        match self.root() {
            MgormError::NotFound => ErrorClass::NotFound,
            MgormError::DuplicateKey { .. } => ErrorClass::Duplicate,
            MgormError::DriverError { code, message } => {
                if code.is_some_and(|c| DUPLICATE_KEY_CODES.contains(&c)) {
                    ErrorClass::Duplicate
                } else {
                    classify_message(message)
                }
            }
            _ => ErrorClass::Other,
        }
    }
}

/// 按驱动错误文本分类，保持旧版判定结果
pub(crate) fn classify_message(message: &str) -> ErrorClass {
    if message == "not found" {
        ErrorClass::NotFound
    } else if message.contains("E11000") || message.contains("duplicate key") {
        ErrorClass::Duplicate
    } else {
        ErrorClass::Other
    }
}

/// 错误分类
pub fn classify(err: &MgormError) -> ErrorClass {
    err.class()
}

/// 是否为“未找到”错误
pub fn is_not_found(err: &MgormError) -> bool {
    err.class() == ErrorClass::NotFound
}

/// 是否为重复键错误
pub fn is_duplicate(err: &MgormError) -> bool {
    err.class() == ErrorClass::Duplicate
}

/// 构造带多语言消息的错误
#[macro_export]
macro_rules! mgorm_error {
    (config, $msg:expr) => {
        $crate::error::MgormError::ConfigError {
            message: $crate::i18n::tf("error.config", &[("message", &$msg.to_string())]),
        }
    };
    (serialization, $msg:expr) => {
        $crate::error::MgormError::SerializationError {
            message: $crate::i18n::tf("error.serialization", &[("message", &$msg.to_string())]),
        }
    };
    (connection, $alias:expr, $address:expr, $msg:expr) => {
        $crate::error::MgormError::ConnectionError {
            alias: $alias.to_string(),
            address: $address.to_string(),
            message: $crate::i18n::tf("error.connection", &[("message", &$msg.to_string())]),
        }
    };
    (alias_not_found, $alias:expr) => {
        $crate::error::MgormError::AliasNotFound {
            alias: $alias.to_string(),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_classification() {
        assert_eq!(classify(&MgormError::NotFound), ErrorClass::NotFound);
        let dup = MgormError::DuplicateKey { code: 11000, message: "dup".to_string() };
        assert!(is_duplicate(&dup));
        assert!(!is_not_found(&dup));
    }

    #[test]
    fn test_driver_code_and_text_fallback() {
        let by_code = MgormError::DriverError { code: Some(11001), message: "write failed".to_string() };
        assert_eq!(by_code.class(), ErrorClass::Duplicate);

        let by_text = MgormError::DriverError {
            code: None,
            message: "E11000 duplicate key error collection: test.foo index: _id_".to_string(),
        };
        assert_eq!(by_text.class(), ErrorClass::Duplicate);

        let legacy_nf = MgormError::DriverError { code: None, message: "not found".to_string() };
        assert_eq!(legacy_nf.class(), ErrorClass::NotFound);

        let other = MgormError::DriverError { code: Some(13), message: "unauthorized".to_string() };
        assert_eq!(other.class(), ErrorClass::Other);
    }

    #[test]
    fn test_context_keeps_class() {
        let err = MgormError::NotFound.with_context("users", "find_one");
        assert!(is_not_found(&err));
        assert_eq!(err.to_string(), "users: find_one: not found");
        assert!(matches!(err.root(), MgormError::NotFound));
    }

    #[test]
    fn test_translated_errors_keep_payload() {
        let err = crate::mgorm_error!(config, "missing host list");
        assert!(err.to_string().contains("missing host list"));

        let err = crate::mgorm_error!(alias_not_found, "audit");
        assert!(err.to_string().contains("'audit'"));
        assert!(!err.to_string().contains("error.alias_not_found"));
    }

    #[test]
    fn test_validation_is_other() {
        let err = MgormError::InvalidObjectId { input: "xyz".to_string() };
        assert_eq!(classify(&err), ErrorClass::Other);
        assert_eq!(err.to_string(), "invalid object id 'xyz'");
    }
}
