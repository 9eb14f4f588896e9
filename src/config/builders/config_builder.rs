//! # 全局配置构建器模块

use crate::config::core::MgormConfig;
use crate::error::MgormResult;
use crate::types::ConnectionOptions;
use rat_logger::info;
use std::collections::HashMap;

/// 全局配置构建器
#[derive(Debug, Default)]
pub struct MgormConfigBuilder {
    databases: HashMap<String, ConnectionOptions>,
}

impl MgormConfigBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            databases: HashMap::new(),
        }
    }

    /// 添加数据库连接
    ///
    /// # 参数
    ///
    /// * `alias` - 数据库别名
    /// * `options` - 连接选项
    pub fn add_database<S: Into<String>>(mut self, alias: S, options: ConnectionOptions) -> Self {
        self.databases.insert(alias.into(), options);
        self
    }

    /// 以连接串添加数据库
    pub fn add_uri<S: Into<String>, U: Into<String>>(self, alias: S, uri: U) -> Self {
        self.add_database(alias, ConnectionOptions::from_uri(uri))
    }

    /// 构建全局配置
    ///
    /// # 错误
    ///
    /// 没有任何数据库或存在非法连接选项时返回错误
    pub fn build(self) -> MgormResult<MgormConfig> {
        if self.databases.is_empty() {
            return Err(crate::mgorm_error!(config, "至少需要配置一个数据库"));
        }

        let config = MgormConfig {
            databases: self.databases,
        };
        config.validate()?;

        info!("创建全局配置: 数据库数量={}", config.databases.len());
        Ok(config)
    }
}
