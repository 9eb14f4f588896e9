//! # 配置管理模块 - 核心配置类型
//!
//! 别名到连接选项的映射，可从 TOML / JSON 文件加载

use crate::error::{MgormError, MgormResult};
use crate::types::ConnectionOptions;
use rat_logger::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// 全局配置
///
/// ```toml
/// [databases.primary]
/// uri = "mongodb://127.0.0.1:27017/app"
///
/// [databases.analytics]
/// hosts = ["10.0.0.1:27017", "10.0.0.2:27017"]
/// database = "analytics"
/// replica_set = "rs0"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MgormConfig {
    /// 数据库连接映射 (别名 -> 连接选项)
    #[serde(default)]
    pub databases: HashMap<String, ConnectionOptions>,
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("toml")
}

impl MgormConfig {
    /// 创建配置构建器
    pub fn builder() -> super::builders::MgormConfigBuilder {
        super::builders::MgormConfigBuilder::new()
    }

    /// 从TOML文本解析
    pub fn from_toml_str(content: &str) -> MgormResult<Self> {
        let config: MgormConfig = toml::from_str(content).map_err(|e| {
            crate::mgorm_error!(config, crate::i18n::tf("error.config_parse", &[("message", &e.to_string())]))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 从配置文件加载配置，`.toml` 按TOML解析，其余按JSON解析
    ///
    /// # 参数
    ///
    /// * `config_path` - 配置文件路径
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> MgormResult<Self> {
        let path = config_path.as_ref();
        let content = std::fs::read_to_string(path).map_err(MgormError::IoError)?;

        let config = if is_toml(path) {
            Self::from_toml_str(&content)?
        } else {
            let config: MgormConfig = serde_json::from_str(&content).map_err(|e| {
                crate::mgorm_error!(config, crate::i18n::tf("error.config_parse", &[("message", &e.to_string())]))
            })?;
            config.validate()?;
            config
        };

        info!("从文件加载配置: {:?}, 别名数量={}", path, config.databases.len());
        Ok(config)
    }

    /// 保存配置到文件
    ///
    /// # 参数
    ///
    /// * `config_path` - 配置文件路径
    pub fn save_to_file<P: AsRef<Path>>(&self, config_path: P) -> MgormResult<()> {
        let path = config_path.as_ref();
        let content = if is_toml(path) {
            toml::to_string_pretty(self).map_err(|e| {
                crate::mgorm_error!(config, crate::i18n::tf("error.config_serialize", &[("message", &e.to_string())]))
            })?
        } else {
            serde_json::to_string_pretty(self).map_err(|e| {
                crate::mgorm_error!(config, crate::i18n::tf("error.config_serialize", &[("message", &e.to_string())]))
            })?
        };

        std::fs::write(path, content).map_err(MgormError::IoError)?;

        info!("保存配置到文件: {:?}", path);
        Ok(())
    }

    /// 校验每个别名的连接选项
    pub fn validate(&self) -> MgormResult<()> {
        for (alias, options) in &self.databases {
            options.validate().map_err(|e| {
                crate::mgorm_error!(config, format!("[{}] {}", alias, e))
            })?;
        }
        Ok(())
    }

    /// 获取指定别名的连接选项
    pub fn get_database(&self, alias: &str) -> MgormResult<&ConnectionOptions> {
        self.databases
            .get(alias)
            .ok_or_else(|| crate::mgorm_error!(alias_not_found, alias))
    }

    /// 所有别名
    pub fn aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.databases.keys().cloned().collect();
        aliases.sort();
        aliases
    }
}
