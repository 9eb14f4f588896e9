use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::MgormResult;
use crate::types::mongo_builder::{redact_uri, MongoUriBuilder};

fn default_verify_on_connect() -> bool {
    true
}

/// 单个别名的详细连接选项
///
/// `uri` 与 `hosts` 二选一：给出完整连接串，或由各字段拼装
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionOptions {
    /// 完整连接串
    pub uri: Option<String>,
    /// 主机列表（host:port）
    pub hosts: Vec<String>,
    /// 默认数据库
    pub database: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// 认证数据库
    pub auth_source: Option<String>,
    /// 副本集名称
    pub replica_set: Option<String>,
    pub direct_connection: bool,
    pub tls: bool,
    /// 服务端日志中显示的应用名
    pub app_name: Option<String>,
    pub min_pool_size: Option<u32>,
    pub max_pool_size: Option<u32>,
    pub connect_timeout_ms: Option<u64>,
    pub server_selection_timeout_ms: Option<u64>,
    /// 初始化时是否 ping 服务器确认可达
    #[serde(default = "default_verify_on_connect")]
    pub verify_on_connect: bool,
    /// 追加到连接串的其他参数
    pub options: BTreeMap<String, String>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            uri: None,
            hosts: Vec::new(),
            database: None,
            username: None,
            password: None,
            auth_source: None,
            replica_set: None,
            direct_connection: false,
            tls: false,
            app_name: None,
            min_pool_size: None,
            max_pool_size: None,
            connect_timeout_ms: None,
            server_selection_timeout_ms: None,
            verify_on_connect: true,
            options: BTreeMap::new(),
        }
    }
}

impl ConnectionOptions {
    /// 由连接串创建
    pub fn from_uri<S: Into<String>>(uri: S) -> Self {
        Self {
            uri: Some(uri.into()),
            ..Default::default()
        }
    }

    /// 由地址创建：带 `scheme://` 的视为连接串，否则按逗号拆分为主机列表
    pub fn from_address(address: &str) -> Self {
        if address.contains("://") {
            Self::from_uri(address)
        } else {
            Self {
                hosts: address
                    .split(',')
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                    .map(str::to_string)
                    .collect(),
                ..Default::default()
            }
        }
    }

    /// 创建连接选项构建器
    pub fn builder() -> crate::config::ConnectionOptionsBuilder {
        crate::config::ConnectionOptionsBuilder::new()
    }

    /// 校验地址配置
    pub fn validate(&self) -> MgormResult<()> {
        match (&self.uri, self.hosts.is_empty()) {
            (Some(_), false) => Err(crate::mgorm_error!(
                config,
                crate::i18n::t("error.options_uri_and_hosts")
            )),
            (None, true) => Err(crate::mgorm_error!(
                config,
                crate::i18n::t("error.options_no_address")
            )),
            _ => Ok(()),
        }
    }

    fn uri_builder(&self) -> MongoUriBuilder {
        let mut builder = MongoUriBuilder::new(self.hosts.iter().cloned())
            .with_direct_connection(self.direct_connection)
            .with_tls(self.tls);
        if let Some(database) = &self.database {
            builder = builder.with_database(database.clone());
        }
        if let (Some(user), Some(pass)) = (&self.username, &self.password) {
            builder = builder.with_auth(user.clone(), pass.clone());
        }
        if let Some(auth_source) = &self.auth_source {
            builder = builder.with_auth_source(auth_source.clone());
        }
        if let Some(replica_set) = &self.replica_set {
            builder = builder.with_replica_set(replica_set.clone());
        }
        for (key, value) in &self.options {
            builder = builder.with_option(key.clone(), value.clone());
        }
        builder
    }

    /// 最终用于连接的URI
    pub fn connection_uri(&self) -> String {
        match &self.uri {
            Some(uri) => uri.clone(),
            None => self.uri_builder().build_uri(),
        }
    }

    /// 已脱敏的地址描述，用于日志与错误信息
    pub fn describe(&self) -> String {
        match &self.uri {
            Some(uri) => redact_uri(uri),
            None => self.uri_builder().build_redacted_uri(),
        }
    }
}
