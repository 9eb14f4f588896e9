//! # 连接选项构建器模块
//!
//! 提供连接选项的构建器实现，支持链式调用

use crate::error::MgormResult;
use crate::types::ConnectionOptions;
use std::time::Duration;

/// 连接选项构建器
#[derive(Debug, Default)]
pub struct ConnectionOptionsBuilder {
    options: ConnectionOptions,
}

impl ConnectionOptionsBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            options: ConnectionOptions::default(),
        }
    }

    /// 设置完整连接串
    pub fn uri<S: Into<String>>(mut self, uri: S) -> Self {
        self.options.uri = Some(uri.into());
        self
    }

    /// 添加一个主机
    ///
    /// # 参数
    ///
    /// * `host` - `host:port` 形式的地址
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.options.hosts.push(host.into());
        self
    }

    /// 设置默认数据库
    pub fn database<S: Into<String>>(mut self, database: S) -> Self {
        self.options.database = Some(database.into());
        self
    }

    /// 设置用户名和密码
    pub fn auth<U: Into<String>, P: Into<String>>(mut self, username: U, password: P) -> Self {
        self.options.username = Some(username.into());
        self.options.password = Some(password.into());
        self
    }

    /// 设置认证数据库
    pub fn auth_source<S: Into<String>>(mut self, auth_source: S) -> Self {
        self.options.auth_source = Some(auth_source.into());
        self
    }

    /// 设置副本集名称
    pub fn replica_set<S: Into<String>>(mut self, replica_set: S) -> Self {
        self.options.replica_set = Some(replica_set.into());
        self
    }

    pub fn direct_connection(mut self, direct: bool) -> Self {
        self.options.direct_connection = direct;
        self
    }

    pub fn tls(mut self, tls: bool) -> Self {
        self.options.tls = tls;
        self
    }

    pub fn app_name<S: Into<String>>(mut self, app_name: S) -> Self {
        self.options.app_name = Some(app_name.into());
        self
    }

    /// 设置连接池大小范围
    pub fn pool_size(mut self, min: u32, max: u32) -> Self {
        self.options.min_pool_size = Some(min);
        self.options.max_pool_size = Some(max);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.options.connect_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.options.server_selection_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// 设置初始化时是否 ping 服务器
    pub fn verify_on_connect(mut self, verify: bool) -> Self {
        self.options.verify_on_connect = verify;
        self
    }

    /// 添加连接串参数
    pub fn option<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.options.options.insert(key.into(), value.into());
        self
    }

    /// 构建连接选项
    ///
    /// # 错误
    ///
    /// `uri` 与 `hosts` 同时设置或都未设置时返回配置错误
    pub fn build(self) -> MgormResult<ConnectionOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}
