//! 会话注册表核心定义

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;
use rat_logger::{debug, error, info, warn};
use tokio::sync::RwLock;

use super::SessionLease;
use crate::config::MgormConfig;
use crate::error::{MgormError, MgormResult};
use crate::types::ConnectionOptions;

/// 已注册的连接
#[derive(Debug)]
pub(crate) struct RegistryEntry {
    /// 注册表持有的原始客户端
    pub(crate) client: Client,
    /// 默认数据库名
    pub(crate) default_database: Option<String>,
    /// 已脱敏的地址
    pub(crate) address: String,
    /// 活跃租约计数
    pub(crate) leases: Arc<AtomicUsize>,
}

/// 会话注册表 - 别名到MongoDB客户端的映射
///
/// 所有读取持有读锁，初始化持有写锁直到整个初始化结束。
/// 通常在启动时构造一次，以 `Arc<SessionRegistry>` 共享给需要的地方
#[derive(Debug, Default)]
pub struct SessionRegistry {
    entries: RwLock<HashMap<String, RegistryEntry>>,
}

impl SessionRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        info!("创建会话注册表");
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// 以 别名 -> 地址 初始化
    ///
    /// 地址可以是完整连接串，也可以是逗号分隔的 `host:port` 列表
    pub async fn initialize(&self, urls: HashMap<String, String>) -> MgormResult<()> {
        let infos = urls
            .into_iter()
            .map(|(alias, url)| (alias, ConnectionOptions::from_address(&url)))
            .collect();
        self.initialize_with_options(infos).await
    }

    /// 从全局配置初始化
    pub async fn initialize_from_config(&self, config: &MgormConfig) -> MgormResult<()> {
        self.initialize_with_options(config.databases.clone()).await
    }

    /// 以 别名 -> 详细连接选项 初始化
    ///
    /// 全部连接成功后才写入注册表；任意一个失败时返回该别名的连接错误，
    /// 本次调用中已建立的连接全部丢弃。已存在的别名会被替换
    pub async fn initialize_with_options(
        &self,
        infos: HashMap<String, ConnectionOptions>,
    ) -> MgormResult<()> {
        let mut entries = self.entries.write().await;
        info!("初始化会话注册表: 别名数量={}", infos.len());

        let mut staged = Vec::with_capacity(infos.len());
        for (alias, options) in infos {
            let entry = connect(&alias, &options).await.map_err(|e| {
                error!("连接MongoDB失败: 别名={}, 错误={}", alias, e);
                e
            })?;
            staged.push((alias, entry));
        }

        for (alias, entry) in staged {
            info!("注册数据库: 别名={}, 地址={}", alias, entry.address);
            if let Some(previous) = entries.insert(alias.clone(), entry) {
                warn!(
                    "数据库别名已存在，替换现有连接: 别名={}, 原地址={}",
                    alias, previous.address
                );
            }
        }

        Ok(())
    }

    /// 获取指定别名的租约
    pub async fn lease(&self, alias: &str) -> MgormResult<SessionLease> {
        let entries = self.entries.read().await;
        let entry = entries.get(alias).ok_or_else(|| {
            debug!("租约请求的别名未注册: {}", alias);
            crate::mgorm_error!(alias_not_found, alias)
        })?;
        Ok(SessionLease::new(
            alias,
            entry.client.clone(),
            entry.default_database.clone(),
            entry.leases.clone(),
        ))
    }

    /// 获取注册表持有的原始客户端，不计入租约
    pub async fn raw_client(&self, alias: &str) -> MgormResult<Client> {
        let entries = self.entries.read().await;
        entries
            .get(alias)
            .map(|entry| entry.client.clone())
            .ok_or_else(|| crate::mgorm_error!(alias_not_found, alias))
    }

    /// 启动检查：确认所有将被使用的别名都已注册
    pub async fn ensure_aliases(&self, aliases: &[&str]) -> MgormResult<()> {
        let entries = self.entries.read().await;
        let missing: Vec<&str> = aliases
            .iter()
            .copied()
            .filter(|alias| !entries.contains_key(*alias))
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        let joined = missing.join(", ");
        error!("存在未注册的数据库别名: {}", joined);
        Err(MgormError::ConfigError {
            message: crate::i18n::tf("error.missing_aliases", &[("aliases", &joined)]),
        })
    }

    /// 所有已注册别名（排序后）
    pub async fn aliases(&self) -> Vec<String> {
        let entries = self.entries.read().await;
        let mut aliases: Vec<String> = entries.keys().cloned().collect();
        aliases.sort();
        aliases
    }

    pub async fn contains(&self, alias: &str) -> bool {
        self.entries.read().await.contains_key(alias)
    }

    /// 指定别名当前未释放的租约数
    pub async fn active_leases(&self, alias: &str) -> MgormResult<usize> {
        let entries = self.entries.read().await;
        entries
            .get(alias)
            .map(|entry| entry.leases.load(Ordering::SeqCst))
            .ok_or_else(|| crate::mgorm_error!(alias_not_found, alias))
    }
}

/// 按连接选项建立客户端
async fn connect(alias: &str, options: &ConnectionOptions) -> MgormResult<RegistryEntry> {
    options
        .validate()
        .map_err(|e| crate::mgorm_error!(config, format!("[{}] {}", alias, e)))?;

    let address = options.describe();
    debug!("建立MongoDB连接: 别名={}, 地址={}", alias, address);

    let mut client_options = ClientOptions::parse(options.connection_uri())
        .await
        .map_err(|e| crate::mgorm_error!(connection, alias, address, e))?;

    if let Some(min) = options.min_pool_size {
        client_options.min_pool_size = Some(min);
    }
    if let Some(max) = options.max_pool_size {
        client_options.max_pool_size = Some(max);
    }
    if let Some(ms) = options.connect_timeout_ms {
        client_options.connect_timeout = Some(Duration::from_millis(ms));
    }
    if let Some(ms) = options.server_selection_timeout_ms {
        client_options.server_selection_timeout = Some(Duration::from_millis(ms));
    }
    if let Some(app_name) = &options.app_name {
        client_options.app_name = Some(app_name.clone());
    }

    let client = Client::with_options(client_options)
        .map_err(|e| crate::mgorm_error!(connection, alias, address, e))?;

    if options.verify_on_connect {
        client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| crate::mgorm_error!(connection, alias, address, e))?;
        debug!("MongoDB连接可达: 别名={}", alias);
    }

    let default_database = options
        .database
        .clone()
        .or_else(|| client.default_database().map(|db| db.name().to_string()));

    Ok(RegistryEntry {
        client,
        default_database,
        address,
        leases: Arc::new(AtomicUsize::new(0)),
    })
}
