//! 会话租约

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use mongodb::{Client, Collection, Database};
use rat_logger::debug;

/// 一次逻辑操作期间持有的连接副本
///
/// 副本与注册表中的原始客户端共享底层连接池。调用 [`SessionLease::release`]
/// 或离开作用域时释放，释放只发生一次，不影响注册表中的原始客户端
#[derive(Debug)]
pub struct SessionLease {
    alias: String,
    client: Client,
    default_database: Option<String>,
    counter: Arc<AtomicUsize>,
    released: bool,
}

impl SessionLease {
    pub(crate) fn new(
        alias: &str,
        client: Client,
        default_database: Option<String>,
        counter: Arc<AtomicUsize>,
    ) -> Self {
        let active = counter.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("获取会话租约: 别名={}, 活跃租约={}", alias, active);
        Self {
            alias: alias.to_string(),
            client,
            default_database,
            counter,
            released: false,
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// 租约持有的客户端副本
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database(&self, name: &str) -> Database {
        self.client.database(name)
    }

    /// 连接选项中指定的默认数据库
    pub fn default_database(&self) -> Option<Database> {
        self.default_database
            .as_deref()
            .map(|name| self.client.database(name))
    }

    pub fn collection<T: Send + Sync>(&self, database: &str, collection: &str) -> Collection<T> {
        self.client.database(database).collection(collection)
    }

    /// 显式释放租约
    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let remaining = self.counter.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
        debug!("释放会话租约: 别名={}, 活跃租约={}", self.alias, remaining);
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        self.release_once();
    }
}
