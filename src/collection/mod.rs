//! 可查询集合抽象
//!
//! `Model` 只依赖这里的两个 trait，数据库驱动因此可以替换或在测试中模拟

pub mod mongodb;

use async_trait::async_trait;
use futures::stream::BoxStream;
use ::mongodb::bson::{Bson, Document};

use crate::error::MgormResult;
use crate::types::{FindOptions, IndexSpec};

pub use self::mongodb::MongoCollection;

/// 查询结果文档流
pub type DocumentStream = BoxStream<'static, MgormResult<Document>>;

/// 更新结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOutcome {
    /// 匹配的文档数
    pub matched: u64,
    /// 实际修改的文档数
    pub modified: u64,
    /// upsert 插入时生成的 `_id`
    pub upserted_id: Option<Bson>,
}

/// 更新文档是否为操作符更新（首个键以 `$` 开头）
pub fn is_operator_update(update: &Document) -> bool {
    update.keys().next().is_some_and(|key| key.starts_with('$'))
}

/// 单个集合上的数据操作
#[async_trait]
pub trait QueryableCollection: Send + Sync {
    /// 集合名
    fn name(&self) -> &str;

    async fn insert_many(&self, docs: Vec<Document>) -> MgormResult<()>;

    /// 更新单个文档
    ///
    /// 操作符更新按字段修改，否则整体替换匹配的文档
    async fn update_one(
        &self,
        filter: Document,
        update: Document,
        upsert: bool,
    ) -> MgormResult<UpdateOutcome>;

    async fn update_many(&self, filter: Document, update: Document) -> MgormResult<UpdateOutcome>;

    /// 删除单个文档，返回删除数量
    async fn delete_one(&self, filter: Document) -> MgormResult<u64>;

    async fn delete_many(&self, filter: Document) -> MgormResult<u64>;

    async fn find_one(&self, filter: Document) -> MgormResult<Option<Document>>;

    async fn find(&self, filter: Document, options: &FindOptions) -> MgormResult<DocumentStream>;

    async fn count(&self, filter: Document) -> MgormResult<u64>;

    async fn create_index(&self, index: &IndexSpec) -> MgormResult<()>;
}

/// 按 别名/数据库/集合 签出集合
///
/// 返回的集合持有本次操作的租约，释放集合即释放租约
#[async_trait]
pub trait CollectionSource: Send + Sync {
    async fn checkout(
        &self,
        alias: &str,
        database: &str,
        collection: &str,
    ) -> MgormResult<Box<dyn QueryableCollection>>;
}
