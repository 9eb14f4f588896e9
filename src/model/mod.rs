//! 模型模块
//!
//! `Model` 绑定 别名/数据库/集合，每次调用签出一次集合、执行一个操作并释放。
//! 所有错误都带上集合名与操作名

mod cursor;

pub use cursor::ModelCursor;

use std::fmt;
use std::sync::Arc;

use mongodb::bson::{doc, Bson, Document};
use rat_logger::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::collection::{CollectionSource, QueryableCollection};
use crate::error::{MgormError, MgormResult};
use crate::types::oid::codec;
use crate::types::{FindOptions, IndexSpec, UpdateOptions};

/// 集合模型
#[derive(Clone)]
pub struct Model {
    source: Arc<dyn CollectionSource>,
    alias: String,
    db_name: String,
    collection_name: String,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("alias", &self.alias)
            .field("db_name", &self.db_name)
            .field("collection_name", &self.collection_name)
            .finish()
    }
}

impl Model {
    /// 创建模型
    ///
    /// # 参数
    ///
    /// * `source` - 集合来源，通常是 `Arc<SessionRegistry>`
    /// * `alias` - 数据库别名
    /// * `db_name` - 数据库名，为空时使用别名的默认数据库
    /// * `collection_name` - 集合名
    pub fn new<A, D, C>(source: Arc<dyn CollectionSource>, alias: A, db_name: D, collection_name: C) -> Self
    where
        A: Into<String>,
        D: Into<String>,
        C: Into<String>,
    {
        Self {
            source,
            alias: alias.into(),
            db_name: db_name.into(),
            collection_name: collection_name.into(),
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    fn wrap(&self, action: &'static str) -> impl FnOnce(MgormError) -> MgormError + '_ {
        move |e| {
            debug!("模型操作失败: 集合={}, 操作={}, 错误={}", self.collection_name, action, e);
            e.with_context(&self.collection_name, action)
        }
    }

    /// 签出本模型的集合，集合被释放时租约随之释放
    pub async fn collection(&self) -> MgormResult<Box<dyn QueryableCollection>> {
        self.source
            .checkout(&self.alias, &self.db_name, &self.collection_name)
            .await
    }

    /// 创建索引
    pub async fn create_index(&self, index: IndexSpec) -> MgormResult<()> {
        let c = self.collection().await.map_err(self.wrap("create_index"))?;
        c.create_index(&index).await.map_err(self.wrap("create_index"))
    }

    /// 插入多个文档
    pub async fn insert<T: Serialize>(&self, docs: &[T]) -> MgormResult<()> {
        if docs.is_empty() {
            return Ok(());
        }
        let documents = docs
            .iter()
            .map(|d| codec::to_document(d))
            .collect::<MgormResult<Vec<Document>>>()
            .map_err(self.wrap("insert"))?;

        let c = self.collection().await.map_err(self.wrap("insert"))?;
        c.insert_many(documents).await.map_err(self.wrap("insert"))
    }

    /// 插入单个文档
    pub async fn insert_one<T: Serialize>(&self, doc: &T) -> MgormResult<()> {
        self.insert(std::slice::from_ref(doc)).await
    }

    /// 更新匹配的单个文档
    ///
    /// 未启用 upsert 且没有匹配文档时返回 [`MgormError::NotFound`]
    pub async fn update(&self, selector: Document, update: Document, opts: UpdateOptions) -> MgormResult<()> {
        let c = self.collection().await.map_err(self.wrap("update"))?;
        let outcome = c
            .update_one(selector, update, opts.upsert)
            .await
            .map_err(self.wrap("update"))?;

        if !opts.upsert && outcome.matched == 0 {
            return Err(self.wrap("update")(MgormError::NotFound));
        }
        Ok(())
    }

    /// 按 `_id` 更新
    pub async fn update_id<I: Into<Bson>>(&self, id: I, update: Document, opts: UpdateOptions) -> MgormResult<()> {
        self.update(doc! { "_id": id.into() }, update, opts).await
    }

    /// 更新所有匹配文档，返回修改数量
    pub async fn update_all(&self, selector: Document, update: Document) -> MgormResult<u64> {
        let c = self.collection().await.map_err(self.wrap("update_all"))?;
        c.update_many(selector, update)
            .await
            .map(|outcome| outcome.modified)
            .map_err(self.wrap("update_all"))
    }

    /// 删除匹配的单个文档，没有匹配时返回 [`MgormError::NotFound`]
    pub async fn delete(&self, selector: Document) -> MgormResult<()> {
        let c = self.collection().await.map_err(self.wrap("delete"))?;
        let deleted = c.delete_one(selector).await.map_err(self.wrap("delete"))?;
        if deleted == 0 {
            return Err(self.wrap("delete")(MgormError::NotFound));
        }
        Ok(())
    }

    /// 按 `_id` 删除
    pub async fn delete_id<I: Into<Bson>>(&self, id: I) -> MgormResult<()> {
        self.delete(doc! { "_id": id.into() }).await
    }

    /// 删除所有匹配文档，返回删除数量
    pub async fn delete_all(&self, selector: Document) -> MgormResult<u64> {
        let c = self.collection().await.map_err(self.wrap("delete_all"))?;
        c.delete_many(selector).await.map_err(self.wrap("delete_all"))
    }

    /// 查找单个文档，没有匹配时返回 [`MgormError::NotFound`]
    pub async fn find_one<T: DeserializeOwned>(&self, selector: Document) -> MgormResult<T> {
        let c = self.collection().await.map_err(self.wrap("find_one"))?;
        let found = c.find_one(selector).await.map_err(self.wrap("find_one"))?;
        match found {
            Some(doc) => codec::from_document(doc).map_err(self.wrap("find_one")),
            None => Err(self.wrap("find_one")(MgormError::NotFound)),
        }
    }

    /// 查找所有匹配文档
    pub async fn find_all<T: DeserializeOwned>(&self, selector: Document, opts: FindOptions) -> MgormResult<Vec<T>> {
        let c = self.collection().await.map_err(self.wrap("find_all"))?;
        let stream = c.find(selector, &opts).await.map_err(self.wrap("find_all"))?;
        let mut cursor = ModelCursor::new(c, stream);
        let result = cursor.collect_all().await.map_err(|e| self.wrap("find_all")(e.into_root()));
        cursor.close();
        result
    }

    /// 按 `_id` 查找
    pub async fn find_id<T: DeserializeOwned, I: Into<Bson>>(&self, id: I) -> MgormResult<T> {
        self.find_one(doc! { "_id": id.into() }).await
    }

    /// 统计匹配文档数
    pub async fn count(&self, selector: Document) -> MgormResult<u64> {
        let c = self.collection().await.map_err(self.wrap("count"))?;
        c.count(selector).await.map_err(self.wrap("count"))
    }

    /// 创建游标，游标关闭或释放前一直持有租约
    pub async fn iter(&self, selector: Document, opts: FindOptions) -> MgormResult<ModelCursor> {
        let c = self.collection().await.map_err(self.wrap("iter"))?;
        let stream = c.find(selector, &opts).await.map_err(self.wrap("iter"))?;
        Ok(ModelCursor::new(c, stream))
    }
}
