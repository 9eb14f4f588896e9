use futures::TryStreamExt;
use mongodb::bson::Document;
use rat_logger::debug;
use serde::de::DeserializeOwned;

use crate::collection::{DocumentStream, QueryableCollection};
use crate::error::MgormResult;
use crate::types::oid::codec;

/// 模型游标
///
/// 持有签出的集合（以及其中的租约），关闭或释放游标时一并释放
pub struct ModelCursor {
    stream: DocumentStream,
    collection: Box<dyn QueryableCollection>,
}

impl ModelCursor {
    pub(crate) fn new(collection: Box<dyn QueryableCollection>, stream: DocumentStream) -> Self {
        Self { stream, collection }
    }

    /// 下一个原始文档
    pub async fn next_document(&mut self) -> MgormResult<Option<Document>> {
        self.stream
            .try_next()
            .await
            .map_err(|e| e.with_context(self.collection.name(), "iter"))
    }

    /// 下一个文档并反序列化
    pub async fn next<T: DeserializeOwned>(&mut self) -> MgormResult<Option<T>> {
        match self.next_document().await? {
            Some(doc) => codec::from_document(doc)
                .map(Some)
                .map_err(|e| e.with_context(self.collection.name(), "iter")),
            None => Ok(None),
        }
    }

    /// 读取剩余的全部文档
    pub async fn collect_all<T: DeserializeOwned>(&mut self) -> MgormResult<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// 关闭游标并释放租约
    pub fn close(self) {
        debug!("关闭游标: 集合={}", self.collection.name());
    }
}
