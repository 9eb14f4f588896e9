//! MongoDB驱动绑定

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use ::mongodb::bson::Document;
use ::mongodb::error::{Error as DriverError, ErrorKind, WriteFailure};
use ::mongodb::options::{
    FindOptions as DriverFindOptions, IndexOptions, ReplaceOptions,
    UpdateOptions as DriverUpdateOptions,
};
use ::mongodb::results::UpdateResult;
use ::mongodb::{Collection, IndexModel};
use rat_logger::debug;

use super::{is_operator_update, CollectionSource, DocumentStream, QueryableCollection, UpdateOutcome};
use crate::error::{classify_message, ErrorClass, MgormError, MgormResult, DUPLICATE_KEY_CODES};
use crate::registry::{SessionLease, SessionRegistry};
use crate::types::{FindOptions, IndexSpec};

/// 基于驱动集合的实现，持有本次操作的租约
pub struct MongoCollection {
    name: String,
    inner: Collection<Document>,
    lease: SessionLease,
}

impl MongoCollection {
    pub fn new(lease: SessionLease, database: &str, collection: &str) -> Self {
        let inner = lease.collection::<Document>(database, collection);
        Self {
            name: collection.to_string(),
            inner,
            lease,
        }
    }

    /// 驱动原始集合
    pub fn inner(&self) -> &Collection<Document> {
        &self.inner
    }

    pub fn lease(&self) -> &SessionLease {
        &self.lease
    }
}

/// 驱动错误的结构化错误码
fn error_code(err: &DriverError) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => Some(e.code),
        ErrorKind::Write(WriteFailure::WriteConcernError(e)) => Some(e.code),
        ErrorKind::BulkWrite(failure) => failure
            .write_errors
            .as_ref()
            .and_then(|errors| errors.first())
            .map(|e| e.code),
        ErrorKind::Command(e) => Some(e.code),
        _ => None,
    }
}

/// 将驱动错误转换为 `MgormError`，重复键优先按错误码识别
pub(crate) fn driver_error(err: DriverError) -> MgormError {
    let code = error_code(&err);
    let message = err.to_string();
    let duplicate = code.is_some_and(|c| DUPLICATE_KEY_CODES.contains(&c))
        || classify_message(&message) == ErrorClass::Duplicate;

    if duplicate {
        MgormError::DuplicateKey {
            code: code.unwrap_or(DUPLICATE_KEY_CODES[0]),
            message,
        }
    } else {
        MgormError::DriverError { code, message }
    }
}

fn outcome(result: UpdateResult) -> UpdateOutcome {
    UpdateOutcome {
        matched: result.matched_count,
        modified: result.modified_count,
        upserted_id: result.upserted_id,
    }
}

#[async_trait]
impl QueryableCollection for MongoCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert_many(&self, docs: Vec<Document>) -> MgormResult<()> {
        self.inner.insert_many(docs, None).await.map_err(driver_error)?;
        Ok(())
    }

    async fn update_one(
        &self,
        filter: Document,
        update: Document,
        upsert: bool,
    ) -> MgormResult<UpdateOutcome> {
        let result = if is_operator_update(&update) {
            let mut options = DriverUpdateOptions::default();
            options.upsert = Some(upsert);
            self.inner.update_one(filter, update, options).await
        } else {
            let mut options = ReplaceOptions::default();
            options.upsert = Some(upsert);
            self.inner.replace_one(filter, update, options).await
        };
        result.map(outcome).map_err(driver_error)
    }

    async fn update_many(&self, filter: Document, update: Document) -> MgormResult<UpdateOutcome> {
        self.inner
            .update_many(filter, update, None)
            .await
            .map(outcome)
            .map_err(driver_error)
    }

    async fn delete_one(&self, filter: Document) -> MgormResult<u64> {
        self.inner
            .delete_one(filter, None)
            .await
            .map(|r| r.deleted_count)
            .map_err(driver_error)
    }

    async fn delete_many(&self, filter: Document) -> MgormResult<u64> {
        self.inner
            .delete_many(filter, None)
            .await
            .map(|r| r.deleted_count)
            .map_err(driver_error)
    }

    async fn find_one(&self, filter: Document) -> MgormResult<Option<Document>> {
        self.inner.find_one(filter, None).await.map_err(driver_error)
    }

    async fn find(&self, filter: Document, options: &FindOptions) -> MgormResult<DocumentStream> {
        let mut find_options = DriverFindOptions::default();
        if options.skip > 0 {
            find_options.skip = Some(options.skip);
        }
        if options.limit > 0 {
            find_options.limit = Some(options.limit);
        }
        find_options.sort = options.sort_document();

        let cursor = self
            .inner
            .find(filter, find_options)
            .await
            .map_err(driver_error)?;
        Ok(cursor.map_err(driver_error).boxed())
    }

    async fn count(&self, filter: Document) -> MgormResult<u64> {
        self.inner
            .count_documents(filter, None)
            .await
            .map_err(driver_error)
    }

    async fn create_index(&self, index: &IndexSpec) -> MgormResult<()> {
        let mut options = IndexOptions::default();
        options.unique = index.unique.then_some(true);
        options.sparse = index.sparse.then_some(true);
        options.background = index.background.then_some(true);
        options.name = index.name.clone();
        options.expire_after = index.expire_after;

        let mut model = IndexModel::default();
        model.keys = index.key_document();
        model.options = Some(options);

        debug!("创建索引: 集合={}, 键={:?}", self.name, index.keys);
        self.inner.create_index(model, None).await.map_err(driver_error)?;
        Ok(())
    }
}

#[async_trait]
impl CollectionSource for SessionRegistry {
    /// 数据库名为空时使用连接选项中的默认数据库
    async fn checkout(
        &self,
        alias: &str,
        database: &str,
        collection: &str,
    ) -> MgormResult<Box<dyn QueryableCollection>> {
        let lease = self.lease(alias).await?;
        let database = if database.is_empty() {
            match lease.default_database() {
                Some(db) => db.name().to_string(),
                None => {
                    return Err(crate::mgorm_error!(
                        config,
                        format!("别名 '{}' 没有默认数据库，必须指定数据库名", alias)
                    ));
                }
            }
        } else {
            database.to_string()
        };
        Ok(Box::new(MongoCollection::new(lease, &database, collection)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_fallback_marks_duplicate() {
        let io = std::io::Error::new(
            std::io::ErrorKind::Other,
            "E11000 duplicate key error collection: test.foo index: _id_",
        );
        let err = driver_error(DriverError::from(io));
        assert!(matches!(err, MgormError::DuplicateKey { code: 11000, .. }));

        let io = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
        assert!(matches!(driver_error(DriverError::from(io)), MgormError::DriverError { code: None, .. }));
    }
}
