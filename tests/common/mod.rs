//! 测试用内存集合
//!
//! 只支持顶层字段相等过滤、`$set` / `$inc` 更新与多字段排序

#![allow(dead_code)]

use std::cmp::Ordering as CmpOrdering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::StreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};

use rat_mgorm::{
    is_operator_update, CollectionSource, DocumentStream, FindOptions, IndexSpec, MgormError,
    MgormResult, QueryableCollection, UpdateOutcome,
};

#[derive(Default)]
pub struct MemoryState {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    indexes: Mutex<HashMap<String, Vec<IndexSpec>>>,
    active: AtomicUsize,
    checkouts: AtomicUsize,
}

impl MemoryState {
    pub fn documents(&self, key: &str) -> Vec<Document> {
        self.collections.lock().unwrap().get(key).cloned().unwrap_or_default()
    }

    pub fn indexes(&self, key: &str) -> Vec<IndexSpec> {
        self.indexes.lock().unwrap().get(key).cloned().unwrap_or_default()
    }

    /// 当前未释放的签出数
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// 累计签出次数
    pub fn checkouts(&self) -> usize {
        self.checkouts.load(Ordering::SeqCst)
    }
}

pub struct MemorySource {
    pub state: Arc<MemoryState>,
    aliases: HashSet<String>,
}

impl MemorySource {
    pub fn new(aliases: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            state: Arc::new(MemoryState::default()),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        })
    }
}

#[async_trait]
impl CollectionSource for MemorySource {
    async fn checkout(
        &self,
        alias: &str,
        database: &str,
        collection: &str,
    ) -> MgormResult<Box<dyn QueryableCollection>> {
        if !self.aliases.contains(alias) {
            return Err(MgormError::AliasNotFound { alias: alias.to_string() });
        }
        self.state.active.fetch_add(1, Ordering::SeqCst);
        self.state.checkouts.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryCollection {
            name: collection.to_string(),
            key: format!("{}.{}", database, collection),
            state: self.state.clone(),
        }))
    }
}

pub struct MemoryCollection {
    name: String,
    key: String,
    state: Arc<MemoryState>,
}

impl Drop for MemoryCollection {
    fn drop(&mut self) {
        self.state.active.fetch_sub(1, Ordering::SeqCst);
    }
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(k, v)| doc.get(k) == Some(v))
}

fn compare(a: Option<&Bson>, b: Option<&Bson>) -> CmpOrdering {
    match (a, b) {
        (Some(Bson::Int32(x)), Some(Bson::Int32(y))) => x.cmp(y),
        (Some(Bson::Int64(x)), Some(Bson::Int64(y))) => x.cmp(y),
        (Some(Bson::Double(x)), Some(Bson::Double(y))) => x.partial_cmp(y).unwrap_or(CmpOrdering::Equal),
        (Some(Bson::String(x)), Some(Bson::String(y))) => x.cmp(y),
        (None, Some(_)) => CmpOrdering::Less,
        (Some(_), None) => CmpOrdering::Greater,
        _ => CmpOrdering::Equal,
    }
}

fn apply_update(doc: &mut Document, update: &Document) {
    if is_operator_update(update) {
        if let Ok(set) = update.get_document("$set") {
            for (k, v) in set {
                doc.insert(k.clone(), v.clone());
            }
        }
        if let Ok(inc) = update.get_document("$inc") {
            for (k, v) in inc {
                let next = match (doc.get(k), v) {
                    (Some(Bson::Int32(a)), Bson::Int32(b)) => Bson::Int32(a + b),
                    (Some(Bson::Int64(a)), Bson::Int64(b)) => Bson::Int64(a + b),
                    (None, other) => other.clone(),
                    (Some(current), _) => current.clone(),
                };
                doc.insert(k.clone(), next);
            }
        }
    } else {
        let id = doc.get("_id").cloned();
        *doc = update.clone();
        if let Some(id) = id {
            doc.insert("_id", id);
        }
    }
}

fn duplicate(key: &str, id: &Bson) -> MgormError {
    MgormError::DuplicateKey {
        code: 11000,
        message: format!("E11000 duplicate key error collection: {} index: _id_ dup key: {}", key, id),
    }
}

#[async_trait]
impl QueryableCollection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert_many(&self, docs: Vec<Document>) -> MgormResult<()> {
        let mut collections = self.state.collections.lock().unwrap();
        let stored = collections.entry(self.key.clone()).or_default();
        for mut doc in docs {
            if !doc.contains_key("_id") {
                doc.insert("_id", ObjectId::new());
            }
            let id = doc.get("_id").cloned().unwrap_or(Bson::Null);
            if stored.iter().any(|d| d.get("_id") == Some(&id)) {
                return Err(duplicate(&self.key, &id));
            }
            stored.push(doc);
        }
        Ok(())
    }

    async fn update_one(&self, filter: Document, update: Document, upsert: bool) -> MgormResult<UpdateOutcome> {
        let mut collections = self.state.collections.lock().unwrap();
        let stored = collections.entry(self.key.clone()).or_default();
        if let Some(doc) = stored.iter_mut().find(|d| matches(d, &filter)) {
            apply_update(doc, &update);
            return Ok(UpdateOutcome { matched: 1, modified: 1, upserted_id: None });
        }
        if !upsert {
            return Ok(UpdateOutcome::default());
        }

        let mut doc = if is_operator_update(&update) {
            let mut base = filter.clone();
            apply_update(&mut base, &update);
            base
        } else {
            update.clone()
        };
        if !doc.contains_key("_id") {
            doc.insert("_id", ObjectId::new());
        }
        let upserted_id = doc.get("_id").cloned();
        stored.push(doc);
        Ok(UpdateOutcome { matched: 0, modified: 0, upserted_id })
    }

    async fn update_many(&self, filter: Document, update: Document) -> MgormResult<UpdateOutcome> {
        let mut collections = self.state.collections.lock().unwrap();
        let stored = collections.entry(self.key.clone()).or_default();
        let mut matched = 0;
        for doc in stored.iter_mut().filter(|d| matches(d, &filter)) {
            apply_update(doc, &update);
            matched += 1;
        }
        Ok(UpdateOutcome { matched, modified: matched, upserted_id: None })
    }

    async fn delete_one(&self, filter: Document) -> MgormResult<u64> {
        let mut collections = self.state.collections.lock().unwrap();
        let stored = collections.entry(self.key.clone()).or_default();
        match stored.iter().position(|d| matches(d, &filter)) {
            Some(index) => {
                stored.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_many(&self, filter: Document) -> MgormResult<u64> {
        let mut collections = self.state.collections.lock().unwrap();
        let stored = collections.entry(self.key.clone()).or_default();
        let before = stored.len();
        stored.retain(|d| !matches(d, &filter));
        Ok((before - stored.len()) as u64)
    }

    async fn find_one(&self, filter: Document) -> MgormResult<Option<Document>> {
        let collections = self.state.collections.lock().unwrap();
        Ok(collections
            .get(&self.key)
            .and_then(|docs| docs.iter().find(|d| matches(d, &filter)).cloned()))
    }

    async fn find(&self, filter: Document, options: &FindOptions) -> MgormResult<DocumentStream> {
        let mut docs: Vec<Document> = {
            let collections = self.state.collections.lock().unwrap();
            collections
                .get(&self.key)
                .map(|docs| docs.iter().filter(|d| matches(d, &filter)).cloned().collect())
                .unwrap_or_default()
        };

        if let Some(sort) = options.sort_document() {
            docs.sort_by(|a, b| {
                for (field, direction) in &sort {
                    let ord = compare(a.get(field), b.get(field));
                    let ord = if direction == &Bson::Int32(-1) { ord.reverse() } else { ord };
                    if ord != CmpOrdering::Equal {
                        return ord;
                    }
                }
                CmpOrdering::Equal
            });
        }

        let mut iter: Box<dyn Iterator<Item = Document> + Send> =
            Box::new(docs.into_iter().skip(options.skip as usize));
        if options.limit > 0 {
            iter = Box::new(iter.take(options.limit as usize));
        }
        let items: Vec<MgormResult<Document>> = iter.map(Ok).collect();
        Ok(futures::stream::iter(items).boxed())
    }

    async fn count(&self, filter: Document) -> MgormResult<u64> {
        let collections = self.state.collections.lock().unwrap();
        Ok(collections
            .get(&self.key)
            .map(|docs| docs.iter().filter(|d| matches(d, &filter)).count() as u64)
            .unwrap_or(0))
    }

    async fn create_index(&self, index: &IndexSpec) -> MgormResult<()> {
        self.state
            .indexes
            .lock()
            .unwrap()
            .entry(self.key.clone())
            .or_default()
            .push(index.clone());
        Ok(())
    }
}
