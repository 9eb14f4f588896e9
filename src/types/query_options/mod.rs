//! 查询、更新与索引选项
//!
//! 排序键与索引键沿用 `"-field"` 表示降序的写法

use std::time::Duration;

use mongodb::bson::Document;

/// 查询选项，零值表示不应用
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// 跳过的文档数
    pub skip: u64,
    /// 返回的最大文档数
    pub limit: i64,
    /// 排序字段，`-` 前缀为降序
    pub sort: Vec<String>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置跳过数量
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    /// 设置返回数量上限
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// 追加排序字段
    pub fn sort<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort.extend(fields.into_iter().map(Into::into));
        self
    }

    /// 排序文档，没有排序字段时为 None
    pub fn sort_document(&self) -> Option<Document> {
        if self.sort.is_empty() {
            None
        } else {
            Some(key_document(&self.sort))
        }
    }
}

/// 更新选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// 不存在时插入
    pub upsert: bool,
}

impl UpdateOptions {
    /// 启用 upsert 的选项
    pub fn upsert() -> Self {
        Self { upsert: true }
    }
}

/// 索引定义
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSpec {
    /// 索引字段，`-` 前缀为降序
    pub keys: Vec<String>,
    pub unique: bool,
    pub sparse: bool,
    pub background: bool,
    pub name: Option<String>,
    /// TTL
    pub expire_after: Option<Duration>,
}

impl IndexSpec {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn sparse(mut self) -> Self {
        self.sparse = true;
        self
    }

    pub fn background(mut self) -> Self {
        self.background = true;
        self
    }

    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn expire_after(mut self, ttl: Duration) -> Self {
        self.expire_after = Some(ttl);
        self
    }

    /// 索引键文档
    pub fn key_document(&self) -> Document {
        key_document(&self.keys)
    }
}

/// 将 `["a", "-b"]` 转换为 `{a: 1, b: -1}`，保持字段顺序
pub fn key_document(fields: &[String]) -> Document {
    let mut doc = Document::new();
    for field in fields {
        match field.strip_prefix('-') {
            Some(name) => doc.insert(name, -1),
            None => doc.insert(field.trim_start_matches('+'), 1),
        };
    }
    doc
}
