use std::collections::BTreeMap;

/// MongoDB 连接串构建器
pub struct MongoUriBuilder {
    hosts: Vec<String>,
    database: Option<String>,
    username: Option<String>,
    password: Option<String>,
    auth_source: Option<String>,
    replica_set: Option<String>,
    direct_connection: bool,
    tls: bool,
    options: BTreeMap<String, String>,
}

impl MongoUriBuilder {
    /// 创建新的连接串构建器
    pub fn new<I, H>(hosts: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
            database: None,
            username: None,
            password: None,
            auth_source: None,
            replica_set: None,
            direct_connection: false,
            tls: false,
            options: BTreeMap::new(),
        }
    }

    /// 设置默认数据库
    pub fn with_database<D: Into<String>>(mut self, database: D) -> Self {
        self.database = Some(database.into());
        self
    }

    /// 设置用户名和密码
    pub fn with_auth<U: Into<String>, P: Into<String>>(mut self, username: U, password: P) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// 设置认证数据库
    pub fn with_auth_source<A: Into<String>>(mut self, auth_source: A) -> Self {
        self.auth_source = Some(auth_source.into());
        self
    }

    /// 设置副本集名称
    pub fn with_replica_set<R: Into<String>>(mut self, replica_set: R) -> Self {
        self.replica_set = Some(replica_set.into());
        self
    }

    /// 启用直接连接
    pub fn with_direct_connection(mut self, direct: bool) -> Self {
        self.direct_connection = direct;
        self
    }

    /// 启用TLS
    pub fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    /// 添加自定义选项
    pub fn with_option<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// 生成MongoDB连接URI
    pub fn build_uri(&self) -> String {
        self.render(false)
    }

    /// 生成用于日志的URI，密码以 `***` 代替
    pub fn build_redacted_uri(&self) -> String {
        self.render(true)
    }

    fn render(&self, redact: bool) -> String {
        let mut uri = String::from("mongodb://");

        // 添加认证信息
        if let Some(username) = &self.username {
            uri.push_str(&urlencoding::encode(username));
            if let Some(password) = &self.password {
                uri.push(':');
                if redact {
                    uri.push_str("***");
                } else {
                    uri.push_str(&urlencoding::encode(password));
                }
            }
            uri.push('@');
        }

        uri.push_str(&self.hosts.join(","));

        uri.push('/');
        if let Some(database) = &self.database {
            uri.push_str(database);
        }

        // 构建查询参数
        let mut params = Vec::new();

        if let Some(auth_source) = &self.auth_source {
            params.push(format!("authSource={}", urlencoding::encode(auth_source)));
        }

        if let Some(replica_set) = &self.replica_set {
            params.push(format!("replicaSet={}", urlencoding::encode(replica_set)));
        }

        if self.direct_connection {
            params.push("directConnection=true".to_string());
        }

        if self.tls {
            params.push("tls=true".to_string());
        }

        for (key, value) in &self.options {
            params.push(format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            ));
        }

        if !params.is_empty() {
            uri.push('?');
            uri.push_str(&params.join("&"));
        }

        uri
    }
}

/// 隐藏连接串中的密码部分，用于日志与错误信息
pub fn redact_uri(uri: &str) -> String {
    let Some(scheme_end) = uri.find("://") else {
        return uri.to_string();
    };
    let rest = &uri[scheme_end + 3..];
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let Some(at) = rest[..authority_end].rfind('@') else {
        return uri.to_string();
    };
    let credentials = &rest[..at];
    match credentials.find(':') {
        Some(colon) => format!(
            "{}{}:***{}",
            &uri[..scheme_end + 3],
            &credentials[..colon],
            &rest[at..]
        ),
        None => uri.to_string(),
    }
}
