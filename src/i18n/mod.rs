//! 多语言错误消息模块
//!
//! 使用rat_embed_lang框架提供统一的错误消息多语言支持

use std::collections::HashMap;
use once_cell::sync::OnceCell;
use rat_embed_lang::register_translations;

static REGISTERED: OnceCell<()> = OnceCell::new();

/// 错误消息翻译注册器
pub struct ErrorMessageI18n;

impl ErrorMessageI18n {
    fn entry(zh: &str, en: &str, ja: &str) -> HashMap<String, String> {
        let mut messages = HashMap::new();
        messages.insert("zh-CN".to_string(), zh.to_string());
        messages.insert("en-US".to_string(), en.to_string());
        messages.insert("ja-JP".to_string(), ja.to_string());
        messages
    }

    /// 注册所有错误消息翻译
    pub fn register_all_translations() {
        let mut translations = HashMap::new();

        translations.insert(
            "error.connection".to_string(),
            Self::entry(
                "数据库连接失败: {message}",
                "Database connection failed: {message}",
                "データベース接続に失敗しました: {message}",
            ),
        );

        translations.insert(
            "error.config".to_string(),
            Self::entry(
                "配置错误: {message}",
                "Configuration error: {message}",
                "設定エラー: {message}",
            ),
        );

        translations.insert(
            "error.serialization".to_string(),
            Self::entry(
                "数据序列化失败: {message}",
                "Data serialization failed: {message}",
                "データシリアライズが失敗しました: {message}",
            ),
        );

        translations.insert(
            "error.alias_not_found".to_string(),
            Self::entry(
                "数据库别名 '{alias}' 未找到",
                "Database alias '{alias}' not found",
                "データベースエイリアス '{alias}' が見つかりません",
            ),
        );

        translations.insert(
            "error.missing_aliases".to_string(),
            Self::entry(
                "以下数据库别名未注册: {aliases}",
                "Database aliases not registered: {aliases}",
                "未登録のデータベースエイリアス: {aliases}",
            ),
        );

        translations.insert(
            "error.options_uri_and_hosts".to_string(),
            Self::entry(
                "uri 与 hosts 不能同时设置",
                "uri and hosts cannot both be set",
                "uri と hosts を同時に設定することはできません",
            ),
        );

        translations.insert(
            "error.options_no_address".to_string(),
            Self::entry(
                "必须设置 uri 或 hosts 之一",
                "either uri or hosts must be set",
                "uri または hosts のいずれかを設定する必要があります",
            ),
        );

        translations.insert(
            "error.config_parse".to_string(),
            Self::entry(
                "解析配置文件失败: {message}",
                "Failed to parse configuration: {message}",
                "設定の解析に失敗しました: {message}",
            ),
        );

        translations.insert(
            "error.config_serialize".to_string(),
            Self::entry(
                "序列化配置失败: {message}",
                "Failed to serialize configuration: {message}",
                "設定のシリアライズに失敗しました: {message}",
            ),
        );

        translations.insert(
            "error.bson_not_object_id".to_string(),
            Self::entry(
                "BSON值不是ObjectId: {kind}",
                "BSON value is not an ObjectId: {kind}",
                "BSON値はObjectIdではありません: {kind}",
            ),
        );

        // 注册所有翻译
        register_translations(translations);
    }

    /// 初始化错误消息多语言支持，重复调用只注册一次
    pub fn init() {
        REGISTERED.get_or_init(|| {
            Self::register_all_translations();

            // 从环境变量获取语言设置，默认为zh-CN
            let lang = std::env::var("RAT_LANG")
                .or_else(|_| std::env::var("LANG"))
                .unwrap_or_else(|_| "zh-CN".to_string());

            use rat_embed_lang::normalize_language_code;
            let normalized_lang = normalize_language_code(&lang);
            set_language(&normalized_lang);
        });
    }
}

/// 重新导出rat_embed_lang的语言设置函数
pub use rat_embed_lang::{set_language, current_language};

/// 获取翻译文本，翻译表在首次调用时注册
pub fn t(key: &str) -> String {
    ErrorMessageI18n::init();
    rat_embed_lang::t(key)
}

/// 获取带参数的翻译文本，翻译表在首次调用时注册
pub fn tf(key: &str, args: &[(&str, &str)]) -> String {
    ErrorMessageI18n::init();
    rat_embed_lang::tf(key, args)
}
