//! ObjectId 值类型
//!
//! `Oid` 包装 12 字节的 MongoDB ObjectId，对外规范表示为 24 位小写十六进制字符串。
//! 空字符串解析为全零值，用来表示“未设置”。
//!
//! 序列化规则：
//! - 人类可读格式（JSON）写出十六进制字符串
//! - 非人类可读格式（原始BSON、驱动写入路径）写出原生 ObjectId
//! - 人类可读格式只从十六进制字符串反序列化；非人类可读格式另外接受
//!   12字节、`{"$oid": ...}` 以及单元素序列
//! - 所有文本输入都经过 [`Oid::parse`] 校验

pub mod codec;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::Bson;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{MgormError, MgormResult};

/// 十六进制文本长度
pub const OID_HEX_LEN: usize = 24;

/// 适用于 JSON / BSON / MessagePack 的 ObjectId
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Oid([u8; 12]);

impl Oid {
    /// 生成新的 ObjectId
    pub fn new() -> Self {
        Self(ObjectId::new().bytes())
    }

    /// 全零值
    pub const fn nil() -> Self {
        Self([0u8; 12])
    }

    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub const fn bytes(&self) -> [u8; 12] {
        self.0
    }

    pub fn is_nil(&self) -> bool {
        self.0 == [0u8; 12]
    }

    /// 从字符串解析
    ///
    /// 空字符串返回全零值；其余输入必须恰好是 24 位十六进制字符，
    /// 否则返回携带原始输入的 [`MgormError::InvalidObjectId`]
    pub fn parse(s: &str) -> MgormResult<Self> {
        if s.is_empty() {
            return Ok(Self::nil());
        }
        if !is_object_id_hex(s) {
            return Err(MgormError::InvalidObjectId { input: s.to_string() });
        }
        ObjectId::parse_str(s)
            .map(Self::from)
            .map_err(|_| MgormError::InvalidObjectId { input: s.to_string() })
    }

    /// 24 位小写十六进制表示
    pub fn to_hex(&self) -> String {
        ObjectId::from_bytes(self.0).to_hex()
    }

    /// 对应的驱动 ObjectId
    pub fn object_id(&self) -> ObjectId {
        ObjectId::from_bytes(self.0)
    }

    /// 前 4 字节记录的生成时间（秒精度）
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let secs = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        Utc.timestamp_opt(i64::from(secs), 0).single()
    }
}

/// 是否为 24 位十六进制字符串
pub fn is_object_id_hex(s: &str) -> bool {
    s.len() == OID_HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid(\"{}\")", self.to_hex())
    }
}

impl FromStr for Oid {
    type Err = MgormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Oid {
    type Error = MgormError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<ObjectId> for Oid {
    fn from(oid: ObjectId) -> Self {
        Self(oid.bytes())
    }
}

impl From<Oid> for ObjectId {
    fn from(oid: Oid) -> Self {
        ObjectId::from_bytes(oid.0)
    }
}

impl From<Oid> for Bson {
    fn from(oid: Oid) -> Self {
        Bson::ObjectId(oid.object_id())
    }
}

impl Serialize for Oid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.object_id().serialize(serializer)
        }
    }
}

/// 人类可读格式（JSON、MessagePack 字符串）只接受十六进制字符串
struct HexVisitor;

impl<'de> Visitor<'de> for HexVisitor {
    type Value = Oid;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object id as a 24-character hex string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Oid, E>
    where
        E: de::Error,
    {
        Oid::parse(v).map_err(E::custom)
    }
}

/// 二进制格式（原始BSON）中的原生 ObjectId
struct OidVisitor;

impl<'de> Visitor<'de> for OidVisitor {
    type Value = Oid;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object id as a 24-character hex string, 12 bytes or {\"$oid\": ...}")
    }

    fn visit_str<E>(self, v: &str) -> Result<Oid, E>
    where
        E: de::Error,
    {
        Oid::parse(v).map_err(E::custom)
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<Oid, E>
    where
        E: de::Error,
    {
        let bytes: [u8; 12] = v
            .try_into()
            .map_err(|_| E::invalid_length(v.len(), &"12 bytes"))?;
        Ok(Oid(bytes))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Oid, A::Error>
    where
        A: MapAccess<'de>,
    {
        let key: String = map
            .next_key()?
            .ok_or_else(|| de::Error::missing_field("$oid"))?;
        if key != "$oid" {
            return Err(de::Error::unknown_field(&key, &["$oid"]));
        }
        let hex: String = map.next_value()?;
        Oid::parse(&hex).map_err(de::Error::custom)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Oid, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let hex: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        Oid::parse(&hex).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Oid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            deserializer.deserialize_str(HexVisitor)
        } else {
            deserializer.deserialize_any(OidVisitor)
        }
    }
}
