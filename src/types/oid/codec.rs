//! ObjectId 的三种外部编码
//!
//! - 文本（JSON）：十六进制字符串
//! - 自描述二进制（BSON）：原生 ObjectId
//! - 紧凑二进制映射（MessagePack）：十六进制字符串
//!
//! 所有接受外部文本的解码路径都经过 [`Oid::parse`]，
//! 因此三种格式接受/拒绝的输入集合完全一致

use mongodb::bson::{self, Bson, Document};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Oid;
use crate::error::{MgormError, MgormResult};

fn serialization_error(e: impl std::fmt::Display) -> MgormError {
    crate::mgorm_error!(serialization, e)
}

/// 编码为 JSON 字符串字面量（含引号）
pub fn encode_text(oid: &Oid) -> MgormResult<String> {
    serde_json::to_string(oid).map_err(serialization_error)
}

/// 从 JSON 字符串字面量解码
pub fn decode_text(json: &str) -> MgormResult<Oid> {
    let s: String = serde_json::from_str(json).map_err(serialization_error)?;
    Oid::parse(&s)
}

/// 编码为原生 BSON ObjectId
pub fn encode_bson(oid: &Oid) -> Bson {
    Bson::from(*oid)
}

/// 从 BSON 值解码，只接受原生 ObjectId
pub fn decode_bson(raw: &Bson) -> MgormResult<Oid> {
    match raw {
        Bson::ObjectId(oid) => Ok(Oid::from(*oid)),
        other => Err(crate::mgorm_error!(
            serialization,
            crate::i18n::tf("error.bson_not_object_id", &[("kind", &format!("{:?}", other.element_type()))])
        )),
    }
}

/// 编码为 MessagePack 字符串
pub fn encode_msgpack(oid: &Oid) -> MgormResult<Vec<u8>> {
    rmp_serde::to_vec(&oid.to_hex()).map_err(serialization_error)
}

/// 从 MessagePack 字符串解码
pub fn decode_msgpack(bytes: &[u8]) -> MgormResult<Oid> {
    let s: String = rmp_serde::from_slice(bytes).map_err(serialization_error)?;
    Oid::parse(&s)
}

/// 序列化为 BSON 文档，其中的 `Oid` 保持原生 ObjectId
///
/// 经由原始BSON编码器（非人类可读）
pub fn to_document<T: Serialize>(value: &T) -> MgormResult<Document> {
    bson::to_raw_document_buf(value)
        .map_err(serialization_error)?
        .to_document()
        .map_err(serialization_error)
}

/// 从 BSON 文档反序列化，原生 ObjectId 还原为 `Oid`
pub fn from_document<T: DeserializeOwned>(doc: Document) -> MgormResult<T> {
    let bytes = bson::to_vec(&doc).map_err(serialization_error)?;
    bson::from_slice(&bytes).map_err(serialization_error)
}

/// 序列化为 MessagePack（结构体写成映射，`Oid` 写成字符串）
pub fn to_msgpack<T: Serialize + ?Sized>(value: &T) -> MgormResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer = rmp_serde::Serializer::new(&mut buf)
        .with_struct_map()
        .with_human_readable();
    value.serialize(&mut serializer).map_err(serialization_error)?;
    Ok(buf)
}

/// 从 MessagePack 反序列化
pub fn from_msgpack<T: DeserializeOwned>(bytes: &[u8]) -> MgormResult<T> {
    let mut deserializer = rmp_serde::Deserializer::new(bytes).with_human_readable();
    T::deserialize(&mut deserializer).map_err(serialization_error)
}
