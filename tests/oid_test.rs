use mongodb::bson::{self, doc, Bson};
use serde::{Deserialize, Serialize};

use rat_mgorm::{codec, MgormError, Oid};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Holder {
    id: Oid,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Record {
    #[serde(rename = "_id")]
    id: Oid,
    owner: Oid,
    name: String,
}

fn record() -> Record {
    Record {
        id: Oid::new(),
        owner: Oid::parse("5a934e000102030405060708").unwrap(),
        name: "alice".to_string(),
    }
}

#[test]
fn test_parse_and_display_agree() {
    for _ in 0..16 {
        let oid = Oid::new();
        assert_eq!(Oid::parse(&oid.to_string()).unwrap(), oid);
    }
    let empty = Oid::parse("").unwrap();
    assert!(empty.is_nil());
    assert_eq!(empty.to_string(), "0".repeat(24));
}

#[test]
fn test_invalid_input_is_named_in_error() {
    for bad in ["xyz", "5a934e00010203040506070", "5a934e0001020304050607080", "5a934e00010203040506070g"] {
        let err = Oid::parse(bad).unwrap_err();
        assert!(matches!(err, MgormError::InvalidObjectId { .. }));
        assert!(err.to_string().contains(bad));
    }
}

#[test]
fn test_every_format_round_trips() {
    for oid in [Oid::nil(), Oid::new()] {
        let text = codec::encode_text(&oid).unwrap();
        assert_eq!(codec::decode_text(&text).unwrap(), oid);

        let raw = codec::encode_bson(&oid);
        assert!(matches!(raw, Bson::ObjectId(_)));
        assert_eq!(codec::decode_bson(&raw).unwrap(), oid);

        let packed = codec::encode_msgpack(&oid).unwrap();
        assert_eq!(codec::decode_msgpack(&packed).unwrap(), oid);
    }
}

#[test]
fn test_zero_value_in_text() {
    let text = codec::encode_text(&Oid::nil()).unwrap();
    assert_eq!(text, format!("\"{}\"", "0".repeat(24)));
    assert!(codec::decode_text("\"\"").unwrap().is_nil());
}

#[test]
fn test_malformed_input_rejected_alike() {
    let expected = Oid::parse("xyz").unwrap_err().to_string();

    let text = codec::decode_text("\"xyz\"").unwrap_err();
    assert_eq!(text.to_string(), expected);

    let packed = rmp_serde::to_vec("xyz").unwrap();
    let msgpack = codec::decode_msgpack(&packed).unwrap_err();
    assert_eq!(msgpack.to_string(), expected);

    let json = serde_json::from_str::<Holder>(r#"{"id":"xyz"}"#).unwrap_err();
    assert!(json.to_string().contains(&expected));

    let bson_doc: Result<Holder, _> = codec::from_document(doc! { "id": "xyz" });
    assert!(bson_doc.unwrap_err().to_string().contains("xyz"));
}

#[test]
fn test_text_formats_accept_only_strings() {
    let hex = "5a934e000102030405060708";

    let as_array = format!(r#"{{"id":["{}"]}}"#, hex);
    assert!(serde_json::from_str::<Holder>(&as_array).is_err());

    let as_extended = format!(r#"{{"id":{{"$oid":"{}"}}}}"#, hex);
    assert!(serde_json::from_str::<Holder>(&as_extended).is_err());

    let mut as_bin = vec![0xc4, 12];
    as_bin.extend_from_slice(&Oid::parse(hex).unwrap().bytes());
    assert!(codec::from_msgpack::<Oid>(&as_bin).is_err());

    let as_string = codec::encode_msgpack(&Oid::parse(hex).unwrap()).unwrap();
    assert_eq!(codec::from_msgpack::<Oid>(&as_string).unwrap().to_hex(), hex);
}

#[test]
fn test_json_embedding_is_plain_hex() {
    let holder = Holder { id: Oid::parse("5a934e000102030405060708").unwrap() };
    let json = serde_json::to_string(&holder).unwrap();
    assert_eq!(json, r#"{"id":"5a934e000102030405060708"}"#);
    assert_eq!(serde_json::from_str::<Holder>(&json).unwrap(), holder);
}

#[test]
fn test_bson_embedding_is_native_object_id() {
    let rec = record();
    let document = codec::to_document(&rec).unwrap();
    assert_eq!(document.get("_id"), Some(&Bson::ObjectId(rec.id.object_id())));
    assert_eq!(document.get("owner"), Some(&Bson::ObjectId(rec.owner.object_id())));

    let back: Record = codec::from_document(document).unwrap();
    assert_eq!(back, rec);

    let bytes = bson::to_vec(&rec).unwrap();
    let raw: Record = bson::from_slice(&bytes).unwrap();
    assert_eq!(raw, rec);
}

#[test]
fn test_msgpack_embedding_round_trips() {
    let rec = record();
    let bytes = codec::to_msgpack(&rec).unwrap();
    let back: Record = codec::from_msgpack(&bytes).unwrap();
    assert_eq!(back, rec);

    // 默认配置下同样可以往返
    let compact = rmp_serde::to_vec(&rec).unwrap();
    let back: Record = rmp_serde::from_slice(&compact).unwrap();
    assert_eq!(back, rec);
}
