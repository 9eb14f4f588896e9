pub mod oid;
pub mod connection_options;
pub mod mongo_builder;
pub mod query_options;

pub use oid::{Oid, is_object_id_hex, OID_HEX_LEN};
pub use connection_options::ConnectionOptions;
pub use mongo_builder::{MongoUriBuilder, redact_uri};
pub use query_options::{FindOptions, UpdateOptions, IndexSpec, key_document};
