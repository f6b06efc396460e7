//! Byte-level encoding of the [`Document`].
//!
//! The document is pretty-printed JSON so the file on disk stays readable and diffs
//! cleanly. Encoding always goes to an in-memory buffer; the store only touches the
//! disk once a buffer exists.

use crate::db::Document;
use crate::errors::{StoreError, StoreResult};

pub fn encode(doc: &Document) -> StoreResult<Vec<u8>> {
    serde_json::to_vec_pretty(doc).map_err(StoreError::Encode)
}

/// Malformed or truncated input is rejected as a whole; nothing is salvaged.
pub fn decode(bytes: &[u8]) -> StoreResult<Document> {
    serde_json::from_slice(bytes).map_err(StoreError::CorruptDocument)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::RevocationRecord;
    use crate::models::{Post, User};
    use chrono::{TimeZone, Utc};

    fn sample() -> Document {
        let mut doc = Document::default();
        doc.users.insert(
            1,
            User {
                id: 1,
                email: "a@x.com".into(),
                hashed_password: "$2b$04$abcdefghijklmnopqrstuv".into(),
                is_promoted: true,
            },
        );
        doc.posts.insert(
            1,
            Post {
                id: 1,
                body: "hello world".into(),
                author_id: 1,
            },
        );
        doc.revoked_tokens.insert(
            "tok".into(),
            RevocationRecord {
                token: "tok".into(),
                revoked_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            },
        );
        doc
    }

    #[test]
    fn round_trips_empty_and_populated_documents() {
        for doc in [Document::default(), sample()] {
            let bytes = encode(&doc).unwrap();
            assert_eq!(decode(&bytes).unwrap(), doc);
        }
    }

    #[test]
    fn uses_chirpy_file_layout() {
        let value: serde_json::Value = serde_json::from_slice(&encode(&sample()).unwrap()).unwrap();

        assert_eq!(value["chirps"]["1"]["author_id"], 1);
        assert_eq!(value["users"]["1"]["is_chirpy_red"], true);
        assert!(value["users"]["1"]["password"].is_string());
        assert_eq!(value["revokedTokens"]["tok"]["token"], "tok");
    }

    #[test]
    fn missing_maps_decode_as_empty() {
        let doc = decode(br#"{"users": {}}"#).unwrap();
        assert_eq!(doc, Document::default());
    }

    #[test]
    fn rejects_truncated_input() {
        let bytes = encode(&sample()).unwrap();
        let err = decode(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, StoreError::CorruptDocument(_)));
    }

    #[test]
    fn rejects_wrong_shapes() {
        let inputs: [&[u8]; 4] = [b"", b"[]", br#"{"chirps": {"x": 1}}"#, br#"{"users": {"1": {"id": "one"}}}"#];
        for input in inputs {
            assert!(
                matches!(decode(input), Err(StoreError::CorruptDocument(_))),
                "accepted {:?}",
                String::from_utf8_lossy(input)
            );
        }
    }
}
