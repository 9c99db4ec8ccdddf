//! Compact on-disk encoding of suggestion lists.
//!
//! Suggestions are persisted as a compressed JSON array of
//! `[word, annotation, matched_length]` triples. The encoding is internal
//! to the store and not a wire contract.

use crate::error::Result;
use crate::types::Suggestion;

/// zstd level for persisted blobs. 0 selects the library default.
const COMPRESSION_LEVEL: i32 = 0;

/// Encode a suggestion list into a compressed blob.
pub fn encode(suggestions: &[Suggestion]) -> Result<Vec<u8>> {
    let rows: Vec<(&str, &str, usize)> = suggestions
        .iter()
        .map(|s| (s.word.as_str(), s.annotation.as_str(), s.matched_length))
        .collect();
    let json = serde_json::to_vec(&rows)?;
    Ok(zstd::encode_all(json.as_slice(), COMPRESSION_LEVEL)?)
}

/// Decode a blob produced by [`encode`].
pub fn decode(blob: &[u8]) -> Result<Vec<Suggestion>> {
    let json = zstd::decode_all(blob)?;
    let rows: Vec<(String, String, usize)> = serde_json::from_slice(&json)?;
    Ok(rows
        .into_iter()
        .map(|(word, annotation, matched_length)| Suggestion {
            word,
            annotation,
            matched_length,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_decode() {
        let suggestions = vec![
            Suggestion::new("香港", "hoeng gong", 9),
            Suggestion::new("香", "hoeng", 5),
        ];
        let blob = encode(&suggestions).unwrap();
        assert_eq!(decode(&blob).unwrap(), suggestions);
    }

    #[test]
    fn test_empty_list() {
        let blob = encode(&[]).unwrap();
        assert!(decode(&blob).unwrap().is_empty());
    }

    #[test]
    fn test_garbage_blob_is_an_error() {
        assert!(decode(b"not a blob").is_err());
    }
}
