//! Cookie value codec for the visit count store.
//!
//! Wire format: the store as a compact JSON object (`{"page_5":3}`), then
//! percent-encoded the way `encodeURIComponent` does it, so the value is a
//! safe cookie token (`%7B%22page_5%22%3A3%7D`).

use crate::errors::CodecError;
use crate::visits::VisitCountStore;

/// Encodes the store into a cookie value.
pub fn encode(store: &VisitCountStore) -> String {
    // String keys and integer values always serialize.
    let json = serde_json::to_string(store).unwrap_or_else(|_| String::from("{}"));
    urlencoding::encode(&json).into_owned()
}

/// Decodes a cookie value, returning an empty store for absent or unreadable input.
pub fn decode(raw: Option<&str>) -> VisitCountStore {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return VisitCountStore::new();
    };

    try_decode(raw).unwrap_or_else(|e| {
        log::debug!("Discarding unreadable visit cookie: {e}");
        VisitCountStore::new()
    })
}

/// Decodes a cookie value, reporting why it could not be read.
pub fn try_decode(raw: &str) -> Result<VisitCountStore, CodecError> {
    let json = urlencoding::decode(raw)?;
    Ok(serde_json::from_str(&json)?)
}
