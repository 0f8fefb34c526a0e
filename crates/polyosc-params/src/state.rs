//! Opaque state blobs for host session save/restore.
//!
//! The blob is JSON:
//!
//! ```json
//! { "version": 1, "params": { "100": 0.0, "101": 1.0, "105": 0.5 } }
//! ```
//!
//! Keys are stable [`ParamId`](polyosc_core::ParamId)s, so a blob saved by a
//! store with more or fewer oscillator slots still loads: unknown IDs are
//! skipped and missing IDs keep their current value.

use serde_json::{Map, Value};

use crate::error::ParamsError;
use crate::store::ParamStore;

/// Current blob format version.
pub const STATE_VERSION: u64 = 1;

/// Serialize every parameter in `store`.
pub fn save_state(store: &ParamStore) -> Result<Vec<u8>, ParamsError> {
    let mut params = Map::new();
    for (index, desc) in store.layout().descriptors().iter().enumerate() {
        if let Some(value) = store.get_index(index) {
            params.insert(desc.id.0.to_string(), Value::from(f64::from(value)));
        }
    }

    let state = serde_json::json!({
        "version": STATE_VERSION,
        "params": params,
    });
    Ok(serde_json::to_vec(&state)?)
}

/// Restore parameters from a blob written by [`save_state`].
///
/// Returns the number of parameters restored. Values are clamped to their
/// ranges.
///
/// # Errors
///
/// [`ParamsError::Json`] for malformed JSON, [`ParamsError::InvalidState`]
/// when the payload is not an object with a `params` object or carries a
/// newer version. The store is untouched on error.
pub fn load_state(store: &ParamStore, bytes: &[u8]) -> Result<usize, ParamsError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Some(root) = value.as_object() else {
        return Err(ParamsError::InvalidState("expected a JSON object".to_string()));
    };

    if let Some(version) = root.get("version").and_then(Value::as_u64)
        && version > STATE_VERSION
    {
        return Err(ParamsError::InvalidState(format!(
            "unsupported state version {version}"
        )));
    }

    let Some(params) = root.get("params").and_then(Value::as_object) else {
        return Err(ParamsError::InvalidState("missing 'params' object".to_string()));
    };

    let mut restored = 0;
    for (key, value) in params {
        let Some(id) = key.parse::<u32>().ok().map(polyosc_core::ParamId) else {
            continue;
        };
        let Some(value) = value.as_f64() else {
            continue;
        };
        if store.set_by_id(id, value as f32) {
            restored += 1;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(restored, total = store.len(), "state loaded");

    Ok(restored)
}
