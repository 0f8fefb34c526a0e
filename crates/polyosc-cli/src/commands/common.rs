//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use polyosc_params::{ParamStore, Preset};
use std::path::Path;

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, f32), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid parameter format: '{}' (expected key=value)", s))?;
    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|_| format!("Invalid value for '{}': '{}'", key, value))?;
    Ok((key.trim().to_string(), value))
}

/// Parse a comma-separated list of MIDI note numbers.
pub fn parse_notes(s: &str) -> Result<Vec<u8>, String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.parse::<u8>() {
            Ok(note) if note <= 127 => Ok(note),
            _ => Err(format!("Invalid MIDI note: '{}' (expected 0-127)", part)),
        })
        .collect()
}

/// Load a preset file.
pub fn load_preset(path: &Path) -> anyhow::Result<Preset> {
    Preset::load(path).with_context(|| format!("loading preset {}", path.display()))
}

/// Apply `string_id=value` overrides to a store.
pub fn apply_overrides(store: &ParamStore, overrides: &[(String, f32)]) -> anyhow::Result<()> {
    for (key, value) in overrides {
        let index = store.layout().index_of_string_id(key).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown parameter '{}'. Use 'polyosc params' to list parameter IDs.",
                key
            )
        })?;
        store.set_index(index, *value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("osc0_gain=0.25"),
            Ok(("osc0_gain".to_string(), 0.25))
        );
        assert!(parse_key_val("osc0_gain").is_err());
        assert!(parse_key_val("osc0_gain=loud").is_err());
    }

    #[test]
    fn test_parse_notes() {
        assert_eq!(parse_notes("60, 64,67"), Ok(vec![60, 64, 67]));
        assert_eq!(parse_notes("60,"), Ok(vec![60]));
        assert!(parse_notes("60,128").is_err());
        assert!(parse_notes("c4").is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let store = ParamStore::new(2).unwrap();
        apply_overrides(&store, &[("osc1_semi".to_string(), 7.0)]).unwrap();
        assert_eq!(store.values()[15], 7.0);
        assert!(apply_overrides(&store, &[("osc9_semi".to_string(), 1.0)]).is_err());
    }
}
