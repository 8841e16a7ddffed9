//! Storage keys for release records.
//!
//! Every backend addresses a release by `"{name}.v{version}"`. Version digits
//! never contain a `.`, so the last `.v` in a key always separates the name
//! from the version and the mapping can be inverted.

const VERSION_SEPARATOR: &str = ".v";

pub fn release_key(name: &str, version: u32) -> String {
    format!("{name}{VERSION_SEPARATOR}{version}")
}

/// Recover `(name, version)` from a key produced by [`release_key`].
pub fn parse_release_key(key: &str) -> Option<(String, u32)> {
    let (name, version) = key.rsplit_once(VERSION_SEPARATOR)?;
    if name.is_empty() || version.is_empty() || !version.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // "07" parses, but only "7" is ever written.
    if version.len() > 1 && version.starts_with('0') {
        return None;
    }
    let version = version.parse::<u32>().ok()?;
    Some((name.to_string(), version))
}
