//! Path canonicalization shared by the inventory index and spreadsheet
//! lookups. Both sides go through [`normalize_path`] before comparison.

/// URL schemes whose `host/share/` prefix is dropped
const SHARE_SCHEMES: &[&str] = &["smb://", "file://"];

/// Canonical, comparable form of a path string:
/// share prefix removed (`\\host\share\`, `smb://host/share/`,
/// `file://host/share/`), forward slashes only, lower-cased, no repeated or
/// trailing slashes. Idempotent; blank input yields an empty string.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let relative = strip_share_prefix(trimmed);
    let lowered = relative.replace('\\', "/").to_lowercase();

    let mut normalized = String::with_capacity(lowered.len());
    // Collapse before trimming so no new `//` or share prefix can surface
    // on a second pass
    for c in lowered.chars() {
        if c == '/' && normalized.ends_with('/') {
            continue;
        }
        normalized.push(c);
    }

    normalized
        .trim_start()
        .trim_end_matches(|c: char| c == '/' || c.is_whitespace())
        .to_string()
}

/// Normalized parent folder; a path without a separator is its own folder.
pub fn extract_folder(path: &str) -> String {
    let normalized = normalize_path(path);
    match normalized.rfind('/') {
        Some(idx) if idx > 0 => normalized[..idx].to_string(),
        _ => normalized,
    }
}

/// Normalized final segment
pub fn extract_filename(path: &str) -> String {
    let normalized = normalize_path(path);
    match normalized.rfind('/') {
        Some(idx) => normalized[idx + 1..].to_string(),
        None => normalized,
    }
}

/// `true` when `prefix` equals `path` or names one of its ancestor folders.
pub fn is_path_prefix(prefix: &str, path: &str) -> bool {
    !prefix.is_empty()
        && path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn strip_share_prefix(path: &str) -> &str {
    if let Some(rest) = path.strip_prefix("\\\\") {
        return strip_host_and_share(rest, '\\').unwrap_or(path);
    }

    for scheme in SHARE_SCHEMES {
        let matches_scheme = path
            .get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme));
        if matches_scheme {
            return strip_host_and_share(&path[scheme.len()..], '/').unwrap_or(path);
        }
    }

    path
}

/// Drop `host{sep}share{sep}`; both segments must be non-empty.
fn strip_host_and_share(rest: &str, sep: char) -> Option<&str> {
    let (host, after_host) = rest.split_once(sep)?;
    let (share, remainder) = after_host.split_once(sep)?;
    if host.is_empty() || share.is_empty() {
        return None;
    }
    Some(remainder)
}
