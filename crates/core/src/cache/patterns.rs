//! Glob matching for cache keys, used by caches without native pattern deletion.

/// Checks if a cache key matches a glob pattern where `*` matches any
/// sequence of characters, including none.
///
/// # Examples
///
/// ```
/// use trialdesk_core::cache::pattern_matches;
///
/// assert!(pattern_matches("trials:*", "trials:list:*"));
/// assert!(pattern_matches("*:list:*", "sites:list:status=active"));
/// assert!(!pattern_matches("trials:*", "sites:list:*"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == key;
    }

    let segments: Vec<&str> = pattern.split('*').collect();
    let last = segments.len() - 1;
    let mut remaining = key;

    for (i, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            continue;
        }

        if i == 0 {
            // Anchored at the start.
            match remaining.strip_prefix(segment) {
                Some(rest) => remaining = rest,
                None => return false,
            }
        } else if i == last {
            // Anchored at the end.
            return remaining.ends_with(segment);
        } else {
            match remaining.find(segment) {
                Some(pos) => remaining = &remaining[pos + segment.len()..],
                None => return false,
            }
        }
    }

    true
}
