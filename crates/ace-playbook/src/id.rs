//! Section-scoped identifier generation
//!
//! Generated ids have the shape `{slug}-{NNN}`. Only ids of exactly that
//! shape count towards the next number; legacy ids such as `kpt_007` or
//! hand-written ids are left alone and never influence generation.

use crate::entry::Entry;

/// Minimum width of the numeric suffix
pub const SUFFIX_WIDTH: usize = 3;

/// Numeric suffix of `id` if it is exactly `{slug}-{digits}`
#[must_use]
pub fn parse_suffix(id: &str, slug: &str) -> Option<u64> {
    let digits = id.strip_prefix(slug)?.strip_prefix('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Next identifier for a section holding `entries`
///
/// Scans for the largest `{slug}-{digits}` suffix (0 when none match) and
/// returns `{slug}-{max + 1}`, zero-padded to [`SUFFIX_WIDTH`] digits.
#[must_use]
pub fn generate_id(entries: &[Entry], slug: &str) -> String {
    let max = entries
        .iter()
        .filter_map(|entry| parse_suffix(&entry.id, slug))
        .max()
        .unwrap_or(0);
    format!("{slug}-{:0width$}", max.saturating_add(1), width = SUFFIX_WIDTH)
}
