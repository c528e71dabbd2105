//! Collision-free output directory naming.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Picks the directory a run writes into.
///
/// Returns `base/name` unless `exists` reports it taken, then
/// `base/name-<unix seconds>`, then `base/name-<unix seconds>-2` and so on.
/// Nothing is created; callers pass `Path::exists` or a fake.
#[must_use]
pub fn unique_output_dir<F>(base: &Path, name: &str, now: SystemTime, exists: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    let plain = base.join(name);
    if !exists(&plain) {
        return plain;
    }
    let secs = now
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    let stamped = base.join(format!("{name}-{secs}"));
    if !exists(&stamped) {
        return stamped;
    }
    (2_u32..)
        .map(|n| base.join(format!("{name}-{secs}-{n}")))
        .find(|candidate| !exists(candidate))
        .unwrap_or(stamped)
}
