//! Script file naming

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Derive the script file name for a test-case display name.
///
/// The name is the std `DefaultHasher` digest (SipHash-1-3 with zero keys on
/// current toolchains) of the display name read as a signed integer, made
/// non-negative, with a `.py` suffix. Distinct names can collide, in which
/// case the later script overwrites the earlier one.
///
/// The standard library does not promise this algorithm across Rust
/// releases, so a toolchain upgrade may rename every script. Names are only
/// comparable between runs built with the same toolchain.
pub fn script_name(display_name: &str) -> String {
    let mut hasher = DefaultHasher::new();
    display_name.hash(&mut hasher);
    let hashed = hasher.finish() as i64;
    format!("{}.py", hashed.unsigned_abs())
}
