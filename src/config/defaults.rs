//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [snapshot] Section Defaults
// ============================================================================

pub mod snapshot {
    use std::path::PathBuf;

    pub fn dir() -> PathBuf {
        "data".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    pub fn version() -> String {
        env!("CARGO_PKG_VERSION").into()
    }
}
