//! Shared constants for integration tests.
//!
//! Integration tests are compiled as separate crates (one per top-level file in
//! `tests/`). Placing shared constants under `tests/common/` avoids creating an
//! additional integration test binary while still allowing reuse via:
//!
//! ```rust
//! #[path = "common/test_constants.rs"]
//! mod test_constants;
//! ```

/// NFS server address and provisioner identity used by the fixtures.
pub const SERVER: &str = "nfs.example.com";
/// Export root configured for the fixtures.
pub const ROOT_DIR: &str = "/ifs/data/k8s";
/// Access zone configured for the fixtures.
pub const ZONE: &str = "System";
/// Claim namespace.
pub const NAMESPACE: &str = "team-a";
/// Claim name.
pub const CLAIM: &str = "pvc-1";
/// Orchestrator volume name.
pub const VOLUME: &str = "pv-000123";
/// Requested capacity, 10 GB.
pub const CAPACITY_BYTES: u64 = 10_000_000_000;
