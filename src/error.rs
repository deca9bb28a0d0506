///
/// The builder's error taxonomy is small: both variants are programming
/// errors, not transient runtime conditions. `DegenerateScene` is
/// deliberately absent — spec classifies it as locally recovered by the
/// Morton encoder, so it never reaches the caller as a typed error.
///
/// The source program calls `exit(EXIT_FAILURE)` on any failure; this
/// crate surfaces a typed result instead and lets the caller decide.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("input has {n} triangles, which exceeds the configured maximum of {max}")]
    InputTooLarge { n: usize, max: usize },

    #[error("tree invariant violated at cluster {cluster_id}: {detail}")]
    TreeInvariantViolated { cluster_id: u32, detail: String },
}
