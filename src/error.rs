use thiserror::Error;

/// Failures reported by table operations. Ordinary misses are `None`,
/// not errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// A "must exist" accessor (`HashMap::at`) was given an absent key.
    #[error("no such key")]
    KeyNotFound,
    /// The requested capacity exceeds `max_bucket_count`.
    #[error("capacity overflow (requested {requested})")]
    CapacityOverflow { requested: usize },
}
