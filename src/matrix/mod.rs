pub mod align;
pub mod diff;
pub mod reconcile;

pub use align::sort_permutation;
pub use align::verify_aligned;
pub use diff::chunked_difference;
pub use diff::ChunkPolicy;
pub use diff::ColumnSource;
pub use reconcile::reconcile;
