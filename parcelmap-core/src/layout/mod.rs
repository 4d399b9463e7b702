
pub mod builder;
pub mod indexer;
pub mod serialization;
// Re-export for easy access
pub use builder::{LayoutBuilder, LayoutForest};
pub use indexer::{assign_indices, IndexSummary, SpaceIndexAssigner};
