pub mod batch;
pub mod crop;
pub mod sequence;
pub mod window;

pub use batch::{BatchMerger, MergeReport, MergedBatch, write_merged};
pub use crop::CropOrigin;
pub use sequence::SequenceMerger;
pub use window::centered_window;
