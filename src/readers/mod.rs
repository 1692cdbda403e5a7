pub mod npy;
pub mod types;
pub mod utils;

pub use npy::NpyReader;
pub use types::{Frame, FrameElement, FrameReader, ReadError};
pub use utils::{frame_files, has_extension};
