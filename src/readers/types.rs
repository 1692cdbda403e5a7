use ndarray::Array3;
use ndarray_npy::{ReadNpyError, ReadableElement, WritableElement};
use std::fmt;
use std::path::{Path, PathBuf};

/// Element types a frame file may hold and the merged tensor may be written with.
pub trait FrameElement: ReadableElement + WritableElement + Clone {}

impl<T: ReadableElement + WritableElement + Clone> FrameElement for T {}

/// One time-step, laid out as (height, width, channel).
pub type Frame<A> = Array3<A>;

pub trait FrameReader {
    fn read_frame<A: FrameElement>(&self, path: &Path) -> Result<Frame<A>, ReadError>;
}

#[derive(Debug)]
pub enum ReadError {
    Npy { path: PathBuf, source: ReadNpyError },
    Rank { path: PathBuf, ndim: usize },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Npy { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            ReadError::Rank { path, ndim } => write!(
                f,
                "{} holds a {}-D array, expected (height, width) or (height, width, channel)",
                path.display(),
                ndim
            ),
        }
    }
}

impl std::error::Error for ReadError {}
