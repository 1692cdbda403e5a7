use std::fmt;
use std::path::PathBuf;

use crate::readers::ReadError;

#[derive(Debug)]
pub enum MergeError {
    /// A file or folder name carries no integer to order it by.
    MalformedFilename { path: PathBuf },
    /// The folder holds fewer frames than the temporal window.
    InsufficientFrames {
        folder: PathBuf,
        found: usize,
        required: usize,
    },
    /// The frames are smaller than the spatial crop.
    FrameTooSmall {
        folder: PathBuf,
        height: usize,
        width: usize,
        crop: usize,
    },
    /// A frame (or a whole sequence) does not match the shape of the ones before it.
    ShapeMismatch {
        path: PathBuf,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    Read(ReadError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Pattern(glob::PatternError),
    Walk(walkdir::Error),
    Write {
        path: PathBuf,
        source: ndarray_npy::WriteNpyError,
    },
    /// No folder under the root produced a sequence.
    NoSequences { root: PathBuf },
}

impl MergeError {
    /// Errors confined to one sequence folder. These are the ones the error policy may skip.
    pub fn is_folder_level(&self) -> bool {
        matches!(
            self,
            MergeError::MalformedFilename { .. }
                | MergeError::InsufficientFrames { .. }
                | MergeError::FrameTooSmall { .. }
                | MergeError::ShapeMismatch { .. }
                | MergeError::Read(_)
                | MergeError::Io { .. }
        )
    }
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::MalformedFilename { path } => {
                write!(f, "No integer found in name: {}", path.display())
            }
            MergeError::InsufficientFrames {
                folder,
                found,
                required,
            } => write!(
                f,
                "{} has {} frames, at least {} are required",
                folder.display(),
                found,
                required
            ),
            MergeError::FrameTooSmall {
                folder,
                height,
                width,
                crop,
            } => write!(
                f,
                "Frames in {} are {}x{}, smaller than the {}x{} crop",
                folder.display(),
                height,
                width,
                crop,
                crop
            ),
            MergeError::ShapeMismatch {
                path,
                expected,
                found,
            } => write!(
                f,
                "Shape mismatch for {}: expected {:?}, found {:?}",
                path.display(),
                expected,
                found
            ),
            MergeError::Read(e) => write!(f, "{}", e),
            MergeError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            MergeError::Pattern(e) => write!(f, "Invalid file pattern: {}", e),
            MergeError::Walk(e) => write!(f, "Failed to list directory: {}", e),
            MergeError::Write { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            MergeError::NoSequences { root } => {
                write!(f, "No sequence could be merged under {}", root.display())
            }
        }
    }
}

impl std::error::Error for MergeError {}

impl From<ReadError> for MergeError {
    fn from(err: ReadError) -> MergeError {
        MergeError::Read(err)
    }
}

impl From<glob::PatternError> for MergeError {
    fn from(err: glob::PatternError) -> MergeError {
        MergeError::Pattern(err)
    }
}

impl From<walkdir::Error> for MergeError {
    fn from(err: walkdir::Error) -> MergeError {
        MergeError::Walk(err)
    }
}

impl From<glob::GlobError> for MergeError {
    fn from(err: glob::GlobError) -> MergeError {
        let path = err.path().to_path_buf();
        MergeError::Io {
            path,
            source: err.into_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_level_errors() {
        let bad_name = MergeError::MalformedFilename {
            path: PathBuf::from("data/frames"),
        };
        assert!(bad_name.is_folder_level());

        let short = MergeError::InsufficientFrames {
            folder: PathBuf::from("data/seq3"),
            found: 17,
            required: 18,
        };
        assert!(short.is_folder_level());
        assert_eq!(
            short.to_string(),
            "data/seq3 has 17 frames, at least 18 are required"
        );

        let empty = MergeError::NoSequences {
            root: PathBuf::from("data"),
        };
        assert!(!empty.is_folder_level());
    }
}
