use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::error::MergeError;

/// Integer embedded in a file or folder name, kept as its digits so any length compares
/// numerically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericIndex(String);

impl NumericIndex {
    pub fn from_name(name: &str) -> Option<Self> {
        let digits = first_integer(name)?;
        Some(NumericIndex(digits.trim_start_matches('0').to_string()))
    }
}

impl Ord for NumericIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for NumericIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// First run of ASCII digits in `name`.
pub fn first_integer(name: &str) -> Option<&str> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let rest = &name[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Index of the last path component. Only the file name counts, never the parent directories.
pub fn index_of(path: &Path) -> Result<NumericIndex, MergeError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(NumericIndex::from_name)
        .ok_or_else(|| MergeError::MalformedFilename {
            path: path.to_path_buf(),
        })
}

/// Sorts paths by ascending embedded integer; equal integers fall back to the name.
pub fn sort_by_index(paths: Vec<PathBuf>) -> Result<Vec<PathBuf>, MergeError> {
    let mut keyed = paths
        .into_iter()
        .map(|path| index_of(&path).map(|index| (index, path)))
        .collect::<Result<Vec<_>, _>>()?;

    sort_keyed(&mut keyed);

    Ok(keyed.into_iter().map(|(_, path)| path).collect())
}

pub(crate) fn sort_keyed(keyed: &mut [(NumericIndex, PathBuf)]) {
    keyed.sort_by(|(a, path_a), (b, path_b)| {
        a.cmp(b)
            .then_with(|| path_a.file_name().cmp(&path_b.file_name()))
    });
}
