use std::path::{Path, PathBuf};

use crate::error::MergeError;

/// Regular files directly inside `folder` whose extension is `extension`.
pub fn frame_files(folder: &Path, extension: &str) -> Result<Vec<PathBuf>, MergeError> {
    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&folder.to_string_lossy()),
        glob::Pattern::escape(extension)
    );

    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.is_file() && has_extension(&path, extension) {
            files.push(path);
        }
    }

    Ok(files)
}

pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(extension)
}
