use log::{debug, info, warn};
use ndarray::{Array4, Array5, ArrayView4, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::sequence::SequenceMerger;
use crate::config::{Config, ConfigError, ErrorPolicy};
use crate::error::MergeError;
use crate::naming::{self, NumericIndex};
use crate::readers::{FrameElement, FrameReader, NpyReader};

/// Result of merging every sequence folder under a root directory.
#[derive(Debug)]
pub struct MergedBatch<A> {
    /// Axes are (batch, channel, frame, height, width).
    pub tensor: Array5<A>,
    /// Folders in batch order.
    pub folders: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// What a full run produced on disk.
#[derive(Debug)]
pub struct MergeReport {
    pub output: PathBuf,
    pub shape: Vec<usize>,
    pub seed: u64,
    pub folders: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct BatchMerger<F = NpyReader> {
    merger: SequenceMerger<F>,
    config: Config,
}

impl BatchMerger<NpyReader> {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let merger = SequenceMerger::from_config(&config)?;
        Ok(BatchMerger { merger, config })
    }
}

impl<F: FrameReader> BatchMerger<F> {
    pub fn with_merger(config: Config, merger: SequenceMerger<F>) -> Self {
        BatchMerger { merger, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Immediate subdirectories of `root`, each paired with its parsed index.
    fn sequence_folders(root: &Path) -> Result<Vec<(PathBuf, Option<NumericIndex>)>, MergeError> {
        let mut folders = Vec::new();

        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = match entry {
                Ok(entry) => entry,
                // Broken links and unreadable entries inside the root are not sequences
                Err(e) if e.depth() > 0 => {
                    warn!("Ignoring unreadable entry: {}", e);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            if entry.file_type().is_dir() {
                let path = entry.into_path();
                let index = naming::index_of(&path).ok();
                folders.push((path, index));
            }
        }

        Ok(folders)
    }

    /// Applies the error policy to a folder-level failure. Returns the error when the run must
    /// stop.
    fn handle_folder_error(&self, folder: &Path, err: MergeError) -> Result<(), MergeError> {
        if err.is_folder_level() && self.config.on_error() == ErrorPolicy::Skip {
            warn!("Skipping {}: {}", folder.display(), err);
            Ok(())
        } else {
            Err(err)
        }
    }

    /// Merges every sequence folder under `root` in ascending numeric order of the folder names
    /// and stacks them into one (batch, channel, frame, height, width) tensor.
    ///
    /// Folders without frame files are left out silently. Other folder failures follow the
    /// configured [`ErrorPolicy`]. Fails with [`MergeError::NoSequences`] when nothing is left.
    pub fn merge_all<A, R>(&self, root: &Path, rng: &mut R) -> Result<MergedBatch<A>, MergeError>
    where
        A: FrameElement,
        R: Rng,
    {
        let mut indexed = Vec::new();
        let mut skipped = Vec::new();

        for (path, index) in Self::sequence_folders(root)? {
            match index {
                Some(index) => indexed.push((index, path)),
                None => {
                    self.handle_folder_error(
                        &path,
                        MergeError::MalformedFilename { path: path.clone() },
                    )?;
                    skipped.push(path);
                }
            }
        }
        naming::sort_keyed(&mut indexed);

        let mut blocks: Vec<Array4<A>> = Vec::new();
        let mut folders = Vec::new();

        for (_, folder) in indexed {
            let block = match self.merger.merge_folder::<A, R>(&folder, rng) {
                Ok(Some(block)) => block,
                Ok(None) => {
                    debug!("Skipping empty folder {}", folder.display());
                    continue;
                }
                Err(e) => {
                    self.handle_folder_error(&folder, e)?;
                    skipped.push(folder);
                    continue;
                }
            };

            if let Some(first) = blocks.first()
                && first.shape() != block.shape()
            {
                let err = MergeError::ShapeMismatch {
                    path: folder.clone(),
                    expected: first.shape().to_vec(),
                    found: block.shape().to_vec(),
                };
                self.handle_folder_error(&folder, err)?;
                skipped.push(folder);
                continue;
            }

            info!("{} {:?}", folder.display(), block.shape());
            blocks.push(block);
            folders.push(folder);
        }

        if blocks.is_empty() {
            return Err(MergeError::NoSequences {
                root: root.to_path_buf(),
            });
        }

        let views: Vec<ArrayView4<A>> = blocks.iter().map(|block| block.view()).collect();
        let stacked = ndarray::stack(Axis(0), &views).map_err(|_| MergeError::ShapeMismatch {
            path: root.to_path_buf(),
            expected: blocks[0].shape().to_vec(),
            found: Vec::new(),
        })?;
        info!("Stacked {:?}", stacked.shape());

        // (batch, frame, height, width, channel) -> (batch, channel, frame, height, width)
        let tensor = stacked
            .permuted_axes([0, 4, 1, 2, 3])
            .as_standard_layout()
            .into_owned();
        info!("Merged {:?}", tensor.shape());

        Ok(MergedBatch {
            tensor,
            folders,
            skipped,
        })
    }

    /// Full run: seeds the random source, merges the configured data directory and writes the
    /// tensor to the configured output file.
    pub fn process<A: FrameElement>(&self) -> Result<MergeReport, MergeError> {
        let seed = self.config.seed().unwrap_or_else(|| rand::thread_rng().r#gen());
        info!("Using seed {}", seed);
        let mut rng = StdRng::seed_from_u64(seed);

        let batch = self.merge_all::<A, _>(self.config.data_dir(), &mut rng)?;

        let output = self.config.output();
        write_merged(output, &batch.tensor)?;
        info!("Saved {:?} to {}", batch.tensor.shape(), output.display());

        Ok(MergeReport {
            output: output.to_path_buf(),
            shape: batch.tensor.shape().to_vec(),
            seed,
            folders: batch.folders,
            skipped: batch.skipped,
        })
    }
}

/// Writes the merged tensor as a single `.npy` file, creating missing parent directories.
pub fn write_merged<A: FrameElement>(path: &Path, tensor: &Array5<A>) -> Result<(), MergeError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| MergeError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    ndarray_npy::write_npy(path, tensor).map_err(|e| MergeError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
