use log::debug;
use ndarray::{Array4, ArrayView3, Axis};
use rand::Rng;
use std::path::Path;

use super::crop::CropOrigin;
use super::window::centered_window;
use crate::config::{self, Config, ConfigError};
use crate::error::MergeError;
use crate::naming;
use crate::readers::{self, Frame, FrameElement, FrameReader, NpyReader};

/// Turns one folder of frame files into a `(window, crop, crop, channel)` block.
#[derive(Debug, Clone)]
pub struct SequenceMerger<F = NpyReader> {
    reader: F,
    window: usize,
    crop_size: usize,
    extension: String,
}

impl SequenceMerger<NpyReader> {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::new(
            NpyReader,
            config.window(),
            config.crop_size(),
            config.extension(),
        )
    }
}

impl<F: FrameReader> SequenceMerger<F> {
    pub fn new(
        reader: F,
        window: usize,
        crop_size: usize,
        extension: &str,
    ) -> Result<Self, ConfigError> {
        config::validate_shape(window, crop_size)?;
        if extension.is_empty() {
            return Err(ConfigError::Extension);
        }

        Ok(Self {
            reader,
            window,
            crop_size,
            extension: extension.to_string(),
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn crop_size(&self) -> usize {
        self.crop_size
    }

    /// Loads every frame of `folder` in index order, keeps the centered window and crops all of
    /// its frames with one shared random origin.
    ///
    /// Returns `Ok(None)` when the folder holds no frame file.
    pub fn merge_folder<A, R>(
        &self,
        folder: &Path,
        rng: &mut R,
    ) -> Result<Option<Array4<A>>, MergeError>
    where
        A: FrameElement,
        R: Rng,
    {
        let files = readers::frame_files(folder, &self.extension)?;
        if files.is_empty() {
            debug!("No .{} files in {}", self.extension, folder.display());
            return Ok(None);
        }

        let files = naming::sort_by_index(files)?;

        let mut frames: Vec<Frame<A>> = Vec::with_capacity(files.len());
        for path in &files {
            let frame: Frame<A> = self.reader.read_frame(path)?;
            if let Some(first) = frames.first()
                && first.shape() != frame.shape()
            {
                return Err(MergeError::ShapeMismatch {
                    path: path.clone(),
                    expected: first.shape().to_vec(),
                    found: frame.shape().to_vec(),
                });
            }
            frames.push(frame);
        }

        let range = centered_window(frames.len(), self.window).ok_or_else(|| {
            MergeError::InsufficientFrames {
                folder: folder.to_path_buf(),
                found: frames.len(),
                required: self.window,
            }
        })?;

        let (height, width) = (frames[0].shape()[0], frames[0].shape()[1]);
        let origin = CropOrigin::random(rng, height, width, self.crop_size).ok_or_else(|| {
            MergeError::FrameTooSmall {
                folder: folder.to_path_buf(),
                height,
                width,
                crop: self.crop_size,
            }
        })?;
        debug!(
            "{}: frames {:?}, crop center ({}, {})",
            folder.display(),
            range,
            origin.x,
            origin.y
        );

        let cropped: Vec<ArrayView3<A>> = frames[range]
            .iter()
            .map(|frame| origin.apply(frame.view()))
            .collect();

        let merged = ndarray::stack(Axis(0), &cropped).map_err(|_| MergeError::ShapeMismatch {
            path: folder.to_path_buf(),
            expected: vec![self.crop_size, self.crop_size],
            found: cropped
                .first()
                .map(|view| view.shape().to_vec())
                .unwrap_or_default(),
        })?;

        Ok(Some(merged))
    }
}
