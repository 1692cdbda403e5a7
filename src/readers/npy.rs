use super::{Frame, FrameElement, FrameReader, ReadError};
use ndarray::{ArrayD, Axis, Ix3};
use std::path::Path;

/// Reads frames stored as `.npy` arrays. 2-D arrays get a single trailing channel axis.
#[derive(Debug, Default, Clone, Copy)]
pub struct NpyReader;

impl FrameReader for NpyReader {
    fn read_frame<A: FrameElement>(&self, path: &Path) -> Result<Frame<A>, ReadError> {
        let array: ArrayD<A> = ndarray_npy::read_npy(path).map_err(|e| ReadError::Npy {
            path: path.to_path_buf(),
            source: e,
        })?;

        let ndim = array.ndim();
        let array = match ndim {
            2 => array.insert_axis(Axis(2)),
            3 => array,
            _ => {
                return Err(ReadError::Rank {
                    path: path.to_path_buf(),
                    ndim,
                });
            }
        };

        array
            .into_dimensionality::<Ix3>()
            .map_err(|_| ReadError::Rank {
                path: path.to_path_buf(),
                ndim,
            })
    }
}
