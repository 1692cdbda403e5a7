use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub mod error;
pub use error::ConfigError;

pub mod policy;
pub use policy::{Dtype, ErrorPolicy};

pub const DEFAULT_WINDOW: usize = 18;
pub const DEFAULT_CROP_SIZE: usize = 64;
pub const DEFAULT_EXTENSION: &str = "npy";
pub const DEFAULT_OUTPUT: &str = "merged.npy";

/// Window must hold at least one frame and the crop must be even and non-empty.
pub fn validate_shape(window: usize, crop_size: usize) -> Result<(), ConfigError> {
    if window == 0 {
        return Err(ConfigError::Window);
    }

    if crop_size == 0 || crop_size % 2 != 0 {
        return Err(ConfigError::CropSize(crop_size));
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct Config {
    data_dir: PathBuf,
    output: PathBuf,
    window: usize,
    crop_size: usize,
    extension: String,
    seed: Option<u64>,
    on_error: ErrorPolicy,
    dtype: Dtype,
}

// Deserializes a Config, filling defaults for omitted fields and rejecting window, crop and
// extension values the merger cannot work with.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct ConfigHelper {
            data_dir: PathBuf,
            output: Option<PathBuf>,
            window: Option<usize>,
            crop_size: Option<usize>,
            extension: Option<String>,
            seed: Option<u64>,
            on_error: Option<ErrorPolicy>,
            dtype: Option<Dtype>,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        let config = Config {
            data_dir: helper.data_dir,
            output: helper.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            window: helper.window.unwrap_or(DEFAULT_WINDOW),
            crop_size: helper.crop_size.unwrap_or(DEFAULT_CROP_SIZE),
            extension: helper
                .extension
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
            seed: helper.seed,
            on_error: helper.on_error.unwrap_or_default(),
            dtype: helper.dtype.unwrap_or_default(),
        };

        config.validate().map_err(D::Error::custom)?;

        Ok(config)
    }
}

impl Config {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            window: DEFAULT_WINDOW,
            crop_size: DEFAULT_CROP_SIZE,
            extension: DEFAULT_EXTENSION.to_string(),
            seed: None,
            on_error: ErrorPolicy::Skip,
            dtype: Dtype::F32,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_shape(self.window, self.crop_size)?;

        if self.extension.is_empty() {
            return Err(ConfigError::Extension);
        }

        Ok(())
    }

    pub fn with_data_dir<P: Into<PathBuf>>(mut self, data_dir: P) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_output<P: Into<PathBuf>>(mut self, output: P) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_crop_size(mut self, crop_size: usize) -> Self {
        self.crop_size = crop_size;
        self
    }

    pub fn with_extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_on_error(mut self, on_error: ErrorPolicy) -> Self {
        self.on_error = on_error;
        self
    }

    pub fn with_dtype(mut self, dtype: Dtype) -> Self {
        self.dtype = dtype;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn crop_size(&self) -> usize {
        self.crop_size
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn on_error(&self) -> ErrorPolicy {
        self.on_error
    }

    pub fn dtype(&self) -> Dtype {
        self.dtype
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.json");
        let mut file = File::create(&file_path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, file_path)
    }

    #[test]
    fn test_from_file() {
        let (_dir, file_path) = write_config(
            r#"
    {
        "data_dir": "./data",
        "output": "./out/merged.npy",
        "window": 12,
        "crop_size": 32,
        "seed": 7,
        "on_error": "abort",
        "dtype": "u16"
    }
    "#,
        );

        let config = Config::from_file(file_path).unwrap();

        assert_eq!(config.data_dir(), Path::new("./data"));
        assert_eq!(config.output(), Path::new("./out/merged.npy"));
        assert_eq!(config.window(), 12);
        assert_eq!(config.crop_size(), 32);
        assert_eq!(config.extension(), "npy");
        assert_eq!(config.seed(), Some(7));
        assert_eq!(config.on_error(), ErrorPolicy::Abort);
        assert_eq!(config.dtype(), Dtype::U16);
    }

    #[test]
    fn test_from_file_defaults() {
        let (_dir, file_path) = write_config(r#"{ "data_dir": "./data" }"#);

        let config = Config::from_file(file_path).unwrap();

        assert_eq!(config.output(), Path::new(DEFAULT_OUTPUT));
        assert_eq!(config.window(), 18);
        assert_eq!(config.crop_size(), 64);
        assert_eq!(config.seed(), None);
        assert_eq!(config.on_error(), ErrorPolicy::Skip);
        assert_eq!(config.dtype(), Dtype::F32);
    }

    #[test]
    fn test_from_file_rejects_odd_crop() {
        let (_dir, file_path) = write_config(r#"{ "data_dir": "./data", "crop_size": 63 }"#);

        let result = Config::from_file(file_path);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_from_file_rejects_unknown_policy() {
        let (_dir, file_path) = write_config(r#"{ "data_dir": "./data", "on_error": "retry" }"#);

        assert!(Config::from_file(file_path).is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempdir().unwrap();
        let result = Config::from_file(dir.path().join("nope.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_validate() {
        assert!(Config::new("./data").validate().is_ok());
        assert!(matches!(
            Config::new("./data").with_window(0).validate(),
            Err(ConfigError::Window)
        ));
        assert!(matches!(
            Config::new("./data").with_crop_size(0).validate(),
            Err(ConfigError::CropSize(0))
        ));
        assert!(matches!(
            Config::new("./data").with_extension("").validate(),
            Err(ConfigError::Extension)
        ));
    }
}
