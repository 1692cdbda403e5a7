use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Window,
    CropSize(usize),
    Extension,
    MissingDataDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse JSON: {}", e),
            ConfigError::Window => write!(f, "window must be greater than 0"),
            ConfigError::CropSize(size) => {
                write!(f, "crop_size must be even and greater than 0, got {}", size)
            }
            ConfigError::Extension => write!(f, "extension cannot be empty"),
            ConfigError::MissingDataDir => {
                write!(f, "data_dir must be given on the command line or in the config file")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> ConfigError {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> ConfigError {
        ConfigError::Json(err)
    }
}
