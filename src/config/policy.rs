use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// What to do when a single sequence folder cannot be merged.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Log a warning and leave the folder out of the batch.
    #[default]
    #[serde(rename(deserialize = "skip"))]
    Skip,
    /// Stop the run and report the folder error.
    #[serde(rename(deserialize = "abort"))]
    Abort,
}

/// Element type stored in the frame files.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dtype {
    #[serde(rename(deserialize = "u8"))]
    U8,
    #[serde(rename(deserialize = "u16"))]
    U16,
    #[serde(rename(deserialize = "u32"))]
    U32,
    #[serde(rename(deserialize = "u64"))]
    U64,
    #[serde(rename(deserialize = "i16"))]
    I16,
    #[serde(rename(deserialize = "i32"))]
    I32,
    #[serde(rename(deserialize = "i64"))]
    I64,
    #[default]
    #[serde(rename(deserialize = "f32"))]
    F32,
    #[serde(rename(deserialize = "f64"))]
    F64,
}

#[derive(Debug)]
pub struct PolicyParseError(String);

impl fmt::Display for PolicyParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid value '{}'", self.0)
    }
}

impl std::error::Error for PolicyParseError {}

impl FromStr for ErrorPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(ErrorPolicy::Skip),
            "abort" => Ok(ErrorPolicy::Abort),
            other => Err(PolicyParseError(other.to_string())),
        }
    }
}

impl FromStr for Dtype {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "u8" => Ok(Dtype::U8),
            "u16" => Ok(Dtype::U16),
            "u32" => Ok(Dtype::U32),
            "u64" => Ok(Dtype::U64),
            "i16" => Ok(Dtype::I16),
            "i32" => Ok(Dtype::I32),
            "i64" => Ok(Dtype::I64),
            "f32" => Ok(Dtype::F32),
            "f64" => Ok(Dtype::F64),
            other => Err(PolicyParseError(other.to_string())),
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Skip => write!(f, "skip"),
            ErrorPolicy::Abort => write!(f, "abort"),
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dtype::U8 => "u8",
            Dtype::U16 => "u16",
            Dtype::U32 => "u32",
            Dtype::U64 => "u64",
            Dtype::I16 => "i16",
            Dtype::I32 => "i32",
            Dtype::I64 => "i64",
            Dtype::F32 => "f32",
            Dtype::F64 => "f64",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy() {
        assert_eq!("skip".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Skip);
        assert_eq!("abort".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Abort);
        assert!("ignore".parse::<ErrorPolicy>().is_err());
    }

    #[test]
    fn test_parse_dtype_matches_display() {
        for name in ["u8", "u16", "u32", "u64", "i16", "i32", "i64", "f32", "f64"] {
            let dtype: Dtype = name.parse().unwrap();
            assert_eq!(dtype.to_string(), name);
        }
        assert!("f16".parse::<Dtype>().is_err());
    }
}
