use clap::Parser;
use env_logger::{Builder, Env};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use seqmerge::{BatchMerger, Config, ConfigError, Dtype, ErrorPolicy, MergeReport};

/// Merge per-sequence frame arrays into one cropped (batch, channel, frame, height, width) tensor.
#[derive(Parser, Debug)]
#[command(name = "seqmerge", version)]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory whose subdirectories each hold one sequence of frame files
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Output .npy file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of centered frames kept per sequence
    #[arg(long)]
    window: Option<usize>,

    /// Side of the square crop, must be even
    #[arg(long)]
    crop_size: Option<usize>,

    /// Frame file extension, without the dot
    #[arg(long)]
    extension: Option<String>,

    /// Seed for the crop positions
    #[arg(long)]
    seed: Option<u64>,

    /// skip or abort when a folder cannot be merged
    #[arg(long)]
    on_error: Option<ErrorPolicy>,

    /// Element type of the frame files (u8, u16, u32, u64, i16, i32, i64, f32, f64)
    #[arg(long)]
    dtype: Option<Dtype>,
}

fn build_config(args: Args) -> Result<Config, ConfigError> {
    let mut config = match (&args.config, &args.data_dir) {
        (Some(path), _) => Config::from_file(path)?,
        (None, Some(data_dir)) => Config::new(data_dir),
        (None, None) => return Err(ConfigError::MissingDataDir),
    };

    if let Some(data_dir) = args.data_dir {
        config = config.with_data_dir(data_dir);
    }
    if let Some(output) = args.output {
        config = config.with_output(output);
    }
    if let Some(window) = args.window {
        config = config.with_window(window);
    }
    if let Some(crop_size) = args.crop_size {
        config = config.with_crop_size(crop_size);
    }
    if let Some(extension) = args.extension {
        config = config.with_extension(extension);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(on_error) = args.on_error {
        config = config.with_on_error(on_error);
    }
    if let Some(dtype) = args.dtype {
        config = config.with_dtype(dtype);
    }

    config.validate()?;
    Ok(config)
}

fn run(config: Config) -> Result<MergeReport, Box<dyn std::error::Error>> {
    let dtype = config.dtype();
    let merger = BatchMerger::new(config)?;

    let report = match dtype {
        Dtype::U8 => merger.process::<u8>(),
        Dtype::U16 => merger.process::<u16>(),
        Dtype::U32 => merger.process::<u32>(),
        Dtype::U64 => merger.process::<u64>(),
        Dtype::I16 => merger.process::<i16>(),
        Dtype::I32 => merger.process::<i32>(),
        Dtype::I64 => merger.process::<i64>(),
        Dtype::F32 => merger.process::<f32>(),
        Dtype::F64 => merger.process::<f64>(),
    }?;

    Ok(report)
}

/// Whole command: configuration then merge. The error text is what the user sees before the
/// process exits with a failure code.
fn execute(args: Args) -> Result<MergeReport, String> {
    let config = build_config(args).map_err(|e| format!("Invalid configuration: {}", e))?;

    info!(
        "Merging sequences under {} (window {}, crop {}, dtype {}, on_error {})",
        config.data_dir().display(),
        config.window(),
        config.crop_size(),
        config.dtype(),
        config.on_error()
    );

    run(config).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_secs();
    builder.init();

    match execute(Args::parse()) {
        Ok(report) => {
            info!(
                "Merged {} sequences ({} skipped) into {} with shape {:?}, seed {}",
                report.folders.len(),
                report.skipped.len(),
                report.output.display(),
                report.shape,
                report.seed
            );
            ExitCode::SUCCESS
        }
        Err(message) => {
            error!("{}", message);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use ndarray_npy::write_npy;
    use std::fs;
    use tempfile::tempdir;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["seqmerge"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_execute_writes_output() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        let folder = data.join("seq1");
        fs::create_dir_all(&folder).unwrap();
        for i in 0..18 {
            write_npy(folder.join(format!("{}.npy", i)), &Array2::<u16>::zeros((64, 64))).unwrap();
        }
        let output = dir.path().join("merged.npy");

        let report = execute(args(&[
            "--data-dir",
            data.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--dtype",
            "u16",
            "--seed",
            "3",
        ]))
        .unwrap();

        assert_eq!(report.shape, vec![1, 1, 18, 64, 64]);
        assert!(output.exists());
    }

    #[test]
    fn test_failure_names_the_data_dir() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir_all(data.join("seq1")).unwrap();

        let message = execute(args(&["--data-dir", data.to_str().unwrap()])).unwrap_err();

        assert!(message.contains(data.to_str().unwrap()), "{message}");
    }

    #[test]
    fn test_abort_names_the_folder() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        let folder = data.join("seq1");
        fs::create_dir_all(&folder).unwrap();
        write_npy(folder.join("0.npy"), &Array2::<f32>::zeros((64, 64))).unwrap();

        let message = execute(args(&[
            "--data-dir",
            data.to_str().unwrap(),
            "--on-error",
            "abort",
        ]))
        .unwrap_err();

        assert!(message.contains(folder.to_str().unwrap()), "{message}");
    }

    #[test]
    fn test_invalid_configuration() {
        let message = execute(args(&[])).unwrap_err();
        assert!(message.starts_with("Invalid configuration"), "{message}");

        let message = execute(args(&["--data-dir", "./data", "--crop-size", "15"])).unwrap_err();
        assert!(message.contains("crop_size"), "{message}");
    }
}
