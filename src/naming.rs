use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

pub const AUDIO_EXTENSION: &str = "wav";
pub const VIDEO_EXTENSION: &str = "mp4";

/// Output path for an artifact.
///
/// An explicit override is returned untouched, whatever `extension` says.
/// Otherwise the input file's final extension is replaced by
/// `_output.<extension>`, and without an input file the name is
/// `output_<YYYYMMDD_HHMMSS>.<extension>`. Two timestamp names taken within
/// the same second collide.
pub fn name(input_file: Option<&Path>, output_override: Option<&Path>, extension: &str) -> PathBuf {
    name_at(input_file, output_override, extension, Local::now())
}

pub fn name_at(
    input_file: Option<&Path>,
    output_override: Option<&Path>,
    extension: &str,
    now: DateTime<Local>,
) -> PathBuf {
    if let Some(path) = output_override {
        return path.to_path_buf();
    }
    if let Some(input) = input_file {
        // with_extension("") keeps dotfiles such as ".notes" intact
        let base = input.with_extension("");
        return PathBuf::from(format!("{}_output.{}", base.display(), extension));
    }
    PathBuf::from(format!("output_{}.{}", now.format("%Y%m%d_%H%M%S"), extension))
}
