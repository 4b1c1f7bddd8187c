//! Spectrum-visualization video rendering through ffmpeg.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::{error, info};

pub const UNKNOWN_ERROR: &str = "Unknown error";

const SPECTRUM_FILTER: &str =
    "[0:a]showspectrum=mode=separate:color=intensity:slide=1:scale=cbrt[v]";

#[derive(Debug, Error)]
pub enum RenderError {
    /// The encoder ran and exited with a failure status.
    #[error("FFmpeg error: {0}")]
    Encoder(String),
    #[error("failed to launch {}: {source}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub trait VideoRenderer {
    fn render(&self, audio_path: &Path, video_path: &Path) -> Result<(), RenderError>;
}

pub struct FfmpegRenderer {
    program: PathBuf,
}

impl Default for FfmpegRenderer {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegRenderer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    /// Encoder arguments: spectrum video over the input audio, muxed with the
    /// original audio track.
    pub fn args(audio_path: &Path, video_path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), audio_path.into()];
        args.extend(
            [
                "-filter_complex",
                SPECTRUM_FILTER,
                "-map",
                "[v]",
                "-map",
                "0:a",
                "-pix_fmt",
                "yuv420p",
                "-c:v",
                "libx264",
                "-c:a",
                "aac",
                "-b:a",
                "192k",
                "-preset",
                "veryfast",
                "-crf",
                "18",
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(video_path.into());
        args
    }
}

/// Message carried by [`RenderError::Encoder`] for the captured stderr.
pub fn encoder_message(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    if text.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        text.into_owned()
    }
}

impl VideoRenderer for FfmpegRenderer {
    fn render(&self, audio_path: &Path, video_path: &Path) -> Result<(), RenderError> {
        info!(
            "Rendering spectrum video {} from {}",
            video_path.display(),
            audio_path.display()
        );
        let output = Command::new(&self.program)
            .args(Self::args(audio_path, video_path))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| RenderError::Launch { program: self.program.clone(), source })?;

        if !output.status.success() {
            error!("ffmpeg failed to produce video ({})", output.status);
            return Err(RenderError::Encoder(encoder_message(&output.stderr)));
        }
        info!("Video written to {}", video_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_carry_fixed_encoding_settings() {
        let args: Vec<String> = FfmpegRenderer::args(Path::new("in.wav"), Path::new("out.mp4"))
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(&args[..3], ["-y", "-i", "in.wav"]);
        assert_eq!(args.last().map(String::as_str), Some("out.mp4"));
        let joined = args.join(" ");
        for expected in [
            "showspectrum=mode=separate:color=intensity:slide=1:scale=cbrt",
            "-map [v] -map 0:a",
            "-pix_fmt yuv420p",
            "-c:v libx264",
            "-c:a aac",
            "-b:a 192k",
            "-preset veryfast",
            "-crf 18",
        ] {
            assert!(joined.contains(expected), "missing {expected:?} in {joined}");
        }
    }

    #[test]
    fn blank_stderr_is_unknown_error() {
        assert_eq!(encoder_message(b""), UNKNOWN_ERROR);
        assert_eq!(encoder_message(b" \n"), UNKNOWN_ERROR);
        assert_eq!(encoder_message(b"in.wav: No such file\n"), "in.wav: No such file\n");
        assert_eq!(encoder_message(b"  line one\nline two\n"), "  line one\nline two\n");
    }

    #[test]
    fn encoder_error_display() {
        let err = RenderError::Encoder(UNKNOWN_ERROR.into());
        assert_eq!(err.to_string(), "FFmpeg error: Unknown error");
    }

    #[test]
    fn missing_encoder_is_launch_error() {
        let renderer = FfmpegRenderer::new("/nonexistent/ffmpeg-binary");
        let err = renderer.render(Path::new("a.wav"), Path::new("v.mp4")).unwrap_err();
        assert!(matches!(err, RenderError::Launch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn silent_failure_reports_unknown_error() {
        // `false` ignores its arguments and exits 1 without output
        let renderer = FfmpegRenderer::new("false");
        let err = renderer.render(Path::new("a.wav"), Path::new("v.mp4")).unwrap_err();
        assert!(matches!(err, RenderError::Encoder(ref m) if m == UNKNOWN_ERROR), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn failure_with_diagnostics_reports_stderr() {
        // `ls` rejects `-y` on stderr
        let renderer = FfmpegRenderer::new("ls");
        let err = renderer.render(Path::new("a.wav"), Path::new("v.mp4")).unwrap_err();
        match err {
            RenderError::Encoder(message) => assert_ne!(message, UNKNOWN_ERROR),
            other => panic!("unexpected error: {other}"),
        }
    }
}
