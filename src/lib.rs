//! Text-to-speech with an optional spectrum-visualization video.
//!
//! Speech comes from a Piper voice model, video from ffmpeg's `showspectrum`
//! filter. [`pipeline::Pipeline`] ties the stages together.

pub mod args;
pub mod audio;
pub mod naming;
pub mod pipeline;
pub mod text;
pub mod tts;
pub mod video;
pub mod voices;

/// Log to stderr so stdout only carries messages meant for the user.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
