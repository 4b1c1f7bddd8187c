use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tts-video", about = "Text-to-Speech Synthesizer")]
pub struct Args {
    /// Input text string
    #[clap(long, short = 'T')]
    pub text: Option<String>,

    /// Input text file
    #[clap(long, short = 'F')]
    pub file: Option<PathBuf>,

    /// Output file name
    #[clap(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Generate video from audio
    #[clap(long, short = 'V')]
    pub video: bool,

    /// Piper voice model; published voices are fetched when missing
    #[clap(long, short = 'm', default_value = "./en_US-amy-medium.onnx")]
    pub model: PathBuf,

    /// Speaker name for multi-speaker voices
    #[clap(long, short = 's')]
    pub speaker: Option<String>,

    /// Print the speakers available in the model and exit
    #[clap(long)]
    pub list_speakers: bool,

    #[clap(long, default_value = "piper")]
    pub piper_bin: PathBuf,

    #[clap(long, default_value = "ffmpeg")]
    pub ffmpeg_bin: PathBuf,
}

/// Arguments of the standalone audio-to-video converter.
#[derive(Parser, Debug)]
#[command(
    name = "audio-to-video",
    about = "Convert WAV audio to a spectrum visualization video."
)]
pub struct VideoArgs {
    /// Path to the input WAV file.
    pub audio_file: PathBuf,

    /// Path to the output MP4 file.
    pub video_file: PathBuf,

    #[clap(long, default_value = "ffmpeg")]
    pub ffmpeg_bin: PathBuf,
}
