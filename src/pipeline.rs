//! Text -> speech -> optional video, one run per invocation.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::audio;
use crate::naming::{self, AUDIO_EXTENSION, VIDEO_EXTENSION};
use crate::text::{self, TextError};
use crate::tts::SynthesisContext;
use crate::video::{RenderError, VideoRenderer};

/// Inputs of one run, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub text: Option<String>,
    pub file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub video: bool,
}

/// How a run ended. Synthesis and audio-save failures are not outcomes: they
/// are returned as errors and end the process.
#[derive(Debug)]
pub enum Outcome {
    /// No text could be acquired; nothing was written.
    Aborted(TextError),
    AudioOnly { audio: PathBuf },
    AudioAndVideo { audio: PathBuf, video: PathBuf },
    /// The audio was kept; only the video failed.
    VideoFailed { audio: PathBuf, video: PathBuf, error: RenderError },
}

impl Outcome {
    pub fn audio(&self) -> Option<&Path> {
        match self {
            Outcome::Aborted(_) => None,
            Outcome::AudioOnly { audio }
            | Outcome::AudioAndVideo { audio, .. }
            | Outcome::VideoFailed { audio, .. } => Some(audio),
        }
    }
}

pub struct Pipeline<'a> {
    context: &'a SynthesisContext,
    renderer: &'a dyn VideoRenderer,
}

impl<'a> Pipeline<'a> {
    pub fn new(context: &'a SynthesisContext, renderer: &'a dyn VideoRenderer) -> Self {
        Self { context, renderer }
    }

    /// Run every stage. `input` backs the interactive prompt; user-facing
    /// messages go to `out`.
    pub fn run<R, W>(&self, request: &RunRequest, input: &mut R, out: &mut W) -> anyhow::Result<Outcome>
    where
        R: BufRead,
        W: Write,
    {
        let text = match text::resolve(request.text.as_deref(), request.file.as_deref(), input, out) {
            Ok(text) => text,
            Err(e) => {
                warn!("Aborting run: {}", e);
                writeln!(out, "Error: {}", e)?;
                return Ok(Outcome::Aborted(e));
            }
        };

        let speech = self.context.synthesize(&text)?;

        let audio = naming::name(request.file.as_deref(), request.output.as_deref(), AUDIO_EXTENSION);
        speech.save(&audio)?;
        drop(speech);
        match audio::wav_duration_seconds(&audio) {
            Ok(secs) => info!("Audio {} is {:.2} seconds long", audio.display(), secs),
            Err(e) => warn!("Could not inspect saved audio {}: {:#}", audio.display(), e),
        }
        writeln!(out, "Synthesized speech saved to '{}'.", audio.display())?;

        if !request.video {
            info!("Done: audio only");
            return Ok(Outcome::AudioOnly { audio });
        }

        let video = naming::name(request.file.as_deref(), request.output.as_deref(), VIDEO_EXTENSION);
        if video == audio {
            warn!(
                "Video path equals audio path {}; the encoder will overwrite its own input",
                audio.display()
            );
        }
        writeln!(out, "Generating video: {}...", video.display())?;
        match self.renderer.render(&audio, &video) {
            Ok(()) => {
                writeln!(out, "Video saved to '{}'.", video.display())?;
                info!("Done: audio and video");
                Ok(Outcome::AudioAndVideo { audio, video })
            }
            Err(e) => {
                error!("Video rendering failed: {}", e);
                writeln!(out, "Error generating video: {}", e)?;
                Ok(Outcome::VideoFailed { audio, video, error: e })
            }
        }
    }
}
