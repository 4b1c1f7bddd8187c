use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context;
use tracing::{debug, error, info, warn};

use crate::audio::SynthesisResult;
use crate::voices::{self, VoiceConfig, VoiceError, VoiceProfile};

/// Sampling parameters handed to the synthesizer on every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub repetition_penalty: f32,
    pub max_length: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self { temperature: 0.1, repetition_penalty: 1.1, max_length: 4096 }
    }
}

pub trait SpeechSynthesizer {
    fn synthesize(
        &self,
        text: &str,
        speaker: &VoiceProfile,
        params: &GenerationParams,
    ) -> anyhow::Result<SynthesisResult>;
}

/// Synthesizer backed by the `piper` command-line tool.
pub struct PiperSynthesizer {
    program: PathBuf,
    model: PathBuf,
    sample_rate: u32,
}

impl PiperSynthesizer {
    pub fn new(program: impl Into<PathBuf>, model: impl Into<PathBuf>, config: &VoiceConfig) -> Self {
        Self {
            program: program.into(),
            model: model.into(),
            sample_rate: config.audio.sample_rate,
        }
    }

    fn command(&self, speaker: &VoiceProfile, params: &GenerationParams, out_path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--model")
            .arg(&self.model)
            .arg("--output_file")
            .arg(out_path)
            .arg("--noise_scale")
            .arg(params.temperature.to_string());
        if let Some(id) = speaker.speaker_id {
            cmd.arg("--speaker").arg(id.to_string());
        }
        cmd
    }
}

/// Cut `text` to at most `max_length` characters.
fn bounded(text: &str, max_length: usize) -> &str {
    match text.char_indices().nth(max_length) {
        Some((idx, _)) => {
            warn!(
                "Input text exceeds {} characters; the remainder is not synthesized",
                max_length
            );
            &text[..idx]
        }
        None => text,
    }
}

impl SpeechSynthesizer for PiperSynthesizer {
    fn synthesize(
        &self,
        text: &str,
        speaker: &VoiceProfile,
        params: &GenerationParams,
    ) -> anyhow::Result<SynthesisResult> {
        let text = bounded(text, params.max_length);
        debug!(
            "repetition_penalty={} has no piper counterpart; ignored",
            params.repetition_penalty
        );

        let tmp = tempfile::Builder::new()
            .prefix("tts-video-")
            .suffix(".wav")
            .tempfile()
            .context("create temporary wav for piper")?;
        let out_path = tmp.path().to_path_buf();

        info!(
            "Calling Piper TTS with voice '{}' ({} chars)",
            speaker.name,
            text.chars().count()
        );
        let mut child = self
            .command(speaker, params, &out_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to spawn {:?}", self.program))?;

        // stdin is closed when the handle drops, which ends piper's input
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Err(io::Error::other("failed to open piper stdin")),
        };

        // piper may exit before reading everything; its status explains more
        // than the broken pipe does
        let status = child.wait()?;
        if !status.success() {
            error!("Piper TTS command failed for voice '{}'", speaker.name);
            anyhow::bail!("TTS engine failed, command returned {}", status);
        }
        written.context("failed to write text to piper")?;

        let result = SynthesisResult::from_wav(&out_path)?;
        if result.sample_rate() != self.sample_rate {
            warn!(
                "Piper produced {} Hz audio, voice config says {} Hz",
                result.sample_rate(),
                self.sample_rate
            );
        }
        info!("Piper TTS generated {:.2} seconds of speech", result.duration_seconds());
        Ok(result)
    }
}

/// Everything synthesis needs, built once at startup and read-only afterwards.
pub struct SynthesisContext {
    pub synthesizer: Box<dyn SpeechSynthesizer>,
    pub speaker: VoiceProfile,
    pub params: GenerationParams,
}

impl SynthesisContext {
    pub fn new(synthesizer: Box<dyn SpeechSynthesizer>, speaker: VoiceProfile) -> Self {
        Self { synthesizer, speaker, params: GenerationParams::default() }
    }

    /// Load a Piper voice, fetching it first if it is a missing published voice.
    pub fn piper(
        program: impl Into<PathBuf>,
        model: &Path,
        speaker: Option<&str>,
    ) -> Result<Self, VoiceError> {
        voices::ensure_model(model)?;
        let config = VoiceConfig::load(model)?;
        log_speakers(&config);
        let profile = config.load_speaker(speaker, &voices::model_name(model))?;
        info!("Loaded voice '{}' from {}", profile.name, model.display());
        let synthesizer = PiperSynthesizer::new(program, model, &config);
        Ok(Self::new(Box::new(synthesizer), profile))
    }

    pub fn synthesize(&self, text: &str) -> anyhow::Result<SynthesisResult> {
        self.synthesizer.synthesize(text, &self.speaker, &self.params)
    }
}

fn log_speakers(config: &VoiceConfig) {
    let speakers = config.speakers();
    if speakers.is_empty() {
        info!("Single-speaker voice");
        return;
    }
    info!("Available speakers:");
    for (name, id) in speakers {
        info!("  {:>3}  {}", id, name);
    }
}
