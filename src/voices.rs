//! Piper voice metadata and speaker selection.
//!
//! A Piper voice is an `.onnx` model with a side-car `<model>.json` holding the
//! sample rate and the speaker map. Published voices missing on disk are
//! fetched from the `rhasspy/piper-voices` repository.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

const VOICES_BASE_URL: &str = "https://huggingface.co/rhasspy/piper-voices/resolve/main";

static PUBLISHED_VOICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z]{2,3})_([A-Z]{2})-([A-Za-z0-9_]+)-(x_low|low|medium|high)$").unwrap()
});

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("voice config '{}' not found", .0.display())]
    ConfigMissing(PathBuf),
    #[error("failed to read voice config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid voice config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("speaker '{name}' not found (available: {available})")]
    UnknownSpeaker { name: String, available: String },
    #[error("model '{}' not found and is not a published voice name", .0.display())]
    ModelMissing(PathBuf),
    #[error("failed to download {url}: {message}")]
    Download { url: String, message: String },
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VoiceConfig {
    pub audio: AudioConfig,
    #[serde(default = "one")]
    pub num_speakers: u32,
    #[serde(default)]
    pub speaker_id_map: HashMap<String, i64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AudioConfig {
    pub sample_rate: u32,
}

fn one() -> u32 {
    1
}

/// Speaker chosen for synthesis. `speaker_id` is `None` for single-speaker models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceProfile {
    pub name: String,
    pub speaker_id: Option<i64>,
}

/// Side-car config path: `voice.onnx` -> `voice.onnx.json`.
pub fn config_path(model: &Path) -> PathBuf {
    let mut os = model.as_os_str().to_owned();
    os.push(".json");
    PathBuf::from(os)
}

impl VoiceConfig {
    pub fn load(model: &Path) -> Result<Self, VoiceError> {
        let path = config_path(model);
        if !path.exists() {
            return Err(VoiceError::ConfigMissing(path));
        }
        let data = fs::read_to_string(&path).map_err(|source| VoiceError::Io {
            path: path.clone(),
            source,
        })?;
        let config: VoiceConfig =
            serde_json::from_str(&data).map_err(|source| VoiceError::Parse { path, source })?;
        debug!(
            "Voice config: {} Hz, {} speaker(s)",
            config.audio.sample_rate, config.num_speakers
        );
        Ok(config)
    }

    /// Speaker names ordered by id.
    pub fn speakers(&self) -> Vec<(&str, i64)> {
        let mut speakers: Vec<(&str, i64)> = self
            .speaker_id_map
            .iter()
            .map(|(name, id)| (name.as_str(), *id))
            .collect();
        speakers.sort_by_key(|&(name, id)| (id, name));
        speakers
    }

    /// Pick a speaker by name, or the lowest-id speaker when none is requested.
    pub fn load_speaker(&self, name: Option<&str>, model_name: &str) -> Result<VoiceProfile, VoiceError> {
        let speakers = self.speakers();
        match name {
            Some(name) => match self.speaker_id_map.get(name) {
                Some(&id) => Ok(VoiceProfile { name: name.to_string(), speaker_id: Some(id) }),
                None if speakers.is_empty() && name == model_name => {
                    Ok(VoiceProfile { name: name.to_string(), speaker_id: None })
                }
                None => Err(VoiceError::UnknownSpeaker {
                    name: name.to_string(),
                    available: if speakers.is_empty() {
                        model_name.to_string()
                    } else {
                        speakers.iter().map(|(n, _)| *n).collect::<Vec<_>>().join(", ")
                    },
                }),
            },
            None => Ok(match speakers.first() {
                Some(&(name, id)) => VoiceProfile { name: name.to_string(), speaker_id: Some(id) },
                None => VoiceProfile { name: model_name.to_string(), speaker_id: None },
            }),
        }
    }
}

/// Voice name without directories and `.onnx`, e.g. `en_US-amy-medium`.
pub fn model_name(model: &Path) -> String {
    model
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| model.display().to_string())
}

/// Download URL of a published voice file, if `name` follows
/// `<lang>_<REGION>-<voice>-<quality>`.
pub fn published_voice_url(name: &str, file_name: &str) -> Option<String> {
    let caps = PUBLISHED_VOICE.captures(name)?;
    let lang = &caps[1];
    let locale = format!("{}_{}", lang, &caps[2]);
    Some(format!(
        "{}/{}/{}/{}/{}/{}",
        VOICES_BASE_URL, lang, locale, &caps[3], &caps[4], file_name
    ))
}

/// Make sure the model and its config exist locally, fetching a published
/// voice when they don't.
pub fn ensure_model(model: &Path) -> Result<(), VoiceError> {
    let config = config_path(model);
    if model.exists() && config.exists() {
        return Ok(());
    }

    let name = model_name(model);
    let file_name = |p: &Path| p.file_name().map(|f| f.to_string_lossy().into_owned());
    let (Some(model_file), Some(config_file)) = (file_name(model), file_name(&config)) else {
        return Err(VoiceError::ModelMissing(model.to_path_buf()));
    };
    let (Some(model_url), Some(config_url)) = (
        published_voice_url(&name, &model_file),
        published_voice_url(&name, &config_file),
    ) else {
        return Err(VoiceError::ModelMissing(model.to_path_buf()));
    };

    warn!("Voice '{}' not found locally; downloading", name);
    if !model.exists() {
        download(&model_url, model)?;
    }
    if !config.exists() {
        download(&config_url, &config)?;
    }
    Ok(())
}

fn download(url: &str, dest: &Path) -> Result<(), VoiceError> {
    info!("Downloading {} -> {}", url, dest.display());
    let fail = |message: String| VoiceError::Download { url: url.to_string(), message };

    let client = reqwest::blocking::Client::new();
    let res = client
        .get(url)
        .header(USER_AGENT, "tts-video/0.1")
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| fail(e.to_string()))?;

    let written = stage_to(res, dest).map_err(|e| fail(e.to_string()))?;
    info!("Downloaded {} bytes to {}", written, dest.display());
    Ok(())
}

/// Copy `body` into a temp file beside `dest` and move it into place once
/// complete. A failed copy leaves nothing behind.
fn stage_to(mut body: impl Read, dest: &Path) -> io::Result<u64> {
    let dir = match dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    let written = io::copy(&mut body, &mut staged)?;
    staged.persist(dest).map_err(|e| e.error)?;
    Ok(written)
}
