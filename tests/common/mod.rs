#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tts_video::audio::SynthesisResult;
use tts_video::tts::{GenerationParams, SpeechSynthesizer, SynthesisContext};
use tts_video::video::{RenderError, VideoRenderer};
use tts_video::voices::VoiceProfile;

/// Returns a short tone and remembers every request.
#[derive(Default)]
pub struct ToneSynthesizer {
    pub calls: Rc<RefCell<Vec<(String, VoiceProfile, GenerationParams)>>>,
    pub fail: bool,
}

impl SpeechSynthesizer for ToneSynthesizer {
    fn synthesize(
        &self,
        text: &str,
        speaker: &VoiceProfile,
        params: &GenerationParams,
    ) -> anyhow::Result<SynthesisResult> {
        self.calls
            .borrow_mut()
            .push((text.to_string(), speaker.clone(), *params));
        if self.fail {
            anyhow::bail!("model exploded");
        }
        let samples = (0..1600).map(|i| ((i % 40) as i16 - 20) * 500).collect();
        Ok(SynthesisResult::new(samples, 16_000))
    }
}

pub fn context(synth: ToneSynthesizer) -> SynthesisContext {
    SynthesisContext::new(
        Box::new(synth),
        VoiceProfile { name: "female_1".into(), speaker_id: Some(0) },
    )
}

/// Copies the audio to the video path on success; fails with a fixed message
/// otherwise.
#[derive(Default)]
pub struct CopyRenderer {
    pub fail_with: Option<String>,
    pub calls: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl VideoRenderer for CopyRenderer {
    fn render(&self, audio_path: &Path, video_path: &Path) -> Result<(), RenderError> {
        self.calls
            .borrow_mut()
            .push((audio_path.to_path_buf(), video_path.to_path_buf()));
        if let Some(message) = &self.fail_with {
            return Err(RenderError::Encoder(message.clone()));
        }
        fs::copy(audio_path, video_path).map_err(|source| RenderError::Launch {
            program: PathBuf::from("copy"),
            source,
        })?;
        Ok(())
    }
}
