use std::fs;
use std::path::Path;

use anyhow::Context;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::{debug, info};

/// Mono 16-bit PCM produced by a synthesizer, held in memory until saved.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl SynthesisResult {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self { samples, sample_rate }
    }

    /// Load a WAV file into memory, downmixing multi-channel audio to mono.
    pub fn from_wav(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let mut reader =
            WavReader::open(path).with_context(|| format!("open synthesized wav: {path:?}"))?;
        let spec = reader.spec();
        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            anyhow::bail!(
                "expected 16-bit PCM wav from synthesizer, got {} bits {:?}",
                spec.bits_per_sample,
                spec.sample_format
            );
        }

        let interleaved = reader
            .samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("decode samples: {path:?}"))?;
        let channels = usize::from(spec.channels.max(1));
        let samples = if channels == 1 {
            interleaved
        } else {
            interleaved
                .chunks(channels)
                .map(|frame| {
                    let sum: i32 = frame.iter().map(|&s| i32::from(s)).sum();
                    (sum / frame.len() as i32) as i16
                })
                .collect()
        };

        debug!("Loaded {} samples at {} Hz from {:?}", samples.len(), spec.sample_rate, path);
        Ok(Self { samples, sample_rate: spec.sample_rate })
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Write the audio as a mono 16-bit WAV, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create output directory: {parent:?}"))?;
        }

        let spec = WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer =
            WavWriter::create(path, spec).with_context(|| format!("create output wav: {path:?}"))?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;

        info!("Wrote {} samples at {} Hz to {:?}", self.samples.len(), self.sample_rate, path);
        Ok(())
    }
}

/// Playback length of a WAV file on disk.
pub fn wav_duration_seconds(path: impl AsRef<Path>) -> anyhow::Result<f64> {
    let path = path.as_ref();
    let reader = WavReader::open(path).with_context(|| format!("open wav: {path:?}"))?;
    let sample_rate = reader.spec().sample_rate;
    if sample_rate == 0 {
        return Ok(0.0);
    }
    // hound counts frames here, not interleaved samples
    Ok(f64::from(reader.duration()) / f64::from(sample_rate))
}
