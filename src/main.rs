use std::io;

use clap::Parser;
use tracing::info;

use tts_video::args::Args;
use tts_video::pipeline::{Pipeline, RunRequest};
use tts_video::tts::SynthesisContext;
use tts_video::video::FfmpegRenderer;
use tts_video::voices::{self, VoiceConfig};

fn main() -> anyhow::Result<()> {
    tts_video::init_tracing();

    let args = Args::parse();

    if args.list_speakers {
        voices::ensure_model(&args.model)?;
        let config = VoiceConfig::load(&args.model)?;
        let speakers = config.speakers();
        if speakers.is_empty() {
            println!("{} (single speaker)", voices::model_name(&args.model));
        }
        for (name, id) in speakers {
            println!("{:>3}  {}", id, name);
        }
        return Ok(());
    }

    info!("Loading voice model {}", args.model.display());
    let context = SynthesisContext::piper(&args.piper_bin, &args.model, args.speaker.as_deref())?;
    let renderer = FfmpegRenderer::new(&args.ffmpeg_bin);

    let request = RunRequest {
        text: args.text,
        file: args.file,
        output: args.output,
        video: args.video,
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    let outcome = Pipeline::new(&context, &renderer).run(&request, &mut input, &mut out)?;
    info!("Run finished: {:?}", outcome);
    Ok(())
}
