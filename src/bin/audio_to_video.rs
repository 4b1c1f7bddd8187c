use clap::Parser;

use tts_video::args::VideoArgs;
use tts_video::video::{FfmpegRenderer, VideoRenderer};

fn main() {
    tts_video::init_tracing();

    let args = VideoArgs::parse();
    let renderer = FfmpegRenderer::new(&args.ffmpeg_bin);

    match renderer.render(&args.audio_file, &args.video_file) {
        Ok(()) => println!("Video successfully created: {}", args.video_file.display()),
        Err(e) => println!("Error: {}", e),
    }
}
