use std::path::Path;
use std::process::Command;

use tts_video::video::{FfmpegRenderer, RenderError, UNKNOWN_ERROR, VideoRenderer};

fn ffmpeg_available() -> bool {
    Command::new("ffmpeg").arg("-version").output().is_ok()
}

#[test]
fn missing_audio_is_a_render_error() {
    if !ffmpeg_available() {
        eprintln!("ffmpeg not installed; skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("does_not_exist.wav");
    let video = dir.path().join("out.mp4");

    let err = FfmpegRenderer::default().render(&audio, &video).unwrap_err();
    match err {
        RenderError::Encoder(message) => {
            assert!(
                message.contains("does_not_exist.wav") || message == UNKNOWN_ERROR,
                "{message}"
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!Path::new(&video).exists());
}
