//! Command-line detector: classify one media file and print the JSON
//! result shape.
//!
//! Usage: detect <checkpoint.safetensors> <media-file>
//!
//! The media path's extension picks the pipeline: video containers (and
//! animated GIF) go through the video detector, still-image formats
//! through the image detector.

use argus_base::{init_stdout_logger, log_fatal};
use argus_infer::Inference;
use std::path::Path;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "gif"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "webp"];

fn main() {
    init_stdout_logger();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: detect <checkpoint.safetensors> <media-file>");
        std::process::exit(2);
    }
    let checkpoint = &args[1];
    let media_path = Path::new(&args[2]);

    let extension = media_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let media = match std::fs::read(media_path) {
        Ok(bytes) => bytes,
        Err(e) => log_fatal!("failed to read {}: {e}", media_path.display()),
    };

    let inference = Inference::cpu();

    let json = if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        let detector = match inference.use_video_detector(checkpoint) {
            Ok(d) => d,
            Err(e) => log_fatal!("failed to load video detector: {e}"),
        };
        match detector.run(&media) {
            Ok(result) => serde_json::to_string_pretty(&result),
            Err(e) => log_fatal!("video detection failed: {e}"),
        }
    } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        let detector = match inference.use_image_detector(checkpoint) {
            Ok(d) => d,
            Err(e) => log_fatal!("failed to load image detector: {e}"),
        };
        match detector.run(&media) {
            Ok(result) => serde_json::to_string_pretty(&result),
            Err(e) => log_fatal!("image detection failed: {e}"),
        }
    } else {
        log_fatal!("unsupported media extension: {:?}", extension);
    };

    match json {
        Ok(json) => println!("{json}"),
        Err(e) => log_fatal!("failed to serialize result: {e}"),
    }
}
