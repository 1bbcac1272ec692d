use crate::decoder::{FrameRead, MediaDecoder, RawFrameRead};
use crate::VideoError;
use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

/// Video decode backend that shells out to `ffmpeg`.
///
/// Decodes any container ffmpeg understands (MP4, MOV, AVI, MKV, animated
/// GIF) into a stream of raw `rgb24` frames on stdout, scaled to the target
/// size with bilinear filtering. One child process per opened media file;
/// the child is killed if the reader is dropped before the stream ends.
#[derive(Debug, Clone)]
pub struct FfmpegDecoder {
    program: String,
}

impl FfmpegDecoder {
    pub fn new() -> Self {
        Self {
            program: "ffmpeg".to_string(),
        }
    }

    /// Use a non-default ffmpeg executable (absolute path or $PATH name).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl Default for FfmpegDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaDecoder for FfmpegDecoder {
    fn open(
        &self,
        media: &Path,
        target: (usize, usize),
    ) -> Result<Box<dyn RawFrameRead>, VideoError> {
        let (height, width) = target;

        log::debug!(
            "spawning {} for {} at {}x{}",
            self.program,
            media.display(),
            width,
            height
        );

        // -vsync 0 keeps one output frame per decoded frame; without it
        // ffmpeg may duplicate or drop frames to hit a constant rate.
        let mut child = Command::new(&self.program)
            .arg("-v")
            .arg("error")
            .arg("-nostdin")
            .arg("-i")
            .arg(media)
            .arg("-f")
            .arg("rawvideo")
            .arg("-pix_fmt")
            .arg("rgb24")
            .arg("-vsync")
            .arg("0")
            .arg("-vf")
            .arg(format!("scale={width}:{height}:flags=bilinear"))
            .arg("-")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    VideoError::Decoder(format!("{} not found on PATH", self.program))
                } else {
                    VideoError::Decoder(format!("failed to launch {}: {e}", self.program))
                }
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| VideoError::Decoder("ffmpeg stdout was not captured".to_string()))?;

        Ok(Box::new(FfmpegFrameRead {
            child,
            stdout: Some(stdout),
            finished: false,
        }))
    }
}

struct FfmpegFrameRead {
    child: Child,
    stdout: Option<ChildStdout>,
    finished: bool,
}

impl RawFrameRead for FfmpegFrameRead {
    fn read_frame(&mut self, buf: &mut [u8]) -> Result<FrameRead, VideoError> {
        let stdout = match self.stdout.as_mut() {
            Some(s) => s,
            None => return Ok(FrameRead::Eof),
        };

        let mut filled = 0;
        while filled < buf.len() {
            let n = stdout.read(&mut buf[filled..])?;
            if n == 0 {
                if filled == 0 {
                    return Ok(FrameRead::Eof);
                }
                return Err(VideoError::Truncated {
                    expected: buf.len(),
                    got: filled,
                });
            }
            filled += n;
        }
        Ok(FrameRead::Full)
    }

    fn finish(&mut self) -> Result<(), VideoError> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        // Close our end of the pipe so the child cannot block on writes.
        drop(self.stdout.take());

        // Drain stderr before wait to avoid deadlocking a chatty child.
        let mut detail = String::new();
        if let Some(mut stderr) = self.child.stderr.take() {
            stderr.read_to_string(&mut detail).ok();
        }

        let status = self.child.wait()?;
        if status.success() {
            Ok(())
        } else {
            let detail = detail.trim();
            let msg = if detail.is_empty() {
                format!("decoder exited with {status}")
            } else {
                format!("decoder exited with {status}: {detail}")
            };
            Err(VideoError::Unreadable(msg))
        }
    }
}

impl Drop for FfmpegFrameRead {
    fn drop(&mut self) {
        if !self.finished {
            self.child.kill().ok();
            self.child.wait().ok();
        }
    }
}
