//! FFmpeg CLI wrapper for video probing and frame sampling.
//!
//! This crate provides:
//! - FFprobe-based video inspection
//! - Strided frame extraction as JPEG payloads with per-frame timestamps
//!
//! The decoder itself is treated as an external collaborator: both
//! operations shell out to `ffprobe`/`ffmpeg` discovered on `PATH`.

pub mod error;
pub mod frames;
pub mod probe;

pub use error::{MediaError, MediaResult};
pub use frames::{sample_frames, SampledFrame, DEFAULT_FRAME_STRIDE};
pub use probe::{probe_video, VideoInfo};
