//! Strided frame extraction.
//!
//! Decodes a video sequentially and keeps every N-th frame as a JPEG
//! payload, attributing to each kept frame the timestamp
//! `original_index / fps` with the reported frame rate truncated to an
//! integer.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};
use crate::probe::probe_video;

/// Default sampling stride (keep one frame out of every 15 decoded).
pub const DEFAULT_FRAME_STRIDE: u64 = 15;

/// One retained frame.
#[derive(Debug, Clone)]
pub struct SampledFrame {
    /// Zero-based index of this frame in the original decode order
    pub index: u64,
    /// Offset from video start, in seconds
    pub timestamp: f64,
    /// JPEG-encoded image data
    pub jpeg: Vec<u8>,
}

/// Extract every `stride`-th frame of `path` as JPEG, in decode order.
///
/// Returns the retained frames with their timestamps. A video that yields
/// zero decodable frames produces an empty vector, not an error; decoding
/// stops at end-of-stream or the first unreadable frame. Fails with
/// `UnreadableVideo` only when the input cannot be opened at all.
pub async fn sample_frames(path: impl AsRef<Path>, stride: u64) -> MediaResult<Vec<SampledFrame>> {
    let path = path.as_ref();
    let stride = stride.max(1);

    let info = probe_video(path).await?;

    // Timestamp math matches playback tooling downstream: integer fps.
    let fps = info.fps as u64;
    if fps == 0 {
        return Err(MediaError::UnreadableVideo(format!(
            "{} reports a frame rate below 1 fps",
            path.display()
        )));
    }

    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

    let staging = tempfile::tempdir()?;
    let pattern = staging.path().join("frame_%06d.jpg");

    let output = Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .arg("-vf")
        .arg(format!("select=not(mod(n\\,{}))", stride))
        .args(["-vsync", "vfr", "-q:v", "2"])
        .arg(&pattern)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        // A truncated or partially corrupt stream still yields the frames
        // decoded before the failure point.
        warn!(
            video = %path.display(),
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "ffmpeg exited non-zero during frame extraction; keeping frames decoded so far"
        );
    }

    let mut names: Vec<String> = Vec::new();
    let mut entries = tokio::fs::read_dir(staging.path()).await?;
    while let Some(entry) = entries.next_entry().await? {
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(".jpg") {
                names.push(name.to_string());
            }
        }
    }
    // frame_%06d names sort lexicographically in decode order
    names.sort();

    let mut frames = Vec::with_capacity(names.len());
    for (k, name) in names.iter().enumerate() {
        let jpeg = tokio::fs::read(staging.path().join(name)).await?;
        let index = k as u64 * stride;
        frames.push(SampledFrame {
            index,
            timestamp: frame_timestamp(index, fps),
            jpeg,
        });
    }

    debug!(
        video = %path.display(),
        stride,
        fps,
        frames = frames.len(),
        "Sampled frames"
    );

    Ok(frames)
}

/// Timestamp of an original frame index at an integer frame rate.
fn frame_timestamp(index: u64, fps: u64) -> f64 {
    index as f64 / fps as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_timestamp_follows_stride() {
        // frames[k] carries original index k*stride and timestamp (k*stride)/fps
        let stride = 15u64;
        let fps = 30u64;
        for k in 0..10u64 {
            let index = k * stride;
            let ts = frame_timestamp(index, fps);
            assert!((ts - (k as f64 * 0.5)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_frame_timestamp_truncated_fps() {
        // 29.97 fps is truncated to 29 before division
        let fps = 29.97_f64 as u64;
        assert_eq!(fps, 29);
        assert!((frame_timestamp(29, fps) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_frame_names_sort_in_decode_order() {
        let mut names = vec![
            "frame_000010.jpg".to_string(),
            "frame_000002.jpg".to_string(),
            "frame_000001.jpg".to_string(),
        ];
        names.sort();
        assert_eq!(names[0], "frame_000001.jpg");
        assert_eq!(names[2], "frame_000010.jpg");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let err = sample_frames("/nonexistent/video.mp4", DEFAULT_FRAME_STRIDE)
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
