// SPDX-License-Identifier: GPL-3.0-only

//! Raw depth recordings
//!
//! A recording is a 16-byte header followed by whole frames of
//! `width * height` native-endian `u16` samples in millimetres. A recording
//! holds at least one whole frame; a truncated trailing frame is ignored.
//!
//! Unpaced playback hands out one frame per poll. Paced playback follows the
//! wall clock: a frame is only reported once its slot has arrived, and frames
//! whose slot passed between two polls are skipped, matching what a live
//! sensor does when the caller falls behind.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::{CameraIntrinsics, DepthSource};
use crate::constants::recording;
use crate::errors::{AppError, AppResult, SourceError};
use crate::tracker::Vec3;
use crate::tracker::grid::{DepthGrid, Grid};

/// On-disk recording header
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RecordingHeader {
    pub magic: [u8; 4],
    pub version: u32,
    pub width: u32,
    pub height: u32,
}

impl RecordingHeader {
    pub const SIZE: u64 = std::mem::size_of::<RecordingHeader>() as u64;

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            magic: recording::MAGIC,
            version: recording::VERSION,
            width: width as u32,
            height: height as u32,
        }
    }

    /// Size of one frame in bytes
    pub fn frame_bytes(&self) -> u64 {
        (u64::from(self.width) * u64::from(self.height)).saturating_mul(2)
    }

    /// Check the header against the payload that follows it
    ///
    /// Runs before any frame buffer is allocated.
    fn validate(&self, payload_len: u64) -> Result<(), SourceError> {
        if self.magic != recording::MAGIC {
            return Err(SourceError::InvalidHeader(format!(
                "bad magic {:?}",
                self.magic
            )));
        }
        if self.version != recording::VERSION {
            return Err(SourceError::InvalidHeader(format!(
                "unsupported version {}",
                self.version
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(SourceError::InvalidHeader(format!(
                "empty frame size {}x{}",
                self.width, self.height
            )));
        }
        let pixels = u64::from(self.width)
            .checked_mul(u64::from(self.height))
            .filter(|&pixels| pixels <= recording::MAX_FRAME_PIXELS)
            .ok_or_else(|| {
                SourceError::InvalidHeader(format!(
                    "frame size {}x{} is too large",
                    self.width, self.height
                ))
            })?;
        if pixels * 2 > payload_len {
            return Err(SourceError::InvalidHeader(format!(
                "{}x{} frame does not fit in {} bytes of data",
                self.width, self.height, payload_len
            )));
        }
        Ok(())
    }
}

/// Wall-clock pacing state
#[derive(Debug, Clone, Copy)]
struct Pacing {
    fps: f64,
    started: Option<Instant>,
}

/// Depth source reading frames from a recording file
pub struct RecordingSource {
    path: PathBuf,
    reader: BufReader<File>,
    header: RecordingHeader,
    frame_count: usize,
    intrinsics: CameraIntrinsics,
    current: DepthGrid,
    scratch: DepthGrid,
    /// Sequence number of the next frame slot to deliver
    next_slot: usize,
    pacing: Option<Pacing>,
    looping: bool,
    finished: bool,
}

impl RecordingSource {
    /// Open a recording for unpaced playback
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)
            .map_err(|e| SourceError::OpenFailed(format!("{}: {}", path.display(), e)))?;
        let file_len = file
            .metadata()
            .map_err(|e| SourceError::OpenFailed(format!("{}: {}", path.display(), e)))?
            .len();
        let mut reader = BufReader::new(file);

        let mut header = RecordingHeader::new(0, 0);
        reader
            .read_exact(bytemuck::bytes_of_mut(&mut header))
            .map_err(|e| SourceError::InvalidHeader(e.to_string()))?;
        header.validate(file_len.saturating_sub(RecordingHeader::SIZE))?;

        let frame_count =
            (file_len.saturating_sub(RecordingHeader::SIZE) / header.frame_bytes()) as usize;
        let width = header.width as usize;
        let height = header.height as usize;

        info!(
            path = %path.display(),
            width,
            height,
            frame_count,
            "Opened depth recording"
        );

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            header,
            frame_count,
            intrinsics: CameraIntrinsics::for_resolution(width, height),
            current: Grid::new(width, height),
            scratch: Grid::new(width, height),
            next_slot: 0,
            pacing: None,
            looping: false,
            finished: false,
        })
    }

    /// Follow the wall clock at `fps` frames per second
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.pacing = (fps > 0.0).then_some(Pacing { fps, started: None });
        self
    }

    /// Restart from the first frame after the last one
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_intrinsics(mut self, intrinsics: CameraIntrinsics) -> Self {
        self.intrinsics = intrinsics;
        self
    }

    pub fn header(&self) -> &RecordingHeader {
        &self.header
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether playback has ended (never true when looping)
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Poll for a new frame as of `now`
    pub fn poll_at(&mut self, now: Instant) -> bool {
        if self.finished {
            return false;
        }
        if let Some(pacing) = self.pacing.as_mut() {
            pacing.started.get_or_insert(now);
        }
        let slot = self.slot_at(now);
        if self.pacing.is_some() {
            if slot < self.next_slot {
                return false;
            }
            if slot > self.next_slot {
                debug!(
                    dropped = slot - self.next_slot,
                    "Skipping frames that arrived between polls"
                );
            }
        }

        let index = if self.looping {
            slot % self.frame_count
        } else if slot < self.frame_count {
            slot
        } else {
            info!(path = %self.path.display(), "Recording finished");
            self.finished = true;
            return false;
        };

        match self.read_frame(index) {
            Ok(()) => {
                std::mem::swap(&mut self.current, &mut self.scratch);
                self.next_slot = slot + 1;
                true
            }
            Err(e) => {
                warn!(path = %self.path.display(), index, error = %e, "Stopping playback");
                self.finished = true;
                false
            }
        }
    }

    /// Frame slot a poll at `now` would deliver
    ///
    /// Unpaced playback counts one slot per delivered frame. Paced playback
    /// follows the wall clock from the first poll and may run ahead of the
    /// frames actually delivered.
    pub fn slot_at(&self, now: Instant) -> usize {
        match self.pacing {
            None => self.next_slot,
            Some(Pacing { started: None, .. }) => 0,
            Some(Pacing {
                fps,
                started: Some(started),
            }) => {
                let elapsed = now.saturating_duration_since(started);
                (elapsed.as_secs_f64() * fps).floor() as usize
            }
        }
    }

    fn read_frame(&mut self, index: usize) -> Result<(), SourceError> {
        let offset = RecordingHeader::SIZE + index as u64 * self.header.frame_bytes();
        self.reader.seek(SeekFrom::Start(offset))?;
        self.reader
            .read_exact(bytemuck::cast_slice_mut(self.scratch.as_mut_slice()))?;
        Ok(())
    }

    /// Expected duration of one frame slot when paced
    pub fn frame_interval(&self) -> Option<Duration> {
        self.pacing
            .map(|pacing| Duration::from_secs_f64(1.0 / pacing.fps))
    }
}

impl DepthSource for RecordingSource {
    fn width(&self) -> usize {
        self.header.width as usize
    }

    fn height(&self) -> usize {
        self.header.height as usize
    }

    fn has_new_frame(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    fn depth_grid(&self) -> &DepthGrid {
        &self.current
    }

    fn world_coordinate_at(&self, x: usize, y: usize, raw: u16) -> Vec3 {
        self.intrinsics.unproject(x, y, raw)
    }
}

/// Writes depth frames into a recording file
pub struct RecordingWriter {
    writer: BufWriter<File>,
    header: RecordingHeader,
    frames: usize,
}

impl RecordingWriter {
    pub fn create(path: &Path, width: usize, height: usize) -> AppResult<Self> {
        let header = RecordingHeader::new(width, height);
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(bytemuck::bytes_of(&header))?;
        debug!(path = %path.display(), width, height, "Created depth recording");
        Ok(Self {
            writer,
            header,
            frames: 0,
        })
    }

    pub fn write_frame(&mut self, frame: &DepthGrid) -> AppResult<()> {
        let expected = (self.header.width as usize, self.header.height as usize);
        if (frame.width(), frame.height()) != expected {
            return Err(AppError::Source(SourceError::DimensionMismatch {
                expected,
                actual: (frame.width(), frame.height()),
            }));
        }
        self.writer
            .write_all(bytemuck::cast_slice(frame.as_slice()))?;
        self.frames += 1;
        Ok(())
    }

    /// Flush and return the number of frames written
    pub fn finish(mut self) -> AppResult<usize> {
        self.writer.flush()?;
        Ok(self.frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_recording(frames: &[u16], width: usize, height: usize) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "depth_tracker_rec_{}_{}.depth",
            std::process::id(),
            frames.iter().map(|f| f.to_string()).collect::<Vec<_>>().join("_")
        ));
        let mut writer = RecordingWriter::create(&path, width, height).unwrap();
        for &depth in frames {
            writer
                .write_frame(&Grid::filled(width, height, depth))
                .unwrap();
        }
        assert_eq!(writer.finish().unwrap(), frames.len());
        path
    }

    #[test]
    fn test_header_is_sixteen_bytes() {
        assert_eq!(RecordingHeader::SIZE, 16);
        assert_eq!(RecordingHeader::new(640, 480).frame_bytes(), 640 * 480 * 2);
    }

    #[test]
    fn test_unpaced_playback_then_finish() {
        let path = temp_recording(&[11, 12, 13], 4, 3);
        let mut source = RecordingSource::open(&path).unwrap();
        assert_eq!(source.frame_count(), 3);

        for expected in [11u16, 12, 13] {
            assert!(source.has_new_frame());
            assert!(source.depth_grid().as_slice().iter().all(|&d| d == expected));
        }
        assert!(!source.has_new_frame());
        assert!(source.is_finished());
        // Last frame remains available after the end
        assert_eq!(source.depth_grid().as_slice()[0], 13);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_looping_wraps_around() {
        let path = temp_recording(&[21, 22], 2, 2);
        let mut source = RecordingSource::open(&path).unwrap().with_looping(true);

        let seen: Vec<u16> = (0..5)
            .map(|_| {
                assert!(source.has_new_frame());
                source.depth_grid().as_slice()[0]
            })
            .collect();
        assert_eq!(seen, vec![21, 22, 21, 22, 21]);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_paced_playback_drops_missed_frames() {
        let path = temp_recording(&[31, 32, 33, 34, 35], 2, 1);
        let mut source = RecordingSource::open(&path).unwrap().with_fps(10.0);
        let start = Instant::now();

        assert!(source.poll_at(start));
        assert_eq!(source.depth_grid().as_slice()[0], 31);

        // Same slot: nothing new
        assert!(!source.poll_at(start + Duration::from_millis(50)));

        // Three slots later: frames 32 and 33 are skipped
        assert!(source.poll_at(start + Duration::from_millis(350)));
        assert_eq!(source.depth_grid().as_slice()[0], 34);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_rejects_oversized_header() {
        let path = std::env::temp_dir().join(format!(
            "depth_tracker_huge_{}.depth",
            std::process::id()
        ));
        let mut header = RecordingHeader::new(0, 0);
        header.width = u32::MAX;
        header.height = u32::MAX;
        std::fs::write(&path, bytemuck::bytes_of(&header)).unwrap();
        assert!(matches!(
            RecordingSource::open(&path),
            Err(SourceError::InvalidHeader(_))
        ));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_rejects_frame_larger_than_file() {
        let path = std::env::temp_dir().join(format!(
            "depth_tracker_short_{}.depth",
            std::process::id()
        ));
        let mut bytes = bytemuck::bytes_of(&RecordingHeader::new(4, 4)).to_vec();
        // Half a frame of data
        bytes.extend_from_slice(&[0u8; 16]);
        std::fs::write(&path, bytes).unwrap();
        assert!(matches!(
            RecordingSource::open(&path),
            Err(SourceError::InvalidHeader(_))
        ));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_slot_follows_clock_when_paced() {
        let path = temp_recording(&[41, 42, 43, 44, 45], 2, 1);
        let mut source = RecordingSource::open(&path).unwrap().with_fps(10.0);
        let start = Instant::now();
        assert_eq!(source.slot_at(start), 0);

        assert!(source.poll_at(start));
        // Ahead of the one frame delivered so far
        assert_eq!(source.slot_at(start + Duration::from_millis(350)), 3);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_slot_counts_frames_when_unpaced() {
        let path = temp_recording(&[51, 52, 53], 2, 1);
        let mut source = RecordingSource::open(&path).unwrap();
        let now = Instant::now();
        assert!(source.poll_at(now));
        assert!(source.poll_at(now));
        assert_eq!(source.slot_at(now), 2);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_rejects_non_recording() {
        let path = std::env::temp_dir().join(format!(
            "depth_tracker_bogus_{}.depth",
            std::process::id()
        ));
        std::fs::write(&path, b"not a depth recording").unwrap();
        assert!(matches!(
            RecordingSource::open(&path),
            Err(SourceError::InvalidHeader(_))
        ));
        std::fs::remove_file(path).ok();
    }
}
