//! Camera and microphone ownership.
//!
//! A page that acquires devices owns the tracks exclusively through a
//! `CaptureSession`; every track is stopped when the page releases it or
//! when the session is dropped on teardown.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

/// One live device stream.
pub trait MediaTrack {
    fn kind(&self) -> TrackKind;
    fn is_live(&self) -> bool;
    fn stop(&mut self);
}

pub struct CaptureSession<T: MediaTrack> {
    tracks: Vec<T>,
}

impl<T: MediaTrack> CaptureSession<T> {
    pub fn new(tracks: Vec<T>) -> Self {
        debug!(tracks = tracks.len(), "Capture devices acquired");
        Self { tracks }
    }

    pub fn tracks(&self) -> &[T] {
        &self.tracks
    }

    pub fn has(&self, kind: TrackKind) -> bool {
        self.tracks.iter().any(|t| t.kind() == kind && t.is_live())
    }

    /// Stops every live track. Safe to call more than once.
    pub fn release(&mut self) {
        let mut stopped = 0;
        for track in self.tracks.iter_mut().filter(|t| t.is_live()) {
            track.stop();
            stopped += 1;
        }
        if stopped > 0 {
            debug!(stopped, "Capture devices released");
        }
    }
}

impl<T: MediaTrack> Drop for CaptureSession<T> {
    fn drop(&mut self) {
        self.release();
    }
}
