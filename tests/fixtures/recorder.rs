//! Listeners and frame schedulers that record what the player does.

use std::cell::RefCell;
use std::rc::Rc;

use route_playback::traits::{FrameScheduler, FrameToken, PlaybackListener};
use route_playback::{PlaybackFrame, Segment};

#[derive(Debug, Default)]
pub struct Recorded {
    pub frames: Vec<PlaybackFrame>,
    pub segment_changes: Vec<(usize, Segment)>,
    pub resets: usize,
}

/// Shares everything it receives through an `Rc<RefCell<_>>`.
#[derive(Clone, Default)]
pub struct Recorder(pub Rc<RefCell<Recorded>>);

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener(&self) -> Box<dyn PlaybackListener> {
        Box::new(self.clone())
    }

    pub fn frame_count(&self) -> usize {
        self.0.borrow().frames.len()
    }

    pub fn last_frame(&self) -> Option<PlaybackFrame> {
        self.0.borrow().frames.last().cloned()
    }

    pub fn segment_indices(&self) -> Vec<usize> {
        self.0.borrow().segment_changes.iter().map(|(i, _)| *i).collect()
    }
}

impl PlaybackListener for Recorder {
    fn on_frame(&mut self, frame: &PlaybackFrame) {
        self.0.borrow_mut().frames.push(frame.clone());
    }

    fn on_segment_change(&mut self, index: usize, segment: &Segment) {
        self.0.borrow_mut().segment_changes.push((index, segment.clone()));
    }

    fn on_reset(&mut self) {
        self.0.borrow_mut().resets += 1;
    }
}

/// A host that cannot unregister frame callbacks: every requested token is
/// eventually delivered, cancelled or not.
#[derive(Debug, Default)]
pub struct UncancellableFrames {
    pub requested: Vec<FrameToken>,
    pub cancelled: Vec<FrameToken>,
}

impl FrameScheduler for UncancellableFrames {
    fn request_frame(&mut self, token: FrameToken) {
        self.requested.push(token);
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.cancelled.push(token);
    }
}
