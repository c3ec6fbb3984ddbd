//! Transient "current instruction" card shown when the active segment
//! changes.

use crate::route::Segment;

/// Shows the latest segment for a fixed dwell, then hides it. Driven by the
/// host's clock so it can be tested with simulated time.
#[derive(Debug, Clone)]
pub struct InstructionOverlay {
    dwell_secs: f64,
    current: Option<Shown>,
}

#[derive(Debug, Clone)]
struct Shown {
    index: usize,
    segment: Segment,
    since: f64,
}

impl InstructionOverlay {
    pub fn new(dwell_secs: f64) -> Self {
        Self {
            dwell_secs,
            current: None,
        }
    }

    /// Shows `segment` from `now`, replacing anything visible and
    /// restarting the dwell.
    pub fn show(&mut self, index: usize, segment: &Segment, now: f64) {
        self.current = Some(Shown {
            index,
            segment: segment.clone(),
            since: now,
        });
    }

    /// The visible segment at `now`, if its dwell has not run out.
    pub fn visible(&self, now: f64) -> Option<(usize, &Segment)> {
        let shown = self.current.as_ref()?;
        (now - shown.since < self.dwell_secs).then_some((shown.index, &shown.segment))
    }

    /// Drops the card once its dwell has elapsed. Returns whether it is
    /// still visible.
    pub fn expire(&mut self, now: f64) -> bool {
        if self.visible(now).is_none() {
            self.current = None;
        }
        self.current.is_some()
    }

    pub fn hide(&mut self) {
        self.current = None;
    }
}
