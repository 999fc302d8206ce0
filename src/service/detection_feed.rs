// src/service/detection_feed.rs
//! Bounded display buffer of raw detections for the monitoring panel.
//!
//! Most recent first, capped (10 by default). Purely presentational: the
//! alert registry remains the system of record.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::domain::model::detection::DetectionEvent;

pub const DEFAULT_FEED_CAPACITY: usize = 10;

/// How many detections the panel actually renders.
pub const VISIBLE_DETECTIONS: usize = 5;

pub struct DetectionFeed {
    capacity: usize,
    events: Mutex<VecDeque<DetectionEvent>>,
}

impl Default for DetectionFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

impl DetectionFeed {
    /// A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            events: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&self, event: DetectionEvent) {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        events.push_front(event);
        events.truncate(self.capacity);
    }

    pub fn latest(&self) -> Vec<DetectionEvent> {
        self.visible(self.capacity)
    }

    pub fn visible(&self, n: usize) -> Vec<DetectionEvent> {
        let events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        events.iter().take(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}
