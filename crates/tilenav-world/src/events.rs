//! "Grid refreshed" notifications.
//!
//! Each subscriber owns the receiving end of its own unbounded channel.
//! Subscribers whose receiver was dropped are pruned on the next broadcast.

use crossbeam_channel::{Receiver, Sender};

/// Sent after the current pathfinder has been replaced.
///
/// Receivers should re-fetch the pathfinder from their
/// [`SharedPathfinder`](crate::SharedPathfinder) and replan any path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridRefreshed;

/// Publisher side of the refresh notifications.
#[derive(Debug, Default)]
pub struct GridEvents {
    subscribers: Vec<Sender<GridRefreshed>>,
}

impl GridEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber.
    pub fn subscribe(&mut self) -> Receiver<GridRefreshed> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Notify every live subscriber. Returns how many were notified.
    pub fn broadcast(&mut self) -> usize {
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(GridRefreshed).is_ok());
        let dropped = before - self.subscribers.len();
        if dropped > 0 {
            log::debug!("grid events: dropped {dropped} closed subscribers");
        }
        self.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
