// Transient notifications shown after user actions

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Posting sequence number
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub expires_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// Bounded FIFO of notifications, kept sorted by expiry.
///
/// When full, the oldest posted notification is evicted, so a capacity of 1
/// behaves as a single slot that each new message overwrites.
#[derive(Debug)]
pub struct NotificationQueue {
    items: VecDeque<Notification>,
    capacity: usize,
    next_id: u64,
}

impl NotificationQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            capacity: capacity.max(1),
            next_id: 0,
        }
    }

    /// Post a notification that lives for `ttl` starting at `now`
    pub fn push(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        ttl: Duration,
        now: Instant,
    ) -> u64 {
        self.next_id += 1;
        let notification = Notification {
            id: self.next_id,
            kind,
            message: message.into(),
            expires_at: now + ttl,
        };

        // insert after every entry expiring no later than this one
        let at = self
            .items
            .iter()
            .position(|n| n.expires_at > notification.expires_at)
            .unwrap_or(self.items.len());
        self.items.insert(at, notification);

        while self.items.len() > self.capacity {
            if let Some(oldest) = self
                .items
                .iter()
                .enumerate()
                .min_by_key(|(_, n)| n.id)
                .map(|(idx, _)| idx)
            {
                self.items.remove(oldest);
            }
        }

        self.next_id
    }

    /// Drop expired notifications, returning how many were removed
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.items.len();
        self.items.retain(|n| !n.is_expired(now));
        before - self.items.len()
    }

    /// Live notifications in expiry order
    pub fn active(&self, now: Instant) -> Vec<Notification> {
        self.items
            .iter()
            .filter(|n| !n.is_expired(now))
            .cloned()
            .collect()
    }

    pub fn next_expiry(&self) -> Option<Instant> {
        self.items.front().map(|n| n.expires_at)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
