//! STATUSTEXT Notification Queue
//!
//! Collects operator-facing status messages from the handlers and hands them
//! to the link driver, which drains them into STATUSTEXT packets on every
//! open channel.
//!
//! The queue is a bounded FIFO owned by the dispatcher — not a global — so it
//! needs no synchronization in the single cooperative control loop. When the
//! queue is full the newest message is dropped and counted.

use heapless::{Deque, String};
use mavlink::common::{MavSeverity, STATUSTEXT_DATA};

/// MAVLink STATUSTEXT text field size
const STATUSTEXT_LEN: usize = 50;

/// Queue capacity
const QUEUE_SIZE: usize = 16;

/// One queued operator message
#[derive(Debug, Clone)]
struct QueuedText {
    severity: MavSeverity,
    text: String<STATUSTEXT_LEN>,
}

/// Bounded queue of severity-tagged operator messages
pub struct StatusNotifier {
    queue: Deque<QueuedText, QUEUE_SIZE>,
    /// Messages dropped because the queue was full
    dropped: u32,
}

impl StatusNotifier {
    pub const fn new() -> Self {
        Self {
            queue: Deque::new(),
            dropped: 0,
        }
    }

    /// Queue a message at the given severity.
    ///
    /// Text longer than the 50-character STATUSTEXT field is truncated.
    pub fn send_text(&mut self, severity: MavSeverity, text: &str) {
        let mut buf: String<STATUSTEXT_LEN> = String::new();
        for c in text.chars() {
            if buf.push(c).is_err() {
                break;
            }
        }

        if self
            .queue
            .push_back(QueuedText {
                severity,
                text: buf,
            })
            .is_err()
        {
            self.dropped = self.dropped.wrapping_add(1);
        }
    }

    pub fn send_info(&mut self, text: &str) {
        self.send_text(MavSeverity::MAV_SEVERITY_INFO, text);
    }

    pub fn send_warning(&mut self, text: &str) {
        self.send_text(MavSeverity::MAV_SEVERITY_WARNING, text);
    }

    pub fn send_error(&mut self, text: &str) {
        self.send_text(MavSeverity::MAV_SEVERITY_ERROR, text);
    }

    /// Number of messages waiting to be drained
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Messages dropped due to queue overflow
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Drain all queued messages into STATUSTEXT payloads
    pub fn take_pending(&mut self) -> heapless::Vec<STATUSTEXT_DATA, QUEUE_SIZE> {
        let mut out = heapless::Vec::new();
        while let Some(entry) = self.queue.pop_front() {
            let mut text = [0u8; STATUSTEXT_LEN];
            let bytes = entry.text.as_bytes();
            text[..bytes.len()].copy_from_slice(bytes);

            let _ = out.push(STATUSTEXT_DATA {
                severity: entry.severity,
                text,
                id: 0,
                chunk_seq: 0,
            });
        }
        out
    }
}

impl Default for StatusNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_and_drain() {
        let mut notifier = StatusNotifier::new();
        notifier.send_info("Initialising");
        notifier.send_warning("Low battery");
        assert_eq!(notifier.pending(), 2);

        let pending = notifier.take_pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].severity, MavSeverity::MAV_SEVERITY_INFO);
        assert_eq!(&pending[0].text[..12], b"Initialising");
        assert_eq!(pending[1].severity, MavSeverity::MAV_SEVERITY_WARNING);
        assert_eq!(notifier.pending(), 0);
    }

    #[test]
    fn test_truncates_long_text() {
        let mut notifier = StatusNotifier::new();
        let long = "X".repeat(80);
        notifier.send_error(&long);

        let pending = notifier.take_pending();
        assert_eq!(pending.len(), 1);
        assert!(pending[0].text.iter().all(|&b| b == b'X'));
    }

    #[test]
    fn test_overflow_counts_drops() {
        let mut notifier = StatusNotifier::new();
        for i in 0..(QUEUE_SIZE + 3) {
            notifier.send_info(if i % 2 == 0 { "even" } else { "odd" });
        }
        assert_eq!(notifier.pending(), QUEUE_SIZE);
        assert_eq!(notifier.dropped(), 3);
    }
}
