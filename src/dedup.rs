use crate::signal::ScanCode;
use std::time::{Duration, Instant};

/// A held button retransmits its code every few tens of milliseconds; this
/// is the window within which repeats of the same code count as one press.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Suppress repeats of the same scancode within the debounce window. This
/// only looks at the code and its recency, not which remote sent it.
#[derive(Debug)]
pub struct SignalDeduplicator {
    window: Duration,
    last: Option<(ScanCode, Instant)>,
}

impl Default for SignalDeduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SignalDeduplicator {
    pub fn new(window: Duration) -> Self {
        SignalDeduplicator { window, last: None }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns true if the scancode should be passed on. Accepted scancodes
    /// restart the window.
    pub fn filter(&mut self, scancode: ScanCode, now: Instant) -> bool {
        if let Some((last_scancode, last_time)) = self.last {
            if last_scancode == scancode && now.saturating_duration_since(last_time) < self.window {
                return false;
            }
        }

        self.last = Some((scancode, now));

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn first_is_accepted() {
        let mut dedup = SignalDeduplicator::default();

        assert!(dedup.filter(0x20df02fd, Instant::now()));
    }

    #[test]
    fn repeat_within_window() {
        let mut dedup = SignalDeduplicator::default();
        let start = Instant::now();

        assert!(dedup.filter(0x20df02fd, start));
        assert!(!dedup.filter(0x20df02fd, start + ms(40)));
        assert!(!dedup.filter(0x20df02fd, start + ms(149)));
    }

    #[test]
    fn repeat_after_window() {
        let mut dedup = SignalDeduplicator::default();
        let start = Instant::now();

        assert!(dedup.filter(0x20df02fd, start));
        assert!(dedup.filter(0x20df02fd, start + ms(150)));
        assert!(dedup.filter(0x20df02fd, start + ms(400)));
    }

    #[test]
    fn suppressed_repeats_do_not_extend_window() {
        let mut dedup = SignalDeduplicator::default();
        let start = Instant::now();

        assert!(dedup.filter(7, start));
        assert!(!dedup.filter(7, start + ms(100)));
        // 150ms after the accepted one, even though the last repeat was 50ms ago
        assert!(dedup.filter(7, start + ms(150)));
    }

    #[test]
    fn different_codes_always_pass() {
        let mut dedup = SignalDeduplicator::default();
        let start = Instant::now();

        assert!(dedup.filter(1, start));
        assert!(dedup.filter(2, start));
        assert!(dedup.filter(1, start + ms(1)));
        // the last accepted code is now 1
        assert!(!dedup.filter(1, start + ms(2)));
        assert!(dedup.filter(2, start + ms(3)));
    }

    #[test]
    fn custom_window() {
        let mut dedup = SignalDeduplicator::new(ms(10));
        let start = Instant::now();

        assert_eq!(dedup.window(), ms(10));
        assert!(dedup.filter(3, start));
        assert!(!dedup.filter(3, start + ms(9)));
        assert!(dedup.filter(3, start + ms(10)));
    }
}
