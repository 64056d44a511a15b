//! Derives the typing rhythm from raw key timestamps.
mod config;
mod history;

pub use config::CadenceConfig;
pub use history::KeyHistory;

use tracing::{debug, instrument, trace};

use crate::{config::ConfigError, throttle::Throttle, Error, Millis};

/// The typing metrics at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CadenceSnapshot {
    /// The most recent inter-key interval. `None` until two keys got pressed.
    pub last_iki_ms: Option<Millis>,

    /// Exponential moving average of the inter-key interval.
    pub ema_iki_ms: Option<Millis>,

    /// Words per minute within the trailing window.
    pub wpm_10s: f64,

    /// Timestamp of the most recent key.
    pub last_key_at: Option<Millis>,
}

impl CadenceSnapshot {
    /// The interval the mappers should react to: the smoothed one if available.
    pub fn iki_ms(&self) -> Option<Millis> {
        self.ema_iki_ms.or(self.last_iki_ms)
    }
}

/// Consumes key timestamps and keeps track of the typing rhythm.
///
/// # Example
/// ```
/// use keytide::cadence::{CadenceConfig, CadenceTracker};
///
/// let mut tracker = CadenceTracker::new(CadenceConfig::default()).unwrap();
/// tracker.start().unwrap();
///
/// tracker.on_key_event(0.);
/// tracker.on_key_event(100.);
/// tracker.on_key_event(250.);
///
/// let snapshot = tracker.snapshot();
/// assert_eq!(snapshot.last_iki_ms, Some(150.));
/// assert!((snapshot.ema_iki_ms.unwrap() - 110.).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct CadenceTracker {
    config: CadenceConfig,

    history: KeyHistory,
    last_iki_ms: Option<Millis>,
    ema_iki_ms: Option<Millis>,
    wpm_10s: f64,

    throttle: Throttle,
    running: bool,
}

impl CadenceTracker {
    /// Creates a new tracker which doesn't accept events until [CadenceTracker::start] is called.
    pub fn new(config: CadenceConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            history: KeyHistory::new(config.history_capacity),
            throttle: Throttle::new(config.publish_rate_hz),
            last_iki_ms: None,
            ema_iki_ms: None,
            wpm_10s: 0.,
            running: false,
            config,
        })
    }

    /// Clears all metrics and starts accepting key events.
    pub fn start(&mut self) -> Result<(), Error> {
        if self.running {
            debug!("Cadence tracker is already running");
            return Err(Error::AlreadyRunning);
        }

        self.clear();
        self.running = true;
        Ok(())
    }

    /// Stops accepting key events and clears all metrics. Calling it twice is fine.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }

        self.running = false;
        self.clear();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Records a key press at `timestamp`.
    ///
    /// Returns the new snapshot if it may be published, which happens at most
    /// [CadenceConfig::publish_rate_hz] times per second. Events while stopped
    /// and events older than the latest one are ignored.
    #[instrument(level = "trace", skip(self))]
    pub fn on_key_event(&mut self, timestamp: Millis) -> Option<CadenceSnapshot> {
        if !self.running {
            trace!("Ignoring key event: not running");
            return None;
        }

        let previous = self.history.latest();
        if previous.is_some_and(|previous| timestamp < previous) {
            debug!("Ignoring key event which is older than the previous one");
            return None;
        }

        self.history.push(timestamp);

        if let Some(previous) = previous {
            let iki = timestamp - previous;
            let alpha = self.config.ema_alpha;

            self.last_iki_ms = Some(iki);
            self.ema_iki_ms = Some(match self.ema_iki_ms {
                None => iki,
                Some(ema) => alpha * iki + (1. - alpha) * ema,
            });
        }

        let in_window = self
            .history
            .count_after(timestamp - self.config.wpm_window_ms);
        self.wpm_10s = self.config.words_per_minute(in_window);

        if self.throttle.try_fire(timestamp) {
            Some(self.snapshot())
        } else {
            None
        }
    }

    /// The current metrics, independent of the publish rate.
    pub fn snapshot(&self) -> CadenceSnapshot {
        CadenceSnapshot {
            last_iki_ms: self.last_iki_ms,
            ema_iki_ms: self.ema_iki_ms,
            wpm_10s: self.wpm_10s,
            last_key_at: self.history.latest(),
        }
    }

    pub fn config(&self) -> &CadenceConfig {
        &self.config
    }

    fn clear(&mut self) {
        self.history.clear();
        self.last_iki_ms = None;
        self.ema_iki_ms = None;
        self.wpm_10s = 0.;
        self.throttle.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_tracker() -> CadenceTracker {
        let mut tracker = CadenceTracker::new(CadenceConfig::default()).unwrap();
        tracker.start().unwrap();
        tracker
    }

    #[test]
    fn starts_empty() {
        let tracker = running_tracker();
        assert_eq!(tracker.snapshot(), CadenceSnapshot::default());
    }

    #[test]
    fn single_key_has_no_interval() {
        let mut tracker = running_tracker();
        tracker.on_key_event(40.);

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.last_iki_ms, None);
        assert_eq!(snapshot.ema_iki_ms, None);
        assert_eq!(snapshot.last_key_at, Some(40.));
    }

    #[test]
    fn interval_and_moving_average() {
        let mut tracker = running_tracker();
        for ts in [0., 100., 250.] {
            tracker.on_key_event(ts);
        }

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.last_iki_ms, Some(150.));
        assert!((snapshot.ema_iki_ms.unwrap() - 110.).abs() < 1e-9);
        assert_eq!(snapshot.last_key_at, Some(250.));
    }

    #[test]
    fn words_per_minute() {
        let mut tracker = running_tracker();
        for i in 0..10 {
            tracker.on_key_event(i as f64 * 200.);
        }

        // 10 keys within 10s => 2 words => 12 wpm
        assert_eq!(tracker.snapshot().wpm_10s, 12.);
    }

    #[test]
    fn words_per_minute_forgets_old_keys() {
        let mut tracker = running_tracker();
        for ts in [0., 100., 200., 20_000.] {
            tracker.on_key_event(ts);
        }

        assert!((tracker.snapshot().wpm_10s - 1.2).abs() < 1e-9);
    }

    #[test]
    fn history_is_bounded() {
        let mut tracker = running_tracker();
        for i in 0..100 {
            tracker.on_key_event(i as f64 * 10.);
        }

        assert_eq!(tracker.history.len(), 20);
        // only 20 keys are remembered, so the estimate saturates
        assert_eq!(tracker.snapshot().wpm_10s, 24.);
    }

    #[test]
    fn ignored_while_stopped() {
        let mut tracker = CadenceTracker::new(CadenceConfig::default()).unwrap();
        assert_eq!(tracker.on_key_event(0.), None);
        assert_eq!(tracker.snapshot(), CadenceSnapshot::default());

        tracker.start().unwrap();
        tracker.on_key_event(0.);
        tracker.on_key_event(120.);
        tracker.stop();

        let stopped = tracker.snapshot();
        assert_eq!(tracker.on_key_event(300.), None);
        assert_eq!(tracker.snapshot(), stopped);
    }

    #[test]
    fn stop_clears_everything() {
        let mut tracker = running_tracker();
        tracker.on_key_event(0.);
        tracker.on_key_event(120.);

        tracker.stop();
        tracker.stop();

        assert!(!tracker.is_running());
        assert_eq!(tracker.snapshot(), CadenceSnapshot::default());
    }

    #[test]
    fn start_twice() {
        let mut tracker = running_tracker();
        assert_eq!(tracker.start(), Err(Error::AlreadyRunning));
        assert!(tracker.is_running());
    }

    #[test]
    fn restart_begins_from_scratch() {
        let mut tracker = running_tracker();
        tracker.on_key_event(0.);
        tracker.on_key_event(120.);
        tracker.stop();
        tracker.start().unwrap();

        // the first key after a restart may publish immediately
        assert!(tracker.on_key_event(130.).is_some());
        assert_eq!(tracker.snapshot().last_iki_ms, None);
    }

    #[test]
    fn publishing_is_throttled() {
        let mut tracker = running_tracker();

        assert!(tracker.on_key_event(0.).is_some());
        assert!(tracker.on_key_event(10.).is_none());
        assert!(tracker.on_key_event(20.).is_none());
        assert!(tracker.on_key_event(40.).is_some());

        // the metrics are still updated when nothing gets published
        assert_eq!(tracker.snapshot().last_iki_ms, Some(20.));
    }

    #[test]
    fn at_most_one_publish_within_10ms() {
        let mut tracker = running_tracker();
        tracker.on_key_event(0.);

        let published = [100., 110.]
            .into_iter()
            .filter_map(|ts| tracker.on_key_event(ts))
            .count();
        assert!(published <= 1);
    }

    #[test]
    fn older_timestamps_are_ignored() {
        let mut tracker = running_tracker();
        tracker.on_key_event(100.);
        tracker.on_key_event(200.);
        let before = tracker.snapshot();

        assert_eq!(tracker.on_key_event(150.), None);
        assert_eq!(tracker.snapshot(), before);
    }

    #[test]
    fn equal_timestamps_give_zero_interval() {
        let mut tracker = running_tracker();
        tracker.on_key_event(100.);
        tracker.on_key_event(100.);

        assert_eq!(tracker.snapshot().last_iki_ms, Some(0.));
    }

    #[test]
    fn iki_prefers_moving_average() {
        let snapshot = CadenceSnapshot {
            last_iki_ms: Some(150.),
            ema_iki_ms: Some(110.),
            ..Default::default()
        };
        assert_eq!(snapshot.iki_ms(), Some(110.));

        let snapshot = CadenceSnapshot {
            last_iki_ms: Some(150.),
            ..Default::default()
        };
        assert_eq!(snapshot.iki_ms(), Some(150.));
    }
}
