//! Per-poller bookkeeping: change detection and the interval ladder.

use crate::jobs::{JobProgress, StateFingerprint};
use std::time::Duration;

/// The polling periods a session can be on, fastest first.
pub const LADDER: [Duration; 4] = [
    Duration::from_millis(1000),
    Duration::from_millis(2000),
    Duration::from_millis(3000),
    Duration::from_millis(5000),
];

/// Rung for a given no-change streak. Checked from the slowest rung down.
pub fn interval_for_streak(streak: u32, current: Duration) -> Duration {
    if streak >= 10 {
        LADDER[3]
    } else if streak >= 5 {
        LADDER[2]
    } else if streak >= 3 {
        LADDER[1]
    } else {
        current
    }
}

/// What a single successful poll told us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// The fingerprint differed from the previous one.
    pub changed: bool,
    /// The polling period changed as a result of this poll.
    pub interval_changed: bool,
    pub interval: Duration,
}

/// Client-local state of one polling run.
///
/// Owned by a single [`super::AdaptivePoller`]; dropped when the run stops or
/// the job reaches a terminal status.
#[derive(Debug, Clone)]
pub struct PollerSession {
    interval: Duration,
    no_change_streak: u32,
    last_fingerprint: Option<StateFingerprint>,
    highest_percent: u8,
}

impl Default for PollerSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PollerSession {
    pub fn new() -> Self {
        Self {
            interval: LADDER[0],
            no_change_streak: 0,
            last_fingerprint: None,
            highest_percent: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn no_change_streak(&self) -> u32 {
        self.no_change_streak
    }

    pub fn last_fingerprint(&self) -> Option<&StateFingerprint> {
        self.last_fingerprint.as_ref()
    }

    /// Feeds one successful poll into the session.
    ///
    /// A fingerprint different from the last one (or the first fingerprint
    /// ever seen) drops back to the fastest rung; a repeated one lengthens the
    /// streak and may climb the ladder. `progress.percent` is raised to the
    /// highest value seen so far so the UI never moves backwards.
    pub fn observe(&mut self, progress: &mut JobProgress) -> Observation {
        let previous = self.interval;
        let changed = self.last_fingerprint.as_ref() != Some(&progress.fingerprint);

        if changed {
            self.no_change_streak = 0;
            self.interval = LADDER[0];
            self.last_fingerprint = Some(progress.fingerprint.clone());
        } else {
            self.no_change_streak += 1;
            self.interval = interval_for_streak(self.no_change_streak, self.interval);
        }

        self.highest_percent = self.highest_percent.max(progress.percent);
        progress.percent = self.highest_percent;

        Observation {
            changed,
            interval_changed: previous != self.interval,
            interval: self.interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobStatus;

    fn snapshot(token: &str, percent: u8) -> JobProgress {
        JobProgress {
            total: 10,
            succeeded: 0,
            failed: 0,
            percent,
            status: JobStatus::Processing,
            fingerprint: StateFingerprint::new(token),
            error_message: None,
        }
    }

    fn ms(d: Duration) -> u64 {
        d.as_millis() as u64
    }

    #[test]
    fn first_observation_counts_as_change() {
        let mut session = PollerSession::new();
        let obs = session.observe(&mut snapshot("a", 0));
        assert!(obs.changed);
        assert!(!obs.interval_changed);
        assert_eq!(session.no_change_streak(), 0);
        assert_eq!(session.last_fingerprint().map(|f| f.as_str()), Some("a"));
    }

    #[test]
    fn streak_resets_on_change_and_counts_by_one_otherwise() {
        let mut session = PollerSession::new();
        let tokens = ["a", "a", "a", "b", "b", "a", "a", "a", "a"];
        let expected = [0, 1, 2, 0, 1, 0, 1, 2, 3];

        for (token, want) in tokens.iter().zip(expected) {
            session.observe(&mut snapshot(token, 0));
            assert_eq!(session.no_change_streak(), want, "after {token}");
        }
    }

    #[test]
    fn ladder_climbs_with_the_streak_and_stays_bounded() {
        let mut session = PollerSession::new();
        session.observe(&mut snapshot("a", 0));

        let mut seen = Vec::new();
        for _ in 0..14 {
            seen.push(ms(session.observe(&mut snapshot("a", 0)).interval));
        }

        assert_eq!(
            seen,
            vec![
                1000, 1000, 2000, 2000, 3000, 3000, 3000, 3000, 3000, 5000, 5000, 5000, 5000, 5000
            ]
        );
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert!(seen.iter().all(|v| LADDER.iter().any(|l| ms(*l) == *v)));
    }

    #[test]
    fn change_drops_straight_back_to_the_fastest_rung() {
        let mut session = PollerSession::new();
        for _ in 0..12 {
            session.observe(&mut snapshot("a", 0));
        }
        assert_eq!(ms(session.interval()), 5000);

        let obs = session.observe(&mut snapshot("b", 0));
        assert!(obs.changed);
        assert!(obs.interval_changed);
        assert_eq!(ms(obs.interval), 1000);
    }

    #[test]
    fn percent_never_moves_backwards() {
        let mut session = PollerSession::new();
        let mut late = snapshot("b", 40);
        session.observe(&mut snapshot("a", 60));
        session.observe(&mut late);
        assert_eq!(late.percent, 60);
    }
}
