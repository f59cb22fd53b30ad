// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Search Progress Reporting
//!
//! Structured `tracing` records for the events of a search: the heuristic
//! incumbent (`init`), every improved incumbent (`new`), progress pings
//! (`ping`) and the end of the search (`end`).
//!
//! Ping mode emits a record whenever the ping interval has passed since the
//! last record. The interval starts at one second, doubles after every ping
//! and resets when a new incumbent arrives, so long plateaus produce
//! logarithmically many records. Workers only `try_lock` the ping state and
//! never wait for reporting.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

const INITIAL_PING_INTERVAL: Duration = Duration::from_secs(1);

/// Workers look at the clock once per this many explored nodes (mask).
pub(crate) const PING_CHECK_MASK: u64 = 0xFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchEvent {
    Init,
    New,
    Ping,
    End,
}

impl SearchEvent {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            SearchEvent::Init => "init",
            SearchEvent::New => "new",
            SearchEvent::Ping => "ping",
            SearchEvent::End => "end",
        }
    }
}

impl std::fmt::Display for SearchEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
struct PingState {
    last: Instant,
    interval: Duration,
}

#[derive(Debug)]
pub(crate) struct ProgressReporter {
    ping: bool,
    verbose: bool,
    started: Instant,
    state: Mutex<PingState>,
}

impl ProgressReporter {
    pub(crate) fn new(ping: bool, verbose: bool) -> Self {
        let now = Instant::now();
        Self {
            ping,
            verbose,
            started: now,
            state: Mutex::new(PingState {
                last: now,
                interval: INITIAL_PING_INTERVAL,
            }),
        }
    }

    #[inline]
    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    #[inline]
    pub(crate) fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Returns `true` if a ping is due and claims it.
    pub(crate) fn claim_ping(&self) -> bool {
        if !self.ping {
            return false;
        }
        let Some(mut state) = self.state.try_lock() else {
            return false;
        };
        let now = Instant::now();
        if now.duration_since(state.last) < state.interval {
            return false;
        }
        state.last = now;
        state.interval = state.interval.saturating_mul(2);
        true
    }

    /// Restarts the ping clock at the initial interval.
    pub(crate) fn reset_ping(&self) {
        if !self.ping {
            return;
        }
        let mut state = self.state.lock();
        state.last = Instant::now();
        state.interval = INITIAL_PING_INTERVAL;
    }

    pub(crate) fn record(&self, event: SearchEvent, lower_bound: f64, nodes: u64, worker: usize) {
        let elapsed = self.elapsed();
        let seconds = elapsed.as_secs_f64();
        let nodes_per_second = if seconds > 0.0 {
            nodes as f64 / seconds
        } else {
            0.0
        };

        if self.verbose || event == SearchEvent::Ping {
            tracing::info!(
                lower_bound,
                nodes,
                elapsed = ?elapsed,
                nodes_per_second,
                worker,
                event = event.as_str(),
                "search progress"
            );
        } else {
            tracing::debug!(
                lower_bound,
                nodes,
                elapsed = ?elapsed,
                nodes_per_second,
                worker,
                event = event.as_str(),
                "search progress"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_ping_never_fires() {
        let reporter = ProgressReporter::new(false, false);
        std::thread::sleep(Duration::from_millis(5));
        assert!(!reporter.claim_ping());
    }

    #[test]
    fn test_ping_waits_for_interval_and_doubles() {
        let reporter = ProgressReporter::new(true, false);
        assert!(!reporter.claim_ping());

        {
            let mut state = reporter.state.lock();
            state.last = Instant::now() - Duration::from_secs(2);
        }
        assert!(reporter.claim_ping());
        assert_eq!(reporter.state.lock().interval, Duration::from_secs(2));
        assert!(!reporter.claim_ping());

        reporter.reset_ping();
        assert_eq!(reporter.state.lock().interval, INITIAL_PING_INTERVAL);
    }

    #[test]
    fn test_event_names() {
        assert_eq!(SearchEvent::Init.to_string(), "init");
        assert_eq!(SearchEvent::New.to_string(), "new");
        assert_eq!(SearchEvent::Ping.to_string(), "ping");
        assert_eq!(SearchEvent::End.to_string(), "end");
    }
}
