//! Expiry sweeper: reclaims holds nobody confirmed in time.
//!
//! Each expiry is its own guarded autocommit UPDATE, so a sweep never holds
//! a lock across rows and a concurrent confirm of the same hold either wins
//! outright or loses outright.
//!
//! The sweep is the authoritative transition to `expired`. Read paths do
//! not wait for it: they project lapsed holds as expired on their own.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::booking::Booking;
use crate::clock::Clock;
use crate::database::Database;
use crate::error::Result;

/// Outcome of one sweep pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Lapsed holds found.
    pub examined: usize,
    /// Holds this pass moved to expired (or would, in dry-run mode).
    pub expired: usize,
    /// Holds another writer transitioned first.
    pub skipped: usize,
    /// Whether nothing was written.
    pub dry_run: bool,
    /// The holds expired, as they were before the pass.
    pub bookings: Vec<Booking>,
}

/// Totals over the lifetime of a running sweeper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweeperStats {
    /// Passes completed.
    pub passes: u64,
    /// Holds expired across all passes.
    pub expired: u64,
    /// Passes that failed.
    pub failures: u64,
}

/// Periodic expiry sweeper.
#[derive(Debug, Clone, Copy)]
pub struct Sweeper {
    interval: Duration,
    max_passes: Option<u64>,
}

impl Sweeper {
    /// Creates a sweeper that runs a pass every `interval` until stopped.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_passes: None,
        }
    }

    /// Stops after `passes` passes.
    #[must_use]
    pub const fn with_max_passes(mut self, passes: u64) -> Self {
        self.max_passes = Some(passes);
        self
    }

    /// The pause between passes.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Expires every hold whose expiry is before `now`.
    ///
    /// With `dry_run` the candidates are reported and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns a database error; holds expired before the failure stay
    /// expired.
    pub fn sweep(conn: &Connection, now: DateTime<Utc>, dry_run: bool) -> Result<SweepReport> {
        let candidates = Database::find_lapsed_holds(conn, now)?;
        let examined = candidates.len();

        if dry_run {
            return Ok(SweepReport {
                examined,
                expired: examined,
                skipped: 0,
                dry_run,
                bookings: candidates,
            });
        }

        let mut expired = Vec::with_capacity(examined);
        let mut skipped = 0;
        for booking in candidates {
            if Database::mark_expired(conn, booking.id(), now)? {
                log::debug!("expired {}", booking.reference());
                expired.push(booking);
            } else {
                skipped += 1;
            }
        }

        if !expired.is_empty() || skipped > 0 {
            log::info!(
                "sweep expired {} hold(s), {skipped} already transitioned",
                expired.len()
            );
        }

        Ok(SweepReport {
            examined,
            expired: expired.len(),
            skipped,
            dry_run,
            bookings: expired,
        })
    }

    /// Runs passes on the current thread until `stop` fires, its sender is
    /// dropped, or the pass limit is reached.
    ///
    /// A failed pass is logged and retried at the next tick.
    pub fn run(&self, db: &Database, clock: &dyn Clock, stop: &Receiver<()>) -> SweeperStats {
        let mut stats = SweeperStats::default();
        loop {
            match Self::sweep(db.connection(), clock.now(), false) {
                Ok(report) => stats.expired += report.expired as u64,
                Err(e) => {
                    stats.failures += 1;
                    log::error!("sweep pass failed: {e}");
                }
            }
            stats.passes += 1;

            if self.max_passes.is_some_and(|max| stats.passes >= max) {
                break;
            }
            match stop.recv_timeout(self.interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        log::debug!("sweeper stopped after {} pass(es)", stats.passes);
        stats
    }

    /// Runs the sweeper on a dedicated thread that owns `db`.
    #[must_use]
    pub fn spawn(self, db: Database, clock: Arc<dyn Clock>) -> SweeperHandle {
        let (stop, stop_rx) = mpsc::channel();
        let thread = thread::spawn(move || self.run(&db, clock.as_ref(), &stop_rx));
        SweeperHandle { stop, thread }
    }
}

/// Handle to a background sweeper thread.
#[derive(Debug)]
pub struct SweeperHandle {
    stop: Sender<()>,
    thread: JoinHandle<SweeperStats>,
}

impl SweeperHandle {
    /// Returns true once the thread has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Signals the thread to stop and waits for it.
    #[must_use]
    pub fn stop(self) -> SweeperStats {
        // a send error means the thread already exited
        let _ = self.stop.send(());
        self.thread.join().unwrap_or_else(|_| {
            log::error!("sweeper thread panicked");
            SweeperStats::default()
        })
    }
}
