//! Booking operations.
//!
//! The leaves ([`reference`], [`code`]) only write inside a caller's
//! transaction. [`ledger`] owns the serialized capacity check, [`lifecycle`]
//! the guarded status transitions and [`sweeper`] the batch expiry.
//! [`engine`] ties them to one connection, clock and entropy source.
//!
//! # Examples
//!
//! ```no_run
//! use roomhold::operations::Sweeper;
//! use roomhold::{Database, DatabaseConfig};
//!
//! let db = Database::open(DatabaseConfig::new("/tmp/roomhold.db")).unwrap();
//! let report = Sweeper::sweep(db.connection(), chrono::Utc::now(), true).unwrap();
//! println!("{} hold(s) would expire", report.expired);
//! ```

pub mod code;
pub mod engine;
pub mod ledger;
pub mod lifecycle;
pub mod reference;
pub mod sweeper;

pub use code::{EntropySource, OsEntropy, VerificationCodeIssuer};
pub use engine::BookingEngine;
pub use ledger::{Availability, InventoryLedger};
pub use lifecycle::Lifecycle;
pub use reference::ReferenceGenerator;
pub use sweeper::{SweepReport, Sweeper, SweeperHandle, SweeperStats};

#[cfg(all(test, feature = "property-tests"))]
mod proptests;
