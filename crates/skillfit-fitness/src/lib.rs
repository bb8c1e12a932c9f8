//! Fitness aggregation and the one-shot output artifact.
//!
//! An evaluation run folds one score per completed trial into a
//! [`FitnessRecord`]. When the configured number of trials has been recorded
//! the mean is written through a [`FitnessSink`] exactly once; this file is
//! the only contract with the external optimizer.
//!
//! # Modules
//!
//! - [`aggregator`] - Running sum, completed count and the write latch
//! - [`sink`] - Where the fitness goes ([`FileSink`] for the real artifact)
//! - [`summary`] - Descriptive statistics over per-trial scores for diagnostics
//!
//! # Example
//!
//! ```
//! use skillfit_fitness::{FitnessRecord, PersistStatus};
//!
//! let mut record = FitnessRecord::new(2);
//! let mut written = Vec::new();
//!
//! record.record(1.5).unwrap();
//! assert_eq!(record.persist(&mut written).unwrap(), PersistStatus::Pending);
//!
//! record.record(2.5).unwrap();
//! assert_eq!(record.persist(&mut written).unwrap(), PersistStatus::Written(2.0));
//! assert_eq!(record.persist(&mut written).unwrap(), PersistStatus::AlreadyWritten(2.0));
//! assert_eq!(written, vec![2.0]);
//! ```

pub use self::{aggregator::*, sink::*, summary::*};

pub mod aggregator;
pub mod sink;
pub mod summary;
