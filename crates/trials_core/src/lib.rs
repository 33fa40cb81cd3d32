//! # trials_core: Numeric Foundation for Random-Number Trials
//!
//! ## Layer 1 (Foundation) Role
//!
//! trials_core is the bottom layer of the workspace and provides the pieces a
//! trial run is assembled from:
//! - Random sources behind one capability (`rng`)
//! - Single-pass mean/variance estimation and domain scaling (`stats`)
//! - Fixed-width frequency accumulation (`histogram`)
//! - Sample-index to pixel mapping with match tracking (`canvas`)
//! - The shared error type (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other workspace crates and only minimal
//! external dependencies:
//! - rand: entropy-seeded and OS-backed generators
//! - thiserror: error derivation
//! - serde: serialisation of results and source selection
//!
//! ## Usage Example
//!
//! ```rust
//! use trials_core::histogram::Histogram;
//! use trials_core::rng::{LinearCongruentialRandom, RandomSource};
//! use trials_core::stats::{scale, RunningStats};
//!
//! let mut rng = LinearCongruentialRandom::new(0);
//! let mut histogram = Histogram::new(10, 0.0, 1.0).unwrap();
//! let mut stats = RunningStats::new();
//!
//! for _ in 0..1000 {
//!     let raw = rng.next(0, 99).unwrap();
//!     let scaled = scale(raw, 0, 99, 0.0, 1.0).unwrap();
//!     histogram.add(scaled).unwrap();
//!     stats.push(scaled).unwrap();
//! }
//!
//! assert_eq!(histogram.total(), 1000);
//! assert_eq!(stats.count(), 1000);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod canvas;
pub mod histogram;
pub mod rng;
pub mod stats;
pub mod types;

pub use types::error::CoreError;
