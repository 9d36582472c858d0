//! Toolscout Core - perceptual search primitives for a tool inventory
//!
//! This crate is the algorithmic heart of Toolscout: it turns tool
//! photos into 64-bit perceptual fingerprints and ranks a catalog of
//! stored fingerprints against a query photo, blending visual
//! similarity with exact-match metadata criteria.
//!
//! Everything here is pure, synchronous computation. Storage, HTTP, and
//! file handling live in the server crate; this crate only ever sees
//! decoded criteria, image bytes, and in-memory catalog snapshots.
//!
//! # Example
//!
//! ```no_run
//! use toolscout_core::{rank, Candidate, Fingerprint, RawCriteria, SearchCriteria};
//!
//! # fn example(catalog: Vec<Candidate>) -> toolscout_core::Result<()> {
//! let photo = std::fs::read("query.jpg").unwrap();
//! let query = Fingerprint::from_image_bytes(&photo)?;
//!
//! let criteria = SearchCriteria::from_raw(RawCriteria {
//!     location: Some("전기실"),
//!     mode: Some("soft"),
//!     top_k: Some("5"),
//!     ..Default::default()
//! });
//!
//! for hit in rank(query, &criteria, &catalog) {
//!     println!("#{} dist={} score={}", hit.tool_id, hit.hamming, hit.adjusted);
//! }
//! # Ok(())
//! # }
//! ```

pub mod criteria;
pub mod error;
pub mod filter;
pub mod fingerprint;
pub mod rank;

pub use criteria::{
    RawCriteria, SearchCriteria, SearchMode, TOP_K_DEFAULT, TOP_K_MAX, TOP_K_MIN,
};
pub use error::{CoreError, Result};
pub use filter::{bonus, matches, ToolAttributes};
pub use fingerprint::{distance, Fingerprint, FINGERPRINT_BITS};
pub use rank::{filter_entries, rank, Candidate, ScoredCandidate};
