//! Pairwise verification of a client unit against a vendor unit.
//!
//! [`PairVerifier`] owns no state of its own: the verdict cache, rate limiter and
//! judgment service are injected so concurrent comparisons share them explicitly.

pub mod types;
pub mod verifier;


pub use types::{GapType, Verification, VerificationVerdict};
pub use verifier::PairVerifier;
