//! Debounced detectors sampled once per tick.
//!
//! Both detectors are plain values owned by a harness instance. They are
//! reset explicitly at trial boundaries so no state leaks from one trial
//! into the next.

pub use self::{fall::*, stillness::*};

mod fall;
mod stillness;
