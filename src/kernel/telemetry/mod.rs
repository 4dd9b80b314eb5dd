//! Chat telemetry.
//!
//! # SAFETY INVARIANT
//! Telemetry is a READ-ONLY side-effect layer.
//! It must **NEVER** be read inside decision logic (resolver, presenter or reactor).
//!
//! # PRIVACY INVARIANT
//! Telemetry events must **NEVER** contain user content.
//! Only internal ids, languages, counts and enums are allowed.

pub mod event;
pub mod metrics;
pub mod recorder;
