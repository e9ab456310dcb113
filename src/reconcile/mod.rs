//! Identity reconciliation across renumbering events.
//!
//! Each historical renumbering is one pass: derive an
//! old-id → (new-id, canonical-name) mapping from the event's two adjacent
//! snapshots, then rewrite every snapshot that predates the event. Passes
//! run in chronological event order and each fully replaces the snapshot
//! set, so identifier chains compose across events.

pub mod error;
pub mod events;
pub mod mapping;
pub mod normalize;

pub use error::ReconcileError;
pub use events::{
    ManualOverride, NameException, OverrideTarget, PairingMode, RenumberingEvent, builtin_events,
};
pub use mapping::{MappingTarget, RenumberingMapping, apply_event, build_mapping, reconcile};
pub use normalize::normalize_name;
