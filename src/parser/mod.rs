//! Parser module — header prototypes, documentation cards, and the
//! reconciliation that joins them.

pub mod dialect;
pub mod doc;
pub mod header;
pub mod reconcile;
