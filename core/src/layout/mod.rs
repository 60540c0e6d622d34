//! Layout management — snapshots, the sidecar store, and reconciliation.
//!
//! The `snapshot` module holds one named layout and its JSON entry form. The
//! `store` module owns every layout of a document and persists them to the
//! sidecar file. `capture` reads the live document into a snapshot and
//! `apply` pushes a snapshot back onto it; together they are the two
//! directions of reconciliation.

pub mod apply;
pub mod capture;
pub mod snapshot;
pub mod store;
