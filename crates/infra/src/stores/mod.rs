//! Resource stores, one module per backend.
//!
//! Both backends expose the same operations with the same `DomainResult`
//! contracts; the in-memory one is synchronous, the Postgres one async.

pub mod memory;
pub mod postgres;
