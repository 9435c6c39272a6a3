//! Parties domain module: suppliers the business buys inventory from.

pub mod supplier;

pub use supplier::{NewSupplier, Supplier, SupplierPatch, SupplierView};
