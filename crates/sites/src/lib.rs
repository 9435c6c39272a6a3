//! Sites domain module: branches and their sales outlets.
//!
//! Pure domain logic (no IO, no HTTP, no storage): entities, creation
//! inputs, partial-update patches, and field validation.

pub mod branch;
pub mod outlet;

pub use branch::{Branch, BranchPatch, BranchView, NewBranch};
pub use outlet::{NewOutlet, Outlet, OutletPatch, OutletView};
