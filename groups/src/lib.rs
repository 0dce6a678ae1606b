//! Hierarchical weighted-threshold groups.
//!
//! A group is a collective principal: an ordered list of weighted members and
//! a decision threshold. Members may be ordinary principals or other groups,
//! which lets quorum rules nest (a board that needs its departments, each of
//! which needs its own quorum).
//!
//! Design:
//! - Group ids come from a durable counter and are never reissued
//! - Creating a group writes the counter, the record and a key-less group
//!   principal in one store transaction
//! - Authorization reads records through the caller's transaction, charges a
//!   gas meter, and bounds nesting depth
//! - Member graphs are kept acyclic at write time

pub mod allocator;
pub mod authorize;
pub mod error;
pub mod genesis;
pub mod meter;
pub mod registry;
mod validate;

pub use error::{AuthError, GroupError};
pub use genesis::GenesisState;
pub use meter::{BasicGasMeter, GasMeter, InfiniteGasMeter};
pub use registry::GroupKeeper;
