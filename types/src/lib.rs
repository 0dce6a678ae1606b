//! Fundamental types for hierarchical weighted-threshold groups.
//!
//! Addresses, group identifiers, group records, principals and the tunable
//! authorization parameters shared by every other crate in the workspace.

pub mod address;
pub mod error;
pub mod group;
pub mod group_id;
pub mod keys;
pub mod params;
pub mod principal;

pub use address::Address;
pub use error::TypesError;
pub use group::{Group, Member, Weight};
pub use group_id::GroupId;
pub use keys::PublicKey;
pub use params::AuthParams;
pub use principal::{GroupAccount, Principal, StandardAccount};
