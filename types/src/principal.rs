//! Principals held in the shared account registry.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::TypesError;
use crate::group_id::GroupId;
use crate::keys::PublicKey;

/// A principal backed by a single signing key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardAccount {
    pub address: Address,
    pub public_key: Option<PublicKey>,
}

impl StandardAccount {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            public_key: None,
        }
    }

    pub fn set_pub_key(&mut self, key: PublicKey) {
        self.public_key = Some(key);
    }
}

/// A principal whose authority is computed from its group's members.
///
/// Deliberately exposes no way to attach a key. Decoding fails unless the
/// address is a well-formed group identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGroupAccount")]
pub struct GroupAccount {
    address: Address,
}

#[derive(Deserialize)]
struct RawGroupAccount {
    address: Address,
}

impl TryFrom<RawGroupAccount> for GroupAccount {
    type Error = TypesError;

    fn try_from(raw: RawGroupAccount) -> Result<Self, Self::Error> {
        let id = GroupId::try_from(raw.address)?;
        Ok(Self::new(&id))
    }
}

impl GroupAccount {
    pub fn new(id: &GroupId) -> Self {
        Self {
            address: id.as_address().clone(),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Principal {
    Standard(StandardAccount),
    Group(GroupAccount),
}

impl Principal {
    pub fn address(&self) -> &Address {
        match self {
            Self::Standard(acc) => &acc.address,
            Self::Group(acc) => acc.address(),
        }
    }

    pub fn public_key(&self) -> Option<&PublicKey> {
        match self {
            Self::Standard(acc) => acc.public_key.as_ref(),
            Self::Group(_) => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Attach a signing key. Always fails for group principals.
    pub fn set_pub_key(&mut self, key: PublicKey) -> Result<(), TypesError> {
        match self {
            Self::Standard(acc) => {
                acc.set_pub_key(key);
                Ok(())
            }
            Self::Group(acc) => Err(TypesError::NotPermitted(format!(
                "cannot set a public key on group account {}",
                acc.address
            ))),
        }
    }
}
