//! Group records: an ordered member list and a decision threshold.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::group_id::GroupId;

/// Voting weight of a member. Wide enough for token-denominated weights.
pub type Weight = u128;

/// One entry in a group's member list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// A standard principal or another group.
    pub address: Address,
    pub weight: Weight,
}

impl Member {
    pub fn new(address: impl Into<Address>, weight: Weight) -> Self {
        Self {
            address: address.into(),
            weight,
        }
    }
}

/// A collective principal.
///
/// Member order is the evaluation order used during authorization. The same
/// address may appear more than once; each entry is credited on its own.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Minimum accumulated weight required to act for the group.
    pub decision_threshold: Weight,
    pub members: Vec<Member>,
}

impl Group {
    pub fn new(decision_threshold: Weight, members: Vec<Member>) -> Self {
        Self {
            decision_threshold,
            members,
        }
    }

    /// Sum of all member weights, or `None` if it does not fit in [`Weight`].
    pub fn total_weight(&self) -> Option<Weight> {
        self.members
            .iter()
            .try_fold(0 as Weight, |acc, m| acc.checked_add(m.weight))
    }

    /// Members whose address is a well-formed group identifier.
    pub fn subgroups(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.members
            .iter()
            .filter_map(|m| GroupId::try_from(&m.address).ok())
    }
}
