//! Roster participants ("codinomes").

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// A named participant known to the contract.
///
/// Name uniqueness is enforced by the contract; the address is resolved
/// lazily through the contract's name lookup and is `None` until then.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub address: Option<Address>,
}

impl Participant {
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
        }
    }

    pub fn resolved(name: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            address: Some(address),
        }
    }
}
