//! # Public Identity
//!
//! The public identity value bound into every proof, normally the prover's
//! EVM account address read as an integer. Binding the identity into the
//! public inputs ties a proof to one account, so a proof observed in the
//! mempool cannot be replayed by a different sender.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::EncodingError;
use crate::numeric::parse_uint;

/// Public identity input of the answer circuit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicIdentity(#[serde(with = "crate::numeric::decimal")] BigUint);

impl PublicIdentity {
    /// Parse a decimal integer or a `0x`-prefixed hex address.
    pub fn parse(input: &str) -> Result<Self, EncodingError> {
        parse_uint(input).map(Self)
    }

    /// Wrap an integer identity value.
    pub fn from_biguint(value: BigUint) -> Self {
        Self(value)
    }

    /// Borrow the underlying integer.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl From<u64> for PublicIdentity {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl FromStr for PublicIdentity {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PublicIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
