//! Fundamental types for the Turing token client.
//!
//! This crate defines the types shared by every other crate in the workspace:
//! the connected account, 18-decimal token amounts, roster participants and
//! ranking entries.

pub mod account;
pub mod amount;
pub mod error;
pub mod participant;
pub mod ranking;

pub use account::Account;
pub use alloy_primitives::{Address, TxHash, U256};
pub use amount::{TokenAmount, TOKEN_DECIMALS};
pub use error::AmountError;
pub use participant::Participant;
pub use ranking::{rank, RankingEntry};
