use std::fmt;

use ethers::types::H256;

use crate::registry::ContractName;

/// Failure classes surfaced at the component boundaries. Every failure is
/// converted to one of these before it reaches a caller; nothing propagates
/// past a single user action as a panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// No address is resolvable for the contract on the active chain. Reads
    /// and writes are refused locally before any network call.
    Configuration { contract: ContractName },
    /// A user-supplied argument failed a local precondition; nothing was
    /// sent.
    Validation(String),
    /// The chain client (or the user) rejected the write before broadcast.
    Submission(String),
    /// A read call failed at the client. Any previously fetched value stays
    /// visible alongside this error.
    Read(String),
    /// A submitted transaction reverted, or its confirmation could not be
    /// observed within the watcher's budget.
    Confirmation { tx_hash: H256, reason: String },
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::Configuration { contract } => {
                write!(f, "{contract} contract address is not configured")
            }
            BindingError::Validation(msg) => f.write_str(msg),
            BindingError::Submission(msg) => f.write_str(msg),
            BindingError::Read(msg) => f.write_str(msg),
            BindingError::Confirmation { tx_hash, reason } => {
                write!(f, "transaction {tx_hash:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for BindingError {}
