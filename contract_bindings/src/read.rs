use std::sync::Mutex;

use ethers::abi::Token;

use crate::client::{ChainClient, ContractCall};
use crate::error::BindingError;

/// Snapshot of a read binding as exposed to the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadResult {
    pub value: Option<Token>,
    pub is_loading: bool,
    pub error: Option<BindingError>,
}

#[derive(Debug, Default)]
struct ReadState {
    value: Option<Token>,
    error: Option<BindingError>,
    loading: bool,
    generation: u64,
}

/// Caches the last fetched value for one (contract, function, args, address,
/// chain) key.
///
/// The binding is disabled while the address is unresolved: no call is ever
/// issued and the snapshot stays idle. A `refetch` started while another is
/// in flight supersedes it; the superseded result is discarded when it
/// lands, so the last-issued fetch wins.
pub struct ReadBinding {
    call: Option<ContractCall>,
    state: Mutex<ReadState>,
}

impl ReadBinding {
    /// `call` is `None` when the contract address did not resolve.
    pub fn new(call: Option<ContractCall>) -> Self {
        Self {
            call,
            state: Mutex::new(ReadState::default()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.call.is_some()
    }

    pub fn snapshot(&self) -> ReadResult {
        let state = self.state.lock().unwrap();
        ReadResult {
            value: state.value.clone(),
            is_loading: state.loading,
            error: state.error.clone(),
        }
    }

    /// Issue (or re-issue) the read and return the snapshot after this fetch
    /// has either been applied or superseded by a newer one.
    pub async fn refetch<C: ChainClient + ?Sized>(&self, client: &C) -> ReadResult {
        let Some((ticket, call)) = self.begin() else {
            return self.snapshot();
        };
        let result = client.read(&call).await;
        self.complete(ticket, result);
        self.snapshot()
    }

    fn begin(&self) -> Option<(u64, ContractCall)> {
        let call = self.call.as_ref()?.clone();
        let mut state = self.state.lock().unwrap();
        state.generation += 1;
        state.loading = true;
        Some((state.generation, call))
    }

    /// Apply a fetched result. Returns false when a newer refetch has
    /// superseded this ticket, in which case the result is dropped.
    fn complete(&self, ticket: u64, result: Result<Token, BindingError>) -> bool {
        let mut state = self.state.lock().unwrap();
        if ticket != state.generation {
            return false;
        }
        state.loading = false;
        match result {
            Ok(value) => {
                state.value = Some(value);
                state.error = None;
            }
            // the previous successful value stays visible alongside the error
            Err(e) => state.error = Some(e),
        }
        true
    }
}
