use async_trait::async_trait;
use ethers::abi::Token;
use ethers::types::{Address, H256};

use crate::error::BindingError;
use crate::registry::ContractName;

/// One contract call, fully resolved: which contract, where it lives on
/// which chain, and the function inputs.
#[derive(Debug, Clone)]
pub struct ContractCall {
    pub contract: ContractName,
    pub address: Address,
    pub chain_id: u64,
    pub function: String,
    pub args: Vec<Token>,
}

impl ContractCall {
    pub fn new(
        contract: ContractName,
        address: Address,
        chain_id: u64,
        function: &str,
        args: Vec<Token>,
    ) -> Self {
        Self {
            contract,
            address,
            chain_id,
            function: function.to_owned(),
            args,
        }
    }
}

/// Terminal receipt for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub tx_hash: H256,
    pub block_number: u64,
    pub success: bool,
}

/// The sole gateway to network state. The binding layer never talks to a
/// transport directly; tests substitute a scripted implementation.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Pure read call returning the function's decoded return value.
    async fn read(&self, call: &ContractCall) -> Result<Token, BindingError>;

    /// Broadcast a state-changing call, returning the transaction hash
    /// without waiting for inclusion.
    async fn submit(&self, call: &ContractCall) -> Result<H256, BindingError>;

    /// Wait until the transaction reaches a terminal status. A reverted
    /// transaction is an `Ok` confirmation with `success == false`; failing
    /// to observe a terminal status within the client's budget is an error.
    async fn wait_for_confirmation(
        &self,
        tx_hash: H256,
        chain_id: u64,
    ) -> Result<Confirmation, BindingError>;
}

#[cfg(test)]
pub mod test_utils {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Scripted chain client: queued responses, recorded calls.
    #[derive(Default)]
    pub struct MockChainClient {
        reads: Mutex<VecDeque<Result<Token, BindingError>>>,
        submissions: Mutex<VecDeque<Result<H256, BindingError>>>,
        confirmations: Mutex<VecDeque<Result<Confirmation, BindingError>>>,
        read_calls: Mutex<Vec<ContractCall>>,
        submit_calls: Mutex<Vec<ContractCall>>,
        wait_calls: Mutex<Vec<H256>>,
    }

    impl MockChainClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn queue_read(&self, result: Result<Token, BindingError>) {
            self.reads.lock().unwrap().push_back(result);
        }

        pub fn queue_submission(&self, result: Result<H256, BindingError>) {
            self.submissions.lock().unwrap().push_back(result);
        }

        pub fn queue_confirmation(&self, result: Result<Confirmation, BindingError>) {
            self.confirmations.lock().unwrap().push_back(result);
        }

        pub fn read_count(&self) -> usize {
            self.read_calls.lock().unwrap().len()
        }

        pub fn submit_count(&self) -> usize {
            self.submit_calls.lock().unwrap().len()
        }

        pub fn wait_count(&self) -> usize {
            self.wait_calls.lock().unwrap().len()
        }

        pub fn total_calls(&self) -> usize {
            self.read_count() + self.submit_count() + self.wait_count()
        }

        pub fn last_read_call(&self) -> Option<ContractCall> {
            self.read_calls.lock().unwrap().last().cloned()
        }

        pub fn last_submit_call(&self) -> Option<ContractCall> {
            self.submit_calls.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl ChainClient for MockChainClient {
        async fn read(&self, call: &ContractCall) -> Result<Token, BindingError> {
            self.read_calls.lock().unwrap().push(call.clone());
            self.reads
                .lock()
                .unwrap()
                .pop_front()
                .expect("unscripted read call")
        }

        async fn submit(&self, call: &ContractCall) -> Result<H256, BindingError> {
            self.submit_calls.lock().unwrap().push(call.clone());
            self.submissions
                .lock()
                .unwrap()
                .pop_front()
                .expect("unscripted submit call")
        }

        async fn wait_for_confirmation(
            &self,
            tx_hash: H256,
            _chain_id: u64,
        ) -> Result<Confirmation, BindingError> {
            self.wait_calls.lock().unwrap().push(tx_hash);
            self.confirmations
                .lock()
                .unwrap()
                .pop_front()
                .expect("unscripted confirmation wait")
        }
    }
}
