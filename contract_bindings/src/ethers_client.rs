use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ethers::abi::{Abi, Function, Token};
use ethers::providers::Middleware;
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Bytes, TransactionRequest, H256, U64};
use serde::Deserialize;

use crate::client::{ChainClient, Confirmation, ContractCall};
use crate::error::BindingError;
use crate::registry::ContractName;

const DEFAULT_CONFIRMATION_ATTEMPTS: usize = 12;
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Artifact shape written by the deployment pipeline's sync step.
#[derive(Deserialize)]
struct ContractArtifact {
    abi: Abi,
}

/// Load a contract ABI from an artifact file (`{ "abi": [...] }`).
pub fn load_abi_from_artifact(path: impl AsRef<Path>) -> anyhow::Result<Abi> {
    let content = fs::read_to_string(path)?;
    let artifact: ContractArtifact = serde_json::from_str(&content)?;
    Ok(artifact.abi)
}

/// `ChainClient` over an ethers `Middleware` (a read-only provider or a
/// signing middleware). Calls are encoded through the contract ABIs loaded
/// from the pipeline's artifact files.
pub struct EthersChainClient<M> {
    client: Arc<M>,
    abis: HashMap<ContractName, Abi>,
    confirmation_attempts: usize,
    poll_interval: Duration,
}

impl<M: Middleware> EthersChainClient<M> {
    pub fn new(client: Arc<M>, abis: HashMap<ContractName, Abi>) -> Self {
        Self {
            client,
            abis,
            confirmation_attempts: DEFAULT_CONFIRMATION_ATTEMPTS,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Cap on how long a confirmation is watched; waiting forever is not an
    /// option.
    pub fn with_confirmation_budget(mut self, attempts: usize, poll_interval: Duration) -> Self {
        self.confirmation_attempts = attempts;
        self.poll_interval = poll_interval;
        self
    }

    fn encode_call(&self, call: &ContractCall) -> Result<(Function, Bytes), String> {
        let abi = self
            .abis
            .get(&call.contract)
            .ok_or_else(|| format!("no ABI loaded for {}", call.contract))?;
        let function = abi
            .function(&call.function)
            .map_err(|e| format!("{}.{}: {e}", call.contract, call.function))?
            .clone();
        let data = function
            .encode_input(&call.args)
            .map_err(|e| format!("{}.{}: {e}", call.contract, call.function))?;
        Ok((function, data.into()))
    }

    fn transaction(&self, call: &ContractCall, data: Bytes) -> TypedTransaction {
        TransactionRequest::new()
            .to(call.address)
            .data(data)
            .into()
    }
}

#[async_trait]
impl<M: Middleware + 'static> ChainClient for EthersChainClient<M> {
    async fn read(&self, call: &ContractCall) -> Result<Token, BindingError> {
        let (function, data) = self.encode_call(call).map_err(BindingError::Read)?;
        let tx = self.transaction(call, data);

        let output = self
            .client
            .call(&tx, None)
            .await
            .map_err(|e| BindingError::Read(e.to_string()))?;

        let mut tokens = function
            .decode_output(&output)
            .map_err(|e| BindingError::Read(e.to_string()))?;
        tokens
            .pop()
            .ok_or_else(|| BindingError::Read(format!("{} returned no value", call.function)))
    }

    async fn submit(&self, call: &ContractCall) -> Result<H256, BindingError> {
        let (_, data) = self.encode_call(call).map_err(BindingError::Submission)?;
        let tx = self.transaction(call, data);

        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| BindingError::Submission(e.to_string()))?;
        Ok(pending.tx_hash())
    }

    async fn wait_for_confirmation(
        &self,
        tx_hash: H256,
        _chain_id: u64,
    ) -> Result<Confirmation, BindingError> {
        for _ in 0..self.confirmation_attempts {
            let receipt = self
                .client
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(|e| BindingError::Confirmation {
                    tx_hash,
                    reason: e.to_string(),
                })?;

            if let Some(receipt) = receipt {
                let block_number = receipt.block_number.map(|n| n.as_u64()).unwrap_or_default();
                let success = receipt.status == Some(U64::from(1));
                return Ok(Confirmation {
                    tx_hash,
                    block_number,
                    success,
                });
            }

            tokio::time::sleep(self.poll_interval).await;
        }

        Err(BindingError::Confirmation {
            tx_hash,
            reason: format!("not confirmed after {} attempts", self.confirmation_attempts),
        })
    }
}
