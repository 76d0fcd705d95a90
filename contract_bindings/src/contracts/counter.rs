use ethers::abi::Token;
use ethers::types::{Address, H256, U256};

use crate::client::{ChainClient, Confirmation, ContractCall};
use crate::error::BindingError;
use crate::read::{ReadBinding, ReadResult};
use crate::registry::ContractName;
use crate::resolver::AddressResolver;
use crate::tracker::{WriteState, WriteTracker};

const VALUE_FUNCTION: &str = "x";
const INC_FUNCTION: &str = "inc";
const INC_BY_FUNCTION: &str = "incBy";

/// Client-side binding for the Counter contract: one read slot for the
/// current value and one write slot shared by `inc`/`incBy`.
///
/// The address is resolved once at construction for the active chain. When
/// it does not resolve the contract stays usable but refuses every call
/// locally with a `Configuration` error.
pub struct CounterContract {
    address: Option<Address>,
    chain_id: u64,
    value: ReadBinding,
    writes: WriteTracker,
}

impl CounterContract {
    pub fn new(resolver: &AddressResolver, chain_id: u64) -> Self {
        let address = resolver.resolve(ContractName::Counter, chain_id);
        let value = ReadBinding::new(address.map(|address| {
            ContractCall::new(ContractName::Counter, address, chain_id, VALUE_FUNCTION, vec![])
        }));
        Self {
            address,
            chain_id,
            value,
            writes: WriteTracker::new(),
        }
    }

    pub fn address(&self) -> Option<Address> {
        self.address
    }

    pub fn value(&self) -> ReadResult {
        self.value.snapshot()
    }

    /// The counter value as an integer, once a read has succeeded.
    pub fn current_value(&self) -> Option<U256> {
        match self.value.snapshot().value {
            Some(Token::Uint(v)) => Some(v),
            _ => None,
        }
    }

    pub async fn refresh<C: ChainClient + ?Sized>(&self, client: &C) -> ReadResult {
        self.value.refetch(client).await
    }

    /// Submit `inc()`.
    pub async fn increment<C: ChainClient + ?Sized>(
        &self,
        client: &C,
    ) -> Result<H256, BindingError> {
        let call = self.write_call(INC_FUNCTION, vec![])?;
        self.writes.submit(client, &call).await
    }

    /// Submit `incBy(amount)`. The amount is validated locally; nothing
    /// reaches the chain client for a non-positive amount.
    pub async fn increment_by<C: ChainClient + ?Sized>(
        &self,
        client: &C,
        amount: i64,
    ) -> Result<H256, BindingError> {
        if amount <= 0 {
            return Err(BindingError::Validation(
                "Increment must be a positive integer".to_owned(),
            ));
        }
        let call = self.write_call(
            INC_BY_FUNCTION,
            vec![Token::Uint(U256::from(amount as u64))],
        )?;
        self.writes.submit(client, &call).await
    }

    /// Await the pending write, refreshing the value on success.
    pub async fn wait_for_confirmation<C: ChainClient + ?Sized>(
        &self,
        client: &C,
    ) -> Result<Option<Confirmation>, BindingError> {
        self.writes.confirm(client, &self.value).await
    }

    pub fn write_state(&self) -> WriteState {
        self.writes.state()
    }

    pub fn is_busy(&self) -> bool {
        self.writes.is_busy()
    }

    fn write_call(&self, function: &str, args: Vec<Token>) -> Result<ContractCall, BindingError> {
        let address = self.address.ok_or(BindingError::Configuration {
            contract: ContractName::Counter,
        })?;
        Ok(ContractCall::new(
            ContractName::Counter,
            address,
            self.chain_id,
            function,
            args,
        ))
    }
}
