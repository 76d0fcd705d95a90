use std::sync::Mutex;

use ethers::types::H256;

use crate::client::{ChainClient, Confirmation, ContractCall};
use crate::error::BindingError;
use crate::read::ReadBinding;

/// Lifecycle of one user action slot. At most one pending handle exists per
/// slot; a settled attempt (confirmed, reverted or rejected) returns the
/// slot to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
    Idle,
    Submitting,
    Pending { tx_hash: H256, chain_id: u64 },
}

impl Default for WriteState {
    fn default() -> Self {
        WriteState::Idle
    }
}

/// Drives `Idle -> Submitting -> Pending -> Idle` for a single action slot
/// and triggers exactly one read refresh per confirmed transaction.
#[derive(Default)]
pub struct WriteTracker {
    state: Mutex<WriteState>,
}

impl WriteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WriteState {
        *self.state.lock().unwrap()
    }

    pub fn is_busy(&self) -> bool {
        self.state() != WriteState::Idle
    }

    /// Broadcast a state-changing call. Rejected while a previous submission
    /// for this slot is still in flight or awaiting confirmation.
    pub async fn submit<C: ChainClient + ?Sized>(
        &self,
        client: &C,
        call: &ContractCall,
    ) -> Result<H256, BindingError> {
        {
            let mut state = self.state.lock().unwrap();
            if *state != WriteState::Idle {
                return Err(BindingError::Submission(
                    "a transaction is already pending for this action".to_owned(),
                ));
            }
            *state = WriteState::Submitting;
        }

        match client.submit(call).await {
            Ok(tx_hash) => {
                *self.state.lock().unwrap() = WriteState::Pending {
                    tx_hash,
                    chain_id: call.chain_id,
                };
                Ok(tx_hash)
            }
            Err(e) => {
                *self.state.lock().unwrap() = WriteState::Idle;
                Err(e)
            }
        }
    }

    /// Wait for the pending transaction, if any, to reach a terminal status.
    ///
    /// On success the pending handle is cleared first and the supplied read
    /// binding is refetched exactly once. A revert clears the handle and
    /// surfaces `Confirmation` without refetching, so a failed state change
    /// never masquerades as a successful refresh. When no handle is pending,
    /// including a duplicate notification for an already-settled
    /// transaction, this is a no-op returning `Ok(None)`.
    pub async fn confirm<C: ChainClient + ?Sized>(
        &self,
        client: &C,
        refresh: &ReadBinding,
    ) -> Result<Option<Confirmation>, BindingError> {
        let (tx_hash, chain_id) = match self.state() {
            WriteState::Pending { tx_hash, chain_id } => (tx_hash, chain_id),
            _ => return Ok(None),
        };

        let waited = client.wait_for_confirmation(tx_hash, chain_id).await;

        {
            let mut state = self.state.lock().unwrap();
            match *state {
                WriteState::Pending { tx_hash: pending, .. } if pending == tx_hash => {
                    // clear before any refresh is dispatched
                    *state = WriteState::Idle;
                }
                // another caller already settled this slot
                _ => return Ok(None),
            }
        }

        let confirmation = waited?;

        if !confirmation.success {
            return Err(BindingError::Confirmation {
                tx_hash,
                reason: "transaction reverted".to_owned(),
            });
        }

        refresh.refetch(client).await;
        Ok(Some(confirmation))
    }

    /// Stop watching the pending transaction without learning its outcome.
    /// The broadcast itself cannot be retracted; the abandoned handle is
    /// returned so the caller can surface the ambiguity.
    pub fn reset(&self) -> Option<H256> {
        let mut state = self.state.lock().unwrap();
        let abandoned = match *state {
            WriteState::Pending { tx_hash, .. } => Some(tx_hash),
            _ => None,
        };
        *state = WriteState::Idle;
        abandoned
    }
}

#[cfg(test)]
mod tests {
    use ethers::types::{Address, U256};

    use super::*;
    use crate::client::test_utils::MockChainClient;
    use crate::client::ContractCall;
    use crate::error::BindingError;
    use crate::registry::ContractName;
    use ethers::abi::Token;

    fn inc_call() -> ContractCall {
        ContractCall::new(
            ContractName::Counter,
            Address::repeat_byte(0xAA),
            31337,
            "inc",
            vec![],
        )
    }

    fn value_binding() -> ReadBinding {
        ReadBinding::new(Some(ContractCall::new(
            ContractName::Counter,
            Address::repeat_byte(0xAA),
            31337,
            "x",
            vec![],
        )))
    }

    #[tokio::test]
    async fn confirmed_write_triggers_exactly_one_refetch() {
        let client = MockChainClient::new();
        let tx_hash = H256::repeat_byte(0x11);
        client.queue_submission(Ok(tx_hash));
        client.queue_confirmation(Ok(Confirmation {
            tx_hash,
            block_number: 42,
            success: true,
        }));
        client.queue_read(Ok(Token::Uint(U256::from(6u64))));

        let tracker = WriteTracker::new();
        let binding = value_binding();

        let submitted = tracker.submit(&client, &inc_call()).await.unwrap();
        assert_eq!(submitted, tx_hash);
        assert_eq!(
            tracker.state(),
            WriteState::Pending {
                tx_hash,
                chain_id: 31337
            }
        );

        let confirmation = tracker.confirm(&client, &binding).await.unwrap().unwrap();
        assert_eq!(confirmation.block_number, 42);
        assert_eq!(tracker.state(), WriteState::Idle);
        assert_eq!(client.read_count(), 1);
        assert_eq!(binding.snapshot().value, Some(Token::Uint(U256::from(6u64))));

        // a duplicate notification for the same handle finds the slot idle
        let duplicate = tracker.confirm(&client, &binding).await.unwrap();
        assert_eq!(duplicate, None);
        assert_eq!(client.read_count(), 1);
        assert_eq!(client.wait_count(), 1);
    }

    #[tokio::test]
    async fn reverted_transaction_surfaces_error_without_refetch() {
        let client = MockChainClient::new();
        let tx_hash = H256::repeat_byte(0x22);
        client.queue_submission(Ok(tx_hash));
        client.queue_confirmation(Ok(Confirmation {
            tx_hash,
            block_number: 43,
            success: false,
        }));

        let tracker = WriteTracker::new();
        let binding = value_binding();

        tracker.submit(&client, &inc_call()).await.unwrap();
        let err = tracker.confirm(&client, &binding).await.unwrap_err();

        assert!(matches!(err, BindingError::Confirmation { .. }));
        assert_eq!(tracker.state(), WriteState::Idle);
        assert_eq!(client.read_count(), 0);
    }

    #[tokio::test]
    async fn rejected_submission_returns_to_idle() {
        let client = MockChainClient::new();
        client.queue_submission(Err(BindingError::Submission(
            "user rejected the request".to_owned(),
        )));

        let tracker = WriteTracker::new();

        let err = tracker.submit(&client, &inc_call()).await.unwrap_err();

        assert_eq!(
            err,
            BindingError::Submission("user rejected the request".to_owned())
        );
        assert_eq!(err.to_string(), "user rejected the request");
        assert_eq!(tracker.state(), WriteState::Idle);
        assert_eq!(client.wait_count(), 0);
    }

    #[tokio::test]
    async fn second_submit_while_pending_is_rejected() {
        let client = MockChainClient::new();
        client.queue_submission(Ok(H256::repeat_byte(0x33)));

        let tracker = WriteTracker::new();

        tracker.submit(&client, &inc_call()).await.unwrap();
        let err = tracker.submit(&client, &inc_call()).await.unwrap_err();

        assert!(matches!(err, BindingError::Submission(_)));
        assert_eq!(client.submit_count(), 1);
        assert!(tracker.is_busy());
    }

    #[tokio::test]
    async fn confirm_on_idle_slot_is_a_noop() {
        let client = MockChainClient::new();
        let tracker = WriteTracker::new();
        let binding = value_binding();

        let outcome = tracker.confirm(&client, &binding).await.unwrap();

        assert_eq!(outcome, None);
        assert_eq!(client.total_calls(), 0);
    }

    #[tokio::test]
    async fn failed_confirmation_watch_clears_pending() {
        let client = MockChainClient::new();
        let tx_hash = H256::repeat_byte(0x44);
        client.queue_submission(Ok(tx_hash));
        client.queue_confirmation(Err(BindingError::Confirmation {
            tx_hash,
            reason: "not confirmed after 12 attempts".to_owned(),
        }));

        let tracker = WriteTracker::new();
        let binding = value_binding();

        tracker.submit(&client, &inc_call()).await.unwrap();
        let err = tracker.confirm(&client, &binding).await.unwrap_err();

        assert!(matches!(err, BindingError::Confirmation { .. }));
        assert_eq!(tracker.state(), WriteState::Idle);
        assert_eq!(client.read_count(), 0);
    }

    #[tokio::test]
    async fn reset_abandons_the_pending_handle() {
        let client = MockChainClient::new();
        let tx_hash = H256::repeat_byte(0x55);
        client.queue_submission(Ok(tx_hash));

        let tracker = WriteTracker::new();
        tracker.submit(&client, &inc_call()).await.unwrap();

        assert_eq!(tracker.reset(), Some(tx_hash));
        assert_eq!(tracker.state(), WriteState::Idle);
        assert_eq!(tracker.reset(), None);
    }
}
