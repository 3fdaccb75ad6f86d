//! Transaction estimation, signing, and confirmation monitoring.
//!
//! # Responsibilities
//! - Estimate gas and apply the fixed safety margin
//! - Sign locally and broadcast the raw envelope
//! - Poll for the receipt until it appears or the wait times out
//!
//! Nothing here retries: the first failure is returned to the caller.

use alloy::network::{Ethereum, TransactionBuilder};
use alloy::primitives::{Address, TxHash};
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::contract::{StorageCall, StorageContract};
use crate::blockchain::node::LedgerNode;
use crate::blockchain::types::{BlockchainError, BlockchainResult, TxReceipt};
use crate::blockchain::wallet::SigningIdentity;

/// Units added to every gas estimate to form the submitted gas limit.
pub const GAS_LIMIT_MARGIN: u64 = 20_000;

/// Gas limit submitted for a given estimate.
pub fn gas_limit_for(estimate: u64) -> u64 {
    estimate.saturating_add(GAS_LIMIT_MARGIN)
}

/// Builds and tracks transactions against one contract.
pub struct TxBuilder<'a, N> {
    node: &'a N,
    contract: StorageContract,
}

impl<'a, N: LedgerNode> TxBuilder<'a, N> {
    /// Create a new transaction builder.
    pub fn new(node: &'a N, contract: StorageContract) -> Self {
        Self { node, contract }
    }

    /// Ask the node how much gas `call` needs when sent from `from`.
    pub async fn estimate_gas(&self, call: &StorageCall, from: Address) -> BlockchainResult<u64> {
        self.node
            .estimate_gas(self.contract.request(call, from))
            .await
            .map_err(|source| BlockchainError::Estimation {
                method: call.method(),
                source,
            })
    }

    /// Sign `call` with `identity` and broadcast it.
    pub async fn submit(&self, call: &StorageCall, identity: &SigningIdentity) -> BlockchainResult<TxHash> {
        let method = call.method();

        let tx = self
            .contract
            .request(call, identity.from)
            .with_nonce(identity.nonce)
            .with_chain_id(identity.chain_id.into())
            .with_gas_limit(identity.gas_limit)
            .with_gas_price(identity.gas_price)
            .with_value(identity.value);

        let envelope = TransactionBuilder::<Ethereum>::build(tx, identity.wallet())
            .await
            .map_err(|e| BlockchainError::Submission {
                method,
                reason: format!("signing failed: {e}"),
            })?;

        let tx_hash = self
            .node
            .send_transaction(envelope)
            .await
            .map_err(|e| BlockchainError::Submission {
                method,
                reason: e.to_string(),
            })?;

        tracing::info!(
            method,
            tx_hash = %tx_hash,
            nonce = identity.nonce,
            gas_limit = identity.gas_limit,
            "Transaction submitted"
        );

        Ok(tx_hash)
    }

    /// Wait for a transaction to be mined.
    ///
    /// # Arguments
    /// * `tx_hash` - Transaction hash to monitor
    /// * `wait_timeout` - Maximum time to wait for the receipt
    /// * `poll_interval` - Delay between receipt queries
    pub async fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
        wait_timeout: Duration,
        poll_interval: Duration,
    ) -> BlockchainResult<TxReceipt> {
        let result = timeout(wait_timeout, async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                match self.node.transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => return Ok(receipt),
                    Ok(None) => tracing::debug!(tx_hash = %tx_hash, "Transaction pending"),
                    Err(e) => {
                        return Err(BlockchainError::Confirmation {
                            tx_hash,
                            reason: e.to_string(),
                        })
                    }
                }
            }
        })
        .await;

        let receipt = match result {
            Ok(receipt) => receipt?,
            Err(_) => {
                return Err(BlockchainError::Confirmation {
                    tx_hash,
                    reason: format!("timed out after {:?}", wait_timeout),
                })
            }
        };

        if !receipt.status {
            return Err(BlockchainError::Reverted {
                tx_hash,
                block_number: receipt.block_number,
            });
        }

        Ok(receipt)
    }
}
