//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Dial the JSON-RPC endpoint (HTTP or WebSocket) and check that it answers
//! - Bound every request by the configured RPC timeout
//! - Map provider responses into the `LedgerNode` surface

use alloy::consensus::TxEnvelope;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use crate::blockchain::node::LedgerNode;
use crate::blockchain::types::{BlockchainError, BlockchainResult, NodeError, NodeResult, TxReceipt};

/// JSON-RPC connection to a ledger node.
#[derive(Clone)]
pub struct BlockchainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    rpc_url: Url,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Dial `rpc_url` and check that the node answers `eth_blockNumber`.
    ///
    /// # Arguments
    /// * `rpc_url` - http(s) or ws(s) endpoint
    /// * `timeout_duration` - bound for the dial and for every later request
    pub async fn connect(rpc_url: Url, timeout_duration: Duration) -> BlockchainResult<Self> {
        let connection_error = |source| BlockchainError::Connection {
            url: rpc_url.to_string(),
            source,
        };

        let provider = match timeout(timeout_duration, ProviderBuilder::new().connect(rpc_url.as_str())).await {
            Ok(Ok(provider)) => provider,
            Ok(Err(e)) => return Err(connection_error(NodeError::Rpc(e.to_string()))),
            Err(_) => return Err(connection_error(NodeError::Timeout(timeout_duration.as_secs()))),
        };

        let client = Self {
            provider: Arc::new(provider) as Arc<dyn Provider + Send + Sync>,
            rpc_url: rpc_url.clone(),
            timeout_duration,
        };

        let block = client
            .request("eth_blockNumber", client.provider.get_block_number())
            .await
            .map_err(connection_error)?;

        tracing::info!(
            rpc_url = %client.rpc_url,
            block_number = block,
            "Connected to ledger node"
        );

        Ok(client)
    }

    /// Run one RPC request under the client timeout.
    async fn request<F, T, E>(&self, method: &'static str, fut: F) -> NodeResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(method, error = %e, "RPC error");
                Err(NodeError::Rpc(format!("{method}: {e}")))
            }
            Err(_) => {
                tracing::warn!(method, "RPC timeout");
                Err(NodeError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }
}

impl LedgerNode for BlockchainClient {
    async fn chain_id(&self) -> NodeResult<u64> {
        self.request("eth_chainId", self.provider.get_chain_id()).await
    }

    async fn pending_nonce(&self, address: Address) -> NodeResult<u64> {
        self.request(
            "eth_getTransactionCount",
            self.provider.get_transaction_count(address).pending(),
        )
        .await
    }

    async fn gas_price(&self) -> NodeResult<u128> {
        self.request("eth_gasPrice", self.provider.get_gas_price()).await
    }

    async fn code_at(&self, address: Address) -> NodeResult<Bytes> {
        self.request("eth_getCode", self.provider.get_code_at(address)).await
    }

    async fn call(&self, tx: TransactionRequest) -> NodeResult<Bytes> {
        self.request("eth_call", self.provider.call(tx)).await
    }

    async fn estimate_gas(&self, tx: TransactionRequest) -> NodeResult<u64> {
        self.request("eth_estimateGas", self.provider.estimate_gas(tx)).await
    }

    async fn send_transaction(&self, tx: TxEnvelope) -> NodeResult<TxHash> {
        let pending = self
            .request("eth_sendRawTransaction", self.provider.send_tx_envelope(tx))
            .await?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> NodeResult<Option<TxReceipt>> {
        let receipt = self
            .request(
                "eth_getTransactionReceipt",
                self.provider.get_transaction_receipt(tx_hash),
            )
            .await?;

        Ok(receipt.map(|r| TxReceipt {
            tx_hash: r.transaction_hash,
            status: r.status(),
            block_number: r.block_number,
            gas_used: r.gas_used,
        }))
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.rpc_url.as_str())
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
