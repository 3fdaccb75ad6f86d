//! The request surface the orchestrator needs from a ledger node.
//!
//! `BlockchainClient` implements it over JSON-RPC; tests implement it with an
//! in-memory node.

use alloy::consensus::TxEnvelope;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;

use crate::blockchain::types::{NodeResult, TxReceipt};

/// Connection to a remote ledger node.
#[allow(async_fn_in_trait)]
pub trait LedgerNode {
    /// `eth_chainId`
    async fn chain_id(&self) -> NodeResult<u64>;

    /// `eth_getTransactionCount` against the pending block.
    async fn pending_nonce(&self, address: Address) -> NodeResult<u64>;

    /// `eth_gasPrice`, in wei.
    async fn gas_price(&self) -> NodeResult<u128>;

    /// `eth_getCode` at the latest block.
    async fn code_at(&self, address: Address) -> NodeResult<Bytes>;

    /// `eth_call`
    async fn call(&self, tx: TransactionRequest) -> NodeResult<Bytes>;

    /// `eth_estimateGas`
    async fn estimate_gas(&self, tx: TransactionRequest) -> NodeResult<u64>;

    /// Broadcast a signed transaction, returning its hash.
    async fn send_transaction(&self, tx: TxEnvelope) -> NodeResult<TxHash>;

    /// `eth_getTransactionReceipt`; `None` while the transaction is pending.
    async fn transaction_receipt(&self, tx_hash: TxHash) -> NodeResult<Option<TxReceipt>>;
}
