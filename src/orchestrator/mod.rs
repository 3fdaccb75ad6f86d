//! Transaction orchestration.
//!
//! # Sequence
//! ```text
//! resolve_config → connect → bind_contract → read_value
//!     → set:  build_signing_identity → estimate_gas → submit → wait_confirmed → read_value
//!     → add:  build_signing_identity → estimate_gas → submit → wait_confirmed → read_value
//! ```
//!
//! The first error ends the run. The node is owned by the orchestrator and
//! dropped with it on every path.

pub mod report;

use alloy::primitives::{Address, TxHash, U256};
use std::fmt;
use std::future::Future;
use std::io::Write;
use std::time::Duration;
use url::Url;

use crate::blockchain::contract::{StorageCall, StorageContract};
use crate::blockchain::node::LedgerNode;
use crate::blockchain::transaction::{gas_limit_for, TxBuilder};
use crate::blockchain::types::{BlockchainResult, TxReceipt};
use crate::blockchain::wallet::{SigningIdentity, Wallet};
use crate::config::{resolve_config, ClientConfig, ConfigSources};

pub use report::{RunReport, WriteOutcome};

/// Resolve configuration, connect, and run the full sequence.
///
/// `connect` is only invoked once configuration has validated.
pub async fn execute<L, C, Fut, N, W>(
    lookup: L,
    sources: &ConfigSources,
    connect: C,
    out: W,
) -> BlockchainResult<RunReport>
where
    L: Fn(&str) -> Option<String>,
    C: FnOnce(Url, Duration) -> Fut,
    Fut: Future<Output = BlockchainResult<N>>,
    N: LedgerNode,
    W: Write,
{
    let config = resolve_config(lookup, sources)?;
    let node = connect(config.rpc_url.clone(), config.transaction.rpc_timeout()).await?;
    let orchestrator = Orchestrator::bind(node, config, out).await?;
    orchestrator.run().await
}

/// Drives the storage contract through one node connection.
pub struct Orchestrator<N, W> {
    node: N,
    contract: StorageContract,
    config: ClientConfig,
    out: W,
}

impl<N: LedgerNode, W: Write> Orchestrator<N, W> {
    /// Bind the configured contract on `node`. Progress lines go to `out`.
    pub async fn bind(node: N, config: ClientConfig, out: W) -> BlockchainResult<Self> {
        let contract = StorageContract::bind(config.contract_address, &node).await?;
        tracing::info!(contract_address = %contract.address(), "Contract bound");

        Ok(Self {
            node,
            contract,
            config,
            out,
        })
    }

    /// Read the stored value.
    pub async fn read_value(&self) -> BlockchainResult<U256> {
        self.contract.get(&self.node).await
    }

    /// Derive a fresh signing identity from the configured key.
    pub async fn build_signing_identity(&self) -> BlockchainResult<SigningIdentity> {
        let wallet = Wallet::from_private_key(&self.config.private_key)?;
        wallet.signing_identity(&self.node).await
    }

    pub async fn estimate_gas(&self, call: &StorageCall, from: Address) -> BlockchainResult<u64> {
        self.tx_builder().estimate_gas(call, from).await
    }

    pub async fn submit(&self, call: &StorageCall, identity: &SigningIdentity) -> BlockchainResult<TxHash> {
        self.tx_builder().submit(call, identity).await
    }

    /// Block until `tx_hash` is mined; a failed receipt is an error.
    pub async fn wait_confirmed(&self, tx_hash: TxHash) -> BlockchainResult<TxReceipt> {
        let tx = &self.config.transaction;
        self.tx_builder()
            .wait_for_confirmation(tx_hash, tx.confirmation_timeout(), tx.poll_interval())
            .await
    }

    /// Identity → estimate → submit → wait → read back.
    pub async fn write(&mut self, call: StorageCall) -> BlockchainResult<WriteOutcome> {
        let method = call.method();

        let identity = self.build_signing_identity().await?;
        let estimated_gas = self.estimate_gas(&call, identity.from).await?;
        match call {
            StorageCall::Set(_) => self.emit(format_args!("Estimated gas: {}", estimated_gas)),
            StorageCall::Add(_) => self.emit(format_args!("Estimated gas for add: {}", estimated_gas)),
        }

        let identity = identity.with_gas_limit(gas_limit_for(estimated_gas));
        tracing::info!(method, estimated_gas, gas_limit = identity.gas_limit, "Gas estimated");

        let tx_hash = self.submit(&call, &identity).await?;
        match call {
            StorageCall::Set(_) => self.emit(format_args!("Set transaction hash: {}", tx_hash)),
            StorageCall::Add(_) => self.emit(format_args!("Add transaction hash: {}", tx_hash)),
        }

        let receipt = self.wait_confirmed(tx_hash).await?;
        if let StorageCall::Set(_) = call {
            let block = receipt
                .block_number
                .map_or_else(|| "unknown".to_string(), |b| b.to_string());
            self.emit(format_args!("Transaction mined in block {}", block));
        }
        tracing::info!(
            method,
            tx_hash = %tx_hash,
            block_number = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "Transaction confirmed"
        );

        let value_after = self.read_value().await?;

        Ok(WriteOutcome {
            method,
            estimated_gas,
            gas_limit: identity.gas_limit,
            nonce: identity.nonce,
            tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            value_after,
        })
    }

    /// Run the read/set/read/add/read sequence.
    pub async fn run(mut self) -> BlockchainResult<RunReport> {
        let contract_address = self.contract.address();
        self.emit(format_args!("Contract Address: {}", contract_address));

        let initial_value = self.read_value().await?;
        self.emit(format_args!("Initial value: {}", initial_value));

        let set = self.write(StorageCall::Set(self.config.transaction.set_value())).await?;
        self.emit(format_args!("Updated value: {}", set.value_after));

        let add = self.write(StorageCall::Add(self.config.transaction.add_value())).await?;
        self.emit(format_args!("New Value After Add: {}", add.value_after));

        tracing::info!(initial = %initial_value, final_value = %add.value_after, "Run complete");

        Ok(RunReport {
            contract_address,
            initial_value,
            set,
            add,
        })
    }

    fn tx_builder(&self) -> TxBuilder<'_, N> {
        TxBuilder::new(&self.node, self.contract)
    }

    // Progress output is best-effort; a failed write never fails the run.
    fn emit(&mut self, line: fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            tracing::warn!(error = %e, "Failed to write progress line");
        }
    }
}
