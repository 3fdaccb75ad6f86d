//! Shared utilities for integration testing: an in-memory ledger node that
//! runs a `SimpleStorage` contract.

#![allow(dead_code)]

use alloy::consensus::{Transaction, TxEnvelope};
use alloy::primitives::{address, Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::{SolInterface, SolValue};
use std::collections::HashMap;
use std::future::{ready, Ready};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

use simple_storage_client::blockchain::contract::SimpleStorage::SimpleStorageCalls;
use simple_storage_client::blockchain::{BlockchainResult, LedgerNode, NodeError, NodeResult, TxReceipt};
use simple_storage_client::config::loader::{CONTRACT_ADDRESS_VAR, PRIVATE_KEY_VAR, RPC_URL_VAR};
use simple_storage_client::config::{ConfigSources, TransactionOverrides};

/// Anvil's first account.
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_SENDER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const CONTRACT: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
pub const CHAIN_ID: u64 = 31337;
pub const GAS_PRICE: u128 = 1_000_000_000;

/// Knobs for scripted node behavior.
#[derive(Debug, Clone)]
pub struct MockBehavior {
    pub set_gas: u64,
    pub add_gas: u64,
    /// Method whose mined receipt reports failure.
    pub revert_on_chain: Option<&'static str>,
    /// Method whose gas estimation fails.
    pub fail_estimate: Option<&'static str>,
    /// Receipt queries answered `None` before the transaction is mined.
    pub pending_polls: u32,
    pub never_mine: bool,
    pub code_deployed: bool,
    /// RPC method that answers with an error, e.g. `"eth_call"`.
    pub fail_rpc: Option<&'static str>,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            set_gas: 43_724,
            add_gas: 29_112,
            revert_on_chain: None,
            fail_estimate: None,
            pending_polls: 0,
            never_mine: false,
            code_deployed: true,
            fail_rpc: None,
        }
    }
}

/// A signed transaction as the node received it.
#[derive(Debug, Clone)]
pub struct SubmittedTx {
    pub method: &'static str,
    pub tx_hash: TxHash,
    pub nonce: u64,
    pub gas_limit: u64,
    pub gas_price: Option<u128>,
    pub chain_id: Option<u64>,
    pub value: U256,
}

#[derive(Debug, Clone, Copy)]
enum StorageWrite {
    Set(U256),
    Add(U256),
}

impl StorageWrite {
    fn method(&self) -> &'static str {
        match self {
            Self::Set(_) => "set",
            Self::Add(_) => "add",
        }
    }
}

#[derive(Debug)]
struct Pending {
    write: StorageWrite,
    polls: u32,
}

#[derive(Debug, Default)]
struct MockState {
    value: U256,
    block_number: u64,
    nonce: u64,
    pending: HashMap<TxHash, Pending>,
    receipts: HashMap<TxHash, TxReceipt>,
    rpc_log: Vec<&'static str>,
    submitted: Vec<SubmittedTx>,
}

/// In-memory node. Clones share state.
#[derive(Clone)]
pub struct MockNode {
    state: Arc<Mutex<MockState>>,
    behavior: Arc<MockBehavior>,
}

impl MockNode {
    pub fn new(initial: u64) -> Self {
        Self::with_behavior(initial, MockBehavior::default())
    }

    pub fn with_behavior(initial: u64, behavior: MockBehavior) -> Self {
        let state = MockState {
            value: U256::from(initial),
            block_number: 100,
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            behavior: Arc::new(behavior),
        }
    }

    /// Stored value as of the last mined block.
    pub fn value(&self) -> U256 {
        self.state.lock().unwrap().value
    }

    /// Every RPC method received, in order.
    pub fn rpc_log(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().rpc_log.clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.rpc_log().iter().filter(|m| **m == method).count()
    }

    pub fn submitted(&self) -> Vec<SubmittedTx> {
        self.state.lock().unwrap().submitted.clone()
    }

    fn record(&self, method: &'static str) -> NodeResult<()> {
        self.state.lock().unwrap().rpc_log.push(method);
        if self.behavior.fail_rpc == Some(method) {
            return Err(NodeError::Rpc(format!("{method}: connection reset")));
        }
        Ok(())
    }
}

fn decode(input: &[u8]) -> NodeResult<SimpleStorageCalls> {
    SimpleStorageCalls::abi_decode(input).map_err(|e| NodeError::Rpc(format!("execution reverted: {e}")))
}

fn request_input(tx: &TransactionRequest) -> NodeResult<Bytes> {
    tx.input
        .input()
        .cloned()
        .ok_or_else(|| NodeError::Rpc("missing input".into()))
}

impl LedgerNode for MockNode {
    async fn chain_id(&self) -> NodeResult<u64> {
        self.record("eth_chainId")?;
        Ok(CHAIN_ID)
    }

    async fn pending_nonce(&self, address: Address) -> NodeResult<u64> {
        self.record("eth_getTransactionCount")?;
        let state = self.state.lock().unwrap();
        Ok(if address == TEST_SENDER { state.nonce } else { 0 })
    }

    async fn gas_price(&self) -> NodeResult<u128> {
        self.record("eth_gasPrice")?;
        Ok(GAS_PRICE)
    }

    async fn code_at(&self, address: Address) -> NodeResult<Bytes> {
        self.record("eth_getCode")?;
        if self.behavior.code_deployed && address == CONTRACT {
            Ok(Bytes::from_static(&[0x60, 0x80, 0x60, 0x40, 0x52]))
        } else {
            Ok(Bytes::new())
        }
    }

    async fn call(&self, tx: TransactionRequest) -> NodeResult<Bytes> {
        self.record("eth_call")?;
        match decode(&request_input(&tx)?)? {
            SimpleStorageCalls::get(_) => Ok(self.value().abi_encode().into()),
            _ => Ok(Bytes::new()),
        }
    }

    async fn estimate_gas(&self, tx: TransactionRequest) -> NodeResult<u64> {
        self.record("eth_estimateGas")?;
        let (method, gas) = match decode(&request_input(&tx)?)? {
            SimpleStorageCalls::set(_) => ("set", self.behavior.set_gas),
            SimpleStorageCalls::add(_) => ("add", self.behavior.add_gas),
            SimpleStorageCalls::get(_) => ("get", 23_000),
        };
        if self.behavior.fail_estimate == Some(method) {
            return Err(NodeError::Rpc("execution reverted".into()));
        }
        Ok(gas)
    }

    async fn send_transaction(&self, tx: TxEnvelope) -> NodeResult<TxHash> {
        self.record("eth_sendRawTransaction")?;
        let write = match decode(tx.input())? {
            SimpleStorageCalls::set(c) => StorageWrite::Set(c.value),
            SimpleStorageCalls::add(c) => StorageWrite::Add(c.value),
            SimpleStorageCalls::get(_) => return Err(NodeError::Rpc("get is read-only".into())),
        };

        let mut state = self.state.lock().unwrap();
        if tx.nonce() != state.nonce {
            return Err(NodeError::Rpc(format!("nonce mismatch: expected {}", state.nonce)));
        }
        if tx.chain_id() != Some(CHAIN_ID) {
            return Err(NodeError::Rpc("invalid chain id".into()));
        }

        let tx_hash = *tx.tx_hash();
        state.nonce += 1;
        state.pending.insert(tx_hash, Pending { write, polls: 0 });
        state.submitted.push(SubmittedTx {
            method: write.method(),
            tx_hash,
            nonce: tx.nonce(),
            gas_limit: tx.gas_limit(),
            gas_price: tx.gas_price(),
            chain_id: tx.chain_id(),
            value: tx.value(),
        });
        Ok(tx_hash)
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> NodeResult<Option<TxReceipt>> {
        self.record("eth_getTransactionReceipt")?;
        let mut state = self.state.lock().unwrap();

        if let Some(receipt) = state.receipts.get(&tx_hash) {
            return Ok(Some(receipt.clone()));
        }

        let Some(pending) = state.pending.get_mut(&tx_hash) else {
            return Ok(None);
        };
        pending.polls += 1;
        if self.behavior.never_mine || pending.polls <= self.behavior.pending_polls {
            return Ok(None);
        }

        let write = pending.write;
        state.pending.remove(&tx_hash);
        state.block_number += 1;

        let status = self.behavior.revert_on_chain != Some(write.method());
        if status {
            state.value = match write {
                StorageWrite::Set(v) => v,
                StorageWrite::Add(v) => state.value + v,
            };
        }

        let receipt = TxReceipt {
            tx_hash,
            status,
            block_number: Some(state.block_number),
            gas_used: 21_000,
        };
        state.receipts.insert(tx_hash, receipt.clone());
        Ok(Some(receipt))
    }
}

/// Environment lookup with all three variables set, minus `omit`.
pub fn test_env(omit: Option<&'static str>) -> impl Fn(&str) -> Option<String> {
    move |name| {
        if Some(name) == omit {
            return None;
        }
        match name {
            n if n == RPC_URL_VAR => Some("http://127.0.0.1:8545".to_string()),
            n if n == CONTRACT_ADDRESS_VAR => Some(CONTRACT.to_string()),
            n if n == PRIVATE_KEY_VAR => Some(TEST_PRIVATE_KEY.to_string()),
            _ => None,
        }
    }
}

/// Sources with short polling so tests stay fast.
pub fn fast_sources() -> ConfigSources {
    ConfigSources {
        file: None,
        overrides: TransactionOverrides {
            poll_interval_ms: Some(5),
            confirmation_timeout_secs: Some(1),
            ..Default::default()
        },
    }
}

/// Connector that hands out `node` without dialing.
pub fn connect_to(node: MockNode) -> impl FnOnce(Url, Duration) -> Ready<BlockchainResult<MockNode>> {
    move |_url, _timeout| ready(Ok(node))
}
