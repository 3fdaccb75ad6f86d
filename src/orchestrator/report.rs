//! Values observed during a run.

use alloy::primitives::{Address, TxHash, U256};

/// Outcome of one confirmed state-changing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Solidity function that was called.
    pub method: &'static str,
    pub estimated_gas: u64,
    /// Gas limit the transaction was signed with.
    pub gas_limit: u64,
    pub nonce: u64,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    /// `get()` result read after confirmation.
    pub value_after: U256,
}

/// Everything a full run printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub contract_address: Address,
    pub initial_value: U256,
    pub set: WriteOutcome,
    pub add: WriteOutcome,
}

impl RunReport {
    /// Value stored after `set`.
    pub fn updated_value(&self) -> U256 {
        self.set.value_after
    }

    /// Value stored after `add`.
    pub fn final_value(&self) -> U256 {
        self.add.value_after
    }
}
