//! `SimpleStorage` contract binding.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::{SolCall, SolValue};

use crate::blockchain::node::LedgerNode;
use crate::blockchain::types::{BlockchainError, BlockchainResult, NodeError};

sol! {
    /// Single-integer store.
    #[derive(Debug)]
    contract SimpleStorage {
        function get() external view returns (uint256);
        function set(uint256 value) external;
        function add(uint256 value) external;
    }
}

/// A state-changing call on the storage contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageCall {
    /// Overwrite the stored value.
    Set(U256),
    /// Add to the stored value.
    Add(U256),
}

impl StorageCall {
    /// Solidity function name.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Set(_) => "set",
            Self::Add(_) => "add",
        }
    }

    /// ABI-encoded call data.
    pub fn calldata(&self) -> Bytes {
        match *self {
            Self::Set(value) => SimpleStorage::setCall { value }.abi_encode().into(),
            Self::Add(value) => SimpleStorage::addCall { value }.abi_encode().into(),
        }
    }
}

/// Address of a deployed `SimpleStorage` paired with its interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageContract {
    address: Address,
}

impl StorageContract {
    /// Bind to the contract at `address`.
    ///
    /// Fails when the address holds no bytecode. The selectors themselves are
    /// not checked against the deployed code.
    pub async fn bind<N: LedgerNode>(address: Address, node: &N) -> BlockchainResult<Self> {
        let code = node.code_at(address).await.map_err(|e| BlockchainError::Binding {
            address,
            reason: e.to_string(),
        })?;

        if code.is_empty() {
            return Err(BlockchainError::Binding {
                address,
                reason: "no contract code deployed at this address".to_string(),
            });
        }

        tracing::debug!(address = %address, code_len = code.len(), "Contract bound");
        Ok(Self { address })
    }

    /// Get the contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Call `get()` and decode the stored value.
    pub async fn get<N: LedgerNode>(&self, node: &N) -> BlockchainResult<U256> {
        let request = TransactionRequest::default()
            .with_to(self.address)
            .with_input(SimpleStorage::getCall::new(()).abi_encode());

        let output = node
            .call(request)
            .await
            .map_err(|source| BlockchainError::Call { method: "get", source })?;

        U256::abi_decode(&output).map_err(|e| BlockchainError::Call {
            method: "get",
            source: NodeError::Decode(e.to_string()),
        })
    }

    /// Unsigned request for `call` sent from `from`.
    pub fn request(&self, call: &StorageCall, from: Address) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(from)
            .with_to(self.address)
            .with_input(call.calldata())
    }
}
