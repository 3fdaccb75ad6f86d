//! Private key loading and per-transaction signing identities.
//!
//! # Security
//! - Keys are never logged or serialized
//! - Nonce, chain id and gas price are fetched fresh for every identity

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, U256};
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::node::LedgerNode;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};

/// Gas limit an identity carries until an estimate replaces it.
pub const DEFAULT_GAS_LIMIT: u64 = 3_000_000;

/// Parsed signing key.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Authorization(format!("Invalid private key format: {}", e)))?;

        Ok(Self { signer })
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Build a signing identity for the next transaction from this wallet.
    ///
    /// Looks up the pending nonce, the chain id and the suggested gas price.
    pub async fn signing_identity<N: LedgerNode>(&self, node: &N) -> BlockchainResult<SigningIdentity> {
        let from = self.address();

        let nonce = node
            .pending_nonce(from)
            .await
            .map_err(|e| BlockchainError::Authorization(format!("nonce lookup for {from} failed: {e}")))?;
        let chain_id = node
            .chain_id()
            .await
            .map_err(|e| BlockchainError::Authorization(format!("chain id lookup failed: {e}")))?;
        let gas_price = node
            .gas_price()
            .await
            .map_err(|e| BlockchainError::Authorization(format!("gas price lookup failed: {e}")))?;

        tracing::debug!(address = %from, nonce, chain_id, gas_price, "Signing identity built");

        Ok(SigningIdentity {
            from,
            nonce,
            chain_id: ChainId(chain_id),
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_price,
            value: U256::ZERO,
            wallet: EthereumWallet::from(self.signer.clone()),
        })
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet").field("address", &self.address()).finish()
    }
}

/// Everything needed to sign one state-changing call.
#[derive(Clone)]
pub struct SigningIdentity {
    pub from: Address,
    pub nonce: u64,
    /// Chain ID for EIP-155 replay protection.
    pub chain_id: ChainId,
    pub gas_limit: u64,
    /// Legacy gas price in wei.
    pub gas_price: u128,
    /// Native value attached to the call; always zero here.
    pub value: U256,
    wallet: EthereumWallet,
}

impl SigningIdentity {
    /// Replace the gas limit.
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Wallet used to sign the transaction.
    pub fn wallet(&self) -> &EthereumWallet {
        &self.wallet
    }
}

impl std::fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("from", &self.from)
            .field("nonce", &self.nonce)
            .field("chain_id", &self.chain_id.0)
            .field("gas_limit", &self.gas_limit)
            .field("gas_price", &self.gas_price)
            .field("value", &self.value)
            .finish()
    }
}
