use std::time::Duration;

pub const MAINNET_DEFAULT_RPC_URL: &str = "https://starknet-mainnet.public.blastapi.io/rpc/v0_9";
pub const SEPOLIA_DEFAULT_RPC_URL: &str = "https://starknet-sepolia.public.blastapi.io/rpc/v0_9";
pub const DEVNET_DEFAULT_RPC_URL: &str = "http://127.0.0.1:5050/rpc";

/// Status reported to a progress sink right before a declare transaction is sent.
pub const DECLARING_STATUS: &str = "declaring";

pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const RECEIPT_POLL_ATTEMPTS: u32 = 90;
