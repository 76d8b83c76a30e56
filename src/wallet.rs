//! Fee payer keypair loading

use anyhow::{Context, Result};
use solana_sdk::signature::Keypair;

/// Load a keypair from a file holding either a JSON byte array (the format
/// `solana-keygen` writes and the launch configs reference) or raw 64 bytes.
pub fn keypair_from_file(path: &str) -> Result<Keypair> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read keypair file: {}", path))?;

    let secret = if bytes.len() == 64 {
        bytes
    } else {
        serde_json::from_slice::<Vec<u8>>(&bytes)
            .with_context(|| format!("Failed to parse keypair JSON: {}", path))?
    };
    keypair_from_bytes(&secret).with_context(|| format!("Invalid keypair in file: {}", path))
}

/// Load a keypair from a bs58-encoded secret key string
pub fn keypair_from_base58(secret: &str) -> Result<Keypair> {
    let bytes = bs58::decode(secret)
        .into_vec()
        .context("Failed to decode bs58 secret key")?;
    keypair_from_bytes(&bytes)
}

fn keypair_from_bytes(bytes: &[u8]) -> Result<Keypair> {
    if bytes.len() != 64 {
        anyhow::bail!(
            "Invalid keypair length: expected 64 bytes, got {}",
            bytes.len()
        );
    }
    if bytes.iter().all(|&b| b == 0) {
        anyhow::bail!("Invalid keypair: all-zero key rejected");
    }
    Keypair::try_from(bytes).context("Invalid keypair bytes")
}
