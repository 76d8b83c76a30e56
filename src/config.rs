//! Launch configuration: JSON schema, validation and quote-token resolution
//!
//! Each operator script consumes one JSON configuration file. The structs here
//! mirror that schema (camelCase on the wire) and `validate` enforces the
//! cross-field rules that the schema alone cannot express.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;
use spl_token::solana_program::program_pack::Pack;

pub const SOL_TOKEN_MINT: &str = "So11111111111111111111111111111111111111112";
pub const USDC_TOKEN_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
pub const SOL_TOKEN_DECIMALS: u8 = 9;
pub const USDC_TOKEN_DECIMALS: u8 = 6;

/// Top-level launch configuration, one per script invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConfig {
    pub rpc_url: String,
    pub dry_run: bool,
    pub keypair_file_path: String,
    pub compute_unit_price_micro_lamports: u64,
    #[serde(default)]
    pub create_base_token: Option<CreateBaseTokenConfig>,
    #[serde(default)]
    pub base_mint: Option<String>,
    #[serde(default)]
    pub quote_symbol: Option<String>,
    #[serde(default)]
    pub quote_mint: Option<String>,
    #[serde(default)]
    pub dynamic_amm: Option<DynamicAmmConfig>,
    #[serde(default)]
    pub dlmm: Option<DlmmConfig>,
    #[serde(default)]
    pub alpha_vault: Option<AlphaVaultConfig>,
}

/// Token amounts appear as either JSON numbers or decimal strings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBaseTokenConfig {
    pub mint_base_token_amount: Amount,
    pub base_decimals: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationType {
    Slot,
    Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceRounding {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicAmmConfig {
    pub base_amount: Amount,
    pub quote_amount: Amount,
    pub trade_fee_numerator: u64,
    pub activation_type: ActivationType,
    #[serde(default)]
    pub activation_point: Option<u64>,
    pub has_alpha_vault: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DlmmConfig {
    pub bin_step: u16,
    pub fee_bps: u16,
    pub initial_price: f64,
    pub activation_type: ActivationType,
    #[serde(default)]
    pub activation_point: Option<u64>,
    pub price_rounding: PriceRounding,
    pub has_alpha_vault: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhitelistMode {
    Permissionless,
    PermissionedWithAuthority,
    PermissionedWithMerkleProof,
}

/// Alpha vault section. The vault and pool kinds stay plain strings so
/// validation can report unsupported values with a domain message instead of
/// a serde parse error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlphaVaultConfig {
    pub alpha_vault_type: String,
    pub pool_type: String,
    #[serde(default)]
    pub whitelist_mode: Option<WhitelistMode>,
    #[serde(default)]
    pub whitelist_filepath: Option<String>,
    #[serde(default)]
    pub depositing_point: Option<u64>,
    #[serde(default)]
    pub start_vesting_point: Option<u64>,
    #[serde(default)]
    pub end_vesting_point: Option<u64>,
}

impl LaunchConfig {
    /// Load and validate a configuration from a JSON file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: LaunchConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Cross-field rules the JSON schema cannot express
    pub fn validate(&self) -> Result<()> {
        if self.keypair_file_path.is_empty() {
            bail!("Missing keypairFilePath in config file.");
        }
        if self.rpc_url.is_empty() {
            bail!("Missing rpcUrl in config file.");
        }
        if self.create_base_token.is_some() && self.base_mint.is_some() {
            bail!("Both createBaseToken and baseMint cannot be set simultaneously.");
        }
        if self.dynamic_amm.is_some() && self.dlmm.is_some() {
            bail!("Both Dynamic AMM and DLMM configuration cannot be set simultaneously.");
        }
        if let Some(dlmm) = &self.dlmm {
            if dlmm.has_alpha_vault && self.quote_symbol.is_none() && self.quote_mint.is_none() {
                bail!("Either quoteSymbol or quoteMint must be provided for DLMM");
            }
        }
        if let Some(vault) = &self.alpha_vault {
            if vault.alpha_vault_type != "fcfs" && vault.alpha_vault_type != "prorata" {
                bail!(
                    "Alpha vault type {} isn't supported.",
                    vault.alpha_vault_type
                );
            }
            if vault.pool_type != "dynamic"
                && vault.pool_type != "dlmm"
                && vault.pool_type != "damm2"
            {
                bail!("Alpha vault pool type {} isn't supported.", vault.pool_type);
            }
        }
        Ok(())
    }
}

/// Resolve the quote mint from a symbol or an explicit address.
/// Exactly one of the two must be provided.
pub fn quote_mint(quote_symbol: Option<&str>, quote_mint: Option<&str>) -> Result<Pubkey> {
    match (quote_symbol, quote_mint) {
        (None, None) => bail!("Either quoteSymbol or quoteMint must be provided"),
        (Some(_), Some(_)) => {
            bail!("Cannot provide quoteSymbol and quoteMint at the same time")
        }
        (None, Some(mint)) => {
            Pubkey::from_str(mint).with_context(|| format!("Invalid quote mint: {}", mint))
        }
        (Some(symbol), None) => match symbol.to_lowercase().as_str() {
            "sol" => Ok(Pubkey::from_str(SOL_TOKEN_MINT)?),
            "usdc" => Ok(Pubkey::from_str(USDC_TOKEN_MINT)?),
            other => bail!("Unsupported quote symbol: {}", other),
        },
    }
}

/// Resolve the quote token's decimals. Known symbols use the constant table;
/// an explicit mint is fetched and unpacked from the cluster.
pub async fn quote_decimals(
    rpc: &Arc<RpcClient>,
    quote_symbol: Option<&str>,
    quote_mint: Option<&str>,
) -> Result<u8> {
    match (quote_symbol, quote_mint) {
        (None, None) => bail!("Either quoteSymbol or quoteMint must be provided"),
        // An explicit mint wins over a symbol
        (_, Some(mint)) => {
            let address =
                Pubkey::from_str(mint).with_context(|| format!("Invalid quote mint: {}", mint))?;
            let account = rpc
                .get_account(&address)
                .await
                .with_context(|| format!("Failed to fetch quote mint account {}", mint))?;
            if account.data.len() < spl_token::state::Mint::LEN {
                bail!("Account {} does not look like a token mint", mint);
            }
            let state = spl_token::state::Mint::unpack_from_slice(
                &account.data[..spl_token::state::Mint::LEN],
            )
            .with_context(|| format!("Failed to unpack mint account {}", mint))?;
            Ok(state.decimals)
        }
        (Some(symbol), None) => match symbol.to_lowercase().as_str() {
            "sol" => Ok(SOL_TOKEN_DECIMALS),
            "usdc" => Ok(USDC_TOKEN_DECIMALS),
            other => bail!("Unsupported quote symbol: {}", other),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn minimal_json() -> serde_json::Value {
        serde_json::json!({
            "rpcUrl": "https://api.mainnet-beta.solana.com",
            "dryRun": true,
            "keypairFilePath": "./keypair.json",
            "computeUnitPriceMicroLamports": 100000
        })
    }

    fn parse(value: serde_json::Value) -> LaunchConfig {
        serde_json::from_value(value).expect("parse config")
    }

    #[test]
    fn test_minimal_config_is_valid() {
        let config = parse(minimal_json());
        assert!(config.validate().is_ok());
        assert!(config.dry_run);
        assert_eq!(config.compute_unit_price_micro_lamports, 100_000);
    }

    #[test]
    fn test_base_mint_conflicts_with_create_base_token() {
        let mut value = minimal_json();
        value["baseMint"] = "5yQ3yDe7ZKKxGEFGxgZ8jLK6PmQxDPkHrNbNRaLJNTPS".into();
        value["createBaseToken"] = serde_json::json!({
            "mintBaseTokenAmount": "1000000",
            "baseDecimals": 9
        });
        let err = parse(value).validate().unwrap_err();
        assert!(err.to_string().contains("createBaseToken and baseMint"));
    }

    #[test]
    fn test_dlmm_alpha_vault_requires_quote() {
        let mut value = minimal_json();
        value["dlmm"] = serde_json::json!({
            "binStep": 100,
            "feeBps": 20,
            "initialPrice": 0.5,
            "activationType": "timestamp",
            "priceRounding": "up",
            "hasAlphaVault": true
        });
        let err = parse(value.clone()).validate().unwrap_err();
        assert!(err.to_string().contains("quoteSymbol or quoteMint"));

        value["quoteSymbol"] = "SOL".into();
        assert!(parse(value).validate().is_ok());
    }

    #[test]
    fn test_unsupported_alpha_vault_type_rejected() {
        let mut value = minimal_json();
        value["alphaVault"] = serde_json::json!({
            "alphaVaultType": "dutch_auction",
            "poolType": "dlmm"
        });
        let err = parse(value).validate().unwrap_err();
        assert!(err
            .to_string()
            .contains("Alpha vault type dutch_auction isn't supported"));
    }

    #[test]
    fn test_unsupported_alpha_vault_pool_type_rejected() {
        let mut value = minimal_json();
        value["alphaVault"] = serde_json::json!({
            "alphaVaultType": "fcfs",
            "poolType": "clmm"
        });
        let err = parse(value).validate().unwrap_err();
        assert!(err.to_string().contains("pool type clmm isn't supported"));
    }

    #[test]
    fn test_dynamic_amm_and_dlmm_conflict() {
        let mut value = minimal_json();
        value["dynamicAmm"] = serde_json::json!({
            "baseAmount": 1000000,
            "quoteAmount": "500",
            "tradeFeeNumerator": 2500,
            "activationType": "slot",
            "hasAlphaVault": false
        });
        value["dlmm"] = serde_json::json!({
            "binStep": 80,
            "feeBps": 15,
            "initialPrice": 1.0,
            "activationType": "slot",
            "priceRounding": "down",
            "hasAlphaVault": false
        });
        let err = parse(value).validate().unwrap_err();
        assert!(err.to_string().contains("Dynamic AMM and DLMM"));
    }

    #[test]
    fn test_from_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{}", minimal_json()).expect("write config");
        let config =
            LaunchConfig::from_file(file.path().to_str().unwrap()).expect("load config");
        assert_eq!(config.rpc_url, "https://api.mainnet-beta.solana.com");
    }

    #[test]
    fn test_quote_mint_resolution() {
        let sol = quote_mint(Some("SOL"), None).expect("sol");
        assert_eq!(sol.to_string(), SOL_TOKEN_MINT);

        let explicit = quote_mint(None, Some(USDC_TOKEN_MINT)).expect("usdc");
        assert_eq!(explicit.to_string(), USDC_TOKEN_MINT);

        assert!(quote_mint(None, None).is_err());
        assert!(quote_mint(Some("SOL"), Some(USDC_TOKEN_MINT)).is_err());
        assert!(quote_mint(Some("doge"), None).is_err());
    }

    #[tokio::test]
    async fn test_quote_decimals_from_symbol_table() {
        // Symbol lookups never touch the cluster.
        let rpc = Arc::new(RpcClient::new_mock("fails".to_string()));

        assert_eq!(quote_decimals(&rpc, Some("SOL"), None).await.unwrap(), 9);
        assert_eq!(quote_decimals(&rpc, Some("usdc"), None).await.unwrap(), 6);

        let err = quote_decimals(&rpc, Some("doge"), None).await.unwrap_err();
        assert!(err.to_string().contains("Unsupported quote symbol"));

        let err = quote_decimals(&rpc, None, None).await.unwrap_err();
        assert!(err.to_string().contains("quoteSymbol or quoteMint"));
    }
}
