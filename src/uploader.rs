//! Merkle proof upload to an HTTP key-value store
//!
//! Permissioned-with-merkle-proof vaults publish each wallet's proof under a
//! `{vault}-{wallet}` key so the claim frontend can fetch it. Records are
//! uploaded through the KV bulk endpoint in chunks. Fan-out is bounded and
//! every chunk request retries with exponential backoff up to a fixed attempt
//! ceiling; a chunk that stays failing aborts the whole upload.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures::{stream, TryStreamExt};
use serde::{Deserialize, Serialize};
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::Retry;
use tracing::{debug, info};

/// Wallets per bulk-upload batch
const RECORDS_PER_BATCH: usize = 10_000;
/// Items per single PUT request (KV bulk API limit headroom)
const ITEMS_PER_REQUEST: usize = 250;
/// In-flight PUT requests at a time
const MAX_CONCURRENT_REQUESTS: usize = 8;

const DEFAULT_ENDPOINT: &str = "https://api.cloudflare.com/client/v4";
const DEFAULT_MAX_ATTEMPTS: usize = 5;
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// One wallet's merkle proof entry as emitted by the proof generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofRecord {
    pub merkle_tree: String,
    pub amount: u64,
    pub proof: Vec<Vec<u8>>,
}

#[derive(Debug, Serialize)]
struct KvItem {
    base64: bool,
    key: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct KvBulkResponse {
    success: bool,
}

/// Client for the KV namespace holding vault proofs
pub struct ProofUploader {
    http: reqwest::Client,
    endpoint: String,
    account_id: String,
    namespace_id: String,
    api_key: String,
    max_attempts: usize,
    base_delay: Duration,
}

impl ProofUploader {
    pub fn new(
        account_id: impl Into<String>,
        namespace_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            account_id: account_id.into(),
            namespace_id: namespace_id.into(),
            api_key: api_key.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }

    /// Override the API endpoint (tests point this at a local server)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the retry budget
    pub fn with_retry(mut self, max_attempts: usize, base_delay: Duration) -> Self {
        self.max_attempts = max_attempts;
        self.base_delay = base_delay;
        self
    }

    /// Upload every record keyed `{vault_address}-{wallet}`. Returns the
    /// number of records uploaded.
    pub async fn upload_proofs(
        &self,
        vault_address: &str,
        records: &HashMap<String, ProofRecord>,
    ) -> Result<usize> {
        let mut items = Vec::with_capacity(records.len());
        for (wallet, record) in records {
            items.push(KvItem {
                base64: false,
                key: format!("{}-{}", vault_address, wallet),
                value: serde_json::to_string(record)
                    .with_context(|| format!("Failed to encode proof for wallet {}", wallet))?,
            });
        }
        let total = items.len();

        for batch in items.chunks(RECORDS_PER_BATCH) {
            stream::iter(batch.chunks(ITEMS_PER_REQUEST).map(Ok::<_, anyhow::Error>))
                .try_for_each_concurrent(MAX_CONCURRENT_REQUESTS, |chunk| async {
                    self.put_bulk(chunk).await
                })
                .await?;
        }

        info!(vault = vault_address, records = total, "Uploaded merkle proofs");
        Ok(total)
    }

    async fn put_bulk(&self, items: &[KvItem]) -> Result<()> {
        let url = format!(
            "{}/accounts/{}/storage/kv/namespaces/{}/bulk",
            self.endpoint, self.account_id, self.namespace_id
        );
        let strategy = ExponentialBackoff::from_millis(self.base_delay.as_millis() as u64)
            .max_delay(Duration::from_secs(5))
            .map(jitter)
            .take(self.max_attempts.saturating_sub(1));

        let item_count = items.len();

        Retry::spawn(strategy, || {
            let request = self
                .http
                .put(&url)
                .bearer_auth(&self.api_key)
                .json(&items);
            async move {
                let response = request.send().await.context("KV bulk request failed")?;

                let status = response.status();
                if !status.is_success() {
                    bail!("KV bulk request returned status {}", status);
                }
                let body: KvBulkResponse = response
                    .json()
                    .await
                    .context("Failed to parse KV bulk response")?;
                if !body.success {
                    bail!("KV bulk request reported failure");
                }
                debug!(items = item_count, "Uploaded proof chunk");
                Ok(())
            }
        })
        .await
    }
}

/// Read every proof file in a folder, one JSON record map per file
pub fn read_proof_folder(path: impl AsRef<Path>) -> Result<Vec<HashMap<String, ProofRecord>>> {
    let path = path.as_ref();
    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)
        .with_context(|| format!("Failed to read proof folder: {}", path.display()))?
    {
        let entry = entry?;
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }
        debug!(file = %file_path.display(), "Reading proof file");
        let content = std::fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read proof file: {}", file_path.display()))?;
        let records: HashMap<String, ProofRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse proof file: {}", file_path.display()))?;
        files.push(records);
    }
    Ok(files)
}
