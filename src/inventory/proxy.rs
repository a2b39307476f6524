//! AWS Proxy Inventory Adapter
//!
//! Queries EFS and FSx through the console's signing proxy. The proxy
//! forwards `{endpoint}/{region}/<service path>` to the regional AWS API, so
//! EFS is addressed with its REST paths and FSx with JSON-RPC style
//! `X-Amz-Target` calls.

use crate::domain::ports::{
    EfsFileSystem, EfsInventory, FsxFileSystem, FsxInventory, MountTarget, StorageVirtualMachine,
    Volume,
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const EFS_SERVICE: &str = "efs";
const FSX_SERVICE: &str = "fsx";
const FSX_TARGET_PREFIX: &str = "AWSSimbaAPIService_v20180301";

/// Upper bound on followed pagination tokens per call
const MAX_PAGES: usize = 100;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the proxy inventory adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Proxy base URL; the region is appended as the first path segment
    pub endpoint: String,
    /// Bearer token sent with each request
    pub bearer_token: Option<String>,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// `MaxItems` requested per EFS listing page
    pub max_efs_items: u32,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/awsproxy".to_string(),
            bearer_token: None,
            request_timeout_secs: 30,
            // 10x the default regional EFS quota of 1000 file systems
            max_efs_items: 10_000,
        }
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListEfsResult {
    #[serde(default)]
    file_systems: Vec<EfsFileSystem>,
    #[serde(default)]
    next_marker: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeMountTargetsResult {
    #[serde(default)]
    mount_targets: Vec<MountTarget>,
    #[serde(default)]
    next_marker: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct FsxRequest<'a> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    filters: Vec<FsxFilter<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "PascalCase")]
struct FsxFilter<'a> {
    name: &'static str,
    values: &'a [String],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeFileSystemsResult {
    #[serde(default)]
    file_systems: Vec<FsxFileSystem>,
    #[serde(default)]
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeStorageVirtualMachinesResult {
    #[serde(default)]
    storage_virtual_machines: Vec<StorageVirtualMachine>,
    #[serde(default)]
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeVolumesResult {
    #[serde(default)]
    volumes: Vec<Volume>,
    #[serde(default)]
    next_token: Option<String>,
}

/// One page of a paginated listing
trait Page: DeserializeOwned {
    type Item;

    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

impl Page for ListEfsResult {
    type Item = EfsFileSystem;

    fn into_parts(self) -> (Vec<Self::Item>, Option<String>) {
        (self.file_systems, self.next_marker)
    }
}

impl Page for DescribeMountTargetsResult {
    type Item = MountTarget;

    fn into_parts(self) -> (Vec<Self::Item>, Option<String>) {
        (self.mount_targets, self.next_marker)
    }
}

impl Page for DescribeFileSystemsResult {
    type Item = FsxFileSystem;

    fn into_parts(self) -> (Vec<Self::Item>, Option<String>) {
        (self.file_systems, self.next_token)
    }
}

impl Page for DescribeStorageVirtualMachinesResult {
    type Item = StorageVirtualMachine;

    fn into_parts(self) -> (Vec<Self::Item>, Option<String>) {
        (self.storage_virtual_machines, self.next_token)
    }
}

impl Page for DescribeVolumesResult {
    type Item = Volume;

    fn into_parts(self) -> (Vec<Self::Item>, Option<String>) {
        (self.volumes, self.next_token)
    }
}

// =============================================================================
// Proxy Inventory
// =============================================================================

/// Inventory adapter that talks to the AWS proxy over HTTP
pub struct ProxyInventory {
    config: ProxyConfig,
    client: reqwest::Client,
}

impl ProxyInventory {
    /// Create a new proxy adapter
    pub fn new(config: ProxyConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    fn url(&self, region: &str, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            region,
            path
        )
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.bearer_token {
            Some(ref token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        service: &str,
        operation: &str,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Error::InventoryStatus {
                service: service.to_string(),
                operation: operation.to_string(),
                status: status.as_u16(),
            });
        }
        response.json().await.map_err(|e| Error::InventoryQuery {
            service: service.to_string(),
            operation: operation.to_string(),
            reason: e.to_string(),
        })
    }

    /// GET an EFS REST path, following `NextMarker`
    async fn efs_get<P: Page>(
        &self,
        region: &str,
        path: &str,
        operation: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<P::Item>> {
        let url = self.url(region, path);
        let mut items = Vec::new();
        let mut marker: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut builder = self.client.get(&url).query(query);
            if let Some(ref m) = marker {
                builder = builder.query(&[("Marker", m)]);
            }
            let response = self.authorize(builder).send().await?;
            let page: P = Self::decode(response, EFS_SERVICE, operation).await?;
            let (mut batch, next) = page.into_parts();
            items.append(&mut batch);

            match next {
                Some(next) if !next.is_empty() => marker = Some(next),
                _ => return Ok(items),
            }
        }

        Err(Self::page_limit(EFS_SERVICE, operation))
    }

    /// POST an FSx JSON call, following `NextToken`
    async fn fsx_call<P: Page>(
        &self,
        region: &str,
        operation: &str,
        file_system_ids: Option<&[String]>,
    ) -> Result<Vec<P::Item>> {
        let url = self.url(region, "fsx");
        let target = format!("{}.{}", FSX_TARGET_PREFIX, operation);
        let filters: Vec<FsxFilter<'_>> = file_system_ids
            .map(|ids| {
                vec![FsxFilter {
                    name: "file-system-id",
                    values: ids,
                }]
            })
            .unwrap_or_default();

        let mut items = Vec::new();
        let mut next_token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let body = FsxRequest {
                filters: filters.clone(),
                next_token: next_token.take(),
            };
            let builder = self
                .client
                .post(&url)
                .header("X-Amz-Target", &target)
                .header("Content-Type", "application/x-amz-json-1.1")
                .body(serde_json::to_vec(&body)?);
            let response = self.authorize(builder).send().await?;
            let page: P = Self::decode(response, FSX_SERVICE, operation).await?;
            let (mut batch, next) = page.into_parts();
            items.append(&mut batch);

            match next {
                Some(next) if !next.is_empty() => next_token = Some(next),
                _ => return Ok(items),
            }
        }

        Err(Self::page_limit(FSX_SERVICE, operation))
    }

    /// A listing still paginating after `MAX_PAGES` is never returned partially
    fn page_limit(service: &str, operation: &str) -> Error {
        warn!("{} stopped after {} pages", operation, MAX_PAGES);
        Error::InventoryQuery {
            service: service.to_string(),
            operation: operation.to_string(),
            reason: format!("pagination limit of {} pages reached", MAX_PAGES),
        }
    }
}

#[async_trait]
impl EfsInventory for ProxyInventory {
    async fn list_file_systems(&self, region: &str) -> Result<Vec<EfsFileSystem>> {
        debug!("Listing EFS file systems in {}", region);
        self.efs_get::<ListEfsResult>(
            region,
            "elasticfilesystem/2015-02-01/file-systems",
            "DescribeFileSystems",
            &[("MaxItems", self.config.max_efs_items.to_string())],
        )
        .await
    }

    async fn describe_mount_targets(
        &self,
        region: &str,
        file_system_id: &str,
    ) -> Result<Vec<MountTarget>> {
        debug!("Describing mount targets of {}", file_system_id);
        self.efs_get::<DescribeMountTargetsResult>(
            region,
            "elasticfilesystem/2015-02-01/mount-targets",
            "DescribeMountTargets",
            &[("FileSystemId", file_system_id.to_string())],
        )
        .await
    }
}

#[async_trait]
impl FsxInventory for ProxyInventory {
    async fn list_file_systems(&self, region: &str) -> Result<Vec<FsxFileSystem>> {
        debug!("Listing FSx file systems in {}", region);
        self.fsx_call::<DescribeFileSystemsResult>(region, "DescribeFileSystems", None)
            .await
    }

    async fn list_storage_virtual_machines(
        &self,
        region: &str,
        file_system_ids: &[String],
    ) -> Result<Vec<StorageVirtualMachine>> {
        self.fsx_call::<DescribeStorageVirtualMachinesResult>(
            region,
            "DescribeStorageVirtualMachines",
            Some(file_system_ids),
        )
        .await
    }

    async fn list_volumes(&self, region: &str, file_system_ids: &[String]) -> Result<Vec<Volume>> {
        self.fsx_call::<DescribeVolumesResult>(region, "DescribeVolumes", Some(file_system_ids))
            .await
    }
}
