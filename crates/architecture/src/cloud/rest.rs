//! Production [`CloudApi`] implementation over `reqwest`.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use webassess_core::config::GcpConfig;

use super::model::*;
use super::{
    CloudApi, SERVICE_ALLOYDB, SERVICE_APP_ENGINE, SERVICE_COMPUTE, SERVICE_FUNCTIONS,
    SERVICE_RUN, SERVICE_SPANNER, SERVICE_SQL,
};
use crate::error::ProbeError;

const COMPUTE_BASE: &str = "https://compute.googleapis.com/compute/v1";
const APP_ENGINE_BASE: &str = "https://appengine.googleapis.com/v1";
const RUN_BASE: &str = "https://run.googleapis.com/v2";
/// Run v2 has no locations list; v1 serves it.
const RUN_LOCATIONS_BASE: &str = "https://run.googleapis.com/v1";
const FUNCTIONS_BASE: &str = "https://cloudfunctions.googleapis.com/v2";
const SQL_BASE: &str = "https://sqladmin.googleapis.com/v1";
const ALLOYDB_BASE: &str = "https://alloydb.googleapis.com/v1";
const SPANNER_BASE: &str = "https://spanner.googleapis.com/v1";

/// Self link prefixes accepted by compute calls that follow references.
const COMPUTE_LINK_PREFIXES: [&str; 2] = [
    "https://compute.googleapis.com/compute/",
    "https://www.googleapis.com/compute/",
];

/// One page of a list response.
///
/// Provider APIs name the item array after the resource kind, so every
/// known name is accepted.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page<T> {
    #[serde(
        default = "Vec::new",
        alias = "services",
        alias = "versions",
        alias = "revisions",
        alias = "functions",
        alias = "clusters",
        alias = "instances",
        alias = "locations"
    )]
    items: Vec<T>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// One page of a compute `aggregated/` list response, keyed by scope.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregatedPage<T> {
    #[serde(default = "BTreeMap::new")]
    items: BTreeMap<String, ScopedList<T>>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Entry of a `locations` list response.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Location {
    #[serde(default)]
    location_id: String,
}

#[derive(Deserialize)]
struct ScopedList<T> {
    #[serde(default = "Vec::new", alias = "instances", alias = "forwardingRules")]
    entries: Vec<T>,
}

/// Production cloud API client using `reqwest`.
///
/// Authenticates every request with a bearer token. The token comes from
/// `[gcp] access_token` or, when that is empty, from
/// `gcloud auth print-access-token`.
///
/// # Examples
///
/// ```ignore
/// use webassess_architecture::RestCloudApi;
///
/// let api = RestCloudApi::from_config(&config.gcp).await?;
/// let rules = api.list_forwarding_rules("my-project").await?;
/// ```
pub struct RestCloudApi {
    http: reqwest::Client,
    token: String,
}

impl RestCloudApi {
    /// Builds a client from the `[gcp]` config section.
    ///
    /// # Errors
    ///
    /// - `ProbeError::Auth`: no token configured and `gcloud` failed
    /// - `ProbeError::Transport`: the HTTP client could not be built
    pub async fn from_config(config: &GcpConfig) -> Result<Self, ProbeError> {
        let token = if config.access_token.is_empty() {
            fetch_gcloud_token(&config.gcloud_path).await?
        } else {
            config.access_token.clone()
        };
        Self::with_token(token, Duration::from_secs(config.request_timeout_secs))
    }

    /// Builds a client with an explicit access token.
    pub fn with_token(
        token: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, ProbeError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ProbeError::Transport {
                service: "http".to_owned(),
                reason: format!("failed to build http client: {e}"),
            })?;
        Ok(Self {
            http,
            token: token.into(),
        })
    }

    async fn send(
        &self,
        service: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ProbeError> {
        request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| ProbeError::Transport {
                service: service.to_owned(),
                reason: e.to_string(),
            })
    }

    async fn decode<T: DeserializeOwned>(
        service: &str,
        response: reqwest::Response,
    ) -> Result<T, ProbeError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status {
                service: service.to_owned(),
                status: status.as_u16(),
            });
        }
        response.json::<T>().await.map_err(|e| ProbeError::Decode {
            service: service.to_owned(),
            reason: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, service: &str, url: &str) -> Result<T, ProbeError> {
        debug!(service, url, "GET");
        let response = self.send(service, self.http.get(url)).await?;
        Self::decode(service, response).await
    }

    /// Like `get_json`, but HTTP 404 yields `Ok(None)`.
    async fn get_optional<T: DeserializeOwned>(
        &self,
        service: &str,
        url: &str,
    ) -> Result<Option<T>, ProbeError> {
        debug!(service, url, "GET");
        let response = self.send(service, self.http.get(url)).await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::decode(service, response).await.map(Some)
    }

    /// Follows `nextPageToken` until every page of a list call is read.
    async fn list_all<T: DeserializeOwned>(
        &self,
        service: &str,
        url: &str,
        post: bool,
    ) -> Result<Vec<T>, ProbeError> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page_url = with_page_token(service, url, page_token.as_deref())?;
            debug!(service, url = page_url.as_str(), "list page");
            let request = if post {
                self.http.post(page_url).json(&serde_json::json!({}))
            } else {
                self.http.get(page_url)
            };
            let response = self.send(service, request).await?;
            let page: Page<T> = Self::decode(service, response).await?;
            items.extend(page.items);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => return Ok(items),
            }
        }
    }

    /// Reads every page of a compute `aggregated/` list and flattens the scopes.
    async fn list_aggregated<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, ProbeError> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page_url = with_page_token(SERVICE_COMPUTE, url, page_token.as_deref())?;
            let response = self.send(SERVICE_COMPUTE, self.http.get(page_url)).await?;
            let page: AggregatedPage<T> = Self::decode(SERVICE_COMPUTE, response).await?;
            items.extend(page.items.into_values().flat_map(|scope| scope.entries));
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => return Ok(items),
            }
        }
    }
}

impl CloudApi for RestCloudApi {
    async fn list_forwarding_rules(&self, project: &str) -> Result<Vec<ForwardingRule>, ProbeError> {
        self.list_aggregated(&format!(
            "{COMPUTE_BASE}/projects/{project}/aggregated/forwardingRules"
        ))
        .await
    }

    async fn get_target_proxy(&self, link: &str) -> Result<TargetProxy, ProbeError> {
        self.get_json(SERVICE_COMPUTE, ensure_compute_link(link)?).await
    }

    async fn get_url_map(&self, link: &str) -> Result<UrlMap, ProbeError> {
        self.get_json(SERVICE_COMPUTE, ensure_compute_link(link)?).await
    }

    async fn get_backend_service(&self, link: &str) -> Result<BackendService, ProbeError> {
        self.get_json(SERVICE_COMPUTE, ensure_compute_link(link)?).await
    }

    async fn list_group_members(
        &self,
        group_link: &str,
    ) -> Result<Vec<InstanceGroupMember>, ProbeError> {
        let url = format!("{}/listInstances", ensure_compute_link(group_link)?);
        self.list_all(SERVICE_COMPUTE, &url, true).await
    }

    async fn get_network_endpoint_group(
        &self,
        link: &str,
    ) -> Result<NetworkEndpointGroup, ProbeError> {
        self.get_json(SERVICE_COMPUTE, ensure_compute_link(link)?).await
    }

    async fn list_instances(&self, project: &str) -> Result<Vec<Instance>, ProbeError> {
        self.list_aggregated(&format!(
            "{COMPUTE_BASE}/projects/{project}/aggregated/instances"
        ))
        .await
    }

    async fn get_instance(&self, link: &str) -> Result<Instance, ProbeError> {
        self.get_json(SERVICE_COMPUTE, ensure_compute_link(link)?).await
    }

    async fn get_machine_type(&self, link: &str) -> Result<MachineType, ProbeError> {
        self.get_json(SERVICE_COMPUTE, ensure_compute_link(link)?).await
    }

    async fn get_application(&self, project: &str) -> Result<Option<Application>, ProbeError> {
        self.get_optional(SERVICE_APP_ENGINE, &format!("{APP_ENGINE_BASE}/apps/{project}"))
            .await
    }

    async fn list_app_engine_services(
        &self,
        project: &str,
    ) -> Result<Vec<AppEngineService>, ProbeError> {
        self.list_all(
            SERVICE_APP_ENGINE,
            &format!("{APP_ENGINE_BASE}/apps/{project}/services"),
            false,
        )
        .await
    }

    async fn list_app_engine_versions(
        &self,
        project: &str,
        service_id: &str,
    ) -> Result<Vec<AppEngineVersion>, ProbeError> {
        self.list_all(
            SERVICE_APP_ENGINE,
            &format!("{APP_ENGINE_BASE}/apps/{project}/services/{service_id}/versions?view=FULL"),
            false,
        )
        .await
    }

    /// Run v2 rejects the `-` location wildcard, so every region is listed in turn.
    async fn list_run_services(&self, project: &str) -> Result<Vec<RunService>, ProbeError> {
        let locations: Vec<Location> = self
            .list_all(SERVICE_RUN, &run_locations_url(project), false)
            .await?;

        let mut services = Vec::new();
        for location in locations.iter().filter(|l| !l.location_id.is_empty()) {
            let url = run_services_url(project, &location.location_id);
            services.extend(self.list_all::<RunService>(SERVICE_RUN, &url, false).await?);
        }
        debug!(
            project,
            regions = locations.len(),
            services = services.len(),
            "listed cloud run services"
        );
        Ok(services)
    }

    async fn get_run_service(&self, name: &str) -> Result<RunService, ProbeError> {
        self.get_json(SERVICE_RUN, &format!("{RUN_BASE}/{name}")).await
    }

    async fn list_run_revisions(&self, service_name: &str) -> Result<Vec<RunRevision>, ProbeError> {
        self.list_all(
            SERVICE_RUN,
            &format!("{RUN_BASE}/{service_name}/revisions"),
            false,
        )
        .await
    }

    async fn list_functions(&self, project: &str) -> Result<Vec<CloudFunction>, ProbeError> {
        self.list_all(
            SERVICE_FUNCTIONS,
            &format!("{FUNCTIONS_BASE}/projects/{project}/locations/-/functions"),
            false,
        )
        .await
    }

    async fn list_sql_instances(&self, project: &str) -> Result<Vec<SqlInstance>, ProbeError> {
        self.list_all(
            SERVICE_SQL,
            &format!("{SQL_BASE}/projects/{project}/instances"),
            false,
        )
        .await
    }

    async fn list_alloydb_clusters(&self, project: &str) -> Result<Vec<AlloyDbCluster>, ProbeError> {
        self.list_all(
            SERVICE_ALLOYDB,
            &format!("{ALLOYDB_BASE}/projects/{project}/locations/-/clusters"),
            false,
        )
        .await
    }

    async fn list_alloydb_instances(
        &self,
        cluster_name: &str,
    ) -> Result<Vec<AlloyDbInstance>, ProbeError> {
        self.list_all(
            SERVICE_ALLOYDB,
            &format!("{ALLOYDB_BASE}/{cluster_name}/instances"),
            false,
        )
        .await
    }

    async fn list_spanner_instances(&self, project: &str) -> Result<Vec<SpannerInstance>, ProbeError> {
        self.list_all(
            SERVICE_SPANNER,
            &format!("{SPANNER_BASE}/projects/{project}/instances"),
            false,
        )
        .await
    }
}

fn run_locations_url(project: &str) -> String {
    format!("{RUN_LOCATIONS_BASE}/projects/{project}/locations")
}

fn run_services_url(project: &str, location_id: &str) -> String {
    format!("{RUN_BASE}/projects/{project}/locations/{location_id}/services")
}

/// Runs `gcloud auth print-access-token` and returns the trimmed token.
async fn fetch_gcloud_token(gcloud_path: &str) -> Result<String, ProbeError> {
    let output = tokio::process::Command::new(gcloud_path)
        .args(["auth", "print-access-token"])
        .output()
        .await
        .map_err(|e| ProbeError::Auth(format!("failed to run {gcloud_path}: {e}")))?;

    if !output.status.success() {
        return Err(ProbeError::Auth(format!(
            "{gcloud_path} exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let token = String::from_utf8(output.stdout)
        .map_err(|e| ProbeError::Auth(format!("token is not valid utf-8: {e}")))?
        .trim()
        .to_owned();
    if token.is_empty() {
        return Err(ProbeError::Auth(format!(
            "{gcloud_path} printed an empty access token"
        )));
    }
    Ok(token)
}

/// Rejects self links that do not point at the compute API.
fn ensure_compute_link(link: &str) -> Result<&str, ProbeError> {
    if COMPUTE_LINK_PREFIXES
        .iter()
        .any(|prefix| link.starts_with(prefix))
    {
        Ok(link)
    } else {
        Err(ProbeError::shape(format!(
            "not a compute API self link: '{link}'"
        )))
    }
}

/// Appends `pageToken` to a list URL when one is given.
fn with_page_token(service: &str, url: &str, token: Option<&str>) -> Result<Url, ProbeError> {
    let mut parsed = Url::parse(url).map_err(|e| ProbeError::Transport {
        service: service.to_owned(),
        reason: format!("invalid request url '{url}': {e}"),
    })?;
    if let Some(token) = token {
        parsed.query_pairs_mut().append_pair("pageToken", token);
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_links_are_accepted() {
        let link = "https://compute.googleapis.com/compute/v1/projects/p/global/urlMaps/m";
        assert_eq!(ensure_compute_link(link).unwrap(), link);
        let legacy = "https://www.googleapis.com/compute/v1/projects/p/global/urlMaps/m";
        assert!(ensure_compute_link(legacy).is_ok());
    }

    #[test]
    fn foreign_links_are_rejected() {
        let err = ensure_compute_link("https://attacker.example.com/compute/v1/x").unwrap_err();
        assert!(matches!(err, ProbeError::UnexpectedShape(_)));
    }

    #[test]
    fn page_token_is_appended() {
        let url = with_page_token("run", "https://run.googleapis.com/v2/x?view=FULL", Some("abc"))
            .unwrap();
        assert_eq!(url.as_str(), "https://run.googleapis.com/v2/x?view=FULL&pageToken=abc");
        let plain = with_page_token("run", "https://run.googleapis.com/v2/x", None).unwrap();
        assert_eq!(plain.query(), None);
    }

    #[test]
    fn page_accepts_resource_named_item_arrays() {
        let json = r#"{"services":[{"name":"a"},{"name":"b"}],"nextPageToken":"t"}"#;
        let page: Page<RunService> = serde_json::from_str(json).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next_page_token.as_deref(), Some("t"));

        let empty: Page<SqlInstance> = serde_json::from_str("{}").unwrap();
        assert!(empty.items.is_empty());
    }

    #[test]
    fn aggregated_page_flattens_scopes() {
        let json = r#"{
            "items": {
                "regions/us-central1": {"forwardingRules": [{"name": "r1", "IPAddress": "1.1.1.1"}]},
                "regions/europe-west1": {"warning": {"code": "NO_RESULTS_ON_PAGE"}},
                "global": {"forwardingRules": [{"name": "g1", "IPAddress": "2.2.2.2"}]}
            }
        }"#;
        let page: AggregatedPage<ForwardingRule> = serde_json::from_str(json).unwrap();
        let rules: Vec<_> = page
            .items
            .into_values()
            .flat_map(|scope| scope.entries)
            .collect();
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn run_services_are_listed_per_region() {
        assert_eq!(
            run_locations_url("shop-prod"),
            "https://run.googleapis.com/v1/projects/shop-prod/locations"
        );
        let url = run_services_url("shop-prod", "asia-northeast1");
        assert_eq!(
            url,
            "https://run.googleapis.com/v2/projects/shop-prod/locations/asia-northeast1/services"
        );
        assert!(!url.contains("/locations/-/"));
    }

    #[test]
    fn locations_page_yields_location_ids() {
        let json = r#"{
            "locations": [
                {"name": "projects/p/locations/us-central1", "locationId": "us-central1"},
                {"name": "projects/p/locations/europe-west1", "locationId": "europe-west1"}
            ]
        }"#;
        let page: Page<Location> = serde_json::from_str(json).unwrap();
        let ids: Vec<_> = page.items.iter().map(|l| l.location_id.as_str()).collect();
        assert_eq!(ids, ["us-central1", "europe-west1"]);
    }

    #[tokio::test]
    async fn missing_gcloud_binary_is_auth_error() {
        let err = fetch_gcloud_token("/nonexistent/gcloud-binary").await.unwrap_err();
        assert!(matches!(err, ProbeError::Auth(_)));
    }
}
