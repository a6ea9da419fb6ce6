//! Cloud provider API abstraction for testability.
//!
//! The [`CloudApi`] trait abstracts the provider REST APIs the probes read,
//! allowing production code to use [`RestCloudApi`] while tests use `MockCloudApi`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │ ComputingResolver / DatabaseResolver │
//! └────────────────┬─────────────────┘
//!                  │
//!                  ▼
//!            ┌──────────┐
//!            │ CloudApi │ (trait)
//!            └──────────┘
//!              │      │
//!              ▼      ▼
//!         ┌──────┐ ┌──────┐
//!         │ Rest │ │ Mock │
//!         └──┬───┘ └──────┘
//!            │
//!            ▼
//!     provider REST APIs
//! ```
//!
//! # Self links
//!
//! Compute resources reference each other through self links
//! (`https://compute.googleapis.com/compute/v1/projects/...`). Methods that
//! follow a reference take the self link as returned by the previous call.
//! [`RestCloudApi`] refuses links that do not point at the compute API.

mod model;
mod rest;

use std::future::Future;

pub use model::{
    AccessConfig, AlloyDbCluster, AlloyDbInstance, AlloyDbMachineConfig, AlloyDbReadPoolConfig,
    AppEngineService, AppEngineVersion, Application, AutomaticScaling, Backend, BackendService,
    CloudFunction, CloudRunEndpoint, Condition, Container, FailoverReplica, ForwardingRule,
    FunctionServiceConfig, Instance, InstanceGroupMember, MachineType, NetworkEndpointGroup,
    NetworkInterface, ResourceRequirements, RevisionScaling, RunRevision, RunService,
    SpannerInstance, SqlInstance, SqlSettings, TargetProxy, UrlMap, last_segment, segment_after,
};
pub use rest::RestCloudApi;

use crate::error::ProbeError;

/// Compute Engine API service name (used in errors and logs).
pub const SERVICE_COMPUTE: &str = "compute";
/// App Engine Admin API service name.
pub const SERVICE_APP_ENGINE: &str = "appengine";
/// Cloud Run Admin API service name.
pub const SERVICE_RUN: &str = "run";
/// Cloud Functions API service name.
pub const SERVICE_FUNCTIONS: &str = "cloudfunctions";
/// Cloud SQL Admin API service name.
pub const SERVICE_SQL: &str = "sqladmin";
/// AlloyDB API service name.
pub const SERVICE_ALLOYDB: &str = "alloydb";
/// Cloud Spanner API service name.
pub const SERVICE_SPANNER: &str = "spanner";

/// Trait abstracting the provider API calls the probes make.
///
/// Every call is read-only. The trait is `Send + Sync + 'static`, allowing a
/// single handle to be shared across concurrently running probes via `Arc`.
///
/// # Implementations
///
/// - [`RestCloudApi`]: Production implementation over `reqwest`
/// - `MockCloudApi`: Test implementation with fixture data (available in tests only)
///
/// # Error Handling
///
/// - **Transport errors**: `ProbeError::Transport`
/// - **Non-success status**: `ProbeError::Status`, except `get_application`
///   which maps 404 to `Ok(None)`
/// - **Malformed bodies**: `ProbeError::Decode`
pub trait CloudApi: Send + Sync + 'static {
    /// Lists forwarding rules across all regions and the global scope.
    fn list_forwarding_rules(
        &self,
        project: &str,
    ) -> impl Future<Output = Result<Vec<ForwardingRule>, ProbeError>> + Send;

    /// Fetches a target HTTP(S) proxy by self link.
    fn get_target_proxy(
        &self,
        link: &str,
    ) -> impl Future<Output = Result<TargetProxy, ProbeError>> + Send;

    /// Fetches a URL map by self link.
    fn get_url_map(&self, link: &str) -> impl Future<Output = Result<UrlMap, ProbeError>> + Send;

    /// Fetches a backend service by self link.
    fn get_backend_service(
        &self,
        link: &str,
    ) -> impl Future<Output = Result<BackendService, ProbeError>> + Send;

    /// Lists the members of a zonal or regional instance group.
    fn list_group_members(
        &self,
        group_link: &str,
    ) -> impl Future<Output = Result<Vec<InstanceGroupMember>, ProbeError>> + Send;

    /// Fetches a network endpoint group by self link.
    fn get_network_endpoint_group(
        &self,
        link: &str,
    ) -> impl Future<Output = Result<NetworkEndpointGroup, ProbeError>> + Send;

    /// Lists VM instances across all zones.
    fn list_instances(
        &self,
        project: &str,
    ) -> impl Future<Output = Result<Vec<Instance>, ProbeError>> + Send;

    /// Fetches a VM instance by self link.
    fn get_instance(&self, link: &str)
    -> impl Future<Output = Result<Instance, ProbeError>> + Send;

    /// Fetches a machine type by self link.
    fn get_machine_type(
        &self,
        link: &str,
    ) -> impl Future<Output = Result<MachineType, ProbeError>> + Send;

    /// Fetches the project's App Engine application, `None` if there is none.
    fn get_application(
        &self,
        project: &str,
    ) -> impl Future<Output = Result<Option<Application>, ProbeError>> + Send;

    /// Lists App Engine services.
    fn list_app_engine_services(
        &self,
        project: &str,
    ) -> impl Future<Output = Result<Vec<AppEngineService>, ProbeError>> + Send;

    /// Lists the versions of one App Engine service.
    fn list_app_engine_versions(
        &self,
        project: &str,
        service_id: &str,
    ) -> impl Future<Output = Result<Vec<AppEngineVersion>, ProbeError>> + Send;

    /// Lists Cloud Run services in every region.
    fn list_run_services(
        &self,
        project: &str,
    ) -> impl Future<Output = Result<Vec<RunService>, ProbeError>> + Send;

    /// Fetches a Cloud Run service by full resource name.
    fn get_run_service(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<RunService, ProbeError>> + Send;

    /// Lists the revisions of a Cloud Run service.
    fn list_run_revisions(
        &self,
        service_name: &str,
    ) -> impl Future<Output = Result<Vec<RunRevision>, ProbeError>> + Send;

    /// Lists Cloud Functions in every region.
    fn list_functions(
        &self,
        project: &str,
    ) -> impl Future<Output = Result<Vec<CloudFunction>, ProbeError>> + Send;

    /// Lists Cloud SQL instances.
    fn list_sql_instances(
        &self,
        project: &str,
    ) -> impl Future<Output = Result<Vec<SqlInstance>, ProbeError>> + Send;

    /// Lists AlloyDB clusters in every region.
    fn list_alloydb_clusters(
        &self,
        project: &str,
    ) -> impl Future<Output = Result<Vec<AlloyDbCluster>, ProbeError>> + Send;

    /// Lists the instances of an AlloyDB cluster.
    fn list_alloydb_instances(
        &self,
        cluster_name: &str,
    ) -> impl Future<Output = Result<Vec<AlloyDbInstance>, ProbeError>> + Send;

    /// Lists Spanner instances.
    fn list_spanner_instances(
        &self,
        project: &str,
    ) -> impl Future<Output = Result<Vec<SpannerInstance>, ProbeError>> + Send;
}

#[cfg(test)]
pub use mock::MockCloudApi;
