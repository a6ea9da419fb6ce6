//! 클라우드 API 응답 모델
//!
//! REST 응답 중 프로브가 실제로 읽는 필드만 정의합니다.
//! 모든 필드는 기본값을 가지므로 누락된 필드가 있어도 디코딩은 실패하지 않습니다.

use std::collections::HashMap;

use serde::Deserialize;

// ─── Compute Engine / Load Balancing ─────────────────────────────────

/// 포워딩 규칙 (프론트도어 진입점)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForwardingRule {
    pub name: String,
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
    /// 타깃 프록시 self link
    pub target: String,
}

/// 타깃 HTTP(S) 프록시
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetProxy {
    pub name: String,
    pub self_link: String,
    /// URL 맵 self link
    pub url_map: String,
}

/// URL 맵
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UrlMap {
    pub name: String,
    pub self_link: String,
    /// 기본 백엔드 서비스 self link
    pub default_service: String,
}

/// 백엔드 서비스
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackendService {
    pub name: String,
    pub self_link: String,
    pub backends: Vec<Backend>,
}

/// 백엔드 서비스의 개별 백엔드
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Backend {
    /// 인스턴스 그룹 또는 NEG self link
    pub group: String,
}

/// 인스턴스 그룹 멤버
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceGroupMember {
    /// 인스턴스 self link
    pub instance: String,
    pub status: String,
}

/// 네트워크 엔드포인트 그룹
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkEndpointGroup {
    pub name: String,
    pub self_link: String,
    pub region: String,
    pub cloud_run: Option<CloudRunEndpoint>,
}

/// 서버리스 NEG가 가리키는 Cloud Run 서비스
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudRunEndpoint {
    pub service: String,
}

/// VM 인스턴스
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Instance {
    pub name: String,
    pub self_link: String,
    /// 존 self link
    pub zone: String,
    pub status: String,
    /// 머신 타입 self link
    pub machine_type: String,
    pub network_interfaces: Vec<NetworkInterface>,
}

impl Instance {
    /// 외부 NAT IP 중 하나가 `ip`와 같은지 확인합니다.
    pub fn has_nat_ip(&self, ip: &str) -> bool {
        self.network_interfaces
            .iter()
            .flat_map(|nic| nic.access_configs.iter())
            .any(|config| config.nat_ip == ip)
    }

    /// 실행 중인지 확인합니다.
    pub fn is_running(&self) -> bool {
        self.status == "RUNNING"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkInterface {
    pub access_configs: Vec<AccessConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessConfig {
    #[serde(rename = "natIP")]
    pub nat_ip: String,
}

/// 머신 타입 형상
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MachineType {
    pub name: String,
    pub guest_cpus: u32,
    pub memory_mb: u64,
    pub is_shared_cpu: bool,
}

// ─── App Engine ─────────────────────────────────────────────────────

/// App Engine 애플리케이션
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Application {
    pub name: String,
    pub id: String,
    pub default_hostname: String,
    pub location_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppEngineService {
    pub name: String,
    pub id: String,
}

/// App Engine 버전
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppEngineVersion {
    pub name: String,
    pub id: String,
    pub instance_class: String,
    pub automatic_scaling: Option<AutomaticScaling>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutomaticScaling {
    pub min_total_instances: u32,
    pub max_total_instances: u32,
}

// ─── Cloud Run ──────────────────────────────────────────────────────

/// Cloud Run 서비스
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunService {
    /// `projects/{project}/locations/{region}/services/{service}`
    pub name: String,
    pub uri: String,
    pub urls: Vec<String>,
    pub labels: HashMap<String, String>,
}

impl RunService {
    /// Cloud Functions가 관리하는 서비스인지 확인합니다.
    pub fn is_managed_by_functions(&self) -> bool {
        self.labels
            .get("goog-managed-by")
            .is_some_and(|owner| owner == "cloudfunctions")
    }
}

/// Cloud Run 리비전
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunRevision {
    pub name: String,
    pub scaling: RevisionScaling,
    pub conditions: Vec<Condition>,
    pub containers: Vec<Container>,
}

impl RunRevision {
    /// `ResourcesAvailable` 조건이 성공 상태인지 확인합니다.
    pub fn resources_available(&self) -> bool {
        self.conditions
            .iter()
            .any(|c| c.kind == "ResourcesAvailable" && c.state == "CONDITION_SUCCEEDED")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevisionScaling {
    pub min_instance_count: u32,
    pub max_instance_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: String,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Container {
    pub resources: ResourceRequirements,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceRequirements {
    pub limits: HashMap<String, String>,
}

// ─── Cloud Functions ────────────────────────────────────────────────

/// Cloud Functions (2세대) 함수
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudFunction {
    /// `projects/{project}/locations/{region}/functions/{function}`
    pub name: String,
    pub service_config: Option<FunctionServiceConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FunctionServiceConfig {
    pub uri: String,
    pub available_memory: String,
    pub min_instance_count: u32,
    pub max_instance_count: u32,
}

// ─── Cloud SQL ──────────────────────────────────────────────────────

/// Cloud SQL 인스턴스
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SqlInstance {
    pub name: String,
    pub region: String,
    pub state: String,
    pub instance_type: String,
    /// `{project}:{instance}` 형식
    pub master_instance_name: String,
    pub settings: SqlSettings,
    pub failover_replica: Option<FailoverReplica>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SqlSettings {
    pub tier: String,
    pub availability_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FailoverReplica {
    pub available: bool,
}

// ─── AlloyDB ────────────────────────────────────────────────────────

/// AlloyDB 클러스터
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlloyDbCluster {
    /// `projects/{project}/locations/{region}/clusters/{cluster}`
    pub name: String,
    pub uid: String,
}

/// AlloyDB 인스턴스
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlloyDbInstance {
    pub name: String,
    pub instance_type: String,
    pub machine_config: AlloyDbMachineConfig,
    pub read_pool_config: AlloyDbReadPoolConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlloyDbMachineConfig {
    pub cpu_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlloyDbReadPoolConfig {
    pub node_count: u32,
}

// ─── Spanner ────────────────────────────────────────────────────────

/// Spanner 인스턴스
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpannerInstance {
    pub name: String,
    /// `projects/{project}/instanceConfigs/{config}`
    pub config: String,
    pub processing_units: u32,
}

// ─── 리소스 경로 헬퍼 ────────────────────────────────────────────────

/// 리소스 이름이나 self link에서 `key` 다음 세그먼트를 반환합니다.
///
/// `segment_after(".../zones/us-central1-a/instances/vm-1", "zones")` → `Some("us-central1-a")`
pub fn segment_after<'a>(path: &'a str, key: &str) -> Option<&'a str> {
    let mut segments = path.split('/');
    segments.find(|s| *s == key)?;
    segments.next().filter(|s| !s.is_empty())
}

/// 리소스 이름이나 self link의 마지막 세그먼트를 반환합니다.
pub fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarding_rule_decodes_ip_address_field() {
        let json = r#"{"name":"lb-rule","IPAddress":"34.120.1.10","target":"https://compute.googleapis.com/compute/v1/projects/p/global/targetHttpProxies/px"}"#;
        let rule: ForwardingRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.ip_address, "34.120.1.10");
        assert!(rule.target.ends_with("/px"));
    }

    #[test]
    fn instance_matches_nat_ip() {
        let json = r#"{
            "name": "vm-1",
            "status": "RUNNING",
            "networkInterfaces": [{"accessConfigs": [{"natIP": "35.1.2.3"}]}]
        }"#;
        let instance: Instance = serde_json::from_str(json).unwrap();
        assert!(instance.is_running());
        assert!(instance.has_nat_ip("35.1.2.3"));
        assert!(!instance.has_nat_ip("35.1.2.4"));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let sql: SqlInstance = serde_json::from_str(r#"{"name":"db"}"#).unwrap();
        assert!(sql.settings.tier.is_empty());
        assert!(sql.failover_replica.is_none());
    }

    #[test]
    fn run_service_managed_by_functions() {
        let json = r#"{"name":"projects/p/locations/r/services/s","labels":{"goog-managed-by":"cloudfunctions"}}"#;
        let service: RunService = serde_json::from_str(json).unwrap();
        assert!(service.is_managed_by_functions());
    }

    #[test]
    fn revision_condition_type_field() {
        let json = r#"{"conditions":[{"type":"ResourcesAvailable","state":"CONDITION_SUCCEEDED"}]}"#;
        let revision: RunRevision = serde_json::from_str(json).unwrap();
        assert!(revision.resources_available());
    }

    #[test]
    fn segment_helpers() {
        let link = "https://compute.googleapis.com/compute/v1/projects/p/zones/us-central1-a/instances/vm-1";
        assert_eq!(segment_after(link, "zones"), Some("us-central1-a"));
        assert_eq!(segment_after(link, "regions"), None);
        assert_eq!(segment_after(link, "instances"), Some("vm-1"));
        assert_eq!(last_segment(link), "vm-1");
        assert_eq!(last_segment("plain"), "plain");
    }
}
