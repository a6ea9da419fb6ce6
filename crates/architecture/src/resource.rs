//! 리소스 모델 — 컴퓨팅/데이터베이스 리소스의 태그드 유니온
//!
//! 모든 리소스는 [`CloudResource`] trait으로 ID와 비용을 노출합니다.
//! 비용은 프로브가 생성 시점에 단가 테이블로 계산하며, 이후에는 변경되지 않습니다.
//!
//! 프론트도어(로드 밸런서)는 [`FrontDoor`]라는 별도 타입이며
//! [`ComputingResource`]의 변형이 아닙니다. 따라서 프론트도어가 다른 프론트도어의
//! 백엔드가 되는 구성은 타입 수준에서 표현할 수 없습니다.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use webassess_core::types::AvailabilityRating;

/// 모든 리소스의 공통 능력
pub trait CloudResource {
    /// 리소스 식별자
    fn id(&self) -> &str;
    /// 평가 기간당 비용 추정치 (항상 0 이상)
    fn cost(&self) -> f64;
}

/// 음수나 NaN 비용을 0으로 고정합니다.
pub(crate) fn sanitize_cost(cost: f64) -> f64 {
    if cost.is_finite() && cost > 0.0 { cost } else { 0.0 }
}

// ─── 컴퓨팅 ─────────────────────────────────────────────────────────

/// 서버리스 플랫폼 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerlessPlatform {
    AppEngine,
    CloudRun,
    CloudFunctions,
}

impl fmt::Display for ServerlessPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AppEngine => write!(f, "App Engine"),
            Self::CloudRun => write!(f, "Cloud Run"),
            Self::CloudFunctions => write!(f, "Cloud Functions"),
        }
    }
}

/// VM 머신 형상
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MachineShape {
    /// vCPU 수
    pub cpus: u32,
    /// 메모리 (MiB)
    pub memory_mib: u64,
    /// 공유 코어 여부
    pub shared_core: bool,
}

/// 가상 머신
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VirtualMachine {
    pub id: String,
    pub region: String,
    pub zone: String,
    pub shape: MachineShape,
    pub cost: f64,
}

/// 서버리스 서비스 (존 배치 없음)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerlessService {
    pub id: String,
    pub platform: ServerlessPlatform,
    /// 알 수 없으면 빈 문자열
    pub region: String,
    pub cost: f64,
}

/// 리프 컴퓨팅 리소스
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComputingResource {
    VirtualMachine(VirtualMachine),
    Serverless(ServerlessService),
}

impl ComputingResource {
    /// 리전 (알 수 없으면 빈 문자열)
    pub fn region(&self) -> &str {
        match self {
            Self::VirtualMachine(vm) => &vm.region,
            Self::Serverless(s) => &s.region,
        }
    }

    /// 존 (VM이 아니면 빈 문자열)
    pub fn zone(&self) -> &str {
        match self {
            Self::VirtualMachine(vm) => &vm.zone,
            Self::Serverless(_) => "",
        }
    }

    /// 서버리스 리소스인지 확인합니다.
    pub fn is_serverless(&self) -> bool {
        matches!(self, Self::Serverless(_))
    }

    /// 사람이 읽을 수 있는 플랫폼 이름
    pub fn platform_name(&self) -> String {
        match self {
            Self::VirtualMachine(_) => "Compute Engine".to_owned(),
            Self::Serverless(s) => s.platform.to_string(),
        }
    }
}

impl CloudResource for ComputingResource {
    fn id(&self) -> &str {
        match self {
            Self::VirtualMachine(vm) => &vm.id,
            Self::Serverless(s) => &s.id,
        }
    }

    fn cost(&self) -> f64 {
        match self {
            Self::VirtualMachine(vm) => vm.cost,
            Self::Serverless(s) => s.cost,
        }
    }
}

/// 프론트도어 (로드 밸런서)
///
/// 백엔드는 항상 리프 컴퓨팅 리소스입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrontDoor {
    /// 포워딩 규칙 이름
    pub id: String,
    pub backends: Vec<ComputingResource>,
}

// ─── 데이터베이스 ───────────────────────────────────────────────────

/// 관계형 엔진 (Cloud SQL): 기본 인스턴스 + 복제본
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationalEngine {
    pub id: String,
    pub primary_region: String,
    pub replica_regions: Vec<String>,
    /// 존 간 장애 조치 구성 여부 (`availabilityType = REGIONAL`)
    pub regional_failover: bool,
    pub cost: f64,
}

impl RelationalEngine {
    fn availability(&self) -> AvailabilityRating {
        let regions: BTreeSet<&str> = std::iter::once(self.primary_region.as_str())
            .chain(self.replica_regions.iter().map(String::as_str))
            .filter(|r| !r.is_empty())
            .collect();
        if regions.len() > 1 {
            AvailabilityRating::MULTI_REGION
        } else if self.regional_failover {
            AvailabilityRating::MULTI_ZONE
        } else {
            AvailabilityRating::SINGLE_ZONE
        }
    }
}

/// 분산 엔진 (Spanner)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributedEngine {
    pub id: String,
    /// 인스턴스 구성 이름
    pub config: String,
    pub processing_units: u32,
    pub cost: f64,
}

impl DistributedEngine {
    /// 리전 단위 구성인지 확인합니다. (`regional-us-central1` 등)
    pub fn is_regional(&self) -> bool {
        self.config.contains("regional")
    }
}

/// 관리형 클러스터 (AlloyDB)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagedCluster {
    pub id: String,
    pub instance_count: usize,
    pub cost: f64,
}

/// 데이터베이스 리소스
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatabaseResource {
    Relational(RelationalEngine),
    Distributed(DistributedEngine),
    ManagedCluster(ManagedCluster),
}

impl DatabaseResource {
    /// 데이터베이스 자체의 가용성 등급
    pub fn availability_ordinal(&self) -> AvailabilityRating {
        match self {
            Self::Relational(engine) => engine.availability(),
            Self::Distributed(engine) if engine.is_regional() => AvailabilityRating::MULTI_ZONE,
            Self::Distributed(_) => AvailabilityRating::MULTI_REGION,
            Self::ManagedCluster(_) => AvailabilityRating::MULTI_ZONE,
        }
    }

    /// 사람이 읽을 수 있는 플랫폼 이름
    pub fn platform_name(&self) -> &'static str {
        match self {
            Self::Relational(_) => "Cloud SQL",
            Self::Distributed(_) => "Cloud Spanner",
            Self::ManagedCluster(_) => "AlloyDB",
        }
    }
}

impl CloudResource for DatabaseResource {
    fn id(&self) -> &str {
        match self {
            Self::Relational(e) => &e.id,
            Self::Distributed(e) => &e.id,
            Self::ManagedCluster(c) => &c.id,
        }
    }

    fn cost(&self) -> f64 {
        match self {
            Self::Relational(e) => e.cost,
            Self::Distributed(e) => e.cost,
            Self::ManagedCluster(c) => c.cost,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn vm_exposes_region_and_zone() {
        let vm = vm("vm-1", "us-central1-a", 10.0);
        assert_eq!(vm.region(), "us-central1");
        assert_eq!(vm.zone(), "us-central1-a");
        assert!(!vm.is_serverless());
        assert_eq!(vm.id(), "vm-1");
        assert_eq!(vm.platform_name(), "Compute Engine");
    }

    #[test]
    fn serverless_has_no_zone() {
        let run = serverless("svc", ServerlessPlatform::CloudRun, "asia-northeast1", 3.0);
        assert_eq!(run.zone(), "");
        assert!(run.is_serverless());
        assert_eq!(run.platform_name(), "Cloud Run");
    }

    #[test]
    fn cloud_sql_ordinals() {
        assert_eq!(
            cloud_sql("us-central1", &["europe-west1"], false, 1.0).availability_ordinal(),
            AvailabilityRating::MULTI_REGION
        );
        assert_eq!(
            cloud_sql("us-central1", &["us-central1"], true, 1.0).availability_ordinal(),
            AvailabilityRating::MULTI_ZONE
        );
        assert_eq!(
            cloud_sql("us-central1", &[], false, 1.0).availability_ordinal(),
            AvailabilityRating::SINGLE_ZONE
        );
    }

    #[test]
    fn spanner_ordinals() {
        assert_eq!(
            spanner("projects/p/instanceConfigs/regional-us-central1", 1.0).availability_ordinal(),
            AvailabilityRating::MULTI_ZONE
        );
        assert_eq!(
            spanner("projects/p/instanceConfigs/nam3", 1.0).availability_ordinal(),
            AvailabilityRating::MULTI_REGION
        );
    }

    #[test]
    fn managed_cluster_is_always_multi_zone() {
        let db = DatabaseResource::ManagedCluster(ManagedCluster {
            id: "uid-1".to_owned(),
            instance_count: 1,
            cost: 0.0,
        });
        assert_eq!(db.availability_ordinal(), AvailabilityRating::MULTI_ZONE);
        assert_eq!(db.platform_name(), "AlloyDB");
    }

    #[test]
    fn sanitize_cost_clamps_invalid_values() {
        assert_eq!(sanitize_cost(-1.0), 0.0);
        assert_eq!(sanitize_cost(f64::NAN), 0.0);
        assert_eq!(sanitize_cost(f64::INFINITY), 0.0);
        assert_eq!(sanitize_cost(2.5), 2.5);
    }

    #[test]
    fn resources_serialize_with_kind_tag() {
        let json = serde_json::to_value(vm("vm-1", "us-central1-a", 1.0)).unwrap();
        assert_eq!(json["kind"], "virtual_machine");
        let json = serde_json::to_value(spanner("nam3", 1.0)).unwrap();
        assert_eq!(json["kind"], "distributed");
    }
}
