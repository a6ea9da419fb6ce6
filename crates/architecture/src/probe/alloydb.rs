//! AlloyDB 프로브 — 프로젝트의 첫 번째 클러스터
//!
//! 클러스터가 여러 개면 목록의 첫 번째 클러스터만 평가합니다.

use tracing::debug;
use webassess_core::config::PricingConfig;

use super::ProbeOutcome;
use crate::cloud::{AlloyDbInstance, CloudApi};
use crate::error::ProbeError;
use crate::resource::{DatabaseResource, ManagedCluster, sanitize_cost};

/// 고가용성 기본 인스턴스의 노드 수
const PRIMARY_NODES: u32 = 2;

const TYPE_READ_POOL: &str = "READ_POOL";

/// 프로젝트의 AlloyDB 클러스터를 조회합니다.
pub async fn probe<C: CloudApi>(
    api: &C,
    project: &str,
    pricing: &PricingConfig,
) -> ProbeOutcome<DatabaseResource> {
    find(api, project, pricing).await.into()
}

async fn find<C: CloudApi>(
    api: &C,
    project: &str,
    pricing: &PricingConfig,
) -> Result<Option<DatabaseResource>, ProbeError> {
    let clusters = api.list_alloydb_clusters(project).await?;
    let Some(cluster) = clusters.first() else {
        debug!(project, "no alloydb cluster");
        return Ok(None);
    };

    let instances = api.list_alloydb_instances(&cluster.name).await?;
    let cost = instances
        .iter()
        .map(|instance| instance_cost(instance, pricing))
        .sum();

    Ok(Some(DatabaseResource::ManagedCluster(ManagedCluster {
        id: cluster.uid.clone(),
        instance_count: instances.len(),
        cost: sanitize_cost(cost),
    })))
}

/// CPU 수별 메모리 (MiB)
pub fn memory_for_cpus(cpus: u32) -> Option<u64> {
    let gib = match cpus {
        2 => 16,
        4 => 32,
        8 => 64,
        16 => 128,
        32 => 256,
        64 => 512,
        _ => return None,
    };
    Some(gib * 1024)
}

/// 인스턴스 비용: 노드당 (CPU + 메모리) 단가 × 노드 수
///
/// 읽기 풀은 `nodeCount`, 나머지는 고가용성 기본 인스턴스로 보고 2노드를 적용합니다.
fn instance_cost(instance: &AlloyDbInstance, pricing: &PricingConfig) -> f64 {
    let cpus = instance.machine_config.cpu_count;
    let memory_mib = memory_for_cpus(cpus).unwrap_or_else(|| {
        debug!(
            instance = instance.name.as_str(),
            cpus, "unknown alloydb machine size, memory counted as zero"
        );
        0
    });
    let nodes = if instance.instance_type == TYPE_READ_POOL {
        instance.read_pool_config.node_count
    } else {
        PRIMARY_NODES
    };

    (f64::from(cpus) * pricing.alloydb_cost_per_cpu_core
        + memory_mib as f64 * pricing.alloydb_cost_per_mem_mib)
        * f64::from(nodes)
}
