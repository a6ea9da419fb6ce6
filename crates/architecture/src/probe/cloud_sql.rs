//! Cloud SQL 프로브 — 실행 중인 기본 인스턴스와 그 읽기 복제본
//!
//! 기본 인스턴스가 여러 개면 목록의 첫 번째 인스턴스를 사용합니다.

use tracing::debug;
use webassess_core::config::PricingConfig;

use super::ProbeOutcome;
use crate::cloud::{CloudApi, SqlInstance};
use crate::error::ProbeError;
use crate::resource::{DatabaseResource, RelationalEngine, sanitize_cost};

const STATE_RUNNABLE: &str = "RUNNABLE";
const TYPE_PRIMARY: &str = "CLOUD_SQL_INSTANCE";
const TYPE_READ_REPLICA: &str = "READ_REPLICA_INSTANCE";
const AVAILABILITY_REGIONAL: &str = "REGIONAL";

/// 프로젝트의 Cloud SQL 구성을 조회합니다.
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
    let instances = api.list_sql_instances(project).await?;
    let Some(primary) = instances
        .iter()
        .find(|i| i.state == STATE_RUNNABLE && i.instance_type == TYPE_PRIMARY)
    else {
        debug!(project, "no runnable cloud sql primary instance");
        return Ok(None);
    };

    let replicas: Vec<&SqlInstance> = instances
        .iter()
        .filter(|i| {
            i.state == STATE_RUNNABLE
                && i.instance_type == TYPE_READ_REPLICA
                && master_name(&i.master_instance_name) == primary.name
        })
        .collect();

    let regional_failover = primary.settings.availability_type == AVAILABILITY_REGIONAL;
    let standby = regional_failover
        || primary
            .failover_replica
            .as_ref()
            .is_some_and(|replica| replica.available);

    let mut cost = tier_cost(&primary.settings.tier, pricing)? * if standby { 2.0 } else { 1.0 };
    for replica in &replicas {
        cost += tier_cost(&replica.settings.tier, pricing)?;
    }

    Ok(Some(DatabaseResource::Relational(RelationalEngine {
        id: primary.name.clone(),
        primary_region: primary.region.clone(),
        replica_regions: replicas.iter().map(|r| r.region.clone()).collect(),
        regional_failover,
        cost: sanitize_cost(cost),
    })))
}

/// `masterInstanceName`은 `project:instance` 형식일 수 있습니다.
fn master_name(raw: &str) -> &str {
    raw.rsplit(':').next().unwrap_or(raw)
}

/// 커스텀 머신 티어(`db-custom-{cpu}-{memory_mib}`)를 (CPU, 메모리 MiB)로 해석합니다.
pub fn parse_tier(tier: &str) -> Option<(u32, u64)> {
    let mut parts = tier.split('-');
    if parts.next()? != "db" {
        return None;
    }
    let _family = parts.next()?;
    let cpu = parts.next()?.parse().ok()?;
    let memory_mib = parts.next()?.parse().ok()?;
    parts.next().is_none().then_some((cpu, memory_mib))
}

fn tier_cost(tier: &str, pricing: &PricingConfig) -> Result<f64, ProbeError> {
    let (cpu, memory_mib) = parse_tier(tier)
        .ok_or_else(|| ProbeError::shape(format!("unsupported cloud sql tier: '{tier}'")))?;
    Ok(f64::from(cpu) * pricing.cloudsql_cost_per_cpu_core
        + memory_mib as f64 * pricing.cloudsql_cost_per_mem_mib)
}
