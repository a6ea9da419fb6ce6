//! Cloud Run 프로브 — 서비스 URL 호스트가 호스트와 같은 서비스
//!
//! Cloud Functions(2세대)가 내부적으로 만든 서비스는 제외합니다.
//! 해당 서비스는 Cloud Functions 프로브가 담당합니다.

use tracing::debug;
use url::Url;
use webassess_core::config::PricingConfig;

use super::{ProbeOutcome, average_instances};
use crate::cloud::{CloudApi, Container, RunService, last_segment, segment_after};
use crate::error::ProbeError;
use crate::resource::{ComputingResource, ServerlessPlatform, ServerlessService, sanitize_cost};

/// 호스트를 서비스 URL로 가진 Cloud Run 서비스를 찾습니다.
pub async fn probe<C: CloudApi>(
    api: &C,
    project: &str,
    host: &str,
    pricing: &PricingConfig,
) -> ProbeOutcome<ComputingResource> {
    find(api, project, host, pricing).await.into()
}

async fn find<C: CloudApi>(
    api: &C,
    project: &str,
    host: &str,
    pricing: &PricingConfig,
) -> Result<Option<ComputingResource>, ProbeError> {
    let services = api.list_run_services(project).await?;
    let Some(service) = services
        .iter()
        .filter(|s| !s.is_managed_by_functions())
        .find(|s| service_hosts(s).any(|h| h.eq_ignore_ascii_case(host)))
    else {
        debug!(project, host, scanned = services.len(), "no cloud run service serves the host");
        return Ok(None);
    };

    describe_service(api, service, pricing).await.map(Some)
}

/// 서비스의 리비전을 조회해 비용을 계산하고 리소스를 만듭니다.
///
/// 프론트도어의 서버리스 NEG도 이 함수로 해석합니다.
pub(crate) async fn describe_service<C: CloudApi>(
    api: &C,
    service: &RunService,
    pricing: &PricingConfig,
) -> Result<ComputingResource, ProbeError> {
    let revisions = api.list_run_revisions(&service.name).await?;

    let mut cost = 0.0;
    for revision in revisions.iter().filter(|r| r.resources_available()) {
        let instances = average_instances(
            revision.scaling.min_instance_count,
            revision.scaling.max_instance_count,
        );
        for container in &revision.containers {
            cost += container_cost(container, pricing)? * f64::from(instances);
        }
    }

    Ok(ComputingResource::Serverless(ServerlessService {
        id: last_segment(&service.name).to_owned(),
        platform: ServerlessPlatform::CloudRun,
        region: segment_after(&service.name, "locations")
            .unwrap_or_default()
            .to_owned(),
        cost: sanitize_cost(cost),
    }))
}

/// 서비스 URI와 추가 URL들의 호스트
fn service_hosts(service: &RunService) -> impl Iterator<Item = String> + '_ {
    std::iter::once(&service.uri)
        .chain(service.urls.iter())
        .filter_map(|raw| Url::parse(raw).ok())
        .filter_map(|url| url.host_str().map(str::to_owned))
}

/// 컨테이너 하나의 인스턴스당 비용
fn container_cost(container: &Container, pricing: &PricingConfig) -> Result<f64, ProbeError> {
    let limits = &container.resources.limits;
    let cpu_limit = limits.get("cpu").map(String::as_str).unwrap_or_default();
    let memory_limit = limits.get("memory").map(String::as_str).unwrap_or_default();

    let cpu = parse_cpu(cpu_limit)
        .ok_or_else(|| ProbeError::shape(format!("unexpected cpu limit: '{cpu_limit}'")))?;
    let memory_mib = parse_memory_mib(memory_limit)
        .ok_or_else(|| ProbeError::shape(format!("unexpected memory limit: '{memory_limit}'")))?;

    Ok(cpu * pricing.serverless_cost_per_cpu_core
        + memory_mib as f64 * pricing.serverless_cost_per_mem_mib)
}

/// CPU 한도를 코어 수로 바꿉니다. (`"1000m"` → 1.0, `"2"` → 2.0)
pub fn parse_cpu(limit: &str) -> Option<f64> {
    let limit = limit.trim();
    let cores = match limit.strip_suffix('m') {
        Some(millis) => millis.parse::<f64>().ok()? / 1000.0,
        None => limit.parse::<f64>().ok()?,
    };
    (cores.is_finite() && cores >= 0.0).then_some(cores)
}

/// 메모리 한도를 MiB로 바꿉니다. `Mi`와 `Gi` 단위만 허용합니다.
pub fn parse_memory_mib(limit: &str) -> Option<u64> {
    let limit = limit.trim();
    if let Some(mib) = limit.strip_suffix("Mi") {
        return mib.parse().ok();
    }
    if let Some(gib) = limit.strip_suffix("Gi") {
        return gib.parse::<u64>().ok()?.checked_mul(1024);
    }
    None
}
