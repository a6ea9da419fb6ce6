//! Cloud Functions 프로브 — 서비스 URI 호스트가 호스트와 같은 함수

use tracing::debug;
use url::Url;
use webassess_core::config::PricingConfig;

use super::{ProbeOutcome, average_instances};
use crate::cloud::{CloudApi, CloudFunction, last_segment, segment_after};
use crate::error::ProbeError;
use crate::resource::{ComputingResource, ServerlessPlatform, ServerlessService, sanitize_cost};

/// 호스트를 서비스 URI로 가진 함수를 찾습니다.
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
    let functions = api.list_functions(project).await?;
    let Some(function) = functions.iter().find(|f| serves_host(f, host)) else {
        debug!(project, host, scanned = functions.len(), "no cloud function serves the host");
        return Ok(None);
    };

    describe_function(function, pricing).map(Some)
}

fn serves_host(function: &CloudFunction, host: &str) -> bool {
    function
        .service_config
        .as_ref()
        .and_then(|config| Url::parse(&config.uri).ok())
        .and_then(|url| url.host_str().map(|h| h.eq_ignore_ascii_case(host)))
        .unwrap_or(false)
}

fn describe_function(
    function: &CloudFunction,
    pricing: &PricingConfig,
) -> Result<ComputingResource, ProbeError> {
    let config = function.service_config.clone().unwrap_or_default();
    let memory_mib = parse_memory_mib(&config.available_memory).ok_or_else(|| {
        ProbeError::shape(format!(
            "unexpected available memory: '{}'",
            config.available_memory
        ))
    })?;
    let cpu = cpu_for_memory(memory_mib).ok_or_else(|| {
        ProbeError::shape(format!("unknown memory tier: {memory_mib} MiB"))
    })?;

    let instances = average_instances(config.min_instance_count, config.max_instance_count);
    let cost = (cpu * pricing.serverless_cost_per_cpu_core
        + memory_mib as f64 * pricing.serverless_cost_per_mem_mib)
        * f64::from(instances);

    Ok(ComputingResource::Serverless(ServerlessService {
        id: last_segment(&function.name).to_owned(),
        platform: ServerlessPlatform::CloudFunctions,
        region: segment_after(&function.name, "locations")
            .unwrap_or_default()
            .to_owned(),
        cost: sanitize_cost(cost),
    }))
}

/// 메모리 티어별로 할당되는 CPU
pub fn cpu_for_memory(memory_mib: u64) -> Option<f64> {
    match memory_mib {
        128 => Some(0.083),
        256 => Some(0.167),
        512 => Some(0.333),
        1024 => Some(0.583),
        2048 => Some(1.0),
        4096 | 8192 => Some(2.0),
        16384 => Some(4.0),
        _ => None,
    }
}

/// `availableMemory` 값을 MiB로 바꿉니다.
///
/// `k`, `M`, `G`, `Mi`, `Gi` 접미어를 허용하며 `M`/`G`는 `Mi`/`Gi`와 같게 취급합니다.
pub fn parse_memory_mib(value: &str) -> Option<u64> {
    let value = value.trim();
    let (digits, multiplier, divisor) = if let Some(v) = value.strip_suffix("Mi") {
        (v, 1, 1)
    } else if let Some(v) = value.strip_suffix("Gi") {
        (v, 1024, 1)
    } else if let Some(v) = value.strip_suffix('M') {
        (v, 1, 1)
    } else if let Some(v) = value.strip_suffix('G') {
        (v, 1024, 1)
    } else if let Some(v) = value.strip_suffix('k') {
        (v, 1, 1024)
    } else {
        return None;
    };
    let amount: u64 = digits.parse().ok()?;
    amount.checked_mul(multiplier).map(|v| v / divisor)
}
