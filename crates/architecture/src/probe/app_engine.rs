//! App Engine 프로브 — 기본 호스트 이름이 호스트와 같은 애플리케이션

use tracing::debug;
use webassess_core::config::PricingConfig;

use super::{ProbeOutcome, average_instances};
use crate::cloud::{AppEngineVersion, CloudApi};
use crate::error::ProbeError;
use crate::resource::{ComputingResource, ServerlessPlatform, ServerlessService, sanitize_cost};

/// 자동 확장 최대 인스턴스 수가 지정되지 않았을 때 사용하는 값
const DEFAULT_MAX_INSTANCES: u32 = 100;

/// 호스트가 프로젝트 App Engine 애플리케이션의 기본 호스트 이름인지 확인합니다.
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
    let Some(application) = api.get_application(project).await? else {
        debug!(project, "project has no app engine application");
        return Ok(None);
    };
    if !application.default_hostname.eq_ignore_ascii_case(host) {
        return Ok(None);
    }

    let mut cost = 0.0;
    for service in api.list_app_engine_services(project).await? {
        for version in api.list_app_engine_versions(project, &service.id).await? {
            cost += version_cost(&version, pricing);
        }
    }

    Ok(Some(ComputingResource::Serverless(ServerlessService {
        id: application.name,
        platform: ServerlessPlatform::AppEngine,
        region: region_from_location(&application.location_id),
        cost: sanitize_cost(cost),
    })))
}

/// 인스턴스 클래스별 (CPU 코어 환산, 메모리 MiB)
pub fn instance_class_shape(class: &str) -> Option<(f64, u64)> {
    match class {
        "F1" | "B1" => Some((0.6, 256)),
        "F2" | "B2" => Some((1.2, 512)),
        "F4" | "B4" => Some((2.4, 1024)),
        "F4_1G" | "B4_1G" => Some((2.4, 2048)),
        "B8" => Some((4.8, 2048)),
        _ => None,
    }
}

/// 버전 비용: 클래스 단가 × 평균 인스턴스 수. 알 수 없는 클래스는 0입니다.
fn version_cost(version: &AppEngineVersion, pricing: &PricingConfig) -> f64 {
    let Some((cpu, memory_mib)) = instance_class_shape(&version.instance_class) else {
        debug!(
            version = version.name.as_str(),
            instance_class = version.instance_class.as_str(),
            "unknown instance class, counted as zero cost"
        );
        return 0.0;
    };

    let scaling = version.automatic_scaling.clone().unwrap_or_default();
    let max = match scaling.max_total_instances {
        0 => DEFAULT_MAX_INSTANCES,
        max => max,
    };
    let unit = cpu * pricing.serverless_cost_per_cpu_core
        + memory_mib as f64 * pricing.serverless_cost_per_mem_mib;
    unit * f64::from(average_instances(scaling.min_total_instances, max))
}

/// App Engine 위치 ID를 리전 이름으로 바꿉니다.
///
/// 초기 위치 ID 두 개는 숫자 접미어가 없습니다.
pub fn region_from_location(location_id: &str) -> String {
    match location_id {
        "europe-west" => "europe-west1".to_owned(),
        "us-central" => "us-central1".to_owned(),
        other => other.to_owned(),
    }
}
