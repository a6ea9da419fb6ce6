//! Compute Engine 프로브 — 외부 NAT IP가 호스트와 같은 실행 중 VM

use tracing::debug;
use webassess_core::config::PricingConfig;

use super::ProbeOutcome;
use crate::cloud::{CloudApi, Instance, last_segment};
use crate::error::ProbeError;
use crate::resource::{ComputingResource, MachineShape, VirtualMachine, sanitize_cost};

/// 호스트 IP를 외부 주소로 가진 실행 중 VM을 찾습니다.
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
    let instances = api.list_instances(project).await?;
    let Some(instance) = instances
        .iter()
        .find(|i| i.is_running() && i.has_nat_ip(host))
    else {
        debug!(project, host, scanned = instances.len(), "no running instance owns the host ip");
        return Ok(None);
    };

    describe_instance(api, instance, pricing).await.map(Some)
}

/// 인스턴스의 머신 타입을 조회해 [`VirtualMachine`] 리소스를 만듭니다.
///
/// 프론트도어의 인스턴스 그룹 멤버도 이 함수로 해석합니다.
pub(crate) async fn describe_instance<C: CloudApi>(
    api: &C,
    instance: &Instance,
    pricing: &PricingConfig,
) -> Result<ComputingResource, ProbeError> {
    let zone = last_segment(&instance.zone);
    if zone.is_empty() {
        return Err(ProbeError::shape(format!(
            "instance '{}' has no zone",
            instance.name
        )));
    }

    let machine = api.get_machine_type(&instance.machine_type).await?;
    let shape = MachineShape {
        cpus: machine.guest_cpus,
        memory_mib: machine.memory_mb,
        shared_core: machine.is_shared_cpu,
    };

    Ok(ComputingResource::VirtualMachine(VirtualMachine {
        id: instance.name.clone(),
        region: region_from_zone(zone),
        zone: zone.to_owned(),
        cost: machine_cost(&shape, pricing),
        shape,
    }))
}

/// VM 비용: `(cpu × CPU 단가 + 메모리 MiB × 메모리 단가) × (공유 코어면 0.5)`
pub fn machine_cost(shape: &MachineShape, pricing: &PricingConfig) -> f64 {
    let shared_rate = if shape.shared_core { 0.5 } else { 1.0 };
    sanitize_cost(
        (f64::from(shape.cpus) * pricing.gce_cost_per_cpu_core
            + shape.memory_mib as f64 * pricing.gce_cost_per_mem_mib)
            * shared_rate,
    )
}

/// 존 이름에서 리전을 구합니다. (`us-central1-c` → `us-central1`)
pub fn region_from_zone(zone: &str) -> String {
    zone.rsplit_once('-')
        .map_or(zone, |(region, _)| region)
        .to_owned()
}
