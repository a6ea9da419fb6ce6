//! 프론트도어 프로브 — 호스트 IP를 가진 HTTP(S) 로드 밸런서와 그 백엔드
//!
//! 포워딩 규칙 → 타깃 프록시 → URL 맵 기본 서비스 → 백엔드 서비스 → 백엔드 그룹
//! 순서로 참조를 따라갑니다. 인스턴스 그룹 멤버는 Compute Engine 형상 조회로,
//! Cloud Run을 가리키는 서버리스 NEG는 Cloud Run 서비스 조회로 리프 리소스가 됩니다.
//!
//! 백엔드 하나라도 해석에 실패하면 프론트도어 전체가 실패합니다.
//! 리프 백엔드가 하나도 없으면 매칭 없음입니다.

use tracing::debug;
use webassess_core::config::PricingConfig;

use super::{ProbeOutcome, cloud_run, compute_engine};
use crate::cloud::{CloudApi, NetworkEndpointGroup, last_segment, segment_after};
use crate::error::ProbeError;
use crate::resource::{ComputingResource, FrontDoor};

/// 백엔드 그룹 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// 존 또는 리전 인스턴스 그룹
    InstanceGroup,
    /// 네트워크 엔드포인트 그룹
    NetworkEndpointGroup,
    /// 지원하지 않는 그룹
    Unsupported,
}

impl GroupKind {
    /// 그룹 self link로 종류를 판별합니다.
    pub fn of(link: &str) -> Self {
        if segment_after(link, "instanceGroups").is_some() {
            Self::InstanceGroup
        } else if segment_after(link, "networkEndpointGroups").is_some() {
            Self::NetworkEndpointGroup
        } else {
            Self::Unsupported
        }
    }
}

/// 호스트 IP로 들어오는 프론트도어와 그 리프 백엔드를 찾습니다.
pub async fn probe<C: CloudApi>(
    api: &C,
    project: &str,
    host: &str,
    pricing: &PricingConfig,
) -> ProbeOutcome<FrontDoor> {
    find(api, project, host, pricing).await.into()
}

async fn find<C: CloudApi>(
    api: &C,
    project: &str,
    host: &str,
    pricing: &PricingConfig,
) -> Result<Option<FrontDoor>, ProbeError> {
    let rules = api.list_forwarding_rules(project).await?;
    let Some(rule) = rules.iter().find(|r| r.ip_address == host) else {
        debug!(project, host, "no forwarding rule owns the host ip");
        return Ok(None);
    };

    if segment_after(&rule.target, "targetHttpProxies").is_none()
        && segment_after(&rule.target, "targetHttpsProxies").is_none()
    {
        return Err(ProbeError::shape(format!(
            "forwarding rule '{}' does not target an http(s) proxy: '{}'",
            rule.name, rule.target
        )));
    }

    let proxy = api.get_target_proxy(&rule.target).await?;
    let url_map = api.get_url_map(&proxy.url_map).await?;
    let service = api.get_backend_service(&url_map.default_service).await?;

    let mut backends = Vec::new();
    for backend in &service.backends {
        match GroupKind::of(&backend.group) {
            GroupKind::InstanceGroup => {
                backends.extend(instance_group_backends(api, &backend.group, pricing).await?);
            }
            GroupKind::NetworkEndpointGroup => {
                let group = api.get_network_endpoint_group(&backend.group).await?;
                if let Some(resource) = serverless_backend(api, project, &group, pricing).await? {
                    backends.push(resource);
                }
            }
            GroupKind::Unsupported => {
                debug!(group = backend.group.as_str(), "unsupported backend group skipped");
            }
        }
    }

    if backends.is_empty() {
        debug!(
            forwarding_rule = rule.name.as_str(),
            "front door has no leaf backends"
        );
        return Ok(None);
    }

    Ok(Some(FrontDoor {
        id: rule.name.clone(),
        backends,
    }))
}

/// 인스턴스 그룹의 실행 중 멤버를 VM 리소스로 해석합니다.
async fn instance_group_backends<C: CloudApi>(
    api: &C,
    group_link: &str,
    pricing: &PricingConfig,
) -> Result<Vec<ComputingResource>, ProbeError> {
    let members = api.list_group_members(group_link).await?;
    let mut resources = Vec::with_capacity(members.len());
    for member in members {
        if member.status != "RUNNING" {
            debug!(
                instance = member.instance.as_str(),
                status = member.status.as_str(),
                "skipping non-running group member"
            );
            continue;
        }
        let instance = api.get_instance(&member.instance).await?;
        resources.push(compute_engine::describe_instance(api, &instance, pricing).await?);
    }
    Ok(resources)
}

/// Cloud Run을 가리키는 서버리스 NEG를 Cloud Run 리소스로 해석합니다.
async fn serverless_backend<C: CloudApi>(
    api: &C,
    project: &str,
    group: &NetworkEndpointGroup,
    pricing: &PricingConfig,
) -> Result<Option<ComputingResource>, ProbeError> {
    let Some(target) = &group.cloud_run else {
        debug!(group = group.name.as_str(), "network endpoint group is not a cloud run target");
        return Ok(None);
    };

    let region = segment_after(&group.self_link, "regions")
        .unwrap_or_else(|| last_segment(&group.region));
    if region.is_empty() {
        return Err(ProbeError::shape(format!(
            "network endpoint group '{}' has no region",
            group.name
        )));
    }

    let name = format!(
        "projects/{project}/locations/{region}/services/{}",
        target.service
    );
    let service = api.get_run_service(&name).await?;
    cloud_run::describe_service(api, &service, pricing)
        .await
        .map(Some)
}
