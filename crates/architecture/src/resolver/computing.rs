//! 컴퓨팅 리졸버 — 고정 순서 캐스케이드
//!
//! 프론트도어 → Compute Engine → App Engine → Cloud Run → Cloud Functions 순서로
//! 프로브를 실행하고 처음 매칭된 결과를 반환합니다. 실패한 프로브는 매칭 없음으로
//! 보고 다음 프로브로 넘어갑니다.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use webassess_core::config::PricingConfig;
use webassess_core::error::ResolutionError;
use webassess_core::types::ResourceKind;

use super::bounded;
use crate::cloud::CloudApi;
use crate::probe::{
    ComputingProbe, app_engine, cloud_functions, cloud_run, compute_engine, front_door,
};
use crate::resource::ComputingResource;

/// 컴퓨팅 계층 해석 결과
#[derive(Debug, Clone, PartialEq)]
pub struct ComputingResolution {
    /// 프론트도어를 거쳐 찾은 경우 그 ID
    pub front_door: Option<String>,
    /// 리프 컴퓨팅 리소스 (비어 있지 않음)
    pub apps: Vec<ComputingResource>,
}

/// 컴퓨팅 리졸버
pub struct ComputingResolver<C> {
    api: Arc<C>,
    pricing: PricingConfig,
    probe_timeout: Duration,
}

impl<C: CloudApi> ComputingResolver<C> {
    pub fn new(api: Arc<C>, pricing: PricingConfig, probe_timeout: Duration) -> Self {
        Self {
            api,
            pricing,
            probe_timeout,
        }
    }

    /// 호스트를 서비스하는 컴퓨팅 리소스를 찾습니다.
    ///
    /// # Errors
    ///
    /// 어떤 프로브도 매칭되지 않으면 `ResourceNotFound(computing)`를 반환합니다.
    pub async fn resolve(
        &self,
        project: &str,
        host: &str,
    ) -> Result<ComputingResolution, ResolutionError> {
        for probe in ComputingProbe::ORDER {
            if let Some(resolution) = self.run(probe, project, host).await {
                info!(
                    project_id = project,
                    host,
                    probe = probe.label(),
                    apps = resolution.apps.len(),
                    front_door = resolution.front_door.as_deref().unwrap_or("-"),
                    "computing resources resolved"
                );
                return Ok(resolution);
            }
        }

        Err(ResolutionError::ResourceNotFound {
            kind: ResourceKind::Computing,
        })
    }

    async fn run(
        &self,
        probe: ComputingProbe,
        project: &str,
        host: &str,
    ) -> Option<ComputingResolution> {
        let api = self.api.as_ref();
        let pricing = &self.pricing;
        let label = probe.label();
        let limit = self.probe_timeout;

        let single = |app: ComputingResource| ComputingResolution {
            front_door: None,
            apps: vec![app],
        };

        match probe {
            ComputingProbe::FrontDoor => bounded(
                label,
                limit,
                front_door::probe(api, project, host, pricing),
            )
            .await
            .found()
            .map(|door| ComputingResolution {
                front_door: Some(door.id),
                apps: door.backends,
            }),
            ComputingProbe::ComputeEngine => bounded(
                label,
                limit,
                compute_engine::probe(api, project, host, pricing),
            )
            .await
            .found()
            .map(single),
            ComputingProbe::AppEngine => {
                bounded(label, limit, app_engine::probe(api, project, host, pricing))
                    .await
                    .found()
                    .map(single)
            }
            ComputingProbe::CloudRun => {
                bounded(label, limit, cloud_run::probe(api, project, host, pricing))
                    .await
                    .found()
                    .map(single)
            }
            ComputingProbe::CloudFunctions => bounded(
                label,
                limit,
                cloud_functions::probe(api, project, host, pricing),
            )
            .await
            .found()
            .map(single),
        }
    }
}
