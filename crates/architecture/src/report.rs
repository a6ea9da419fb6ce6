//! 아키텍처 집계와 평가 진입점
//!
//! [`Assessor`]가 엔드포인트 해석 → 컴퓨팅 해석 → 데이터베이스 해석 순서로 실행하고,
//! 그 결과로 만든 [`Architecture`]에서 가용성 등급과 총 비용을 계산합니다.
//! 치명적 에러가 나면 부분 결과 없이 즉시 종료합니다.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::info;
use webassess_core::config::{AssessConfig, PricingConfig};
use webassess_core::error::{AssessError, ResolutionError};
use webassess_core::metrics as m;
use webassess_core::types::{AvailabilityRating, ResourceKind};

use crate::cloud::{CloudApi, RestCloudApi};
use crate::cost::total_cost;
use crate::endpoint::resolve_host;
use crate::resolver::{ComputingResolver, DatabaseResolver};
use crate::resource::{ComputingResource, DatabaseResource};
use crate::topology::classify;

/// 해석된 아키텍처 (불변)
///
/// `apps`는 항상 비어 있지 않고 데이터베이스는 정확히 하나입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Architecture {
    front_door: Option<String>,
    apps: Vec<ComputingResource>,
    db: DatabaseResource,
}

impl Architecture {
    /// 리졸버 결과로 아키텍처를 구성합니다.
    ///
    /// # Errors
    ///
    /// `apps`가 비어 있으면 `ResourceNotFound(computing)`를 반환합니다.
    pub fn new(
        front_door: Option<String>,
        apps: Vec<ComputingResource>,
        db: DatabaseResource,
    ) -> Result<Self, ResolutionError> {
        if apps.is_empty() {
            return Err(ResolutionError::ResourceNotFound {
                kind: ResourceKind::Computing,
            });
        }
        Ok(Self {
            front_door,
            apps,
            db,
        })
    }

    pub fn front_door(&self) -> Option<&str> {
        self.front_door.as_deref()
    }

    pub fn apps(&self) -> &[ComputingResource] {
        &self.apps
    }

    pub fn db(&self) -> &DatabaseResource {
        &self.db
    }

    /// 최약 고리 규칙으로 계산한 가용성 등급
    pub fn availability_rating(&self) -> AvailabilityRating {
        classify(&self.apps, &self.db)
    }

    /// 모든 리소스 비용의 합
    pub fn total_cost(&self) -> f64 {
        total_cost(&self.apps, &self.db)
    }
}

/// 평가 결과 보고서
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchitectureReport {
    pub project_id: String,
    pub endpoint: String,
    pub host: String,
    pub architecture: Architecture,
    pub availability_rating: AvailabilityRating,
    pub total_cost: f64,
}

/// 아키텍처 평가기
pub struct Assessor<C> {
    computing: ComputingResolver<C>,
    database: DatabaseResolver<C>,
}

impl<C: CloudApi> Assessor<C> {
    /// 클라우드 API 핸들을 공유하는 평가기를 생성합니다.
    pub fn new(api: Arc<C>, pricing: PricingConfig, probe_timeout: Duration) -> Self {
        Self {
            computing: ComputingResolver::new(Arc::clone(&api), pricing.clone(), probe_timeout),
            database: DatabaseResolver::new(api, pricing, probe_timeout),
        }
    }

    /// 엔드포인트 뒤의 아키텍처를 해석하고 등급과 비용을 계산합니다.
    ///
    /// # Errors
    ///
    /// 엔드포인트가 잘못되었거나, 리소스를 찾지 못했거나, 데이터베이스 구성이
    /// 모호하면 해당 [`ResolutionError`]를 반환합니다.
    pub async fn assess(
        &self,
        project: &str,
        endpoint: &str,
    ) -> Result<ArchitectureReport, ResolutionError> {
        let result = self.assess_inner(project, endpoint).await;
        let label = if result.is_ok() {
            m::RESULT_SUCCESS
        } else {
            m::RESULT_FAILURE
        };
        metrics::counter!(m::ASSESSMENTS_TOTAL, m::LABEL_RESULT => label).increment(1);
        result
    }

    async fn assess_inner(
        &self,
        project: &str,
        endpoint: &str,
    ) -> Result<ArchitectureReport, ResolutionError> {
        let host = resolve_host(endpoint)?;
        let computing = self.computing.resolve(project, &host).await?;
        let db = self.database.resolve(project).await?;
        let architecture = Architecture::new(computing.front_door, computing.apps, db)?;

        let availability_rating = architecture.availability_rating();
        let total_cost = architecture.total_cost();
        info!(
            project_id = project,
            host = host.as_str(),
            availability_rating = availability_rating.value(),
            total_cost,
            "architecture assessed"
        );

        Ok(ArchitectureReport {
            project_id: project.to_owned(),
            endpoint: endpoint.to_owned(),
            host,
            architecture,
            availability_rating,
            total_cost,
        })
    }
}

impl Assessor<RestCloudApi> {
    /// 설정으로 실제 클라우드 API를 사용하는 평가기를 생성합니다.
    ///
    /// # Errors
    ///
    /// 액세스 토큰을 얻지 못하면 `ProviderError::Auth`를 반환합니다.
    pub async fn from_config(config: &AssessConfig) -> Result<Self, AssessError> {
        let api = RestCloudApi::from_config(&config.gcp).await?;
        Ok(Self::new(
            Arc::new(api),
            config.pricing.clone(),
            Duration::from_secs(config.gcp.probe_timeout_secs),
        ))
    }
}
