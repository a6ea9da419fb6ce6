//! Spanner 프로브 — 프로젝트의 첫 번째 인스턴스

use tracing::debug;
use webassess_core::config::PricingConfig;

use super::ProbeOutcome;
use crate::cloud::CloudApi;
use crate::error::ProbeError;
use crate::resource::{DatabaseResource, DistributedEngine, sanitize_cost};

/// 프로젝트의 Spanner 인스턴스를 조회합니다.
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
    let instances = api.list_spanner_instances(project).await?;
    let Some(instance) = instances.into_iter().next() else {
        debug!(project, "no spanner instance");
        return Ok(None);
    };

    let cost = f64::from(instance.processing_units) * pricing.spanner_cost_per_processing_unit;
    Ok(Some(DatabaseResource::Distributed(DistributedEngine {
        id: instance.name,
        config: instance.config,
        processing_units: instance.processing_units,
        cost: sanitize_cost(cost),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::{MockCloudApi, SERVICE_SPANNER, SpannerInstance};
    use webassess_core::types::AvailabilityRating;

    fn instance(name: &str, config: &str, units: u32) -> SpannerInstance {
        SpannerInstance {
            name: format!("projects/p/instances/{name}"),
            config: format!("projects/p/instanceConfigs/{config}"),
            processing_units: units,
        }
    }

    #[tokio::test]
    async fn first_instance_is_used() {
        let api = MockCloudApi::new().with_spanner_instances(vec![
            instance("orders", "nam-eur-asia1", 1000),
            instance("scratch", "regional-us-central1", 100),
        ]);
        let pricing = PricingConfig {
            spanner_cost_per_processing_unit: 0.5,
            ..PricingConfig::default()
        };

        let db = probe(&api, "p", &pricing).await.found().expect("spanner");
        assert_eq!(db.platform_name(), "Cloud Spanner");
        assert_eq!(db.availability_ordinal(), AvailabilityRating::MULTI_REGION);
        match db {
            DatabaseResource::Distributed(engine) => {
                assert_eq!(engine.id, "projects/p/instances/orders");
                assert!((engine.cost - 500.0).abs() < 1e-9);
            }
            other => panic!("expected spanner, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn regional_config_is_multi_zone() {
        let api = MockCloudApi::new()
            .with_spanner_instances(vec![instance("orders", "regional-asia-northeast1", 100)]);
        let db = probe(&api, "p", &PricingConfig::default())
            .await
            .found()
            .expect("spanner");
        assert_eq!(db.availability_ordinal(), AvailabilityRating::MULTI_ZONE);
    }

    #[tokio::test]
    async fn api_failure_is_query_failed() {
        let api = MockCloudApi::new().with_failing(SERVICE_SPANNER);
        assert!(matches!(
            probe(&api, "p", &PricingConfig::default()).await,
            ProbeOutcome::QueryFailed(ProbeError::Status { status: 503, .. })
        ));
    }
}
