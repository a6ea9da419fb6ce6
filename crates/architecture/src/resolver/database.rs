//! 데이터베이스 리졸버 — 전체 실행 후 축약
//!
//! 세 프로브를 `tokio::join!`으로 동시에 실행하고, 결과가 정확히 하나일 때만
//! 성공합니다. 둘 이상이면 임의로 고르지 않고 모호한 구성으로 거부합니다.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use webassess_core::config::PricingConfig;
use webassess_core::error::ResolutionError;
use webassess_core::types::ResourceKind;

use super::bounded;
use crate::cloud::CloudApi;
use crate::probe::{DatabaseProbe, ProbeOutcome, alloydb, cloud_sql, spanner};
use crate::resource::{CloudResource, DatabaseResource};

/// 데이터베이스 리졸버
pub struct DatabaseResolver<C> {
    api: Arc<C>,
    pricing: PricingConfig,
    probe_timeout: Duration,
}

impl<C: CloudApi> DatabaseResolver<C> {
    pub fn new(api: Arc<C>, pricing: PricingConfig, probe_timeout: Duration) -> Self {
        Self {
            api,
            pricing,
            probe_timeout,
        }
    }

    /// 프로젝트의 데이터베이스 리소스를 확정합니다.
    ///
    /// # Errors
    ///
    /// - 매칭 없음: `ResourceNotFound(database)`
    /// - 둘 이상 매칭: `AmbiguousConfiguration(database)`
    pub async fn resolve(&self, project: &str) -> Result<DatabaseResource, ResolutionError> {
        let api = self.api.as_ref();
        let pricing = &self.pricing;
        let limit = self.probe_timeout;

        let (sql, alloy, span) = tokio::join!(
            bounded(
                DatabaseProbe::CloudSql.label(),
                limit,
                cloud_sql::probe(api, project, pricing)
            ),
            bounded(
                DatabaseProbe::AlloyDb.label(),
                limit,
                alloydb::probe(api, project, pricing)
            ),
            bounded(
                DatabaseProbe::Spanner.label(),
                limit,
                spanner::probe(api, project, pricing)
            ),
        );

        let db = reduce(vec![sql, alloy, span])?;
        info!(
            project_id = project,
            resource_id = db.id(),
            platform = db.platform_name(),
            "database resolved"
        );
        Ok(db)
    }
}

/// 프로브 결과를 하나의 데이터베이스로 축약합니다.
///
/// 실패한 프로브는 매칭 없음으로 취급합니다.
pub fn reduce(
    outcomes: Vec<ProbeOutcome<DatabaseResource>>,
) -> Result<DatabaseResource, ResolutionError> {
    let mut found: Vec<DatabaseResource> =
        outcomes.into_iter().filter_map(ProbeOutcome::found).collect();

    match found.len() {
        0 => Err(ResolutionError::ResourceNotFound {
            kind: ResourceKind::Database,
        }),
        1 => Ok(found.remove(0)),
        _ => Err(ResolutionError::AmbiguousConfiguration {
            kind: ResourceKind::Database,
            platforms: found.iter().map(|db| db.platform_name().to_owned()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::{MockCloudApi, SERVICE_ALLOYDB, SERVICE_SPANNER};
    use crate::error::ProbeError;
    use crate::resource::fixtures::{cloud_sql, spanner};

    #[test]
    fn single_match_wins() {
        let db = reduce(vec![
            ProbeOutcome::NotFound,
            ProbeOutcome::Found(spanner("nam3", 1.0)),
            ProbeOutcome::QueryFailed(ProbeError::shape("bad")),
        ])
        .unwrap();
        assert_eq!(db.platform_name(), "Cloud Spanner");
    }

    #[test]
    fn no_match_is_database_not_found() {
        let err = reduce(vec![ProbeOutcome::NotFound, ProbeOutcome::NotFound]).unwrap_err();
        assert_eq!(
            err,
            ResolutionError::ResourceNotFound {
                kind: ResourceKind::Database
            }
        );
    }

    #[test]
    fn two_matches_are_ambiguous() {
        let err = reduce(vec![
            ProbeOutcome::Found(cloud_sql("us-central1", &[], false, 1.0)),
            ProbeOutcome::NotFound,
            ProbeOutcome::Found(spanner("nam3", 1.0)),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ResolutionError::AmbiguousConfiguration {
                kind: ResourceKind::Database,
                platforms: vec!["Cloud SQL".to_owned(), "Cloud Spanner".to_owned()],
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_probe_is_bounded_by_timeout() {
        use crate::cloud::{SpannerInstance, SqlInstance, SqlSettings};

        let api = MockCloudApi::new()
            .with_sql_instances(vec![SqlInstance {
                name: "main".to_owned(),
                region: "us-central1".to_owned(),
                state: "RUNNABLE".to_owned(),
                instance_type: "CLOUD_SQL_INSTANCE".to_owned(),
                settings: SqlSettings {
                    tier: "db-custom-1-3840".to_owned(),
                    availability_type: "ZONAL".to_owned(),
                },
                ..SqlInstance::default()
            }])
            .with_spanner_instances(vec![SpannerInstance {
                name: "projects/p/instances/late".to_owned(),
                config: "projects/p/instanceConfigs/nam3".to_owned(),
                processing_units: 100,
            }])
            .with_delay(SERVICE_SPANNER, Duration::from_secs(60))
            .with_failing(SERVICE_ALLOYDB);

        let resolver = DatabaseResolver::new(
            Arc::new(api),
            PricingConfig::default(),
            Duration::from_secs(2),
        );
        let db = resolver.resolve("p").await.unwrap();
        assert_eq!(db.platform_name(), "Cloud SQL");
    }
}
