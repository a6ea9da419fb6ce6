//! 토폴로지 분류 — 리소스 배치를 가용성 등급(0–3)으로 접습니다.
//!
//! 컴퓨팅 등급과 데이터베이스 등급 중 낮은 쪽이 최종 등급입니다.
//! 빈 리전/존 문자열은 신호가 없는 것으로 보고 개수에서 제외합니다.

use std::collections::BTreeSet;

use tracing::debug;
use webassess_core::types::AvailabilityRating;

use crate::resource::{ComputingResource, DatabaseResource};

/// 컴퓨팅 계층의 가용성 등급
///
/// - 서로 다른 리전이 둘 이상: 3
/// - 서버리스 리소스 포함: 2
/// - 서로 다른 존이 둘 이상: 2
/// - 존이 하나: 1
/// - 그 외: 0
pub fn app_rating(apps: &[ComputingResource]) -> AvailabilityRating {
    let regions: BTreeSet<&str> = apps
        .iter()
        .map(ComputingResource::region)
        .filter(|r| !r.is_empty())
        .collect();
    let zones: BTreeSet<&str> = apps
        .iter()
        .map(ComputingResource::zone)
        .filter(|z| !z.is_empty())
        .collect();
    let serverless = apps.iter().any(ComputingResource::is_serverless);

    if regions.len() > 1 {
        AvailabilityRating::MULTI_REGION
    } else if serverless || zones.len() > 1 {
        AvailabilityRating::MULTI_ZONE
    } else if zones.len() == 1 {
        AvailabilityRating::SINGLE_ZONE
    } else {
        AvailabilityRating::NONE
    }
}

/// 최종 가용성 등급 (최약 고리 규칙)
pub fn classify(apps: &[ComputingResource], db: &DatabaseResource) -> AvailabilityRating {
    let app = app_rating(apps);
    let database = db.availability_ordinal();
    debug!(app_rate = app.value(), db_rate = database.value(), "availability rates");
    app.min(database)
}
