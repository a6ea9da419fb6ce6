//! 도메인 타입 — 크레이트 전역에서 사용되는 공통 타입
//!
//! 아키텍처 해석 결과, 가용성 등급, 실행 이력 레코드처럼
//! 여러 크레이트가 함께 사용하는 데이터 구조를 정의합니다.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// 해석 대상 리소스 종류
///
/// `ResourceNotFound`, `AmbiguousConfiguration` 에러가 어느 계층에서
/// 발생했는지 표시하는 데 사용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// 컴퓨팅 계층 (VM, 서버리스, 프론트도어 백엔드)
    Computing,
    /// 데이터베이스 계층
    Database,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Computing => write!(f, "computing"),
            Self::Database => write!(f, "database"),
        }
    }
}

/// 가용성 등급 (0–3)
///
/// - 0: 이중화 없음
/// - 1: 단일 존
/// - 2: 멀티 존 (리전 내 이중화)
/// - 3: 멀티 리전
///
/// 생성자는 범위를 벗어난 값을 거부하므로 이 타입의 값은 항상 0–3입니다.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct AvailabilityRating(u8);

impl AvailabilityRating {
    /// 이중화 없음
    pub const NONE: Self = Self(0);
    /// 단일 존
    pub const SINGLE_ZONE: Self = Self(1);
    /// 멀티 존
    pub const MULTI_ZONE: Self = Self(2);
    /// 멀티 리전
    pub const MULTI_REGION: Self = Self(3);

    /// 0–3 범위의 값에서 등급을 생성합니다.
    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MULTI_REGION.0).then_some(Self(value))
    }

    /// 등급의 정수 값을 반환합니다.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for AvailabilityRating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("availability rating out of range: {value}"))
    }
}

impl From<AvailabilityRating> for u8 {
    fn from(rating: AvailabilityRating) -> Self {
        rating.0
    }
}

impl fmt::Display for AvailabilityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 평가 실행 이력 레코드
///
/// 성공/실패 여부와 관계없이 한 번의 평가 실행마다 하나씩 기록됩니다.
/// 실패 시에는 그 시점까지 채워진 필드와 `message`만 의미가 있습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// 실행 ID
    pub run_id: uuid::Uuid,
    /// 사용자 키
    pub user_key: String,
    /// 평가 대상 프로젝트 ID
    pub project_id: String,
    /// 가용성 등급
    pub availability_rating: AvailabilityRating,
    /// 총 비용 추정치
    pub total_cost: f64,
    /// 벤치마크 성능 점수
    pub performance: u64,
    /// 최종 점수 (성능 × 가용성)
    pub score: u64,
    /// 비용 대비 점수
    pub score_by_cost: f64,
    /// 사람이 읽을 수 있는 결과 메시지
    pub message: String,
    /// 실행 시각
    pub executed_at: SystemTime,
}

impl JobRecord {
    /// 빈 결과 필드로 새 레코드를 생성합니다.
    pub fn new(user_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4(),
            user_key: user_key.into(),
            project_id: project_id.into(),
            availability_rating: AvailabilityRating::NONE,
            total_cost: 0.0,
            performance: 0,
            score: 0,
            score_by_cost: 0.0,
            message: String::new(),
            executed_at: SystemTime::now(),
        }
    }

    /// 성능 점수를 반영해 `score`와 `score_by_cost`를 계산합니다.
    ///
    /// 총 비용이 0이면 `score_by_cost`는 0으로 둡니다.
    pub fn apply_performance(&mut self, performance: u64) {
        self.performance = performance;
        self.score = performance.saturating_mul(u64::from(self.availability_rating.value()));
        self.score_by_cost = if self.total_cost > 0.0 {
            self.score as f64 / self.total_cost
        } else {
            0.0
        };
    }
}

impl fmt::Display for JobRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] project={} rating={} cost={:.2} score={} ({})",
            self.run_id,
            self.project_id,
            self.availability_rating,
            self.total_cost,
            self.score,
            self.message,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_rejects_out_of_range() {
        assert_eq!(AvailabilityRating::new(3), Some(AvailabilityRating::MULTI_REGION));
        assert_eq!(AvailabilityRating::new(4), None);
        assert!(AvailabilityRating::try_from(200).is_err());
    }

    #[test]
    fn rating_ordering_follows_value() {
        assert!(AvailabilityRating::NONE < AvailabilityRating::SINGLE_ZONE);
        assert!(AvailabilityRating::SINGLE_ZONE < AvailabilityRating::MULTI_ZONE);
        assert!(AvailabilityRating::MULTI_ZONE < AvailabilityRating::MULTI_REGION);
    }

    #[test]
    fn rating_serializes_as_integer() {
        let json = serde_json::to_string(&AvailabilityRating::MULTI_ZONE).unwrap();
        assert_eq!(json, "2");
        let parsed: Result<AvailabilityRating, _> = serde_json::from_str("7");
        assert!(parsed.is_err());
    }

    #[test]
    fn resource_kind_display() {
        assert_eq!(ResourceKind::Computing.to_string(), "computing");
        assert_eq!(ResourceKind::Database.to_string(), "database");
    }

    #[test]
    fn job_record_score_uses_rating() {
        let mut record = JobRecord::new("key-1", "my-project");
        record.availability_rating = AvailabilityRating::MULTI_ZONE;
        record.total_cost = 4.0;
        record.apply_performance(120);
        assert_eq!(record.score, 240);
        assert!((record.score_by_cost - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn job_record_score_saturates() {
        let mut record = JobRecord::new("key-1", "my-project");
        record.availability_rating = AvailabilityRating::MULTI_REGION;
        record.total_cost = 1.0;
        record.apply_performance(u64::MAX);
        assert_eq!(record.performance, u64::MAX);
        assert_eq!(record.score, u64::MAX);
    }

    #[test]
    fn job_record_zero_cost_keeps_score_by_cost_zero() {
        let mut record = JobRecord::new("key-1", "my-project");
        record.availability_rating = AvailabilityRating::SINGLE_ZONE;
        record.apply_performance(10);
        assert_eq!(record.score, 10);
        assert_eq!(record.score_by_cost, 0.0);
    }

    #[test]
    fn job_record_json_roundtrip_keeps_message() {
        let mut record = JobRecord::new("key-1", "my-project");
        record.message = "Failed to get availability rate: not found".to_owned();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: JobRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.run_id, record.run_id);
        assert_eq!(parsed.message, record.message);
    }
}
