//! webassess 공통 크레이트
//!
//! 클라우드 아키텍처 평가에 필요한 공통 타입, 에러, 설정, 실행 이력 저장소, 메트릭 상수를 제공합니다.
//! 아키텍처 해석(`webassess-architecture`), 벤치마크(`webassess-benchmark`),
//! CLI(`webassess-cli`)가 모두 이 크레이트에 의존합니다.

pub mod config;
pub mod error;
pub mod history;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{
    AssessError, BenchmarkError, ConfigError, ProviderError, ResolutionError, StorageError,
};

// 설정
pub use config::{
    AssessConfig, BenchmarkConfig, GcpConfig, GeneralConfig, HistoryConfig, PricingConfig,
    TargetConfig,
};

// 이력 저장소
pub use history::{HistoryStore, JsonlHistoryStore};

// 도메인 타입
pub use types::{AvailabilityRating, JobRecord, ResourceKind};
