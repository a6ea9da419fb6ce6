//! 에러 타입 — 도메인별 에러 정의

use crate::types::ResourceKind;

/// webassess 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum AssessError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 아키텍처 해석 에러 (실행 중단)
    #[error("resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// 클라우드 프로바이더 접근 에러
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// 벤치마크 실행 에러
    #[error("benchmark error: {0}")]
    Benchmark(#[from] BenchmarkError),

    /// 이력 저장소 에러
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 아키텍처 해석 에러
///
/// 모두 치명적이며, 발생 시 평가 실행은 부분 결과 없이 종료됩니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// 엔드포인트가 올바른 URL이 아님
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// 어떤 프로브도 리소스를 찾지 못함
    #[error("{kind} resource was not found")]
    ResourceNotFound { kind: ResourceKind },

    /// 둘 이상의 플랫폼이 동시에 매칭됨
    #[error("ambiguous {kind} configuration: {} are all live", .platforms.join(", "))]
    AmbiguousConfiguration {
        kind: ResourceKind,
        platforms: Vec<String>,
    },
}

/// 클라우드 프로바이더 접근 에러
///
/// 개별 프로브 실패는 리졸버 내부에서 "매칭 없음"으로 처리되므로
/// 이 타입이 최상위로 전파되는 경우는 인증 등 실행 전체에 영향을 주는 상황뿐입니다.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// 인증 토큰 획득 실패
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API 호출 실패
    #[error("{service} query failed: {reason}")]
    Query { service: String, reason: String },
}

/// 벤치마크 실행 에러
#[derive(Debug, thiserror::Error)]
pub enum BenchmarkError {
    /// HTTP 요청 자체가 실패함
    #[error("request to {path} failed: {reason}")]
    Request { path: String, reason: String },

    /// 기대하지 않은 응답
    #[error("unable to get an expected result from {method} {path}")]
    UnexpectedResponse { method: String, path: String },

    /// 워커 태스크 실패
    #[error("benchmark worker failed: {0}")]
    Worker(String),
}

/// 이력 저장소 에러
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// 레코드 기록 실패
    #[error("write failed: {0}")]
    Write(String),

    /// 레코드 읽기 실패
    #[error("read failed: {0}")]
    Read(String),
}
