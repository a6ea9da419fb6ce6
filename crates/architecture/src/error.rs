//! 프로브 에러 타입
//!
//! [`ProbeError`]는 클라우드 API 질의 중 발생하는 에러를 표현합니다.
//! 리졸버는 이 에러를 "매칭 없음"으로 처리하지만, 인증 실패처럼
//! 실행 전체를 막는 경우에는 `From<ProbeError> for AssessError`로 전파합니다.

use std::time::Duration;

use webassess_core::error::{AssessError, ProviderError};

/// 클라우드 API 질의 에러
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// HTTP 요청 자체가 실패함 (연결, TLS, 요청 타임아웃)
    #[error("{service} request failed: {reason}")]
    Transport {
        /// API 서비스 이름
        service: String,
        /// 실패 사유
        reason: String,
    },

    /// 성공이 아닌 HTTP 상태 코드
    #[error("{service} returned HTTP {status}")]
    Status {
        /// API 서비스 이름
        service: String,
        /// HTTP 상태 코드
        status: u16,
    },

    /// 응답 본문 디코딩 실패
    #[error("failed to decode {service} response: {reason}")]
    Decode {
        /// API 서비스 이름
        service: String,
        /// 실패 사유
        reason: String,
    },

    /// 응답은 정상이지만 리소스 형상을 해석할 수 없음
    #[error("unexpected resource shape: {0}")]
    UnexpectedShape(String),

    /// 프로브 시간 초과
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),

    /// 액세스 토큰 획득 실패
    #[error("authentication failed: {0}")]
    Auth(String),
}

impl ProbeError {
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        Self::UnexpectedShape(msg.into())
    }
}

impl From<ProbeError> for AssessError {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::Auth(msg) => AssessError::Provider(ProviderError::Auth(msg)),
            ProbeError::Transport { ref service, .. }
            | ProbeError::Status { ref service, .. }
            | ProbeError::Decode { ref service, .. } => {
                AssessError::Provider(ProviderError::Query {
                    service: service.clone(),
                    reason: err.to_string(),
                })
            }
            ProbeError::UnexpectedShape(_) | ProbeError::Timeout(_) => {
                AssessError::Provider(ProviderError::Query {
                    service: "probe".to_owned(),
                    reason: err.to_string(),
                })
            }
        }
    }
}
