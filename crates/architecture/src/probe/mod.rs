//! 리소스 프로브 — 플랫폼별로 엔드포인트와 일치하는 리소스를 찾습니다.
//!
//! 각 프로브 모듈은 `probe()` 함수 하나를 공개하며, 내부적으로는
//! `Result<Option<T>, ProbeError>`로 작성한 뒤 [`ProbeOutcome`]으로 변환합니다.
//! 프로브는 서로 상태를 공유하지 않고 [`CloudApi`](crate::cloud::CloudApi) 핸들만 읽습니다.

pub mod alloydb;
pub mod app_engine;
pub mod cloud_functions;
pub mod cloud_run;
pub mod cloud_sql;
pub mod compute_engine;
pub mod front_door;
pub mod spanner;

use std::fmt;

use webassess_core::metrics as m;

use crate::error::ProbeError;

/// 프로브 한 번의 결과
#[derive(Debug)]
pub enum ProbeOutcome<T> {
    /// 일치하는 리소스를 찾음
    Found(T),
    /// 일치하는 리소스 없음
    NotFound,
    /// 질의 실패 (리졸버는 매칭 없음으로 처리)
    QueryFailed(ProbeError),
}

impl<T> ProbeOutcome<T> {
    /// 찾은 리소스를 반환합니다. 실패는 매칭 없음과 같게 취급합니다.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound | Self::QueryFailed(_) => None,
        }
    }

    /// 메트릭 `result` 레이블 값
    pub fn result_label(&self) -> &'static str {
        match self {
            Self::Found(_) => m::RESULT_FOUND,
            Self::NotFound => m::RESULT_NOT_FOUND,
            Self::QueryFailed(ProbeError::Timeout(_)) => m::RESULT_TIMEOUT,
            Self::QueryFailed(_) => m::RESULT_FAILED,
        }
    }
}

impl<T> From<Result<Option<T>, ProbeError>> for ProbeOutcome<T> {
    fn from(result: Result<Option<T>, ProbeError>) -> Self {
        match result {
            Ok(Some(value)) => Self::Found(value),
            Ok(None) => Self::NotFound,
            Err(err) => Self::QueryFailed(err),
        }
    }
}

/// 컴퓨팅 프로브 (캐스케이드 순서대로 정의)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComputingProbe {
    FrontDoor,
    ComputeEngine,
    AppEngine,
    CloudRun,
    CloudFunctions,
}

impl ComputingProbe {
    /// 캐스케이드 실행 순서
    pub const ORDER: [Self; 5] = [
        Self::FrontDoor,
        Self::ComputeEngine,
        Self::AppEngine,
        Self::CloudRun,
        Self::CloudFunctions,
    ];

    /// 메트릭/로그 레이블
    pub fn label(self) -> &'static str {
        match self {
            Self::FrontDoor => "front_door",
            Self::ComputeEngine => "compute_engine",
            Self::AppEngine => "app_engine",
            Self::CloudRun => "cloud_run",
            Self::CloudFunctions => "cloud_functions",
        }
    }
}

impl fmt::Display for ComputingProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 데이터베이스 프로브
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseProbe {
    CloudSql,
    AlloyDb,
    Spanner,
}

impl DatabaseProbe {
    /// 메트릭/로그 레이블
    pub fn label(self) -> &'static str {
        match self {
            Self::CloudSql => "cloud_sql",
            Self::AlloyDb => "alloydb",
            Self::Spanner => "spanner",
        }
    }
}

impl fmt::Display for DatabaseProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 평균 인스턴스 수 `(min + max) / 2` (정수 나눗셈)
pub(crate) fn average_instances(min: u32, max: u32) -> u32 {
    (min.saturating_add(max)) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_from_result() {
        let found: ProbeOutcome<u8> = Ok(Some(1)).into();
        assert!(matches!(found, ProbeOutcome::Found(1)));
        let none: ProbeOutcome<u8> = Ok(None).into();
        assert!(matches!(none, ProbeOutcome::NotFound));
        let failed: ProbeOutcome<u8> = Err(ProbeError::shape("bad")).into();
        assert_eq!(failed.result_label(), m::RESULT_FAILED);
        assert!(failed.found().is_none());
    }

    #[test]
    fn timeout_has_its_own_label() {
        let outcome: ProbeOutcome<()> =
            ProbeOutcome::QueryFailed(ProbeError::Timeout(std::time::Duration::from_secs(1)));
        assert_eq!(outcome.result_label(), m::RESULT_TIMEOUT);
    }

    #[test]
    fn computing_order_is_fixed() {
        assert_eq!(
            ComputingProbe::ORDER,
            [
                ComputingProbe::FrontDoor,
                ComputingProbe::ComputeEngine,
                ComputingProbe::AppEngine,
                ComputingProbe::CloudRun,
                ComputingProbe::CloudFunctions,
            ]
        );
    }

    #[test]
    fn average_instances_uses_integer_division() {
        assert_eq!(average_instances(0, 3), 1);
        assert_eq!(average_instances(2, 4), 3);
        assert_eq!(average_instances(u32::MAX, u32::MAX), u32::MAX / 2);
    }
}
