//! 리졸버 — 프로브 결과를 모아 컴퓨팅/데이터베이스 계층을 확정합니다.
//!
//! - [`ComputingResolver`]: 고정 순서 캐스케이드, 첫 매칭에서 중단
//! - [`DatabaseResolver`]: 모든 프로브를 동시에 실행한 뒤 하나로 축약
//!
//! 모든 프로브 호출은 [`bounded`]를 거쳐 시간 제한과 메트릭 기록을 공유합니다.

mod computing;
mod database;

pub use computing::{ComputingResolution, ComputingResolver};
pub use database::{DatabaseResolver, reduce};

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use webassess_core::metrics as m;

use crate::error::ProbeError;
use crate::probe::ProbeOutcome;

/// 프로브 하나를 시간 제한 안에서 실행하고 결과를 기록합니다.
///
/// 시간 초과는 [`ProbeError::Timeout`]으로 바뀌며, 실패는 `warn`으로 남깁니다.
pub(crate) async fn bounded<T, F>(label: &'static str, limit: Duration, probe: F) -> ProbeOutcome<T>
where
    F: Future<Output = ProbeOutcome<T>>,
{
    let started = Instant::now();
    let outcome = match tokio::time::timeout(limit, probe).await {
        Ok(outcome) => outcome,
        Err(_elapsed) => ProbeOutcome::QueryFailed(ProbeError::Timeout(limit)),
    };

    metrics::histogram!(m::PROBE_DURATION_SECONDS, m::LABEL_PROBE => label)
        .record(started.elapsed().as_secs_f64());
    metrics::counter!(
        m::PROBE_RESULTS_TOTAL,
        m::LABEL_PROBE => label,
        m::LABEL_RESULT => outcome.result_label()
    )
    .increment(1);

    match &outcome {
        ProbeOutcome::Found(_) => info!(probe = label, "probe matched"),
        ProbeOutcome::NotFound => debug!(probe = label, "probe found no match"),
        ProbeOutcome::QueryFailed(e) => {
            warn!(probe = label, error = %e, "probe failed, treated as no match");
        }
    }

    outcome
}
