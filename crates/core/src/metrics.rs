//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::histogram!()`
//! 매크로를 호출합니다. 레코더가 설치되지 않으면 기록은 무시됩니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `webassess_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//! use webassess_core::metrics;
//!
//! counter!(metrics::PROBE_RESULTS_TOTAL,
//!     metrics::LABEL_PROBE => "cloud_run",
//!     metrics::LABEL_RESULT => metrics::RESULT_FOUND)
//! .increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 프로브 레이블 키 (front_door, compute_engine, cloud_sql, ...)
pub const LABEL_PROBE: &str = "probe";

/// 결과 레이블 키
pub const LABEL_RESULT: &str = "result";

// ─── 결과 레이블 값 ────────────────────────────────────────────────

/// 프로브가 리소스를 찾음
pub const RESULT_FOUND: &str = "found";
/// 프로브가 매칭을 찾지 못함
pub const RESULT_NOT_FOUND: &str = "not_found";
/// 프로브 질의 실패
pub const RESULT_FAILED: &str = "failed";
/// 프로브 타임아웃
pub const RESULT_TIMEOUT: &str = "timeout";
/// 평가 성공
pub const RESULT_SUCCESS: &str = "success";
/// 평가 실패
pub const RESULT_FAILURE: &str = "failure";

// ─── 리졸버 메트릭 ────────────────────────────────────────────────

/// 프로브 결과 수 (counter, label: probe, result)
pub const PROBE_RESULTS_TOTAL: &str = "webassess_probe_results_total";

/// 프로브 소요 시간 (histogram, 초, label: probe)
pub const PROBE_DURATION_SECONDS: &str = "webassess_probe_duration_seconds";

// ─── 평가 메트릭 ──────────────────────────────────────────────────

/// 평가 실행 수 (counter, label: result)
pub const ASSESSMENTS_TOTAL: &str = "webassess_assessments_total";

/// 벤치마크 완료 사이클 수 (counter)
pub const BENCHMARK_CYCLES_TOTAL: &str = "webassess_benchmark_cycles_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        PROBE_RESULTS_TOTAL,
        "Number of platform probe outcomes by probe and result"
    );
    describe_histogram!(
        PROBE_DURATION_SECONDS,
        "Time spent in a single platform probe in seconds"
    );
    describe_counter!(
        ASSESSMENTS_TOTAL,
        "Number of architecture assessments by result"
    );
    describe_counter!(
        BENCHMARK_CYCLES_TOTAL,
        "Number of completed benchmark purchase cycles"
    );
}
