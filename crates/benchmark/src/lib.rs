//! webassess 벤치마크
//!
//! 평가 대상 웹 애플리케이션에 주문 시나리오 부하를 주고 성능 점수를 계산합니다.
//!
//! # 모듈 구조
//!
//! - [`scenario`]: 사이클 단계와 응답 검증 (`Step`, `Order`)
//! - [`runner`]: 러너 trait과 HTTP 구현 (`BenchmarkRunner`, `HttpBenchmarkRunner`)

pub mod runner;
pub mod scenario;

pub use runner::{BenchmarkRunner, HttpBenchmarkRunner};
pub use scenario::{Order, Step, cycle_score};
