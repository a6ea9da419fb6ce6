//! 벤치마크 러너 — 설정된 시간 동안 워커들이 시나리오 사이클을 반복합니다.
//!
//! 워커는 서로 독립적으로 사이클을 실행하고, 제한 시간에 도달하면 완료한 사이클의
//! 점수를 반환합니다. 어느 단계든 실패하면 벤치마크 전체가 실패합니다.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use url::Url;
use webassess_core::config::BenchmarkConfig;
use webassess_core::error::BenchmarkError;
use webassess_core::metrics as m;

use crate::scenario::{Order, Step};

/// 요청 하나의 제한 시간
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// 벤치마크 실행 trait
///
/// 엔드포인트에 부하를 주고 성능 점수(0 이상)를 반환합니다.
pub trait BenchmarkRunner: Send + Sync {
    fn run(&self, endpoint: &str) -> impl Future<Output = Result<u64, BenchmarkError>> + Send;
}

/// `reqwest` 기반 벤치마크 러너
pub struct HttpBenchmarkRunner {
    http: reqwest::Client,
    config: BenchmarkConfig,
}

impl HttpBenchmarkRunner {
    /// 설정으로 러너를 생성합니다.
    ///
    /// 커넥션 풀에 남겨 두는 호스트당 유휴 연결 수는 `max_idle_conns_per_host`를 따릅니다.
    pub fn new(config: BenchmarkConfig) -> Result<Self, BenchmarkError> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(config.max_idle_conns_per_host)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BenchmarkError::Request {
                path: "-".to_owned(),
                reason: format!("failed to build http client: {e}"),
            })?;
        Ok(Self { http, config })
    }
}

impl BenchmarkRunner for HttpBenchmarkRunner {
    async fn run(&self, endpoint: &str) -> Result<u64, BenchmarkError> {
        let base = Url::parse(endpoint).map_err(|e| BenchmarkError::Request {
            path: endpoint.to_owned(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(BenchmarkError::Request {
                path: endpoint.to_owned(),
                reason: "endpoint cannot be used as a base url".to_owned(),
            });
        }

        let deadline = Instant::now() + Duration::from_secs(self.config.duration_secs);
        info!(
            endpoint,
            workers = self.config.workers,
            duration_secs = self.config.duration_secs,
            "benchmark started"
        );

        let mut workers = JoinSet::new();
        for id in 0..self.config.workers {
            let worker = Worker {
                id,
                http: self.http.clone(),
                base: base.clone(),
                product_count: self.config.product_count,
                max_quantity: self.config.max_product_quantity,
            };
            workers.spawn(worker.run(deadline));
        }

        let mut total = 0u64;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Ok(score)) => total = total.saturating_add(score),
                Ok(Err(e)) => {
                    workers.abort_all();
                    return Err(e);
                }
                Err(e) => {
                    workers.abort_all();
                    return Err(BenchmarkError::Worker(e.to_string()));
                }
            }
        }

        info!(endpoint, score = total, "benchmark finished");
        Ok(total)
    }
}

/// 사이클을 반복하는 워커 하나
struct Worker {
    id: usize,
    http: reqwest::Client,
    base: Url,
    product_count: u32,
    max_quantity: u32,
}

impl Worker {
    async fn run(self, deadline: Instant) -> Result<u64, BenchmarkError> {
        let mut rng = fastrand::Rng::new();
        let mut total = 0u64;
        let mut cycles = 0u64;

        loop {
            let order = Order::random(&mut rng, self.product_count, self.max_quantity);
            match tokio::time::timeout_at(deadline, self.cycle(&order)).await {
                Ok(Ok(score)) => {
                    total = total.saturating_add(score);
                    cycles += 1;
                    metrics::counter!(
                        m::BENCHMARK_CYCLES_TOTAL,
                        m::LABEL_RESULT => m::RESULT_SUCCESS
                    )
                    .increment(1);
                }
                Ok(Err(e)) => {
                    metrics::counter!(
                        m::BENCHMARK_CYCLES_TOTAL,
                        m::LABEL_RESULT => m::RESULT_FAILURE
                    )
                    .increment(1);
                    warn!(worker = self.id, error = %e, "benchmark cycle failed");
                    return Err(e);
                }
                Err(_elapsed) => break,
            }
        }

        debug!(worker = self.id, cycles, score = total, "worker finished");
        Ok(total)
    }

    async fn cycle(&self, order: &Order) -> Result<u64, BenchmarkError> {
        let mut score = 0;
        for step in Step::CYCLE {
            self.execute(step, order).await?;
            score += step.score();
        }
        Ok(score)
    }

    async fn execute(&self, step: Step, order: &Order) -> Result<(), BenchmarkError> {
        let url = step_url(&self.base, step, order)?;
        let request = match step {
            Step::PostCheckout => {
                let body = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(order.form())
                    .finish();
                self.http
                    .post(url)
                    .header(
                        reqwest::header::CONTENT_TYPE,
                        "application/x-www-form-urlencoded",
                    )
                    .body(body)
            }
            _ => self.http.get(url),
        };

        let request_failed = |e: reqwest::Error| BenchmarkError::Request {
            path: step.path().to_owned(),
            reason: e.to_string(),
        };
        let response = request.send().await.map_err(request_failed)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(request_failed)?;

        if step.accepts(status, &body, order) {
            Ok(())
        } else {
            debug!(worker = self.id, step = %step, status, "unexpected response");
            Err(BenchmarkError::UnexpectedResponse {
                method: step.method().to_owned(),
                path: step.path().to_owned(),
            })
        }
    }
}

/// 기준 URL 경로 뒤에 단계 경로를 붙입니다.
pub fn step_url(base: &Url, step: Step, order: &Order) -> Result<Url, BenchmarkError> {
    let mut url = base.clone();
    let product_id = order.product_id.to_string();
    {
        let mut segments = url.path_segments_mut().map_err(|()| BenchmarkError::Request {
            path: step.path().to_owned(),
            reason: "endpoint cannot be used as a base url".to_owned(),
        })?;
        segments.pop_if_empty();
        match step {
            Step::GetProducts => segments.push("products"),
            Step::PostCheckout => segments.push("checkout"),
            Step::GetProduct => segments.extend(["product", product_id.as_str()]),
            Step::GetCheckouts => segments.push("checkouts"),
        };
    }
    Ok(url)
}
