//! 설정 관리 — webassess.toml 파싱 및 런타임 설정
//!
//! [`AssessConfig`]는 모든 크레이트의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`WEBASSESS_TARGET_PROJECT_ID=my-project` 형식)
//! 3. 설정 파일 (`webassess.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! 호환성을 위해 `PROJECT_ID`, `ENDPOINT`, `USER_KEY` 환경변수도 읽습니다.
//! 접두어가 붙은 변수가 함께 설정되어 있으면 접두어 쪽이 우선합니다.
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), webassess_core::error::AssessError> {
//! use webassess_core::config::AssessConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = AssessConfig::load("webassess.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = AssessConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AssessError, ConfigError};

/// 프로브 타임아웃 상한 (초)
const MAX_PROBE_TIMEOUT_SECS: u64 = 300;
/// 벤치마크 실행 시간 상한 (초)
const MAX_BENCHMARK_DURATION_SECS: u64 = 3600;
/// 벤치마크 워커 수 상한
const MAX_BENCHMARK_WORKERS: usize = 64;

/// webassess 통합 설정
///
/// `webassess.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 크레이트는 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssessConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 평가 대상
    #[serde(default)]
    pub target: TargetConfig,
    /// GCP 접근 설정
    #[serde(default)]
    pub gcp: GcpConfig,
    /// 단가 테이블
    #[serde(default)]
    pub pricing: PricingConfig,
    /// 벤치마크 설정
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
    /// 실행 이력 설정
    #[serde(default)]
    pub history: HistoryConfig,
}

impl AssessConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, AssessError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값에서 시작해 환경변수만 적용합니다.
    ///
    /// CLI처럼 설정 파일 없이도 환경변수만으로 실행할 수 있어야 하는 경우에 사용합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, AssessError> {
        let mut config = match Self::from_file(path).await {
            Ok(config) => config,
            Err(AssessError::Config(ConfigError::FileNotFound { path })) => {
                tracing::debug!(path = %path, "config file not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, AssessError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AssessError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                AssessError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, AssessError> {
        toml::from_str(toml_str).map_err(|e| {
            AssessError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `WEBASSESS_{SECTION}_{FIELD}`
    /// 예: `WEBASSESS_GCP_PROBE_TIMEOUT_SECS=10`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "WEBASSESS_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "WEBASSESS_GENERAL_LOG_FORMAT");

        // Target (접두어 없는 변수를 먼저 적용해 접두어 변수가 우선하도록 함)
        override_string(&mut self.target.project_id, "PROJECT_ID");
        override_string(&mut self.target.endpoint, "ENDPOINT");
        override_string(&mut self.target.user_key, "USER_KEY");
        override_string(&mut self.target.project_id, "WEBASSESS_TARGET_PROJECT_ID");
        override_string(&mut self.target.endpoint, "WEBASSESS_TARGET_ENDPOINT");
        override_string(&mut self.target.user_key, "WEBASSESS_TARGET_USER_KEY");

        // GCP
        override_string(&mut self.gcp.access_token, "WEBASSESS_GCP_ACCESS_TOKEN");
        override_string(&mut self.gcp.gcloud_path, "WEBASSESS_GCP_GCLOUD_PATH");
        override_u64(
            &mut self.gcp.probe_timeout_secs,
            "WEBASSESS_GCP_PROBE_TIMEOUT_SECS",
        );
        override_u64(
            &mut self.gcp.request_timeout_secs,
            "WEBASSESS_GCP_REQUEST_TIMEOUT_SECS",
        );

        // Benchmark
        override_bool(&mut self.benchmark.enabled, "WEBASSESS_BENCHMARK_ENABLED");
        override_u64(
            &mut self.benchmark.duration_secs,
            "WEBASSESS_BENCHMARK_DURATION_SECS",
        );
        override_usize(&mut self.benchmark.workers, "WEBASSESS_BENCHMARK_WORKERS");

        // History
        override_bool(&mut self.history.enabled, "WEBASSESS_HISTORY_ENABLED");
        override_string(&mut self.history.path, "WEBASSESS_HISTORY_PATH");
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// 대상(`target`) 필드는 CLI 인자로 나중에 채워질 수 있으므로 여기서 검증하지 않습니다.
    /// 실행 직전에 [`TargetConfig::validate`]를 별도로 호출하세요.
    pub fn validate(&self) -> Result<(), AssessError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.gcp.probe_timeout_secs == 0 || self.gcp.probe_timeout_secs > MAX_PROBE_TIMEOUT_SECS
        {
            return Err(ConfigError::InvalidValue {
                field: "gcp.probe_timeout_secs".to_owned(),
                reason: format!("must be 1-{MAX_PROBE_TIMEOUT_SECS}"),
            }
            .into());
        }

        if self.gcp.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gcp.request_timeout_secs".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        self.pricing.validate()?;

        if self.benchmark.enabled {
            if self.benchmark.duration_secs == 0
                || self.benchmark.duration_secs > MAX_BENCHMARK_DURATION_SECS
            {
                return Err(ConfigError::InvalidValue {
                    field: "benchmark.duration_secs".to_owned(),
                    reason: format!("must be 1-{MAX_BENCHMARK_DURATION_SECS}"),
                }
                .into());
            }

            if self.benchmark.workers == 0 || self.benchmark.workers > MAX_BENCHMARK_WORKERS {
                return Err(ConfigError::InvalidValue {
                    field: "benchmark.workers".to_owned(),
                    reason: format!("must be 1-{MAX_BENCHMARK_WORKERS}"),
                }
                .into());
            }

            // 상품 ID와 수량은 1 이상에서 뽑으므로 상한은 2 이상이어야 함
            if self.benchmark.product_count < 2 {
                return Err(ConfigError::InvalidValue {
                    field: "benchmark.product_count".to_owned(),
                    reason: "must be at least 2".to_owned(),
                }
                .into());
            }

            if self.benchmark.max_product_quantity < 2 {
                return Err(ConfigError::InvalidValue {
                    field: "benchmark.max_product_quantity".to_owned(),
                    reason: "must be at least 2".to_owned(),
                }
                .into());
            }
        }

        if self.history.enabled && self.history.path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "history.path".to_owned(),
                reason: "path must not be empty when history is enabled".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 평가 대상 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// GCP 프로젝트 ID
    pub project_id: String,
    /// 공개 엔드포인트 URL
    pub endpoint: String,
    /// 실행 이력에 기록할 사용자 키
    pub user_key: String,
}

impl TargetConfig {
    /// 평가 실행에 필요한 필드가 채워져 있는지 검증합니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_id.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "target.project_id".to_owned(),
                reason: "project id must not be empty".to_owned(),
            });
        }
        if self.endpoint.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "target.endpoint".to_owned(),
                reason: "endpoint must not be empty".to_owned(),
            });
        }
        Ok(())
    }
}

/// GCP 접근 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GcpConfig {
    /// OAuth2 액세스 토큰. 비어 있으면 `gcloud auth print-access-token`으로 획득
    pub access_token: String,
    /// gcloud 실행 파일 경로
    pub gcloud_path: String,
    /// 프로브 하나에 허용되는 최대 시간 (초)
    pub probe_timeout_secs: u64,
    /// 개별 HTTP 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for GcpConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            gcloud_path: "gcloud".to_owned(),
            probe_timeout_secs: 30,
            request_timeout_secs: 10,
        }
    }
}

/// 평가 기간당 단가 테이블
///
/// 프로브는 리소스 형상(CPU, 메모리, 처리 단위)에 이 단가를 곱해 비용을 계산합니다.
/// 비용 합산기는 이 테이블을 알지 못합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Compute Engine vCPU 단가
    pub gce_cost_per_cpu_core: f64,
    /// Compute Engine 메모리 MiB 단가
    pub gce_cost_per_mem_mib: f64,
    /// 서버리스 vCPU 단가
    pub serverless_cost_per_cpu_core: f64,
    /// 서버리스 메모리 MiB 단가
    pub serverless_cost_per_mem_mib: f64,
    /// Cloud SQL vCPU 단가
    pub cloudsql_cost_per_cpu_core: f64,
    /// Cloud SQL 메모리 MiB 단가
    pub cloudsql_cost_per_mem_mib: f64,
    /// AlloyDB vCPU 단가
    pub alloydb_cost_per_cpu_core: f64,
    /// AlloyDB 메모리 MiB 단가
    pub alloydb_cost_per_mem_mib: f64,
    /// Spanner 처리 단위(PU) 단가
    pub spanner_cost_per_processing_unit: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        // 월 단위(730시간) USD 기준 근사치
        Self {
            gce_cost_per_cpu_core: 24.22,
            gce_cost_per_mem_mib: 0.003_16,
            serverless_cost_per_cpu_core: 50.37,
            serverless_cost_per_mem_mib: 0.005_12,
            cloudsql_cost_per_cpu_core: 30.15,
            cloudsql_cost_per_mem_mib: 0.005_00,
            alloydb_cost_per_cpu_core: 48.55,
            alloydb_cost_per_mem_mib: 0.008_05,
            spanner_cost_per_processing_unit: 0.657,
        }
    }
}

impl PricingConfig {
    /// 모든 단가가 유한한 0 이상의 값인지 검증합니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prices = [
            ("pricing.gce_cost_per_cpu_core", self.gce_cost_per_cpu_core),
            ("pricing.gce_cost_per_mem_mib", self.gce_cost_per_mem_mib),
            (
                "pricing.serverless_cost_per_cpu_core",
                self.serverless_cost_per_cpu_core,
            ),
            (
                "pricing.serverless_cost_per_mem_mib",
                self.serverless_cost_per_mem_mib,
            ),
            (
                "pricing.cloudsql_cost_per_cpu_core",
                self.cloudsql_cost_per_cpu_core,
            ),
            (
                "pricing.cloudsql_cost_per_mem_mib",
                self.cloudsql_cost_per_mem_mib,
            ),
            (
                "pricing.alloydb_cost_per_cpu_core",
                self.alloydb_cost_per_cpu_core,
            ),
            (
                "pricing.alloydb_cost_per_mem_mib",
                self.alloydb_cost_per_mem_mib,
            ),
            (
                "pricing.spanner_cost_per_processing_unit",
                self.spanner_cost_per_processing_unit,
            ),
        ];

        for (field, value) in prices {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_owned(),
                    reason: format!("must be a finite non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// 벤치마크 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 실행 시간 (초)
    pub duration_secs: u64,
    /// 동시 워커 수
    pub workers: usize,
    /// 카탈로그 상품 수 (상품 ID는 1..product_count 범위에서 선택)
    pub product_count: u32,
    /// 주문 1건당 최대 수량 (수량은 1..max_product_quantity 범위에서 선택)
    pub max_product_quantity: u32,
    /// 호스트당 유지하는 유휴(keep-alive) 커넥션 수. 동시 연결 수는 `workers`가 결정합니다.
    pub max_idle_conns_per_host: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_secs: 60,
            workers: 4,
            product_count: 10,
            max_product_quantity: 100,
            max_idle_conns_per_host: 20,
        }
    }
}

/// 실행 이력 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// JSON Lines 이력 파일 경로
    pub path: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "webassess-history.jsonl".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
