//! webassess.toml 통합 설정 테스트
//!
//! - webassess.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 파일 로딩 / 잘못된 형식 에러 테스트

use std::io::Write;

use webassess_core::config::AssessConfig;
use webassess_core::error::{AssessError, ConfigError};

// =============================================================================
// webassess.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../webassess.toml.example");
    let config = AssessConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "pretty");
    assert_eq!(config.target.project_id, "shop-prod");
    assert_eq!(config.target.endpoint, "https://shop.example.com/");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../webassess.toml.example");
    let config = AssessConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
    config
        .target
        .validate()
        .expect("example target should be complete");
}

#[test]
fn example_config_matches_default_pricing() {
    let content = include_str!("../../../webassess.toml.example");
    let config = AssessConfig::parse(content).expect("should parse");
    assert_eq!(config.pricing, AssessConfig::default().pricing);
}

// =============================================================================
// 부분 설정 테스트
// =============================================================================

#[test]
fn partial_config_benchmark_only() {
    let toml = r#"
[benchmark]
duration_secs = 5
workers = 2
"#;
    let config = AssessConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.benchmark.duration_secs, 5);
    assert_eq!(config.benchmark.workers, 2);
    // 나머지 필드는 기본값
    assert_eq!(config.benchmark.max_product_quantity, 100);
    assert!(config.history.enabled);
}

#[test]
fn partial_config_disables_benchmark_and_history() {
    let toml = r#"
[benchmark]
enabled = false

[history]
enabled = false
path = ""
"#;
    let config = AssessConfig::parse(toml).expect("should parse");
    config.validate().expect("disabled sections are not validated");
    assert!(!config.benchmark.enabled);
    assert!(!config.history.enabled);
}

#[test]
fn invalid_probe_timeout_is_rejected() {
    let toml = r#"
[gcp]
probe_timeout_secs = 301
"#;
    let config = AssessConfig::parse(toml).expect("should parse");
    let err = config.validate().expect_err("301s should be rejected");
    assert!(matches!(
        err,
        AssessError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "gcp.probe_timeout_secs"
    ));
}

#[test]
fn wrong_field_type_is_parse_error() {
    let toml = r#"
[pricing]
gce_cost_per_cpu_core = "cheap"
"#;
    let err = AssessConfig::parse(toml).expect_err("string price should fail");
    assert!(matches!(
        err,
        AssessError::Config(ConfigError::ParseFailed { .. })
    ));
}

// =============================================================================
// 파일 로딩 테스트
// =============================================================================

#[tokio::test]
#[serial_test::serial]
async fn load_reads_file_and_validates() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(
        file,
        "[target]\nproject_id = \"from-file\"\nendpoint = \"http://10.0.0.1/\""
    )
    .expect("write");

    let config = AssessConfig::load(file.path()).await.expect("should load");
    assert_eq!(config.target.project_id, "from-file");
}

#[tokio::test]
async fn load_rejects_invalid_values_in_file() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(file, "[general]\nlog_format = \"xml\"").expect("write");

    let err = AssessConfig::from_file(file.path())
        .await
        .expect_err("xml format should fail");
    assert!(err.to_string().contains("log_format"));
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[gcp]
probe_timeout_secs = 30
"#;

    let original = std::env::var("WEBASSESS_GCP_PROBE_TIMEOUT_SECS").ok();
    // SAFETY: serial 테스트로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("WEBASSESS_GCP_PROBE_TIMEOUT_SECS", "5");
    }

    let mut config = AssessConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();
    let result = config.gcp.probe_timeout_secs;

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("WEBASSESS_GCP_PROBE_TIMEOUT_SECS", val),
            None => std::env::remove_var("WEBASSESS_GCP_PROBE_TIMEOUT_SECS"),
        }
    }

    assert_eq!(result, 5);
}

#[test]
#[serial_test::serial]
fn bare_target_env_vars_fill_target() {
    let originals: Vec<_> = ["PROJECT_ID", "ENDPOINT", "USER_KEY"]
        .iter()
        .map(|key| (*key, std::env::var(key).ok()))
        .collect();
    // SAFETY: serial 테스트로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("PROJECT_ID", "env-project");
        std::env::set_var("ENDPOINT", "http://34.1.2.3/");
        std::env::set_var("USER_KEY", "env-user");
    }

    let mut config = AssessConfig::parse("").expect("should parse");
    config.apply_env_overrides();
    let target = config.target.clone();

    // SAFETY: 테스트 정리
    unsafe {
        for (key, original) in originals {
            match original {
                Some(val) => std::env::set_var(key, val),
                None => std::env::remove_var(key),
            }
        }
    }

    assert_eq!(target.project_id, "env-project");
    assert_eq!(target.endpoint, "http://34.1.2.3/");
    assert_eq!(target.user_key, "env-user");
}

#[test]
#[serial_test::serial]
fn unparsable_env_value_keeps_toml_value() {
    let toml = r#"
[benchmark]
workers = 8
"#;
    // SAFETY: serial 테스트로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("WEBASSESS_BENCHMARK_WORKERS", "many");
    }

    let mut config = AssessConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();

    // SAFETY: 테스트 정리
    unsafe {
        std::env::remove_var("WEBASSESS_BENCHMARK_WORKERS");
    }

    assert_eq!(config.benchmark.workers, 8);
}

// =============================================================================
// 직렬화 라운드트립 테스트
// =============================================================================

#[test]
fn serialize_and_reparse_roundtrip() {
    let original = AssessConfig::default();
    let toml_str = toml::to_string_pretty(&original).expect("should serialize");
    let parsed = AssessConfig::parse(&toml_str).expect("should reparse");
    parsed.validate().expect("reparsed should validate");

    assert_eq!(original.general.log_level, parsed.general.log_level);
    assert_eq!(original.pricing, parsed.pricing);
    assert_eq!(original.history.path, parsed.history.path);
}
