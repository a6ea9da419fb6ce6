//! 엔드포인트 해석 — URL에서 프로브가 비교할 호스트를 추출

use url::{Host, Url};
use webassess_core::error::ResolutionError;

/// 엔드포인트 URL에서 호스트만 추출합니다.
///
/// 포트는 제거되고 IPv6 주소는 대괄호 없이 반환됩니다.
/// 절대 URL이 아니거나 호스트가 없으면 `InvalidEndpoint`를 반환합니다.
///
/// ```
/// use webassess_architecture::endpoint::resolve_host;
///
/// assert_eq!(resolve_host("http://34.120.1.10:8080/shop").unwrap(), "34.120.1.10");
/// assert_eq!(resolve_host("https://shop-abc.a.run.app/").unwrap(), "shop-abc.a.run.app");
/// ```
pub fn resolve_host(endpoint: &str) -> Result<String, ResolutionError> {
    let invalid = |reason: String| ResolutionError::InvalidEndpoint {
        endpoint: endpoint.to_owned(),
        reason,
    };

    let url = Url::parse(endpoint.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.host() {
        Some(Host::Domain(domain)) if !domain.is_empty() => Ok(domain.to_owned()),
        Some(Host::Ipv4(addr)) => Ok(addr.to_string()),
        Some(Host::Ipv6(addr)) => Ok(addr.to_string()),
        _ => Err(invalid("endpoint has no host".to_owned())),
    }
}
