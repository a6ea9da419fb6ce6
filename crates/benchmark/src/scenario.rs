//! 벤치마크 시나리오 — 한 사이클을 구성하는 요청 단계와 응답 검증
//!
//! 한 사이클은 상품 목록 조회 → 주문 → 상품 상세 조회 → 주문 목록 조회 순서이며,
//! 단계마다 점수가 다릅니다. 검증은 상태 코드와 본문 내용만 확인합니다.

use std::fmt;

/// 사이클 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `GET /products`
    GetProducts,
    /// `POST /checkout`
    PostCheckout,
    /// `GET /product/{id}`
    GetProduct,
    /// `GET /checkouts`
    GetCheckouts,
}

impl Step {
    /// 실행 순서
    pub const CYCLE: [Self; 4] = [
        Self::GetProducts,
        Self::PostCheckout,
        Self::GetProduct,
        Self::GetCheckouts,
    ];

    /// 성공 시 얻는 점수
    pub fn score(self) -> u64 {
        match self {
            Self::GetProducts => 5,
            Self::PostCheckout => 2,
            Self::GetProduct => 1,
            Self::GetCheckouts => 4,
        }
    }

    pub fn method(self) -> &'static str {
        match self {
            Self::PostCheckout => "POST",
            _ => "GET",
        }
    }

    /// 에러 메시지에 쓰는 경로 (상품 ID 제외)
    pub fn path(self) -> &'static str {
        match self {
            Self::GetProducts => "/products",
            Self::PostCheckout => "/checkout",
            Self::GetProduct => "/product",
            Self::GetCheckouts => "/checkouts",
        }
    }

    /// 기대하는 HTTP 상태 코드
    pub fn expected_status(self) -> u16 {
        match self {
            Self::PostCheckout => 202,
            _ => 200,
        }
    }

    /// 응답이 이 단계의 성공 조건을 만족하는지 확인합니다.
    pub fn accepts(self, status: u16, body: &str, order: &Order) -> bool {
        if status != self.expected_status() {
            return false;
        }
        match self {
            Self::GetProducts | Self::GetProduct => true,
            Self::PostCheckout => body.contains(&format!("{} x", order.quantity)),
            Self::GetCheckouts => body.contains(&format!(">{}<", order.product_id)),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

/// 한 사이클에서 사용하는 주문
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub product_id: u32,
    pub quantity: u32,
}

impl Order {
    /// 상품 ID는 `1..product_count`, 수량은 `1..max_quantity`에서 뽑습니다.
    ///
    /// 두 상한은 2 이상이어야 하며 설정 검증에서 보장됩니다.
    pub fn random(rng: &mut fastrand::Rng, product_count: u32, max_quantity: u32) -> Self {
        Self {
            product_id: rng.u32(1..product_count.max(2)),
            quantity: rng.u32(1..max_quantity.max(2)),
        }
    }

    /// `POST /checkout` 폼 필드
    pub fn form(&self) -> [(&'static str, String); 2] {
        [
            ("product_id", self.product_id.to_string()),
            ("product_quantity", self.quantity.to_string()),
        ]
    }
}

/// 한 사이클을 모두 성공했을 때의 점수
pub fn cycle_score() -> u64 {
    Step::CYCLE.iter().map(|s| s.score()).sum()
}
