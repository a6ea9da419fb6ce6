//! 비용 합산

use crate::resource::{CloudResource, ComputingResource, DatabaseResource};

/// 컴퓨팅 리소스 비용과 데이터베이스 비용의 합
pub fn total_cost(apps: &[ComputingResource], db: &DatabaseResource) -> f64 {
    apps.iter().map(CloudResource::cost).sum::<f64>() + db.cost()
}
