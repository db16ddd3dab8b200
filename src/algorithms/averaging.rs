/// 信号加权平均
///
/// 每个 AP 的权重为推算距离的倒数：信号越强、覆盖越小的 AP 权重越大

use crate::algorithms::{FusedLocation, PositionEstimate};
use crate::config::FusionConfig;
use crate::error::FusionError;
use tracing::{debug, warn};

/// 加权平均器
pub struct WeightedAverager;

impl WeightedAverager {
    /// 推算设备到 AP 的距离（米）
    ///
    /// `距离比例 × min(accuracy, 覆盖上限)`；覆盖为 0 时返回 None
    pub fn assumed_range(estimate: &PositionEstimate, config: &FusionConfig) -> Option<f64> {
        let coverage = estimate.accuracy.min(config.max_assumed_coverage_m);
        if coverage <= 0.0 {
            return None;
        }
        Some(config.signal.range_fraction(estimate.signal_dbm) * coverage)
    }

    /// 权重，推算距离的倒数
    pub fn weight(estimate: &PositionEstimate, config: &FusionConfig) -> Option<f64> {
        Self::assumed_range(estimate, config).map(|range| 1.0 / range)
    }

    /// 计算加权质心和临时精度
    ///
    /// 覆盖半径为 0 的估计被跳过。海拔只在带海拔的估计上单独加权。
    ///
    /// # 返回
    /// - 质心；没有可用估计时返回 `FusionError::NoUsableEstimates`
    pub fn average(estimates: &[PositionEstimate], config: &FusionConfig) -> Result<FusedLocation, FusionError> {
        let mut total_weight = 0.0;
        let mut latitude = 0.0;
        let mut longitude = 0.0;
        let mut accuracy = 0.0;
        let mut altitude = 0.0;
        let mut altitude_weight = 0.0;
        let mut count = 0;

        for estimate in estimates {
            let Some(range) = Self::assumed_range(estimate, config) else {
                warn!(
                    identifier = %estimate.identifier,
                    accuracy = estimate.accuracy,
                    "skipping estimate with zero coverage"
                );
                continue;
            };
            let weight = 1.0 / range;
            debug!(
                identifier = %estimate.identifier,
                weight,
                signal_dbm = estimate.signal_dbm,
                accuracy = estimate.accuracy,
                range,
                latitude = estimate.latitude,
                longitude = estimate.longitude,
                "weighting estimate"
            );

            latitude += estimate.latitude * weight;
            longitude += estimate.longitude * weight;
            accuracy += estimate.accuracy * weight;
            if let Some(alt) = estimate.altitude {
                altitude += alt * weight;
                altitude_weight += weight;
            }
            total_weight += weight;
            count += 1;
        }

        if count == 0 {
            return Err(FusionError::NoUsableEstimates);
        }

        let altitude = (altitude_weight > 0.0).then(|| altitude / altitude_weight);
        let centroid = FusedLocation::new(
            latitude / total_weight,
            longitude / total_weight,
            altitude,
            accuracy / total_weight,
            count,
        );
        debug!(%centroid, "weighted centroid");
        Ok(centroid)
    }
}
