/// 位置解算器
///
/// 依次执行聚类、加权平均、精度重估，产出一个融合位置

use crate::algorithms::{
    AccuracyBounder, Clusterer, FusedLocation, PositionEstimate, WeightedAverager, MIN_CLUSTER_SIZE,
};
use crate::config::FusionConfig;
use crate::error::FusionError;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

#[derive(Clone, Debug, Default)]
pub struct Resolver {
    config: FusionConfig,
}

impl Resolver {
    /// 创建解算器，配置不合法时返回错误
    pub fn new(config: FusionConfig) -> Result<Self, FusionError> {
        config.validate()?;
        Ok(Resolver { config })
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// 融合一批位置估计，时间戳取当前时间
    pub fn resolve(&self, estimates: &[PositionEstimate]) -> Result<Option<FusedLocation>, FusionError> {
        self.resolve_at(estimates, Utc::now())
    }

    /// 融合一批位置估计
    ///
    /// # 返回
    /// - `Ok(Some(_))`：融合成功
    /// - `Ok(None)`：输入为空、兼容 AP 不足 2 个或没有可用覆盖，调用方应跳过上报
    /// - `Err(_)`：输入数据不合法
    pub fn resolve_at(
        &self,
        estimates: &[PositionEstimate],
        timestamp: DateTime<Utc>,
    ) -> Result<Option<FusedLocation>, FusionError> {
        if estimates.is_empty() {
            debug!("no APs with known locations");
            return Ok(None);
        }

        for estimate in estimates {
            estimate.validate(self.config.min_signal_dbm)?;
        }

        let Some(survivors) = Clusterer::cull(estimates, &self.config) else {
            debug!(count = estimates.len(), "insufficient number of WiFi APs to resolve location");
            return Ok(None);
        };

        let mut fix = match WeightedAverager::average(&survivors, &self.config) {
            Ok(centroid) => centroid,
            Err(FusionError::NoUsableEstimates) => return Ok(None),
            Err(e) => return Err(e),
        };

        // 零覆盖的估计被跳过后，剩余 AP 可能不足以定位
        if fix.sample_count < MIN_CLUSTER_SIZE {
            debug!(used = fix.sample_count, "too few APs with usable coverage");
            return Ok(None);
        }

        fix.accuracy = AccuracyBounder::refine(&fix, &survivors);
        fix.timestamp = timestamp;
        info!(fix = %fix.detailed_description(), "resolved location");
        Ok(Some(fix))
    }
}
