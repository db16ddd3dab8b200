/// 基于包围盒的精度重估
///
/// 圆的交集难算，正方形的交集容易：把每个 AP 的覆盖圆近似为外接正方形，
/// 以质心为原点求所有正方形与初始方框的交集，取其最远边作为新精度。
/// 若质心落在某个 AP 的覆盖范围之外，说明覆盖数据不可信，直接返回临时精度。

use crate::algorithms::{FusedLocation, PositionEstimate};
use tracing::{debug, info, warn};

/// 以质心为原点的轴对齐方框（米）
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// 半宽为 `half_width` 的正方形
    pub fn square(half_width: f64) -> Self {
        BoundingBox {
            min_x: -half_width,
            max_x: half_width,
            min_y: -half_width,
            max_y: half_width,
        }
    }

    /// 与以 (dx, dy) 为中心、半宽为 r 的正方形求交
    pub fn shrink_to(&mut self, dx: f64, dy: f64, r: f64) {
        self.max_x = self.max_x.min(dx + r);
        self.min_x = self.min_x.max(dx - r);
        self.max_y = self.max_y.min(dy + r);
        self.min_y = self.min_y.max(dy - r);
    }

    /// 原点到四条边的最大距离
    pub fn extent(&self) -> f64 {
        self.max_x
            .abs()
            .max(self.min_x.abs())
            .max(self.max_y.abs())
            .max(self.min_y.abs())
    }
}

/// 精度重估器
pub struct AccuracyBounder;

impl AccuracyBounder {
    /// 重估质心精度（米）
    pub fn refine(centroid: &FusedLocation, estimates: &[PositionEstimate]) -> f64 {
        let provisional = centroid.accuracy;
        let mut bounds = BoundingBox::square(provisional);
        debug!(?bounds, "initial bounds");

        for estimate in estimates {
            let range = centroid.distance_to(estimate);
            // 重合点的方位角无意义
            let (dx, dy) = if range > 0.0 {
                let bearing = centroid.bearing_to(estimate).to_radians();
                (bearing.cos() * range, bearing.sin() * range)
            } else {
                (0.0, 0.0)
            };
            let r = estimate.accuracy;

            if r < range {
                warn!(
                    identifier = %estimate.identifier,
                    range,
                    coverage = r,
                    "centroid outside AP coverage, keeping provisional accuracy"
                );
                return provisional;
            }

            bounds.shrink_to(dx, dy, r);
            debug!(identifier = %estimate.identifier, dx, dy, r, ?bounds, "shrunk bounds");
        }

        let refined = bounds.extent();
        info!(from = provisional, to = refined, "revised accuracy");
        refined
    }
}
