/// 单个接入点的位置估计及大地测量辅助函数

use crate::error::FusionError;
use geo::{GeodesicBearing, GeodesicDistance, Point};

/// WGS-84 椭球上两点间的大地线距离（米）
pub fn geodesic_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    Point::new(lon1, lat1).geodesic_distance(&Point::new(lon2, lat2))
}

/// 从第一点指向第二点的初始方位角（度，自正北顺时针）
pub fn initial_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    Point::new(lon1, lat1).geodesic_bearing(Point::new(lon2, lat2))
}

/// 单个 AP 的位置估计
#[derive(Clone, Debug)]
pub struct PositionEstimate {
    /// AP 硬件地址，仅用于日志和排序
    pub identifier: String,
    /// 纬度（度）
    pub latitude: f64,
    /// 经度（度）
    pub longitude: f64,
    /// 海拔（米），来源数据有效时才有
    pub altitude: Option<f64>,
    /// 覆盖半径 / 1-sigma 精度（米）
    pub accuracy: f64,
    /// 本次扫描的信号强度 (dBm)
    pub signal_dbm: i16,
}

impl PositionEstimate {
    pub fn new(
        identifier: impl Into<String>,
        latitude: f64,
        longitude: f64,
        accuracy: f64,
        signal_dbm: i16,
    ) -> Self {
        PositionEstimate {
            identifier: identifier.into(),
            latitude,
            longitude,
            altitude: None,
            accuracy,
            signal_dbm,
        }
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    /// 与另一估计的大地线距离（米）
    pub fn distance_to(&self, other: &PositionEstimate) -> f64 {
        geodesic_distance(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    /// 兼容裕量：距离减去双方覆盖半径
    ///
    /// 不大于容差即认为两个覆盖圆相容
    pub fn compatibility_margin(&self, other: &PositionEstimate) -> f64 {
        self.distance_to(other) - self.accuracy - other.accuracy
    }

    /// 校验数值字段，拒绝 NaN 和越界值
    pub fn validate(&self, min_signal_dbm: i16) -> Result<(), FusionError> {
        let non_finite = |field: &'static str| FusionError::NonFinite {
            identifier: self.identifier.clone(),
            field,
        };

        if !self.latitude.is_finite() {
            return Err(non_finite("latitude"));
        }
        if !self.longitude.is_finite() {
            return Err(non_finite("longitude"));
        }
        if !self.accuracy.is_finite() {
            return Err(non_finite("accuracy"));
        }
        if self.altitude.is_some_and(|alt| !alt.is_finite()) {
            return Err(non_finite("altitude"));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(FusionError::LatitudeOutOfRange {
                identifier: self.identifier.clone(),
                value: self.latitude,
            });
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(FusionError::LongitudeOutOfRange {
                identifier: self.identifier.clone(),
                value: self.longitude,
            });
        }
        if self.accuracy < 0.0 {
            return Err(FusionError::NegativeAccuracy {
                identifier: self.identifier.clone(),
                value: self.accuracy,
            });
        }
        if self.signal_dbm < min_signal_dbm || self.signal_dbm > 0 {
            return Err(FusionError::SignalOutOfRange {
                identifier: self.identifier.clone(),
                dbm: self.signal_dbm,
                floor: min_signal_dbm,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_creation() {
        let est = PositionEstimate::new("00:11:22:33:44:55", 48.0, 11.0, 25.0, -60).with_altitude(520.0);
        assert_eq!(est.identifier, "00:11:22:33:44:55");
        assert_eq!(est.altitude, Some(520.0));
    }

    #[test]
    fn test_geodesic_distance() {
        // 赤道上经度差 0.001 度约 111.3 米
        let d = geodesic_distance(0.0, 0.0, 0.0, 0.001);
        assert!((d - 111.32).abs() < 0.1);
        assert_eq!(geodesic_distance(10.0, 10.0, 10.0, 10.0), 0.0);
    }

    #[test]
    fn test_initial_bearing() {
        let north = initial_bearing(0.0, 0.0, 0.001, 0.0);
        let east = initial_bearing(0.0, 0.0, 0.0, 0.001);
        assert!(north.abs() < 1e-6);
        assert!((east - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_compatibility_margin() {
        let a = PositionEstimate::new("a", 0.0, 0.0, 30.0, -60);
        let b = PositionEstimate::new("b", 0.0, 0.001, 20.0, -60);
        let margin = a.compatibility_margin(&b);
        assert!((margin - (a.distance_to(&b) - 50.0)).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_nan() {
        let est = PositionEstimate::new("a", f64::NAN, 0.0, 10.0, -60);
        assert!(matches!(
            est.validate(-200),
            Err(FusionError::NonFinite { field: "latitude", .. })
        ));
    }

    #[test]
    fn test_validate_ranges() {
        assert!(PositionEstimate::new("a", 1.0, 2.0, 0.0, -200).validate(-200).is_ok());
        assert!(PositionEstimate::new("a", 91.0, 2.0, 10.0, -60).validate(-200).is_err());
        assert!(PositionEstimate::new("a", 1.0, 2.0, -1.0, -60).validate(-200).is_err());
        assert!(PositionEstimate::new("a", 1.0, 2.0, 10.0, -201).validate(-200).is_err());
        assert!(PositionEstimate::new("a", 1.0, 2.0, 10.0, 5).validate(-200).is_err());
    }
}
