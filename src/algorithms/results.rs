/// 定位结果数据结构

use crate::algorithms::estimate::{geodesic_distance, initial_bearing};
use crate::algorithms::PositionEstimate;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// 融合结果的来源标签
pub const WIFI_SOURCE: &str = "wifi";

/// 融合后的设备位置
#[derive(Clone, Debug, Serialize)]
pub struct FusedLocation {
    /// 纬度（度）
    pub latitude: f64,
    /// 经度（度）
    pub longitude: f64,
    /// 海拔（米），没有任何估计带海拔时为 None
    pub altitude: Option<f64>,
    /// 精度半径（米）
    pub accuracy: f64,
    /// 来源标签
    pub source: String,
    /// 融合时间
    pub timestamp: DateTime<Utc>,
    /// 参与融合的估计数量
    pub sample_count: usize,
}

impl FusedLocation {
    /// 创建新的融合结果，时间戳取当前时间
    pub fn new(
        latitude: f64,
        longitude: f64,
        altitude: Option<f64>,
        accuracy: f64,
        sample_count: usize,
    ) -> Self {
        Self::with_timestamp(latitude, longitude, altitude, accuracy, sample_count, Utc::now())
    }

    /// 创建具有自定义时间戳的结果
    pub fn with_timestamp(
        latitude: f64,
        longitude: f64,
        altitude: Option<f64>,
        accuracy: f64,
        sample_count: usize,
        timestamp: DateTime<Utc>,
    ) -> Self {
        FusedLocation {
            latitude,
            longitude,
            altitude,
            accuracy,
            source: WIFI_SOURCE.to_string(),
            timestamp,
            sample_count,
        }
    }

    /// 到某个 AP 记录位置的大地线距离（米）
    pub fn distance_to(&self, estimate: &PositionEstimate) -> f64 {
        geodesic_distance(self.latitude, self.longitude, estimate.latitude, estimate.longitude)
    }

    /// 指向某个 AP 记录位置的初始方位角（度）
    pub fn bearing_to(&self, estimate: &PositionEstimate) -> f64 {
        initial_bearing(self.latitude, self.longitude, estimate.latitude, estimate.longitude)
    }

    /// 获取详细描述
    pub fn detailed_description(&self) -> String {
        format!(
            "位置: ({:.6}, {:.6}), 海拔: {}, 精度: {:.1} m, 来源: {}, AP 数: {}, 时间: {}",
            self.latitude,
            self.longitude,
            self.altitude
                .map(|alt| format!("{:.1} m", alt))
                .unwrap_or_else(|| "-".to_string()),
            self.accuracy,
            self.source,
            self.sample_count,
            self.timestamp.to_rfc3339()
        )
    }
}

impl fmt::Display for FusedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.6}, {:.6}) ±{:.1}m [{}]",
            self.latitude, self.longitude, self.accuracy, self.sample_count
        )
    }
}
