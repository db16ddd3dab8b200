/// 融合参数配置
///
/// 所有组件通过引用接收同一份配置，不依赖全局状态

use crate::algorithms::SignalScale;
use crate::error::FusionError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// 聚类容差 τ（米），即可接受的 AP 搬迁距离
    pub tolerance_m: f64,
    /// 推算覆盖半径上限（米）
    pub max_assumed_coverage_m: f64,
    /// dBm 归一化区间
    pub signal: SignalScale,
    /// 信号读数下限 (dBm)，低于此值视为数据损坏
    pub min_signal_dbm: i16,
    /// 需要忽略的 SSID 正则，空串表示不过滤
    pub ignore_ssid_pattern: String,
}

impl FusionConfig {
    /// 从 JSON 字符串加载，缺省字段取默认值
    pub fn from_json_str(json: &str) -> Result<Self, FusionError> {
        let config: FusionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, FusionError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn with_tolerance(mut self, tolerance_m: f64) -> Self {
        self.tolerance_m = tolerance_m;
        self
    }

    pub fn with_max_assumed_coverage(mut self, coverage_m: f64) -> Self {
        self.max_assumed_coverage_m = coverage_m;
        self
    }

    /// 编译 SSID 过滤正则
    pub fn ignore_ssid_regex(&self) -> Result<Option<Regex>, FusionError> {
        if self.ignore_ssid_pattern.is_empty() {
            return Ok(None);
        }
        Ok(Some(Regex::new(&self.ignore_ssid_pattern)?))
    }

    /// 验证配置合理性
    pub fn validate(&self) -> Result<(), FusionError> {
        if !self.tolerance_m.is_finite() || self.tolerance_m < 0.0 {
            return Err(FusionError::InvalidConfig(format!(
                "tolerance_m must be finite and non-negative, got {}",
                self.tolerance_m
            )));
        }
        if !self.max_assumed_coverage_m.is_finite() || self.max_assumed_coverage_m <= 0.0 {
            return Err(FusionError::InvalidConfig(format!(
                "max_assumed_coverage_m must be finite and positive, got {}",
                self.max_assumed_coverage_m
            )));
        }
        if self.min_signal_dbm > 0 {
            return Err(FusionError::InvalidConfig(format!(
                "min_signal_dbm must not be positive, got {}",
                self.min_signal_dbm
            )));
        }
        self.signal.validate().map_err(FusionError::InvalidConfig)?;
        // 所有合法读数都必须落在归一化区间内，否则强度在区间外饱和
        if self.signal.min_dbm > self.min_signal_dbm || self.signal.max_dbm < 0 {
            return Err(FusionError::InvalidConfig(format!(
                "signal range [{}, {}] dBm must cover valid readings [{}, 0] dBm",
                self.signal.min_dbm, self.signal.max_dbm, self.min_signal_dbm
            )));
        }
        self.ignore_ssid_regex()?;
        Ok(())
    }
}

impl Default for FusionConfig {
    fn default() -> Self {
        FusionConfig {
            tolerance_m: 200.0,
            max_assumed_coverage_m: 100.0,
            signal: SignalScale::default(),
            min_signal_dbm: -200,
            ignore_ssid_pattern: "_nomap$".to_string(),
        }
    }
}
