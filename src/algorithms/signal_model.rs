/// 信号强度归一化模型
///
/// 将原始 dBm 读数映射到 0..1 的强度，以及由强度推出的"可接收距离"比例

use serde::{Deserialize, Serialize};
use std::fmt;

/// dBm 归一化区间
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalScale {
    /// 视为 0% 的信号 (dBm)
    pub min_dbm: i16,
    /// 视为 100% 的信号 (dBm)
    pub max_dbm: i16,
    /// 距离比例下限，保证推算距离不为 0
    pub range_floor: f64,
}

impl SignalScale {
    pub fn new(min_dbm: i16, max_dbm: i16, range_floor: f64) -> Self {
        SignalScale {
            min_dbm,
            max_dbm,
            range_floor,
        }
    }

    /// 归一化信号强度
    ///
    /// 单调线性映射，`min_dbm` 及以下为 0.0，`max_dbm` 及以上为 1.0
    pub fn normalize(&self, dbm: i16) -> f64 {
        let span = f64::from(self.max_dbm) - f64::from(self.min_dbm);
        let fraction = (f64::from(dbm) - f64::from(self.min_dbm)) / span;
        fraction.clamp(0.0, 1.0)
    }

    /// 由信号强度推出的距离比例
    ///
    /// 信号越强，设备离 AP 越近，比例越小。线性插值到 `[range_floor, 1]`，
    /// 区间内严格单调，`max_dbm` 处取 `range_floor`
    pub fn range_fraction(&self, dbm: i16) -> f64 {
        self.range_floor + (1.0 - self.range_floor) * (1.0 - self.normalize(dbm))
    }

    /// 验证参数合理性
    pub fn validate(&self) -> Result<(), String> {
        if self.max_dbm <= self.min_dbm {
            return Err(format!(
                "signal range is empty: min_dbm={} max_dbm={}",
                self.min_dbm, self.max_dbm
            ));
        }
        if !(self.range_floor > 0.0 && self.range_floor <= 1.0) {
            return Err(format!(
                "range_floor must lie in (0, 1], got {}",
                self.range_floor
            ));
        }
        Ok(())
    }
}

impl Default for SignalScale {
    fn default() -> Self {
        // 覆盖全部合法读数：-200 dBm 哨兵下限到 0 dBm
        SignalScale::new(-200, 0, 0.01)
    }
}

impl fmt::Display for SignalScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "信号区间 [{} dBm, {} dBm], 距离比例下限 {:.3}",
            self.min_dbm, self.max_dbm, self.range_floor
        )
    }
}
