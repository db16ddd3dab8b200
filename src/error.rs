/// 融合过程中的错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FusionError {
    /// 数值字段为 NaN 或无穷
    #[error("estimate {identifier}: field `{field}` is not finite")]
    NonFinite {
        identifier: String,
        field: &'static str,
    },

    #[error("estimate {identifier}: latitude {value} outside [-90, 90]")]
    LatitudeOutOfRange { identifier: String, value: f64 },

    #[error("estimate {identifier}: longitude {value} outside [-180, 180]")]
    LongitudeOutOfRange { identifier: String, value: f64 },

    #[error("estimate {identifier}: accuracy {value} is negative")]
    NegativeAccuracy { identifier: String, value: f64 },

    #[error("estimate {identifier}: signal {dbm} dBm outside [{floor}, 0]")]
    SignalOutOfRange {
        identifier: String,
        dbm: i16,
        floor: i16,
    },

    /// 加权平均时没有可用的估计
    #[error("no estimate carries a usable coverage radius")]
    NoUsableEstimates,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("invalid SSID pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl FusionError {
    /// 是否属于输入数据校验错误
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FusionError::NonFinite { .. }
                | FusionError::LatitudeOutOfRange { .. }
                | FusionError::LongitudeOutOfRange { .. }
                | FusionError::NegativeAccuracy { .. }
                | FusionError::SignalOutOfRange { .. }
        )
    }
}
