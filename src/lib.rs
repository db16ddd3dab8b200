/// WiFi 接入点位置融合
///
/// 将多个接入点（AP）各自记录的位置与实时信号强度融合为一个设备位置：
/// - 空间聚类剔除已搬迁的 AP
/// - 按信号强度加权求质心
/// - 基于包围盒的精度重估

pub mod algorithms;
pub mod config;
pub mod error;
pub mod resolver;
pub mod service;

pub use config::FusionConfig;
pub use error::FusionError;
pub use resolver::Resolver;
