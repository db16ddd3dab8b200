/// 位置融合算法模块
///
/// 三个无状态组件，按顺序处理一批位置估计：
/// - 聚类器：剔除与多数不一致的 AP
/// - 加权平均器：按信号强度求质心
/// - 精度重估器：用包围盒收紧精度半径

pub mod accuracy;
pub mod averaging;
pub mod clustering;
pub mod estimate;
pub mod results;
pub mod signal_model;

pub use accuracy::*;
pub use averaging::*;
pub use clustering::*;
pub use estimate::*;
pub use results::*;
pub use signal_model::*;
