/// 空间聚类：剔除与多数 AP 不一致的位置估计
///
/// 贪心首次适配分组，同一估计可以同时属于多个组，最后取成员最多的组。
/// 这是对最大团的近似，结果依赖遍历顺序，因此先按 identifier 排序。

use crate::algorithms::PositionEstimate;
use crate::config::FusionConfig;
use tracing::debug;

/// 可参与定位的最少 AP 数
pub const MIN_CLUSTER_SIZE: usize = 2;

/// 一组相互兼容的估计，按输入下标记录成员
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EstimateGroup {
    members: Vec<usize>,
}

impl EstimateGroup {
    fn seeded(index: usize) -> Self {
        EstimateGroup {
            members: vec![index],
        }
    }

    /// 成员在输入切片中的下标
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// 候选估计与组内当前每个成员都兼容
    fn accepts(&self, candidate: &PositionEstimate, estimates: &[PositionEstimate], tolerance: f64) -> bool {
        self.members.iter().all(|&member| {
            let other = &estimates[member];
            let margin = candidate.compatibility_margin(other);
            debug!(
                candidate = %candidate.identifier,
                other = %other.identifier,
                margin,
                tolerance,
                "compatibility test"
            );
            margin <= tolerance
        })
    }
}

/// 聚类器
pub struct Clusterer;

impl Clusterer {
    /// 两个估计在容差内是否兼容（非严格不等式）
    pub fn is_compatible(a: &PositionEstimate, b: &PositionEstimate, tolerance: f64) -> bool {
        a.compatibility_margin(b) <= tolerance
    }

    /// 固定的遍历顺序：按 identifier 排序，相同时保持输入顺序
    pub fn iteration_order(estimates: &[PositionEstimate]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..estimates.len()).collect();
        order.sort_by(|&a, &b| estimates[a].identifier.cmp(&estimates[b].identifier));
        order
    }

    /// 划分兼容组
    ///
    /// 每个估计加入所有接受它的已有组；都不接受时新建单元素组。
    /// 组按创建顺序返回。
    pub fn divide_in_groups(estimates: &[PositionEstimate], tolerance: f64) -> Vec<EstimateGroup> {
        let mut groups: Vec<EstimateGroup> = Vec::new();

        for index in Self::iteration_order(estimates) {
            let candidate = &estimates[index];
            let mut used = false;
            for group in groups.iter_mut() {
                if group.accepts(candidate, estimates, tolerance) {
                    group.members.push(index);
                    used = true;
                }
            }
            if !used {
                debug!(identifier = %candidate.identifier, "creating new group");
                groups.push(EstimateGroup::seeded(index));
            }
        }

        groups
    }

    /// 选出最大组；大小相同时取最早创建的
    pub fn largest_group(groups: &[EstimateGroup]) -> Option<&EstimateGroup> {
        let mut best: Option<&EstimateGroup> = None;
        for group in groups {
            if best.is_none_or(|b| group.len() > b.len()) {
                best = Some(group);
            }
        }
        best
    }

    /// 剔除离群 AP，返回最大兼容组的成员
    ///
    /// # 返回
    /// - 最大组的估计（按遍历顺序），不足 2 个时返回 None
    pub fn cull(estimates: &[PositionEstimate], config: &FusionConfig) -> Option<Vec<PositionEstimate>> {
        let groups = Self::divide_in_groups(estimates, config.tolerance_m);

        for (i, group) in groups.iter().enumerate() {
            debug!(group = i + 1, size = group.len(), "candidate group");
        }

        let best = Self::largest_group(&groups)?;
        if best.len() < MIN_CLUSTER_SIZE {
            debug!(size = best.len(), "largest group too small to locate");
            return None;
        }

        Some(best.members().iter().map(|&i| estimates[i].clone()).collect())
    }
}
