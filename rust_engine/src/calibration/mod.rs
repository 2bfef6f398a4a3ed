//! 左右镜像与偏移校准
//!
//! 躯干解算器从摄像头视角报告四肢，需要交换左右并取反；
//! 解算出的手臂角度相对本骨骼比例偏大/偏小，通过逐轴缩放偏移修正。

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::math::JointRotation;
use crate::solver::PoseRotationSet;

/// 单轴偏移上下限
pub const OFFSET_LIMIT: f32 = 5.0;

/// 逐轴缩放偏移
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct OffsetVector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl OffsetVector {
    pub const ONE: Self = Self { x: 1.0, y: 1.0, z: 1.0 };

    /// 创建偏移，各分量限制在 [-5, 5]；含非有限值时返回 None
    pub fn new(x: f32, y: f32, z: f32) -> Option<Self> {
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return None;
        }
        Some(Self {
            x: x.clamp(-OFFSET_LIMIT, OFFSET_LIMIT),
            y: y.clamp(-OFFSET_LIMIT, OFFSET_LIMIT),
            z: z.clamp(-OFFSET_LIMIT, OFFSET_LIMIT),
        })
    }

    pub fn as_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// 对旋转逐轴缩放
    pub fn apply(self, rotation: JointRotation) -> JointRotation {
        rotation.scaled(self.as_vec3())
    }
}

impl Default for OffsetVector {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<[f32; 3]> for OffsetVector {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2]).unwrap_or(Self::ONE)
    }
}

impl From<OffsetVector> for [f32; 3] {
    fn from(v: OffsetVector) -> Self {
        [v.x, v.y, v.z]
    }
}

/// 肢体分段
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LimbSegment {
    UpperArm,
    LowerArm,
    Hand,
}

/// 三组肢体偏移
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetConfig {
    pub upper_arm: OffsetVector,
    pub lower_arm: OffsetVector,
    pub hand: OffsetVector,
}

impl Default for OffsetConfig {
    fn default() -> Self {
        // 默认值带轻微的 Y 轴偏置，按常见模型比例调出
        Self {
            upper_arm: OffsetVector { x: 1.0, y: 0.42, z: 1.0 },
            lower_arm: OffsetVector { x: 1.0, y: 1.32, z: 1.0 },
            hand: OffsetVector { x: 1.0, y: 0.26, z: 1.0 },
        }
    }
}

impl OffsetConfig {
    /// 全 1 偏移（不缩放）
    pub fn unit() -> Self {
        Self {
            upper_arm: OffsetVector::ONE,
            lower_arm: OffsetVector::ONE,
            hand: OffsetVector::ONE,
        }
    }

    pub fn get(&self, segment: LimbSegment) -> OffsetVector {
        match segment {
            LimbSegment::UpperArm => self.upper_arm,
            LimbSegment::LowerArm => self.lower_arm,
            LimbSegment::Hand => self.hand,
        }
    }

    pub fn set(&mut self, segment: LimbSegment, offset: OffsetVector) {
        match segment {
            LimbSegment::UpperArm => self.upper_arm = offset,
            LimbSegment::LowerArm => self.lower_arm = offset,
            LimbSegment::Hand => self.hand = offset,
        }
    }
}

/// 镜像并校准解算结果
///
/// `Left<段> = -(solved.Right<段> * offset<段>)`，右侧同理取解算器左侧结果。
/// 先缩放后取反，顺序影响结果的手性。躯干（spine/hips）原样保留。
pub fn mirror_pose(solved: &PoseRotationSet, offsets: &OffsetConfig) -> PoseRotationSet {
    let correct = |rotation: JointRotation, segment: LimbSegment| -offsets.get(segment).apply(rotation);

    PoseRotationSet {
        spine: solved.spine,
        hips: solved.hips,
        left_upper_arm: correct(solved.right_upper_arm, LimbSegment::UpperArm),
        left_lower_arm: correct(solved.right_lower_arm, LimbSegment::LowerArm),
        left_hand: correct(solved.right_hand, LimbSegment::Hand),
        right_upper_arm: correct(solved.left_upper_arm, LimbSegment::UpperArm),
        right_lower_arm: correct(solved.left_lower_arm, LimbSegment::LowerArm),
        right_hand: correct(solved.left_hand, LimbSegment::Hand),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pose() -> PoseRotationSet {
        PoseRotationSet {
            spine: JointRotation::new(0.05, 0.1, 0.0),
            hips: JointRotation::new(0.0, 0.3, 0.0),
            left_upper_arm: JointRotation::new(0.1, -0.4, 1.2),
            left_lower_arm: JointRotation::new(0.0, 0.7, 0.2),
            left_hand: JointRotation::new(-0.1, 0.2, 0.05),
            right_upper_arm: JointRotation::new(0.2, 0.3, -1.1),
            right_lower_arm: JointRotation::new(0.0, -0.6, -0.1),
            right_hand: JointRotation::new(0.1, -0.3, 0.0),
        }
    }

    #[test]
    fn test_upper_arm_mirrored() {
        let pose = PoseRotationSet {
            right_upper_arm: JointRotation::new(0.2, 0.0, 0.0),
            ..Default::default()
        };
        let out = mirror_pose(&pose, &OffsetConfig::unit());
        assert_eq!(out.left_upper_arm, JointRotation::new(-0.2, 0.0, 0.0));
    }

    #[test]
    fn test_unit_offset_swaps_and_negates() {
        let pose = sample_pose();
        let out = mirror_pose(&pose, &OffsetConfig::unit());
        assert_eq!(out.left_upper_arm, -pose.right_upper_arm);
        assert_eq!(out.left_lower_arm, -pose.right_lower_arm);
        assert_eq!(out.left_hand, -pose.right_hand);
        assert_eq!(out.right_upper_arm, -pose.left_upper_arm);
        assert_eq!(out.right_lower_arm, -pose.left_lower_arm);
        assert_eq!(out.right_hand, -pose.left_hand);
        assert_eq!(out.spine, pose.spine);
        assert_eq!(out.hips, pose.hips);

        // 再做一次回到原值
        let back = mirror_pose(&out, &OffsetConfig::unit());
        assert_eq!(back, pose);
    }

    #[test]
    fn test_scale_before_mirror() {
        let pose = PoseRotationSet {
            right_upper_arm: JointRotation::new(1.0, 1.0, 1.0),
            ..Default::default()
        };
        let mut offsets = OffsetConfig::unit();
        offsets.set(LimbSegment::UpperArm, OffsetVector::new(2.0, 1.0, 1.0).unwrap());
        let out = mirror_pose(&pose, &offsets);
        assert_eq!(out.left_upper_arm, JointRotation::new(-2.0, -1.0, -1.0));
    }

    #[test]
    fn test_offset_clamped_and_rejected() {
        let offset = OffsetVector::new(7.0, -9.0, 0.5).unwrap();
        assert_eq!(offset, OffsetVector { x: 5.0, y: -5.0, z: 0.5 });
        assert!(OffsetVector::new(f32::NAN, 1.0, 1.0).is_none());
    }

    #[test]
    fn test_offset_serde_as_array() {
        let config = OffsetConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("[1.0,0.42,1.0]"));
        let parsed: OffsetConfig = serde_json::from_str(r#"{"hand": [2, 1, 1]}"#).unwrap();
        assert_eq!(parsed.hand, OffsetVector { x: 2.0, y: 1.0, z: 1.0 });
        assert_eq!(parsed.upper_arm, OffsetConfig::default().upper_arm);
    }
}
