//! 骨骼旋转平滑混合
//!
//! 目标旋转不直接写入骨骼，而是按随帧时间缩放的系数做球面插值，
//! 帧率变化时平滑速度保持一致。

use std::collections::HashSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::BoneManager;
use crate::math::JointRotation;

/// 混合系数曲线
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmoothingCurve {
    /// factor = k * dt
    #[default]
    Linear,
    /// factor = 1 - exp(-k * dt)
    Exponential,
}

/// 根据帧间隔计算混合系数，结果限制在 [0, 1]
pub fn blend_factor(delta_time: f32, responsiveness: f32, curve: SmoothingCurve) -> f32 {
    if !delta_time.is_finite() || !responsiveness.is_finite() || delta_time <= 0.0 || responsiveness <= 0.0 {
        return 0.0;
    }
    let factor = match curve {
        SmoothingCurve::Linear => responsiveness * delta_time,
        SmoothingCurve::Exponential => 1.0 - (-responsiveness * delta_time).exp(),
    };
    factor.clamp(0.0, 1.0)
}

/// 逐轴符号/缩放修正，同一旋转估计可复用到镜像或阻尼映射的骨骼上
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisFlip {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AxisFlip {
    pub const IDENTITY: Self = Self { x: 1.0, y: 1.0, z: 1.0 };
    /// 头部旋转映射到脖子：阻尼并部分反向
    pub const NECK: Self = Self { x: 0.3, y: -0.3, z: -0.3 };
    /// 躯干倾斜映射到脊柱/髋部
    pub const TORSO: Self = Self { x: 0.1, y: -0.1, z: -0.1 };

    pub fn as_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl Default for AxisFlip {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// 旋转混合器
///
/// 缺失骨骼只在第一次出现时告警，之后降为 debug 日志。
#[derive(Debug, Default)]
pub struct RotationBlender {
    missing_bones: HashSet<String>,
}

impl RotationBlender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 将骨骼当前旋转向 `target * flip` 插值 `factor`
    ///
    /// 骨骼不存在时跳过并返回 false。
    pub fn apply_target(
        &mut self,
        bones: &mut BoneManager,
        name: &str,
        target: JointRotation,
        factor: f32,
        flip: AxisFlip,
    ) -> bool {
        let Some(bone) = bones.get_bone_by_name_mut(name) else {
            if self.missing_bones.insert(name.to_string()) {
                log::warn!("Bone {} not found in humanoid skeleton", name);
            } else {
                log::debug!("跳过缺失骨骼 {}", name);
            }
            return false;
        };

        if factor <= 0.0 {
            return true;
        }

        let target = target.scaled(flip.as_vec3()).to_quat();
        bone.slerp_toward(target, factor);
        true
    }

    /// 已告警过的缺失骨骼
    pub fn missing_bones(&self) -> impl Iterator<Item = &str> {
        self.missing_bones.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::Bone;
    use glam::Quat;

    fn single_bone() -> BoneManager {
        let mut bones = BoneManager::new();
        bones.add_bone(Bone::new("neck"));
        bones.build_hierarchy();
        bones
    }

    #[test]
    fn test_blend_factor() {
        assert!((blend_factor(0.016, 5.0, SmoothingCurve::Linear) - 0.08).abs() < 1e-6);
        assert_eq!(blend_factor(1.0, 5.0, SmoothingCurve::Linear), 1.0);
        assert_eq!(blend_factor(-0.1, 5.0, SmoothingCurve::Linear), 0.0);
        assert_eq!(blend_factor(f32::NAN, 5.0, SmoothingCurve::Linear), 0.0);

        let exp = blend_factor(0.016, 5.0, SmoothingCurve::Exponential);
        assert!(exp > 0.0 && exp < 0.08);
        // 指数曲线下两帧 dt 与一帧 2dt 等效
        let half = blend_factor(0.008, 5.0, SmoothingCurve::Exponential);
        assert!(((1.0 - half) * (1.0 - half) - (1.0 - exp)).abs() < 1e-5);
    }

    #[test]
    fn test_blend_converges_without_overshoot() {
        let mut bones = single_bone();
        let mut blender = RotationBlender::new();
        let target = JointRotation::new(0.4, -0.3, 0.8);
        let target_quat = target.to_quat();

        let mut last = Quat::IDENTITY.angle_between(target_quat);
        for _ in 0..40 {
            assert!(blender.apply_target(&mut bones, "neck", target, 0.1, AxisFlip::IDENTITY));
            let current = bones.bone_rotation("neck").unwrap();
            let distance = current.angle_between(target_quat);
            // 每步严格靠近目标，不越过
            assert!(distance < last);
            assert!((distance - 0.9 * last).abs() < 1e-3);
            last = distance;
        }
        assert!(last < 0.02);
    }

    #[test]
    fn test_full_factor_reaches_target() {
        let mut bones = single_bone();
        let mut blender = RotationBlender::new();
        let target = JointRotation::new(0.2, 0.1, 0.0);
        blender.apply_target(&mut bones, "neck", target, 1.0, AxisFlip::IDENTITY);
        let current = bones.bone_rotation("neck").unwrap();
        assert!(current.dot(target.to_quat()).abs() > 1.0 - 1e-5);
    }

    #[test]
    fn test_flip_applied() {
        let mut bones = single_bone();
        let mut blender = RotationBlender::new();
        let head = JointRotation::new(1.0, 1.0, 1.0);
        blender.apply_target(&mut bones, "neck", head, 1.0, AxisFlip::NECK);
        let expected = JointRotation::new(0.3, -0.3, -0.3).to_quat();
        assert!(bones.bone_rotation("neck").unwrap().dot(expected).abs() > 1.0 - 1e-5);
    }

    #[test]
    fn test_missing_bone_skipped() {
        let mut bones = single_bone();
        let mut blender = RotationBlender::new();
        for _ in 0..3 {
            assert!(!blender.apply_target(&mut bones, "tail", JointRotation::IDENTITY, 0.5, AxisFlip::IDENTITY));
        }
        assert_eq!(blender.missing_bones().count(), 1);
        assert_eq!(bones.bone_rotation("neck"), Some(Quat::IDENTITY));
    }
}
