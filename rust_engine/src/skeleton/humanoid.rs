//! 人形骨骼命名表

use glam::Vec3;

use super::{Bone, BoneManager};
use crate::hand::{FingerJoint, FingerName, HandSide};

/// 重定向用到的人形骨骼（不含手指）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HumanoidBone {
    Hips,
    Spine,
    Chest,
    Neck,
    Head,
    LeftUpperArm,
    LeftLowerArm,
    LeftHand,
    RightUpperArm,
    RightLowerArm,
    RightHand,
}

impl HumanoidBone {
    pub const ALL: [HumanoidBone; 11] = [
        HumanoidBone::Hips,
        HumanoidBone::Spine,
        HumanoidBone::Chest,
        HumanoidBone::Neck,
        HumanoidBone::Head,
        HumanoidBone::LeftUpperArm,
        HumanoidBone::LeftLowerArm,
        HumanoidBone::LeftHand,
        HumanoidBone::RightUpperArm,
        HumanoidBone::RightLowerArm,
        HumanoidBone::RightHand,
    ];

    /// 规范骨骼名
    pub fn name(self) -> &'static str {
        match self {
            HumanoidBone::Hips => "hips",
            HumanoidBone::Spine => "spine",
            HumanoidBone::Chest => "chest",
            HumanoidBone::Neck => "neck",
            HumanoidBone::Head => "head",
            HumanoidBone::LeftUpperArm => "leftUpperArm",
            HumanoidBone::LeftLowerArm => "leftLowerArm",
            HumanoidBone::LeftHand => "leftHand",
            HumanoidBone::RightUpperArm => "rightUpperArm",
            HumanoidBone::RightLowerArm => "rightLowerArm",
            HumanoidBone::RightHand => "rightHand",
        }
    }

    pub fn hand(side: HandSide) -> Self {
        match side {
            HandSide::Left => HumanoidBone::LeftHand,
            HandSide::Right => HumanoidBone::RightHand,
        }
    }

    fn parent(self) -> Option<HumanoidBone> {
        use HumanoidBone::*;
        match self {
            Hips => None,
            Spine => Some(Hips),
            Chest => Some(Spine),
            Neck => Some(Chest),
            Head => Some(Neck),
            LeftUpperArm | RightUpperArm => Some(Chest),
            LeftLowerArm => Some(LeftUpperArm),
            LeftHand => Some(LeftLowerArm),
            RightLowerArm => Some(RightUpperArm),
            RightHand => Some(RightLowerArm),
        }
    }

    // 约 1.6m 身高模型的 T-pose 位置
    fn rest_position(self) -> Vec3 {
        use HumanoidBone::*;
        match self {
            Hips => Vec3::new(0.0, 0.95, 0.0),
            Spine => Vec3::new(0.0, 1.05, 0.0),
            Chest => Vec3::new(0.0, 1.2, 0.0),
            Neck => Vec3::new(0.0, 1.4, 0.0),
            Head => Vec3::new(0.0, 1.5, 0.0),
            LeftUpperArm => Vec3::new(0.18, 1.36, 0.0),
            LeftLowerArm => Vec3::new(0.44, 1.36, 0.0),
            LeftHand => Vec3::new(0.68, 1.36, 0.0),
            RightUpperArm => Vec3::new(-0.18, 1.36, 0.0),
            RightLowerArm => Vec3::new(-0.44, 1.36, 0.0),
            RightHand => Vec3::new(-0.68, 1.36, 0.0),
        }
    }
}

/// 手指骨骼名：侧 + 手指 + 关节，例如 `leftIndexProximal`
pub fn finger_bone_name(side: HandSide, finger: FingerName, joint: FingerJoint) -> String {
    format!("{}{}{}", side.prefix(), finger.name(), joint.name())
}

impl BoneManager {
    /// 构建标准人形骨骼（躯干、手臂、双手全部手指关节）
    pub fn humanoid() -> Self {
        let mut manager = BoneManager::new();

        for bone in HumanoidBone::ALL {
            let parent = bone
                .parent()
                .and_then(|p| manager.find_bone_by_name(p.name()))
                .map_or(-1, |i| i as i32);
            manager.add_bone(Bone::with_parent(bone.name(), parent, bone.rest_position()));
        }

        for side in HandSide::ALL {
            let hand = HumanoidBone::hand(side);
            let hand_index = manager.find_bone_by_name(hand.name()).map_or(-1, |i| i as i32);
            let direction = if side == HandSide::Left { 1.0 } else { -1.0 };

            for (f, finger) in FingerName::ALL.into_iter().enumerate() {
                let mut parent = hand_index;
                let spread = 0.02 * (f as f32 - 2.0);
                for (j, joint) in FingerJoint::ALL.into_iter().enumerate() {
                    let reach = 0.06 + 0.025 * j as f32;
                    let position = hand.rest_position() + Vec3::new(direction * reach, 0.0, spread);
                    let index = manager.add_bone(Bone::with_parent(
                        finger_bone_name(side, finger, joint),
                        parent,
                        position,
                    ));
                    parent = index as i32;
                }
            }
        }

        manager.build_hierarchy();
        manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finger_bone_name() {
        assert_eq!(
            finger_bone_name(HandSide::Left, FingerName::Index, FingerJoint::Proximal),
            "leftIndexProximal"
        );
        assert_eq!(
            finger_bone_name(HandSide::Right, FingerName::Little, FingerJoint::Distal),
            "rightLittleDistal"
        );
    }

    #[test]
    fn test_humanoid_contains_all_bones() {
        let manager = BoneManager::humanoid();
        assert_eq!(manager.bone_count(), HumanoidBone::ALL.len() + 2 * 15);
        for bone in HumanoidBone::ALL {
            assert!(manager.find_bone_by_name(bone.name()).is_some(), "缺少 {}", bone.name());
        }

        let distal = manager.find_bone_by_name("rightThumbDistal").unwrap();
        let intermediate = manager.find_bone_by_name("rightThumbIntermediate").unwrap();
        assert_eq!(manager.get_bone(distal).unwrap().parent_index, intermediate as i32);
    }
}
