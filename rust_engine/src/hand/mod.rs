//! 手部关节角度估计

mod estimator;

pub use estimator::{compute_hand_rotation, compute_wrist_rotation};

use serde::{Deserialize, Serialize};

use crate::math::JointRotation;

/// 左右手
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    pub const ALL: [HandSide; 2] = [HandSide::Left, HandSide::Right];

    /// 骨骼名前缀
    pub fn prefix(self) -> &'static str {
        match self {
            HandSide::Left => "left",
            HandSide::Right => "right",
        }
    }
}

/// 手指
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FingerName {
    Thumb,
    Index,
    Middle,
    Ring,
    Little,
}

impl FingerName {
    pub const ALL: [FingerName; 5] = [
        FingerName::Thumb,
        FingerName::Index,
        FingerName::Middle,
        FingerName::Ring,
        FingerName::Little,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FingerName::Thumb => "Thumb",
            FingerName::Index => "Index",
            FingerName::Middle => "Middle",
            FingerName::Ring => "Ring",
            FingerName::Little => "Little",
        }
    }

    /// 定义该手指的 4 个关键点索引（手腕 + 3 个关节）
    pub fn landmark_chain(self) -> [usize; 4] {
        match self {
            FingerName::Thumb => [0, 1, 2, 3],
            FingerName::Index => [0, 5, 6, 7],
            FingerName::Middle => [0, 9, 10, 11],
            FingerName::Ring => [0, 13, 14, 15],
            FingerName::Little => [0, 17, 18, 19],
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// 手指关节
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FingerJoint {
    Proximal,
    Intermediate,
    Distal,
}

impl FingerJoint {
    pub const ALL: [FingerJoint; 3] = [
        FingerJoint::Proximal,
        FingerJoint::Intermediate,
        FingerJoint::Distal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FingerJoint::Proximal => "Proximal",
            FingerJoint::Intermediate => "Intermediate",
            FingerJoint::Distal => "Distal",
        }
    }
}

/// 单根手指三个关节的旋转
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FingerRotationSet {
    pub proximal: JointRotation,
    pub intermediate: JointRotation,
    pub distal: JointRotation,
}

impl FingerRotationSet {
    pub const IDENTITY: Self = Self {
        proximal: JointRotation::IDENTITY,
        intermediate: JointRotation::IDENTITY,
        distal: JointRotation::IDENTITY,
    };

    pub fn joint(&self, joint: FingerJoint) -> JointRotation {
        match joint {
            FingerJoint::Proximal => self.proximal,
            FingerJoint::Intermediate => self.intermediate,
            FingerJoint::Distal => self.distal,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// 整只手的旋转，五根手指总是齐全
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandRotationSet {
    fingers: [FingerRotationSet; 5],
    /// 手腕朝向（关键点不足时为 None）
    pub wrist: Option<JointRotation>,
}

impl HandRotationSet {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn finger(&self, finger: FingerName) -> &FingerRotationSet {
        &self.fingers[finger.index()]
    }

    pub fn set_finger(&mut self, finger: FingerName, rotations: FingerRotationSet) {
        self.fingers[finger.index()] = rotations;
    }

    /// 遍历全部 15 个关节
    pub fn joints(&self) -> impl Iterator<Item = (FingerName, FingerJoint, JointRotation)> + '_ {
        FingerName::ALL.into_iter().flat_map(move |finger| {
            FingerJoint::ALL
                .into_iter()
                .map(move |joint| (finger, joint, self.finger(finger).joint(joint)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_iteration() {
        let mut hand = HandRotationSet::identity();
        let bent = FingerRotationSet {
            proximal: JointRotation::new(0.4, 0.0, 0.0),
            ..FingerRotationSet::IDENTITY
        };
        hand.set_finger(FingerName::Ring, bent);

        assert_eq!(hand.joints().count(), 15);
        let ring_proximal = hand
            .joints()
            .find(|(f, j, _)| *f == FingerName::Ring && *j == FingerJoint::Proximal)
            .map(|(_, _, r)| r);
        assert_eq!(ring_proximal, Some(JointRotation::new(0.4, 0.0, 0.0)));
        assert!(hand.finger(FingerName::Thumb).is_identity());
    }
}
