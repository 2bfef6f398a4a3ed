//! 由 21 个手部关键点估计手指关节旋转
//!
//! 关键点拓扑：0 为手腕，之后每根手指 4 个点（根部到指尖）。
//! 指尖之后没有关键点，末节方向沿用中节方向外推。

use std::f32::consts::PI;

use glam::{Quat, Vec3};

use super::{FingerName, FingerRotationSet, HandRotationSet};
use crate::landmark::{LandmarkSet, HAND_LANDMARK_COUNT};
use crate::math::{quat_from_two_vectors, segment_rotation, JointRotation};

pub const WRIST: usize = 0;
pub const INDEX_MCP: usize = 5;
pub const PINKY_MCP: usize = 17;

/// 计算整只手的关节旋转
///
/// 关键点不足 21 个时返回全单位旋转；某根手指缺少任一所需关键点时，该手指三个关节全部为单位旋转。
pub fn compute_hand_rotation(landmarks: &LandmarkSet) -> HandRotationSet {
    let mut hand = HandRotationSet::identity();
    if landmarks.len() < HAND_LANDMARK_COUNT {
        return hand;
    }

    for finger in FingerName::ALL {
        hand.set_finger(finger, finger_rotation(finger, landmarks));
    }
    hand.wrist = compute_wrist_rotation(landmarks);
    hand
}

fn finger_rotation(finger: FingerName, landmarks: &LandmarkSet) -> FingerRotationSet {
    let [i0, i1, i2, i3] = finger.landmark_chain();
    let points = (
        landmarks.scene_point(i0),
        landmarks.scene_point(i1),
        landmarks.scene_point(i2),
        landmarks.scene_point(i3),
    );
    let (v0, v1, v2, v3) = match points {
        (Some(v0), Some(v1), Some(v2), Some(v3)) => (v0, v1, v2, v3),
        _ => return FingerRotationSet::IDENTITY,
    };

    // 指尖外推点：v3 + (v3 - v2)
    let tip = v3 + (v3 - v2);

    FingerRotationSet {
        proximal: segment_rotation(v0, v1, v2).into(),
        intermediate: segment_rotation(v1, v2, v3).into(),
        distal: segment_rotation(v2, v3, tip).into(),
    }
}

/// 手腕朝向
///
/// 前向为手腕指向食指根与小指根中点的方向；食指根在小指根左侧（x 为负）时
/// 追加绕 Z 轴 180° 的修正，使左右手结果一致。
pub fn compute_wrist_rotation(landmarks: &LandmarkSet) -> Option<JointRotation> {
    let wrist = landmarks.scene_point(WRIST)?;
    let index_base = landmarks.scene_point(INDEX_MCP)?;
    let pinky_base = landmarks.scene_point(PINKY_MCP)?;

    let lateral = (index_base - pinky_base).normalize_or_zero();
    let forward = ((index_base + pinky_base) * 0.5 - wrist).normalize_or_zero();

    let mut quat = quat_from_two_vectors(Vec3::Y, forward);
    if lateral.x < 0.0 {
        quat *= Quat::from_rotation_z(PI);
    }
    Some(JointRotation::from_quat(quat))
}
