//! 外部躯干/面部解算器接口
//!
//! 解算器本身是黑盒：输入关键点，输出各部位旋转与表情估计。
//! 躯干解算器以面向摄像头的视角报告四肢，即主体的右臂出现在 `left_*` 字段中。

use serde::{Deserialize, Serialize};

use crate::landmark::LandmarkSet;
use crate::math::JointRotation;

/// 躯干解算结果
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PoseRotationSet {
    pub spine: JointRotation,
    pub hips: JointRotation,
    pub left_upper_arm: JointRotation,
    pub left_lower_arm: JointRotation,
    pub left_hand: JointRotation,
    pub right_upper_arm: JointRotation,
    pub right_lower_arm: JointRotation,
    pub right_hand: JointRotation,
}

impl PoseRotationSet {
    pub fn is_finite(&self) -> bool {
        [
            self.spine,
            self.hips,
            self.left_upper_arm,
            self.left_lower_arm,
            self.left_hand,
            self.right_upper_arm,
            self.right_lower_arm,
            self.right_hand,
        ]
        .iter()
        .all(JointRotation::is_finite)
    }
}

/// 口型（元音）权重
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MouthShape {
    #[serde(rename = "A")]
    pub a: f32,
    #[serde(rename = "I")]
    pub i: f32,
    #[serde(rename = "E")]
    pub e: f32,
    #[serde(rename = "O")]
    pub o: f32,
    #[serde(rename = "U")]
    pub u: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mouth {
    pub shape: MouthShape,
}

/// 双眼睁开程度（1 = 完全睁开）
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EyeOpenness {
    pub l: f32,
    pub r: f32,
}

impl Default for EyeOpenness {
    fn default() -> Self {
        Self { l: 1.0, r: 1.0 }
    }
}

/// 瞳孔偏移
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pupil {
    pub x: f32,
    pub y: f32,
}

/// 面部解算结果
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceSolution {
    #[serde(default)]
    pub mouth: Mouth,
    #[serde(default)]
    pub eye: EyeOpenness,
    #[serde(default)]
    pub head: Option<JointRotation>,
    #[serde(default)]
    pub pupil: Option<Pupil>,
}

impl FaceSolution {
    pub fn is_finite(&self) -> bool {
        let s = &self.mouth.shape;
        [s.a, s.i, s.e, s.o, s.u, self.eye.l, self.eye.r]
            .iter()
            .all(|v| v.is_finite())
            && self.head.map_or(true, |h| h.is_finite())
            && self.pupil.map_or(true, |p| p.x.is_finite() && p.y.is_finite())
    }
}

/// 传给解算器的参数
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// 检测器图像宽度（像素）
    pub image_width: u32,
    /// 检测器图像高度（像素）
    pub image_height: u32,
    /// 眨眼判定区间 [闭, 开]
    pub blink_range: [f32; 2],
    /// 解算器内部是否平滑眨眼
    pub smooth_blink: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            image_width: 640,
            image_height: 480,
            blink_range: [0.25, 0.75],
            smooth_blink: false,
        }
    }
}

/// 躯干解算器
///
/// `world` 为身体 3D 世界坐标（深度参考），`image` 为图像空间关键点。
/// 所需关键点不足时返回 None。
pub trait PoseSolver: Send {
    fn solve(&self, world: &LandmarkSet, image: &LandmarkSet, options: &SolverOptions) -> Option<PoseRotationSet>;
}

/// 面部解算器
pub trait FaceSolver: Send {
    fn solve(&self, face: &LandmarkSet, options: &SolverOptions) -> Option<FaceSolution>;
}
