//! Avatar Mocap - 关键点驱动的虚拟形象重定向引擎
//!
//! 将外部检测器输出的稀疏关键点（面部、身体、双手）转换为人形骨骼的目标旋转：
//! - 向量/旋转基础运算
//! - 手指关节角度估计
//! - 左右镜像与偏移校准
//! - 骨骼旋转平滑混合
//! - 表情权重与视线平滑

pub mod calibration;
pub mod config;
pub mod hand;
pub mod landmark;
pub mod math;
pub mod model;
pub mod morph;
pub mod recording;
pub mod skeleton;
pub mod solver;

pub use calibration::{mirror_pose, LimbSegment, OffsetConfig, OffsetVector};
pub use config::{InputMode, ManualExpressions, RetargetConfig};
pub use hand::{compute_hand_rotation, FingerJoint, FingerName, FingerRotationSet, HandRotationSet, HandSide};
pub use landmark::{DetectionStatus, HolisticFrame, Landmark, LandmarkSet, LatestFrameSlot};
pub use math::JointRotation;
pub use model::AvatarRuntime;
pub use morph::{Expression, ExpressionManager, LookAt};
pub use recording::{RecordedFrame, Recording};
pub use skeleton::{AxisFlip, Bone, BoneManager, HumanoidBone, RotationBlender, SmoothingCurve};
pub use solver::{FaceSolution, FaceSolver, PoseRotationSet, PoseSolver, SolverOptions};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MocapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Recording error: {0}")]
    Recording(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MocapError>;
