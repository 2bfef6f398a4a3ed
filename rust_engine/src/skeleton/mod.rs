//! 人形骨骼与旋转混合

mod blender;
mod bone;
mod humanoid;
mod manager;

pub use blender::{blend_factor, AxisFlip, RotationBlender, SmoothingCurve};
pub use bone::Bone;
pub use humanoid::{finger_bone_name, HumanoidBone};
pub use manager::BoneManager;
