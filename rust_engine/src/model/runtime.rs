//! 虚拟形象运行时
//!
//! 检测结果到达时只解算并缓存目标；每个渲染帧调用 `update`，
//! 将缓存的目标按帧间隔平滑混合到骨骼与表情上。

use glam::Vec3;

use crate::calibration::{mirror_pose, LimbSegment, OffsetConfig, OffsetVector};
use crate::config::{InputMode, RetargetConfig};
use crate::hand::{compute_hand_rotation, HandRotationSet, HandSide};
use crate::landmark::{DetectionStatus, HolisticFrame, LandmarkSet, LatestFrameSlot};
use crate::math::JointRotation;
use crate::morph::{Expression, ExpressionManager, LookAt};
use crate::skeleton::{blend_factor, finger_bone_name, AxisFlip, BoneManager, HumanoidBone, RotationBlender};
use crate::solver::{FaceSolution, FaceSolver, PoseRotationSet, PoseSolver};

/// 虚拟形象运行时
pub struct AvatarRuntime {
    // 子系统
    pub bone_manager: BoneManager,
    pub expression_manager: ExpressionManager,
    look_at: LookAt,
    blender: RotationBlender,

    config: RetargetConfig,

    // 外部解算器
    pose_solver: Option<Box<dyn PoseSolver>>,
    face_solver: Option<Box<dyn FaceSolver>>,

    // 最近一次检测结果解算出的目标（未镜像）
    rigged_face: Option<FaceSolution>,
    rigged_pose: Option<PoseRotationSet>,
    rigged_left_hand: Option<HandRotationSet>,
    rigged_right_hand: Option<HandRotationSet>,

    detection: DetectionStatus,
    frame_count: u64,
    first_result_logged: bool,
}

impl AvatarRuntime {
    /// 创建运行时，骨骼由宿主预先填充
    pub fn new(bone_manager: BoneManager, config: RetargetConfig) -> Self {
        log::info!(
            "创建虚拟形象运行时: {} 根骨骼, 输入模式 {:?}",
            bone_manager.bone_count(),
            config.input_mode
        );
        Self {
            bone_manager,
            expression_manager: ExpressionManager::new(),
            look_at: LookAt::new(),
            blender: RotationBlender::new(),
            config,
            pose_solver: None,
            face_solver: None,
            rigged_face: None,
            rigged_pose: None,
            rigged_left_hand: None,
            rigged_right_hand: None,
            detection: DetectionStatus::default(),
            frame_count: 0,
            first_result_logged: false,
        }
    }

    /// 同时指定躯干与面部解算器
    pub fn with_solvers(mut self, pose_solver: Box<dyn PoseSolver>, face_solver: Box<dyn FaceSolver>) -> Self {
        self.pose_solver = Some(pose_solver);
        self.face_solver = Some(face_solver);
        self
    }

    pub fn set_pose_solver(&mut self, solver: Box<dyn PoseSolver>) {
        self.pose_solver = Some(solver);
    }

    pub fn set_face_solver(&mut self, solver: Box<dyn FaceSolver>) {
        self.face_solver = Some(solver);
    }

    // ========== 配置 ==========

    pub fn config(&self) -> &RetargetConfig {
        &self.config
    }

    /// 整体替换配置，下一帧生效
    pub fn set_config(&mut self, config: RetargetConfig) {
        self.config = config;
    }

    pub fn set_input_mode(&mut self, mode: InputMode) {
        if self.config.input_mode != mode {
            log::info!("表情输入模式切换为 {:?}", mode);
        }
        self.config.input_mode = mode;
    }

    /// 设置手动表情值（手动模式下插值，情绪表情两种模式下都直接生效）
    pub fn set_manual_expression(&mut self, expression: Expression, value: f32) {
        self.config.manual_expressions.set_value(expression, value);
    }

    pub fn offsets(&self) -> &OffsetConfig {
        &self.config.offsets
    }

    pub fn set_offsets(&mut self, offsets: OffsetConfig) {
        self.config.offsets = offsets;
    }

    /// 设置上臂偏移，含非有限值时保留原值
    pub fn set_upper_arm_offset(&mut self, x: f32, y: f32, z: f32) {
        self.set_segment_offset(LimbSegment::UpperArm, x, y, z);
    }

    /// 设置前臂偏移
    pub fn set_lower_arm_offset(&mut self, x: f32, y: f32, z: f32) {
        self.set_segment_offset(LimbSegment::LowerArm, x, y, z);
    }

    /// 设置手部偏移
    pub fn set_hand_offset(&mut self, x: f32, y: f32, z: f32) {
        self.set_segment_offset(LimbSegment::Hand, x, y, z);
    }

    /// 恢复默认偏移
    pub fn reset_offsets(&mut self) {
        self.config.offsets = OffsetConfig::default();
    }

    fn set_segment_offset(&mut self, segment: LimbSegment, x: f32, y: f32, z: f32) {
        match OffsetVector::new(x, y, z) {
            Some(offset) => self.config.offsets.set(segment, offset),
            None => log::warn!("忽略非法偏移 {:?}: ({}, {}, {})", segment, x, y, z),
        }
    }

    // ========== 检测结果 ==========

    /// 接收一帧检测结果，调用解算器并替换目标
    ///
    /// 本帧缺失的部位目标被清除，对应骨骼保持当前朝向。
    pub fn on_results(&mut self, frame: &HolisticFrame) {
        let face = frame
            .face_landmarks
            .as_ref()
            .and_then(|landmarks| self.solve_face(landmarks));
        let pose = match (&frame.pose_world_landmarks, &frame.pose_landmarks) {
            (Some(world), Some(image)) => self.solve_pose(world, image),
            _ => None,
        };
        self.on_solved_results(frame, face, pose);
    }

    /// 接收已解算的结果（录制回放等场景，不经过解算器）
    pub fn on_solved_results(
        &mut self,
        frame: &HolisticFrame,
        face: Option<FaceSolution>,
        pose: Option<PoseRotationSet>,
    ) {
        self.detection = DetectionStatus::from_frame(frame);
        if !self.first_result_logged && !frame.is_empty() {
            self.first_result_logged = true;
            log::info!("收到首帧检测结果: {:?}", self.detection);
        }

        self.rigged_face = face.filter(|f| {
            let ok = f.is_finite();
            if !ok {
                log::debug!("丢弃含非有限值的面部解算结果");
            }
            ok
        });
        self.rigged_pose = pose.filter(|p| {
            let ok = p.is_finite();
            if !ok {
                log::debug!("丢弃含非有限值的躯干解算结果");
            }
            ok
        });
        self.rigged_left_hand = frame.left_hand_landmarks.as_ref().map(compute_hand_rotation);
        self.rigged_right_hand = frame.right_hand_landmarks.as_ref().map(compute_hand_rotation);
    }

    /// 仅替换面部目标
    pub fn submit_face(&mut self, face: &LandmarkSet) {
        self.rigged_face = self.solve_face(face).filter(FaceSolution::is_finite);
    }

    /// 仅替换躯干目标
    pub fn submit_pose(&mut self, world: &LandmarkSet, image: &LandmarkSet) {
        self.rigged_pose = self.solve_pose(world, image).filter(PoseRotationSet::is_finite);
    }

    /// 仅替换单只手的目标
    pub fn submit_hand(&mut self, side: HandSide, landmarks: &LandmarkSet) {
        let rotations = Some(compute_hand_rotation(landmarks));
        match side {
            HandSide::Left => self.rigged_left_hand = rotations,
            HandSide::Right => self.rigged_right_hand = rotations,
        }
    }

    fn solve_face(&self, landmarks: &LandmarkSet) -> Option<FaceSolution> {
        let solver = self.face_solver.as_ref()?;
        solver.solve(landmarks, &self.config.solver)
    }

    fn solve_pose(&self, world: &LandmarkSet, image: &LandmarkSet) -> Option<PoseRotationSet> {
        let solver = self.pose_solver.as_ref()?;
        solver.solve(world, image, &self.config.solver)
    }

    // ========== 帧更新 ==========

    /// 取走缓冲槽中的最新帧（如有）后更新
    pub fn update_from_slot(&mut self, slot: &LatestFrameSlot, delta_time: f32) {
        if let Some(frame) = slot.take() {
            self.on_results(&frame);
        }
        self.update(delta_time);
    }

    /// 帧更新：混合表情、视线与骨骼旋转
    pub fn update(&mut self, delta_time: f32) {
        let factor = blend_factor(delta_time, self.config.responsiveness, self.config.smoothing);

        self.update_expressions(factor);
        self.update_pose_bones(factor);
        self.update_hand_bones(HandSide::Left, factor);
        self.update_hand_bones(HandSide::Right, factor);

        self.bone_manager.update_transforms();
        self.frame_count += 1;
    }

    fn update_expressions(&mut self, factor: f32) {
        let manual = self.config.manual_expressions;

        // 情绪表情直接设置
        for expression in Expression::EMOTIONS {
            self.expression_manager.set_weight(expression, manual.value(expression));
        }

        match self.config.input_mode {
            InputMode::Manual => {
                for expression in Expression::ALL.into_iter().filter(|e| !e.is_emotion()) {
                    self.expression_manager
                        .lerp_toward(expression, manual.value(expression), factor);
                }
            }
            InputMode::Live => {
                let Some(face) = self.rigged_face else {
                    return;
                };
                let shape = face.mouth.shape;
                let targets = [
                    (Expression::Aa, shape.a),
                    (Expression::Ih, shape.i),
                    (Expression::Ee, shape.e),
                    (Expression::Oh, shape.o),
                    (Expression::Ou, shape.u),
                    (Expression::BlinkLeft, 1.0 - face.eye.l),
                    (Expression::BlinkRight, 1.0 - face.eye.r),
                ];
                for (expression, target) in targets {
                    self.expression_manager.lerp_toward(expression, target, factor);
                }

                if let Some(pupil) = face.pupil {
                    self.look_at.set_pupil(pupil, self.config.gaze_scale);
                }
                self.look_at.ease(factor);

                if let Some(head) = face.head {
                    let flip = self.config.neck_flip;
                    self.rotate(HumanoidBone::Neck.name(), head, factor, flip);
                }
            }
        }
    }

    fn update_pose_bones(&mut self, factor: f32) {
        let Some(corrected) = self.corrected_pose() else {
            return;
        };
        let torso = self.config.torso_flip;

        self.rotate(HumanoidBone::Chest.name(), corrected.spine, factor, torso);
        self.rotate(HumanoidBone::Spine.name(), corrected.spine, factor, torso);
        self.rotate(HumanoidBone::Hips.name(), corrected.hips, factor, torso);

        let limbs = [
            (HumanoidBone::LeftUpperArm, corrected.left_upper_arm),
            (HumanoidBone::LeftLowerArm, corrected.left_lower_arm),
            (HumanoidBone::RightUpperArm, corrected.right_upper_arm),
            (HumanoidBone::RightLowerArm, corrected.right_lower_arm),
        ];
        for (bone, target) in limbs {
            self.rotate(bone.name(), target, factor, AxisFlip::IDENTITY);
        }

        for (side, target) in [(HandSide::Left, corrected.left_hand), (HandSide::Right, corrected.right_hand)] {
            // 启用手腕估计且本帧有结果时由手部关键点驱动
            if self.wrist_estimate(side).is_some() {
                continue;
            }
            self.rotate(HumanoidBone::hand(side).name(), target, factor, AxisFlip::IDENTITY);
        }
    }

    fn update_hand_bones(&mut self, side: HandSide, factor: f32) {
        let Some(hand) = self.hand_rotation(side).copied() else {
            return;
        };

        if let Some(wrist) = self.wrist_estimate(side) {
            self.rotate(HumanoidBone::hand(side).name(), wrist, factor, AxisFlip::IDENTITY);
        }

        for (finger, joint, target) in hand.joints() {
            let name = finger_bone_name(side, finger, joint);
            self.rotate(&name, target, factor, AxisFlip::IDENTITY);
        }
    }

    fn wrist_estimate(&self, side: HandSide) -> Option<JointRotation> {
        if !self.config.wrist_from_hand_landmarks {
            return None;
        }
        self.hand_rotation(side).and_then(|hand| hand.wrist)
    }

    fn rotate(&mut self, name: &str, target: JointRotation, factor: f32, flip: AxisFlip) {
        self.blender
            .apply_target(&mut self.bone_manager, name, target, factor, flip);
    }

    // ========== 查询 ==========

    /// 当前骨骼朝向（欧拉角）
    pub fn bone_rotation(&self, name: &str) -> Option<JointRotation> {
        self.bone_manager.bone_rotation(name).map(JointRotation::from_quat)
    }

    pub fn expression_weight(&self, expression: Expression) -> f32 {
        self.expression_manager.get_weight(expression)
    }

    pub fn look_at_position(&self) -> Vec3 {
        self.look_at.position()
    }

    pub fn detection_status(&self) -> DetectionStatus {
        self.detection
    }

    /// 当前躯干目标经镜像与偏移校准后的结果
    pub fn corrected_pose(&self) -> Option<PoseRotationSet> {
        self.rigged_pose
            .as_ref()
            .map(|pose| mirror_pose(pose, &self.config.offsets))
    }

    pub fn face_solution(&self) -> Option<&FaceSolution> {
        self.rigged_face.as_ref()
    }

    pub fn hand_rotation(&self, side: HandSide) -> Option<&HandRotationSet> {
        match side {
            HandSide::Left => self.rigged_left_hand.as_ref(),
            HandSide::Right => self.rigged_right_hand.as_ref(),
        }
    }

    /// 缺失（已告警）的骨骼名
    pub fn missing_bones(&self) -> Vec<String> {
        let mut names: Vec<String> = self.blender.missing_bones().map(str::to_string).collect();
        names.sort();
        names
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
