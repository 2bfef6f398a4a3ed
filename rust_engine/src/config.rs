//! 重定向配置
//!
//! 所有参数扁平化，构造运行时时显式传入，运行中可通过 setter 修改。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calibration::OffsetConfig;
use crate::morph::Expression;
use crate::skeleton::{AxisFlip, SmoothingCurve};
use crate::solver::SolverOptions;
use crate::{MocapError, Result};

/// 表情输入模式（互斥）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// 使用操作者手动设定的表情值
    Manual,
    /// 使用面部解算结果
    #[default]
    Live,
}

/// 手动表情值，均在 [0, 1]
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ManualExpressions {
    pub aa: f32,
    pub ih: f32,
    pub ee: f32,
    pub oh: f32,
    pub ou: f32,
    pub blink_left: f32,
    pub blink_right: f32,
    pub angry: f32,
    pub sad: f32,
    pub happy: f32,
}

impl ManualExpressions {
    pub fn value(&self, expression: Expression) -> f32 {
        match expression {
            Expression::Aa => self.aa,
            Expression::Ih => self.ih,
            Expression::Ee => self.ee,
            Expression::Oh => self.oh,
            Expression::Ou => self.ou,
            Expression::BlinkLeft => self.blink_left,
            Expression::BlinkRight => self.blink_right,
            Expression::Angry => self.angry,
            Expression::Sad => self.sad,
            Expression::Happy => self.happy,
        }
    }

    pub fn set_value(&mut self, expression: Expression, value: f32) {
        let slot = match expression {
            Expression::Aa => &mut self.aa,
            Expression::Ih => &mut self.ih,
            Expression::Ee => &mut self.ee,
            Expression::Oh => &mut self.oh,
            Expression::Ou => &mut self.ou,
            Expression::BlinkLeft => &mut self.blink_left,
            Expression::BlinkRight => &mut self.blink_right,
            Expression::Angry => &mut self.angry,
            Expression::Sad => &mut self.sad,
            Expression::Happy => &mut self.happy,
        };
        if value.is_finite() {
            *slot = value.clamp(0.0, 1.0);
        }
    }
}

/// 重定向配置（扁平化）
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetargetConfig {
    // ========== 平滑 ==========
    /// 响应速度 k，混合系数 = k * dt，默认 5.0
    pub responsiveness: f32,
    /// 混合系数曲线，默认 linear
    pub smoothing: SmoothingCurve,

    // ========== 输入 ==========
    /// 表情输入模式，默认 live
    pub input_mode: InputMode,
    /// 手动模式下的表情值，默认全 0
    pub manual_expressions: ManualExpressions,
    /// 传给外部解算器的参数，默认 640x480
    pub solver: SolverOptions,

    // ========== 校准 ==========
    /// 四肢偏移，默认上臂 [1, 0.42, 1]、前臂 [1, 1.32, 1]、手 [1, 0.26, 1]
    pub offsets: OffsetConfig,
    /// 头部旋转映射到脖子的逐轴修正，默认 {0.3, -0.3, -0.3}
    pub neck_flip: AxisFlip,
    /// 躯干旋转映射到脊柱/髋部的逐轴修正，默认 {0.1, -0.1, -0.1}
    pub torso_flip: AxisFlip,

    // ========== 视线 ==========
    /// 瞳孔偏移到视线目标的缩放，默认 2.0
    pub gaze_scale: f32,

    // ========== 手腕 ==========
    /// 用手部关键点估计的手腕朝向驱动手骨骼，默认 false（使用躯干解算结果）
    pub wrist_from_hand_landmarks: bool,
}

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            responsiveness: 5.0,
            smoothing: SmoothingCurve::Linear,
            input_mode: InputMode::Live,
            manual_expressions: ManualExpressions::default(),
            solver: SolverOptions::default(),
            offsets: OffsetConfig::default(),
            neck_flip: AxisFlip::NECK,
            torso_flip: AxisFlip::TORSO,
            gaze_scale: 2.0,
            wrist_from_hand_landmarks: false,
        }
    }
}

impl RetargetConfig {
    /// 从 JSON 文件加载，缺省字段取默认值
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        log::info!("加载重定向配置: {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// 检查数值合法性
    pub fn validate(&self) -> Result<()> {
        if !self.responsiveness.is_finite() || self.responsiveness < 0.0 {
            return Err(MocapError::Config(format!(
                "responsiveness must be a non-negative number, got {}",
                self.responsiveness
            )));
        }
        if !self.gaze_scale.is_finite() {
            return Err(MocapError::Config("gaze_scale must be finite".to_string()));
        }
        for (name, flip) in [("neck_flip", self.neck_flip), ("torso_flip", self.torso_flip)] {
            if !flip.as_vec3().is_finite() {
                return Err(MocapError::Config(format!("{} must be finite", name)));
            }
        }
        let [closed, open] = self.solver.blink_range;
        if !(closed.is_finite() && open.is_finite()) || closed > open {
            return Err(MocapError::Config(format!(
                "blink_range [{}, {}] is not an ordered interval",
                closed, open
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::OffsetVector;

    #[test]
    fn test_defaults() {
        let config = RetargetConfig::default();
        assert_eq!(config.responsiveness, 5.0);
        assert_eq!(config.input_mode, InputMode::Live);
        assert_eq!(config.neck_flip, AxisFlip::NECK);
        assert_eq!(config.solver.image_width, 640);
        assert!(!config.wrist_from_hand_landmarks);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "responsiveness": 8.0,
            "input_mode": "manual",
            "smoothing": "exponential",
            "manual_expressions": {"aa": 0.5, "blinkLeft": 1.0},
            "offsets": {"upper_arm": [1, 1, 1]}
        }"#;
        let config = RetargetConfig::from_json_str(json).unwrap();
        assert_eq!(config.responsiveness, 8.0);
        assert_eq!(config.input_mode, InputMode::Manual);
        assert_eq!(config.smoothing, SmoothingCurve::Exponential);
        assert_eq!(config.manual_expressions.value(Expression::Aa), 0.5);
        assert_eq!(config.manual_expressions.value(Expression::BlinkLeft), 1.0);
        assert_eq!(config.offsets.upper_arm, OffsetVector::ONE);
        assert_eq!(config.offsets.hand, OffsetConfig::default().hand);
        assert_eq!(config.gaze_scale, 2.0);
    }

    #[test]
    fn test_invalid_rejected() {
        let err = RetargetConfig::from_json_str(r#"{"responsiveness": -1.0}"#).unwrap_err();
        assert!(matches!(err, MocapError::Config(_)));
        let err = RetargetConfig::from_json_str(r#"{"solver": {"blink_range": [0.9, 0.1]}}"#).unwrap_err();
        assert!(matches!(err, MocapError::Config(_)));
        assert!(matches!(
            RetargetConfig::from_json_str("{not json").unwrap_err(),
            MocapError::Json(_)
        ));
    }

    #[test]
    fn test_manual_set_value_clamped() {
        let mut manual = ManualExpressions::default();
        manual.set_value(Expression::Happy, 1.5);
        manual.set_value(Expression::Sad, f32::NAN);
        assert_eq!(manual.happy, 1.0);
        assert_eq!(manual.sad, 0.0);
    }
}
