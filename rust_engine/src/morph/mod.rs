//! 表情权重与视线

mod look_at;
mod manager;

pub use look_at::LookAt;
pub use manager::ExpressionManager;

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// 表情标识（固定集合，避免运行时拼接名称查找失败）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Expression {
    Aa,
    Ih,
    Ee,
    Oh,
    Ou,
    BlinkLeft,
    BlinkRight,
    Angry,
    Sad,
    Happy,
}

/// 名称映射表
static NAME_TABLE: Lazy<HashMap<&'static str, Expression>> = Lazy::new(|| {
    Expression::ALL.iter().map(|&e| (e.name(), e)).collect()
});

impl Expression {
    pub const COUNT: usize = 10;

    pub const ALL: [Expression; Self::COUNT] = [
        Expression::Aa,
        Expression::Ih,
        Expression::Ee,
        Expression::Oh,
        Expression::Ou,
        Expression::BlinkLeft,
        Expression::BlinkRight,
        Expression::Angry,
        Expression::Sad,
        Expression::Happy,
    ];

    /// 口型
    pub const VISEMES: [Expression; 5] = [
        Expression::Aa,
        Expression::Ih,
        Expression::Ee,
        Expression::Oh,
        Expression::Ou,
    ];

    /// 情绪（每帧直接设置，不插值）
    pub const EMOTIONS: [Expression; 3] = [Expression::Angry, Expression::Sad, Expression::Happy];

    /// 表情预设名
    pub fn name(self) -> &'static str {
        match self {
            Expression::Aa => "aa",
            Expression::Ih => "ih",
            Expression::Ee => "ee",
            Expression::Oh => "oh",
            Expression::Ou => "ou",
            Expression::BlinkLeft => "blinkLeft",
            Expression::BlinkRight => "blinkRight",
            Expression::Angry => "angry",
            Expression::Sad => "sad",
            Expression::Happy => "happy",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        NAME_TABLE.get(name).copied()
    }

    pub fn is_emotion(self) -> bool {
        Self::EMOTIONS.contains(&self)
    }

    fn index(self) -> usize {
        self as usize
    }
}
