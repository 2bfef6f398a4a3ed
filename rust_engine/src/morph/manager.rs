//! 表情管理器

use super::Expression;

/// 表情权重管理器
///
/// 权重始终在 [0, 1]，由 `lerp_toward` 按混合系数向目标线性逼近。
#[derive(Clone, Debug, Default)]
pub struct ExpressionManager {
    weights: [f32; Expression::COUNT],
}

impl ExpressionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取权重
    pub fn get_weight(&self, expression: Expression) -> f32 {
        self.weights[expression.index()]
    }

    /// 直接设置权重（非有限值忽略）
    pub fn set_weight(&mut self, expression: Expression, weight: f32) {
        if weight.is_finite() {
            self.weights[expression.index()] = weight.clamp(0.0, 1.0);
        }
    }

    /// 向目标权重线性插值
    pub fn lerp_toward(&mut self, expression: Expression, target: f32, factor: f32) {
        if !target.is_finite() || !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let target = target.clamp(0.0, 1.0);
        let current = self.get_weight(expression);
        let next = current + (target - current) * factor.min(1.0);
        self.set_weight(expression, next);
    }

    /// 重置所有权重
    pub fn reset_all_weights(&mut self) {
        self.weights = [0.0; Expression::COUNT];
    }

    pub fn iter(&self) -> impl Iterator<Item = (Expression, f32)> + '_ {
        Expression::ALL.into_iter().map(move |e| (e, self.get_weight(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_toward() {
        let mut manager = ExpressionManager::new();
        manager.lerp_toward(Expression::Aa, 1.0, 0.25);
        assert!((manager.get_weight(Expression::Aa) - 0.25).abs() < 1e-6);
        manager.lerp_toward(Expression::Aa, 1.0, 0.25);
        assert!((manager.get_weight(Expression::Aa) - 0.4375).abs() < 1e-6);
        manager.lerp_toward(Expression::Aa, 0.0, 1.0);
        assert_eq!(manager.get_weight(Expression::Aa), 0.0);
    }

    #[test]
    fn test_clamped_and_non_finite() {
        let mut manager = ExpressionManager::new();
        manager.set_weight(Expression::Happy, 3.0);
        assert_eq!(manager.get_weight(Expression::Happy), 1.0);
        manager.set_weight(Expression::Happy, f32::NAN);
        assert_eq!(manager.get_weight(Expression::Happy), 1.0);
        manager.lerp_toward(Expression::Ih, f32::INFINITY, 0.5);
        assert_eq!(manager.get_weight(Expression::Ih), 0.0);
        // 目标超出范围时先截断
        manager.lerp_toward(Expression::Ih, -2.0, 1.0);
        assert_eq!(manager.get_weight(Expression::Ih), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut manager = ExpressionManager::new();
        manager.set_weight(Expression::Sad, 0.7);
        manager.reset_all_weights();
        assert!(manager.iter().all(|(_, w)| w == 0.0));
    }
}
