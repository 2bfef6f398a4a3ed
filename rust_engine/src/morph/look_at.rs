//! 视线目标

use glam::Vec3;

use crate::solver::Pupil;

/// 视线目标点，向由瞳孔偏移推得的目的地缓动
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LookAt {
    position: Vec3,
    destination: Vec3,
}

impl LookAt {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由瞳孔偏移设置目的地：(-scale * x, scale * y, 0)
    pub fn set_pupil(&mut self, pupil: Pupil, scale: f32) {
        let destination = Vec3::new(-scale * pupil.x, scale * pupil.y, 0.0);
        if destination.is_finite() {
            self.destination = destination;
        }
    }

    /// 向目的地缓动
    pub fn ease(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.position = self.position.lerp(self.destination, factor.min(1.0));
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn destination(&self) -> Vec3 {
        self.destination
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_toward_pupil() {
        let mut look_at = LookAt::new();
        look_at.set_pupil(Pupil { x: 0.5, y: 0.25 }, 2.0);
        assert_eq!(look_at.destination(), Vec3::new(-1.0, 0.5, 0.0));

        look_at.ease(0.5);
        assert!((look_at.position() - Vec3::new(-0.5, 0.25, 0.0)).length() < 1e-6);
        look_at.ease(1.0);
        assert!((look_at.position() - look_at.destination()).length() < 1e-6);
    }
}
