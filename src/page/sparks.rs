//! Floating CSS particles in the hero section.

use rand::Rng;

pub const SPARK_COUNT: usize = 30;

/// One particle; lengths in px, position in percent, times in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spark {
    pub width: f32,
    pub height: f32,
    pub alpha: f32,
    pub left: f32,
    pub top: f32,
    pub duration: f32,
    /// Negative, so the particles start mid-animation.
    pub delay: f32,
}

impl Spark {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            width: rng.random_range(1.0..4.0),
            height: rng.random_range(1.0..4.0),
            alpha: rng.random_range(0.1..0.5),
            left: rng.random_range(0.0..100.0),
            top: rng.random_range(0.0..100.0),
            duration: rng.random_range(4.0..10.0),
            delay: -rng.random_range(0.0_f32..6.0),
        }
    }

    pub fn css_text(&self) -> String {
        format!(
            "position:absolute;width:{}px;height:{}px;background:rgba(230,57,70,{});\
             border-radius:50%;left:{}%;top:{}%;\
             animation:particleFloat {}s ease-in-out infinite;animation-delay:{}s;",
            self.width, self.height, self.alpha, self.left, self.top, self.duration, self.delay
        )
    }
}

pub fn sparks<R: Rng>(rng: &mut R) -> Vec<Spark> {
    (0..SPARK_COUNT).map(|_| Spark::random(rng)).collect()
}
