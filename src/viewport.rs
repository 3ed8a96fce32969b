//! Surface size tracking.
//!
//! The viewport remembers the last size it applied so repeated resize
//! notifications with the same dimensions leave everything untouched.

use crate::camera::Projection;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_zero(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Applies a new size to the viewport and the projection's aspect ratio.
    ///
    /// Zero-sized dimensions (minimised windows, collapsed containers) are
    /// ignored. Returns `true` when the size actually changed and the caller has
    /// to reconfigure the surface and recreate size-dependent textures.
    pub fn resize(&mut self, width: u32, height: u32, projection: &mut Projection) -> bool {
        if width == 0 || height == 0 {
            log::debug!("ignoring zero-sized viewport {}x{}", width, height);
            return false;
        }
        if (width, height) == (self.width, self.height) {
            return false;
        }
        self.width = width;
        self.height = height;
        projection.resize(width, height);
        true
    }
}
