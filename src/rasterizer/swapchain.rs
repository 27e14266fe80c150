//! Double-buffered pair of frame surfaces

use super::Framebuffer;

/// Two framebuffers with exchangeable back/front roles.
///
/// `swap` only flips which index is "back"; pixel data never moves.
pub struct Swapchain {
    surfaces: [Framebuffer; 2],
    back: usize,
}

impl Swapchain {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            surfaces: [Framebuffer::new(width, height), Framebuffer::new(width, height)],
            back: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.surfaces[0].width()
    }

    pub fn height(&self) -> usize {
        self.surfaces[0].height()
    }

    /// Surface currently being rendered into
    pub fn back(&self) -> &Framebuffer {
        &self.surfaces[self.back]
    }

    pub fn back_mut(&mut self) -> &mut Framebuffer {
        &mut self.surfaces[self.back]
    }

    /// Surface currently handed to presentation
    pub fn front(&self) -> &Framebuffer {
        &self.surfaces[self.back ^ 1]
    }

    pub fn swap(&mut self) {
        self.back ^= 1;
    }

    /// Replace both surfaces with fresh ones of the new size, keeping roles
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width() && height == self.height() {
            return;
        }
        log::debug!(
            "resizing swapchain {}x{} -> {}x{}",
            self.width(),
            self.height(),
            width,
            height
        );
        self.surfaces = [Framebuffer::new(width, height), Framebuffer::new(width, height)];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Color;

    #[test]
    fn test_swap_exchanges_roles() {
        let mut chain = Swapchain::new(4, 4);
        chain.back_mut().clear(Color::RED, 1.0);
        chain.swap();
        chain.back_mut().clear(Color::BLUE, 1.0);

        assert_eq!(chain.front().pixel(0, 0), Some(Color::RED));
        assert_eq!(chain.back().pixel(0, 0), Some(Color::BLUE));

        chain.swap();
        assert_eq!(chain.front().pixel(0, 0), Some(Color::BLUE));
        assert_eq!(chain.back().pixel(0, 0), Some(Color::RED));
    }

    #[test]
    fn test_swap_does_not_move_pixels() {
        let mut chain = Swapchain::new(2, 2);
        chain.back_mut().clear(Color::GREEN, 1.0);
        let back_ptr = chain.back().pixels().as_ptr();
        chain.swap();
        assert_eq!(chain.front().pixels().as_ptr(), back_ptr);
    }

    #[test]
    fn test_resize_keeps_roles() {
        let mut chain = Swapchain::new(2, 2);
        chain.swap();
        let back_before = chain.back;
        chain.resize(5, 3);
        assert_eq!(chain.back, back_before);
        assert_eq!((chain.width(), chain.height()), (5, 3));
        assert_eq!(chain.front().pixels().len(), 15);
        assert_eq!(chain.back().depth_pixels().len(), 15);
    }
}
