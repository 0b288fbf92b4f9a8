use super::Image;
use std::rc::Rc;

/// Shared animation frames. Sprites hold `Rc` clones of individual frames;
/// nobody mutates a published frame.
#[derive(Clone, Debug, Default)]
pub struct SpriteSheet {
    frames: Vec<Rc<Image>>,
}

impl SpriteSheet {
    pub fn from_images(images: Vec<Image>) -> Self {
        Self {
            frames: images.into_iter().map(Rc::new).collect(),
        }
    }

    /// Cut a strip into `frame_w × frame_h` cells, row-major. Partial
    /// cells at the right and bottom edges are dropped.
    pub fn from_strip(strip: &Image, frame_w: i32, frame_h: i32) -> Self {
        if frame_w <= 0 || frame_h <= 0 {
            return Self::default();
        }
        let mut frames = Vec::new();
        for cy in 0..strip.height() / frame_h {
            for cx in 0..strip.width() / frame_w {
                frames.push(strip.sub_image(cx * frame_w, cy * frame_h, frame_w, frame_h));
            }
        }
        Self::from_images(frames)
    }

    /// Panics on a bad index: frame numbers come from authored content.
    #[inline]
    pub fn frame(&self, i: usize) -> Rc<Image> {
        Rc::clone(&self.frames[i])
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<&Rc<Image>> {
        self.frames.get(i)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn blit_frame(&self, dst: &mut Image, i: usize, x: i32, y: i32) {
        dst.blit_all(&self.frames[i], x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Color;

    #[test]
    fn strip_cuts_row_major() {
        let mut strip = Image::new(5, 4);
        strip.set(2, 0, Color::WHITE);
        strip.set(0, 2, Color::BLACK);
        let sheet = SpriteSheet::from_strip(&strip, 2, 2);
        assert_eq!(sheet.len(), 4);
        assert_eq!(sheet.frame(1).pixel(0, 0), Color::WHITE);
        assert_eq!(sheet.frame(2).pixel(0, 0), Color::BLACK);
    }

    #[test]
    fn frames_are_shared() {
        let sheet = SpriteSheet::from_images(vec![Image::new(1, 1)]);
        let a = sheet.frame(0);
        let b = sheet.frame(0);
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    #[should_panic]
    fn bad_frame_index_panics() {
        SpriteSheet::default().frame(3);
    }
}
