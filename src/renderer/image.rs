//! Owned `Color` pixel buffer and the blit / overlap primitives every
//! layer and sprite draws through.
//!
//! All rectangle operations clip against both buffers first; a clipped
//! width or height of zero (or less) makes the call a no-op.

use super::Color;

/// Which source axes repeat instead of clipping.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wrap {
    #[default]
    None,
    Horizontal,
    Both,
}

impl Wrap {
    #[inline]
    fn x(self) -> bool {
        !matches!(self, Wrap::None)
    }
    #[inline]
    fn y(self) -> bool {
        matches!(self, Wrap::Both)
    }
}

/// How a source pixel combines with the destination.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    /// Opaque source pixels overwrite, transparent ones are skipped.
    #[default]
    Normal,
    /// `dst += src` on every pixel, transparency ignored.
    Additive,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("pixel buffer of {len} entries does not match {width}x{height}")]
    SizeMismatch { width: i32, height: i32, len: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: i32,
    height: i32,
    data: Vec<Color>,
}

/// Clip one axis of a copy between two spans.
///
/// `a` and `b` are the start coordinates in each span, `len` the run
/// length. A `None` span length means that span wraps and is never
/// clipped. Returns the adjusted `(a, b, len)` or `None` if nothing is
/// left.
fn clip_axis(
    a_len: Option<i32>,
    b_len: Option<i32>,
    mut a: i32,
    mut b: i32,
    mut len: i32,
) -> Option<(i32, i32, i32)> {
    if let Some(n) = a_len {
        if a < 0 {
            b -= a;
            len += a;
            a = 0;
        }
        len = len.min(n - a);
    }
    if let Some(n) = b_len {
        if b < 0 {
            a -= b;
            len += b;
            b = 0;
        }
        len = len.min(n - b);
    }
    (len > 0).then_some((a, b, len))
}

impl Image {
    /// Transparent `width × height` image. Negative sizes collapse to 0.
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    pub fn filled(width: i32, height: i32, c: Color) -> Self {
        let (width, height) = (width.max(0), height.max(0));
        Self {
            width,
            height,
            data: vec![c; (width * height) as usize],
        }
    }

    /// Wrap externally decoded pixels; the length must be `width * height`.
    pub fn from_data(width: i32, height: i32, data: Vec<Color>) -> Result<Self, ImageError> {
        if width < 0 || height < 0 || data.len() != (width as usize) * (height as usize) {
            return Err(ImageError::SizeMismatch {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &[Color] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [Color] {
        &mut self.data
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    #[inline]
    fn row(&self, x: i32, y: i32, len: i32) -> &[Color] {
        let i = self.index(x, y);
        &self.data[i..i + len as usize]
    }

    #[inline]
    fn row_mut(&mut self, x: i32, y: i32, len: i32) -> &mut [Color] {
        let i = self.index(x, y);
        &mut self.data[i..i + len as usize]
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        self.in_bounds(x, y).then(|| self.data[self.index(x, y)])
    }

    /// Panics outside the image.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Color {
        assert!(self.in_bounds(x, y), "pixel ({x},{y}) outside {}x{}", self.width, self.height);
        self.data[self.index(x, y)]
    }

    /// Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: i32, y: i32, c: Color) {
        if self.in_bounds(x, y) {
            let i = self.index(x, y);
            self.data[i] = c;
        }
    }

    pub fn clear(&mut self) {
        self.fill(Color::TRANSPARENT);
    }

    pub fn fill(&mut self, c: Color) {
        self.data.fill(c);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Color) {
        let Some((x, _, w)) = clip_axis(Some(self.width), None, x, 0, w) else { return };
        let Some((y, _, h)) = clip_axis(Some(self.height), None, y, 0, h) else { return };
        for row in y..y + h {
            self.row_mut(x, row, w).fill(c);
        }
    }

    pub fn clear_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.fill_rect(x, y, w, h, Color::TRANSPARENT);
    }

    /// Copy of a rectangle; parts outside this image come back transparent.
    pub fn sub_image(&self, x: i32, y: i32, w: i32, h: i32) -> Image {
        let mut out = Image::new(w, h);
        out.blit_fast(self, x, y, 0, 0, w, h);
        out
    }

    /// Become a pixel copy of `other`, reallocating only on a size change.
    pub fn copy_from(&mut self, other: &Image) {
        if self.width == other.width && self.height == other.height {
            self.data.copy_from_slice(&other.data);
        } else {
            *self = other.clone();
        }
    }

    /*──────────────────────────── blits ────────────────────────────*/

    /// Plain transparent-key blit of `src[sx.., sy..]` to `(dx, dy)`.
    #[allow(clippy::too_many_arguments)]
    pub fn blit(&mut self, src: &Image, sx: i32, sy: i32, dx: i32, dy: i32, w: i32, h: i32) {
        self.blit_wrapped(src, sx, sy, dx, dy, w, h, Wrap::None, Blend::Normal);
    }

    /// Whole `src` at `(dx, dy)`.
    pub fn blit_all(&mut self, src: &Image, dx: i32, dy: i32) {
        self.blit(src, 0, 0, dx, dy, src.width, src.height);
    }

    /// Source coordinates wrap on both axes.
    #[allow(clippy::too_many_arguments)]
    pub fn blit_tiled(&mut self, src: &Image, sx: i32, sy: i32, dx: i32, dy: i32, w: i32, h: i32) {
        self.blit_wrapped(src, sx, sy, dx, dy, w, h, Wrap::Both, Blend::Normal);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn blit_additive(&mut self, src: &Image, sx: i32, sy: i32, dx: i32, dy: i32, w: i32, h: i32) {
        self.blit_wrapped(src, sx, sy, dx, dy, w, h, Wrap::None, Blend::Additive);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn blit_additive_tiled(
        &mut self,
        src: &Image,
        sx: i32,
        sy: i32,
        dx: i32,
        dy: i32,
        w: i32,
        h: i32,
    ) {
        self.blit_wrapped(src, sx, sy, dx, dy, w, h, Wrap::Both, Blend::Additive);
    }

    /// Straight row copy, transparency ignored. The caller guarantees the
    /// source region is fully opaque (or that copying holes is wanted).
    #[allow(clippy::too_many_arguments)]
    pub fn blit_fast(&mut self, src: &Image, sx: i32, sy: i32, dx: i32, dy: i32, w: i32, h: i32) {
        let Some((sx, dx, w)) = clip_axis(Some(src.width), Some(self.width), sx, dx, w) else {
            return;
        };
        let Some((sy, dy, h)) = clip_axis(Some(src.height), Some(self.height), sy, dy, h) else {
            return;
        };
        for r in 0..h {
            self.row_mut(dx, dy + r, w).copy_from_slice(src.row(sx, sy + r, w));
        }
    }

    /// General form behind every blit variant.
    #[allow(clippy::too_many_arguments)]
    pub fn blit_wrapped(
        &mut self,
        src: &Image,
        sx: i32,
        sy: i32,
        dx: i32,
        dy: i32,
        w: i32,
        h: i32,
        wrap: Wrap,
        blend: Blend,
    ) {
        if src.width == 0 || src.height == 0 {
            return;
        }
        let sw = (!wrap.x()).then_some(src.width);
        let sh = (!wrap.y()).then_some(src.height);
        let Some((sx, dx, w)) = clip_axis(sw, Some(self.width), sx, dx, w) else { return };
        let Some((sy, dy, h)) = clip_axis(sh, Some(self.height), sy, dy, h) else { return };

        let sx0 = sx.rem_euclid(src.width);
        for r in 0..h {
            let srow = (sy + r).rem_euclid(src.height);
            let dst = self.row_mut(dx, dy + r, w);
            let mut s = sx0;
            for d in dst.iter_mut() {
                let p = src.data[(srow * src.width + s) as usize];
                match blend {
                    Blend::Normal => {
                        if !p.is_transparent() {
                            *d = p;
                        }
                    }
                    Blend::Additive => *d += p,
                }
                s += 1;
                if s == src.width {
                    s = 0;
                }
            }
        }
    }

    /*──────────────────────────── overlap ────────────────────────────*/

    /// True if any opaque pixel of `other`, placed at `(x, y)` in this
    /// image's space, lands on an opaque pixel here.
    pub fn overlaps(&self, other: &Image, x: i32, y: i32) -> bool {
        self.overlaps_wrapped(other, x, y, Wrap::None)
    }

    /// As [`Image::overlaps`], with this image repeating on both axes.
    pub fn overlaps_tiled(&self, other: &Image, x: i32, y: i32) -> bool {
        self.overlaps_wrapped(other, x, y, Wrap::Both)
    }

    pub fn overlaps_wrapped(&self, other: &Image, x: i32, y: i32, wrap: Wrap) -> bool {
        if self.width == 0 || self.height == 0 {
            return false;
        }
        let sw = (!wrap.x()).then_some(self.width);
        let sh = (!wrap.y()).then_some(self.height);
        let Some((ax, bx, w)) = clip_axis(sw, Some(other.width), x, 0, other.width) else {
            return false;
        };
        let Some((ay, by, h)) = clip_axis(sh, Some(other.height), y, 0, other.height) else {
            return false;
        };
        let ax0 = ax.rem_euclid(self.width);
        (0..h).any(|r| {
            let arow = (ay + r).rem_euclid(self.height);
            let mine = &self.data[(arow * self.width) as usize..((arow + 1) * self.width) as usize];
            let theirs = other.row(bx, by + r, w);
            let mut a = ax0;
            theirs.iter().any(|p| {
                let hit = !p.is_transparent() && !mine[a as usize].is_transparent();
                a += 1;
                if a == self.width {
                    a = 0;
                }
                hit
            })
        })
    }

    /*──────────────────────────── tints ────────────────────────────*/

    /// Add `c` to every pixel.
    pub fn add(&mut self, c: Color) {
        self.data.iter_mut().for_each(|p| *p += c);
    }

    /// Subtract `c` from every pixel.
    pub fn subtract(&mut self, c: Color) {
        self.data.iter_mut().for_each(|p| *p -= c);
    }

    /// Add `c` to opaque pixels only.
    pub fn add_solid(&mut self, c: Color) {
        self.add_solid_rect(0, 0, self.width, self.height, c);
    }

    pub fn subtract_solid(&mut self, c: Color) {
        self.subtract_solid_rect(0, 0, self.width, self.height, c);
    }

    pub fn add_solid_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Color) {
        self.tint_rect(x, y, w, h, |p| *p += c);
    }

    pub fn subtract_solid_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Color) {
        self.tint_rect(x, y, w, h, |p| *p -= c);
    }

    fn tint_rect(&mut self, x: i32, y: i32, w: i32, h: i32, f: impl Fn(&mut Color)) {
        let Some((x, _, w)) = clip_axis(Some(self.width), None, x, 0, w) else { return };
        let Some((y, _, h)) = clip_axis(Some(self.height), None, y, 0, h) else { return };
        for row in y..y + h {
            for p in self.row_mut(x, row, w) {
                if !p.is_transparent() {
                    f(p);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker4() -> Image {
        let mut img = Image::new(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                img.set(x, y, Color::rgb(x, y, 1));
            }
        }
        img
    }

    #[test]
    fn from_data_validates_length() {
        assert!(Image::from_data(2, 2, vec![Color::BLACK; 4]).is_ok());
        assert_eq!(
            Image::from_data(2, 3, vec![Color::BLACK; 4]),
            Err(ImageError::SizeMismatch { width: 2, height: 3, len: 4 })
        );
    }

    #[test]
    fn plain_blit_skips_transparent() {
        let mut src = Image::filled(2, 1, Color::WHITE);
        src.set(1, 0, Color::TRANSPARENT);
        let mut dst = Image::filled(3, 1, Color::BLACK);
        dst.blit_all(&src, 1, 0);
        assert_eq!(dst.data(), &[Color::BLACK, Color::WHITE, Color::BLACK]);
    }

    #[test]
    fn fully_outside_blit_writes_nothing() {
        let src = Image::filled(10, 10, Color::WHITE);
        let mut dst = Image::new(8, 8);
        dst.blit(&src, 0, 0, -20, -20, 10, 10);
        dst.blit(&src, 0, 0, 8, 0, 10, 10);
        dst.blit(&src, 0, 0, 3, 3, 0, 5);
        dst.blit_fast(&src, 0, 0, -10, 0, 10, 10);
        dst.blit_additive(&src, 0, 0, 0, 50, 10, 10);
        assert!(dst.data().iter().all(|c| c.is_transparent()));
    }

    #[test]
    fn partial_blit_clips_both_sides() {
        let src = checker4();
        let mut dst = Image::new(4, 4);
        dst.blit(&src, 0, 0, -1, -2, 4, 4);
        assert_eq!(dst.pixel(0, 0), Color::rgb(1, 2, 1));
        assert_eq!(dst.pixel(2, 1), Color::rgb(3, 3, 1));
        assert!(dst.pixel(3, 0).is_transparent());
        assert!(dst.pixel(0, 2).is_transparent());
    }

    #[test]
    fn tiled_blit_is_periodic() {
        let src = checker4();
        let mut a = Image::new(8, 8);
        let mut b = Image::new(8, 8);
        a.blit_tiled(&src, -1, -1, 0, 0, 8, 8);
        b.blit_tiled(&src, 3, 3, 0, 0, 8, 8);
        assert_eq!(a, b);
        assert_eq!(a.pixel(0, 0), Color::rgb(3, 3, 1));
        assert_eq!(a.pixel(1, 1), Color::rgb(0, 0, 1));
    }

    #[test]
    fn additive_tiled_blit_is_periodic_and_saturates() {
        let src = checker4();
        let mut a = Image::filled(8, 8, Color::rgb(12, 0, 0));
        let mut b = a.clone();
        a.blit_additive_tiled(&src, -1, -1, 0, 0, 8, 8);
        b.blit_additive_tiled(&src, 3, 3, 0, 0, 8, 8);
        assert_eq!(a, b);
        assert_eq!(a.pixel(0, 0), Color::rgb(15, 3, 1));
        assert_eq!(a.pixel(1, 1), Color::rgb(12, 0, 1));
        assert_eq!(a.pixel(4, 4), Color::rgb(15, 3, 1));
    }

    #[test]
    fn additive_ignores_transparency_and_saturates() {
        let mut dst = Image::filled(2, 1, Color::rgb(10, 0, 0));
        let mut src = Image::filled(2, 1, Color::rgb(8, 1, 0));
        src.set(1, 0, Color::TRANSPARENT);
        dst.blit_additive(&src, 0, 0, 0, 0, 2, 1);
        assert_eq!(dst.pixel(0, 0), Color::rgb(15, 1, 0));
        assert_eq!(dst.pixel(1, 0), Color::rgb(10, 0, 0));
    }

    #[test]
    fn fast_blit_copies_holes() {
        let src = Image::new(2, 2);
        let mut dst = Image::filled(2, 2, Color::WHITE);
        dst.blit_fast(&src, 0, 0, 0, 0, 2, 2);
        assert!(dst.data().iter().all(|c| c.is_transparent()));
    }

    #[test]
    fn one_pixel_overlap() {
        let dot = Image::filled(1, 1, Color::WHITE);
        let mut field = Image::new(4, 4);
        field.set(2, 2, Color::WHITE);
        assert!(field.overlaps(&dot, 2, 2));
        assert!(!field.overlaps(&dot, 3, 2));
        assert!(!field.overlaps(&dot, -1, 2));
    }

    #[test]
    fn tiled_overlap_wraps() {
        let dot = Image::filled(1, 1, Color::WHITE);
        let mut field = Image::new(4, 4);
        field.set(0, 1, Color::WHITE);
        assert!(field.overlaps_tiled(&dot, 4, 1));
        assert!(field.overlaps_tiled(&dot, -8, -3));
        assert!(!field.overlaps(&dot, 4, 1));
        assert!(field.overlaps_wrapped(&dot, -4, 1, Wrap::Horizontal));
        assert!(!field.overlaps_wrapped(&dot, -4, 5, Wrap::Horizontal));
    }

    #[test]
    fn solid_tint_leaves_holes_alone() {
        let mut img = Image::filled(3, 1, Color::rgb(1, 1, 1));
        img.set(1, 0, Color::TRANSPARENT);
        img.add_solid_rect(1, 0, 5, 1, Color::rgb(2, 0, 0));
        assert_eq!(img.pixel(0, 0), Color::rgb(1, 1, 1));
        assert!(img.pixel(1, 0).is_transparent());
        assert_eq!(img.pixel(2, 0), Color::rgb(3, 1, 1));
        img.subtract_solid(Color::gray(1));
        assert_eq!(img.pixel(0, 0), Color::BLACK);
    }

    #[test]
    fn sub_image_pads_outside_with_transparent() {
        let src = checker4();
        let s = src.sub_image(3, 3, 2, 2);
        assert_eq!(s.pixel(0, 0), Color::rgb(3, 3, 1));
        assert!(s.pixel(1, 1).is_transparent());
    }
}
