pub const LORES_WIDTH: usize = 64;
pub const LORES_HEIGHT: usize = 32;
pub const HIRES_WIDTH: usize = 128;
pub const HIRES_HEIGHT: usize = 64;

/// Columns moved by the horizontal scroll instructions.
const SCROLL_COLUMNS: usize = 4;

/// Monochrome frame buffer, one byte (0 or 1) per pixel, row-major.
///
/// `pixels.len() == width * height` holds after every operation.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pixels: Vec<u8>,
    width: usize,
    height: usize,
}

impl FrameBuffer {
    pub fn new(capacity: usize) -> Self {
        let mut pixels = Vec::with_capacity(capacity.max(LORES_WIDTH * LORES_HEIGHT));
        pixels.resize(LORES_WIDTH * LORES_HEIGHT, 0);
        Self {
            pixels,
            width: LORES_WIDTH,
            height: LORES_HEIGHT,
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_hires(&self) -> bool {
        self.width == HIRES_WIDTH
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    pub fn clear_buffer(&mut self) {
        self.pixels.fill(0);
    }

    /// Switch resolution. Content does not survive a mode switch.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, 0);
    }

    /// XOR a sprite onto the screen, returning whether any lit pixel was
    /// turned off.
    ///
    /// Each row is `row_bytes` wide (1 for 8-pixel sprites, 2 for 16-pixel
    /// ones), MSB first. The origin wraps around the screen but the sprite
    /// itself is clipped: rows past the bottom edge and columns past the
    /// right edge are dropped.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8], row_bytes: usize) -> bool {
        let (x, y) = (x as usize % self.width, y as usize % self.height);
        let cols = row_bytes * 8;
        let mut collision = false;

        for (i, row) in sprite.chunks(row_bytes).enumerate() {
            let ny = y + i;
            if ny >= self.height {
                break;
            }
            for j in 0..cols {
                let nx = x + j;
                if nx >= self.width {
                    break;
                }
                let byte = row.get(j / 8).copied().unwrap_or(0);
                if byte & (0x80 >> (j % 8)) == 0 {
                    continue;
                }
                let index = ny * self.width + nx;
                if self.pixels[index] == 1 {
                    collision = true;
                }
                self.pixels[index] ^= 1;
            }
        }
        collision
    }

    /// Rows of the sprite that are on screen when drawn from row `y`.
    pub fn visible_rows(&self, y: u8, rows: usize) -> usize {
        let y = y as usize % self.height;
        rows.min(self.height - y)
    }

    /// Push the picture down by `n` rows, blanking the top.
    pub fn scroll_down(&mut self, n: usize) {
        let shift = (self.width * n).min(self.pixels.len());
        self.pixels.rotate_right(shift);
        self.pixels[..shift].fill(0);
    }

    pub fn scroll_right(&mut self) {
        for row in self.pixels.chunks_exact_mut(self.width) {
            row.rotate_right(SCROLL_COLUMNS);
            row[..SCROLL_COLUMNS].fill(0);
        }
    }

    pub fn scroll_left(&mut self) {
        let width = self.width;
        for row in self.pixels.chunks_exact_mut(width) {
            row.rotate_left(SCROLL_COLUMNS);
            row[width - SCROLL_COLUMNS..].fill(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(fb: &FrameBuffer) -> usize {
        fb.pixels().iter().filter(|&&p| p == 1).count()
    }

    #[test]
    fn test_starts_lores_blank() {
        let fb = FrameBuffer::new(HIRES_WIDTH * HIRES_HEIGHT);
        assert_eq!((fb.width(), fb.height()), (64, 32));
        assert_eq!(fb.pixels().len(), 64 * 32);
        assert_eq!(lit(&fb), 0);
        assert!(!fb.is_hires());
    }

    #[test]
    fn test_paint_xor_and_collision() {
        let mut fb = FrameBuffer::new(0);
        assert!(!fb.paint(2, 3, &[0b1010_0000], 1));
        assert_eq!(fb.pixel(2, 3), Some(1));
        assert_eq!(fb.pixel(3, 3), Some(0));
        assert_eq!(fb.pixel(4, 3), Some(1));
        assert!(fb.paint(2, 3, &[0b1000_0000], 1));
        assert_eq!(fb.pixel(2, 3), Some(0));
        assert_eq!(lit(&fb), 1);
    }

    #[test]
    fn test_paint_wraps_origin_and_clips_sprite() {
        let mut fb = FrameBuffer::new(0);
        // origin (66, 33) wraps to (2, 1)
        fb.paint(66, 33, &[0x80], 1);
        assert_eq!(fb.pixel(2, 1), Some(1));

        // columns past the right edge are dropped, not wrapped
        fb.clear_buffer();
        fb.paint(60, 0, &[0xFF], 1);
        assert_eq!(lit(&fb), 4);
        assert_eq!(fb.pixel(0, 0), Some(0));

        // rows past the bottom edge are dropped
        fb.clear_buffer();
        fb.paint(0, 30, &[0x80, 0x80, 0x80, 0x80], 1);
        assert_eq!(lit(&fb), 2);
        assert_eq!(fb.pixel(0, 0), Some(0));
    }

    #[test]
    fn test_paint_wide_rows() {
        let mut fb = FrameBuffer::new(0);
        fb.resize(HIRES_WIDTH, HIRES_HEIGHT);
        fb.paint(0, 0, &[0x00, 0x01, 0x80, 0x00], 2);
        assert_eq!(fb.pixel(15, 0), Some(1));
        assert_eq!(fb.pixel(0, 1), Some(1));
        assert_eq!(lit(&fb), 2);
    }

    #[test]
    fn test_visible_rows() {
        let fb = FrameBuffer::new(0);
        assert_eq!(fb.visible_rows(0, 15), 15);
        assert_eq!(fb.visible_rows(28, 15), 4);
        assert_eq!(fb.visible_rows(32 + 28, 15), 4);
    }

    #[test]
    fn test_resize_clears() {
        let mut fb = FrameBuffer::new(0);
        fb.paint(0, 0, &[0xFF], 1);
        fb.resize(HIRES_WIDTH, HIRES_HEIGHT);
        assert_eq!(fb.pixels().len(), 128 * 64);
        assert_eq!(lit(&fb), 0);
        assert!(fb.is_hires());
    }

    #[test]
    fn test_scroll_down() {
        let mut fb = FrameBuffer::new(0);
        fb.paint(5, 0, &[0x80], 1);
        fb.paint(5, 31, &[0x80], 1);
        fb.scroll_down(3);
        assert_eq!(fb.pixels().len(), 64 * 32);
        assert_eq!(fb.pixel(5, 3), Some(1));
        assert_eq!(lit(&fb), 1);

        fb.scroll_down(100);
        assert_eq!(lit(&fb), 0);
        assert_eq!(fb.pixels().len(), 64 * 32);
    }

    #[test]
    fn test_scroll_sideways() {
        let mut fb = FrameBuffer::new(0);
        fb.paint(0, 0, &[0x80], 1);
        fb.paint(62, 1, &[0x80], 1);
        fb.scroll_right();
        assert_eq!(fb.pixel(4, 0), Some(1));
        // pushed off the right edge rather than wrapped into the next row
        assert_eq!(lit(&fb), 1);

        fb.scroll_left();
        assert_eq!(fb.pixel(0, 0), Some(1));
        fb.scroll_left();
        assert_eq!(lit(&fb), 0);
        assert_eq!(fb.pixels().len(), 64 * 32);
    }
}
