/// Dot bit for each (x % 2, y % 4) position inside a braille cell.
/// ```text
/// 0x01 0x08
/// 0x02 0x10
/// 0x04 0x20
/// 0x40 0x80
/// ```
const DOT_BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

const BRAILLE_BLANK: u32 = 0x2800;

/// Braille Unicode canvas: each character cell holds a 2x4 dot grid,
/// so a `width` x `height` canvas has `width*2` x `height*4` pixels.
pub struct BrailleCanvas {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl BrailleCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    #[inline]
    fn cell_and_bit(&self, x: usize, y: usize) -> Option<(usize, u8)> {
        let (cx, cy) = (x / 2, y / 4);
        if cx >= self.width || cy >= self.height {
            return None;
        }
        Some((cy * self.width + cx, DOT_BITS[x % 2][y % 4]))
    }

    pub fn set_pixel(&mut self, x: usize, y: usize) {
        if let Some((idx, bit)) = self.cell_and_bit(x, y) {
            self.cells[idx] |= bit;
        }
    }

    /// Set a pixel from signed coordinates; negative values are off-canvas
    pub fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize);
        }
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.cell_and_bit(x, y)
            .map(|(idx, bit)| self.cells[idx] & bit != 0)
            .unwrap_or(false)
    }

    /// Character at a cell, `None` when the cell has no dots
    pub fn glyph(&self, col: usize, row: usize) -> Option<char> {
        if col >= self.width || row >= self.height {
            return None;
        }
        match self.cells[row * self.width + col] {
            0 => None,
            bits => char::from_u32(BRAILLE_BLANK + bits as u32),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[cfg(test)]
    pub fn to_string(&self) -> String {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| {
                row.iter()
                    .map(|&b| char::from_u32(BRAILLE_BLANK + b as u32).unwrap_or(' '))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pixel() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.set_pixel(0, 0);
        assert_eq!(canvas.to_string(), "⠁");
    }

    #[test]
    fn test_all_dots() {
        let mut canvas = BrailleCanvas::new(1, 1);
        for x in 0..2 {
            for y in 0..4 {
                canvas.set_pixel(x, y);
            }
        }
        assert_eq!(canvas.to_string(), "⣿");
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.set_pixel(2, 0);
        canvas.set_pixel_signed(-1, 0);
        assert_eq!(canvas.glyph(0, 0), None);
        assert!(!canvas.is_set(5, 5));
    }

    #[test]
    fn test_glyph() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.set_pixel(2, 2);
        canvas.set_pixel(3, 3);
        assert_eq!(canvas.glyph(0, 0), None);
        // (0,2) and (1,3) within the second cell: 0x04 | 0x80
        assert_eq!(canvas.glyph(1, 0), Some('⢄'));
    }
}
