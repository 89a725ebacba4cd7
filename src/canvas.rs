use std::io::{ self, BufWriter, Write };
use std::fs::File;
use std::path::Path;

use crate::color::Color;
use crate::consts::{ PPM_MAX_COLOR, PPM_LINE_WIDTH };
use crate::error::Result;

/// A canvas for drawing pixels.
///
/// The canvas stores the resultant colors for each pixel ray. Every write is
/// clamped into `[0.0, 1.0]` per channel, so a canvas only ever holds
/// displayable colors. Once rendering finishes, the `Canvas` can be saved to
/// an image file.
///
/// For now, only PPM images are supported.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored as a flattened row-major vector.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a new black canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas::filled(width, height, Color::black())
    }

    /// Creates a canvas where every pixel is `color`, clamped.
    pub fn filled(width: usize, height: usize, color: Color) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![color.clamped(); width * height]
        }
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. `x` is the column of the pixel and
    /// `y` is the row; both are zero-indexed. Each channel is clamped to
    /// `[0.0, 1.0]`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use parallel_ray_tracer::color::Color;
    /// # use parallel_ray_tracer::canvas::Canvas;
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &Color::rgb(1.5, 0.0, 1.0));
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), Color::rgb(1.0, 0.0, 1.0));
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = pixel.clamped();
    }

    /// Reads a color from a location on the `Canvas`.
    ///
    /// If the specified pixel location is out-of-bounds, `None` is returned.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// Copies `tile` into this canvas with its top-left corner at `(x0, y0)`.
    ///
    /// Parts of the tile that fall outside this canvas are dropped.
    pub fn paste(&mut self, x0: usize, y0: usize, tile: &Canvas) {
        for ty in 0..tile.height {
            let y = y0 + ty;
            if y >= self.height {
                break;
            }

            let width = tile.width.min(self.width.saturating_sub(x0));
            let src = ty * tile.width;
            let dst = y * self.width + x0;
            self.pixels[dst..dst + width]
                .copy_from_slice(&tile.pixels[src..src + width]);
        }
    }

    /// Checks whether every pixel is (approximately) `color`.
    pub fn is_of_color(&self, color: Color) -> bool {
        self.pixels.iter().all(|p| *p == color)
    }

    /// Writes the canvas as a plain (P3) PPM image.
    ///
    /// Channels are scaled to `0..=255`. No line exceeds 70 columns; a
    /// value that would cross the limit starts a new line.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "{}", PPM_MAX_COLOR as usize)?;

        for row in self.pixels.chunks(self.width.max(1)) {
            let mut col = 0;

            for pixel in row {
                for channel in [pixel.r, pixel.g, pixel.b].iter() {
                    let value = (channel * PPM_MAX_COLOR)
                        .round()
                        .clamp(0.0, PPM_MAX_COLOR) as usize;
                    let s = value.to_string();

                    if col == 0 {
                        write!(out, "{}", s)?;
                        col = s.len();
                    } else if col + 1 + s.len() > PPM_LINE_WIDTH {
                        write!(out, "\n{}", s)?;
                        col = s.len();
                    } else {
                        write!(out, " {}", s)?;
                        col += 1 + s.len();
                    }
                }
            }

            writeln!(out)?;
        }

        Ok(())
    }

    /// Saves a canvas to a PPM file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out)?;
        out.flush()?;

        Ok(())
    }
}

#[cfg(test)]
fn ppm_string(c: &Canvas) -> String {
    let mut buf = Vec::new();
    c.write_ppm(&mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn new_canvas_is_black() {
    let c = Canvas::new(10, 20);

    assert_eq!(c.width, 10);
    assert_eq!(c.height, 20);
    assert!(c.is_of_color(Color::black()));
}

#[test]
fn write_and_read_pixel() {
    let mut c = Canvas::new(10, 20);
    let red = Color::rgb(1.0, 0.0, 0.0);
    c.write_pixel(2, 3, &red);

    assert_eq!(c.read_pixel(2, 3), Some(red));
    assert!(!c.is_of_color(Color::black()));
}

#[test]
fn out_of_bounds_pixels_are_ignored() {
    let mut c = Canvas::new(4, 4);
    c.write_pixel(4, 0, &Color::white());
    c.write_pixel(0, 4, &Color::white());

    assert!(c.is_of_color(Color::black()));
    assert_eq!(c.read_pixel(4, 0), None);
}

#[test]
fn writes_are_clamped() {
    let mut c = Canvas::new(2, 1);
    c.write_pixel(0, 0, &Color::rgb(1.5, -0.5, 0.25));

    assert_eq!(c.read_pixel(0, 0), Some(Color::rgb(1.0, 0.0, 0.25)));
}

#[test]
fn paste_tile_at_offset() {
    let mut c = Canvas::new(5, 4);
    let tile = Canvas::filled(2, 2, Color::white());
    c.paste(3, 1, &tile);

    for y in 0..4 {
        for x in 0..5 {
            let expected = if (3..5).contains(&x) && (1..3).contains(&y) {
                Color::white()
            } else {
                Color::black()
            };
            assert_eq!(c.read_pixel(x, y), Some(expected));
        }
    }
}

#[test]
fn paste_clips_to_canvas() {
    let mut c = Canvas::new(3, 3);
    c.paste(2, 2, &Canvas::filled(4, 4, Color::white()));

    assert_eq!(c.read_pixel(2, 2), Some(Color::white()));
    assert_eq!(c.read_pixel(1, 2), Some(Color::black()));
    assert_eq!(c.read_pixel(2, 1), Some(Color::black()));
}

#[test]
fn ppm_header_and_pixels() {
    let mut c = Canvas::new(5, 3);
    c.write_pixel(0, 0, &Color::rgb(1.5, 0.0, 0.0));
    c.write_pixel(2, 1, &Color::rgb(0.0, 0.5, 0.0));
    c.write_pixel(4, 2, &Color::rgb(-0.5, 0.0, 1.0));

    let ppm = ppm_string(&c);
    let lines: Vec<&str> = ppm.lines().collect();

    assert_eq!(lines[0], "P3");
    assert_eq!(lines[1], "5 3");
    assert_eq!(lines[2], "255");
    assert_eq!(lines[3], "255 0 0 0 0 0 0 0 0 0 0 0 0 0 0");
    assert_eq!(lines[4], "0 0 0 0 0 0 0 128 0 0 0 0 0 0 0");
    assert_eq!(lines[5], "0 0 0 0 0 0 0 0 0 0 0 0 0 0 255");
    assert!(ppm.ends_with('\n'));
}

#[test]
fn ppm_lines_are_wrapped() {
    let c = Canvas::filled(10, 2, Color::rgb(1.0, 0.8, 0.6));

    let ppm = ppm_string(&c);
    let lines: Vec<&str> = ppm.lines().collect();

    assert_eq!(lines[3],
        "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204");
    assert_eq!(lines[4],
        "153 255 204 153 255 204 153 255 204 153 255 204 153");
    assert_eq!(lines[5],
        "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204");
    assert_eq!(lines[6],
        "153 255 204 153 255 204 153 255 204 153 255 204 153");
    assert!(lines.iter().all(|l| l.len() <= PPM_LINE_WIDTH));
}
