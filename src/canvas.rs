use std::io::{ self, Write };
use std::fs::File;
use std::path::Path;

use crate::color::Color;
use crate::error::Result;

/// A buffer of rendered pixels.
///
/// The camera fills one of these, one color per pixel, stored row-major. The
/// canvas can then be written out as a plain-text PPM image; any other
/// encoding is left to the caller, who can read pixels back with
/// `read_pixel` or walk `rows`.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a black canvas of `width * height` pixels.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    /// Writes a color at column `x`, row `y`. Out-of-bounds writes are
    /// ignored.
    ///
    /// ```
    /// # use phong_ray_tracer::color::Color;
    /// # use phong_ray_tracer::canvas::Canvas;
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, purple);
    /// assert_eq!(canvas.read_pixel(4, 2), Some(purple));
    /// assert_eq!(canvas.read_pixel(8, 2), None);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = pixel;
    }

    /// Reads the color at column `x`, row `y`, if it is on the canvas.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// Iterates over the pixel rows, top to bottom.
    pub fn rows(&self) -> std::slice::Chunks<'_, Color> {
        self.pixels.chunks(self.width.max(1))
    }

    /// The raw row-major pixel buffer, for renderers which fill rows in
    /// place.
    pub(crate) fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Encodes the canvas as a plain (P3) PPM image.
    ///
    /// Lines are kept within 70 columns, as PPM readers expect.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?;

        for row in self.rows() {
            let mut line = String::new();

            let channels = row.iter().flat_map(|pixel| pixel.to_rgb8());
            for channel in channels {
                let value = channel.to_string();

                if !line.is_empty() && line.len() + 1 + value.len() > 70 {
                    writeln!(out, "{}", line)?;
                    line.clear();
                }

                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(&value);
            }

            writeln!(out, "{}", line)?;
        }

        Ok(())
    }

    /// Saves the canvas to a PPM file at `path`.
    pub fn save_ppm(&self, path: &Path) -> Result<()> {
        let mut out = io::BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out)?;
        out.flush()?;

        Ok(())
    }
}

#[test]
fn new_canvas_is_black() {
    let c = Canvas::new(10, 20);

    assert_eq!(c.width, 10);
    assert_eq!(c.height, 20);
    assert!(c.rows().flatten().all(|p| *p == Color::black()));
    assert_eq!(c.rows().count(), 20);
}

#[test]
fn ppm_header_and_pixels() {
    let mut c = Canvas::new(5, 3);
    c.write_pixel(0, 0, Color::rgb(1.5, 0.0, 0.0));
    c.write_pixel(2, 1, Color::rgb(0.0, 0.5, 0.0));
    c.write_pixel(4, 2, Color::rgb(-0.5, 0.0, 1.0));

    let mut buf = Vec::new();
    c.write_ppm(&mut buf).unwrap();
    let ppm = String::from_utf8(buf).unwrap();
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
fn ppm_splits_long_lines() {
    let mut c = Canvas::new(10, 2);
    for y in 0..2 {
        for x in 0..10 {
            c.write_pixel(x, y, Color::rgb(1.0, 0.8, 0.6));
        }
    }

    let mut buf = Vec::new();
    c.write_ppm(&mut buf).unwrap();
    let ppm = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = ppm.lines().collect();

    assert_eq!(lines[3],
        "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204");
    assert_eq!(lines[4], "153 255 204 153 255 204 153 255 204 153 255 204 153");
    assert!(lines.iter().all(|l| l.len() <= 70));
}
