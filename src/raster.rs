use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::color::Color;
use crate::errors::*;
use crate::geom::PixelPoint;

//////////////////////////////////////////////////////////////////////
// fixed-size RGBA8 raster, row-major, origin at top-left
//
// every write goes through put/blend, which silently drop pixels
// outside [0, width) x [0, height)

pub struct PixelBuffer {
    image: RgbaImage
}

impl PixelBuffer {

    pub fn new(width: u32, height: u32, background: Color) -> Self {
        PixelBuffer {
            image: RgbaImage::from_pixel(width, height, Rgba(background.to_bytes()))
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 &&
            x < self.image.width() as i64 &&
            y < self.image.height() as i64
    }

    pub fn get(&self, x: i64, y: i64) -> Option<[u8; 4]> {
        if self.contains(x, y) {
            Some(self.image.get_pixel(x as u32, y as u32).0)
        } else {
            None
        }
    }

    // overwrite a texel
    pub fn put(&mut self, x: i64, y: i64, rgba: [u8; 4]) {
        if self.contains(x, y) {
            self.image.put_pixel(x as u32, y as u32, Rgba(rgba));
        }
    }

    // source-over blend of the color channels, then force opaque
    pub fn blend(&mut self, x: i64, y: i64, rgba: [u8; 4]) {

        if !self.contains(x, y) {
            return;
        }

        let alpha = (rgba[3] as f64) / 255.0;
        let dst = self.image.get_pixel_mut(x as u32, y as u32);

        for i in 0..3 {
            let mixed = (dst[i] as f64) * (1.0 - alpha) + (rgba[i] as f64) * alpha;
            dst[i] = mixed.round().max(0.0).min(255.0) as u8;
        }

        dst[3] = 255;

    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.image.into_raw()
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }

    //////////////////////////////////////////////////
    // scanline triangle fill
    //
    // vertices are sorted by y, then the triangle is split at the
    // middle vertex into a flat-bottom and a flat-top half

    pub fn fill_triangle(&mut self,
                         p1: PixelPoint, p2: PixelPoint, p3: PixelPoint,
                         color: &Color) {

        let rgba = color.to_bytes();

        let mut v = [p1, p2, p3];
        v.sort_by_key(|p| p.y);

        let [p1, p2, p3] = v;

        if p2.y == p3.y {

            self.fill_flat_bottom(p1, p2, p3, rgba);

        } else if p1.y == p2.y {

            self.fill_flat_top(p1, p2, p3, rgba);

        } else {

            // where the scanline through p2 crosses the long edge
            let t = ((p2.y - p1.y) as f64) / ((p3.y - p1.y) as f64);
            let x4 = (p1.x as f64 + t * ((p3.x - p1.x) as f64)).floor();
            let p4 = PixelPoint::new(x4 as i64, p2.y);

            self.fill_flat_bottom(p1, p2, p4, rgba);
            self.fill_flat_top(p2, p4, p3, rgba);

        }

    }

    // apex p1 on top, p2 and p3 share the bottom scanline
    fn fill_flat_bottom(&mut self,
                        p1: PixelPoint, p2: PixelPoint, p3: PixelPoint,
                        rgba: [u8; 4]) {

        let inv_slope1 = inv_slope(p1, p2);
        let inv_slope2 = inv_slope(p1, p3);

        let mut curx1 = p1.x as f64;
        let mut curx2 = p1.x as f64;

        for y in p1.y..=p2.y {

            self.fill_span(y, curx1, curx2, rgba);

            curx1 += inv_slope1;
            curx2 += inv_slope2;

        }

    }

    // p1 and p2 share the top scanline, apex p3 on the bottom
    fn fill_flat_top(&mut self,
                     p1: PixelPoint, p2: PixelPoint, p3: PixelPoint,
                     rgba: [u8; 4]) {

        let inv_slope1 = inv_slope(p1, p3);
        let inv_slope2 = inv_slope(p2, p3);

        let mut curx1 = p3.x as f64;
        let mut curx2 = p3.x as f64;

        let mut y = p3.y;

        while y > p1.y {

            curx1 -= inv_slope1;
            curx2 -= inv_slope2;

            self.fill_span(y, curx1, curx2, rgba);

            y -= 1;

        }

    }

    // fill one scanline between two edge intercepts (in either order)
    fn fill_span(&mut self, y: i64, xa: f64, xb: f64, rgba: [u8; 4]) {

        if y < 0 || y >= self.image.height() as i64 {
            return;
        }

        let xmax = self.image.width() as i64 - 1;

        let x0 = xa.min(xb).floor() as i64;
        let x1 = xa.max(xb).floor() as i64;

        // span entirely off one side
        if x1 < 0 || x0 > xmax {
            return;
        }

        for x in x0.max(0)..=x1.min(xmax) {
            self.image.put_pixel(x as u32, y as u32, Rgba(rgba));
        }

    }

    //////////////////////////////////////////////////
    // Bresenham line, each visited pixel blended with the line color

    pub fn draw_line(&mut self, p1: PixelPoint, p2: PixelPoint, color: &Color) {

        let rgba = color.to_bytes();

        let (mut x0, mut y0) = (p1.x, p1.y);
        let (x1, y1) = (p2.x, p2.y);

        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };

        let mut err = dx - dy;

        loop {

            self.blend(x0, y0, rgba);

            if x0 == x1 && y0 == y1 {
                break;
            }

            let e2 = 2 * err;

            if e2 > -dy {
                err -= dy;
                x0 += sx;
            }

            if e2 < dx {
                err += dx;
                y0 += sy;
            }

        }

    }

}

// dx/dy along an edge; a zero-height edge counts as one scanline tall
fn inv_slope(a: PixelPoint, b: PixelPoint) -> f64 {
    let dy = if b.y == a.y { 1 } else { b.y - a.y };
    ((b.x - a.x) as f64) / (dy as f64)
}

//////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {

    use super::*;
    use crate::color::{BLACK, BLUE, RED, WHITE};

    fn pt(x: i64, y: i64) -> PixelPoint {
        PixelPoint::new(x, y)
    }

    fn count_changed(buf: &PixelBuffer, background: &Color) -> usize {
        let bg = background.to_bytes();
        buf.as_raw().chunks(4).filter(|px| *px != &bg[..]).count()
    }

    #[test]
    fn background_fill() {

        let buf = PixelBuffer::new(3, 2, BLUE);

        assert_eq!(buf.as_raw().len(), 3 * 2 * 4);
        assert_eq!(count_changed(&buf, &BLUE), 0);
        assert_eq!(buf.get(2, 1), Some([0, 0, 255, 255]));
        assert_eq!(buf.get(3, 0), None);
        assert_eq!(buf.get(-1, 0), None);

        let image = buf.into_image();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.into_raw(), [0u8, 0, 255, 255].repeat(6));

    }

    #[test]
    fn into_raw_is_row_major() {

        let mut buf = PixelBuffer::new(2, 2, WHITE);
        buf.put(1, 0, [1, 2, 3, 4]);

        let raw = buf.into_raw();

        assert_eq!(raw.len(), 2 * 2 * 4);
        assert_eq!(&raw[4..8], &[1, 2, 3, 4]);
        assert_eq!(&raw[8..12], &[255; 4]);

    }

    #[test]
    fn out_of_bounds_writes_are_dropped() {

        let mut buf = PixelBuffer::new(4, 4, WHITE);

        buf.put(-1, 0, [0; 4]);
        buf.put(4, 0, [0; 4]);
        buf.put(0, 4, [0; 4]);
        buf.blend(0, -7, [0, 0, 0, 255]);

        assert_eq!(count_changed(&buf, &WHITE), 0);

    }

    #[test]
    fn fill_triangle_outside_buffer_writes_nothing() {

        let mut buf = PixelBuffer::new(10, 10, WHITE);

        // right of, left of, above, below
        buf.fill_triangle(pt(12, 2), pt(20, 5), pt(15, 8), &RED);
        buf.fill_triangle(pt(-12, 2), pt(-2, 5), pt(-5, 8), &RED);
        buf.fill_triangle(pt(1, -9), pt(8, -2), pt(4, -5), &RED);
        buf.fill_triangle(pt(1, 19), pt(8, 12), pt(4, 15), &RED);

        assert_eq!(count_changed(&buf, &WHITE), 0);

    }

    #[test]
    fn fill_triangle_on_edge_stays_in_bounds() {

        let mut buf = PixelBuffer::new(10, 10, WHITE);

        buf.fill_triangle(pt(9, 0), pt(9, 9), pt(20, 5), &RED);

        let red = RED.to_bytes();

        for y in 0..10 {
            assert_eq!(buf.get(9, y), Some(red), "row {}", y);
            assert_eq!(buf.get(8, y), Some(WHITE.to_bytes()));
        }

        assert_eq!(buf.as_raw().len(), 400);

    }

    #[test]
    fn fill_general_triangle() {

        let mut buf = PixelBuffer::new(10, 10, WHITE);

        buf.fill_triangle(pt(1, 1), pt(8, 4), pt(2, 8), &BLUE);

        let blue = BLUE.to_bytes();

        assert_eq!(buf.get(1, 1), Some(blue));
        assert_eq!(buf.get(3, 4), Some(blue));
        assert_eq!(buf.get(8, 4), Some(blue));
        assert_eq!(buf.get(9, 9), Some(WHITE.to_bytes()));
        assert_eq!(buf.get(8, 1), Some(WHITE.to_bytes()));

    }

    #[test]
    fn fill_ignores_vertex_order() {

        let mut a = PixelBuffer::new(12, 12, WHITE);
        let mut b = PixelBuffer::new(12, 12, WHITE);

        a.fill_triangle(pt(1, 1), pt(10, 5), pt(3, 11), &RED);
        b.fill_triangle(pt(3, 11), pt(1, 1), pt(10, 5), &RED);

        assert_eq!(a.as_raw(), b.as_raw());

    }

    #[test]
    fn degenerate_triangles_do_not_panic() {

        let mut buf = PixelBuffer::new(8, 8, WHITE);

        // single point, horizontal sliver, vertical sliver
        buf.fill_triangle(pt(3, 3), pt(3, 3), pt(3, 3), &RED);
        buf.fill_triangle(pt(1, 5), pt(6, 5), pt(4, 5), &RED);
        buf.fill_triangle(pt(2, 1), pt(2, 4), pt(2, 7), &RED);

        assert_eq!(buf.get(3, 3), Some(RED.to_bytes()));
        assert_eq!(buf.get(1, 5), Some(RED.to_bytes()));
        assert_eq!(buf.get(2, 6), Some(RED.to_bytes()));
        assert_eq!(count_changed(&buf, &WHITE), 1 + 1 + 7);

    }

    #[test]
    fn zero_length_line_writes_one_pixel() {

        let mut buf = PixelBuffer::new(4, 4, WHITE);

        buf.draw_line(pt(0, 0), pt(0, 0), &BLACK);

        assert_eq!(count_changed(&buf, &WHITE), 1);
        assert_eq!(buf.get(0, 0), Some([0, 0, 0, 255]));

    }

    #[test]
    fn line_visits_both_endpoints() {

        let mut buf = PixelBuffer::new(10, 10, WHITE);

        buf.draw_line(pt(8, 1), pt(1, 6), &BLACK);

        assert_eq!(buf.get(8, 1), Some([0, 0, 0, 255]));
        assert_eq!(buf.get(1, 6), Some([0, 0, 0, 255]));
        assert_eq!(count_changed(&buf, &WHITE), 8);

    }

    #[test]
    fn line_clipped_outside_buffer() {

        let mut buf = PixelBuffer::new(5, 5, WHITE);

        buf.draw_line(pt(-3, 2), pt(7, 2), &BLACK);

        assert_eq!(count_changed(&buf, &WHITE), 5);
        assert_eq!(buf.get(0, 2), Some([0, 0, 0, 255]));
        assert_eq!(buf.get(4, 2), Some([0, 0, 0, 255]));

    }

    #[test]
    fn line_blends_and_forces_opaque() {

        let mut buf = PixelBuffer::new(2, 1, Color::rgba(1.0, 1.0, 1.0, 0.0));

        buf.draw_line(pt(0, 0), pt(1, 0), &Color::rgba(0.0, 0.0, 0.0, 0.5));

        // alpha byte 128, so 255 * (1 - 128/255) = 127
        assert_eq!(buf.get(0, 0), Some([127, 127, 127, 255]));
        assert_eq!(buf.get(1, 0), Some([127, 127, 127, 255]));

        // a second pass blends again instead of accumulating coverage
        buf.draw_line(pt(0, 0), pt(0, 0), &Color::rgba(0.0, 0.0, 0.0, 0.5));
        assert_eq!(buf.get(0, 0), Some([63, 63, 63, 255]));

    }

}
