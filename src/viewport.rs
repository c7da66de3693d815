use phf::phf_map;

use crate::geom::{PixelPoint, Vec2d};
use crate::tiling::Triangle;

type Transform2d = nalgebra::Transform2<f64>;
type Matrix3d = nalgebra::Matrix3<f64>;

//////////////////////////////////////////////////////////////////////
// zoom in shows the unit disc filling the canvas, zoom out shows
// the whole wheel with a margin

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ZoomType {
    In,
    Out
}

impl Default for ZoomType {
    fn default() -> Self { Self::In }
}

// define a lookup table matching zoom strings to enumeration
pub static ZOOM_LOOKUP: phf::Map<&'static str, ZoomType> = phf_map! {
    "in" => ZoomType::In,
    "out" => ZoomType::Out,
};

impl ZoomType {

    pub fn scale(self) -> f64 {
        match self {
            ZoomType::In => 1.0,
            ZoomType::Out => 2.0
        }
    }

}

//////////////////////////////////////////////////////////////////////
// maps origin-centered tiling coordinates to pixels on a
// width x height canvas
//
// points are scaled uniformly by max_dim/scale, shifted by
// 0.5*scale (in pre-scale units) and then stretched independently
// along x and y by width/max_dim and height/max_dim

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Viewport {
    pub width:  u32,
    pub height: u32,
    pub zoom:   ZoomType
}

impl Viewport {

    pub fn new(width: u32, height: u32, zoom: ZoomType) -> Self {
        Viewport { width: width, height: height, zoom: zoom }
    }

    fn max_dim(&self) -> f64 {
        self.width.max(self.height) as f64
    }

    // pixels per tiling unit before the per-axis stretch
    pub fn uniform_scale(&self) -> f64 {
        self.max_dim() / self.zoom.scale()
    }

    // (uniform scale, pre-scale translation)
    fn scale_translate(&self) -> (f64, f64) {
        (self.uniform_scale(), 0.5 * self.zoom.scale())
    }

    pub fn to_pixel(&self, p: &Vec2d) -> PixelPoint {

        let max_dim = self.max_dim();
        let (s, t) = self.scale_translate();

        let x = ((p.x * s + t * s) * (self.width as f64) / max_dim).floor();
        let y = ((p.y * s + t * s) * (self.height as f64) / max_dim).floor();

        PixelPoint::new(x as i64, y as i64)

    }

    pub fn triangle_to_pixels(&self, tri: &Triangle) -> [PixelPoint; 3] {
        [self.to_pixel(&tri.v[0]),
         self.to_pixel(&tri.v[1]),
         self.to_pixel(&tri.v[2])]
    }

    // the same mapping (minus the final floor) as an affine transform,
    // for backends that draw in tiling coordinates
    pub fn transform(&self) -> Transform2d {

        let max_dim = self.max_dim();
        let (s, t) = self.scale_translate();

        let kx = s * (self.width as f64) / max_dim;
        let ky = s * (self.height as f64) / max_dim;

        Transform2d::from_matrix_unchecked(
            Matrix3d::new(
                kx, 0.0, t * kx,
                0.0, ky, t * ky,
                0.0, 0.0, 1.0
            )
        )

    }

}

//////////////////////////////////////////////////////////////////////
