//////////////////////////////////////////////////////////////////////
// pull in some types from nalgebra
//
// tiling-space points are plain 2D vectors so that the subdivision
// arithmetic reads like complex-number arithmetic: a + (b - a) * k

pub type Vec2d = nalgebra::Vector2<f64>;

//////////////////////////////////////////////////////////////////////
// point at given radius and angle (radians) from the origin

pub fn from_polar(r: f64, theta: f64) -> Vec2d {
    Vec2d::new(r * theta.cos(), r * theta.sin())
}

//////////////////////////////////////////////////////////////////////
// integer pixel coordinate, origin at top-left, may lie outside
// the buffer (writes there get dropped)

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct PixelPoint {
    pub x: i64,
    pub y: i64
}

impl PixelPoint {

    pub fn new(x: i64, y: i64) -> Self {
        PixelPoint { x: x, y: y }
    }

}

//////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {

    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-12;

    #[test]
    fn polar_construction() {

        let p = from_polar(2.0, 0.5 * PI);

        assert!(p.x.abs() < EPS);
        assert!((p.y - 2.0).abs() < EPS);
        assert!((from_polar(1.0, 0.3).norm() - 1.0).abs() < EPS);

    }

    #[test]
    fn arithmetic_leaves_operands_alone() {

        let a = Vec2d::new(1.0, 2.0);
        let b = Vec2d::new(-3.0, 0.5);

        assert_eq!(a + b, Vec2d::new(-2.0, 2.5));
        assert_eq!(a - b, Vec2d::new(4.0, 1.5));
        assert_eq!(a * 2.0, Vec2d::new(2.0, 4.0));
        assert_eq!(a, Vec2d::new(1.0, 2.0));
        assert!((Vec2d::new(3.0, 4.0).norm() - 5.0).abs() < EPS);

    }

}
