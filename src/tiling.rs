use std::f64::consts::PI;

use crate::geom::{from_polar, Vec2d};

//////////////////////////////////////////////////////////////////////
// define some constants for Penrose tiles

pub const PHI: f64 = 1.618033988749895;
const INVPHI: f64 = 1.0 / PHI;

// rotational symmetry of the seed wheel (10-fold, so 2*BASE wedges)
const BASE: usize = 5;

// past this the triangle count gets silly (~2.6x per iteration)
const LARGE_ITERATIONS: usize = 10;

//////////////////////////////////////////////////////////////////////
// half-rhombus types

#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Clone, Copy, Hash)]
pub enum Shape {
    Thin,
    Thick
}

//////////////////////////////////////////////////////////////////////
// Penrose tile triangle (half of a thin or thick rhombus)
//
// vertex order matters: it decides where the next subdivision
// splits the edges and how the triangle gets filled and outlined

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Triangle {
    pub shape: Shape,
    pub v: [Vec2d; 3]
}

impl Triangle {

    pub fn new(shape: Shape, v1: Vec2d, v2: Vec2d, v3: Vec2d) -> Self {
        Triangle { shape: shape, v: [v1, v2, v3] }
    }

    pub fn is_finite(&self) -> bool {
        self.v.iter().all(|p| p.x.is_finite() && p.y.is_finite())
    }

    // append the children of this triangle after one subdivision
    fn subdivide_into(&self, out: &mut Vec<Triangle>) {

        let [v1, v2, v3] = self.v;

        match self.shape {

            Shape::Thin => {

                let p1 = v1 + (v2 - v1) * INVPHI;

                out.push(Triangle::new(Shape::Thin, v3, p1, v2));
                out.push(Triangle::new(Shape::Thick, p1, v3, v1));

            }

            Shape::Thick => {

                let p2 = v2 + (v1 - v2) * INVPHI;
                let p3 = v2 + (v3 - v2) * INVPHI;

                out.push(Triangle::new(Shape::Thick, p3, v3, v1));
                out.push(Triangle::new(Shape::Thick, p2, p3, v2));
                out.push(Triangle::new(Shape::Thin, p3, p2, v1));

            }

        }

    }

}

//////////////////////////////////////////////////////////////////////
// Penrose tiling data structure: the current generation of
// triangles plus how many subdivisions produced it

#[derive(Debug, Clone, PartialEq)]
pub struct PenroseTiling {
    triangles:  Vec<Triangle>,
    generation: usize
}

impl PenroseTiling {

    // wheel of 2*BASE thin triangles around the origin, every other
    // one mirrored so that neighbors share their long edges
    pub fn seed() -> Self {

        let origin = Vec2d::zeros();
        let wedge = PI / ((2 * BASE) as f64);

        let triangles = (0..2 * BASE).map(|i| {

            let k = i as f64;

            let vi = from_polar(1.0, (2.0 * k - 1.0) * wedge);
            let vnext = from_polar(1.0, (2.0 * k + 1.0) * wedge);

            if i % 2 == 0 {
                Triangle::new(Shape::Thin, origin, vnext, vi)
            } else {
                Triangle::new(Shape::Thin, origin, vi, vnext)
            }

        }).collect();

        PenroseTiling {
            triangles: triangles,
            generation: 0
        }

    }

    // seed, then subdivide the given number of times
    pub fn generate(iterations: usize) -> Self {

        if iterations > LARGE_ITERATIONS {
            warn!("{:} iterations requested, expect roughly {:.0} triangles",
                  iterations, 10.0 * (PHI * PHI).powi(iterations as i32));
        }

        let mut pt = Self::seed();

        for _ in 0..iterations {
            pt.subdivide();
        }

        pt

    }

    // replace every triangle by its children: thin -> (thin, thick),
    // thick -> (thick, thick, thin)
    pub fn subdivide(&mut self) {

        let (thin, thick) = self.shape_counts();

        let mut next = Vec::with_capacity(2 * thin + 3 * thick);

        for tri in &self.triangles {
            tri.subdivide_into(&mut next);
        }

        self.triangles = next;
        self.generation += 1;

        debug!("generation {:}: {:} triangles", self.generation, self.triangles.len());

    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    // iterate over triangles of a single shape, in tiling order
    pub fn of_shape<'a>(&'a self, shape: Shape) -> impl Iterator<Item=&'a Triangle> {
        self.triangles.iter().filter(move |t| t.shape == shape)
    }

    // (thin, thick)
    pub fn shape_counts(&self) -> (usize, usize) {

        self.triangles.iter().fold((0, 0), |(thin, thick), t| {
            match t.shape {
                Shape::Thin => (thin + 1, thick),
                Shape::Thick => (thin, thick + 1)
            }
        })

    }

}

//////////////////////////////////////////////////////////////////////
