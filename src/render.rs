use crate::color::Color;
use crate::errors::*;
use crate::geom::{PixelPoint, Vec2d};
use crate::options::{BackendType, RenderOptions};
use crate::raster::PixelBuffer;
use crate::tiling::{PenroseTiling, Shape, Triangle};
use crate::viewport::Viewport;

//////////////////////////////////////////////////////////////////////
// a backend turns a tiling into some artifact: fills first (thin,
// then thick), outlines last

pub trait Renderer {

    type Artifact;

    fn render(&self,
              tiling: &PenroseTiling,
              viewport: &Viewport,
              options: &RenderOptions) -> Result<Self::Artifact>;

}

fn fill_color(shape: Shape, options: &RenderOptions) -> &Color {
    match shape {
        Shape::Thin => &options.fill_thin,
        Shape::Thick => &options.fill_thick
    }
}

// stroke width in tiling units, thinner as the tiles shrink
pub fn outline_width(iterations: usize) -> f64 {

    let n = iterations.max(1) as i32;

    if n > 3 {
        (n as f64).powi(-3)
    } else {
        (n as f64).powi(-5)
    }

}

// outline_width converted to pixels with the viewport's uniform scale
pub fn device_outline_width(iterations: usize, viewport: &Viewport) -> f64 {
    outline_width(iterations) * viewport.uniform_scale()
}

//////////////////////////////////////////////////////////////////////
// software rasterizer backend

#[derive(Debug, Default, Clone, Copy)]
pub struct BitmapRenderer;

impl Renderer for BitmapRenderer {

    type Artifact = PixelBuffer;

    fn render(&self,
              tiling: &PenroseTiling,
              viewport: &Viewport,
              options: &RenderOptions) -> Result<PixelBuffer> {

        let mut pixels = PixelBuffer::new(viewport.width, viewport.height,
                                          options.background);

        let mapped: Vec<[PixelPoint; 3]> = tiling.triangles().iter()
            .map(|tri| viewport.triangle_to_pixels(tri))
            .collect();

        for (tri, &[p1, p2, p3]) in tiling.triangles().iter().zip(&mapped) {
            pixels.fill_triangle(p1, p2, p3, fill_color(tri.shape, options));
        }

        if options.draws_outline() {

            for &[p1, p2, p3] in &mapped {

                pixels.draw_line(p1, p2, &options.outline);
                pixels.draw_line(p2, p3, &options.outline);
                pixels.draw_line(p3, p1, &options.outline);

            }

        }

        info!("rasterized {:} triangles into {:}x{:} pixels",
              tiling.len(), viewport.width, viewport.height);

        Ok(pixels)

    }

}

//////////////////////////////////////////////////////////////////////
// some cairo helpers for drawing in tiling coordinates

trait CairoTileOps {

    fn moveto(&self, p: &Vec2d);
    fn lineto(&self, p: &Vec2d);
    fn setcolor(&self, c: &Color);
    fn drawtri(&self, t: &Triangle);
    fn settransform(&self, viewport: &Viewport);

}

impl CairoTileOps for cairo::Context {

    fn moveto(&self, p: &Vec2d) {
        self.move_to(p.x, p.y);
    }

    fn lineto(&self, p: &Vec2d) {
        self.line_to(p.x, p.y);
    }

    fn setcolor(&self, c: &Color) {
        self.set_source_rgba(c.r, c.g, c.b, c.a);
    }

    fn drawtri(&self, t: &Triangle) {
        self.moveto(&t.v[0]);
        self.lineto(&t.v[1]);
        self.lineto(&t.v[2]);
        self.close_path();
    }

    fn settransform(&self, viewport: &Viewport) {

        let m = viewport.transform().into_inner();

        self.transform(cairo::Matrix::new(m[(0, 0)], m[(1, 0)],
                                          m[(0, 1)], m[(1, 1)],
                                          m[(0, 2)], m[(1, 2)]));

    }

}

macro_rules! with_save_restore {

    ($ctx:ident, { $($tree:tt)* }) => {

        $ctx.save();

        {

            $($tree)*

        }

        $ctx.restore();

    }

}

//////////////////////////////////////////////////////////////////////
// backend that hands paths to an existing cairo context

pub struct SurfaceRenderer {
    ctx: cairo::Context
}

impl SurfaceRenderer {

    pub fn new(ctx: cairo::Context) -> Self {
        SurfaceRenderer { ctx: ctx }
    }

    pub fn into_context(self) -> cairo::Context {
        self.ctx
    }

}

impl Renderer for SurfaceRenderer {

    type Artifact = ();

    fn render(&self,
              tiling: &PenroseTiling,
              viewport: &Viewport,
              options: &RenderOptions) -> Result<()> {

        let ctx = &self.ctx;

        ctx.identity_matrix();

        ctx.rectangle(0.0, 0.0, viewport.width as f64, viewport.height as f64);
        ctx.setcolor(&options.background);
        ctx.fill();

        with_save_restore!(ctx, {

            ctx.settransform(viewport);

            for &shape in &[Shape::Thin, Shape::Thick] {

                ctx.new_path();

                for tri in tiling.of_shape(shape) {
                    ctx.drawtri(tri);
                }

                ctx.setcolor(fill_color(shape, options));
                ctx.fill();

            }

            if options.draws_outline() {

                ctx.new_path();

                // the v2-v3 edge is skipped so rhombi read as one tile
                for tri in tiling.triangles() {
                    ctx.moveto(&tri.v[1]);
                    ctx.lineto(&tri.v[0]);
                    ctx.lineto(&tri.v[2]);
                }

                // stroke in device units so a non-square canvas doesn't
                // stretch the pen; the path keeps its mapped geometry
                ctx.identity_matrix();

                ctx.setcolor(&options.outline);
                ctx.set_line_width(device_outline_width(options.iterations, viewport));
                ctx.set_line_join(cairo::LineJoin::Round);
                ctx.stroke();

            }

        });

        info!("drew {:} triangles onto cairo surface", tiling.len());

        Ok(())

    }

}

//////////////////////////////////////////////////////////////////////
// backend chosen once from the options

pub enum Backend {
    Bitmap(BitmapRenderer),
    Surface(SurfaceRenderer)
}

pub enum Artifact {
    Pixels(PixelBuffer),
    Surface
}

impl Backend {

    // fails before any geometry work if the surface backend is
    // requested without a context to draw on
    pub fn select(options: &RenderOptions,
                  surface: Option<cairo::Context>) -> Result<Self> {

        match options.backend {

            BackendType::Bitmap => Ok(Backend::Bitmap(BitmapRenderer)),

            BackendType::Pdf => match surface {
                Some(ctx) => Ok(Backend::Surface(SurfaceRenderer::new(ctx))),
                None => bail!(ErrorKind::MissingSurface)
            }

        }

    }

    // generate a fresh tiling and draw it
    pub fn run(&self, options: &RenderOptions) -> Result<Artifact> {

        options.validate()?;

        let tiling = PenroseTiling::generate(options.iterations);

        self.render(&tiling, &options.viewport(), options)

    }

}

impl Renderer for Backend {

    type Artifact = Artifact;

    fn render(&self,
              tiling: &PenroseTiling,
              viewport: &Viewport,
              options: &RenderOptions) -> Result<Artifact> {

        match self {
            Backend::Bitmap(r) => Ok(Artifact::Pixels(r.render(tiling, viewport, options)?)),
            Backend::Surface(r) => {
                r.render(tiling, viewport, options)?;
                Ok(Artifact::Surface)
            }
        }

    }

}

// the plain bitmap entry point: options in, pixels out
pub fn render_bitmap(options: &RenderOptions) -> Result<PixelBuffer> {

    options.validate()?;

    let tiling = PenroseTiling::generate(options.iterations);

    BitmapRenderer.render(&tiling, &options.viewport(), options)

}

//////////////////////////////////////////////////////////////////////
