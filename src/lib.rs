//////////////////////////////////////////////////////////////////////
// Penrose rhombus tilings by recursive subdivision, rendered either
// with a small software rasterizer or onto a cairo surface

#[macro_use]
extern crate error_chain;

#[macro_use]
extern crate log;

//////////////////////////////////////////////////////////////////////
// use error chain so we can use Result<> everywhere
// for error handling

pub mod errors {

    error_chain!{

        foreign_links {
            Io(::std::io::Error);
            ParseInt(::std::num::ParseIntError);
            Cairo(::cairo::Error);
            Image(::image::ImageError);
        }

        errors {

            MissingSurface {
                description("missing drawing surface")
                display("a cairo context is required for the surface backend")
            }

            InvalidColor(s: String) {
                description("invalid color")
                display("invalid color: \"{}\"", s)
            }

            UnknownKeyword(s: String) {
                description("unknown keyword")
                display("unrecognized keyword: \"{}\"", s)
            }

        }

    }

}

pub mod geom;
pub mod tiling;
pub mod viewport;
pub mod color;
pub mod raster;
pub mod options;
pub mod render;

pub use crate::errors::{Error, ErrorKind, Result, ResultExt};
pub use crate::geom::{from_polar, PixelPoint, Vec2d};
pub use crate::tiling::{PenroseTiling, Shape, Triangle, PHI};
pub use crate::viewport::{Viewport, ZoomType};
pub use crate::color::Color;
pub use crate::raster::PixelBuffer;
pub use crate::options::{BackendType, OptionsUpdate, RenderOptions};
pub use crate::render::{Backend, BitmapRenderer, Renderer, SurfaceRenderer};
