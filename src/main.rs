use std::path::Path;

#[macro_use]
extern crate error_chain;

#[macro_use]
extern crate log;

use prhomb_rs::errors::*;
use prhomb_rs::render::Artifact;
use prhomb_rs::{Backend, BackendType, RenderOptions};

//////////////////////////////////////////////////////////////////////

fn run() -> Result<()> {

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 2 {
        eprintln!("usage: {:?} [OPTIONSFILE]", args[0]);
        std::process::exit(1);
    }

    let (options, basename) = match args.get(1) {

        None => (RenderOptions::default(), "penrose"),

        Some(filename) => {

            let basename = match Path::new(filename).file_stem() {
                None => "penrose",
                Some(os_str) => os_str.to_str().unwrap_or("penrose")
            };

            (RenderOptions::from_file(filename)?, basename)

        }

    };

    let outfile = options.output_path(basename);

    info!("{:} iterations, {:}x{:} canvas, zoom {:?}, {:?} backend",
          options.iterations, options.width, options.height,
          options.zoom, options.backend);

    match options.backend {

        BackendType::Bitmap => {

            let backend = Backend::select(&options, None)?;

            if let Artifact::Pixels(pixels) = backend.run(&options)? {
                pixels.save(&outfile).chain_err(
                    || format!("writing {:}", outfile.display()))?;
            }

        }

        BackendType::Pdf => {

            let surface = cairo::PdfSurface::new(
                options.width as f64, options.height as f64, &outfile)?;

            let backend = Backend::select(&options, Some(cairo::Context::new(&surface)))?;

            backend.run(&options)?;

            if let Backend::Surface(renderer) = backend {
                renderer.into_context().show_page();
            }

        }

    }

    info!("wrote {:}", outfile.display());

    Ok(())

}

quick_main!(run);
