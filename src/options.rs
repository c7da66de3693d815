use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use phf::phf_map;

use crate::color::{self, Color};
use crate::errors::*;
use crate::viewport::{Viewport, ZoomType, ZOOM_LOOKUP};

//////////////////////////////////////////////////////////////////////
// which backend draws the tiling

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum BackendType {
    Bitmap, // software rasterizer, written out as png
    Pdf     // cairo surface, written out as pdf
}

impl BackendType {

    pub fn extension(self) -> &'static str {
        match self {
            BackendType::Bitmap => "png",
            BackendType::Pdf => "pdf"
        }
    }

}

static BACKEND_LOOKUP: phf::Map<&'static str, BackendType> = phf_map! {
    "bitmap" => BackendType::Bitmap,
    "pdf" => BackendType::Pdf,
};

//////////////////////////////////////////////////////////////////////
// fully resolved render options; never modified once built

#[derive(Debug, PartialEq, Clone)]
pub struct RenderOptions {
    pub iterations: usize,       // subdivision steps after the seed wheel
    pub zoom:       ZoomType,
    pub width:      u32,
    pub height:     u32,
    pub fill_thin:  Color,
    pub fill_thick: Color,
    pub outline:    Color,       // alpha 0 disables outlines
    pub background: Color,
    pub backend:    BackendType,
    pub output:     Option<PathBuf>
}

impl Default for RenderOptions {

    fn default() -> Self {
        RenderOptions {
            iterations: 5,
            zoom: ZoomType::In,
            width: 800,
            height: 800,
            fill_thin: color::RED,
            fill_thick: color::BLUE,
            outline: color::BLACK,
            background: color::WHITE,
            backend: BackendType::Bitmap,
            output: None
        }
    }

}

impl RenderOptions {

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height, self.zoom)
    }

    pub fn draws_outline(&self) -> bool {
        self.outline.is_visible()
    }

    // a copy of these options with the given fields overridden
    pub fn with_update(&self, update: OptionsUpdate) -> Result<Self> {

        let mut rval = self.clone();

        if let Some(iterations) = update.iterations { rval.iterations = iterations; }
        if let Some(zoom) = update.zoom { rval.zoom = zoom; }
        if let Some((w, h)) = update.size { rval.width = w; rval.height = h; }
        if let Some(c) = update.fill_thin { rval.fill_thin = c; }
        if let Some(c) = update.fill_thick { rval.fill_thick = c; }
        if let Some(c) = update.outline { rval.outline = c; }
        if let Some(c) = update.background { rval.background = c; }
        if let Some(backend) = update.backend { rval.backend = backend; }
        if update.output.is_some() { rval.output = update.output; }

        rval.validate()?;

        Ok(rval)

    }

    pub fn validate(&self) -> Result<()> {

        if self.width == 0 || self.height == 0 {
            bail!("canvas size must be positive, got {:}x{:}", self.width, self.height);
        }

        Ok(())

    }

    // defaults overridden by the contents of an options file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {

        let path = path.as_ref();

        let f = File::open(path).chain_err(|| format!("opening {:}", path.display()))?;
        let mut reader = BufReader::new(f);

        let update = OptionsUpdate::parse(path, &mut reader)?;

        Self::default().with_update(update)
            .chain_err(|| format!("{:}: invalid options", path.display()))

    }

    // where to write the result if the options don't say
    pub fn output_path(&self, stem: &str) -> PathBuf {
        match &self.output {
            Some(p) => p.clone(),
            None => PathBuf::from(format!("{:}.{:}", stem, self.backend.extension()))
        }
    }

}

//////////////////////////////////////////////////////////////////////
// parser for whitespace-separated tokens following a keyword

macro_rules! parse_tokens {

    // finalizer - no more input to match, just error if remaining
    // input or return collected outputs
    ($it:ident { } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            Some(value) => Err(format!("found extra token(s) starting with \"{:}\"", value)),
            None => Ok(($($tuple),*))
        }
    );

    // string map
    ($it:ident { $name:ident from $map:expr, $($ts:tt)* } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            None => Err(format!("missing token for {:}", stringify!($name)) ),
            Some(&value) => {
                if let Some(&$name) = $map.get(value) {
                    parse_tokens!( $it { $($ts)* } -> { $($tuple,)* $name, } )
                } else {
                    let mut extended: Vec<&str> = Vec::new();
                    extended.extend($map.keys());
                    Err(format!("unexpected value \"{:}\" for {:}, expected one of: {{\"{:}\"}}",
                                value, stringify!($name), extended.join("\", \"") ))
                }
            }
        }
    );

    // name, type pair
    ($it:ident { $name:ident : $type:ident, $($ts:tt)* } -> { $($tuple:ident,)* } ) => (
        match $it.next() {
            None => Err(format!("missing token for {:}", stringify!($name)) ),
            Some(value) => if let Ok($name) = value.parse::<$type>() {
                parse_tokens!( $it { $($ts)* } -> { $($tuple,)* $name, } )
            } else {
                Err(format!("error parsing {:} as type {:}",
                            value, stringify!($type)))
            }
        }
    );

    // Entry point
    ($a:expr, { $($ts:tt)+ }) => (
        {
            let mut it = $a.iter();
            parse_tokens!( it { $($ts)* , } -> { } )
        }
    );

    // Entry point
    ($a:expr, { }) => (
        {
            let mut it = $a.iter();
            parse_tokens!( it { } -> { } )
        }
    )

}

// copy a field from src to dst, complaining if dst already had it
macro_rules! copy_field {

    ($dst:ident, $src:ident, $field:ident) => (
        if $src.$field.is_some() {
            if $dst.$field.is_some() {
                bail!("{:} is already set", stringify!($field));
            }
            $dst.$field = $src.$field;
        }
    )

}

//////////////////////////////////////////////////////////////////////
// "#rrggbb", "rgba R G B A" (normalized) or "random"

fn parse_color(rest: &[&str]) -> Result<Color> {

    if rest.first() == Some(&"random") {

        parse_tokens!(rest[1..], { })?;

        Ok(Color::random())

    } else if rest.first() == Some(&"rgba") {

        let (r, g, b, a) = parse_tokens!(rest[1..], { r: f64, g: f64, b: f64, a: f64 })?;

        Ok(Color::rgba(r, g, b, a))

    } else {

        let hex = parse_tokens!(rest, { hex: String })?;

        Color::from_hex(&hex)

    }

}

// resolve a path found in an options file relative to that file
fn rel_path(orig_filename: &Path, child_filename: String) -> PathBuf {

    match orig_filename.parent() {
        None => PathBuf::from(child_filename),
        Some(parent) => parent.join(child_filename)
    }

}

//////////////////////////////////////////////////////////////////////
// a partial set of options supplied by the caller, each field set
// at most once

#[derive(Debug, Default, PartialEq, Clone)]
pub struct OptionsUpdate {
    pub iterations: Option<usize>,
    pub zoom:       Option<ZoomType>,
    pub size:       Option<(u32, u32)>,
    pub fill_thin:  Option<Color>,
    pub fill_thick: Option<Color>,
    pub outline:    Option<Color>,
    pub background: Option<Color>,
    pub backend:    Option<BackendType>,
    pub output:     Option<PathBuf>
}

impl OptionsUpdate {

    pub fn new() -> Self {
        Default::default()
    }

    pub fn merge(&mut self, other: OptionsUpdate) -> Result<()> {

        copy_field!(self, other, iterations);
        copy_field!(self, other, zoom);
        copy_field!(self, other, size);
        copy_field!(self, other, fill_thin);
        copy_field!(self, other, fill_thick);
        copy_field!(self, other, outline);
        copy_field!(self, other, background);
        copy_field!(self, other, backend);
        copy_field!(self, other, output);

        Ok(())

    }

    fn parse_keyword(filename: &Path,
                     keyword: &str,
                     rest: &[&str]) -> Result<OptionsUpdate> {

        let mut update = OptionsUpdate::new();

        match keyword {

            "iterations" => {
                let n = parse_tokens!(rest, { n: usize })?;
                update.iterations = Some(n);
            },

            "zoom" => {
                let zoom = parse_tokens!(rest, { zoom from ZOOM_LOOKUP })?;
                update.zoom = Some(zoom);
            },

            "size" => {
                let (w, h) = parse_tokens!(rest, { width: u32, height: u32 })?;
                update.size = Some((w, h));
            },

            "thin" => { update.fill_thin = Some(parse_color(rest)?); },

            "thick" => { update.fill_thick = Some(parse_color(rest)?); },

            "outline" => { update.outline = Some(parse_color(rest)?); },

            "background" => { update.background = Some(parse_color(rest)?); },

            "no_outline" => {
                parse_tokens!(rest, { })?;
                update.outline = Some(Color::rgba(0.0, 0.0, 0.0, 0.0));
            },

            "backend" => {
                let backend = parse_tokens!(rest, { backend from BACKEND_LOOKUP })?;
                update.backend = Some(backend);
            },

            "output" => {
                let ofilename = parse_tokens!(rest, { filename: String })?;
                update.output = Some(rel_path(filename, ofilename));
            },

            _ => {
                bail!(ErrorKind::UnknownKeyword(keyword.to_string()));
            }

        };

        Ok(update)

    }

    fn update_from(&mut self, filename: &Path, line: &str) -> Result<()> {

        let mut words = line.split_whitespace();

        // a line starting with '#' is all comment
        let keyword = match words.next() {
            None => return Ok(()),
            Some(w) if w.starts_with('#') => return Ok(()),
            Some(w) => w
        };

        // after the keyword, '#' starts a comment unless it is a hex color
        let rest: Vec<&str> = words
            .take_while(|t| !t.starts_with('#') || Color::from_hex(t).is_ok())
            .collect();

        let update = Self::parse_keyword(filename, keyword, &rest).chain_err(
            || format!("while parsing keyword {:}", keyword))?;

        self.merge(update)

    }

    pub fn parse(filename: &Path, istr: &mut impl BufRead) -> Result<OptionsUpdate> {

        let mut update = OptionsUpdate::new();
        let mut lineno = 0;

        loop {

            let mut line = String::new();

            lineno += 1;

            let len = istr.read_line(&mut line).chain_err(
                || format!("{:}:{:}: read error", filename.display(), lineno))?;

            if len == 0 {
                break;
            }

            update.update_from(filename, line.as_str()).chain_err(
                || format!("{:}:{:}: parse error", filename.display(), lineno))?;

        }

        Ok(update)

    }

}

//////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {

    use super::*;

    fn parse_str(text: &str) -> Result<OptionsUpdate> {
        OptionsUpdate::parse(Path::new("dir/test.opts"), &mut text.as_bytes())
    }

    #[test]
    fn defaults() {

        let opts = RenderOptions::default();

        assert_eq!(opts.iterations, 5);
        assert_eq!(opts.zoom, ZoomType::In);
        assert_eq!((opts.width, opts.height), (800, 800));
        assert_eq!(opts.fill_thin, color::RED);
        assert_eq!(opts.fill_thick, color::BLUE);
        assert!(opts.draws_outline());
        assert_eq!(opts.output_path("penrose"), PathBuf::from("penrose.png"));

    }

    #[test]
    fn parse_full_file() {

        let text = "\
# a comment line

iterations 3
zoom out            # trailing comment
size 320 200
thin #00ff00
thick rgba 0.25 0.5 0.75 1
background FFFFFF   # white
no_outline
backend pdf
output out.pdf
";

        let update = parse_str(text).unwrap();
        let opts = RenderOptions::default().with_update(update).unwrap();

        assert_eq!(opts.iterations, 3);
        assert_eq!(opts.zoom, ZoomType::Out);
        assert_eq!((opts.width, opts.height), (320, 200));
        assert_eq!(opts.fill_thin, Color::rgb(0.0, 1.0, 0.0));
        assert_eq!(opts.fill_thick, Color::rgba(0.25, 0.5, 0.75, 1.0));
        assert_eq!(opts.background, color::WHITE);
        assert!(!opts.draws_outline());
        assert_eq!(opts.backend, BackendType::Pdf);
        assert_eq!(opts.output_path("ignored"), Path::new("dir").join("out.pdf"));

    }

    #[test]
    fn hex_looking_comment_lines_are_skipped() {

        let text = "#facade pattern, red on blue\n  #added later\niterations 2\n";

        let update = parse_str(text).unwrap();

        assert_eq!(update.iterations, Some(2));
        assert_eq!(update, OptionsUpdate { iterations: Some(2), ..Default::default() });

        // hex colors still work as arguments
        let update = parse_str("thin #facade #comment\n").unwrap();
        assert_eq!(update.fill_thin, Some(Color::from_hex("#facade").unwrap()));

    }

    #[test]
    fn random_colors() {

        let update = parse_str("thin random\nbackground random  # surprise\n").unwrap();

        for c in &[update.fill_thin.unwrap(), update.background.unwrap()] {
            assert!((0.0..=1.0).contains(&c.r));
            assert!((0.0..=1.0).contains(&c.g));
            assert!((0.0..=1.0).contains(&c.b));
            assert_eq!(c.a, 1.0);
        }

        assert!(parse_str("thick random please\n").is_err());

    }

    #[test]
    fn partial_update_keeps_defaults() {

        let update = parse_str("iterations 0\n").unwrap();
        let opts = RenderOptions::default().with_update(update).unwrap();

        assert_eq!(opts.iterations, 0);
        assert_eq!(opts.fill_thick, color::BLUE);
        assert_eq!(opts.backend, BackendType::Bitmap);

    }

    #[test]
    fn duplicate_field_is_an_error() {

        assert!(parse_str("iterations 2\niterations 3\n").is_err());
        assert!(parse_str("outline #000000\nno_outline\n").is_err());

    }

    #[test]
    fn bad_lines_are_errors() {

        assert!(parse_str("zoom sideways\n").is_err());
        assert!(parse_str("iterations -1\n").is_err());
        assert!(parse_str("size 10\n").is_err());
        assert!(parse_str("size 10 10 10\n").is_err());
        assert!(parse_str("thin #nothex\n").is_err());
        assert!(parse_str("no_outline please\n").is_err());

    }

    #[test]
    fn unknown_keyword_reports_line() {

        let err = parse_str("iterations 1\nsparkles 11\n").unwrap_err();

        assert!(err.to_string().contains("dir/test.opts:2"));
        assert!(err.iter().any(|e| e.to_string().contains("sparkles")));

    }

    #[test]
    fn zero_size_is_rejected() {

        let update = OptionsUpdate { size: Some((0, 10)), ..Default::default() };

        assert!(RenderOptions::default().with_update(update).is_err());

    }

}
