// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#![allow(clippy::uninlined_format_args)]

use std::path;

use svgdraw::{Drawing, DrawingGroup, Options, Size, Source, SvgViewbox};

fn main() {
    if let Err(e) = process() {
        eprintln!("Error: {}.", e);
        std::process::exit(1);
    }
}

fn process() -> Result<(), String> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            println!("{}", HELP);
            return Err(e);
        }
    };

    // Do not print warning during the ID querying.
    if !(args.query_all || args.quiet) {
        if let Ok(()) = log::set_logger(&LOGGER) {
            if args.verbose {
                log::set_max_level(log::LevelFilter::Debug);
            } else {
                log::set_max_level(log::LevelFilter::Warn);
            }
        }
    }

    let mut view = SvgViewbox::new(args.source);
    view.options = args.options;
    view.auto_size = args.auto_size;
    view.load().map_err(|e| e.to_string())?;

    let drawing = match view.drawing() {
        Some(v) => v,
        None => return Err("nothing was loaded".to_string()),
    };

    if args.query_all {
        return query_all(&drawing.root);
    }

    let size = view.desired_size(args.available);
    let ts = view.render_transform(size);
    println!(
        "layout {}x{} scale={},{} offset={},{}",
        size.width(),
        size.height(),
        ts.sx,
        ts.sy,
        ts.tx,
        ts.ty
    );
    print!("{}", drawing.dump());

    Ok(())
}

const HELP: &str = "\
svgdraw converts an SVG into a drawing tree and prints it.

USAGE:
  svgdraw [OPTIONS] <in-svg>  # from file
  svgdraw [OPTIONS] -         # from stdin

  svgdraw in.svg
  svgdraw --runtime in.svgz
  svgdraw 'data:image/svg+xml;base64,...'
  svgdraw --query-all in.svg

OPTIONS:
      --help                    Prints this help
  -V, --version                 Prints version

  -w, --width LENGTH            Sets the available width in pixels
  -h, --height LENGTH           Sets the available height in pixels
      --auto-size               Uses the SVG size instead of the available one
      --dpi DPI                 Sets the resolution
                                [default: 96] [possible values: 10..4000 (inclusive)]
      --font-size SIZE          Sets the default font size that will be
                                used when no 'font-size' is present
                                [default: 12] [possible values: 1..192 (inclusive)]
      --languages LANG          Sets a comma-separated list of languages that
                                will be used during the 'systemLanguage'
                                attribute resolving
                                Examples: 'en-US', 'en-US, ru-RU', 'en, ru'
                                [default: en]
      --resources-dir DIR       Sets a directory that will be used during
                                relative paths resolving.
                                [default: input file directory]

      --no-optimize             Keeps source figures in geometries
      --runtime                 Attaches element ids and classes as metadata

      --query-all               Queries all named drawings with bounding boxes
      --quiet                   Disables warnings
      --verbose                 Enables debug messages

ARGS:
  <in-svg>                      Input file, '-' or a data URI
";

#[derive(Debug)]
struct CliArgs {
    width: Option<u32>,
    height: Option<u32>,
    auto_size: bool,
    dpi: u32,
    font_size: u32,
    languages: Vec<String>,
    resources_dir: Option<path::PathBuf>,

    no_optimize: bool,
    runtime: bool,

    query_all: bool,
    quiet: bool,
    verbose: bool,

    input: String,
}

fn collect_args() -> Result<CliArgs, pico_args::Error> {
    let mut input = pico_args::Arguments::from_env();

    if input.contains("--help") {
        print!("{}", HELP);
        std::process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    Ok(CliArgs {
        width: input.opt_value_from_fn(["-w", "--width"], parse_length)?,
        height: input.opt_value_from_fn(["-h", "--height"], parse_length)?,
        auto_size: input.contains("--auto-size"),
        dpi: input.opt_value_from_fn("--dpi", parse_dpi)?.unwrap_or(96),
        font_size: input
            .opt_value_from_fn("--font-size", parse_font_size)?
            .unwrap_or(12),
        languages: input
            .opt_value_from_fn("--languages", parse_languages)?
            .unwrap_or_else(|| vec!["en".to_string()]),
        resources_dir: input.opt_value_from_str("--resources-dir")?,

        no_optimize: input.contains("--no-optimize"),
        runtime: input.contains("--runtime"),

        query_all: input.contains("--query-all"),
        quiet: input.contains("--quiet"),
        verbose: input.contains("--verbose"),

        input: input.free_from_str()?,
    })
}

fn parse_dpi(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid number")?;

    if (10..=4000).contains(&n) {
        Ok(n)
    } else {
        Err("DPI out of bounds".to_string())
    }
}

fn parse_length(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid length")?;

    if n > 0 {
        Ok(n)
    } else {
        Err("LENGTH cannot be zero".to_string())
    }
}

fn parse_font_size(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid number")?;

    if n > 0 && n <= 192 {
        Ok(n)
    } else {
        Err("font size out of bounds".to_string())
    }
}

fn parse_languages(s: &str) -> Result<Vec<String>, String> {
    let langs: Vec<String> = s
        .split(',')
        .map(|lang| lang.trim().to_string())
        .filter(|lang| !lang.is_empty())
        .collect();

    if langs.is_empty() {
        return Err("languages list cannot be empty".to_string());
    }

    Ok(langs)
}

struct Args {
    source: Source,
    available: Option<Size>,
    auto_size: bool,
    query_all: bool,
    quiet: bool,
    verbose: bool,
    options: Options,
}

fn parse_args() -> Result<Args, String> {
    let args = collect_args().map_err(|e| e.to_string())?;

    if args.quiet && args.verbose {
        return Err("--quiet and --verbose cannot be set together".to_string());
    }

    let source = if args.input == "-" {
        Source::Stream(Box::new(std::io::stdin()))
    } else if args.input.starts_with("data:") {
        Source::DataUri(args.input.clone())
    } else {
        Source::File(args.input.clone().into())
    };

    if args.input == "-" && args.resources_dir.is_none() {
        println!("Warning: Make sure to set --resources-dir when reading SVG from stdin.");
    }

    let mut options = Options::default();

    let available = match (args.width, args.height) {
        (Some(w), Some(h)) => Size::from_wh(w as f32, h as f32),
        (Some(w), None) => Size::from_wh(w as f32, options.default_size.height()),
        (None, Some(h)) => Size::from_wh(options.default_size.width(), h as f32),
        (None, None) => None,
    };

    if let Some(size) = available {
        options.default_size = size;
    }

    let resources_dir = match args.resources_dir {
        Some(v) => Some(v),
        None if matches!(source, Source::File(_)) => {
            // Get input file absolute directory.
            std::fs::canonicalize(&args.input)
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        }
        None => None,
    };

    // Relative input paths must not be resolved against the input directory again.
    let source = match source {
        Source::File(path) => match std::fs::canonicalize(&path) {
            Ok(abs) => Source::File(abs),
            Err(_) => Source::File(path),
        },
        source => source,
    };

    options.optimize_path = !args.no_optimize;
    options.include_runtime = args.runtime;
    options.resources_dir = resources_dir;
    options.dpi = args.dpi as f32;
    options.font_size = args.font_size as f32;
    options.languages = args.languages;

    Ok(Args {
        source,
        available,
        auto_size: args.auto_size,
        query_all: args.query_all,
        quiet: args.quiet,
        verbose: args.verbose,
        options,
    })
}

fn query_all(root: &DrawingGroup) -> Result<(), String> {
    let count = query_all_impl(root);

    if count == 0 {
        return Err("the file has no valid ID's".to_string());
    }

    Ok(())
}

fn query_all_impl(parent: &DrawingGroup) -> usize {
    let mut count = 0;
    for drawing in &parent.children {
        if let Some(name) = drawing.name() {
            count += 1;

            fn round_len(v: f32) -> f32 {
                (v * 1000.0).round() / 1000.0
            }

            match drawing.bounds() {
                Some(bbox) => println!(
                    "{},{},{},{},{}",
                    name,
                    round_len(bbox.x()),
                    round_len(bbox.y()),
                    round_len(bbox.width()),
                    round_len(bbox.height())
                ),
                None => println!("{}", name),
            }
        }

        if let Drawing::Group(ref group) = drawing {
            count += query_all_impl(group);
        }
    }

    count
}

/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let line = record.line().unwrap_or(0);
            let args = record.args();

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}:{}): {}", target, line, args),
                log::Level::Warn => eprintln!("Warning (in {}:{}): {}", target, line, args),
                log::Level::Info => eprintln!("Info (in {}:{}): {}", target, line, args),
                log::Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, args),
                log::Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, args),
            }
        }
    }

    fn flush(&self) {}
}
