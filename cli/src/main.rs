mod batch;
mod browser;
mod settings;
mod spinner;

use anyhow::{Result, bail};
use batch::{ColourJob, MonoJob, Summary, collect_inputs};
use clap::{Args, Parser, Subcommand};
use glyphmap::config::DEFAULT_NUM_BUCKETS;
use glyphmap::{ColorMode, HtmlStyle, MaxSize, RenderConfig};
use settings::{RenderSettings, Settings};
use std::path::PathBuf;

const DEFAULT_EXTENSION: &str = "jpg";
const DEFAULT_MONO_OUTPUT: &str = "GeneratedASCII";
const DEFAULT_COLOUR_OUTPUT: &str = "GeneratedHTML";
const DEFAULT_FONT: &str = "Arial.ttf";
const DEFAULT_CACHE: &str = "data/rank_cache.json";

#[derive(Parser, Debug)]
#[command(
    name = "glyphmap",
    version,
    about = "Convert images into ASCII art and coloured HTML"
)]
struct Cli {
    /// Settings file (default: ./glyphmap.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Do not show the loading spinner
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Grayscale ASCII art, written as .txt and .html
    Mono(MonoArgs),
    /// One coloured symbol per pixel, written as .html
    Colour(ColourArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Image file, or directory of images
    input: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extension of images to pick up from a directory [default: jpg]
    #[arg(long)]
    ext: Option<String>,

    /// Maximum rows of the output grid [default: 300]
    #[arg(long)]
    max_height: Option<u32>,

    /// Maximum columns before stretching [default: 300]
    #[arg(long)]
    max_width: Option<u32>,

    /// Horizontal stretch factor [default: 1.5]
    #[arg(long)]
    h_stretch: Option<f32>,

    /// HTML line height
    #[arg(long)]
    line_height: Option<f32>,

    /// HTML font size in pixels
    #[arg(long)]
    font_size: Option<f32>,
}

#[derive(Args, Debug)]
struct MonoArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Number of luminance buckets [default: 80]
    #[arg(short = 'n', long)]
    buckets: Option<usize>,

    /// Rank symbols by descending coverage (inverts the rendering)
    #[arg(short, long)]
    reverse: bool,

    /// Symbols to rank, one per character [default: printable ASCII]
    #[arg(long)]
    symbols: Option<String>,

    /// Font used to measure glyph coverage [default: Arial.ttf]
    #[arg(long)]
    font: Option<PathBuf>,

    /// Rank cache file [default: data/rank_cache.json]
    #[arg(long)]
    cache: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ColourArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Symbol drawn in every cell [default: #]
    #[arg(long)]
    symbol: Option<String>,

    /// Also write palette-reduced pages for these cluster counts
    #[arg(short = 'k', long, value_delimiter = ',')]
    clusters: Vec<usize>,

    /// Page background colour [default: white]
    #[arg(long)]
    background: Option<String>,

    /// Open each page in a browser
    #[arg(long)]
    open: bool,

    /// Browser command, `%s` is replaced by the page URL
    #[arg(long)]
    browser: Option<String>,
}

fn max_size(common: &CommonArgs, render: &RenderSettings) -> MaxSize {
    let defaults = MaxSize::default();
    MaxSize {
        height: common
            .max_height
            .or(render.max_height)
            .unwrap_or(defaults.height),
        width: common
            .max_width
            .or(render.max_width)
            .unwrap_or(defaults.width),
    }
}

fn h_stretch(common: &CommonArgs, render: &RenderSettings) -> f32 {
    common
        .h_stretch
        .or(render.h_stretch)
        .unwrap_or(RenderConfig::default().h_stretch)
}

fn inputs(common: &CommonArgs, render: &RenderSettings) -> Result<Vec<PathBuf>> {
    let ext = common
        .ext
        .as_deref()
        .or(render.extension.as_deref())
        .unwrap_or(DEFAULT_EXTENSION);
    let files = collect_inputs(&common.input, ext)?;
    if files.is_empty() {
        bail!(
            "no .{} files found in '{}'",
            ext.trim_start_matches('.'),
            common.input.display()
        );
    }
    Ok(files)
}

fn mono_job(args: MonoArgs, settings: Settings, spinner: bool) -> Result<MonoJob> {
    let render = &settings.render;
    let mono = settings.mono;
    let defaults = HtmlStyle::monochrome();

    let symbols = args
        .symbols
        .or(mono.symbols)
        .map(|s| s.chars().map(String::from).collect());
    let num_buckets = args
        .buckets
        .or(mono.buckets)
        .unwrap_or(DEFAULT_NUM_BUCKETS);

    Ok(MonoJob {
        inputs: inputs(&args.common, render)?,
        output_dir: args
            .common
            .output
            .clone()
            .or(mono.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MONO_OUTPUT)),
        config: RenderConfig {
            max_size: max_size(&args.common, render),
            h_stretch: h_stretch(&args.common, render),
            mode: ColorMode::Luminance {
                symbols,
                num_buckets,
                reverse: args.reverse || mono.reverse.unwrap_or(false),
            },
        },
        font: args
            .font
            .or(mono.font)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FONT)),
        cache: args
            .cache
            .or(mono.cache)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE)),
        style: HtmlStyle {
            line_height: args
                .common
                .line_height
                .or(mono.line_height)
                .unwrap_or(defaults.line_height),
            font_size: args
                .common
                .font_size
                .or(mono.font_size)
                .unwrap_or(defaults.font_size),
            ..defaults
        },
        spinner,
    })
}

fn colour_job(args: ColourArgs, settings: Settings, spinner: bool) -> Result<ColourJob> {
    let render = &settings.render;
    let colour = settings.colour;
    let defaults = HtmlStyle::colour();

    let mut config = RenderConfig {
        max_size: max_size(&args.common, render),
        h_stretch: h_stretch(&args.common, render),
        ..RenderConfig::colour()
    };
    if let Some(symbol) = args.symbol.or(colour.symbol) {
        config.mode = ColorMode::Colour {
            symbol,
            num_clusters: None,
        };
    }

    let clusters = if args.clusters.is_empty() {
        colour.clusters.unwrap_or_default()
    } else {
        args.clusters
    };

    Ok(ColourJob {
        inputs: inputs(&args.common, render)?,
        output_dir: args
            .common
            .output
            .clone()
            .or(colour.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_COLOUR_OUTPUT)),
        config,
        clusters,
        style: HtmlStyle {
            line_height: args
                .common
                .line_height
                .or(colour.line_height)
                .unwrap_or(defaults.line_height),
            font_size: args
                .common
                .font_size
                .or(colour.font_size)
                .unwrap_or(defaults.font_size),
            background: args
                .background
                .or(colour.background)
                .unwrap_or(defaults.background),
        },
        spinner,
        open: args.open,
        browser: args.browser.or(colour.browser),
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configure logging
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let settings = Settings::load(cli.config.as_deref())?;
    let spinner = !cli.quiet;

    let summary: Summary = match cli.command {
        Command::Mono(args) => {
            let job = mono_job(args, settings, spinner)?;
            log::info!(
                "converting {} image(s) to ASCII in {}",
                job.inputs.len(),
                job.output_dir.display()
            );
            job.run()?
        }
        Command::Colour(args) => {
            let job = colour_job(args, settings, spinner)?;
            log::info!(
                "converting {} image(s) to colour HTML in {}",
                job.inputs.len(),
                job.output_dir.display()
            );
            job.run()?
        }
    };

    log::info!(
        "conversion completed: {} written, {} failed",
        summary.converted,
        summary.failed
    );
    if summary.failed > 0 {
        bail!("{} conversion(s) failed", summary.failed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_mono() {
        let cli = Cli::try_parse_from([
            "glyphmap", "mono", "Images", "-n", "40", "--reverse", "--max-height", "100",
        ])
        .unwrap();
        let Command::Mono(args) = cli.command else {
            panic!("expected mono");
        };
        assert_eq!(args.buckets, Some(40));
        assert!(args.reverse);
        assert_eq!(args.common.max_height, Some(100));
        assert_eq!(args.common.input, PathBuf::from("Images"));
    }

    #[test]
    fn test_cli_parses_cluster_list() {
        let cli = Cli::try_parse_from(["glyphmap", "colour", "Images", "-k", "5,10,15", "-q"])
            .unwrap();
        assert!(cli.quiet);
        let Command::Colour(args) = cli.command else {
            panic!("expected colour");
        };
        assert_eq!(args.clusters, vec![5, 10, 15]);
    }

    #[test]
    fn test_flags_override_settings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"").unwrap();
        let input = dir.path().to_string_lossy().into_owned();

        let settings: Settings = toml::from_str(
            r#"
            [render]
            max_height = 50
            max_width = 60
            [mono]
            buckets = 12
            symbols = ".:@"
            "#,
        )
        .unwrap();

        let cli = Cli::try_parse_from(["glyphmap", "mono", &input, "--max-width", "70"]).unwrap();
        let Command::Mono(args) = cli.command else {
            panic!("expected mono");
        };
        let job = mono_job(args, settings, false).unwrap();

        assert_eq!(job.config.max_size, MaxSize { height: 50, width: 70 });
        assert_eq!(job.config.h_stretch, 1.5);
        assert_eq!(
            job.config.mode,
            ColorMode::Luminance {
                symbols: Some(vec![".".into(), ":".into(), "@".into()]),
                num_buckets: 12,
                reverse: false,
            }
        );
        assert_eq!(job.font, PathBuf::from(DEFAULT_FONT));
        assert_eq!(job.output_dir, PathBuf::from(DEFAULT_MONO_OUTPUT));
        assert_eq!(job.inputs.len(), 1);
    }

    #[test]
    fn test_colour_job_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"").unwrap();
        let input = dir.path().to_string_lossy().into_owned();

        let cli = Cli::try_parse_from(["glyphmap", "colour", &input, "--background", "black"])
            .unwrap();
        let Command::Colour(args) = cli.command else {
            panic!("expected colour");
        };
        let job = colour_job(args, Settings::default(), false).unwrap();

        assert_eq!(job.config, RenderConfig::colour());
        assert!(job.clusters.is_empty());
        assert_eq!(job.style.background, "black");
        assert_eq!(job.style.line_height, 1.0);
    }

    #[test]
    fn test_empty_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from(["glyphmap", "colour", &input]).unwrap();
        let Command::Colour(args) = cli.command else {
            panic!("expected colour");
        };
        assert!(colour_job(args, Settings::default(), false).is_err());
    }
}
