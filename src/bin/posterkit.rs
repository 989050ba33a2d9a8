use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use posterkit::{Drawable as _, FontBook, Loader, PosterContext, Variables};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "posterkit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a poster document to a PNG.
    Render(RenderArgs),
    /// Load and resolve a document without rendering, then list its elements.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct LoadArgs {
    /// Input document (JSON or YAML).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Variable binding `name=value`; the value is parsed as JSON when possible.
    #[arg(long = "var", value_name = "NAME=VALUE")]
    vars: Vec<String>,

    /// JSON or YAML file of variable bindings. `--var` entries override it.
    #[arg(long = "vars", value_name = "FILE")]
    vars_file: Option<PathBuf>,

    /// Register a font file as `Family=path`.
    #[arg(long = "font", value_name = "FAMILY=PATH")]
    fonts: Vec<String>,

    /// Register every font file under a directory (family = file stem).
    #[arg(long = "fonts-dir", value_name = "DIR")]
    fonts_dirs: Vec<PathBuf>,

    /// Family used when a text element names none or an unknown one.
    #[arg(long)]
    default_font: Option<String>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    load: LoadArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Crop box `x1,y1,x2,y2` applied before rendering.
    #[arg(long, value_name = "X1,Y1,X2,Y2")]
    crop: Option<String>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[command(flatten)]
    load: LoadArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("POSTERKIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn parse_var(raw: &str) -> anyhow::Result<(String, serde_json::Value)> {
    let (name, value) = raw
        .split_once('=')
        .with_context(|| format!("variable '{raw}' must be NAME=VALUE"))?;
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_owned()));
    Ok((name.trim().to_owned(), value))
}

fn parse_crop(raw: &str) -> anyhow::Result<(u32, u32, u32, u32)> {
    let parts = raw
        .split(',')
        .map(|p| p.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("crop '{raw}' must be four non-negative integers"))?;
    match parts[..] {
        [x1, y1, x2, y2] => Ok((x1, y1, x2, y2)),
        _ => anyhow::bail!("crop '{raw}' must be x1,y1,x2,y2"),
    }
}

fn variables(args: &LoadArgs) -> anyhow::Result<Variables> {
    let mut vars = match &args.vars_file {
        Some(path) => posterkit::load::read_variables(path)
            .with_context(|| format!("read variables '{}'", path.display()))?,
        None => Variables::new(),
    };
    for raw in &args.vars {
        let (name, value) = parse_var(raw)?;
        vars.insert(name, value);
    }
    Ok(vars)
}

fn fonts(args: &LoadArgs) -> anyhow::Result<FontBook> {
    let mut book = FontBook::new();
    for dir in &args.fonts_dirs {
        book.register_dir(dir)
            .with_context(|| format!("scan fonts dir '{}'", dir.display()))?;
    }
    for raw in &args.fonts {
        let (family, path) = raw
            .split_once('=')
            .with_context(|| format!("font '{raw}' must be FAMILY=PATH"))?;
        book.register_file(family.trim(), Path::new(path.trim()), &[])
            .with_context(|| format!("register font '{family}'"))?;
    }
    if let Some(family) = &args.default_font {
        book.set_default(family)
            .with_context(|| format!("set default font '{family}'"))?;
    }
    Ok(book)
}

fn load_canvas(args: &LoadArgs) -> anyhow::Result<posterkit::Canvas> {
    let vars = variables(args)?;
    let ctx = PosterContext::new().with_fonts(fonts(args)?);
    Loader::new(&ctx)
        .load_path(&args.in_path, &vars)
        .with_context(|| format!("load poster '{}'", args.in_path.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut canvas = load_canvas(&args.load)?;
    if let Some(raw) = &args.crop {
        let (x1, y1, x2, y2) = parse_crop(raw)?;
        canvas.crop(x1, y1, x2, y2).context("crop canvas")?;
    }

    let surface = canvas.render().context("render poster")?;
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    surface
        .save_png(&args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        surface.width(),
        surface.height()
    );
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let canvas = load_canvas(&args.load)?;
    println!("canvas {}x{}", canvas.width(), canvas.height());
    for layer in canvas.layers() {
        println!("layer {} (opacity {})", layer.name, layer.settings.opacity);
        for id in &layer.elements {
            let Some(element) = canvas.get_element(id) else {
                continue;
            };
            let (x, y) = element.position();
            let (w, h) = element.size();
            let ready = if element.is_ready() { "" } else { " [not ready]" };
            println!(
                "  {id}: {} at ({x}, {y}) size {w}x{h}{ready}",
                element.kind()
            );
        }
    }
    Ok(())
}
