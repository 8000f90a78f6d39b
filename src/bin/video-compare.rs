use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use image::RgbaImage;
use tracing_subscriber::EnvFilter;
use video_compare::{
    ComparisonMode, ComparisonState, ComparisonView, ContainerSize, ExecutionMessage,
    HeadlessRig, LoadRequest, MediaRef, PointerPos, SliderDirection, TracingTelemetry, ViewOpts,
};

#[derive(Parser, Debug)]
#[command(name = "video-compare", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the comparison view headlessly and print its state and layout as JSON.
    Layout(LayoutArgs),
    /// Write a still image of the comparison for two frames.
    Preview(PreviewArgs),
    /// Write the side-by-side combination of two frames.
    Combine(CombineArgs),
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Execution message JSON.
    #[arg(long)]
    message: PathBuf,

    /// View options JSON.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Container width in pixels.
    #[arg(long, default_value_t = 500.0)]
    width: f64,

    /// Container height in pixels.
    #[arg(long, default_value_t = 320.0)]
    height: f64,

    /// Drag through these points (`x,y`, container-relative), in order.
    #[arg(long = "drag", value_parser = parse_point)]
    drag: Vec<PointerPos>,

    /// Switch mode after loading.
    #[arg(long, value_enum)]
    mode: Option<ModeChoice>,

    /// Switch direction after loading (re-centers the split).
    #[arg(long, value_enum)]
    direction: Option<DirectionChoice>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Frame A (PNG/JPEG).
    #[arg(long)]
    a: PathBuf,

    /// Frame B (PNG/JPEG).
    #[arg(long)]
    b: PathBuf,

    #[arg(long, value_enum, default_value_t = ModeChoice::Slider)]
    mode: ModeChoice,

    #[arg(long, value_enum, default_value_t = DirectionChoice::Horizontal)]
    direction: DirectionChoice,

    /// Split position in [0, 1].
    #[arg(long, default_value_t = 0.5)]
    split: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct CombineArgs {
    #[arg(long)]
    a: PathBuf,

    #[arg(long)]
    b: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Slider,
    SideBySide,
}

impl From<ModeChoice> for ComparisonMode {
    fn from(c: ModeChoice) -> Self {
        match c {
            ModeChoice::Slider => ComparisonMode::Slider,
            ModeChoice::SideBySide => ComparisonMode::SideBySide,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionChoice {
    Horizontal,
    Vertical,
    Diagonal,
}

impl From<DirectionChoice> for SliderDirection {
    fn from(c: DirectionChoice) -> Self {
        match c {
            DirectionChoice::Horizontal => SliderDirection::Horizontal,
            DirectionChoice::Vertical => SliderDirection::Vertical,
            DirectionChoice::Diagonal => SliderDirection::Diagonal,
        }
    }
}

fn parse_point(s: &str) -> Result<PointerPos, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected 'x,y', got '{s}'"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in '{s}': {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in '{s}': {e}"))?;
    Ok(PointerPos::new(x, y))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Layout(args) => cmd_layout(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Combine(args) => cmd_combine(args),
    }
}

fn read_message(path: &Path) -> anyhow::Result<ExecutionMessage> {
    let f = File::open(path).with_context(|| format!("open message '{}'", path.display()))?;
    let msg: ExecutionMessage = serde_json::from_reader(BufReader::new(f))
        .with_context(|| "parse execution message JSON")?;
    Ok(msg)
}

fn read_frame(path: &Path) -> anyhow::Result<RgbaImage> {
    Ok(image::open(path)
        .with_context(|| format!("decode frame '{}'", path.display()))?
        .to_rgba8())
}

fn write_png(img: &RgbaImage, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    img.save_with_format(out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let opts = match &args.opts {
        Some(p) => ViewOpts::from_path(p)?,
        None => ViewOpts::default(),
    };
    let msg = read_message(&args.message)?;

    let rig = HeadlessRig::new();
    let mut view = ComparisonView::with_opts(opts, Rc::new(TracingTelemetry));
    view.attach(rig.handles());

    if !view.on_executed(&msg)? {
        eprintln!("message carries no video URLs; nothing loaded");
    }
    if let Some(mode) = args.mode {
        view.set_mode(mode.into());
    }
    if let Some(direction) = args.direction {
        view.set_direction(direction.into());
    }

    let container = ContainerSize::new(args.width, args.height);
    if let Some((first, rest)) = args.drag.split_first() {
        view.pointer_down(*first, container);
        for p in rest {
            view.pointer_move(*p, container);
        }
        view.pointer_up();
    }

    let out = serde_json::json!({
        "state": view.state(),
        "layout": view.layout(),
        "clip_css": view.layout().layer_b.clip.to_css(),
        "status": rig.surface.status(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let a = read_frame(&args.a)?;
    let b = read_frame(&args.b)?;
    let mode: ComparisonMode = args.mode.into();

    let mut state = ComparisonState::default();
    state.load_media(
        LoadRequest::new(
            MediaRef::from_url(args.a.display().to_string()),
            MediaRef::from_url(args.b.display().to_string()),
        )
        .with_mode(mode)
        .with_direction(args.direction.into()),
    );
    state.set_split(args.split);
    let layout = video_compare::derive_layout(&state);

    let img = match mode {
        ComparisonMode::SideBySide => {
            let combined = video_compare::combine_side_by_side(&a, &b)?;
            video_compare::composite_preview(&combined, &combined, &layout)?
        }
        ComparisonMode::Slider => {
            let (a, b) = video_compare::match_dimensions(&a, &b);
            video_compare::composite_preview(&a, &b, &layout)?
        }
    };
    write_png(&img, &args.out)
}

fn cmd_combine(args: CombineArgs) -> anyhow::Result<()> {
    let a = read_frame(&args.a)?;
    let b = read_frame(&args.b)?;
    let combined = video_compare::combine_side_by_side(&a, &b)?;
    write_png(&combined, &args.out)
}
