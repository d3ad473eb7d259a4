use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "walkmint", version, about = "Animated random-walk art")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Walk configuration JSON (missing fields use defaults).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for a reproducible walk (overrides the config file).
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the complete walk as a PNG, optionally with ERC-721 metadata.
    Still(StillArgs),
    /// Render the canvas as it looks after N frame callbacks.
    Frame(FrameArgs),
    /// Render the animation to MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Write the generated walk points as JSON.
    Path(PathArgs),
}

#[derive(Parser, Debug)]
struct StillArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Also write token metadata JSON here.
    #[arg(long)]
    metadata: Option<PathBuf>,

    /// Image URI recorded in the metadata (defaults to the PNG file name).
    #[arg(long)]
    image_uri: Option<String>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Number of frames to run (0 = freshly cleared canvas).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Extra frames holding the finished image.
    #[arg(long, default_value_t = 0)]
    hold_frames: u32,
}

#[derive(Parser, Debug)]
struct PathArgs {
    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.common.verbose);

    let cfg = load_config(&cli.common)?;
    match cli.cmd {
        Command::Still(args) => cmd_still(cfg, args),
        Command::Frame(args) => cmd_frame(cfg, args),
        Command::Render(args) => cmd_render(cfg, args),
        Command::Path(args) => cmd_path(cfg, args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(common: &CommonArgs) -> anyhow::Result<walkmint::WalkConfig> {
    let mut cfg = match &common.config {
        Some(path) => walkmint::WalkConfig::from_json_file(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => walkmint::WalkConfig::default(),
    };
    if common.seed.is_some() {
        cfg.seed = common.seed;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn new_studio(
    cfg: walkmint::WalkConfig,
) -> anyhow::Result<walkmint::Studio<walkmint::CpuSurface>> {
    let surface = walkmint::CpuSurface::new(cfg.canvas, cfg.background, cfg.stroke_width)?;
    let mut studio = walkmint::Studio::from_config(cfg);
    studio.attach_surface(surface);
    studio.generate();
    Ok(studio)
}

fn cmd_still(cfg: walkmint::WalkConfig, args: StillArgs) -> anyhow::Result<()> {
    let mut studio = new_studio(cfg)?;
    let frame = studio
        .finished_raster()
        .context("no surface attached (bug)")?;
    walkmint::write_png(&frame, &args.out)?;
    eprintln!("wrote {}", args.out.display());

    if let Some(md_path) = &args.metadata {
        let artwork = studio.artwork().context("no artwork generated (bug)")?;
        let image_uri = args
            .image_uri
            .clone()
            .unwrap_or_else(|| file_name_or_path(&args.out));
        let md = walkmint::TokenMetadata::for_artwork(artwork, studio.config(), image_uri);
        md.write_json(md_path)?;
        eprintln!("wrote {}", md_path.display());
    }
    Ok(())
}

fn cmd_frame(cfg: walkmint::WalkConfig, args: FrameArgs) -> anyhow::Result<()> {
    let mut studio = new_studio(cfg)?;
    let ran = studio.run_until_idle(args.frame);
    tracing::debug!(requested = args.frame, ran, "advanced animation");

    let frame = studio.snapshot().context("no surface attached (bug)")?;
    walkmint::write_png(&frame, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(cfg: walkmint::WalkConfig, args: RenderArgs) -> anyhow::Result<()> {
    let mut studio = new_studio(cfg)?;
    let stats = walkmint::record_mp4(&mut studio, &args.out, args.hold_frames)?;
    eprintln!(
        "wrote {} ({} frames)",
        args.out.display(),
        stats.video_frames
    );
    Ok(())
}

fn cmd_path(cfg: walkmint::WalkConfig, args: PathArgs) -> anyhow::Result<()> {
    let mut rng = walkmint::rng_from_seed(cfg.seed);
    let artwork = walkmint::Artwork::generate(&cfg, &mut rng);

    walkmint::ensure_parent_dir(&args.out)?;
    let f = std::fs::File::create(&args.out)
        .with_context(|| format!("create '{}'", args.out.display()))?;
    serde_json::to_writer_pretty(f, artwork.path.as_ref()).context("write points JSON")?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn file_name_or_path(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
