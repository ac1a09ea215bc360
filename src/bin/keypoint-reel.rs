use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "keypoint-reel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Serve the HTTP visualization API.
    Serve(ServeArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Keypoint JSON path or HTTP(S) URL.
    #[arg(long = "in")]
    input: String,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Handling of coordinates outside [0, 1].
    #[arg(long, value_enum, default_value_t = keypoint_reel::CoordinatePolicy::Clip)]
    coordinates: keypoint_reel::CoordinatePolicy,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Keypoint JSON path or HTTP(S) URL.
    #[arg(long = "in")]
    input: String,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, value_enum, default_value_t = keypoint_reel::VideoCodec::Mpeg4)]
    codec: keypoint_reel::VideoCodec,

    /// Handling of coordinates outside [0, 1].
    #[arg(long, value_enum, default_value_t = keypoint_reel::CoordinatePolicy::Clip)]
    coordinates: keypoint_reel::CoordinatePolicy,
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Listen address, overrides `HOST` and `PORT`.
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Directory for per-request output, overrides `OUTPUT_DIR`.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = keypoint_reel::VideoCodec::Mpeg4)]
    codec: keypoint_reel::VideoCodec,

    /// Handling of coordinates outside [0, 1].
    #[arg(long, value_enum, default_value_t = keypoint_reel::CoordinatePolicy::Clip)]
    coordinates: keypoint_reel::CoordinatePolicy,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Serve(args) => cmd_serve(args),
    }
}

/// Load a document. Remote ones are downloaded into a scratch directory under the system
/// temp dir, removed again before returning.
fn load_record(input: &str) -> anyhow::Result<keypoint_reel::AnimationRecord> {
    let source = keypoint_reel::InputSource::parse(input);
    let scratch = keypoint_reel::RequestDir::create(&std::env::temp_dir().join("keypoint-reel"))?;
    Ok(source.load(scratch.path())?)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let record = load_record(&args.input)?;

    let frame = usize::try_from(args.frame)
        .ok()
        .and_then(|i| record.frames.get(i))
        .with_context(|| {
            format!(
                "frame {} out of range (document has {} frames)",
                args.frame,
                record.len()
            )
        })?;

    let opts = keypoint_reel::RenderOpts {
        coordinates: args.coordinates,
        ..Default::default()
    };
    let rendered = keypoint_reel::render_frame(frame, &opts)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    rendered
        .image()
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let record = load_record(&args.input)?;

    let opts = keypoint_reel::RenderOpts {
        codec: args.codec,
        coordinates: args.coordinates,
        ..Default::default()
    };
    let stats = keypoint_reel::render_to_mp4(&record, &args.out, &opts)?;

    eprintln!("wrote {} ({} frames)", args.out.display(), stats.frames_total);
    Ok(())
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut cfg = keypoint_reel::ServerConfig::from_env()?;
    if let Some(addr) = args.addr {
        cfg = cfg.with_addr(addr);
    }
    if let Some(dir) = args.output_dir {
        cfg = cfg.with_output_dir(dir);
    }
    let opts = keypoint_reel::RenderOpts {
        codec: args.codec,
        coordinates: args.coordinates,
        ..Default::default()
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    runtime.block_on(keypoint_reel::server::serve(cfg, opts))
}
