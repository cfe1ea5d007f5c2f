use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use signviz::{
    CaptureOutcome, CaptureSurface, CoverMapping, DirectorySink, LightingMode, PixelSize, Scene,
    Session, StillCamera, StillCameraProvider, StreamRequest, UriBitmapLoader, Vec2,
    ViewportSize,
};

#[derive(Parser, Debug)]
#[command(name = "signviz", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a sign over a still camera frame and write the proof PNG.
    Capture(CaptureArgs),
    /// Print the cover-fit multiplier and sign anchor for a viewport/source pair.
    Map(MapArgs),
}

#[derive(Parser, Debug)]
struct CaptureArgs {
    /// Camera frame (any format the `image` crate decodes).
    #[arg(long)]
    frame: PathBuf,

    /// Scene JSON: sign, lighting, viewport, camera zoom and gesture script.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Sign image source, overriding the scene (data URI, path or URL).
    #[arg(long)]
    sign: Option<String>,

    /// Lighting preset (`day` or `night`).
    #[arg(long)]
    lighting: Option<LightingMode>,

    /// On-screen viewport as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_viewport)]
    viewport: Option<ViewportSize>,

    /// Output directory for `signviz-proof-<ms>.png`.
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct MapArgs {
    /// On-screen viewport as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_viewport)]
    viewport: ViewportSize,

    /// Native video size as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_pixel_size)]
    source: PixelSize,

    /// Sign x offset from the viewport center, in screen pixels.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    x: f64,

    /// Sign y offset from the viewport center, in screen pixels.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    y: f64,
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
        Command::Capture(args) => cmd_capture(args),
        Command::Map(args) => cmd_map(args),
    }
}

fn cmd_capture(args: CaptureArgs) -> anyhow::Result<()> {
    let mut scene = match &args.scene {
        Some(path) => Scene::from_json_path(path)?,
        None => Scene::default(),
    };
    if let Some(viewport) = args.viewport {
        scene.viewport = viewport;
    }
    if let Some(lighting) = args.lighting {
        scene.lighting = lighting;
    }

    let mut session = Session::from_scene(&scene)?;
    if let Some(src) = &args.sign {
        session.replace_sign_image(src.as_str());
    }

    let bytes = std::fs::read(&args.frame)
        .with_context(|| format!("read frame '{}'", args.frame.display()))?;
    let frame = signviz::decode_image(&bytes)?;
    tracing::info!(
        width = frame.size.width,
        height = frame.size.height,
        lighting = session.lighting().label(),
        "capturing over still frame"
    );
    let mut provider = StillCameraProvider::new(StillCamera::new(frame));
    let mut surface = CaptureSurface::start(&mut provider, &StreamRequest::default());
    if let Some(msg) = surface.error_message() {
        anyhow::bail!("{msg}");
    }
    session.apply_camera_zoom(&mut surface);

    let assets_root = args
        .scene
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new("."));
    let mut loader = UriBitmapLoader::new(assets_root);
    let mut sink = DirectorySink::new(&args.out);

    match session.capture(&surface, &mut loader, &mut sink) {
        CaptureOutcome::Emitted(proof) => {
            eprintln!("wrote {}", args.out.join(proof.file_name()).display());
            Ok(())
        }
        CaptureOutcome::Aborted(reason) => Err(anyhow::anyhow!("capture aborted: {reason}")),
    }
}

#[derive(serde::Serialize)]
struct MapReport {
    multiplier: f64,
    anchor: [f64; 2],
    visible_source: [f64; 4],
}

fn cmd_map(args: MapArgs) -> anyhow::Result<()> {
    let mapping = CoverMapping::new(args.viewport, args.source);
    let anchor = mapping.anchor(Vec2::new(args.x, args.y));
    let visible = mapping.visible_source_rect();
    let report = MapReport {
        multiplier: mapping.multiplier(),
        anchor: [anchor.x, anchor.y],
        visible_source: [visible.x0, visible.y0, visible.x1, visible.y1],
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn split_size(s: &str) -> Result<(&str, &str), String> {
    s.split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))
}

fn parse_viewport(s: &str) -> Result<ViewportSize, String> {
    let (w, h) = split_size(s)?;
    let w: f64 = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let h: f64 = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    ViewportSize::new(w, h).map_err(|e| e.to_string())
}

fn parse_pixel_size(s: &str) -> Result<PixelSize, String> {
    let (w, h) = split_size(s)?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    PixelSize::new(w, h).map_err(|e| e.to_string())
}
