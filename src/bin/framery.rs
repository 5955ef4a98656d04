use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "framery", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the frames in the catalog.
    Frames(FramesArgs),
    /// Render a preview-resolution PNG (no frame artwork overlay).
    Preview(PreviewArgs),
    /// Render the full 1080x1920 export PNG.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Frame catalog JSON; defaults to the builtin catalog.
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input photo (PNG, JPEG, ...).
    #[arg(long)]
    image: PathBuf,

    /// Frame id; omit to preview the bare photo contain-fitted.
    #[arg(long)]
    frame: Option<String>,

    /// Frame catalog JSON; defaults to the builtin catalog.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Preview surface width in pixels.
    #[arg(long, default_value_t = 540)]
    width: u32,

    /// Preview surface height in pixels.
    #[arg(long, default_value_t = 960)]
    height: u32,

    #[command(flatten)]
    adjust: AdjustArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input photo (PNG, JPEG, ...).
    #[arg(long)]
    image: PathBuf,

    /// Frame id.
    #[arg(long)]
    frame: String,

    /// Frame catalog JSON; defaults to the builtin catalog.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Directory frame artwork paths resolve against. Defaults to the
    /// catalog file's parent directory.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    #[command(flatten)]
    adjust: AdjustArgs,

    /// Output PNG path.
    #[arg(long, default_value = framery::DEFAULT_EXPORT_FILENAME)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct AdjustArgs {
    /// How the photo relates to the frame window.
    #[arg(long, value_enum, default_value_t = FitChoice::Contain)]
    fit: FitChoice,

    /// Zoom percentage; 100 is neutral.
    #[arg(long, default_value_t = 100.0)]
    zoom: f64,

    /// Horizontal pan percentage of the visible region.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pan_x: f64,

    /// Vertical pan percentage of the visible region.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pan_y: f64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FitChoice {
    Contain,
    Cover,
}

impl AdjustArgs {
    fn to_adjustments(&self) -> framery::Adjustments {
        framery::Adjustments {
            fit: match self.fit {
                FitChoice::Contain => framery::FitMode::Contain,
                FitChoice::Cover => framery::FitMode::Cover,
            },
            zoom_percent: self.zoom,
            pan_x_percent: self.pan_x,
            pan_y_percent: self.pan_y,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frames(args) => cmd_frames(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<framery::FrameCatalog> {
    match path {
        Some(p) => Ok(framery::FrameCatalog::from_path(p)?),
        None => Ok(framery::FrameCatalog::builtin()),
    }
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    for frame in catalog.frames() {
        println!(
            "{}  ({} points, window {:.0}%x{:.0}%)",
            frame.id,
            frame.clip_polygon.len(),
            frame.bounding_box.width * 100.0,
            frame.bounding_box.height * 100.0
        );
    }
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let image = framery::load_image(&args.image)?;

    let frame = match &args.frame {
        Some(id) => Some(
            catalog
                .get(id)
                .ok_or_else(|| anyhow::anyhow!("unknown frame id '{id}'"))?,
        ),
        None => None,
    };

    let mut surface = framery::Surface::new(args.width, args.height)?;
    framery::render_preview(&mut surface, frame, Some(&image), &args.adjust.to_adjustments())?;
    framery::write_png(&surface, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let image = framery::load_image(&args.image)?;

    let frame = catalog
        .get(&args.frame)
        .ok_or_else(|| anyhow::anyhow!("unknown frame id '{}'", args.frame))?;
    let artwork_rel = frame.artwork.as_deref().ok_or_else(|| {
        anyhow::anyhow!("frame '{}' has no artwork path in the catalog", frame.id)
    })?;

    let frames_root = args
        .frames_dir
        .clone()
        .or_else(|| {
            args.catalog
                .as_deref()
                .and_then(Path::parent)
                .map(Path::to_path_buf)
        })
        .unwrap_or_else(|| PathBuf::from("."));
    let artwork = framery::load_image(&frames_root.join(artwork_rel))?;

    let surface =
        framery::render_export(frame, &image, &artwork, &args.adjust.to_adjustments())?;
    framery::write_png(&surface, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
