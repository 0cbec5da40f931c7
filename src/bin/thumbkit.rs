use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "thumbkit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a request JSON to a PNG or JPEG file.
    Render(RenderArgs),
    /// List the available layouts.
    Layouts(CatalogArgs),
    /// List the canvas size presets.
    Presets,
    /// List the background gradients.
    Gradients,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input request JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image path. The format follows the request, or the extension when the request
    /// names none.
    #[arg(long)]
    out: PathBuf,

    /// Directory image sources are resolved against (defaults to the request's directory).
    #[arg(long)]
    assets_root: Option<PathBuf>,

    /// Directory of extra `.ttf`/`.otf` files (overrides `THUMBKIT_FONT_DIR`).
    #[arg(long)]
    fonts: Option<PathBuf>,

    #[command(flatten)]
    catalog: CatalogArgs,
}

#[derive(Parser, Debug)]
struct CatalogArgs {
    /// Extra layout definitions merged over the built-ins.
    #[arg(long)]
    layouts: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Layouts(args) => cmd_layouts(args),
        Command::Presets => cmd_presets(),
        Command::Gradients => cmd_gradients(),
    }
}

fn load_layouts(args: &CatalogArgs) -> anyhow::Result<thumbkit::LayoutCatalog> {
    let mut catalog = thumbkit::LayoutCatalog::builtin()?;
    if let Some(path) = &args.layouts {
        catalog = catalog
            .with_file(path)
            .with_context(|| format!("load layouts '{}'", path.display()))?;
    }
    Ok(catalog)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("open request '{}'", args.in_path.display()))?;
    let mut req = thumbkit::RenderRequest::from_json_str(&json)?;
    if req.format.is_none()
        && let Some(fmt) = args
            .out
            .extension()
            .and_then(|e| e.to_str())
            .and_then(thumbkit::OutputFormat::from_extension)
    {
        req.format = Some(fmt.extension().to_owned());
    }

    let layouts = load_layouts(&args.catalog)?;
    let presets = thumbkit::PresetCatalog::builtin()?;
    let gradients = thumbkit::GradientCatalog::builtin()?;
    let validated = thumbkit::validate_request(
        &req,
        thumbkit::Catalogs {
            layouts: &layouts,
            presets: &presets,
            gradients: &gradients,
        },
    )?;

    let assets_root = match &args.assets_root {
        Some(root) => root.clone(),
        None => args
            .in_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };
    let assets = thumbkit::ResolvedAssets::resolve(&validated.content, &assets_root);

    let mut opts = thumbkit::CpuSurfaceOpts::from_env()?;
    if let Some(dir) = &args.fonts {
        opts.font_files = thumbkit::font_files_in_dir(dir)?;
    }
    let mut surface = thumbkit::CpuSurface::new(opts)?;

    let engine = thumbkit::LayoutEngine::new(layouts.into(), gradients.into());
    let bounds = engine.render_by_id(
        &mut surface,
        &validated.content,
        &validated.layout_id,
        &assets,
    )?;
    tracing::info!(
        layout = %validated.layout_id,
        elements = bounds.len(),
        format = %validated.format,
        "rendered"
    );

    let frame = surface.finish()?;
    let bytes = thumbkit::encode_frame(&frame, validated.format)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("write image '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_layouts(args: CatalogArgs) -> anyhow::Result<()> {
    let catalog = load_layouts(&args)?;
    for layout in catalog.iter() {
        let marker = if layout.id == catalog.default_id() {
            " (default)"
        } else {
            ""
        };
        println!(
            "{}\t{}{}\t{} elements",
            layout.id,
            layout.name,
            marker,
            layout.elements.len()
        );
    }
    Ok(())
}

fn cmd_presets() -> anyhow::Result<()> {
    let catalog = thumbkit::PresetCatalog::builtin()?;
    for p in catalog.iter() {
        println!("{}\t{}\t{}x{}", p.id, p.name, p.width, p.height);
    }
    Ok(())
}

fn cmd_gradients() -> anyhow::Result<()> {
    let catalog = thumbkit::GradientCatalog::builtin()?;
    for g in catalog.iter() {
        println!("{}\t{}\t{} -> {}", g.id, g.name, g.from.to_hex(), g.to.to_hex());
    }
    Ok(())
}
