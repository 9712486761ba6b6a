use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "chanpack", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack channels described by a JSON recipe into one image.
    Pack(PackArgs),
    /// Print size, channel count and persisted format of an image.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct PackArgs {
    /// Input recipe JSON.
    #[arg(long)]
    recipe: PathBuf,

    /// Output image path. Defaults to the recipe path with the output format's extension.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Output mime type; overrides the recipe's `mime_type`.
    #[arg(long)]
    mime: Option<String>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Image to inspect.
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Command::Pack(args) => cmd_pack(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_pack(args: PackArgs) -> anyhow::Result<()> {
    let recipe = chanpack::PackRecipe::read(&args.recipe)?;
    let root = args.recipe.parent().unwrap_or_else(|| Path::new("."));

    let mut store = chanpack::AssetStore::new(root);
    recipe
        .load_images(&mut store)
        .with_context(|| format!("load images for recipe '{}'", args.recipe.display()))?;
    let spec = recipe.build(&store)?;

    let mut config = recipe.export.clone();
    config.scratch_root = match config.scratch_root.take() {
        Some(dir) => Some(store.root().join(dir)),
        None => chanpack::ExportConfig::from_env().scratch_root,
    };
    let mime = args.mime.as_deref().or(recipe.mime_type());
    let out = args.out.unwrap_or_else(|| {
        args.recipe
            .with_extension(chanpack::ContainerFormat::from_mime(mime).extension())
    });

    let exporter = chanpack::Exporter::new(config);
    tracing::debug!(config = ?exporter.config(), "exporting");
    let bytes = exporter.encode(spec, mime)?;

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&out, &bytes).with_context(|| format!("write image '{}'", out.display()))?;

    tracing::info!(out = %out.display(), len = bytes.len(), "wrote packed image");
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let name = args
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let img = chanpack::ImageAsset::open(name, &args.path)?;
    let meta = img.persisted();

    println!("name:       {}", img.name());
    println!("size:       {}x{}", img.width(), img.height());
    println!("channels:   {}", img.channels());
    println!("colorspace: {}", img.colorspace().label());
    match meta.file_format {
        Some(f) => println!("format:     {}", f.mime_type()),
        None => println!("format:     other (re-saved on export)"),
    }
    Ok(())
}
