use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use panoweave::{
    CompositorConfig, Coordinates, DeleteOutcome, DirectoryStore, Heading, OverlapPolicy,
    PanoramaStore as _,
};

#[derive(Parser, Debug)]
#[command(name = "panoweave", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stitch directional images into a panorama and store it.
    Compose(ComposeArgs),
    /// List stored panoramas, newest first.
    List(StoreArgs),
    /// Delete a stored panorama by filename.
    Delete(DeleteArgs),
}

#[derive(Parser, Debug)]
struct StoreArgs {
    /// Directory panoramas are stored in.
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Directional image as `<heading>=<path>`; repeat once per heading.
    #[arg(long = "image", required = true, value_parser = parse_image_arg)]
    images: Vec<(f64, PathBuf)>,

    /// Capture latitude, kept verbatim in the filename.
    #[arg(long, allow_hyphen_values = true)]
    lat: String,

    /// Capture longitude, kept verbatim in the filename.
    #[arg(long, allow_hyphen_values = true)]
    lng: String,

    #[command(flatten)]
    store: StoreArgs,

    /// Compositor config JSON; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Width of the centered strip kept from each image.
    #[arg(long)]
    crop_width: Option<u32>,

    /// Feather overlap in pixels; 0 selects edge-to-edge layout.
    #[arg(long)]
    overlap: Option<u32>,

    /// Stretch inputs to this square side before cropping.
    #[arg(long)]
    resample_side: Option<u32>,

    /// Crop inputs in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct DeleteArgs {
    /// Filename as shown by `list`.
    filename: String,

    #[command(flatten)]
    store: StoreArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::List(args) => cmd_list(args),
        Command::Delete(args) => cmd_delete(args),
    }
}

fn parse_image_arg(s: &str) -> Result<(f64, PathBuf), String> {
    let (heading, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <heading>=<path>, got '{s}'"))?;
    let heading: f64 = heading
        .trim()
        .parse()
        .map_err(|e| format!("bad heading '{heading}': {e}"))?;
    Ok((heading, PathBuf::from(path)))
}

fn build_config(args: &ComposeArgs) -> anyhow::Result<CompositorConfig> {
    let mut cfg = match &args.config {
        Some(path) => CompositorConfig::read_path(path)?,
        None => CompositorConfig::default(),
    };
    if let Some(w) = args.crop_width {
        cfg.crop_width = w;
    }
    match args.overlap {
        Some(0) => cfg.overlap = OverlapPolicy::Disjoint,
        Some(overlap) => cfg.overlap = OverlapPolicy::Feathered { overlap },
        None => {}
    }
    if args.resample_side.is_some() {
        cfg.resample_side = args.resample_side;
    }
    cfg.parallel |= args.parallel;
    if args.threads.is_some() {
        cfg.threads = args.threads;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let config = build_config(&args)?;
    let coords = Coordinates::parse(&args.lat, &args.lng)?;

    let mut images = Vec::with_capacity(args.images.len());
    for (heading, path) in &args.images {
        let heading = Heading::new(*heading)?;
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        images.push(panoweave::decode_directional(heading, &bytes)?);
    }

    let store = DirectoryStore::open(&args.store.out_dir)?;
    let generated = panoweave::generate_panorama(&images, &coords, &config, &store)?;

    eprintln!(
        "wrote {} ({}x{}, {} strips)",
        store.root().join(&generated.filename).display(),
        generated.width,
        generated.height,
        generated.strip_count
    );
    println!("{}", generated.locator);
    Ok(())
}

fn cmd_list(args: StoreArgs) -> anyhow::Result<()> {
    let store = DirectoryStore::open(&args.out_dir)?;
    for entry in store.list()? {
        println!(
            "{}\t{}\t{}\t{}",
            entry.filename,
            entry.size,
            entry.modified_at.to_rfc3339(),
            entry.locator
        );
    }
    Ok(())
}

fn cmd_delete(args: DeleteArgs) -> anyhow::Result<()> {
    let store = DirectoryStore::open(&args.store.out_dir)?;
    match store.delete(&args.filename)? {
        DeleteOutcome::Removed => println!("removed"),
        DeleteOutcome::NotFound => println!("not found"),
    }
    Ok(())
}
