use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::thread::JoinHandle;
use trail_journal::assets::{
    AssetHandle, AssetPicker, DirectoryPicker, FileAssets, PathPicker, PickerRequest,
};
use trail_journal::draft::PostDraft;
use trail_journal::export::{self, DirectoryExporter};
use trail_journal::imaging::RustBackend;
use trail_journal::location::{Coordinate, FixedLocation, LocationProvider, NoLocation};
use trail_journal::pipeline::Pipeline;
use trail_journal::tag::Tag;
use trail_journal::{config, output};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "trail-journal")]
#[command(about = "Compose trail journal posts with photos")]
#[command(long_about = "\
Compose trail journal posts with photos

A post is a header image, a handful of photos, and a few fields. Composing
one resizes every image to half size, writes them to the scratch directory
next to a Jekyll-style markdown file, and optionally exports everything to
a blog checkout:

  trail-journal compose \\
      --title \"Trail Day 1\" --tag \"New Mexico\" --mile 12 \\
      --header dawn.jpg --photos-dir ./day1 \\
      --latitude 36.1 --longitude -106.2 --altitude 2400 \\
      --export-dir ~/blog/drop

Run 'trail-journal gen-config' to generate a documented journal.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing journal.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Directory for transformed images and the markdown file (overrides config)
    #[arg(long, global = true)]
    scratch_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a post from images and fields, then review and export it
    Compose(ComposeArgs),
    /// List the tags a post can carry
    Tags,
    /// Print a stock journal.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct ComposeArgs {
    /// Post title
    #[arg(long, default_value = "")]
    title: String,

    /// Optional subtitle
    #[arg(long)]
    subtitle: Option<String>,

    /// Author (defaults to the configured author)
    #[arg(long)]
    author: Option<String>,

    /// Trail mile marker
    #[arg(long, default_value = "")]
    mile: String,

    /// Region tag, e.g. "New Mexico" or colorado
    #[arg(long)]
    tag: Option<Tag>,

    /// Header image
    #[arg(long)]
    header: Option<PathBuf>,

    /// Photo to include (repeatable)
    #[arg(long = "photo")]
    photos: Vec<PathBuf>,

    /// Include every supported image in this directory, sorted by name
    #[arg(long)]
    photos_dir: Option<PathBuf>,

    /// Latitude in degrees
    #[arg(long, requires = "longitude", allow_hyphen_values = true)]
    latitude: Option<f64>,

    /// Longitude in degrees
    #[arg(long, requires = "latitude", allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// Altitude in meters
    #[arg(long, default_value_t = 0.0, requires = "latitude", allow_hyphen_values = true)]
    altitude: f64,

    /// Copy the markdown file and all images here
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Print the post manifest as JSON instead of the review
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Compose(args) => {
            let config = config::load_config(&cli.config_dir)?;
            let scratch_dir = cli.scratch_dir.unwrap_or_else(|| config.scratch_path());
            init_thread_pool(&config.processing);
            compose(args, &config, scratch_dir)?;
        }
        Command::Tags => output::print_tags(),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn compose(
    args: ComposeArgs,
    config: &config::JournalConfig,
    scratch_dir: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let provider: Box<dyn LocationProvider> = match (args.latitude, args.longitude) {
        (Some(lat), Some(lon)) => Box::new(FixedLocation(Coordinate::new(lat, lon, args.altitude))),
        _ => Box::new(NoLocation),
    };
    let mut draft = PostDraft::new(provider, config.draft.author.clone());

    draft.set_title(args.title);
    if let Some(subtitle) = args.subtitle {
        draft.set_subtitle(subtitle);
    }
    if let Some(author) = args.author {
        draft.set_author(author);
    }
    draft.set_mile(args.mile);
    draft.set_tag(args.tag);

    let headers = PathPicker::new(args.header).pick(PickerRequest::single())?;
    draft.select_header(headers);
    draft.select_photos(pick_photos(args.photos, args.photos_dir.as_ref())?);
    draft.sync_location();

    if !args.json {
        output::print_draft(&draft.snapshot());
    }

    let backend = RustBackend::new();
    let assets = FileAssets::new(&backend);
    let (tx, rx) = std::sync::mpsc::channel();
    let json = args.json;
    let printer = std::thread::spawn(move || {
        for event in rx {
            if json {
                continue;
            }
            for line in output::format_finalize_event(&event) {
                println!("{}", line);
            }
        }
    });
    let pipeline = Pipeline::new(&backend, &assets, &scratch_dir)
        .with_transform(config.transform_config())
        .with_events(tx);
    let finalized = draft.finalize(&pipeline).map(|_| ());
    // Dropping the pipeline closes the event channel so the printer exits.
    drop(pipeline);
    finish_printer(printer);
    if finalized.is_err() && !json {
        output::print_draft(&draft.snapshot());
    }
    finalized?;

    let post = draft
        .result()
        .ok_or("finalize reported success without a post")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&post.manifest())?);
    } else {
        println!();
        output::print_review(post);
        println!();
    }

    match &args.export_dir {
        Some(dir) => {
            let exporter = DirectoryExporter::new(dir);
            let body = export::share_body(post, &scratch_dir, &exporter)?;
            let photos = export::share_photos(post, &exporter)?;
            if !json {
                output::print_export("Body", &body);
                output::print_export("Photos", &photos);
            }
        }
        None => {
            let path = post.write_post_file(&scratch_dir)?;
            if !json {
                println!("Post \u{2192} {}", path.display());
            }
        }
    }

    Ok(())
}

/// Wait for the progress printer. A panic there is logged, not propagated:
/// the post itself is already finalized.
fn finish_printer(printer: JoinHandle<()>) -> bool {
    match printer.join() {
        Ok(()) => true,
        Err(_) => {
            warn!("progress printer thread panicked; some progress lines may be missing");
            false
        }
    }
}

/// Explicit `--photo` paths first, then the directory listing.
fn pick_photos(
    photos: Vec<PathBuf>,
    photos_dir: Option<&PathBuf>,
) -> Result<Vec<AssetHandle>, Box<dyn std::error::Error>> {
    let mut handles = PathPicker::new(photos).pick(PickerRequest::multiple())?;
    if let Some(dir) = photos_dir {
        handles.extend(DirectoryPicker::new(dir).pick(PickerRequest::multiple())?);
    }
    Ok(handles)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
