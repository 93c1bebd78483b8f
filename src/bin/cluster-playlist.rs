//! Command-line front end: read a JSON track catalog, print a playlist.
//!
//! The catalog is a JSON array of `{track_id, name, album_id, genre_id}`
//! objects, read from a file or from stdin with `--catalog -`.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cluster_playlist::{
    genre_coverage, purity, FeatureStrategy, PlaylistConfig, PlaylistGenerator, TrackRecord,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Full records as a JSON array.
    Json,
    /// `TrackId` and `Name` columns.
    Table,
}

#[derive(Debug, Parser)]
#[command(name = "cluster-playlist", version, about)]
struct Args {
    /// Catalog JSON file, or `-` for stdin.
    #[arg(long, short = 'c', default_value = "-")]
    catalog: PathBuf,

    /// Playlist size, which is also the number of clusters.
    #[arg(long, short = 'n', env = "PLAYLIST_NUM_TRACKS", default_value_t = 10)]
    num_tracks: usize,

    /// `text-frequency` or `categorical-embedding`.
    #[arg(long, short = 's', default_value = "text-frequency")]
    strategy: FeatureStrategy,

    /// Seed for every random step.
    #[arg(long, env = "PLAYLIST_SEED", default_value_t = 0)]
    seed: u64,

    /// K-means iteration cap.
    #[arg(long, default_value_t = 300)]
    max_iter: usize,

    /// K-means restarts; the lowest-inertia run wins.
    #[arg(long, default_value_t = 1)]
    n_init: usize,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).json().flatten_event(true))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .init();
    }
}

fn read_catalog(path: &Path) -> Result<Vec<TrackRecord>> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading catalog from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog {}", path.display()))?
    };
    serde_json::from_str(&raw).context("parsing catalog JSON")
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_json);

    let tracks = read_catalog(&args.catalog)?;
    info!(
        tracks = tracks.len(),
        strategy = %args.strategy,
        num_tracks = args.num_tracks,
        seed = args.seed,
        "generating playlist"
    );

    let config = PlaylistConfig::default()
        .with_num_tracks(args.num_tracks)
        .with_strategy(args.strategy)
        .with_seed(args.seed)
        .with_max_iter(args.max_iter)
        .with_n_init(args.n_init);
    let run = PlaylistGenerator::new(config)
        .generate_run(&tracks)
        .context("playlist generation failed")?;

    if !run.converged {
        warn!(iterations = run.iterations, "k-means hit the iteration cap");
    }
    let genres: Vec<i64> = tracks.iter().filter_map(|t| t.genre_id).collect();
    debug!(
        inertia = run.inertia,
        iterations = run.iterations,
        genre_purity = purity(&run.labels(), &genres),
        "clustering done"
    );
    info!(
        clusters = run.non_empty_clusters().len(),
        playlist = run.playlist.len(),
        genre_coverage = genre_coverage(&run.playlist, &tracks),
        "playlist ready"
    );

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&run.playlist)?);
        }
        OutputFormat::Table => {
            println!("{:>8}  Name", "TrackId");
            for (track_id, name) in run.playlist.entries() {
                println!("{track_id:>8}  {name}");
            }
        }
    }

    Ok(())
}
