//! lotmap - CLI tool to inspect lot maps and run event spot selection.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lotmap::viewport::{metrics, TransformController};
use lotmap::{
    lot_candidates, select_spots, DirectoryProvider, EventFilters, LotAvailability, LotDetails,
    LotSearch, MapAssetProvider, NearbySpot, SpotVisualState, ViewportConfig,
};

/// Inspect parking-lot maps and resolve spot states.
#[derive(Parser, Debug)]
#[command(name = "lotmap")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the spot nodes found in a lot map
    Spots {
        /// Directory holding `<lot>.svg` maps
        #[arg(short, long)]
        maps: PathBuf,

        /// Lot id
        #[arg(short, long)]
        lot: String,

        /// Lot details JSON. Its lot list decides which map groups are lots
        /// of their own; without it every spot belongs to `--lot`.
        #[arg(short, long)]
        details: Option<PathBuf>,
    },

    /// Rank the lots of a closest-spots search for an event
    Lots {
        /// Closest-spots search results (`[{ spotId, distance }]`)
        #[arg(short, long)]
        spots: PathBuf,

        /// Lot details JSON used to count available spots (repeatable)
        #[arg(short, long = "details")]
        details: Vec<PathBuf>,

        /// Number of spots the event needs
        #[arg(short = 'n', long, default_value = "1")]
        spots_needed: u32,

        /// Output candidates as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the initial cover-fit viewport for a container size
    Fit {
        /// Directory holding `<lot>.svg` maps
        #[arg(short, long)]
        maps: PathBuf,

        /// Lot id
        #[arg(short, long)]
        lot: String,

        /// Container width
        #[arg(long)]
        width: f64,

        /// Container height
        #[arg(long)]
        height: f64,
    },

    /// Run event-mode auto-selection and print the spot bindings
    Select {
        /// Directory holding `<lot>.svg` maps
        #[arg(short, long)]
        maps: PathBuf,

        /// Lot details JSON (`{ lot, spots }` or `{ lots, spots }`)
        #[arg(short, long)]
        details: PathBuf,

        /// Availability JSON for the event window
        #[arg(short, long)]
        availability: Option<PathBuf>,

        /// Lot id (defaults to the first lot in the details)
        #[arg(short, long)]
        lot: Option<String>,

        /// Number of spots to pick
        #[arg(short = 'n', long, default_value = "1")]
        spots_needed: u32,

        /// Spot category to prefer (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Zone to prefer
        #[arg(long)]
        zone: Option<String>,

        /// Prefer covered spots
        #[arg(long, conflicts_with = "uncovered")]
        covered: bool,

        /// Prefer uncovered spots
        #[arg(long)]
        uncovered: bool,

        /// Highest acceptable hourly rate
        #[arg(long)]
        max_price: Option<f64>,

        /// Output bindings as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match args.command {
        Command::Spots { maps, lot, details } => list_spots(&maps, &lot, details.as_deref()),
        Command::Lots {
            spots,
            details,
            spots_needed,
            json,
        } => rank_search(&spots, &details, spots_needed, json),
        Command::Fit {
            maps,
            lot,
            width,
            height,
        } => print_fit(&maps, &lot, width, height),
        Command::Select {
            maps,
            details,
            availability,
            lot,
            spots_needed,
            categories,
            zone,
            covered,
            uncovered,
            max_price,
            json,
        } => {
            let filters = EventFilters {
                max_price,
                covered: match (covered, uncovered) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
                zone,
                categories: categories.into_iter().collect(),
                spots_needed,
            };
            run_select(&maps, &details, availability.as_deref(), lot, &filters, json)
        }
    }
}

fn list_spots(maps: &Path, lot: &str, details_path: Option<&Path>) -> Result<()> {
    let asset = DirectoryProvider::new(maps)
        .load(lot)
        .with_context(|| format!("Failed to load map for {}", lot))?;

    let known_lots = match details_path {
        Some(path) => read_details(path)?.known_lot_ids(),
        None => Default::default(),
    };

    let spots = asset.spot_ids(&known_lots);
    info!("Found {} spot(s) in {}", spots.len(), lot);

    for (spot_id, node_ref) in spots {
        println!("{}\t{}", spot_id, node_ref.0);
    }
    Ok(())
}

fn print_fit(maps: &Path, lot: &str, width: f64, height: f64) -> Result<()> {
    let asset = DirectoryProvider::new(maps)
        .load(lot)
        .with_context(|| format!("Failed to load map for {}", lot))?;

    let Some(size) = asset.size() else {
        anyhow::bail!("Map for {} declares no width/height or viewBox", lot);
    };

    let mut controller = TransformController::new(ViewportConfig::default());
    controller.set_content(Some(size));
    controller.set_container(metrics(width, height));
    if !controller.is_ready() {
        anyhow::bail!("Container size {}x{} is not usable", width, height);
    }

    let state = controller.state();
    println!("{}", serde_json::to_string_pretty(&state)?);
    info!("Fit at {}", state.zoom_percent());
    Ok(())
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn read_details(path: &Path) -> Result<LotDetails> {
    LotDetails::from_value(read_json(path)?)
        .with_context(|| format!("Invalid lot details in {}", path.display()))
}

fn rank_search(spots_path: &Path, details_paths: &[PathBuf], spots_needed: u32, json: bool) -> Result<()> {
    let hits: Vec<NearbySpot> = serde_json::from_value(read_json(spots_path)?)
        .with_context(|| format!("Invalid search results in {}", spots_path.display()))?;
    let details = details_paths
        .iter()
        .map(|path| read_details(path))
        .collect::<Result<Vec<_>>>()?;

    let mut search = LotSearch::new();
    let token = search.begin();
    search.complete(token, Ok(lot_candidates(&hits, &details)), spots_needed);

    if let Some(message) = search.error() {
        anyhow::bail!("{}", message);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(search.results())?);
        return Ok(());
    }

    for candidate in search.results() {
        println!(
            "{}\t{}\t{}/{}\t{:.0}",
            candidate.lot_id,
            candidate.official_lot_name,
            candidate.available_spots,
            candidate.total_spots,
            candidate.distance
        );
    }
    info!("Ranked {} lot(s) from {} hit(s)", search.results().len(), hits.len());
    Ok(())
}

fn run_select(
    maps: &Path,
    details_path: &Path,
    availability_path: Option<&Path>,
    lot: Option<String>,
    filters: &EventFilters,
    json: bool,
) -> Result<()> {
    let details = read_details(details_path)?;

    let availability = match availability_path {
        Some(path) => Some(
            LotAvailability::from_value(read_json(path)?)
                .with_context(|| format!("Invalid availability in {}", path.display()))?,
        ),
        None => None,
    };

    let lot_id = match lot.or_else(|| details.all_lots().next().map(|l| l.lot_id.clone())) {
        Some(lot_id) => lot_id,
        None => anyhow::bail!("No lot id given and none found in {}", details_path.display()),
    };

    if !filters.has_active_facets() {
        warn!("No filters set; picking from all available spots");
    }

    let bindings = select_spots(
        &DirectoryProvider::new(maps),
        &lot_id,
        &details,
        availability.as_ref(),
        filters,
    )
    .with_context(|| format!("Failed to select spots in {}", lot_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bindings)?);
        return Ok(());
    }

    let selected = bindings
        .iter()
        .filter(|b| b.state == SpotVisualState::Selected)
        .count();
    for binding in &bindings {
        println!("{}\t{}\t{}", binding.spot_id, binding.state, binding.paint.fill);
    }
    info!(
        "Selected {} of {} requested spot(s) in {}",
        selected, filters.spots_needed, lot_id
    );
    Ok(())
}
