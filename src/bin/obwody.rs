use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use obwody_rs::api::StyleClient;
use obwody_rs::interaction::FeatureFlag;
use obwody_rs::layers::compose_layers;
use obwody_rs::models::District;
use obwody_rs::present::{
    detail_model, legend_model, map_locale, popup_model, render_detail_text, render_popup_text,
};
use obwody_rs::selection::SelectionState;
use obwody_rs::style_doc::{compose_style, empty_style};
use obwody_rs::{CandidateFilter, MapEvent, MapSession, MemoryFeatureStore, Registry, Settings};
use obwody_rs::{storage, viz};
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "obwody",
    version,
    about = "Choropleth styles, legends and district tables for Polish election maps"
)]
struct Cli {
    /// Registry JSON (candidates and elections). Defaults to the per-user config, then built-in.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List configured elections and their candidates.
    Elections,
    /// Compose a map style document for an election view.
    Style(StyleArgs),
    /// Render the legend of an election view to SVG.
    Legend(LegendArgs),
    /// Print the results table of one district feature.
    District(DistrictArgs),
    /// Replay a JSON array of map events and print the resulting state.
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// Election id (defaults to the first configured election).
    #[arg(short, long)]
    election: Option<String>,
    /// Candidate id, or "all" for every winner.
    #[arg(short, long, default_value = "all")]
    candidate: String,
}

#[derive(Args, Debug)]
struct StyleArgs {
    #[command(flatten)]
    view: ViewArgs,
    /// Base style: a local JSON file or an http(s) URL. Defaults to $OBWODY_BASE_STYLE_URL
    /// when a basemap token is set, else an empty style.
    #[arg(long)]
    base_style: Option<String>,
    /// Write the style here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LegendArgs {
    #[command(flatten)]
    view: ViewArgs,
    /// Output path (.svg).
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct DistrictArgs {
    /// Feature JSON (`{"id": .., "properties": {..}}` or a flat property object).
    #[arg(short, long)]
    file: PathBuf,
    #[arg(short, long)]
    election: Option<String>,
    /// Number formatting locale (pl, en, de).
    #[arg(long, default_value = "pl")]
    locale: String,
    /// Also save the sorted table as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// JSON file holding an array of events.
    #[arg(short, long)]
    file: PathBuf,
    #[arg(long, default_value = "pl")]
    locale: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let registry = Registry::load_default(cli.config.as_deref())?;
    match cli.cmd {
        Command::Elections => cmd_elections(&registry),
        Command::Style(args) => cmd_style(&registry, args),
        Command::Legend(args) => cmd_legend(&registry, args),
        Command::District(args) => cmd_district(&registry, args),
        Command::Replay(args) => cmd_replay(&registry, args),
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn selection(registry: &Registry, view: &ViewArgs) -> Result<SelectionState> {
    let mut sel = SelectionState::new(registry);
    if let Some(e) = &view.election {
        sel.set_election(registry, e)?;
    }
    sel.set_candidate(registry, CandidateFilter::from(view.candidate.as_str()))?;
    Ok(sel)
}

fn cmd_elections(registry: &Registry) -> Result<()> {
    for e in registry.elections() {
        println!("{}  {}", e.id, e.name);
        for id in &e.candidates {
            let name = registry.candidate(id).map(|c| c.name.as_str()).unwrap_or(id);
            let mut marks = Vec::new();
            if e.is_winner(id) {
                marks.push("winner");
            }
            if registry.candidate(id).is_some_and(|c| c.has_gradient()) {
                marks.push("scale");
            }
            if marks.is_empty() {
                println!("  {id:<14} {name}");
            } else {
                println!("  {id:<14} {name} [{}]", marks.join(", "));
            }
        }
    }
    Ok(())
}

fn load_base_style(arg: Option<&str>, settings: &Settings) -> Result<Value> {
    let token = settings.maptiler_token.as_deref();
    match arg {
        Some(s) if s.starts_with("http://") || s.starts_with("https://") => {
            StyleClient::default().fetch_style(s, token)
        }
        Some(s) => read_json(Path::new(s)),
        None if token.is_some() => StyleClient::default().fetch_style(&settings.base_style_url, token),
        None => Ok(empty_style()),
    }
}

fn cmd_style(registry: &Registry, args: StyleArgs) -> Result<()> {
    let settings = Settings::from_env();
    let sel = selection(registry, &args.view)?;
    let base = load_base_style(args.base_style.as_deref(), &settings)?;
    let election = registry.election(&sel.election)?;
    let layers = compose_layers(registry, &sel, &settings)?;
    let style = compose_style(base, election, &layers, &settings)?;

    match args.out.as_ref() {
        Some(path) => {
            storage::save_style_json(&style, path)?;
            eprintln!("Wrote style to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&style)?),
    }
    Ok(())
}

fn cmd_legend(registry: &Registry, args: LegendArgs) -> Result<()> {
    let settings = Settings::from_env();
    let sel = selection(registry, &args.view)?;
    let model = legend_model(registry, &sel)?;
    viz::render_legend_svg(&model, &args.out, settings.map_opacity)?;
    eprintln!("Wrote legend to {}", args.out.display());
    Ok(())
}

fn cmd_district(registry: &Registry, args: DistrictArgs) -> Result<()> {
    let feature = read_json(&args.file)?;
    let district = District::from_feature(&feature)
        .ok_or_else(|| anyhow!("{} is not a JSON object", args.file.display()))?;
    let election = match &args.election {
        Some(id) => registry.election(id)?,
        None => registry.default_election(),
    };
    let detail = detail_model(election, &district);
    print!(
        "{}",
        render_detail_text(Some(&detail), registry, map_locale(&args.locale))
    );

    if let Some(path) = args.csv.as_ref() {
        storage::save_results_csv(&detail.results, registry, path)?;
        eprintln!("Saved {} rows to {}", detail.results.len(), path.display());
    }
    Ok(())
}

fn cmd_replay(registry: &Registry, args: ReplayArgs) -> Result<()> {
    let events: Vec<MapEvent> = match read_json(&args.file)? {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| serde_json::from_value(v).with_context(|| format!("event #{i}")))
            .collect::<Result<_>>()?,
        _ => bail!("{} must hold a JSON array of events", args.file.display()),
    };

    let locale = map_locale(&args.locale);
    let mut map = MapSession::new(registry, Settings::from_env());
    let mut renderer = MemoryFeatureStore::new();
    for ev in &events {
        map.apply(ev, &mut renderer)?;
    }

    let election = registry.election(&map.selection().election)?;
    let interaction = map.interaction();
    let target = interaction.target();
    println!(
        "selection: {} / {}",
        map.selection().election,
        map.selection().candidate
    );
    println!("phase: {:?}", interaction.phase());
    for flag in [FeatureFlag::Hovered, FeatureFlag::Clicked] {
        let ids: Vec<String> = renderer
            .flagged(target, flag)
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("{}: [{}]", flag.as_str(), ids.join(", "));
    }
    if let Some(hover) = interaction.hover_info() {
        print!(
            "{}",
            render_popup_text(&popup_model(election, hover), registry, locale)
        );
    }
    let detail = interaction.detail().map(|d| detail_model(election, d));
    print!("{}", render_detail_text(detail.as_ref(), registry, locale));

    let fills = map.layers()?.fills.len();
    log::info!(
        "replayed {} events, {} fill layers, {} renderer writes",
        events.len(),
        fills,
        renderer.writes()
    );
    Ok(())
}
