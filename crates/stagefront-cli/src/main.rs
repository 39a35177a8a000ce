use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value as JsonValue;

use stagefront_content::decode::decode_many;
use stagefront_core::{apply, QuerySpec, SamplePack, SortOrder, Track};

#[derive(Parser)]
#[command(name = "stagefront")]
#[command(about="Stagefront catalog admin CLI", long_about=None)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Tracks,
    Packs,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run a catalog query over a JSON export and print the result.
    Query {
        /// Catalog export file ({"tracks": [...], "samplePacks": [...]}).
        file: String,
        #[arg(long, value_enum, default_value = "tracks")]
        kind: Kind,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        /// Field to sort by (e.g. publishedAt, title, name, price).
        #[arg(long)]
        sort: Option<String>,
        #[arg(long, default_value = "desc")]
        order: String,
        /// Field to group by (e.g. category).
        #[arg(long)]
        group: Option<String>,
    },
    /// Report how many records in an export decode cleanly.
    Validate { file: String },
}

fn read_export(path: &str) -> Result<(Vec<JsonValue>, Vec<JsonValue>)> {
    let body = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let root: JsonValue = serde_json::from_str(&body).with_context(|| format!("parsing {path}"))?;
    let collection = |key: &str| -> Vec<JsonValue> {
        root.get(key)
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default()
    };
    Ok((collection("tracks"), collection("samplePacks")))
}

#[allow(clippy::too_many_arguments)]
fn build_spec(
    search: Option<String>,
    genre: Option<String>,
    category: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    sort: Option<String>,
    order: &str,
    group: Option<String>,
) -> Result<QuerySpec> {
    let order =
        SortOrder::parse(order).with_context(|| format!("unknown order `{order}` (asc|desc)"))?;
    let mut spec = QuerySpec {
        sort_key: sort,
        sort_order: order,
        ..QuerySpec::default()
    };
    if let Some(term) = search {
        spec = spec.search(term);
    }
    if let Some(genre) = genre {
        spec = spec.filter_eq("genre", genre);
    }
    if let Some(category) = category {
        spec = spec.filter_eq("category", category);
    }
    if min_price.is_some() || max_price.is_some() {
        spec = spec.range("price", min_price, max_price);
    }
    if let Some(group) = group {
        spec = spec.grouped_by(group);
    }
    Ok(spec)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Query {
            file,
            kind,
            search,
            genre,
            category,
            min_price,
            max_price,
            sort,
            order,
            group,
        } => {
            let (raw_tracks, raw_packs) = read_export(&file)?;
            let spec = build_spec(
                search, genre, category, min_price, max_price, sort, &order, group,
            )?;
            let output = match kind {
                Kind::Tracks => {
                    let tracks: Vec<Track> = decode_many("track", raw_tracks);
                    serde_json::to_value(apply(&tracks, &spec)?)?
                }
                Kind::Packs => {
                    let packs: Vec<SamplePack> = decode_many("samplePack", raw_packs);
                    serde_json::to_value(apply(&packs, &spec)?)?
                }
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Cmd::Validate { file } => {
            let (raw_tracks, raw_packs) = read_export(&file)?;
            let track_total = raw_tracks.len();
            let pack_total = raw_packs.len();
            let tracks: Vec<Track> = decode_many("track", raw_tracks);
            let packs: Vec<SamplePack> = decode_many("samplePack", raw_packs);
            let report = serde_json::json!({
                "tracks": { "total": track_total, "valid": tracks.len(), "dropped": track_total - tracks.len() },
                "samplePacks": { "total": pack_total, "valid": packs.len(), "dropped": pack_total - packs.len() },
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
