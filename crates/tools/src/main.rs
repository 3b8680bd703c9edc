use std::env;

use catalog::CatalogClient;
use foundation::GeoBounds;
use tiles::{RescaleRange, TileQuery, TileService};
use tracing_subscriber::EnvFilter;
use view::{CanvasSize, Viewport};

const DEFAULT_STAC_URL: &str = "http://localhost:8002";
const DEFAULT_TITILER_URL: &str = "http://localhost:8000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "fit" => cmd_fit(args),
        "template" => cmd_template(args),
        "collections" => cmd_collections(args).await,
        "items" => cmd_items(args).await,
        _ => Err(usage()),
    }
}

fn cmd_fit(args: Vec<String>) -> Result<(), String> {
    // explorer fit <west> <south> <east> <north> [--canvas WxH]
    if args.len() < 4 {
        return Err(usage());
    }

    let mut edges = [0.0f64; 4];
    for (edge, raw) in edges.iter_mut().zip(&args) {
        *edge = raw.parse().map_err(|_| format!("not a number: {raw}"))?;
    }
    let bounds = GeoBounds::new(edges[0], edges[1], edges[2], edges[3]);

    let mut size = CanvasSize::new(800, 600);
    let mut i = 4;
    while i < args.len() {
        match args[i].as_str() {
            "--canvas" => {
                i += 1;
                let raw = args.get(i).ok_or("--canvas requires a value like 800x600")?;
                size = parse_canvas(raw)?;
            }
            other => return Err(format!("unknown arg: {other}\n\n{}", usage())),
        }
        i += 1;
    }
    if size.is_empty() {
        return Err("canvas must be non-empty".to_string());
    }

    let fitted = Viewport::fit_bounds(bounds, size);
    match fitted.zoom {
        Some(zoom) => println!(
            "center {:.6} {:.6} zoom {:.3}",
            fitted.center.lng, fitted.center.lat, zoom
        ),
        None => println!(
            "center {:.6} {:.6} zoom unconstrained",
            fitted.center.lng, fitted.center.lat
        ),
    }
    Ok(())
}

fn cmd_template(args: Vec<String>) -> Result<(), String> {
    // explorer template <cog-url> [--bands a,b,c --rescale lo,hi ...] [--titiler URL]
    if args.is_empty() {
        return Err(usage());
    }

    let source = args[0].clone();
    let mut base = env::var("TITILER_URL").unwrap_or_else(|_| DEFAULT_TITILER_URL.to_string());
    let mut bands: Vec<u8> = Vec::new();
    let mut rescales: Vec<RescaleRange> = Vec::new();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--titiler" => {
                i += 1;
                base = args.get(i).ok_or("--titiler requires a URL")?.clone();
            }
            "--bands" => {
                i += 1;
                let raw = args.get(i).ok_or("--bands requires a list like 4,2,1")?;
                bands = parse_bands(raw)?;
            }
            "--rescale" => {
                i += 1;
                let raw = args.get(i).ok_or("--rescale requires a range like 20,180")?;
                rescales.push(parse_rescale(raw)?);
            }
            other => return Err(format!("unknown arg: {other}\n\n{}", usage())),
        }
        i += 1;
    }

    let tiles = TileService::new(base);
    let template = if bands.is_empty() && rescales.is_empty() {
        tiles.rgb_tile_template(&source)
    } else {
        if bands.len() != rescales.len() {
            return Err(format!(
                "--bands names {} band(s) but {} --rescale range(s) were given",
                bands.len(),
                rescales.len()
            ));
        }
        let query = bands
            .iter()
            .zip(&rescales)
            .fold(TileQuery::default(), |query, (&band, &range)| {
                query.with_band(band, range)
            });
        tiles.tile_template(&source, &query)
    };
    println!("{template}");
    Ok(())
}

fn parse_bands(raw: &str) -> Result<Vec<u8>, String> {
    raw.split(',')
        .map(|band| {
            band.trim()
                .parse()
                .map_err(|_| format!("bad band index: {band}"))
        })
        .collect()
}

fn parse_rescale(raw: &str) -> Result<RescaleRange, String> {
    let (lo, hi) = raw
        .split_once(',')
        .ok_or_else(|| format!("bad rescale range: {raw}"))?;
    let low = lo
        .trim()
        .parse()
        .map_err(|_| format!("bad rescale low: {lo}"))?;
    let high = hi
        .trim()
        .parse()
        .map_err(|_| format!("bad rescale high: {hi}"))?;
    Ok(RescaleRange::new(low, high))
}

async fn cmd_collections(args: Vec<String>) -> Result<(), String> {
    let client = CatalogClient::new(stac_url(&args, 0)?);
    let list = client.list_collections().await.map_err(|e| e.to_string())?;

    for collection in &list.collections {
        let title = collection.title.as_deref().unwrap_or("(untitled)");
        match collection.bounds() {
            Some(b) => println!(
                "{}\t{}\t[{}, {}, {}, {}]",
                collection.id, title, b.west, b.south, b.east, b.north
            ),
            None => println!("{}\t{}\t(no spatial extent)", collection.id, title),
        }
    }
    Ok(())
}

async fn cmd_items(args: Vec<String>) -> Result<(), String> {
    // explorer items <collection-id> [--stac URL]
    if args.is_empty() {
        return Err(usage());
    }

    let client = CatalogClient::new(stac_url(&args, 1)?);
    let page = client.list_items(&args[0]).await.map_err(|e| e.to_string())?;

    for item in &page.features {
        println!(
            "{}\t{}\t{}\t{} band(s)",
            item.id,
            item.properties.datetime,
            item.properties.title,
            item.assets.main.bands.len()
        );
    }
    if page.has_next() {
        println!("(more items exist; the page limit was reached)");
    }
    Ok(())
}

/// `--stac URL` starting at `args[from]`, else `STAC_URL`, else the default.
fn stac_url(args: &[String], from: usize) -> Result<String, String> {
    let mut base = env::var("STAC_URL").unwrap_or_else(|_| DEFAULT_STAC_URL.to_string());
    let mut i = from;
    while i < args.len() {
        match args[i].as_str() {
            "--stac" => {
                i += 1;
                base = args.get(i).ok_or("--stac requires a URL")?.clone();
            }
            other => return Err(format!("unknown arg: {other}\n\n{}", usage())),
        }
        i += 1;
    }
    Ok(base)
}

fn parse_canvas(raw: &str) -> Result<CanvasSize, String> {
    let (w, h) = raw.split_once('x').ok_or_else(|| format!("bad canvas size: {raw}"))?;
    let width = w.parse().map_err(|_| format!("bad canvas width: {w}"))?;
    let height = h.parse().map_err(|_| format!("bad canvas height: {h}"))?;
    Ok(CanvasSize::new(width, height))
}

fn usage() -> String {
    let exe = env::args().next().unwrap_or_else(|| "explorer".to_string());
    format!(
        "Usage:\n  {exe} fit <west> <south> <east> <north> [--canvas WxH]\n  {exe} template <cog-url> [--bands a,b,c --rescale lo,hi ...] [--titiler URL]\n  {exe} collections [--stac URL]\n  {exe} items <collection-id> [--stac URL]\n\nNotes:\n- `fit` prints the camera that frames the box on the canvas (default 800x600).\n- `template` prints the XYZ tile URL template; `--bands` with one `--rescale` per band picks the multispectral path.\n- Catalog commands read STAC_URL (default {DEFAULT_STAC_URL}); `template` reads TITILER_URL (default {DEFAULT_TITILER_URL}).\n"
    )
}
