//! Maps binary
//!
//! Renders the map state once for a set of lists: markers, cluster icons,
//! viewport and resolved heatmap layers, printed as JSON.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use dotenv::dotenv;
use maps::cluster;
use maps::heatmap::{CompleteDataFilter, HeatmapResolver, HeatmapSpec};
use maps::marker::{markers_from_list, Marker, MarkerFields};
use maps::zoom::Viewport;
use maps::MapsConfig;
use maps_source::{fetch_or_unavailable, ListProvider, ListSource, ObjectItem};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const MARKERS_LIST: &str = "markers";
const HEATMAP_LIST: &str = "heatmap";

/// How long to wait for the heatmap resolver to commit.
const RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("maps=info,maps_source=info"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Sample lists around Utrecht used when no data file is configured.
fn mock_lists() -> HashMap<String, Vec<ObjectItem>> {
    let offices = [
        ("utrecht", 52.0907, 5.1214, "Utrecht"),
        ("amsterdam", 52.3676, 4.9041, "Amsterdam"),
        ("rotterdam", 51.9244, 4.4777, "Rotterdam"),
        ("boston", 42.3601, -71.0589, "Boston"),
    ];
    let markers = offices
        .iter()
        .map(|(id, lat, lng, name)| {
            ObjectItem::new(*id)
                .with("latitude", *lat)
                .with("longitude", *lng)
                .with("name", *name)
        })
        .collect();

    let heat = (0..20)
        .map(|i| {
            let step = f64::from(i) * 0.01;
            ObjectItem::new(format!("h{i}"))
                .with("latitude", 52.09 + step)
                .with("longitude", 5.12 - step)
                .with("weight", f64::from(i % 4 + 1))
        })
        .collect();

    let mut lists = HashMap::new();
    lists.insert(MARKERS_LIST.to_string(), markers);
    lists.insert(HEATMAP_LIST.to_string(), heat);
    lists
}

/// Group markers into one-degree cells.
///
/// Stand-in for the clustering library, which owns the real grouping.
fn group_markers(markers: &[Marker]) -> Vec<Vec<Marker>> {
    let mut cells: BTreeMap<(i64, i64), Vec<Marker>> = BTreeMap::new();
    for marker in markers {
        let cell = (
            marker.position.lat.floor() as i64,
            marker.position.lng.floor() as i64,
        );
        cells.entry(cell).or_default().push(marker.clone());
    }
    cells.into_values().collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = MapsConfig::from_env()?;
    init_tracing(config.log_json);

    info!(zoom = %config.zoom, clustering = config.clustering, "Starting maps");

    let source = match &config.data_file {
        Some(path) => ListSource::file(path),
        None => ListSource::mock(mock_lists()),
    };
    let provider: Box<dyn ListProvider> = source.into_provider();

    let marker_list = fetch_or_unavailable(provider.as_ref(), MARKERS_LIST).await;
    let markers = markers_from_list(
        &marker_list,
        &MarkerFields {
            title: Some("name".to_string()),
            ..MarkerFields::default()
        },
    );
    info!(markers = markers.len(), "Loaded markers");

    let viewport = Viewport::compute(&markers, None, config.zoom);

    let mut clusters = Vec::new();
    if config.clustering {
        let styles = config.clusterer_options.style_count();
        for group in group_markers(&markers) {
            match cluster::calculate(&group, styles) {
                Ok(icon) => clusters.push(icon),
                Err(error) => warn!(error = %error, "Cannot style cluster"),
            }
        }
    }

    let heat_list = fetch_or_unavailable(provider.as_ref(), HEATMAP_LIST).await;
    let specs = vec![
        HeatmapSpec::new(heat_list, "latitude,longitude,weight")
            .with_options(r#"{"radius": 20, "opacity": 0.6}"#),
    ];

    let resolver = HeatmapResolver::current(CompleteDataFilter)?;
    let mut updates = resolver.subscribe();
    let mut heatmaps = resolver.resolve(&specs);
    if tokio::time::timeout(RESOLVE_TIMEOUT, updates.changed())
        .await
        .is_ok()
    {
        // Second render picks up the committed layers.
        heatmaps = resolver.resolve(&specs);
    } else {
        warn!("Heatmap resolution did not finish in time");
    }

    let stats = resolver.stats();
    info!(
        heatmaps = heatmaps.len(),
        requests = stats.requests,
        commits = stats.commits,
        "Heatmaps resolved"
    );

    let output = serde_json::json!({
        "viewport": viewport,
        "markers": markers,
        "clusters": clusters,
        "clustererOptions": config.clusterer_options,
        "styles": config.map_styles,
        "heatmaps": *heatmaps,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    info!("Maps finished");

    Ok(())
}
