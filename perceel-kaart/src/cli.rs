//! Définition et implémentation des commandes CLI
//!
//! - défaut : résout une adresse et affiche/exporte la parcelle
//! - `serve` : démarre l'API JSON

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use tracing::info;

use crate::config::ServiceConfig;
use crate::export::{export_to_geojson, geojson::write_collection, reproject, to_wkt};
use crate::report::ResolutionReport;
use crate::service::resolve_address;

#[derive(Subcommand)]
pub enum Commands {
    /// Start the JSON HTTP API
    Serve {
        /// Listen address (défaut : env PERCEEL_BIND / 127.0.0.1:3000)
        #[arg(long)]
        bind: Option<String>,
    },
}

/// Format de sortie sur stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// FeatureCollection (parcelle + point de l'adresse)
    Geojson,
    /// Géométrie de la parcelle en WKT
    Wkt,
    /// Rapport lisible
    Summary,
}

/// Arguments de la commande par défaut (résolution d'une adresse)
#[derive(Args)]
pub struct ResolveArgs {
    /// Dutch address, e.g. "Dam 1, Amsterdam"
    pub address: String,

    /// Target SRID (défaut : 4326)
    #[arg(long)]
    pub srid: Option<u32>,

    /// Search radius in metres around the geocoded point (défaut : 50)
    #[arg(long)]
    pub radius: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,

    /// Write the parcel and address marker to a GeoJSON file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the resolution report to a JSON file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Request a biodiversity score (needs PERCEEL_BIODIVERSITY_URL)
    #[arg(long)]
    pub score: bool,
}

/// Charge la configuration : fichier JSON si fourni, sinon environnement
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig> {
    match path {
        Some(path) => ServiceConfig::load(path),
        None => ServiceConfig::from_env(),
    }
}

/// Exécute la résolution d'une adresse
pub async fn cmd_resolve(mut config: ServiceConfig, args: ResolveArgs) -> Result<()> {
    config.apply_overrides(args.radius, args.srid);
    config.validate()?;

    let options = config.resolve_options();
    let address = args.address.clone();
    let score = args.score;

    info!(
        address = %address,
        srid = options.target_epsg,
        radius = options.search_radius,
        "Resolving address"
    );

    let start = Instant::now();
    let outcome = {
        let config = config.clone();
        let address = address.clone();
        tokio::task::spawn_blocking(move || resolve_address(&config, &address, &options, score))
            .await
            .context("Resolver task failed")?
    };

    let mut report = match &outcome {
        Ok(resolution) => ResolutionReport::from_resolution(resolution),
        Err(err) => ResolutionReport::from_error(&address, options.target_epsg, err),
    };
    report.set_duration(start.elapsed());

    if let Some(path) = &args.report {
        report.save_to_file(path)?;
        println!("Report saved: {}", path.display());
    }

    let resolution = match outcome {
        Ok(resolution) => resolution,
        Err(err) => {
            if args.format == OutputFormat::Summary {
                report.display();
            }
            bail!("{} ({})", err.user_message(), err);
        }
    };

    match args.format {
        OutputFormat::Geojson => {
            let mut stdout = std::io::stdout().lock();
            write_collection(&mut stdout, &resolution.parcel)?;
            writeln!(stdout)?;
        }
        OutputFormat::Wkt => println!("{}", to_wkt(&resolution.parcel.geometry)?),
        OutputFormat::Summary => report.display(),
    }

    if let Some(path) = &args.output {
        export_to_geojson(&resolution.parcel, path)?;
        println!("GeoJSON saved: {}", path.display());
    }

    info!("{}", report.summary());

    Ok(())
}

/// Démarre l'API JSON
pub async fn cmd_serve(mut config: ServiceConfig, bind: Option<String>) -> Result<()> {
    if let Some(bind) = bind {
        config.bind = bind;
    }
    config.validate()?;

    println!("=== perceel-kaart API ===");
    println!("Listen: {}", config.bind);
    println!("Geocoder: {}", config.geocoder_url);
    println!("WFS: {} ({})", config.wfs_url, config.wfs_version);
    println!(
        "Biodiversity: {}",
        config.biodiversity_url.as_deref().unwrap_or("disabled")
    );
    println!(
        "PROJ fallback: {}",
        if reproject::is_available() { "enabled" } else { "disabled" }
    );

    crate::server::serve(config).await
}
