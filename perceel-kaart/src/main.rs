//! Point d'entrée CLI pour perceel-kaart

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use perceel_kaart::cli::{self, Commands, ResolveArgs};

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

/// Trouver la parcelle cadastrale d'une adresse néerlandaise
#[derive(Parser)]
#[command(name = "perceel-kaart")]
#[command(author, version)]
#[command(about = "Résout une adresse néerlandaise en parcelle cadastrale (défaut) ou sert l'API JSON")]
#[command(long_about = "Géocode l'adresse via PDOK Locatieserver, interroge le WFS du cadastre autour du point et renvoie la parcelle reprojetée.\n\nPar défaut, résout une adresse. Utilisez 'serve' pour démarrer l'API JSON.")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Fichier de configuration JSON (défaut : variables PERCEEL_*)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Sous-commande (défaut: résolution d'une adresse)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Arguments de la résolution (commande par défaut)
    #[command(flatten)]
    resolve: Option<ResolveArgs>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    let config = cli::load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Serve { bind }) => {
            cli::cmd_serve(config, bind).await?;
        }
        None => {
            // Commande par défaut: résolution
            let args = cli.resolve.context("An address is required")?;
            cli::cmd_resolve(config, args).await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
