//! # perceel-kaart
//!
//! Adresse néerlandaise → parcelle cadastrale, autour du crate `kadaster`.
//!
//! ## Features
//!
//! - Clients PDOK Locatieserver et WFS `kadastralekaart` (reqwest bloquant)
//! - Reprojection RD New / WGS84 / Web Mercator en pur Rust, PROJ en option
//! - Export GeoJSON / WKT, rapport de résolution
//! - Score biodiversité optionnel
//! - API JSON (axum)
//!
//! ## Usage CLI
//!
//! ```bash
//! # Résolution d'une adresse
//! perceel-kaart "Dam 1, Amsterdam"
//! perceel-kaart "Dam 1, Amsterdam" --srid 3857 --format geojson --output dam.geojson
//!
//! # API JSON
//! perceel-kaart serve --bind 0.0.0.0:3000
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod export;
pub mod report;
pub mod reproject_lite;
pub mod server;
pub mod service;

pub use config::{MapStyle, ServiceConfig};
pub use report::{ResolutionReport, ResolutionStatus};
pub use reproject_lite::{Reprojection, SmartReprojector};
pub use service::{resolve_address, Resolution};
