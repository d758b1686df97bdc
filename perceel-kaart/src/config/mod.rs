//! Configuration du service
//!
//! Ordre de priorité : valeurs par défaut, puis variables d'environnement
//! `PERCEEL_*` (ou fichier JSON `--config`), puis options de la ligne de commande.

use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use kadaster::{epsg, ResolveOptions, DEFAULT_SEARCH_RADIUS};

pub const DEFAULT_GEOCODER_URL: &str = "https://api.pdok.nl/bzk/locatieserver/search/v3_1/free";
pub const DEFAULT_WFS_URL: &str = "https://service.pdok.nl/kadaster/kadastralekaart/wfs/v5_0";
pub const DEFAULT_WFS_VERSION: &str = "2.0.0";
pub const DEFAULT_WFS_TYPE_NAME: &str = "kadastralekaart:perceel";

/// Configuration des collaborateurs et du service
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Endpoint free search du Locatieserver
    pub geocoder_url: String,

    /// Endpoint WFS des parcelles
    pub wfs_url: String,

    /// Version WFS (1.x utilise `typeName`, 2.x `typeNames`)
    pub wfs_version: String,

    pub wfs_type_name: String,

    /// Endpoint de score biodiversité (optionnel)
    pub biodiversity_url: Option<String>,

    /// Timeout par appel sortant, en secondes
    pub timeout_secs: f64,

    /// Rayon de recherche par défaut (m)
    pub search_radius: f64,

    /// EPSG de sortie par défaut
    pub target_epsg: u32,

    pub user_agent: String,

    /// Adresse d'écoute de l'API
    pub bind: String,

    /// Style d'affichage transmis aux clients
    pub style: MapStyle,
}

/// Style d'affichage de la parcelle (données pures)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MapStyle {
    pub fill_color: String,
    pub stroke_color: String,
    pub weight: f64,
    pub fill_opacity: f64,
    pub marker_color: String,
    /// Champs affichés dans la popup
    pub popup_fields: Vec<String>,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            fill_color: "orange".into(),
            stroke_color: "black".into(),
            weight: 1.0,
            fill_opacity: 0.5,
            marker_color: "red".into(),
            popup_fields: vec![kadaster::types::fields::LOCAL_ID.to_string()],
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            geocoder_url: DEFAULT_GEOCODER_URL.into(),
            wfs_url: DEFAULT_WFS_URL.into(),
            wfs_version: DEFAULT_WFS_VERSION.into(),
            wfs_type_name: DEFAULT_WFS_TYPE_NAME.into(),
            biodiversity_url: None,
            timeout_secs: 10.0,
            search_radius: DEFAULT_SEARCH_RADIUS,
            target_epsg: epsg::WGS84,
            user_agent: concat!("perceel-kaart/", env!("CARGO_PKG_VERSION")).into(),
            bind: "127.0.0.1:3000".into(),
            style: MapStyle::default(),
        }
    }
}

impl ServiceConfig {
    /// Charge la configuration depuis les variables d'environnement
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Charge la configuration depuis une source clé/valeur quelconque
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            geocoder_url: get("PERCEEL_GEOCODER_URL").unwrap_or(defaults.geocoder_url),
            wfs_url: get("PERCEEL_WFS_URL").unwrap_or(defaults.wfs_url),
            wfs_version: get("PERCEEL_WFS_VERSION").unwrap_or(defaults.wfs_version),
            wfs_type_name: get("PERCEEL_WFS_TYPE_NAME").unwrap_or(defaults.wfs_type_name),
            biodiversity_url: get("PERCEEL_BIODIVERSITY_URL"),
            timeout_secs: parse_var(get("PERCEEL_TIMEOUT_SECS"), "PERCEEL_TIMEOUT_SECS")?
                .unwrap_or(defaults.timeout_secs),
            search_radius: parse_var(get("PERCEEL_SEARCH_RADIUS"), "PERCEEL_SEARCH_RADIUS")?
                .unwrap_or(defaults.search_radius),
            target_epsg: parse_var(get("PERCEEL_TARGET_EPSG"), "PERCEEL_TARGET_EPSG")?
                .unwrap_or(defaults.target_epsg),
            user_agent: get("PERCEEL_USER_AGENT").unwrap_or(defaults.user_agent),
            bind: get("PERCEEL_BIND").unwrap_or(defaults.bind),
            style: defaults.style,
        })
    }

    /// Charge une configuration depuis un fichier JSON (champs absents = défaut)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Applique les options de la ligne de commande
    pub fn apply_overrides(&mut self, search_radius: Option<f64>, target_epsg: Option<u32>) {
        if let Some(radius) = search_radius {
            self.search_radius = radius;
        }
        if let Some(srid) = target_epsg {
            self.target_epsg = srid;
        }
    }

    /// Vérifie la cohérence de la configuration
    pub fn validate(&self) -> Result<()> {
        check_url("geocoder_url", &self.geocoder_url)?;
        check_url("wfs_url", &self.wfs_url)?;
        if let Some(url) = &self.biodiversity_url {
            check_url("biodiversity_url", url)?;
        }

        if self.wfs_version.trim().is_empty() {
            bail!("wfs_version cannot be empty");
        }
        if self.wfs_type_name.trim().is_empty() {
            bail!("wfs_type_name cannot be empty");
        }
        if !self.timeout_secs.is_finite() || self.timeout_secs <= 0.0 {
            bail!("timeout_secs must be > 0, got {}", self.timeout_secs);
        }
        if !self.search_radius.is_finite() || self.search_radius <= 0.0 {
            bail!("search_radius must be > 0, got {}", self.search_radius);
        }
        SocketAddr::from_str(&self.bind)
            .context(format!("bind must be a socket address, got {}", self.bind))?;

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }

    /// Options de résolution par défaut
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            target_epsg: self.target_epsg,
            search_radius: self.search_radius,
        }
    }
}

fn parse_var<T: FromStr>(value: Option<String>, name: &str) -> Result<Option<T>> {
    match value {
        Some(raw) => match raw.trim().parse() {
            Ok(v) => Ok(Some(v)),
            Err(_) => bail!("{} has an invalid value: {}", name, raw),
        },
        None => Ok(None),
    }
}

fn check_url(name: &str, url: &str) -> Result<()> {
    if url.trim().is_empty() {
        bail!("{} cannot be empty", name);
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        bail!("{} must start with http:// or https://", name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.resolve_options(), ResolveOptions::default());
        assert_eq!(config.style.popup_fields, vec!["identificatieLokaalID"]);
    }

    #[test]
    fn test_from_lookup() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("PERCEEL_WFS_VERSION", "1.1.0"),
            ("PERCEEL_TIMEOUT_SECS", "2.5"),
            ("PERCEEL_TARGET_EPSG", "3857"),
            ("PERCEEL_BIODIVERSITY_URL", "https://example.org/score"),
            ("PERCEEL_GEOCODER_URL", "   "),
        ]))
        .unwrap();

        assert_eq!(config.wfs_version, "1.1.0");
        assert_eq!(config.timeout(), Duration::from_millis(2500));
        assert_eq!(config.target_epsg, 3857);
        assert_eq!(config.biodiversity_url.as_deref(), Some("https://example.org/score"));
        assert_eq!(config.geocoder_url, DEFAULT_GEOCODER_URL);
    }

    #[test]
    fn test_from_lookup_rejects_bad_number() {
        let result = ServiceConfig::from_lookup(lookup(&[("PERCEEL_SEARCH_RADIUS", "fifty")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_partial_json() {
        let path = std::env::temp_dir().join("perceel_kaart_config_test.json");
        std::fs::write(
            &path,
            r#"{"search_radius": 25.0, "style": {"fill_color": "green"}}"#,
        )
        .unwrap();

        let config = ServiceConfig::load(&path).unwrap();
        assert_eq!(config.search_radius, 25.0);
        assert_eq!(config.style.fill_color, "green");
        assert_eq!(config.style.stroke_color, "black");
        assert_eq!(config.wfs_url, DEFAULT_WFS_URL);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_overrides_and_validation() {
        let mut config = ServiceConfig::default();
        config.apply_overrides(Some(-1.0), Some(28992));
        assert_eq!(config.target_epsg, 28992);
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.wfs_url = "ftp://example.org".into();
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.timeout_secs = 0.0;
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.bind = "not an address".into();
        assert!(config.validate().is_err());
    }
}
