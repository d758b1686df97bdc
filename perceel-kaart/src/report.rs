//! Rapport de résolution
//!
//! Résume une résolution (réussie ou non) pour l'affichage console et la
//! sauvegarde JSON.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use kadaster::{ErrorKind, ResolveError, Selection};

use crate::client::BiodiversityOutcome;
use crate::service::Resolution;

/// Statut global de la résolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResolutionStatus {
    /// Parcelle résolue (et score obtenu si demandé)
    Success,
    /// Parcelle résolue, score en échec
    PartialSuccess,
    /// Résolution échouée
    Failed,
}

/// Rapport complet d'une résolution
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionReport {
    /// Adresse saisie
    pub address: String,
    /// Durée de la résolution
    pub duration_secs: f64,
    /// Statut global
    pub status: ResolutionStatus,

    /// EPSG demandé
    pub target_epsg: u32,
    /// Nombre de candidats dans la fenêtre
    pub candidate_count: usize,
    /// Règle de sélection appliquée
    pub selection: Option<Selection>,
    /// Identifiant de la parcelle retenue
    pub parcel_id: Option<String>,
    /// Parcelle liée annoncée par le géocodeur
    pub linked_parcel_id: Option<String>,
    /// Issue du score biodiversité
    pub biodiversity: Option<BiodiversityOutcome>,

    /// Nature de l'erreur en cas d'échec
    pub error_kind: Option<ErrorKind>,
    /// Message d'erreur détaillé
    pub error_message: Option<String>,
}

impl ResolutionReport {
    fn new(address: &str, target_epsg: u32) -> Self {
        Self {
            address: address.to_string(),
            duration_secs: 0.0,
            status: ResolutionStatus::Success,
            target_epsg,
            candidate_count: 0,
            selection: None,
            parcel_id: None,
            linked_parcel_id: None,
            biodiversity: None,
            error_kind: None,
            error_message: None,
        }
    }

    /// Rapport d'une résolution réussie
    pub fn from_resolution(resolution: &Resolution) -> Self {
        let parcel = &resolution.parcel;
        let mut report = Self::new(&parcel.source_address, parcel.target_epsg);
        report.candidate_count = parcel.candidate_count;
        report.selection = Some(parcel.selection.clone());
        report.parcel_id = parcel.candidate.local_id();
        report.linked_parcel_id = parcel.geocode.linked_parcel_id.clone();
        report.biodiversity = resolution.biodiversity.clone();
        report.finalize();
        report
    }

    /// Rapport d'une résolution échouée
    pub fn from_error(address: &str, target_epsg: u32, error: &ResolveError) -> Self {
        let mut report = Self::new(address, target_epsg);
        report.error_kind = Some(error.kind());
        report.error_message = Some(error.to_string());
        report.finalize();
        report
    }

    /// Définit la durée de la résolution
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final
    pub fn finalize(&mut self) {
        let score_failed = matches!(self.biodiversity, Some(BiodiversityOutcome::Failed { .. }));

        self.status = if self.error_kind.is_some() {
            ResolutionStatus::Failed
        } else if score_failed {
            ResolutionStatus::PartialSuccess
        } else {
            ResolutionStatus::Success
        };
    }

    /// Libellé de la règle de sélection
    pub fn selection_label(&self) -> String {
        match &self.selection {
            Some(Selection::LinkedParcel { parcel_id }) => format!("linked parcel {}", parcel_id),
            Some(Selection::Nearest { distance, .. }) => format!("nearest ({:.2} m)", distance),
            None => "-".to_string(),
        }
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("RESOLUTION REPORT - {}", self.address);
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);

        println!("\n--- PARCEL ---");
        println!("Target EPSG: {}", self.target_epsg);
        println!("Candidates: {}", self.candidate_count);
        println!("Selection: {}", self.selection_label());
        println!("Parcel: {}", self.parcel_id.as_deref().unwrap_or("-"));
        println!(
            "Linked parcel: {}",
            self.linked_parcel_id.as_deref().unwrap_or("-")
        );

        if let Some(outcome) = &self.biodiversity {
            println!("\n--- BIODIVERSITY ---");
            match outcome {
                BiodiversityOutcome::Scored { .. } => println!("  scored"),
                BiodiversityOutcome::Failed { error } => println!("  failed: {}", error),
            }
        }

        if let (Some(kind), Some(message)) = (self.error_kind, &self.error_message) {
            println!("\n--- ERROR ---");
            println!("  {} {}", kind.as_str(), message);
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .context(format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        match (&self.parcel_id, self.error_kind) {
            (_, Some(kind)) => format!("{}: failed ({})", self.address, kind.as_str()),
            (parcel_id, None) => format!(
                "{}: {} via {}, {} candidates, EPSG:{}",
                self.address,
                parcel_id.as_deref().unwrap_or("parcel"),
                self.selection_label(),
                self.candidate_count,
                self.target_epsg
            ),
        }
    }
}
