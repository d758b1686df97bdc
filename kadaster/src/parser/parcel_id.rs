//! Identifiant de parcelle liée (`gekoppeld_perceel`)

use std::fmt;
use std::str::FromStr;

use crate::types::ParcelCandidate;

/// Identifiant `{commune}-{section}-{numéro}`, ex: `ASD21-Y-3930`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedParcelId {
    pub region_code: String,
    pub section_code: String,
    pub parcel_number: u64,
}

impl LinkedParcelId {
    /// Vrai si les trois propriétés du candidat correspondent exactement
    pub fn matches(&self, candidate: &ParcelCandidate) -> bool {
        candidate.region_code() == Some(self.region_code.as_str())
            && candidate.section_code() == Some(self.section_code.as_str())
            && candidate.parcel_number() == Some(self.parcel_number)
    }
}

impl FromStr for LinkedParcelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('-').collect();
        let [region, section, number] = parts.as_slice() else {
            return Err(format!("expected 3 parts in {:?}, got {}", s, parts.len()));
        };

        if region.is_empty() || section.is_empty() {
            return Err(format!("empty region or section in {:?}", s));
        }

        let parcel_number = number
            .parse::<u64>()
            .map_err(|e| format!("invalid parcel number in {:?}: {}", s, e))?;

        Ok(Self {
            region_code: region.to_string(),
            section_code: section.to_string(),
            parcel_number,
        })
    }
}

impl fmt::Display for LinkedParcelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.region_code, self.section_code, self.parcel_number
        )
    }
}
