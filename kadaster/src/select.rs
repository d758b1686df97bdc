//! Choix de la parcelle parmi les candidats de la fenêtre

use geo::Coord;

use crate::parser::parcel_id::LinkedParcelId;
use crate::types::{ParcelCandidate, Selection};

/// Sélectionne le candidat retenu et la règle appliquée
///
/// 1. Parcelle liée : si l'identifiant filtre exactement un candidat.
/// 2. Sinon candidat le plus proche du point (distance plane, 0 à l'intérieur),
///    le premier rencontré gagne en cas d'égalité.
///
/// Retourne `None` uniquement si `candidates` est vide.
pub fn select_candidate(
    candidates: &[ParcelCandidate],
    point: Coord<f64>,
    linked: Option<&LinkedParcelId>,
) -> Option<(usize, Selection)> {
    let mut linked_matches = None;

    if let Some(id) = linked {
        let matching: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| id.matches(c))
            .map(|(i, _)| i)
            .collect();

        if let [index] = matching.as_slice() {
            tracing::debug!(parcel_id = %id, index, "Selected linked parcel");
            return Some((
                *index,
                Selection::LinkedParcel {
                    parcel_id: id.to_string(),
                },
            ));
        }

        tracing::debug!(
            parcel_id = %id,
            matches = matching.len(),
            "Linked parcel filter inconclusive, using nearest"
        );
        linked_matches = Some(matching.len());
    }

    let (index, distance) = nearest(candidates, point)?;
    Some((
        index,
        Selection::Nearest {
            distance,
            linked_matches,
        },
    ))
}

/// Index et distance du candidat le plus proche
pub fn nearest(candidates: &[ParcelCandidate], point: Coord<f64>) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let distance = candidate.geometry.distance_to(point);
        let better = match best {
            Some((_, d)) => distance < d,
            None => !distance.is_nan(),
        };
        if better {
            best = Some((index, distance));
        }
    }
    best
}
