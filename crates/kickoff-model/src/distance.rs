use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::ModelError;
use crate::roster::{Roster, TeamId};

/// Mean Earth radius (IUGG), km
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Venues closer than this share a conflict pair
pub const CONFLICT_THRESHOLD_KM: f64 = 15.0;

/// Distance between every ordered pair of teams, diagonal included
pub type DistanceMatrix = BTreeMap<(TeamId, TeamId), f64>;

/// Stadium position in decimal degrees
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance in km (haversine)
    pub fn haversine_km(&self, other: &Coordinates) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
    }
}

/// Build the full distance matrix from venue coordinates keyed by team name
pub fn distance_matrix(
    roster: &Roster,
    venues: &HashMap<String, Coordinates>,
) -> Result<DistanceMatrix, ModelError> {
    let coords: Vec<&Coordinates> = roster
        .names()
        .iter()
        .map(|name| {
            venues
                .get(name)
                .ok_or_else(|| ModelError::MissingCoordinates(name.clone()))
        })
        .collect::<Result<_, _>>()?;

    let mut matrix = DistanceMatrix::new();
    for i in roster.ids() {
        matrix.insert((i, i), 0.0);
        for j in (i + 1)..=roster.len() {
            let d = coords[i - 1].haversine_km(coords[j - 1]);
            matrix.insert((i, j), d);
            matrix.insert((j, i), d);
        }
    }
    Ok(matrix)
}

/// Unordered pairs `(i, j)`, `i < j`, whose venues are closer than `threshold`
pub fn conflict_pairs(distances: &DistanceMatrix, threshold: f64) -> BTreeSet<(TeamId, TeamId)> {
    distances
        .iter()
        .filter(|&(&(i, j), &d)| i < j && d < threshold)
        .map(|(&pair, _)| pair)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venues() -> HashMap<String, Coordinates> {
        HashMap::from([
            ("Bielefeld".to_string(), Coordinates::new(52.021168, 8.541486)),
            ("Bochum".to_string(), Coordinates::new(51.481663, 7.222778)),
            ("Union Berlin".to_string(), Coordinates::new(52.453489, 13.288811)),
            ("Hertha".to_string(), Coordinates::new(52.514722, 13.239444)),
        ])
    }

    #[test]
    fn test_haversine_known_distance() {
        let bielefeld = Coordinates::new(52.021168, 8.541486);
        let bochum = Coordinates::new(51.481663, 7.222778);
        assert!((bielefeld.haversine_km(&bochum) - 108.806).abs() < 0.01);
        assert_eq!(bochum.haversine_km(&bochum), 0.0);
    }

    #[test]
    fn test_matrix_is_total_and_symmetric() {
        let roster = Roster::new(["Bielefeld", "Bochum", "Union Berlin", "Hertha"]).unwrap();
        let matrix = distance_matrix(&roster, &venues()).unwrap();

        assert_eq!(matrix.len(), 16);
        for i in roster.ids() {
            assert_eq!(matrix[&(i, i)], 0.0);
            for j in roster.ids() {
                assert_eq!(matrix[&(i, j)], matrix[&(j, i)]);
            }
        }
    }

    #[test]
    fn test_conflict_pairs_within_threshold() {
        let roster = Roster::new(["Bielefeld", "Bochum", "Union Berlin", "Hertha"]).unwrap();
        let matrix = distance_matrix(&roster, &venues()).unwrap();

        let pairs = conflict_pairs(&matrix, CONFLICT_THRESHOLD_KM);
        assert_eq!(pairs, BTreeSet::from([(3, 4)]));
        assert!(conflict_pairs(&matrix, 1.0).is_empty());
    }

    #[test]
    fn test_missing_venue() {
        let roster = Roster::new(["Bielefeld", "Mainz"]).unwrap();
        assert_eq!(
            distance_matrix(&roster, &venues()),
            Err(ModelError::MissingCoordinates("Mainz".to_string()))
        );
    }
}
