//! # kadaster
//!
//! Résolution d'une adresse néerlandaise en parcelle cadastrale.
//!
//! ## Étapes
//!
//! - Géocodage de l'adresse (PDOK Locatieserver), premier document seulement
//! - Fenêtre carrée autour du point RD New, parcelles candidates via WFS
//! - Sélection par parcelle liée (`gekoppeld_perceel`), sinon la plus proche
//! - Reprojection sommet par sommet vers le système demandé
//!
//! Le crate ne fait aucun appel réseau : les collaborateurs sont injectés via
//! les traits [`Geocoder`], [`ParcelSource`] et [`CoordinateTransform`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kadaster::{ResolveOptions, Resolver};
//!
//! let resolver = Resolver::new(geocoder, wfs, reprojector);
//! let parcel = resolver.resolve("Dam 1, Amsterdam", &ResolveOptions::default())?;
//! println!("{:?} -> {:?}", parcel.selection, parcel.geometry);
//! ```

pub mod error;
pub mod geometry;
pub mod parser;
pub mod resolver;
pub mod select;
pub mod transform;
pub mod types;

pub use error::{ErrorKind, ResolveError, Service, TransformError, TransportFailure};
pub use geometry::ParcelGeometry;
pub use parser::locatie::LocationDocument;
pub use parser::parcel_id::LinkedParcelId;
pub use resolver::{Geocoder, ParcelSource, ResolveOptions, Resolver, DEFAULT_SEARCH_RADIUS};
pub use transform::CoordinateTransform;
pub use types::{epsg, BoundingBox, GeocodeResult, ParcelCandidate, ResolvedParcel, Selection};
