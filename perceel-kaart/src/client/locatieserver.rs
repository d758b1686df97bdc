//! Client du PDOK Locatieserver (free search)

use reqwest::blocking::Client;

use kadaster::parser::locatie::parse_response;
use kadaster::{Geocoder, LocationDocument, ResolveError, Service};

use super::http::send;

/// Géocodeur PDOK Locatieserver
#[derive(Debug, Clone)]
pub struct LocatieserverClient {
    client: Client,
    url: String,
}

impl LocatieserverClient {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl Geocoder for LocatieserverClient {
    fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<LocationDocument>, ResolveError> {
        let rows = max_results.to_string();
        let request = self
            .client
            .get(&self.url)
            .query(&[("q", query), ("rows", rows.as_str()), ("fl", "*")]);

        let body = send(Service::Geocoder, request)?;
        let mut docs = parse_response(&body)?;
        docs.truncate(max_results);
        Ok(docs)
    }
}
