//! Résolution complète et API JSON contre des services PDOK simulés

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use kadaster::{epsg, ResolveError, ResolveOptions, Selection};
use perceel_kaart::server::router;
use perceel_kaart::{resolve_address, ResolutionReport, ResolutionStatus, ServiceConfig};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;

async fn mock_pdok(server: &MockServer, linked: Option<&str>) {
    Mock::given(method("GET"))
        .and(path(GEOCODER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(locatie_body(linked)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(WFS_PATH))
        .and(query_param("bbox", "121345,487300,121445,487400,EPSG:28992"))
        .respond_with(ResponseTemplate::new(200).set_body_string(wfs_body(dam_parcels())))
        .mount(server)
        .await;
}

async fn resolve(
    config: ServiceConfig,
    address: &str,
    options: ResolveOptions,
    score: bool,
) -> Result<perceel_kaart::Resolution, ResolveError> {
    let address = address.to_string();
    tokio::task::spawn_blocking(move || resolve_address(&config, &address, &options, score))
        .await
        .unwrap()
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_dam_nearest_parcel_in_wgs84() {
    let server = MockServer::start().await;
    mock_pdok(&server, None).await;

    let resolution = resolve(
        config_for(&server),
        "Dam 1, Amsterdam",
        ResolveOptions::default(),
        false,
    )
    .await
    .unwrap();
    let parcel = resolution.parcel;

    assert_eq!(parcel.candidate_count, 3);
    assert_eq!(parcel.candidate.parcel_number(), Some(3930));
    match parcel.selection {
        Selection::Nearest {
            distance,
            linked_matches,
        } => {
            assert!((distance - 4.4).abs() < 1e-6, "distance={}", distance);
            assert_eq!(linked_matches, None);
        }
        other => panic!("Expected Nearest, got {:?}", other),
    }

    // Point RD du Dam en WGS84
    assert_eq!(parcel.target_epsg, epsg::WGS84);
    assert!((parcel.location.x - 4.893735).abs() < 1e-5, "lon={}", parcel.location.x);
    assert!((parcel.location.y - 52.372996).abs() < 1e-5, "lat={}", parcel.location.y);

    let ring = parcel.geometry.polygons()[0].exterior();
    assert_eq!(ring.0.len(), 5);
    assert!(ring.is_closed());
    assert!(ring.0.iter().all(|c| (4.0..6.0).contains(&c.x) && (52.0..53.0).contains(&c.y)));
    assert!(resolution.biodiversity.is_none());
}

#[tokio::test]
async fn test_dam_linked_parcel_wins() {
    let server = MockServer::start().await;
    mock_pdok(&server, Some("ASD21-Y-3931")).await;

    let options = ResolveOptions {
        target_epsg: epsg::RD_NEW,
        ..Default::default()
    };
    let resolution = resolve(config_for(&server), "Dam 1, Amsterdam", options, false)
        .await
        .unwrap();
    let parcel = resolution.parcel;

    assert_eq!(
        parcel.selection,
        Selection::LinkedParcel {
            parcel_id: "ASD21-Y-3931".to_string()
        }
    );
    // Système natif : géométrie inchangée
    assert_eq!(parcel.geometry, parcel.candidate.geometry);
    assert_eq!(parcel.location.x, DAM_X);
}

#[tokio::test]
async fn test_address_not_found_skips_wfs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GEOCODER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(empty_locatie_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(WFS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(wfs_body(vec![])))
        .expect(0)
        .mount(&server)
        .await;

    let err = resolve(
        config_for(&server),
        "Nergensstraat 999",
        ResolveOptions::default(),
        false,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ResolveError::AddressNotFound(_)));
    let report = ResolutionReport::from_error("Nergensstraat 999", 4326, &err);
    assert_eq!(report.status, ResolutionStatus::Failed);
}

#[tokio::test]
async fn test_score_failure_keeps_parcel() {
    let server = MockServer::start().await;
    mock_pdok(&server, None).await;
    Mock::given(method("POST"))
        .and(path(SCORE_PATH))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let resolution = resolve(
        config_for(&server),
        "Dam 1, Amsterdam",
        ResolveOptions::default(),
        true,
    )
    .await
    .unwrap();

    assert_eq!(resolution.parcel.candidate.parcel_number(), Some(3930));
    let report = ResolutionReport::from_resolution(&resolution);
    assert_eq!(report.status, ResolutionStatus::PartialSuccess);
}

#[tokio::test]
async fn test_api_health() {
    let app = router(Arc::new(ServiceConfig::default()));
    let (status, body) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_api_parcel() {
    let server = MockServer::start().await;
    mock_pdok(&server, Some("ASD21-Y-3930")).await;

    let app = router(Arc::new(config_for(&server)));
    let (status, body) = get_json(app, "/api/parcel?address=Dam%201%2C%20Amsterdam&srid=3857").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], "Dam 1, Amsterdam");
    assert_eq!(body["srid"], 3857);
    assert_eq!(body["candidate_count"], 3);
    assert_eq!(body["selection"]["method"], "linked_parcel");
    assert_eq!(body["parcel"]["type"], "Feature");
    assert_eq!(body["parcel"]["properties"]["perceelnummer"], 3930);
    assert_eq!(body["style"]["fill_color"], "orange");
    assert!(body["biodiversity"].is_null());

    // Web Mercator du Dam
    let x = body["location"][0].as_f64().unwrap();
    let y = body["location"][1].as_f64().unwrap();
    assert!((x - 544768.14).abs() < 0.5, "x={}", x);
    assert!((y - 6867850.96).abs() < 0.5, "y={}", y);
}

#[tokio::test]
async fn test_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GEOCODER_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let app = router(Arc::new(config_for(&server)));

    let (status, body) = get_json(app.clone(), "/api/parcel?address=%20%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_input");

    let (status, body) = get_json(app.clone(), "/api/parcel?address=Dam%201&radius=-5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_input");

    let (status, body) = get_json(app, "/api/parcel?address=Dam%201").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "collaborator_unavailable");
}
