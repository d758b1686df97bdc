//! Export vers GeoJSON et WKT avec geozero

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use geo::{Geometry, Point};
use geozero::geojson::GeoJsonWriter;
use geozero::wkt::WktWriter;
use geozero::GeozeroGeometry;
use serde_json::{json, Map, Value};

use kadaster::{ParcelGeometry, ResolvedParcel};

/// Exporte la parcelle résolue et le point de l'adresse en FeatureCollection
pub fn export_to_geojson(parcel: &ResolvedParcel, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    write_collection(&mut writer, parcel)?;
    writer.flush()?;

    Ok(())
}

/// Écrit la FeatureCollection (parcelle puis marqueur d'adresse)
pub fn write_collection<W: Write>(writer: &mut W, parcel: &ResolvedParcel) -> Result<()> {
    // Header FeatureCollection avec CRS
    write!(
        writer,
        r#"{{"type":"FeatureCollection","crs":{{"type":"name","properties":{{"name":"urn:ogc:def:crs:EPSG::{}"}}}},"features":["#,
        parcel.target_epsg
    )?;

    write_parcel_feature(writer, parcel)?;
    write!(writer, ",")?;
    write_marker_feature(writer, parcel)?;

    // Footer
    write!(writer, "]}}")?;
    Ok(())
}

/// Feature GeoJSON de la parcelle, pour les réponses JSON
pub fn parcel_feature(parcel: &ResolvedParcel) -> Result<Value> {
    let mut buf = Vec::new();
    write_parcel_feature(&mut buf, parcel)?;
    serde_json::from_slice(&buf).context("Invalid GeoJSON feature")
}

/// Représentation WKT de la géométrie
pub fn to_wkt(geometry: &ParcelGeometry) -> Result<String> {
    let mut buf = Vec::new();
    let mut wkt_writer = WktWriter::new(&mut buf);
    geometry.to_geometry().process_geom(&mut wkt_writer)?;
    String::from_utf8(buf).context("WKT output is not UTF-8")
}

/// Écrit la feature de la parcelle
fn write_parcel_feature<W: Write>(writer: &mut W, parcel: &ResolvedParcel) -> Result<()> {
    let id = parcel
        .candidate
        .local_id()
        .unwrap_or_else(|| "parcel".to_string());

    write!(writer, r#"{{"type":"Feature","id":"#)?;
    serde_json::to_writer(&mut *writer, &id)?;

    // Geometry via geozero
    write!(writer, r#","geometry":"#)?;
    write_geometry(writer, &parcel.geometry.to_geometry())?;

    // Properties : attributs WFS + contexte de la résolution
    let mut properties: Map<String, Value> = parcel.candidate.properties.clone();
    properties.insert("address".to_string(), json!(parcel.source_address));
    properties.insert("selection".to_string(), serde_json::to_value(&parcel.selection)?);
    write!(writer, r#","properties":"#)?;
    serde_json::to_writer(&mut *writer, &properties)?;
    write!(writer, "}}")?;

    Ok(())
}

/// Écrit le marqueur du point géocodé
fn write_marker_feature<W: Write>(writer: &mut W, parcel: &ResolvedParcel) -> Result<()> {
    write!(writer, r#"{{"type":"Feature","id":"address","geometry":"#)?;
    write_geometry(writer, &Geometry::Point(Point::from(parcel.location)))?;

    let properties = json!({
        "address": parcel.source_address,
        "display_name": parcel.geocode.display_name,
        "linked_parcel_id": parcel.geocode.linked_parcel_id,
    });
    write!(writer, r#","properties":"#)?;
    serde_json::to_writer(&mut *writer, &properties)?;
    write!(writer, "}}")?;

    Ok(())
}

fn write_geometry<W: Write>(writer: &mut W, geometry: &Geometry<f64>) -> Result<()> {
    let mut geom_buf = Vec::new();
    let mut geom_writer = GeoJsonWriter::new(&mut geom_buf);
    geometry.process_geom(&mut geom_writer)?;
    writer.write_all(&geom_buf)?;
    Ok(())
}
