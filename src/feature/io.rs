use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use serde_json::{json, Value};

/// Parse a GeoJSON geometry object into a `geo::Geometry`.
pub(crate) fn geometry_from_json(value: &Value) -> Result<Geometry<f64>> {
    let ty = value["type"].as_str()
        .ok_or_else(|| anyhow!("[feature::io] geometry has no type"))?;

    if ty == "GeometryCollection" {
        let members = value["geometries"].as_array()
            .ok_or_else(|| anyhow!("[feature::io] GeometryCollection without geometries"))?;
        let geoms = members.iter().map(geometry_from_json).collect::<Result<Vec<_>>>()?;
        return Ok(Geometry::GeometryCollection(GeometryCollection(geoms)));
    }

    let coords = value.get("coordinates")
        .ok_or_else(|| anyhow!("[feature::io] {ty} without coordinates"))?;

    Ok(match ty {
        "Point" => Geometry::Point(Point(parse_coord(coords)?)),
        "MultiPoint" => Geometry::MultiPoint(MultiPoint(
            array(coords)?.iter().map(|c| parse_coord(c).map(Point)).collect::<Result<_>>()?,
        )),
        "LineString" => Geometry::LineString(parse_line(coords)?),
        "MultiLineString" => Geometry::MultiLineString(MultiLineString(
            array(coords)?.iter().map(parse_line).collect::<Result<_>>()?,
        )),
        "Polygon" => Geometry::Polygon(parse_polygon(coords)?),
        "MultiPolygon" => Geometry::MultiPolygon(MultiPolygon(
            array(coords)?.iter().map(parse_polygon).collect::<Result<_>>()?,
        )),
        other => bail!("[feature::io] unsupported geometry type {other:?}"),
    })
}

fn array(value: &Value) -> Result<&Vec<Value>> {
    value.as_array().ok_or_else(|| anyhow!("[feature::io] expected a coordinate array"))
}

/// Parse a position `[x, y, ...]`; extra ordinates (elevation) are ignored.
fn parse_coord(value: &Value) -> Result<Coord<f64>> {
    let pair = array(value)?;
    if pair.len() < 2 {
        bail!("[feature::io] position needs at least two numbers");
    }
    let x = pair[0].as_f64().ok_or_else(|| anyhow!("[feature::io] Invalid coordinate: x must be a number"))?;
    let y = pair[1].as_f64().ok_or_else(|| anyhow!("[feature::io] Invalid coordinate: y must be a number"))?;
    Ok(Coord { x, y })
}

fn parse_line(value: &Value) -> Result<LineString<f64>> {
    Ok(LineString(array(value)?.iter().map(parse_coord).collect::<Result<_>>()?))
}

/// Parse polygon rings: first ring is the exterior, the rest are holes.
fn parse_polygon(value: &Value) -> Result<Polygon<f64>> {
    let mut rings = array(value)?.iter().map(parse_line);
    let exterior = rings.next()
        .ok_or_else(|| anyhow!("[feature::io] Invalid Polygon: missing exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    // Polygon::new closes open rings.
    Ok(Polygon::new(exterior, interiors))
}

fn coord_json(c: &Coord<f64>) -> Value { json!([c.x, c.y]) }

fn line_json(ls: &LineString<f64>) -> Value {
    Value::Array(ls.coords().map(coord_json).collect())
}

fn polygon_json(p: &Polygon<f64>) -> Value {
    let mut rings = vec![line_json(p.exterior())];
    rings.extend(p.interiors().iter().map(line_json));
    Value::Array(rings)
}

/// Serialize a `geo::Geometry` back to a GeoJSON geometry object.
pub(crate) fn geometry_to_json(geometry: &Geometry<f64>) -> Result<Value> {
    Ok(match geometry {
        Geometry::Point(p) => json!({ "type": "Point", "coordinates": coord_json(&p.0) }),
        Geometry::MultiPoint(mp) => json!({
            "type": "MultiPoint",
            "coordinates": mp.0.iter().map(|p| coord_json(&p.0)).collect::<Vec<_>>(),
        }),
        Geometry::LineString(ls) => json!({ "type": "LineString", "coordinates": line_json(ls) }),
        Geometry::MultiLineString(mls) => json!({
            "type": "MultiLineString",
            "coordinates": mls.0.iter().map(line_json).collect::<Vec<_>>(),
        }),
        Geometry::Polygon(p) => json!({ "type": "Polygon", "coordinates": polygon_json(p) }),
        Geometry::MultiPolygon(mp) => json!({
            "type": "MultiPolygon",
            "coordinates": mp.0.iter().map(polygon_json).collect::<Vec<_>>(),
        }),
        Geometry::GeometryCollection(gc) => json!({
            "type": "GeometryCollection",
            "geometries": gc.0.iter().map(geometry_to_json).collect::<Result<Vec<_>>>()
                .context("[feature::io] GeometryCollection member")?,
        }),
        other => bail!("[feature::io] geometry {other:?} has no GeoJSON representation"),
    })
}
