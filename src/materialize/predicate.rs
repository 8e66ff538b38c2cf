use crate::{error::ViewerError, geom::Viewport, layer::LayerDescriptor, selection::FilterSelection};

/// Compile the selection into a CQL predicate for the layer's remote type.
///
/// Returns `None` when nothing constrains the layer, so callers clear any applied
/// predicate instead of sending an always-true one. Precedence and fail-closed
/// behaviour mirror the in-process filter: a null state never equals a literal.
/// Accent and case folding of the hierarchy code is left to the server.
pub fn compile_predicate(layer: &LayerDescriptor, selection: &FilterSelection) -> Result<Option<String>, ViewerError> {
    let mut clauses = Vec::new();

    if let (Some(code), Some(field)) = (selection.hierarchy_code.as_deref(), layer.hierarchy_field.as_deref()) {
        let field = identifier(field)?;
        clauses.push(format!("({field} IS NULL OR {field} = {})", quote_literal(code)));
    }

    if let Some(state) = selection.state.as_deref() {
        let field = state_expr(&layer.state_field)?;
        clauses.push(format!("{field} = {}", quote_literal(&state_code(state)?)));
    } else if let Some(region) = selection.region {
        let field = state_expr(&layer.state_field)?;
        let members = region.members().iter().map(|s| quote_literal(s)).collect::<Vec<_>>().join(", ");
        clauses.push(format!("{field} IN ({members})"));
    }

    Ok((!clauses.is_empty()).then(|| clauses.join(" AND ")))
}

/// `BBOX(...)` clause scoping a query to the viewport in lon/lat.
pub(crate) fn bbox_clause(geometry_field: &str, viewport: &Viewport) -> Result<String, ViewerError> {
    let field = identifier(geometry_field)?;
    let [w, s, e, n] = viewport.to_bbox();
    Ok(format!("BBOX({field}, {w}, {s}, {e}, {n}, 'EPSG:4326')"))
}

/// Single-quoted CQL string literal: quotes doubled, control characters dropped.
fn quote_literal(value: &str) -> String {
    let escaped: String = value.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .replace('\'', "''");
    format!("'{escaped}'")
}

/// Attribute names are interpolated unquoted, so only plain identifiers are accepted.
fn identifier(name: &str) -> Result<&str, ViewerError> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(ViewerError::InvalidConfig(format!("{name:?} is not a valid attribute name")))
    }
}

/// State attribute trimmed and upper-cased server-side, as the local filter compares it.
fn state_expr(field: &str) -> Result<String, ViewerError> {
    Ok(format!("strToUpperCase(strTrim({}))", identifier(field)?))
}

fn state_code(state: &str) -> Result<String, ViewerError> {
    let state = state.trim();
    if state.len() == 2 && state.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(state.to_ascii_uppercase())
    } else {
        Err(ViewerError::InvalidSelection(format!("state code {state:?} is not two letters")))
    }
}
