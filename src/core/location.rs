use crate::models::{MapMarker, RankedRecord};
use serde_json::Value;

pub const LAT_FIELD: &str = "location_lat";
pub const LON_FIELD: &str = "location_long";

const DEFAULT_TOOLTIP: &str = "Selected Animal";

/// Read a coordinate that may be stored as a number or numeric text
#[inline]
fn coordinate(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    parsed.is_finite().then_some(parsed)
}

/// Clamp a selected row index into a page of `len` rows
#[inline]
pub fn clamp_selection(selected: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(selected.unwrap_or(0).min(len - 1))
}

/// Build the map pin for the selected row of a page
///
/// Falls back to the first row when nothing is selected and to the last
/// row when the selection runs past the page. Returns `None` when the page
/// is empty or the row has no usable coordinates.
pub fn marker_for(rows: &[RankedRecord], selected: Option<usize>) -> Option<MapMarker> {
    let row = &rows[clamp_selection(selected, rows.len())?].record;

    let latitude = coordinate(row.field(LAT_FIELD))?;
    let longitude = coordinate(row.field(LON_FIELD))?;

    Some(MapMarker {
        latitude,
        longitude,
        tooltip: row
            .breed
            .clone()
            .unwrap_or_else(|| DEFAULT_TOOLTIP.to_string()),
        popup: row.name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ranker::annotate;
    use crate::models::{AnimalRecord, MatchCriteria};
    use serde_json::{json, Map};

    fn create_row(breed: Option<&str>, lat: Value, lon: Value) -> RankedRecord {
        let mut fields = Map::new();
        fields.insert("name".to_string(), json!("Biscuit"));
        fields.insert(LAT_FIELD.to_string(), lat);
        fields.insert(LON_FIELD.to_string(), lon);

        let record = AnimalRecord {
            breed: breed.map(str::to_string),
            sex_upon_outcome: None,
            age_upon_outcome_in_weeks: None,
            fields,
        };

        annotate(vec![record], &MatchCriteria::empty()).remove(0)
    }

    #[test]
    fn test_clamp_selection() {
        assert_eq!(clamp_selection(None, 0), None);
        assert_eq!(clamp_selection(Some(3), 0), None);
        assert_eq!(clamp_selection(None, 5), Some(0));
        assert_eq!(clamp_selection(Some(2), 5), Some(2));
        assert_eq!(clamp_selection(Some(9), 5), Some(4));
    }

    #[test]
    fn test_marker_for_selected_row() {
        let rows = vec![
            create_row(Some("Beagle"), json!(30.1), json!(-97.1)),
            create_row(Some("Collie"), json!("30.2"), json!("-97.2")),
        ];

        let marker = marker_for(&rows, Some(1)).unwrap();

        assert_eq!(marker.latitude, 30.2);
        assert_eq!(marker.longitude, -97.2);
        assert_eq!(marker.tooltip, "Collie");
        assert_eq!(marker.popup, "Biscuit");
    }

    #[test]
    fn test_marker_missing_coordinates() {
        let rows = vec![create_row(Some("Beagle"), Value::Null, json!(-97.1))];
        assert!(marker_for(&rows, None).is_none());

        let rows = vec![create_row(Some("Beagle"), json!("north"), json!(-97.1))];
        assert!(marker_for(&rows, None).is_none());
    }

    #[test]
    fn test_marker_default_tooltip() {
        let rows = vec![create_row(None, json!(30.75), json!(-97.48))];
        assert_eq!(marker_for(&rows, Some(7)).unwrap().tooltip, DEFAULT_TOOLTIP);
    }

    #[test]
    fn test_marker_empty_page() {
        assert!(marker_for(&[], Some(0)).is_none());
    }
}
