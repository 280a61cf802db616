use crate::{
    payload::{FieldValue, Payload},
    NewCheckIn,
};
use rust_decimal::{prelude::FromPrimitive, Decimal};
use serde::{ser::SerializeMap, Serialize, Serializer};

pub const LAT_BOUNDS: (f64, f64) = (-90.0, 90.0);
pub const LNG_BOUNDS: (f64, f64) = (-180.0, 180.0);
/// Coordinates are stored as numeric(10, 7)
pub const COORDINATE_SCALE: u32 = 7;

/// Error messages keyed by field, in the order fields are validated.
/// Serializes as a JSON object of `field -> [message, ..]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(Vec<(&'static str, Vec<String>)>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: String) {
        match self.0.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.0.push((field, vec![message])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(name, _)| *name)
    }

    /// The first message, with a count of the remaining ones appended.
    pub fn message(&self) -> String {
        let mut messages = self.0.iter().flat_map(|(_, messages)| messages.iter());
        let Some(first) = messages.next() else {
            return "The given data was invalid.".to_string();
        };
        match messages.count() {
            0 => first.clone(),
            1 => format!("{first} (and 1 more error)"),
            n => format!("{first} (and {n} more errors)"),
        }
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, messages) in &self.0 {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

/// Check a submitted payload against the check-in field rules.
///
/// * `description`: required, string, not empty
/// * `lat`: key required, value may be null, otherwise a number in [-90, 90]
/// * `lng`: key required, value may be null, otherwise a number in [-180, 180]
/// * `notes`: optional string
///
/// Every field is checked so all violations are reported together.
pub fn validate(payload: &Payload) -> Result<NewCheckIn, FieldErrors> {
    let mut errors = FieldErrors::default();

    let description = required_string(payload, "description", &mut errors);
    let lat = nullable_coordinate(payload, "lat", LAT_BOUNDS, &mut errors);
    let lng = nullable_coordinate(payload, "lng", LNG_BOUNDS, &mut errors);
    let notes = optional_string(payload, "notes", &mut errors);

    match (description, lat, lng, notes) {
        (Some(description), Some(lat), Some(lng), Some(notes)) if errors.is_empty() => {
            Ok(NewCheckIn {
                description,
                lat,
                lng,
                notes,
            })
        }
        _ => Err(errors),
    }
}

fn required_string(
    payload: &Payload,
    field: &'static str,
    errors: &mut FieldErrors,
) -> Option<String> {
    match payload.get(field) {
        None | Some(FieldValue::Null) => {
            errors.add(field, format!("The {field} field is required."));
            None
        }
        Some(FieldValue::Text(text)) => Some(text.clone()),
        Some(_) => {
            errors.add(field, format!("The {field} field must be a string."));
            None
        }
    }
}

fn optional_string(
    payload: &Payload,
    field: &'static str,
    errors: &mut FieldErrors,
) -> Option<Option<String>> {
    match payload.get(field) {
        None | Some(FieldValue::Null) => Some(None),
        Some(FieldValue::Text(text)) => Some(Some(text.clone())),
        Some(_) => {
            errors.add(field, format!("The {field} field must be a string."));
            None
        }
    }
}

/// The outer `Option` is validity, the inner one the stored value.
fn nullable_coordinate(
    payload: &Payload,
    field: &'static str,
    (min, max): (f64, f64),
    errors: &mut FieldErrors,
) -> Option<Option<Decimal>> {
    let value = match payload.get(field) {
        None => {
            errors.add(field, format!("The {field} field is required."));
            return None;
        }
        Some(FieldValue::Null) => return Some(None),
        Some(FieldValue::Number(n)) => Some(*n).filter(|n| !n.is_nan()),
        Some(FieldValue::Text(text)) => numeric_text(text),
        Some(FieldValue::Bool(_)) | Some(FieldValue::Composite) => None,
    };

    // an overflowing literal is still a number, just out of bounds
    let Some(value) = value else {
        errors.add(field, format!("The {field} field must be a number."));
        return None;
    };

    if value < min || value > max {
        errors.add(
            field,
            format!("The {field} field must be between {min} and {max}."),
        );
        return None;
    }

    match Decimal::from_f64(value) {
        Some(decimal) => Some(Some(decimal.round_dp(COORDINATE_SCALE))),
        None => {
            errors.add(field, format!("The {field} field must be a number."));
            None
        }
    }
}

/// Decimal or exponent notation only; `inf` and `NaN` spellings are not
/// numbers here.
fn numeric_text(text: &str) -> Option<f64> {
    let notation = text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    notation.then(|| text.parse::<f64>().ok()).flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn json_payload(value: serde_json::Value) -> Payload {
        Payload::from_json(value).expect("payload")
    }

    #[test]
    fn accepts_complete_check_in() {
        let check_in = validate(&json_payload(json!({
            "description": "Test check-in",
            "lat": 40.7128,
            "lng": -74.0060,
            "notes": "noted!",
        })))
        .expect("valid");

        assert_eq!(
            check_in,
            NewCheckIn {
                description: "Test check-in".to_string(),
                lat: Some(dec!(40.7128)),
                lng: Some(dec!(-74.006)),
                notes: Some("noted!".to_string()),
            }
        );
    }

    #[test]
    fn explicit_null_coordinates_are_valid() {
        let check_in = validate(&json_payload(json!({
            "description": "somewhere",
            "lat": null,
            "lng": null,
        })))
        .expect("valid");

        assert_eq!(check_in.lat, None);
        assert_eq!(check_in.lng, None);
        assert_eq!(check_in.notes, None);
    }

    #[test]
    fn absent_coordinates_are_required() {
        let errors = validate(&json_payload(json!({ "description": "somewhere" }))).unwrap_err();

        assert_eq!(
            errors.get("lat"),
            Some(&["The lat field is required.".to_string()][..])
        );
        assert_eq!(
            errors.get("lng"),
            Some(&["The lng field is required.".to_string()][..])
        );
        assert_eq!(errors.get("description"), None);
    }

    #[test]
    fn missing_description_is_required() {
        let errors = validate(&json_payload(json!({
            "lat": 40.7128,
            "lng": -74.0060,
        })))
        .unwrap_err();

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["description"]);
        assert_eq!(errors.message(), "The description field is required.");
    }

    #[test]
    fn blank_description_is_required() {
        let errors = validate(&Payload::from_pairs([
            ("description", "   "),
            ("lat", ""),
            ("lng", ""),
        ]))
        .unwrap_err();

        assert_eq!(
            errors.get("description"),
            Some(&["The description field is required.".to_string()][..])
        );
    }

    #[test]
    fn non_string_description_and_notes() {
        let errors = validate(&json_payload(json!({
            "description": 12,
            "lat": null,
            "lng": null,
            "notes": ["a"],
        })))
        .unwrap_err();

        assert_eq!(
            errors.get("description"),
            Some(&["The description field must be a string.".to_string()][..])
        );
        assert_eq!(
            errors.get("notes"),
            Some(&["The notes field must be a string.".to_string()][..])
        );
    }

    #[test]
    fn coordinates_out_of_bounds() {
        let errors = validate(&json_payload(json!({
            "description": "edge",
            "lat": 90.0001,
            "lng": -180.5,
        })))
        .unwrap_err();

        assert_eq!(
            errors.get("lat"),
            Some(&["The lat field must be between -90 and 90.".to_string()][..])
        );
        assert_eq!(
            errors.get("lng"),
            Some(&["The lng field must be between -180 and 180.".to_string()][..])
        );
        assert_eq!(
            errors.message(),
            "The lat field must be between -90 and 90. (and 1 more error)"
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        let check_in = validate(&json_payload(json!({
            "description": "pole",
            "lat": -90,
            "lng": 180,
        })))
        .expect("valid");

        assert_eq!(check_in.lat, Some(dec!(-90)));
        assert_eq!(check_in.lng, Some(dec!(180)));
    }

    #[test]
    fn numeric_strings_are_numbers() {
        let check_in = validate(&Payload::from_pairs([
            ("description", "form"),
            ("lat", " 51.5072 "),
            ("lng", "-0.1276"),
            ("notes", ""),
        ]))
        .expect("valid");

        assert_eq!(check_in.lat, Some(dec!(51.5072)));
        assert_eq!(check_in.lng, Some(dec!(-0.1276)));
        assert_eq!(check_in.notes, None);
    }

    #[test]
    fn non_numeric_coordinates() {
        let errors = validate(&Payload::from_pairs([
            ("description", "form"),
            ("lat", "north"),
            ("lng", "NaN"),
        ]))
        .unwrap_err();

        assert_eq!(
            errors.get("lat"),
            Some(&["The lat field must be a number.".to_string()][..])
        );
        assert_eq!(
            errors.get("lng"),
            Some(&["The lng field must be a number.".to_string()][..])
        );
    }

    #[test]
    fn overflowing_coordinates_are_out_of_bounds() {
        let payload = Payload::from_json_slice(
            br#"{"description":"far","lat":1e400,"lng":-1e400}"#,
        )
        .expect("payload");
        let errors = validate(&payload).unwrap_err();
        assert_eq!(
            errors.get("lat"),
            Some(&["The lat field must be between -90 and 90.".to_string()][..])
        );
        assert_eq!(
            errors.get("lng"),
            Some(&["The lng field must be between -180 and 180.".to_string()][..])
        );

        let errors = validate(&Payload::from_pairs([
            ("description", "form"),
            ("lat", "1e400"),
            ("lng", "inf"),
        ]))
        .unwrap_err();
        assert_eq!(
            errors.get("lat"),
            Some(&["The lat field must be between -90 and 90.".to_string()][..])
        );
        assert_eq!(
            errors.get("lng"),
            Some(&["The lng field must be a number.".to_string()][..])
        );
    }

    #[test]
    fn coordinates_are_rounded_to_storage_scale() {
        let check_in = validate(&json_payload(json!({
            "description": "precise",
            "lat": 12.345678912,
            "lng": null,
        })))
        .expect("valid");

        assert_eq!(check_in.lat, Some(dec!(12.3456789)));
    }

    #[test]
    fn message_counts_every_error() {
        let errors = validate(&json_payload(json!({}))).unwrap_err();

        assert_eq!(
            errors.message(),
            "The description field is required. (and 2 more errors)"
        );
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({
                "description": ["The description field is required."],
                "lat": ["The lat field is required."],
                "lng": ["The lng field is required."],
            })
        );
    }
}
