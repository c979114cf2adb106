//! Validation utilities for recommendation requests
//!
//! Presence is checked for every field before any value is coerced, so a
//! request missing several fields reports all of them at once.

use crate::error::ValidationError;
use crate::models::{NumericInput, RecommendationRequest, SoilInput};
use crate::types::GpsCoordinates;

/// Request fields in the order they are reported when missing
pub const REQUIRED_FIELDS: [&str; 7] = ["lat", "lon", "N", "P", "K", "ph", "rainfall"];

// ============================================================================
// Field checks
// ============================================================================

/// A field is missing when absent, `null` or a blank string. Zero is a value.
pub fn is_missing(value: Option<&NumericInput>) -> bool {
    value.map_or(true, NumericInput::is_blank)
}

/// Coerce a present field to a finite number
pub fn parse_field(field: &'static str, value: &NumericInput) -> Result<f64, ValidationError> {
    value.as_f64().ok_or_else(|| ValidationError::InvalidParameter {
        field,
        value: match value {
            NumericInput::Number(v) => v.to_string(),
            NumericInput::Text(s) => s.clone(),
        },
    })
}

/// Latitude must lie in [-90, 90] and longitude in [-180, 180]
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(ValidationError::OutOfRange {
            field: "lat",
            value: lat.to_string(),
        });
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(ValidationError::OutOfRange {
            field: "lon",
            value: lon.to_string(),
        });
    }
    Ok(())
}

/// N, P and K are echoed back as whole numbers, so their integer part must
/// fit in an `i64`
pub fn validate_nutrient(field: &'static str, value: f64) -> Result<(), ValidationError> {
    // Rounds to 2^63, one past i64::MAX; -2^63 is i64::MIN exactly
    const LIMIT: f64 = i64::MAX as f64;
    if (-LIMIT..LIMIT).contains(&value.trunc()) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value: value.to_string(),
        })
    }
}

// ============================================================================
// Request validation
// ============================================================================

fn fields(request: &RecommendationRequest) -> [(&'static str, Option<&NumericInput>); 7] {
    [
        ("lat", request.lat.as_ref()),
        ("lon", request.lon.as_ref()),
        ("N", request.n.as_ref()),
        ("P", request.p.as_ref()),
        ("K", request.k.as_ref()),
        ("ph", request.ph.as_ref()),
        ("rainfall", request.rainfall.as_ref()),
    ]
}

/// Names of the required fields that are missing, in [`REQUIRED_FIELDS`] order
pub fn missing_fields(request: &RecommendationRequest) -> Vec<&'static str> {
    fields(request)
        .into_iter()
        .filter(|(_, value)| is_missing(*value))
        .map(|(name, _)| name)
        .collect()
}

/// Check presence of all seven fields, then coerce each to a number
pub fn validate_recommendation_request(
    request: &RecommendationRequest,
) -> Result<SoilInput, ValidationError> {
    let missing = missing_fields(request);
    if !missing.is_empty() {
        return Err(ValidationError::MissingParameters { fields: missing });
    }

    let mut values = [0.0; 7];
    for (slot, (name, value)) in values.iter_mut().zip(fields(request)) {
        let value = value.ok_or_else(|| ValidationError::MissingParameters { fields: vec![name] })?;
        *slot = parse_field(name, value)?;
    }
    let [lat, lon, n, p, k, ph, rainfall] = values;
    validate_coordinates(lat, lon)?;
    validate_nutrient("N", n)?;
    validate_nutrient("P", p)?;
    validate_nutrient("K", k)?;

    Ok(SoilInput {
        location: GpsCoordinates::new(lat, lon),
        n,
        p,
        k,
        ph,
        rainfall,
    })
}

impl RecommendationRequest {
    /// Validate and coerce; see [`validate_recommendation_request`]
    pub fn into_input(self) -> Result<SoilInput, ValidationError> {
        validate_recommendation_request(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> RecommendationRequest {
        RecommendationRequest {
            lat: Some(28.6.into()),
            lon: Some(77.2.into()),
            n: Some(90.0.into()),
            p: Some("42".into()),
            k: Some(43.0.into()),
            ph: Some("6.5".into()),
            rainfall: Some(200.0.into()),
        }
    }

    #[test]
    fn test_valid_request() {
        let input = validate_recommendation_request(&full_request()).unwrap();
        assert_eq!(input.location, GpsCoordinates::new(28.6, 77.2));
        assert_eq!(input.n, 90.0);
        assert_eq!(input.p, 42.0);
        assert_eq!(input.ph, 6.5);
        assert_eq!(input.rainfall, 200.0);
    }

    #[test]
    fn test_zero_is_a_valid_reading() {
        let request = RecommendationRequest {
            n: Some(0.0.into()),
            k: Some("0".into()),
            ..full_request()
        };
        let input = request.into_input().unwrap();
        assert_eq!(input.n, 0.0);
        assert_eq!(input.k, 0.0);
    }

    #[test]
    fn test_each_missing_field_is_reported() {
        for field in REQUIRED_FIELDS {
            let mut request = full_request();
            match field {
                "lat" => request.lat = None,
                "lon" => request.lon = None,
                "N" => request.n = None,
                "P" => request.p = None,
                "K" => request.k = None,
                "ph" => request.ph = None,
                _ => request.rainfall = None,
            }
            assert_eq!(
                validate_recommendation_request(&request),
                Err(ValidationError::MissingParameters {
                    fields: vec![field]
                })
            );
        }
    }

    #[test]
    fn test_all_missing_fields_listed_in_order() {
        let request = RecommendationRequest {
            lat: Some("  ".into()),
            ph: None,
            n: Some("".into()),
            ..full_request()
        };
        assert_eq!(missing_fields(&request), vec!["lat", "N", "ph"]);
        assert_eq!(
            missing_fields(&RecommendationRequest::default()),
            REQUIRED_FIELDS.to_vec()
        );
    }

    #[test]
    fn test_non_numeric_value_is_invalid() {
        let request = RecommendationRequest {
            rainfall: Some("lots".into()),
            ..full_request()
        };
        assert_eq!(
            validate_recommendation_request(&request),
            Err(ValidationError::InvalidParameter {
                field: "rainfall",
                value: "lots".to_string()
            })
        );
    }

    #[test]
    fn test_coordinates_out_of_range() {
        assert!(validate_coordinates(90.0, -180.0).is_ok());
        assert!(validate_coordinates(90.1, 0.0).is_err());
        assert!(validate_coordinates(0.0, 180.5).is_err());

        let request = RecommendationRequest {
            lon: Some("200".into()),
            ..full_request()
        };
        assert!(matches!(
            request.into_input(),
            Err(ValidationError::OutOfRange { field: "lon", .. })
        ));
    }

    #[test]
    fn test_nutrient_must_fit_whole_number_echo() {
        assert!(validate_nutrient("N", 0.0).is_ok());
        assert!(validate_nutrient("N", -90.7).is_ok());
        assert!(validate_nutrient("N", 9.0e18).is_ok());
        assert!(validate_nutrient("N", 1e300).is_err());
        assert!(validate_nutrient("K", -1e19).is_err());

        let request = RecommendationRequest {
            p: Some("1e300".into()),
            ..full_request()
        };
        assert_eq!(
            request.into_input(),
            Err(ValidationError::OutOfRange {
                field: "P",
                value: 1e300.to_string()
            })
        );
    }

    #[test]
    fn test_error_messages() {
        let err = ValidationError::MissingParameters {
            fields: vec!["lat", "K"],
        };
        assert_eq!(err.to_string(), "Missing parameters: lat, K");
    }
}
