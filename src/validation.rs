use crate::errors::AppError;
use validator::ValidationError;

pub const MAX_BATCH_SIZE: usize = 1000;
pub const DEFAULT_LIST_LIMIT: usize = 50;
pub const MAX_LIST_LIMIT: usize = 500;

/// Enrichment resolution classes a tier document may request.
pub const RESOLUTION_CLASSES: &[&str] = &["1km", "100m", "10m"];

pub fn validate_lat(lat: f64) -> Result<(), ValidationError> {
    if !lat.is_finite() || lat < -90.0 || lat > 90.0 {
        return Err(ValidationError::new("latitude"));
    }
    Ok(())
}

pub fn validate_lon(lon: f64) -> Result<(), ValidationError> {
    if !lon.is_finite() || lon < -180.0 || lon > 180.0 {
        return Err(ValidationError::new("longitude"));
    }
    Ok(())
}

pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), AppError> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(AppError::Validation(
            "Coordinates must be finite numbers".to_string(),
        ));
    }
    if lat < -90.0 || lat > 90.0 {
        return Err(AppError::Validation(
            "Latitude must be between -90 and 90".to_string(),
        ));
    }
    if lon < -180.0 || lon > 180.0 {
        return Err(AppError::Validation(
            "Longitude must be between -180 and 180".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_radius(radius_m: f64) -> Result<(), AppError> {
    if !radius_m.is_finite() || radius_m < 0.0 {
        return Err(AppError::Validation(
            "Radius must be a non-negative number of metres".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_batch_size(size: usize) -> Result<(), AppError> {
    if size == 0 {
        return Err(AppError::Validation(
            "Request must contain at least one point".to_string(),
        ));
    }
    if size > MAX_BATCH_SIZE {
        return Err(AppError::Validation(format!(
            "Maximum {MAX_BATCH_SIZE} points per batch request"
        )));
    }
    Ok(())
}

/// Clamps a caller-supplied listing limit into the served range.
pub fn effective_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poles_and_antimeridian_are_valid() {
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-90.0, -180.0).is_ok());
    }

    #[test]
    fn out_of_range_rejected() {
        assert!(validate_coordinates(90.001, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.001).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
        assert!(validate_coordinates(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn batch_cap() {
        assert!(validate_batch_size(1).is_ok());
        assert!(validate_batch_size(MAX_BATCH_SIZE).is_ok());
        assert!(validate_batch_size(MAX_BATCH_SIZE + 1).is_err());
        assert!(validate_batch_size(0).is_err());
    }

    #[test]
    fn limits_clamp() {
        assert_eq!(effective_limit(None), DEFAULT_LIST_LIMIT);
        assert_eq!(effective_limit(Some(0)), 1);
        assert_eq!(effective_limit(Some(10_000)), MAX_LIST_LIMIT);
        assert_eq!(effective_limit(Some(7)), 7);
    }

    #[test]
    fn zero_radius_is_valid() {
        assert!(validate_radius(0.0).is_ok());
        assert!(validate_radius(-1.0).is_err());
    }
}
