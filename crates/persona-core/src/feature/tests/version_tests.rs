use std::str::FromStr;

use crate::feature::version::{ApiVersion, VersionError, VersionRange};

#[test]
fn test_api_version_parse_and_display() {
    let version = ApiVersion::from_str("0.1.0").unwrap();
    assert_eq!(version, ApiVersion::new(0, 1, 0));
    assert_eq!(version.to_string(), "0.1.0");
}

#[test]
fn test_api_version_rejects_partial_versions() {
    assert!(matches!(ApiVersion::from_str("1.0"), Err(VersionError::InvalidFormat(_))));
    assert!(matches!(ApiVersion::from_str("a.b.c"), Err(VersionError::ParseError(_))));
}

#[test]
fn test_major_compatibility() {
    let v1 = ApiVersion::new(1, 2, 0);
    assert!(v1.is_compatible_with(&ApiVersion::new(1, 0, 9)));
    assert!(!v1.is_compatible_with(&ApiVersion::new(2, 0, 0)));
}

#[test]
fn test_range_matching() {
    let range = VersionRange::from_constraint(">=0.1, <0.3").unwrap();
    assert!(range.includes_api(&ApiVersion::new(0, 1, 0)));
    assert!(range.includes_api(&ApiVersion::new(0, 2, 5)));
    assert!(!range.includes_api(&ApiVersion::new(0, 3, 0)));
    assert_eq!(range.to_string(), ">=0.1, <0.3");

    let caret = VersionRange::from_str("^0.1").unwrap();
    assert!(caret.includes_api(&ApiVersion::new(0, 1, 7)));
    assert!(!caret.includes_api(&ApiVersion::new(0, 2, 0)));
}

#[test]
fn test_invalid_range() {
    assert!(VersionRange::from_constraint("not a range").is_err());
}
