/// Decoding of the feed endpoint's response envelope.

use crate::domain::flight::Flight;

/// Decode a response body. The endpoint wraps rows in `{ "data": [...] }`;
/// a missing or non-array `data` counts as an empty board rather than an
/// error. A body that is not JSON, or rows that are not objects, are
/// decode errors and the caller falls back to mock rows.
pub fn parse_feed(body: &str) -> Result<Vec<Flight>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    match value.get("data") {
        Some(rows) if rows.is_array() => serde_json::from_value(rows.clone()),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_envelope_parses() {
        let body = r#"{
            "data": [
                { "flight": "UA118", "origin": "CHICAGO", "time": "14:40",
                  "gate": "B12", "status": "ON TIME" },
                { "flight": "DL202", "origin": "ATLANTA", "time": "14:55",
                  "gate": "C3", "status": "DELAYED" }
            ]
        }"#;
        let rows = parse_feed(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].flight, "UA118");
        assert_eq!(rows[1].status, "DELAYED");
    }

    #[test]
    fn partial_records_fill_with_empty_fields() {
        let rows = parse_feed(r#"{ "data": [ { "flight": "BA292" } ] }"#).unwrap();
        assert_eq!(rows[0].flight, "BA292");
        assert_eq!(rows[0].gate, "");
        assert_eq!(rows[0].status, "");
    }

    #[test]
    fn missing_or_non_array_data_is_an_empty_board() {
        assert!(parse_feed("{}").unwrap().is_empty());
        assert!(parse_feed(r#"{ "data": null }"#).unwrap().is_empty());
        assert!(parse_feed(r#"{ "data": 5 }"#).unwrap().is_empty());
        assert!(parse_feed(r#"{ "error": "rate limited" }"#).unwrap().is_empty());
    }

    #[test]
    fn junk_bodies_are_decode_errors() {
        assert!(parse_feed("").is_err());
        assert!(parse_feed("<html>502</html>").is_err());
        assert!(parse_feed(r#"{ "data": [42] }"#).is_err());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let body = r#"{ "data": [ { "flight": "AC761", "origin": "TORONTO",
            "time": "15:23", "gate": "C9", "status": "ON TIME",
            "aircraft": "B789", "terminal": 2 } ], "cached": true }"#;
        let rows = parse_feed(body).unwrap();
        assert_eq!(rows[0].origin, "TORONTO");
    }
}
