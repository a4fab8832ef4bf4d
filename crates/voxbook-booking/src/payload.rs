// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound booking payloads and their normalization.
//!
//! Two shapes are accepted. The legacy shape carries `start_time`,
//! `duration_minutes` and `payment_amount` at the top level. The
//! preferences shape nests human units under `preferences` (`date`,
//! `startTime`, `durationHours`, `attendees`) with `customer` and `payment`
//! blocks alongside. Both normalize to a [`BookingRequest`].

use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use voxbook_config::model::BookingConfig;
use voxbook_core::VoxbookError;

/// Customer contact block. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "phoneNumber", alias = "phone")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl CustomerInput {
    /// Drop blank strings so they never overwrite stored values.
    pub fn cleaned(self) -> Self {
        let keep = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            name: keep(self.name),
            email: keep(self.email).map(|e| e.to_lowercase()),
            phone_number: keep(self.phone_number),
            attributes: self.attributes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone_number.is_none()
            && self.attributes.is_empty()
    }

    /// The non-empty fields as a JSON object.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for (key, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("phone_number", &self.phone_number),
        ] {
            if let Some(v) = value {
                map.insert(key.to_string(), Value::String(v.clone()));
            }
        }
        if !self.attributes.is_empty() {
            map.insert(
                "attributes".to_string(),
                Value::Object(self.attributes.clone()),
            );
        }
        map
    }
}

/// Legacy flat payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyPayload {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub venue_id: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<Value>,
    #[serde(default)]
    pub attendee_count: Option<Value>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub details: Map<String, Value>,
    #[serde(default)]
    pub customer: Option<CustomerInput>,
    #[serde(default)]
    pub payment_amount: Option<Value>,
    #[serde(default)]
    pub payment_currency: Option<String>,
}

/// Human-unit booking preferences.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, alias = "start_time")]
    pub start_time: Option<String>,
    #[serde(default, alias = "duration_hours")]
    pub duration_hours: Option<Value>,
    #[serde(default, alias = "duration_minutes")]
    pub duration_minutes: Option<Value>,
    #[serde(default)]
    pub attendees: Option<Value>,
    #[serde(default, alias = "room_id")]
    pub room_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentInput {
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Nested preferences payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PreferencesPayload {
    #[serde(default, alias = "sessionId")]
    pub session_id: Option<String>,
    #[serde(default, alias = "venueId")]
    pub venue_id: Option<String>,
    #[serde(default, alias = "roomId")]
    pub room_id: Option<String>,
    #[serde(default)]
    pub customer: Option<CustomerInput>,
    pub preferences: Preferences,
    #[serde(default)]
    pub payment: Option<PaymentInput>,
    #[serde(default)]
    pub details: Map<String, Value>,
}

/// A confirm-booking payload in either accepted shape.
///
/// The presence of a `preferences` key selects the nested shape. A body
/// carrying that key is never retried as the legacy shape, so a malformed
/// nested payload reports its own field error.
#[derive(Debug, Clone)]
pub enum BookingPayload {
    Preferences(PreferencesPayload),
    Legacy(LegacyPayload),
}

impl<'de> Deserialize<'de> for BookingPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let nested = value
            .as_object()
            .is_some_and(|body| body.contains_key("preferences"));
        if nested {
            serde_json::from_value(value)
                .map(Self::Preferences)
                .map_err(serde::de::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(Self::Legacy)
                .map_err(serde::de::Error::custom)
        }
    }
}

/// Payment to record alongside a booking.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub amount: BigDecimal,
    pub currency: String,
}

/// Canonical booking request produced by normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub session_id: String,
    pub venue_id: String,
    pub room_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
    /// Caller-supplied `details.end_time`, validated.
    pub end_time: Option<DateTime<Utc>>,
    pub attendee_count: Option<i64>,
    pub notes: Option<String>,
    pub details: Map<String, Value>,
    pub customer: CustomerInput,
    pub payment: Option<PaymentRequest>,
}

impl BookingPayload {
    /// Normalize into a [`BookingRequest`].
    ///
    /// `session_override` (a session id taken from the URL) wins over the
    /// body's session id.
    pub fn normalize(
        self,
        session_override: Option<&str>,
        defaults: &BookingConfig,
    ) -> Result<BookingRequest, VoxbookError> {
        match self {
            Self::Legacy(p) => normalize_legacy(p, session_override, defaults),
            Self::Preferences(p) => normalize_preferences(p, session_override, defaults),
        }
    }
}

fn normalize_legacy(
    p: LegacyPayload,
    session_override: Option<&str>,
    defaults: &BookingConfig,
) -> Result<BookingRequest, VoxbookError> {
    let session_id = require_session(session_override, p.session_id)?;
    let start_time = match p.start_time.as_deref() {
        Some(raw) => parse_timestamp(raw, "start_time")?,
        None => return Err(VoxbookError::validation("start_time", "is required")),
    };
    let duration_minutes = match &p.duration_minutes {
        Some(v) if !v.is_null() => parse_minutes(v, "duration_minutes")?,
        _ => defaults.default_duration_minutes,
    };
    let payment = match &p.payment_amount {
        Some(v) if !v.is_null() => Some(PaymentRequest {
            amount: parse_amount(v, "payment_amount")?,
            currency: currency_or_default(p.payment_currency, "payment_currency", defaults)?,
        }),
        _ => None,
    };

    Ok(BookingRequest {
        session_id,
        venue_id: venue_or_default(p.venue_id, defaults),
        room_id: non_blank(p.room_id),
        start_time,
        duration_minutes,
        end_time: explicit_end(&p.details)?,
        attendee_count: parse_optional_count(p.attendee_count.as_ref(), "attendee_count")?,
        notes: non_blank(p.notes),
        details: p.details,
        customer: p.customer.unwrap_or_default().cleaned(),
        payment,
    })
}

fn normalize_preferences(
    p: PreferencesPayload,
    session_override: Option<&str>,
    defaults: &BookingConfig,
) -> Result<BookingRequest, VoxbookError> {
    let session_id = require_session(session_override, p.session_id)?;
    let prefs = p.preferences;

    let start_time = match (prefs.date.as_deref(), prefs.start_time.as_deref()) {
        (Some(date), Some(time)) => combine_date_time(date, time)?,
        (None, Some(time)) => parse_timestamp(time, "preferences.startTime")?,
        (Some(_), None) => {
            return Err(VoxbookError::validation(
                "preferences.startTime",
                "is required",
            ));
        }
        (None, None) => return Err(VoxbookError::validation("preferences.date", "is required")),
    };

    let duration_minutes = match (&prefs.duration_hours, &prefs.duration_minutes) {
        (Some(h), _) if !h.is_null() => hours_to_minutes(h, "preferences.durationHours")?,
        (_, Some(m)) if !m.is_null() => parse_minutes(m, "preferences.durationMinutes")?,
        _ => defaults.default_duration_minutes,
    };

    let payment = match p.payment {
        Some(PaymentInput {
            amount: Some(amount),
            currency,
        }) if !amount.is_null() => Some(PaymentRequest {
            amount: parse_amount(&amount, "payment.amount")?,
            currency: currency_or_default(currency, "payment.currency", defaults)?,
        }),
        _ => None,
    };

    Ok(BookingRequest {
        session_id,
        venue_id: venue_or_default(p.venue_id, defaults),
        room_id: non_blank(p.room_id.or(prefs.room_id)),
        start_time,
        duration_minutes,
        end_time: explicit_end(&p.details)?,
        attendee_count: parse_optional_count(prefs.attendees.as_ref(), "preferences.attendees")?,
        notes: non_blank(prefs.notes),
        details: p.details,
        customer: p.customer.unwrap_or_default().cleaned(),
        payment,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn require_session(
    session_override: Option<&str>,
    body: Option<String>,
) -> Result<String, VoxbookError> {
    non_blank(session_override.map(str::to_string))
        .or_else(|| non_blank(body))
        .ok_or_else(|| VoxbookError::validation("session_id", "is required"))
}

fn venue_or_default(venue_id: Option<String>, defaults: &BookingConfig) -> String {
    non_blank(venue_id).unwrap_or_else(|| defaults.default_venue_id.clone())
}

pub(crate) fn currency_or_default(
    currency: Option<String>,
    field: &str,
    defaults: &BookingConfig,
) -> Result<String, VoxbookError> {
    match non_blank(currency) {
        None => Ok(defaults.default_currency.to_uppercase()),
        Some(c) if c.len() == 3 && c.chars().all(|ch| ch.is_ascii_alphabetic()) => {
            Ok(c.to_uppercase())
        }
        Some(c) => Err(VoxbookError::validation(
            field,
            format!("`{c}` is not a three-letter currency code"),
        )),
    }
}

/// Parse a timestamp. `Z`, explicit offsets and offset-less strings are
/// accepted; offset-less ones are taken as UTC. Sub-second precision is
/// dropped.
pub fn parse_timestamp(raw: &str, field: &str) -> Result<DateTime<Utc>, VoxbookError> {
    let raw = raw.trim();
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|naive| naive.and_utc())
                .ok_or(())
        })
        .map_err(|_| VoxbookError::validation(field, format!("`{raw}` is not a timestamp")))?;
    Ok(parsed.with_nanosecond(0).unwrap_or(parsed))
}

fn explicit_end(details: &Map<String, Value>) -> Result<Option<DateTime<Utc>>, VoxbookError> {
    match details.get("end_time") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => parse_timestamp(raw, "details.end_time").map(Some),
        Some(_) => Err(VoxbookError::validation(
            "details.end_time",
            "must be a timestamp string",
        )),
    }
}

fn combine_date_time(date: &str, time: &str) -> Result<DateTime<Utc>, VoxbookError> {
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        VoxbookError::validation("preferences.date", format!("`{date}` is not a YYYY-MM-DD date"))
    })?;
    let time_of_day = ["%H:%M:%S", "%H:%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(time.trim(), fmt).ok())
        .ok_or_else(|| {
            VoxbookError::validation(
                "preferences.startTime",
                format!("`{time}` is not an HH:MM time"),
            )
        })?;
    Ok(day.and_time(time_of_day).and_utc())
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Positive whole number of minutes.
pub fn parse_minutes(value: &Value, field: &str) -> Result<i64, VoxbookError> {
    let minutes = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| VoxbookError::validation(field, "must be a whole number of minutes"))?;
    if minutes <= 0 {
        return Err(VoxbookError::validation(field, "must be positive"));
    }
    Ok(minutes)
}

fn hours_to_minutes(value: &Value, field: &str) -> Result<i64, VoxbookError> {
    let hours =
        as_f64(value).ok_or_else(|| VoxbookError::validation(field, "must be a number of hours"))?;
    let minutes = hours * 60.0;
    if !minutes.is_finite() || minutes <= 0.0 {
        return Err(VoxbookError::validation(field, "must be positive"));
    }
    if (minutes - minutes.round()).abs() > 1e-6 {
        return Err(VoxbookError::validation(
            field,
            "must convert to a whole number of minutes",
        ));
    }
    Ok(minutes.round() as i64)
}

pub(crate) fn parse_optional_count(value: Option<&Value>, field: &str) -> Result<Option<i64>, VoxbookError> {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    let count = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| VoxbookError::validation(field, "must be a whole number"))?;
    if count <= 0 {
        return Err(VoxbookError::validation(field, "must be positive"));
    }
    Ok(Some(count))
}

pub(crate) fn parse_amount(value: &Value, field: &str) -> Result<BigDecimal, VoxbookError> {
    let amount = match value {
        Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
        Value::String(s) => BigDecimal::from_str(s.trim()).ok(),
        _ => None,
    }
    .ok_or_else(|| VoxbookError::validation(field, "must be a decimal amount"))?;
    if amount < BigDecimal::zero() {
        return Err(VoxbookError::validation(field, "must not be negative"));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn defaults() -> BookingConfig {
        BookingConfig::default()
    }

    fn parse(value: Value) -> BookingPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn preferences_shape_converts_human_units() {
        let request = parse(json!({
            "session_id": "s-1",
            "preferences": {"date": "2025-06-01", "startTime": "14:00", "durationHours": 1.5}
        }))
        .normalize(None, &defaults())
        .unwrap();

        assert_eq!(
            request.start_time,
            Utc.with_ymd_and_hms(2025, 6, 1, 14, 0, 0).unwrap()
        );
        assert_eq!(request.duration_minutes, 90);
        assert_eq!(request.venue_id, "venue-downtown");
    }

    #[test]
    fn legacy_shape_selected_without_preferences() {
        let payload = parse(json!({
            "session_id": "s-1",
            "venue_id": "venue-harbor",
            "room_id": "room-a",
            "start_time": "2025-06-01T14:00:00Z",
            "duration_minutes": 45,
            "payment_amount": "20.00"
        }));
        assert!(matches!(payload, BookingPayload::Legacy(_)));

        let request = payload.normalize(None, &defaults()).unwrap();
        assert_eq!(request.venue_id, "venue-harbor");
        assert_eq!(request.duration_minutes, 45);
        let payment = request.payment.unwrap();
        assert_eq!(payment.amount, BigDecimal::from_str("20.00").unwrap());
        assert_eq!(payment.currency, "USD");
    }

    #[test]
    fn timestamps_normalize_to_utc() {
        let expected = Utc.with_ymd_and_hms(2025, 6, 1, 14, 0, 0).unwrap();
        for raw in [
            "2025-06-01T14:00:00Z",
            "2025-06-01T16:00:00+02:00",
            "2025-06-01T14:00:00",
            "2025-06-01T14:00",
            "2025-06-01T14:00:00.250Z",
        ] {
            assert_eq!(parse_timestamp(raw, "start_time").unwrap(), expected, "{raw}");
        }
        assert!(parse_timestamp("tomorrow", "start_time").is_err());
    }

    #[test]
    fn non_positive_or_non_numeric_duration_rejected() {
        for bad in [json!(0), json!(-15), json!("abc"), json!(12.5)] {
            let err = parse(json!({
                "session_id": "s-1",
                "start_time": "2025-06-01T14:00:00Z",
                "duration_minutes": bad
            }))
            .normalize(None, &defaults())
            .unwrap_err();
            assert!(
                matches!(&err, VoxbookError::Validation { field, .. } if field == "duration_minutes"),
                "got {err:?}"
            );
        }
    }

    #[test]
    fn fractional_minute_hours_rejected() {
        let err = parse(json!({
            "session_id": "s-1",
            "preferences": {"date": "2025-06-01", "startTime": "14:00", "durationHours": 0.01}
        }))
        .normalize(None, &defaults())
        .unwrap_err();
        assert!(matches!(err, VoxbookError::Validation { .. }));
    }

    #[test]
    fn missing_duration_uses_default() {
        let request = parse(json!({
            "session_id": "s-1",
            "start_time": "2025-06-01T14:00:00Z"
        }))
        .normalize(None, &defaults())
        .unwrap();
        assert_eq!(request.duration_minutes, 60);
    }

    #[test]
    fn session_required_unless_overridden() {
        let payload = json!({"start_time": "2025-06-01T14:00:00Z"});
        let err = parse(payload.clone())
            .normalize(None, &defaults())
            .unwrap_err();
        assert!(matches!(&err, VoxbookError::Validation { field, .. } if field == "session_id"));

        let request = parse(payload).normalize(Some("from-path"), &defaults()).unwrap();
        assert_eq!(request.session_id, "from-path");
    }

    #[test]
    fn customer_blanks_dropped_and_email_lowercased() {
        let request = parse(json!({
            "session_id": "s-1",
            "start_time": "2025-06-01T14:00:00Z",
            "customer": {"name": "  ", "email": "Ada@Example.com", "phoneNumber": "+1555"}
        }))
        .normalize(None, &defaults())
        .unwrap();
        assert_eq!(request.customer.name, None);
        assert_eq!(request.customer.email.as_deref(), Some("ada@example.com"));
        assert_eq!(request.customer.phone_number.as_deref(), Some("+1555"));
    }

    #[test]
    fn preferences_payment_block() {
        let request = parse(json!({
            "session_id": "s-1",
            "preferences": {"date": "2025-06-01", "startTime": "09:30", "attendees": "6"},
            "payment": {"amount": 75, "currency": "eur"}
        }))
        .normalize(None, &defaults())
        .unwrap();
        assert_eq!(request.attendee_count, Some(6));
        let payment = request.payment.unwrap();
        assert_eq!(payment.currency, "EUR");
        assert_eq!(payment.amount, BigDecimal::from(75));
    }

    #[test]
    fn negative_payment_rejected() {
        let err = parse(json!({
            "session_id": "s-1",
            "start_time": "2025-06-01T14:00:00Z",
            "payment_amount": -1
        }))
        .normalize(None, &defaults())
        .unwrap_err();
        assert!(matches!(&err, VoxbookError::Validation { field, .. } if field == "payment_amount"));
    }

    #[test]
    fn explicit_end_time_is_carried() {
        let request = parse(json!({
            "session_id": "s-1",
            "start_time": "2025-06-01T10:00:00Z",
            "details": {"end_time": "2025-06-01T12:00:00Z"}
        }))
        .normalize(None, &defaults())
        .unwrap();
        assert_eq!(
            request.end_time,
            Some(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn malformed_end_time_rejected_in_both_shapes() {
        for body in [
            json!({
                "session_id": "s-1",
                "start_time": "2025-06-01T10:00:00Z",
                "details": {"end_time": "not-a-time"}
            }),
            json!({
                "session_id": "s-1",
                "preferences": {"date": "2025-06-01", "startTime": "10:00"},
                "details": {"end_time": 1700000000}
            }),
        ] {
            let err = parse(body).normalize(None, &defaults()).unwrap_err();
            assert!(
                matches!(&err, VoxbookError::Validation { field, .. } if field == "details.end_time"),
                "unexpected error: {err}"
            );
        }
    }

    #[test]
    fn preferences_key_never_falls_back_to_legacy_shape() {
        let err = serde_json::from_value::<BookingPayload>(json!({
            "session_id": "s-1",
            "preferences": {"date": "2025-06-01", "startTime": "10:00"},
            "customer": {"name": 5}
        }))
        .unwrap_err()
        .to_string();
        assert!(err.contains("invalid type"), "unexpected error: {err}");
        assert!(!err.contains("untagged"), "unexpected error: {err}");
        assert!(!err.contains("start_time"), "unexpected error: {err}");
    }

    #[test]
    fn preferences_currency_error_names_nested_field() {
        let err = parse(json!({
            "session_id": "s-1",
            "preferences": {"date": "2025-06-01", "startTime": "10:00"},
            "payment": {"amount": "10", "currency": "dollars"}
        }))
        .normalize(None, &defaults())
        .unwrap_err();
        assert!(matches!(&err, VoxbookError::Validation { field, .. } if field == "payment.currency"));
    }
}
