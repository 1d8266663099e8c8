//! Station and departure data handed to the renderer.
//!
//! A snapshot is produced by the data-fetch collaborator once per refresh
//! and borrowed read-only by every frame until the next refresh. The types
//! deserialize from the collaborator's JSON; field names are camelCase, and
//! the short keys of the legacy feed (`line`, `minutes`, `delay`,
//! `product`, `walkingTime`, `type`, `summary`) are accepted as aliases.
//!
//! Fields a record needs to be drawn are `Option`s here. A record with a
//! missing field still deserializes; it is rejected later, per row, when the
//! renderer validates it (see [`Departure`](crate::departure::Departure)).

use embedded_graphics::pixelcolor::Rgb565;
use serde::{Deserialize, Serialize};

use crate::colors::{BUS_PURPLE, FERRY_TURQUOISE, GRAY, RAIL_RED, SUBURBAN_GREEN, SUBWAY_BLUE};
use crate::error::RecordError;

// =============================================================================
// Product Kind
// =============================================================================

/// Transport product of a line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Subway,
    Suburban,
    Tram,
    Bus,
    Ferry,
    Express,
    Regional,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ProductKind {
    /// Caption shown on the product badge.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Subway => "U-Bahn",
            Self::Suburban => "S-Bahn",
            Self::Tram => "Tram",
            Self::Bus => "Bus",
            Self::Ferry => "Fähre",
            Self::Express => "RBX",
            Self::Regional => "RB",
            Self::Unknown => "?",
        }
    }

    /// Badge tile color.
    pub const fn color(self) -> Rgb565 {
        match self {
            Self::Subway => SUBWAY_BLUE,
            Self::Suburban => SUBURBAN_GREEN,
            Self::Tram | Self::Express | Self::Regional => RAIL_RED,
            Self::Bus => BUS_PURPLE,
            Self::Ferry => FERRY_TURQUOISE,
            Self::Unknown => GRAY,
        }
    }
}

// =============================================================================
// Disruptions
// =============================================================================

/// Category of a disruption message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisruptionKind {
    #[default]
    Warning,
    Status,
    Hint,
}

/// A disruption message attached to a station.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisruptionRecord {
    #[serde(default, alias = "type")]
    pub kind: DisruptionKind,
    #[serde(default, alias = "summary")]
    pub summary_text: Option<String>,
}

impl DisruptionRecord {
    /// Create a disruption record.
    pub fn new(
        kind: DisruptionKind,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            summary_text: Some(summary.into()),
        }
    }

    /// Summary text, or an error if the record has none.
    pub fn summary(&self) -> Result<&str, RecordError> {
        self.summary_text.as_deref().ok_or(RecordError::MissingField("summaryText"))
    }
}

// =============================================================================
// Departures
// =============================================================================

/// One upcoming departure as supplied by the data source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureRecord {
    #[serde(default, alias = "line")]
    pub line_name: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default, alias = "minutes")]
    pub minutes_until: Option<i64>,
    #[serde(default, alias = "delay")]
    pub delay_minutes: i64,
    #[serde(default, alias = "product")]
    pub product_kind: ProductKind,
}

impl DepartureRecord {
    /// Create a complete departure record without delay.
    pub fn new(
        line_name: impl Into<String>,
        direction: impl Into<String>,
        minutes_until: i64,
        product_kind: ProductKind,
    ) -> Self {
        Self {
            line_name: Some(line_name.into()),
            direction: Some(direction.into()),
            minutes_until: Some(minutes_until),
            delay_minutes: 0,
            product_kind,
        }
    }

    /// Set the delay in minutes (negative for early departures).
    #[must_use]
    pub fn with_delay(
        mut self,
        delay_minutes: i64,
    ) -> Self {
        self.delay_minutes = delay_minutes;
        self
    }
}

// =============================================================================
// Stations
// =============================================================================

/// All data shown for one station.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationSnapshot {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, alias = "walkingTime")]
    pub walking_time_minutes: u32,
    /// Display order. Not re-sorted by the renderer.
    #[serde(default)]
    pub departures: Vec<DepartureRecord>,
    /// Only the first entry is drawn.
    #[serde(default)]
    pub disruptions: Vec<DisruptionRecord>,
}

impl StationSnapshot {
    /// Create a station without departures.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        walking_time_minutes: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            walking_time_minutes,
            departures: Vec::new(),
            disruptions: Vec::new(),
        }
    }

    /// Append a departure.
    #[must_use]
    pub fn with_departure(
        mut self,
        departure: DepartureRecord,
    ) -> Self {
        self.departures.push(departure);
        self
    }

    /// Append a disruption.
    #[must_use]
    pub fn with_disruption(
        mut self,
        disruption: DisruptionRecord,
    ) -> Self {
        self.disruptions.push(disruption);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "900100003",
            "name": "S+U Alexanderplatz",
            "walkingTimeMinutes": 4,
            "departures": [
                {"lineName": "U2", "direction": "Pankow", "minutesUntil": 6, "delayMinutes": 1, "productKind": "subway"}
            ],
            "disruptions": [{"kind": "status", "summaryText": "Aufzug defekt"}]
        }"#;
        let station: StationSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(station.walking_time_minutes, 4);
        let dep = &station.departures[0];
        assert_eq!(dep.line_name.as_deref(), Some("U2"));
        assert_eq!(dep.minutes_until, Some(6));
        assert_eq!(dep.delay_minutes, 1);
        assert_eq!(dep.product_kind, ProductKind::Subway);
        assert_eq!(station.disruptions[0].kind, DisruptionKind::Status);
        assert_eq!(station.disruptions[0].summary(), Ok("Aufzug defekt"));
    }

    #[test]
    fn test_deserialize_short_keys() {
        let json = r#"{
            "name": "Hermannplatz",
            "walkingTime": 7,
            "departures": [{"line": "M41", "direction": "Hbf", "minutes": 2, "delay": -1, "product": "bus"}],
            "disruptions": [{"type": "warning", "summary": "Umleitung"}]
        }"#;
        let station: StationSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(station.walking_time_minutes, 7);
        assert_eq!(station.departures[0].delay_minutes, -1);
        assert_eq!(station.departures[0].product_kind, ProductKind::Bus);
        assert_eq!(station.disruptions[0].summary(), Ok("Umleitung"));
    }

    #[test]
    fn test_missing_fields_still_deserialize() {
        let json = r#"{"direction": "Ruhleben", "minutes": 3}"#;
        let dep: DepartureRecord = serde_json::from_str(json).unwrap();
        assert_eq!(dep.line_name, None);
        assert_eq!(dep.delay_minutes, 0);
        assert_eq!(dep.product_kind, ProductKind::Unknown);

        let disruption: DisruptionRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(disruption.summary(), Err(RecordError::MissingField("summaryText")));
    }

    #[test]
    fn test_unknown_product_maps_to_unknown() {
        let dep: DepartureRecord = serde_json::from_str(r#"{"product": "cablecar"}"#).unwrap();
        assert_eq!(dep.product_kind, ProductKind::Unknown);
        assert_eq!(dep.product_kind.label(), "?");
        assert_eq!(dep.product_kind.color(), GRAY);
    }

    #[test]
    fn test_product_labels() {
        assert_eq!(ProductKind::Subway.label(), "U-Bahn");
        assert_eq!(ProductKind::Ferry.label(), "Fähre");
        assert_eq!(ProductKind::Express.color(), ProductKind::Tram.color());
    }
}
