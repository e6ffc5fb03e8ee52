// src/data/record.rs

use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::fmt;

/// Column names every ESG file must carry, in the order rows are serialized.
pub const FALLBACK_COLUMNS: [&str; 5] = [
    "Year",
    "Division",
    "CarbonEmissions_Tons",
    "WaterUsage_KL",
    "EmployeeDiversity_Percentage",
];

/// One row of ESG metrics for a given year and division.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Year", deserialize_with = "year_from_cell")]
    pub year: i64,
    #[serde(rename = "Division")]
    pub division: String,
    #[serde(rename = "CarbonEmissions_Tons")]
    pub carbon_emissions_tons: Measure,
    #[serde(rename = "WaterUsage_KL")]
    pub water_usage_kl: Measure,
    #[serde(rename = "EmployeeDiversity_Percentage")]
    pub employee_diversity_percentage: Measure,
}

/// Years go through the same cell rules as metrics but must be whole.
fn year_from_cell<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Measure::deserialize(deserializer)? {
        Measure::Int(v) => Ok(v),
        Measure::Float(v) => Err(de::Error::custom(format!(
            "year must be an integer, got {}",
            v
        ))),
    }
}

impl Record {
    /// Case-insensitive exact comparison against an already lowercased name.
    pub fn division_matches(&self, lowered: &str) -> bool {
        self.division.to_lowercase() == lowered
    }
}

/// A numeric metric cell.
///
/// Integer literals stay integers so `500` in the file is served as `500`,
/// not `500.0`. Anything else must be a finite float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    Int(i64),
    Float(f64),
}

impl Measure {
    /// Parse a raw cell. Empty, non-numeric and non-finite cells are rejected.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let s = raw.trim();
        if s.is_empty() {
            return Err("empty metric cell".to_string());
        }
        if let Ok(v) = s.parse::<i64>() {
            return Ok(Measure::Int(v));
        }
        match s.parse::<f64>() {
            Ok(v) => Measure::from_float(v),
            Err(_) => Err(format!("invalid metric value {:?}", s)),
        }
    }

    fn from_float(v: f64) -> Result<Self, String> {
        if v.is_finite() {
            Ok(Measure::Float(v))
        } else {
            Err(format!("non-finite metric value {}", v))
        }
    }
}

impl Serialize for Measure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Measure::Int(v) => serializer.serialize_i64(v),
            Measure::Float(v) => serializer.serialize_f64(v),
        }
    }
}

struct MeasureVisitor;

impl<'de> Visitor<'de> for MeasureVisitor {
    type Value = Measure;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a finite number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Measure, E> {
        Ok(Measure::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Measure, E> {
        match i64::try_from(v) {
            Ok(v) => Ok(Measure::Int(v)),
            Err(_) => Ok(Measure::Float(v as f64)),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Measure, E> {
        Measure::from_float(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Measure, E> {
        Measure::parse(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Measure {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MeasureVisitor)
    }
}
