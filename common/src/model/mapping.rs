use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::datasource::{Datasource, DatasourceId};

/// One of the two independent halves of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Source,
    Destination,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Destination => f.write_str("destination"),
        }
    }
}

/// Unit of the synchronization frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyUnit {
    Day,
    Week,
    Month,
}

impl FrequencyUnit {
    pub const ALL: [FrequencyUnit; 3] = [FrequencyUnit::Day, FrequencyUnit::Week, FrequencyUnit::Month];

    /// Value used on the wire and in form controls.
    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyUnit::Day => "day",
            FrequencyUnit::Week => "week",
            FrequencyUnit::Month => "month",
        }
    }
}

impl FromStr for FrequencyUnit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "day" => Ok(FrequencyUnit::Day),
            "week" => Ok(FrequencyUnit::Week),
            "month" => Ok(FrequencyUnit::Month),
            _ => Err(()),
        }
    }
}

/// A confirmed source table to destination table pairing with its schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncMapping {
    pub source_datasource: Datasource,
    pub source_table_name: String,
    pub dest_datasource: Datasource,
    pub dest_table_name: String,
    pub start_time: NaiveDateTime,
    pub frequency: NonZeroU32,
    #[serde(rename = "freqUnit")]
    pub frequency_unit: FrequencyUnit,
}

/// One side of a working-list row. Either part may still be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub datasource: Option<DatasourceId>,
    pub table: Option<String>,
}

impl Endpoint {
    pub fn is_complete(&self) -> bool {
        self.datasource.is_some() && self.table.is_some()
    }
}

/// A row of the working list: a candidate pairing without schedule fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MappingEntry {
    pub source: Endpoint,
    pub dest: Endpoint,
}

impl MappingEntry {
    pub fn is_complete(&self) -> bool {
        self.source.is_complete() && self.dest.is_complete()
    }
}

impl From<&SyncMapping> for MappingEntry {
    fn from(mapping: &SyncMapping) -> Self {
        MappingEntry {
            source: Endpoint {
                datasource: Some(mapping.source_datasource.id.clone()),
                table: Some(mapping.source_table_name.clone()),
            },
            dest: Endpoint {
                datasource: Some(mapping.dest_datasource.id.clone()),
                table: Some(mapping.dest_table_name.clone()),
            },
        }
    }
}
