//! Datasource descriptors and the read-only catalog the editor selects from.
//!
//! Records arrive from the caller as loosely shaped JSON. They are checked at
//! the boundary (`RawDatasource` -> `Datasource`) so the rest of the crate only
//! ever sees well-formed, immutable descriptors.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable lookup key of a datasource. Distinct from its display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasourceId(String);

impl DatasourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Character encoding of a datasource connection. Only UTF-8 is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CharacterEncoding {
    #[default]
    #[serde(rename = "utf8")]
    Utf8,
}

/// Storage engine family of a datasource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasourceKind {
    /// Relational database.
    Mysql,
    /// Columnar warehouse.
    Hive,
}

/// A connectable data store, as supplied by the caller.
///
/// The editor never mutates these records; it only refers to them by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDatasource")]
pub struct Datasource {
    pub host: String,
    pub user: String,
    pub port: u16,
    pub password: String,
    pub charset: CharacterEncoding,
    /// Identity of the user owning this datasource.
    pub manager: String,
    #[serde(rename = "source")]
    pub kind: DatasourceKind,
    #[serde(rename = "databasename")]
    pub display_name: String,
    #[serde(rename = "sourcename")]
    pub id: DatasourceId,
}

/// Reasons a caller-supplied datasource record is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasourceError {
    #[error("datasource field `{0}` is missing or blank")]
    MissingField(&'static str),
    #[error("datasource `{id}` has an invalid port {port}")]
    InvalidPort { id: String, port: u32 },
    #[error("datasource `{id}` has unknown kind `{kind}`")]
    UnknownKind { id: String, kind: String },
    #[error("datasource `{id}` has unsupported charset `{charset}`")]
    UnsupportedCharset { id: String, charset: String },
}

/// Untyped shape of a datasource as it crosses the boundary.
///
/// Every field is optional so a malformed record produces a precise
/// `DatasourceError` instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDatasource {
    pub host: Option<String>,
    pub user: Option<String>,
    pub port: Option<u32>,
    pub password: Option<String>,
    pub charset: Option<String>,
    pub manager: Option<String>,
    pub source: Option<String>,
    pub databasename: Option<String>,
    pub sourcename: Option<String>,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, DatasourceError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DatasourceError::MissingField(field)),
    }
}

impl TryFrom<RawDatasource> for Datasource {
    type Error = DatasourceError;

    fn try_from(raw: RawDatasource) -> Result<Self, Self::Error> {
        let id = required(raw.sourcename, "sourcename")?;
        let host = required(raw.host, "host")?;
        let user = required(raw.user, "user")?;
        let display_name = required(raw.databasename, "databasename")?;

        let port = match raw.port {
            Some(p) if p > 0 && p <= u32::from(u16::MAX) => p as u16,
            Some(p) => return Err(DatasourceError::InvalidPort { id, port: p }),
            None => return Err(DatasourceError::MissingField("port")),
        };

        let kind = match required(raw.source, "source")?.as_str() {
            "mysql" => DatasourceKind::Mysql,
            "hive" => DatasourceKind::Hive,
            other => {
                return Err(DatasourceError::UnknownKind {
                    id,
                    kind: other.to_string(),
                });
            }
        };

        let charset = match raw.charset.as_deref() {
            None | Some("utf8") => CharacterEncoding::Utf8,
            Some(other) => {
                return Err(DatasourceError::UnsupportedCharset {
                    id,
                    charset: other.to_string(),
                });
            }
        };

        Ok(Datasource {
            host,
            user,
            port,
            // An empty password is allowed.
            password: raw.password.unwrap_or_default(),
            charset,
            manager: raw.manager.unwrap_or_default(),
            kind,
            display_name,
            id: DatasourceId::new(id),
        })
    }
}

/// Reasons a datasource list cannot be used as a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("the datasource list is empty")]
    Empty,
    #[error("datasource id `{0}` appears more than once")]
    DuplicateId(DatasourceId),
}

/// Read-only, order-preserving set of datasources offered on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasourceCatalog {
    datasources: Vec<Datasource>,
}

impl DatasourceCatalog {
    /// Builds a catalog, rejecting empty lists and repeated identifiers.
    pub fn new(datasources: Vec<Datasource>) -> Result<Self, CatalogError> {
        if datasources.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::with_capacity(datasources.len());
        for ds in &datasources {
            if !seen.insert(&ds.id) {
                return Err(CatalogError::DuplicateId(ds.id.clone()));
            }
        }
        Ok(Self { datasources })
    }

    pub fn lookup(&self, id: &DatasourceId) -> Option<&Datasource> {
        self.datasources.iter().find(|ds| &ds.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Datasource> {
        self.datasources.iter()
    }

    pub fn len(&self) -> usize {
        self.datasources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str) -> RawDatasource {
        RawDatasource {
            host: Some("10.0.0.1".to_string()),
            user: Some("etl".to_string()),
            port: Some(3306),
            password: Some(String::new()),
            charset: Some("utf8".to_string()),
            manager: Some("alice".to_string()),
            source: Some("mysql".to_string()),
            databasename: Some(format!("Database {}", id)),
            sourcename: Some(id.to_string()),
        }
    }

    #[test]
    fn accepts_well_formed_record() {
        let ds = Datasource::try_from(raw("orders")).unwrap();
        assert_eq!(ds.id, DatasourceId::new("orders"));
        assert_eq!(ds.port, 3306);
        assert_eq!(ds.kind, DatasourceKind::Mysql);
        assert_eq!(ds.display_name, "Database orders");
    }

    #[test]
    fn rejects_blank_identifier() {
        let mut r = raw("x");
        r.sourcename = Some("  ".to_string());
        assert_eq!(
            Datasource::try_from(r),
            Err(DatasourceError::MissingField("sourcename"))
        );
    }

    #[test]
    fn rejects_zero_and_oversized_ports() {
        let mut r = raw("x");
        r.port = Some(0);
        assert!(matches!(
            Datasource::try_from(r),
            Err(DatasourceError::InvalidPort { port: 0, .. })
        ));

        let mut r = raw("x");
        r.port = Some(70_000);
        assert!(matches!(
            Datasource::try_from(r),
            Err(DatasourceError::InvalidPort { port: 70_000, .. })
        ));
    }

    #[test]
    fn rejects_unknown_kind_and_charset() {
        let mut r = raw("x");
        r.source = Some("oracle".to_string());
        assert!(matches!(
            Datasource::try_from(r),
            Err(DatasourceError::UnknownKind { .. })
        ));

        let mut r = raw("x");
        r.charset = Some("latin1".to_string());
        assert!(matches!(
            Datasource::try_from(r),
            Err(DatasourceError::UnsupportedCharset { .. })
        ));
    }

    #[test]
    fn deserializes_through_boundary_check() {
        let json = r#"{
            "host": "warehouse.local", "user": "bi", "port": 10000,
            "password": "", "charset": "utf8", "manager": "bob",
            "source": "hive", "databasename": "Warehouse", "sourcename": "wh"
        }"#;
        let ds: Datasource = serde_json::from_str(json).unwrap();
        assert_eq!(ds.kind, DatasourceKind::Hive);
        assert_eq!(ds.id.as_str(), "wh");

        let broken = r#"{ "host": "h", "sourcename": "wh" }"#;
        assert!(serde_json::from_str::<Datasource>(broken).is_err());
    }

    #[test]
    fn catalog_rejects_empty_and_duplicates() {
        assert_eq!(DatasourceCatalog::new(vec![]), Err(CatalogError::Empty));

        let a = Datasource::try_from(raw("a")).unwrap();
        let dup = DatasourceCatalog::new(vec![a.clone(), a]);
        assert_eq!(dup, Err(CatalogError::DuplicateId(DatasourceId::new("a"))));
    }

    #[test]
    fn catalog_lookup_by_identifier_not_display_name() {
        let catalog = DatasourceCatalog::new(vec![
            Datasource::try_from(raw("a")).unwrap(),
            Datasource::try_from(raw("b")).unwrap(),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.lookup(&DatasourceId::new("b")).is_some());
        assert!(catalog.lookup(&DatasourceId::new("Database b")).is_none());
        let ids: Vec<_> = catalog.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
