//! The mapping session: working list plus per-side selection state.
//!
//! A session is an explicit value owned by whoever drives it. All edits go
//! through its methods; nothing is global. The only asynchronous step, the
//! table lookup, is split in two: `select_datasource` hands out a
//! [`FetchRequest`] and `apply_fetch` takes the outcome back. Every request is
//! tagged with a per-side generation, and an outcome is applied only if its
//! generation is still the current one, so the latest selection always wins.

use log::{debug, info, warn};
use thiserror::Error;

use crate::config::EditorOptions;
use crate::fetch::{FetchOutcome, FetchRequest, LookupError};
use crate::model::datasource::{Datasource, DatasourceCatalog, DatasourceId};
use crate::model::mapping::{Endpoint, MappingEntry, Side, SyncMapping};
use crate::schedule::{ScheduleInput, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("the session is already closed")]
    Closed,
    #[error("datasource `{0}` is not in the catalog")]
    UnknownDatasource(DatasourceId),
    #[error("table `{table}` is not listed for the {side} datasource")]
    TableNotListed { side: Side, table: String },
    #[error("this pair is already in the list at position {existing}")]
    DuplicateMapping { existing: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfirmError {
    #[error("the session is already closed")]
    Closed,
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
    #[error("mapping #{} is missing a datasource or table", .index + 1)]
    IncompleteMapping { index: usize },
    #[error("mapping #{} refers to unknown datasource `{id}`", .index + 1)]
    UnknownDatasource { index: usize, id: DatasourceId },
}

/// Status of the candidate table list of one side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TableListState {
    /// No datasource chosen yet.
    #[default]
    Idle,
    /// A lookup is in flight. The previous list is still shown.
    Loading,
    Ready,
    /// The latest lookup failed; it can be retried.
    Failed(LookupError),
}

/// What `apply_fetch` did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchApplied {
    Applied,
    Failed,
    /// Superseded by a newer selection, or the session is closed.
    Stale,
}

/// Selection state of one side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideState {
    datasource: Option<DatasourceId>,
    table: Option<String>,
    tables: Vec<String>,
    /// Datasource the current `tables` were fetched for.
    tables_for: Option<DatasourceId>,
    status: TableListState,
    generation: u64,
}

impl SideState {
    pub fn datasource(&self) -> Option<&DatasourceId> {
        self.datasource.as_ref()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Most recently fetched candidate tables.
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn status(&self) -> &TableListState {
        &self.status
    }

    /// Whether `table` appears in an up-to-date list for the selected datasource.
    fn lists(&self, table: &str) -> bool {
        self.status == TableListState::Ready
            && self.datasource.is_some()
            && self.tables_for == self.datasource
            && self.tables.iter().any(|t| t == table)
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint {
            datasource: self.datasource.clone(),
            table: self.table.clone(),
        }
    }

    /// Clears the selection. The generation keeps counting so results of
    /// lookups issued before the reset are recognised as stale.
    fn reset(&mut self) {
        *self = SideState {
            generation: self.generation + 1,
            ..SideState::default()
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Open,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct MappingSession {
    catalog: DatasourceCatalog,
    options: EditorOptions,
    seed: Vec<SyncMapping>,
    entries: Vec<MappingEntry>,
    source: SideState,
    dest: SideState,
    status: SessionStatus,
}

impl MappingSession {
    /// Starts a session whose working list is seeded from `seed`.
    pub fn new(catalog: DatasourceCatalog, seed: Vec<SyncMapping>, options: EditorOptions) -> Self {
        let entries = seed.iter().map(MappingEntry::from).collect();
        Self {
            catalog,
            options,
            seed,
            entries,
            source: SideState::default(),
            dest: SideState::default(),
            status: SessionStatus::Open,
        }
    }

    pub fn catalog(&self) -> &DatasourceCatalog {
        &self.catalog
    }

    /// The working list, in insertion order.
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// The list the session was started with.
    pub fn seed(&self) -> &[SyncMapping] {
        &self.seed
    }

    pub fn side(&self, side: Side) -> &SideState {
        match side {
            Side::Source => &self.source,
            Side::Destination => &self.dest,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_closed(&self) -> bool {
        self.status != SessionStatus::Open
    }

    fn side_mut(&mut self, side: Side) -> &mut SideState {
        match side {
            Side::Source => &mut self.source,
            Side::Destination => &mut self.dest,
        }
    }

    /// Looks a datasource up in the catalog, falling back to the records
    /// carried by the seed mappings.
    pub fn resolve(&self, id: &DatasourceId) -> Option<&Datasource> {
        self.catalog.lookup(id).or_else(|| {
            self.seed.iter().find_map(|m| {
                if &m.source_datasource.id == id {
                    Some(&m.source_datasource)
                } else if &m.dest_datasource.id == id {
                    Some(&m.dest_datasource)
                } else {
                    None
                }
            })
        })
    }

    /// Records the datasource chosen for `side` and returns the lookup to run.
    ///
    /// Choosing a different datasource clears that side's table choice. The
    /// previous candidate list stays visible until the new one arrives.
    pub fn select_datasource(
        &mut self,
        side: Side,
        id: &DatasourceId,
    ) -> Result<FetchRequest, SessionError> {
        if self.is_closed() {
            return Err(SessionError::Closed);
        }
        let datasource = self
            .catalog
            .lookup(id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownDatasource(id.clone()))?;

        let state = self.side_mut(side);
        if state.datasource.as_ref() != Some(id) {
            state.table = None;
        }
        state.datasource = Some(id.clone());
        state.generation += 1;
        state.status = TableListState::Loading;
        debug!("{} datasource set to `{}` (generation {})", side, id, state.generation);

        Ok(FetchRequest {
            side,
            generation: state.generation,
            datasource,
        })
    }

    /// Re-issues the lookup for the datasource currently selected on `side`.
    pub fn retry_fetch(&mut self, side: Side) -> Option<FetchRequest> {
        if self.is_closed() {
            return None;
        }
        let id = self.side(side).datasource.clone()?;
        self.select_datasource(side, &id).ok()
    }

    /// Feeds back the result of a lookup issued by this session.
    pub fn apply_fetch(&mut self, outcome: FetchOutcome) -> FetchApplied {
        if self.is_closed() {
            return FetchApplied::Stale;
        }
        let FetchOutcome {
            side,
            generation,
            result,
        } = outcome;
        let require_listed = self.options.require_listed_table;
        let state = self.side_mut(side);
        if generation != state.generation {
            debug!(
                "dropping {} table list from generation {} (current {})",
                side, generation, state.generation
            );
            return FetchApplied::Stale;
        }

        match result {
            Ok(tables) => {
                debug!("{} table list loaded: {} tables", side, tables.len());
                state.tables = tables;
                state.tables_for = state.datasource.clone();
                state.status = TableListState::Ready;
                if require_listed {
                    if let Some(table) = state.table.as_deref() {
                        if !state.tables.iter().any(|t| t == table) {
                            debug!("{} table `{}` no longer listed, cleared", side, table);
                            state.table = None;
                        }
                    }
                }
                FetchApplied::Applied
            }
            Err(err) => {
                warn!("{}", err);
                state.status = TableListState::Failed(err);
                FetchApplied::Failed
            }
        }
    }

    /// Records the table chosen for `side`.
    pub fn select_table(&mut self, side: Side, table: &str) -> Result<(), SessionError> {
        if self.is_closed() {
            return Err(SessionError::Closed);
        }
        let require_listed = self.options.require_listed_table;
        let state = self.side_mut(side);
        if require_listed && !state.lists(table) {
            warn!("rejected unlisted {} table `{}`", side, table);
            return Err(SessionError::TableNotListed {
                side,
                table: table.to_string(),
            });
        }
        state.table = Some(table.to_string());
        Ok(())
    }

    /// Appends the current selection to the working list and returns its index.
    ///
    /// The selection is left untouched, so calling this twice adds the same
    /// pair twice unless `dedupe_pairs` is enabled.
    pub fn add_mapping(&mut self) -> Result<usize, SessionError> {
        if self.is_closed() {
            return Err(SessionError::Closed);
        }
        let entry = MappingEntry {
            source: self.source.endpoint(),
            dest: self.dest.endpoint(),
        };
        if self.options.dedupe_pairs {
            if let Some(existing) = self.entries.iter().position(|e| e == &entry) {
                return Err(SessionError::DuplicateMapping { existing });
            }
        }
        self.entries.push(entry);
        debug!("mapping added, working list has {} entries", self.entries.len());
        Ok(self.entries.len() - 1)
    }

    /// Removes the entry at `index`. Out of range indexes are ignored.
    pub fn delete_mapping(&mut self, index: usize) -> Option<MappingEntry> {
        if self.is_closed() || index >= self.entries.len() {
            debug!("ignoring delete of mapping {}", index);
            return None;
        }
        Some(self.entries.remove(index))
    }

    /// Validates the shared fields and produces the finalized mappings.
    ///
    /// Nothing changes on failure; the caller can fix the input and retry.
    pub fn confirm(&mut self, input: &ScheduleInput) -> Result<Vec<SyncMapping>, ConfirmError> {
        if self.is_closed() {
            return Err(ConfirmError::Closed);
        }
        let schedule = input.validate()?;

        let mut mappings = Vec::with_capacity(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            let (Some(src_id), Some(src_table), Some(dst_id), Some(dst_table)) = (
                entry.source.datasource.as_ref(),
                entry.source.table.as_ref(),
                entry.dest.datasource.as_ref(),
                entry.dest.table.as_ref(),
            ) else {
                return Err(ConfirmError::IncompleteMapping { index });
            };
            let resolve = |id: &DatasourceId| {
                self.resolve(id)
                    .cloned()
                    .ok_or_else(|| ConfirmError::UnknownDatasource {
                        index,
                        id: id.clone(),
                    })
            };
            mappings.push(SyncMapping {
                source_datasource: resolve(src_id)?,
                source_table_name: src_table.clone(),
                dest_datasource: resolve(dst_id)?,
                dest_table_name: dst_table.clone(),
                start_time: schedule.start_time,
                frequency: schedule.frequency,
                frequency_unit: schedule.frequency_unit,
            });
        }

        self.status = SessionStatus::Confirmed;
        info!("session confirmed with {} mappings", mappings.len());
        Ok(mappings)
    }

    /// Discards every edit and returns the original seed list.
    pub fn cancel(&mut self) -> Result<Vec<SyncMapping>, SessionError> {
        if self.is_closed() {
            return Err(SessionError::Closed);
        }
        self.entries = self.seed.iter().map(MappingEntry::from).collect();
        self.source.reset();
        self.dest.reset();
        self.status = SessionStatus::Cancelled;
        info!("session cancelled");
        Ok(self.seed.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::datasource::{CharacterEncoding, DatasourceKind};

    fn datasource(id: &str) -> Datasource {
        Datasource {
            host: "db.internal".to_string(),
            user: "sync".to_string(),
            port: 3306,
            password: String::new(),
            charset: CharacterEncoding::Utf8,
            manager: "alice".to_string(),
            kind: DatasourceKind::Mysql,
            display_name: format!("{} db", id),
            id: DatasourceId::new(id),
        }
    }

    fn session(options: EditorOptions) -> MappingSession {
        let catalog =
            DatasourceCatalog::new(vec![datasource("a"), datasource("b"), datasource("c")]).unwrap();
        MappingSession::new(catalog, Vec::new(), options)
    }

    fn loaded(session: &mut MappingSession, side: Side, id: &str, tables: &[&str]) {
        let request = session.select_datasource(side, &DatasourceId::new(id)).unwrap();
        let outcome = FetchOutcome {
            side,
            generation: request.generation,
            result: Ok(tables.iter().map(|t| t.to_string()).collect()),
        };
        assert_eq!(session.apply_fetch(outcome), FetchApplied::Applied);
    }

    #[test]
    fn selecting_unknown_datasource_is_rejected() {
        let mut s = session(EditorOptions::default());
        let err = s
            .select_datasource(Side::Source, &DatasourceId::new("zzz"))
            .unwrap_err();
        assert_eq!(err, SessionError::UnknownDatasource(DatasourceId::new("zzz")));
        assert_eq!(s.side(Side::Source).status(), &TableListState::Idle);
    }

    #[test]
    fn loading_keeps_previous_list_visible() {
        let mut s = session(EditorOptions::default());
        loaded(&mut s, Side::Source, "a", &["orders", "users"]);

        s.select_datasource(Side::Source, &DatasourceId::new("b")).unwrap();
        let side = s.side(Side::Source);
        assert_eq!(side.status(), &TableListState::Loading);
        assert_eq!(side.tables(), ["orders", "users"]);
    }

    #[test]
    fn changing_datasource_clears_table_choice() {
        let mut s = session(EditorOptions::default());
        loaded(&mut s, Side::Destination, "a", &["orders"]);
        s.select_table(Side::Destination, "orders").unwrap();

        s.select_datasource(Side::Destination, &DatasourceId::new("a")).unwrap();
        assert_eq!(s.side(Side::Destination).table(), Some("orders"));

        s.select_datasource(Side::Destination, &DatasourceId::new("b")).unwrap();
        assert_eq!(s.side(Side::Destination).table(), None);
    }

    #[test]
    fn failed_lookup_is_retryable() {
        let mut s = session(EditorOptions::default());
        loaded(&mut s, Side::Source, "a", &["orders"]);

        let request = s.select_datasource(Side::Source, &DatasourceId::new("b")).unwrap();
        let err = LookupError::new(&request.datasource, "timeout");
        let applied = s.apply_fetch(FetchOutcome {
            side: Side::Source,
            generation: request.generation,
            result: Err(err.clone()),
        });
        assert_eq!(applied, FetchApplied::Failed);
        assert_eq!(s.side(Side::Source).status(), &TableListState::Failed(err));
        assert_eq!(s.side(Side::Source).tables(), ["orders"]);

        let retry = s.retry_fetch(Side::Source).unwrap();
        assert_eq!(retry.datasource.id, DatasourceId::new("b"));
        assert!(retry.generation > request.generation);
        assert_eq!(s.side(Side::Source).status(), &TableListState::Loading);
    }

    #[test]
    fn retry_without_selection_does_nothing() {
        let mut s = session(EditorOptions::default());
        assert!(s.retry_fetch(Side::Destination).is_none());
    }

    #[test]
    fn sides_are_independent() {
        let mut s = session(EditorOptions::default());
        let src = s.select_datasource(Side::Source, &DatasourceId::new("a")).unwrap();
        let dst = s.select_datasource(Side::Destination, &DatasourceId::new("b")).unwrap();
        assert_eq!(src.generation, 1);
        assert_eq!(dst.generation, 1);

        let applied = s.apply_fetch(FetchOutcome {
            side: Side::Destination,
            generation: dst.generation,
            result: Ok(vec!["dw_orders".to_string()]),
        });
        assert_eq!(applied, FetchApplied::Applied);
        assert!(s.side(Side::Source).tables().is_empty());
        assert_eq!(s.side(Side::Source).status(), &TableListState::Loading);
    }

    #[test]
    fn unlisted_table_accepted_by_default() {
        let mut s = session(EditorOptions::default());
        s.select_table(Side::Source, "ghost").unwrap();
        assert_eq!(s.side(Side::Source).table(), Some("ghost"));
    }

    #[test]
    fn unlisted_table_rejected_when_required() {
        let mut s = session(EditorOptions {
            require_listed_table: true,
            ..EditorOptions::default()
        });
        loaded(&mut s, Side::Source, "a", &["orders"]);
        assert_eq!(
            s.select_table(Side::Source, "ghost"),
            Err(SessionError::TableNotListed {
                side: Side::Source,
                table: "ghost".to_string()
            })
        );
        s.select_table(Side::Source, "orders").unwrap();
    }

    #[test]
    fn required_table_needs_a_list_for_the_current_datasource() {
        let mut s = session(EditorOptions {
            require_listed_table: true,
            ..EditorOptions::default()
        });
        loaded(&mut s, Side::Source, "a", &["orders"]);

        s.select_datasource(Side::Source, &DatasourceId::new("b")).unwrap();
        assert_eq!(s.side(Side::Source).tables(), ["orders"]);
        assert!(matches!(
            s.select_table(Side::Source, "orders"),
            Err(SessionError::TableNotListed { .. })
        ));
        assert_eq!(s.side(Side::Source).table(), None);
    }

    #[test]
    fn refreshed_list_drops_vanished_required_table() {
        let mut s = session(EditorOptions {
            require_listed_table: true,
            ..EditorOptions::default()
        });
        loaded(&mut s, Side::Source, "a", &["orders", "users"]);
        s.select_table(Side::Source, "users").unwrap();

        loaded(&mut s, Side::Source, "a", &["orders", "users"]);
        assert_eq!(s.side(Side::Source).table(), Some("users"));

        loaded(&mut s, Side::Source, "a", &["orders"]);
        assert_eq!(s.side(Side::Source).table(), None);
    }

    #[test]
    fn dedupe_policy_refuses_identical_pairs() {
        let mut s = session(EditorOptions {
            dedupe_pairs: true,
            ..EditorOptions::default()
        });
        loaded(&mut s, Side::Source, "a", &["orders"]);
        loaded(&mut s, Side::Destination, "b", &["orders"]);
        s.select_table(Side::Source, "orders").unwrap();
        s.select_table(Side::Destination, "orders").unwrap();

        assert_eq!(s.add_mapping(), Ok(0));
        assert_eq!(
            s.add_mapping(),
            Err(SessionError::DuplicateMapping { existing: 0 })
        );
        assert_eq!(s.entries().len(), 1);
    }

    #[test]
    fn partial_rows_block_confirmation() {
        let mut s = session(EditorOptions::default());
        loaded(&mut s, Side::Source, "a", &["orders"]);
        s.select_table(Side::Source, "orders").unwrap();
        s.add_mapping().unwrap();

        let input = ScheduleInput {
            start_time: Some("2024-05-01".to_string()),
            frequency: Some("1".to_string()),
            frequency_unit: Some("day".to_string()),
        };
        assert_eq!(
            s.confirm(&input),
            Err(ConfirmError::IncompleteMapping { index: 0 })
        );
        assert!(!s.is_closed());
    }

    #[test]
    fn closed_session_rejects_edits() {
        let mut s = session(EditorOptions::default());
        s.cancel().unwrap();
        assert_eq!(s.status(), SessionStatus::Cancelled);
        assert_eq!(s.cancel(), Err(SessionError::Closed));
        assert_eq!(s.add_mapping(), Err(SessionError::Closed));
        assert_eq!(
            s.select_datasource(Side::Source, &DatasourceId::new("a")),
            Err(SessionError::Closed)
        );
        assert_eq!(s.confirm(&ScheduleInput::default()), Err(ConfirmError::Closed));
    }
}
