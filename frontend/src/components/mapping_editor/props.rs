//! Defines the properties for the `MappingEditorComponent`.
//!
//! Everything here is supplied by the parent and treated as fixed for the
//! lifetime of the editor: a new session is only started when the component
//! is mounted again.

use common::config::EditorOptions;
use common::fetch::FetcherHandle;
use common::model::datasource::DatasourceCatalog;
use common::model::mapping::SyncMapping;
use yew::prelude::*;

/// Properties for the `MappingEditorComponent`.
#[derive(Properties, PartialEq, Clone)]
pub struct MappingEditorProps {
    /// Datasources offered on both the source and the destination side.
    pub datasource_list: DatasourceCatalog,

    /// Lists the tables of a datasource. Called every time a datasource is
    /// selected or a failed lookup is retried.
    pub table_list_fetcher: FetcherHandle,

    /// Mappings the working list starts with. Also pre-fills the schedule
    /// fields from its first entry.
    #[prop_or_default]
    pub init_mappings: Vec<SyncMapping>,

    /// Receives the finalized mappings once the form is submitted.
    pub on_confirm: Callback<Vec<SyncMapping>>,

    /// Receives `init_mappings`, unchanged, when the user discards the session.
    pub on_cancel: Callback<Vec<SyncMapping>>,

    #[prop_or_default]
    pub options: EditorOptions,
}
