//! Component state for the mapping editor.
//!
//! The session owns the working list and both sides' selection state. The
//! component adds only what belongs to the form: the raw schedule inputs and
//! the messages currently shown next to them.

use common::model::datasource::DatasourceId;
use common::model::mapping::Side;
use common::schedule::{ScheduleField, ScheduleInput, ValidationErrors};
use common::session::MappingSession;

use super::props::MappingEditorProps;

/// Main state container for the `MappingEditorComponent`.
pub struct MappingEditorComponent {
    /// Working list and per-side selection state.
    pub session: MappingSession,

    /// Current values of the start time, frequency and unit inputs.
    pub schedule: ScheduleInput,

    /// Field-level errors from the last rejected submission.
    pub field_errors: Option<ValidationErrors>,

    /// Message about the working list (duplicate pair, incomplete row, ...).
    pub notice: Option<String>,
}

impl MappingEditorComponent {
    pub fn new(props: &MappingEditorProps) -> Self {
        Self {
            session: MappingSession::new(
                props.datasource_list.clone(),
                props.init_mappings.clone(),
                props.options,
            ),
            schedule: ScheduleInput::from_seed(&props.init_mappings),
            field_errors: None,
            notice: None,
        }
    }

    pub fn selected_datasource(&self, side: Side) -> Option<&DatasourceId> {
        self.session.side(side).datasource()
    }

    pub fn field_error(&self, field: ScheduleField) -> Option<String> {
        self.field_errors
            .as_ref()
            .and_then(|errors| errors.for_field(field))
            .map(super::helpers::field_error_message)
    }
}
