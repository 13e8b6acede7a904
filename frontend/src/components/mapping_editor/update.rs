//! Update function for the mapping editor component.
//!
//! Elm-style: receives the current `MappingEditorComponent` state, the
//! `Context`, and a `Msg`, forwards the edit to the session, and returns a
//! `bool` indicating whether the view should re-render.
//!
//! Key behaviors
//! - Selecting a datasource spawns the table lookup the session asks for; its
//!   outcome comes back as `Msg::TablesLoaded` and is dropped by the session
//!   if a newer selection superseded it.
//! - Rejected edits are reported inline (`notice`) or as a toast (Spanish).
//! - `Confirm` and `Cancel` emit the parent callbacks exactly once.

use common::fetch::FetchRequest;
use common::model::datasource::DatasourceId;
use common::schedule::ScheduleInput;
use common::session::{ConfirmError, FetchApplied};
use log::debug;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::helpers::{describe_confirm_error, describe_session_error, non_blank, show_toast};
use super::messages::Msg;
use super::state::MappingEditorComponent;

/// Central update function for the component.
///
/// Contract
/// - Mutates `component` based on `msg`.
/// - May dispatch further messages via `ctx.link()` (table lookups).
/// - Returns `true` to re-render the view, `false` when nothing visible changed.
pub fn update(
    component: &mut MappingEditorComponent,
    ctx: &Context<MappingEditorComponent>,
    msg: Msg,
) -> bool {
    match msg {
        Msg::SelectDatasource(side, id) => {
            match component
                .session
                .select_datasource(side, &DatasourceId::new(id))
            {
                Ok(request) => spawn_fetch(ctx, request),
                Err(err) => show_toast(&describe_session_error(&err)),
            }
            true
        }
        Msg::TablesLoaded(outcome) => component.session.apply_fetch(outcome) != FetchApplied::Stale,
        Msg::RetryFetch(side) => match component.session.retry_fetch(side) {
            Some(request) => {
                spawn_fetch(ctx, request);
                true
            }
            None => false,
        },
        Msg::SelectTable(side, table) => {
            if let Err(err) = component.session.select_table(side, &table) {
                show_toast(&describe_session_error(&err));
            }
            true
        }
        Msg::AddMapping => {
            component.notice = component
                .session
                .add_mapping()
                .err()
                .map(|err| describe_session_error(&err));
            true
        }
        Msg::DeleteMapping(index) => {
            let removed = component.session.delete_mapping(index).is_some();
            if removed {
                component.notice = None;
            }
            removed
        }
        Msg::SetStartTime(value) => {
            component.schedule.start_time = non_blank(value);
            false
        }
        Msg::SetFrequency(value) => {
            component.schedule.frequency = non_blank(value);
            false
        }
        Msg::SetFrequencyUnit(value) => {
            component.schedule.frequency_unit = non_blank(value);
            false
        }
        Msg::Confirm => {
            match component.session.confirm(&component.schedule) {
                Ok(mappings) => {
                    component.field_errors = None;
                    component.notice = None;
                    ctx.props().on_confirm.emit(mappings);
                }
                Err(ConfirmError::Invalid(errors)) => {
                    debug!("{}", errors);
                    component.field_errors = Some(errors);
                    component.notice = None;
                }
                Err(err) => {
                    component.field_errors = None;
                    component.notice = Some(describe_confirm_error(&err));
                }
            }
            true
        }
        Msg::Cancel => match component.session.cancel() {
            Ok(seed) => {
                component.schedule = ScheduleInput::from_seed(&seed);
                component.field_errors = None;
                component.notice = None;
                ctx.props().on_cancel.emit(seed);
                true
            }
            Err(err) => {
                show_toast(&describe_session_error(&err));
                false
            }
        },
    }
}

/// Runs a table lookup in the background and reports back with `Msg::TablesLoaded`.
fn spawn_fetch(ctx: &Context<MappingEditorComponent>, request: FetchRequest) {
    let pending = request.run(ctx.props().table_list_fetcher.as_fetcher());
    let link = ctx.link().clone();
    spawn_local(async move {
        link.send_message(Msg::TablesLoaded(pending.await));
    });
}
