//! View rendering for the mapping editor component.
//!
//! Layout: the source panel and the destination panel side by side, each with
//! a datasource select and a radio list of its tables, joined by an arrow
//! button that adds the current pair to the working list. Below them come the
//! working list, the shared schedule fields and the form actions.
//!
//! All user-facing text is in Spanish.

use common::model::mapping::{FrequencyUnit, Side};
use common::schedule::ScheduleField;
use common::session::{SideState, TableListState};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::html::Scope;
use yew::prelude::*;

use super::helpers::{endpoint_label, unit_label};
use super::messages::Msg;
use super::state::MappingEditorComponent;

/// Main view function for the mapping editor component.
pub fn view(component: &MappingEditorComponent, ctx: &Context<MappingEditorComponent>) -> Html {
    let link = ctx.link();

    html! {
        <div class="datasync-form">
            <div class="mapping-panels" style="display: flex;">
                { build_side_panel(component, link, Side::Source) }
                <div class="arrow">
                    <button
                        class="icon-btn"
                        title="Añadir relación"
                        disabled={component.session.is_closed()}
                        onclick={link.callback(|_| Msg::AddMapping)}
                    >
                        <i class="material-icons">{"arrow_forward"}</i>
                    </button>
                </div>
                { build_side_panel(component, link, Side::Destination) }
            </div>
            { build_mapping_list(component, link) }
            { build_schedule_fields(component, link) }
            { build_actions(component, link) }
        </div>
    }
}

/// Builds the datasource select and table list of one side.
fn build_side_panel(
    component: &MappingEditorComponent,
    link: &Scope<MappingEditorComponent>,
    side: Side,
) -> Html {
    let selected = component.selected_datasource(side);
    let placeholder = match side {
        Side::Source => "Selecciona fuente de datos",
        Side::Destination => "Selecciona destino de sincronización",
    };

    let on_change = link.callback(move |e: Event| {
        let value = e.target_unchecked_into::<HtmlSelectElement>().value();
        Msg::SelectDatasource(side, value)
    });

    let options = component
        .session
        .catalog()
        .iter()
        .map(|ds| {
            html! {
                <option
                    key={ds.id.to_string()}
                    value={ds.id.to_string()}
                    selected={selected == Some(&ds.id)}
                >
                    { ds.display_name.clone() }
                </option>
            }
        })
        .collect::<Html>();

    html! {
        <div class="side-panel" style="width: 40%;">
            <select onchange={on_change} disabled={component.session.is_closed()}>
                <option value="" disabled=true selected={selected.is_none()}>{ placeholder }</option>
                { options }
            </select>
            { build_table_list(component.session.side(side), link, side, component.session.is_closed()) }
        </div>
    }
}

/// Builds the radio list of candidate tables, with a loading or error line
/// above it while the list is stale.
fn build_table_list(
    state: &SideState,
    link: &Scope<MappingEditorComponent>,
    side: Side,
    closed: bool,
) -> Html {
    let status = match state.status() {
        TableListState::Loading => html! {
            <div class="table-status">{"Cargando tablas..."}</div>
        },
        TableListState::Failed(err) => html! {
            <div class="table-status error">
                <span title={err.to_string()}>{"No se pudieron cargar las tablas."}</span>
                <button disabled={closed} onclick={link.callback(move |_| Msg::RetryFetch(side))}>{"Reintentar"}</button>
            </div>
        },
        TableListState::Idle | TableListState::Ready => html! {},
    };

    let group = format!("{}-table", side);
    let radios = state
        .tables()
        .iter()
        .map(|table| {
            let value = table.clone();
            let on_change = link.callback(move |_: Event| Msg::SelectTable(side, value.clone()));
            html! {
                <label class="table-option" key={table.clone()}>
                    <input
                        type="radio"
                        name={group.clone()}
                        value={table.clone()}
                        checked={state.table() == Some(table.as_str())}
                        disabled={closed}
                        onchange={on_change}
                    />
                    { table.clone() }
                </label>
            }
        })
        .collect::<Html>();

    html! {
        <div class="plane">
            { status }
            <div class="table-options" style="display: flex; flex-direction: column;">
                { radios }
            </div>
        </div>
    }
}

/// Builds the working list with one delete button per row.
fn build_mapping_list(component: &MappingEditorComponent, link: &Scope<MappingEditorComponent>) -> Html {
    let entries = component.session.entries();
    let rows = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            html! {
                <li class={classes!("mapping-row", (!entry.is_complete()).then_some("incomplete"))}>
                    <span>{ endpoint_label(&component.session, &entry.source) }</span>
                    <i class="material-icons">{"arrow_forward"}</i>
                    <span>{ endpoint_label(&component.session, &entry.dest) }</span>
                    <button
                        class="icon-btn"
                        title="Eliminar"
                        disabled={component.session.is_closed()}
                        onclick={link.callback(move |_| Msg::DeleteMapping(index))}
                    >
                        <i class="material-icons">{"delete"}</i>
                    </button>
                </li>
            }
        })
        .collect::<Html>();

    html! {
        <div class="mapping-list">
            if entries.is_empty() {
                <p class="empty">{"No hay relaciones de sincronización."}</p>
            } else {
                <ul>{ rows }</ul>
            }
            if let Some(notice) = &component.notice {
                <p class="notice" style="color: #d32f2f;">{ notice.clone() }</p>
            }
        </div>
    }
}

/// Builds the start date, frequency and unit inputs with their error lines.
fn build_schedule_fields(
    component: &MappingEditorComponent,
    link: &Scope<MappingEditorComponent>,
) -> Html {
    let schedule = &component.schedule;
    let current_unit = schedule.frequency_unit.clone().unwrap_or_default();

    let on_start = link.callback(|e: Event| {
        Msg::SetStartTime(e.target_unchecked_into::<HtmlInputElement>().value())
    });
    let on_frequency = link.callback(|e: InputEvent| {
        Msg::SetFrequency(e.target_unchecked_into::<HtmlInputElement>().value())
    });
    let on_unit = link.callback(|e: Event| {
        Msg::SetFrequencyUnit(e.target_unchecked_into::<HtmlSelectElement>().value())
    });

    let units = FrequencyUnit::ALL
        .iter()
        .map(|unit| {
            html! {
                <option value={unit.as_str()} selected={current_unit == unit.as_str()}>
                    { unit_label(*unit) }
                </option>
            }
        })
        .collect::<Html>();

    html! {
        <div class="schedule-fields">
            <label>
                {"Fecha de inicio"}
                <input
                    type="date"
                    value={schedule.start_time.clone().unwrap_or_default()}
                    onchange={on_start}
                />
            </label>
            { field_error(component, ScheduleField::StartTime) }
            <label>
                {"Frecuencia"}
                <input
                    type="number"
                    min="1"
                    step="1"
                    value={schedule.frequency.clone().unwrap_or_default()}
                    oninput={on_frequency}
                />
                <select onchange={on_unit} style="width: 100px;">
                    <option value="" disabled=true selected={current_unit.is_empty()}>{"Unidad"}</option>
                    { units }
                </select>
            </label>
            { field_error(component, ScheduleField::Frequency) }
            { field_error(component, ScheduleField::FrequencyUnit) }
        </div>
    }
}

fn field_error(component: &MappingEditorComponent, field: ScheduleField) -> Html {
    match component.field_error(field) {
        Some(message) => html! { <div class="field-error" style="color: #d32f2f;">{ message }</div> },
        None => html! {},
    }
}

fn build_actions(component: &MappingEditorComponent, link: &Scope<MappingEditorComponent>) -> Html {
    let closed = component.session.is_closed();
    html! {
        <div class="form-actions">
            <button class="primary" disabled={closed} onclick={link.callback(|_| Msg::Confirm)}>
                {"Confirmar"}
            </button>
            <button disabled={closed} onclick={link.callback(|_| Msg::Cancel)}>
                {"Cancelar"}
            </button>
        </div>
    }
}
