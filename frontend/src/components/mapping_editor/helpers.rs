//! Utility functions for the mapping editor component.
//!
//! - **Labels**: human-readable text for working-list rows and frequency units.
//! - **Error text**: Spanish messages for session, confirmation and field errors.
//! - **User feedback**: temporary "toast" notifications.

use common::model::mapping::{Endpoint, FrequencyUnit};
use common::schedule::{FieldError, ScheduleField};
use common::session::{ConfirmError, MappingSession, SessionError};
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

/// Placeholder shown for a part of a row that was never selected.
const UNSET: &str = "—";

/// Renders one side of a working-list row as `display name / table`.
///
/// Falls back to the raw identifier when the datasource cannot be resolved.
pub fn endpoint_label(session: &MappingSession, endpoint: &Endpoint) -> String {
    let datasource = endpoint
        .datasource
        .as_ref()
        .map(|id| {
            session
                .resolve(id)
                .map(|ds| ds.display_name.clone())
                .unwrap_or_else(|| id.to_string())
        })
        .unwrap_or_else(|| UNSET.to_string());
    let table = endpoint.table.as_deref().unwrap_or(UNSET);
    format!("{} / {}", datasource, table)
}

pub fn unit_label(unit: FrequencyUnit) -> &'static str {
    match unit {
        FrequencyUnit::Day => "Día",
        FrequencyUnit::Week => "Semana",
        FrequencyUnit::Month => "Mes",
    }
}

pub fn describe_session_error(err: &SessionError) -> String {
    match err {
        SessionError::Closed => "El formulario ya fue enviado o cancelado.".to_string(),
        SessionError::UnknownDatasource(id) => {
            format!("La fuente de datos «{}» no existe.", id)
        }
        SessionError::TableNotListed { table, .. } => {
            format!("La tabla «{}» no pertenece a la fuente seleccionada.", table)
        }
        SessionError::DuplicateMapping { existing } => {
            format!("Esta relación ya existe en la fila {}.", existing + 1)
        }
    }
}

pub fn describe_confirm_error(err: &ConfirmError) -> String {
    match err {
        ConfirmError::Closed => "El formulario ya fue enviado o cancelado.".to_string(),
        ConfirmError::Invalid(errors) => errors
            .errors()
            .iter()
            .map(field_error_message)
            .collect::<Vec<_>>()
            .join(" "),
        ConfirmError::IncompleteMapping { index } => format!(
            "La fila {} no tiene fuente y tabla en ambos lados.",
            index + 1
        ),
        ConfirmError::UnknownDatasource { index, id } => format!(
            "La fila {} usa una fuente de datos desconocida: {}.",
            index + 1,
            id
        ),
    }
}

pub fn field_error_message(err: &FieldError) -> String {
    match err {
        FieldError::Missing(ScheduleField::StartTime) => "Selecciona la fecha de inicio.".to_string(),
        FieldError::Missing(ScheduleField::Frequency) => {
            "Introduce la frecuencia de sincronización.".to_string()
        }
        FieldError::Missing(ScheduleField::FrequencyUnit) => {
            "Selecciona la unidad de frecuencia.".to_string()
        }
        FieldError::Invalid {
            field: ScheduleField::StartTime,
            ..
        } => "La fecha de inicio no es válida.".to_string(),
        FieldError::Invalid {
            field: ScheduleField::Frequency,
            ..
        } => "La frecuencia debe ser un número entero positivo.".to_string(),
        FieldError::Invalid {
            field: ScheduleField::FrequencyUnit,
            ..
        } => "La unidad de frecuencia no es válida.".to_string(),
    }
}

/// Treats an empty input as "not provided".
pub fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Displays a temporary notification message at the bottom of the screen.
///
/// Creates a styled `div`, appends it to `body`, and removes it again after
/// three seconds.
pub fn show_toast(message: &str) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) else {
        return;
    };

    toast.set_text_content(Some(message));
    let html_toast: HtmlElement = toast.unchecked_into();
    let style = html_toast.style();
    for (property, value) in [
        ("position", "fixed"),
        ("bottom", "20px"),
        ("left", "50%"),
        ("transform", "translateX(-50%)"),
        ("background", "rgba(0, 0, 0, 0.8)"),
        ("color", "#fff"),
        ("padding", "10px 20px"),
        ("border-radius", "4px"),
        ("z-index", "10000"),
    ] {
        style.set_property(property, value).ok();
    }

    if body.append_child(&html_toast).is_ok() {
        wasm_bindgen_futures::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(3000).await;
            if let Some(parent) = html_toast.parent_node() {
                parent.remove_child(&html_toast).ok();
            }
        });
    }
}
