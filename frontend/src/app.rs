//! Demo host for the mapping editor.
//!
//! Plays the part of the caller: it supplies the datasource catalog, a table
//! lookup, and the confirm/cancel callbacks. The catalog and the table names
//! come from an embedded JSON document; lookups resolve after a short delay,
//! and datasources without a table entry fail so the retry path is visible.

use std::collections::HashMap;
use std::rc::Rc;

use common::config::EditorOptions;
use common::fetch::{FetcherHandle, LookupError};
use common::model::datasource::{Datasource, DatasourceCatalog};
use common::model::mapping::SyncMapping;
use gloo_timers::future::TimeoutFuture;
use log::{error, info};
use serde::Deserialize;
use yew::{html, Component, Context, Html};

use crate::components::mapping_editor::MappingEditorComponent;

const DEMO_CATALOG: &str = include_str!("../assets/demo_catalog.json");

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DemoCatalog {
    datasources: Vec<Datasource>,
    tables: HashMap<String, Vec<String>>,
    #[serde(default)]
    options: EditorOptions,
    #[serde(default)]
    latency_ms: u32,
}

struct DemoSetup {
    catalog: DatasourceCatalog,
    fetcher: FetcherHandle,
    options: EditorOptions,
}

fn load_demo() -> Result<DemoSetup, String> {
    let demo: DemoCatalog = serde_json::from_str(DEMO_CATALOG).map_err(|e| e.to_string())?;
    let catalog = DatasourceCatalog::new(demo.datasources).map_err(|e| e.to_string())?;
    let tables = Rc::new(demo.tables);
    let latency = demo.latency_ms;

    let fetcher = FetcherHandle::new(move |ds: Datasource| {
        let tables = Rc::clone(&tables);
        async move {
            TimeoutFuture::new(latency).await;
            tables
                .get(ds.id.as_str())
                .cloned()
                .ok_or_else(|| LookupError::new(&ds, "datasource unreachable"))
        }
    });

    Ok(DemoSetup {
        catalog,
        fetcher,
        options: demo.options,
    })
}

pub enum Msg {
    Confirmed(Vec<SyncMapping>),
    Cancelled(Vec<SyncMapping>),
    Restart,
}

pub struct App {
    setup: Result<DemoSetup, String>,
    outcome: Option<String>,
    /// Bumped to remount the editor, which starts a fresh session.
    session_key: u32,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let setup = load_demo();
        if let Err(err) = &setup {
            error!("demo catalog rejected: {}", err);
        }
        Self {
            setup,
            outcome: None,
            session_key: 0,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Confirmed(mappings) => {
                match serde_json::to_string(&mappings) {
                    Ok(json) => info!("confirmed mappings: {}", json),
                    Err(err) => error!("could not serialize mappings: {}", err),
                }
                self.outcome = Some(format!("Se confirmaron {} relaciones.", mappings.len()));
            }
            Msg::Cancelled(seed) => {
                info!("editing cancelled, {} initial mappings kept", seed.len());
                self.outcome = Some("Edición cancelada.".to_string());
            }
            Msg::Restart => {
                self.outcome = None;
                self.session_key += 1;
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        match &self.setup {
            Err(err) => html! {
                <div class="error">
                    { format!("No se pudo cargar el catálogo de demostración: {}", err) }
                </div>
            },
            Ok(demo) => html! {
                <div>
                    <MappingEditorComponent
                        key={self.session_key.to_string()}
                        datasource_list={demo.catalog.clone()}
                        table_list_fetcher={demo.fetcher.clone()}
                        options={demo.options}
                        on_confirm={link.callback(Msg::Confirmed)}
                        on_cancel={link.callback(Msg::Cancelled)}
                    />
                    if let Some(outcome) = &self.outcome {
                        <p class="outcome">{ outcome.clone() }</p>
                        <button onclick={link.callback(|_| Msg::Restart)}>{"Nueva sincronización"}</button>
                    }
                </div>
            },
        }
    }
}
