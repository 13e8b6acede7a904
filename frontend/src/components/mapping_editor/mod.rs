//! Mapping editor: root module wiring the Yew `Component` implementation
//! with submodules for props, state, update logic, view rendering, and helpers.
//!
//! Responsibilities
//! - Re-export selected types (`Msg`, `MappingEditorProps`, `MappingEditorComponent`).
//! - Provide the `Component` implementation that delegates to `update::update` and `view::view`.
//!
//! The editing rules themselves live in `common::session`; this component only
//! turns DOM events into session calls and runs the table lookups it asks for.

use yew::prelude::*;

mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::MappingEditorProps;
pub use state::MappingEditorComponent;

impl Component for MappingEditorComponent {
    type Message = Msg;
    type Properties = MappingEditorProps;

    fn create(ctx: &Context<Self>) -> Self {
        MappingEditorComponent::new(ctx.props())
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }
}
