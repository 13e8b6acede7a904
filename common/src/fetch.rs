//! The table lookup capability supplied by the caller.
//!
//! This is the only I/O boundary of the editor. The session never awaits
//! anything itself: it hands out a [`FetchRequest`], the driver (the Yew
//! component, or a test) runs it against the fetcher, and the resulting
//! [`FetchOutcome`] goes back into the session tagged with the generation it
//! was issued for.

use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};
use thiserror::Error;

use crate::model::datasource::{Datasource, DatasourceId};
use crate::model::mapping::Side;

/// A table listing that could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not list tables of `{datasource}`: {reason}")]
pub struct LookupError {
    pub datasource: DatasourceId,
    pub reason: String,
}

impl LookupError {
    pub fn new(datasource: &Datasource, reason: impl Into<String>) -> Self {
        Self {
            datasource: datasource.id.clone(),
            reason: reason.into(),
        }
    }
}

/// Lists the tables available in a datasource.
///
/// Futures are `!Send` on purpose: the browser runtime is single threaded.
pub trait TableListFetcher {
    fn fetch_tables(&self, datasource: &Datasource)
    -> LocalBoxFuture<'static, Result<Vec<String>, LookupError>>;
}

impl<F, Fut> TableListFetcher for F
where
    F: Fn(Datasource) -> Fut,
    Fut: Future<Output = Result<Vec<String>, LookupError>> + 'static,
{
    fn fetch_tables(
        &self,
        datasource: &Datasource,
    ) -> LocalBoxFuture<'static, Result<Vec<String>, LookupError>> {
        (self)(datasource.clone()).boxed_local()
    }
}

/// Shared handle to a fetcher, compared by identity so it can sit in props.
#[derive(Clone)]
pub struct FetcherHandle(Rc<dyn TableListFetcher>);

impl FetcherHandle {
    pub fn new(fetcher: impl TableListFetcher + 'static) -> Self {
        Self(Rc::new(fetcher))
    }

    pub fn as_fetcher(&self) -> &dyn TableListFetcher {
        self.0.as_ref()
    }
}

impl PartialEq for FetcherHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for FetcherHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FetcherHandle(..)")
    }
}

/// A lookup the session wants performed for one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub side: Side,
    pub generation: u64,
    pub datasource: Datasource,
}

impl FetchRequest {
    /// Starts the lookup. The returned future owns everything it needs, so it
    /// can be spawned without borrowing the fetcher.
    pub fn run(self, fetcher: &dyn TableListFetcher) -> LocalBoxFuture<'static, FetchOutcome> {
        let FetchRequest {
            side,
            generation,
            datasource,
        } = self;
        let pending = fetcher.fetch_tables(&datasource);
        async move {
            FetchOutcome {
                side,
                generation,
                result: pending.await,
            }
        }
        .boxed_local()
    }
}

/// The resolved result of a [`FetchRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub side: Side,
    pub generation: u64,
    pub result: Result<Vec<String>, LookupError>,
}
