use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, warn};

use super::options::ListDetailOptions;
use crate::backend::BackendResult;
use crate::model::{Breakpoint, Identified};

/// Loads the detailed item for an id.
pub type Fetcher<D> = Rc<dyn Fn(String) -> LocalBoxFuture<'static, BackendResult<D>>>;

/// What happened to a fetch when it completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// The result became the selected detail.
    Applied,
    /// A newer selection or refresh started first; the result was dropped.
    Stale,
    /// The fetch failed; the selected detail was left as it was.
    Failed,
}

enum DetailSource<C, D> {
    /// Compact and detailed shapes coincide; the detail is read from `items`.
    Lookup(fn(&C) -> D),
    Fetch(Fetcher<D>),
}

struct Settled<D> {
    generation: u64,
    id: String,
    result: BackendResult<D>,
}

/// Selection state for a list of compact items `C` with details `D`.
pub struct ListDetail<C, D> {
    items: Vec<C>,
    source: DetailSource<C, D>,
    options: ListDetailOptions,
    selected_id: Option<String>,
    selected_detail: Option<D>,
    details_open: bool,
    breakpoint: Breakpoint,
    generation: u64,
    loading: bool,
    in_flight: FuturesUnordered<LocalBoxFuture<'static, Settled<D>>>,
    scheduled: Option<(String, Instant)>,
}

impl<C: Identified + Clone + 'static> ListDetail<C, C> {
    /// Creates a controller whose detail is the selected item itself.
    pub fn new(items: Vec<C>, options: ListDetailOptions) -> Self {
        Self::build(items, DetailSource::Lookup(C::clone), options)
    }
}

impl<C: Identified, D: 'static> ListDetail<C, D> {
    /// Creates a controller that loads details through `fetcher`.
    pub fn with_fetcher(items: Vec<C>, fetcher: Fetcher<D>, options: ListDetailOptions) -> Self {
        Self::build(items, DetailSource::Fetch(fetcher), options)
    }

    fn build(items: Vec<C>, source: DetailSource<C, D>, options: ListDetailOptions) -> Self {
        Self {
            items,
            source,
            options,
            selected_id: None,
            selected_detail: None,
            details_open: false,
            breakpoint: Breakpoint::default(),
            generation: 0,
            loading: false,
            in_flight: FuturesUnordered::new(),
            scheduled: None,
        }
    }

    /// Performs the initial selection: `initial_id`, or the first item when
    /// `first_by_default` is set.
    ///
    /// With a non-zero `initial_select_delay` the selection is deferred to
    /// the first [`tick`](Self::tick) at or after `now + delay`.
    pub fn mount(&mut self, now: Instant) {
        let target = self.options.initial_id.clone().or_else(|| {
            self.options
                .first_by_default
                .then(|| self.items.first().map(|item| item.id().to_string()))
                .flatten()
        });
        let Some(id) = target else {
            return;
        };

        if self.options.initial_select_delay.is_zero() {
            self.on_selected_change(id);
        } else {
            debug!(%id, delay = ?self.options.initial_select_delay, "scheduled initial selection");
            self.scheduled = Some((id, now + self.options.initial_select_delay));
        }
    }

    /// Fires a scheduled initial selection once it is due. Returns `true`
    /// if a selection was made.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.scheduled.take() {
            Some((id, due)) if now >= due => {
                self.on_selected_change(id);
                true
            }
            pending => {
                self.scheduled = pending;
                false
            }
        }
    }

    /// Selects `id`.
    ///
    /// With a fetcher, the current detail is cleared, the dialog opens at a
    /// dialog breakpoint and exactly one fetch is started for `id`. Without
    /// one, the detail is read from `items` and the dialog is left alone.
    /// Any scheduled initial selection is cancelled.
    pub fn on_selected_change(&mut self, id: impl Into<String>) {
        let id = id.into();
        debug!(%id, "selection changed");
        self.scheduled = None;
        self.selected_id = Some(id.clone());

        match &self.source {
            DetailSource::Lookup(_) => self.lookup_detail(),
            DetailSource::Fetch(fetcher) => {
                let fetcher = Rc::clone(fetcher);
                self.selected_detail = None;
                if self.presents_as_dialog() {
                    self.details_open = true;
                }
                self.start_fetch(&fetcher, id);
            }
        }
    }

    /// Loads the selected detail again without clearing what is shown.
    /// Returns `false` when nothing is selected.
    pub fn refresh_detail(&mut self) -> bool {
        let Some(id) = self.selected_id.clone() else {
            return false;
        };
        match &self.source {
            DetailSource::Lookup(_) => self.lookup_detail(),
            DetailSource::Fetch(fetcher) => {
                let fetcher = Rc::clone(fetcher);
                self.start_fetch(&fetcher, id);
            }
        }
        true
    }

    /// Closes the detail dialog.
    pub fn on_details_close(&mut self) {
        self.details_open = false;
    }

    /// Updates the current breakpoint: the dialog closes when leaving the
    /// dialog range and opens when entering it with a selection.
    pub fn set_breakpoint(&mut self, breakpoint: Breakpoint) {
        if breakpoint == self.breakpoint {
            return;
        }
        let was_dialog = self.presents_as_dialog();
        self.breakpoint = breakpoint;
        let is_dialog = self.presents_as_dialog();

        if was_dialog && !is_dialog {
            self.details_open = false;
        } else if !was_dialog && is_dialog && self.selected_id.is_some() {
            self.details_open = true;
        }
    }

    /// Replaces the list, keeping the selection if its id is still listed.
    /// Without a fetcher the kept selection's detail is read again.
    pub fn replace_items(&mut self, items: Vec<C>) {
        self.items = items;
        let still_listed = self
            .selected_id
            .as_deref()
            .is_none_or(|id| self.items.iter().any(|i| i.id() == id));
        if !still_listed {
            self.clear_selection();
        } else if matches!(self.source, DetailSource::Lookup(_)) {
            self.lookup_detail();
        }
    }

    /// Waits for the next in-flight fetch and applies it if still current.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn settle(&mut self) -> Option<SettleOutcome> {
        let settled = self.in_flight.next().await?;
        Some(self.apply(settled))
    }

    /// Applies every fetch that has already completed, without waiting.
    /// Returns how many completed.
    pub fn pump(&mut self) -> usize {
        let mut count = 0;
        while let Some(Some(settled)) = self.in_flight.next().now_or_never() {
            self.apply(settled);
            count += 1;
        }
        count
    }

    pub fn items(&self) -> &[C] {
        &self.items
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn selected_detail(&self) -> Option<&D> {
        self.selected_detail.as_ref()
    }

    /// Position of the selected item in `items`.
    pub fn selected_index(&self) -> Option<usize> {
        let id = self.selected_id.as_deref()?;
        self.items.iter().position(|i| i.id() == id)
    }

    pub fn details_open(&self) -> bool {
        self.details_open
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    /// `true` when the current breakpoint shows details as a dialog.
    pub fn presents_as_dialog(&self) -> bool {
        self.options.dialog_breakpoints.contains(&self.breakpoint)
    }

    /// `true` while the fetch for the current selection has not completed.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// `true` while an initial selection is waiting for its delay.
    pub fn has_scheduled_selection(&self) -> bool {
        self.scheduled.is_some()
    }

    fn lookup_detail(&mut self) {
        let DetailSource::Lookup(to_detail) = &self.source else {
            return;
        };
        self.selected_detail = self
            .selected_id
            .as_deref()
            .and_then(|id| self.items.iter().find(|i| i.id() == id))
            .map(*to_detail);
    }

    fn clear_selection(&mut self) {
        self.generation += 1;
        self.selected_id = None;
        self.selected_detail = None;
        self.details_open = false;
        self.loading = false;
    }

    fn start_fetch(&mut self, fetcher: &Fetcher<D>, id: String) {
        self.generation += 1;
        self.loading = true;
        let generation = self.generation;
        let request = fetcher(id.clone());
        self.in_flight.push(
            async move {
                Settled {
                    generation,
                    id,
                    result: request.await,
                }
            }
            .boxed_local(),
        );
    }

    fn apply(&mut self, settled: Settled<D>) -> SettleOutcome {
        if settled.generation != self.generation {
            debug!(id = %settled.id, "discarding stale detail");
            return SettleOutcome::Stale;
        }
        self.loading = false;
        match settled.result {
            Ok(detail) => {
                self.selected_detail = Some(detail);
                SettleOutcome::Applied
            }
            Err(e) => {
                warn!(id = %settled.id, error = %e, "failed to load detail");
                SettleOutcome::Failed
            }
        }
    }
}

#[mutants::skip]
impl<C: fmt::Debug, D: fmt::Debug> fmt::Debug for ListDetail<C, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListDetail")
            .field("items", &self.items)
            .field("options", &self.options)
            .field("selected_id", &self.selected_id)
            .field("selected_detail", &self.selected_detail)
            .field("details_open", &self.details_open)
            .field("breakpoint", &self.breakpoint)
            .field("generation", &self.generation)
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}
