use crate::adapters::pokeapi::extract_id_from_url;
use crate::domain::model::{NamedResource, PokemonDetails, PokemonSummary};
use crate::domain::ports::CatalogSource;
use crate::utils::error::{Result, TeamBuilderError};
use futures::future::try_join_all;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Entries fetched per catalog round trip.
pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderState {
    Idle,
    Loading,
    /// The last load failed; calling the same operation again retries it.
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// `added` counts entries that survived name dedup.
    Loaded { added: usize },
    /// Another load was in flight, a search result is showing, or a newer
    /// search or reload replaced the list before this one finished.
    Skipped,
    Failed,
}

#[derive(Debug)]
struct CatalogView {
    pokemon: Vec<PokemonSummary>,
    offset: usize,
    has_more: bool,
    state: LoaderState,
    /// Pagination stays off while a search result is listed.
    searching: bool,
    /// Bumped by every search and reload; stale fetches compare against it.
    generation: u64,
}

impl CatalogView {
    /// Appends entries whose display name is not already listed; first occurrence wins.
    fn append_unique(&mut self, items: Vec<PokemonSummary>) -> usize {
        let mut seen: HashSet<String> = self.pokemon.iter().map(|p| p.name.clone()).collect();
        let before = self.pokemon.len();
        for item in items {
            if seen.insert(item.name.clone()) {
                self.pokemon.push(item);
            } else {
                tracing::debug!(name = %item.name, "Dropping duplicate catalog entry");
            }
        }
        self.pokemon.len() - before
    }
}

/// Clears the in-flight flag when a load finishes, however it finishes.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Counts a running search or reload until it finishes.
struct Pending<'a>(&'a AtomicUsize);

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Incrementally growing view over the external catalog.
///
/// All operations take `&self`. A page load is skipped while another fetch is
/// pending. A search or reload always runs and supersedes whatever is pending;
/// the latest one started wins. The view lock is never held across an await.
pub struct CatalogLoader<C: CatalogSource> {
    source: C,
    in_flight: AtomicBool,
    pending: AtomicUsize,
    view: Mutex<CatalogView>,
}

impl<C: CatalogSource> CatalogLoader<C> {
    pub fn new(source: C) -> Self {
        Self {
            source,
            in_flight: AtomicBool::new(false),
            pending: AtomicUsize::new(0),
            view: Mutex::new(CatalogView {
                pokemon: Vec::new(),
                offset: 0,
                has_more: true,
                state: LoaderState::Idle,
                searching: false,
                generation: 0,
            }),
        }
    }

    pub fn source(&self) -> &C {
        &self.source
    }

    pub fn pokemon(&self) -> Vec<PokemonSummary> {
        self.view().pokemon.clone()
    }

    pub fn state(&self) -> LoaderState {
        self.view().state.clone()
    }

    pub fn has_more(&self) -> bool {
        self.view().has_more
    }

    pub fn offset(&self) -> usize {
        self.view().offset
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) || self.pending.load(Ordering::Acquire) > 0
    }

    /// True while the list holds a search result instead of catalog pages.
    pub fn is_searching(&self) -> bool {
        self.view().searching
    }

    /// Error → Idle without retrying.
    pub fn dismiss_error(&self) {
        let mut view = self.view();
        if matches!(view.state, LoaderState::Error(_)) {
            view.state = LoaderState::Idle;
        }
    }

    /// Case-insensitive substring match over what has been loaded so far.
    pub fn filtered(&self, query: &str) -> Vec<PokemonSummary> {
        let needle = query.trim().to_lowercase();
        let view = self.view();
        if needle.is_empty() {
            return view.pokemon.clone();
        }
        view.pokemon
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Fetches the page at the current offset and appends it.
    ///
    /// The page is all or nothing: if any detail fetch fails, the list and offset
    /// stay as they were and the loader moves to [`LoaderState::Error`].
    /// Skipped while a search result is showing.
    pub async fn load_next_page(&self) -> LoadOutcome {
        let Some((_guard, offset, generation)) = self.begin_page() else {
            return LoadOutcome::Skipped;
        };

        let fetched = self.fetch_page(offset).await;
        let mut view = self.view();
        if view.generation != generation {
            tracing::debug!(offset, "Discarding page replaced by a newer search or reload");
            return LoadOutcome::Skipped;
        }

        match fetched {
            Ok((items, has_more)) => {
                let added = view.append_unique(items);
                view.offset = offset + PAGE_SIZE;
                view.has_more = has_more;
                view.state = LoaderState::Idle;
                tracing::info!(offset, added, total = view.pokemon.len(), "Loaded catalog page");
                LoadOutcome::Loaded { added }
            }
            Err(e) => fail(&mut view, "page load", e),
        }
    }

    /// [`load_next_page`](Self::load_next_page) gated on the catalog reporting a next page.
    pub async fn load_more(&self) -> LoadOutcome {
        if !self.has_more() {
            return LoadOutcome::Skipped;
        }
        self.load_next_page().await
    }

    /// Reloads from offset 0, replacing the accumulated list and turning
    /// pagination back on.
    pub async fn refetch(&self) -> LoadOutcome {
        let (_pending, generation) = self.supersede();

        let fetched = self.fetch_page(0).await;
        let mut view = self.view();
        if view.generation != generation {
            return LoadOutcome::Skipped;
        }

        match fetched {
            Ok((items, has_more)) => {
                view.pokemon.clear();
                let added = view.append_unique(items);
                view.offset = PAGE_SIZE;
                view.has_more = has_more;
                view.searching = false;
                view.state = LoaderState::Idle;
                tracing::info!(added, "Reloaded catalog from the first page");
                LoadOutcome::Loaded { added }
            }
            Err(e) => fail(&mut view, "reload", e),
        }
    }

    /// Exact-name lookup that bypasses pagination.
    ///
    /// A blank term is a [`refetch`](Self::refetch). No match empties the list
    /// without an error. Either way pagination is switched off until the next refetch.
    pub async fn search(&self, term: &str) -> LoadOutcome {
        let term = term.trim();
        if term.is_empty() {
            return self.refetch().await;
        }

        let (_pending, generation) = self.supersede();

        let fetched = self.source.pokemon_by_name(term).await;
        let mut view = self.view();
        if view.generation != generation {
            tracing::debug!(term, "Discarding search replaced by a newer one");
            return LoadOutcome::Skipped;
        }

        match fetched {
            Ok(found) => {
                let results: Vec<PokemonSummary> = found
                    .map(|details| self.summarize(&details))
                    .into_iter()
                    .collect();
                let added = results.len();

                view.pokemon = results;
                view.has_more = false;
                view.searching = true;
                view.state = LoaderState::Idle;
                tracing::info!(term, matches = added, "Catalog search finished");
                LoadOutcome::Loaded { added }
            }
            Err(e) => fail(&mut view, "search", e),
        }
    }

    /// Full detail record for one Pokémon. Errors go to the caller.
    pub async fn fetch_details(&self, id: u32) -> Result<PokemonDetails> {
        self.source.pokemon_by_id(id).await
    }

    /// Claims the page slot and returns the offset and generation to load against.
    fn begin_page(&self) -> Option<(InFlight<'_>, usize, u64)> {
        if self.pending.load(Ordering::Acquire) > 0
            || self
                .in_flight
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
        {
            tracing::debug!("Catalog load already in flight, skipping");
            return None;
        }
        let guard = InFlight(&self.in_flight);

        let mut view = self.view();
        if view.searching {
            tracing::debug!("Search result showing, pagination is off");
            return None;
        }
        view.state = LoaderState::Loading;
        Some((guard, view.offset, view.generation))
    }

    /// Starts a search or reload, invalidating every fetch already pending.
    fn supersede(&self) -> (Pending<'_>, u64) {
        self.pending.fetch_add(1, Ordering::AcqRel);
        let pending = Pending(&self.pending);

        let mut view = self.view();
        view.generation += 1;
        view.state = LoaderState::Loading;
        (pending, view.generation)
    }

    fn view(&self) -> MutexGuard<'_, CatalogView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn fetch_page(&self, offset: usize) -> Result<(Vec<PokemonSummary>, bool)> {
        let page = self.source.list_page(offset, PAGE_SIZE).await?;
        tracing::debug!(offset, entries = page.results.len(), "Fetching page details");

        let items = try_join_all(page.results.iter().map(|entry| self.fetch_entry(entry))).await?;
        Ok((items, page.next.is_some()))
    }

    async fn fetch_entry(&self, entry: &NamedResource) -> Result<PokemonSummary> {
        let details = match extract_id_from_url(&entry.url) {
            Some(id) => self.source.pokemon_by_id(id).await?,
            None => self
                .source
                .pokemon_by_name(&entry.name)
                .await?
                .ok_or_else(|| TeamBuilderError::FetchError {
                    url: entry.url.clone(),
                    status: 404,
                })?,
        };
        Ok(self.summarize(&details))
    }

    fn summarize(&self, details: &PokemonDetails) -> PokemonSummary {
        details.to_summary(self.source.resource_url(details.id))
    }
}

fn fail(view: &mut CatalogView, operation: &str, error: TeamBuilderError) -> LoadOutcome {
    tracing::warn!("Catalog {} failed: {}", operation, error);
    view.state = LoaderState::Error(error.user_friendly_message());
    LoadOutcome::Failed
}
