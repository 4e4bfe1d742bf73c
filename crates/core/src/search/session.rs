//! Live search session.
//!
//! A session owns one displayed result list. A single task applies every
//! change to it: query edits from the handle, and completions reported by the
//! spawned backend calls. Query edits are debounced; each fetch carries a
//! generation so a late response for an outdated query is dropped. Favorite
//! toggles on displayed records are optimistic and roll back on failure.
//!
//! Readers observe the state through a `watch` channel of [`SearchView`]
//! snapshots.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;

use super::generation::GenerationTracker;
use super::search_model::{CategoryFilter, SearchQuery, SearchQueryPatch};
use crate::constants::SEARCH_DEBOUNCE;
use crate::errors::Result;
use crate::optimistic::OptimisticCell;
use crate::recipes::{Recipe, RecipeServiceTrait};
use crate::users::Identity;
use crate::Error;

const COMMAND_BUFFER: usize = 32;

#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Quiet period before a changed query is fetched.
    pub debounce: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            debounce: SEARCH_DEBOUNCE,
        }
    }
}

/// Snapshot of what a session displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchView {
    pub query: SearchQuery,
    pub recipes: Vec<Recipe>,
    /// True while the most recently issued fetch is in flight.
    pub loading: bool,
    /// Generation of the fetch whose results are displayed; 0 before the first.
    pub generation: u64,
    /// Bumped every time a favorite write commits.
    pub revision: u64,
    /// Recipes with a favorite write in flight, sorted by id.
    pub busy: Vec<String>,
}

impl SearchView {
    fn initial(query: SearchQuery) -> Self {
        Self {
            query,
            recipes: Vec::new(),
            loading: false,
            generation: 0,
            revision: 0,
            busy: Vec::new(),
        }
    }

    pub fn recipe(&self, recipe_id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == recipe_id)
    }

    pub fn is_busy(&self, recipe_id: &str) -> bool {
        self.busy.iter().any(|id| id == recipe_id)
    }
}

/// Immediate answer to a favorite trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FavoriteTrigger {
    /// The flag was flipped locally and the write issued.
    Applied { is_favorite: bool },
    /// A write for this record is still in flight.
    Ignored,
}

enum Command {
    Update(SearchQueryPatch),
    Refresh,
    ToggleFavorite {
        recipe_id: String,
        reply: oneshot::Sender<Result<FavoriteTrigger>>,
    },
    Close,
}

enum Completion {
    Fetched {
        generation: u64,
        result: Result<Vec<Recipe>>,
    },
    FavoriteWritten {
        recipe_id: String,
        result: Result<Recipe>,
    },
}

/// Cloneable handle to a running search session.
#[derive(Clone)]
pub struct SearchSessionHandle {
    commands: mpsc::Sender<Command>,
    view: watch::Receiver<SearchView>,
}

impl SearchSessionHandle {
    /// Starts a session for `identity` with the default query (`All`, empty term).
    ///
    /// The first fetch goes out once the debounce window elapses.
    pub fn spawn(
        identity: Identity,
        service: Arc<dyn RecipeServiceTrait>,
        settings: SessionSettings,
    ) -> Self {
        Self::spawn_with_query(identity, service, settings, SearchQuery::default())
    }

    pub fn spawn_with_query(
        identity: Identity,
        service: Arc<dyn RecipeServiceTrait>,
        settings: SessionSettings,
        query: SearchQuery,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(SearchView::initial(query.clone()));

        let actor = SessionActor {
            deadline: Some(Instant::now() + settings.debounce),
            identity,
            service,
            settings,
            query,
            recipes: Vec::new(),
            generations: GenerationTracker::new(),
            displayed_generation: 0,
            revision: 0,
            favorites: HashMap::new(),
            view_tx,
            completion_tx,
        };
        tokio::spawn(actor.run(command_rx, completion_rx));

        Self {
            commands: command_tx,
            view: view_rx,
        }
    }

    /// The latest snapshot.
    pub fn view(&self) -> SearchView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.view.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Changes the term and/or category. Restarts the debounce window if anything changed.
    pub async fn update_query(&self, patch: SearchQueryPatch) -> Result<()> {
        self.send(Command::Update(patch)).await
    }

    pub async fn set_term(&self, term: impl Into<String>) -> Result<()> {
        self.update_query(SearchQueryPatch {
            term: Some(term.into()),
            category: None,
        })
        .await
    }

    pub async fn set_category(&self, category: CategoryFilter) -> Result<()> {
        self.update_query(SearchQueryPatch {
            term: None,
            category: Some(category),
        })
        .await
    }

    /// Fetches the current query now, cancelling any pending debounce.
    pub async fn refresh(&self) -> Result<()> {
        self.send(Command::Refresh).await
    }

    /// Optimistically flips the favorite flag of a displayed recipe.
    pub async fn toggle_favorite(&self, recipe_id: impl Into<String>) -> Result<FavoriteTrigger> {
        let (reply, answer) = oneshot::channel();
        self.send(Command::ToggleFavorite {
            recipe_id: recipe_id.into(),
            reply,
        })
        .await?;
        answer.await.map_err(|_| session_closed())?
    }

    /// Stops the session. In-flight backend calls finish but their results are dropped.
    pub async fn close(&self) -> Result<()> {
        self.send(Command::Close).await
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| session_closed())
    }
}

fn session_closed() -> Error {
    Error::Unexpected("Search session is closed".to_string())
}

struct SessionActor {
    identity: Identity,
    service: Arc<dyn RecipeServiceTrait>,
    settings: SessionSettings,
    query: SearchQuery,
    recipes: Vec<Recipe>,
    generations: GenerationTracker,
    displayed_generation: u64,
    revision: u64,
    /// Only records with a write in flight have an entry.
    favorites: HashMap<String, OptimisticCell<bool>>,
    deadline: Option<Instant>,
    view_tx: watch::Sender<SearchView>,
    completion_tx: mpsc::UnboundedSender<Completion>,
}

impl SessionActor {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        debug!("Search session for {} started", self.identity.user_id);

        loop {
            let deadline = self.deadline;
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Close) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(completion) = completions.recv() => self.handle_completion(completion),
                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.deadline = None;
                    self.issue_fetch();
                }
            }
            self.publish();
        }

        debug!("Search session for {} closed", self.identity.user_id);
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Update(patch) => {
                let next = patch.apply_to(&self.query);
                if next != self.query {
                    self.query = next;
                    self.deadline = Some(Instant::now() + self.settings.debounce);
                }
            }
            Command::Refresh => {
                self.deadline = None;
                self.issue_fetch();
            }
            Command::ToggleFavorite { recipe_id, reply } => {
                let outcome = self.trigger_favorite(recipe_id);
                let _ = reply.send(outcome);
            }
            Command::Close => {}
        }
    }

    fn issue_fetch(&mut self) {
        let generation = self.generations.issue();
        debug!(
            "Search session for {} fetching generation {} with {}",
            self.identity.user_id,
            generation,
            self.query.to_filter()
        );

        let service = self.service.clone();
        let identity = self.identity.clone();
        let query = self.query.clone();
        let completions = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = service.search_recipes(&identity, &query).await;
            let _ = completions.send(Completion::Fetched { generation, result });
        });
    }

    fn trigger_favorite(&mut self, recipe_id: String) -> Result<FavoriteTrigger> {
        if self
            .favorites
            .get(&recipe_id)
            .is_some_and(|cell| cell.is_busy())
        {
            return Ok(FavoriteTrigger::Ignored);
        }
        let recipe = self
            .recipes
            .iter_mut()
            .find(|r| r.id == recipe_id)
            .ok_or_else(|| Error::not_found(format!("Recipe {} is not displayed", recipe_id)))?;

        let next = !recipe.is_favorite;
        let mut cell = OptimisticCell::new(recipe.is_favorite);
        cell.begin(next);
        recipe.is_favorite = next;
        self.favorites.insert(recipe_id.clone(), cell);

        let service = self.service.clone();
        let identity = self.identity.clone();
        let completions = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = service.set_favorite(&identity, &recipe_id, next).await;
            let _ = completions.send(Completion::FavoriteWritten { recipe_id, result });
        });

        Ok(FavoriteTrigger::Applied { is_favorite: next })
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Fetched { generation, result } => {
                if !self.generations.settle(generation) {
                    debug!("Discarding stale search results of generation {}", generation);
                    return;
                }
                match result {
                    Ok(mut recipes) => {
                        for recipe in recipes.iter_mut() {
                            if let Some(cell) = self.favorites.get(&recipe.id) {
                                recipe.is_favorite = *cell.get();
                            }
                        }
                        self.recipes = recipes;
                        self.displayed_generation = generation;
                    }
                    Err(e) => {
                        error!(
                            "Search for {} failed, keeping previous results: {}",
                            self.identity.user_id, e
                        );
                    }
                }
            }
            Completion::FavoriteWritten { recipe_id, result } => {
                let Some(mut cell) = self.favorites.remove(&recipe_id) else {
                    return;
                };
                cell.settle(&result);
                let value = *cell.get();
                match result {
                    Ok(_) => {
                        self.revision += 1;
                        info!("Recipe {} favorite set to {}", recipe_id, value);
                    }
                    Err(e) => {
                        warn!("Favorite toggle for recipe {} rolled back: {}", recipe_id, e);
                    }
                }
                if let Some(recipe) = self.recipes.iter_mut().find(|r| r.id == recipe_id) {
                    recipe.is_favorite = value;
                }
            }
        }
    }

    fn view(&self) -> SearchView {
        let mut busy: Vec<String> = self.favorites.keys().cloned().collect();
        busy.sort();
        SearchView {
            query: self.query.clone(),
            recipes: self.recipes.clone(),
            loading: self.generations.is_latest_pending(),
            generation: self.displayed_generation,
            revision: self.revision,
            busy,
        }
    }

    fn publish(&self) {
        let next = self.view();
        self.view_tx.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}
