use std::time::Duration;

use tracing::{error, info, warn};

use giftlist_types::{Gift, NewGift, ValidationError};

use crate::cache::LocalCache;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::fallback::{Failure, Plan, Policy, Step};
use crate::remote::RemoteClient;
use crate::store::KeyValueStore;
use crate::ui::{Notification, Ui};
use crate::view::ListView;

const MSG_ADDED: &str = "Gift added successfully! 🎉";
const MSG_DELETED: &str = "Suggestion deleted successfully!";
const MSG_MISSING_FIELDS: &str = "Please fill in the name and the gift!";
const MSG_INVALID_LINK: &str = "Please enter a valid link, or leave it empty.";
const MSG_ADD_FAILED: &str = "Could not save the gift. Please try again.";
const MSG_DELETE_FAILED: &str = "Could not delete. Please try again.";
const CONFIRM_DELETE: &str = "Are you sure you want to delete this suggestion?";

/// Which storage path served an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Remote,
    Cache,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    pub view: ListView,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub gift: Gift,
    pub source: Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(Source),
    Cancelled,
}

/// Runs load, submit and delete against the remote API when one is
/// configured, falling back to the local cache.
pub struct Controller<S, U> {
    remote: Option<RemoteClient>,
    cache: LocalCache<S>,
    ui: U,
    reload_delay: Duration,
}

impl<S: KeyValueStore, U: Ui> Controller<S, U> {
    pub fn new(config: &ClientConfig, store: S, ui: U) -> Self {
        if config.is_local_only() {
            info!("No API configured, running in local-only mode");
        }

        Self {
            remote: config.api_url.as_ref().map(RemoteClient::new),
            cache: LocalCache::new(store),
            ui,
            reload_delay: config.reload_delay,
        }
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn cache(&self) -> &LocalCache<S> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut LocalCache<S> {
        &mut self.cache
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    /// Fetch the list, mirror it into the cache when it came from the API,
    /// and render it newest first.
    pub async fn load(&mut self) -> Loaded {
        self.ui.show_loading();

        let mut plan = Plan::new(self.remote.is_some(), Policy::AnyFailure);
        let mut gifts = Vec::new();
        let mut source = Source::Cache;

        loop {
            match plan.step() {
                Step::TryRemote => {
                    let Some(remote) = &self.remote else {
                        plan.remote_failed(Failure::Connectivity);
                        continue;
                    };
                    match remote.list().await {
                        Ok(list) => {
                            if let Err(e) = self.cache.write_all(&list) {
                                error!("Failed to mirror gift list into local cache: {}", e);
                            }
                            gifts = list;
                            source = Source::Remote;
                            plan.remote_succeeded();
                        }
                        Err(e) => {
                            warn!("API unavailable, loading from local cache: {}", e);
                            plan.remote_failed(e.failure());
                        }
                    }
                }
                Step::Fallback => {
                    gifts = self.cache.read_all();
                    plan.fallback_finished();
                }
                Step::Done => break,
            }
        }

        let view = ListView::from_gifts(gifts);
        self.ui.render(&view);
        Loaded { view, source }
    }

    /// Validate and store a new suggestion, then reload the list.
    pub async fn submit(&mut self, input: NewGift) -> Result<Submitted, ClientError> {
        let gift = match input.validate() {
            Ok(gift) => gift,
            Err(e) => {
                let message = match e {
                    ValidationError::MissingFields => MSG_MISSING_FIELDS,
                    ValidationError::InvalidUrl => MSG_INVALID_LINK,
                };
                self.ui.notify(Notification::Error(message.into()));
                return Err(e.into());
            }
        };

        let mut plan = Plan::new(self.remote.is_some(), Policy::AnyFailure);
        let mut stored = None;
        let mut source = Source::Cache;

        loop {
            match plan.step() {
                Step::TryRemote => {
                    let Some(remote) = &self.remote else {
                        plan.remote_failed(Failure::Connectivity);
                        continue;
                    };
                    match remote.create(&gift).await {
                        Ok(created) => {
                            if let Err(e) = self.cache.insert(created.clone()) {
                                error!("Failed to mirror gift {} into local cache: {}", created.id, e);
                            }
                            stored = Some(created);
                            source = Source::Remote;
                            plan.remote_succeeded();
                        }
                        Err(e) => {
                            if !plan.remote_failed(e.failure()) {
                                self.ui.notify(Notification::Error(MSG_ADD_FAILED.into()));
                                return Err(e.into());
                            }
                            warn!("API create failed, saving locally: {}", e);
                        }
                    }
                }
                Step::Fallback => match self.cache.add_one(gift.clone()) {
                    Ok(created) => {
                        stored = Some(created);
                        plan.fallback_finished();
                    }
                    Err(e) => {
                        error!("Failed to save gift locally: {}", e);
                        self.ui.notify(Notification::Error(MSG_ADD_FAILED.into()));
                        return Err(e.into());
                    }
                },
                Step::Done => break,
            }
        }

        let Some(gift) = stored else {
            self.ui.notify(Notification::Error(MSG_ADD_FAILED.into()));
            return Err(ClientError::NotSaved);
        };

        info!("Gift {} saved ({:?})", gift.id, source);
        self.ui.reset_form();

        if !self.reload_delay.is_zero() {
            tokio::time::sleep(self.reload_delay).await;
        }
        self.load().await;
        self.ui.notify(Notification::Success(MSG_ADDED.into()));

        Ok(Submitted { gift, source })
    }

    /// Ask for confirmation, then remove the gift from whichever path holds it.
    /// A rejected remote delete leaves both paths untouched.
    pub async fn delete(&mut self, id: i64) -> Result<DeleteOutcome, ClientError> {
        if !self.ui.confirm(CONFIRM_DELETE) {
            return Ok(DeleteOutcome::Cancelled);
        }

        let mut plan = Plan::new(self.remote.is_some(), Policy::ConnectivityOnly);
        let mut source = Source::Cache;

        loop {
            match plan.step() {
                Step::TryRemote => {
                    let Some(remote) = &self.remote else {
                        plan.remote_failed(Failure::Connectivity);
                        continue;
                    };
                    match remote.delete(id).await {
                        Ok(()) => {
                            if let Err(e) = self.cache.remove_by_id(id) {
                                error!("Failed to drop gift {} from local cache: {}", id, e);
                            }
                            source = Source::Remote;
                            plan.remote_succeeded();
                        }
                        Err(e) => {
                            if !plan.remote_failed(e.failure()) {
                                error!("API refused to delete gift {}: {}", id, e);
                                self.ui.notify(Notification::Error(MSG_DELETE_FAILED.into()));
                                return Err(e.into());
                            }
                            warn!("API unreachable, deleting gift {} locally: {}", id, e);
                        }
                    }
                }
                Step::Fallback => {
                    let removed = match self.cache.remove_by_id(id) {
                        Ok(removed) => removed,
                        Err(e) => {
                            error!("Failed to delete gift {} locally: {}", id, e);
                            self.ui.notify(Notification::Error(MSG_DELETE_FAILED.into()));
                            return Err(e.into());
                        }
                    };
                    if !removed {
                        self.ui.notify(Notification::Error(MSG_DELETE_FAILED.into()));
                        return Err(ClientError::NotFound(id));
                    }
                    plan.fallback_finished();
                }
                Step::Done => break,
            }
        }

        info!("Gift {} deleted ({:?})", id, source);
        self.load().await;
        self.ui.notify(Notification::Success(MSG_DELETED.into()));
        Ok(DeleteOutcome::Deleted(source))
    }
}
