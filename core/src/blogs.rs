//! Blog collection synchronizer.
//!
//! # Design
//! The synchronizer caches the result of the last successful `list` and
//! nothing else. Mutations go to the backend and report success or failure;
//! they never patch the cached collection, because the server computes
//! fields (`createdAt`, normalized `slug`) the client cannot predict. After a
//! successful mutation the caller re-lists.
//!
//! Writes borrow the `SessionManager` and read the token from its store when
//! the request is built; the synchronizer never keeps a copy.
//!
//! Overlapping list calls are not cancelled: whichever response is applied
//! last wins, which can show a stale collection if responses are reordered.

use tracing::{debug, info};

use crate::client::BlogClient;
use crate::config::ClientConfig;
use crate::error::OperationError;
use crate::http::{send_checked, HttpMethod, Transport};
use crate::mutation;
use crate::session::{SessionManager, SessionStore};
use crate::types::{Blog, BlogDraft};

/// Load state of the collection view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Loading,
    Ready,
    Failed(OperationError),
}

#[derive(Debug, Clone)]
pub struct BlogSynchronizer {
    client: BlogClient,
    state: SyncState,
    blogs: Vec<Blog>,
}

impl BlogSynchronizer {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: BlogClient::new(base_url),
            state: SyncState::Idle,
            blogs: Vec::new(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    /// The last successfully listed collection. Survives later failures.
    pub fn blogs(&self) -> &[Blog] {
        &self.blogs
    }

    /// Fetch the full collection and replace the cached one.
    ///
    /// A 2xx response with an unexpected shape yields an empty collection.
    /// On failure the previous collection stays visible and the state moves
    /// to `Failed`.
    pub fn list<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<&[Blog], OperationError> {
        self.state = SyncState::Loading;
        let fetched = send_checked(transport, self.client.build_list_blogs())
            .and_then(|response| self.client.parse_list_blogs(response));
        match fetched {
            Ok(blogs) => {
                debug!(count = blogs.len(), "blog list refreshed");
                self.blogs = blogs;
                self.state = SyncState::Ready;
                Ok(self.blogs.as_slice())
            }
            Err(err) => {
                self.state = SyncState::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Load one post, e.g. to prefill the edit form.
    pub fn fetch<T: Transport + ?Sized>(&self, transport: &mut T, id: &str) -> Result<Blog, OperationError> {
        let response = send_checked(transport, self.client.build_get_blog(id))?;
        self.client.parse_get_blog(response)
    }

    pub fn create<T: Transport + ?Sized, S: SessionStore>(
        &self,
        transport: &mut T,
        sessions: &SessionManager<S>,
        draft: &BlogDraft,
    ) -> Result<(), OperationError> {
        let token = sessions.require_token()?;
        let request = self.client.build_create_blog(&token, &draft.to_payload())?;
        let response = send_checked(transport, request)?;
        self.client.parse_mutation(response)?;
        info!(slug = %draft.slug, "blog created");
        Ok(())
    }

    pub fn update<T: Transport + ?Sized, S: SessionStore>(
        &self,
        transport: &mut T,
        sessions: &SessionManager<S>,
        id: &str,
        draft: &BlogDraft,
    ) -> Result<(), OperationError> {
        let token = sessions.require_token()?;
        let request = self.client.build_update_blog(&token, id, &draft.to_payload())?;
        let response = send_checked(transport, request)?;
        self.client.parse_mutation(response)?;
        info!(id, "blog updated");
        Ok(())
    }

    /// Delete a post. Confirmation is the caller's responsibility.
    pub fn delete<T: Transport + ?Sized, S: SessionStore>(
        &self,
        transport: &mut T,
        sessions: &SessionManager<S>,
        id: &str,
    ) -> Result<(), OperationError> {
        let token = sessions.require_token()?;
        let response = send_checked(transport, self.client.build_delete_blog(&token, id))?;
        self.client.parse_mutation(response)?;
        info!(id, "blog deleted");
        Ok(())
    }

    /// Flip the published flag: PATCH first, PUT if the backend has no PATCH
    /// route for the resource.
    pub fn toggle_publish<T: Transport + ?Sized, S: SessionStore>(
        &self,
        transport: &mut T,
        sessions: &SessionManager<S>,
        id: &str,
        current_published: bool,
    ) -> Result<(), OperationError> {
        let token = sessions.require_token()?;
        let published = !current_published;
        let request = self.client.build_set_published(&token, id, published)?;
        let response = mutation::execute(transport, request, HttpMethod::Patch, HttpMethod::Put)?;
        self.client.parse_mutation(response)?;
        info!(id, published, "blog publish state changed");
        Ok(())
    }
}
