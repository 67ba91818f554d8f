//! Prop Repository
//!
//! Abstract persistence seam for prop documents. The production store is an
//! external document database; `InMemoryPropRepository` backs tests and the
//! CLI.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use crate::engine::StatusPatch;
use crate::error::{LifecycleError, Result};
use crate::prop::Prop;

/// Persistence for prop documents
#[async_trait]
pub trait PropRepository: Send + Sync {
    /// Load a prop by ID
    async fn load(&self, prop_id: Uuid) -> Result<Prop>;

    /// Save a prop (insert or replace)
    async fn save(&self, prop: &Prop) -> Result<()>;

    /// Apply a status patch as one write: status, appended history entry,
    /// assignment and checkout. Must refuse the patch when the stored status
    /// no longer matches the entry's `previous_status`, or when history was
    /// appended since the patch was planned.
    async fn apply_patch(&self, patch: &StatusPatch) -> Result<Prop>;
}

/// In-memory repository keyed by prop ID
#[derive(Default)]
pub struct InMemoryPropRepository {
    props: RwLock<HashMap<Uuid, Prop>>,
}

impl InMemoryPropRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with existing props
    pub fn with_props(props: impl IntoIterator<Item = Prop>) -> Self {
        Self {
            props: RwLock::new(props.into_iter().map(|p| (p.id, p)).collect()),
        }
    }

    pub async fn len(&self) -> usize {
        self.props.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.props.read().await.is_empty()
    }
}

#[async_trait]
impl PropRepository for InMemoryPropRepository {
    async fn load(&self, prop_id: Uuid) -> Result<Prop> {
        self.props
            .read()
            .await
            .get(&prop_id)
            .cloned()
            .ok_or(LifecycleError::PropNotFound(prop_id))
    }

    async fn save(&self, prop: &Prop) -> Result<()> {
        self.props.write().await.insert(prop.id, prop.clone());
        Ok(())
    }

    async fn apply_patch(&self, patch: &StatusPatch) -> Result<Prop> {
        let mut props = self.props.write().await;
        let prop = props
            .get_mut(&patch.prop_id)
            .ok_or(LifecycleError::PropNotFound(patch.prop_id))?;

        let expected = patch.history_entry.previous_status;
        if prop.status != expected {
            warn!(
                prop_id = %patch.prop_id,
                expected = %expected,
                actual = %prop.status,
                "Refusing stale status patch"
            );
            return Err(LifecycleError::StaleStatus {
                prop_id: patch.prop_id,
                expected,
                actual: prop.status,
            });
        }

        let actual_len = prop.status_history.len();
        if actual_len != patch.base_history_len {
            warn!(
                prop_id = %patch.prop_id,
                expected = patch.base_history_len,
                actual = actual_len,
                "Refusing patch planned against older history"
            );
            return Err(LifecycleError::StaleHistory {
                prop_id: patch.prop_id,
                expected: patch.base_history_len,
                actual: actual_len,
            });
        }

        patch.apply_to(prop);
        Ok(prop.clone())
    }
}
