//! Report upload

use crate::adapters::blob::ObjectStore;
use crate::domain::Result;
use std::sync::Arc;

/// Uploads rendered reports to object storage
pub struct ArtifactPublisher {
    store: Arc<dyn ObjectStore>,
}

impl ArtifactPublisher {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Creates `container` if needed and writes `content` at `object_path`,
    /// replacing any previous report at that path
    ///
    /// # Errors
    ///
    /// Storage failures are logged with the container and path, then returned
    /// unchanged.
    pub async fn publish(&self, container: &str, object_path: &str, content: &str) -> Result<()> {
        if let Err(e) = self.store.create_container_if_not_exists(container).await {
            tracing::error!(
                container = %container,
                path = %object_path,
                error = %e,
                "Failed to ensure report container exists"
            );
            return Err(e);
        }

        if let Err(e) = self
            .store
            .upload_overwrite(container, object_path, content.as_bytes())
            .await
        {
            tracing::error!(
                container = %container,
                path = %object_path,
                error = %e,
                "Failed to upload report"
            );
            return Err(e);
        }

        tracing::info!(
            container = %container,
            path = %object_path,
            bytes = content.len(),
            "{object_path} successfully uploaded to {container}"
        );

        Ok(())
    }
}
