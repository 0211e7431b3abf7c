use crate::traits::{Datastore, DatastoreError, DatastoreResult};
use crate::LocalDatastore;
use hearth_core::HearthConfig;
use std::path::PathBuf;
use std::sync::Arc;

/// Registry of configured datastores.
///
/// New uploads are persisted to the pick target; records carrying any
/// known `datastore_id` can be resolved back to a filesystem path.
#[derive(Clone)]
pub struct DatastoreSet {
    stores: Vec<Arc<dyn Datastore>>,
}

impl DatastoreSet {
    pub fn new(stores: Vec<Arc<dyn Datastore>>) -> DatastoreResult<Self> {
        if stores.is_empty() {
            return Err(DatastoreError::ConfigError(
                "At least one datastore must be configured".to_string(),
            ));
        }
        Ok(DatastoreSet { stores })
    }

    /// Datastore new uploads are persisted to.
    pub fn pick(&self) -> &Arc<dyn Datastore> {
        &self.stores[0]
    }

    /// Look up a datastore by id.
    pub fn get(&self, datastore_id: &str) -> DatastoreResult<&Arc<dyn Datastore>> {
        self.stores
            .iter()
            .find(|s| s.datastore_id() == datastore_id)
            .ok_or_else(|| DatastoreError::UnknownDatastore(datastore_id.to_string()))
    }

    /// Resolve a persisted `(datastore_id, location)` pair to an absolute
    /// filesystem path.
    pub fn resolve(&self, datastore_id: &str, location: &str) -> DatastoreResult<PathBuf> {
        self.get(datastore_id)?.resolve(location)
    }
}

/// Create the datastore set from configuration.
pub async fn create_datastores(config: &HearthConfig) -> DatastoreResult<DatastoreSet> {
    let local = LocalDatastore::new(
        config.datastore_id.clone(),
        PathBuf::from(&config.datastore_path),
    )
    .await?;
    DatastoreSet::new(vec![Arc::new(local)])
}
