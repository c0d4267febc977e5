use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use parking_lot::RwLock;

use crate::settings::DatabaseSettings;

#[derive(Debug, thiserror::Error)]
pub enum DataStoreError {
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(#[source] mongodb::error::Error),

    #[error("Database unreachable: {0}")]
    Unreachable(#[source] mongodb::error::Error),

    #[error("Data store used before connect() completed")]
    NotConnected,
}

/// Owns the single connection to the document database shared by all requests.
///
/// Created unconnected, `connect` has to finish before any collection is handed out.
pub struct DataStore {
    settings: DatabaseSettings,
    database: RwLock<Option<Database>>,
}

impl DataStore {
    pub fn new(settings: DatabaseSettings) -> Self {
        Self {
            settings,
            database: RwLock::new(None),
        }
    }

    /// Creates a store and connects it in one go
    pub async fn connected(settings: DatabaseSettings) -> Result<Self, DataStoreError> {
        let store = Self::new(settings);
        store.connect().await?;
        Ok(store)
    }

    /// Establishes the connection and verifies it with a ping.
    /// Calling it again replaces the previous connection.
    pub async fn connect(&self) -> Result<(), DataStoreError> {
        let options = ClientOptions::parse(&self.settings.url)
            .await
            .map_err(DataStoreError::InvalidConnectionString)?;
        let client =
            Client::with_options(options).map_err(DataStoreError::InvalidConnectionString)?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(DataStoreError::Unreachable)?;

        let database = client.database(&self.settings.name);
        tracing::info!(database = %self.settings.name, "Connected to document store");
        *self.database.write() = Some(database);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.database.read().is_some()
    }

    /// Returns a typed handle to the named collection
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Result<Collection<T>, DataStoreError> {
        self.database
            .read()
            .as_ref()
            .map(|database| database.collection(name))
            .ok_or(DataStoreError::NotConnected)
    }

    pub fn settings(&self) -> &DatabaseSettings {
        &self.settings
    }
}
