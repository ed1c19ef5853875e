use std::time::Duration;

use async_trait::async_trait;
use bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};

use crate::config::redact_uri;
use crate::error::{Error, Result};
use crate::storage::{Collection, DocumentStore};

/// How long to wait for a reachable server before giving up.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// MongoDB target.
pub struct MongoStore {
    database: Database,
    label: String,
}

impl MongoStore {
    /// Connect and ping the database, so an unreachable server or bad
    /// credentials fail here rather than on the first write.
    pub async fn connect(uri: &str, database_name: &str) -> Result<Self> {
        let redacted = redact_uri(uri);

        let mut options = ClientOptions::parse(uri).await.map_err(|e| {
            Error::Config(format!("invalid MongoDB connection string {redacted}: {e}"))
        })?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        // `serverSelectionTimeoutMS` in the URI wins over the default.
        if options.server_selection_timeout.is_none() {
            options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        }

        let client = Client::with_options(options)?;
        let database = client.database(database_name);
        database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| Error::Database(format!("cannot reach MongoDB at {redacted}: {e}")))?;

        log::info!("Connected to MongoDB at {redacted}, database '{database_name}'");
        Ok(Self {
            database,
            label: format!("{redacted} (database '{database_name}')"),
        })
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.database.collection(collection.name())
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn clear(&self, collection: Collection) -> Result<u64> {
        let result = self.collection(collection).delete_many(doc! {}, None).await?;
        Ok(result.deleted_count)
    }

    async fn insert_many(&self, collection: Collection, docs: Vec<Document>) -> Result<u64> {
        // The server rejects an empty batch.
        if docs.is_empty() {
            return Ok(0);
        }
        let result = self.collection(collection).insert_many(docs, None).await?;
        Ok(result.inserted_ids.len() as u64)
    }

    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<()> {
        self.collection(collection).insert_one(doc, None).await?;
        Ok(())
    }

    async fn count(&self, collection: Collection) -> Result<u64> {
        Ok(self.collection(collection).count_documents(doc! {}, None).await?)
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
