use async_trait::async_trait;
use bson::{doc, Document};
use mongodb::{error::Result, Client, Collection, Database, IndexModel};

/// Database operations the update consumes, per collection.
///
/// Kept behind a trait so tests can assert ordering and short-circuiting
/// without a running mongodb instance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    async fn rename_collection(&self, from: &str, to: &str) -> Result<()>;

    async fn drop_index(&self, collection: &str, index: &str) -> Result<()>;

    /// Renames a field on every document of the collection, no filter.
    /// Not atomic across documents; a failure partway through can leave
    /// some documents renamed and others not.
    async fn rename_field(&self, collection: &str, from: &str, to: &str) -> Result<()>;

    /// Creates a single-field ascending index.
    async fn create_index(&self, collection: &str, field: &str) -> Result<()>;

    async fn collection_names(&self) -> Result<Vec<String>>;

    async fn index_names(&self, collection: &str) -> Result<Vec<String>>;

    async fn count_with_field(&self, collection: &str, field: &str) -> Result<u64>;
}

/// Store implementation backed by a live mongodb connection.
pub struct MongoStore {
    db: Database,
    admin: Database,
    name: String,
}

impl MongoStore {
    pub fn new(client: &Client, database: &str) -> Self {
        Self {
            db: client.database(database),
            admin: client.database("admin"),
            name: database.to_string(),
        }
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn rename_collection(&self, from: &str, to: &str) -> Result<()> {
        // renameCollection only exists as an admin command and wants
        // database-qualified namespaces on both sides.
        self.admin
            .run_command(
                doc! {
                    "renameCollection": format!("{}.{}", self.name, from),
                    "to": format!("{}.{}", self.name, to),
                },
                None,
            )
            .await?;
        Ok(())
    }

    async fn drop_index(&self, collection: &str, index: &str) -> Result<()> {
        self.collection(collection).drop_index(index, None).await
    }

    async fn rename_field(&self, collection: &str, from: &str, to: &str) -> Result<()> {
        self.collection(collection)
            .update_many(doc! {}, doc! { "$rename": { from: to } }, None)
            .await?;
        Ok(())
    }

    async fn create_index(&self, collection: &str, field: &str) -> Result<()> {
        let model = IndexModel::builder().keys(doc! { field: 1 }).build();
        self.collection(collection).create_index(model, None).await?;
        Ok(())
    }

    async fn collection_names(&self) -> Result<Vec<String>> {
        self.db.list_collection_names(None).await
    }

    async fn index_names(&self, collection: &str) -> Result<Vec<String>> {
        self.collection(collection).list_index_names().await
    }

    async fn count_with_field(&self, collection: &str, field: &str) -> Result<u64> {
        self.collection(collection)
            .count_documents(doc! { field: { "$exists": true } }, None)
            .await
    }
}
