use thiserror::Error;
use tracing::info;

use crate::store::Store;

pub const APPLICATIONS: &str = "applications";
pub const PROJECTS: &str = "projects";
pub const FORMS: &str = "forms";
pub const ROLES: &str = "roles";

pub const APP_FIELD: &str = "app";
pub const PROJECT_FIELD: &str = "project";
pub const APP_INDEX: &str = "app_1";
pub const PROJECT_INDEX: &str = "project_1";

/// Wraps whatever the database reported for the step that failed.
/// No classification or retry happens here; the raw driver error stays
/// reachable through the source chain.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("could not rename collection {from} to {to}")]
    Rename {
        from: &'static str,
        to: &'static str,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("could not drop index {index} on {collection}")]
    IndexDrop {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("could not rename field {from} to {to} on {collection}")]
    FieldRename {
        collection: &'static str,
        from: &'static str,
        to: &'static str,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("could not create index on {collection}.{field}")]
    IndexCreate {
        collection: &'static str,
        field: &'static str,
        #[source]
        source: mongodb::error::Error,
    },
}

/// Applies the whole update: applications, then forms, then roles.
///
/// Phases run strictly in order and the first error aborts everything
/// that follows. There is no rollback; a failed run leaves the database
/// in whatever state the failed phase reached. Running twice is expected
/// to fail in [`update_applications`] since there is no applications
/// collection left to rename.
pub async fn apply<S: Store + ?Sized>(store: &S) -> Result<(), UpdateError> {
    update_applications(store).await?;
    update_forms(store).await?;
    update_roles(store).await?;
    Ok(())
}

/// Renames the applications collection to projects in place. Documents and
/// the remaining indexes ride along; the rename is a single atomic
/// operation at the storage layer.
pub async fn update_applications<S: Store + ?Sized>(store: &S) -> Result<(), UpdateError> {
    store
        .rename_collection(APPLICATIONS, PROJECTS)
        .await
        .map_err(|source| UpdateError::Rename {
            from: APPLICATIONS,
            to: PROJECTS,
            source,
        })?;

    info!(from = APPLICATIONS, to = PROJECTS, "collection renamed");
    Ok(())
}

pub async fn update_forms<S: Store + ?Sized>(store: &S) -> Result<(), UpdateError> {
    swap_reference(store, FORMS).await
}

pub async fn update_roles<S: Store + ?Sized>(store: &S) -> Result<(), UpdateError> {
    swap_reference(store, ROLES).await
}

/// Moves a collection's project reference from the app field to the
/// project field:
///   1. drop the app_1 index
///   2. $rename app to project on every document (multi, no filter)
///   3. index the project field
/// Each sub-step runs only if the previous one succeeded.
async fn swap_reference<S: Store + ?Sized>(
    store: &S,
    collection: &'static str,
) -> Result<(), UpdateError> {
    store
        .drop_index(collection, APP_INDEX)
        .await
        .map_err(|source| UpdateError::IndexDrop {
            collection,
            index: APP_INDEX,
            source,
        })?;

    store
        .rename_field(collection, APP_FIELD, PROJECT_FIELD)
        .await
        .map_err(|source| UpdateError::FieldRename {
            collection,
            from: APP_FIELD,
            to: PROJECT_FIELD,
            source,
        })?;

    store
        .create_index(collection, PROJECT_FIELD)
        .await
        .map_err(|source| UpdateError::IndexCreate {
            collection,
            field: PROJECT_FIELD,
            source,
        })?;

    info!(collection = collection, "reference moved to project field");
    Ok(())
}
