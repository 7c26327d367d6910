use serde::Serialize;

use crate::store::Store;
use crate::update::{
    APPLICATIONS, APP_FIELD, APP_INDEX, FORMS, PROJECTS, PROJECT_INDEX, ROLES,
};

/// Post-update state of a single collection carrying a project reference.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
    pub app_index_gone: bool,
    pub project_index_present: bool,
    /// Documents that still carry the old app field.
    pub documents_still_on_app: u64,
}

impl CollectionReport {
    pub fn ok(&self) -> bool {
        self.app_index_gone && self.project_index_present && self.documents_still_on_app == 0
    }
}

/// Read-only snapshot of everything the update should have left behind.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub projects_present: bool,
    pub applications_gone: bool,
    pub forms: CollectionReport,
    pub roles: CollectionReport,
}

impl Report {
    pub fn ok(&self) -> bool {
        self.projects_present && self.applications_gone && self.forms.ok() && self.roles.ok()
    }
}

/// Checks the database against the post-update schema without mutating
/// anything. Useful after a run of the update and before pointing the app
/// at the database again.
pub async fn verify<S: Store + ?Sized>(store: &S) -> anyhow::Result<Report> {
    let names = store.collection_names().await?;

    let forms = verify_collection(store, FORMS).await?;
    let roles = verify_collection(store, ROLES).await?;

    Ok(Report {
        projects_present: names.iter().any(|n| n == PROJECTS),
        applications_gone: !names.iter().any(|n| n == APPLICATIONS),
        forms,
        roles,
    })
}

async fn verify_collection<S: Store + ?Sized>(
    store: &S,
    collection: &str,
) -> anyhow::Result<CollectionReport> {
    let indexes = store.index_names(collection).await?;
    let still_on_app = store.count_with_field(collection, APP_FIELD).await?;

    Ok(CollectionReport {
        app_index_gone: !indexes.iter().any(|n| n == APP_INDEX),
        project_index_present: indexes.iter().any(|n| n == PROJECT_INDEX),
        documents_still_on_app: still_on_app,
    })
}

#[cfg(test)]
mod tests {
    use crate::store::MockStore;

    use super::*;

    #[tokio::test]
    async fn test_verify_passes_on_migrated_database() -> anyhow::Result<()> {
        let mut store = MockStore::new();
        store.expect_collection_names().returning(|| {
            Ok(vec![
                "projects".to_string(),
                "forms".to_string(),
                "roles".to_string(),
            ])
        });
        store
            .expect_index_names()
            .returning(|_| Ok(vec!["_id_".to_string(), "project_1".to_string()]));
        store.expect_count_with_field().returning(|_, _| Ok(0));

        let report = verify(&store).await?;
        assert!(report.ok());
        Ok(())
    }

    #[tokio::test]
    async fn test_verify_flags_leftover_app_state() -> anyhow::Result<()> {
        let mut store = MockStore::new();
        store.expect_collection_names().returning(|| {
            Ok(vec![
                "applications".to_string(),
                "projects".to_string(),
                "forms".to_string(),
                "roles".to_string(),
            ])
        });
        store
            .expect_index_names()
            .returning(|_| Ok(vec!["_id_".to_string(), "app_1".to_string()]));
        store.expect_count_with_field().returning(|_, _| Ok(3));

        let report = verify(&store).await?;
        assert!(!report.ok());
        assert!(!report.applications_gone);
        assert!(report.projects_present);
        assert!(!report.forms.app_index_gone);
        assert!(!report.forms.project_index_present);
        assert_eq!(report.forms.documents_still_on_app, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_verify_checks_forms_and_roles_separately() -> anyhow::Result<()> {
        let mut store = MockStore::new();
        store
            .expect_collection_names()
            .returning(|| Ok(vec!["projects".to_string()]));
        // forms is done, roles still has the old index
        store
            .expect_index_names()
            .withf(|c| c == FORMS)
            .returning(|_| Ok(vec!["_id_".to_string(), "project_1".to_string()]));
        store
            .expect_index_names()
            .withf(|c| c == ROLES)
            .returning(|_| Ok(vec!["_id_".to_string(), "app_1".to_string()]));
        store.expect_count_with_field().returning(|_, _| Ok(0));

        let report = verify(&store).await?;
        assert!(report.forms.ok());
        assert!(!report.roles.ok());
        Ok(())
    }
}
