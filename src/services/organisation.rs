//! Organisation use cases: list, get, create, update, delete, delete all.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::aggregate::{Organisation, OrganisationPayload};
use crate::repositories::OrganisationStore;

pub const NOT_FOUND_MESSAGE: &str = "Organisation not found";

#[derive(Clone)]
pub struct OrganisationService {
    store: Arc<dyn OrganisationStore>,
}

impl OrganisationService {
    pub fn new(store: Arc<dyn OrganisationStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Organisation>, AppError> {
        self.store.find_all().await
    }

    pub async fn get(&self, id: i64) -> Result<Organisation, AppError> {
        self.load(id).await
    }

    /// Persists a new organisation with its nested contacts. Client-supplied
    /// ids and timestamps never reach the store.
    pub async fn create(&self, input: OrganisationPayload) -> Result<Organisation, AppError> {
        validate(&input)?;

        let mut organisation = input.to_organisation();
        for contact in input.contacts() {
            organisation.add_hr_contact(contact.to_contact());
        }

        let saved = self.store.save(organisation).await?;
        tracing::info!(
            organisation_id = saved.id,
            contacts = saved.hr_contacts.len(),
            "Created organisation"
        );
        Ok(saved)
    }

    /// Overwrites `name` and `address` and replaces the contact collection.
    ///
    /// Contacts omitted from the input are deleted. An input contact whose id
    /// belongs to this organisation keeps that row; any other id is dropped and
    /// the contact is inserted as new.
    pub async fn update(
        &self,
        id: i64,
        input: OrganisationPayload,
    ) -> Result<Organisation, AppError> {
        validate(&input)?;

        let mut existing = self.load(id).await?;
        let owned: HashSet<i64> = existing.hr_contacts.iter().filter_map(|c| c.id).collect();

        existing.name = input.name.clone().unwrap_or_default();
        existing.address = input.address.clone();
        existing.clear_hr_contacts();
        for payload in input.contacts() {
            let mut contact = payload.to_contact();
            contact.id = payload.id.filter(|contact_id| owned.contains(contact_id));
            existing.add_hr_contact(contact);
        }

        let saved = self.store.save(existing).await?;
        tracing::info!(
            organisation_id = id,
            contacts = saved.hr_contacts.len(),
            "Updated organisation"
        );
        Ok(saved)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let existing = self.load(id).await?;
        self.store.delete(&existing).await?;
        tracing::info!(organisation_id = id, "Deleted organisation");
        Ok(())
    }

    /// Deletes every organisation one by one so each cascade runs.
    pub async fn delete_all(&self) -> Result<(), AppError> {
        let organisations = self.store.find_all().await?;
        let count = organisations.len();
        for organisation in &organisations {
            self.store.delete(organisation).await?;
        }
        tracing::info!(count, "Deleted all organisations");
        Ok(())
    }

    async fn load(&self, id: i64) -> Result<Organisation, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.to_string()))
    }
}

fn validate(input: &OrganisationPayload) -> Result<(), AppError> {
    let errors = input.field_errors();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::aggregate::HrContactPayload;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory store that records what the service hands it.
    #[derive(Default)]
    struct RecordingStore {
        saved: Mutex<Vec<Organisation>>,
        existing: Mutex<Option<Organisation>>,
        deleted: Mutex<Vec<i64>>,
    }

    #[async_trait]
    impl OrganisationStore for RecordingStore {
        async fn find_all(&self) -> Result<Vec<Organisation>, AppError> {
            Ok(self.existing.lock().unwrap().clone().into_iter().collect())
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Organisation>, AppError> {
            Ok(self
                .existing
                .lock()
                .unwrap()
                .clone()
                .filter(|o| o.id == Some(id)))
        }

        async fn save(&self, organisation: Organisation) -> Result<Organisation, AppError> {
            self.saved.lock().unwrap().push(organisation.clone());
            Ok(organisation)
        }

        async fn delete(&self, organisation: &Organisation) -> Result<(), AppError> {
            self.deleted.lock().unwrap().extend(organisation.id);
            Ok(())
        }

        async fn delete_all(&self) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn contact(id: Option<i64>, first: &str) -> HrContactPayload {
        HrContactPayload {
            id,
            first_name: Some(first.into()),
            email: Some(format!("{}@acme.com", first.to_lowercase())),
            contact_number: Some("9876543210".into()),
            ..HrContactPayload::default()
        }
    }

    fn stored_org() -> Organisation {
        let mut org = Organisation::new("Acme", Some("Old St".into()));
        org.id = Some(10);
        org.city = Some("Pune".into());
        for (id, name) in [(100, "Asha"), (101, "Ravi")] {
            let mut c = contact(None, name).to_contact();
            c.id = Some(id);
            org.add_hr_contact(c);
        }
        org
    }

    #[tokio::test]
    async fn create_rejects_invalid_input_before_store() {
        let store = Arc::new(RecordingStore::default());
        let service = OrganisationService::new(store.clone());

        let err = service
            .create(OrganisationPayload::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(ref e) if e[0].field == "name"));
        assert!(store.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_drops_client_contact_ids() {
        let store = Arc::new(RecordingStore::default());
        let service = OrganisationService::new(store.clone());

        service
            .create(OrganisationPayload {
                name: Some("Acme".into()),
                hr_contacts: Some(vec![contact(Some(55), "Asha")]),
                ..OrganisationPayload::default()
            })
            .await
            .unwrap();

        let saved = store.saved.lock().unwrap();
        assert_eq!(saved[0].id, None);
        assert_eq!(saved[0].hr_contacts[0].id, None);
        assert!(saved[0].is_active);
    }

    #[tokio::test]
    async fn update_overwrites_name_and_address_only() {
        let store = Arc::new(RecordingStore::default());
        *store.existing.lock().unwrap() = Some(stored_org());
        let service = OrganisationService::new(store.clone());

        service
            .update(
                10,
                OrganisationPayload {
                    name: Some("Acme Renamed".into()),
                    address: None,
                    city: Some("Ignored".into()),
                    ..OrganisationPayload::default()
                },
            )
            .await
            .unwrap();

        let saved = store.saved.lock().unwrap();
        assert_eq!(saved[0].name, "Acme Renamed");
        assert_eq!(saved[0].address, None);
        assert_eq!(saved[0].city.as_deref(), Some("Pune"));
        assert!(saved[0].hr_contacts.is_empty());
    }

    #[tokio::test]
    async fn update_keeps_only_owned_contact_ids() {
        let store = Arc::new(RecordingStore::default());
        *store.existing.lock().unwrap() = Some(stored_org());
        let service = OrganisationService::new(store.clone());

        service
            .update(
                10,
                OrganisationPayload {
                    name: Some("Acme".into()),
                    hr_contacts: Some(vec![contact(Some(101), "Ravi"), contact(Some(999), "Meera")]),
                    ..OrganisationPayload::default()
                },
            )
            .await
            .unwrap();

        let saved = store.saved.lock().unwrap();
        let ids: Vec<Option<i64>> = saved[0].hr_contacts.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![Some(101), None]);
        assert!(
            saved[0]
                .hr_contacts
                .iter()
                .all(|c| c.organisation_id == Some(10))
        );
    }

    #[tokio::test]
    async fn missing_organisation_short_circuits() {
        let store = Arc::new(RecordingStore::default());
        let service = OrganisationService::new(store.clone());
        let valid = OrganisationPayload {
            name: Some("Acme".into()),
            ..OrganisationPayload::default()
        };

        assert!(matches!(service.get(1).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            service.update(1, valid).await,
            Err(AppError::NotFound(ref m)) if m == NOT_FOUND_MESSAGE
        ));
        assert!(matches!(service.delete(1).await, Err(AppError::NotFound(_))));
        assert!(store.saved.lock().unwrap().is_empty());
        assert!(store.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn validation_precedes_lookup_on_update() {
        let service = OrganisationService::new(Arc::new(RecordingStore::default()));
        let err = service
            .update(404, OrganisationPayload::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_all_deletes_each_loaded_organisation() {
        let store = Arc::new(RecordingStore::default());
        *store.existing.lock().unwrap() = Some(stored_org());
        let service = OrganisationService::new(store.clone());

        service.delete_all().await.unwrap();
        assert_eq!(*store.deleted.lock().unwrap(), vec![10]);
    }
}
