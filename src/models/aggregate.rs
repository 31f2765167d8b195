//! # Organisation Aggregate
//!
//! API-facing shape of an organisation together with its HR contacts, plus
//! the request payloads clients send to create or update one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::FieldError;
use crate::models::{organisation, organisation_hr};
use crate::validation::Validator;

/// An organisation and the HR contacts it owns.
///
/// `id` and timestamps are `None` until the aggregate is first persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Organisation {
    #[schema(example = 1)]
    pub id: Option<i64>,
    #[schema(example = "Acme Institute")]
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub website: Option<String>,
    pub industry_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub hr_contacts: Vec<OrganisationHr>,
}

/// A human-resources contact belonging to exactly one organisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationHr {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    #[schema(example = "9876543210")]
    pub contact_number: String,
    pub designation: Option<String>,
    /// Back-reference to the owner, bound by [`Organisation::add_hr_contact`]
    #[serde(skip)]
    pub organisation_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Organisation {
    pub fn new(name: impl Into<String>, address: Option<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            address,
            city: None,
            state: None,
            country: None,
            pincode: None,
            website: None,
            industry_type: None,
            created_at: None,
            updated_at: None,
            is_active: true,
            hr_contacts: Vec::new(),
        }
    }

    /// Appends a contact and binds its back-reference to this organisation.
    pub fn add_hr_contact(&mut self, mut contact: OrganisationHr) {
        contact.organisation_id = self.id;
        self.hr_contacts.push(contact);
    }

    /// Detaches every contact; the store deletes the orphaned rows on save.
    pub fn clear_hr_contacts(&mut self) {
        self.hr_contacts.clear();
    }

    /// Rebuilds the aggregate from stored rows.
    pub fn from_models(model: organisation::Model, contacts: Vec<organisation_hr::Model>) -> Self {
        let mut contacts: Vec<OrganisationHr> =
            contacts.into_iter().map(OrganisationHr::from).collect();
        contacts.sort_by_key(|c| c.id);

        Self {
            id: Some(model.id),
            name: model.name,
            address: model.address,
            city: model.city,
            state: model.state,
            country: model.country,
            pincode: model.pincode,
            website: model.website,
            industry_type: model.industry_type,
            created_at: Some(model.created_at),
            updated_at: Some(model.updated_at),
            is_active: model.is_active,
            hr_contacts: contacts,
        }
    }

    /// Declared field constraints, checked by the store before every write.
    pub fn constraint_violations(&self) -> Vec<FieldError> {
        OrganisationPayload::from(self).field_errors()
    }
}

impl From<organisation_hr::Model> for OrganisationHr {
    fn from(model: organisation_hr::Model) -> Self {
        Self {
            id: Some(model.id),
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            contact_number: model.contact_number,
            designation: model.designation,
            organisation_id: Some(model.organisation_id),
            created_at: Some(model.created_at),
            updated_at: Some(model.updated_at),
        }
    }
}

/// Client-supplied organisation body for create and update.
///
/// Every field is optional at the wire level so that missing values surface as
/// field errors rather than deserialization failures. Ids and timestamps sent
/// by the client are not part of the payload and are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationPayload {
    #[schema(example = "Acme Institute")]
    pub name: Option<String>,
    #[schema(example = "1 Main St")]
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub website: Option<String>,
    pub industry_type: Option<String>,
    pub is_active: Option<bool>,
    pub hr_contacts: Option<Vec<HrContactPayload>>,
}

/// Client-supplied HR contact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HrContactPayload {
    /// Id of an existing contact of the same organisation to update in place
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[schema(example = "9876543210")]
    pub contact_number: Option<String>,
    pub designation: Option<String>,
}

impl OrganisationPayload {
    /// Returns every failing field, in declaration order.
    pub fn field_errors(&self) -> Vec<FieldError> {
        let mut v = Validator::new();
        v.not_blank("name", self.name.as_deref(), "Name is required")
            .max_chars(
                "name",
                self.name.as_deref(),
                50,
                "Name must not exceed 50 characters",
            )
            .max_chars(
                "address",
                self.address.as_deref(),
                100,
                "Address must not exceed 100 characters",
            );

        let optional = [
            ("city", &self.city, "City"),
            ("state", &self.state, "State"),
            ("country", &self.country, "Country"),
            ("pincode", &self.pincode, "Pincode"),
            ("website", &self.website, "Website"),
            ("industryType", &self.industry_type, "Industry type"),
        ];
        for (field, value, label) in optional {
            v.max_chars(
                field,
                value.as_deref(),
                255,
                &format!("{label} must not exceed 255 characters"),
            );
        }

        let mut errors = v.into_errors();
        for (index, contact) in self.contacts().iter().enumerate() {
            errors.extend(contact.field_errors(&format!("hrContacts[{index}].")));
        }
        errors
    }

    /// Nested contacts; an absent or null list counts as empty.
    pub fn contacts(&self) -> &[HrContactPayload] {
        self.hr_contacts.as_deref().unwrap_or_default()
    }

    /// Builds a fresh, unsaved aggregate; assumes the payload already validated.
    pub fn to_organisation(&self) -> Organisation {
        let mut organisation = Organisation::new(
            self.name.clone().unwrap_or_default(),
            self.address.clone(),
        );
        organisation.city = self.city.clone();
        organisation.state = self.state.clone();
        organisation.country = self.country.clone();
        organisation.pincode = self.pincode.clone();
        organisation.website = self.website.clone();
        organisation.industry_type = self.industry_type.clone();
        organisation.is_active = self.is_active.unwrap_or(true);
        organisation
    }
}

impl HrContactPayload {
    fn field_errors(&self, prefix: &str) -> Vec<FieldError> {
        let first_name = format!("{prefix}firstName");
        let email = format!("{prefix}email");
        let contact_number = format!("{prefix}contactNumber");

        let mut v = Validator::new();
        v.not_blank(
            &first_name,
            self.first_name.as_deref(),
            "First name is required",
        )
        .max_chars(
            &first_name,
            self.first_name.as_deref(),
            25,
            "First name must not exceed 25 characters",
        )
        .max_chars(
            &format!("{prefix}lastName"),
            self.last_name.as_deref(),
            25,
            "Last name must not exceed 25 characters",
        )
        .not_blank(&email, self.email.as_deref(), "Email is required")
        .email(&email, self.email.as_deref(), "Email should be valid")
        .max_chars(
            &email,
            self.email.as_deref(),
            50,
            "Email must not exceed 50 characters",
        )
        .not_blank(
            &contact_number,
            self.contact_number.as_deref(),
            "Contact number is required",
        )
        .ten_digits(
            &contact_number,
            self.contact_number.as_deref(),
            "Contact number must be a 10-digit number",
        )
        .max_chars(
            &format!("{prefix}designation"),
            self.designation.as_deref(),
            255,
            "Designation must not exceed 255 characters",
        );
        v.into_errors()
    }

    /// Builds an unsaved contact; `id` is left for the caller to decide.
    pub fn to_contact(&self) -> OrganisationHr {
        OrganisationHr {
            id: None,
            first_name: self.first_name.clone().unwrap_or_default(),
            last_name: self.last_name.clone(),
            email: self.email.clone().unwrap_or_default(),
            contact_number: self.contact_number.clone().unwrap_or_default(),
            designation: self.designation.clone(),
            organisation_id: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl From<&Organisation> for OrganisationPayload {
    fn from(organisation: &Organisation) -> Self {
        Self {
            name: Some(organisation.name.clone()),
            address: organisation.address.clone(),
            city: organisation.city.clone(),
            state: organisation.state.clone(),
            country: organisation.country.clone(),
            pincode: organisation.pincode.clone(),
            website: organisation.website.clone(),
            industry_type: organisation.industry_type.clone(),
            is_active: Some(organisation.is_active),
            hr_contacts: Some(
                organisation
                    .hr_contacts
                    .iter()
                    .map(|c| HrContactPayload {
                        id: c.id,
                        first_name: Some(c.first_name.clone()),
                        last_name: c.last_name.clone(),
                        email: Some(c.email.clone()),
                        contact_number: Some(c.contact_number.clone()),
                        designation: c.designation.clone(),
                    })
                    .collect(),
            ),
        }
    }
}
