use std::sync::Arc;

use tracing::{info, instrument};
use validator::Validate;

use super::{Outcome, View};
use crate::client::InventoryBackend;
use crate::errors::ServiceError;
use crate::models::{Supplier, SupplierForm};

const DUPLICATE_EMAIL: &str = "Supplier with this email already exists.";

#[derive(Clone, Debug, Default)]
pub struct SupplierDraft {
    pub name: String,
    pub contact_email: String,
    pub phone: String,
    pub address: String,
}

impl SupplierDraft {
    /// Checks run in the order the user sees them: required fields, email, phone.
    pub fn into_form(self) -> Result<SupplierForm, ServiceError> {
        let form = SupplierForm {
            name: self.name.trim().to_string(),
            contact_email: self.contact_email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
        };

        if form.name.is_empty()
            || form.contact_email.is_empty()
            || form.phone.is_empty()
            || form.address.is_empty()
        {
            return Err(ServiceError::ValidationError(
                "Please fill out all required fields.".to_string(),
            ));
        }
        if let Err(errors) = form.validate() {
            let fields = errors.field_errors();
            let message = if fields.contains_key("contact_email") {
                "Please enter a valid email address."
            } else if fields.contains_key("phone") {
                "Please enter a valid phone number."
            } else {
                "Please fill out all required fields."
            };
            return Err(ServiceError::ValidationError(message.to_string()));
        }
        Ok(form)
    }
}

fn map_conflict(err: ServiceError, fallback: &str) -> ServiceError {
    match err {
        ServiceError::Conflict(_) => ServiceError::Conflict(DUPLICATE_EMAIL.to_string()),
        other => other.action_failed(fallback),
    }
}

#[derive(Clone)]
pub struct SupplierService {
    backend: Arc<dyn InventoryBackend>,
}

impl SupplierService {
    pub fn new(backend: Arc<dyn InventoryBackend>) -> Self {
        Self { backend }
    }

    pub async fn list(&self) -> Result<Vec<Supplier>, ServiceError> {
        self.backend.list_suppliers().await
    }

    #[instrument(skip(self))]
    pub async fn create(&self, draft: SupplierDraft) -> Result<Outcome, ServiceError> {
        let form = draft.into_form()?;
        self.backend
            .create_supplier(&form)
            .await
            .map_err(|e| map_conflict(e, "Failed to create supplier."))?;
        info!(email = %form.contact_email, "supplier created");
        Ok(Outcome::new("Supplier created successfully!", [View::Suppliers]))
    }

    #[instrument(skip(self))]
    pub async fn edit(
        &self,
        supplier_id: i64,
        draft: SupplierDraft,
    ) -> Result<Outcome, ServiceError> {
        let form = draft.into_form()?;
        self.backend
            .edit_supplier(supplier_id, &form)
            .await
            .map_err(|e| map_conflict(e, "Failed to update supplier."))?;
        Ok(Outcome::new(
            "Supplier updated successfully!",
            [View::Suppliers, View::Products],
        ))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, supplier_id: i64) -> Result<Outcome, ServiceError> {
        self.backend
            .delete_supplier(supplier_id)
            .await
            .map_err(|e| e.action_failed("Failed to delete supplier."))?;
        Ok(Outcome::new(
            "Supplier deleted successfully!",
            [View::Suppliers, View::Products],
        ))
    }
}
