use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::validation::{email_rule, phone_rule};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Supplier {
    pub supplier_id: i64,
    pub name: String,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl Supplier {
    /// `Name (email)` label used wherever a product shows its supplier.
    pub fn label(&self) -> String {
        let email = self
            .contact_email
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or("No email");
        format!("{} ({})", self.name, email)
    }
}

/// Body for `POST /suppliers/create_supplier` and `PUT /suppliers/edit_supplier/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SupplierForm {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(custom = "email_rule")]
    pub contact_email: String,

    #[validate(custom = "phone_rule")]
    pub phone: String,

    #[validate(length(min = 1))]
    pub address: String,
}
