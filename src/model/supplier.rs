use serde::{Deserialize, Serialize};

use super::require;
use crate::error::Result;
use crate::store::Record;
use crate::view::{Dated, Searchable};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Supplier {
    pub id: u32,
    pub name: String,
    pub contact: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub bank: String,
    #[serde(default)]
    pub bank_account_number: String,
    #[serde(default)]
    pub bank_account_name: String,
    /// Leaf delivered to date, in kilograms
    #[serde(default)]
    pub total_collected_kg: f64,
    /// Amount paid out to date
    #[serde(default)]
    pub total_paid: f64,
}

impl Record for Supplier {
    const KIND: &'static str = "Supplier";

    fn id(&self) -> u32 {
        self.id
    }
}

impl Searchable for Supplier {
    fn search_field(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl Dated for Supplier {}

/// Registration form for a new supplier
#[derive(Debug, Clone, Default)]
pub struct NewSupplier {
    pub name: String,
    pub contact: String,
    pub address: String,
    pub bank: String,
    pub bank_account_number: String,
    pub bank_account_name: String,
}

impl NewSupplier {
    pub fn validate(&self) -> Result<()> {
        require("Name", &self.name)?;
        require("Contact", &self.contact)?;
        Ok(())
    }

    /// New suppliers start with nothing collected and nothing paid.
    pub fn into_supplier(self, id: u32) -> Supplier {
        let bank_account_name = if self.bank_account_name.trim().is_empty() {
            self.name.trim().to_string()
        } else {
            self.bank_account_name.trim().to_string()
        };
        Supplier {
            id,
            name: self.name.trim().to_string(),
            contact: self.contact.trim().to_string(),
            address: self.address.trim().to_string(),
            bank: self.bank.trim().to_string(),
            bank_account_number: self.bank_account_number.trim().to_string(),
            bank_account_name,
            total_collected_kg: 0.0,
            total_paid: 0.0,
        }
    }
}

/// Edit form: only the fields that are set are merged into the record.
#[derive(Debug, Clone, Default)]
pub struct SupplierPatch {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub bank: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_account_name: Option<String>,
}

impl SupplierPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.contact.is_none()
            && self.address.is_none()
            && self.bank.is_none()
            && self.bank_account_number.is_none()
            && self.bank_account_name.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            require("Name", name)?;
        }
        if let Some(contact) = &self.contact {
            require("Contact", contact)?;
        }
        Ok(())
    }

    pub fn apply(self, supplier: &mut Supplier) {
        let fields = [
            (self.name, &mut supplier.name),
            (self.contact, &mut supplier.contact),
            (self.address, &mut supplier.address),
            (self.bank, &mut supplier.bank),
            (self.bank_account_number, &mut supplier.bank_account_number),
            (self.bank_account_name, &mut supplier.bank_account_name),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value.trim().to_string();
            }
        }
    }
}

/// Built-in registry used until something has been saved.
pub fn sample_suppliers() -> Vec<Supplier> {
    let rows = [
        (
            "Sanath Nishantha",
            "0714442389",
            "202/1 Ambathanna, Galle.",
            "DFCC Bank",
            "1234567890123456",
            500.0,
            100_000.0,
        ),
        (
            "Hashan Hewage",
            "0718890365",
            "104/1 Molpe Rd. Theldeniya, Galle.",
            "Sampath Bank",
            "9876543210987654",
            490.0,
            95_000.0,
        ),
        (
            "Arul Suresh",
            "0766742389",
            "202/4 Ambathanna, Galle.",
            "BOC Bank",
            "5555666677778888",
            780.0,
            160_000.0,
        ),
        (
            "Sumana Nishanthi",
            "0723349512",
            "22/2 Nittambuwa, Galle.",
            "Commercial",
            "1111222233334444",
            1100.0,
            235_400.0,
        ),
        (
            "Kusumlatha",
            "0756088993",
            "89/2 Hatapitiya Dullawa, Galle.",
            "BOC Bank",
            "9999888877776666",
            562.0,
            102_580.0,
        ),
    ];

    rows.into_iter()
        .zip(1..)
        .map(
            |((name, contact, address, bank, account, collected, paid), id)| Supplier {
                id,
                name: name.to_string(),
                contact: contact.to_string(),
                address: address.to_string(),
                bank: bank.to_string(),
                bank_account_number: account.to_string(),
                bank_account_name: name.to_string(),
                total_collected_kg: collected,
                total_paid: paid,
            },
        )
        .collect()
}
