//! Order creation payload and the upstream order record.
//!
//! Fixed fields (`payment_method`, `status`, ...) are always transmitted.
//! Optional fields that were never set are omitted from the body.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payment method recorded on orders placed through the storefront
pub const DEFAULT_PAYMENT_METHOD: &str = "cod";
/// Title shown for [`DEFAULT_PAYMENT_METHOD`]
pub const DEFAULT_PAYMENT_METHOD_TITLE: &str = "manual confirmation via chat";
/// Orders wait for operator confirmation
pub const DEFAULT_ORDER_STATUS: &str = "on-hold";
/// Guest customer
pub const GUEST_CUSTOMER_ID: u64 = 0;

/// Order validation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderValidationError {
    #[error("order must contain at least one line item")]
    NoLineItems,
    #[error("line item {index}: quantity must be greater than 0, got {quantity}")]
    NonPositiveQuantity { index: usize, quantity: i64 },
    #[error("{field}: '{value}' is not a valid email address")]
    InvalidEmail { field: &'static str, value: String },
}

/// Billing or shipping address fragment. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Address {
    pub fn name(mut self, first: impl Into<String>, last: Option<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = last;
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    fn validate(&self, field: &'static str) -> Result<(), OrderValidationError> {
        match self.email.as_deref() {
            Some(email) if !is_plausible_email(email) => Err(OrderValidationError::InvalidEmail {
                field,
                value: email.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// `local@domain.tld`, no whitespace.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty() && !tld.is_empty() && !domain.starts_with('.')
        }
        None => false,
    }
}

/// Line item of a new order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: u64,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<u64>,
}

impl LineItem {
    pub fn new(product_id: u64, quantity: i64) -> Self {
        Self {
            product_id,
            quantity,
            variation_id: None,
        }
    }

    pub fn variation(mut self, variation_id: u64) -> Self {
        self.variation_id = Some(variation_id);
        self
    }
}

/// Order metadata entry. Keys may repeat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub key: String,
    pub value: Value,
}

impl MetaData {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            id: None,
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Body of `POST orders`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreateRequest {
    pub payment_method: String,
    pub payment_method_title: String,
    pub set_paid: bool,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Address>,
    pub line_items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_note: Option<String>,
    pub customer_id: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta_data: Vec<MetaData>,
}

impl OrderCreateRequest {
    /// Guest order awaiting manual confirmation.
    pub fn new(line_items: Vec<LineItem>) -> Self {
        Self {
            payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
            payment_method_title: DEFAULT_PAYMENT_METHOD_TITLE.to_string(),
            set_paid: false,
            status: DEFAULT_ORDER_STATUS.to_string(),
            billing: None,
            shipping: None,
            line_items,
            customer_note: None,
            customer_id: GUEST_CUSTOMER_ID,
            meta_data: Vec::new(),
        }
    }

    pub fn billing(mut self, address: Address) -> Self {
        self.billing = Some(address);
        self
    }

    pub fn shipping(mut self, address: Address) -> Self {
        self.shipping = Some(address);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.customer_note = Some(note.into());
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta_data.push(MetaData::new(key, value));
        self
    }

    pub fn validate(&self) -> Result<(), OrderValidationError> {
        if self.line_items.is_empty() {
            return Err(OrderValidationError::NoLineItems);
        }
        for (index, item) in self.line_items.iter().enumerate() {
            if item.quantity <= 0 {
                return Err(OrderValidationError::NonPositiveQuantity {
                    index,
                    quantity: item.quantity,
                });
            }
        }
        if let Some(billing) = &self.billing {
            billing.validate("billing.email")?;
        }
        if let Some(shipping) = &self.shipping {
            shipping.validate("shipping.email")?;
        }
        Ok(())
    }
}

/// Created order as returned upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: u64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub total: Option<String>,
    #[serde(default)]
    pub order_key: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub customer_note: Option<String>,
    /// Every other field of the response
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
