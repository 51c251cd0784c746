//! Receipt request model and validation
//!
//! Validation is a pure function of the request body and always runs before
//! the printer is touched.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Number, Value};

use super::error::{PrintJobError, PrintJobResult};
use super::money::decimal_from_json;

pub const DEFAULT_SHOP_NAME: &str = "Shop Receipt";
pub const DEFAULT_CUSTOMER_NAME: &str = "Guest";
pub const DEFAULT_CUSTOMER_PHONE: &str = "N/A";
pub const DEFAULT_FOOTER: &str = "Thank you for your business!";

/// One ordered product
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
}

impl LineItem {
    /// quantity × unit price, unrounded
    ///
    /// Saturates at `Decimal::MAX`; validated items never get there.
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity).saturating_mul(self.price)
    }
}

/// A validated receipt
///
/// Optional fields hold `None` when absent or empty; the accessors apply the
/// printed defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptRequest {
    pub shop_name: Option<String>,
    /// orderNumber if given, otherwise orderId
    pub order_ref: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub order_date: Option<String>,
    pub items: Vec<LineItem>,
    pub total: Decimal,
    pub footer: Option<String>,
}

/// String fields may arrive as JSON strings or numbers
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(Number),
}

impl Scalar {
    fn into_text(self) -> Option<String> {
        let text = match self {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
        };
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    shop_name: Option<Scalar>,
    order_id: Option<Scalar>,
    customer_name: Option<Scalar>,
    customer_phone: Option<Scalar>,
    order_date: Option<Scalar>,
    items: Vec<Value>,
    total: Option<Value>,
    footer: Option<Scalar>,
    order_number: Option<Scalar>,
}

impl ReceiptRequest {
    /// Validate a request body
    pub fn from_json(body: &Value) -> PrintJobResult<Self> {
        if !body.get("items").is_some_and(Value::is_array) {
            return Err(PrintJobError::validation("Invalid items array"));
        }

        let raw = RawReceipt::deserialize(body)
            .map_err(|e| PrintJobError::validation(format!("Invalid receipt: {}", e)))?;

        let items = raw
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| parse_item(index, item))
            .collect::<PrintJobResult<Vec<_>>>()?;

        let order_ref = raw
            .order_number
            .and_then(Scalar::into_text)
            .or_else(|| raw.order_id.and_then(Scalar::into_text))
            .ok_or_else(|| PrintJobError::validation("orderId or orderNumber is required"))?;

        Ok(Self {
            shop_name: raw.shop_name.and_then(Scalar::into_text),
            order_ref,
            customer_name: raw.customer_name.and_then(Scalar::into_text),
            customer_phone: raw.customer_phone.and_then(Scalar::into_text),
            order_date: raw.order_date.and_then(Scalar::into_text),
            items,
            total: parse_total(raw.total.as_ref())?,
            footer: raw.footer.and_then(Scalar::into_text),
        })
    }

    pub fn shop_name(&self) -> &str {
        self.shop_name.as_deref().unwrap_or(DEFAULT_SHOP_NAME)
    }

    pub fn customer_name(&self) -> &str {
        self.customer_name.as_deref().unwrap_or(DEFAULT_CUSTOMER_NAME)
    }

    pub fn customer_phone(&self) -> &str {
        self.customer_phone.as_deref().unwrap_or(DEFAULT_CUSTOMER_PHONE)
    }

    pub fn footer(&self) -> &str {
        self.footer.as_deref().unwrap_or(DEFAULT_FOOTER)
    }
}

fn parse_item(index: usize, item: &Value) -> PrintJobResult<LineItem> {
    let invalid = |what: &str| PrintJobError::validation(format!("items[{}]: {}", index, what));

    if !item.is_object() {
        return Err(invalid("must be an object"));
    }

    let name = item
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("name must be a string"))?
        .to_string();

    let quantity = item
        .get("quantity")
        .and_then(whole_number)
        .filter(|q| *q > 0)
        .and_then(|q| u32::try_from(q).ok())
        .ok_or_else(|| invalid("quantity must be a positive integer"))?;

    let price = item
        .get("price")
        .and_then(Value::as_number)
        .and_then(decimal_from_json)
        .filter(|p| *p >= Decimal::ZERO)
        .ok_or_else(|| invalid("price must be a non-negative number"))?;

    if Decimal::from(quantity).checked_mul(price).is_none() {
        return Err(invalid("line total out of range"));
    }

    Ok(LineItem {
        name,
        quantity,
        price,
    })
}

/// Integers, and floats with no fractional part (`2.0`)
fn whole_number(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}

/// Missing or null totals print as zero
fn parse_total(total: Option<&Value>) -> PrintJobResult<Decimal> {
    match total {
        None | Some(Value::Null) => Ok(Decimal::ZERO),
        Some(Value::Number(n)) => decimal_from_json(n)
            .filter(|t| *t >= Decimal::ZERO)
            .ok_or_else(|| PrintJobError::validation("total must be a non-negative number")),
        Some(_) => Err(PrintJobError::validation("total must be a number")),
    }
}
