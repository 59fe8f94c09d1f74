//! Add and edit forms: raw text in, validated payloads out.

use crate::domain::{ProductCreate, ProductPatch};
use crate::error::ValidationError;

/// The add-product form as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub stock: String,
    pub low_stock_threshold: String,
    pub category: String,
}

impl ProductForm {
    /// An empty threshold falls back to `default_threshold`.
    pub fn validate(&self, default_threshold: u32) -> Result<ProductCreate, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::Required("name"));
        }
        let low_stock_threshold = if self.low_stock_threshold.trim().is_empty() {
            default_threshold
        } else {
            parse_count("threshold", &self.low_stock_threshold)?
        };

        Ok(ProductCreate {
            name: name.to_string(),
            price: parse_price(&self.price)?,
            stock: parse_count("stock", &self.stock)?,
            low_stock_threshold,
            category: self.category.trim().to_string(),
        })
    }

    /// Sets a field by its shell key (`name`, `price`, `stock`, `threshold`, `category`).
    pub fn set(&mut self, key: &str, value: String) -> Result<(), ValidationError> {
        match key {
            "name" => self.name = value,
            "price" => self.price = value,
            "stock" => self.stock = value,
            "threshold" | "lowStockThreshold" => self.low_stock_threshold = value,
            "category" => self.category = value,
            other => return Err(ValidationError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

/// Inline edit of one row. Only name, price and stock are editable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditForm {
    pub name: Option<String>,
    pub price: Option<String>,
    pub stock: Option<String>,
}

impl EditForm {
    pub fn validate(&self) -> Result<ProductPatch, ValidationError> {
        let name = match &self.name {
            Some(name) if name.trim().is_empty() => return Err(ValidationError::Required("name")),
            Some(name) => Some(name.trim().to_string()),
            None => None,
        };
        let patch = ProductPatch {
            name,
            price: self.price.as_deref().map(parse_price).transpose()?,
            stock: self
                .stock
                .as_deref()
                .map(|raw| parse_count("stock", raw))
                .transpose()?,
        };
        if patch.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }
        Ok(patch)
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), ValidationError> {
        match key {
            "name" => self.name = Some(value),
            "price" => self.price = Some(value),
            "stock" => self.stock = Some(value),
            other => return Err(ValidationError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

fn parse_price(raw: &str) -> Result<f64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required("price"));
    }
    let price: f64 = raw
        .trim_start_matches('$')
        .replace(',', "")
        .parse()
        .map_err(|_| ValidationError::InvalidNumber {
            field: "price",
            value: raw.to_string(),
        })?;
    if !price.is_finite() {
        return Err(ValidationError::InvalidNumber {
            field: "price",
            value: raw.to_string(),
        });
    }
    if price < 0.0 {
        return Err(ValidationError::Negative("price"));
    }
    Ok(price)
}

fn parse_count(field: &'static str, raw: &str) -> Result<u32, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required(field));
    }
    match raw.parse::<i64>() {
        Ok(value) if value < 0 => Err(ValidationError::Negative(field)),
        Ok(value) => u32::try_from(value).map_err(|_| ValidationError::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
        Err(_) => Err(ValidationError::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, price: &str, stock: &str) -> ProductForm {
        ProductForm {
            name: name.to_string(),
            price: price.to_string(),
            stock: stock.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_form_uses_default_threshold() {
        let mut input = form("  Desk Lamp ", "1,299.50", "4");
        input.category = " Lighting ".to_string();

        let payload = input.validate(10).unwrap();
        assert_eq!(payload.name, "Desk Lamp");
        assert_eq!(payload.price, 1299.5);
        assert_eq!(payload.stock, 4);
        assert_eq!(payload.low_stock_threshold, 10);
        assert_eq!(payload.category, "Lighting");
    }

    #[test]
    fn test_explicit_threshold_wins() {
        let mut input = form("Lamp", "$12", "4");
        input.set("threshold", "2".to_string()).unwrap();
        let payload = input.validate(10).unwrap();
        assert_eq!(payload.low_stock_threshold, 2);
        assert_eq!(payload.price, 12.0);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            form("", "1", "1").validate(10),
            Err(ValidationError::Required("name"))
        );
        assert_eq!(
            form("Lamp", "-3", "1").validate(10),
            Err(ValidationError::Negative("price"))
        );
        assert_eq!(
            form("Lamp", "1", "-1").validate(10),
            Err(ValidationError::Negative("stock"))
        );
        assert_eq!(
            form("Lamp", "1", "2.5").validate(10),
            Err(ValidationError::InvalidNumber {
                field: "stock",
                value: "2.5".to_string()
            })
        );
        assert!(matches!(
            form("Lamp", "NaN", "1").validate(10),
            Err(ValidationError::InvalidNumber { field: "price", .. })
        ));
        assert_eq!(
            form("Lamp", "", "1").validate(10),
            Err(ValidationError::Required("price"))
        );
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut input = ProductForm::default();
        assert_eq!(
            input.set("sku", "X".to_string()),
            Err(ValidationError::UnknownField("sku".to_string()))
        );
        let mut edit = EditForm::default();
        assert!(edit.set("category", "X".to_string()).is_err());
    }

    #[test]
    fn test_edit_form_builds_partial_patch() {
        let edit = EditForm {
            stock: Some("12".to_string()),
            ..Default::default()
        };
        let patch = edit.validate().unwrap();
        assert_eq!(patch.stock, Some(12));
        assert!(patch.name.is_none());
        assert!(patch.price.is_none());

        assert_eq!(
            EditForm::default().validate(),
            Err(ValidationError::EmptyPatch)
        );
        let blank_name = EditForm {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank_name.validate(), Err(ValidationError::Required("name")));
    }
}
