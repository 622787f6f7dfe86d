use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// One archive entry reduced to the six fields we expose.
///
/// Every field is always serialized. A field that is missing upstream (or is `null` there)
/// is serialized as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Record {
    #[schema(value_type = Option<String>)]
    pub accession_number: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub title_from_seller: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub format: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub date_of_sale: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub cost_less_shipping: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub notes: Option<Value>,
}

impl Record {
    /// Projects an arbitrary upstream value onto the fixed record shape.
    ///
    /// Never fails. Anything that is not a JSON object projects to a record of nulls.
    pub fn project(raw: &Value) -> Self {
        let take = |field: RecordField| -> Option<Value> {
            raw.get(field.as_str())
                .filter(|value| !value.is_null())
                .cloned()
        };

        Record {
            accession_number: take(RecordField::AccessionNumber),
            title_from_seller: take(RecordField::TitleFromSeller),
            format: take(RecordField::Format),
            date_of_sale: take(RecordField::DateOfSale),
            cost_less_shipping: take(RecordField::CostLessShipping),
            notes: take(RecordField::Notes),
        }
    }

    pub fn get(&self, field: RecordField) -> Option<&Value> {
        match field {
            RecordField::AccessionNumber => self.accession_number.as_ref(),
            RecordField::TitleFromSeller => self.title_from_seller.as_ref(),
            RecordField::Format => self.format.as_ref(),
            RecordField::DateOfSale => self.date_of_sale.as_ref(),
            RecordField::CostLessShipping => self.cost_less_shipping.as_ref(),
            RecordField::Notes => self.notes.as_ref(),
        }
    }

    /// Iterates over the present (non-null) values in field order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        RecordField::ALL
            .into_iter()
            .filter_map(move |field| self.get(field))
    }
}

/// The closed set of field names a [`Record`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    AccessionNumber,
    TitleFromSeller,
    Format,
    DateOfSale,
    CostLessShipping,
    Notes,
}

impl RecordField {
    pub const ALL: [RecordField; 6] = [
        RecordField::AccessionNumber,
        RecordField::TitleFromSeller,
        RecordField::Format,
        RecordField::DateOfSale,
        RecordField::CostLessShipping,
        RecordField::Notes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordField::AccessionNumber => "accession_number",
            RecordField::TitleFromSeller => "title_from_seller",
            RecordField::Format => "format",
            RecordField::DateOfSale => "date_of_sale",
            RecordField::CostLessShipping => "cost_less_shipping",
            RecordField::Notes => "notes",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown record field: `{0}`")]
pub struct UnknownFieldError(pub String);

impl FromStr for RecordField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownFieldError(s.to_string()))
    }
}
