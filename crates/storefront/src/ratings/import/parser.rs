use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::InteractionImportError;
use crate::catalog::{ClientId, ProductId};
use crate::ratings::domain::{InteractionEvent, InteractionKind};

pub(crate) fn parse_events<R: Read>(
    reader: R,
) -> Result<Vec<InteractionEvent>, InteractionImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut events = Vec::new();

    for (index, record) in csv_reader.deserialize::<InteractionRow>().enumerate() {
        // Header occupies the first line of the export.
        let line = (index + 2) as u64;
        let row = record?;
        events.push(row.into_event(line)?);
    }

    Ok(events)
}

#[derive(Debug, Deserialize)]
struct InteractionRow {
    #[serde(rename = "Client ID")]
    client_id: String,
    #[serde(rename = "Product ID")]
    product_id: String,
    #[serde(rename = "Interaction")]
    interaction: String,
    #[serde(rename = "Quantity", default, deserialize_with = "empty_string_as_none")]
    quantity: Option<String>,
}

impl InteractionRow {
    fn into_event(self, line: u64) -> Result<InteractionEvent, InteractionImportError> {
        if self.client_id.is_empty() {
            return Err(invalid(line, "missing client id"));
        }
        if self.product_id.is_empty() {
            return Err(invalid(line, "missing product id"));
        }

        let kind = match kind_for(&self.interaction) {
            Some(kind) => kind,
            None => return Err(invalid(line, "missing interaction kind")),
        };

        let quantity = match self.quantity {
            Some(raw) => match raw.parse::<i32>() {
                Ok(value) => Some(value),
                Err(_) => {
                    return Err(invalid(line, &format!("quantity '{raw}' is not an integer")))
                }
            },
            None => None,
        };

        Ok(InteractionEvent {
            client_id: ClientId(self.client_id),
            product_id: ProductId(self.product_id),
            kind,
            quantity,
        })
    }
}

fn invalid(line: u64, reason: &str) -> InteractionImportError {
    InteractionImportError::InvalidEvent {
        line,
        reason: reason.to_string(),
    }
}

/// Map an export label to its interaction kind. Unrecognized non-empty
/// labels become the no-score kind so stale exports replay instead of
/// aborting; an empty label is a malformed row.
fn kind_for(raw: &str) -> Option<InteractionKind> {
    let normalized = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
    if normalized.is_empty() {
        return None;
    }

    Some(match normalized.as_str() {
        "view" => InteractionKind::View,
        "click" => InteractionKind::Click,
        "search" => InteractionKind::Search,
        "add_to_cart" => InteractionKind::AddToCart,
        "purchase" => InteractionKind::Purchase,
        "rating" => InteractionKind::Rating,
        _ => InteractionKind::Other,
    })
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
