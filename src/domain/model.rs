use serde::{Deserialize, Serialize};

/// Normalized statement returned to HTTP callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedData {
    /// Folio of the first folio in the statement, empty when there is none.
    pub folio_number: String,
    /// Funds of every folio, flattened in document order.
    pub funds: Vec<Fund>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
    pub folio_number: String,
    pub scheme_name: String,
    pub isin: String,
    pub amfi: String,
    pub rta: String,
    #[serde(rename = "type")]
    pub scheme_type: String,
    pub nav: f64,
    /// Closing unit balance of the scheme.
    pub units: f64,
    pub cost: f64,
    pub value: f64,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub units: f64,
    pub nav: f64,
    pub balance: f64,
    #[serde(rename = "type")]
    pub transaction_type: String,
}

impl ParsedData {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn transaction_count(&self) -> usize {
        self.funds.iter().map(|f| f.transactions.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let data = ParsedData {
            folio_number: "F1".to_string(),
            funds: vec![Fund {
                scheme_name: "S1".to_string(),
                scheme_type: "EQUITY".to_string(),
                transactions: vec![Transaction {
                    transaction_type: "PURCHASE".to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            }],
        };

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["folioNumber"], "F1");
        assert_eq!(json["funds"][0]["schemeName"], "S1");
        assert_eq!(json["funds"][0]["type"], "EQUITY");
        assert!(json["funds"][0].get("folioNumber").is_some());
        assert_eq!(json["funds"][0]["transactions"][0]["type"], "PURCHASE");
        assert_eq!(data.transaction_count(), 1);
    }
}
