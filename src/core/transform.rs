use crate::domain::coerce::{number, text, text_or};
use crate::domain::model::{Fund, ParsedData, Transaction};
use crate::domain::raw::{RawParseResult, RawScheme, RawTransaction};

const UNKNOWN_SCHEME: &str = "Unknown Scheme";

/// 將 casparser 原始輸出轉換為扁平化的 [`ParsedData`]
///
/// Funds of all folios are concatenated; only the first folio's number is kept
/// at the top level. Schemes without a valuation are skipped.
pub fn transform_statement(raw: &RawParseResult) -> ParsedData {
    let Some(folios) = raw.folios.as_ref() else {
        tracing::warn!("casparser output has no folios array, returning empty result");
        return ParsedData::empty();
    };

    let mut funds = Vec::new();
    for folio in folios {
        let folio_number = text(&folio.folio);

        for scheme in &folio.schemes {
            match scheme {
                Some(scheme) if scheme.valuation.is_some() => {
                    funds.push(to_fund(&folio_number, scheme));
                }
                Some(scheme) => {
                    tracing::debug!(
                        "Skipping scheme {:?} in folio {:?}: no valuation",
                        text(&scheme.scheme),
                        folio_number
                    );
                }
                None => {
                    tracing::debug!("Skipping empty scheme entry in folio {:?}", folio_number);
                }
            }
        }
    }

    let folio_number = folios.first().map(|f| text(&f.folio)).unwrap_or_default();

    ParsedData {
        folio_number,
        funds,
    }
}

fn to_fund(folio_number: &str, scheme: &RawScheme) -> Fund {
    let valuation = scheme.valuation.clone().unwrap_or_default();

    Fund {
        folio_number: folio_number.to_string(),
        scheme_name: text_or(&scheme.scheme, UNKNOWN_SCHEME),
        isin: text(&scheme.isin),
        amfi: text(&scheme.amfi),
        rta: text(&scheme.rta),
        scheme_type: text(&scheme.r#type),
        nav: number(&valuation.nav),
        units: number(&scheme.close),
        cost: number(&valuation.cost),
        value: number(&valuation.value),
        transactions: scheme.transactions.iter().map(to_transaction).collect(),
    }
}

fn to_transaction(txn: &RawTransaction) -> Transaction {
    Transaction {
        date: text(&txn.date),
        description: text(&txn.description),
        amount: number(&txn.amount),
        units: number(&txn.units),
        nav: number(&txn.nav),
        balance: number(&txn.balance),
        transaction_type: text(&txn.r#type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawParseResult {
        RawParseResult::from_value(value)
    }

    #[test]
    fn test_empty_folios() {
        let result = transform_statement(&raw(json!({"folios": []})));
        assert_eq!(result, ParsedData::empty());
        assert_eq!(result.folio_number, "");
        assert!(result.funds.is_empty());
    }

    #[test]
    fn test_missing_folios_returns_empty() {
        assert_eq!(transform_statement(&raw(json!({}))), ParsedData::empty());
        assert_eq!(
            transform_statement(&raw(json!({"folios": "F1"}))),
            ParsedData::empty()
        );
        assert_eq!(transform_statement(&raw(json!(null))), ParsedData::empty());
    }

    #[test]
    fn test_single_scheme() {
        let result = transform_statement(&raw(json!({
            "folios": [{
                "folio": "F1",
                "schemes": [{
                    "scheme": "S1",
                    "valuation": {"nav": 10, "cost": 5, "value": 100},
                    "close": 10,
                    "transactions": [{
                        "date": "2023-01-01",
                        "description": "Buy",
                        "amount": 100,
                        "units": 10,
                        "nav": 10,
                        "balance": 10
                    }]
                }]
            }]
        })));

        assert_eq!(result.folio_number, "F1");
        assert_eq!(result.funds.len(), 1);

        let fund = &result.funds[0];
        assert_eq!(fund.scheme_name, "S1");
        assert_eq!(fund.folio_number, "F1");
        assert_eq!(fund.nav, 10.0);
        assert_eq!(fund.units, 10.0);
        assert_eq!(fund.cost, 5.0);
        assert_eq!(fund.value, 100.0);
        assert_eq!(fund.isin, "");

        assert_eq!(
            fund.transactions,
            vec![Transaction {
                date: "2023-01-01".to_string(),
                description: "Buy".to_string(),
                amount: 100.0,
                units: 10.0,
                nav: 10.0,
                balance: 10.0,
                transaction_type: String::new(),
            }]
        );
    }

    #[test]
    fn test_scheme_without_valuation_is_skipped() {
        let result = transform_statement(&raw(json!({
            "folios": [{
                "folio": "F1",
                "schemes": [
                    {"scheme": "NoValuation", "close": 3},
                    {"scheme": "Valued", "valuation": {"nav": 1, "value": 2}},
                    null
                ]
            }]
        })));

        assert_eq!(result.funds.len(), 1);
        assert_eq!(result.funds[0].scheme_name, "Valued");
    }

    #[test]
    fn test_funds_flattened_across_folios() {
        let result = transform_statement(&raw(json!({
            "folios": [
                {"folio": "F1", "schemes": [{"scheme": "A", "valuation": {"nav": 1}}]},
                {"folio": "F2", "schemes": [
                    {"scheme": "B", "valuation": {"nav": 2}},
                    {"scheme": "C", "valuation": {"nav": 3}}
                ]}
            ]
        })));

        assert_eq!(result.folio_number, "F1");
        let names: Vec<&str> = result.funds.iter().map(|f| f.scheme_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(result.funds[2].folio_number, "F2");
    }

    #[test]
    fn test_folio_number_from_first_folio_even_without_funds() {
        let result = transform_statement(&raw(json!({
            "folios": [
                {"folio": "EMPTY", "schemes": []},
                {"folio": "F2", "schemes": [{"scheme": "B", "valuation": {"nav": 2}}]}
            ]
        })));

        assert_eq!(result.folio_number, "EMPTY");
        assert_eq!(result.funds.len(), 1);
    }

    #[test]
    fn test_string_numerics_are_coerced() {
        let result = transform_statement(&raw(json!({
            "folios": [{
                "folio": 12345,
                "schemes": [{
                    "valuation": {"nav": "45.67", "cost": "1000", "value": "2000.5"},
                    "close": "43.79",
                    "transactions": [{
                        "date": "2023-02-01",
                        "amount": "500.00",
                        "units": "10.950",
                        "nav": "45.66",
                        "balance": "",
                        "type": "PURCHASE_SIP"
                    }]
                }]
            }]
        })));

        assert_eq!(result.folio_number, "12345");
        let fund = &result.funds[0];
        assert_eq!(fund.scheme_name, "Unknown Scheme");
        assert_eq!(fund.nav, 45.67);
        assert_eq!(fund.units, 43.79);
        assert_eq!(fund.value, 2000.5);

        let txn = &fund.transactions[0];
        assert_eq!(txn.amount, 500.0);
        assert_eq!(txn.units, 10.95);
        assert_eq!(txn.nav, 45.66);
        assert_eq!(txn.balance, 0.0);
        assert_eq!(txn.description, "");
        assert_eq!(txn.transaction_type, "PURCHASE_SIP");
    }

    #[test]
    fn test_transform_is_idempotent() {
        let input = raw(json!({
            "folios": [
                {"folio": "F1", "schemes": [{"scheme": "A", "valuation": {"nav": 1},
                    "transactions": [{"date": "2024-01-01", "amount": 5}]}]},
                {"folio": "F2", "schemes": [{"scheme": "B"}]}
            ]
        }));

        let first = transform_statement(&input);
        let second = transform_statement(&input);
        assert_eq!(first, second);
    }
}
