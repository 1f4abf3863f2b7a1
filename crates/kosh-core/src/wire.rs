//! Wire field mapping
//!
//! Stored models use snake_case field names. API clients speak camelCase.
//! The mapping lives here as one explicit table per entity and is applied
//! to JSON values at the boundary. Fields missing from a table pass through
//! unchanged.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

/// Entities with a wire representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Transaction,
    Loan,
    RecurringPayment,
    RecurrenceSuggestion,
    PayoffResult,
    PayoffSchedule,
    PayoffMonth,
    CashFlowMonth,
    AuditEntry,
}

/// (storage name, wire name)
type FieldTable = &'static [(&'static str, &'static str)];

const TRANSACTION_FIELDS: FieldTable = &[
    ("import_hash", "importHash"),
    ("created_at", "createdAt"),
];

const LOAN_FIELDS: FieldTable = &[
    ("principal_amount", "principalAmount"),
    ("remaining_amount", "remainingAmount"),
    ("interest_rate", "interestRate"),
    ("emi_amount", "emiAmount"),
    ("start_date", "startDate"),
    ("created_at", "createdAt"),
];

const RECURRING_PAYMENT_FIELDS: FieldTable = &[
    ("interval_days", "intervalDays"),
    ("created_at", "createdAt"),
];

const SUGGESTION_FIELDS: FieldTable = &[("interval_days", "intervalDays")];

const PAYOFF_RESULT_FIELDS: FieldTable = &[("total_interest", "totalInterest")];

const PAYOFF_MONTH_FIELDS: FieldTable = &[("remaining_balance", "remainingBalance")];

const CASH_FLOW_FIELDS: FieldTable = &[("transaction_count", "transactionCount")];

const AUDIT_FIELDS: FieldTable = &[
    ("user_email", "userEmail"),
    ("entity_type", "entityType"),
    ("entity_id", "entityId"),
];

impl Entity {
    fn fields(&self) -> FieldTable {
        match self {
            Self::Transaction => TRANSACTION_FIELDS,
            Self::Loan => LOAN_FIELDS,
            Self::RecurringPayment => RECURRING_PAYMENT_FIELDS,
            Self::RecurrenceSuggestion => SUGGESTION_FIELDS,
            Self::PayoffResult => PAYOFF_RESULT_FIELDS,
            // The nested objects are mapped separately
            Self::PayoffSchedule => &[],
            Self::PayoffMonth => PAYOFF_MONTH_FIELDS,
            Self::CashFlowMonth => CASH_FLOW_FIELDS,
            Self::AuditEntry => AUDIT_FIELDS,
        }
    }

    /// Nested (field, entity) pairs whose values need their own mapping
    fn nested(&self) -> &'static [(&'static str, Entity)] {
        match self {
            Self::PayoffSchedule => &[
                ("result", Entity::PayoffResult),
                ("months", Entity::PayoffMonth),
            ],
            _ => &[],
        }
    }
}

#[derive(Clone, Copy)]
enum Direction {
    ToWire,
    FromWire,
}

/// Rename storage fields to wire fields
///
/// Arrays are mapped element by element.
pub fn to_wire(entity: Entity, value: Value) -> Value {
    rename(entity, value, Direction::ToWire)
}

/// Rename wire fields back to storage fields
pub fn from_wire(entity: Entity, value: Value) -> Value {
    rename(entity, value, Direction::FromWire)
}

/// Serialize a model and map it to its wire shape
pub fn serialize<T: Serialize>(entity: Entity, model: &T) -> Result<Value> {
    Ok(to_wire(entity, serde_json::to_value(model)?))
}

/// Map a wire value to storage names and deserialize it
pub fn deserialize<T: serde::de::DeserializeOwned>(entity: Entity, value: Value) -> Result<T> {
    Ok(serde_json::from_value(from_wire(entity, value))?)
}

fn rename(entity: Entity, value: Value, direction: Direction) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| rename(entity, item, direction))
                .collect(),
        ),
        Value::Object(map) => Value::Object(rename_object(entity, map, direction)),
        other => other,
    }
}

fn rename_object(entity: Entity, map: Map<String, Value>, direction: Direction) -> Map<String, Value> {
    let table = entity.fields();
    let nested = entity.nested();

    map.into_iter()
        .map(|(key, value)| {
            let renamed = table
                .iter()
                .find_map(|(snake, camel)| match direction {
                    Direction::ToWire if *snake == key => Some(*camel),
                    Direction::FromWire if *camel == key => Some(*snake),
                    _ => None,
                })
                .map(str::to_string)
                .unwrap_or(key);

            let value = match nested.iter().find(|(field, _)| *field == renamed) {
                Some((_, child)) => rename(*child, value, direction),
                None => value,
            };

            (renamed, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PayoffMonth, PayoffResult, PayoffSchedule, RecurrenceSuggestion};
    use serde_json::json;

    #[test]
    fn test_suggestion_to_wire() {
        let suggestion = RecurrenceSuggestion {
            description: "Netflix".to_string(),
            amount: 499.0,
            occurrences: 3,
            interval_days: 30,
        };
        let value = serialize(Entity::RecurrenceSuggestion, &suggestion).unwrap();
        assert_eq!(
            value,
            json!({
                "description": "Netflix",
                "amount": 499.0,
                "occurrences": 3,
                "intervalDays": 30
            })
        );
    }

    #[test]
    fn test_loan_from_wire_keeps_unknown_fields() {
        let wire = json!({
            "name": "Car loan",
            "remainingAmount": 1000.0,
            "interestRate": 9.5,
            "emiAmount": 200.0,
            "note": "unmapped"
        });
        let storage = from_wire(Entity::Loan, wire);
        assert_eq!(storage["remaining_amount"], 1000.0);
        assert_eq!(storage["interest_rate"], 9.5);
        assert_eq!(storage["emi_amount"], 200.0);
        assert_eq!(storage["note"], "unmapped");
        assert!(storage.get("remainingAmount").is_none());
    }

    #[test]
    fn test_arrays_mapped_per_element() {
        let wire = to_wire(
            Entity::PayoffResult,
            json!([{"months": 1, "total_interest": 2.0}, {"months": 3, "total_interest": 4.0}]),
        );
        assert_eq!(wire[1]["totalInterest"], 4.0);
    }

    #[test]
    fn test_schedule_nested_mapping() {
        let schedule = PayoffSchedule {
            result: PayoffResult {
                months: 1,
                total_interest: 10.0,
            },
            months: vec![PayoffMonth {
                month: 1,
                interest: 10.0,
                remaining_balance: 0.0,
            }],
            capped: false,
        };
        let value = serialize(Entity::PayoffSchedule, &schedule).unwrap();
        assert_eq!(value["result"]["totalInterest"], 10.0);
        assert_eq!(value["months"][0]["remainingBalance"], 0.0);
        assert_eq!(value["capped"], false);
    }

    #[test]
    fn test_deserialize_from_wire() {
        let suggestion: RecurrenceSuggestion = deserialize(
            Entity::RecurrenceSuggestion,
            json!({"description": "Gym", "amount": 1500.0, "occurrences": 4, "intervalDays": 30}),
        )
        .unwrap();
        assert_eq!(suggestion.interval_days, 30);
    }

    #[test]
    fn test_scalars_untouched() {
        assert_eq!(to_wire(Entity::Loan, json!(42)), json!(42));
    }
}
