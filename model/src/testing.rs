//! Proptest strategies for model types.
//!
//! This module is only available when the `testing` feature is enabled.

use crate::identity::{Identity, Principal};
use crate::table::{ColumnName, CreateTable, RowDraft, TableName};
use proptest::prelude::*;

/// A create or drop issued against the data service, used to drive
/// registry consistency properties.
#[derive(Debug, Clone)]
pub enum TableOp {
    Create(CreateTable),
    Drop(TableName),
}

pub fn arb_principal() -> impl Strategy<Value = Principal> {
    proptest::string::string_regex("[a-z0-9]{5}(-[a-z0-9]{5}){2}-cai")
        .unwrap()
        .prop_map(|text| Principal::new(text).expect("regex never yields blank text"))
}

pub fn arb_identity() -> impl Strategy<Value = Identity> {
    arb_principal().prop_map(Identity::new)
}

pub fn arb_table_name() -> impl Strategy<Value = TableName> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,11}").unwrap()
}

/// Distinct, non-empty column names in a stable order.
pub fn arb_columns(max: usize) -> impl Strategy<Value = Vec<ColumnName>> {
    prop::collection::btree_set(
        proptest::string::string_regex("[a-z][a-z0-9]{0,7}").unwrap(),
        1..=max.max(1),
    )
    .prop_map(|set| set.into_iter().collect())
}

prop_compose! {
    /// A create request as typed into a form: valid columns mixed with blanks.
    pub fn arb_create_table()(
        name in arb_table_name(),
        columns in arb_columns(6),
        blanks in prop::collection::vec(any::<bool>(), 0..4),
    ) -> CreateTable {
        let mut inputs: Vec<ColumnName> = columns;
        for (i, blank) in blanks.into_iter().enumerate() {
            if blank {
                let at = i.min(inputs.len());
                inputs.insert(at, String::new());
            }
        }
        CreateTable::new(name).with_columns(inputs)
    }
}

prop_compose! {
    /// A draft that fills a random subset of `columns`.
    pub fn arb_row_draft(columns: Vec<ColumnName>)(
        filled in prop::collection::vec(
            proptest::option::of("[a-z0-9]{0,8}"),
            columns.len(),
        ),
    ) -> RowDraft {
        let mut draft = RowDraft::default();
        for (column, value) in columns.iter().zip(filled) {
            if let Some(value) = value {
                draft.set(column.clone(), value);
            }
        }
        draft
    }
}

/// Creates and drops over a small name pool so that collisions and drops of
/// missing tables both occur.
pub fn arb_table_ops(max_ops: usize) -> impl Strategy<Value = Vec<TableOp>> {
    let name = prop_oneof![Just("alpha"), Just("beta"), Just("gamma"), Just("delta")]
        .prop_map(str::to_owned);
    let op = prop_oneof![
        (name.clone(), arb_columns(3))
            .prop_map(|(name, columns)| TableOp::Create(CreateTable::new(name).with_columns(columns))),
        name.prop_map(TableOp::Drop),
    ];
    prop::collection::vec(op, 0..max_ops)
}
