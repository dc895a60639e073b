// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The filter operator catalog.
//!
//! Each operator appears in the schema as a field of a filter input (such as `eq` in
//! `StringFilterInput`) and in backend queries under its backend symbol (such as `$eq`). The
//! builder uses this table to decide which operators each scalar filter type gets and the
//! resolver uses it to translate incoming filters.

use crate::primitive_type::ScalarKind;

/// Shape of the value an operator accepts, relative to the filtered scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandShape {
    /// The scalar itself (`eq: "foo"`)
    Scalar,
    /// A list of the scalar (`in: ["a", "b"]`)
    ScalarList,
    /// A boolean flag (`null: true`)
    Flag,
    /// Another filter of the same kind (`not: {eq: 1}`)
    Filter,
    /// A list of filters of the same kind (`and: [{gt: 1}, {lt: 5}]`)
    FilterList,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Operator {
    /// The name used in the schema (also the symbol clients write in filters)
    pub field_name: &'static str,
    /// The name used in backend queries
    pub backend_symbol: &'static str,
    pub operand: OperandShape,
    applies_to: &'static [ScalarKind],
}

impl Operator {
    pub fn applies_to(&self, kind: ScalarKind) -> bool {
        self.applies_to.contains(&kind)
    }

    pub fn is_root_combinator(&self) -> bool {
        ROOT_COMBINATORS.contains(&self.field_name)
    }
}

use ScalarKind::*;

const EVERY_SCALAR: &[ScalarKind] = &[
    Id, String, Int, Long, Float, Boolean, Date, Time, DateTime, Json,
];
const ORDERED: &[ScalarKind] = &[Id, String, Int, Long, Float, Date, Time, DateTime];
const TEXTUAL: &[ScalarKind] = &[Id, String];
const SEARCHABLE: &[ScalarKind] = &[Id, String, Json];
const RANGED: &[ScalarKind] = &[Id, String, Int, Long, Float, Date, Time, DateTime];

pub const OPERATORS: &[Operator] = &[
    Operator {
        field_name: "and",
        backend_symbol: "$and",
        operand: OperandShape::FilterList,
        applies_to: EVERY_SCALAR,
    },
    Operator {
        field_name: "or",
        backend_symbol: "$or",
        operand: OperandShape::FilterList,
        applies_to: EVERY_SCALAR,
    },
    Operator {
        field_name: "not",
        backend_symbol: "$not",
        operand: OperandShape::Filter,
        applies_to: EVERY_SCALAR,
    },
    Operator {
        field_name: "eq",
        backend_symbol: "$eq",
        operand: OperandShape::Scalar,
        applies_to: EVERY_SCALAR,
    },
    Operator {
        field_name: "eqi",
        backend_symbol: "$eqi",
        operand: OperandShape::Scalar,
        applies_to: TEXTUAL,
    },
    Operator {
        field_name: "ne",
        backend_symbol: "$ne",
        operand: OperandShape::Scalar,
        applies_to: EVERY_SCALAR,
    },
    Operator {
        field_name: "nei",
        backend_symbol: "$nei",
        operand: OperandShape::Scalar,
        applies_to: TEXTUAL,
    },
    Operator {
        field_name: "lt",
        backend_symbol: "$lt",
        operand: OperandShape::Scalar,
        applies_to: ORDERED,
    },
    Operator {
        field_name: "lte",
        backend_symbol: "$lte",
        operand: OperandShape::Scalar,
        applies_to: ORDERED,
    },
    Operator {
        field_name: "gt",
        backend_symbol: "$gt",
        operand: OperandShape::Scalar,
        applies_to: ORDERED,
    },
    Operator {
        field_name: "gte",
        backend_symbol: "$gte",
        operand: OperandShape::Scalar,
        applies_to: ORDERED,
    },
    Operator {
        field_name: "in",
        backend_symbol: "$in",
        operand: OperandShape::ScalarList,
        applies_to: EVERY_SCALAR,
    },
    Operator {
        field_name: "notIn",
        backend_symbol: "$notIn",
        operand: OperandShape::ScalarList,
        applies_to: EVERY_SCALAR,
    },
    Operator {
        field_name: "contains",
        backend_symbol: "$contains",
        operand: OperandShape::Scalar,
        applies_to: SEARCHABLE,
    },
    Operator {
        field_name: "notContains",
        backend_symbol: "$notContains",
        operand: OperandShape::Scalar,
        applies_to: SEARCHABLE,
    },
    Operator {
        field_name: "containsi",
        backend_symbol: "$containsi",
        operand: OperandShape::Scalar,
        applies_to: SEARCHABLE,
    },
    Operator {
        field_name: "notContainsi",
        backend_symbol: "$notContainsi",
        operand: OperandShape::Scalar,
        applies_to: SEARCHABLE,
    },
    Operator {
        field_name: "startsWith",
        backend_symbol: "$startsWith",
        operand: OperandShape::Scalar,
        applies_to: TEXTUAL,
    },
    Operator {
        field_name: "endsWith",
        backend_symbol: "$endsWith",
        operand: OperandShape::Scalar,
        applies_to: TEXTUAL,
    },
    Operator {
        field_name: "null",
        backend_symbol: "$null",
        operand: OperandShape::Flag,
        applies_to: EVERY_SCALAR,
    },
    Operator {
        field_name: "notNull",
        backend_symbol: "$notNull",
        operand: OperandShape::Flag,
        applies_to: EVERY_SCALAR,
    },
    Operator {
        field_name: "between",
        backend_symbol: "$between",
        operand: OperandShape::ScalarList,
        applies_to: RANGED,
    },
];

/// Combinators allowed at the root of every filter input (scalar or content type)
pub const ROOT_COMBINATORS: [&str; 3] = ["and", "or", "not"];

pub fn find_operator(field_name: &str) -> Option<&'static Operator> {
    OPERATORS.iter().find(|op| op.field_name == field_name)
}

pub fn find_operator_by_backend_symbol(symbol: &str) -> Option<&'static Operator> {
    OPERATORS.iter().find(|op| op.backend_symbol == symbol)
}

/// Root combinator matching either its schema name (`and`) or its backend symbol (`$and`).
pub fn find_root_combinator(key: &str) -> Option<&'static Operator> {
    find_operator(key)
        .or_else(|| find_operator_by_backend_symbol(key))
        .filter(|op| op.is_root_combinator())
}

/// Operators a filter input for the given scalar exposes, in catalog order.
pub fn applicable_operators(kind: ScalarKind) -> impl Iterator<Item = &'static Operator> {
    OPERATORS.iter().filter(move |op| op.applies_to(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiplatform_test::multiplatform_test;

    #[multiplatform_test]
    fn integer_operators() {
        let names: Vec<_> = applicable_operators(ScalarKind::Int)
            .map(|op| op.field_name)
            .collect();

        insta::assert_debug_snapshot!(names, @r#"
        [
            "and",
            "or",
            "not",
            "eq",
            "ne",
            "lt",
            "lte",
            "gt",
            "gte",
            "in",
            "notIn",
            "null",
            "notNull",
            "between",
        ]
        "#);
    }

    #[multiplatform_test]
    fn string_only_operators() {
        for name in ["eqi", "nei", "startsWith", "endsWith"] {
            let op = find_operator(name).unwrap();
            assert!(op.applies_to(ScalarKind::String));
            assert!(!op.applies_to(ScalarKind::Int));
            assert!(!op.applies_to(ScalarKind::Boolean));
        }
    }

    #[multiplatform_test]
    fn every_scalar_gets_combinators() {
        for kind in ScalarKind::ALL {
            let names: Vec<_> = applicable_operators(kind).map(|op| op.field_name).collect();
            for combinator in ROOT_COMBINATORS {
                assert!(names.contains(&combinator), "{kind} lacks {combinator}");
            }
        }
    }

    #[multiplatform_test]
    fn root_combinators_by_either_symbol() {
        assert_eq!("$and", find_root_combinator("and").unwrap().backend_symbol);
        assert_eq!("or", find_root_combinator("$or").unwrap().field_name);
        assert!(find_root_combinator("eq").is_none());
        assert!(find_root_combinator("$eq").is_none());
        assert!(find_root_combinator("title").is_none());
    }

    #[multiplatform_test]
    fn backend_symbols_are_unique() {
        for op in OPERATORS {
            assert_eq!(
                1,
                OPERATORS
                    .iter()
                    .filter(|other| other.backend_symbol == op.backend_symbol)
                    .count()
            );
            assert_eq!(format!("${}", op.field_name), op.backend_symbol);
        }
    }
}
