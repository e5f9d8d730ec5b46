use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Default SQL type assigned when a structure row leaves the type blank.
pub const DEFAULT_SQL_TYPE: &str = "NVARCHAR(255)";

/// One declared structure row, validated upstream and immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpec {
    /// Table the attribute belongs to.
    pub table: String,
    /// Attribute (column) name.
    pub attribute: String,
    /// Declared SQL type, e.g. `NVARCHAR(100)`.
    pub sql_type: String,
    /// Raw key cell: tokens like `PK`, `PK(part)`, `FK(Table.Col)`,
    /// `UNIQUE`, `NK`, separated by `;` or `,`.
    pub key: String,
    /// Raw functional-dependency cell: `;`-separated `LHS->RHS` clauses.
    pub functional_dependency: String,
}

impl AttributeSpec {
    /// Build a row from borrowed fields, trimming each.
    pub fn new(table: &str, attribute: &str, sql_type: &str, key: &str, fd: &str) -> Self {
        Self {
            table: table.trim().to_string(),
            attribute: attribute.trim().to_string(),
            sql_type: sql_type.trim().to_string(),
            key: key.trim().to_string(),
            functional_dependency: fd.trim().to_string(),
        }
    }
}

/// One parsed key-role token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyToken {
    /// `PK` — primary key.
    Pk,
    /// `PK(part)` — part of a composite primary key.
    PkPart,
    /// `FK` — foreign key whose target is resolved from the live catalog.
    Fk,
    /// `FK(Table.Col)` — foreign key with a declared target.
    FkTarget {
        /// Referenced table.
        table: String,
        /// Referenced column.
        column: String,
    },
    /// `UNIQUE` — unique constraint.
    Unique,
    /// `NK` — natural key annotation.
    NaturalKey,
}

impl KeyToken {
    /// Parse a single token; `None` when the token is not recognized
    /// (the validator reports those).
    pub fn parse(token: &str) -> Option<Self> {
        let upper = token.trim().to_ascii_uppercase();
        match upper.as_str() {
            "PK" => Some(KeyToken::Pk),
            "PK(PART)" => Some(KeyToken::PkPart),
            "FK" => Some(KeyToken::Fk),
            "UNIQUE" => Some(KeyToken::Unique),
            "NK" => Some(KeyToken::NaturalKey),
            _ => {
                let caps = crate::structure::validate::fk_target_captures(token.trim())?;
                Some(KeyToken::FkTarget {
                    table: caps.0,
                    column: caps.1,
                })
            }
        }
    }

    /// Split a raw key cell on `;` or `,` and parse every recognized token.
    pub fn parse_cell(cell: &str) -> Vec<KeyToken> {
        split_cell_tokens(cell)
            .iter()
            .filter_map(|tok| KeyToken::parse(tok))
            .collect()
    }

    /// True for `PK` and `PK(part)`.
    pub fn is_primary(&self) -> bool {
        matches!(self, KeyToken::Pk | KeyToken::PkPart)
    }
}

/// Split a key cell into trimmed, non-empty tokens (`;` or `,` separated).
pub fn split_cell_tokens(cell: &str) -> Vec<&str> {
    cell.split([';', ','])
        .map(str::trim)
        .filter(|tok| !tok.is_empty())
        .collect()
}

/// A functional dependency `lhs -> rhs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionalDependency {
    /// Determinant columns.
    pub lhs: Vec<String>,
    /// Dependent columns.
    pub rhs: Vec<String>,
}

impl fmt::Display for FunctionalDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.lhs.join("+"), self.rhs.join("+"))
    }
}

/// Declared structure of one table: ordered attributes, declared types,
/// key roles, and declared functional dependencies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableStructure {
    /// Table name exactly as first declared.
    pub name: String,
    attributes: Vec<String>,
    types: HashMap<String, String>,
    keys: HashMap<String, Vec<KeyToken>>,
    fds: Vec<FunctionalDependency>,
}

impl TableStructure {
    /// Empty structure for `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Record one attribute row. Order of first insertion is preserved.
    pub(crate) fn push_attribute(&mut self, row: &AttributeSpec) {
        if !self.attributes.iter().any(|a| a == &row.attribute) {
            self.attributes.push(row.attribute.clone());
        }
        if !row.sql_type.is_empty() {
            self.types
                .insert(row.attribute.clone(), row.sql_type.clone());
        }
        if !row.key.is_empty() {
            self.keys
                .insert(row.attribute.clone(), KeyToken::parse_cell(&row.key));
        }
    }

    /// Record one declared functional dependency.
    pub(crate) fn push_fd(&mut self, fd: FunctionalDependency) {
        self.fds.push(fd);
    }

    /// Declared attribute names, in CSV order.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Declared SQL type for `attr`, if the row carried one.
    pub fn declared_type(&self, attr: &str) -> Option<&str> {
        self.types.get(attr).map(String::as_str)
    }

    /// Declared type or [`DEFAULT_SQL_TYPE`].
    pub fn declared_type_or_default(&self, attr: &str) -> String {
        self.declared_type(attr)
            .unwrap_or(DEFAULT_SQL_TYPE)
            .to_string()
    }

    /// Parsed key tokens for `attr` (empty when the key cell was blank).
    pub fn key_tokens(&self, attr: &str) -> &[KeyToken] {
        self.keys.get(attr).map_or(&[], Vec::as_slice)
    }

    /// Attributes declared `PK` or `PK(part)`, in declared order.
    pub fn declared_primary_key(&self) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|a| self.key_tokens(a).iter().any(KeyToken::is_primary))
            .cloned()
            .collect()
    }

    /// Attributes declared `UNIQUE`, in declared order.
    pub fn declared_unique(&self) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|a| {
                self.key_tokens(a)
                    .iter()
                    .any(|t| matches!(t, KeyToken::Unique))
            })
            .cloned()
            .collect()
    }

    /// Declared functional dependencies, in declaration order.
    pub fn declared_fds(&self) -> &[FunctionalDependency] {
        &self.fds
    }
}
