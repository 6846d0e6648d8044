//! Aggregate mapping metadata.
//!
//! An [`EntityMetadata`] describes how an aggregate root maps onto its table:
//! which properties are plain columns, which are embedded value objects
//! stored in the same table, and which point at other aggregates or child
//! collections (stored elsewhere, so reaching them needs a join).

use oxide_data_core::PropertyType;
use serde::{Deserialize, Serialize};

/// How a property is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    /// A single column of the root table.
    #[default]
    Simple,
    /// A value object whose properties are columns of the root table.
    Embedded {
        /// Prefix prepended to every nested column name.
        #[serde(default)]
        prefix: String,
        /// The nested properties.
        properties: Vec<PersistentProperty>,
    },
    /// A one-to-one or many-to-one reference to another entity.
    Reference {
        /// Name of the referenced entity.
        target: String,
    },
    /// A one-to-many collection of child entities.
    Collection {
        /// Name of the child entity.
        target: String,
    },
}

/// A mapped property of an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentProperty {
    /// Property name, in snake case.
    pub name: String,
    /// Column name. Defaults to the property name.
    #[serde(default)]
    pub column: String,
    /// Logical type.
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    /// Persistence kind.
    #[serde(default)]
    pub kind: PropertyKind,
    /// Whether this is the identifier.
    #[serde(default)]
    pub id: bool,
}

impl PersistentProperty {
    /// A simple column property named after `name`.
    pub fn simple(name: impl Into<String>, property_type: PropertyType) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            property_type,
            kind: PropertyKind::Simple,
            id: false,
        }
    }

    /// An embedded value object.
    pub fn embedded(
        name: impl Into<String>,
        prefix: impl Into<String>,
        properties: Vec<Self>,
    ) -> Self {
        let name = name.into();
        Self {
            column: String::new(),
            property_type: PropertyType::Other(name.clone()),
            name,
            kind: PropertyKind::Embedded {
                prefix: prefix.into(),
                properties,
            },
            id: false,
        }
    }

    /// A reference to another entity.
    pub fn reference(name: impl Into<String>, target: impl Into<String>) -> Self {
        let target = target.into();
        Self {
            column: String::new(),
            name: name.into(),
            property_type: PropertyType::Other(target.clone()),
            kind: PropertyKind::Reference { target },
            id: false,
        }
    }

    /// A collection of child entities.
    pub fn collection(name: impl Into<String>, target: impl Into<String>) -> Self {
        let target = target.into();
        Self {
            column: String::new(),
            name: name.into(),
            property_type: PropertyType::Array(Box::new(PropertyType::Other(target.clone()))),
            kind: PropertyKind::Collection { target },
            id: false,
        }
    }

    /// Overrides the column name.
    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Marks the property as the identifier.
    #[must_use]
    pub const fn id(mut self) -> Self {
        self.id = true;
        self
    }

    /// Column name, falling back to the property name.
    #[must_use]
    pub fn column_name(&self) -> &str {
        if self.column.is_empty() {
            &self.name
        } else {
            &self.column
        }
    }

    /// Returns whether reaching into this property needs a join.
    #[must_use]
    pub const fn requires_join(&self) -> bool {
        matches!(
            self.kind,
            PropertyKind::Reference { .. } | PropertyKind::Collection { .. }
        )
    }
}

/// Mapping of an aggregate root onto its table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
    /// Aggregate name.
    pub name: String,
    /// Table name.
    pub table: String,
    /// Mapped properties in declaration order.
    pub properties: Vec<PersistentProperty>,
}

impl EntityMetadata {
    /// Creates metadata without properties.
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            properties: Vec::new(),
        }
    }

    /// Appends a property.
    #[must_use]
    pub fn with_property(mut self, property: PersistentProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Looks up a top-level property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PersistentProperty> {
        find_property(&self.properties, name)
    }

    /// Returns the identifier property.
    #[must_use]
    pub fn id_property(&self) -> Option<&PersistentProperty> {
        self.properties.iter().find(|p| p.id)
    }

    /// Columns of the root table in declaration order, with embedded
    /// properties flattened. References and collections live in other
    /// tables and are not listed.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        let mut columns = Vec::new();
        collect_columns(&self.properties, "", &mut columns);
        columns
    }
}

pub(crate) fn find_property<'a>(
    properties: &'a [PersistentProperty],
    name: &str,
) -> Option<&'a PersistentProperty> {
    properties.iter().find(|p| p.name == name)
}

fn collect_columns(properties: &[PersistentProperty], prefix: &str, columns: &mut Vec<String>) {
    for property in properties {
        match &property.kind {
            PropertyKind::Simple => columns.push(format!("{prefix}{}", property.column_name())),
            PropertyKind::Embedded {
                prefix: nested,
                properties,
            } => collect_columns(properties, &format!("{prefix}{nested}"), columns),
            PropertyKind::Reference { .. } | PropertyKind::Collection { .. } => {}
        }
    }
}

/// A type with aggregate mapping metadata, usually derived with
/// `#[derive(Aggregate)]`.
pub trait Aggregate {
    /// Returns the mapping of this aggregate.
    fn metadata() -> &'static EntityMetadata;
}
