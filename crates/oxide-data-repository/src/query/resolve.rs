//! Mapping property names and paths onto columns of the root table.

use oxide_data_core::{Dialect, PropertyType};
use serde::Serialize;

use crate::mapping::{EntityMetadata, PersistentProperty, PropertyKind};
use crate::paging::{Direction, NullHandling, Order};

/// A property path resolved to a column of the root table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedProperty {
    /// Dotted property path, e.g. `address.city`.
    pub path: String,
    /// Unquoted column name, e.g. `address_city`.
    pub column: String,
    /// Type of the leaf property.
    pub property_type: PropertyType,
}

/// A sort criterion over a resolved property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedOrder {
    /// Sorted column.
    pub property: ResolvedProperty,
    /// Sort direction.
    pub direction: Direction,
    /// NULL placement.
    pub null_handling: NullHandling,
    /// Compare case-insensitively. Only set on text columns.
    pub ignore_case: bool,
}

/// Resolves property names against an aggregate for one dialect.
///
/// Names are accepted in camel case as they appear in method names
/// (`AddressCity`), in snake case (`address_city`) or as dotted paths
/// (`address.city`). Without dots, the longest matching property name is
/// tried first when walking into embedded values.
#[derive(Debug, Clone, Copy)]
pub struct PropertyResolver<'a> {
    entity: &'a EntityMetadata,
    dialect: Dialect,
}

struct Located<'a> {
    property: &'a PersistentProperty,
    path: String,
    column_prefix: String,
}

impl<'a> PropertyResolver<'a> {
    /// Creates a resolver.
    #[must_use]
    pub const fn new(entity: &'a EntityMetadata, dialect: Dialect) -> Self {
        Self { entity, dialect }
    }

    /// Returns whether `name` names a property of the aggregate, whether or
    /// not it can be used in a query.
    #[must_use]
    pub fn is_property(&self, name: &str) -> bool {
        self.locate(name).is_ok()
    }

    /// Resolves `name` to a column usable in criteria and sorts.
    ///
    /// # Errors
    ///
    /// Returns the reason when the property does not exist, needs a join,
    /// is an embedded value as a whole, or is not a simple type on the
    /// dialect.
    pub fn resolve(&self, name: &str) -> Result<ResolvedProperty, String> {
        let located = self.locate(name)?;
        let property = located.property;
        match &property.kind {
            PropertyKind::Reference { target } | PropertyKind::Collection { target } => {
                return Err(format!(
                    "property `{}` of `{}` refers to `{target}` and requires a join",
                    located.path, self.entity.name
                ));
            }
            PropertyKind::Embedded { .. } => {
                return Err(format!(
                    "embedded value `{}` cannot be compared as a whole, name one of its properties",
                    located.path
                ));
            }
            PropertyKind::Simple => {}
        }
        if !self.dialect.is_simple_type(&property.property_type) {
            return Err(format!(
                "property `{}` of type {} is not a simple type on {}",
                located.path,
                property.property_type,
                self.dialect.name()
            ));
        }
        Ok(ResolvedProperty {
            column: format!("{}{}", located.column_prefix, property.column_name()),
            path: located.path,
            property_type: property.property_type.clone(),
        })
    }

    /// Resolves a sort criterion.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`].
    pub fn resolve_order(&self, order: &Order) -> Result<ResolvedOrder, String> {
        let property = self.resolve(&order.property)?;
        Ok(ResolvedOrder {
            ignore_case: order.ignore_case && property.property_type.is_text(),
            property,
            direction: order.direction,
            null_handling: order.null_handling,
        })
    }

    fn locate(&self, name: &str) -> Result<Located<'a>, String> {
        let unknown = || format!("no property `{name}` on `{}`", self.entity.name);
        if name.is_empty() {
            return Err(unknown());
        }
        let segments: Vec<Vec<String>> = name.split('.').map(words).collect();
        if segments.iter().any(Vec::is_empty) {
            return Err(unknown());
        }
        let mut located: Option<Located<'a>> = None;
        let mut properties = self.entity.properties.as_slice();
        let mut column_prefix = String::new();
        let mut path = Vec::new();
        for (i, segment) in segments.iter().enumerate() {
            if let Some(found) = &located {
                let PropertyKind::Embedded { prefix, properties: nested } = &found.property.kind
                else {
                    return Err(self.traversal_error(found));
                };
                column_prefix.push_str(prefix);
                properties = nested;
            }
            let last = i + 1 == segments.len();
            let found = if last {
                walk(properties, segment, &mut path, &mut column_prefix)
            } else {
                find(properties, &segment.join("_")).map(|p| {
                    path.push(p.name.clone());
                    p
                })
            };
            let found = found.ok_or_else(unknown)?;
            located = Some(Located {
                property: found,
                path: path.join("."),
                column_prefix: column_prefix.clone(),
            });
        }
        located.ok_or_else(unknown)
    }

    fn traversal_error(&self, found: &Located<'_>) -> String {
        if found.property.requires_join() {
            format!(
                "property `{}` of `{}` requires a join",
                found.path, self.entity.name
            )
        } else {
            format!("cannot traverse into simple property `{}`", found.path)
        }
    }
}

/// Finds the property spelled by `words`, walking through embedded values
/// on longest-prefix matches. Stops at the first reference or collection
/// so that callers report the join.
fn walk<'a>(
    properties: &'a [PersistentProperty],
    words: &[String],
    path: &mut Vec<String>,
    column_prefix: &mut String,
) -> Option<&'a PersistentProperty> {
    for end in (1..=words.len()).rev() {
        let Some(property) = find(properties, &words[..end].join("_")) else {
            continue;
        };
        if end == words.len() || property.requires_join() {
            path.push(property.name.clone());
            if end < words.len() {
                path.extend(words[end..].iter().cloned());
            }
            return Some(property);
        }
        if let PropertyKind::Embedded {
            prefix,
            properties: nested,
        } = &property.kind
        {
            let mut nested_path = path.clone();
            nested_path.push(property.name.clone());
            let mut nested_prefix = format!("{column_prefix}{prefix}");
            if let Some(found) = walk(nested, &words[end..], &mut nested_path, &mut nested_prefix)
            {
                *path = nested_path;
                *column_prefix = nested_prefix;
                return Some(found);
            }
        }
    }
    None
}

fn find<'a>(properties: &'a [PersistentProperty], name: &str) -> Option<&'a PersistentProperty> {
    properties
        .iter()
        .find(|p| p.name == name || p.name.eq_ignore_ascii_case(name))
}

/// Splits a camel or snake case name into lower case words.
///
/// `AddressCity` -> `address`, `city`; `HTTPStatus` -> `http`, `status`.
pub(crate) fn words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev_lower = chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit();
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev_lower || next_lower {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use oxide_data_core::{DialectKind, VendorType};

    use super::*;

    fn person() -> EntityMetadata {
        EntityMetadata::new("Person", "person")
            .with_property(PersistentProperty::simple("id", PropertyType::Int64).id())
            .with_property(PersistentProperty::simple("first_name", PropertyType::Text))
            .with_property(
                PersistentProperty::simple("external_id", PropertyType::Vendor(VendorType::Uuid)),
            )
            .with_property(PersistentProperty::embedded(
                "address",
                "addr_",
                vec![
                    PersistentProperty::simple("city", PropertyType::Text),
                    PersistentProperty::simple("zip_code", PropertyType::Text),
                ],
            ))
            .with_property(PersistentProperty::reference("employer", "Company"))
    }

    fn resolver(entity: &EntityMetadata) -> PropertyResolver<'_> {
        PropertyResolver::new(entity, Dialect::of(DialectKind::Postgres))
    }

    #[test]
    fn test_words() {
        assert_eq!(words("FirstName"), vec!["first", "name"]);
        assert_eq!(words("first_name"), vec!["first", "name"]);
        assert_eq!(words("HTTPStatus"), vec!["http", "status"]);
        assert_eq!(words("Address2City"), vec!["address2", "city"]);
    }

    #[test]
    fn test_direct_property() {
        let entity = person();
        let resolved = resolver(&entity).resolve("FirstName").unwrap();
        assert_eq!(resolved.path, "first_name");
        assert_eq!(resolved.column, "first_name");
    }

    #[test]
    fn test_embedded_traversal() {
        let entity = person();
        let resolver = resolver(&entity);
        for name in ["AddressZipCode", "address.zip_code", "Address_ZipCode"] {
            let resolved = resolver.resolve(name).unwrap();
            assert_eq!(resolved.path, "address.zip_code", "{name}");
            assert_eq!(resolved.column, "addr_zip_code", "{name}");
        }
    }

    #[test]
    fn test_join_is_rejected() {
        let entity = person();
        let resolver = resolver(&entity);
        let err = resolver.resolve("EmployerName").unwrap_err();
        assert!(err.contains("requires a join"), "{err}");
        let err = resolver.resolve("employer.name").unwrap_err();
        assert!(err.contains("requires a join"), "{err}");
        assert!(resolver.is_property("EmployerName"));
    }

    #[test]
    fn test_unknown_and_whole_embedded() {
        let entity = person();
        let resolver = resolver(&entity);
        assert!(resolver.resolve("Nickname").unwrap_err().contains("no property"));
        assert!(resolver.resolve("Address").unwrap_err().contains("as a whole"));
        assert!(!resolver.is_property("Log"));
    }

    #[test]
    fn test_vendor_type_depends_on_dialect() {
        let entity = person();
        assert!(resolver(&entity).resolve("ExternalId").is_ok());
        let mysql = PropertyResolver::new(&entity, Dialect::of(DialectKind::MySql));
        let err = mysql.resolve("ExternalId").unwrap_err();
        assert!(err.contains("not a simple type on mysql"), "{err}");
    }
}
