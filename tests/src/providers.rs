//! Canonical providers used across the scenario tests.

use metakit_constraint::matches_pattern;
use metakit_core::TypeKey;
use metakit_provider::Provider;
use metakit_registry::{
    NodePredicate, PlacementConstraint, RegistryBuilder, RegistryResult, UniquenessConstraint,
    ValidationConstraint,
};

/// Base metadata vocabulary: attributes, fields, and objects, plus the
/// structural constraints every deployment carries.
pub struct CoreTypesProvider;

impl Provider for CoreTypesProvider {
    fn id(&self) -> &str {
        "metakit.core"
    }

    fn description(&self) -> &str {
        "Base attr/field/object hierarchy"
    }

    fn register_types(&self, builder: &mut RegistryBuilder) -> RegistryResult<()> {
        builder
            .type_def("attr", "base")
            .description("Base attribute")
            .done()?;
        for sub_type in ["int", "string", "boolean"] {
            builder
                .type_def("attr", sub_type)
                .inherits_from("attr", "base")
                .done()?;
        }

        builder
            .type_def("field", "base")
            .description("Base field")
            .accepts_any_child("attr", "*")
            .done()?;
        builder
            .type_def("field", "string")
            .inherits_from("field", "base")
            .optional_child("attr", "int", "maxLength")
            .optional_child("attr", "string", "pattern")
            .done()?;
        builder
            .type_def("field", "int")
            .inherits_from("field", "base")
            .optional_child("attr", "int", "minValue")
            .optional_child("attr", "int", "maxValue")
            .done()?;

        builder
            .type_def("object", "base")
            .description("Base object")
            .accepts_any_child("field", "*")
            .done()?;
        builder
            .type_def("object", "pojo")
            .inherits_from("object", "base")
            .required_child("attr", "string", "class")
            .child_alias("class", "className")
            .done()?;
        Ok(())
    }

    fn register_constraints(&self, builder: &mut RegistryBuilder) -> RegistryResult<()> {
        builder.register_constraint(UniquenessConstraint::of_child_names(
            "object.unique-children",
            "an object's children must have unique names",
            NodePredicate::pattern("object"),
        ))?;
        builder.register_constraint(ValidationConstraint::new(
            "attr.int-value",
            "int attributes hold integer values",
            NodePredicate::pattern("attr.int"),
            |_, value| value.is_null() || value.is_int(),
        ))?;
        builder.register_constraint(PlacementConstraint::forbid(
            "field.no-nesting",
            "fields may not contain other fields",
            NodePredicate::pattern("field"),
            NodePredicate::pattern("field"),
        ))?;
        Ok(())
    }
}

/// A module that maps metadata onto database tables. Adds its own
/// types, grafts column attributes onto fields it does not own, and
/// widens placement beyond the core shape.
pub struct DatabaseExtensionProvider;

impl Provider for DatabaseExtensionProvider {
    fn id(&self) -> &str {
        "metakit.db"
    }

    fn description(&self) -> &str {
        "Database mapping extensions"
    }

    fn dependencies(&self) -> &[&str] {
        &["metakit.core"]
    }

    fn register_types(&self, builder: &mut RegistryBuilder) -> RegistryResult<()> {
        builder
            .type_def("index", "btree")
            .description("B-tree index over object fields")
            .accepts_any_child("attr", "*")
            .done()?;
        builder.extend_type(&TypeKey::new("field", "base"), |ext| {
            ext.optional_child("attr", "string", "dbColumn")
        })?;
        Ok(())
    }

    fn register_constraints(&self, builder: &mut RegistryBuilder) -> RegistryResult<()> {
        builder.register_constraint(PlacementConstraint::allow(
            "db.index-placement",
            "objects may carry indexes",
            NodePredicate::pattern("object"),
            NodePredicate::pattern("index"),
        ))?;
        let column_name = matches_pattern(
            "db.column-name",
            "column names are lowercase identifiers",
            NodePredicate::pattern("attr.string[dbColumn]"),
            "^[a-z][a-z0-9_]*$",
        )
        .expect("column-name pattern is valid");
        builder.register_constraint(column_name)?;
        Ok(())
    }
}
