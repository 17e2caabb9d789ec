//! Registry scenarios: registration, inheritance, and child acceptance
//! across a realistic type hierarchy.

use metakit_tests::prelude::*;
use std::collections::HashSet;

fn core_registry() -> Registry {
    let mut set = ProviderSet::new();
    set.add(CoreTypesProvider).unwrap();
    set.bootstrap().unwrap()
}

mod string_field {
    use super::*;

    #[test]
    fn test_named_requirement_is_visible_on_the_type() {
        // GIVEN field.string derived from field.base
        let registry = core_registry();

        // THEN its maxLength rule is a direct requirement
        let def = registry.get("field", "string").unwrap();
        let names: Vec<&str> = def
            .direct_requirements()
            .filter(|req| req.is_named())
            .map(|req| req.name.as_str())
            .collect();
        assert!(names.contains(&"maxLength"));
    }

    #[test]
    fn test_name_match_with_wrong_type_is_rejected() {
        // GIVEN
        let registry = core_registry();
        let parent = TypeKey::new("field", "string");

        // THEN the declared type is accepted
        assert!(registry.accepts_child(&parent, "attr", "int", "maxLength"));

        // AND the same name with a different subtype falls through to
        // the inherited attr wildcard instead of the named rule
        let def = registry.get("field", "string").unwrap();
        let req = def.matching_requirement("attr", "string", "maxLength").unwrap();
        assert!(!req.is_named());

        // AND a non-attr child under that name matches nothing
        assert!(!registry.accepts_child(&parent, "object", "base", "maxLength"));
    }

    #[test]
    fn test_inherited_wildcard_accepts_undeclared_attributes() {
        // GIVEN field.base accepts any attr
        let registry = core_registry();
        let parent = TypeKey::new("field", "string");

        // THEN the derived type accepts attributes it never declared
        assert!(registry.accepts_child(&parent, "attr", "boolean", "indexed"));
    }
}

mod wildcard_object {
    use super::*;

    #[test]
    fn test_any_field_is_accepted_under_any_object() {
        // GIVEN object.base with a (*, field, *) rule
        let registry = core_registry();

        // THEN every field subtype and name is accepted, on the base
        // and on the derived object alike
        for parent in [TypeKey::new("object", "base"), TypeKey::new("object", "pojo")] {
            assert!(registry.accepts_child(&parent, "field", "string", "email"));
            assert!(registry.accepts_child(&parent, "field", "int", "age"));
        }

        // AND attributes are not fields
        assert!(!registry.accepts_child(
            &TypeKey::new("object", "base"),
            "attr",
            "int",
            "maxLength"
        ));
    }

    #[test]
    fn test_wildcard_requirements_are_never_missing() {
        // GIVEN an object with zero fields
        let registry = core_registry();

        // THEN the wildcard field rule is not reported missing
        let missing = registry
            .missing_required_children(&TypeKey::new("object", "base"), &HashSet::new())
            .unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn test_required_named_children_are_reported_until_satisfied() {
        // GIVEN object.pojo requiring a class attribute
        let registry = core_registry();
        let parent = TypeKey::new("object", "pojo");

        // WHEN nothing is attached
        let missing = registry
            .missing_required_children(&parent, &HashSet::new())
            .unwrap();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].name, "class");

        // THEN attaching under the alias satisfies the rule too
        let existing: HashSet<String> = ["className".to_string()].into_iter().collect();
        assert!(registry
            .missing_required_children(&parent, &existing)
            .unwrap()
            .is_empty());
    }
}

mod inheritance {
    use super::*;

    #[test]
    fn test_inherited_requirements_are_parent_rules_minus_overrides() {
        // GIVEN a child that redefines one parent rule and adds one
        let mut builder = RegistryBuilder::new();
        builder
            .type_def("field", "base")
            .optional_child("attr", "int", "maxLength")
            .optional_child("attr", "string", "label")
            .done()
            .unwrap();
        builder
            .type_def("field", "string")
            .inherits_from("field", "base")
            .required_child("attr", "int", "maxLength")
            .optional_child("attr", "string", "pattern")
            .done()
            .unwrap();
        let registry = builder.build().unwrap();

        // THEN the inherited layer is exactly the parent's rules with
        // the overridden key removed
        let def = registry.get("field", "string").unwrap();
        let inherited: Vec<&str> = def
            .inherited_requirements()
            .map(|req| req.name.as_str())
            .collect();
        assert_eq!(inherited, ["label"]);

        // AND the redefined rule carries the child's version
        let req = def.matching_requirement("attr", "int", "maxLength").unwrap();
        assert!(req.required);
    }

    #[test]
    fn test_three_level_chain_resolves_closest_ancestor_wins() {
        // GIVEN base declares a rule, middle redefines it, leaf is empty
        let mut builder = RegistryBuilder::new();
        builder
            .type_def("field", "base")
            .optional_child("attr", "int", "maxLength")
            .done()
            .unwrap();
        builder
            .type_def("field", "string")
            .inherits_from("field", "base")
            .required_child("attr", "int", "maxLength")
            .done()
            .unwrap();
        builder
            .type_def("field", "email")
            .inherits_from("field", "string")
            .done()
            .unwrap();
        let registry = builder.build().unwrap();

        // THEN the leaf sees the middle type's redefinition
        let leaf = registry.get("field", "email").unwrap();
        assert!(leaf
            .matching_requirement("attr", "int", "maxLength")
            .unwrap()
            .required);
    }
}

mod registration {
    use super::*;

    #[test]
    fn test_applying_the_core_provider_twice_is_idempotent() {
        // GIVEN one application
        let mut builder = RegistryBuilder::new();
        CoreTypesProvider.register_types(&mut builder).unwrap();
        let count = builder.build().unwrap().type_count();

        // WHEN types are registered twice over
        let mut builder = RegistryBuilder::new();
        CoreTypesProvider.register_types(&mut builder).unwrap();
        CoreTypesProvider.register_types(&mut builder).unwrap();

        // THEN the type table is unchanged
        assert_eq!(builder.build().unwrap().type_count(), count);
    }

    #[test]
    fn test_conflicting_implementation_aborts_registration() {
        // GIVEN field.string bound to one implementation
        let mut builder = RegistryBuilder::new();
        builder
            .type_def("field", "string")
            .implementation("fields::StringField")
            .done()
            .unwrap();

        // WHEN another implementation claims the same qualified name
        let err = builder
            .type_def("field", "string")
            .implementation("other::StringField")
            .done()
            .unwrap_err();

        // THEN
        assert!(matches!(err, RegistryError::DuplicateType { .. }));
    }

    #[test]
    fn test_forward_parent_references_are_rejected() {
        let mut builder = RegistryBuilder::new();
        let err = builder
            .type_def("field", "string")
            .inherits_from("field", "base")
            .done()
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownParent { .. }));
    }
}

mod diagnostics {
    use super::*;

    #[test]
    fn test_supported_children_description_lists_every_rule() {
        // GIVEN
        let registry = core_registry();

        // WHEN
        let description = registry
            .describe_supported_children(&TypeKey::new("field", "string"))
            .unwrap();

        // THEN direct, inherited, named, and wildcard rules all appear
        assert!(description.contains("optional attribute 'maxLength' of type int"));
        assert!(description.contains("optional attribute 'pattern' of type string"));
        assert!(description.contains("optional attribute"));

        // AND unknown types are an error, not an empty string
        assert!(registry
            .describe_supported_children(&TypeKey::new("ghost", "type"))
            .is_err());
    }

    #[test]
    fn test_enumeration_and_stats_cover_the_whole_table() {
        // GIVEN
        let registry = core_registry();

        // THEN enumeration and stats agree
        let stats = registry.stats();
        assert_eq!(stats.type_count, registry.all_types().count());
        assert_eq!(
            stats.types_by_type_name.iter().map(|(_, n)| n).sum::<usize>(),
            stats.type_count
        );
        assert_eq!(registry.constraints().len(), stats.constraint_count);
        assert!(registry.verify().healthy);
    }
}
