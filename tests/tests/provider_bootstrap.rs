//! End-to-end provider wiring: dependency ordering, cross-provider
//! extension, and the process-wide registry slot.

use metakit_tests::prelude::*;
use std::sync::Arc;

mod wiring {
    use super::*;

    #[test]
    fn test_bootstrap_orders_providers_by_dependency() {
        // GIVEN the db provider added before the core it depends on
        let mut set = ProviderSet::new();
        set.add(DatabaseExtensionProvider).unwrap();
        set.add(CoreTypesProvider).unwrap();

        // THEN bootstrap reorders and succeeds
        assert_eq!(
            set.resolution_order().unwrap(),
            ["metakit.core", "metakit.db"]
        );
        let registry = set.bootstrap().unwrap();
        assert!(registry.has_type(&TypeKey::new("field", "string")));
        assert!(registry.has_type(&TypeKey::new("index", "btree")));
    }

    #[test]
    fn test_extension_is_visible_through_inheritance() {
        // GIVEN the db provider extends field.base with dbColumn
        let mut set = ProviderSet::new();
        set.add(CoreTypesProvider).unwrap();
        set.add(DatabaseExtensionProvider).unwrap();
        let registry = set.bootstrap().unwrap();

        // THEN every derived field type accepts the grafted attribute
        for sub_type in ["string", "int"] {
            assert!(registry.accepts_child(
                &TypeKey::new("field", sub_type),
                "attr",
                "string",
                "dbColumn"
            ));
        }
    }

    #[test]
    fn test_missing_dependency_fails_bootstrap() {
        // GIVEN only the dependent provider
        let mut set = ProviderSet::new();
        set.add(DatabaseExtensionProvider).unwrap();

        // THEN the wiring bug is reported, not skipped
        let err = set.bootstrap().unwrap_err();
        assert!(err.to_string().contains("metakit.core"));
    }

    #[test]
    fn test_registration_errors_surface_through_bootstrap() {
        // GIVEN a provider that derives from a type nobody registers
        struct Broken;
        impl Provider for Broken {
            fn id(&self) -> &str {
                "broken"
            }
            fn register_types(
                &self,
                builder: &mut RegistryBuilder,
            ) -> Result<(), RegistryError> {
                builder
                    .type_def("field", "orphan")
                    .inherits_from("field", "ghost")
                    .done()
            }
        }

        // WHEN
        let mut set = ProviderSet::new();
        set.add(Broken).unwrap();
        let err = set.bootstrap().unwrap_err();

        // THEN the registry error passes through unchanged
        assert!(err.to_string().contains("field.ghost"));
    }

    #[test]
    fn test_constraints_see_types_from_later_providers() {
        // GIVEN a constraint-only provider with no declared dependencies,
        // added ahead of the provider defining the types it targets
        struct ObjectChecks;
        impl Provider for ObjectChecks {
            fn id(&self) -> &str {
                "metakit.checks"
            }
            fn register_constraints(
                &self,
                builder: &mut RegistryBuilder,
            ) -> Result<(), RegistryError> {
                builder.register_constraint(PlacementConstraint::forbid(
                    "checks.no-objects-in-objects",
                    "objects may not nest",
                    NodePredicate::pattern("object"),
                    NodePredicate::pattern("object"),
                ))
            }
        }

        let mut set = ProviderSet::new();
        set.add(ObjectChecks).unwrap();
        set.add(CoreTypesProvider).unwrap();
        let registry = set.bootstrap().unwrap();

        // THEN the constraint is live against the core's types
        let enforcer = ConstraintEnforcer::new(&registry);
        let outer = TestNode::new("object", "pojo", "outer");
        let inner = TestNode::new("object", "pojo", "inner");
        assert!(enforcer.check_placement(&outer, &inner).is_err());
    }
}

mod global_slot {
    use super::*;
    use metakit_registry::{global, install_global, reset_global};

    // The slot is shared process state, so the whole lifecycle lives in
    // one test rather than racing across several.
    #[test]
    fn test_production_wiring_through_the_global_slot() {
        // GIVEN a bootstrapped registry installed process-wide
        let mut set = ProviderSet::new();
        set.add(CoreTypesProvider).unwrap();
        set.add(DatabaseExtensionProvider).unwrap();
        let registry = Arc::new(set.bootstrap().unwrap());
        reset_global();
        install_global(Arc::clone(&registry));

        // THEN code without a registry parameter can consult it
        let seen = global().expect("registry installed");
        assert!(Arc::ptr_eq(&seen, &registry));
        assert!(seen.accepts_child(
            &TypeKey::new("field", "string"),
            "attr",
            "int",
            "maxLength"
        ));

        // AND a test that wants isolation builds a private instance
        // without touching the slot
        let mut private = RegistryBuilder::new();
        private.type_def("widget", "button").done().unwrap();
        let private = private.build().unwrap();
        assert!(private.has_type(&TypeKey::new("widget", "button")));
        assert!(!private.has_type(&TypeKey::new("field", "string")));
        assert!(global().unwrap().has_type(&TypeKey::new("field", "string")));

        // AND teardown empties the slot
        reset_global();
        assert!(global().is_none());
    }
}
