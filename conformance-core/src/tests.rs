// Conformance scenarios
//
// End-to-end checks across spec, implementation and validator, plus
// property tests over generated interfaces.

#[cfg(test)]
mod tests {
    use crate::*;
    use proptest::prelude::*;
    use serde_json::{Value, json};
    use std::collections::BTreeMap;

    fn noop(arity: Arity) -> Callable {
        Callable::new(arity, |_| Ok(Value::Null))
    }

    fn build_spec(name: &str, members: &BTreeMap<String, Arity>) -> InterfaceSpec {
        members
            .iter()
            .fold(InterfaceSpec::builder(name), |builder, (member, arity)| builder.member(member.clone(), *arity))
            .build()
            .unwrap()
    }

    fn conforming(members: &BTreeMap<String, Arity>) -> Implementation {
        members.iter().map(|(name, arity)| (name.clone(), noop(*arity))).collect()
    }

    #[test]
    fn test_shape_end_to_end() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .try_init();

        let declaration = Declaration::new()
            .named("Shape")
            .signature("area", 0)
            .implemented_by(Implementation::new().with_function("area", 0, |_| Ok(json!(1))));

        let shape = InterfaceValidator::default().validate_declaration(Some(declaration)).unwrap();

        assert_eq!(shape.names().collect::<Vec<_>>(), vec!["area"]);
        assert_eq!(shape.call("area", &[]).unwrap(), json!(1));
    }

    #[test]
    fn test_shape_wrong_arity_end_to_end() {
        let declaration = Declaration::new()
            .named("Shape")
            .signature("area", 2)
            .implemented_by(Implementation::new().with_function("area", 1, |_| Ok(Value::Null)));

        let err = InterfaceValidator::default().validate_declaration(Some(declaration)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArityMismatch);
    }

    #[test]
    fn test_manifest_driven_validation() {
        let spec = InterfaceSpec::from_toml_str(
            r#"
name = "Store"

[members]
save = 2
load = 1
            "#,
        )
        .unwrap();

        let implementation = Implementation::new()
            .with_function("save", 2, |args| Ok(json!(args.len())))
            .with_function("load", 1, |_| Ok(Value::Null))
            .with_value("_connection", json!("memory://"));

        let store = validate(&spec, &implementation).unwrap();
        assert_eq!(store.call("save", &[json!("k"), json!("v")]).unwrap(), json!(2));
    }

    #[test]
    fn test_idempotent_validation() {
        let spec = InterfaceSpec::builder("Store").member("save", 2).member("load", 1).build().unwrap();
        let implementation = Implementation::new()
            .with_function("save", 2, |_| Ok(Value::Null))
            .with_function("load", 1, |_| Ok(Value::Null));

        let first = validate(&spec, &implementation).unwrap();
        let second = validate(&spec, &implementation).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_validation_errors_flow_through_anyhow() {
        fn load_store() -> anyhow::Result<ValidatedCapability> {
            let spec = InterfaceSpec::builder("Store").member("save", 2).build()?;
            Ok(validate(&spec, &Implementation::new())?)
        }

        let err = load_store().unwrap_err();
        let validation = err.downcast_ref::<ValidationError>().unwrap();
        assert_eq!(validation.to_string(), "Store.save has not been implemented.");
    }

    fn members_strategy() -> impl Strategy<Value = BTreeMap<String, Arity>> {
        prop::collection::btree_map("[a-z][a-z0-9]{0,7}", 0usize..6, 1..8)
    }

    proptest! {
        #[test]
        fn prop_conforming_result_covers_declared_members(members in members_strategy()) {
            let spec = build_spec("Generated", &members);
            let capability = validate(&spec, &conforming(&members)).unwrap();

            let names: Vec<&str> = capability.names().collect();
            let declared: Vec<&str> = members.keys().map(String::as_str).collect();
            prop_assert_eq!(names, declared);
            for (name, arity) in &members {
                prop_assert_eq!(capability.get(name).unwrap().arity(), *arity);
            }
        }

        #[test]
        fn prop_wrong_arity_is_rejected(
            members in members_strategy(),
            pick in any::<prop::sample::Index>(),
            delta in 1usize..4,
        ) {
            let spec = build_spec("Generated", &members);
            let target = pick.get(&members.keys().cloned().collect::<Vec<_>>()).clone();

            let mut implementation = conforming(&members);
            implementation.insert(target.clone(), noop(members[&target] + delta));

            let err = validate(&spec, &implementation).unwrap_err();
            prop_assert_eq!(err.kind(), ErrorKind::ArityMismatch);
            prop_assert_eq!(err.member(), Some(target.as_str()));
        }

        #[test]
        fn prop_private_extras_never_rejected(
            members in members_strategy(),
            extra in "[a-z]{1,8}",
            arity in 0usize..6,
        ) {
            let spec = build_spec("Generated", &members);
            let mut implementation = conforming(&members);
            implementation.insert(format!("_{}", extra), noop(arity));

            let capability = validate(&spec, &implementation).unwrap();
            prop_assert_eq!(capability.len(), members.len());
        }

        #[test]
        fn prop_public_extras_rejected(members in members_strategy(), extra in "[A-Z][a-z]{0,7}") {
            let spec = build_spec("Generated", &members);
            let mut implementation = conforming(&members);
            implementation.insert(extra.clone(), noop(0));

            let err = validate(&spec, &implementation).unwrap_err();
            prop_assert_eq!(err.to_string(), format!("{} is not a defined member of Generated.", extra));
        }
    }
}
