//! End-to-end mapping scenarios through the engine façade.

use granite_map::{
    EngineOptions, MapError, MappingEngine, MappingProfile, SharedCache, Transformer, TypeMapping,
};
use granite_model::{RECORD_TYPE, TypeRegistry, TypeSchema, Value, ValueKind};
use serde::Serialize;
use serde_json::json;

fn registry() -> TypeRegistry {
    let mut types = TypeRegistry::new();
    types.register(
        TypeSchema::builder("User")
            .property("id", ValueKind::Int)
            .property("first_name", ValueKind::Text)
            .property("last_name", ValueKind::Text)
            .property("email", ValueKind::Text)
            .build()
            .expect("valid schema"),
    );
    types.register(
        TypeSchema::builder("AuditedUser")
            .property("id", ValueKind::Int)
            .property("name", ValueKind::Text)
            .read_only_property("created_at", ValueKind::Text)
            .build()
            .expect("valid schema"),
    );
    types
}

fn id_mapping() -> TypeMapping {
    let mut mapping = TypeMapping::new(RECORD_TYPE, "User");
    mapping
        .for_member("id")
        .expect("unsealed")
        .map_from("user_id");
    mapping
}

#[test]
fn explicit_rules_and_conventions_combine() {
    let mut engine = MappingEngine::new(registry());
    engine.add_mapping(id_mapping()).expect("valid mapping");

    let source = json!({
        "user_id": 7,
        "firstName": "Ann",
        "lastName": "Lee",
        "email": "ann@example.com"
    });
    let mapped = engine.map(&source, "User").expect("maps");
    assert_eq!(mapped.value["id"], json!(7));
    assert_eq!(mapped.value["first_name"], json!("Ann"));
    assert_eq!(mapped.value["last_name"], json!("Lee"));
    assert_eq!(mapped.value["email"], json!("ann@example.com"));
    assert!(mapped.warnings.is_empty());
}

#[test]
fn profile_with_transformer_default_and_ignore() {
    let mut engine = MappingEngine::new(registry());
    engine.register_transformer("strings", "upper", |value, _| {
        Ok(Value::from(
            value.as_str().unwrap_or_default().to_uppercase(),
        ))
    });

    let mut profile = MappingProfile::new("users");
    let mapping = profile.create_map(RECORD_TYPE, "User");
    mapping
        .for_member("first_name")
        .expect("unsealed")
        .map_from("fname")
        .transform(Transformer::named("strings", "upper"));
    mapping
        .for_member("email")
        .expect("unsealed")
        .map_from("contact")
        .default_value(json!("unknown@example.com"));
    mapping.for_member("last_name").expect("unsealed").ignore();
    engine.add_profile(profile).expect("valid profile");

    let mapped = engine
        .map(&json!({"fname": "ann"}), "User")
        .expect("maps");
    assert_eq!(mapped.value["first_name"], json!("ANN"));
    assert_eq!(mapped.value["email"], json!("unknown@example.com"));
    assert!(mapped.value.get("last_name").is_none());
}

#[test]
fn struct_sources_map_under_their_type_name() {
    #[derive(Serialize)]
    struct Account {
        user_id: u32,
        first_name: String,
    }

    let mut engine = MappingEngine::new(registry());
    let mut mapping = TypeMapping::new("Account", "User");
    mapping
        .for_member("id")
        .expect("unsealed")
        .map_from("user_id");
    engine.add_mapping(mapping).expect("valid mapping");

    let mapped = engine
        .map_from(
            &Account {
                user_id: 7,
                first_name: "Ann".to_string(),
            },
            "User",
        )
        .expect("maps");
    assert_eq!(mapped.value["id"], json!(7));
    assert_eq!(mapped.value["first_name"], json!("Ann"));
}

#[test]
fn shared_cache_is_hit_on_repeat_mappings() {
    let cache = SharedCache::new();
    let mut engine = MappingEngine::with_cache(registry(), Box::new(cache.clone()));
    let source = json!({"id": 1, "first_name": "Ann"});

    engine.map(&source, "User").expect("first map");
    engine.map(&source, "User").expect("second map");

    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
}

#[test]
fn map_to_updates_in_place_and_reports_read_only_skips() {
    let mut engine = MappingEngine::new(registry());
    let mut existing = json!({"id": 1, "name": "Old", "created_at": "then"});

    let warnings = engine
        .map_to(
            &json!({"id": 2, "name": "New", "created_at": "now"}),
            &mut existing,
            "AuditedUser",
        )
        .expect("populates");
    assert_eq!(existing["id"], json!(2));
    assert_eq!(existing["name"], json!("New"));
    assert_eq!(existing["created_at"], json!("then"));
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].property, "created_at");
}

#[test]
fn map_to_rejects_non_object_instances() {
    let mut engine = MappingEngine::new(registry());
    let mut existing = json!(42);
    let err = engine
        .map_to(&json!({"id": 1}), &mut existing, "User")
        .expect_err("not an object");
    assert!(matches!(err, MapError::Mapping { .. }));
}

#[test]
fn map_array_fails_on_first_bad_element() {
    let mut engine = MappingEngine::new(registry());
    let sources = vec![json!({"id": 1}), json!({"id": 2})];
    let mapped = engine.map_array(&sources, "User").expect("all map");
    assert_eq!(mapped.len(), 2);
    assert_eq!(mapped[1].value["id"], json!(2));

    let bad = vec![json!({"id": 1}), json!("scalar")];
    let err = engine.map_array(&bad, "User").expect_err("scalar element");
    assert!(matches!(err, MapError::UnsupportedSource { .. }));
}

#[test]
fn scalar_sources_are_rejected_with_kind() {
    let mut engine = MappingEngine::new(registry());
    let err = engine.map(&json!(3.5), "User").expect_err("scalar");
    match err {
        MapError::UnsupportedSource { kind } => assert_eq!(kind, "number"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_destination_type_is_rejected() {
    let mut engine = MappingEngine::new(registry());
    let err = engine
        .map(&json!({"id": 1}), "Ghost")
        .expect_err("unknown type");
    assert!(matches!(err, MapError::DestinationTypeNotFound(_)));
}

#[test]
fn disabled_conventions_leave_renamed_keys_unmatched() {
    let mut engine = MappingEngine::new(registry());
    engine.set_options(EngineOptions {
        conventions_enabled: false,
        convention_threshold: 0.8,
    });
    let mapped = engine
        .map(&json!({"firstName": "Ann"}), "User")
        .expect("maps");
    assert_eq!(mapped.value["first_name"], Value::Null);
}

#[test]
fn reverse_map_inverts_explicit_renames() {
    let mut engine = MappingEngine::new(registry());
    engine.add_mapping(id_mapping()).expect("valid mapping");

    let reverse = engine
        .reverse_map(RECORD_TYPE, "User")
        .expect("derives reverse");
    assert_eq!(reverse.source_type(), "User");
    assert_eq!(reverse.dest_type(), RECORD_TYPE);
    assert!(reverse.is_sealed());
    let rule = reverse.rule("user_id").expect("inverted rename");
    assert_eq!(rule.source.as_deref(), Some("id"));
    assert!(reverse.rule("first_name").is_none());
}

#[test]
fn derived_reverse_mapping_maps_back() {
    let mut engine = MappingEngine::new(registry());
    engine.add_mapping(id_mapping()).expect("valid mapping");

    let reverse = engine
        .reverse_map(RECORD_TYPE, "User")
        .expect("derives reverse");
    engine.add_mapping(reverse).expect("registers reverse");

    let mapped = engine
        .map_as("User", &json!({"id": 7, "first_name": "Ann"}), RECORD_TYPE)
        .expect("maps back");
    assert_eq!(mapped.value["user_id"], json!(7));
    assert_eq!(mapped.value["first_name"], json!("Ann"));
}

#[test]
fn conventions_can_be_re_enabled() {
    let mut engine = MappingEngine::new(registry());
    engine.set_options(EngineOptions {
        conventions_enabled: false,
        convention_threshold: 0.8,
    });
    let mapped = engine
        .map(&json!({"firstName": "Ann"}), "User")
        .expect("maps");
    assert_eq!(mapped.value["first_name"], Value::Null);

    engine.set_options(EngineOptions {
        conventions_enabled: true,
        convention_threshold: 0.8,
    });
    let mapped = engine
        .map(&json!({"firstName": "Ann"}), "User")
        .expect("maps");
    assert_eq!(mapped.value["first_name"], json!("Ann"));
}

#[test]
fn warm_up_counts_declared_pairs() {
    let mut engine = MappingEngine::new(registry());
    engine.add_mapping(id_mapping()).expect("valid mapping");
    assert_eq!(engine.warm_up().expect("warms"), 1);
}
