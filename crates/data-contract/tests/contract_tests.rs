//! Integration tests for the data_contract! macro.

#![allow(dead_code)]

use std::any::TypeId;

use data_contract::prelude::*;
use data_contract::{MethodDefinition, ReturnShape};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub entity_id: String,
    pub entity_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntity {
    pub entity_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum EntityNotFound {
    EntityNotFound,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum CreateFailure {
    EntityAlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntityError {
    pub reason: CreateFailure,
    pub existing_entity: Entity,
}

data_contract! {
    /// Entity persistence contract.
    pub contract EntityMethods => EntityDataProvider {
        /// Look up an entity by its exact name.
        fn find_entity_by_name(String) -> Entity, errors = EntityNotFound;
        // Input type shares its name with the generated marker
        fn create_entity(CreateEntity) -> Result<Entity, CreateEntityError>;
        fn count_entities() -> u64;
        #[method(name = "purge")]
        fn delete_all_entities(()) -> ();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityQuery {
    pub name_prefix: Option<String>,
    #[serde(default)]
    pub limit: u32,
    pub min_score: Option<f64>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityPage {
    pub entities: Vec<Entity>,
    pub next_cursor: Option<String>,
    pub score: f64,
}

data_contract! {
    pub contract QueryMethods => QueryProvider {
        fn query_entities(EntityQuery) -> EntityPage;
    }
}

data_contract! {
    pub(crate) contract NothingMethods => NothingProvider {}
}

#[test]
fn test_method_names_in_declaration_order() {
    assert_eq!(
        EntityMethods::METHOD_NAMES,
        ["findEntityByName", "createEntity", "countEntities", "purge"]
    );
    assert_eq!(entity_methods::FindEntityByName::NAME, "findEntityByName");
    assert_eq!(entity_methods::DeleteAllEntities::NAME, "purge");
}

#[test]
fn test_marker_associated_types() {
    assert_eq!(
        TypeId::of::<<entity_methods::CreateEntity as DataMethod>::Input>(),
        TypeId::of::<CreateEntity>()
    );
    assert_eq!(
        TypeId::of::<<entity_methods::CountEntities as DataMethod>::Input>(),
        TypeId::of::<()>()
    );
    assert_eq!(
        TypeId::of::<<entity_methods::CountEntities as DataMethod>::Errors>(),
        TypeId::of::<NoErrors>()
    );
}

#[test]
fn test_outcome_is_res_when_errors_declared() {
    assert_eq!(
        TypeId::of::<Outcome<entity_methods::FindEntityByName>>(),
        TypeId::of::<Res<Entity, EntityNotFound>>()
    );
    assert_eq!(
        TypeId::of::<Outcome<entity_methods::CreateEntity>>(),
        TypeId::of::<Res<Entity, CreateEntityError>>()
    );
}

#[test]
fn test_outcome_is_bare_without_errors() {
    assert_eq!(
        TypeId::of::<Outcome<entity_methods::CountEntities>>(),
        TypeId::of::<u64>()
    );
    assert_eq!(
        TypeId::of::<Outcome<entity_methods::DeleteAllEntities>>(),
        TypeId::of::<()>()
    );
}

#[test]
fn test_definitions_match_markers() {
    let definitions = EntityMethods::definitions();
    assert_eq!(definitions.len(), 4);
    assert_eq!(
        definitions[0],
        MethodDefinition::new(
            "findEntityByName",
            Schema::of::<String>(),
            Schema::of::<Entity>(),
            Some(Schema::of::<EntityNotFound>()),
        )
    );
    assert!(definitions[2].schemas().errors.is_no_errors());
}

#[test]
fn test_find_rejects_non_string_input() {
    let validator = EntityMethods::validator();
    let find = validator.get("findEntityByName").unwrap();

    let issues = find.input.safe_parse(&json!(17)).unwrap_err();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues.issues()[0].instance_path, "");
}

#[test]
fn test_create_accepts_and_strips() {
    let validator = EntityMethods::validator();
    let create = validator.method::<entity_methods::CreateEntity>().unwrap();

    assert_eq!(
        create.input.safe_parse(&json!({"entityName": "test"})).unwrap(),
        json!({"entityName": "test"})
    );
    // Unknown keys are dropped from the decoded value
    assert_eq!(
        create
            .input
            .safe_parse(&json!({"entityId": "1", "entityName": "test"}))
            .unwrap(),
        json!({"entityName": "test"})
    );
}

#[test]
fn test_error_schemas() {
    let validator = EntityMethods::validator();

    let find = validator.get("findEntityByName").unwrap();
    assert!(find.errors.safe_parse(&json!("EntityNotFound")).is_ok());
    assert!(find.errors.safe_parse(&json!("Other")).is_err());

    let create = validator.get("createEntity").unwrap();
    let payload = json!({
        "reason": "EntityAlreadyExists",
        "existingEntity": {"entityId": "1", "entityName": "test"}
    });
    assert_eq!(create.errors.safe_parse(&payload).unwrap(), payload);

    let count = validator.get("countEntities").unwrap();
    assert!(count.errors.is_no_errors());
}

#[test]
fn test_typed_parse_through_marker() {
    let input = entity_methods::CreateEntity::parse_input(&json!({"entityName": "x"})).unwrap();
    assert_eq!(
        input,
        CreateEntity {
            entity_name: "x".to_string()
        }
    );
    assert!(entity_methods::FindEntityByName::parse_input(&json!(17)).is_err());
}

#[test]
fn test_signature_return_shapes() {
    let signature = EntityMethods::signature().unwrap();
    assert_eq!(signature.len(), 4);

    let find = signature
        .operation::<entity_methods::FindEntityByName>()
        .unwrap();
    assert_eq!(
        find.returns,
        ReturnShape::Result {
            value: Schema::of::<Entity>(),
            error: Schema::of::<EntityNotFound>(),
        }
    );
    assert_eq!(
        signature.get("countEntities").unwrap().returns,
        ReturnShape::Bare(Schema::of::<u64>())
    );
}

#[test]
fn test_empty_contract() {
    assert!(NothingMethods::METHOD_NAMES.is_empty());
    assert!(NothingMethods::validator().is_empty());
    assert!(NothingMethods::signature().unwrap().is_empty());
}

#[test]
fn test_describe_hoists_shared_definitions() {
    let doc = EntityMethods::describe().unwrap();

    assert!(doc["methods"]["findEntityByName"]["input"].is_object());
    assert_eq!(doc["methods"]["purge"]["errors"], json!(false));
    // Entity is referenced by several methods but defined once
    assert!(doc["$defs"]["Entity"].is_object());
}

#[test]
fn test_conforming_input_parses_to_itself() {
    let validator = QueryMethods::validator();
    let query = validator.get("queryEntities").unwrap();

    for candidate in [
        json!({"tags": []}),
        json!({"tags": ["a"], "limit": 5}),
        json!({"tags": [], "namePrefix": null, "minScore": 1}),
        json!({"tags": [], "namePrefix": "en", "limit": 0, "minScore": 0.25}),
    ] {
        assert_eq!(query.input.safe_parse(&candidate).unwrap(), candidate);
    }
}

#[test]
fn test_conforming_output_parses_to_itself() {
    let validator = QueryMethods::validator();
    let query = validator.get("queryEntities").unwrap();

    let page = json!({
        "entities": [{"entityId": "1", "entityName": "a"}],
        "score": 3
    });
    assert_eq!(query.output.safe_parse(&page).unwrap(), page);

    // Unknown keys are dropped at every depth, the rest is kept as given
    let noisy = json!({
        "entities": [{"entityId": "1", "entityName": "a", "internal": true}],
        "score": 3,
        "debug": {}
    });
    assert_eq!(query.output.safe_parse(&noisy).unwrap(), page);
}

#[test]
fn test_typed_parse_applies_defaults() {
    let query = query_methods::QueryEntities::parse_input(&json!({"tags": []})).unwrap();
    assert_eq!(
        query,
        EntityQuery {
            name_prefix: None,
            limit: 0,
            min_score: None,
            tags: Vec::new(),
        }
    );
}

#[test]
fn test_marker_schemas_are_shared() {
    let validator = EntityMethods::validator();
    let create = validator.method::<entity_methods::CreateEntity>().unwrap();

    assert!(Schema::ptr_eq(
        &create.input,
        &entity_methods::CreateEntity::input_schema()
    ));
    assert!(Schema::ptr_eq(
        &create.errors,
        &entity_methods::CreateEntity::errors_schema().unwrap()
    ));
    assert!(entity_methods::CountEntities::errors_schema().is_none());

    let signature = EntityMethods::signature().unwrap();
    let find = signature
        .operation::<entity_methods::FindEntityByName>()
        .unwrap();
    assert!(Schema::ptr_eq(
        find.returns.value(),
        &entity_methods::FindEntityByName::output_schema()
    ));
}
