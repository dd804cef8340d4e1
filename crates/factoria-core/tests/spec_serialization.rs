use factoria_core::{FactorySpec, GeneratorDescriptor, GeneratorKind};

fn descriptor(field: &str, kind: GeneratorKind, expression: &str) -> GeneratorDescriptor {
    GeneratorDescriptor {
        field_name: field.to_string(),
        kind,
        expression: expression.to_string(),
    }
}

#[test]
fn serializes_spec_in_column_order() {
    let mut spec = FactorySpec::new("App\\Post", "public.posts");
    for item in [
        descriptor("title", GeneratorKind::TypeHeuristic, "$faker->word"),
        descriptor(
            "user_id",
            GeneratorKind::Relation,
            "factory(App\\User::class)->create()->id",
        ),
        descriptor("email", GeneratorKind::NameHeuristic, "$faker->safeEmail"),
    ] {
        spec.fields.insert(item.field_name.clone(), item);
    }

    let json = serde_json::to_string_pretty(&spec).expect("serialize spec");
    let expected = r#"{
  "model": "App\\Post",
  "table": "public.posts",
  "fields": {
    "title": {
      "field_name": "title",
      "kind": "type_heuristic",
      "expression": "$faker->word"
    },
    "user_id": {
      "field_name": "user_id",
      "kind": "relation",
      "expression": "factory(App\\User::class)->create()->id"
    },
    "email": {
      "field_name": "email",
      "kind": "name_heuristic",
      "expression": "$faker->safeEmail"
    }
  }
}"#;
    assert_eq!(json, expected);

    let parsed: FactorySpec = serde_json::from_str(&json).expect("parse spec");
    assert_eq!(parsed, spec);
    let order: Vec<&str> = parsed.fields.keys().map(String::as_str).collect();
    assert_eq!(order, vec!["title", "user_id", "email"]);
}
