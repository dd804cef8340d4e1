use std::path::{Path, PathBuf};

use factoria_core::{FactorySpec, GeneratorKind};

/// Render a Factory Spec as a model factory definition file.
pub fn render_factory(spec: &FactorySpec) -> String {
    let mut out = String::new();
    out.push_str("<?php\n\n");
    out.push_str("/** @var \\Illuminate\\Database\\Eloquent\\Factory $factory */\n\n");
    out.push_str("use Faker\\Generator as Faker;\n");
    if spec
        .descriptors()
        .any(|descriptor| descriptor.expression.contains("Str::"))
    {
        out.push_str("use Illuminate\\Support\\Str;\n");
    }
    out.push('\n');

    out.push_str(&format!(
        "$factory->define({}::class, function (Faker $faker) {{\n",
        class_reference(&spec.model)
    ));
    out.push_str("    return [\n");
    for descriptor in spec.descriptors() {
        let value = match descriptor.kind {
            GeneratorKind::Relation => {
                format!("function () {{\n            return {};\n        }}", descriptor.expression)
            }
            _ => descriptor.expression.clone(),
        };
        out.push_str(&format!(
            "        '{}' => {},\n",
            escape_single_quoted(&descriptor.field_name),
            value
        ));
    }
    out.push_str("    ];\n");
    out.push_str("});\n");
    out
}

/// `<dir>/<BaseName>Factory.php` for a possibly namespaced model name.
pub fn factory_path(dir: &Path, model: &str) -> PathBuf {
    let base = model.rsplit('\\').next().unwrap_or(model);
    dir.join(format!("{base}Factory.php"))
}

fn class_reference(model: &str) -> String {
    format!("\\{}", model.trim_start_matches('\\'))
}

fn escape_single_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use factoria_core::GeneratorDescriptor;

    fn descriptor(field: &str, kind: GeneratorKind, expression: &str) -> GeneratorDescriptor {
        GeneratorDescriptor {
            field_name: field.to_string(),
            kind,
            expression: expression.to_string(),
        }
    }

    #[test]
    fn renders_definition_in_field_order() {
        let mut spec = FactorySpec::new("App\\Post", "public.posts");
        for item in [
            descriptor(
                "user_id",
                GeneratorKind::Relation,
                "factory(App\\User::class)->create()->id",
            ),
            descriptor("title", GeneratorKind::NameHeuristic, "$faker->sentence"),
            descriptor("body", GeneratorKind::TypeHeuristic, "$faker->text"),
        ] {
            spec.fields.insert(item.field_name.clone(), item);
        }

        let expected = "<?php\n\n\
/** @var \\Illuminate\\Database\\Eloquent\\Factory $factory */\n\n\
use Faker\\Generator as Faker;\n\n\
$factory->define(\\App\\Post::class, function (Faker $faker) {\n    \
return [\n        \
'user_id' => function () {\n            \
return factory(App\\User::class)->create()->id;\n        \
},\n        \
'title' => $faker->sentence,\n        \
'body' => $faker->text,\n    \
];\n\
});\n";
        assert_eq!(render_factory(&spec), expected);
    }

    #[test]
    fn imports_str_helper_only_when_used() {
        let mut spec = FactorySpec::new("App\\User", "public.users");
        spec.fields.insert(
            "remember_token".to_string(),
            descriptor("remember_token", GeneratorKind::NameHeuristic, "Str::random(10)"),
        );
        assert!(render_factory(&spec).contains("use Illuminate\\Support\\Str;\n"));

        let empty = FactorySpec::new("App\\Tag", "public.tags");
        let rendered = render_factory(&empty);
        assert!(!rendered.contains("Illuminate\\Support\\Str"));
        assert!(rendered.contains("    return [\n    ];\n"));
    }

    #[test]
    fn escapes_field_names() {
        let mut spec = FactorySpec::new("App\\Odd", "public.odds");
        spec.fields.insert(
            "it's".to_string(),
            descriptor("it's", GeneratorKind::Fallback, "$faker->word"),
        );
        assert!(render_factory(&spec).contains("'it\\'s' => $faker->word,"));
    }

    #[test]
    fn names_file_after_base_class() {
        let path = factory_path(Path::new("database/factories"), "App\\Models\\BlogPost");
        assert_eq!(path, PathBuf::from("database/factories/BlogPostFactory.php"));
        assert_eq!(
            factory_path(Path::new("out"), "User"),
            PathBuf::from("out/UserFactory.php")
        );
    }
}
