//! End-to-end parses of small, realistic command lines.

use applause::{
    FieldDescriptor, Outcome, ParseErrorKind, ParsedValues, Schema, SchemaError, ValueKind,
    parse,
};

fn parsed(schema: &Schema, tokens: &[&str]) -> ParsedValues {
    match parse(schema, tokens).expect("tokens should parse") {
        Outcome::Parsed(values) => values,
        Outcome::Terminal(action) => panic!("unexpected help:\n{}", action.help()),
    }
}

#[test]
fn flag_before_positional() {
    let schema = Schema::build(
        "widgets",
        [
            FieldDescriptor::positional("name"),
            FieldDescriptor::option("verbose").short('v'),
        ],
    )
    .unwrap();

    let values = parsed(&schema, &["-v", "widget"]);

    assert_eq!(values.get::<String>("name").as_deref(), Some("widget"));
    assert_eq!(values.get::<bool>("verbose"), Some(true));
    assert_eq!(values.len(), 2);
}

#[test]
fn multi_then_trailing_positional() {
    let schema = Schema::build(
        "tagger",
        [
            FieldDescriptor::positional("items").multi(),
            FieldDescriptor::positional("tag"),
        ],
    )
    .unwrap();

    let values = parsed(&schema, &["a", "b", "c", "t1"]);

    assert_eq!(
        values.get::<Vec<String>>("items"),
        Some(vec!["a".to_owned(), "b".to_owned(), "c".to_owned()])
    );
    assert_eq!(values.get::<String>("tag").as_deref(), Some("t1"));

    let values = parsed(&schema, &["t1"]);
    assert_eq!(values.get::<Vec<String>>("items"), Some(Vec::new()));
}

#[test]
fn help_on_any_schema() {
    let schema = Schema::build(
        "widgets",
        [
            FieldDescriptor::positional("name"),
            FieldDescriptor::option("verbose").short('v'),
        ],
    )
    .unwrap();

    for tokens in [&["--help"][..], &["-h"], &["widget", "--verbose", "-h"]] {
        match parse(&schema, tokens).unwrap() {
            Outcome::Terminal(action) => assert_eq!(action.help(), schema.help()),
            Outcome::Parsed(values) => panic!("expected help, got {values:?}"),
        }
    }
}

#[test]
fn empty_input_is_help() {
    let schema = Schema::build("widgets", [FieldDescriptor::positional("name")]).unwrap();

    match parse::<&str>(&schema, &[]).unwrap() {
        Outcome::Terminal(action) => {
            assert!(action.help().starts_with("USAGE: widgets <name>"));
        }
        Outcome::Parsed(values) => panic!("expected help, got {values:?}"),
    }
}

#[test]
fn unknown_option_is_rejected() {
    let schema = Schema::build("widgets", [FieldDescriptor::positional("name")]).unwrap();
    let error = parse(&schema, &["widget", "--bogus"]).unwrap_err();

    assert!(matches!(
        error.kind(),
        ParseErrorKind::UnrecognizedOption { option } if option == "--bogus"
    ));
    assert_eq!(error.to_string(), "`--bogus` is not a recognised option");
}

#[test]
fn reserved_short_is_a_schema_error() {
    let error = Schema::build(
        "widgets",
        [FieldDescriptor::option("host")
            .short('h')
            .kind(ValueKind::String)],
    )
    .unwrap_err();

    assert!(matches!(error, SchemaError::ReservedShort { .. }));
}

#[test]
fn numeric_kinds_and_defaults() {
    let schema = Schema::build(
        "serve",
        [
            FieldDescriptor::option("port")
                .short('p')
                .kind(ValueKind::U16)
                .default(8080u16),
            FieldDescriptor::option("ratio").kind(ValueKind::F64),
            FieldDescriptor::option("phase").kind(ValueKind::Complex64),
            FieldDescriptor::option("offset").kind(ValueKind::I32),
        ],
    )
    .unwrap();

    let values = parsed(
        &schema,
        &["--ratio", "0.25", "--phase=(1-2i)", "--offset", "-40"],
    );

    assert!(!values.contains("port"));
    assert_eq!(values.get::<f64>("ratio"), Some(0.25));
    assert_eq!(
        values.get::<applause::value::Complex<f64>>("phase"),
        Some(applause::value::Complex::new(1.0, -2.0))
    );
    assert_eq!(values.get::<i32>("offset"), Some(-40));

    let values = values.with_defaults(&schema);
    assert_eq!(values.get::<u16>("port"), Some(8080));

    let error = parse(&schema, &["-p", "70000"]).unwrap_err();
    assert!(matches!(
        error.kind(),
        ParseErrorKind::Coercion { name, .. } if name == "port"
    ));
}

#[test]
fn completion_hints_survive_into_the_schema() {
    let schema = Schema::build(
        "edit",
        [
            FieldDescriptor::positional("file").completion("files[*.toml]"),
            FieldDescriptor::option("editor")
                .kind(ValueKind::String)
                .completion("vim nano"),
        ],
    )
    .unwrap();

    assert_eq!(
        schema.positionals()[0].completion,
        Some(applause::Completion::FilesGlob("*.toml".to_owned()))
    );
    assert_eq!(
        schema.find_long("editor").unwrap().completion,
        Some(applause::Completion::Values(vec![
            "vim".to_owned(),
            "nano".to_owned()
        ]))
    );
}

#[test]
fn package_manager() {
    let schema = Schema::build(
        "pkg",
        [
            FieldDescriptor::command(
                "add",
                [
                    FieldDescriptor::positional("packages").multi(),
                    FieldDescriptor::option("dev").short('D'),
                    FieldDescriptor::option("registry")
                        .kind(ValueKind::String)
                        .value("url"),
                ],
            ),
            FieldDescriptor::command(
                "update",
                [FieldDescriptor::positional("packages").multi()],
            )
            .allow_empty(),
        ],
    )
    .unwrap();

    let values = parsed(&schema, &["add", "-D", "left-pad", "is-even", "--registry", "r"]);
    let add = values.command().unwrap();

    assert_eq!(add.name(), "add");
    assert!(add.values().flag("dev"));
    assert_eq!(
        add.values().get::<Vec<String>>("packages"),
        Some(vec!["left-pad".to_owned(), "is-even".to_owned()])
    );
    assert_eq!(add.values().get::<String>("registry").as_deref(), Some("r"));

    let values = parsed(&schema, &["update"]);
    assert_eq!(values.command().unwrap().name(), "update");

    let error = parse(&schema, &["add", "x", "--registry"]).unwrap_err();
    assert_eq!(error.commands(), ["add"]);
    assert_eq!(
        error.to_string(),
        "value not provided for option `--registry`"
    );

    assert_eq!(
        schema.descend(&["add"]).unwrap().usage(),
        "USAGE: pkg add [packages...] [--dev] [--registry <url>]"
    );
}
