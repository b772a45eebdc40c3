//! Integration tests for declaration -> schema synthesis.
//!
//! These tests compile small declaration units and inspect the SDL of the
//! resulting schema.

use shapeql_core::{
    CompilationUnit, InterfaceDecl, ParamDecl, Primitive, PrimitiveName, PropertyDecl,
    TypeAliasDecl, TypeExpr,
};
use shapeql_graphql::{
    CompileError, CompilerConfig, ScalarConfig, ScalarDef, SchemaOptions, SynthesisError,
    create_schema,
};

fn sdl(unit: &CompilationUnit) -> String {
    sdl_with(unit, &SchemaOptions::default())
}

fn sdl_with(unit: &CompilationUnit, options: &SchemaOptions) -> String {
    create_schema(unit, options)
        .expect("schema should build")
        .sdl()
}

fn synthesis_error(unit: &CompilationUnit) -> SynthesisError {
    match create_schema(unit, &SchemaOptions::default()) {
        Err(CompileError::Synthesis(err)) => err,
        Err(other) => panic!("expected synthesis error, got {other}"),
        Ok(schema) => panic!("expected synthesis error, got schema:\n{}", schema.sdl()),
    }
}

/// `(args: { ... }) => returns`
fn resolver(args: Vec<PropertyDecl>, returns: TypeExpr) -> TypeExpr {
    TypeExpr::function(vec![ParamDecl::new("args", TypeExpr::object(args))], returns)
}

// =============================================================================
// Roots and records
// =============================================================================

#[test]
fn test_minimal_query() {
    let unit = CompilationUnit::new()
        .interface(InterfaceDecl::new("Query").property("foo", TypeExpr::string()));

    let sdl = sdl(&unit);
    assert!(sdl.contains("type Query"), "Schema should have Query type");
    assert!(sdl.contains("foo: String!"));
    assert!(!sdl.contains("type Mutation"));
}

#[test]
fn test_query_and_mutation_roots() {
    let unit = CompilationUnit::new()
        .interface(InterfaceDecl::new("Query").property("ping", TypeExpr::boolean()))
        .interface(InterfaceDecl::new("Mutation").property(
            "rename",
            resolver(
                vec![PropertyDecl::new("name", TypeExpr::string())],
                TypeExpr::boolean(),
            ),
        ));

    let sdl = sdl(&unit);
    assert!(sdl.contains("type Query"));
    assert!(sdl.contains("type Mutation"));
    assert!(sdl.contains("rename(name: String!): Boolean!"));
}

#[test]
fn test_missing_query_root() {
    let unit = CompilationUnit::new()
        .interface(InterfaceDecl::new("Foo").property("a", TypeExpr::string()));

    let err = synthesis_error(&unit);
    assert_eq!(err.error_code(), "ROOT_NOT_FOUND");
}

#[test]
fn test_array_of_records() {
    let unit = CompilationUnit::new()
        .interface(InterfaceDecl::new("Query").property(
            "foos",
            TypeExpr::array(TypeExpr::reference("Foo")),
        ))
        .interface(InterfaceDecl::new("Foo").property("id", TypeExpr::reference("ID")));

    let sdl = sdl(&unit);
    assert!(sdl.contains("foos: [Foo!]!"));
    assert!(sdl.contains("type Foo"));
    assert!(sdl.contains("id: ID!"));
}

#[test]
fn test_self_referencing_record() {
    let unit = CompilationUnit::new()
        .interface(InterfaceDecl::new("Query").property("root", TypeExpr::reference("Node")))
        .interface(
            InterfaceDecl::new("Node")
                .optional_property("parent", TypeExpr::reference("Node"))
                .property("children", TypeExpr::array(TypeExpr::reference("Node"))),
        );

    let sdl = sdl(&unit);
    assert_eq!(sdl.matches("type Node").count(), 1);
    assert!(sdl.contains("parent: Node\n"));
    assert!(sdl.contains("children: [Node!]!"));
}

#[test]
fn test_mutual_recursion() {
    let unit = CompilationUnit::new()
        .interface(InterfaceDecl::new("Query").property("authors", TypeExpr::array(TypeExpr::reference("Author"))))
        .interface(InterfaceDecl::new("Author").property(
            "books",
            TypeExpr::array(TypeExpr::reference("Book")),
        ))
        .interface(InterfaceDecl::new("Book").property("author", TypeExpr::reference("Author")));

    let sdl = sdl(&unit);
    assert!(sdl.contains("books: [Book!]!"));
    assert!(sdl.contains("author: Author!"));
}

#[test]
fn test_inherited_members() {
    let unit = CompilationUnit::new()
        .interface(InterfaceDecl::new("Query").property("bar", TypeExpr::reference("Bar")))
        .interface(InterfaceDecl::new("Base").property("id", TypeExpr::reference("ID")))
        .interface(
            InterfaceDecl::new("Bar")
                .extends("Base")
                .property("name", TypeExpr::string()),
        );

    let sdl = sdl(&unit);
    let bar = sdl.split("type Bar").nth(1).expect("Bar should be materialized");
    let bar = bar.split('}').next().unwrap_or_default();
    assert!(bar.contains("id: ID!"));
    assert!(bar.contains("name: String!"));
}

// =============================================================================
// Nullability and scalars
// =============================================================================

#[test]
fn test_nullability_law() {
    let unit = CompilationUnit::new().interface(
        InterfaceDecl::new("Query")
            .property("plain", TypeExpr::string())
            .optional_property("optional", TypeExpr::string())
            .property("nullable", TypeExpr::nullable(TypeExpr::reference("Int")))
            .property(
                "undefinable",
                TypeExpr::union(vec![TypeExpr::boolean(), TypeExpr::undefined()]),
            ),
    );

    let sdl = sdl(&unit);
    assert!(sdl.contains("plain: String!"));
    assert!(sdl.contains("optional: String\n"));
    assert!(sdl.contains("nullable: Int\n"));
    assert!(sdl.contains("undefinable: Boolean\n"));
}

#[test]
fn test_number_hints() {
    let unit = CompilationUnit::new().interface(
        InterfaceDecl::new("Query")
            .property("count", TypeExpr::reference("Int"))
            .property("ratio", TypeExpr::reference("Float"))
            .property("raw", TypeExpr::number()),
    );

    let sdl = sdl(&unit);
    assert!(sdl.contains("count: Int!"));
    assert!(sdl.contains("ratio: Float!"));
    assert!(sdl.contains("raw: Float!"));
}

#[test]
fn test_date_scalar_follows_member_nullability() {
    let unit = CompilationUnit::new().interface(
        InterfaceDecl::new("Query")
            .optional_property("at", TypeExpr::reference("Date"))
            .property("created", TypeExpr::reference("Date")),
    );

    let sdl = sdl(&unit);
    assert_eq!(sdl.matches("scalar Date").count(), 1);
    assert!(sdl.contains("at: Date\n"));
    assert!(sdl.contains("created: Date!"));
}

#[test]
fn test_named_custom_scalar() {
    let unit = CompilationUnit::new()
        .alias(TypeAliasDecl::new("Email", TypeExpr::string()))
        .interface(
            InterfaceDecl::new("Query")
                .property("email", TypeExpr::reference("Email"))
                .property("backup", TypeExpr::array(TypeExpr::reference("Email"))),
        );

    // Without a table entry the alias stays a plain string.
    assert!(sdl(&unit).contains("email: String!"));

    let options = SchemaOptions::default()
        .with_custom_scalar(ScalarDef::new("Email").description("An e-mail address"));
    let sdl = sdl_with(&unit, &options);
    assert_eq!(sdl.matches("scalar Email").count(), 1);
    assert!(sdl.contains("email: Email!"));
    assert!(sdl.contains("backup: [Email!]!"));
}

#[test]
fn test_configured_scalar() {
    let unit = CompilationUnit::new()
        .alias(TypeAliasDecl::new("Slug", TypeExpr::string()))
        .interface(InterfaceDecl::new("Query").property("slug", TypeExpr::reference("Slug")));
    let options = SchemaOptions::default().with_config(CompilerConfig {
        scalars: vec![ScalarConfig {
            name: "Slug".into(),
            description: Some("URL-safe identifier".into()),
            pattern: Some("^[a-z0-9-]+$".into()),
            specified_by_url: None,
        }],
        ..Default::default()
    });

    let sdl = sdl_with(&unit, &options);
    assert!(sdl.contains("scalar Slug"));
    assert!(sdl.contains("slug: Slug!"));
}

#[test]
fn test_scalar_factory() {
    let unit = CompilationUnit::new().interface(
        InterfaceDecl::new("Query")
            .property("big", TypeExpr::bigint())
            .property("name", TypeExpr::string()),
    );
    let options = SchemaOptions::default().with_custom_scalar_factory(|primitive: &Primitive| {
        (primitive.name == PrimitiveName::BigInt).then(|| ScalarDef::new("BigInt"))
    });

    let sdl = sdl_with(&unit, &options);
    assert!(sdl.contains("scalar BigInt"));
    assert!(sdl.contains("big: BigInt!"));
    assert!(sdl.contains("name: String!"));
}

#[test]
fn test_unresolved_scalar() {
    let unit = CompilationUnit::new()
        .interface(InterfaceDecl::new("Query").property("big", TypeExpr::bigint()));

    let err = synthesis_error(&unit);
    assert_eq!(
        err,
        SynthesisError::UnresolvedScalar {
            raw_type: "bigint".into(),
            primitive: "bigint".into(),
        }
    );
}

#[test]
fn test_identifier_beats_custom_scalar() {
    let unit = CompilationUnit::new()
        .interface(InterfaceDecl::new("Query").property("id", TypeExpr::reference("ID")));
    let options = SchemaOptions::default().with_custom_scalar(ScalarDef::new("ID"));

    let sdl = sdl_with(&unit, &options);
    assert!(sdl.contains("id: ID!"));
}

// =============================================================================
// Modes and naming
// =============================================================================

#[test]
fn test_record_in_both_modes() {
    let unit = CompilationUnit::new()
        .interface(InterfaceDecl::new("Query").property(
            "echo",
            resolver(
                vec![PropertyDecl::new("foo", TypeExpr::reference("Foo"))],
                TypeExpr::reference("Foo"),
            ),
        ))
        .interface(
            InterfaceDecl::new("Foo")
                .property("name", TypeExpr::string())
                .optional_property("tags", TypeExpr::array(TypeExpr::string())),
        );

    let sdl = sdl(&unit);
    assert!(sdl.contains("type Foo"));
    assert!(sdl.contains("input FooInput"));
    assert!(sdl.contains("echo(foo: FooInput!): Foo!"));
    assert!(sdl.contains("tags: [String!]"));
}

#[test]
fn test_custom_input_suffix() {
    let unit = CompilationUnit::new()
        .interface(InterfaceDecl::new("Query").property(
            "echo",
            resolver(
                vec![PropertyDecl::new("foo", TypeExpr::reference("Foo"))],
                TypeExpr::boolean(),
            ),
        ))
        .interface(InterfaceDecl::new("Foo").property("name", TypeExpr::string()));
    let options = SchemaOptions::default().with_config(CompilerConfig {
        input_suffix: "Args".into(),
        ..Default::default()
    });

    let sdl = sdl_with(&unit, &options);
    assert!(sdl.contains("input FooArgs"));
    assert!(!sdl.contains("type Foo "));
}

#[test]
fn test_resolver_members_dropped_from_input() {
    let unit = CompilationUnit::new()
        .interface(InterfaceDecl::new("Query").property(
            "save",
            resolver(
                vec![PropertyDecl::new("item", TypeExpr::reference("Item"))],
                TypeExpr::reference("Item"),
            ),
        ))
        .interface(
            InterfaceDecl::new("Item")
                .property("name", TypeExpr::string())
                .property(
                    "related",
                    resolver(
                        vec![PropertyDecl::new("limit", TypeExpr::reference("Int"))],
                        TypeExpr::array(TypeExpr::reference("Item")),
                    ),
                ),
        );

    let sdl = sdl(&unit);
    assert!(sdl.contains("related(limit: Int!): [Item!]!"));
    let input = sdl.split("input ItemInput").nth(1).expect("ItemInput should exist");
    let input = input.split('}').next().unwrap_or_default();
    assert!(input.contains("name: String!"));
    assert!(!input.contains("related"));
}

#[test]
fn test_record_with_only_resolvers_is_empty_as_input() {
    let unit = CompilationUnit::new()
        .interface(InterfaceDecl::new("Query").property(
            "run",
            resolver(
                vec![PropertyDecl::new("job", TypeExpr::reference("Job"))],
                TypeExpr::boolean(),
            ),
        ))
        .interface(InterfaceDecl::new("Job").property(
            "retry",
            resolver(vec![PropertyDecl::new("times", TypeExpr::reference("Int"))], TypeExpr::boolean()),
        ));

    let err = synthesis_error(&unit);
    assert_eq!(err, SynthesisError::EmptyRecord("JobInput".into()));
}

#[test]
fn test_discriminant_names_inline_record() {
    let coord = TypeExpr::object(vec![
        PropertyDecl::new("__typename", TypeExpr::literal("Coord")),
        PropertyDecl::new("x", TypeExpr::reference("Float")),
        PropertyDecl::new("y", TypeExpr::reference("Float")),
    ]);
    let unit = CompilationUnit::new().interface(
        InterfaceDecl::new("Query")
            .property("where", coord.clone())
            .property("near", resolver(vec![PropertyDecl::new("at", coord)], TypeExpr::boolean())),
    );

    let sdl = sdl(&unit);
    assert!(sdl.contains("type Coord"));
    assert!(sdl.contains("input CoordInput"));
    assert!(sdl.contains("where: Coord!"));
    assert!(sdl.contains("near(at: CoordInput!): Boolean!"));
    assert!(!sdl.contains("__typename:"));
}

#[test]
fn test_anonymous_record_names() {
    let unit = CompilationUnit::new().interface(
        InterfaceDecl::new("Query")
            .property(
                "first",
                TypeExpr::object(vec![PropertyDecl::new("a", TypeExpr::string())]),
            )
            .property(
                "second",
                TypeExpr::object(vec![PropertyDecl::new("b", TypeExpr::string())]),
            ),
    );

    let sdl = sdl(&unit);
    assert!(sdl.contains("first: Anonymous1!"));
    assert!(sdl.contains("second: Anonymous2!"));
}

#[test]
fn test_anonymous_input_names() {
    let unit = CompilationUnit::new().interface(InterfaceDecl::new("Query").property(
        "find",
        resolver(
            vec![PropertyDecl::new(
                "filter",
                TypeExpr::object(vec![PropertyDecl::new("q", TypeExpr::string())]),
            )],
            TypeExpr::boolean(),
        ),
    ));
    let options = SchemaOptions::default().with_config(CompilerConfig {
        anonymous_prefix: "Inline".into(),
        ..Default::default()
    });

    let sdl = sdl_with(&unit, &options);
    assert!(sdl.contains("input InlineInput1"));
    assert!(sdl.contains("find(filter: InlineInput1!): Boolean!"));
}

#[test]
fn test_duplicate_type_name() {
    // `Foo` in input mode is also called `FooInput`.
    let clash = CompilationUnit::new()
        .interface(
            InterfaceDecl::new("Query")
                .property("existing", TypeExpr::reference("FooInput"))
                .property(
                    "save",
                    resolver(
                        vec![PropertyDecl::new("foo", TypeExpr::reference("Foo"))],
                        TypeExpr::boolean(),
                    ),
                ),
        )
        .interface(InterfaceDecl::new("Foo").property("a", TypeExpr::string()))
        .interface(InterfaceDecl::new("FooInput").property("c", TypeExpr::string()));

    let err = synthesis_error(&clash);
    assert_eq!(
        err,
        SynthesisError::DuplicateTypeName {
            name: "FooInput".into()
        }
    );
}

#[test]
fn test_invalid_field_name() {
    let unit = CompilationUnit::new()
        .interface(InterfaceDecl::new("Query").property("my-field", TypeExpr::string()));

    let err = synthesis_error(&unit);
    assert_eq!(err.error_code(), "INVALID_NAME");
}

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn test_argument_defaults() {
    let unit = CompilationUnit::new().interface(InterfaceDecl::new("Query").property(
        "retInt",
        resolver(
            vec![
                PropertyDecl::new("a", TypeExpr::with_default(TypeExpr::number(), 12)),
                PropertyDecl::new("b", TypeExpr::with_default(TypeExpr::string(), "hi")).optional(),
                PropertyDecl::new("c", TypeExpr::with_default(TypeExpr::boolean(), false)),
            ],
            TypeExpr::reference("Int"),
        ),
    ));

    let sdl = sdl(&unit);
    assert!(sdl.contains("a: Float! = 12"));
    assert!(sdl.contains("b: String = \"hi\""));
    assert!(sdl.contains("c: Boolean! = false"));
}

// =============================================================================
// Unions and enums
// =============================================================================

#[test]
fn test_union_of_records() {
    let unit = CompilationUnit::new()
        .alias(TypeAliasDecl::new(
            "SearchResult",
            TypeExpr::union(vec![TypeExpr::reference("Foo"), TypeExpr::reference("Bar")]),
        ))
        .interface(InterfaceDecl::new("Query").property(
            "search",
            TypeExpr::array(TypeExpr::reference("SearchResult")),
        ))
        .interface(InterfaceDecl::new("Foo").property("foo", TypeExpr::string()))
        .interface(InterfaceDecl::new("Bar").property("bar", TypeExpr::reference("Int")));

    let sdl = sdl(&unit);
    assert!(sdl.contains("union SearchResult = Foo | Bar"));
    assert!(sdl.contains("search: [SearchResult!]!"));
}

#[test]
fn test_inline_union_gets_anonymous_name() {
    let unit = CompilationUnit::new()
        .interface(InterfaceDecl::new("Query").property(
            "pick",
            TypeExpr::union(vec![TypeExpr::reference("Foo"), TypeExpr::reference("Bar")]),
        ))
        .interface(InterfaceDecl::new("Foo").property("foo", TypeExpr::string()))
        .interface(InterfaceDecl::new("Bar").property("bar", TypeExpr::string()));

    let sdl = sdl(&unit);
    assert!(sdl.contains("union AnonymousUnion1"));
    assert!(sdl.contains("pick: AnonymousUnion1!"));
}

#[test]
fn test_union_of_records_rejected_as_input() {
    let unit = CompilationUnit::new()
        .alias(TypeAliasDecl::new(
            "Either",
            TypeExpr::union(vec![TypeExpr::reference("Foo"), TypeExpr::reference("Bar")]),
        ))
        .interface(InterfaceDecl::new("Query").property(
            "take",
            resolver(
                vec![PropertyDecl::new("value", TypeExpr::reference("Either"))],
                TypeExpr::boolean(),
            ),
        ))
        .interface(InterfaceDecl::new("Foo").property("foo", TypeExpr::string()))
        .interface(InterfaceDecl::new("Bar").property("bar", TypeExpr::string()));

    let err = synthesis_error(&unit);
    assert!(matches!(
        err,
        SynthesisError::ModeMismatch { ref descriptor, .. } if descriptor == "Either"
    ));
}

#[test]
fn test_mixed_union_rejected() {
    let unit = CompilationUnit::new()
        .interface(InterfaceDecl::new("Query").property(
            "odd",
            TypeExpr::union(vec![TypeExpr::reference("Foo"), TypeExpr::string()]),
        ))
        .interface(InterfaceDecl::new("Foo").property("foo", TypeExpr::string()));

    assert_eq!(synthesis_error(&unit).error_code(), "MODE_MISMATCH");
}

#[test]
fn test_primitive_union_rejected() {
    let unit = CompilationUnit::new().interface(InterfaceDecl::new("Query").property(
        "either",
        TypeExpr::union(vec![TypeExpr::string(), TypeExpr::number()]),
    ));

    assert_eq!(synthesis_error(&unit).error_code(), "MODE_MISMATCH");
}

#[test]
fn test_string_literal_union_output_is_string() {
    let unit = CompilationUnit::new().interface(InterfaceDecl::new("Query").property(
        "status",
        TypeExpr::union(vec![TypeExpr::literal("open"), TypeExpr::literal("closed")]),
    ));

    let sdl = sdl(&unit);
    assert!(sdl.contains("status: String!"));
}

#[test]
fn test_string_literal_union_input_scalar() {
    let unit = CompilationUnit::new().interface(InterfaceDecl::new("Query").property(
        "pick",
        resolver(
            vec![PropertyDecl::new(
                "choice",
                TypeExpr::union(vec![TypeExpr::literal("A"), TypeExpr::literal("B")]),
            )],
            TypeExpr::string(),
        ),
    ));

    let sdl = sdl(&unit);
    assert!(sdl.contains("scalar A__B"));
    assert!(sdl.contains("pick(choice: A__B!): String!"));
}

#[test]
fn test_repeated_literal_union_shares_scalar() {
    let choice = || {
        resolver(
            vec![PropertyDecl::new(
                "s",
                TypeExpr::union(vec![TypeExpr::literal("A"), TypeExpr::literal("B")]),
            )],
            TypeExpr::string(),
        )
    };
    let unit = CompilationUnit::new().interface(
        InterfaceDecl::new("Query")
            .property("one", choice())
            .property("two", choice()),
    );

    let sdl = sdl(&unit);
    assert_eq!(sdl.matches("scalar A__B").count(), 1);
    assert!(sdl.contains("one(s: A__B!): String!"));
    assert!(sdl.contains("two(s: A__B!): String!"));
}

#[test]
fn test_repeated_inline_record_union_materializes_once() {
    let pick = || TypeExpr::union(vec![TypeExpr::reference("Foo"), TypeExpr::reference("Bar")]);
    let unit = CompilationUnit::new()
        .interface(
            InterfaceDecl::new("Query")
                .property("first", pick())
                .property("second", pick()),
        )
        .interface(InterfaceDecl::new("Foo").property("foo", TypeExpr::string()))
        .interface(InterfaceDecl::new("Bar").property("bar", TypeExpr::string()));

    let sdl = sdl(&unit);
    assert!(sdl.contains("first: AnonymousUnion1!"));
    assert!(sdl.contains("second: AnonymousUnion1!"));
    assert!(!sdl.contains("AnonymousUnion2"));
}

#[test]
fn test_unnameable_literal_union_names_its_site() {
    let unit = CompilationUnit::new().interface(InterfaceDecl::new("Query").property(
        "pick",
        resolver(
            vec![PropertyDecl::new(
                "level",
                TypeExpr::union(vec![TypeExpr::literal("1"), TypeExpr::literal("2")]),
            )],
            TypeExpr::string(),
        ),
    ));

    let err = synthesis_error(&unit);
    match err {
        SynthesisError::InvalidName { name, context } => {
            assert!(name.starts_with("__"), "name was: {name}");
            assert_eq!(context, "input union '1' | '2'");
        }
        other => panic!("expected invalid name, got {other:?}"),
    }
}

#[test]
fn test_enum_alias() {
    let unit = CompilationUnit::new()
        .alias(
            TypeAliasDecl::new(
                "Color",
                TypeExpr::union(vec![TypeExpr::literal("RED"), TypeExpr::literal("GREEN")]),
            )
            .as_enum(),
        )
        .interface(
            InterfaceDecl::new("Query")
                .property("color", TypeExpr::reference("Color"))
                .property(
                    "paint",
                    resolver(
                        vec![PropertyDecl::new("color", TypeExpr::reference("Color"))],
                        TypeExpr::boolean(),
                    ),
                ),
        );

    let sdl = sdl(&unit);
    assert_eq!(sdl.matches("enum Color").count(), 1);
    assert!(sdl.contains("RED"));
    assert!(sdl.contains("GREEN"));
    assert!(sdl.contains("color: Color!"));
    assert!(sdl.contains("paint(color: Color!): Boolean!"));
}

#[test]
fn test_enum_by_config() {
    let unit = CompilationUnit::new()
        .alias(TypeAliasDecl::new(
            "Size",
            TypeExpr::union(vec![TypeExpr::literal("SMALL"), TypeExpr::literal("LARGE")]),
        ))
        .interface(InterfaceDecl::new("Query").property("size", TypeExpr::reference("Size")));
    let options = SchemaOptions::default().with_config(CompilerConfig {
        string_literal_unions_as_enums: true,
        ..Default::default()
    });

    assert!(sdl(&unit).contains("size: String!"));
    assert!(sdl_with(&unit, &options).contains("enum Size"));
}

#[test]
fn test_enum_value_must_be_graphql_name() {
    let unit = CompilationUnit::new()
        .alias(
            TypeAliasDecl::new(
                "Phase",
                TypeExpr::union(vec![TypeExpr::literal("in-progress"), TypeExpr::literal("done")]),
            )
            .as_enum(),
        )
        .interface(InterfaceDecl::new("Query").property("phase", TypeExpr::reference("Phase")));

    let err = synthesis_error(&unit);
    assert_eq!(
        err,
        SynthesisError::InvalidEnumValue {
            name: "Phase".into(),
            value: "'in-progress'".into(),
        }
    );
}

#[test]
fn test_extraction_errors_surface() {
    let unit = CompilationUnit::new()
        .interface(InterfaceDecl::new("Query").property("foo", TypeExpr::reference("Missing")));

    let err = create_schema(&unit, &SchemaOptions::default()).unwrap_err();
    assert_eq!(err.error_code(), "UNKNOWN_TYPE");
}
