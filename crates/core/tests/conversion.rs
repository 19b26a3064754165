//! End-to-end conversion of analysis-tool documents into IR entities.

use declscope_api::{
    ClassMember, Deprecation, DescriptionItem, Entity, Function, Pathname, plain_text,
};
use declscope_core::index::Index;
use declscope_core::{ConvertConfig, DocError, index_and_convert, parse, parse_str};
use serde_json::{Value, json};

fn convert_with(document: Value, config: &ConvertConfig) -> declscope_core::Result<(Index, Vec<Entity>)> {
    let mut project = parse(&document)?;
    index_and_convert(&mut project, config)
}

fn convert(document: Value) -> Vec<Entity> {
    convert_with(document, &ConvertConfig::default())
        .expect("conversion should succeed")
        .1
}

fn project(children: Value) -> Value {
    json!({"id": 0, "name": "proj", "kindString": "Project", "children": children})
}

fn source(file: &str, line: u32) -> Value {
    json!([{"fileName": file, "line": line}])
}

fn intrinsic(name: &str) -> Value {
    json!({"type": "intrinsic", "name": name})
}

fn text(s: &str) -> Value {
    json!({"summary": [{"kind": "text", "text": s}]})
}

fn function(entity: &Entity) -> &Function {
    match entity {
        Entity::Function(f) => f,
        other => panic!("expected a function, got {}", other.kind()),
    }
}

fn find<'a>(entities: &'a [Entity], path: &str) -> &'a Entity {
    entities
        .iter()
        .find(|e| e.path().to_string() == path)
        .unwrap_or_else(|| panic!("no entity at {path}"))
}

#[test]
fn test_class_with_constructor_and_property() {
    let entities = convert(project(json!([{
        "id": 1,
        "name": "C",
        "kindString": "Class",
        "sources": source("dir/file.ts", 1),
        "comment": text("A class."),
        "children": [
            {
                "id": 2,
                "name": "f",
                "kindString": "Property",
                "sources": source("dir/file.ts", 3),
                "type": intrinsic("number")
            },
            {
                "id": 3,
                "name": "constructor",
                "kindString": "Constructor",
                "sources": source("dir/file.ts", 2),
                "signatures": [{
                    "id": 4,
                    "name": "new C",
                    "kindString": "Constructor signature",
                    "parameters": [{
                        "id": 5,
                        "name": "a",
                        "kindString": "Parameter",
                        "type": intrinsic("string")
                    }],
                    "type": {"type": "reference", "name": "C", "target": 1}
                }]
            }
        ]
    }])));

    assert_eq!(entities.len(), 3);
    let kinds: Vec<&str> = entities.iter().map(Entity::kind).collect();
    assert_eq!(kinds, vec!["class", "function", "attribute"]);

    let Entity::Class(class) = &entities[0] else { panic!("expected a class first") };
    assert_eq!(class.top.name, "C");
    assert_eq!(class.top.path, Pathname::parse("./dir/file.C"));
    assert_eq!(class.top.filename, "file.ts");
    assert_eq!(class.top.deppath.as_deref(), Some("dir/file.ts"));
    assert_eq!(class.top.description, vec![DescriptionItem::Text("A class.".into())]);

    let ctor = class.constructor.as_ref().expect("constructor should be set");
    assert_eq!(ctor.params.len(), 1);
    assert_eq!(ctor.params[0].name, "a");
    assert_eq!(plain_text(&ctor.params[0].ty), "string");
    assert!(ctor.returns.is_empty());

    assert_eq!(class.members.len(), 1);
    let ClassMember::Attribute(f) = &class.members[0] else { panic!("expected an attribute") };
    assert_eq!(f.top.name, "f");
    assert_eq!(plain_text(&f.ty), "number");

    assert_eq!(entities[1].path().to_string(), "./dir/file.C#constructor");
    assert_eq!(entities[2].path().to_string(), "./dir/file.C#f");
    assert_eq!(entities[2].top().line, Some(3));
}

#[test]
fn test_setter_only_accessor() {
    let entities = convert(project(json!([{
        "id": 1,
        "name": "K",
        "kindString": "Class",
        "sources": source("k.ts", 1),
        "children": [{
            "id": 2,
            "name": "enabled",
            "kindString": "Accessor",
            "sources": source("k.ts", 4),
            "setSignature": {
                "id": 3,
                "name": "enabled",
                "kindString": "Set signature",
                "comment": text("Turns it on or off."),
                "parameters": [{
                    "id": 4,
                    "name": "value",
                    "kindString": "Parameter",
                    "type": intrinsic("boolean")
                }],
                "type": intrinsic("void")
            }
        }]
    }])));

    let Entity::Attribute(attr) = find(&entities, "./k.K#enabled") else {
        panic!("expected an attribute")
    };
    assert_eq!(plain_text(&attr.ty), "boolean");
    assert_eq!(
        attr.top.description,
        vec![DescriptionItem::Text("Turns it on or off.".into())]
    );
}

#[test]
fn test_accessor_without_any_type() {
    let document = project(json!([{
        "id": 1,
        "name": "broken",
        "kindString": "Accessor",
        "sources": source("k.ts", 1)
    }]));

    let (_, entities) = convert_with(document.clone(), &ConvertConfig::default()).unwrap();
    assert!(entities.is_empty());

    let strict = convert_with(document, &ConvertConfig::default().with_strict(true));
    assert!(matches!(strict, Err(DocError::UnsupportedConstruct(_))));
}

#[test]
fn test_inherited_signatures_need_their_own_comment() {
    let inherited = json!({"type": "reference", "name": "Base.m"});
    let entities = convert(project(json!([{
        "id": 1,
        "name": "D",
        "kindString": "Class",
        "sources": source("d.ts", 1),
        "children": [
            {
                "id": 2,
                "name": "silent",
                "kindString": "Method",
                "signatures": [{
                    "id": 3,
                    "name": "silent",
                    "kindString": "Call signature",
                    "inheritedFrom": inherited,
                    "type": intrinsic("void")
                }]
            },
            {
                "id": 4,
                "name": "loud",
                "kindString": "Method",
                "signatures": [{
                    "id": 5,
                    "name": "loud",
                    "kindString": "Call signature",
                    "inheritedFrom": inherited,
                    "comment": text("Overridden docs."),
                    "type": intrinsic("void")
                }]
            }
        ]
    }])));

    let names: Vec<&str> = entities.iter().map(Entity::name).collect();
    assert_eq!(names, vec!["D", "loud"]);
    let Entity::Class(class) = &entities[0] else { panic!("expected a class") };
    assert_eq!(class.members.len(), 1);
}

fn options_param() -> Value {
    json!({
        "id": 3,
        "name": "options",
        "kindString": "Parameter",
        "type": {
            "type": "reflection",
            "declaration": {
                "id": 4,
                "name": "__type",
                "kindString": "Type literal",
                "children": [
                    {
                        "id": 5,
                        "name": "x",
                        "kindString": "Property",
                        "comment": text("The x value"),
                        "type": intrinsic("number")
                    },
                    {
                        "id": 6,
                        "name": "y",
                        "kindString": "Property",
                        "type": intrinsic("string")
                    }
                ]
            }
        }
    })
}

fn draw(comment: Value) -> Value {
    project(json!([{
        "id": 1,
        "name": "draw",
        "kindString": "Function",
        "sources": source("draw.ts", 1),
        "signatures": [{
            "id": 2,
            "name": "draw",
            "kindString": "Call signature",
            "comment": comment,
            "parameters": [
                options_param(),
                {"id": 7, "name": "extra", "kindString": "Parameter", "type": intrinsic("boolean")}
            ],
            "type": intrinsic("void")
        }]
    }]))
}

#[test]
fn test_destructured_parameters() {
    let entities = convert(draw(json!({
        "blockTags": [{"tag": "@destructure", "content": [{"kind": "text", "text": "options"}]}]
    })));
    let draw = function(&entities[0]);

    let names: Vec<&str> = draw.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["options.x", "options.y", "extra"]);
    assert_eq!(plain_text(&draw.params[0].ty), "number");
    assert_eq!(plain_text(&draw.params[1].ty), "string");
    assert_eq!(
        draw.params[0].description,
        vec![DescriptionItem::Text("The x value".into())]
    );
    assert!(draw.returns.is_empty());
}

#[test]
fn test_untagged_object_parameter_renders_inline() {
    let entities = convert(draw(json!({})));
    let draw = function(&entities[0]);

    let names: Vec<&str> = draw.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["options", "extra"]);
    assert_eq!(plain_text(&draw.params[0].ty), "{ x: number; y: string; }");
}

fn fetcher() -> Value {
    project(json!([{
        "id": 1,
        "name": "fetch",
        "kindString": "Function",
        "sources": source("net.ts", 7),
        "signatures": [{
            "id": 2,
            "name": "fetch",
            "kindString": "Call signature",
            "comment": {
                "summary": [],
                "blockTags": [{"tag": "@returns", "content": [{"kind": "text", "text": "when done"}]}]
            },
            "type": {
                "type": "reference",
                "name": "Promise",
                "package": "typescript",
                "target": {"sourceFileName": "lib.es5.d.ts", "qualifiedName": "Promise"},
                "typeArguments": [intrinsic("void")]
            }
        }]
    }]))
}

#[test]
fn test_promise_return_marks_function_async() {
    let entities = convert(fetcher());
    let fetch = function(&entities[0]);

    assert!(fetch.is_async);
    assert_eq!(fetch.returns.len(), 1);
    assert_eq!(plain_text(&fetch.returns[0].ty), "Promise<void>");
    assert_eq!(
        fetch.returns[0].description,
        vec![DescriptionItem::Text("when done".into())]
    );
    assert_eq!(fetch.top.line, Some(7));
}

#[test]
fn test_async_wrappers_are_configurable() {
    let config = ConvertConfig::default().with_async_wrappers(vec!["Thenable".into()]);
    let (_, entities) = convert_with(fetcher(), &config).unwrap();
    assert!(!function(&entities[0]).is_async);
}

#[test]
fn test_callable_property_becomes_a_function() {
    let entities = convert(project(json!([{
        "id": 1,
        "name": "I",
        "kindString": "Interface",
        "sources": source("file.ts", 1),
        "children": [{
            "id": 2,
            "name": "cb",
            "kindString": "Property",
            "flags": {"isOptional": true},
            "sources": source("file.ts", 2),
            "type": {
                "type": "reflection",
                "declaration": {
                    "id": 3,
                    "name": "__type",
                    "kindString": "Type literal",
                    "signatures": [{
                        "id": 4,
                        "name": "__type",
                        "kindString": "Call signature",
                        "parameters": [{"id": 5, "name": "x", "kindString": "Parameter", "type": intrinsic("number")}],
                        "type": intrinsic("void")
                    }]
                }
            }
        }]
    }])));

    let cb = function(find(&entities, "./file.I.cb"));
    assert_eq!(cb.top.name, "cb");
    assert!(cb.member.is_optional);
    assert_eq!(cb.params[0].name, "x");

    let Entity::Interface(iface) = &entities[0] else { panic!("expected an interface") };
    assert!(matches!(&iface.members[0], ClassMember::Function(f) if f.top.name == "cb"));
}

#[test]
fn test_constructor_borrows_class_type_parameters() {
    let entities = convert(project(json!([{
        "id": 1,
        "name": "Box",
        "kindString": "Class",
        "sources": source("box.ts", 1),
        "typeParameters": [{
            "id": 2,
            "name": "T",
            "kindString": "Type parameter",
            "type": intrinsic("object")
        }],
        "children": [{
            "id": 3,
            "name": "constructor",
            "kindString": "Constructor",
            "signatures": [{
                "id": 4,
                "name": "new Box",
                "kindString": "Constructor signature",
                "type": {"type": "reference", "name": "Box", "target": 1}
            }]
        }]
    }])));

    let Entity::Class(class) = &entities[0] else { panic!("expected a class") };
    assert_eq!(class.type_params[0].name, "T");
    assert_eq!(
        class.type_params[0].extends.as_deref().map(plain_text),
        Some("object".to_string())
    );
    let ctor = class.constructor.as_ref().unwrap();
    assert_eq!(ctor.type_params[0].name, "T");

    let standalone = function(&entities[1]);
    assert_eq!(standalone.type_params[0].name, "T");
}

fn hierarchy(extra_super: Value) -> Value {
    project(json!([
        {"id": 1, "name": "Base", "kindString": "Class", "sources": source("h.ts", 1)},
        {"id": 2, "name": "Shape", "kindString": "Interface", "sources": source("h.ts", 2)},
        {
            "id": 3,
            "name": "Sub",
            "kindString": "Class",
            "sources": source("h.ts", 3),
            "extendedTypes": [
                {"type": "reference", "name": "Base", "target": 1},
                {
                    "type": "reference",
                    "name": "EventEmitter",
                    "package": "@types/node",
                    "target": {"sourceFileName": "events.d.ts", "qualifiedName": "EventEmitter"}
                },
                extra_super
            ],
            "implementedTypes": [{"type": "reference", "name": "Shape", "target": 2}]
        }
    ]))
}

#[test]
fn test_supers_and_interfaces() {
    let entities = convert(hierarchy(json!({"type": "reference", "name": "Base", "target": 1})));
    let Entity::Class(sub) = find(&entities, "./h.Sub") else { panic!("expected a class") };
    assert_eq!(
        sub.supers,
        vec![Pathname::parse("./h.Base"), Pathname::parse("./h.Base")]
    );
    assert_eq!(sub.interfaces, vec![Pathname::parse("./h.Shape")]);
}

#[test]
fn test_unsupported_supers_are_dropped_unless_strict() {
    let odd = json!({"type": "intersection", "types": [intrinsic("A"), intrinsic("B")]});

    let (_, entities) = convert_with(hierarchy(odd.clone()), &ConvertConfig::default()).unwrap();
    let Entity::Class(sub) = find(&entities, "./h.Sub") else { panic!("expected a class") };
    assert_eq!(sub.supers, vec![Pathname::parse("./h.Base")]);

    let strict = convert_with(hierarchy(odd), &ConvertConfig::default().with_strict(true));
    assert!(matches!(strict, Err(DocError::UnsupportedConstruct(_))));
}

#[test]
fn test_external_declarations_are_indexed_but_not_converted() {
    let (index, entities) = convert_with(
        project(json!([
            {
                "id": 50,
                "name": "Buffer",
                "kindString": "Class",
                "sources": source("/usr/lib/node/buffer.d.ts", 1)
            },
            {
                "id": 51,
                "name": "data",
                "kindString": "Variable",
                "sources": source("io.ts", 1),
                "type": {"type": "reference", "name": "Buffer", "target": 50}
            }
        ])),
        &ConvertConfig::default(),
    )
    .unwrap();

    assert!(index.get(50).unwrap().external);
    assert_eq!(entities.len(), 1);
    let Entity::Attribute(data) = &entities[0] else { panic!("expected an attribute") };
    assert_eq!(plain_text(&data.ty), "Buffer");
    assert!(matches!(&data.ty[0], declscope_api::TypeToken::XRef(_)));
}

#[test]
fn test_deprecation_examples_and_symbol_names() {
    let entities = convert(project(json!([{
        "id": 1,
        "name": "Seq",
        "kindString": "Class",
        "sources": source("seq.ts", 1),
        "children": [{
            "id": 2,
            "name": "[iterator]",
            "kindString": "Method",
            "signatures": [{
                "id": 3,
                "name": "[iterator]",
                "kindString": "Call signature",
                "comment": {
                    "summary": [{"kind": "text", "text": "Iterate."}],
                    "blockTags": [
                        {"tag": "@deprecated", "content": [{"kind": "text", "text": "use values()"}]},
                        {"tag": "@example", "content": [{"kind": "code", "text": "for (const x of seq) {}"}]}
                    ]
                },
                "type": {"type": "reference", "name": "Iterator", "typeArguments": [intrinsic("number")]}
            }]
        }]
    }])));

    let iter = function(&entities[1]);
    assert_eq!(iter.top.name, "[Symbol\u{2024}iterator]");
    assert_eq!(
        iter.top.deprecated,
        Deprecation::Reason(vec![DescriptionItem::Text("use values()".into())])
    );
    assert_eq!(
        iter.top.examples,
        vec![vec![DescriptionItem::Code("for (const x of seq) {}".into())]]
    );
    assert_eq!(plain_text(&iter.returns[0].ty), "Iterator<number>");
    assert!(!iter.is_async);
}

#[test]
fn test_modules_contribute_file_paths() {
    let config = ConvertConfig::new("/work/proj");
    let (_, entities) = convert_with(
        project(json!([{
            "id": 1,
            "name": "\"lib/util\"",
            "kindString": "Module",
            "originalName": "/work/proj/lib/util.ts",
            "children": [{
                "id": 2,
                "name": "helper",
                "kindString": "Variable",
                "sources": source("lib/util.ts", 1),
                "type": intrinsic("string")
            }]
        }])),
        &config,
    )
    .unwrap();

    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].path().to_string(), "./lib/util.helper");
    assert_eq!(
        entities[0].top().exported_from,
        Some(Pathname::parse("./lib/util"))
    );
}

#[test]
fn test_deeply_nested_type_renders() {
    let depth = 10_000;
    let mut document = String::from(
        r#"{"children": [{"id": 1, "name": "grid", "kindString": "Variable", "sources": [{"fileName": "grid.ts", "line": 1}], "type": "#,
    );
    for _ in 0..depth {
        document.push_str(r#"{"type": "array", "elementType": "#);
    }
    document.push_str(r#"{"type": "intrinsic", "name": "number"}"#);
    document.push_str(&"}".repeat(depth));
    document.push_str("}]}");

    let mut project = parse_str(&document).unwrap();
    let (_, entities) = index_and_convert(&mut project, &ConvertConfig::default()).unwrap();
    let Entity::Attribute(grid) = &entities[0] else {
        panic!("expected an attribute, got {}", entities[0].kind())
    };
    assert_eq!(plain_text(&grid.ty), format!("number{}", "[]".repeat(depth)));
}
