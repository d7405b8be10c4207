mod common;

use common::{TestResult, render, render_fragment};
use mixup::{
    BuildError, DomError, MixupError, NamespacePolicy, RenderBuilder, RenderConfig, RootKind, Spec,
    names::XHTML_NAMESPACE,
};
use serde_json::json;
use std::io::Write;

#[test]
fn renders_a_document() -> TestResult {
    let xml = render(json!({
        "#html": [
            { "#head": { "#title": "Hello" } },
            { "#body": { "#p": ["Hi ", { "#b": "there" }], "class": "lead" } }
        ],
        "xmlns": XHTML_NAMESPACE
    }))?;
    assert_eq!(
        xml,
        format!(
            "<html xmlns=\"{}\"><head><title>Hello</title></head><body><p class=\"lead\">Hi <b>there</b></p></body></html>",
            XHTML_NAMESPACE
        )
    );
    Ok(())
}

#[test]
fn document_rejects_top_level_text() {
    let err = render(json!(["one", "two"])).unwrap_err();
    assert!(matches!(
        err,
        MixupError::Build(BuildError::Dom(DomError::HierarchyRequest(_)))
    ));
}

#[test]
fn fragment_accepts_mixed_top_level() -> TestResult {
    let xml = render_fragment(json!(["one", { "#br": null }, { "#comment": "c" }]))?;
    assert_eq!(xml, "one<br/><!--c-->");
    Ok(())
}

#[test]
fn indent_and_declaration() -> TestResult {
    let renderer = RenderBuilder::new()
        .with_indent(2)
        .with_xml_declaration(true)
        .build();
    let xml = renderer.render_value(json!({ "#root": { "#a": "x" } }))?;
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.ends_with("<root>\n  <a>x</a>\n</root>"));
    Ok(())
}

#[test]
fn strict_policy_fails_unbound_prefixes() -> TestResult {
    let spec = json!({ "#svg:rect": null });
    let permissive = render(spec.clone())?;
    assert_eq!(permissive, "<svg:rect/>");

    let strict = RenderBuilder::new()
        .with_namespace_policy(NamespacePolicy::Strict)
        .build();
    let err = strict.render_value(spec).unwrap_err();
    assert!(matches!(err, MixupError::Build(BuildError::UnboundPrefix { .. })));
    Ok(())
}

#[test]
fn callables_in_rendered_specs() -> TestResult {
    let row = |args: &[Spec<mixup::NodeId>]| {
        Spec::map([("#li", args.first().cloned().unwrap_or(Spec::Null))])
    };
    let spec = Spec::map([("#ul", Spec::list(vec![Spec::func(row), Spec::func(row)]))]);
    let xml = RenderBuilder::new()
        .build()
        .render_spec(spec, vec![Spec::from("item")])?;
    assert_eq!(xml, "<ul><li>item</li><li>item</li></ul>");
    Ok(())
}

#[test]
fn invalid_json_is_reported() {
    let err = RenderBuilder::new().build().render_str("{ not json").unwrap_err();
    assert!(matches!(err, MixupError::Json(_)));
}

#[test]
fn config_from_file() -> TestResult {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(
        file,
        r#"{{ "namespace-policy": "strict", "indent": 4, "root": "fragment" }}"#
    )?;

    let builder = RenderBuilder::from_config_file(file.path())?;
    let renderer = builder.build();
    assert_eq!(
        renderer.config(),
        &RenderConfig {
            namespace_policy: NamespacePolicy::Strict,
            indent: Some(4),
            xml_declaration: false,
            root: RootKind::Fragment,
        }
    );
    Ok(())
}

#[test]
fn config_rejects_unknown_keys() -> TestResult {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, r#"{{ "indentation": 2 }}"#)?;
    let err = RenderBuilder::from_config_file(file.path()).unwrap_err();
    assert!(matches!(err, MixupError::Config(_)));

    let missing = RenderBuilder::from_config_file("/nonexistent/mixup.json").unwrap_err();
    assert!(matches!(missing, MixupError::Io(_)));
    Ok(())
}
