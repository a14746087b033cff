//! End-to-end generation scenarios through the public pipeline.

use soygen::{
    ClassModel, DiagnosticCollector, MemoryFiler, ModelAnalysis, RunReport, Scheduler,
};

fn model(json: &str) -> ClassModel {
    serde_json::from_str(json).expect("test model must decode")
}

fn generate(model: &ClassModel) -> (RunReport, MemoryFiler, DiagnosticCollector) {
    let mut analysis = ModelAnalysis::new(&model.classes);
    let mut filer = MemoryFiler::new();
    let mut diags = DiagnosticCollector::new();
    let report = Scheduler::default().run(&model.classes, &mut analysis, &mut filer, &mut diags);
    (report, filer, diags)
}

#[test]
fn assisted_widget_scenario_is_byte_exact() {
    let model = model(
        r#"{
          "classes": [
            {
              "name": "com.acme.Widget",
              "constructors": [
                {
                  "params": [
                    { "name": "part", "type": "com.acme.WidgetPart" },
                    { "name": "label", "type": "String", "assisted": true }
                  ]
                }
              ]
            }
          ]
        }"#,
    );
    let (report, filer, diags) = generate(&model);
    assert!(report.success(), "diagnostics: {:?}", diags.iter().collect::<Vec<_>>());
    assert_eq!(filer.len(), 1);

    let expected = "\
package com.acme;

import com.acme.WidgetPart;
import javax.annotation.processing.Generated;
import soy.di.DefaultBean;
import soy.di.Factory;
import soy.di.SoyDi;
import soy.di.SoyEvents;

// Generated with SoyDi
@Generated(\"soygen\")
@DefaultBean
public class WidgetFactory implements Factory {

  public Widget create(String label){

    WidgetPart part = SoyDi.inject(WidgetPart.class);

    Widget instance = new Widget(part,
          label);
    SoyEvents.registerInstance(instance);
    return instance;
  }
}
";
    assert_eq!(filer.get("com.acme.WidgetFactory"), Some(expected));
}

#[test]
fn bounded_generic_box_scenario_is_byte_exact() {
    let model = model(
        r#"{
          "classes": [
            {
              "name": "com.acme.Box",
              "type_params": [ { "name": "T", "bound": "Number" } ],
              "constructors": [
                { "params": [ { "name": "value", "type": "T" } ] }
              ]
            }
          ]
        }"#,
    );
    let (report, filer, _) = generate(&model);
    assert!(report.success());

    let expected = "\
package com.acme;

import javax.annotation.processing.Generated;
import soy.di.DefaultBean;
import soy.di.Factory;
import soy.di.SoyDi;
import soy.di.SoyEvents;
import soy.di.TypeReference;

// Generated with SoyDi
@Generated(\"soygen\")
@DefaultBean
public class BoxFactory<T extends Number> implements Factory {

  public Box<T> create(){

    T value = SoyDi.inject(new TypeReference<T>(){});

    Box<T> instance = new Box<T>(value);
    SoyEvents.registerInstance(instance);
    return instance;
  }
}
";
    assert_eq!(filer.get("com.acme.BoxFactory"), Some(expected));
}

#[test]
fn colliding_simple_names_import_exactly_one() {
    let model = model(
        r#"{
          "classes": [
            {
              "name": "com.acme.Hub",
              "constructors": [
                {
                  "params": [
                    { "name": "one", "type": "a.b.Config" },
                    { "name": "two", "type": "c.d.Config" }
                  ]
                }
              ]
            }
          ]
        }"#,
    );
    let (report, filer, _) = generate(&model);
    assert!(report.success());
    let out = filer.get("com.acme.HubFactory").unwrap();
    assert_eq!(out.matches("import a.b.Config;").count(), 1);
    assert!(!out.contains("import c.d.Config;"));
    assert!(out.contains("    Config one = SoyDi.inject(Config.class);"));
    assert!(out.contains("    c.d.Config two = SoyDi.inject(c.d.Config.class);"));
}

#[test]
fn generic_parameter_type_uses_type_token_expression() {
    let model = model(
        r#"{
          "classes": [
            {
              "name": "com.acme.Board",
              "constructors": [
                {
                  "params": [
                    { "name": "tasks", "type": "java.util.List<com.acme.Task>" },
                    { "name": "name", "type": "java.lang.String" }
                  ]
                }
              ]
            }
          ]
        }"#,
    );
    let (report, filer, _) = generate(&model);
    assert!(report.success());
    let out = filer.get("com.acme.BoardFactory").unwrap();
    assert!(out.contains("    List<Task> tasks = SoyDi.inject(new TypeReference<List<Task>>(){});"));
    assert!(out.contains("    String name = SoyDi.inject(String.class);"));
    assert!(out.contains("import java.util.List;"));
    assert!(out.contains("import com.acme.Task;"));
    assert!(out.contains("import soy.di.TypeReference;"));
}

#[test]
fn root_package_class_omits_package_line() {
    let model = model(r#"{ "classes": [ { "name": "Widget" } ] }"#);
    let (report, filer, _) = generate(&model);
    assert!(report.success());
    let out = filer.get("WidgetFactory").unwrap();
    assert!(!out.contains("package "));
    assert!(out.contains("public class WidgetFactory implements Factory {"));
    assert!(out.contains("  public Widget create(){"));
}

#[test]
fn marked_constructor_is_selected_and_others_ignored() {
    let model = model(
        r#"{
          "classes": [
            {
              "name": "com.acme.Widget",
              "constructors": [
                { "params": [ { "name": "ignored", "type": "com.acme.Legacy" } ] },
                { "inject": true, "params": [ { "name": "part", "type": "com.acme.WidgetPart" } ] }
              ]
            }
          ]
        }"#,
    );
    let (report, filer, _) = generate(&model);
    assert!(report.success());
    let out = filer.get("com.acme.WidgetFactory").unwrap();
    assert!(out.contains("WidgetPart part"));
    assert!(!out.contains("Legacy"));
}

#[test]
fn unmarked_ambiguity_rejects_but_run_continues() {
    let model = model(
        r#"{
          "classes": [
            {
              "name": "com.acme.Bad",
              "constructors": [ { "params": [] }, { "params": [] } ]
            },
            { "name": "com.acme.Good" }
          ]
        }"#,
    );
    let (report, filer, diags) = generate(&model);
    assert!(!report.success());
    assert!(filer.get("com.acme.BadFactory").is_none());
    assert!(filer.get("com.acme.GoodFactory").is_some());
    let error = diags.iter().find(|d| d.class.is_some()).unwrap();
    assert_eq!(error.class.as_deref(), Some("com.acme.Bad"));
    assert!(error.message.contains("com.acme.Bad"));
}

#[test]
fn factory_dependency_chain_settles_over_rounds() {
    // C needs B's factory, B needs A's factory: three rounds to settle.
    let model = model(
        r#"{
          "classes": [
            { "name": "com.acme.C",
              "constructors": [ { "params": [ { "name": "b", "type": "BFactory" } ] } ] },
            { "name": "com.acme.B",
              "constructors": [ { "params": [ { "name": "a", "type": "AFactory" } ] } ] },
            { "name": "com.acme.A" }
          ]
        }"#,
    );
    let (report, filer, diags) = generate(&model);
    assert!(report.success(), "diagnostics: {:?}", diags.iter().collect::<Vec<_>>());
    assert_eq!(report.rounds, 3);
    assert_eq!(filer.len(), 3);
    // Creation order follows resolution order.
    let created: Vec<_> = filer.files().map(|(name, _)| name.to_string()).collect();
    assert_eq!(
        created,
        vec![
            "com.acme.AFactory".to_string(),
            "com.acme.BFactory".to_string(),
            "com.acme.CFactory".to_string(),
        ]
    );
}
