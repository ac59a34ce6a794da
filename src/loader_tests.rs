use super::*;
use serde_json::json;
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn file(&self, name: &str, content: &str) -> &Self {
        fs::write(self.dir.path().join(name), content).unwrap();
        self
    }

    fn load(&self, resource: &str) -> Result<String> {
        self.load_with(resource, &LoaderOptions::default())
    }

    fn load_with(&self, resource: &str, options: &LoaderOptions) -> Result<String> {
        let resource = self.dir.path().join(resource);
        load_component(&resource, self.dir.path(), options)
    }
}

#[test]
fn test_single_template_component() {
    let fx = Fixture::new();
    fx.file("component.vue.html", "<!-- component.vue.html -->");

    assert_eq!(
        fx.load("component.vue.html").unwrap(),
        r#"<template separated src="./component.vue.html" lang="html"></template>"#
    );
}

#[test]
fn test_three_file_component() {
    let fx = Fixture::new();
    fx.file("component.vue.js", "// component.vue.js")
        .file("component.vue.html", "<!-- component.vue.html -->")
        .file("component.vue.css", "/* component.vue.css */");

    assert_eq!(
        fx.load("component.vue.js").unwrap(),
        concat!(
            r#"<template separated src="./component.vue.html" lang="html"></template>"#,
            r#"<script separated src="./component.vue.js" lang="js"></script>"#,
            r#"<style separated src="./component.vue.css" lang="css"></style>"#,
        )
    );
}

#[test]
fn test_components_sharing_a_directory() {
    let fx = Fixture::new();
    fx.file("first_component.vue.html", "")
        .file("second_component.vue.html", "")
        .file("first_component.vue.scoped.css", "");

    assert_eq!(
        fx.load("first_component.vue.html").unwrap(),
        concat!(
            r#"<template separated src="./first_component.vue.html" lang="html"></template>"#,
            r#"<style separated src="./first_component.vue.scoped.css" lang="css" scoped></style>"#,
        )
    );
    assert_eq!(
        fx.load("second_component.vue.html").unwrap(),
        r#"<template separated src="./second_component.vue.html" lang="html"></template>"#
    );
}

#[test]
fn test_hidden_siblings_are_ignored() {
    let fx = Fixture::new();
    fx.file("component.vue.html", "").file(".component.vue.html.swp", "");

    assert_eq!(
        fx.load("component.vue.html").unwrap(),
        r#"<template separated src="./component.vue.html" lang="html"></template>"#
    );
}

#[test]
fn test_existing_single_file_component_is_returned_verbatim() {
    let fx = Fixture::new();
    let sfc = "<template><!-- component.vue --></template>";
    // Two templates would fail assembly, so success proves it was skipped.
    fx.file("component.vue.html", "")
        .file("component.vue.pug", "")
        .file("component.vue", sfc);

    assert_eq!(fx.load("component.vue.html").unwrap(), sfc);
}

#[test]
fn test_custom_test_option() {
    let fx = Fixture::new();
    fx.file("card.mfc.ts", "").file("card.mfc.scoped.less", "");
    let options = LoaderOptions::from_value(&json!({ "test": { "regex": r"\.mfc\." } })).unwrap();

    assert_eq!(
        fx.load_with("card.mfc.ts", &options).unwrap(),
        concat!(
            r#"<script separated src="./card.mfc.ts" lang="ts"></script>"#,
            r#"<style separated src="./card.mfc.scoped.less" lang="less" scoped></style>"#,
        )
    );
}

#[test]
fn test_no_candidate_files() {
    let fx = Fixture::new();

    let err = fx.load("component.vue.js").unwrap_err();
    assert_eq!(
        err.to_string(),
        "[VueMultiFileComponentLoader] no valid files found for component 'component'"
    );
}

#[test]
fn test_errors_surface_from_assembly() {
    let fx = Fixture::new();
    fx.file("component.vue.css", "");
    assert!(matches!(
        fx.load("component.vue.css").unwrap_err(),
        ComponentError::MissingPrimaryBlock { .. }
    ));

    fx.file("component.vue.html", "").file("component.vue.pug", "");
    assert_eq!(
        fx.load("component.vue.html").unwrap_err().to_string(),
        "[VueMultiFileComponentLoader] duplicate template files found in component 'component'"
    );
}

#[test]
fn test_assemble_directory() {
    let fx = Fixture::new();
    let nested = fx.dir.path().join("widgets");
    fs::create_dir(&nested).unwrap();
    fx.file("app.vue.html", "").file("app.vue.js", "");
    fx.file("broken.vue.css", "");
    fs::write(nested.join("button.vue.ts"), "").unwrap();

    let assembled = assemble_directory(fx.dir.path(), &LoaderOptions::default()).unwrap();
    let names: Vec<&str> = assembled.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["app", "broken", "button"]);

    assert_eq!(
        assembled[0].source.as_deref(),
        Some(concat!(
            r#"<template separated src="./app.vue.html" lang="html"></template>"#,
            r#"<script separated src="./app.vue.js" lang="js"></script>"#,
        ))
    );
    assert!(assembled[1].source.is_none());
    assert!(assembled[1]
        .error
        .as_deref()
        .unwrap()
        .contains("no template or script file defined for component 'broken'"));
    assert_eq!(assembled[2].dir, nested);
}
