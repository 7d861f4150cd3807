use autosass::{AutosassConfig, FormatSpec, OutputStyle, SaveOutcome};

use crate::harness::{SIMPLE_SCSS, TestProject};

fn excluding_partials() -> AutosassConfig {
    AutosassConfig {
        exclude_regex: "^_".into(),
        ..AutosassConfig::default()
    }
}

#[test_log::test(tokio::test)]
async fn saved_stylesheet_is_compiled_next_to_source() {
    let project = TestProject::new(AutosassConfig::default());
    let source = project.write("styles/main.scss", SIMPLE_SCSS);

    assert_eq!(project.autocompiler.on_save(&source), SaveOutcome::Compiled);
    project.autocompiler.wait_idle().await;

    let css = project.read("styles/main.css");
    assert!(css.contains("#3498db"), "{css}");
    assert!(!css.contains("$primary"), "{css}");
    assert_eq!(project.lines_containing("Successfully generated CSS"), 1);
}

#[tokio::test]
async fn non_stylesheets_are_ignored() {
    let project = TestProject::new(AutosassConfig::default());
    let css = project.write("styles/main.css", ".a { b: c; }");
    let txt = project.write("notes.txt", "// compile");

    assert_eq!(project.autocompiler.on_save(&css), SaveOutcome::Ignored);
    assert_eq!(project.autocompiler.on_save(&txt), SaveOutcome::Ignored);
    project.autocompiler.wait_idle().await;

    assert!(project.compiler.calls().is_empty());
    assert!(project.channel.lines().is_empty());
    assert!(project.channel.notifications().is_empty());
}

#[tokio::test]
async fn extension_check_is_case_insensitive() {
    let project = TestProject::new(AutosassConfig::default());
    let source = project.write("Theme.SCSS", SIMPLE_SCSS);

    assert_eq!(project.autocompiler.on_save(&source), SaveOutcome::Compiled);
    project.autocompiler.wait_idle().await;
    assert!(project.exists("Theme.css"));
}

#[tokio::test]
async fn excluded_partial_is_skipped_with_log_line() {
    let project = TestProject::new(excluding_partials());
    let source = project.write("_partial.scss", SIMPLE_SCSS);

    assert_eq!(project.autocompiler.on_save(&source), SaveOutcome::Excluded);
    project.autocompiler.wait_idle().await;

    assert!(project.compiler.calls().is_empty());
    assert!(!project.exists("_partial.css"));
    assert_eq!(project.lines_containing("is excluded from building to CSS"), 1);
}

#[tokio::test]
async fn global_compile_after_save_overrides_exclusion() {
    let project = TestProject::new(AutosassConfig {
        compile_after_save: true,
        ..excluding_partials()
    });
    let source = project.write("_partial.scss", SIMPLE_SCSS);

    assert_eq!(project.autocompiler.on_save(&source), SaveOutcome::Compiled);
    project.autocompiler.wait_idle().await;
    assert!(project.exists("_partial.css"));
}

#[tokio::test]
async fn compile_directive_overrides_exclusion() {
    let project = TestProject::new(excluding_partials());
    let source = project.write("_partial.scss", &format!("// compile\n{SIMPLE_SCSS}"));

    assert_eq!(project.autocompiler.on_save(&source), SaveOutcome::Compiled);
    project.autocompiler.wait_idle().await;
    assert!(project.exists("_partial.css"));
}

#[tokio::test]
async fn main_directive_compiles_main_file_instead() {
    let project = TestProject::new(excluding_partials());
    project.write("base.scss", "@import 'partials/buttons';\n");
    let partial = project.write(
        "partials/_buttons.scss",
        &format!("// main: ../base\n{SIMPLE_SCSS}"),
    );

    let outcome = project.autocompiler.on_save(&partial);
    assert_eq!(
        outcome,
        SaveOutcome::Delegated(project.path("partials/../base.scss"))
    );
    project.autocompiler.wait_idle().await;

    let calls = project.compiler.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, project.path("partials/../base.scss"));
    assert!(project.read("base.css").contains("#3498db"));
    assert!(!project.exists("partials/_buttons.css"));
}

#[tokio::test]
async fn malformed_main_directive_fails_the_save() {
    let project = TestProject::new(AutosassConfig::default());
    let source = project.write("main.scss", &format!("// the main styles\n{SIMPLE_SCSS}"));

    assert_eq!(project.autocompiler.on_save(&source), SaveOutcome::Failed);
    project.autocompiler.wait_idle().await;

    assert!(project.compiler.calls().is_empty());
    let notifications = project.channel.notifications();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].contains("malformed main directive"), "{notifications:?}");
    let lines = project.channel.lines();
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].contains("Failed to generate CSS: malformed main directive"), "{lines:?}");
    assert_eq!(project.channel.times_shown(), 1);
}

#[tokio::test]
async fn invalid_exclude_pattern_fails_the_save() {
    let project = TestProject::new(AutosassConfig {
        exclude_regex: "([".into(),
        ..AutosassConfig::default()
    });
    let source = project.write("main.scss", SIMPLE_SCSS);

    assert_eq!(project.autocompiler.on_save(&source), SaveOutcome::Failed);
    assert_eq!(project.channel.notifications().len(), 1);
    assert_eq!(project.channel.lines().len(), 1);
    assert_eq!(project.channel.times_shown(), 1);
}

#[tokio::test]
async fn relative_target_dir_goes_under_project_root() {
    let project = TestProject::new(AutosassConfig {
        target_dir: "build".into(),
        ..AutosassConfig::default()
    });
    let source = project.write("src/a.scss", SIMPLE_SCSS);

    assert_eq!(project.autocompiler.on_save(&source), SaveOutcome::Compiled);
    project.autocompiler.wait_idle().await;

    assert!(project.exists("build/a.css"));
    assert!(!project.exists("src/a.css"));
}

#[tokio::test]
async fn relative_target_dir_without_root_fails_before_compiling() {
    let project = TestProject::without_root(AutosassConfig {
        target_dir: "build".into(),
        ..AutosassConfig::default()
    });
    let source = project.write("src/a.scss", SIMPLE_SCSS);

    assert_eq!(project.autocompiler.on_save(&source), SaveOutcome::Failed);
    project.autocompiler.wait_idle().await;

    assert!(project.compiler.calls().is_empty());
    assert_eq!(project.channel.notifications().len(), 1);
}

#[tokio::test]
async fn every_format_gets_its_own_output() {
    let project = TestProject::new(AutosassConfig {
        formats: vec![
            FormatSpec::new("expanded", "css"),
            FormatSpec::new("compressed", ".min.css"),
        ],
        ..AutosassConfig::default()
    });
    let source = project.write("main.scss", SIMPLE_SCSS);

    project.autocompiler.on_save(&source);
    project.autocompiler.wait_idle().await;

    let expanded = project.read("main.css");
    let compressed = project.read("main.min.css");
    assert!(expanded.len() > compressed.len(), "{expanded:?} vs {compressed:?}");

    let mut styles: Vec<_> = project.compiler.calls().into_iter().map(|(_, s)| s).collect();
    styles.sort_by_key(|s| s.as_str());
    assert_eq!(styles, vec![OutputStyle::Compressed, OutputStyle::Expanded]);
}

#[tokio::test]
async fn compiler_error_is_reported_without_output() {
    let project = TestProject::new(AutosassConfig::default());
    let source = project.write("broken.scss", ".a { color: $nope; }\n");

    assert_eq!(project.autocompiler.on_save(&source), SaveOutcome::Compiled);
    project.autocompiler.wait_idle().await;

    assert!(!project.exists("broken.css"));
    assert_eq!(project.channel.lines().len(), 1);
    assert_eq!(project.channel.notifications().len(), 1);
    assert_eq!(project.channel.times_shown(), 1);
}

#[tokio::test]
async fn recompiling_unchanged_source_is_idempotent() {
    let project = TestProject::new(AutosassConfig::default());
    let source = project.write("main.scss", SIMPLE_SCSS);

    project.autocompiler.on_save(&source);
    project.autocompiler.wait_idle().await;
    let first = std::fs::read(project.path("main.css")).unwrap();

    project.autocompiler.on_save(&source);
    project.autocompiler.wait_idle().await;
    let second = std::fs::read(project.path("main.css")).unwrap();

    assert_eq!(first, second);
    // The log is cleared per compile, and the second write logs afresh
    assert_eq!(project.lines_containing("Successfully generated CSS"), 1);
    assert_eq!(project.compiler.calls().len(), 2);
}
