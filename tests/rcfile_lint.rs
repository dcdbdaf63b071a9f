//! End-to-end: parse an rc file and resolve it per command scope.

use std::io::Write;
use std::path::{Path, PathBuf};

use rclint::config::{LintConfig, SeverityChoice};
use rclint::rcfile::RcFile;
use rclint::registry::{builtin_registry, RegistryStore};
use rclint::resolve::{
    Diagnostic, ErrorKind, FlagState, FlagValue, ResolutionPass, Severity,
};

fn write_rc(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}

/// One pass per distinct command, the way the CLI drives the engine.
fn lint<'r>(store: &'r RegistryStore, rc: &RcFile) -> (Vec<Diagnostic>, Vec<ResolutionPass<'r>>) {
    let mut passes: Vec<ResolutionPass<'_>> = Vec::new();
    for line in &rc.lines {
        let idx = match passes.iter().position(|p| p.command() == line.command) {
            Some(idx) => idx,
            None => {
                passes.push(ResolutionPass::new(store, line.command.clone()));
                passes.len() - 1
            }
        };
        passes[idx].resolve_tokens(&line.tokens);
    }
    let diagnostics = passes
        .iter()
        .flat_map(|p| p.diagnostics().iter().cloned())
        .collect();
    (diagnostics, passes)
}

const SAMPLE: &str = "\
# project defaults
startup --batch
build --keep_going --jobs=8
build --copt=-O2
build --copt=-Wall
build --compilation_mode=release
test --java_debug
common --announce_rc
build --typo_flag
";

#[test]
fn sample_rc_reports_expected_findings() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_rc(dir.path(), ".bazelrc", SAMPLE);
    let store = RegistryStore::new(builtin_registry()).unwrap();
    let rc = RcFile::parse(&path).unwrap();

    let (diagnostics, _) = lint(&store, &rc);
    let errors: Vec<&Diagnostic> = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .collect();

    assert_eq!(errors.len(), 2);
    assert!(matches!(
        &errors[0].kind,
        ErrorKind::InvalidChoice { name, .. } if name == "compilation_mode"
    ));
    assert_eq!(errors[0].span.line, 6);
    assert!(matches!(
        &errors[1].kind,
        ErrorKind::UnknownFlag { spelling } if spelling == "--typo_flag"
    ));
    assert_eq!(errors[1].span.line, 9);

    // --batch on the startup line is legal but deprecated.
    assert!(diagnostics.iter().any(|d| {
        matches!(d.kind, ErrorKind::DeprecatedFlag { .. }) && d.span.line == 2
    }));
}

#[test]
fn accumulation_spans_lines_of_the_same_command() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_rc(dir.path(), ".bazelrc", SAMPLE);
    let store = RegistryStore::new(builtin_registry()).unwrap();
    let rc = RcFile::parse(&path).unwrap();

    let (_, passes) = lint(&store, &rc);
    let build = passes
        .into_iter()
        .find(|p| p.command() == "build")
        .unwrap()
        .finish();

    assert_eq!(
        build.assignments.get("copt"),
        Some(&FlagState::Multiple(vec![
            FlagValue::Opaque("-O2".into()),
            FlagValue::Opaque("-Wall".into()),
        ]))
    );
    assert_eq!(
        build.assignments.get("jobs"),
        Some(&FlagState::Single(FlagValue::Int(8)))
    );
}

#[test]
fn java_debug_line_resolves_in_test_scope() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_rc(dir.path(), ".bazelrc", SAMPLE);
    let store = RegistryStore::new(builtin_registry()).unwrap();
    let rc = RcFile::parse(&path).unwrap();

    let (_, passes) = lint(&store, &rc);
    let test = passes
        .into_iter()
        .find(|p| p.command() == "test")
        .unwrap()
        .finish();

    assert_eq!(
        test.assignments.get("cache_test_results"),
        Some(&FlagState::Single(FlagValue::Bool(false)))
    );
    assert_eq!(
        test.assignments.get("test_output"),
        Some(&FlagState::Single(FlagValue::Choice("streamed")))
    );
}

#[test]
fn config_severity_overrides_apply_to_rc_findings() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_rc(dir.path(), ".bazelrc", "startup --batch\n");
    let store = RegistryStore::new(builtin_registry()).unwrap();
    let rc = RcFile::parse(&path).unwrap();

    let mut config = LintConfig::default();
    config.severity.deprecated = SeverityChoice::Error;

    let (diagnostics, _) = lint(&store, &rc);
    let adjusted: Vec<Diagnostic> = diagnostics
        .into_iter()
        .filter_map(|d| config.adjust(d))
        .collect();

    assert!(adjusted
        .iter()
        .any(|d| matches!(d.kind, ErrorKind::DeprecatedFlag { .. })
            && d.severity == Severity::Error));
}

#[test]
fn startup_flags_on_build_lines_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_rc(dir.path(), ".bazelrc", "build --batch\n");
    let store = RegistryStore::new(builtin_registry()).unwrap();
    let rc = RcFile::parse(&path).unwrap();

    let (diagnostics, _) = lint(&store, &rc);
    assert!(diagnostics.iter().any(|d| matches!(
        &d.kind,
        ErrorKind::UnknownFlagForCommand { name, command }
            if name == "batch" && command == "build"
    )));
}
