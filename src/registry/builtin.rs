//! Builtin flag table.
//!
//! A representative subset of the real flag vocabulary, declared in the
//! same shape as the full generated table. Adding a flag: one entry here;
//! `RegistryStore::new` enforces the registry invariants at load time.

use crate::registry::def::{FlagDefinition, ValueKind};

const STARTUP: &[&str] = &["startup"];
const BUILD: &[&str] = &["build", "test", "run", "mobile-install"];
const TEST: &[&str] = &["test"];
const QUERY: &[&str] = &["query"];
const BUILD_AND_QUERY: &[&str] = &["build", "test", "run", "mobile-install", "query", "fetch"];
const ALL_NON_STARTUP: &[&str] = &[
    "build",
    "test",
    "run",
    "mobile-install",
    "query",
    "fetch",
    "clean",
    "info",
];

fn flag(
    name: &'static str,
    value_kind: ValueKind,
    commands: &'static [&'static str],
) -> FlagDefinition {
    FlagDefinition::new(name, value_kind, commands)
}

/// The complete builtin table, in canonical-name order within each section.
pub fn builtin_registry() -> Vec<FlagDefinition> {
    vec![
        // === Startup options ===
        flag("batch", ValueKind::Boolean, STARTUP)
            .default("false")
            .deprecated()
            .help("Run as a batch process instead of using the server mode."),
        flag("bazelrc", ValueKind::Path, STARTUP)
            .multiple()
            .help("Location of additional rc files to read."),
        flag("host_jvm_args", ValueKind::Unknown, STARTUP)
            .multiple()
            .help("Flags to pass to the JVM hosting the build server."),
        flag("host_jvm_debug", ValueKind::Boolean, STARTUP)
            .expands_to(&[
                "--host_jvm_args=-agentlib:jdwp=transport=dt_socket,server=y,suspend=y,address=5005",
            ])
            .help("Make the server JVM wait for a debugger before running."),
        flag("idle_server_tasks", ValueKind::Boolean, STARTUP)
            .default("true")
            .help("Run System.gc() when the server is idle."),
        flag("max_idle_secs", ValueKind::Integer, STARTUP)
            .default("10800")
            .help("How long the build server waits idle before shutting down."),
        flag("output_base", ValueKind::Path, STARTUP)
            .help("Directory under which all build output is written."),
        flag("output_user_root", ValueKind::Path, STARTUP)
            .help("User-specific directory for output bases and install bases."),
        // === Common build/test/run options ===
        flag(
            "action_cache_store_output_metadata",
            ValueKind::Boolean,
            BUILD,
        )
        .old_name("experimental_action_cache_store_output_metadata")
        .default("false")
        .help("Store output metadata in the action cache."),
        flag("android_sdk", ValueKind::Label, BUILD)
            .default("@bazel_tools//tools/android:sdk")
            .help("Android SDK to use for Android targets."),
        flag("announce_rc", ValueKind::Boolean, ALL_NON_STARTUP)
            .default("false")
            .help("Announce rc options while parsing them."),
        flag("build_runfile_links", ValueKind::Boolean, BUILD)
            .default("true")
            .help("Build runfiles symlink forests for all targets."),
        flag("color", ValueKind::OneOf(&["yes", "no", "auto"]), ALL_NON_STARTUP)
            .default("auto")
            .help("Use terminal controls to colorize output."),
        flag(
            "compilation_mode",
            ValueKind::OneOf(&["fastbuild", "dbg", "opt"]),
            BUILD,
        )
        .abbrev('c')
        .default("fastbuild")
        .help("Specify the mode the binary will be built in."),
        flag("copt", ValueKind::Unknown, BUILD)
            .multiple()
            .help("Additional option to pass to the C compiler."),
        flag("curses", ValueKind::OneOf(&["yes", "no", "auto"]), ALL_NON_STARTUP)
            .default("auto")
            .help("Use terminal cursor controls to minimize scrolling output."),
        flag("cxxopt", ValueKind::Unknown, BUILD)
            .multiple()
            .help("Additional option to pass when compiling C++ source files."),
        flag("define", ValueKind::Unknown, BUILD_AND_QUERY)
            .multiple()
            .help("Assign a value to a --define variable (name=value)."),
        flag("disk_cache", ValueKind::Path, BUILD_AND_QUERY)
            .help("Directory where a local disk cache of action results lives."),
        flag(
            "experimental_inmemory_dotd_files",
            ValueKind::Boolean,
            BUILD,
        )
        .experimental()
        .default("false")
        .help("Pass C++ .d files through memory instead of disk."),
        flag(
            "experimental_inmemory_jdeps_files",
            ValueKind::Boolean,
            BUILD,
        )
        .experimental()
        .default("false")
        .help("Pass Java .jdeps files through memory instead of disk."),
        flag("experimental_scale_timeouts", ValueKind::Double, TEST)
            .experimental()
            .default("1.0")
            .help("Scale all test timeouts by this factor."),
        flag("experimental_use_sandboxfs", ValueKind::TriState, BUILD)
            .experimental()
            .default("auto")
            .help("Use sandboxfs to create execution sandboxes."),
        flag("jobs", ValueKind::Integer, BUILD_AND_QUERY)
            .abbrev('j')
            .help("Number of concurrent jobs to run."),
        flag("keep_going", ValueKind::Boolean, BUILD_AND_QUERY)
            .abbrev('k')
            .default("false")
            .help("Continue as much as possible after an error."),
        flag("linkopt", ValueKind::Unknown, BUILD)
            .multiple()
            .help("Additional option to pass to the linker."),
        flag("platforms", ValueKind::Label, BUILD)
            .help("Target platform to build for."),
        flag(
            "remote_download_outputs",
            ValueKind::OneOf(&["all", "minimal", "toplevel"]),
            BUILD,
        )
        .default("all")
        .help("Which remote build outputs to download to the local machine."),
        flag("remote_download_minimal", ValueKind::Boolean, BUILD)
            .expands_to(&[
                "--nobuild_runfile_links",
                "--experimental_inmemory_jdeps_files",
                "--experimental_inmemory_dotd_files",
                "--remote_download_outputs=minimal",
            ])
            .help("Download no remote build outputs to the local machine."),
        flag("remote_download_toplevel", ValueKind::Boolean, BUILD)
            .expands_to(&[
                "--experimental_inmemory_jdeps_files",
                "--experimental_inmemory_dotd_files",
                "--remote_download_outputs=toplevel",
            ])
            .help("Download only outputs of top-level targets to the local machine."),
        flag("remote_timeout", ValueKind::Duration, BUILD_AND_QUERY)
            .default("60s")
            .help("Maximum time to wait for remote execution and cache calls."),
        flag("repository_cache", ValueKind::Path, ALL_NON_STARTUP)
            .help("Cache location for downloaded values of external repositories."),
        flag("show_timestamps", ValueKind::Boolean, ALL_NON_STARTUP)
            .default("false")
            .help("Include timestamps in messages."),
        flag("subcommands", ValueKind::Boolean, BUILD)
            .abbrev('s')
            .default("false")
            .help("Display the subcommands executed during a build."),
        flag("symlink_prefix", ValueKind::Unknown, BUILD)
            .help("Prefix prepended to the convenience symlinks (bazel-bin etc.)."),
        flag("verbose_failures", ValueKind::Boolean, BUILD)
            .default("false")
            .help("If a command fails, print out the full command line."),
        // === Test options ===
        flag("cache_test_results", ValueKind::Boolean, TEST)
            .abbrev('t')
            .default("true")
            .help("Reuse saved test results unless the test changed."),
        flag("java_debug", ValueKind::Boolean, TEST)
            .expands_to(&[
                "--test_arg=--wrapper_script_flag=--debug",
                "--test_output=streamed",
                "--test_strategy=exclusive",
                "--test_timeout=9999",
                "--nocache_test_results",
            ])
            .help("Make the Java test JVM wait for a debugger before running."),
        flag("local_test_jobs", ValueKind::Integer, TEST)
            .default("0")
            .help("Maximum number of local test jobs to run concurrently."),
        flag("runs_per_test", ValueKind::Integer, TEST)
            .default("1")
            .help("Number of times to run each test."),
        flag("test_arg", ValueKind::Unknown, TEST)
            .multiple()
            .help("Additional argument to pass to the test executable."),
        flag(
            "test_output",
            ValueKind::OneOf(&["summary", "errors", "all", "streamed"]),
            TEST,
        )
        .default("summary")
        .help("Specify how test output should be shown."),
        flag("test_strategy", ValueKind::Unknown, TEST)
            .help("Specify how to run tests (e.g. exclusive)."),
        flag("test_timeout", ValueKind::Integer, TEST)
            .default("-1")
            .help("Override the default test timeout, in seconds."),
        // === Query options ===
        flag(
            "output",
            ValueKind::OneOf(&["label", "label_kind", "graph", "proto", "xml"]),
            QUERY,
        )
        .default("label")
        .help("Format in which query results should be printed."),
        flag("query_file", ValueKind::Path, QUERY)
            .help("Read the query expression from this file instead of the command line."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryStore;

    #[test]
    fn builtin_table_passes_integrity_checks() {
        let store = RegistryStore::new(builtin_registry()).expect("builtin table is consistent");
        assert!(store.defs().len() > 40);
    }

    #[test]
    fn every_builtin_default_parses_with_its_own_grammar() {
        let store = RegistryStore::new(builtin_registry()).unwrap();
        for def in store.defs() {
            if let Some(parsed) = store.default_value(def) {
                assert!(parsed.is_ok(), "default of --{} does not parse", def.name);
            }
        }
    }
}
