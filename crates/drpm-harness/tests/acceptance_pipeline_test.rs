//! Stage-level integration tests against a stub toolchain.
//!
//! Each test drives the library stages directly with a hand-built
//! configuration whose compiler and pkg-config point at shell stubs, so no
//! drpm installation is needed.

#![cfg(unix)]

mod helpers;

use std::fs;
use std::path::Path;

use drpm_harness::HarnessError;
use drpm_harness::buildstep;
use drpm_harness::config::RunConfig;
use drpm_harness::flags::LibraryFlags;
use drpm_harness::runner;
use drpm_harness::verify;

struct StubWorld {
    root: tempfile::TempDir,
    scratch: tempfile::TempDir,
    cfg: RunConfig,
}

impl StubWorld {
    fn stub_dir(&self) -> &Path {
        self.root.path()
    }

    fn cc_args(&self) -> String {
        fs::read_to_string(self.stub_dir().join("cc-args.log")).unwrap_or_default()
    }
}

fn stub_world(checkpoints: &str) -> StubWorld {
    let root = tempfile::tempdir().expect("root tempdir");
    let scratch = tempfile::tempdir().expect("scratch tempdir");

    let fixtures = helpers::write_fixture_dir(root.path());
    let source = helpers::write_probe_source(root.path());
    let pkg_config = helpers::write_pkg_config_stub(root.path());
    let cc = helpers::write_cc_stub(root.path(), checkpoints);

    let mut cfg = RunConfig::resolve(source, fixtures, scratch.path()).expect("resolve");
    cfg.cc = cc.into_os_string();
    cfg.pkg_config = pkg_config.into_os_string();
    StubWorld { root, scratch, cfg }
}

#[test]
fn full_pipeline_verifies_checkpoints() {
    let world = stub_world(helpers::PROBE_CHECKPOINTS);
    let cfg = &world.cfg;

    let flags = LibraryFlags::discover(cfg).expect("discover flags");
    assert_eq!(flags.cflags, vec!["-I/usr/include/drpm", "-DPROBE=1"]);
    assert_eq!(flags.libs, vec!["-ldrpm"]);

    buildstep::compile(cfg, &flags).expect("compile");
    assert!(cfg.object.is_file(), "object should exist after compile");

    buildstep::link(cfg, &flags).expect("link");
    assert!(cfg.program.is_file(), "program should exist after link");

    let lines = runner::run_probe(cfg).expect("run probe");
    let result = verify::verify_lines(&lines);
    assert!(result.passed, "checkpoints should match: {:?}", result.diff);

    let cc_args = world.cc_args();
    assert!(cc_args.contains("-Werror"), "strict warnings: {cc_args}");
    assert!(cc_args.contains("-I/usr/include/drpm"), "cflags: {cc_args}");
    assert!(cc_args.contains("-ldrpm"), "libs: {cc_args}");
    assert!(
        cc_args.contains("examine.c"),
        "source passed to cc: {cc_args}"
    );
    // Both artifacts land in the scratch directory.
    assert_eq!(cfg.object, world.scratch.path().join("examine.o"));
    assert_eq!(cfg.program, world.scratch.path().join("examine"));
}

#[test]
fn multiline_metadata_fails_before_compiling() {
    let world = stub_world(helpers::PROBE_CHECKPOINTS);
    helpers::write_script(
        &world.stub_dir().join("pkg-config"),
        "#!/bin/sh\nprintf -- '-I/a\\n-I/b\\n'\n",
    );

    let err = LibraryFlags::discover(&world.cfg).expect_err("two-line cflags");
    assert!(matches!(err, HarnessError::MultilineFlags { .. }));
    assert!(
        !world.stub_dir().join("cc-args.log").exists(),
        "the compiler must never run on bad metadata"
    );
}

#[test]
fn failing_compiler_stops_the_pipeline() {
    let world = stub_world(helpers::PROBE_CHECKPOINTS);
    helpers::write_script(&world.stub_dir().join("cc"), "#!/bin/sh\nexit 1\n");

    let flags = LibraryFlags::discover(&world.cfg).expect("discover flags");
    let err = buildstep::compile(&world.cfg, &flags).expect_err("cc exits 1");
    assert!(matches!(err, HarnessError::CommandFailed { .. }));
    assert!(!world.cfg.object.exists(), "no object after failed compile");
}

#[test]
fn compiler_not_creating_the_object_is_detected() {
    let world = stub_world(helpers::PROBE_CHECKPOINTS);
    helpers::write_script(&world.stub_dir().join("cc"), "#!/bin/sh\nexit 0\n");

    let flags = LibraryFlags::discover(&world.cfg).expect("discover flags");
    let err = buildstep::compile(&world.cfg, &flags).expect_err("object never written");
    assert!(matches!(err, HarnessError::MissingArtifact { .. }));
}

#[test]
fn unexecutable_program_is_detected() {
    let world = stub_world(helpers::PROBE_CHECKPOINTS);
    // A cc stub whose link branch writes the program without an execute bit.
    helpers::write_script(
        &world.stub_dir().join("cc"),
        r#"#!/bin/sh
out=""
expect_out=0
for arg in "$@"; do
  if [ "$expect_out" = 1 ]; then out="$arg"; expect_out=0; continue; fi
  [ "$arg" = "-o" ] && expect_out=1
done
: > "$out"
"#,
    );

    let flags = LibraryFlags::discover(&world.cfg).expect("discover flags");
    buildstep::compile(&world.cfg, &flags).expect("compile");
    let err = buildstep::link(&world.cfg, &flags).expect_err("program not executable");
    assert!(matches!(err, HarnessError::NotExecutable { .. }));
}

#[test]
fn wrong_checkpoints_fail_verification() {
    let world = stub_world("make standard\nfine\n");
    let cfg = &world.cfg;

    let flags = LibraryFlags::discover(cfg).expect("discover flags");
    buildstep::compile(cfg, &flags).expect("compile");
    buildstep::link(cfg, &flags).expect("link");

    let lines = runner::run_probe(cfg).expect("run probe");
    let result = verify::verify_lines(&lines);
    assert!(!result.passed);
    let diff = result.diff.expect("diff on mismatch");
    assert!(diff.contains("-read standard"));
}
