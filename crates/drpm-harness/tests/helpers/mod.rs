//! Shared stub toolchain for integration tests.
//!
//! The stubs stand in for pkg-config and cc so the pipeline can be exercised
//! without an installed drpm library. The cc stub records every argument it
//! receives in `<stub dir>/cc-args.log`; the probe it "links" records the
//! scratch directory it was handed in `<stub dir>/scratch-path.txt`.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// The checkpoint sequence a healthy probe prints.
pub const PROBE_CHECKPOINTS: &str =
    "make standard\nread standard\nstandard\nmake options\nmake rpm-only\nread rpm-only\nrpm-only\nfine\n";

/// Write an executable shell script.
pub fn write_script(path: &Path, body: &str) {
    fs::write(path, body).expect("write script");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod script");
}

/// Stub pkg-config: answers `--cflags`/`--libs` for drpm with fixed flags.
pub fn write_pkg_config_stub(dir: &Path) -> PathBuf {
    let path = dir.join("pkg-config");
    write_script(
        &path,
        r#"#!/bin/sh
[ "$2" = "drpm" ] || exit 65
case "$1" in
  --cflags) printf '%s\n' '-I/usr/include/drpm -DPROBE=1' ;;
  --libs) printf '%s\n' '-ldrpm' ;;
  *) exit 64 ;;
esac
"#,
    );
    path
}

/// Stub cc: `-c` touches the object file; linking installs a probe script
/// that prints `checkpoints`.
pub fn write_cc_stub(dir: &Path, checkpoints: &str) -> PathBuf {
    let path = dir.join("cc");
    let side = dir.display();
    let body = format!(
        r#"#!/bin/sh
printf '%s\n' "$@" >> "{side}/cc-args.log"
out=""
expect_out=0
compile_only=0
for arg in "$@"; do
  if [ "$expect_out" = 1 ]; then out="$arg"; expect_out=0; continue; fi
  case "$arg" in
    -o) expect_out=1 ;;
    -c) compile_only=1 ;;
  esac
done
[ -n "$out" ] || exit 66
if [ "$compile_only" = 1 ]; then
  : > "$out"
else
  cat > "$out" <<PROBE
#!/bin/sh
echo "\$3" > "{side}/scratch-path.txt"
printf '%s' '{checkpoints}'
PROBE
  chmod +x "$out"
fi
"#
    );
    write_script(&path, &body);
    path
}

/// Lay out a fixture directory with the two archives the probe consumes.
pub fn write_fixture_dir(root: &Path) -> PathBuf {
    let fixtures = root.join("fixtures");
    fs::create_dir(&fixtures).expect("fixtures dir");
    fs::write(fixtures.join("cmocka-old.rpm"), b"old-archive").expect("old fixture");
    fs::write(fixtures.join("cmocka-new.rpm"), b"new-archive").expect("new fixture");
    fixtures
}

/// Write a minimal probe source file.
pub fn write_probe_source(root: &Path) -> PathBuf {
    let source = root.join("examine.c");
    fs::write(&source, "int main(void) { return 0; }\n").expect("probe source");
    source
}
