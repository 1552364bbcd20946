//! A test suite to test the `modinfo-gen` CLI itself.
//!
//! This test suite will look for `*.wat` files in the `tests/cli/**` directory,
//! recursively. Each wat file is compiled to a `.wasm` binary in a fresh
//! temporary directory and must have a directive of the form:
//!
//!     ;; RUN: ...
//!
//! where `...` is a space-separate set of arguments to pass to the
//! `modinfo-gen` CLI. The following substitutions are made:
//!
//! * `%` - the compiled `.wasm` binary of the current file
//! * `%wat` - a copy of the current file, next to the compiled binary
//! * `%tmpdir` - the temporary directory the binary lives in
//!
//! A `;; FAIL: ...` directive is the same as `;; RUN:` except that the command
//! is expected to fail. Any number of `;; AUX: deps/name.wat` directives
//! compile auxiliary binaries into the same temporary directory as
//! `name.wasm`. Files under a `deps` directory are not tests themselves.
//!
//! The `cli` directory additionally contains `*.stdout` and `*.stderr` files
//! to assert the output of the command, and `*.json` files to assert the
//! generated `modinfo.json`. Files are not present if the output is empty or
//! no `modinfo.json` was written.
//!
//! Use `BLESS=1` in the environment to auto-update expectation files. Be sure
//! to look at the diff!

use anyhow::{anyhow, bail, Context, Result};
use libtest_mimic::{Arguments, Trial};
use pretty_assertions::StrComparison;
use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn main() {
    let mut tests = Vec::new();
    find_tests("tests/cli".as_ref(), &mut tests);
    let bless = env::var("BLESS").is_ok();

    let mut trials = Vec::new();
    for test in tests {
        let trial = Trial::test(format!("{test:?}"), move || {
            run_test(&test, bless)
                .with_context(|| format!("failed test {test:?}"))
                .map_err(|e| format!("{e:?}").into())
        })
        // This test suite can't run on wasm since it involves spawning
        // subprocesses.
        .with_ignored_flag(cfg!(target_family = "wasm"));
        trials.push(trial);
    }

    let args = Arguments::from_args();
    libtest_mimic::run(&args, trials).exit();
}

fn modinfo_gen_exe() -> Command {
    Command::new(env!("CARGO_BIN_EXE_modinfo-gen"))
}

fn run_test(test: &Path, bless: bool) -> Result<()> {
    let contents = std::fs::read_to_string(test)?;
    let (line, should_fail) = contents
        .lines()
        .filter_map(|l| {
            let run = l.strip_prefix(";; RUN: ");
            let fail = l.strip_prefix(";; FAIL: ");
            run.map(|l| (l, false)).or(fail.map(|l| (l, true)))
        })
        .next()
        .ok_or_else(|| anyhow!("no line found with `;; RUN: ` directive"))?;

    let tempdir = TempDir::new()?;
    let stem = test.file_stem().unwrap().to_str().unwrap();
    let binary = compile(test, &tempdir.path().join(format!("{stem}.wasm")))?;
    let wat = tempdir.path().join(format!("{stem}.wat"));
    std::fs::copy(test, &wat)?;

    for aux in contents.lines().filter_map(|l| l.strip_prefix(";; AUX: ")) {
        let aux = test.parent().unwrap().join(aux.trim());
        let name = aux.file_stem().unwrap().to_str().unwrap();
        compile(&aux, &tempdir.path().join(format!("{name}.wasm")))?;
    }

    let mut cmd = modinfo_gen_exe();
    for arg in line.split_whitespace() {
        if arg == "%" {
            cmd.arg(&binary);
        } else if arg == "%wat" {
            cmd.arg(&wat);
        } else if let Some(rest) = arg.strip_prefix("%tmpdir") {
            cmd.arg(format!("{}{rest}", tempdir.path().display()));
        } else {
            cmd.arg(arg);
        }
    }
    // Keep expectations independent of the environment running the tests.
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("RUST_BACKTRACE");
    cmd.env_remove("RUST_LIB_BACKTRACE");

    let output = execute(&mut cmd, should_fail)?;
    let extension = test.extension().unwrap().to_str().unwrap();
    assert_output(
        bless,
        &output.stdout,
        &test.with_extension(format!("{extension}.stdout")),
        &tempdir,
    )
    .context("failed to check stdout expectation (auto-update with BLESS=1)")?;
    assert_output(
        bless,
        &output.stderr,
        &test.with_extension(format!("{extension}.stderr")),
        &tempdir,
    )
    .context("failed to check stderr expectation (auto-update with BLESS=1)")?;

    let generated = match find_modinfo(tempdir.path())? {
        Some(path) => std::fs::read(&path)?,
        None => Vec::new(),
    };
    assert_output(
        bless,
        &generated,
        &test.with_extension(format!("{extension}.json")),
        &tempdir,
    )
    .context("failed to check modinfo.json expectation (auto-update with BLESS=1)")?;
    Ok(())
}

fn compile(wat: &Path, dst: &Path) -> Result<PathBuf> {
    let wasm = wat::parse_file(wat).with_context(|| format!("failed to compile {wat:?}"))?;
    std::fs::write(dst, wasm)?;
    Ok(dst.to_owned())
}

fn find_modinfo(dir: &Path) -> Result<Option<PathBuf>> {
    for entry in dir.read_dir()? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            if let Some(found) = find_modinfo(&path)? {
                return Ok(Some(found));
            }
        } else if path.file_name().and_then(|s| s.to_str()) == Some("modinfo.json") {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

fn execute(cmd: &mut Command, should_fail: bool) -> Result<Output> {
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    let output = cmd
        .output()
        .with_context(|| format!("failed to spawn {cmd:?}"))?;

    if !output.status.success() {
        if !should_fail {
            bail!(
                "{cmd:?} failed:
                status: {}
                stdout: {}
                stderr: {}",
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
    } else if should_fail {
        bail!(
            "{cmd:?} succeeded instead of failed
                stdout: {}
                stderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(output)
}

fn assert_output(bless: bool, output: &[u8], path: &Path, tempdir: &TempDir) -> Result<()> {
    let tempdir = tempdir.path().to_str().unwrap();
    // sanitize the output to be consistent across platforms and handle per-test
    // differences such as `%tmpdir`.
    let output = String::from_utf8_lossy(output)
        .replace(tempdir, "%tmpdir")
        .replace("\\\\", "/")
        .replace('\\', "/");

    if bless {
        if output.is_empty() {
            drop(std::fs::remove_file(path));
        } else {
            std::fs::write(path, output).with_context(|| format!("failed to write {path:?}"))?;
        }
        return Ok(());
    }

    if output.is_empty() {
        if path.exists() {
            bail!("command had no output but {path:?} exists");
        } else {
            Ok(())
        }
    } else {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {path:?}"))?
            .replace("\r\n", "\n");
        if output != contents {
            bail!(
                "failed test: result is not as expected:{}",
                StrComparison::new(&contents, &output),
            );
        }
        Ok(())
    }
}

fn find_tests(path: &Path, tests: &mut Vec<PathBuf>) {
    for f in path.read_dir().unwrap() {
        let f = f.unwrap();
        if f.file_type().unwrap().is_dir() {
            if f.file_name() != "deps" {
                find_tests(&f.path(), tests);
            }
            continue;
        }
        match f.path().extension().and_then(|s| s.to_str()) {
            Some("wat") => {}
            _ => continue,
        }
        tests.push(f.path());
    }
}
