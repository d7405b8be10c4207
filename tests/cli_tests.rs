mod common;

use common::TestResult;
use std::io::Write;
use std::process::{Command, Stdio};

fn mixup() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mixup"))
}

fn spec_file(contents: &str) -> Result<tempfile::NamedTempFile, std::io::Error> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

#[test]
fn renders_spec_file_to_stdout() -> TestResult {
    let file = spec_file(r##"{ "#p": ["a", { "#b": "c" }] }"##)?;
    let output = mixup().arg(file.path()).output()?;
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, "<p>a<b>c</b></p>\n");
    Ok(())
}

#[test]
fn reads_stdin_and_writes_output_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let out_path = dir.path().join("out.xml");
    let mut child = mixup()
        .args(["--fragment", "--output"])
        .arg(&out_path)
        .arg("-")
        .stdin(Stdio::piped())
        .spawn()?;
    child
        .stdin
        .take()
        .ok_or("stdin not captured")?
        .write_all(br##"["x", { "#y": null }]"##)?;
    assert!(child.wait()?.success());
    assert_eq!(std::fs::read_to_string(out_path)?, "x<y/>");
    Ok(())
}

#[test]
fn strict_flag_fails_on_unbound_prefix() -> TestResult {
    let file = spec_file(r##"{ "#q:el": null }"##)?;
    let output = mixup().arg("--strict").arg(file.path()).output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)?.contains("No namespace bound for prefix 'q'"));
    Ok(())
}
