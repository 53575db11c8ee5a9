use assert_cmd::Command;

const NAT: &str = r#"
static Nat : Type.
static zero : Nat.
static succ : Nat -> Nat.
def add : Nat -> Nat -> Nat.
rule add $n zero --> $n.
rule add zero $m --> $m.
rule add (succ $n) $m --> succ (add $n $m).
assert add (succ (succ zero)) (succ zero) == succ (succ (succ zero)).
eval snf (add (succ zero) (succ zero)).
"#;

#[test]
fn checks_a_module_and_prints_eval_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nat.mlo");
    std::fs::write(&path, NAT).unwrap();

    let output = Command::cargo_bin("mlo").unwrap().arg("check").arg(&path).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("succ (succ zero)"));
    assert!(stdout.contains("typechecked successfully"));
}

#[test]
fn reports_type_errors_with_a_nonzero_exit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.mlo");
    std::fs::write(&path, "static Nat : Type.\nassert Nat : Nat.\n").unwrap();

    let output = Command::cargo_bin("mlo").unwrap().arg("check").arg(&path).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("T-001"));
}

#[test]
fn emits_and_reuses_object_files() {
    let dir = tempfile::tempdir().unwrap();
    let nat = dir.path().join("nat.mlo");
    std::fs::write(&nat, NAT).unwrap();

    Command::cargo_bin("mlo")
        .unwrap()
        .args(["check", "--emit-object"])
        .arg(&nat)
        .assert()
        .success();
    assert!(dir.path().join("nat.mlo.o").exists());

    // The client resolves `require nat` against the object file once
    // the source is gone.
    std::fs::remove_file(&nat).unwrap();
    let client = dir.path().join("client.mlo");
    std::fs::write(&client, "require nat.\nassert nat.zero : nat.Nat.\n").unwrap();
    Command::cargo_bin("mlo").unwrap().arg("check").arg(&client).assert().success();

    // `clean` removes the object again.
    Command::cargo_bin("mlo").unwrap().arg("clean").arg(dir.path()).assert().success();
    assert!(!dir.path().join("nat.mlo.o").exists());
}
