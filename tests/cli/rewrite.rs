use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::CliTest;

const HANDLER_GO: &str = r#"package main

func handle(userID string, n int) {
	pkg.InfoWithFields(map[string]interface{}{"user": userID, "count": n}, "processed batch")
}
"#;

const HANDLER_GO_REWRITTEN: &str = r#"package main

func handle(userID string, n int) {
	pkg.Infof("processed batch: user=%s, count=%s", userID, n)
}
"#;

const SERVICE_GO: &str = r#"package service

func (s *Service) Load(id string, state int) error {
	s.logger.WithFields(fields.Fields{
		"id":    id,
		"state": state,
	}).Error("failed")
	return nil
}
"#;

const SERVICE_GO_REWRITTEN: &str = r#"package service

func (s *Service) Load(id string, state int) error {
	s.logger.Errorf("failed: id=%s, state=%s", id, state)
	return nil
}
"#;

// ============================================================
// Dry run
// ============================================================

#[test]
fn test_dry_run_previews_without_writing() -> Result<()> {
    let test = CliTest::with_file("handler.go", HANDLER_GO)?;
    test.write_file("service.go", SERVICE_GO)?;

    assert_cmd_snapshot!(test.rewrite_command(), @r#"
    success: false
    exit_code: 1
    ----- stdout -----
    rewrite: Infof  package-functions
      --> handler.go:4:2
        |
      4 | 	pkg.InfoWithFields(map[string]interface{}{"user": userID, "count": n}, "processed batch")
        | 	^
        - pkg.InfoWithFields(map[string]interface{}{"user": userID, "count": n}, "processed batch")
        + pkg.Infof("processed batch: user=%s, count=%s", userID, n)

    rewrite: Errorf  service-logger
      --> service.go:4:2
        |
      4 | 	s.logger.WithFields(fields.Fields{
        | 	^
        - s.logger.WithFields(fields.Fields{
        - 		"id":    id,
        - 		"state": state,
        - 	}).Error("failed")
        + s.logger.Errorf("failed: id=%s, state=%s", id, state)

    ✓ handler.go: would rewrite 1 call(s)
    ✓ service.go: would rewrite 1 call(s)
    ✓ package-functions: 1 call(s) to rewrite
    ✓ service-logger: 1 call(s) to rewrite
    ✓ manager-logger: 0 call(s) to rewrite
    Would rewrite 2 call(s) in 2 file(s).
    Run with --apply to write these changes.

    ----- stderr -----
    "#);

    assert_eq!(test.read_file("handler.go")?, HANDLER_GO);
    assert_eq!(test.read_file("service.go")?, SERVICE_GO);

    Ok(())
}

#[test]
fn test_nothing_to_rewrite() -> Result<()> {
    let test = CliTest::with_file("main.go", "package main\n\nfunc main() {}\n")?;

    assert_cmd_snapshot!(test.rewrite_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ package-functions: 0 call(s) to rewrite
    ✓ service-logger: 0 call(s) to rewrite
    ✓ manager-logger: 0 call(s) to rewrite
    ✓ Scanned 1 file - no calls to rewrite

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_verbose_lists_unchanged_files() -> Result<()> {
    let test = CliTest::with_file("main.go", "package main\n")?;

    let mut cmd = test.rewrite_command();
    cmd.arg("-v");
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
      no matches: main.go
    ✓ package-functions: 0 call(s) to rewrite
    ✓ service-logger: 0 call(s) to rewrite
    ✓ manager-logger: 0 call(s) to rewrite
    ✓ Scanned 1 file - no calls to rewrite

    ----- stderr -----
    Note: No .logfixrc.json found, using default configuration
    ");

    Ok(())
}

#[test]
fn test_verbose_names_config_file() -> Result<()> {
    let test = CliTest::with_file(".logfixrc.json", r#"{ "recursive": true }"#)?;
    test.write_file("cmd/main.go", "package main\n")?;

    let mut cmd = test.rewrite_command();
    cmd.arg("-v");
    insta::with_settings!({filters => test.filters()}, {
        assert_cmd_snapshot!(cmd, @r"
        success: true
        exit_code: 0
        ----- stdout -----
          no matches: cmd/main.go
        ✓ package-functions: 0 call(s) to rewrite
        ✓ service-logger: 0 call(s) to rewrite
        ✓ manager-logger: 0 call(s) to rewrite
        ✓ Scanned 1 file - no calls to rewrite

        ----- stderr -----
        Note: using configuration from [PROJECT]/.logfixrc.json
        ");
    });

    Ok(())
}

// ============================================================
// Apply
// ============================================================

#[test]
fn test_apply_rewrites_files() -> Result<()> {
    let test = CliTest::with_file("handler.go", HANDLER_GO)?;
    test.write_file("service.go", SERVICE_GO)?;

    let mut cmd = test.rewrite_command();
    cmd.arg("--apply");
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ handler.go: rewrote 1 call(s)
    ✓ service.go: rewrote 1 call(s)
    ✓ package-functions: 1 call(s) rewritten
    ✓ service-logger: 1 call(s) rewritten
    ✓ manager-logger: 0 call(s) rewritten
    Rewrote 2 call(s) in 2 file(s).

    ----- stderr -----
    ");

    assert_eq!(test.read_file("handler.go")?, HANDLER_GO_REWRITTEN);
    assert_eq!(test.read_file("service.go")?, SERVICE_GO_REWRITTEN);

    Ok(())
}

#[test]
fn test_apply_twice_is_idempotent() -> Result<()> {
    let test = CliTest::with_file("service.go", SERVICE_GO)?;

    let mut cmd = test.rewrite_command();
    cmd.arg("--apply");
    cmd.output()?;
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ package-functions: 0 call(s) rewritten
    ✓ service-logger: 0 call(s) rewritten
    ✓ manager-logger: 0 call(s) rewritten
    ✓ Scanned 1 file - no calls to rewrite

    ----- stderr -----
    ");

    assert_eq!(test.read_file("service.go")?, SERVICE_GO_REWRITTEN);

    Ok(())
}

#[test]
fn test_apply_leaves_unchanged_files_alone() -> Result<()> {
    let untouched = "package other\n\n// pkg.InfoWithFields is mentioned here\n";
    let test = CliTest::with_file("handler.go", HANDLER_GO)?;
    test.write_file("other.go", untouched)?;

    let mut cmd = test.rewrite_command();
    cmd.arg("--apply");
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ handler.go: rewrote 1 call(s)
    ✓ package-functions: 1 call(s) rewritten
    ✓ service-logger: 0 call(s) rewritten
    ✓ manager-logger: 0 call(s) rewritten
    Rewrote 1 call(s) in 1 file(s).

    ----- stderr -----
    ");

    assert_eq!(test.read_file("other.go")?, untouched);

    Ok(())
}

// ============================================================
// Targets
// ============================================================

#[test]
fn test_missing_target_is_reported_and_batch_continues() -> Result<()> {
    let test = CliTest::with_file("handler.go", HANDLER_GO)?;

    let mut cmd = test.rewrite_command();
    cmd.args(["missing.go", "handler.go", "--apply"]);
    insta::with_settings!({filters => test.filters()}, {
        assert_cmd_snapshot!(cmd, @r"
        success: false
        exit_code: 2
        ----- stdout -----
        ✓ handler.go: rewrote 1 call(s)
        ✓ package-functions: 1 call(s) rewritten
        ✓ service-logger: 0 call(s) rewritten
        ✓ manager-logger: 0 call(s) rewritten
        Rewrote 1 call(s) in 1 file(s).
        ✘ 1 file(s) could not be processed.

        ----- stderr -----
        ✘ missing.go (not found): No such file or directory
        ");
    });

    assert_eq!(test.read_file("handler.go")?, HANDLER_GO_REWRITTEN);

    Ok(())
}

#[test]
fn test_only_missing_targets_claims_no_success() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.rewrite_command();
    cmd.args(["missing.go", "gone"]);
    insta::with_settings!({filters => test.filters()}, {
        assert_cmd_snapshot!(cmd, @r"
        success: false
        exit_code: 2
        ----- stdout -----
        ✓ package-functions: 0 call(s) to rewrite
        ✓ service-logger: 0 call(s) to rewrite
        ✓ manager-logger: 0 call(s) to rewrite
        ✘ 2 file(s) could not be processed.

        ----- stderr -----
        ✘ missing.go (not found): No such file or directory
        ✘ gone (not found): No such file or directory
        ");
    });

    Ok(())
}

#[test]
fn test_glob_target_expands_to_matching_files() -> Result<()> {
    let test = CliTest::with_file("backend/database/mysql.go", HANDLER_GO)?;
    test.write_file("backend/database/redis.go", SERVICE_GO)?;
    test.write_file("backend/database/schema.sql", HANDLER_GO)?;
    test.write_file("backend/api.go", HANDLER_GO)?;

    // Passed without a shell, so the pattern reaches logfix unexpanded
    let mut cmd = test.rewrite_command();
    cmd.args(["backend/database/*.go", "--apply"]);
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ backend/database/mysql.go: rewrote 1 call(s)
    ✓ backend/database/redis.go: rewrote 1 call(s)
    ✓ package-functions: 1 call(s) rewritten
    ✓ service-logger: 1 call(s) rewritten
    ✓ manager-logger: 0 call(s) rewritten
    Rewrote 2 call(s) in 2 file(s).

    ----- stderr -----
    ");

    assert_eq!(test.read_file("backend/database/mysql.go")?, HANDLER_GO_REWRITTEN);
    assert_eq!(test.read_file("backend/database/redis.go")?, SERVICE_GO_REWRITTEN);
    assert_eq!(test.read_file("backend/database/schema.sql")?, HANDLER_GO);
    assert_eq!(test.read_file("backend/api.go")?, HANDLER_GO);

    Ok(())
}

#[test]
fn test_glob_target_without_matches_is_missing() -> Result<()> {
    let test = CliTest::with_file("handler.go", HANDLER_GO)?;

    let mut cmd = test.rewrite_command();
    cmd.args(["cache/*.go", "--apply"]);
    insta::with_settings!({filters => test.filters()}, {
        assert_cmd_snapshot!(cmd, @r"
        success: false
        exit_code: 2
        ----- stdout -----
        ✓ package-functions: 0 call(s) rewritten
        ✓ service-logger: 0 call(s) rewritten
        ✓ manager-logger: 0 call(s) rewritten
        ✘ 1 file(s) could not be processed.

        ----- stderr -----
        ✘ cache/*.go (not found): No such file or directory
        ");
    });

    assert_eq!(test.read_file("handler.go")?, HANDLER_GO);

    Ok(())
}

#[test]
fn test_directories_are_not_recursive_by_default() -> Result<()> {
    let test = CliTest::with_file("nested/handler.go", HANDLER_GO)?;

    let mut cmd = test.rewrite_command();
    cmd.arg("--apply");
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ package-functions: 0 call(s) rewritten
    ✓ service-logger: 0 call(s) rewritten
    ✓ manager-logger: 0 call(s) rewritten
    ✓ Scanned 0 files - no calls to rewrite

    ----- stderr -----
    ");
    assert_eq!(test.read_file("nested/handler.go")?, HANDLER_GO);

    cmd.arg("--recursive");
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ nested/handler.go: rewrote 1 call(s)
    ✓ package-functions: 1 call(s) rewritten
    ✓ service-logger: 0 call(s) rewritten
    ✓ manager-logger: 0 call(s) rewritten
    Rewrote 1 call(s) in 1 file(s).

    ----- stderr -----
    ");
    assert_eq!(test.read_file("nested/handler.go")?, HANDLER_GO_REWRITTEN);

    Ok(())
}

#[test]
fn test_extension_filter() -> Result<()> {
    let test = CliTest::with_file("handler.go.txt", HANDLER_GO)?;

    assert_cmd_snapshot!(test.rewrite_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ package-functions: 0 call(s) to rewrite
    ✓ service-logger: 0 call(s) to rewrite
    ✓ manager-logger: 0 call(s) to rewrite
    ✓ Scanned 0 files - no calls to rewrite

    ----- stderr -----
    ");

    let mut cmd = test.rewrite_command();
    cmd.args(["--ext", "txt", "--apply"]);
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ handler.go.txt: rewrote 1 call(s)
    ✓ package-functions: 1 call(s) rewritten
    ✓ service-logger: 0 call(s) rewritten
    ✓ manager-logger: 0 call(s) rewritten
    Rewrote 1 call(s) in 1 file(s).

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_explicit_file_ignores_extension_filter() -> Result<()> {
    let test = CliTest::with_file("handler.tmpl", HANDLER_GO)?;

    let mut cmd = test.rewrite_command();
    cmd.args(["handler.tmpl", "--apply"]);
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ handler.tmpl: rewrote 1 call(s)
    ✓ package-functions: 1 call(s) rewritten
    ✓ service-logger: 0 call(s) rewritten
    ✓ manager-logger: 0 call(s) rewritten
    Rewrote 1 call(s) in 1 file(s).

    ----- stderr -----
    ");

    assert_eq!(test.read_file("handler.tmpl")?, HANDLER_GO_REWRITTEN);

    Ok(())
}

// ============================================================
// Skipped call sites
// ============================================================

#[test]
fn test_skipped_site_is_warned_and_left_unchanged() -> Result<()> {
    let source = concat!(
        "package main\n",
        "\n",
        "func f() {\n",
        "\ts.logger.WithFields(logrus.Fields{\n",
        "\t\t\"a\": a, // keep me\n",
        "\t}).Info(\"m\")\n",
        "}\n",
    );
    let test = CliTest::with_file("main.go", source)?;

    let mut cmd = test.rewrite_command();
    cmd.arg("--apply");
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ package-functions: 0 call(s) rewritten
    ✓ service-logger: 0 call(s) rewritten
    ✓ manager-logger: 0 call(s) rewritten
    ✓ Scanned 1 file - no calls to rewrite
    Note: 1 call site(s) left unchanged (see warnings).

    ----- stderr -----
    warning: call site left unchanged  service-logger
      --> main.go:4:2
        |
      4 | 	s.logger.WithFields(logrus.Fields{
        | 	^
        = reason: field map: comment inside field map
    ");

    assert_eq!(test.read_file("main.go")?, source);

    Ok(())
}

#[test]
fn test_legacy_scan_mode_skips_nested_values() -> Result<()> {
    let source = "utils.ErrorWithFields(map[string]interface{}{\"err\": fmt.Sprint(a, b)}, \"boom\")\n";
    let test = CliTest::with_file("main.go", source)?;

    let mut cmd = test.rewrite_command();
    cmd.args(["--scan-mode", "legacy", "--apply"]);
    assert_cmd_snapshot!(cmd, @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ package-functions: 0 call(s) rewritten
    ✓ service-logger: 0 call(s) rewritten
    ✓ manager-logger: 0 call(s) rewritten
    ✓ Scanned 1 file - no calls to rewrite
    Note: 1 call site(s) left unchanged (see warnings).

    ----- stderr -----
    warning: call site left unchanged  package-functions
      --> main.go:1:1
        |
      1 | utils.ErrorWithFields(map[string]interface{}{"err": fmt.Sprint(a, b)}, "boom")
        | ^
        = reason: field map: value for key "err" was cut at a nested brace or comma
    "#);
    assert_eq!(test.read_file("main.go")?, source);

    let mut cmd = test.rewrite_command();
    cmd.arg("--apply");
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ main.go: rewrote 1 call(s)
    ✓ package-functions: 1 call(s) rewritten
    ✓ service-logger: 0 call(s) rewritten
    ✓ manager-logger: 0 call(s) rewritten
    Rewrote 1 call(s) in 1 file(s).

    ----- stderr -----
    ");
    assert_eq!(
        test.read_file("main.go")?,
        "utils.Errorf(\"boom: err=%s\", fmt.Sprint(a, b))\n"
    );

    Ok(())
}

// ============================================================
// Configuration
// ============================================================

#[test]
fn test_config_custom_idiom() -> Result<()> {
    let test = CliTest::with_file(
        ".logfixrc.json",
        r#"{
  "idioms": [
    {
      "name": "app-logger",
      "shape": "receiver",
      "qualifier": "app.log",
      "mapTypes": ["log.Fields"],
      "levels": ["Info"]
    }
  ]
}"#,
    )?;
    test.write_file(
        "main.go",
        concat!(
            "app.log.WithFields(log.Fields{\"k\": v}).Info(\"m\")\n",
            "s.logger.WithFields(logrus.Fields{\"k\": v}).Info(\"m\")\n",
        ),
    )?;

    let mut cmd = test.rewrite_command();
    cmd.arg("--apply");
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ main.go: rewrote 1 call(s)
    ✓ app-logger: 1 call(s) rewritten
    Rewrote 1 call(s) in 1 file(s).

    ----- stderr -----
    ");

    assert_eq!(
        test.read_file("main.go")?,
        concat!(
            "app.log.Infof(\"m: k=%s\", v)\n",
            "s.logger.WithFields(logrus.Fields{\"k\": v}).Info(\"m\")\n",
        )
    );

    Ok(())
}

#[test]
fn test_config_includes_and_ignores() -> Result<()> {
    let test = CliTest::with_file(
        ".logfixrc.json",
        r#"{
  "includes": ["backend"],
  "ignores": ["backend/generated/*.go", "backend/vendor"],
  "recursive": true
}"#,
    )?;
    test.write_file("backend/db/handler.go", HANDLER_GO)?;
    test.write_file("backend/generated/handler.go", HANDLER_GO)?;
    test.write_file("backend/vendor/lib/handler.go", HANDLER_GO)?;
    test.write_file("frontend/handler.go", HANDLER_GO)?;

    let mut cmd = test.rewrite_command();
    cmd.arg("--apply");
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ backend/db/handler.go: rewrote 1 call(s)
    ✓ package-functions: 1 call(s) rewritten
    ✓ service-logger: 0 call(s) rewritten
    ✓ manager-logger: 0 call(s) rewritten
    Rewrote 1 call(s) in 1 file(s).

    ----- stderr -----
    ");

    assert_eq!(test.read_file("backend/db/handler.go")?, HANDLER_GO_REWRITTEN);
    assert_eq!(test.read_file("backend/generated/handler.go")?, HANDLER_GO);
    assert_eq!(test.read_file("backend/vendor/lib/handler.go")?, HANDLER_GO);
    assert_eq!(test.read_file("frontend/handler.go")?, HANDLER_GO);

    Ok(())
}

#[test]
fn test_invalid_config_is_fatal() -> Result<()> {
    let test = CliTest::with_file(".logfixrc.json", r#"{ "extensions": [] }"#)?;
    test.write_file("handler.go", HANDLER_GO)?;

    assert_cmd_snapshot!(test.rewrite_command(), @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    Error: 'extensions' must list at least one file extension
    ");

    assert_eq!(test.read_file("handler.go")?, HANDLER_GO);

    Ok(())
}
