// Integration tests for classdoc

use assert_cmd::Command;
use classdoc::config::Substitution;
use classdoc::site::SiteGenerator;
use classdoc::{Config, DocumentGenerator, Error, Introspector, SourceRegistry};
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

fn fixtures_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn library_root() -> PathBuf {
    fixtures_path("library/ManaPHP")
}

fn config_for(root: &Path, output: &Path) -> Config {
    let mut config = Config::default();
    config.source.root = root.to_path_buf();
    config.output.directory = output.to_path_buf();
    config
}

fn generate(config: Config) -> classdoc::Result<classdoc::GenerationReport> {
    let mut registry = SourceRegistry::from_config(&config.source)?;
    DocumentGenerator::new(config).run(&mut registry)
}

/// Copy the fixture library so a test can add files to it
fn copy_library(dest: &Path) -> PathBuf {
    let src = library_root();
    let root = dest.join("ManaPHP");
    for entry in WalkDir::new(&src) {
        let entry = entry.unwrap();
        let target = root.join(entry.path().strip_prefix(&src).unwrap());
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).unwrap();
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
    root
}

fn read(path: PathBuf) -> String {
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e))
}

// ============================================================================
// Registry Tests
// ============================================================================

#[test]
fn test_enumerate_fixture_classes() {
    let mut registry = SourceRegistry::new("ManaPHP", "php").unwrap();
    let files = registry.discover(&library_root()).unwrap();
    assert_eq!(files.len(), 8);
    registry.load(&files).unwrap();

    assert_eq!(
        registry.enumerate_target_classes(),
        vec![
            "ManaPHP\\Component",
            "ManaPHP\\ComponentInterface",
            "ManaPHP\\Db",
            "ManaPHP\\DbInterface",
            "ManaPHP\\Db\\Exception",
            "ManaPHP\\Exception",
            "ManaPHP\\Helper\\Str",
        ]
    );
}

#[test]
fn test_fixture_metadata_includes_inherited_members() {
    let mut registry = SourceRegistry::new("ManaPHP", "php").unwrap();
    let files = registry.discover(&library_root()).unwrap();
    registry.load(&files).unwrap();

    let db = registry.class_metadata("ManaPHP\\Db").unwrap();
    let names: Vec<&str> = db.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["query", "jsonSerialize", "attachEvent", "fireEvent", "getShared"]
    );
    assert_eq!(db.methods[4].declaring_class, "ManaPHP\\Component");
    assert_eq!(
        db.interfaces,
        vec!["JsonSerializable", "ManaPHP\\ComponentInterface", "ManaPHP\\DbInterface"]
    );
}

#[test]
fn test_syntax_error_fails_load() {
    let dir = TempDir::new().unwrap();
    let root = copy_library(dir.path());
    fs::write(
        root.join("Broken.php"),
        "<?php\nnamespace ManaPHP;\nclass Broken {\n    public function run( {\n",
    )
    .unwrap();

    let result = generate(config_for(&root, &dir.path().join("api")));
    match result {
        Err(Error::Registry { files }) => {
            assert_eq!(files.len(), 1);
            assert!(files[0].ends_with("ManaPHP/Broken.php"));
        }
        other => panic!("expected registry error, got {:?}", other.map(|r| r.summary())),
    }
    assert!(!dir.path().join("api").exists());
}

// ============================================================================
// Generation Tests
// ============================================================================

#[test]
fn test_generate_fixture_library() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("api");

    let report = generate(config_for(&library_root(), &output)).unwrap();
    assert_eq!(report.classes, 7);
    assert_eq!(report.files_written.len(), 7);
    assert!(output.join("en/ManaPHP_Helper_Str.rst").exists());
    assert!(!output.join("en/ManaPHP_Di_InjectableTrait.rst").exists());
}

#[test]
fn test_class_page_layout() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("api");
    generate(config_for(&library_root(), &output)).unwrap();

    let db = read(output.join("en/ManaPHP_Db.rst"));
    let expected_head = "Class **ManaPHP\\\\Db**\n\
                         =====================\n\n\
                         *extends* abstract class :doc:`ManaPHP\\\\Component <ManaPHP_Component>`\n\n\
                         *implements* JsonSerializable, :doc:`ManaPHP\\\\ComponentInterface <ManaPHP_ComponentInterface>`, \
                         :doc:`ManaPHP\\\\DbInterface <ManaPHP_DbInterface>`\n\n\
                         .. role:: raw-html(raw)\n   :format: html\n\n\
                         :raw-html:`<a href=\"https://github.com/manaphp/manaphp/blob/master/ManaPHP/Db.php\" class=\"btn btn-default btn-sm\">Source on GitHub</a>`\n\n\
                         Class Db\n\n\
                         Runs SQL statements against a PDO connection.\n\n";
    assert!(db.starts_with(expected_head), "unexpected page head:\n{}", db);

    assert!(db.contains(".. code-block:: php\n\n    <?php\n\n      $rows = $db->query('SELECT * FROM city');\n"));
    assert!(db.contains(
        "public array **query** (*string* $sql, *array* $bind = [], *int* $fetchMode = \\PDO::FETCH_ASSOC)\n\n\
         Executes a query and returns all rows\n\n"
    ));
    assert!(db.contains(
        "public static **attachEvent** (*string* $event, *callable* $handler, *int* $priority = self::EVENT_PRIORITY)"
    ));
    assert!(db.contains("protected bool **fireEvent** (*string* $event, *bool* $stopOnFirst = true)"));
}

#[test]
fn test_interface_and_final_pages() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("api");
    generate(config_for(&library_root(), &output)).unwrap();

    let iface = read(output.join("en/ManaPHP_DbInterface.rst"));
    assert!(iface.starts_with("Interface **ManaPHP\\\\DbInterface**\n"));
    assert!(iface.contains("abstract public array **query**"));

    let str_page = read(output.join("en/ManaPHP_Helper_Str.rst"));
    assert!(str_page.starts_with("Final class **ManaPHP\\\\Helper\\\\Str**\n"));
    assert!(str_page.contains(
        "public static bool **startsWith** (*string* $str, *string* $prefix, *bool* $ignoreCase = false)"
    ));
    assert!(str_page.contains("public static string **underscore** (*string* $str, *string* $separator = '_')"));
}

#[test]
fn test_external_parent_page() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("api");
    generate(config_for(&library_root(), &output)).unwrap();

    let exception = read(output.join("en/ManaPHP_Exception.rst"));
    assert!(exception.contains("*extends* Exception\n\n"));
    assert!(!exception.contains("Methods"));

    let db_exception = read(output.join("en/ManaPHP_Db_Exception.rst"));
    assert!(db_exception.contains("*extends* class :doc:`ManaPHP\\\\Exception <ManaPHP_Exception>`"));
}

#[test]
fn test_substitution_completeness() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("api");
    let mut config = config_for(&library_root(), &output);
    config.output.languages = vec!["en".to_string(), "zh".to_string()];
    config.substitutions = vec![Substitution::new("ManaPHP", "Acme")];

    let report = generate(config).unwrap();
    assert_eq!(report.files_written.len(), 14);

    for path in &report.files_written {
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("Acme_"), "unsubstituted path: {}", path.display());

        let contents = read(path.clone());
        assert!(!contents.contains("ManaPHP"), "unsubstituted content in {}", name);
    }

    let db = read(output.join("zh/Acme_Db.rst"));
    assert!(db.starts_with("Class **Acme\\\\Db**\n"));
    assert!(db.contains("blob/master/Acme/Db.php"));
}

#[test]
fn test_convention_gate_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let root = copy_library(dir.path());
    fs::write(
        root.join("Helper/Arr.php"),
        "<?php\nnamespace ManaPHP\\Helper;\n\nclass Arrays\n{\n}\n",
    )
    .unwrap();

    let output = dir.path().join("api");
    match generate(config_for(&root, &output)) {
        Err(Error::ConventionViolation { classes }) => {
            assert_eq!(classes, vec!["ManaPHP\\Helper\\Arrays".to_string()]);
        }
        other => panic!("expected convention violation, got {:?}", other.map(|r| r.summary())),
    }
    assert!(!output.exists());
}

#[test]
fn test_regeneration_is_stable() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("api");

    generate(config_for(&library_root(), &output)).unwrap();
    let first = read(output.join("en/ManaPHP_Component.rst"));
    generate(config_for(&library_root(), &output)).unwrap();
    let second = read(output.join("en/ManaPHP_Component.rst"));
    assert_eq!(first, second);
}

// ============================================================================
// Site Tests
// ============================================================================

#[test]
fn test_site_generation() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.site.theme_dir = fixtures_path("site/theme");
    config.site.sources_dir = fixtures_path("site/sources");
    config.site.output_dir = dir.path().join("public");
    config.site.chapter_title = "{title} | ManaPHP".to_string();

    let report = SiteGenerator::new(config.site.clone()).generate().unwrap();
    assert_eq!(report.chapters, 2);

    let public = dir.path().join("public");
    assert!(public.join("css/docs.css").exists());
    assert!(public.join("router.png").exists());

    let index = read(public.join("index.html"));
    assert!(index.contains("<a href=\"/01-installation.html\">Installation</a>"));
    assert!(index.contains("<a href=\"/02-routing.html\">Routing</a>"));

    let routing = read(public.join("02-routing.html"));
    assert!(routing.contains("<title>Routing | ManaPHP</title>"));
    assert!(routing.contains("<a href=\"/02-routing.html\" class=\"active\">Routing</a>"));
    assert!(routing.contains("<a href=\"/02-routing.html#Route-Groups\">Route Groups</a>"));
    assert!(routing.contains("<h2>Route Groups</h2>"));
}

// ============================================================================
// CLI Tests
// ============================================================================

fn classdoc(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("classdoc").unwrap();
    cmd.current_dir(cwd);
    cmd
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    classdoc(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("classdoc "));
}

#[test]
fn test_cli_api() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("api");

    classdoc(dir.path())
        .arg("api")
        .arg(library_root())
        .arg("--output")
        .arg(&output)
        .args(["--lang", "en", "--lang", "zh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 14 files (7 classes, 2 languages)"));

    assert!(output.join("zh/ManaPHP_Db.rst").exists());
}

#[test]
fn test_cli_api_with_config() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("api");

    classdoc(dir.path())
        .arg("api")
        .arg(library_root())
        .arg("--config")
        .arg(fixtures_path("classdoc.toml"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert!(output.join("en/Acme_Db.rst").exists());
    assert!(output.join("zh/Acme_Helper_Str.rst").exists());
}

#[test]
fn test_cli_check_lists_classes() {
    let dir = TempDir::new().unwrap();
    classdoc(dir.path())
        .arg("check")
        .arg(library_root())
        .assert()
        .success()
        .stdout(predicate::str::contains("ManaPHP\\Helper\\Str"))
        .stdout(predicate::str::contains("7 classes in 8 files"));
}

#[test]
fn test_cli_check_reports_violations() {
    let dir = TempDir::new().unwrap();
    let root = copy_library(dir.path());
    fs::write(root.join("Misc.php"), "<?php\nnamespace ManaPHP;\nclass Other {}\n").unwrap();

    classdoc(dir.path())
        .arg("check")
        .arg(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("one-class-per-file"))
        .stderr(predicate::str::contains("ManaPHP\\Other"));
}

#[test]
fn test_cli_missing_library() {
    let dir = TempDir::new().unwrap();
    classdoc(dir.path())
        .args(["api", "/nonexistent/ManaPHP"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: Path not found"));
}

#[test]
fn test_cli_missing_config() {
    let dir = TempDir::new().unwrap();
    classdoc(dir.path())
        .args(["site", "--config", "missing.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.toml"));
}
