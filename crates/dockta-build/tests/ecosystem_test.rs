use dockta_build::dockerfile::GenerateError;
use dockta_build::ecosystem::select;
use dockta_build::fs::{FsError, ProjectFs};
use dockta_build::{BaseImage, CopyPair, Ecosystem, JavascriptEcosystem, PythonEcosystem};
use dockta_core::{SoftwareEnvironment, SoftwarePackage};
use mockall::mock;

mock! {
    Fs {}

    impl ProjectFs for Fs {
        fn exists(&self, path: &str) -> bool;
        fn glob(&self, pattern: &str) -> Result<Vec<String>, FsError>;
        fn write(&self, path: &str, content: &str) -> Result<(), FsError>;
    }
}

fn environ(packages: Vec<SoftwarePackage>) -> SoftwareEnvironment {
    SoftwareEnvironment {
        name: None,
        software_requirements: packages,
    }
}

fn files(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_owned()).collect()
}

// ── Python ──

#[test]
fn python_applies_when_requirements_exist() {
    let env = SoftwareEnvironment::default();
    let python = PythonEcosystem::new(&env, 3);

    let mut fs = MockFs::new();
    fs.expect_exists()
        .returning(|path| path == "requirements.txt");

    assert!(python.applies(&fs));
}

#[test]
fn python_needs_requirements_file_even_with_descriptor_packages() {
    let env = environ(vec![SoftwarePackage::new("numpy", "==1.2", "Python")]);
    let python = PythonEcosystem::new(&env, 3);

    let mut fs = MockFs::new();
    fs.expect_exists().returning(|_| false);

    assert!(!python.applies(&fs));
}

#[test]
fn python_does_not_apply_to_empty_project() {
    let env = environ(vec![SoftwarePackage::new("lodash", "", "JavaScript")]);
    let python = PythonEcosystem::new(&env, 3);

    let mut fs = MockFs::new();
    fs.expect_exists().returning(|_| false);

    assert!(!python.applies(&fs));
}

#[test]
fn python_synthesizes_requirements_from_descriptor() {
    let env = environ(vec![SoftwarePackage::new("numpy", "==1.2", "Python")]);
    let python = PythonEcosystem::new(&env, 3);

    let mut fs = MockFs::new();
    fs.expect_exists().returning(|_| false);
    fs.expect_write()
        .withf(|path, content| path == ".requirements.txt" && content == "numpy==1.2")
        .times(1)
        .returning(|_, _| Ok(()));

    let install_files = python.install_files(&fs).unwrap();
    assert_eq!(
        install_files,
        vec![CopyPair::new(".requirements.txt", "requirements.txt")]
    );
    assert_eq!(
        python.install_command(&BaseImage::default()).as_deref(),
        Some("pip3 install --user --requirement requirements.txt")
    );
}

#[test]
fn python_generated_requirements_keep_descriptor_order() {
    let env = environ(vec![
        SoftwarePackage::new("scipy", ">=1.0", "Python"),
        SoftwarePackage::new("lodash", "", "JavaScript"),
        SoftwarePackage::new("numpy", "", "Python"),
    ]);
    let python = PythonEcosystem::new(&env, 3);

    assert_eq!(python.requirements_content(), "scipy>=1.0\nnumpy");
}

#[test]
fn python_descriptor_wins_over_existing_requirements() {
    let env = environ(vec![SoftwarePackage::new("numpy", "==1.2", "Python")]);
    let python = PythonEcosystem::new(&env, 3);

    let mut fs = MockFs::new();
    fs.expect_exists().returning(|_| true);
    fs.expect_write().times(1).returning(|_, _| Ok(()));

    let install_files = python.install_files(&fs).unwrap();
    assert_eq!(install_files[0].src, ".requirements.txt");
}

#[test]
fn python_reuses_existing_requirements() {
    let env = SoftwareEnvironment::default();
    let python = PythonEcosystem::new(&env, 3);

    let mut fs = MockFs::new();
    fs.expect_exists()
        .returning(|path| path == "requirements.txt");
    fs.expect_write().never();

    let install_files = python.install_files(&fs).unwrap();
    assert_eq!(install_files, vec![CopyPair::same("requirements.txt")]);
}

#[test]
fn python_no_install_files_without_requirements() {
    let env = SoftwareEnvironment::default();
    let python = PythonEcosystem::new(&env, 3);

    let mut fs = MockFs::new();
    fs.expect_exists().returning(|_| false);
    fs.expect_write().never();

    assert!(python.install_files(&fs).unwrap().is_empty());
}

#[test]
fn python_write_failure_propagates() {
    let env = environ(vec![SoftwarePackage::new("numpy", "", "Python")]);
    let python = PythonEcosystem::new(&env, 3);

    let mut fs = MockFs::new();
    fs.expect_write().returning(|path, _| {
        Err(FsError::Write {
            path: path.into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    });

    let err = python.install_files(&fs).unwrap_err();
    assert!(matches!(err, GenerateError::Fs(FsError::Write { .. })));
}

#[test]
fn python_two_uses_unsuffixed_commands() {
    let env = SoftwareEnvironment::default();
    let python = PythonEcosystem::new(&env, 2);
    let base = BaseImage::default();

    assert_eq!(python.version_suffix(), "");
    assert_eq!(python.apt_packages(&base), vec!["python", "python-pip"]);
    assert_eq!(
        python.install_command(&base).as_deref(),
        Some("pip install --user --requirement requirements.txt")
    );
}

#[test]
fn python_three_system_packages() {
    let env = SoftwareEnvironment::default();
    let python = PythonEcosystem::new(&env, 3);
    let base = BaseImage::default();

    assert_eq!(python.apt_packages(&base), vec!["python3", "python3-pip"]);
    assert!(python.apt_keys_command(&base).is_none());
    assert!(python.apt_repos(&base).unwrap().is_empty());
    assert!(python.env_vars(&base).is_empty());
    assert!(python.runtime_bootstrap(&base).is_none());
}

#[test]
fn python_project_files_are_sorted_sources() {
    let env = SoftwareEnvironment::default();
    let python = PythonEcosystem::new(&env, 3);

    let mut fs = MockFs::new();
    fs.expect_glob()
        .withf(|pattern| pattern == "**/*.py")
        .returning(|_| Ok(files(&["pkg/util.py", "analysis.py"])));

    let project_files = python.project_files(&fs).unwrap();
    assert_eq!(
        project_files,
        vec![CopyPair::same("analysis.py"), CopyPair::same("pkg/util.py")]
    );
}

#[test]
fn python_run_command_prefers_main() {
    let env = SoftwareEnvironment::default();
    let python = PythonEcosystem::new(&env, 3);

    let mut fs = MockFs::new();
    fs.expect_glob()
        .returning(|_| Ok(files(&["a.py", "cmd.py", "main.py"])));

    assert_eq!(
        python.run_command(&fs).unwrap().as_deref(),
        Some("python3 main.py")
    );
}

#[test]
fn python_run_command_falls_back_to_cmd() {
    let env = SoftwareEnvironment::default();
    let python = PythonEcosystem::new(&env, 3);

    let mut fs = MockFs::new();
    fs.expect_glob()
        .returning(|_| Ok(files(&["a.py", "cmd.py"])));

    assert_eq!(
        python.run_command(&fs).unwrap().as_deref(),
        Some("python3 cmd.py")
    );
}

#[test]
fn python_run_command_uses_first_file_alphabetically() {
    let env = SoftwareEnvironment::default();
    let python = PythonEcosystem::new(&env, 3);

    let mut fs = MockFs::new();
    fs.expect_glob()
        .returning(|_| Ok(files(&["zeta.py", "lib/main.py", "beta.py"])));

    assert_eq!(
        python.run_command(&fs).unwrap().as_deref(),
        Some("python3 beta.py")
    );
}

#[test]
fn python_no_run_command_without_sources() {
    let env = SoftwareEnvironment::default();
    let python = PythonEcosystem::new(&env, 3);

    let mut fs = MockFs::new();
    fs.expect_glob().returning(|_| Ok(Vec::new()));

    assert!(python.run_command(&fs).unwrap().is_none());
}

// ── JavaScript ──

#[test]
fn javascript_repo_uses_node_version_and_codename() {
    let env = SoftwareEnvironment::default();
    let js = JavascriptEcosystem::new(&env, 12);

    let repos = js.apt_repos(&BaseImage::new("ubuntu", "18.04")).unwrap();
    assert_eq!(
        repos,
        vec!["deb https://deb.nodesource.com/node_12.x bionic main"]
    );
}

#[test]
fn javascript_unsupported_os_version_fails() {
    let env = SoftwareEnvironment::default();
    let js = JavascriptEcosystem::new(&env, 12);

    let err = js
        .apt_repos(&BaseImage::new("ubuntu", "22.04"))
        .unwrap_err();
    match err {
        GenerateError::UnsupportedOsVersion { version } => assert_eq!(version, "22.04"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn javascript_system_setup() {
    let env = SoftwareEnvironment::default();
    let js = JavascriptEcosystem::new(&env, 10);
    let base = BaseImage::default();

    assert_eq!(
        js.apt_keys_command(&base).as_deref(),
        Some("curl -sSL https://deb.nodesource.com/gpgkey/nodesource.gpg.key | apt-key add -")
    );
    assert_eq!(js.apt_packages(&base), vec!["nodejs"]);
    assert!(js.env_vars(&base).is_empty());
    assert_eq!(js.install_command(&base).as_deref(), Some("npm install"));
}

#[test]
fn javascript_runtime_bootstrap_installs_execution_host() {
    let env = SoftwareEnvironment::default();
    let base = BaseImage::default();

    let js = JavascriptEcosystem::new(&env, 10);
    assert_eq!(
        js.runtime_bootstrap(&base).as_deref(),
        Some("npm install stencila-node@0.28.15")
    );

    let js = JavascriptEcosystem::new(&env, 10).with_execution_host("my-host@1.0.0");
    assert_eq!(
        js.runtime_bootstrap(&base).as_deref(),
        Some("npm install my-host@1.0.0")
    );
}

#[test]
fn javascript_applies_with_package_json() {
    let env = SoftwareEnvironment::default();
    let js = JavascriptEcosystem::new(&env, 10);

    let mut fs = MockFs::new();
    fs.expect_exists().returning(|path| path == "package.json");

    assert!(js.applies(&fs));
}

#[test]
fn javascript_applies_with_node_packages() {
    let env = environ(vec![SoftwarePackage::new("lodash", "", "Node.js")]);
    let js = JavascriptEcosystem::new(&env, 10);

    let mut fs = MockFs::new();
    fs.expect_exists().returning(|_| false);

    assert!(js.applies(&fs));
}

#[test]
fn javascript_prefers_existing_package_json() {
    let env = environ(vec![SoftwarePackage::new("lodash", "", "JavaScript")]);
    let js = JavascriptEcosystem::new(&env, 10);

    let mut fs = MockFs::new();
    fs.expect_exists().returning(|path| path == "package.json");
    fs.expect_write().never();

    assert_eq!(
        js.install_files(&fs).unwrap(),
        vec![CopyPair::same("package.json")]
    );
}

#[test]
fn javascript_synthesizes_package_json() {
    let env = environ(vec![
        SoftwarePackage::new("lodash", "^4", "JavaScript"),
        SoftwarePackage::new("numpy", "", "Python"),
        SoftwarePackage::new("express", "", "JavaScript"),
    ]);
    let js = JavascriptEcosystem::new(&env, 10);

    let mut fs = MockFs::new();
    fs.expect_exists().returning(|_| false);
    fs.expect_write()
        .withf(|path, content| {
            let parsed: serde_json::Value = serde_json::from_str(content).unwrap();
            path == ".package.json"
                && parsed["dependencies"]["lodash"] == "*"
                && parsed["dependencies"]["express"] == "*"
                && parsed["dependencies"].get("numpy").is_none()
        })
        .times(1)
        .returning(|_, _| Ok(()));

    assert_eq!(
        js.install_files(&fs).unwrap(),
        vec![CopyPair::new(".package.json", "package.json")]
    );
}

#[test]
fn javascript_project_files_skip_node_modules() {
    let env = SoftwareEnvironment::default();
    let js = JavascriptEcosystem::new(&env, 10);

    let mut fs = MockFs::new();
    fs.expect_glob()
        .withf(|pattern| pattern == "**/*.js")
        .returning(|_| {
            Ok(files(&[
                "src/app.js",
                "node_modules/lodash/index.js",
                "index.js",
            ]))
        });

    assert_eq!(
        js.project_files(&fs).unwrap(),
        vec![CopyPair::same("index.js"), CopyPair::same("src/app.js")]
    );
}

#[test]
fn javascript_run_command_priority() {
    let env = SoftwareEnvironment::default();
    let js = JavascriptEcosystem::new(&env, 10);

    let mut fs = MockFs::new();
    fs.expect_glob()
        .returning(|_| Ok(files(&["index.js", "main.js", "a.js"])));
    assert_eq!(js.run_command(&fs).unwrap().as_deref(), Some("node main.js"));

    let mut fs = MockFs::new();
    fs.expect_glob()
        .returning(|_| Ok(files(&["index.js", "a.js"])));
    assert_eq!(js.run_command(&fs).unwrap().as_deref(), Some("node index.js"));

    let mut fs = MockFs::new();
    fs.expect_glob().returning(|_| Ok(files(&["b.js", "a.js"])));
    assert_eq!(js.run_command(&fs).unwrap().as_deref(), Some("node a.js"));
}

// ── Selection ──

#[test]
fn select_returns_first_applicable() {
    let env = environ(vec![SoftwarePackage::new("lodash", "", "JavaScript")]);
    let python = PythonEcosystem::new(&env, 3);
    let js = JavascriptEcosystem::new(&env, 10);

    let mut fs = MockFs::new();
    fs.expect_exists().returning(|_| false);

    let candidates: [&dyn Ecosystem; 2] = [&python, &js];
    let selected = select(&candidates, &fs).unwrap();
    assert_eq!(selected.name(), "javascript");
}

#[test]
fn select_none_when_nothing_applies() {
    let env = SoftwareEnvironment::default();
    let python = PythonEcosystem::new(&env, 3);
    let js = JavascriptEcosystem::new(&env, 10);

    let mut fs = MockFs::new();
    fs.expect_exists().returning(|_| false);

    let candidates: [&dyn Ecosystem; 2] = [&python, &js];
    assert!(select(&candidates, &fs).is_none());
}

#[test]
fn with_base_sets_hook_base_image() {
    let env = SoftwareEnvironment::default();
    let bionic = BaseImage::new("ubuntu", "18.04");

    let python = PythonEcosystem::new(&env, 3).with_base(bionic.clone());
    let js = JavascriptEcosystem::new(&env, 12).with_base(bionic.clone());

    assert_eq!(python.base_image(), bionic);
    assert_eq!(js.base_image(), bionic);
    assert_eq!(
        js.apt_repos(&js.base_image()).unwrap(),
        vec!["deb https://deb.nodesource.com/node_12.x bionic main"]
    );
}

#[test]
fn base_image_defaults_to_ubuntu() {
    let env = SoftwareEnvironment::default();
    let python = PythonEcosystem::new(&env, 3);

    assert_eq!(python.base_image(), BaseImage::new("ubuntu", "19.10"));
    assert_eq!(python.base_image().to_string(), "ubuntu:19.10");
}
