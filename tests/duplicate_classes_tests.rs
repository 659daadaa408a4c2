use std::fs;

use baseline::{
    check_all_configuration_class_names, check_configuration_class_names,
    check_unique_class_names, duplicates::DuplicateClassReporter, error::ManifestError,
    manifest::Manifest,
};


use jar_support::Workspace;

#[test]
fn distinct_classes_pass() {
    let ws = Workspace::new("dup-distinct");
    let a = ws.jar("a.jar", &[("com/x/A.class", b"a")]);
    let b = ws.jar("b.jar", &[("com/x/B.class", b"b"), ("com/x/", b"")]);

    let reporter = DuplicateClassReporter::scan([&a, &b]).expect("readable jars");

    assert!(reporter.duplicates().is_empty());
    reporter.report().expect("no duplicates");
}

#[test]
fn identical_duplicates_still_fail() {
    let ws = Workspace::new("dup-identical");
    let a = ws.jar("a.jar", &[("com/x/Foo.class", b"same")]);
    let b = ws.jar("b.jar", &[("com/x/Foo.class", b"same")]);

    let err = DuplicateClassReporter::scan([&a, &b])
        .expect("readable jars")
        .report()
        .expect_err("identical bytes are still duplicates");

    assert_eq!(err.duplicates, 1);
    assert!(err.report.contains("  - com.x.Foo"), "{}", err.report);
}

#[test]
fn report_groups_classes_by_file_set() {
    let ws = Workspace::new("dup-report");
    let a = ws.jar(
        "a.jar",
        &[
            ("com/x/One.class", b"1"),
            ("com/x/Two.class", b"2"),
            ("com/y/Three.class", b"3"),
        ],
    );
    let b = ws.jar("b.jar", &[("com/x/One.class", b"1"), ("com/x/Two.class", b"two")]);
    let c = ws.jar("c.jar", &[("com/y/Three.class", b"three")]);

    let err = DuplicateClassReporter::scan([&a, &b, &c])
        .expect("readable jars")
        .report()
        .expect_err("duplicates fail");
    let report = err.report;

    assert_eq!(err.duplicates, 3);
    assert!(
        report.starts_with("3 identically named classes found in 2 sets of files:"),
        "{report}"
    );
    let [a, b, c] = [a, b, c].map(|p| fs::canonicalize(p).expect("canonical path"));
    let ab = format!("[{}, {}]\n  - com.x.One\n  - com.x.Two\n", a.display(), b.display());
    let ac = format!("[{}, {}]\n  - com.y.Three\n", a.display(), c.display());
    assert!(report.contains(&ab), "{report}");
    assert!(report.contains(&ac), "{report}");
    assert!(report.contains("Summary"), "{report}");
    assert!(report.contains("Duplicate classes"), "{report}");
}

#[test]
fn versioned_entries_are_not_duplicates() {
    let ws = Workspace::new("dup-versioned");
    let versioned = "META-INF/versions/11/com/x/Foo.class";
    let jar = ws.jar("mr.jar", &[("com/x/Foo.class", b"8"), (versioned, b"11")]);
    let other = ws.jar("other.jar", &[(versioned, b"11"), ("com/x/Bar.class", b"bar")]);

    let reporter = DuplicateClassReporter::scan([&jar, &other]).expect("readable jars");

    assert!(reporter.duplicates().is_empty());
    reporter.report().expect("version specific classes never conflict");
}

#[test]
fn one_jar_under_two_paths_is_one_file() {
    let ws = Workspace::new("dup-same-file");
    fs::create_dir_all(ws.root().join("libs")).expect("create dir");
    let jar = ws.jar("libs/a.jar", &[("com/x/Foo.class", b"a")]);
    let roundabout = ws.root().join("libs").join("..").join("libs").join("a.jar");

    let reporter = DuplicateClassReporter::scan([&jar, &roundabout]).expect("readable jar");
    assert!(reporter.duplicates().is_empty());

    check_unique_class_names(&[ws.root().join("libs"), roundabout])
        .expect("a directory and a file naming the same jar");
}

#[test]
fn missing_files_are_skipped() {
    let ws = Workspace::new("dup-missing");
    let a = ws.jar("a.jar", &[("com/x/Foo.class", b"a")]);
    let gone = ws.root().join("gone.jar");

    let mut reporter = DuplicateClassReporter::new();
    assert!(reporter.add_file(&a).expect("readable"));
    assert!(!reporter.add_file(&gone).expect("missing is not an error"));
    reporter.report().expect("nothing duplicated");
}

#[test]
fn corrupt_files_abort_the_scan() {
    let ws = Workspace::new("dup-corrupt");
    let broken = ws.root().join("broken.jar");
    fs::write(&broken, b"not a zip").expect("write garbage");

    let err = DuplicateClassReporter::scan([&broken]).expect_err("corrupt jar fails");

    assert_eq!(err.path(), broken.as_path());
}

#[test]
fn directories_are_searched_for_jars() {
    let ws = Workspace::new("dup-dirs");
    fs::create_dir_all(ws.root().join("libs/nested")).expect("create dirs");
    ws.jar("libs/a.jar", &[("com/x/Foo.class", b"a")]);
    ws.jar("libs/nested/b.jar", &[("com/x/Foo.class", b"b")]);
    fs::write(ws.root().join("libs/readme.txt"), "ignored").expect("write text file");

    let err = check_unique_class_names(&[ws.root().join("libs")])
        .expect_err("nested jars share a class");

    assert!(err.to_string().contains("com.x.Foo"), "{err}");
    assert!(err.to_string().contains("nested"), "{err}");
}

#[test]
fn configuration_check_uses_manifest_artifacts() {
    let ws = Workspace::new("dup-config");
    let a = ws.artifact("A", "1.0", &[("com/x/Foo.class", b"a")]);
    let b = ws.artifact("B", "1.0", &[("com/x/Foo.class", b"a")]);
    let c = ws.artifact("C", "1.0", &[("com/y/Bar.class", b"c")]);
    let path = ws.manifest(&[
        ("runtimeClasspath", vec![a.clone(), b]),
        ("compileClasspath", vec![a, c]),
    ]);
    let manifest = Manifest::load(&path).expect("manifest");

    check_configuration_class_names(&manifest, "compileClasspath").expect("unique");
    let err = check_configuration_class_names(&manifest, "runtimeClasspath")
        .expect_err("shared class");
    assert!(err.to_string().contains("A-1.0.jar"), "{err}");

    let err = check_configuration_class_names(&manifest, "testRuntimeClasspath")
        .expect_err("unknown configuration");
    assert!(matches!(
        err.downcast_ref::<ManifestError>(),
        Some(ManifestError::UnknownConfiguration { name }) if name == "testRuntimeClasspath"
    ));
}

#[test]
fn every_failing_configuration_is_reported_together() {
    let ws = Workspace::new("dup-all-configs");
    let a = ws.artifact("A", "1.0", &[("com/x/Foo.class", b"a")]);
    let b = ws.artifact("B", "1.0", &[("com/x/Foo.class", b"b")]);
    let c = ws.artifact("C", "1.0", &[("com/y/Bar.class", b"c")]);
    let d = ws.artifact("D", "1.0", &[("com/y/Bar.class", b"d")]);
    let e = ws.artifact("E", "1.0", &[("com/z/Baz.class", b"e")]);
    let path = ws.manifest(&[
        ("compileClasspath", vec![a.clone(), b]),
        ("runtimeClasspath", vec![c, d]),
        ("annotationProcessor", vec![a, e]),
    ]);
    let manifest = Manifest::load(&path).expect("manifest");

    let err = check_all_configuration_class_names(&manifest, None).expect_err("two fail");
    let message = err.to_string();

    assert!(message.contains("## compileClasspath\n"), "{message}");
    assert!(message.contains("## runtimeClasspath\n"), "{message}");
    assert!(!message.contains("## annotationProcessor"), "{message}");
    assert!(message.contains("com.x.Foo"), "{message}");
    assert!(message.contains("com.y.Bar"), "{message}");
    assert!(
        message.find("## compileClasspath") < message.find("## runtimeClasspath"),
        "{message}"
    );

    check_all_configuration_class_names(&manifest, Some("annotationProcessor"))
        .expect("single passing configuration");
    let err = check_all_configuration_class_names(&manifest, Some("runtimeClasspath"))
        .expect_err("single failing configuration");
    assert!(err.to_string().starts_with("## runtimeClasspath\n"), "{err}");

    let err = check_all_configuration_class_names(&manifest, Some("testRuntimeClasspath"))
        .expect_err("unknown configuration");
    assert!(err.downcast_ref::<ManifestError>().is_some());
}
