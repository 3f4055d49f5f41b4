use depgraph_scanner::utils::file_walker::DirectoryWalker;
use depgraph_scanner::utils::ignore_rules::IgnoreMatcher;
use depgraph_scanner::utils::table::{self, Align};
use std::fs;
use std::io::Write;
use tempfile::tempdir;

#[test]
fn table_renderer_produces_expected_grid() {
    let headers = ["A", "B"];
    let rows = vec![vec!["x".into(), "y".into()], vec!["long".into(), "z".into()]];
    let out = table::render(&headers, &rows);
    assert!(out.starts_with('+'));
    assert!(out.contains("| A    | B |"));
    assert!(out.contains("| long | z |"));
}

#[test]
fn table_right_alignment_and_missing_cells() {
    let rows = vec![vec!["1".into(), "a.ts".into()], vec!["10".into()]];
    let out = table::render_aligned(&["#", "File"], &rows, &[Align::Right]);
    assert!(out.contains("|  1 | a.ts |"));
    assert!(out.contains("| 10 |      |"));
}

#[test]
fn walker_respects_root_gitignore_only_when_loaded() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src")).unwrap();
    write(&root.join("src/lib.ts"), "export {};\n");
    write(&root.join("src/hidden.ts"), "export {};\n");
    write(&root.join(".gitignore"), "src/hidden.ts\n");

    let ids = |matcher: IgnoreMatcher| -> Vec<String> {
        DirectoryWalker::new(root, matcher).walk().unwrap().files.into_iter().map(|f| f.id).collect()
    };

    let filtered = ids(IgnoreMatcher::from_root(root));
    assert!(filtered.iter().any(|s| s == "src/lib.ts"));
    assert!(!filtered.iter().any(|s| s == "src/hidden.ts"));

    let all = ids(IgnoreMatcher::empty());
    assert!(all.iter().any(|s| s == "src/hidden.ts"));
}

#[test]
fn missing_gitignore_means_no_rules() {
    let dir = tempdir().unwrap();
    assert!(IgnoreMatcher::from_root(dir.path()).is_empty());
}

fn write(path: &std::path::Path, s: &str) {
    let mut f = fs::File::create(path).unwrap();
    f.write_all(s.as_bytes()).unwrap();
}
