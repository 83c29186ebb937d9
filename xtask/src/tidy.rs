use std::path::{Path, PathBuf};

use xshell::Shell;

fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).parent().unwrap().to_path_buf()
}

fn version(manifest: &str) -> &str {
    manifest
        .lines()
        .find_map(|it| it.strip_prefix("version = \""))
        .and_then(|it| it.split('"').next())
        .unwrap()
}

#[test]
fn versions_are_in_sync() {
    let sh = Shell::new().unwrap();
    let root = project_root();
    let clive = sh.read_file(root.join("Cargo.toml")).unwrap();
    let macros = sh.read_file(root.join("clive-macros/Cargo.toml")).unwrap();

    assert_eq!(version(&clive), version(&macros));
    let pin = format!("version = \"={}\"", version(&macros));
    assert!(clive.contains(&pin), "clive must pin clive-macros to {pin}");
}

#[test]
fn no_debug_leftovers() {
    let sh = Shell::new().unwrap();
    let root = project_root();
    let mut files = Vec::new();
    for dir in ["src", "clive-macros/src", "clive-macros/tests", "demos"] {
        rust_files(&sh, &root.join(dir), &mut files);
    }
    assert!(!files.is_empty());
    for file in files {
        let text = sh.read_file(&file).unwrap();
        for (idx, line) in text.lines().enumerate() {
            assert!(!line.contains("dbg!("), "{}:{}: leftover dbg!", file.display(), idx + 1);
            assert!(!line.ends_with(' '), "{}:{}: trailing whitespace", file.display(), idx + 1);
        }
    }
}

fn rust_files(sh: &Shell, dir: &Path, acc: &mut Vec<PathBuf>) {
    for path in sh.read_dir(dir).unwrap() {
        if path.is_dir() {
            rust_files(sh, &path, acc);
        } else if path.extension().map_or(false, |it| it == "rs") {
            acc.push(path);
        }
    }
}
