//! File-level behaviour of the container: directories, overwrite, update mode.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use tc_core::{Binning, Histogram, SavedCanvas};
use tc_store::{RootError, StoreFile, StoreObject, StoreWriter, WriteMode, write_objects};

fn tmp_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let dir = std::env::temp_dir().join(format!("tc-store-{tag}-{}-{nanos}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn hist(name: &str, xs: &[f64]) -> Histogram {
    let mut h = Histogram::new(name, format!("{name} title"), Binning::new(50, 0.0, 100.0).unwrap());
    for &x in xs {
        h.fill(x);
    }
    h
}

fn canvas() -> SavedCanvas {
    SavedCanvas {
        name: "canvas".into(),
        title: "canvas".into(),
        width: 800,
        height: 600,
        svg: "<svg xmlns=\"http://www.w3.org/2000/svg\"/>".into(),
    }
}

#[test]
fn creates_missing_parent_directories() {
    let root = tmp_dir("mkdir");
    let path = root.join("a/b/c/hists.root");
    let objs = vec![StoreObject::from(hist("sig1", &[10.0]))];
    let written = write_objects(&objs, "cat1", &path, WriteMode::Recreate).unwrap();
    assert_eq!(written, path);
    assert!(path.is_file());
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn objects_live_under_the_category() {
    let root = tmp_dir("layout");
    let path = root.join("hists.root");
    let objs: Vec<StoreObject> = vec![
        canvas().into(),
        hist("sig1", &[25.0, 26.0]).into(),
        hist("bkg", &[1.0; 40]).into(),
        hist("data_obs", &[3.0, 50.0]).into(),
    ];
    write_objects(&objs, "cat1", &path, WriteMode::Recreate).unwrap();

    let f = StoreFile::open(&path).unwrap();
    let top = f.list_keys().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].name, "cat1");
    assert_eq!(top[0].class_name, "TDirectory");

    let names: Vec<String> = f.list_keys_in("cat1").unwrap().into_iter().map(|k| k.name).collect();
    assert_eq!(names, ["canvas", "sig1", "bkg", "data_obs"]);

    let bkg = f.get_histogram("cat1/bkg").unwrap();
    approx::assert_relative_eq!(bkg.bin_content()[0], 40.0);
    assert_eq!(bkg.title, "bkg title");
    assert_eq!(f.get_canvas("cat1/canvas").unwrap(), canvas());

    assert!(matches!(f.get_histogram("cat1/sig7"), Err(RootError::KeyNotFound(_))));
    assert!(matches!(f.get_histogram("cat2/sig1"), Err(RootError::KeyNotFound(_))));
    assert!(f.get_histogram("cat1/canvas").is_err());
    assert!(f.get_histogram("cat1/sig1/x").is_err());
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn writing_twice_keeps_one_latest_copy() {
    let root = tmp_dir("twice");
    let path = root.join("hists.root");

    let first = vec![StoreObject::from(hist("sig1", &[10.0]))];
    write_objects(&first, "cat1", &path, WriteMode::Update).unwrap();
    let second = vec![StoreObject::from(hist("sig1", &[90.0, 91.0]))];
    write_objects(&second, "cat1", &path, WriteMode::Update).unwrap();

    let f = StoreFile::open(&path).unwrap();
    assert_eq!(f.object_paths().unwrap(), ["cat1/sig1"]);
    let h = f.get_histogram("cat1/sig1").unwrap();
    approx::assert_relative_eq!(h.entries(), 2.0);
    approx::assert_relative_eq!(h.bin_content()[45], 2.0);
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn update_merges_and_recreate_discards() {
    let root = tmp_dir("modes");
    let path = root.join("hists.root");

    write_objects(&[hist("a", &[1.0]).into()], "cat1", &path, WriteMode::Recreate).unwrap();
    write_objects(&[hist("b", &[1.0]).into()], "cat2", &path, WriteMode::Update).unwrap();
    let f = StoreFile::open(&path).unwrap();
    assert_eq!(f.object_paths().unwrap(), ["cat1/a", "cat2/b"]);

    write_objects(&[hist("c", &[1.0]).into()], "cat1", &path, WriteMode::Recreate).unwrap();
    let f = StoreFile::open(&path).unwrap();
    assert_eq!(f.object_paths().unwrap(), ["cat1/c"]);
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn compression_is_optional() {
    let root = tmp_dir("compress");
    let xs: Vec<f64> = (0..1000).map(|i| (i % 100) as f64).collect();

    let packed = root.join("packed.root");
    let mut w = StoreWriter::create(&packed, WriteMode::Recreate).unwrap();
    w.put("cat1", hist("h", &xs));
    w.finish().unwrap();

    let raw = root.join("raw.root");
    let mut w = StoreWriter::create(&raw, WriteMode::Recreate).unwrap().with_compression(0);
    w.put("cat1", hist("h", &xs));
    w.finish().unwrap();

    let size = |p: &PathBuf| std::fs::metadata(p).unwrap().len();
    assert!(size(&packed) < size(&raw));

    let a = StoreFile::open(&packed).unwrap();
    let b = StoreFile::open(&raw).unwrap();
    assert_eq!(b.compression(), 0);
    assert_eq!(a.get_histogram("cat1/h").unwrap(), b.get_histogram("cat1/h").unwrap());
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn unwritable_destination_reports_path() {
    let root = tmp_dir("blocked");
    // A regular file where a directory is expected.
    let blocker = root.join("blocker");
    std::fs::write(&blocker, b"x").unwrap();
    let path = blocker.join("sub/hists.root");
    let err = write_objects(&[hist("a", &[]).into()], "cat1", &path, WriteMode::Recreate).unwrap_err();
    assert!(matches!(err, RootError::Path { .. }), "{err:?}");
    assert!(err.to_string().contains("blocker"));
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn corrupt_file_is_rejected() {
    let root = tmp_dir("corrupt");
    let path = root.join("hists.root");
    write_objects(&[hist("a", &[1.0]).into()], "cat1", &path, WriteMode::Recreate).unwrap();
    let mut bytes = std::fs::read(&path).unwrap();
    let len = bytes.len();
    bytes.truncate(len - 10);
    assert!(StoreFile::from_bytes(bytes, path.clone()).is_err());
    let _ = std::fs::remove_dir_all(&root);
}
