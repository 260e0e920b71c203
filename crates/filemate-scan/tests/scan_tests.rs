use std::fs;
use std::time::{Duration, SystemTime};

use filemate_scan::{
    EntryCounts, Grouping, PathEntry, SearchConfig, SortKey, SortSpec, compare, entry_counts,
    files_with_extension, folder_size, list_directory, search, sort_entries, total_size,
};
use tempfile::TempDir;

fn create_listing_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::create_dir(root.join("dir1")).unwrap();
    fs::write(root.join("b.txt"), "bb").unwrap();
    fs::write(root.join("A.txt"), "a").unwrap();
    fs::write(root.join("dir1/inner.txt"), "inner contents").unwrap();

    temp
}

fn names(entries: &[PathEntry]) -> Vec<String> {
    entries.iter().map(|e| e.name.to_string()).collect()
}

#[test]
fn test_name_ascending_keeps_grouping_as_final_tiebreak() {
    let temp = create_listing_tree();
    let spec = SortSpec::by(SortKey::NameAsc, Grouping::FoldersFirst);

    let entries = list_directory(temp.path(), &spec).unwrap();
    assert_eq!(names(&entries), ["A.txt", "b.txt", "dir1"]);
}

#[test]
fn test_listing_reflects_filesystem_changes() {
    let temp = create_listing_tree();
    let spec = SortSpec::default();

    assert_eq!(list_directory(temp.path(), &spec).unwrap().len(), 3);
    fs::write(temp.path().join("c.txt"), "").unwrap();
    assert_eq!(list_directory(temp.path(), &spec).unwrap().len(), 4);
}

#[test]
fn test_files_first_swaps_grouping() {
    let now = SystemTime::now();
    let a = PathEntry::new_directory("/x/same", now);
    let b = PathEntry::new_file("/x/same", 0, now);

    let folders_first = SortSpec::by(SortKey::NameAsc, Grouping::FoldersFirst);
    let files_first = SortSpec::by(SortKey::NameAsc, Grouping::FilesFirst);
    assert!(compare(&folders_first, &a, &b).is_lt());
    assert!(compare(&files_first, &a, &b).is_gt());
}

#[test]
fn test_sort_is_stable() {
    let t = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
    let mut entries = vec![
        PathEntry::new_file("/x/first", 5, t),
        PathEntry::new_file("/x/second", 5, t),
        PathEntry::new_file("/x/third", 5, t),
    ];
    sort_entries(&SortSpec::by(SortKey::SizeDesc, Grouping::FoldersFirst), &mut entries);
    assert_eq!(names(&entries), ["first", "second", "third"]);
}

#[test]
fn test_statistics() {
    let temp = create_listing_tree();

    assert_eq!(folder_size(temp.path()), 1 + 2 + 14);
    assert_eq!(
        entry_counts(temp.path()),
        EntryCounts {
            files: 2,
            folders: 1
        }
    );
    assert_eq!(entry_counts(temp.path()).to_string(), "1 folder, 2 files");

    let dir = PathEntry::from_path(temp.path().join("dir1")).unwrap();
    assert_eq!(total_size(&dir), 14);

    let empty = temp.path().join("empty");
    fs::create_dir(&empty).unwrap();
    assert_eq!(entry_counts(&empty).to_string(), "Empty folder");
}

#[test]
fn test_search_helpers() {
    let temp = create_listing_tree();

    let mut found = files_with_extension(temp.path(), "txt");
    found.sort();
    assert_eq!(found.len(), 3);

    let config = SearchConfig::builder()
        .root(temp.path())
        .deep(true)
        .build()
        .unwrap();
    let hits = search(&config, "contents").unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].path.ends_with("dir1/inner.txt"));
}

#[test]
fn test_search_config_requires_root() {
    assert!(SearchConfig::builder().deep(true).build().is_err());
}
