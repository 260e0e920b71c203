//! Comparator chains for directory listings.
//!
//! A [`SortSpec`] becomes a list of comparators: one per sort key, followed
//! by the grouping comparator. The chain is evaluated left to right and the
//! first non-equal result wins, so the grouping rule only separates folders
//! from files among entries that every key considers equal.

use std::cmp::Ordering;

use filemate_core::{Grouping, PathEntry, SortKey, SortSpec};

/// A single ordering over entries.
pub type EntryComparator = fn(&PathEntry, &PathEntry) -> Ordering;

/// Comparator for one sort key.
pub fn key_comparator(key: SortKey) -> EntryComparator {
    match key {
        SortKey::NameAsc => name_asc,
        SortKey::NameDesc => |a: &PathEntry, b: &PathEntry| name_asc(b, a),
        SortKey::SizeAsc => size_asc,
        SortKey::SizeDesc => |a: &PathEntry, b: &PathEntry| size_asc(b, a),
        SortKey::DateAsc => date_asc,
        SortKey::DateDesc => |a: &PathEntry, b: &PathEntry| date_asc(b, a),
    }
}

/// Comparator for a grouping rule. Files-first is folders-first with the
/// operands swapped.
pub fn grouping_comparator(grouping: Grouping) -> EntryComparator {
    match grouping {
        Grouping::FoldersFirst => folders_first,
        Grouping::FilesFirst => |a: &PathEntry, b: &PathEntry| folders_first(b, a),
    }
}

fn name_asc(a: &PathEntry, b: &PathEntry) -> Ordering {
    lowercase_name(a).cmp(&lowercase_name(b))
}

fn size_asc(a: &PathEntry, b: &PathEntry) -> Ordering {
    a.len.cmp(&b.len)
}

fn date_asc(a: &PathEntry, b: &PathEntry) -> Ordering {
    a.modified.cmp(&b.modified)
}

fn folders_first(a: &PathEntry, b: &PathEntry) -> Ordering {
    match (a.is_dir(), b.is_dir()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn lowercase_name(entry: &PathEntry) -> String {
    entry.name.to_lowercase().into()
}

/// Build the comparator chain for a spec. The grouping comparator is last.
pub fn comparators(spec: &SortSpec) -> Vec<EntryComparator> {
    spec.keys
        .iter()
        .map(|key| key_comparator(*key))
        .chain(std::iter::once(grouping_comparator(spec.grouping)))
        .collect()
}

/// Compare two entries with a prebuilt chain.
pub fn compare_with(chain: &[EntryComparator], a: &PathEntry, b: &PathEntry) -> Ordering {
    chain
        .iter()
        .fold(Ordering::Equal, |ordering, cmp| ordering.then_with(|| cmp(a, b)))
}

/// Compare two entries according to a spec.
pub fn compare(spec: &SortSpec, a: &PathEntry, b: &PathEntry) -> Ordering {
    compare_with(&comparators(spec), a, b)
}

/// Sort entries in place. The sort is stable: entries the whole chain
/// considers equal keep their enumeration order.
pub fn sort_entries(spec: &SortSpec, entries: &mut [PathEntry]) {
    let chain = comparators(spec);
    entries.sort_by(|a, b| compare_with(&chain, a, b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn file(name: &str, len: u64) -> PathEntry {
        PathEntry::new_file(format!("/t/{name}"), len, SystemTime::UNIX_EPOCH)
    }

    fn dir(name: &str) -> PathEntry {
        PathEntry::new_directory(format!("/t/{name}"), SystemTime::UNIX_EPOCH)
    }

    fn names(entries: &[PathEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_grouping_is_last_in_chain() {
        let spec = SortSpec::by(SortKey::NameAsc, Grouping::FoldersFirst);
        assert_eq!(comparators(&spec).len(), 2);

        let mut entries = vec![file("b.txt", 1), file("A.txt", 1), dir("dir1")];
        sort_entries(&spec, &mut entries);
        assert_eq!(names(&entries), ["A.txt", "b.txt", "dir1"]);
    }

    #[test]
    fn test_grouping_breaks_name_ties() {
        let spec = SortSpec::by(SortKey::NameAsc, Grouping::FoldersFirst);
        let mut entries = vec![file("Same", 1), dir("same")];
        sort_entries(&spec, &mut entries);
        assert!(entries[0].is_dir());

        let spec = SortSpec::by(SortKey::NameAsc, Grouping::FilesFirst);
        sort_entries(&spec, &mut entries);
        assert!(entries[0].is_file());
    }

    #[test]
    fn test_size_ties_group_folders() {
        // directories built with new_directory have len 0
        let spec = SortSpec::by(SortKey::SizeAsc, Grouping::FoldersFirst);
        let mut entries = vec![file("empty", 0), file("big", 10), dir("d")];
        sort_entries(&spec, &mut entries);
        assert_eq!(names(&entries), ["d", "empty", "big"]);

        let spec = SortSpec::by(SortKey::SizeDesc, Grouping::FilesFirst);
        sort_entries(&spec, &mut entries);
        assert_eq!(names(&entries), ["big", "empty", "d"]);
    }

    #[test]
    fn test_date_order() {
        let old = PathEntry::new_file("/t/old", 0, SystemTime::UNIX_EPOCH);
        let new = PathEntry::new_file(
            "/t/new",
            0,
            SystemTime::UNIX_EPOCH + Duration::from_secs(60),
        );
        let mut entries = vec![new.clone(), old.clone()];

        sort_entries(&SortSpec::by(SortKey::DateAsc, Grouping::FoldersFirst), &mut entries);
        assert_eq!(names(&entries), ["old", "new"]);

        sort_entries(&SortSpec::by(SortKey::DateDesc, Grouping::FoldersFirst), &mut entries);
        assert_eq!(names(&entries), ["new", "old"]);
    }

    #[test]
    fn test_name_desc_is_case_insensitive() {
        let spec = SortSpec::by(SortKey::NameDesc, Grouping::FoldersFirst);
        let mut entries = vec![file("apple", 0), file("Banana", 0), file("cherry", 0)];
        sort_entries(&spec, &mut entries);
        assert_eq!(names(&entries), ["cherry", "Banana", "apple"]);
    }

    #[test]
    fn test_name_lowercasing_is_unicode_aware() {
        let a = file("Ärger", 0);
        let b = file("ärger", 0);
        assert_eq!(name_asc(&a, &b), Ordering::Equal);
        assert_eq!(lowercase_name(&a), "ärger");

        let spec = SortSpec::by(SortKey::NameAsc, Grouping::FoldersFirst);
        let mut entries = vec![file("Öl", 0), file("zebra", 0), file("ähre", 0)];
        sort_entries(&spec, &mut entries);
        assert_eq!(names(&entries), ["zebra", "ähre", "Öl"]);
    }

    #[test]
    fn test_multiple_keys() {
        let spec = SortSpec::new(vec![SortKey::SizeAsc, SortKey::NameDesc], Grouping::FoldersFirst);
        let mut entries = vec![file("a", 1), file("b", 1), file("c", 0)];
        sort_entries(&spec, &mut entries);
        assert_eq!(names(&entries), ["c", "b", "a"]);
    }
}
