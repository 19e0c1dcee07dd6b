use std::collections::BTreeMap;

use proptest::prelude::*;

use webapp_rebuild::detect::snapshot::{decode_snapshot, encode_snapshot};
use webapp_rebuild::detect::{decide, ChangeSet, Digest, FileDigestMap};

/// File sets as path -> content.
fn file_set() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    prop::collection::btree_map("[a-c]{1,2}(/[a-c]{1,2}){0,2}\\.txt", any::<Vec<u8>>(), 0..8)
}

fn digests(files: &BTreeMap<String, Vec<u8>>) -> FileDigestMap {
    files
        .iter()
        .map(|(path, content)| (path.clone(), Digest::of(content)))
        .collect()
}

proptest! {
    #[test]
    fn identical_sets_never_trigger(files in file_set()) {
        prop_assert!(!decide(&digests(&files), &digests(&files)));
    }

    #[test]
    fn differing_sets_always_trigger(a in file_set(), b in file_set()) {
        prop_assume!(a != b);
        prop_assert!(decide(&digests(&b), &digests(&a)));
        prop_assert!(!ChangeSet::between(&digests(&a), &digests(&b)).is_empty());
    }

    #[test]
    fn content_edit_triggers(files in file_set(), extra in any::<u8>()) {
        prop_assume!(!files.is_empty());
        let mut edited = files.clone();
        let (_, content) = edited.iter_mut().next().unwrap();
        content.push(extra);

        let changes = ChangeSet::between(&digests(&files), &digests(&edited));
        prop_assert!(decide(&digests(&edited), &digests(&files)));
        prop_assert_eq!(changes.modified.len(), 1);
    }

    #[test]
    fn stored_snapshot_decides_like_the_original(files in file_set()) {
        let map = digests(&files);
        let stored = decode_snapshot(&encode_snapshot(&map)).unwrap();
        prop_assert!(!decide(&map, &stored));
    }
}
