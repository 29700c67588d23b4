use std::collections::{BTreeMap, HashMap, btree_map::Entry, hash_map};

use vetro_types::{BulkEntry, SeriesIdentity, SeriesRecord};

/// Merge incoming timestamp groups into the accumulator.
///
/// - Groups are keyed by `t`; a timestamp already present has its series
///   records merged into the existing group, a new timestamp is inserted in
///   chronological position.
/// - Within a group, records are keyed by identity (asset plus rendered
///   non-value tags); the later-fetched record wins on collision.
///
/// Keeping the accumulator in a `BTreeMap` makes the chronological-order and
/// timestamp-uniqueness invariants structural: the combined sequence is
/// ascending regardless of whether pages arrived walking forward or backward.
pub fn merge_entries(acc: &mut BTreeMap<i64, BulkEntry>, incoming: Vec<BulkEntry>) {
    for entry in incoming {
        match acc.entry(entry.t) {
            Entry::Vacant(v) => {
                v.insert(entry);
            }
            Entry::Occupied(mut o) => {
                merge_records(&mut o.get_mut().bulk, entry.bulk);
            }
        }
    }
}

/// Merge incoming series records into an existing group.
///
/// Records with an identity already present overwrite in place (the group
/// keeps its first-seen ordering); records with a new identity are appended.
pub fn merge_records(existing: &mut Vec<SeriesRecord>, incoming: Vec<SeriesRecord>) {
    let mut slots: HashMap<SeriesIdentity, usize> = existing
        .iter()
        .enumerate()
        .map(|(i, r)| (r.identity(), i))
        .collect();

    for record in incoming {
        match slots.entry(record.identity()) {
            hash_map::Entry::Occupied(slot) => {
                existing[*slot.get()] = record;
            }
            hash_map::Entry::Vacant(slot) => {
                slot.insert(existing.len());
                existing.push(record);
            }
        }
    }
}
