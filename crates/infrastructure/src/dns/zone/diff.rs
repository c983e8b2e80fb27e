//! Reload diffing: compares two zone table generations per name and
//! (class, type) bucket. Two buckets are equal only if their records' full
//! textual representations match in declaration order.

use super::ZoneTable;
use hickory_proto::rr::Record;
use relay_dns_domain::ZoneDiff;

pub fn diff_tables(old: &ZoneTable, new: &ZoneTable) -> ZoneDiff {
    let mut diff = ZoneDiff::default();

    for (name, new_sets) in new.names() {
        match old.sets(name) {
            Some(old_sets) => {
                for (bucket, new_records) in new_sets {
                    match old_sets.get(bucket) {
                        Some(old_records) => {
                            if texts(new_records) != texts(old_records) {
                                diff.changed.extend(texts(new_records));
                            }
                        }
                        None => diff.added.extend(texts(new_records)),
                    }
                }
                for (bucket, old_records) in old_sets {
                    if !new_sets.contains_key(bucket) {
                        diff.removed.extend(texts(old_records));
                    }
                }
            }
            None => {
                for records in new_sets.values() {
                    diff.added.extend(texts(records));
                }
            }
        }
    }

    for (name, sets) in old.names() {
        if new.sets(name).is_none() {
            for records in sets.values() {
                diff.removed.extend(texts(records));
            }
        }
    }

    diff
}

fn texts(records: &[Record]) -> Vec<String> {
    records.iter().map(|r| r.to_string()).collect()
}
