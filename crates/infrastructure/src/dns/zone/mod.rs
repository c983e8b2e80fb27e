//! Local zone store: in-memory index of configured resource records with
//! exact, wildcard and CNAME resolution policies.
//!
//! The whole table is replaced atomically on reload via [`arc_swap`];
//! concurrent readers keep a consistent snapshot for the duration of one
//! lookup and never observe a partially built table.

pub mod diff;
pub mod loader;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use relay_dns_application::ports::ZoneReloader;
use relay_dns_domain::{DomainError, QueryKey, ZoneDiff};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// CNAME target marking a name as "bypass local zone": the query goes
/// straight to upstream even when local records exist. Compared
/// case-insensitively.
pub const BYPASS_CNAME_TARGET: &str = "direct.";

const CLASS_IN: u16 = 1;
const TYPE_A: u16 = 1;

/// Records for one name, bucketed by (class, type). Insertion order within a
/// bucket is declaration order and is the tie-break order before the
/// per-lookup load-balancing shuffle.
pub type RecordSets = FxHashMap<(u16, u16), Vec<Record>>;

/// One immutable generation of the zone table.
#[derive(Debug, Default)]
pub struct ZoneTable {
    records: FxHashMap<String, RecordSets>,
    record_count: usize,
}

impl ZoneTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one record under its (already normalized) owner name.
    pub fn insert(&mut self, name: String, class: u16, rtype: u16, record: Record) {
        self.records
            .entry(name)
            .or_default()
            .entry((class, rtype))
            .or_default()
            .push(record);
        self.record_count += 1;
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn names(&self) -> impl Iterator<Item = (&String, &RecordSets)> {
        self.records.iter()
    }

    fn sets(&self, name: &str) -> Option<&RecordSets> {
        self.records.get(name)
    }
}

/// Outcome of a zone lookup, consumed by the resolution engine.
#[derive(Debug)]
pub enum ZoneLookup {
    /// Locally configured answer, shuffled, names already rewritten for
    /// wildcard hits.
    Records(Vec<Record>),
    /// A CNAME to chase through the full engine as a fresh IN/A query.
    Cname { record: Record, target: Name },
    /// The reserved escape target: skip local resolution entirely.
    Bypass,
    Miss,
}

pub struct ZoneStore {
    table: ArcSwap<ZoneTable>,
    conf_dir: PathBuf,
}

impl ZoneStore {
    /// Build the initial table from `*.dns-conf` files under `conf_dir`.
    /// Also reports a `resolv.conf` found in the same tree, if any.
    pub fn load(conf_dir: impl Into<PathBuf>) -> (Self, Option<PathBuf>) {
        let conf_dir = conf_dir.into();
        let (table, resolv_conf) = loader::load_dir(&conf_dir);
        info!(
            conf_dir = %conf_dir.display(),
            records = table.record_count(),
            "Zone table loaded"
        );
        let store = Self {
            table: ArcSwap::from_pointee(table),
            conf_dir,
        };
        (store, resolv_conf)
    }

    /// Store wrapping a prebuilt table. The conf dir is only consulted on
    /// reload.
    pub fn from_table(table: ZoneTable, conf_dir: impl Into<PathBuf>) -> Self {
        Self {
            table: ArcSwap::from_pointee(table),
            conf_dir: conf_dir.into(),
        }
    }

    pub fn record_count(&self) -> usize {
        self.table.load().record_count()
    }

    /// Resolution policy: exact match, then wildcard (IN/A queries only),
    /// then the CNAME bucket for non-CNAME queries.
    pub fn lookup(&self, key: &QueryKey) -> ZoneLookup {
        let table = self.table.load();

        let mut wildcard = false;
        let mut sets = table.sets(&key.name);

        if sets.is_none() && key.class == CLASS_IN && key.rtype == TYPE_A {
            if let Some((pattern, matched)) = wildcard_match(&table, &key.name) {
                debug!(name = %key.name, pattern = %pattern, "Wildcard zone match");
                sets = Some(matched);
                wildcard = true;
            }
        }

        let Some(sets) = sets else {
            return ZoneLookup::Miss;
        };

        // A CNAME to the reserved escape target overrides everything else
        // configured for the name, locally declared A records included. An
        // explicit CNAME query is exempt: it gets the bucket as declared.
        let cname = if key.rtype == u16::from(RecordType::CNAME) {
            None
        } else {
            first_cname(sets, key.class)
        };
        if let Some((_, target)) = &cname {
            if target.to_utf8().eq_ignore_ascii_case(BYPASS_CNAME_TARGET) {
                return ZoneLookup::Bypass;
            }
        }

        if let Some(bucket) = sets.get(&(key.class, key.rtype)) {
            if !bucket.is_empty() {
                let mut records = bucket.clone();
                load_balance(&mut records);
                if wildcard {
                    rewrite_names(&mut records, &key.name);
                }
                return ZoneLookup::Records(records);
            }
        }

        if let Some((mut record, target)) = cname {
            if wildcard {
                rewrite_names(std::slice::from_mut(&mut record), &key.name);
            }
            return ZoneLookup::Cname { record, target };
        }

        ZoneLookup::Miss
    }

    /// Rebuild from the conf dir, diff against the live table, then publish
    /// with a single atomic swap.
    pub fn reload_now(&self) -> ZoneDiff {
        let (new_table, _) = loader::load_dir(&self.conf_dir);
        let new_table = Arc::new(new_table);
        let old_table = self.table.load_full();
        let diff = diff::diff_tables(&old_table, &new_table);
        self.table.store(new_table);
        diff
    }

    pub fn conf_dir(&self) -> &Path {
        &self.conf_dir
    }
}

#[async_trait]
impl ZoneReloader for ZoneStore {
    async fn reload(&self) -> Result<ZoneDiff, DomainError> {
        Ok(self.reload_now())
    }
}

/// First record of the CNAME bucket with its decoded target.
fn first_cname(sets: &RecordSets, class: u16) -> Option<(Record, Name)> {
    let bucket = sets.get(&(class, RecordType::CNAME.into()))?;
    let record = bucket.first()?.clone();
    let RData::CNAME(cname) = record.data() else {
        return None;
    };
    let target = cname.0.clone();
    Some((record, target))
}

/// Progressively strip the leftmost label and probe `"*." + suffix`, most
/// specific first. Names are FQDN (trailing dot), so the final split element
/// is empty and the `len - 3` bound keeps at least two real labels in every
/// probed suffix: the root and bare TLDs are never wildcard-matched, and
/// two-label names are not probed at all.
fn wildcard_match<'t>(table: &'t ZoneTable, name: &str) -> Option<(String, &'t RecordSets)> {
    let labels: Vec<&str> = name.split('.').collect();
    for i in 0..labels.len().saturating_sub(3) {
        let pattern = format!("*.{}", labels[i + 1..].join("."));
        if let Some(sets) = table.sets(&pattern) {
            return Some((pattern, sets));
        }
    }
    None
}

/// Uniform per-call shuffle so repeated queries distribute load across the
/// configured records.
fn load_balance(records: &mut [Record]) {
    fastrand::shuffle(records);
}

/// Responses must echo the queried name, not the wildcard pattern it
/// matched.
fn rewrite_names(records: &mut [Record], name: &str) {
    if let Ok(owner) = Name::from_utf8(name) {
        for record in records {
            record.set_name(owner.clone());
        }
    }
}
