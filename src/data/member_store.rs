//! Member store backed by a flat CSV file.
//!
//! `MemberStore` owns the table of member records and keeps it consistent with the
//! file on disk. Every mutating operation rewrites the whole file before it returns,
//! and rolls the in-memory record back if the write fails, so the file always holds
//! the last committed state. The unban sweep is the one caller that batches: it lifts
//! bans in memory with [`MemberStore::lift_expired_ban`] and calls
//! [`MemberStore::persist`] once at the end.
//!
//! None of the methods are async. Callers hold the store lock only for the duration
//! of a single call and carry out Discord side effects after releasing it.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use tokio::sync::Mutex;

use crate::config::RoleConfig;
use crate::data::codec::{self, SkippedRow};
use crate::error::store::StoreError;
use crate::model::guild::GuildMemberSnapshot;
use crate::model::member::{
    truncate_to_minute, BanExpiry, MemberRecord, MembershipStatus, MAX_STRIKES,
    TEMPORARY_BAN_DAYS,
};
use crate::model::strike::{ClearConsequence, ClearOutcome, StrikeConsequence, StrikeOutcome};

/// Member store shared between the event handler and the unban scheduler.
pub type SharedMemberStore = Arc<Mutex<MemberStore>>;

/// Summary of a [`MemberStore::load`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Number of records loaded.
    pub loaded: usize,
    /// Rows skipped because they could not be decoded.
    pub skipped: Vec<SkippedRow>,
    /// Whether the file was absent and a fresh one was written.
    pub created: bool,
}

/// Summary of a [`MemberStore::reconcile`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Members that had no record and were added.
    pub added: Vec<u64>,
    /// Members whose stored display name was refreshed.
    pub renamed: Vec<u64>,
    /// Members holding neither the member nor the guest role, bots excluded.
    pub needs_onboarding: Vec<u64>,
}

/// Result of an idempotent update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Updated,
    /// The stored value already matched. Nothing was written.
    Unchanged,
}

/// In-memory cache of the member store file.
#[derive(Debug)]
pub struct MemberStore {
    path: PathBuf,
    records: BTreeMap<u64, MemberRecord>,
}

impl MemberStore {
    /// Loads the store from `path`, creating the file if it does not exist.
    ///
    /// An absent file is seeded with just the header row so later runs never have to
    /// guess whether a missing file means "no members" or "lost data". Rows that cannot
    /// be decoded are skipped and logged; the remaining rows load normally.
    ///
    /// # Arguments
    /// - `path` - Location of the CSV store file
    ///
    /// # Returns
    /// - `Ok((MemberStore, LoadReport))` - Loaded store and what happened while loading
    /// - `Err(StoreError::Persistence)` - File exists but could not be read, or the fresh
    ///   file could not be written
    /// - `Err(StoreError::Codec)` - Reading the CSV stream failed mid-file
    pub fn load(path: impl Into<PathBuf>) -> Result<(Self, LoadReport), StoreError> {
        let path = path.into();

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::info!("Member store {} doesn't exist, creating it", path.display());
                let store = Self::empty(path);
                store.persist()?;
                let report = LoadReport {
                    created: true,
                    ..Default::default()
                };
                return Ok((store, report));
            }
            Err(source) => return Err(StoreError::Persistence { path, source }),
        };

        let decoded = codec::decode(BufReader::new(file)).map_err(|source| StoreError::Codec {
            path: path.clone(),
            source,
        })?;

        for skipped in &decoded.skipped {
            tracing::warn!(
                "Skipping malformed row at {}:{}: {}",
                path.display(),
                skipped.line,
                skipped.error
            );
        }

        let records: BTreeMap<u64, MemberRecord> = decoded
            .records
            .into_iter()
            .map(|record| (record.id, record))
            .collect();

        tracing::info!(
            "Loaded {} member record(s) from {}",
            records.len(),
            path.display()
        );

        let report = LoadReport {
            loaded: records.len(),
            skipped: decoded.skipped,
            created: false,
        };

        Ok((Self { path, records }, report))
    }

    /// Creates an empty store that will persist to `path`. Nothing is written.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: BTreeMap::new(),
        }
    }

    pub fn into_shared(self) -> SharedMemberStore {
        Arc::new(Mutex::new(self))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in member ID order.
    pub fn records(&self) -> impl Iterator<Item = &MemberRecord> {
        self.records.values()
    }

    pub fn get(&self, member_id: u64) -> Result<&MemberRecord, StoreError> {
        self.records
            .get(&member_id)
            .ok_or(StoreError::NotFound(member_id))
    }

    /// Writes the whole table to disk.
    ///
    /// The table is written to a sibling temporary file which then replaces the store
    /// file, so a crash mid-write leaves the previous file intact.
    pub fn persist(&self) -> Result<(), StoreError> {
        let tmp_path = self.tmp_path();

        let file = File::create(&tmp_path).map_err(|source| StoreError::Persistence {
            path: tmp_path.clone(),
            source,
        })?;
        codec::encode(&file, self.records.values()).map_err(|source| StoreError::Codec {
            path: tmp_path.clone(),
            source,
        })?;
        file.sync_all().map_err(|source| StoreError::Persistence {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| StoreError::Persistence {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(
            "Persisted {} member record(s) to {}",
            self.records.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Records a member observed joining the guild.
    ///
    /// Creates a default record for an unknown member and persists it. A known member
    /// only gets their display name refreshed; their strikes and status are kept.
    ///
    /// # Returns
    /// - `Ok(true)` - A new record was created
    /// - `Ok(false)` - The member was already known
    /// - `Err(StoreError)` - Persisting the new record failed
    pub fn observe_member(
        &mut self,
        member_id: u64,
        display_name: &str,
    ) -> Result<bool, StoreError> {
        if self.records.contains_key(&member_id) {
            self.refresh_display_name(member_id, display_name)?;
            return Ok(false);
        }

        self.commit(MemberRecord::new(member_id, display_name))?;
        Ok(true)
    }

    /// Brings the table in line with the current guild member list.
    ///
    /// Members without a record get a default one with their status inferred from the
    /// member or guest role they hold. Known members get their display name refreshed,
    /// and a stored `Unset` status is filled in from their roles. A stored `Member` or
    /// `Guest` status is kept even if the roles disagree; live role changes are applied
    /// through [`MemberStore::set_membership_status`] by the role sync callback.
    ///
    /// The table is persisted once after all members are processed.
    pub fn reconcile(
        &mut self,
        members: &[GuildMemberSnapshot],
        roles: &RoleConfig,
    ) -> Result<ReconcileReport, StoreError> {
        let previous = self.records.clone();
        let mut report = ReconcileReport::default();

        for member in members {
            let inferred = member.membership_status(roles);

            match self.records.get_mut(&member.id) {
                Some(record) => {
                    if record.display_name != member.display_name {
                        record.display_name = member.display_name.clone();
                        report.renamed.push(member.id);
                    }
                    if record.status == MembershipStatus::Unset {
                        record.status = inferred;
                    }
                }
                None => {
                    let mut record = MemberRecord::new(member.id, member.display_name.clone());
                    record.status = inferred;
                    self.records.insert(member.id, record);
                    report.added.push(member.id);
                }
            }

            if !member.bot && inferred == MembershipStatus::Unset {
                report.needs_onboarding.push(member.id);
            }
        }

        if let Err(err) = self.persist() {
            self.records = previous;
            return Err(err);
        }

        tracing::info!(
            "Reconciled {} guild member(s): {} added, {} renamed",
            members.len(),
            report.added.len(),
            report.renamed.len()
        );

        Ok(report)
    }

    /// Updates a member's stored display name.
    pub fn refresh_display_name(
        &mut self,
        member_id: u64,
        display_name: &str,
    ) -> Result<Change, StoreError> {
        let record = self.get(member_id)?;
        if record.display_name == display_name {
            return Ok(Change::Unchanged);
        }

        let mut updated = record.clone();
        updated.display_name = display_name.to_string();
        self.commit(updated)?;
        Ok(Change::Updated)
    }

    /// Sets a member's membership status.
    ///
    /// # Returns
    /// - `Ok(Change::Updated)` - The status changed and was persisted
    /// - `Ok(Change::Unchanged)` - The status was already set to `status`
    /// - `Err(StoreError)` - Unknown member or the write failed
    pub fn set_membership_status(
        &mut self,
        member_id: u64,
        status: MembershipStatus,
    ) -> Result<Change, StoreError> {
        let record = self.get(member_id)?;
        if record.status == status {
            return Ok(Change::Unchanged);
        }

        let mut updated = record.clone();
        updated.status = status;
        self.commit(updated)?;
        Ok(Change::Updated)
    }

    /// Strike level the next [`MemberStore::issue_strike`] would move the member to.
    ///
    /// Returns `None` when the member is already at the maximum level.
    pub fn next_strike_level(&self, member_id: u64) -> Result<Option<u8>, StoreError> {
        let count = self.get(member_id)?.strike_count;
        Ok((count < MAX_STRIKES).then_some(count + 1))
    }

    /// Advances a member exactly one strike level.
    ///
    /// Level 3 carries a temporary ban of [`TEMPORARY_BAN_DAYS`] from `now`, level 4 a
    /// permanent ban. The new state is persisted before the consequence is returned.
    ///
    /// # Arguments
    /// - `member_id` - Member receiving the strike
    /// - `reason` - Free-text reason stored against the new level
    /// - `now` - Current UTC time, used for the temporary ban expiry
    ///
    /// # Returns
    /// - `Ok(StrikeOutcome::Issued)` - New level and the consequence to carry out
    /// - `Ok(StrikeOutcome::AlreadyMaximal)` - Member is permanently banned, nothing changed
    /// - `Err(StoreError::MissingReason)` - `reason` is blank
    /// - `Err(StoreError)` - Unknown member or the write failed
    pub fn issue_strike(
        &mut self,
        member_id: u64,
        reason: &str,
        now: NaiveDateTime,
    ) -> Result<StrikeOutcome, StoreError> {
        let record = self.get(member_id)?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(StoreError::MissingReason(member_id));
        }
        if record.strike_count >= MAX_STRIKES {
            return Ok(StrikeOutcome::AlreadyMaximal);
        }

        let mut updated = record.clone();
        let level = updated.strike_count + 1;
        updated.strike_count = level;
        updated.strike_reasons[usize::from(level) - 1] = reason.to_string();

        let consequence = match level {
            3 => {
                let until = truncate_to_minute(now + Duration::days(TEMPORARY_BAN_DAYS));
                updated.ban_expiry = BanExpiry::At(until);
                StrikeConsequence::TemporaryBan { until }
            }
            MAX_STRIKES => {
                updated.ban_expiry = BanExpiry::Never;
                StrikeConsequence::PermanentBan
            }
            tier => StrikeConsequence::Tier(tier),
        };

        self.commit(updated)?;
        Ok(StrikeOutcome::Issued { level, consequence })
    }

    /// Reverses exactly one strike level.
    ///
    /// Clearing a third strike whose temporary ban is still running also clears the
    /// expiry and asks the caller to lift the ban. Clearing a permanent ban is not
    /// supported.
    pub fn clear_strike(&mut self, member_id: u64) -> Result<ClearOutcome, StoreError> {
        let record = self.get(member_id)?;
        let level = record.strike_count;

        if level == 0 {
            return Ok(ClearOutcome::NoStrikes);
        }
        if level >= MAX_STRIKES {
            return Ok(ClearOutcome::PermanentBanLocked);
        }

        let mut updated = record.clone();
        updated.strike_reasons[usize::from(level) - 1].clear();
        updated.strike_count = level - 1;

        // Level 3 without an expiry means the ban was already swept.
        let lift_ban = matches!(record.ban_expiry, BanExpiry::At(_));
        if lift_ban {
            updated.ban_expiry = BanExpiry::None;
        }

        let remaining = level - 1;
        self.commit(updated)?;

        Ok(ClearOutcome::Cleared {
            level: remaining,
            consequence: ClearConsequence {
                tier: (remaining > 0).then_some(remaining),
                lift_ban,
            },
        })
    }

    /// Sets a member's ban expiry directly.
    ///
    /// A timed expiry requires strike level 3 and a permanent one level 4, so the store
    /// never holds a ban the strike ladder does not explain. Clearing is always allowed.
    pub fn set_ban_expiry(&mut self, member_id: u64, expiry: BanExpiry) -> Result<(), StoreError> {
        let record = self.get(member_id)?;

        let allowed = match expiry {
            BanExpiry::None => true,
            BanExpiry::At(_) => record.strike_count == 3,
            BanExpiry::Never => record.strike_count == MAX_STRIKES,
        };
        if !allowed {
            return Err(StoreError::InvalidBanExpiry {
                member_id,
                strike_count: record.strike_count,
            });
        }
        if record.ban_expiry == expiry {
            return Ok(());
        }

        let mut updated = record.clone();
        updated.ban_expiry = expiry;
        self.commit(updated)
    }

    /// Members whose timed ban has run out at `now`, as `(id, display_name)` pairs.
    pub fn expired_bans(&self, now: NaiveDateTime) -> Vec<(u64, String)> {
        self.records
            .values()
            .filter(|record| record.ban_expiry.is_expired(now))
            .map(|record| (record.id, record.display_name.clone()))
            .collect()
    }

    /// Clears a member's ban expiry in memory if it has run out at `now`.
    ///
    /// Does not persist. Returns `false` without touching the record when the member is
    /// unknown or the ban is no longer expired, which makes repeated calls harmless.
    pub fn lift_expired_ban(&mut self, member_id: u64, now: NaiveDateTime) -> bool {
        match self.records.get_mut(&member_id) {
            Some(record) if record.ban_expiry.is_expired(now) => {
                record.ban_expiry = BanExpiry::None;
                true
            }
            _ => false,
        }
    }

    /// Inserts `record`, persists, and restores the previous value if the write fails.
    fn commit(&mut self, record: MemberRecord) -> Result<(), StoreError> {
        let member_id = record.id;
        let previous = self.records.insert(member_id, record);

        if let Err(err) = self.persist() {
            match previous {
                Some(previous) => self.records.insert(member_id, previous),
                None => self.records.remove(&member_id),
            };
            return Err(err);
        }

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
