// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable storage of typed [`WaveObj`]s with versioned optimistic
//! concurrency, collecting updates into an [`UpdateCtx`] for the caller to
//! turn into a coherent batch of broker events on commit.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::params;
use tracing::{debug, info};
use tsc_core::{merge_meta, Meta, ORef, Oid, Otype, WaveObj, WaveObjHeader};

use crate::db::Db;
use crate::error::StoreError;
use crate::txctx::UpdateCtx;
use crate::waveobjupdate::WaveObjUpdate;

/// The maximum number of `Block.parent_oref` hops `find_tab_for_block`
/// climbs before giving up.
const MAX_PARENT_HOPS: u32 = 5;

pub struct ObjectStore {
    db: Db,
}

impl ObjectStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self { db: Db::open(path)? })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self { db: Db::open_in_memory()? })
    }

    /// Insert `obj`. Requires `oid` already set; sets `version = 1`. Fails
    /// with [`StoreError::AlreadyExists`] if the `(otype, oid)` pair is
    /// already present, or if `otype` is a singleton with an existing row.
    pub fn insert(&self, ctx: &mut UpdateCtx, mut obj: WaveObj) -> Result<i64, StoreError> {
        let otype = obj.otype();
        let oid = obj.oid();
        let oref = ORef::new(otype, oid);
        self.db.with_table(otype, |conn| {
            if otype.is_singleton() {
                let existing: i64 = conn.query_row(
                    &format!("SELECT COUNT(*) FROM {}", otype.table_name()),
                    [],
                    |row| row.get(0),
                )?;
                if existing > 0 {
                    return Err(StoreError::AlreadyExists(oref));
                }
            }
            let exists: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM {} WHERE oid = ?1", otype.table_name()),
                params![oid.as_str()],
                |row| row.get(0),
            )?;
            if exists > 0 {
                return Err(StoreError::AlreadyExists(oref));
            }
            obj.header_mut().set_version(1);
            let data = obj.to_json()?;
            conn.execute(
                &format!("INSERT INTO {} (oid, version, data) VALUES (?1, ?2, ?3)", otype.table_name()),
                params![oid.as_str(), 1i64, data],
            )?;
            Ok(())
        })?;
        info!(%oref, "object inserted");
        ctx.record(WaveObjUpdate::updated(obj));
        Ok(1)
    }

    /// Read the current row, increment the stored version, write the new
    /// JSON. Fails with [`StoreError::NotFound`] if absent.
    pub fn update(&self, ctx: &mut UpdateCtx, obj: WaveObj) -> Result<i64, StoreError> {
        self.update_with_version(ctx, obj, 0)
    }

    /// Same as [`ObjectStore::update`] but fails with
    /// [`StoreError::VersionMismatch`] if `expected_version > 0` and the
    /// stored version differs.
    pub fn update_with_version(&self, ctx: &mut UpdateCtx, mut obj: WaveObj, expected_version: i64) -> Result<i64, StoreError> {
        let otype = obj.otype();
        let oid = obj.oid();
        let oref = ORef::new(otype, oid);
        let new_version = self.db.with_table(otype, |conn| {
            let current: i64 = conn
                .query_row(
                    &format!("SELECT version FROM {} WHERE oid = ?1", otype.table_name()),
                    params![oid.as_str()],
                    |row| row.get(0),
                )
                .map_err(|_| StoreError::NotFound(oref))?;
            if expected_version > 0 && expected_version != current {
                return Err(StoreError::VersionMismatch { oref, expected: expected_version, found: current });
            }
            let new_version = current + 1;
            obj.header_mut().set_version(new_version);
            let data = obj.to_json()?;
            conn.execute(
                &format!("UPDATE {} SET version = ?2, data = ?3 WHERE oid = ?1", otype.table_name()),
                params![oid.as_str(), new_version, data],
            )?;
            Ok(new_version)
        })?;
        debug!(%oref, version = new_version, "object updated");
        ctx.record(WaveObjUpdate::updated(obj));
        Ok(new_version)
    }

    /// Atomic read-check-merge-write: merge `patch` into the object's
    /// `meta` unless `lock_key` is set to `true` in the current meta, in
    /// which case fail with [`StoreError::ObjectLocked`]. `merge_special`
    /// disables the `:*` wildcard-clear merge rule for this patch (see the
    /// `mergeSpecial` open question in the design notes — this store treats
    /// it as "disable wildcard merge").
    pub fn update_meta_if_not_locked(
        &self,
        ctx: &mut UpdateCtx,
        oref: ORef,
        patch: &Meta,
        lock_key: &str,
        expected_version: i64,
        merge_special: bool,
    ) -> Result<i64, StoreError> {
        let otype = oref.otype;
        let oid = oref.oid;
        let (obj, new_version) = self.db.with_table(otype, |conn| {
            let data: Vec<u8> = conn
                .query_row(
                    &format!("SELECT data FROM {} WHERE oid = ?1", otype.table_name()),
                    params![oid.as_str()],
                    |row| row.get(0),
                )
                .map_err(|_| StoreError::NotFound(oref))?;
            let mut obj = WaveObj::from_json(&data)?;
            let current = obj.header().version();
            if expected_version > 0 && expected_version != current {
                return Err(StoreError::VersionMismatch { oref, expected: expected_version, found: current });
            }
            if obj.header().meta().get(lock_key) == Some(&serde_json::Value::Bool(true)) {
                return Err(StoreError::ObjectLocked(oref));
            }
            merge_meta(obj.header_mut().meta_mut(), patch, merge_special);
            let new_version = current + 1;
            obj.header_mut().set_version(new_version);
            let new_data = obj.to_json()?;
            conn.execute(
                &format!("UPDATE {} SET version = ?2, data = ?3 WHERE oid = ?1", otype.table_name()),
                params![oid.as_str(), new_version, new_data],
            )?;
            Ok((obj, new_version))
        })?;
        ctx.record(WaveObjUpdate::updated(obj));
        Ok(new_version)
    }

    pub fn get(&self, oref: ORef) -> Result<WaveObj, StoreError> {
        let otype = oref.otype;
        self.db.with_table(otype, |conn| {
            let data: Vec<u8> = conn
                .query_row(
                    &format!("SELECT data FROM {} WHERE oid = ?1", otype.table_name()),
                    params![oref.oid.as_str()],
                    |row| row.get(0),
                )
                .map_err(|_| StoreError::NotFound(oref))?;
            Ok(WaveObj::from_json(&data)?)
        })
    }

    /// Like [`ObjectStore::get`] — absence is already an error, this just
    /// names the "must exist" call site more clearly for callers.
    pub fn must_get(&self, oref: ORef) -> Result<WaveObj, StoreError> {
        self.get(oref)
    }

    /// Fetch a singleton object addressed by otype alone.
    pub fn get_singleton(&self, otype: Otype, singleton_oid: Oid) -> Result<WaveObj, StoreError> {
        self.get(ORef::new(otype, singleton_oid))
    }

    /// Batch-fetch, grouping lookups by otype into one `WHERE oid IN (...)`
    /// query per otype.
    pub fn select_orefs(&self, orefs: &[ORef]) -> Result<HashMap<ORef, WaveObj>, StoreError> {
        let mut by_otype: HashMap<Otype, Vec<Oid>> = HashMap::new();
        for oref in orefs {
            by_otype.entry(oref.otype).or_default().push(oref.oid);
        }
        let mut result = HashMap::new();
        for (otype, oids) in by_otype {
            self.db.with_table(otype, |conn| {
                let placeholders = oids.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
                let sql = format!("SELECT oid, data FROM {} WHERE oid IN ({})", otype.table_name(), placeholders);
                let mut stmt = conn.prepare(&sql)?;
                let oid_strs: Vec<String> = oids.iter().map(|o| o.as_str().to_string()).collect();
                let params: Vec<&dyn rusqlite::ToSql> =
                    oid_strs.iter().map(|s| s as &dyn rusqlite::ToSql).collect();
                let rows = stmt.query_map(params.as_slice(), |row| {
                    let oid_str: String = row.get(0)?;
                    let data: Vec<u8> = row.get(1)?;
                    Ok((oid_str, data))
                })?;
                for row in rows {
                    let (oid_str, data) = row?;
                    let obj = WaveObj::from_json(&data)?;
                    let oid: Oid = oid_str.parse().map_err(|_| StoreError::CorruptRow(oid_str.clone()))?;
                    result.insert(ORef::new(otype, oid), obj);
                }
                Ok(())
            })?;
        }
        Ok(result)
    }

    /// Prefix lookup across all otype tables. An 8-character prefix does a
    /// `LIKE 'prefix%'` match per table; anything else is treated as an
    /// exact oid. Fails with [`StoreError::NotFound`] on no hit, or
    /// [`StoreError::AmbiguousPrefix`] on more than one.
    pub fn resolve_easy_oid(&self, prefix: &str) -> Result<ORef, StoreError> {
        let like_mode = prefix.len() == 8;
        self.db.with_all_tables(|conn| {
            let mut hits: Vec<ORef> = Vec::new();
            for otype in Otype::ALL {
                let sql = if like_mode {
                    format!("SELECT oid FROM {} WHERE oid LIKE ?1", otype.table_name())
                } else {
                    format!("SELECT oid FROM {} WHERE oid = ?1", otype.table_name())
                };
                let pattern = if like_mode { format!("{prefix}%") } else { prefix.to_string() };
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![pattern], |row| row.get::<_, String>(0))?;
                for row in rows {
                    let oid_str = row?;
                    if let Ok(oid) = oid_str.parse::<Oid>() {
                        hits.push(ORef::new(otype, oid));
                    }
                }
            }
            match hits.len() {
                0 => Err(StoreError::NotFoundPrefix(prefix.to_string())),
                1 => Ok(hits[0]),
                _ => Err(StoreError::AmbiguousPrefix(prefix.to_string())),
            }
        })
    }

    /// Remove `oref`'s row and record a delete. Eviction of any associated
    /// file-store zone is an external collaborator's concern (§4.1); this
    /// store only logs that the delete happened.
    pub fn delete(&self, ctx: &mut UpdateCtx, oref: ORef) -> Result<(), StoreError> {
        let otype = oref.otype;
        self.db.with_table(otype, |conn| {
            let changed = conn.execute(
                &format!("DELETE FROM {} WHERE oid = ?1", otype.table_name()),
                params![oref.oid.as_str()],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(oref));
            }
            Ok(())
        })?;
        info!(%oref, "object deleted");
        ctx.record(WaveObjUpdate::deleted(otype, oref.oid));
        Ok(())
    }

    /// Climb `Block.parent_oref` until an `otype == tab` reference is found,
    /// bounded to [`MAX_PARENT_HOPS`] hops.
    pub fn find_tab_for_block(&self, block_id: Oid) -> Result<ORef, StoreError> {
        let mut current = ORef::new(Otype::Block, block_id);
        for _ in 0..MAX_PARENT_HOPS {
            let WaveObj::Block(block) = self.get(current)? else {
                return Err(StoreError::UnexpectedOtype { oref: current, expected: Otype::Block, found: current.otype });
            };
            if block.parent_oref.otype == Otype::Tab {
                return Ok(block.parent_oref);
            }
            if block.parent_oref.otype != Otype::Block {
                return Err(StoreError::UnexpectedOtype {
                    oref: block.parent_oref,
                    expected: Otype::Tab,
                    found: block.parent_oref.otype,
                });
            }
            current = block.parent_oref;
        }
        Err(StoreError::ParentChainTooDeep(ORef::new(Otype::Block, block_id)))
    }

    /// Find the workspace whose `tab_ids` contains `tab_id`.
    pub fn find_workspace_for_tab(&self, tab_id: Oid) -> Result<ORef, StoreError> {
        self.db.with_table(Otype::Workspace, |conn| {
            let mut stmt = conn.prepare(&format!("SELECT oid, data FROM {}", Otype::Workspace.table_name()))?;
            let rows = stmt.query_map([], |row| {
                let oid_str: String = row.get(0)?;
                let data: Vec<u8> = row.get(1)?;
                Ok((oid_str, data))
            })?;
            for row in rows {
                let (oid_str, data) = row?;
                let WaveObj::Workspace(ws) = WaveObj::from_json(&data)? else { continue };
                if ws.tab_ids.contains(&tab_id) {
                    let oid: Oid = oid_str.parse().map_err(|_| StoreError::CorruptRow(oid_str.clone()))?;
                    return Ok(ORef::new(Otype::Workspace, oid));
                }
            }
            Err(StoreError::NotFound(ORef::new(Otype::Tab, tab_id)))
        })
    }

    /// Find the window whose `workspace_id` matches `workspace_id`.
    pub fn find_window_for_workspace(&self, workspace_id: Oid) -> Result<ORef, StoreError> {
        self.db.with_table(Otype::Window, |conn| {
            let mut stmt = conn.prepare(&format!("SELECT oid, data FROM {}", Otype::Window.table_name()))?;
            let rows = stmt.query_map([], |row| {
                let oid_str: String = row.get(0)?;
                let data: Vec<u8> = row.get(1)?;
                Ok((oid_str, data))
            })?;
            for row in rows {
                let (oid_str, data) = row?;
                let WaveObj::Window(win) = WaveObj::from_json(&data)? else { continue };
                if win.workspace_id == workspace_id {
                    let oid: Oid = oid_str.parse().map_err(|_| StoreError::CorruptRow(oid_str.clone()))?;
                    return Ok(ORef::new(Otype::Window, oid));
                }
            }
            Err(StoreError::NotFound(ORef::new(Otype::Workspace, workspace_id)))
        })
    }

    /// Row counts per otype, for operator introspection.
    pub fn table_counts(&self) -> Result<HashMap<Otype, i64>, StoreError> {
        let mut counts = HashMap::new();
        for otype in Otype::ALL {
            counts.insert(otype, self.db.table_count(otype)?);
        }
        Ok(counts)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
