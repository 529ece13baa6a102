//! JSON-backed cookie store.
//!
//! `JsonCookieStore` persists **all sites'** cookie jars in a single JSON file
//! on disk. Jars it hands out are wrapped in [`PersistentCookieJar`], so every
//! mutation writes a snapshot back to the file.
//!
//! ### Design
//! - One file for all sites (`CookieStoreFile { sites: BTreeMap<String, DefaultCookieJar> }`).
//! - In-memory cache of handed-out jars so repeated lookups share state.
//! - The store keeps a weak self handle (`store_self`) so persistent jars can
//!   call back into `persist_site_from_snapshot` without keeping it alive.
//!
//! ### I/O characteristics
//! - Each persist **reads then rewrites** the whole file through a temporary
//!   file and a rename.
//! - A missing file reads as empty. A corrupt file reads as empty and is
//!   overwritten by the next persist.
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cookies::persistent_cookie_jar::PersistentCookieJar;
use crate::cookies::store::{site_key, CookieStore};
use crate::cookies::{CookieJarHandle, DefaultCookieJar};

/// On-disk representation of all sites' cookie jars.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CookieStoreFile {
    sites: BTreeMap<String, DefaultCookieJar>,
}

pub struct JsonCookieStore {
    /// Path to the JSON file where cookies are stored.
    path: PathBuf,

    /// Jars handed out so far, per site key.
    jars: RwLock<HashMap<String, CookieJarHandle>>,

    /// Weak self handle, so `PersistentCookieJar` can call back into this store.
    store_self: Weak<JsonCookieStore>,
}

impl JsonCookieStore {
    /// Creates (or opens) a JSON cookie store at `path`.
    ///
    /// If the file does not exist, an empty store is written.
    pub fn new(path: PathBuf) -> Result<Arc<Self>> {
        let store = Arc::new_cyclic(|me| Self {
            path,
            jars: RwLock::new(HashMap::new()),
            store_self: me.clone(),
        });

        if !store.path.exists() {
            store.save_file(&CookieStoreFile::default())?;
        }

        Ok(store)
    }

    /// Loads the full cookie store file. Missing or corrupt files load as empty.
    fn load_file(&self) -> Result<CookieStoreFile> {
        if !self.path.exists() {
            return Ok(CookieStoreFile::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("reading cookie store {}", self.path.display()))?;

        Ok(serde_json::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("Cookie store {} is corrupt, starting empty: {e}", self.path.display());
            CookieStoreFile::default()
        }))
    }

    fn save_file(&self, store_file: &CookieStoreFile) -> Result<()> {
        let contents = serde_json::to_string_pretty(store_file).context("serializing cookie store")?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, contents).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing cookie store {}", self.path.display()))?;
        Ok(())
    }
}

impl CookieStore for JsonCookieStore {
    /// Returns the jar for `site`, loading it from disk on first use.
    ///
    /// A site with no stored cookies, or a store file that cannot be read,
    /// yields an empty jar.
    fn jar_for(&self, site: &url::Origin) -> CookieJarHandle {
        let key = site_key(site);

        if let Some(jar) = self.jars.read().unwrap_or_else(PoisonError::into_inner).get(&key) {
            return jar.clone();
        }

        let jar = match self.load_file() {
            Ok(mut file) => file.sites.remove(&key).unwrap_or_default(),
            Err(e) => {
                log::warn!("Cookie store: cannot load jar for {key}: {e:#}");
                DefaultCookieJar::new()
            }
        };

        let handle: CookieJarHandle = Arc::new(RwLock::new(PersistentCookieJar::new(
            key.clone(),
            jar.into_handle(),
            self.store_self.clone(),
        )));

        self.jars
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(handle)
            .clone()
    }

    /// Persists a snapshot of `site`'s jar, rewriting the file.
    fn persist_site_from_snapshot(&self, site: &str, snapshot: &DefaultCookieJar) -> Result<()> {
        let mut store_file = self.load_file()?;
        store_file.sites.insert(site.to_string(), snapshot.clone());
        self.save_file(&store_file)
    }

    /// Removes `site` from both the in-memory cache and the on-disk file.
    fn remove_site(&self, site: &url::Origin) -> Result<()> {
        let key = site_key(site);
        self.jars.write().unwrap_or_else(PoisonError::into_inner).remove(&key);

        let mut file = self.load_file()?;
        if file.sites.remove(&key).is_some() {
            self.save_file(&file)?;
        }
        Ok(())
    }
}
