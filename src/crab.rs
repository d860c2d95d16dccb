//! Crabs: Crabber users.

use crate::{
    bio::{Bio, BioState},
    cache::{record_id, EntityId},
    client::ClientInner,
    metadata::{ListOptions, RequestMetadata},
    molt::Molt,
    pagination::Paginator,
    Client, Error, Result,
};
use http::Method;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Raw crab fields as sent by the server.
#[derive(Debug, Clone, Deserialize)]
struct CrabRecord {
    id: EntityId,
    #[serde(default)]
    username: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    followers: u64,
    #[serde(default)]
    following: u64,
    #[serde(default)]
    verified: bool,
    #[serde(default)]
    register_time: i64,
    #[serde(default)]
    bio: Option<Bio>,
}

/// A Crabber user.
///
/// Crabs are only handed out by the [`Client`], which keeps exactly one
/// `Arc<Crab>` per id; comparing two crabs with [`Arc::ptr_eq`] compares the
/// users they represent.
pub struct Crab {
    client: Weak<ClientInner>,
    base_url: String,
    record: RwLock<CrabRecord>,
    bio: RwLock<BioState>,
}

impl Crab {
    pub(crate) fn new(record: Value, client: &Client) -> Result<Self> {
        record_id(&record, "crab")?;
        let mut record: CrabRecord =
            serde_json::from_value(record.clone()).map_err(|e| Error::DeserializationFailed {
                raw_response: record.to_string(),
                serde_error: e.to_string(),
                status: http::StatusCode::OK,
            })?;

        let bio = match record.bio.take() {
            Some(bio) => BioState::Fetched(bio),
            None => BioState::NotFetched,
        };

        Ok(Self {
            client: Arc::downgrade(&client.inner),
            base_url: client.base_url().to_string(),
            record: RwLock::new(record),
            bio: RwLock::new(bio),
        })
    }

    fn record(&self) -> RwLockReadGuard<'_, CrabRecord> {
        self.record.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record_mut(&self) -> RwLockWriteGuard<'_, CrabRecord> {
        self.record.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn bio_state_mut(&self) -> RwLockWriteGuard<'_, BioState> {
        self.bio.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn client(&self) -> Result<Client> {
        self.client
            .upgrade()
            .map(Client::from_inner)
            .ok_or(Error::ClientDropped)
    }

    /// This crab's id.
    pub fn id(&self) -> EntityId {
        self.record().id
    }

    /// This crab's unique username.
    pub fn username(&self) -> String {
        self.record().username.clone()
    }

    /// This crab's display name. Not unique; may contain any Unicode.
    pub fn display_name(&self) -> String {
        self.record().display_name.clone()
    }

    /// Absolute URL of this crab's avatar image.
    pub fn avatar_url(&self) -> Option<String> {
        self.record()
            .avatar
            .as_ref()
            .map(|path| format!("{}{}", self.base_url, path))
    }

    /// Number of followers at the time the record was fetched.
    pub fn follower_count(&self) -> u64 {
        self.record().followers
    }

    /// Number of crabs followed at the time the record was fetched.
    pub fn following_count(&self) -> u64 {
        self.record().following
    }

    /// Whether this crab has been confirmed to be who it claims to be.
    pub fn is_verified(&self) -> bool {
        self.record().verified
    }

    /// Registration time as a UTC timestamp.
    pub fn timestamp(&self) -> i64 {
        self.record().register_time
    }

    /// Registration time.
    pub fn register_time(&self) -> SystemTime {
        let secs = self.timestamp();
        if secs >= 0 {
            UNIX_EPOCH
                .checked_add(Duration::from_secs(secs as u64))
                .unwrap_or(UNIX_EPOCH)
        } else {
            UNIX_EPOCH
                .checked_sub(Duration::from_secs(secs.unsigned_abs()))
                .unwrap_or(UNIX_EPOCH)
        }
    }

    /// What is currently known about this crab's bio, without fetching.
    pub fn bio_state(&self) -> BioState {
        self.bio
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// This crab's bio, fetched on first access if the crab record did not
    /// embed it.
    pub async fn bio(&self) -> Result<Option<Bio>> {
        match self.bio_state() {
            BioState::Fetched(bio) => return Ok(Some(bio)),
            BioState::Absent => return Ok(None),
            BioState::NotFetched => {}
        }

        let response = self.client()?.get(format!("/crabs/{}/bio/", self.id())).await?;
        if response.is_ok() {
            let bio = self.absorb_bio(response.json()?)?;
            return Ok(Some(bio));
        }
        if response.is_not_found() {
            *self.bio_state_mut() = BioState::Absent;
        }
        Ok(None)
    }

    /// Updates the authenticated crab's bio. Only the fields that are set
    /// are sent.
    ///
    /// Returns whether the server accepted the update.
    pub async fn update_bio(&self, bio: Bio) -> Result<bool> {
        match self.client()?.post_bio(self.id(), &bio).await? {
            Some(body) => {
                self.absorb_bio(body)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Stores a bio answer. The server answers with the full crab record,
    /// which also refreshes the other fields; a bare bio is accepted too.
    fn absorb_bio(&self, body: Value) -> Result<Bio> {
        let raw = body.to_string();
        let malformed = |e: serde_json::Error| Error::DeserializationFailed {
            raw_response: raw.clone(),
            serde_error: e.to_string(),
            status: http::StatusCode::OK,
        };

        let bio = if body.get("id").is_some() {
            let mut record: CrabRecord = serde_json::from_value(body).map_err(malformed)?;
            let bio = record.bio.take().unwrap_or_default();
            *self.record_mut() = record;
            bio
        } else {
            serde_json::from_value(body).map_err(malformed)?
        };

        *self.bio_state_mut() = BioState::Fetched(bio.clone());
        Ok(bio)
    }

    /// Every crab following this one.
    pub async fn followers(&self) -> Result<Vec<Arc<Crab>>> {
        self.client()?
            .all_pages(Paginator::new(format!("/crabs/{}/followers/", self.id()), "crabs"))
            .await
    }

    /// Every crab this one follows.
    pub async fn following(&self) -> Result<Vec<Arc<Crab>>> {
        self.client()?
            .all_pages(Paginator::new(format!("/crabs/{}/following/", self.id()), "crabs"))
            .await
    }

    /// Every molt this crab has bookmarked, most recently bookmarked first.
    pub async fn bookmarks(&self) -> Result<Vec<Arc<Molt>>> {
        self.client()?
            .all_pages(Paginator::new(format!("/crabs/{}/bookmarks/", self.id()), "molts"))
            .await
    }

    /// Every molt posted by this crab.
    pub async fn molts(&self) -> Result<Vec<Arc<Molt>>> {
        self.client()?
            .all_pages(Paginator::new(format!("/crabs/{}/molts/", self.id()), "molts"))
            .await
    }

    /// One page of molts posted by this crab.
    pub async fn molts_page(&self, opts: &ListOptions) -> Result<Vec<Arc<Molt>>> {
        self.client()?
            .molt_page(
                RequestMetadata::new(Method::GET, format!("/crabs/{}/molts/", self.id())),
                opts,
            )
            .await
    }

    /// One page of molts mentioning this crab.
    pub async fn mentions(&self, opts: &ListOptions) -> Result<Vec<Arc<Molt>>> {
        self.client()?
            .molts_mentioning(&self.username(), opts)
            .await
    }

    /// One page of molts replying to any of this crab's molts.
    pub async fn replies(&self, opts: &ListOptions) -> Result<Vec<Arc<Molt>>> {
        self.client()?
            .molts_replying_to(&self.username(), opts)
            .await
    }

    /// Follows this crab as the authenticated crab.
    pub async fn follow(&self) -> Result<bool> {
        self.client()?
            .action(Method::POST, format!("/crabs/{}/follow/", self.id()))
            .await
    }

    /// Unfollows this crab as the authenticated crab.
    pub async fn unfollow(&self) -> Result<bool> {
        self.client()?
            .action(Method::POST, format!("/crabs/{}/unfollow/", self.id()))
            .await
    }
}

impl fmt::Debug for Crab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record();
        write!(f, "<Crab @{} [{}]>", record.username, record.id)
    }
}
