//! Molts: Crabber posts.

use crate::{
    cache::{record_id, EntityId},
    client::ClientInner,
    crab::Crab,
    metadata::{ListOptions, RequestMetadata},
    Client, Error, Result,
};
use http::Method;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, Weak};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// How long after posting a molt can still be edited.
pub const EDIT_WINDOW: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Deserialize)]
struct AuthorRef {
    id: EntityId,
}

/// Raw molt fields as sent by the server.
#[derive(Debug, Clone, Deserialize)]
struct MoltRecord {
    id: EntityId,
    author: AuthorRef,
    #[serde(default)]
    content: String,
    #[serde(default)]
    crabtags: Vec<String>,
    #[serde(default)]
    mentions: Vec<String>,
    #[serde(default)]
    timestamp: i64,
    #[serde(default)]
    edited: bool,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    likes: u64,
    #[serde(default)]
    remolts: u64,
    #[serde(default)]
    quotes: u64,
    #[serde(default)]
    replying_to: Option<EntityId>,
    #[serde(default)]
    quoted_molt: Option<EntityId>,
}

impl MoltRecord {
    fn parse(record: Value) -> Result<Self> {
        record_id(&record, "molt")?;
        serde_json::from_value(record.clone()).map_err(|e| Error::DeserializationFailed {
            raw_response: record.to_string(),
            serde_error: e.to_string(),
            status: http::StatusCode::OK,
        })
    }
}

/// A Crabber post.
///
/// Like crabs, molts are canonical per id within a client. The record is
/// replaced in place by a successful [`Molt::edit`], and [`Molt::delete`]
/// marks the object deleted for good.
pub struct Molt {
    client: Weak<ClientInner>,
    base_url: String,
    record: RwLock<MoltRecord>,
    deleted: AtomicBool,
}

impl Molt {
    pub(crate) fn new(record: Value, client: &Client) -> Result<Self> {
        Ok(Self {
            client: Arc::downgrade(&client.inner),
            base_url: client.base_url().to_string(),
            record: RwLock::new(MoltRecord::parse(record)?),
            deleted: AtomicBool::new(false),
        })
    }

    fn record(&self) -> RwLockReadGuard<'_, MoltRecord> {
        self.record.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn client(&self) -> Result<Client> {
        self.client
            .upgrade()
            .map(Client::from_inner)
            .ok_or(Error::ClientDropped)
    }

    /// This molt's id.
    pub fn id(&self) -> EntityId {
        self.record().id
    }

    /// Id of the crab who posted this molt.
    pub fn author_id(&self) -> EntityId {
        self.record().author.id
    }

    /// The crab who posted this molt.
    pub async fn author(&self) -> Result<Option<Arc<Crab>>> {
        self.client()?.get_crab(self.author_id()).await
    }

    /// The text content.
    pub fn content(&self) -> String {
        self.record().content.clone()
    }

    /// Crabtags used in the content.
    pub fn crabtags(&self) -> Vec<String> {
        self.record().crabtags.clone()
    }

    /// Usernames mentioned in the content.
    pub fn mentions(&self) -> Vec<String> {
        self.record().mentions.clone()
    }

    /// Posting time as a UTC timestamp.
    pub fn timestamp(&self) -> i64 {
        self.record().timestamp
    }

    /// Posting time.
    pub fn posted_at(&self) -> SystemTime {
        UNIX_EPOCH
            .checked_add(Duration::from_secs(self.timestamp().max(0) as u64))
            .unwrap_or(UNIX_EPOCH)
    }

    /// Whether the server will still accept edits. Molts are editable for
    /// five minutes after posting.
    pub fn is_editable(&self) -> bool {
        match SystemTime::now().duration_since(self.posted_at()) {
            Ok(age) => age < EDIT_WINDOW,
            // Posted "in the future" by a skewed clock.
            Err(_) => true,
        }
    }

    /// Whether this molt has been edited.
    pub fn is_edited(&self) -> bool {
        self.record().edited
    }

    /// Whether this molt quotes another.
    pub fn is_quote(&self) -> bool {
        self.record().quoted_molt.is_some()
    }

    /// Whether this molt replies to another.
    pub fn is_reply(&self) -> bool {
        self.record().replying_to.is_some()
    }

    /// Absolute URL of the attached image, if any.
    pub fn image_url(&self) -> Option<String> {
        self.record()
            .image
            .as_ref()
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}{}", self.base_url, path))
    }

    /// Number of likes.
    pub fn likes(&self) -> u64 {
        self.record().likes
    }

    /// Number of remolts.
    pub fn remolts(&self) -> u64 {
        self.record().remolts
    }

    /// Number of molts quoting this one.
    pub fn quotes(&self) -> u64 {
        self.record().quotes
    }

    /// Whether this molt was deleted through this client.
    pub fn is_deleted(&self) -> bool {
        self.deleted.load(Ordering::SeqCst)
    }

    /// The molt this one quotes.
    pub async fn quoted_molt(&self) -> Result<Option<Arc<Molt>>> {
        let quoted = self.record().quoted_molt;
        match quoted {
            Some(id) => self.client()?.get_molt(id).await,
            None => Ok(None),
        }
    }

    /// The molt this one replies to.
    pub async fn replying_to(&self) -> Result<Option<Arc<Molt>>> {
        let original = self.record().replying_to;
        match original {
            Some(id) => self.client()?.get_molt(id).await,
            None => Ok(None),
        }
    }

    /// One page of replies to this molt.
    pub async fn replies(&self, opts: &ListOptions) -> Result<Vec<Arc<Molt>>> {
        self.client()?
            .molt_page(
                RequestMetadata::new(Method::GET, format!("/molts/{}/replies/", self.id())),
                opts,
            )
            .await
    }

    async fn act(&self, method: Method, action: &str) -> Result<bool> {
        self.client()?
            .action(method, format!("/molts/{}/{}/", self.id(), action))
            .await
    }

    /// Likes this molt as the authenticated crab.
    pub async fn like(&self) -> Result<bool> {
        self.act(Method::POST, "like").await
    }

    /// Removes the authenticated crab's like.
    pub async fn unlike(&self) -> Result<bool> {
        self.act(Method::POST, "unlike").await
    }

    /// Remolts this molt as the authenticated crab.
    pub async fn remolt(&self) -> Result<bool> {
        self.act(Method::POST, "remolt").await
    }

    /// Removes the authenticated crab's remolt.
    pub async fn unremolt(&self) -> Result<bool> {
        self.act(Method::DELETE, "remolt").await
    }

    /// Bookmarks this molt as the authenticated crab.
    pub async fn bookmark(&self) -> Result<bool> {
        self.act(Method::POST, "bookmark").await
    }

    /// Removes this molt from the authenticated crab's bookmarks.
    pub async fn unbookmark(&self) -> Result<bool> {
        self.act(Method::POST, "unbookmark").await
    }

    /// Deletes this molt. Only its author may do so.
    ///
    /// On success the molt is flagged deleted and later
    /// [`Client::get_molt`] lookups report it as absent.
    pub async fn delete(&self) -> Result<bool> {
        let client = self.client()?;
        let deleted = client
            .action(Method::DELETE, format!("/molts/{}/", self.id()))
            .await?;
        if deleted {
            self.deleted.store(true, Ordering::SeqCst);
        }
        Ok(deleted)
    }

    /// Replaces the content, the image, or both.
    ///
    /// On success the server's updated record replaces this molt's record in
    /// place; no new object is created.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyEdit`] if neither argument is given, plus the usage
    /// errors of [`Client::post_molt`].
    pub async fn edit(&self, content: Option<&str>, image_path: Option<&Path>) -> Result<bool> {
        if content.is_none() && image_path.is_none() {
            return Err(Error::EmptyEdit);
        }

        let endpoint = format!("/molts/{}/edit/", self.id());
        let response = self
            .client()?
            .compose(&endpoint, content, image_path)
            .await?;
        if !response.is_ok() {
            return Ok(false);
        }

        let record = MoltRecord::parse(response.json()?)?;
        *self
            .record
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = record;
        Ok(true)
    }

    /// Posts a reply to this molt. Returns `None` if the server rejected it.
    pub async fn reply(&self, content: &str, image_path: Option<&Path>) -> Result<Option<Arc<Molt>>> {
        let client = self.client()?;
        let endpoint = format!("/molts/{}/reply/", self.id());
        let response = client.compose(&endpoint, Some(content), image_path).await?;
        client.created_molt(&response)
    }

    /// Posts a molt quoting this one. Returns `None` if the server rejected
    /// it.
    pub async fn quote(&self, content: &str, image_path: Option<&Path>) -> Result<Option<Arc<Molt>>> {
        let client = self.client()?;
        let endpoint = format!("/molts/{}/quote/", self.id());
        let response = client.compose(&endpoint, Some(content), image_path).await?;
        client.created_molt(&response)
    }
}

impl fmt::Debug for Molt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Molt [{}]>", self.id())
    }
}
