//! Verse view state: the currently displayed verse plus user-facing notices.
//!
//! Failures never clear what is on screen; they only add a notice. Results
//! that arrive for a superseded or closed view are dropped.

use crate::client::{ClientError, VerseSource};
use crate::verse::{Verse, VerseRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    InvalidInput,
    NotFound,
    Upstream,
    Network,
    MissingApiKey,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl From<&ClientError> for Notice {
    fn from(err: &ClientError) -> Self {
        let kind = match err {
            ClientError::InvalidCoordinates(_) => NoticeKind::InvalidInput,
            ClientError::NotFound(_) => NoticeKind::NotFound,
            ClientError::Upstream { .. } | ClientError::Decode(_) => NoticeKind::Upstream,
            ClientError::Http(_) => NoticeKind::Network,
            ClientError::MissingApiKey => NoticeKind::MissingApiKey,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// Identifies one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

pub struct Reader<S> {
    source: S,
    current: Option<Verse>,
    notices: Vec<Notice>,
    latest: u64,
    open: bool,
}

impl<S: VerseSource> Reader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            current: None,
            notices: Vec::new(),
            latest: 0,
            open: true,
        }
    }

    pub fn current(&self) -> Option<&Verse> {
        self.current.as_ref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Start a request; any earlier ticket becomes stale.
    pub fn begin(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    /// Apply a result if its ticket is still the latest one. Returns whether
    /// the result was applied.
    pub fn complete(&mut self, ticket: Ticket, result: Result<Verse, ClientError>) -> bool {
        if !self.open || ticket.0 != self.latest {
            tracing::warn!(ticket = ticket.0, latest = self.latest, "dropping stale verse result");
            return false;
        }
        match result {
            Ok(verse) => self.current = Some(verse),
            Err(err) => self.notify(Notice::from(&err)),
        }
        true
    }

    /// Fetch a verse and show it; on failure keep the previous verse.
    pub async fn open(&mut self, r: VerseRef) -> Option<&Verse> {
        let ticket = self.begin();
        let result = self.source.fetch(r).await;
        self.complete(ticket, result);
        self.current.as_ref()
    }

    /// Validate raw user input before fetching.
    pub async fn open_raw(&mut self, mandala: i64, hymn: i64, verse: i64) -> Option<&Verse> {
        match VerseRef::new(mandala, hymn, verse) {
            Ok(r) => self.open(r).await,
            Err(err) => {
                self.notify(Notice::from(&ClientError::from(err)));
                self.current.as_ref()
            }
        }
    }

    pub fn notify(&mut self, notice: Notice) {
        tracing::warn!(kind = ?notice.kind, "{}", notice.message);
        self.notices.push(notice);
    }

    /// Tear the view down; results still in flight will be ignored.
    pub fn close(&mut self) {
        self.open = false;
        self.latest += 1;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}
