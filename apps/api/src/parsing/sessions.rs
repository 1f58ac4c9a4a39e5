//! Upload sessions — one controller per open page, keyed by the id the page
//! generates on load. Idle sessions expire; a session that is still loading
//! is never dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;
use uuid::Uuid;

use crate::affinda_client::ResumeParser;
use crate::parsing::controller::UploadAndParseController;

struct Session {
    controller: Arc<UploadAndParseController>,
    last_used: Instant,
}

pub struct UploadSessions {
    parser: Arc<dyn ResumeParser>,
    ttl: Duration,
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl UploadSessions {
    pub fn new(parser: Arc<dyn ResumeParser>, ttl: Duration) -> Self {
        Self {
            parser,
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the session's controller, creating it on first use.
    pub fn controller(&self, id: Uuid) -> Arc<UploadAndParseController> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        self.prune(&mut sessions, now);

        let session = sessions.entry(id).or_insert_with(|| {
            debug!(session = %id, "Upload session opened");
            Session {
                controller: Arc::new(UploadAndParseController::new(self.parser.clone())),
                last_used: now,
            }
        });
        session.last_used = now;
        session.controller.clone()
    }

    /// Looks up an existing session without creating one.
    pub fn get(&self, id: Uuid) -> Option<Arc<UploadAndParseController>> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        self.prune(&mut sessions, now);

        sessions.get_mut(&id).map(|session| {
            session.last_used = now;
            session.controller.clone()
        })
    }

    /// A controller that belongs to no session, for clients that send no id.
    pub fn detached(&self) -> Arc<UploadAndParseController> {
        Arc::new(UploadAndParseController::new(self.parser.clone()))
    }

    fn prune(&self, sessions: &mut HashMap<Uuid, Session>, now: Instant) {
        sessions.retain(|id, session| {
            let keep = now.duration_since(session.last_used) < self.ttl
                || session.controller.status().is_loading();
            if !keep {
                debug!(session = %id, "Upload session expired");
            }
            keep
        });
    }
}
