//! Upload controller — holds the selected file, runs one parse at a time and
//! keeps the status the page reads back.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::affinda_client::ResumeParser;
use crate::errors::UploadError;
use crate::parsing::models::{ParsedResume, SelectedFile, UploadStatus};
use crate::parsing::normalize::normalize;

pub struct UploadAndParseController {
    parser: Arc<dyn ResumeParser>,
    selected: Mutex<Option<SelectedFile>>,
    status: watch::Sender<UploadStatus>,
}

impl UploadAndParseController {
    pub fn new(parser: Arc<dyn ResumeParser>) -> Self {
        let (status, _) = watch::channel(UploadStatus::Idle);
        Self {
            parser,
            selected: Mutex::new(None),
            status,
        }
    }

    /// Replaces the selected file. The current status is left alone.
    pub fn select_file(&self, file: SelectedFile) {
        debug!(file = %file.file_name, kind = ?file.kind, "File selected");
        *self.selected.lock().unwrap_or_else(PoisonError::into_inner) = Some(file);
    }

    pub fn selected_file(&self) -> Option<SelectedFile> {
        self.selected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn status(&self) -> UploadStatus {
        self.status.borrow().clone()
    }

    /// Uploads the selected file and normalizes the answer.
    ///
    /// Ends in `Success` or `Failure`, never `Loading`. A call made while a
    /// previous one is still loading is rejected and changes nothing.
    pub async fn submit(&self) -> Result<ParsedResume, UploadError> {
        let Some(file) = self.selected_file() else {
            return self.settle(Err(UploadError::NoFileSelected));
        };

        let mut in_flight = false;
        self.status.send_if_modified(|status| {
            if status.is_loading() {
                in_flight = true;
                false
            } else {
                *status = UploadStatus::Loading;
                true
            }
        });
        if in_flight {
            warn!("Submit ignored: an upload is already in flight");
            return Err(UploadError::AlreadyInFlight);
        }

        let span = info_span!(
            "upload",
            upload_id = %Uuid::new_v4(),
            file = %file.file_name,
            kind = ?file.kind,
            bytes = file.content.len(),
        );

        let result = async {
            info!("Submitting resume to parser");
            self.parser.parse(&file).await.and_then(normalize)
        }
        .instrument(span)
        .await;

        self.settle(result)
    }

    fn settle(
        &self,
        result: Result<ParsedResume, UploadError>,
    ) -> Result<ParsedResume, UploadError> {
        let next = match &result {
            Ok(resume) => {
                info!(name = %resume.name, skills = resume.skills.len(), "Resume parsed");
                UploadStatus::Success(resume.clone())
            }
            Err(e) => {
                if let UploadError::Unknown(detail) = e {
                    warn!("Upload failed: {detail}");
                }
                UploadStatus::Failure(e.user_message())
            }
        };
        debug!(?next, "Upload status changed");
        self.status.send_replace(next);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::raw::RawResumeResponse;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use tokio::sync::Notify;

    /// Replays canned results and records which files it was handed.
    #[derive(Default)]
    struct ScriptedParser {
        replies: Mutex<VecDeque<Result<RawResumeResponse, UploadError>>>,
        seen: Mutex<Vec<String>>,
        gate: Option<Arc<Notify>>,
    }

    impl ScriptedParser {
        fn with(replies: Vec<Result<RawResumeResponse, UploadError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                ..Default::default()
            })
        }

        fn calls(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ResumeParser for ScriptedParser {
        async fn parse(&self, file: &SelectedFile) -> Result<RawResumeResponse, UploadError> {
            self.seen.lock().unwrap().push(file.file_name.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected parse call")
        }
    }

    fn ok(name: &str) -> Result<RawResumeResponse, UploadError> {
        Ok(serde_json::from_value(serde_json::json!({
            "data": {
                "name": {"raw": name},
                "emails": [],
                "skills": [{"id": 7, "name": "Rust"}, {"id": 8, "name": "Go"}],
                "certifications": [],
                "summary": "Engineer"
            }
        }))
        .unwrap())
    }

    fn pdf(name: &str) -> SelectedFile {
        SelectedFile::new(name, b"%PDF".to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_submit_without_file_makes_no_call() {
        let parser = ScriptedParser::with(vec![]);
        let controller = UploadAndParseController::new(parser.clone());

        let err = controller.submit().await.unwrap_err();

        assert_eq!(err, UploadError::NoFileSelected);
        assert_eq!(
            controller.status(),
            UploadStatus::Failure("Please select a file first.".to_string())
        );
        assert!(parser.calls().is_empty());
    }

    #[tokio::test]
    async fn test_successful_submit() {
        let parser = ScriptedParser::with(vec![ok("Jane Doe")]);
        let controller = UploadAndParseController::new(parser.clone());
        controller.select_file(pdf("jane.pdf"));

        let resume = controller.submit().await.unwrap();

        assert_eq!(resume.name, "Jane Doe");
        assert_eq!(resume.skills, vec!["Rust", "Go"]);
        assert_eq!(controller.status(), UploadStatus::Success(resume));
        assert_eq!(parser.calls(), vec!["jane.pdf"]);
    }

    #[tokio::test]
    async fn test_transport_message_becomes_failure() {
        let parser = ScriptedParser::with(vec![Err(UploadError::Transport {
            status: Some(400),
            message: Some("Invalid file type".to_string()),
        })]);
        let controller = UploadAndParseController::new(parser);
        controller.select_file(pdf("jane.pdf"));

        controller.submit().await.unwrap_err();

        assert_eq!(
            controller.status(),
            UploadStatus::Failure("Invalid file type".to_string())
        );
    }

    #[tokio::test]
    async fn test_transport_without_message_uses_fallback() {
        let parser = ScriptedParser::with(vec![Err(UploadError::Transport {
            status: None,
            message: None,
        })]);
        let controller = UploadAndParseController::new(parser);
        controller.select_file(pdf("jane.pdf"));

        controller.submit().await.unwrap_err();

        assert_eq!(
            controller.status(),
            UploadStatus::Failure("An unknown error occurred".to_string())
        );
    }

    #[tokio::test]
    async fn test_malformed_payload_fails_whole_upload() {
        let parser = ScriptedParser::with(vec![Ok(RawResumeResponse::default())]);
        let controller = UploadAndParseController::new(parser);
        controller.select_file(pdf("jane.pdf"));

        let err = controller.submit().await.unwrap_err();

        assert!(matches!(err, UploadError::Unknown(_)));
        assert_eq!(
            controller.status(),
            UploadStatus::Failure("An unknown error occurred".to_string())
        );
    }

    #[tokio::test]
    async fn test_status_passes_through_loading_and_settles() {
        let parser = ScriptedParser::with(vec![
            Err(UploadError::Transport {
                status: Some(500),
                message: None,
            }),
            ok("Jane Doe"),
        ]);
        let controller = UploadAndParseController::new(parser);
        controller.select_file(pdf("jane.pdf"));

        controller.submit().await.unwrap_err();
        assert!(!controller.status().is_loading());

        controller.submit().await.unwrap();
        assert!(matches!(controller.status(), UploadStatus::Success(_)));
    }

    #[tokio::test]
    async fn test_selection_keeps_status_and_next_submit_uses_new_file() {
        let parser = ScriptedParser::with(vec![
            Err(UploadError::Transport {
                status: Some(422),
                message: Some("Unreadable document".to_string()),
            }),
            ok("Sam Lee"),
        ]);
        let controller = UploadAndParseController::new(parser.clone());

        controller.select_file(pdf("first.pdf"));
        controller.submit().await.unwrap_err();

        controller.select_file(SelectedFile::new("second.docx", b"PK".to_vec()).unwrap());
        assert_eq!(
            controller.status(),
            UploadStatus::Failure("Unreadable document".to_string())
        );

        let resume = controller.submit().await.unwrap();
        assert_eq!(resume.name, "Sam Lee");
        assert_eq!(parser.calls(), vec!["first.pdf", "second.docx"]);
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_file_for_resubmit() {
        let parser = ScriptedParser::with(vec![
            Err(UploadError::Transport {
                status: None,
                message: None,
            }),
            ok("Jane Doe"),
        ]);
        let controller = UploadAndParseController::new(parser.clone());
        controller.select_file(pdf("jane.pdf"));

        controller.submit().await.unwrap_err();
        assert_eq!(controller.selected_file(), Some(pdf("jane.pdf")));

        controller.submit().await.unwrap();
        assert_eq!(parser.calls(), vec!["jane.pdf", "jane.pdf"]);
    }

    #[tokio::test]
    async fn test_submit_while_loading_is_rejected() {
        let gate = Arc::new(Notify::new());
        let parser = Arc::new(ScriptedParser {
            replies: Mutex::new(vec![ok("Jane Doe")].into()),
            gate: Some(gate.clone()),
            ..Default::default()
        });
        let controller = Arc::new(UploadAndParseController::new(parser.clone()));
        controller.select_file(pdf("jane.pdf"));

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit().await }
        });
        while !controller.status().is_loading() {
            tokio::task::yield_now().await;
        }

        let err = controller.submit().await.unwrap_err();
        assert_eq!(err, UploadError::AlreadyInFlight);
        assert!(controller.status().is_loading());

        gate.notify_one();
        let resume = first.await.unwrap().unwrap();
        assert_eq!(resume.name, "Jane Doe");
        assert_eq!(parser.calls(), vec!["jane.pdf"]);
        assert!(matches!(controller.status(), UploadStatus::Success(_)));
    }
}
