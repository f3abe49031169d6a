//! Free-text questions answered from reference documents
//!
//! The generative service sits behind [`AnswerProvider`]. A reply that does
//! not really answer the question escalates to a staff contact instead of
//! failing.

use crate::contacts::{default_contact, extract_from_document, ContactInfo};
use crate::documents::{filter_for_category, merge_documents, Document, CONTACT_DOCUMENT};
use crate::error::AssistError;
use async_trait::async_trait;
use faq_category::CategoryRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Sentinel the service is instructed to return when the documents are silent
pub const NO_ANSWER: &str = "NO_ANSWER";

/// Phrases that mark a reply as "not found" even without the sentinel
pub const NOT_FOUND_PHRASES: [&str; 2] = ["문서에서 해당 정보를 찾을 수 없습니다", "해당 정보를 찾을 수 없습니다"];

/// Replies this short (in characters, after trimming) are not answers
pub const MIN_ANSWER_CHARS: usize = 10;

/// Message shown before offering a contact
pub const ESCALATION_MESSAGE: &str =
    "해당 질문에 대한 답변은 담당자에게 직접 확인하시기 바랍니다. 담당자 연락처를 알려드릴까요?";

/// Question sent to the answer service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    /// The user's question
    pub question: String,
    /// Merged reference documents
    pub document_context: String,
    /// Label of the selected category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_label: Option<String>,
}

impl AnswerRequest {
    /// Create a request without a category
    #[must_use]
    pub fn new(question: impl Into<String>, document_context: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            document_context: document_context.into(),
            category_label: None,
        }
    }

    /// With the selected category's label
    #[must_use]
    pub fn with_category_label(mut self, label: impl Into<String>) -> Self {
        self.category_label = Some(label.into());
        self
    }

    /// Reject requests that cannot be answered
    ///
    /// # Errors
    /// - [`AssistError::EmptyQuestion`] if the question is blank
    /// - [`AssistError::EmptyContext`] if there is no document context
    pub fn validate(&self) -> Result<(), AssistError> {
        if self.question.trim().is_empty() {
            return Err(AssistError::EmptyQuestion);
        }
        if self.document_context.trim().is_empty() {
            return Err(AssistError::EmptyContext);
        }
        Ok(())
    }
}

/// The service's answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerReply {
    /// Whether `answer` actually answers the question
    pub has_answer: bool,
    /// Raw reply text
    pub answer: String,
}

/// Classify raw reply text
#[must_use]
pub fn reply_from_text(text: impl Into<String>) -> AnswerReply {
    let answer = text.into();
    let has_answer = !answer.contains(NO_ANSWER)
        && !NOT_FOUND_PHRASES.iter().any(|phrase| answer.contains(phrase))
        && answer.trim().chars().count() > MIN_ANSWER_CHARS;
    AnswerReply { has_answer, answer }
}

/// Generative answer service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Answer a validated request
    async fn answer(&self, request: &AnswerRequest) -> Result<AnswerReply, AssistError>;
}

/// Answer service reached over HTTP
///
/// Posts the request as JSON and expects an [`AnswerReply`] back.
#[derive(Debug, Clone)]
pub struct HttpAnswerProvider {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpAnswerProvider {
    /// Create provider posting to `endpoint`
    #[must_use]
    pub fn new(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    /// Endpoint URL
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnswerProvider for HttpAnswerProvider {
    async fn answer(&self, request: &AnswerRequest) -> Result<AnswerReply, AssistError> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, status = status.as_u16(), "answer service failed");
            return Err(AssistError::Status(status.as_u16()));
        }
        Ok(response.json::<AnswerReply>().await?)
    }
}

/// Result of a free-text question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AssistOutcome {
    /// The documents answered the question
    Answered {
        /// Answer text
        answer: String,
    },
    /// No usable answer; offer a contact
    Escalate {
        /// Message shown to the user
        message: String,
        /// Who to call
        contact: ContactInfo,
    },
}

/// Answers questions from documents, escalating when they are silent
#[derive(Debug)]
pub struct Assistant<P> {
    provider: P,
    documents: Vec<Document>,
}

impl<P: AnswerProvider> Assistant<P> {
    /// Create assistant over `documents`
    #[must_use]
    pub fn new(provider: P, documents: Vec<Document>) -> Self {
        Self { provider, documents }
    }

    /// Reference documents
    #[inline]
    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Contact for `category`, preferring the contact document
    #[must_use]
    pub fn contact_for(&self, category: Option<&str>) -> ContactInfo {
        self.documents
            .iter()
            .find(|doc| doc.name == CONTACT_DOCUMENT)
            .map_or_else(
                || default_contact(category),
                |doc| extract_from_document(&doc.content, category),
            )
    }

    /// Ask `question` within `category`
    ///
    /// # Errors
    /// Returns error if the question is blank, no document applies, or the
    /// service cannot be reached
    pub async fn ask(&self, question: &str, category: Option<&CategoryRecord>) -> Result<AssistOutcome, AssistError> {
        let category_id = category.map(|record| record.id.as_str());
        let context = merge_documents(filter_for_category(&self.documents, category_id));

        let mut request = AnswerRequest::new(question, context);
        if let Some(record) = category {
            request = request.with_category_label(record.label.clone());
        }
        request.validate()?;

        let reply = self.provider.answer(&request).await?;
        if reply.has_answer {
            debug!(category = ?category_id, "question answered");
            return Ok(AssistOutcome::Answered { answer: reply.answer });
        }

        info!(category = ?category_id, "no answer in documents, escalating");
        Ok(AssistOutcome::Escalate {
            message: ESCALATION_MESSAGE.to_string(),
            contact: self.contact_for(category_id),
        })
    }
}
