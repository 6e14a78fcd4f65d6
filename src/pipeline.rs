use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::delivery::DeliveryScheduler;
use crate::extract::{self, keywords};
use crate::gate;
use crate::invitation::MeetingDetails;
use crate::locale::{self, Locale};
use crate::ocr::OcrAdapter;
use crate::platform::{BotIdentity, InboundMessage, MediaSource, ReplySender, ReplyTarget};
use crate::reply::ReplyTemplates;
use crate::text::NormalizedText;

/// A reply ready to be delivered
struct PreparedReply {
    locale: Locale,
    details: MeetingDetails,
    text: String,
}

/// Recognizes meeting invitations and answers them.
/// Platform-agnostic: the transport supplies media download and sending.
pub struct InvitationPipeline {
    ocr: OcrAdapter,
    templates: ReplyTemplates,
    delivery: DeliveryScheduler,
}

impl InvitationPipeline {
    pub fn new(ocr: OcrAdapter, templates: ReplyTemplates, delivery: DeliveryScheduler) -> Self {
        Self {
            ocr,
            templates,
            delivery,
        }
    }

    /// Handle one inbound message. Returns true when it was recognized as an
    /// invitation and a confirmation reply was sent or attempted.
    pub async fn process(
        &self,
        message: &InboundMessage,
        identity: &BotIdentity,
        media: &dyn MediaSource,
        replier: &dyn ReplySender,
    ) -> bool {
        if !gate::is_eligible(message, identity) {
            debug!(sender = %message.sender_id, "Skipping ineligible message");
            return false;
        }
        let started = Instant::now();

        let raw = match self.resolve_text(message, media).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(sender = %message.sender_id, "No usable text in message");
                return false;
            }
            Err(e) => {
                warn!(sender = %message.sender_id, "Could not read message media: {:#}", e);
                return false;
            }
        };

        let text = NormalizedText::new(&raw);
        if !keywords::is_invitation(&text.flat) {
            debug!(sender = %message.sender_id, "Not an invitation");
            return false;
        }

        let target = message.reply_target();
        let prepared = match catch_unwind(AssertUnwindSafe(|| self.prepare_reply(&text))) {
            Ok(Ok(prepared)) => prepared,
            Ok(Err(e)) => {
                error!(sender = %message.sender_id, "Invitation could not be processed: {:#}", e);
                self.send_fallback(replier, &target).await;
                return false;
            }
            Err(panic) => {
                error!(
                    sender = %message.sender_id,
                    "Invitation processing panicked: {}",
                    panic_message(panic.as_ref())
                );
                self.send_fallback(replier, &target).await;
                return false;
            }
        };

        info!(
            sender = %message.sender_id,
            locale = %prepared.locale,
            meeting_type = %prepared.details.meeting_type,
            date = %prepared.details.date,
            time = %prepared.details.time,
            location = %prepared.details.location,
            "Invitation received"
        );
        match serde_json::to_string(&prepared.details) {
            Ok(json) => info!("Meeting details: {}", json),
            Err(e) => warn!("Failed to serialize meeting details: {}", e),
        }

        let outcome = self.delivery.deliver(replier, &target, &prepared.text).await;
        info!(
            sender = %message.sender_id,
            delivered = outcome.is_delivered(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Invitation handled"
        );
        true
    }

    /// Message text, or the OCR text of its image when it carries one.
    async fn resolve_text(
        &self,
        message: &InboundMessage,
        media: &dyn MediaSource,
    ) -> Result<Option<String>> {
        let has_image = message.media.as_ref().is_some_and(|m| m.is_image());
        if has_image {
            if let Some(payload) = media
                .download(message)
                .await
                .context("Failed to download media")?
            {
                return self.ocr.extract_text(&payload).await;
            }
        }

        let body = message.text.trim();
        Ok((!body.is_empty()).then(|| body.to_string()))
    }

    fn prepare_reply(&self, text: &NormalizedText) -> Result<PreparedReply> {
        let classification = locale::classify(&text.flat);
        let locale = classification.locale;
        debug!(
            %locale,
            javanese = classification.javanese_score,
            indonesian = classification.indonesian_score,
            "Locale classified"
        );

        let template = self.templates.get(locale);
        let fields = extract::extract(&text.lines, locale, &template.default_location);
        let details = MeetingDetails::from_fields(&fields, locale);
        details.validate()?;

        let text = self.templates.compose(&details, locale);
        Ok(PreparedReply {
            locale,
            details,
            text,
        })
    }

    async fn send_fallback(&self, replier: &dyn ReplySender, target: &ReplyTarget) {
        let text = self.templates.compose_fallback();
        let outcome = self.delivery.deliver(replier, target, &text).await;
        if !outcome.is_delivered() {
            warn!(chat = %target.chat_id, "Fallback reply was not delivered");
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
