use std::sync::mpsc;
use std::thread;

use crate::assets::source::data_uri_from_base64;
use crate::foundation::error::{SignVizError, SignVizResult};

/// Returned when the text service answers with an empty slogan.
pub const EMPTY_CONCEPT_FALLBACK: &str = "Sign Concept";
/// Returned when the text service fails.
pub const FAILED_CONCEPT_FALLBACK: &str = "Custom Signage";

/// Inline image payload from a generation service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineImage {
    pub mime: String,
    /// Base64-encoded bytes.
    pub data_b64: String,
}

/// External text/image generation service.
pub trait SignGenerator {
    /// Complete a text prompt.
    fn complete_text(&mut self, prompt: &str) -> SignVizResult<String>;

    /// Produce an image for a prompt; `None` when the response carried no image data.
    fn generate_image(&mut self, prompt: &str) -> SignVizResult<Option<InlineImage>>;
}

pub fn concept_prompt(request: &str) -> String {
    format!(
        "Generate a creative and catchy slogan or short description for a shop sign based on \
         this request: \"{request}\". Keep it short (under 10 words) and suitable for signage."
    )
}

pub fn image_prompt(request: &str) -> String {
    format!(
        "A professional 2D vector graphic logo or sign design for: {request}. White background, \
         high contrast, flat design, suitable for a shop front."
    )
}

/// Slogan for a sign request. Never fails: service errors become a fallback string.
pub fn generate_concept(service: &mut dyn SignGenerator, request: &str) -> String {
    match service.complete_text(&concept_prompt(request)) {
        Ok(text) if text.trim().is_empty() => EMPTY_CONCEPT_FALLBACK.to_string(),
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "concept generation failed, using fallback");
            FAILED_CONCEPT_FALLBACK.to_string()
        }
    }
}

/// Image for a sign request as a data URI. Service errors are propagated.
pub fn generate_image(service: &mut dyn SignGenerator, request: &str) -> SignVizResult<Option<String>> {
    let image = service.generate_image(&image_prompt(request)).map_err(|e| {
        tracing::error!(error = %e, "image generation failed");
        match e {
            SignVizError::Generation(_) => e,
            other => SignVizError::generation(other.to_string()),
        }
    })?;
    Ok(image.map(|img| data_uri_from_base64(&img.mime, &img.data_b64)))
}

/// Identifies one generation request; later tickets compare greater.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationTicket(pub u64);

/// Output of one generation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generated {
    pub ticket: GenerationTicket,
    pub concept: String,
    pub image_uri: Option<String>,
}

/// Issues tickets and remembers which request is the most recent.
///
/// Requests may complete in any order; only the result carrying the latest ticket is allowed to
/// replace the sign.
#[derive(Clone, Debug, Default)]
pub struct GenerationTracker {
    issued: u64,
}

impl GenerationTracker {
    pub fn issue(&mut self) -> GenerationTicket {
        self.issued += 1;
        GenerationTicket(self.issued)
    }

    pub fn latest(&self) -> Option<GenerationTicket> {
        (self.issued > 0).then_some(GenerationTicket(self.issued))
    }

    pub fn is_latest(&self, ticket: GenerationTicket) -> bool {
        self.latest() == Some(ticket)
    }
}

/// Run both generation calls for a request. Blank requests produce nothing.
pub fn generate(
    service: &mut dyn SignGenerator,
    ticket: GenerationTicket,
    request: &str,
) -> SignVizResult<Option<Generated>> {
    if request.trim().is_empty() {
        return Ok(None);
    }
    let concept = generate_concept(service, request);
    let image_uri = generate_image(service, request)?;
    Ok(Some(Generated {
        ticket,
        concept,
        image_uri,
    }))
}

/// A generation running on a background thread.
#[derive(Debug)]
pub struct PendingGeneration {
    ticket: GenerationTicket,
    rx: mpsc::Receiver<SignVizResult<Option<Generated>>>,
}

impl PendingGeneration {
    pub fn ticket(&self) -> GenerationTicket {
        self.ticket
    }

    /// Non-blocking poll; `None` while still running.
    pub fn try_take(&self) -> Option<SignVizResult<Option<Generated>>> {
        match self.rx.try_recv() {
            Ok(r) => Some(r),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(SignVizError::generation(
                "generation worker exited without a result",
            ))),
        }
    }

    /// Block until the worker finishes.
    pub fn wait(self) -> SignVizResult<Option<Generated>> {
        self.rx.recv().map_err(|_| {
            SignVizError::generation("generation worker exited without a result")
        })?
    }
}

/// Start a generation in the background and return immediately.
pub fn spawn_generation<G>(
    mut service: G,
    tracker: &mut GenerationTracker,
    request: impl Into<String>,
) -> PendingGeneration
where
    G: SignGenerator + Send + 'static,
{
    let ticket = tracker.issue();
    let request = request.into();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = generate(&mut service, ticket, &request);
        // the receiver may have been dropped; the result is simply discarded then
        let _ = tx.send(result);
    });
    PendingGeneration { ticket, rx }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/service.rs"]
mod tests;
