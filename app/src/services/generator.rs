//! Card generation pipeline and latest-input-wins request slots.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use ab_glyph::FontVec;

use qr_image::{
    CaptionFont, QR_SIZE, QUIET_ZONE_MODULES, QrImageError, TtfCaptionFont, compose,
    encode_module_matrix, rasterize,
};
use qr_payload::{ContactCard, WifiCredential, caption, vcard, wifi};

use crate::app::SharedState;
use crate::services::fonts::{FontError, FontService};

/// The three kinds of cards; each has its own generation slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Website,
    Wifi,
    Contact,
}

impl CardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardKind::Website => "website",
            CardKind::Wifi => "wifi",
            CardKind::Contact => "contact",
        }
    }
}

/// One generation request, capturing the form input as submitted.
#[derive(Debug, Clone)]
pub enum CardRequest {
    Website { url: String },
    Wifi(WifiCredential),
    Contact(ContactCard),
}

impl CardRequest {
    pub fn kind(&self) -> CardKind {
        match self {
            CardRequest::Website { .. } => CardKind::Website,
            CardRequest::Wifi(_) => CardKind::Wifi,
            CardRequest::Contact(_) => CardKind::Contact,
        }
    }

    /// Reject input that is not ready to encode: a blank URL, a blank
    /// SSID or password, or a contact missing a name or any way to reach
    /// them.
    fn validate(&self) -> Result<(), GenerateError> {
        let complete = match self {
            CardRequest::Website { url } => !url.trim().is_empty(),
            CardRequest::Wifi(credential) => {
                !credential.ssid.trim().is_empty() && !credential.password.trim().is_empty()
            }
            CardRequest::Contact(card) => card.is_complete(),
        };
        if complete {
            Ok(())
        } else {
            Err(GenerateError::IncompleteInput)
        }
    }

    /// The exact text encoded into the QR code.
    pub fn payload(&self) -> String {
        match self {
            CardRequest::Website { url } => url.clone(),
            CardRequest::Wifi(credential) => wifi::config_string(credential),
            CardRequest::Contact(card) => vcard::contact_string(card),
        }
    }

    /// The caption drawn beneath the QR code.
    pub fn caption(&self) -> String {
        match self {
            CardRequest::Website { url } => url.clone(),
            CardRequest::Wifi(credential) => caption::wifi_caption(credential),
            CardRequest::Contact(card) => caption::contact_caption(card),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("required fields are missing or blank")]
    IncompleteInput,
    #[error("caption font unavailable: {0}")]
    Font(#[from] FontError),
    #[error("failed to render card: {0}")]
    Render(#[from] QrImageError),
    #[error("generation worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// A finished card: encoded PNG plus the bookkeeping that decides whether
/// it is still the newest result for its kind.
#[derive(Debug, Clone)]
pub struct GeneratedCard {
    pub kind: CardKind,
    pub generation: u64,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// Tracker for one card kind: the newest generation handed out and the
/// most recent result that was still current when it finished.
#[derive(Default)]
struct Slot {
    counter: AtomicU64,
    latest: Mutex<Option<GeneratedCard>>,
}

impl Slot {
    /// Claim the next generation number. Later claims always compare
    /// greater.
    fn begin(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Store `card` unless a newer generation was claimed while it
    /// rendered. Returns the card back when it was accepted.
    fn commit(&self, card: GeneratedCard) -> Option<GeneratedCard> {
        let mut latest = self.latest.lock().expect("generation slot poisoned");
        if self.counter.load(Ordering::SeqCst) != card.generation {
            return None;
        }
        *latest = Some(card.clone());
        Some(card)
    }

    fn latest(&self) -> Option<GeneratedCard> {
        self.latest.lock().expect("generation slot poisoned").clone()
    }
}

#[derive(Default)]
struct GenerationSlots {
    website: Slot,
    wifi: Slot,
    contact: Slot,
}

impl GenerationSlots {
    fn slot(&self, kind: CardKind) -> &Slot {
        match kind {
            CardKind::Website => &self.website,
            CardKind::Wifi => &self.wifi,
            CardKind::Contact => &self.contact,
        }
    }
}

/// Runs render pipelines off the async runtime and keeps the newest
/// finished card per kind.
#[derive(Clone)]
pub struct GeneratorService {
    state: SharedState,
    slots: Arc<GenerationSlots>,
}

impl GeneratorService {
    pub fn new(state: SharedState) -> Self {
        Self {
            state,
            slots: Arc::new(GenerationSlots::default()),
        }
    }

    /// Generate a card using the configured caption font.
    pub async fn generate(
        &self,
        request: CardRequest,
    ) -> Result<Option<GeneratedCard>, GenerateError> {
        let config = self.state.config();
        let font_service =
            FontService::new(self.state.data_dir().clone(), config.font_path.clone());
        let font_data = font_service.load_font_data()?;
        let font = FontVec::try_from_vec(font_data)
            .map_err(|_| GenerateError::Font(FontError::InvalidFont))?;
        let caption_font = TtfCaptionFont::new(font, config.caption_font_size);
        self.generate_with_font(request, caption_font).await
    }

    /// Generate a card with a caller-supplied caption font.
    ///
    /// Validation happens before a generation number is claimed, so
    /// rejected input never invalidates an in-flight render. The render
    /// itself runs on the blocking worker pool; a result that finishes
    /// after newer input claimed the slot is discarded and `Ok(None)` is
    /// returned.
    pub async fn generate_with_font<F>(
        &self,
        request: CardRequest,
        font: F,
    ) -> Result<Option<GeneratedCard>, GenerateError>
    where
        F: CaptionFont + Send + 'static,
    {
        request.validate()?;

        let kind = request.kind();
        let generation = self.slots.slot(kind).begin();

        let card =
            tokio::task::spawn_blocking(move || render_card(request, generation, &font)).await??;

        match self.slots.slot(kind).commit(card) {
            Some(card) => {
                tracing::info!(
                    kind = kind.as_str(),
                    generation,
                    width = card.width,
                    height = card.height,
                    "card generated"
                );
                Ok(Some(card))
            }
            None => {
                tracing::debug!(kind = kind.as_str(), generation, "stale card discarded");
                Ok(None)
            }
        }
    }

    /// The newest finished card for `kind`, if any completed yet.
    pub fn latest(&self, kind: CardKind) -> Option<GeneratedCard> {
        self.slots.slot(kind).latest()
    }
}

/// The blocking render pipeline: payload, module matrix, raster, caption
/// composition, PNG encode.
fn render_card(
    request: CardRequest,
    generation: u64,
    font: &impl CaptionFont,
) -> Result<GeneratedCard, GenerateError> {
    let payload = request.payload();
    let matrix = encode_module_matrix(&payload)?;
    let qr = rasterize(&matrix, QR_SIZE, QUIET_ZONE_MODULES);
    let composite = compose(&qr, &request.caption(), font);
    let png = composite.to_png()?;

    Ok(GeneratedCard {
        kind: request.kind(),
        generation,
        width: composite.width(),
        height: composite.height(),
        png,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use image::{Rgba, RgbaImage};

    /// Fixed-metric font so tests run without any font files installed.
    struct StubFont;

    impl CaptionFont for StubFont {
        fn line_height(&self) -> u32 {
            20
        }

        fn measure(&self, text: &str) -> u32 {
            10 * text.chars().count() as u32
        }

        fn draw_line(&self, _: &mut RgbaImage, _: Rgba<u8>, _: i32, _: i32, _: &str) {}
    }

    fn service() -> GeneratorService {
        GeneratorService::new(SharedState::new(AppConfig::default()))
    }

    fn card_stub(generation: u64) -> GeneratedCard {
        GeneratedCard {
            kind: CardKind::Website,
            generation,
            width: 1,
            height: 1,
            png: Vec::new(),
        }
    }

    #[tokio::test]
    async fn generates_website_card_at_expected_size() {
        let generator = service();
        let request = CardRequest::Website {
            url: "https://example.com".into(),
        };
        let card = generator
            .generate_with_font(request, StubFont)
            .await
            .expect("failed to generate")
            .expect("card was discarded as stale");

        assert_eq!(card.kind, CardKind::Website);
        assert_eq!(card.generation, 1);
        assert_eq!(card.width, 512);
        // One caption line: 512 + line height + padding.
        assert_eq!(card.height, 512 + 20 + 2 * 16);
        assert_eq!(&card.png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[tokio::test]
    async fn wifi_card_caption_occupies_two_lines() {
        let generator = service();
        let request = CardRequest::Wifi(WifiCredential::new("HomeNet", "hunter2"));
        let card = generator
            .generate_with_font(request, StubFont)
            .await
            .expect("failed to generate")
            .expect("card was discarded as stale");

        // "Network: ..." and "Password: ..." each fit one line.
        assert_eq!(card.height, 512 + 2 * 20 + 2 + 2 * 16);
    }

    #[tokio::test]
    async fn blank_input_is_rejected_before_claiming_a_generation() {
        let generator = service();
        let err = generator
            .generate_with_font(CardRequest::Website { url: "   ".into() }, StubFont)
            .await
            .expect_err("blank URL must not generate");

        assert!(matches!(err, GenerateError::IncompleteInput));
        assert!(generator.latest(CardKind::Website).is_none());
    }

    #[tokio::test]
    async fn wifi_requires_both_ssid_and_password() {
        let generator = service();
        for credential in [
            WifiCredential::new("", "secret"),
            WifiCredential::new("net", "  "),
        ] {
            let err = generator
                .generate_with_font(CardRequest::Wifi(credential), StubFont)
                .await
                .expect_err("incomplete Wi-Fi input must not generate");
            assert!(matches!(err, GenerateError::IncompleteInput));
        }
    }

    #[tokio::test]
    async fn contact_requires_name_and_a_reach_method() {
        let generator = service();
        let err = generator
            .generate_with_font(
                CardRequest::Contact(ContactCard::new("Ada", "", "")),
                StubFont,
            )
            .await
            .expect_err("unreachable contact must not generate");
        assert!(matches!(err, GenerateError::IncompleteInput));
    }

    #[tokio::test]
    async fn latest_tracks_the_newest_request_per_kind() {
        let generator = service();
        for url in ["https://a.example", "https://b.example"] {
            generator
                .generate_with_font(CardRequest::Website { url: url.into() }, StubFont)
                .await
                .expect("failed to generate")
                .expect("card was discarded as stale");
        }

        let latest = generator.latest(CardKind::Website).expect("no card stored");
        assert_eq!(latest.generation, 2);
        assert!(generator.latest(CardKind::Wifi).is_none());
        assert!(generator.latest(CardKind::Contact).is_none());
    }

    #[test]
    fn stale_results_never_replace_newer_ones() {
        let slot = Slot::default();
        let g1 = slot.begin();
        let g2 = slot.begin();

        assert!(slot.commit(card_stub(g2)).is_some());
        // The older render finishes afterwards and must be dropped.
        assert!(slot.commit(card_stub(g1)).is_none());
        assert_eq!(slot.latest().expect("slot empty").generation, g2);
    }

    #[test]
    fn result_still_current_at_commit_is_kept() {
        let slot = Slot::default();
        let g = slot.begin();
        assert!(slot.commit(card_stub(g)).is_some());
        assert_eq!(slot.latest().expect("slot empty").generation, g);
    }

    #[test]
    fn in_flight_result_is_dropped_once_newer_input_arrives() {
        let slot = Slot::default();
        let g1 = slot.begin();
        // Newer input arrives while g1 renders; g1 must not be stored.
        let _g2 = slot.begin();
        assert!(slot.commit(card_stub(g1)).is_none());
        assert!(slot.latest().is_none());
    }
}
