use crate::element::{ElementId, ElementKind, Insert, VisualClass};
use crate::error::Result;
use crate::host::Host;
use crate::sequencer::RevealConfig;
use crate::stage::Stage;

const TIMESTAMP_LABEL: &str = "Just now";

/// Guest book: newest wish first, each revealed as it is added.
pub struct WishBoard {
    input: ElementId,
    display: ElementId,
    draft: String,
    reveal: RevealConfig,
    posted: usize,
}

impl WishBoard {
    pub fn new(input: ElementId, display: ElementId, reveal: RevealConfig) -> Self {
        Self {
            input,
            display,
            draft: String::new(),
            reveal,
            posted: 0,
        }
    }

    pub fn input(&self) -> ElementId {
        self.input
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn posted(&self) -> usize {
        self.posted
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Post the current draft. Blank drafts are ignored and leave the input as is.
    pub fn submit(&mut self, stage: &mut Stage, host: &mut Host<'_>) -> Result<Option<ElementId>> {
        let text = self.draft.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let render = &mut *host.render;
        let Some(entry) = render.create_element(self.display, ElementKind::WishEntry, Insert::First)
        else {
            log::warn!("wish display is gone, dropping wish");
            return Ok(None);
        };
        if let Some(body) = render.create_element(entry, ElementKind::Text, Insert::Last) {
            render.set_text(body, text);
        }
        if let Some(stamp) = render.create_element(entry, ElementKind::Text, Insert::Last) {
            render.set_text(stamp, TIMESTAMP_LABEL);
            render.add_class(stamp, VisualClass::TIMESTAMP);
        }
        render.set_text(self.input, "");
        self.draft.clear();
        self.posted += 1;

        stage.reveal(entry, self.reveal.clone(), host)?;
        Ok(Some(entry))
    }
}
