//! Screens the gate shows instead of the protected content.
//!
//! [`GatePages`] holds optional custom renderers for the initializing,
//! loading and permission-denied states and falls back to minimalist
//! built-in pages.
//!
//! ```ignore
//! GatePages::new()
//!     .with_loading(|message| gpui::div().child(message.to_string()).into_any_element())
//!     .with_denied(|reason, back| {
//!         gpui::div().child(reason.message()).child(back).into_any_element()
//!     })
//! ```

use crate::error::DenialReason;
use gpui::*;

type MessageBuilder = Box<dyn Fn(&str) -> AnyElement>;
type DeniedBuilder = Box<dyn Fn(&DenialReason, AnyElement) -> AnyElement>;

/// Custom or built-in renderers for non-content gate states.
#[derive(Default)]
pub struct GatePages {
    initializing: Option<Box<dyn Fn() -> AnyElement>>,
    loading: Option<MessageBuilder>,
    denied: Option<DeniedBuilder>,
}

impl GatePages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page shown before the first client frame.
    pub fn with_initializing<F>(mut self, builder: F) -> Self
    where
        F: Fn() -> AnyElement + 'static,
    {
        self.initializing = Some(Box::new(builder));
        self
    }

    /// Page shown while a phase is pending. Receives the phase's message.
    pub fn with_loading<F>(mut self, builder: F) -> Self
    where
        F: Fn(&str) -> AnyElement + 'static,
    {
        self.loading = Some(Box::new(builder));
        self
    }

    /// 403 page. Receives the reason and the "back to dashboard" action,
    /// which must be placed somewhere in the returned element.
    pub fn with_denied<F>(mut self, builder: F) -> Self
    where
        F: Fn(&DenialReason, AnyElement) -> AnyElement + 'static,
    {
        self.denied = Some(Box::new(builder));
        self
    }

    pub fn render_initializing(&self) -> AnyElement {
        match &self.initializing {
            Some(builder) => builder(),
            None => default_loading_page("Initializing...").into_any_element(),
        }
    }

    pub fn render_loading(&self, message: &str) -> AnyElement {
        match &self.loading {
            Some(builder) => builder(message),
            None => default_loading_page(message).into_any_element(),
        }
    }

    pub fn render_denied(&self, reason: &DenialReason, back: AnyElement) -> AnyElement {
        match &self.denied {
            Some(builder) => builder(reason, back),
            None => default_denied_page(reason, back).into_any_element(),
        }
    }

    pub fn has_custom_denied(&self) -> bool {
        self.denied.is_some()
    }
}

fn default_loading_page(message: &str) -> impl IntoElement {
    div()
        .flex()
        .flex_col()
        .items_center()
        .justify_center()
        .size_full()
        .bg(rgb(0xf8fafc))
        .gap_4()
        .child(
            div()
                .text_xl()
                .font_weight(FontWeight::MEDIUM)
                .text_color(rgb(0x0f172a))
                .child(message.to_string()),
        )
        .child(
            div()
                .text_sm()
                .text_color(rgb(0x64748b))
                .child("Please wait"),
        )
}

fn default_denied_page(reason: &DenialReason, back: AnyElement) -> impl IntoElement {
    div()
        .flex()
        .flex_col()
        .items_center()
        .justify_center()
        .size_full()
        .bg(rgb(0xf8fafc))
        .p_8()
        .gap_6()
        .child(
            div()
                .text_3xl()
                .font_weight(FontWeight::BOLD)
                .text_color(rgb(0x0f172a))
                .child("403 - Access Denied"),
        )
        .child(
            div()
                .text_base()
                .text_color(rgb(0x475569))
                .text_center()
                .max_w(px(500.))
                .child(reason.message()),
        )
        .child(back)
}
