//! Floating labels: messages, score popups and speech bubbles shown over an
//! element for a while, then removed.

use std::fmt;

use boardfx_dom::Document;

use crate::effects;
use crate::error::{AnimationError, Result};
use crate::host::Game;
use crate::manager::AnimationManager;
use crate::settings::{AnimationSettings, ParallelAnimation};

pub const MESSAGE_CLASS: &str = "boardfx-message";
pub const SCORING_CLASS: &str = "boardfx-scoring";
pub const BUBBLE_CLASS: &str = "boardfx-bubble";

/// Entrance and exit of a floating label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageEffect {
    ZoomInOut,
    FadeInOut,
    None,
}

impl MessageEffect {
    fn animation<E>(self) -> Option<ParallelAnimation<E>> {
        match self {
            Self::ZoomInOut => Some(effects::zoom_in_out()),
            Self::FadeInOut => Some(effects::fade_in_out()),
            Self::None => None,
        }
    }
}

#[derive(Clone)]
pub struct MessageOptions<E> {
    /// Extra classes on the label.
    pub classes: Vec<String>,
    /// Replaces the label kind's default effect.
    pub effect: Option<MessageEffect>,
    /// Defaults to the manager's display duration.
    pub duration_ms: Option<f64>,
    /// Call-site settings; their parallel animations run after the effect.
    pub settings: AnimationSettings<E>,
}

impl<E> Default for MessageOptions<E> {
    fn default() -> Self {
        Self {
            classes: Vec::new(),
            effect: None,
            duration_ms: None,
            settings: AnimationSettings::default(),
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for MessageOptions<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageOptions")
            .field("classes", &self.classes)
            .field("effect", &self.effect)
            .field("duration_ms", &self.duration_ms)
            .field("settings", &self.settings)
            .finish()
    }
}

impl<E> MessageOptions<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn effect(mut self, effect: MessageEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn duration(mut self, ms: f64) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    pub fn settings(mut self, settings: AnimationSettings<E>) -> Self {
        self.settings = settings;
        self
    }
}

/// `+N` for gains, `N` otherwise.
pub fn scoring_text(score: i32) -> String {
    if score > 0 {
        format!("+{score}")
    } else {
        score.to_string()
    }
}

/// Normalize `rrggbb` / `#rrggbb` to `#rrggbb`.
pub fn parse_color(color: &str) -> Result<String> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(format!("#{}", hex.to_ascii_lowercase()))
    } else {
        Err(AnimationError::InvalidArgument(format!(
            "color must be rrggbb, got `{color}`"
        )))
    }
}

impl<D: Document, G: Game> AnimationManager<D, G> {
    /// Float `text` over `target`.
    pub async fn display_message(
        &self,
        target: &D::Element,
        text: &str,
        options: Option<&MessageOptions<D::Element>>,
    ) -> Result<()> {
        self.show_label(target, text, MESSAGE_CLASS, MessageEffect::ZoomInOut, None, options)
            .await
    }

    /// Float a score over `target`, in the player's color.
    pub async fn display_scoring(
        &self,
        target: &D::Element,
        score: i32,
        color: &str,
        options: Option<&MessageOptions<D::Element>>,
    ) -> Result<()> {
        let color = parse_color(color)?;
        self.show_label(
            target,
            &scoring_text(score),
            SCORING_CLASS,
            MessageEffect::ZoomInOut,
            Some(&color),
            options,
        )
        .await
    }

    /// Speech bubble over `target`.
    pub async fn display_bubble(
        &self,
        target: &D::Element,
        text: &str,
        options: Option<&MessageOptions<D::Element>>,
    ) -> Result<()> {
        self.show_label(target, text, BUBBLE_CLASS, MessageEffect::FadeInOut, None, options)
            .await
    }

    async fn show_label(
        &self,
        target: &D::Element,
        text: &str,
        class: &str,
        default_effect: MessageEffect,
        color: Option<&str>,
        options: Option<&MessageOptions<D::Element>>,
    ) -> Result<()> {
        if !self.animations_active() {
            return Ok(());
        }

        let doc = self.document();
        let label = doc.create_element("div")?;
        doc.add_class(&label, class)?;
        let default_options = MessageOptions::default();
        let options = options.unwrap_or(&default_options);
        for extra in &options.classes {
            doc.add_class(&label, extra)?;
        }
        if let Some(color) = color {
            doc.set_style(&label, "color", color)?;
        }
        doc.set_text(&label, text);

        let call = AnimationSettings::new()
            .no_bump()
            .duration(options.duration_ms.unwrap_or(self.display_duration_ms))
            .overlay(&options.settings);
        let effect = options.effect.unwrap_or(default_effect).animation();
        let resolved = self
            .resolve(&AnimationSettings::new(), Some(&call))
            .with_leading_effects(effect);

        self.float(&label, None, target, &resolved).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_text() {
        assert_eq!(scoring_text(3), "+3");
        assert_eq!(scoring_text(0), "0");
        assert_eq!(scoring_text(-2), "-2");
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("FF0000").unwrap(), "#ff0000");
        assert_eq!(parse_color("#00aa11").unwrap(), "#00aa11");
        assert!(parse_color("red").is_err());
        assert!(parse_color("#12345").is_err());
    }
}
