//! Clickable buttons.

use crate::observer::ControlEventKind;

/// Visual behaviour of a button.
#[derive(Debug, Clone, PartialEq)]
pub enum ButtonKind {
    /// Clicks and notifies, nothing else.
    Plain,
    /// Shows `pressed` while held and `normal` otherwise.
    Textured { normal: String, pressed: String },
    /// Flips between two textures on each click.
    Toggle {
        active_texture: String,
        inactive_texture: String,
        active: bool,
        /// Clicking an active button does nothing (tab headers).
        activate_only: bool,
    },
}

/// Clickable capability.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    kind: ButtonKind,
    pressed: bool,
}

impl Button {
    pub fn plain() -> Self {
        Self {
            kind: ButtonKind::Plain,
            pressed: false,
        }
    }

    pub fn textured(normal: impl Into<String>, pressed: impl Into<String>) -> Self {
        Self {
            kind: ButtonKind::Textured {
                normal: normal.into(),
                pressed: pressed.into(),
            },
            pressed: false,
        }
    }

    pub fn toggle(
        active_texture: impl Into<String>,
        inactive_texture: impl Into<String>,
        activate_only: bool,
    ) -> Self {
        Self {
            kind: ButtonKind::Toggle {
                active_texture: active_texture.into(),
                inactive_texture: inactive_texture.into(),
                active: false,
                activate_only,
            },
            pressed: false,
        }
    }

    pub fn kind(&self) -> &ButtonKind {
        &self.kind
    }

    /// Whether the button is currently held down.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Handle a click. Returns the event to raise, or `None` if the click was swallowed.
    pub fn click(&mut self) -> Option<ControlEventKind> {
        match &mut self.kind {
            ButtonKind::Plain => Some(ControlEventKind::Clicked),
            ButtonKind::Textured { .. } => {
                self.pressed = true;
                Some(ControlEventKind::Clicked)
            }
            ButtonKind::Toggle {
                active,
                activate_only,
                ..
            } => {
                if *activate_only && *active {
                    return None;
                }
                *active = !*active;
                Some(ControlEventKind::Toggled(*active))
            }
        }
    }

    /// Restore the non-pressed visual.
    pub fn release(&mut self) {
        self.pressed = false;
    }

    /// Toggle state, `None` for non-toggle buttons.
    pub fn is_active(&self) -> Option<bool> {
        match self.kind {
            ButtonKind::Toggle { active, .. } => Some(active),
            _ => None,
        }
    }

    /// Set the toggle state without raising an event. Ignored for other kinds.
    pub fn set_active(&mut self, value: bool) {
        if let ButtonKind::Toggle { active, .. } = &mut self.kind {
            *active = value;
        }
    }

    /// Texture to draw right now, if the button is textured.
    pub fn texture(&self) -> Option<&str> {
        match &self.kind {
            ButtonKind::Plain => None,
            ButtonKind::Textured { normal, pressed } => {
                Some(if self.pressed { pressed.as_str() } else { normal.as_str() })
            }
            ButtonKind::Toggle {
                active_texture,
                inactive_texture,
                active,
                ..
            } => Some(if *active {
                active_texture.as_str()
            } else {
                inactive_texture.as_str()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_click() {
        let mut button = Button::plain();
        assert_eq!(button.click(), Some(ControlEventKind::Clicked));
        assert!(!button.is_pressed());
        assert_eq!(button.texture(), None);
    }

    #[test]
    fn test_textured_press_and_release() {
        let mut button = Button::textured("ok.png", "ok_down.png");
        assert_eq!(button.texture(), Some("ok.png"));
        button.click();
        assert_eq!(button.texture(), Some("ok_down.png"));
        button.release();
        assert_eq!(button.texture(), Some("ok.png"));
    }

    #[test]
    fn test_toggle_flips() {
        let mut button = Button::toggle("on.png", "off.png", false);
        assert_eq!(button.click(), Some(ControlEventKind::Toggled(true)));
        assert_eq!(button.texture(), Some("on.png"));
        assert_eq!(button.click(), Some(ControlEventKind::Toggled(false)));
        assert_eq!(button.is_active(), Some(false));
    }

    #[test]
    fn test_activate_only_toggle_ignores_second_click() {
        let mut button = Button::toggle("on.png", "off.png", true);
        assert_eq!(button.click(), Some(ControlEventKind::Toggled(true)));
        assert_eq!(button.click(), None);
        assert_eq!(button.is_active(), Some(true));

        button.set_active(false);
        assert_eq!(button.click(), Some(ControlEventKind::Toggled(true)));
    }
}
