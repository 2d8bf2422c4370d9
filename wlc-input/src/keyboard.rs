//! Keycode-to-symbol translation.
//!
//! The compositor ships a complete xkb keymap over an fd; everything here
//! treats that keymap as an opaque translation table. Raw wire keycodes are
//! evdev codes, offset by 8 from xkb keycodes.

use xkbcommon::xkb;

use crate::InputError;

const EVDEV_OFFSET: u32 = 8;

/// One translated key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTranslation {
    /// Raw wire keycode as the server sent it.
    pub raw: u32,
    /// Symbolic keysym name, e.g. `Return`.
    pub sym_name: String,
    /// UTF-8 text the key produces, empty for non-text keys.
    pub utf8: String,
}

/// A key press or release, translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The translated key.
    pub translation: KeyTranslation,
    /// Press (`true`) or release.
    pub pressed: bool,
    /// Compositor timestamp in ms.
    pub time: u32,
}

/// Wraps an xkb context, keymap, and state.
///
/// Without a keymap, translation yields `None`; a new keymap from the
/// server replaces the old one wholesale, and a keymap xkb rejects leaves
/// the previous one in place.
pub struct KeyTranslator {
    context: xkb::Context,
    state: Option<xkb::State>,
}

impl KeyTranslator {
    /// Creates a translator with no keymap yet.
    pub fn new() -> Self {
        Self {
            context: xkb::Context::new(xkb::CONTEXT_NO_FLAGS),
            state: None,
        }
    }

    /// Whether a keymap has been compiled.
    pub fn has_keymap(&self) -> bool {
        self.state.is_some()
    }

    /// Compiles `text` as a TEXT_V1 keymap and replaces the current state.
    pub fn set_keymap(&mut self, text: &str) -> Result<(), InputError> {
        let keymap = xkb::Keymap::new_from_string(
            &self.context,
            text.to_owned(),
            xkb::KEYMAP_FORMAT_TEXT_V1,
            xkb::KEYMAP_COMPILE_NO_FLAGS,
        )
        .ok_or(InputError::KeymapRejected)?;
        self.state = Some(xkb::State::new(&keymap));
        Ok(())
    }

    /// Applies a modifier update from the server.
    pub fn update_modifiers(&mut self, depressed: u32, latched: u32, locked: u32, group: u32) {
        if let Some(state) = &mut self.state {
            state.update_mask(depressed, latched, locked, 0, 0, group);
        }
    }

    /// Translates a raw wire keycode; `None` without a keymap.
    pub fn translate(&self, raw: u32) -> Option<KeyTranslation> {
        let state = self.state.as_ref()?;
        let keycode: xkb::Keycode = (raw + EVDEV_OFFSET).into();
        let sym = state.key_get_one_sym(keycode);
        Some(KeyTranslation {
            raw,
            sym_name: xkb::keysym_get_name(sym),
            utf8: state.key_get_utf8(keycode),
        })
    }
}

impl Default for KeyTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeyTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyTranslator")
            .field("has_keymap", &self.has_keymap())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_without_a_keymap_yields_none() {
        let translator = KeyTranslator::new();
        assert!(!translator.has_keymap());
        assert!(translator.translate(30).is_none());
    }

    #[test]
    fn rejected_keymap_leaves_state_unchanged() {
        let mut translator = KeyTranslator::new();
        assert_eq!(
            translator.set_keymap("not an xkb keymap"),
            Err(InputError::KeymapRejected)
        );
        assert!(!translator.has_keymap());
    }
}
