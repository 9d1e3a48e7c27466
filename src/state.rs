//! Shared game state
//!
//! Quest flags and the dialog-open flag, shared between the frame loop and
//! interaction callbacks. Everything runs on one thread, so an
//! `Rc<RefCell<_>>` is enough; callbacks hold clones of the handle.

use std::cell::RefCell;
use std::rc::Rc;

/// Handle to the shared game state
pub type SharedState = Rc<RefCell<GameState>>;

/// Quest flags and dialog state
#[derive(Debug, Default)]
pub struct GameState {
    /// Whether a dialog is open (movement freezes while true)
    pub dialog_open: bool,
    /// Text of the open dialog, if any
    pub dialog_text: Option<String>,
    /// The player has reached the temple grounds
    pub temple_found: bool,
    /// The player has spoken with the temple keeper
    pub talked_to_keeper: bool,
    /// The player has stepped through the portal
    pub portal_entered: bool,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state wrapped in a shared handle
    pub fn shared() -> SharedState {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Open a dialog, freezing movement until it is closed
    pub fn open_dialog(&mut self, text: impl Into<String>) {
        self.dialog_open = true;
        self.dialog_text = Some(text.into());
    }

    /// Close the current dialog
    pub fn close_dialog(&mut self) {
        self.dialog_open = false;
        self.dialog_text = None;
    }

    /// Record that the temple grounds were reached. Idempotent.
    pub fn mark_temple_found(&mut self) {
        if !self.temple_found {
            self.temple_found = true;
            log::info!("quest: temple of Apollo found");
        }
    }

    /// Record the conversation with the temple keeper. Idempotent.
    pub fn mark_talked_to_keeper(&mut self) {
        if !self.talked_to_keeper {
            self.talked_to_keeper = true;
            log::info!("quest: spoke with the temple keeper");
        }
    }

    /// Record entering the portal. Idempotent.
    pub fn mark_portal_entered(&mut self) {
        if !self.portal_entered {
            self.portal_entered = true;
            log::info!("quest: entered the portal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialog_open_and_close() {
        let mut state = GameState::new();
        assert!(!state.dialog_open);

        state.open_dialog("Welcome, traveler.");
        assert!(state.dialog_open);
        assert_eq!(state.dialog_text.as_deref(), Some("Welcome, traveler."));

        state.close_dialog();
        assert!(!state.dialog_open);
        assert!(state.dialog_text.is_none());
    }

    #[test]
    fn test_quest_flags_are_sticky() {
        let mut state = GameState::new();
        state.mark_temple_found();
        state.mark_temple_found();
        assert!(state.temple_found);
        assert!(!state.talked_to_keeper);
        assert!(!state.portal_entered);
    }

    #[test]
    fn test_shared_handle_mutation() {
        let state = GameState::shared();
        {
            let handle = Rc::clone(&state);
            handle.borrow_mut().mark_portal_entered();
        }
        assert!(state.borrow().portal_entered);
    }
}
