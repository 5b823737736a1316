use tandem_core::Mode;

/// Committed mode plus any in-flight transition.
///
/// A mode is committed only after its media work finished. A failed switch
/// keeps the previously committed mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeState {
    Active(Mode),
    Switching { from: Mode, to: Mode },
    Failed { mode: Mode, attempted: Mode },
}

impl ModeState {
    pub fn mode(&self) -> Mode {
        match *self {
            ModeState::Active(mode) => mode,
            ModeState::Switching { from, .. } => from,
            ModeState::Failed { mode, .. } => mode,
        }
    }

    pub fn is_switching(&self) -> bool {
        matches!(self, ModeState::Switching { .. })
    }
}

impl Default for ModeState {
    fn default() -> Self {
        ModeState::Active(Mode::Dashboard)
    }
}
