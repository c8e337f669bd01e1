/// Display configuration of the dashboard.
///
/// Citizen mode is simplified; expert mode shows measurements in popups and
/// honours the overlay checkboxes.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Citizen,
    Expert,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Citizen, Mode::Expert];

    /// Parses the `data-mode` attribute value of a mode button.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "citizen" => Some(Mode::Citizen),
            "expert" => Some(Mode::Expert),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Citizen => "citizen",
            Mode::Expert => "expert",
        }
    }
}
