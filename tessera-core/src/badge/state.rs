//! Display state mutated by button handlers

/// What the panel is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Page {
    /// Name, nickname, organisation and email
    #[default]
    Card,
    /// Scannable contact code
    QrCode,
}

/// Badge display state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BadgeState {
    /// Current page
    pub page: Page,
    /// Index into the card store
    pub card_index: usize,
    /// White-on-black rendering
    pub inverted: bool,
    /// Completed redraws since boot
    pub redraws: u32,
}

impl BadgeState {
    pub const fn new() -> Self {
        Self {
            page: Page::Card,
            card_index: 0,
            inverted: false,
            redraws: 0,
        }
    }
}
