//! Badge application context and key map

use super::state::{BadgeState, Page};
use crate::battery::BatteryLevel;
use crate::card::{Card, CardStore};
use crate::input::{ButtonId, HandlerHost, HandlerRegistry};
use crate::traits::DisplayError;

/// Draws a page onto the panel
///
/// Implementations own the display surface; a successful call leaves the
/// new page on the glass.
pub trait PageRenderer {
    fn render(
        &mut self,
        state: &BadgeState,
        card: &Card<'_>,
        battery: BatteryLevel,
    ) -> Result<(), DisplayError>;
}

/// Everything the button handlers act on
pub struct Badge<'a, R> {
    state: BadgeState,
    cards: CardStore<'a>,
    handlers: HandlerRegistry<Self>,
    renderer: R,
    battery: BatteryLevel,
    last_error: Option<DisplayError>,
}

impl<'a, R: PageRenderer> Badge<'a, R> {
    /// Create a badge showing the first card, with no buttons bound
    pub fn new(cards: CardStore<'a>, renderer: R) -> Self {
        Self {
            state: BadgeState::new(),
            cards,
            handlers: HandlerRegistry::new(),
            renderer,
            battery: BatteryLevel::default(),
            last_error: None,
        }
    }

    /// Bind the standard buttons
    ///
    /// - A: card page
    /// - B: QR code page
    /// - C: toggle inverted colours
    /// - Up / Down: previous / next card
    pub fn install_default_keymap(&mut self) {
        self.handlers.set(ButtonId::A, Self::show_card);
        self.handlers.set(ButtonId::B, Self::show_qr);
        self.handlers.set(ButtonId::C, Self::toggle_invert);
        self.handlers.set(ButtonId::Up, Self::prev_card);
        self.handlers.set(ButtonId::Down, Self::next_card);
    }

    /// Mutable access to the key map
    pub fn handlers_mut(&mut self) -> &mut HandlerRegistry<Self> {
        &mut self.handlers
    }

    pub fn state(&self) -> &BadgeState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Latest battery reading, used on the next redraw
    pub fn set_battery(&mut self, level: BatteryLevel) {
        self.battery = level;
    }

    /// Card currently selected
    pub fn current_card(&self) -> &'a Card<'a> {
        match self.cards.get(self.state.card_index) {
            Some(card) => card,
            None => self.first_card(),
        }
    }

    fn first_card(&self) -> &'a Card<'a> {
        // CardStore is never empty
        self.cards.get(0).unwrap_or(&Card::EMPTY)
    }

    /// Error from the most recent redraw, taken by the caller for logging
    pub fn take_error(&mut self) -> Option<DisplayError> {
        self.last_error.take()
    }

    /// Render the current state
    ///
    /// A failed redraw leaves the state as it was so the next press tries
    /// again.
    pub fn redraw(&mut self) -> Result<(), DisplayError> {
        let card = self.current_card();
        match self.renderer.render(&self.state, card, self.battery) {
            Ok(()) => {
                self.state.redraws = self.state.redraws.wrapping_add(1);
                Ok(())
            }
            Err(e) => {
                self.last_error = Some(e);
                Err(e)
            }
        }
    }

    fn show_card(&mut self) {
        self.state.page = Page::Card;
        let _ = self.redraw();
    }

    fn show_qr(&mut self) {
        self.state.page = Page::QrCode;
        let _ = self.redraw();
    }

    fn toggle_invert(&mut self) {
        self.state.inverted = !self.state.inverted;
        let _ = self.redraw();
    }

    fn next_card(&mut self) {
        self.state.card_index = self.cards.next_index(self.state.card_index);
        let _ = self.redraw();
    }

    fn prev_card(&mut self) {
        self.state.card_index = self.cards.prev_index(self.state.card_index);
        let _ = self.redraw();
    }
}

impl<R> HandlerHost for Badge<'_, R> {
    fn handlers(&self) -> &HandlerRegistry<Self> {
        &self.handlers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputConfig;
    use crate::input::{Dispatcher, EventQueue, Timestamp};

    const CARDS: [Card<'static>; 2] = [
        Card {
            given_name: "Dave",
            family_name: "Jones",
            nickname: "waveform",
            org: &["Canonical", "Foundations"],
            email: "dave.jones@canonical.com",
            ..Card::EMPTY
        },
        Card {
            given_name: "Ada",
            family_name: "Lovelace",
            org: &["Analytical Engines"],
            email: "ada@example.org",
            url: "https://example.org",
            ..Card::EMPTY
        },
    ];

    #[derive(Default)]
    struct MockRenderer {
        frames: Vec<(BadgeState, &'static str, BatteryLevel)>,
        fail: bool,
    }

    impl PageRenderer for MockRenderer {
        fn render(
            &mut self,
            state: &BadgeState,
            card: &Card<'_>,
            battery: BatteryLevel,
        ) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::Timeout);
            }
            let name = CARDS
                .iter()
                .find(|c| c.given_name == card.given_name)
                .map(|c| c.given_name)
                .unwrap_or("");
            self.frames.push((*state, name, battery));
            Ok(())
        }
    }

    fn badge() -> Badge<'static, MockRenderer> {
        let store = CardStore::new(&CARDS).unwrap();
        let mut badge = Badge::new(store, MockRenderer::default());
        badge.install_default_keymap();
        badge
    }

    fn press(badge: &mut Badge<'static, MockRenderer>, buttons: &[(u32, ButtonId)]) {
        let queue: EventQueue<8> = EventQueue::new();
        let mut dispatcher = Dispatcher::new(InputConfig::default());
        for &(ms, button) in buttons {
            assert!(queue.try_push(Timestamp(ms), button));
        }
        dispatcher.run(&queue, badge);
    }

    #[test]
    fn test_initial_redraw() {
        let mut badge = badge();
        badge.redraw().unwrap();
        let (state, name, _) = badge.renderer().frames[0];
        assert_eq!(state.page, Page::Card);
        assert_eq!(name, "Dave");
        assert_eq!(badge.state().redraws, 1);
    }

    #[test]
    fn test_page_buttons() {
        let mut badge = badge();
        press(&mut badge, &[(0, ButtonId::B), (1_000, ButtonId::A)]);

        let frames = &badge.renderer().frames;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].0.page, Page::QrCode);
        assert_eq!(frames[1].0.page, Page::Card);
    }

    #[test]
    fn test_invert_toggles() {
        let mut badge = badge();
        press(&mut badge, &[(0, ButtonId::C), (500, ButtonId::C)]);
        let frames = &badge.renderer().frames;
        assert!(frames[0].0.inverted);
        assert!(!frames[1].0.inverted);
    }

    #[test]
    fn test_card_cycling_wraps() {
        let mut badge = badge();
        press(
            &mut badge,
            &[(0, ButtonId::Down), (300, ButtonId::Down), (600, ButtonId::Up)],
        );
        let names: Vec<_> = badge.renderer().frames.iter().map(|f| f.1).collect();
        assert_eq!(names, ["Ada", "Dave", "Ada"]);
        assert_eq!(badge.current_card().given_name, "Ada");
    }

    #[test]
    fn test_bounced_press_does_not_redraw() {
        let mut badge = badge();
        press(&mut badge, &[(0, ButtonId::Down), (40, ButtonId::Down)]);
        assert_eq!(badge.renderer().frames.len(), 1);
        assert_eq!(badge.state().card_index, 1);
    }

    #[test]
    fn test_battery_passed_to_renderer() {
        let mut badge = badge();
        badge.set_battery(BatteryLevel::from_millivolts(3600));
        badge.redraw().unwrap();
        assert_eq!(badge.renderer().frames[0].2.bars(), 2);
    }

    #[test]
    fn test_render_failure_is_recorded() {
        let mut badge = badge();
        badge.renderer_mut().fail = true;
        press(&mut badge, &[(0, ButtonId::B)]);

        assert_eq!(badge.take_error(), Some(DisplayError::Timeout));
        assert_eq!(badge.take_error(), None);
        assert_eq!(badge.state().page, Page::QrCode);
        assert_eq!(badge.state().redraws, 0);
    }

    #[test]
    fn test_rebinding_from_outside() {
        let mut badge = badge();
        badge.handlers_mut().remove(ButtonId::C);
        press(&mut badge, &[(0, ButtonId::C), (0, ButtonId::B)]);
        assert_eq!(badge.renderer().frames.len(), 1);
        assert!(!badge.state().inverted);
    }
}
