//! Physical button identities

/// One of the badge's front-panel buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    A,
    B,
    C,
    Up,
    Down,
}

impl ButtonId {
    /// Number of buttons
    pub const COUNT: usize = 5;

    /// Every button, in index order
    pub const ALL: [ButtonId; Self::COUNT] = [
        ButtonId::A,
        ButtonId::B,
        ButtonId::C,
        ButtonId::Up,
        ButtonId::Down,
    ];

    /// Dense index in `0..COUNT`, used to address per-button tables
    pub const fn index(self) -> usize {
        match self {
            ButtonId::A => 0,
            ButtonId::B => 1,
            ButtonId::C => 2,
            ButtonId::Up => 3,
            ButtonId::Down => 4,
        }
    }

    /// Short label for logs
    pub const fn label(self) -> &'static str {
        match self {
            ButtonId::A => "a",
            ButtonId::B => "b",
            ButtonId::C => "c",
            ButtonId::Up => "up",
            ButtonId::Down => "down",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, button) in ButtonId::ALL.iter().enumerate() {
            assert_eq!(button.index(), i);
        }
    }

    #[test]
    fn test_labels_unique() {
        for a in ButtonId::ALL {
            for b in ButtonId::ALL {
                if a != b {
                    assert_ne!(a.label(), b.label());
                }
            }
        }
    }
}
