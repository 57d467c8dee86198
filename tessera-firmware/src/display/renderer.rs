//! Page rendering
//!
//! Lays out the card and QR pages with embedded-graphics, adds the battery
//! glyph in the top-right corner, applies inversion and pushes the frame.

use embedded_graphics::image::{Image, ImageRaw};
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_9X15};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use tessera_core::badge::{BadgeState, Page, PageRenderer};
use tessera_core::battery::BatteryLevel;
use tessera_core::card::Card;
use tessera_core::traits::{DisplayError, DisplaySurface};

use super::framebuffer::{HEIGHT, WIDTH};
use super::uc8151::Canvas;

/// Top-left corner of the card text
const CARD_ORIGIN: Point = Point::new(8, 8);

/// Gap between card lines
const LINE_GAP: i32 = 6;

/// Top-left corner of the battery glyph
const BATTERY_ORIGIN: Point = Point::new(WIDTH as i32 - 25, 3);

/// A pre-rendered QR code, packed 1-bit rows with set bits as ink
#[derive(Clone, Copy)]
pub struct QrImage {
    pub bitmap: &'static [u8],
    pub width: u16,
    pub height: u16,
}

impl QrImage {
    fn is_present(&self) -> bool {
        !self.bitmap.is_empty() && self.width > 0 && self.height > 0
    }
}

pub struct EinkRenderer<P> {
    panel: P,
    qr: QrImage,
}

impl<P: DisplaySurface + Canvas> EinkRenderer<P> {
    pub fn new(panel: P, qr: QrImage) -> Self {
        Self { panel, qr }
    }

    fn draw_qr(&mut self, card: &Card<'_>) -> Result<(), DisplayError> {
        if self.qr.is_present() {
            let x = WIDTH.saturating_sub(self.qr.width) / 2;
            let y = HEIGHT.saturating_sub(self.qr.height) / 2;
            return self
                .panel
                .blit(self.qr.bitmap, x, y, self.qr.width, self.qr.height);
        }

        // No image: show the link itself
        let target = if card.url.is_empty() { card.email } else { card.url };
        let frame = self.panel.framebuffer_mut();
        draw_centered(frame, target, &FONT_10X20, HEIGHT as i32 / 2 - 10)
            .unwrap_or_else(|e| match e {});
        draw_centered(frame, &card.display_name(), &FONT_6X10, HEIGHT as i32 / 2 + 16)
            .unwrap_or_else(|e| match e {});
        Ok(())
    }
}

impl<P: DisplaySurface + Canvas> PageRenderer for EinkRenderer<P> {
    fn render(
        &mut self,
        state: &BadgeState,
        card: &Card<'_>,
        battery: BatteryLevel,
    ) -> Result<(), DisplayError> {
        self.panel.clear()?;

        match state.page {
            Page::Card => {
                draw_card(self.panel.framebuffer_mut(), card).unwrap_or_else(|e| match e {})
            }
            Page::QrCode => self.draw_qr(card)?,
        }

        let frame = self.panel.framebuffer_mut();
        draw_battery(frame, BATTERY_ORIGIN, battery).unwrap_or_else(|e| match e {});
        if state.inverted {
            frame.invert();
        }

        self.panel.present()
    }
}

/// Optional image, then name, nickname, organisation unit and email
fn draw_card<D>(target: &mut D, card: &Card<'_>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    if let Some(image) = card.image {
        let raw = ImageRaw::<BinaryColor>::new(image.bitmap, image.width as u32);
        Image::new(&raw, CARD_ORIGIN).draw(target)?;
    }

    let name = card.display_name();
    let nickname = card.quoted_nickname();
    let lines: [(&str, &MonoFont<'_>); 4] = [
        (name.as_str(), &FONT_10X20),
        (nickname.as_str(), &FONT_9X15),
        (card.org_unit(), &FONT_9X15),
        (card.email, &FONT_6X10),
    ];

    let mut cursor = CARD_ORIGIN + Point::new(card.text_indent() as i32, 0);
    for (text, font) in lines {
        if text.is_empty() {
            continue;
        }
        let style = MonoTextStyle::new(font, BinaryColor::On);
        Text::with_baseline(text, cursor, style, Baseline::Top).draw(target)?;
        cursor.y += font.character_size.height as i32 + LINE_GAP;
    }
    Ok(())
}

fn draw_centered<D>(target: &mut D, text: &str, font: &MonoFont<'_>, y: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(font, BinaryColor::On);
    let layout = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Top)
        .build();
    Text::with_text_style(text, Point::new(WIDTH as i32 / 2, y), style, layout).draw(target)?;
    Ok(())
}

/// 19x10 outline with a terminal nub, four bars, or a cross when critical
fn draw_battery<D>(target: &mut D, origin: Point, level: BatteryLevel) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let ink = PrimitiveStyle::with_fill(BinaryColor::On);
    let outline = PrimitiveStyle::with_stroke(BinaryColor::On, 1);

    Rectangle::new(origin, Size::new(19, 10))
        .into_styled(outline)
        .draw(target)?;
    Rectangle::new(origin + Point::new(19, 3), Size::new(2, 4))
        .into_styled(ink)
        .draw(target)?;

    if level.is_critical() {
        for dx in [3, 4] {
            Line::new(origin + Point::new(dx, 0), origin + Point::new(dx + 10, 10))
                .into_styled(outline)
                .draw(target)?;
        }
        return Ok(());
    }

    for i in 0..level.bars() as i32 {
        Rectangle::new(origin + Point::new(2 + i * 4, 2), Size::new(3, 6))
            .into_styled(ink)
            .draw(target)?;
    }
    Ok(())
}
