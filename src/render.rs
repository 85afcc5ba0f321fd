//! Renderer
//!
//! Stateless drawing of precomputed [`Layout`] slots through a
//! [`PanelInterface`]. Each function issues exactly one window: it begins the
//! update, draws, and commits, and the commit happens even when a draw call
//! fails.

use crate::clock::{LocalTimeSample, format_date, format_time};
use crate::icons::ICON_SIZE;
use crate::interface::{PanelInterface, Window};
use crate::layout::{Fonts, Layout, LayoutSlot};
use crate::weather::WeatherState;

/// Redraw every field through a full-window update
pub fn render_full<D: PanelInterface>(
    display: &mut D,
    sample: &LocalTimeSample,
    weather: &WeatherState,
    layout: &Layout,
    fonts: &Fonts<D::Font>,
) -> Result<(), D::Error> {
    with_window(display, Window::Full, |d| {
        d.draw_text(layout.time.cursor, &format_time(sample), fonts.time)?;
        d.draw_text(layout.date.cursor, &format_date(sample), fonts.date)?;
        draw_weather(d, weather, layout, fonts.weather)
    })
}

/// Redraw only the time slot
pub fn render_time_partial<D: PanelInterface>(
    display: &mut D,
    sample: &LocalTimeSample,
    slot: &LayoutSlot,
    font: D::Font,
) -> Result<(), D::Error> {
    with_window(display, Window::Partial(slot.bounds), |d| {
        d.clear_rect(slot.bounds)?;
        d.draw_text(slot.cursor, &format_time(sample), font)
    })
}

/// Redraw only the weather slot: icon and temperature
pub fn render_weather_partial<D: PanelInterface>(
    display: &mut D,
    weather: &WeatherState,
    layout: &Layout,
    font: D::Font,
) -> Result<(), D::Error> {
    with_window(display, Window::Partial(layout.weather.bounds), |d| {
        d.clear_rect(layout.weather.bounds)?;
        draw_weather(d, weather, layout, font)
    })
}

fn draw_weather<D: PanelInterface>(
    display: &mut D,
    weather: &WeatherState,
    layout: &Layout,
    font: D::Font,
) -> Result<(), D::Error> {
    if let Some(icon) = weather.icon() {
        display.draw_bitmap(layout.weather_icon, icon.bitmap(), ICON_SIZE, ICON_SIZE)?;
    }
    display.draw_text(layout.weather.cursor, &weather.temperature_text(), font)
}

/// Begin `window`, run `draw`, then commit regardless of the draw result
///
/// The first error wins. If beginning fails there is nothing to commit.
fn with_window<D, F>(display: &mut D, window: Window, draw: F) -> Result<(), D::Error>
where
    D: PanelInterface,
    F: FnOnce(&mut D) -> Result<(), D::Error>,
{
    match window {
        Window::Full => display.begin_full_window()?,
        Window::Partial(rect) => display.begin_partial_window(rect)?,
    }
    let drawn = draw(display);
    let committed = display.commit_and_advance();
    drawn.and(committed)
}
