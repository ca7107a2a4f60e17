use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub const CYAN: Color = Color::Rgb(0x00, 0xFF, 0xFF);
pub const VIOLET: Color = Color::Rgb(0x8A, 0x2B, 0xE2);
pub const PINK: Color = Color::Rgb(0xFF, 0x14, 0x93);
pub const BACKGROUND: Color = Color::Rgb(0x1A, 0x1A, 0x1A);
pub const SURFACE: Color = Color::Rgb(0x2A, 0x2A, 0x2A);
pub const MUTED: Color = Color::Gray;

const GRADIENT: [(u8, u8, u8); 3] = [(0x00, 0xFF, 0xFF), (0x8A, 0x2B, 0xE2), (0xFF, 0x14, 0x93)];

/// Colour at `t` in 0.0..=1.0 along the cyan, violet, pink gradient.
pub fn gradient_at(t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let scaled = t * (GRADIENT.len() - 1) as f32;
    let index = (scaled.floor() as usize).min(GRADIENT.len() - 2);
    let local = scaled - index as f32;

    let (r0, g0, b0) = GRADIENT[index];
    let (r1, g1, b1) = GRADIENT[index + 1];
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * local).round() as u8;
    Color::Rgb(mix(r0, r1), mix(g0, g1), mix(b0, b1))
}

/// `text` with one gradient step per character.
pub fn gradient_line(text: &str) -> Line<'static> {
    let count = text.chars().count();
    let spans: Vec<Span> = text
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let t = if count > 1 { i as f32 / (count - 1) as f32 } else { 0.0 };
            Span::styled(
                c.to_string(),
                Style::default().fg(gradient_at(t)).add_modifier(Modifier::BOLD),
            )
        })
        .collect();
    Line::from(spans)
}

pub fn dialog_style() -> Style {
    Style::default().bg(BACKGROUND).fg(Color::White)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_hits_its_stops() {
        assert_eq!(gradient_at(0.0), CYAN);
        assert_eq!(gradient_at(0.5), VIOLET);
        assert_eq!(gradient_at(1.0), PINK);
        assert_eq!(gradient_at(7.0), PINK);
    }

    #[test]
    fn gradient_line_colours_each_char() {
        let line = gradient_line("Neon");
        assert_eq!(line.spans.len(), 4);
        assert_eq!(line.spans[0].style.fg, Some(CYAN));
        assert_eq!(line.spans[3].style.fg, Some(PINK));
    }
}
