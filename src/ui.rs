// src/ui.rs
use iced::widget::{button, container};
use iced::{Background, Color, Theme};
use once_cell::sync::Lazy;

pub struct Styles {
    pub bg: Color,
    pub fg: Color,
    pub muted_fg: Color,
    pub footer_bg: Color,
    pub footer_fg: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub card_bg: Color,
    pub sidebar_bg: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub success_fg: Color,
    pub error_fg: Color,
}

pub static DARK_THEME: Lazy<Styles> = Lazy::new(|| Styles {
    bg: Color::from_rgb(0.0, 0.0, 0.0),
    fg: Color::from_rgb(1.0, 1.0, 1.0),
    muted_fg: Color::from_rgb(0.6, 0.6, 0.6),
    footer_bg: Color::from_rgb(0.0078, 0.325, 0.6118), // #02539c
    footer_fg: Color::from_rgb(1.0, 1.0, 1.0),
    header_bg: Color::from_rgb(0.2, 0.2, 0.2),
    header_fg: Color::from_rgb(1.0, 1.0, 1.0),
    card_bg: Color::from_rgb(0.12, 0.12, 0.12),
    sidebar_bg: Color::from_rgb(0.08, 0.08, 0.08),
    highlight_bg: Color::from_rgb(1.0, 0.8, 0.8), // #ffcccc
    highlight_fg: Color::from_rgb(1.0, 0.0, 0.0),
    success_fg: Color::from_rgb(0.3, 0.8, 0.4),
    error_fg: Color::from_rgb(1.0, 0.35, 0.35),
});

pub static LIGHT_THEME: Lazy<Styles> = Lazy::new(|| Styles {
    bg: Color::from_rgb(1.0, 1.0, 1.0),
    fg: Color::from_rgb(0.0, 0.0, 0.0),
    muted_fg: Color::from_rgb(0.4, 0.4, 0.4),
    footer_bg: Color::from_rgb(0.0078, 0.325, 0.6118), // #02539c
    footer_fg: Color::from_rgb(1.0, 1.0, 1.0),
    header_bg: Color::from_rgb(0.8784, 0.8784, 0.8784), // #e0e0e0
    header_fg: Color::from_rgb(0.0, 0.0, 0.0),
    card_bg: Color::from_rgb(0.95, 0.95, 0.95),
    sidebar_bg: Color::from_rgb(0.94, 0.95, 0.97),
    highlight_bg: Color::from_rgb(1.0, 0.8, 0.8), // #ffcccc
    highlight_fg: Color::from_rgb(1.0, 0.0, 0.0),
    success_fg: Color::from_rgb(0.1, 0.55, 0.2),
    error_fg: Color::from_rgb(0.8, 0.0, 0.0),
});

pub struct ContainerStyle {
    pub bg: Color,
}

impl container::StyleSheet for ContainerStyle {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            background: Some(Background::Color(self.bg)),
            ..Default::default()
        }
    }
}

pub fn filled(bg: Color) -> iced::theme::Container {
    iced::theme::Container::Custom(Box::new(ContainerStyle { bg }))
}

pub struct ButtonStyle {
    pub bg: Color,
    pub fg: Color,
    pub hover_bg: Color,
}

impl button::StyleSheet for ButtonStyle {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(self.bg)),
            border_radius: 4.0.into(),
            text_color: self.fg,
            ..Default::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(self.hover_bg)),
            ..self.active(style)
        }
    }
}

pub fn footer_button(theme: &Styles) -> iced::theme::Button {
    iced::theme::Button::Custom(Box::new(ButtonStyle {
        bg: theme.footer_bg,
        fg: theme.footer_fg,
        hover_bg: Color::from_rgb(0.0, 0.26, 0.5),
    }))
}
