use eframe::egui::{
    self,
    style::{
        Selection,
        WidgetVisuals,
        Widgets,
    },
    Color32,
    Stroke,
    Visuals,
};

use crate::core::models::{
    HealthState,
    Tone,
};

#[derive(Clone)]
pub struct Theme {
    background: Color32,
    background_dark: Color32,
    background_darker: Color32,
    background_light: Color32,
    foreground: Color32,
    selection: Color32,
    comment: Color32,
    red: Color32,
    orange: Color32,
    green: Color32,
    purple: Color32,
    cyan: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dracula()
    }
}

impl Theme {
    //https://github.com/ShabbirHasan1/egui_dracula/blob/master/src/lib.rs
    pub fn dracula() -> Self {
        Self {
            background: Color32::from_rgb(0x28, 0x2a, 0x36),
            background_dark: Color32::from_rgb(33, 35, 53),
            background_darker: Color32::from_rgb(25, 26, 33),
            background_light: Color32::from_rgb(52, 54, 66),
            foreground: Color32::from_rgb(0xf8, 0xf8, 0xf2),
            selection: Color32::from_rgb(0x44, 0x47, 0x5a),
            comment: Color32::from_rgb(0x62, 0x72, 0xa4),
            red: Color32::from_rgb(0xff, 0x55, 0x55),
            orange: Color32::from_rgb(0xff, 0xb8, 0x6c),
            green: Color32::from_rgb(0x50, 0xfa, 0x7b),
            purple: Color32::from_rgb(189, 147, 249),
            cyan: Color32::from_rgb(139, 233, 253),
        }
    }

    pub fn green(&self) -> Color32 {
        self.green
    }

    pub fn purple(&self) -> Color32 {
        self.purple
    }

    pub fn comment(&self) -> Color32 {
        self.comment
    }

    pub fn tone(&self, tone: Tone) -> Color32 {
        match tone {
            Tone::Ok => self.green,
            Tone::Err => self.red,
            Tone::Neutral => self.foreground,
        }
    }

    pub fn health(&self, health: HealthState) -> Color32 {
        match health {
            HealthState::Ok => self.green,
            HealthState::Unavailable => self.red,
            HealthState::Unknown => self.comment,
        }
    }
}

pub fn set_theme(ctx: &egui::Context, theme: &Theme) {
    let default = Visuals::dark();
    let widget = |base: WidgetVisuals, fill: Color32, stroke: Color32| WidgetVisuals {
        bg_fill: fill,
        weak_bg_fill: fill,
        bg_stroke: Stroke { color: stroke, ..base.bg_stroke },
        fg_stroke: Stroke { color: theme.foreground, ..base.fg_stroke },
        ..base
    };

    ctx.set_visuals_of(
        egui::Theme::Dark,
        Visuals {
            dark_mode: true,
            widgets: Widgets {
                noninteractive: widget(
                    default.widgets.noninteractive,
                    theme.background,
                    theme.background_dark,
                ),
                inactive: widget(default.widgets.inactive, theme.background_light, theme.background_dark),
                hovered: widget(default.widgets.hovered, theme.selection, theme.cyan),
                active: widget(default.widgets.active, theme.selection, theme.cyan),
                open: widget(default.widgets.open, theme.background_dark, theme.purple),
            },
            selection: Selection {
                bg_fill: theme.selection,
                stroke: Stroke { color: theme.foreground, ..default.selection.stroke },
            },
            hyperlink_color: theme.cyan,
            faint_bg_color: theme.background_darker,
            extreme_bg_color: theme.background_darker,
            code_bg_color: theme.background_dark,
            error_fg_color: theme.red,
            warn_fg_color: theme.orange,
            window_fill: theme.background,
            panel_fill: theme.background_dark,
            ..default
        },
    );
    ctx.set_theme(egui::Theme::Dark);
}
