//! Shared widgets: buttons, menu entries, headings and the HUD containers scenes hang them on.

use bevy::prelude::*;

use crate::schedule::ScreenSet;

pub struct WidgetsPlugin;

impl Plugin for WidgetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, highlight_buttons.in_set(ScreenSet::Presentation));
    }
}

pub const ACCENT: Color = Color::srgb(0.66, 0.33, 0.97);
pub const PINK: Color = Color::srgb(0.86, 0.15, 0.47);
pub const CYAN: Color = Color::srgb(0.13, 0.83, 0.93);
pub const MUTED_TEXT: Color = Color::srgba(1.0, 1.0, 1.0, 0.5);

/// Background colours of a button at rest and under the pointer.
#[derive(Component, Debug, Clone, Copy)]
pub struct ButtonPalette {
    pub idle:  Color,
    pub hover: Color,
}

impl ButtonPalette {
    pub const GLASS: Self = Self {
        idle:  Color::srgba(0.0, 0.0, 0.0, 0.4),
        hover: Color::srgba(1.0, 1.0, 1.0, 0.1),
    };
    pub const SOLID_BLUE: Self = Self {
        idle:  Color::srgb(0.15, 0.39, 0.92),
        hover: Color::srgb(0.23, 0.51, 0.96),
    };

    pub const fn accent(color: Color) -> Self {
        Self {
            idle:  Color::srgba(0.0, 0.0, 0.0, 0.5),
            hover: color,
        }
    }
}

/// A button that can't be pressed and doesn't react to the pointer.
#[derive(Component, Debug, Clone, Copy)]
pub struct Disabled;

/// The part of a scene's UI that focus mode hides.
#[derive(Component, Debug, Clone, Copy)]
pub struct Hud;

pub fn text(value: impl Into<String>, font_size: f32, color: Color) -> impl Bundle {
    (
        Text::new(value),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(color),
    )
}

pub fn heading(value: impl Into<String>, color: Color) -> impl Bundle { text(value, 48.0, color) }

pub fn button(label: impl Into<String>, palette: ButtonPalette) -> impl Bundle {
    (
        Button,
        palette,
        Node {
            padding: UiRect::axes(px(16), px(8)),
            border: UiRect::all(px(1)),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BorderColor::all(Color::srgba(1.0, 1.0, 1.0, 0.1)),
        BackgroundColor(palette.idle),
        children![text(label, 14.0, Color::WHITE)],
    )
}

/// A wide lobby entry: a title over a one-line description.
pub fn menu_entry(
    title: &'static str,
    subtitle: &'static str,
    palette: ButtonPalette,
) -> impl Bundle {
    (
        Button,
        palette,
        Node {
            width: percent(100),
            padding: UiRect::all(px(16)),
            border: UiRect::left(px(4)),
            flex_direction: FlexDirection::Column,
            row_gap: px(4),
            ..default()
        },
        BorderColor::all(palette.hover),
        BackgroundColor(palette.idle),
        children![
            text(title, 20.0, Color::WHITE),
            text(subtitle, 12.0, Color::srgba(1.0, 1.0, 1.0, 0.4)),
        ],
    )
}

/// An absolutely positioned row pinned to one edge of the window.
pub fn anchored_row(top: Option<Val>, bottom: Option<Val>, left: Val, right: Val) -> Node {
    Node {
        position_type: PositionType::Absolute,
        top: top.unwrap_or(Val::Auto),
        bottom: bottom.unwrap_or(Val::Auto),
        left,
        right,
        flex_direction: FlexDirection::Row,
        column_gap: px(12),
        align_items: AlignItems::Center,
        ..default()
    }
}

fn highlight_buttons(
    mut buttons: Query<
        (&Interaction, &ButtonPalette, &mut BackgroundColor),
        (Changed<Interaction>, Without<Disabled>),
    >,
) {
    for (interaction, palette, mut background) in &mut buttons {
        background.0 = match interaction {
            Interaction::Hovered | Interaction::Pressed => palette.hover,
            Interaction::None => palette.idle,
        };
    }
}
