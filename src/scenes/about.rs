use bevy::prelude::*;

use super::back_button;
use crate::effects::SparkleField;
use crate::effects::StarField;
use crate::state::Screen;
use crate::ui::CYAN;
use crate::ui::MUTED_TEXT;
use crate::ui::text;

pub struct AboutPlugin;

impl Plugin for AboutPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Screen::About), (spawn_about_backdrop, spawn_about_card));
    }
}

const CREATOR: &str = "IDIN ISKANDAR";
const ROLE: &str = "Creator & Developer";

const BADGES: [(&str, Color); 3] = [
    ("ReactJS", Color::srgb(0.13, 0.83, 0.93)),
    ("ThreeJS", Color::srgb(0.38, 0.65, 0.98)),
    ("Content Creator", Color::srgb(0.75, 0.52, 0.99)),
];

const SECTIONS: [(&str, &str, Color); 2] = [
    (
        "THE MISSION",
        "\"Saya membuat IdinVerse bukan sekadar sebagai portfolio, tapi sebagai eksperimen batas \
         kemampuan teknologi web modern. Saya ingin menggabungkan Coding, Seni Visual, dan \
         Interaktivitas menjadi satu pengalaman yang imersif.\"",
        Color::srgb(0.13, 0.83, 0.93),
    ),
    (
        "WHY 3D WEB?",
        "Website biasa itu membosankan. Di sini, pengunjung tidak hanya membaca, tapi menjelajah. \
         Ini adalah visi saya tentang masa depan internet: Dunia virtual yang bisa diakses siapa \
         saja, langsung dari browser mereka.",
        Color::srgb(0.38, 0.65, 0.98),
    ),
];

fn spawn_about_backdrop(mut commands: Commands) {
    commands.spawn((
        Name::new("AboutStars"),
        DespawnOnExit(Screen::About),
        StarField::new(5000, 100.0, 50.0),
    ));
    commands.spawn((
        Name::new("AboutSparkles"),
        DespawnOnExit(Screen::About),
        SparkleField::new(200, Vec3::splat(10.0), Color::srgb(0.0, 1.0, 1.0))
            .with_speed(0.2)
            .with_glow(0.5),
    ));
}

fn spawn_about_card(mut commands: Commands) {
    commands
        .spawn((
            Name::new("AboutCard"),
            DespawnOnExit(Screen::About),
            Node {
                width: percent(100),
                height: percent(100),
                padding: UiRect::all(px(24)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
        ))
        .with_children(|screen| {
            screen
                .spawn((
                    Node {
                        max_width: px(896),
                        width: percent(100),
                        padding: UiRect::all(px(48)),
                        border: UiRect::all(px(1)),
                        column_gap: px(40),
                        ..default()
                    },
                    BorderColor::all(Color::srgba(1.0, 1.0, 1.0, 0.1)),
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.4)),
                ))
                .with_children(|card| {
                    card.spawn((
                        Node {
                            position_type: PositionType::Absolute,
                            top: px(16),
                            left: px(16),
                            ..default()
                        },
                        children![back_button("<")],
                    ));

                    card.spawn(Node {
                        width: percent(33),
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        row_gap: px(8),
                        ..default()
                    })
                    .with_children(|profile| {
                        profile.spawn(text(CREATOR, 30.0, CYAN));
                        profile.spawn(text(ROLE, 14.0, MUTED_TEXT));
                        profile
                            .spawn(Node {
                                flex_wrap: FlexWrap::Wrap,
                                justify_content: JustifyContent::Center,
                                column_gap: px(8),
                                row_gap: px(8),
                                margin: UiRect::top(px(16)),
                                ..default()
                            })
                            .with_children(|badges| {
                                for (label, color) in BADGES {
                                    badges.spawn((
                                        Node {
                                            padding: UiRect::axes(px(12), px(4)),
                                            border: UiRect::all(px(1)),
                                            ..default()
                                        },
                                        BorderColor::all(color.with_alpha(0.3)),
                                        children![text(label, 12.0, color)],
                                    ));
                                }
                            });
                    });

                    card.spawn(Node {
                        width: percent(67),
                        flex_direction: FlexDirection::Column,
                        row_gap: px(24),
                        ..default()
                    })
                    .with_children(|story| {
                        for (title, body, color) in SECTIONS {
                            story.spawn(text(title, 20.0, color));
                            story.spawn(text(body, 15.0, Color::srgba(1.0, 1.0, 1.0, 0.7)));
                        }
                    });
                });
        });
}
