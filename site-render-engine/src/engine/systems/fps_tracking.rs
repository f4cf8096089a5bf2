use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use constants::rpc::notifications::FPS_UPDATE;

use crate::engine::loading::progress::LoadingOrchestrator;
use crate::engine::narrative::NarrativeStatus;
use crate::engine::scroll::smooth_scroll::SmoothScrollController;
use crate::rpc::web_rpc::WebRpcInterface;

/// Seconds between FPS notifications.
const FPS_NOTIFY_INTERVAL: f32 = 0.5;

#[derive(Component)]
pub struct DiagnosticsText;

/// Smoothed frame rate, if the diagnostic has enough samples.
pub fn current_fps(diagnostics: &DiagnosticsStore) -> Option<f32> {
    diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .map(|value| value as f32)
}

pub fn fps_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    diagnostics: Res<DiagnosticsStore>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();

    if current_time - *last_send_time >= FPS_NOTIFY_INTERVAL {
        if let Some(fps) = current_fps(&diagnostics) {
            rpc_interface.send_notification(FPS_UPDATE, serde_json::json!({ "fps": fps }));
            *last_send_time = current_time;
        }
    }
}

pub fn spawn_diagnostics_overlay(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                DiagnosticsText,
            ));
        });
}

pub fn diagnostics_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    controller: Res<SmoothScrollController>,
    narrative: Res<NarrativeStatus>,
    loading: Res<LoadingOrchestrator>,
    mut query: Query<&mut Text, With<DiagnosticsText>>,
) {
    let fps = current_fps(&diagnostics).unwrap_or(0.0);
    let scroll = controller.state();
    let line = format!(
        "FPS: {fps:.1}\nScroll: {:.0} / {:.0}\nChapter: {}\nLoading: {:.0}%",
        scroll.smoothed_offset,
        controller.limit(),
        narrative.chapter + 1,
        loading.progress().displayed,
    );
    for mut text in &mut query {
        if text.0 != line {
            text.0 = line.clone();
        }
    }
}
