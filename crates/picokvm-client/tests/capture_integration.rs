//! Integration tests for the capture path.
//!
//! These tests wire the real controller, pipeline, forwarder and script sink
//! together, with only the OS hook and the browser view replaced by the
//! recording doubles from `infrastructure::*::mock`.

use std::sync::Arc;
use std::time::Duration;

use picokvm_client::application::capture_controller::{
    CaptureController, CaptureSettings, CaptureState, CaptureStatus, TriggerMode,
};
use picokvm_client::application::forward_keys::KeyForwarder;
use picokvm_client::application::local_window::LocalWindowEvents;
use picokvm_client::application::remote_sink::RemoteEventSink;
use picokvm_client::infrastructure::input_capture::mock::MockKeyboardHook;
use picokvm_client::infrastructure::surface::mock::RecordingSurface;
use picokvm_client::infrastructure::surface::ScriptEventSink;
use picokvm_core::keymap::windows_vk::{VK_LCONTROL, VK_LMENU, VK_LSHIFT, VK_LWIN, VK_TAB};
use picokvm_core::{Decision, KeyAction, PhysicalKey};
use tokio::task::JoinHandle;

struct Rig {
    controller: CaptureController,
    hook: MockKeyboardHook,
    surface: RecordingSurface,
    delivery: JoinHandle<()>,
}

fn rig(trigger_mode: TriggerMode) -> Rig {
    let hook = MockKeyboardHook::new();
    let surface = RecordingSurface::new();
    let sink: Arc<dyn RemoteEventSink> = Arc::new(ScriptEventSink::new(surface.clone()));
    let (forwarder, delivery) = KeyForwarder::spawn(Arc::clone(&sink));
    let settings = CaptureSettings {
        trigger_mode,
        ..CaptureSettings::default()
    };
    let controller = CaptureController::new(settings, Box::new(hook.clone()), sink, forwarder, None);
    Rig {
        controller,
        hook,
        surface,
        delivery,
    }
}

fn press(hook: &MockKeyboardHook, vk: u8) -> Option<Decision> {
    hook.simulate(PhysicalKey::new(vk), KeyAction::Pressed)
}

fn release(hook: &MockKeyboardHook, vk: u8) -> Option<Decision> {
    hook.simulate(PhysicalKey::new(vk), KeyAction::Released)
}

/// Drops the controller (and with it the last forwarder), then waits for the
/// delivery task to drain.
async fn finish(rig: Rig) -> RecordingSurface {
    let Rig {
        controller,
        surface,
        delivery,
        ..
    } = rig;
    drop(controller);
    tokio::time::timeout(Duration::from_secs(2), delivery)
        .await
        .expect("delivery should drain")
        .expect("delivery task should not panic");
    surface
}

#[tokio::test]
async fn test_win_e_chord_reaches_surface_in_order() {
    // Arrange
    let mut rig = rig(TriggerMode::Focus);
    rig.controller.on_focus_gained();

    // Act
    let decisions = [
        press(&rig.hook, VK_LWIN),
        press(&rig.hook, 0x45),
        release(&rig.hook, 0x45),
        release(&rig.hook, VK_LWIN),
    ];
    let surface = finish(rig).await;

    // Assert
    assert!(decisions.iter().all(|d| *d == Some(Decision::Intercept)));
    let scripts = surface.scripts();
    assert_eq!(scripts.len(), 4);
    assert!(scripts[0].contains("'keydown'") && scripts[0].contains(r#""code":"MetaLeft""#));
    assert!(scripts[1].contains(r#""code":"KeyE""#) && scripts[1].contains(r#""metaKey":true"#));
    assert!(scripts[2].contains("'keyup'") && scripts[2].contains(r#""code":"KeyE""#));
    assert!(scripts[3].contains("'keyup'") && scripts[3].contains(r#""metaKey":false"#));
}

#[tokio::test]
async fn test_alt_tab_forwards_only_the_tab() {
    // Arrange
    let mut rig = rig(TriggerMode::Focus);
    rig.controller.on_focus_gained();

    // Act
    let alt = press(&rig.hook, VK_LMENU);
    let tab = press(&rig.hook, VK_TAB);
    let surface = finish(rig).await;

    // Assert
    assert_eq!(alt, Some(Decision::PassThrough));
    assert_eq!(tab, Some(Decision::Intercept));
    let scripts = surface.scripts();
    assert_eq!(scripts.len(), 1);
    assert!(scripts[0].contains(r#""code":"Tab""#) && scripts[0].contains(r#""altKey":true"#));
}

#[tokio::test]
async fn test_ordinary_typing_is_not_forwarded() {
    // Arrange
    let mut rig = rig(TriggerMode::Focus);
    rig.controller.on_focus_gained();

    // Act
    let decisions = [
        press(&rig.hook, VK_LCONTROL),
        press(&rig.hook, VK_LSHIFT),
        press(&rig.hook, 0x54),
        release(&rig.hook, 0x54),
        release(&rig.hook, VK_LSHIFT),
        release(&rig.hook, VK_LCONTROL),
    ];
    let surface = finish(rig).await;

    // Assert
    assert!(decisions.iter().all(|d| *d == Some(Decision::PassThrough)));
    assert!(surface.scripts().is_empty());
}

#[tokio::test]
async fn test_focus_loss_while_capturing_uninstalls_exactly_once() {
    // Arrange
    let mut rig = rig(TriggerMode::Focus);
    rig.controller.on_focus_gained();

    // Act
    rig.controller.on_focus_lost();
    rig.controller.on_focus_lost();

    // Assert
    assert_eq!(rig.controller.state(), CaptureState::Idle);
    assert_eq!(rig.hook.install_count(), 1);
    assert_eq!(rig.hook.uninstall_count(), 1);
    assert_eq!(press(&rig.hook, VK_LWIN), None, "no hook, key goes to the OS");
}

#[tokio::test]
async fn test_no_double_install_across_mixed_triggers() {
    let mut rig = rig(TriggerMode::Focus);

    rig.controller.on_focus_gained();
    rig.controller.begin_capture();
    rig.controller.on_focus_gained();

    assert_eq!(rig.hook.install_count(), 1);
    assert_eq!(rig.surface.focus_count(), 1);
}

#[tokio::test]
async fn test_modifiers_held_across_focus_change_are_forgotten() {
    // Arrange: Win is down when focus leaves, so its release is never seen.
    let mut rig = rig(TriggerMode::Focus);
    rig.controller.on_focus_gained();
    press(&rig.hook, VK_LWIN);
    rig.controller.on_focus_lost();

    // Act
    rig.controller.on_focus_gained();
    let letter = press(&rig.hook, 0x45);

    // Assert
    assert_eq!(letter, Some(Decision::PassThrough));
}

#[tokio::test]
async fn test_hook_install_failure_leaves_capture_unavailable() {
    // Arrange
    let mut rig = rig(TriggerMode::Focus);
    rig.hook.set_fail_install(true);

    // Act
    rig.controller.on_focus_gained();

    // Assert
    assert_eq!(rig.controller.state(), CaptureState::Idle);
    assert!(matches!(rig.controller.status(), CaptureStatus::Unavailable { .. }));
    assert_eq!(rig.surface.focus_count(), 0);
}

#[tokio::test]
async fn test_toggle_mode_follows_connection_state() {
    // Arrange
    let mut rig = rig(TriggerMode::Toggle);

    // Act / Assert: refused while disconnected.
    rig.controller.toggle();
    assert_eq!(rig.controller.state(), CaptureState::Idle);

    rig.controller.set_connected(true);
    rig.controller.toggle();
    assert_eq!(rig.controller.state(), CaptureState::Capturing);

    rig.controller.set_connected(false);
    assert_eq!(rig.controller.state(), CaptureState::Idle);
    assert_eq!(rig.hook.uninstall_count(), 1);
}

#[tokio::test]
async fn test_detached_surface_does_not_break_capture() {
    // Arrange
    let mut rig = rig(TriggerMode::Focus);
    rig.controller.on_focus_gained();
    rig.surface.set_attached(false);

    // Act
    let first = press(&rig.hook, VK_LWIN);
    release(&rig.hook, VK_LWIN);
    tokio::time::sleep(Duration::from_millis(20)).await;
    rig.surface.set_attached(true);
    let second = press(&rig.hook, VK_LWIN);
    let surface = finish(rig).await;

    // Assert: the decision never depends on delivery.
    assert_eq!(first, Some(Decision::Intercept));
    assert_eq!(second, Some(Decision::Intercept));
    assert_eq!(surface.scripts().len(), 1);
}

#[tokio::test]
async fn test_sampled_focus_loss_after_startup_releases_the_keyboard() {
    // Arrange: the window starts focused, so capture comes on.
    let mut rig = rig(TriggerMode::Focus);
    let mut window = LocalWindowEvents::new();
    window.update(&mut rig.controller, true, false);
    assert!(rig.hook.is_installed());

    // Act: the operator switches to another window.
    window.update(&mut rig.controller, false, false);

    // Assert
    assert_eq!(rig.controller.state(), CaptureState::Idle);
    assert_eq!(rig.hook.uninstall_count(), 1);
    assert_eq!(press(&rig.hook, VK_LWIN), None);
}

#[tokio::test]
async fn test_win_released_before_letter_still_releases_letter_remotely() {
    // Arrange
    let mut rig = rig(TriggerMode::Focus);
    rig.controller.on_focus_gained();

    // Act
    let decisions = [
        press(&rig.hook, VK_LWIN),
        press(&rig.hook, 0x45),
        release(&rig.hook, VK_LWIN),
        release(&rig.hook, 0x45),
    ];
    let surface = finish(rig).await;

    // Assert: every keydown reaching the page has its keyup.
    assert!(decisions.iter().all(|d| *d == Some(Decision::Intercept)));
    let scripts = surface.scripts();
    assert_eq!(scripts.len(), 4);
    assert!(scripts[3].contains("'keyup'") && scripts[3].contains(r#""code":"KeyE""#));
}
