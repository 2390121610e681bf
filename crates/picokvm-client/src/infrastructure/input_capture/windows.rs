//! Windows low-level keyboard hook implementation.
//!
//! `install()` spawns a dedicated thread that installs `WH_KEYBOARD_LL` and
//! runs a `GetMessageW` loop (low-level hooks are only called while their
//! installing thread pumps messages).  `uninstall()` posts `WM_QUIT` to that
//! thread and joins it; the thread removes the hook on its way out.
//!
//! Hook procedures receive no user pointer, so the active [`HookHandler`] lives
//! in a process-global slot.  Only one `WindowsKeyboardHook` can be installed
//! at a time.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};

use picokvm_core::{Decision, KeyAction, PhysicalKey};
use tracing::{debug, warn};
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::{
    GetCurrentThread, GetCurrentThreadId, SetThreadPriority, THREAD_PRIORITY_TIME_CRITICAL,
};
use windows::Win32::UI::Input::KeyboardAndMouse::GetAsyncKeyState;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PeekMessageW, PostThreadMessageW,
    SetWindowsHookExW, TranslateMessage, UnhookWindowsHookEx, HC_ACTION, KBDLLHOOKSTRUCT, MSG,
    PM_NOREMOVE, WH_KEYBOARD_LL, WM_KEYDOWN, WM_KEYUP, WM_QUIT, WM_SYSKEYDOWN, WM_SYSKEYUP,
};

use super::{CaptureError, HookHandler, KeyboardHook};
use crate::application::route_keys::KeyStateQuery;

/// Handler called by [`keyboard_hook_proc`].  Set by `install`, cleared by `uninstall`.
static HOOK_HANDLER: Mutex<Option<HookHandler>> = Mutex::new(None);

/// `WH_KEYBOARD_LL` hook running on its own message-loop thread.
pub struct WindowsKeyboardHook {
    /// Win32 thread id of the message loop; target of `PostThreadMessageW`.
    thread_id: u32,
    thread: Option<JoinHandle<()>>,
}

impl WindowsKeyboardHook {
    pub fn new() -> Self {
        Self {
            thread_id: 0,
            thread: None,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.thread.is_some()
    }
}

impl Default for WindowsKeyboardHook {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardHook for WindowsKeyboardHook {
    fn install(&mut self, handler: HookHandler) -> Result<(), CaptureError> {
        if self.thread.is_some() {
            return Err(CaptureError::KeyboardHookInstallFailed(
                "hook already installed".to_string(),
            ));
        }

        {
            let mut slot = HOOK_HANDLER.lock().map_err(|_| {
                CaptureError::KeyboardHookInstallFailed("handler slot poisoned".to_string())
            })?;
            if slot.is_some() {
                return Err(CaptureError::KeyboardHookInstallFailed(
                    "another keyboard hook is active in this process".to_string(),
                ));
            }
            *slot = Some(handler);
        }

        // The loop thread reports its Win32 thread id once the hook is in place.
        let (ready_tx, ready_rx) = mpsc::channel::<Result<u32, String>>();

        let thread = match thread::Builder::new()
            .name("picokvm-hook-loop".to_string())
            .spawn(move || run_hook_message_loop(ready_tx))
        {
            Ok(thread) => thread,
            Err(e) => {
                clear_handler();
                return Err(CaptureError::KeyboardHookInstallFailed(e.to_string()));
            }
        };

        match ready_rx.recv() {
            Ok(Ok(thread_id)) => {
                self.thread_id = thread_id;
                self.thread = Some(thread);
                debug!("WH_KEYBOARD_LL hook installed on thread {thread_id}");
                Ok(())
            }
            Ok(Err(reason)) => {
                let _ = thread.join();
                clear_handler();
                Err(CaptureError::KeyboardHookInstallFailed(reason))
            }
            Err(_) => {
                clear_handler();
                Err(CaptureError::KeyboardHookInstallFailed(
                    "hook thread exited before reporting status".to_string(),
                ))
            }
        }
    }

    fn uninstall(&mut self) -> Result<(), CaptureError> {
        if self.thread.is_none() {
            return Ok(());
        }

        // SAFETY: thread_id belongs to the live loop thread, whose message
        // queue was created before the id was published.
        let posted =
            unsafe { PostThreadMessageW(self.thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) };

        // The loop thread and its hook are still alive; keep owning them.
        posted.map_err(|e| CaptureError::KeyboardHookRemoveFailed(e.to_string()))?;

        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("keyboard hook thread panicked");
            }
        }
        self.thread_id = 0;
        clear_handler();
        debug!("WH_KEYBOARD_LL hook removed");
        Ok(())
    }
}

impl Drop for WindowsKeyboardHook {
    fn drop(&mut self) {
        if let Err(e) = self.uninstall() {
            warn!("keyboard hook left running: {e}");
        }
    }
}

fn clear_handler() {
    let _ = HOOK_HANDLER.lock().map(|mut slot| *slot = None);
}

/// Entry point for the dedicated Win32 message loop thread.
fn run_hook_message_loop(ready: Sender<Result<u32, String>>) {
    let mut msg = MSG::default();

    // SAFETY: forces creation of this thread's message queue so a WM_QUIT
    // posted right after `install` returns is not lost.
    unsafe {
        let _ = PeekMessageW(&mut msg, None, 0, 0, PM_NOREMOVE);
    }

    // SAFETY: GetCurrentThread returns a pseudo-handle valid for this thread.
    if let Err(e) = unsafe { SetThreadPriority(GetCurrentThread(), THREAD_PRIORITY_TIME_CRITICAL) } {
        debug!("could not raise hook thread priority: {e}");
    }

    // SAFETY: installs a global low-level hook; the callback is a valid
    // `extern "system"` function and this thread pumps messages below.
    let hook = match unsafe { SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook_proc), None, 0) } {
        Ok(hook) => hook,
        Err(e) => {
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };

    // SAFETY: no preconditions.
    let thread_id = unsafe { GetCurrentThreadId() };
    let _ = ready.send(Ok(thread_id));

    // SAFETY: standard Win32 GetMessage/DispatchMessage loop.  GetMessageW
    // returns 0 on WM_QUIT and -1 on error; both end the loop.
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).0 > 0 {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
        if let Err(e) = UnhookWindowsHookEx(hook) {
            warn!("UnhookWindowsHookEx failed: {e}");
        }
    }
}

/// Low-level keyboard hook callback.
///
/// Returning a non-zero `LRESULT` without calling `CallNextHookEx` swallows the
/// keystroke.  Never logs; must return well within the OS hook timeout.
///
/// # Safety
///
/// Called by Windows on the hook message-loop thread.
unsafe extern "system" fn keyboard_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code != HC_ACTION as i32 {
        // SAFETY: Must call CallNextHookEx when n_code < 0.
        return CallNextHookEx(None, n_code, w_param, l_param);
    }

    let action = match w_param.0 as u32 {
        WM_KEYDOWN | WM_SYSKEYDOWN => KeyAction::Pressed,
        WM_KEYUP | WM_SYSKEYUP => KeyAction::Released,
        _ => return CallNextHookEx(None, n_code, w_param, l_param),
    };

    // SAFETY: l_param points to a KBDLLHOOKSTRUCT when n_code == HC_ACTION.
    let kbs = &*(l_param.0 as *const KBDLLHOOKSTRUCT);
    let key = PhysicalKey::new(kbs.vkCode as u8);

    let handler = HOOK_HANDLER.lock().ok().and_then(|slot| slot.clone());
    let decision = match handler {
        Some(handler) => panic::catch_unwind(AssertUnwindSafe(|| handler(key, action)))
            .unwrap_or(Decision::PassThrough),
        None => Decision::PassThrough,
    };

    match decision {
        Decision::Intercept => LRESULT(1),
        // SAFETY: Forward the event to the next hook in the chain.
        Decision::PassThrough => CallNextHookEx(None, n_code, w_param, l_param),
    }
}

/// Live key state via `GetAsyncKeyState`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsKeyState;

impl KeyStateQuery for WindowsKeyState {
    fn is_down(&self, key: PhysicalKey) -> bool {
        // SAFETY: GetAsyncKeyState accepts any virtual-key code.
        let state = unsafe { GetAsyncKeyState(i32::from(key.vk())) };
        (state as u16 & 0x8000) != 0
    }
}
