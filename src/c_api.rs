// C ABI over a single process-wide engine, for hosts that embed the parser.
// Strings in are NUL-terminated UTF-8; strings out are JSON and must be
// released with `taskboard_assistant_free_string`.
use crate::config::AssistantConfig;
use crate::core::types::Board;
use crate::AssistantEngine;
use libc::c_char;
use std::ffi::{CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::ptr;
use std::sync::{Mutex, MutexGuard};
use tracing::{error, info};

static ENGINE: Mutex<Option<AssistantEngine>> = Mutex::new(None);

fn engine_slot() -> MutexGuard<'static, Option<AssistantEngine>> {
    ENGINE.lock().unwrap_or_else(|e| e.into_inner())
}

/// # Safety
/// `ptr` must be null or point to a NUL-terminated string valid for `'a`.
unsafe fn str_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

fn into_c_string(json: String) -> *mut c_char {
    CString::new(json).map(CString::into_raw).unwrap_or(ptr::null_mut())
}

fn with_engine<R>(f: impl FnOnce(&AssistantEngine) -> R) -> Option<R> {
    let slot = engine_slot();
    slot.as_ref().map(f)
}

/// Starts the engine. `data_dir` may be null to use the configured default.
///
/// # Safety
/// `data_dir` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn taskboard_assistant_init(data_dir: *const c_char) {
    let data_dir = str_arg(data_dir).map(PathBuf::from);
    let result = catch_unwind(AssertUnwindSafe(move || {
        let mut slot = engine_slot();
        if slot.is_some() {
            return;
        }
        let engine = match AssistantConfig::from_env() {
            Ok(mut config) => {
                if let Some(dir) = data_dir {
                    config.data_dir = dir;
                }
                AssistantEngine::from_config(&config)
            }
            Err(e) => {
                error!("no usable configuration, learning will not persist: {}", e);
                AssistantEngine::in_memory()
            }
        };
        *slot = Some(engine);
        info!("assistant engine initialized");
    }));
    if result.is_err() {
        error!("panic during assistant engine initialization");
    }
}

#[no_mangle]
pub extern "C" fn taskboard_assistant_destroy() {
    // Every write already went to storage; dropping is all that is left.
    engine_slot().take();
}

/// Parses a command. `boards_json` is a JSON array of boards; `active_board_id`
/// may be null. Returns the outcome as JSON, `null` when there is nothing to do.
///
/// # Safety
/// Every pointer must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn taskboard_assistant_parse(
    text: *const c_char,
    boards_json: *const c_char,
    active_board_id: *const c_char,
) -> *mut c_char {
    let text = str_arg(text).unwrap_or("");
    let boards: Vec<Board> = str_arg(boards_json)
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default();
    let active = str_arg(active_board_id);

    let result = catch_unwind(AssertUnwindSafe(|| {
        with_engine(|engine| engine.parse_task_intent(text, &boards, active))
            .flatten()
            .and_then(|outcome| serde_json::to_string(&outcome).ok())
            .unwrap_or_else(|| "null".to_string())
    }));
    let json = result.unwrap_or_else(|_| {
        error!("panic in taskboard_assistant_parse");
        "null".to_string()
    });
    into_c_string(json)
}

/// # Safety
/// `name` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn taskboard_assistant_learn_entity(name: *const c_char) {
    if let Some(name) = str_arg(name) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            with_engine(|engine| engine.learn_entity(name))
        }));
    }
}

/// # Safety
/// `text` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn taskboard_assistant_learn_vocabulary(text: *const c_char) {
    if let Some(text) = str_arg(text) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            with_engine(|engine| engine.learn_vocabulary(text))
        }));
    }
}

/// # Safety
/// `boards_json` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn taskboard_assistant_inject_context(boards_json: *const c_char) {
    let Some(boards) =
        str_arg(boards_json).and_then(|raw| serde_json::from_str::<Vec<Board>>(raw).ok())
    else {
        return;
    };
    let _ = catch_unwind(AssertUnwindSafe(|| {
        with_engine(|engine| engine.inject_context(&boards))
    }));
}

/// # Safety
/// `s` must be null or a pointer returned by this library, freed only once.
#[no_mangle]
pub unsafe extern "C" fn taskboard_assistant_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
