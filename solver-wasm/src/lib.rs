use serde::Serialize;
use solver_core::models::{ApiInput, ProgressUpdate};
use wasm_bindgen::prelude::*;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

// When the `console_error_panic_hook` feature is enabled, we can call the
// `set_panic_hook` function at least once during initialization, and then
// we will get better error messages if our code ever panics.
//
// For more details see
// https://github.com/rustwasm/console_error_panic_hook#readme
#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();
}

/// Makes a JS callback usable as a Rust `FnMut(&ProgressUpdate) -> bool`.
///
/// # Safety
///
/// WASM is single-threaded, so the `Send` bound `ProgressCallback` requires
/// is vacuously safe here even though `js_sys::Function` is not `Send`.
fn js_progress_callback(
    js_callback: js_sys::Function,
) -> Box<dyn FnMut(&ProgressUpdate) -> bool + Send> {
    let callback = move |progress: &ProgressUpdate| -> bool {
        let progress_json = match serde_json::to_string(progress) {
            Ok(json) => json,
            Err(e) => {
                web_sys::console::error_1(&format!("failed to serialize progress: {e}").into());
                return true;
            }
        };

        let this = JsValue::null();
        let json_value = JsValue::from_str(&progress_json);
        match js_callback.call1(&this, &json_value) {
            Ok(result) => result.as_bool().unwrap_or(true),
            Err(e) => {
                web_sys::console::error_1(&format!("progress callback error: {e:?}").into());
                true
            }
        }
    };
    let boxed = Box::new(callback) as Box<dyn FnMut(&ProgressUpdate) -> bool>;
    unsafe { std::mem::transmute(boxed) }
}

#[wasm_bindgen]
pub fn solve(problem_json: &str) -> Result<String, JsValue> {
    init_panic_hook();

    let api_input: ApiInput = serde_json::from_str(problem_json)
        .map_err(|e| JsValue::from_str(&format!("failed to parse problem: {e}")))?;

    let result = solver_core::run_solver(&api_input)
        .map_err(|e| JsValue::from_str(&format!("solver error: {e}")))?;

    serde_json::to_string(&result)
        .map_err(|e| JsValue::from_str(&format!("failed to serialize result: {e}")))
}

#[wasm_bindgen]
pub fn solve_with_progress(
    problem_json: &str,
    ga_progress_callback: Option<js_sys::Function>,
    sa_progress_callback: Option<js_sys::Function>,
) -> Result<String, JsValue> {
    init_panic_hook();

    let api_input: ApiInput = serde_json::from_str(problem_json)
        .map_err(|e| JsValue::from_str(&format!("failed to parse problem: {e}")))?;

    let mut ga_callback = ga_progress_callback.map(js_progress_callback);
    let mut sa_callback = sa_progress_callback.map(js_progress_callback);

    let result = solver_core::run_solver_with_progress(
        &api_input,
        ga_callback.as_deref_mut(),
        sa_callback.as_deref_mut(),
    )
    .map_err(|e| JsValue::from_str(&format!("solver error: {e}")))?;

    serde_json::to_string(&result)
        .map_err(|e| JsValue::from_str(&format!("failed to serialize result: {e}")))
}

#[wasm_bindgen]
pub fn validate_problem(problem_json: &str) -> Result<String, JsValue> {
    init_panic_hook();

    let api_input: ApiInput = serde_json::from_str(problem_json)
        .map_err(|e| JsValue::from_str(&format!("failed to parse problem: {e}")))?;

    let mut errors = Vec::new();
    if api_input.sessions.is_empty() {
        errors.push("no sessions defined".to_string());
    }
    if api_input.rooms.is_empty() {
        errors.push("no rooms defined".to_string());
    }
    if api_input.slot_penalties.is_empty() {
        errors.push("no slot penalties defined".to_string());
    }
    for session in &api_input.sessions {
        if let Some(group_name) = &session.group_name {
            if !api_input.groups.iter().any(|g| &g.group_name == group_name) {
                errors.push(format!(
                    "session '{}' references unknown group '{group_name}' (falls back to size 30)",
                    session.session_name
                ));
            }
        }
    }

    #[derive(Serialize)]
    struct ValidationResult {
        valid: bool,
        errors: Vec<String>,
    }

    let valid = errors.is_empty();
    serde_json::to_string(&ValidationResult { valid, errors })
        .map_err(|e| JsValue::from_str(&format!("failed to serialize validation result: {e}")))
}

#[wasm_bindgen]
pub fn get_default_settings() -> Result<String, JsValue> {
    init_panic_hook();

    use solver_core::models::{LoggingOptions, SolverConfiguration};

    let settings = SolverConfiguration {
        optimizer: Default::default(),
        logging: LoggingOptions {
            log_frequency: Some(50),
            log_initial_state: true,
            log_duration_and_score: true,
            display_final_schedule: true,
            log_final_score_breakdown: true,
        },
    };

    serde_json::to_string(&settings)
        .map_err(|e| JsValue::from_str(&format!("failed to serialize settings: {e}")))
}

/// Confirms the SA progress callback's last reported fitness matches the
/// final result's fitness, catching drift between the two reporting paths.
#[wasm_bindgen]
pub fn test_callback_consistency(problem_json: &str) -> Result<String, JsValue> {
    init_panic_hook();

    let api_input: ApiInput = serde_json::from_str(problem_json)
        .map_err(|e| JsValue::from_str(&format!("failed to parse problem: {e}")))?;

    use std::sync::{Arc, Mutex};
    let captured = Arc::new(Mutex::new(Vec::new()));
    let captured_clone = Arc::clone(&captured);
    let mut sa_callback: Box<dyn FnMut(&ProgressUpdate) -> bool + Send> =
        Box::new(move |progress: &ProgressUpdate| {
            captured_clone.lock().unwrap().push(*progress);
            true
        });

    let result =
        solver_core::run_solver_with_progress(&api_input, None, Some(sa_callback.as_mut()))
            .map_err(|e| JsValue::from_str(&format!("solver error: {e}")))?;

    let captured = captured.lock().unwrap();
    let mut analysis = serde_json::Map::new();
    match captured.last() {
        Some(last_update) => {
            let matches = (last_update.current_fitness - result.metrics.final_fitness).abs() < 1e-6;
            analysis.insert(
                "last_callback_fitness".to_string(),
                serde_json::json!(last_update.current_fitness),
            );
            analysis.insert(
                "final_result_fitness".to_string(),
                serde_json::json!(result.metrics.final_fitness),
            );
            analysis.insert("fitness_matches".to_string(), serde_json::json!(matches));
            analysis.insert("total_updates".to_string(), serde_json::json!(captured.len()));
        }
        None => {
            analysis.insert(
                "error".to_string(),
                serde_json::json!("no progress updates captured"),
            );
        }
    }

    serde_json::to_string(&analysis)
        .map_err(|e| JsValue::from_str(&format!("failed to serialize analysis: {e}")))
}
