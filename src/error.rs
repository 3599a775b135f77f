use thiserror::Error;

/// Everything that can go wrong while bringing the visualization up.
///
/// Once the scene is running nothing fails; these are all startup faults.
#[derive(Debug, Error)]
pub enum VizError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("mount element #{0} not found")]
    MountNotFound(String),
    #[error("WebGL2 not supported")]
    WebGlUnsupported,
    #[error("shader compile failed: {0}")]
    ShaderCompile(String),
    #[error("program link failed: {0}")]
    ProgramLink(String),
    #[error("failed to allocate GPU {0}")]
    GpuAlloc(&'static str),
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<wasm_bindgen::JsValue> for VizError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        VizError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<VizError> for wasm_bindgen::JsValue {
    fn from(err: VizError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
