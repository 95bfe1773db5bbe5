//! WebAssembly bindings for Costume Lights.
//!
//! Provides thin wrappers around the block codec and the action table for the
//! browser editor.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::{
    animation::{LightFrame, TimelinePlayer},
    compute::{ActionTable, BlockPattern, FramePayload},
    schema::{BodyPart, Color, EditorConfig},
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Encode a block pattern (`{grid, slots}`) into its digit code.
#[wasm_bindgen(js_name = encodeBlockPattern)]
pub fn encode_block_pattern(pattern: JsValue) -> Result<String, JsValue> {
    let pattern: BlockPattern = serde_wasm_bindgen::from_value(pattern)
        .map_err(|e| JsValue::from_str(&format!("Invalid block pattern: {e}")))?;
    Ok(pattern.encode())
}

/// Decode a digit code (or a `{"color": ...}` payload) into a block pattern.
#[wasm_bindgen(js_name = decodeBlockPattern)]
pub fn decode_block_pattern(code: &str, alpha: f32) -> Result<JsValue, JsValue> {
    let pattern = if code.trim_start().starts_with('{') {
        FramePayload::from_json(code)
            .and_then(|payload| payload.to_pattern(alpha))
            .map_err(js_error)?
    } else {
        BlockPattern::decode(code, alpha).map_err(js_error)?
    };
    to_js(&pattern)
}

/// WebAssembly wrapper for the armor editor's action table.
#[wasm_bindgen]
pub struct WasmTimeline {
    table: ActionTable,
    config: EditorConfig,
}

#[wasm_bindgen]
impl WasmTimeline {
    /// Create a timeline with `players` empty players.
    ///
    /// # Arguments
    /// * `config_json` - JSON string containing EditorConfig
    /// * `players` - Number of performers
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, players: usize) -> Result<WasmTimeline, JsValue> {
        let config: EditorConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {e}")))?;
        config.validate().map_err(js_error)?;

        Ok(WasmTimeline {
            table: ActionTable::new(players),
            config,
        })
    }

    /// Paint `color` (`{R, G, B, A}`) on a body part at `time`.
    ///
    /// Returns the snapped time so the caller can move its playhead.
    #[wasm_bindgen]
    pub fn insert(
        &mut self,
        player: usize,
        part: usize,
        time: u32,
        color: JsValue,
    ) -> Result<u32, JsValue> {
        let part = BodyPart::try_from(part).map_err(js_error)?;
        let color: Color = serde_wasm_bindgen::from_value(color)
            .map_err(|e| JsValue::from_str(&format!("Invalid color: {e}")))?;

        let timeline = &self.config.timeline;
        self.table = self
            .table
            .insert(player, part, time, color, timeline)
            .map_err(js_error)?;
        Ok(timeline.snap(time))
    }

    /// Color lit on a body part at `time`.
    #[wasm_bindgen]
    pub fn resolve(&self, player: usize, part: usize, time: u32) -> Result<JsValue, JsValue> {
        let part = BodyPart::try_from(part).map_err(js_error)?;
        to_js(&self.table.resolve(player, part, time))
    }

    /// Colors of all nine body parts of `player` at `time`.
    #[wasm_bindgen(js_name = frameAt)]
    pub fn frame_at(&self, player: usize, time: u32) -> Result<JsValue, JsValue> {
        to_js(&self.table.frame_at(player, time))
    }

    /// Packed `0xRRGGBBAA` colors of all nine body parts at `time`, as shown
    /// on the costume (alpha applied).
    #[wasm_bindgen(js_name = packedFrame)]
    pub fn packed_frame(&self, player: usize, time: u32) -> js_sys::Uint32Array {
        let frame = LightFrame::from_colors(time, &self.table.frame_at(player, time));
        js_sys::Uint32Array::from(&frame.colors[..])
    }

    /// Sample `player` every `step_ms` into a light list.
    #[wasm_bindgen(js_name = lightList)]
    pub fn light_list(&self, player: usize, step_ms: u32) -> Result<JsValue, JsValue> {
        let sampler =
            TimelinePlayer::new(&self.table, player, step_ms, self.config.timeline.duration)
                .map_err(js_error)?;
        to_js(&sampler.to_light_list())
    }

    /// Get the whole action table.
    #[wasm_bindgen(js_name = getTable)]
    pub fn get_table(&self) -> Result<JsValue, JsValue> {
        to_js(&self.table)
    }

    /// Replace the action table from its JSON form.
    #[wasm_bindgen(js_name = loadTable)]
    pub fn load_table(&mut self, table_json: &str) -> Result<(), JsValue> {
        self.table = ActionTable::read_from(table_json.as_bytes()).map_err(js_error)?;
        Ok(())
    }

    /// Get number of players.
    #[wasm_bindgen(js_name = playerCount)]
    pub fn player_count(&self) -> usize {
        self.table.player_count()
    }
}
