//! `KeyframeEffect` to the arguments of `Element.animate()`.

use boardfx_dom::{DomError, Keyframe, KeyframeEffect, Timing};
use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsValue;

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), DomError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|err| DomError::Animation(format!("cannot set `{key}`: {err:?}")))
}

fn keyframe_object(keyframe: &Keyframe) -> Result<Object, DomError> {
    let object = Object::new();
    for (property, value) in &keyframe.properties {
        set(&object, property, &JsValue::from_str(value))?;
    }
    if let Some(offset) = keyframe.offset {
        set(&object, "offset", &JsValue::from_f64(offset))?;
    }
    Ok(object)
}

pub(crate) fn keyframes(effect: &KeyframeEffect) -> Result<Array, DomError> {
    let frames = Array::new();
    for keyframe in &effect.keyframes {
        frames.push(&keyframe_object(keyframe)?.into());
    }
    Ok(frames)
}

pub(crate) fn options(timing: &Timing) -> Result<Object, DomError> {
    let options = Object::new();
    set(&options, "duration", &JsValue::from_f64(timing.duration_ms.max(0.0)))?;
    set(&options, "easing", &JsValue::from_str(&timing.easing.to_css()))?;
    set(&options, "fill", &JsValue::from_str(timing.fill.as_css()))?;
    set(&options, "iterations", &JsValue::from_f64(1.0))?;
    Ok(options)
}
