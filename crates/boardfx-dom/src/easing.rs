//! CSS timing functions.
//!
//! Easings travel to the browser as strings (`ease-in-out`,
//! `cubic-bezier(...)`); configuration and environment overrides are parsed
//! back with [`FromStr`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid easing `{0}`")]
pub struct EasingParseError(pub String);

/// Where the jump happens in a `steps()` easing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPosition {
    /// `jump-start` / `start`.
    Start,
    /// `jump-end` / `end`.
    #[default]
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
    /// Control points `(x1, y1, x2, y2)`; x values lie in `[0, 1]`.
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
    Steps { count: u32, position: StepPosition },
}

impl EasingFunction {
    /// The CSS `easing` string.
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EasingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Ease => f.write_str("ease"),
            Self::EaseIn => f.write_str("ease-in"),
            Self::EaseOut => f.write_str("ease-out"),
            Self::EaseInOut => f.write_str("ease-in-out"),
            Self::CubicBezier { x1, y1, x2, y2 } => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
            Self::Steps { count, position } => {
                let pos = match position {
                    StepPosition::Start => "start",
                    StepPosition::End => "end",
                };
                write!(f, "steps({count}, {pos})")
            }
        }
    }
}

impl FromStr for EasingFunction {
    type Err = EasingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || EasingParseError(s.to_string());

        match s {
            "linear" => return Ok(Self::Linear),
            "ease" => return Ok(Self::Ease),
            "ease-in" => return Ok(Self::EaseIn),
            "ease-out" => return Ok(Self::EaseOut),
            "ease-in-out" => return Ok(Self::EaseInOut),
            _ => {}
        }

        let (name, args) = s
            .strip_suffix(')')
            .and_then(|body| body.split_once('('))
            .ok_or_else(err)?;
        let args: Vec<&str> = args.split(',').map(str::trim).collect();

        match name.trim() {
            "cubic-bezier" => {
                let v = args
                    .iter()
                    .map(|a| a.parse::<f32>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| err())?;
                if v.len() != 4 || !(0.0..=1.0).contains(&v[0]) || !(0.0..=1.0).contains(&v[2]) {
                    return Err(err());
                }
                Ok(Self::CubicBezier {
                    x1: v[0],
                    y1: v[1],
                    x2: v[2],
                    y2: v[3],
                })
            }
            "steps" => {
                let count = args
                    .first()
                    .and_then(|c| c.parse::<u32>().ok())
                    .filter(|c| *c >= 1)
                    .ok_or_else(err)?;
                let position = match args.get(1).copied() {
                    None | Some("end") | Some("jump-end") => StepPosition::End,
                    Some("start") | Some("jump-start") => StepPosition::Start,
                    Some(_) => return Err(err()),
                };
                Ok(Self::Steps { count, position })
            }
            _ => Err(err()),
        }
    }
}
