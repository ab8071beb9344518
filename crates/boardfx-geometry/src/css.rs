//! Parsing of the computed-style values that contribute to an element's matrix.
//!
//! Browsers report `transform` as `none` or `matrix(...)`, but inline styles
//! and keyframes written by hand use function lists, so both are accepted.

use std::f64::consts::PI;
use std::str::FromStr;

use thiserror::Error;

use crate::transform::Transform2D;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CssParseError {
    #[error("unknown transform function `{0}`")]
    UnknownFunction(String),
    #[error("`{function}` expects {expected} argument(s), got {got}")]
    ArgumentCount {
        function: String,
        expected: &'static str,
        got: usize,
    },
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    #[error("invalid angle `{0}`")]
    InvalidAngle(String),
    #[error("unbalanced parentheses in `{0}`")]
    Unbalanced(String),
}

impl FromStr for Transform2D {
    type Err = CssParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_transform(s)
    }
}

/// Parse a CSS `transform` value into a single matrix.
///
/// Functions compose left to right, as in CSS: `translate(10px) scale(2)`
/// translates the scaled element.
pub fn parse_transform(value: &str) -> Result<Transform2D, CssParseError> {
    let value = value.trim();
    if value.is_empty() || value == "none" {
        return Ok(Transform2D::identity());
    }

    let mut result = Transform2D::identity();
    let mut rest = value;
    while !rest.is_empty() {
        let open = rest
            .find('(')
            .ok_or_else(|| CssParseError::Unbalanced(value.to_string()))?;
        let close = rest[open..]
            .find(')')
            .map(|i| i + open)
            .ok_or_else(|| CssParseError::Unbalanced(value.to_string()))?;

        let name = rest[..open].trim();
        let args: Vec<&str> = rest[open + 1..close]
            .split(',')
            .flat_map(|part| part.split_whitespace())
            .filter(|part| !part.is_empty())
            .collect();

        result = result.then(&transform_function(name, &args)?);
        rest = rest[close + 1..].trim_start();
    }
    Ok(result)
}

fn transform_function(name: &str, args: &[&str]) -> Result<Transform2D, CssParseError> {
    let arity = |expected: &'static str, ok: bool| {
        if ok {
            Ok(())
        } else {
            Err(CssParseError::ArgumentCount {
                function: name.to_string(),
                expected,
                got: args.len(),
            })
        }
    };

    match name {
        "matrix" => {
            arity("6", args.len() == 6)?;
            let v = args
                .iter()
                .map(|a| parse_number(a))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Transform2D::new(v[0], v[1], v[2], v[3], v[4], v[5]))
        }
        "translate" => {
            arity("1 or 2", matches!(args.len(), 1 | 2))?;
            let x = parse_length(args[0])?;
            let y = args.get(1).map(|a| parse_length(a)).transpose()?.unwrap_or(0.0);
            Ok(Transform2D::translate(x, y))
        }
        "translateX" => {
            arity("1", args.len() == 1)?;
            Ok(Transform2D::translate(parse_length(args[0])?, 0.0))
        }
        "translateY" => {
            arity("1", args.len() == 1)?;
            Ok(Transform2D::translate(0.0, parse_length(args[0])?))
        }
        "scale" => {
            arity("1 or 2", matches!(args.len(), 1 | 2))?;
            let x = parse_number(args[0])?;
            let y = args.get(1).map(|a| parse_number(a)).transpose()?.unwrap_or(x);
            Ok(Transform2D::scale(x, y))
        }
        "scaleX" => {
            arity("1", args.len() == 1)?;
            Ok(Transform2D::scale(parse_number(args[0])?, 1.0))
        }
        "scaleY" => {
            arity("1", args.len() == 1)?;
            Ok(Transform2D::scale(1.0, parse_number(args[0])?))
        }
        "rotate" => {
            arity("1", args.len() == 1)?;
            Ok(Transform2D::rotate(parse_angle(args[0])?))
        }
        "skew" => {
            arity("1 or 2", matches!(args.len(), 1 | 2))?;
            let x = parse_angle(args[0])?;
            let y = args.get(1).map(|a| parse_angle(a)).transpose()?.unwrap_or(0.0);
            Ok(Transform2D::skew(x, y))
        }
        "skewX" => {
            arity("1", args.len() == 1)?;
            Ok(Transform2D::skew(parse_angle(args[0])?, 0.0))
        }
        "skewY" => {
            arity("1", args.len() == 1)?;
            Ok(Transform2D::skew(0.0, parse_angle(args[0])?))
        }
        other => Err(CssParseError::UnknownFunction(other.to_string())),
    }
}

fn parse_number(value: &str) -> Result<f64, CssParseError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| CssParseError::InvalidNumber(value.to_string()))
}

/// Pixel lengths; a bare number is read as pixels.
fn parse_length(value: &str) -> Result<f64, CssParseError> {
    let value = value.trim();
    parse_number(value.strip_suffix("px").unwrap_or(value))
}

/// Parse a CSS angle into radians. A bare number is read as degrees, which
/// is how the `rotate` property is reported by some engines.
pub fn parse_angle(value: &str) -> Result<f64, CssParseError> {
    let value = value.trim();
    let invalid = || CssParseError::InvalidAngle(value.to_string());

    let (number, to_rad) = if let Some(v) = value.strip_suffix("deg") {
        (v, PI / 180.0)
    } else if let Some(v) = value.strip_suffix("grad") {
        (v, PI / 200.0)
    } else if let Some(v) = value.strip_suffix("rad") {
        (v, 1.0)
    } else if let Some(v) = value.strip_suffix("turn") {
        (v, 2.0 * PI)
    } else {
        (value, PI / 180.0)
    };

    number
        .trim()
        .parse::<f64>()
        .map(|n| n * to_rad)
        .map_err(|_| invalid())
}

/// Parse the individual `rotate` property. Only the 2D single-angle form is
/// meaningful here; `none` is no rotation.
pub fn parse_rotate_property(value: &str) -> Result<f64, CssParseError> {
    let value = value.trim();
    if value.is_empty() || value == "none" {
        return Ok(0.0);
    }
    // `z 45deg` is the same rotation as `45deg`.
    let angle = value.strip_prefix('z').map(str::trim).unwrap_or(value);
    parse_angle(angle)
}

/// Parse the non-standard `zoom` property: `normal`, a number, or a percentage.
pub fn parse_zoom(value: &str) -> Result<f64, CssParseError> {
    let value = value.trim();
    if value.is_empty() || value == "normal" {
        return Ok(1.0);
    }
    match value.strip_suffix('%') {
        Some(pct) => parse_number(pct).map(|p| p / 100.0),
        None => parse_number(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_none_is_identity() {
        assert!(parse_transform("none").unwrap().is_identity(EPSILON));
        assert!(parse_transform("").unwrap().is_identity(EPSILON));
    }

    #[test]
    fn test_matrix_roundtrip_through_display() {
        let m = Transform2D::new(0.5, 0.25, -0.25, 0.5, 12.0, -8.5);
        let parsed: Transform2D = m.to_css().parse().unwrap();
        assert!(parsed.approx_eq(&m, EPSILON));
    }

    #[test]
    fn test_function_list_composes_left_to_right() {
        let m = parse_transform("translate(0, -30px) scale(1.2)").unwrap();
        let expected = Transform2D::translate(0.0, -30.0).then(&Transform2D::scale_uniform(1.2));
        assert!(m.approx_eq(&expected, EPSILON));
    }

    #[test]
    fn test_rotate_units() {
        assert!(approx_eq(parse_angle("90deg").unwrap(), PI / 2.0));
        assert!(approx_eq(parse_angle("0.5turn").unwrap(), PI));
        assert!(approx_eq(parse_angle("100grad").unwrap(), PI / 2.0));
        assert!(approx_eq(parse_angle("1rad").unwrap(), 1.0));
        assert!(approx_eq(parse_rotate_property("z 180deg").unwrap(), PI));
        assert!(approx_eq(parse_rotate_property("none").unwrap(), 0.0));
    }

    #[test]
    fn test_zoom_values() {
        assert!(approx_eq(parse_zoom("normal").unwrap(), 1.0));
        assert!(approx_eq(parse_zoom("0.75").unwrap(), 0.75));
        assert!(approx_eq(parse_zoom("150%").unwrap(), 1.5));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse_transform("perspective(10px)"),
            Err(CssParseError::UnknownFunction(_))
        ));
        assert!(matches!(
            parse_transform("matrix(1, 0, 0)"),
            Err(CssParseError::ArgumentCount { .. })
        ));
        assert!(matches!(
            parse_transform("scale(2"),
            Err(CssParseError::Unbalanced(_))
        ));
        assert!(parse_zoom("wide").is_err());
    }
}
