use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who produced a value: the system itself or a user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    System,
    #[default]
    User,
}

/// The primitive carried by a [`TypedValue`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Float(f32),
    String(String),
    Vector3(Vec3),
}

/// Tagged payload carried by device and UX events.
///
/// Every accessor is total: asking for a type other than the stored one
/// coerces instead of failing. Malformed text coerces to zero (or the zero
/// vector), never to an error.
///
/// Equality compares the stored value only; the provenance mode is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypedValue {
    pub value: Value,
    #[serde(default)]
    pub mode: Mode,
}

impl TypedValue {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            mode: Mode::User,
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn as_bool(&self) -> bool {
        match &self.value {
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("true") {
                    true
                } else if s.eq_ignore_ascii_case("false") {
                    false
                } else {
                    parse_float(s) != 0.0
                }
            }
            Value::Vector3(v) => *v != Vec3::ZERO,
        }
    }

    /// Floats truncate toward zero (saturating); vectors use their length.
    pub fn as_int(&self) -> i32 {
        match &self.value {
            Value::Bool(b) => i32::from(*b),
            Value::Int(i) => *i,
            Value::Float(f) => *f as i32,
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i32>().unwrap_or_else(|_| parse_float(s) as i32)
            }
            Value::Vector3(v) => v.length() as i32,
        }
    }

    pub fn as_float(&self) -> f32 {
        match &self.value {
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Int(i) => *i as f32,
            Value::Float(f) => *f,
            Value::String(s) => parse_float(s.trim()),
            Value::Vector3(v) => v.length(),
        }
    }

    pub fn as_string(&self) -> String {
        self.to_string()
    }

    /// Scalars fill all three components, scalar text included; other text is read as `"x,y,z"`.
    pub fn as_vector3(&self) -> Vec3 {
        match &self.value {
            Value::Vector3(v) => *v,
            Value::String(s) => parse_vector3(s),
            _ => Vec3::splat(self.as_float()),
        }
    }
}

impl PartialEq for TypedValue {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
            Value::Vector3(v) => write!(f, "{},{},{}", v.x, v.y, v.z),
        }
    }
}

impl From<bool> for TypedValue {
    fn from(b: bool) -> Self {
        Self::new(Value::Bool(b))
    }
}

impl From<i32> for TypedValue {
    fn from(i: i32) -> Self {
        Self::new(Value::Int(i))
    }
}

impl From<f32> for TypedValue {
    fn from(x: f32) -> Self {
        Self::new(Value::Float(x))
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        Self::new(Value::String(s))
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        Self::new(Value::String(s.to_owned()))
    }
}

impl From<Vec3> for TypedValue {
    fn from(v: Vec3) -> Self {
        Self::new(Value::Vector3(v))
    }
}

fn parse_float(s: &str) -> f32 {
    s.parse::<f32>().unwrap_or(0.0)
}

/// Parse `"x,y,z"`; a lone number fills every component, missing or malformed ones read as zero.
fn parse_vector3(s: &str) -> Vec3 {
    let s = s.trim().trim_start_matches('(').trim_end_matches(')');
    if !s.contains(',') {
        return Vec3::splat(parse_float(s.trim()));
    }
    let mut parts = s.split(',').map(|p| parse_float(p.trim()));
    let x = parts.next().unwrap_or(0.0);
    let y = parts.next().unwrap_or(0.0);
    let z = parts.next().unwrap_or(0.0);
    Vec3::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_tag() {
        assert!(matches!(TypedValue::from(true).value(), Value::Bool(true)));
        assert!(matches!(TypedValue::from(3).value(), Value::Int(3)));
        assert!(matches!(TypedValue::from(1.5).value(), Value::Float(_)));
        assert!(matches!(TypedValue::from("hi").value(), Value::String(_)));
        assert!(matches!(
            TypedValue::from(Vec3::ONE).value(),
            Value::Vector3(_)
        ));
    }

    #[test]
    fn numeric_coercions() {
        assert_eq!(TypedValue::from(2.9_f32).as_int(), 2);
        assert_eq!(TypedValue::from(-2.9_f32).as_int(), -2);
        assert_eq!(TypedValue::from(7).as_float(), 7.0);
        assert_eq!(TypedValue::from(f32::NAN).as_int(), 0);
    }

    #[test]
    fn bool_numeric_coercions() {
        assert_eq!(TypedValue::from(true).as_int(), 1);
        assert_eq!(TypedValue::from(false).as_float(), 0.0);
        assert!(TypedValue::from(5).as_bool());
        assert!(!TypedValue::from(0.0_f32).as_bool());
    }

    #[test]
    fn string_coercions() {
        assert_eq!(TypedValue::from(" 42 ").as_int(), 42);
        assert_eq!(TypedValue::from("3.75").as_int(), 3);
        assert_eq!(TypedValue::from("0.25").as_float(), 0.25);
        assert!(TypedValue::from("TRUE").as_bool());
        assert!(!TypedValue::from("false").as_bool());
        assert!(TypedValue::from("1").as_bool());
    }

    #[test]
    fn malformed_strings_fail_soft() {
        assert_eq!(TypedValue::from("banana").as_int(), 0);
        assert_eq!(TypedValue::from("banana").as_float(), 0.0);
        assert!(!TypedValue::from("banana").as_bool());
        assert_eq!(TypedValue::from("banana").as_vector3(), Vec3::ZERO);
        assert_eq!(TypedValue::from("").as_int(), 0);
    }

    #[test]
    fn vector_string_encoding() {
        let v = TypedValue::from(Vec3::new(1.0, -2.5, 3.0));
        assert_eq!(v.as_string(), "1,-2.5,3");
        assert_eq!(
            TypedValue::from("1,-2.5,3").as_vector3(),
            Vec3::new(1.0, -2.5, 3.0)
        );
    }

    #[test]
    fn vector_parse_defaults_bad_components_to_zero() {
        assert_eq!(
            TypedValue::from("1, x ,3").as_vector3(),
            Vec3::new(1.0, 0.0, 3.0)
        );
        assert_eq!(
            TypedValue::from("(1, 2, 3)").as_vector3(),
            Vec3::new(1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn scalar_to_vector_fills_components() {
        assert_eq!(TypedValue::from(2).as_vector3(), Vec3::splat(2.0));
        assert_eq!(TypedValue::from(true).as_vector3(), Vec3::ONE);
        assert_eq!(TypedValue::from("4").as_vector3(), Vec3::splat(4.0));
    }

    #[test]
    fn scalar_through_text_keeps_its_vector() {
        let direct = TypedValue::from(2.5f32);
        let via_text = TypedValue::from(direct.as_string());
        assert_eq!(via_text.as_vector3(), direct.as_vector3());
        assert_eq!(TypedValue::from(7).as_string().parse::<f32>().ok(), Some(7.0));
    }

    #[test]
    fn numbers_format_as_decimal_text() {
        assert_eq!(TypedValue::from(12).as_string(), "12");
        assert_eq!(TypedValue::from(0.5_f32).as_string(), "0.5");
        assert_eq!(TypedValue::from(true).as_string(), "true");
    }

    #[test]
    fn equality_ignores_mode() {
        let a = TypedValue::from(3).with_mode(Mode::System);
        let b = TypedValue::from(3);
        assert_eq!(a, b);
        assert_ne!(TypedValue::from(3), TypedValue::from(3.0_f32));
    }

    #[test]
    fn mode_defaults_to_user_when_deserialized() {
        let v: TypedValue = serde_yaml::from_str("value: !Int 9").unwrap();
        assert_eq!(v.mode(), Mode::User);
        assert_eq!(v.as_int(), 9);
    }
}
