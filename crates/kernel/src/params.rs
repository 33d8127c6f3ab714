use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_X_SIZE: f32 = 1.0;
pub const DEFAULT_Y_SIZE: f32 = 0.25;
pub const DEFAULT_SEGMENTS: u32 = 4;
pub const DEFAULT_LOD: f64 = 1.0;

/// Settable plane properties, named as they appear in configs and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    XSize,
    YSize,
    XSegments,
    YSegments,
    Lod,
}

impl Property {
    pub const ALL: [Property; 5] = [
        Property::XSize,
        Property::YSize,
        Property::XSegments,
        Property::YSegments,
        Property::Lod,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::XSize => "xSize",
            Self::YSize => "ySize",
            Self::XSegments => "xSegments",
            Self::YSegments => "ySegments",
            Self::Lod => "lod",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Property {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| ParameterError::UnknownProperty(s.to_string()))
    }
}

/// Errors from parsing textual parameter updates.
#[derive(Debug, thiserror::Error)]
pub enum ParameterError {
    #[error("unknown property `{0}`")]
    UnknownProperty(String),
    #[error("invalid value `{value}` for {property}")]
    InvalidValue { property: Property, value: String },
    #[error("expected `name=value`, got `{0}`")]
    Malformed(String),
}

/// A requested property change. `None` asks for the property's default.
///
/// Values are raw: sign flips, clamping and defaulting happen when the update
/// is applied to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "property", content = "value", rename_all = "camelCase")]
pub enum ParameterUpdate {
    XSize(Option<f32>),
    YSize(Option<f32>),
    XSegments(Option<i32>),
    YSegments(Option<i32>),
    Lod(Option<f64>),
}

impl ParameterUpdate {
    pub fn property(&self) -> Property {
        match self {
            Self::XSize(_) => Property::XSize,
            Self::YSize(_) => Property::YSize,
            Self::XSegments(_) => Property::XSegments,
            Self::YSegments(_) => Property::YSegments,
            Self::Lod(_) => Property::Lod,
        }
    }

    /// Parse a property name and value. An empty value, `null` or `default`
    /// requests the default.
    pub fn parse(name: &str, value: &str) -> Result<Self, ParameterError> {
        let property: Property = name.trim().parse()?;
        let value = value.trim();
        let invalid = || ParameterError::InvalidValue {
            property,
            value: value.to_string(),
        };

        if matches!(value, "" | "null" | "default") {
            return Ok(Self::unset(property));
        }

        let update = match property {
            Property::XSize => Self::XSize(Some(value.parse().map_err(|_| invalid())?)),
            Property::YSize => Self::YSize(Some(value.parse().map_err(|_| invalid())?)),
            Property::XSegments => Self::XSegments(Some(value.parse().map_err(|_| invalid())?)),
            Property::YSegments => Self::YSegments(Some(value.parse().map_err(|_| invalid())?)),
            Property::Lod => Self::Lod(Some(value.parse().map_err(|_| invalid())?)),
        };
        Ok(update)
    }

    /// An update that resets `property` to its default.
    pub fn unset(property: Property) -> Self {
        match property {
            Property::XSize => Self::XSize(None),
            Property::YSize => Self::YSize(None),
            Property::XSegments => Self::XSegments(None),
            Property::YSegments => Self::YSegments(None),
            Property::Lod => Self::Lod(None),
        }
    }
}

impl FromStr for ParameterUpdate {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| ParameterError::Malformed(s.to_string()))?;
        Self::parse(name, value)
    }
}

/// Notification emitted when a property's stored value actually changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "property", content = "value", rename_all = "camelCase")]
pub enum PropertyChange {
    XSize(f32),
    YSize(f32),
    XSegments(u32),
    YSegments(u32),
    Lod(f64),
}

impl PropertyChange {
    pub fn property(&self) -> Property {
        match self {
            Self::XSize(_) => Property::XSize,
            Self::YSize(_) => Property::YSize,
            Self::XSegments(_) => Property::XSegments,
            Self::YSegments(_) => Property::YSegments,
            Self::Lod(_) => Property::Lod,
        }
    }
}

impl fmt::Display for PropertyChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::XSize(v) | Self::YSize(v) => write!(f, "{}={v}", self.property()),
            Self::Lod(v) => write!(f, "{}={v}", self.property()),
            Self::XSegments(v) | Self::YSegments(v) => write!(f, "{}={v}", self.property()),
        }
    }
}

/// An out-of-range input that was corrected rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParameterWarning {
    /// Negative size or segment count stored as its magnitude.
    SignFlipped {
        property: Property,
        requested: f64,
        stored: f64,
    },
    /// LOD outside `[0, 1]` stored as the nearest bound.
    Clamped {
        property: Property,
        requested: f64,
        stored: f64,
    },
}

impl ParameterWarning {
    pub fn property(&self) -> Property {
        match self {
            Self::SignFlipped { property, .. } | Self::Clamped { property, .. } => *property,
        }
    }
}

impl fmt::Display for ParameterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignFlipped {
                property,
                requested,
                stored,
            } => write!(f, "{property} must be positive: {requested} stored as {stored}"),
            Self::Clamped {
                property,
                requested,
                stored,
            } => write!(f, "{property} must be within [0, 1]: {requested} clamped to {stored}"),
        }
    }
}

/// A sanitized value plus the correction applied to reach it, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sanitized<T> {
    pub value: T,
    pub warning: Option<ParameterWarning>,
}

impl<T> Sanitized<T> {
    fn clean(value: T) -> Self {
        Self {
            value,
            warning: None,
        }
    }
}

/// Missing, zero and non-finite sizes fall back to `default`; negative sizes
/// flip sign.
pub fn sanitize_size(property: Property, requested: Option<f32>, default: f32) -> Sanitized<f32> {
    match requested {
        None => Sanitized::clean(default),
        Some(v) if v == 0.0 || !v.is_finite() => Sanitized::clean(default),
        Some(v) if v < 0.0 => Sanitized {
            value: -v,
            warning: Some(ParameterWarning::SignFlipped {
                property,
                requested: f64::from(v),
                stored: f64::from(-v),
            }),
        },
        Some(v) => Sanitized::clean(v),
    }
}

/// Missing and zero counts fall back to the default; negative counts flip sign.
pub fn sanitize_segments(property: Property, requested: Option<i32>) -> Sanitized<u32> {
    match requested {
        None | Some(0) => Sanitized::clean(DEFAULT_SEGMENTS),
        Some(v) if v < 0 => Sanitized {
            value: v.unsigned_abs(),
            warning: Some(ParameterWarning::SignFlipped {
                property,
                requested: f64::from(v),
                stored: f64::from(v.unsigned_abs()),
            }),
        },
        Some(v) => Sanitized::clean(v.unsigned_abs()),
    }
}

/// Missing and NaN LOD falls back to 1; anything outside `[0, 1]` is clamped.
///
/// LOD is carried as `f64` so decimal inputs such as `0.9` scale segment
/// counts without losing a whole segment to `f32` rounding.
pub fn sanitize_lod(requested: Option<f64>) -> Sanitized<f64> {
    let v = match requested {
        Some(v) if !v.is_nan() => v,
        _ => return Sanitized::clean(DEFAULT_LOD),
    };
    let clamped = v.clamp(0.0, 1.0);
    if clamped == v {
        return Sanitized::clean(v);
    }
    Sanitized {
        value: clamped,
        warning: Some(ParameterWarning::Clamped {
            property: Property::Lod,
            requested: v,
            stored: clamped,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_names_round_trip() {
        for p in Property::ALL {
            assert_eq!(p.name().parse::<Property>().unwrap(), p);
        }
        assert!(matches!(
            "zSize".parse::<Property>(),
            Err(ParameterError::UnknownProperty(_))
        ));
    }

    #[test]
    fn parse_update_values() {
        assert_eq!(
            "xSize=-3".parse::<ParameterUpdate>().unwrap(),
            ParameterUpdate::XSize(Some(-3.0))
        );
        assert_eq!(
            "ySegments = 12".parse::<ParameterUpdate>().unwrap(),
            ParameterUpdate::YSegments(Some(12))
        );
        assert_eq!(
            "lod=".parse::<ParameterUpdate>().unwrap(),
            ParameterUpdate::Lod(None)
        );
        assert_eq!(
            ParameterUpdate::parse("xSegments", "default").unwrap(),
            ParameterUpdate::XSegments(None)
        );
    }

    #[test]
    fn parse_update_errors() {
        assert!(matches!(
            "lod".parse::<ParameterUpdate>(),
            Err(ParameterError::Malformed(_))
        ));
        assert!(matches!(
            "xSegments=2.5".parse::<ParameterUpdate>(),
            Err(ParameterError::InvalidValue {
                property: Property::XSegments,
                ..
            })
        ));
        assert!(matches!(
            "width=2".parse::<ParameterUpdate>(),
            Err(ParameterError::UnknownProperty(_))
        ));
    }

    #[test]
    fn size_defaults() {
        assert_eq!(sanitize_size(Property::XSize, None, DEFAULT_X_SIZE).value, 1.0);
        assert_eq!(sanitize_size(Property::XSize, Some(0.0), DEFAULT_X_SIZE).value, 1.0);
        assert_eq!(sanitize_size(Property::YSize, Some(f32::NAN), DEFAULT_Y_SIZE).value, 0.25);
        assert!(sanitize_size(Property::YSize, None, DEFAULT_Y_SIZE).warning.is_none());
    }

    #[test]
    fn infinite_size_falls_back_to_default() {
        for v in [f32::INFINITY, f32::NEG_INFINITY] {
            let s = sanitize_size(Property::XSize, Some(v), DEFAULT_X_SIZE);
            assert_eq!(s, Sanitized::clean(DEFAULT_X_SIZE));
        }
    }

    #[test]
    fn decimal_lod_keeps_its_value() {
        let s = sanitize_lod("0.9".parse().ok());
        assert_eq!(s.value, 0.9);
        assert_eq!(PropertyChange::Lod(s.value).to_string(), "lod=0.9");
    }

    // Negative input is silently corrected rather than rejected. Kept as-is;
    // this documents the behaviour, not an endorsement of it.
    #[test]
    fn negative_size_is_sign_flipped_quirk() {
        let s = sanitize_size(Property::XSize, Some(-3.0), DEFAULT_X_SIZE);
        assert_eq!(s.value, 3.0);
        assert_eq!(
            s.warning,
            Some(ParameterWarning::SignFlipped {
                property: Property::XSize,
                requested: -3.0,
                stored: 3.0,
            })
        );
    }

    #[test]
    fn segment_defaults_and_sign_flip() {
        assert_eq!(sanitize_segments(Property::XSegments, None).value, 4);
        assert_eq!(sanitize_segments(Property::XSegments, Some(0)).value, 4);
        assert_eq!(sanitize_segments(Property::YSegments, Some(9)).value, 9);
        let flipped = sanitize_segments(Property::YSegments, Some(-6));
        assert_eq!(flipped.value, 6);
        assert!(flipped.warning.is_some());
        assert_eq!(sanitize_segments(Property::YSegments, Some(i32::MIN)).value, 2_147_483_648);
    }

    #[test]
    fn lod_clamps_with_warning() {
        let low = sanitize_lod(Some(-0.5));
        assert_eq!(low.value, 0.0);
        assert!(matches!(low.warning, Some(ParameterWarning::Clamped { .. })));

        let high = sanitize_lod(Some(1.5));
        assert_eq!(high.value, 1.0);
        assert!(matches!(high.warning, Some(ParameterWarning::Clamped { .. })));

        let mid = sanitize_lod(Some(0.3));
        assert_eq!(mid.value, 0.3);
        assert!(mid.warning.is_none());
    }

    #[test]
    fn lod_defaults() {
        assert_eq!(sanitize_lod(None), Sanitized::clean(1.0));
        assert_eq!(sanitize_lod(Some(f64::NAN)), Sanitized::clean(1.0));
        assert_eq!(sanitize_lod(Some(0.0)), Sanitized::clean(0.0));
    }

    #[test]
    fn change_display() {
        assert_eq!(PropertyChange::XSize(3.0).to_string(), "xSize=3");
        assert_eq!(PropertyChange::YSegments(8).to_string(), "ySegments=8");
        assert_eq!(PropertyChange::Lod(0.5).property(), Property::Lod);
    }

    #[test]
    fn warning_display_names_property() {
        let w = sanitize_lod(Some(2.0)).warning.unwrap();
        assert_eq!(w.property(), Property::Lod);
        assert!(w.to_string().starts_with("lod must be within [0, 1]"));
    }
}
