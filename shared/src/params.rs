//! Enumerated UV-packing strategies.
//!
//! These mirror Blender's `uv.smart_project` enum identifiers exactly; the
//! serialized form is what travels on the script's command line, so the
//! manifest spelling and the flag value are the same token.

use serde::{Deserialize, Serialize};

/// Island margin distribution method for smart UV projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarginMethod {
    #[serde(rename = "SCALED")]
    Scaled,
    #[serde(rename = "ABSOLUTE")]
    Absolute,
    #[serde(rename = "FRACTION")]
    Fraction,
}

impl MarginMethod {
    /// Token passed verbatim to the Blender script.
    pub fn as_arg(self) -> &'static str {
        match self {
            Self::Scaled => "SCALED",
            Self::Absolute => "ABSOLUTE",
            Self::Fraction => "FRACTION",
        }
    }
}

/// Island rotation method for smart UV projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotateMethod {
    #[serde(rename = "AXIS_ALIGNED")]
    AxisAligned,
    #[serde(rename = "AXIS_ALIGNED_X")]
    AxisAlignedX,
    #[serde(rename = "AXIS_ALIGNED_Y")]
    AxisAlignedY,
}

impl RotateMethod {
    /// Token passed verbatim to the Blender script.
    pub fn as_arg(self) -> &'static str {
        match self {
            Self::AxisAligned => "AXIS_ALIGNED",
            Self::AxisAlignedX => "AXIS_ALIGNED_X",
            Self::AxisAlignedY => "AXIS_ALIGNED_Y",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        margin: MarginMethod,
        rotate: RotateMethod,
    }

    #[test]
    fn test_manifest_spelling_matches_arg_token() {
        let h: Holder = serde_json::from_str(
            r#"{"margin": "SCALED", "rotate": "AXIS_ALIGNED_X"}"#,
        )
        .unwrap();
        assert_eq!(h.margin.as_arg(), "SCALED");
        assert_eq!(h.rotate.as_arg(), "AXIS_ALIGNED_X");
    }

    #[test]
    fn test_unknown_token_rejected() {
        let r: Result<Holder, _> =
            serde_json::from_str(r#"{"margin": "DIAGONAL", "rotate": "AXIS_ALIGNED"}"#);
        assert!(r.is_err());
    }
}
