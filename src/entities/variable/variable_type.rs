use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Supported variable (state) types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableType {
    Point2,
    Pose2,
    Point3,
    Pose3,
    ContinuousScalar,
}

impl VariableType {
    pub const ALL: [VariableType; 5] = [
        VariableType::Point2,
        VariableType::Pose2,
        VariableType::Point3,
        VariableType::Pose3,
        VariableType::ContinuousScalar,
    ];

    /// Fully qualified type name the server expects
    pub fn qualified_name(&self) -> &'static str {
        match self {
            VariableType::Point2 => "RoME.Point2",
            VariableType::Pose2 => "RoME.Pose2",
            VariableType::Point3 => "RoME.Point3",
            VariableType::Pose3 => "RoME.Pose3",
            VariableType::ContinuousScalar => "IncrementalInference.ContinuousScalar",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            VariableType::Point2 => "Point2",
            VariableType::Pose2 => "Pose2",
            VariableType::Point3 => "Point3",
            VariableType::Pose3 => "Pose3",
            VariableType::ContinuousScalar => "ContinuousScalar",
        }
    }

    /// Manifold dimension
    pub fn dims(&self) -> usize {
        match self {
            VariableType::Point2 => 2,
            VariableType::Pose2 => 3,
            VariableType::Point3 => 3,
            VariableType::Pose3 => 6,
            VariableType::ContinuousScalar => 1,
        }
    }
}

impl FromStr for VariableType {
    type Err = ValidationError;

    /// Accepts the qualified or the short name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VariableType::ALL
            .iter()
            .copied()
            .find(|t| t.qualified_name() == s || t.short_name() == s)
            .ok_or_else(|| {
                ValidationError::new("variableType", format!("unsupported variable type '{}'", s))
            })
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualified_name())
    }
}

impl Serialize for VariableType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.qualified_name())
    }
}

impl<'de> Deserialize<'de> for VariableType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse()
            .map_err(|e: ValidationError| serde::de::Error::custom(e.message))
    }
}
