use serde::{Deserialize, Serialize};

use crate::entities::factor::Distribution;
use crate::error::ValidationError;

/// Factor functions the solver understands, in packed form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum InferenceType {
    #[serde(rename = "IncrementalInference.PackedPrior")]
    Prior {
        #[serde(rename = "Z")]
        z: Distribution,
    },

    #[serde(rename = "RoME.PackedPriorPose2")]
    PriorPose2 {
        #[serde(rename = "Z")]
        z: Distribution,
    },

    #[serde(rename = "RoME.PackedPriorPoint2")]
    PriorPoint2 {
        #[serde(rename = "Z")]
        z: Distribution,
    },

    #[serde(rename = "IncrementalInference.PackedLinearRelative")]
    LinearRelative {
        #[serde(rename = "Z")]
        z: Distribution,
    },

    #[serde(rename = "RoME.PackedPose2Pose2")]
    Pose2Pose2 {
        #[serde(rename = "Z")]
        z: Distribution,
    },

    #[serde(rename = "RoME.PackedPoint2Point2Range")]
    Point2Point2Range {
        #[serde(rename = "Z")]
        z: Distribution,
    },

    #[serde(rename = "RoME.PackedPose2Point2Range")]
    Pose2Point2Range {
        #[serde(rename = "Z")]
        z: Distribution,
    },

    #[serde(rename = "RoME.PackedPose2Point2BearingRange")]
    Pose2Point2BearingRange {
        bearstr: Distribution,
        rangstr: Distribution,
    },

    /// Pose observed through the four corners of an AprilTag
    #[serde(rename = "RoME.PackedPose2AprilTag4Corners")]
    Pose2AprilTag4Corners {
        corners: Vec<f64>,
        homography: Vec<f64>,
        #[serde(rename = "K")]
        k: Vec<f64>,
        taglength: f64,
        id: i64,
    },

    /// Weighted combination of measurement models
    #[serde(rename = "IncrementalInference.PackedMixture")]
    Mixture {
        #[serde(rename = "N")]
        n: usize,
        #[serde(rename = "F_")]
        mechanism: String,
        #[serde(rename = "S")]
        labels: Vec<String>,
        components: Vec<Distribution>,
        diversity: Distribution,
    },
}

impl InferenceType {
    /// Short function type name stored on the factor
    pub fn fnc_type(&self) -> &'static str {
        match self {
            InferenceType::Prior { .. } => "Prior",
            InferenceType::PriorPose2 { .. } => "PriorPose2",
            InferenceType::PriorPoint2 { .. } => "PriorPoint2",
            InferenceType::LinearRelative { .. } => "LinearRelative",
            InferenceType::Pose2Pose2 { .. } => "Pose2Pose2",
            InferenceType::Point2Point2Range { .. } => "Point2Point2Range",
            InferenceType::Pose2Point2Range { .. } => "Pose2Point2Range",
            InferenceType::Pose2Point2BearingRange { .. } => "Pose2Point2BearingRange",
            InferenceType::Pose2AprilTag4Corners { .. } => "Pose2AprilTag4Corners",
            InferenceType::Mixture { .. } => "Mixture",
        }
    }

    /// Number of variables the factor connects
    pub fn arity(&self) -> usize {
        match self {
            InferenceType::Prior { .. }
            | InferenceType::PriorPose2 { .. }
            | InferenceType::PriorPoint2 { .. } => 1,
            _ => 2,
        }
    }

    /// Mixture of `components` weighted by categorical `weights`
    pub fn mixture(
        mechanism: impl Into<String>,
        labels: Vec<String>,
        components: Vec<Distribution>,
        weights: Vec<f64>,
    ) -> Result<Self, ValidationError> {
        if components.is_empty() {
            return Err(ValidationError::new("components", "must not be empty"));
        }
        if labels.len() != components.len() || weights.len() != components.len() {
            return Err(ValidationError::new(
                "components",
                format!(
                    "{} components but {} labels and {} weights",
                    components.len(),
                    labels.len(),
                    weights.len()
                ),
            ));
        }
        let diversity = Distribution::categorical(weights).map_err(|e| e.nested("diversity"))?;
        Ok(InferenceType::Mixture {
            n: components.len(),
            mechanism: mechanism.into(),
            labels,
            components,
            diversity,
        })
    }

    /// AprilTag factor with the default camera calibration
    pub fn pose2_apriltag_4corners(
        corners: Vec<f64>,
        homography: Vec<f64>,
        id: i64,
        taglength: f64,
    ) -> Result<Self, ValidationError> {
        if corners.len() != 8 {
            return Err(ValidationError::new(
                "corners",
                format!("expected 8 coordinates, got {}", corners.len()),
            ));
        }
        if homography.len() != 9 {
            return Err(ValidationError::new(
                "homography",
                format!("expected 9 entries, got {}", homography.len()),
            ));
        }
        if !(taglength > 0.0) {
            return Err(ValidationError::new("taglength", "must be positive"));
        }
        Ok(InferenceType::Pose2AprilTag4Corners {
            corners,
            homography,
            k: vec![300.0, 0.0, 0.0, 0.0, 300.0, 0.0, 180.0, 120.0, 1.0],
            taglength,
            id,
        })
    }

    /// Re-check parameter constraints after loading
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            InferenceType::Prior { z }
            | InferenceType::PriorPose2 { z }
            | InferenceType::PriorPoint2 { z }
            | InferenceType::LinearRelative { z }
            | InferenceType::Pose2Pose2 { z }
            | InferenceType::Point2Point2Range { z }
            | InferenceType::Pose2Point2Range { z } => z.validate().map_err(|e| e.nested("Z")),
            InferenceType::Pose2Point2BearingRange { bearstr, rangstr } => {
                bearstr.validate().map_err(|e| e.nested("bearstr"))?;
                rangstr.validate().map_err(|e| e.nested("rangstr"))
            }
            InferenceType::Pose2AprilTag4Corners { .. } => Ok(()),
            InferenceType::Mixture {
                n,
                components,
                diversity,
                ..
            } => {
                if *n != components.len() {
                    return Err(ValidationError::new(
                        "N",
                        format!("declares {} components, has {}", n, components.len()),
                    ));
                }
                for (index, component) in components.iter().enumerate() {
                    component
                        .validate()
                        .map_err(|e| e.nested(&format!("components.{}", index)))?;
                }
                diversity.validate().map_err(|e| e.nested("diversity"))
            }
        }
    }
}
