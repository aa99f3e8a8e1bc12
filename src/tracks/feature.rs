//! Feature-track builders for the 2D sequence widget.

use serde::Serialize;

use crate::source::ChainModel;

/// How the widget draws a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    /// Intervals: `x` is the first residue, `y` the last.
    Rect,
    /// A per-residue series: `x` is the 1-based residue, `y` the value.
    Line,
}

/// One datum of a track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturePoint {
    /// Start residue or position.
    pub x: f64,
    /// End residue or value.
    pub y: f64,
    /// Tooltip text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A named track ready to hand to the widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureTrack {
    /// Display name.
    pub name: String,
    /// Rendering kind.
    #[serde(rename = "type")]
    pub kind: TrackKind,
    /// Track color (`#rrggbb`).
    pub color: String,
    /// Data points.
    #[serde(rename = "data")]
    pub points: Vec<FeaturePoint>,
}

/// Per-residue series shown by [`standard_tracks`]: `(field, name)`.
pub const SERIES: [(&str, &str); 4] = [
    ("averageRmsdIncrease", "avg. RMSD"),
    ("sumRmsdIncrease", "sum RMSD"),
    ("cumstrength", "cumulative strength"),
    ("conservation", "conservation"),
];

impl FeatureTrack {
    /// Whether the track has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Secondary-structure elements (`secondaryStructureElements` entries
    /// with `start`, `end` and `type`).
    #[must_use]
    pub fn secondary_structure(model: &ChainModel, color: &str) -> Self {
        let points = model
            .0
            .get("secondaryStructureElements")
            .and_then(serde_json::Value::as_array)
            .map(|elements| {
                elements
                    .iter()
                    .filter_map(|e| {
                        Some(FeaturePoint {
                            x: e.get("start")?.as_f64()?,
                            y: e.get("end")?.as_f64()?,
                            description: e
                                .get("type")
                                .and_then(serde_json::Value::as_str)
                                .map(str::to_uppercase),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            name: "Secondary Structure".to_owned(),
            kind: TrackKind::Rect,
            color: color.to_owned(),
            points,
        }
    }

    /// Single-residue markers for the residue numbers listed under `key`.
    #[must_use]
    pub fn flagged_residues(
        model: &ChainModel,
        key: &str,
        name: &str,
        description: &str,
        color: &str,
    ) -> Self {
        let points = model
            .residue_numbers(key)
            .into_iter()
            .map(|n| FeaturePoint {
                x: n as f64,
                y: n as f64,
                description: Some(description.to_owned()),
            })
            .collect();
        Self {
            name: name.to_owned(),
            kind: TrackKind::Rect,
            color: color.to_owned(),
            points,
        }
    }

    /// Line series of `feature` over the residues, 1-based.
    #[must_use]
    pub fn residue_series(
        model: &ChainModel,
        feature: &str,
        name: &str,
        color: &str,
    ) -> Self {
        let points = model
            .residue_feature(feature)
            .into_iter()
            .enumerate()
            .map(|(i, y)| FeaturePoint {
                x: (i + 1) as f64,
                y,
                description: None,
            })
            .collect();
        Self {
            name: name.to_owned(),
            kind: TrackKind::Line,
            color: color.to_owned(),
            points,
        }
    }
}

/// Every track the chain model has data for, in widget order.
#[must_use]
pub fn standard_tracks(model: &ChainModel, color: &str) -> Vec<FeatureTrack> {
    let mut tracks = vec![
        FeatureTrack::secondary_structure(model, color),
        FeatureTrack::flagged_residues(
            model,
            "earlyResidueNumbers",
            "Early Folding",
            "Early Folding",
            color,
        ),
        FeatureTrack::flagged_residues(
            model,
            "functionalResidueNumbers",
            "Active Sites",
            "Functional",
            color,
        ),
    ];
    let has_field = |field: &str| {
        model.residues().iter().any(|r| r.get(field).is_some())
    };
    tracks.extend(
        SERIES
            .iter()
            .filter(|(field, _)| has_field(field))
            .map(|(field, name)| {
                FeatureTrack::residue_series(model, field, name, color)
            }),
    );
    tracks.retain(|t| !t.is_empty());
    tracks
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn model() -> ChainModel {
        ChainModel::new(json!({
            "secondaryStructureElements": [
                { "start": 3, "end": 9, "type": "helix" },
                { "start": 12, "end": 15, "type": "strand" }
            ],
            "earlyResidueNumbers": ["4", 7],
            "functionalResidueNumbers": [],
            "residues": [
                { "averageRmsdIncrease": 0.5 },
                { "averageRmsdIncrease": 1.5 }
            ]
        }))
    }

    #[test]
    fn secondary_structure_rects() {
        let track = FeatureTrack::secondary_structure(&model(), "#52b1e9");
        assert_eq!(track.kind, TrackKind::Rect);
        assert_eq!(track.points.len(), 2);
        assert_eq!(track.points[0].x, 3.0);
        assert_eq!(track.points[0].y, 9.0);
        assert_eq!(track.points[1].description.as_deref(), Some("STRAND"));
    }

    #[test]
    fn flagged_residues_accept_strings_and_numbers() {
        let track = FeatureTrack::flagged_residues(
            &model(),
            "earlyResidueNumbers",
            "Early Folding",
            "Early Folding",
            "#52b1e9",
        );
        let xs: Vec<f64> = track.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, [4.0, 7.0]);
    }

    #[test]
    fn standard_tracks_skip_missing_data() {
        let tracks = standard_tracks(&model(), "#52b1e9");
        let names: Vec<&str> = tracks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Secondary Structure", "Early Folding", "avg. RMSD"]);
        let series = &tracks[2];
        assert_eq!(series.kind, TrackKind::Line);
        assert_eq!(series.points[1].x, 2.0);
        assert_eq!(series.points[1].y, 1.5);
    }

    #[test]
    fn tracks_serialize_in_widget_shape() {
        let track = FeatureTrack::residue_series(&model(), "averageRmsdIncrease", "avg", "#000000");
        let value = serde_json::to_value(&track).unwrap();
        assert_eq!(value["type"], "line");
        assert_eq!(value["data"][0]["x"], 1.0);
        assert!(value["data"][0].get("description").is_none());
    }
}
