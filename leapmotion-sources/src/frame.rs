//! Tracking data records of the v6 JSON protocol
//!
//! Field shapes follow the service's JSON output. Nested vectors are kept as
//! `Vec` so a frame with an unexpected arity still decodes; shape checks
//! happen where the data is used (see [`crate::interaction_box`]).

use serde::{Deserialize, Serialize};

/// One unit of tracking data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    #[serde(default)]
    pub current_frame_rate: f64,
    pub id: u64,
    /// 3x3 rotation matrix relative to the previous frame
    #[serde(default)]
    pub r: Vec<Vec<f64>>,
    /// Scale factor relative to the previous frame
    #[serde(default)]
    pub s: f64,
    /// Translation vector relative to the previous frame
    #[serde(default)]
    pub t: Vec<f64>,
    /// Microseconds since the service started
    pub timestamp: i64,
    #[serde(default)]
    pub gestures: Vec<Gesture>,
    #[serde(default)]
    pub hands: Vec<Hand>,
    #[serde(default)]
    pub interaction_box: InteractionBox,
    #[serde(default)]
    pub pointables: Vec<Pointable>,
}

impl Frame {
    pub fn hand(&self, id: i64) -> Option<&Hand> {
        self.hands.iter().find(|h| h.id == id)
    }

    /// Fingers and tools attached to the given hand.
    pub fn pointables_for(&self, hand_id: i64) -> impl Iterator<Item = &Pointable> {
        self.pointables.iter().filter(move |p| p.hand_id == hand_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Gesture {
    pub center: Vec<f64>,
    pub direction: Vec<f64>,
    pub duration: i64,
    pub hand_ids: Vec<i64>,
    pub id: i64,
    pub normal: Vec<f64>,
    pub pointable_ids: Vec<i64>,
    pub position: Vec<f64>,
    pub progress: f64,
    pub radius: f64,
    pub speed: f64,
    pub start_position: Vec<f64>,
    /// "start", "update" or "stop"
    pub state: String,
    /// "circle", "swipe", "keyTap" or "screenTap"
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hand {
    pub arm_basis: Vec<Vec<f64>>,
    pub arm_width: f64,
    pub confidence: f64,
    pub direction: Vec<f64>,
    pub elbow: Vec<f64>,
    pub grab_strength: f64,
    pub id: i64,
    pub palm_normal: Vec<f64>,
    pub palm_position: Vec<f64>,
    pub palm_velocity: Vec<f64>,
    pub pinch_strength: f64,
    pub r: Vec<Vec<f64>>,
    pub s: f64,
    pub sphere_center: Vec<f64>,
    pub sphere_radius: f64,
    pub stabilized_palm_position: Vec<f64>,
    pub t: Vec<f64>,
    pub time_visible: f64,
    /// "left" or "right"
    #[serde(rename = "type")]
    pub kind: String,
    pub wrist: Vec<f64>,
}

impl Hand {
    pub fn is_left(&self) -> bool {
        self.kind == "left"
    }

    pub fn is_right(&self) -> bool {
        self.kind == "right"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pointable {
    /// Bone bases, one 3x3 matrix per bone
    pub bases: Vec<Vec<Vec<f64>>>,
    pub btip_position: Vec<f64>,
    pub carp_position: Vec<f64>,
    pub dip_position: Vec<f64>,
    pub direction: Vec<f64>,
    pub extended: bool,
    pub hand_id: i64,
    pub id: i64,
    pub length: f64,
    pub mcp_position: Vec<f64>,
    pub pip_position: Vec<f64>,
    pub stabilized_tip_position: Vec<f64>,
    pub time_visible: f64,
    pub tip_position: Vec<f64>,
    pub tip_velocity: Vec<f64>,
    pub tool: bool,
    pub touch_distance: f64,
    /// "none", "hovering" or "touching"
    pub touch_zone: String,
    /// Finger index, thumb = 0 through pinky = 4
    #[serde(rename = "type")]
    pub kind: i64,
    pub width: f64,
}

/// The current valid tracking volume, in millimeters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionBox {
    pub center: Vec<i64>,
    pub size: Vec<f64>,
}

/// Sent by the service when it is paused or resumed, or when the controller
/// is plugged in or unplugged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceEvent {
    pub id: String,
    pub attached: bool,
    pub streaming: bool,
    #[serde(rename = "type")]
    pub kind: String,
}

/// First message sent by the service after the upgrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceVersion {
    pub service_version: String,
    pub version: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: &str = r#"{
        "currentFrameRate": 110.5,
        "id": 42,
        "r": [[1,0,0],[0,1,0],[0,0,1]],
        "s": 1.0,
        "t": [0,0,0],
        "timestamp": 9876543,
        "gestures": [{"id": 7, "type": "swipe", "state": "update", "handIds": [3], "speed": 812.5}],
        "hands": [{"id": 3, "type": "left", "palmPosition": [-20.5, 180.0, 12.0], "grabStrength": 0.25}],
        "interactionBox": {"center": [0, 200, 0], "size": [235.2, 235.2, 147.7]},
        "pointables": [
            {"id": 30, "handId": 3, "type": 1, "extended": true, "tipPosition": [1.0, 2.0, 3.0]},
            {"id": 40, "handId": 4, "type": 0}
        ]
    }"#;

    #[test]
    fn test_frame_decodes_nested_records() {
        let frame: Frame = serde_json::from_str(FRAME).unwrap();
        assert_eq!(frame.id, 42);
        assert_eq!(frame.timestamp, 9876543);
        assert_eq!(frame.current_frame_rate, 110.5);
        assert_eq!(frame.r.len(), 3);
        assert_eq!(frame.interaction_box.center, vec![0, 200, 0]);
        assert_eq!(frame.interaction_box.size, vec![235.2, 235.2, 147.7]);

        let gesture = &frame.gestures[0];
        assert_eq!(gesture.kind, "swipe");
        assert_eq!(gesture.hand_ids, vec![3]);

        let hand = frame.hand(3).unwrap();
        assert!(hand.is_left());
        assert_eq!(hand.palm_position, vec![-20.5, 180.0, 12.0]);
        assert!(frame.hand(4).is_none());

        let fingers: Vec<i64> = frame.pointables_for(3).map(|p| p.id).collect();
        assert_eq!(fingers, vec![30]);
    }

    #[test]
    fn test_frame_requires_id_and_timestamp() {
        assert!(serde_json::from_str::<Frame>(r#"{"timestamp": 1}"#).is_err());
        assert!(serde_json::from_str::<Frame>(r#"{"id": 1}"#).is_err());

        let minimal: Frame = serde_json::from_str(r#"{"id": 1, "timestamp": 2}"#).unwrap();
        assert!(minimal.hands.is_empty());
        assert_eq!(minimal.interaction_box, InteractionBox::default());
    }
}
