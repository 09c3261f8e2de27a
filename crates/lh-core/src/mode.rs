//! Travel modes and the route `type` labels written to the output document.

/// Route type label for classifier-derived pedestrian transitions.
pub const WALKING_LABEL: &str = "walking";

/// Route type label for classifier-derived vehicular transitions.
pub const DRIVING_LABEL: &str = "in a passenger vehicle";

/// Which network a request is routed over.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TravelMode {
    /// Pedestrian network.
    Walking,
    /// Vehicular network.
    Driving,
}

impl TravelMode {
    /// Mode for a declared activity type.
    ///
    /// Case-insensitive substring match against `"walking"`; every other
    /// declared type (cycling, running, flying…) routes over the drive
    /// network.
    pub fn from_activity_type(activity_type: &str) -> Self {
        if activity_type.to_lowercase().contains(WALKING_LABEL) {
            TravelMode::Walking
        } else {
            TravelMode::Driving
        }
    }

    /// Output label used for classifier-derived routes.
    pub fn label(self) -> &'static str {
        match self {
            TravelMode::Walking => WALKING_LABEL,
            TravelMode::Driving => DRIVING_LABEL,
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TravelMode::Walking => "walk",
            TravelMode::Driving => "drive",
        })
    }
}
