//! Bike stations.

use geo::Point;

/// A single dock point within a contract
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Station {
    pub name: Option<String>,
    pub location: Point,
    /// Free docks
    pub free_count: Option<u32>,
    /// Available bikes
    pub bikes_count: Option<u32>,
}

impl Station {
    /// Name shown to riders, without the operator's numeric prefix
    ///
    /// `"042 - Capitole"` becomes `"Capitole"`. A missing name is `"-"`.
    pub fn display_name(&self) -> &str {
        let Some(name) = self.name.as_deref() else {
            return "-";
        };

        match name.find(char::is_alphabetic) {
            Some(start) => &name[start..],
            None => name.trim(),
        }
    }

    pub fn has_bikes(&self, count: u32) -> bool {
        self.bikes_count.is_some_and(|bikes| bikes >= count)
    }

    pub fn has_free_docks(&self, count: u32) -> bool {
        self.free_count.is_some_and(|free| free >= count)
    }
}
