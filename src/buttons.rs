//! The buttons on the remote control diagram and their circular hit regions.

use crate::Error;
use itertools::Itertools;
use std::{fmt, str::FromStr};

/// A button on the remote. The declaration order is the canonical order,
/// which is also the order used for hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ButtonId {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Menu,
    PlayPause,
}

impl ButtonId {
    pub const ALL: [ButtonId; 7] = [
        ButtonId::Up,
        ButtonId::Down,
        ButtonId::Left,
        ButtonId::Right,
        ButtonId::Enter,
        ButtonId::Menu,
        ButtonId::PlayPause,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ButtonId::Up => "up",
            ButtonId::Down => "down",
            ButtonId::Left => "left",
            ButtonId::Right => "right",
            ButtonId::Enter => "enter",
            ButtonId::Menu => "menu",
            ButtonId::PlayPause => "play_pause",
        }
    }
}

impl FromStr for ButtonId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ButtonId::ALL
            .into_iter()
            .find(|b| b.name() == s)
            .ok_or_else(|| Error::InvalidButton(s.to_owned()))
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comma separated list of all button names, for help and error messages
pub fn button_names() -> String {
    ButtonId::ALL.iter().map(|b| b.name()).join(", ")
}

/// A circle on the diagram
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonRegion {
    pub center: (f64, f64),
    pub radius: f64,
}

impl ButtonRegion {
    const fn new(x: f64, y: f64, radius: f64) -> Self {
        ButtonRegion {
            center: (x, y),
            radius,
        }
    }

    /// Is the point inside the circle. Points on the edge count as inside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (cx, cy) = self.center;

        (x - cx).hypot(y - cy) <= self.radius
    }
}

/// Regions measured from the Apple A1294 diagram (262 by 1001 units), in
/// canonical order. Where regions overlap, the first match wins.
const REGIONS: [ButtonRegion; 7] = [
    ButtonRegion::new(132.0, 120.0, 15.0),
    ButtonRegion::new(131.0, 316.0, 15.0),
    ButtonRegion::new(34.0, 217.0, 15.0),
    ButtonRegion::new(229.0, 218.0, 15.0),
    ButtonRegion::new(131.0, 218.0, 52.0),
    ButtonRegion::new(68.0, 402.0, 47.0),
    ButtonRegion::new(194.0, 402.0, 47.0),
];

/// Fixed table of hit regions, one per button
#[derive(Debug, Clone)]
pub struct ButtonGeometry {
    regions: [ButtonRegion; 7],
}

impl Default for ButtonGeometry {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonGeometry {
    pub fn new() -> Self {
        ButtonGeometry { regions: REGIONS }
    }

    #[cfg(test)]
    pub(crate) fn from_regions(regions: [ButtonRegion; 7]) -> Self {
        ButtonGeometry { regions }
    }

    /// Find the button at the given point
    pub fn hit_test(&self, x: f64, y: f64) -> Option<ButtonId> {
        self.regions()
            .find(|(_, region)| region.contains(x, y))
            .map(|(button, _)| button)
    }

    pub fn region(&self, button: ButtonId) -> &ButtonRegion {
        &self.regions[button as usize]
    }

    /// All regions in canonical order
    pub fn regions(&self) -> impl Iterator<Item = (ButtonId, &ButtonRegion)> {
        ButtonId::ALL.into_iter().zip(self.regions.iter())
    }
}
