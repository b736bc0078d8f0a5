use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Geographic grouping used only for listing locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    North,
    Central,
    South,
    East,
    Islands,
}

impl Region {
    pub fn label(&self) -> &'static str {
        match self {
            Region::North => "北部",
            Region::Central => "中部",
            Region::South => "南部",
            Region::East => "東部",
            Region::Islands => "離島",
        }
    }

    pub const fn all() -> &'static [Region] {
        &[
            Region::North,
            Region::Central,
            Region::South,
            Region::East,
            Region::Islands,
        ]
    }

    /// Locations belonging to this region, in display order.
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        TABLE
            .iter()
            .filter(move |(region, _)| region == self)
            .map(|(_, name)| Location(*name))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const TABLE: &[(Region, &str)] = &[
    (Region::North, "臺北市"),
    (Region::North, "新北市"),
    (Region::North, "基隆市"),
    (Region::North, "桃園市"),
    (Region::North, "新竹市"),
    (Region::North, "新竹縣"),
    (Region::North, "宜蘭縣"),
    (Region::Central, "苗栗縣"),
    (Region::Central, "臺中市"),
    (Region::Central, "彰化縣"),
    (Region::Central, "南投縣"),
    (Region::Central, "雲林縣"),
    (Region::South, "嘉義縣"),
    (Region::South, "嘉義市"),
    (Region::South, "臺南市"),
    (Region::South, "高雄市"),
    (Region::South, "屏東縣"),
    (Region::East, "花蓮縣"),
    (Region::East, "臺東縣"),
    (Region::Islands, "澎湖縣"),
    (Region::Islands, "金門縣"),
    (Region::Islands, "連江縣"),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown location '{0}'. Run `weather locations` to list supported names.")]
pub struct LocationError(pub String);

/// One of the fixed set of region names accepted by the provider.
///
/// The name is passed verbatim as the `locationName` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location(&'static str);

impl Location {
    pub fn all() -> impl Iterator<Item = Location> {
        TABLE.iter().map(|(_, name)| Location(*name))
    }

    pub fn parse(value: &str) -> Result<Self, LocationError> {
        let wanted = value.trim();
        TABLE
            .iter()
            .find(|(_, name)| *name == wanted)
            .map(|(_, name)| Location(*name))
            .ok_or_else(|| LocationError(value.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn region(&self) -> Region {
        TABLE
            .iter()
            .find(|(_, name)| *name == self.0)
            .map(|(region, _)| *region)
            .unwrap_or(Region::North)
    }
}

impl Default for Location {
    fn default() -> Self {
        Location(TABLE[0].1)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Location::parse(s)
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Location::parse(&raw).map_err(serde::de::Error::custom)
    }
}
