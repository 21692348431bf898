//! Reference frames
use crate::{ellipsoid::Ellipsoid, error::Error};

pub mod catalog;
pub use catalog::Catalog;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Datum families. Frames of the same family are realizations of the same datum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Datum {
    /// North American Datum of 1983
    Nad83,
    /// World Geodetic System 1972
    Wgs72,
    /// World Geodetic System 1984
    Wgs84,
    /// International Terrestrial Reference System
    Itrf,
}

/// Reference frame realizations, numbered as in the historical frame menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrameId {
    Nad83_2011,
    Nad83Pa11,
    Nad83Ma11,
    Wgs72,
    Wgs84Transit,
    Wgs84G730,
    Wgs84G873,
    Wgs84G1150,
    Wgs84G1674,
    Wgs84G1762,
    Wgs84G2139,
    Wgs84G2296,
    Itrf88,
    Itrf89,
    Itrf90,
    Itrf91,
    Itrf92,
    Itrf93,
    Itrf94,
    Itrf96,
    Itrf97,
    Itrf2000,
    Itrf2005,
    Itrf2008,
    Itrf2014,
    Itrf2020,
}

impl FrameId {
    /// Every realization, in menu order.
    pub const ALL: [Self; 26] = [
        Self::Nad83_2011,
        Self::Nad83Pa11,
        Self::Nad83Ma11,
        Self::Wgs72,
        Self::Wgs84Transit,
        Self::Wgs84G730,
        Self::Wgs84G873,
        Self::Wgs84G1150,
        Self::Wgs84G1674,
        Self::Wgs84G1762,
        Self::Wgs84G2139,
        Self::Wgs84G2296,
        Self::Itrf88,
        Self::Itrf89,
        Self::Itrf90,
        Self::Itrf91,
        Self::Itrf92,
        Self::Itrf93,
        Self::Itrf94,
        Self::Itrf96,
        Self::Itrf97,
        Self::Itrf2000,
        Self::Itrf2005,
        Self::Itrf2008,
        Self::Itrf2014,
        Self::Itrf2020,
    ];

    /// Frame in which the crustal velocity model is expressed,
    /// and through which all other frames connect.
    pub const HUB: Self = Self::Itrf2014;

    /// Menu index, starting at 1.
    pub fn index(&self) -> u8 {
        Self::ALL
            .iter()
            .position(|id| id == self)
            .map(|pos| pos as u8 + 1)
            .unwrap_or_default()
    }

    /// Returns the [FrameId] for given menu index.
    pub fn from_index(index: u8) -> Result<Self, Error> {
        match index {
            1..=26 => Ok(Self::ALL[index as usize - 1]),
            _ => Err(Error::UnknownFrame(index.to_string())),
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Nad83_2011 => "NAD_83(2011/CORS96/2007)",
            Self::Nad83Pa11 => "NAD_83(PA11/PACP00)",
            Self::Nad83Ma11 => "NAD_83(MA11/MARP00)",
            Self::Wgs72 => "WGS72",
            Self::Wgs84Transit => "WGS84 original (Transit)",
            Self::Wgs84G730 => "WGS84(G730)",
            Self::Wgs84G873 => "WGS84(G873)",
            Self::Wgs84G1150 => "WGS84(G1150)",
            Self::Wgs84G1674 => "WGS84(G1674)",
            Self::Wgs84G1762 => "WGS84(G1762)",
            Self::Wgs84G2139 => "WGS84(G2139)",
            Self::Wgs84G2296 => "WGS84(G2296)",
            Self::Itrf88 => "ITRF88",
            Self::Itrf89 => "ITRF89",
            Self::Itrf90 => "ITRF90",
            Self::Itrf91 => "ITRF91",
            Self::Itrf92 => "ITRF92",
            Self::Itrf93 => "ITRF93",
            Self::Itrf94 => "ITRF94",
            Self::Itrf96 => "ITRF96",
            Self::Itrf97 => "ITRF97",
            Self::Itrf2000 => "ITRF2000 or IGS00/IGb00",
            Self::Itrf2005 => "ITRF2005 or IGS05",
            Self::Itrf2008 => "ITRF2008 or IGS08/IGb08",
            Self::Itrf2014 => "ITRF2014 or IGS14/IGb14",
            Self::Itrf2020 => "ITRF2020 or IGS20/IGb20",
        }
    }

    /// Additional names this frame is known by.
    pub(crate) fn extra_aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Nad83_2011 => &["NAD83(2011)", "NAD83(CORS96)", "NAD83(2007)"],
            Self::Nad83Pa11 => &["NAD83(PA11)", "NAD83(PACP00)", "PA11"],
            Self::Nad83Ma11 => &["NAD83(MA11)", "NAD83(MARP00)", "MA11"],
            Self::Wgs84Transit => &["WGS84(Transit)"],
            Self::Wgs84G730 => &["G730"],
            Self::Wgs84G873 => &["G873"],
            Self::Wgs84G1150 => &["G1150"],
            Self::Wgs84G1674 => &["G1674"],
            Self::Wgs84G1762 => &["G1762"],
            Self::Wgs84G2139 => &["G2139"],
            Self::Wgs84G2296 => &["G2296"],
            Self::Itrf2000 => &["IGS00", "IGb00"],
            Self::Itrf2005 => &["IGS05"],
            Self::Itrf2008 => &["IGS08", "IGb08"],
            Self::Itrf2014 => &["IGS14", "IGb14"],
            Self::Itrf2020 => &["IGS20", "IGb20"],
            _ => &[],
        }
    }

    /// [Datum] this frame realizes.
    pub fn datum(&self) -> Datum {
        match self {
            Self::Nad83_2011 | Self::Nad83Pa11 | Self::Nad83Ma11 => Datum::Nad83,
            Self::Wgs72 => Datum::Wgs72,
            Self::Wgs84Transit
            | Self::Wgs84G730
            | Self::Wgs84G873
            | Self::Wgs84G1150
            | Self::Wgs84G1674
            | Self::Wgs84G1762
            | Self::Wgs84G2139
            | Self::Wgs84G2296 => Datum::Wgs84,
            _ => Datum::Itrf,
        }
    }

    /// Reference [Ellipsoid] associated to this frame.
    pub fn ellipsoid(&self) -> Ellipsoid {
        match self.datum() {
            Datum::Wgs72 => Ellipsoid::WGS72,
            Datum::Wgs84 => Ellipsoid::WGS84,
            Datum::Nad83 | Datum::Itrf => Ellipsoid::GRS80,
        }
    }

    /// Reference epoch of the velocity definition of this frame (decimal year).
    pub fn reference_epoch(&self) -> f64 {
        match self {
            Self::Nad83_2011 | Self::Nad83Pa11 | Self::Nad83Ma11 => 2010.0,
            Self::Wgs72 => 1972.0,
            Self::Wgs84Transit => 1984.0,
            Self::Wgs84G730 => 1994.0,
            Self::Wgs84G873 => 1997.0,
            Self::Wgs84G1150 => 2001.0,
            Self::Wgs84G1674 | Self::Wgs84G1762 => 2005.0,
            Self::Wgs84G2139 => 2016.0,
            Self::Wgs84G2296 => 2024.0,
            Self::Itrf88 | Self::Itrf89 | Self::Itrf90 | Self::Itrf91 => 1988.0,
            Self::Itrf92 | Self::Itrf93 => 1988.0,
            Self::Itrf94 => 1993.0,
            Self::Itrf96 | Self::Itrf97 | Self::Itrf2000 => 1997.0,
            Self::Itrf2005 => 2000.0,
            Self::Itrf2008 => 2005.0,
            Self::Itrf2014 => 2010.0,
            Self::Itrf2020 => 2015.0,
        }
    }
}

impl std::fmt::Display for FrameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for FrameId {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Catalog::default().resolve(s)
    }
}

impl TryFrom<u8> for FrameId {
    type Error = Error;
    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::from_index(index)
    }
}

/// [ReferenceFrame] description, as published by the [Catalog].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ReferenceFrame {
    /// [FrameId]
    pub id: FrameId,
    /// Menu index
    pub index: u8,
    /// Display label
    pub label: &'static str,
    /// [Datum] family
    pub datum: Datum,
    /// Reference [Ellipsoid]
    pub ellipsoid: Ellipsoid,
    /// Reference epoch of the velocity definition (decimal year)
    pub reference_epoch: f64,
}

impl From<FrameId> for ReferenceFrame {
    fn from(id: FrameId) -> Self {
        Self {
            id,
            index: id.index(),
            label: id.label(),
            datum: id.datum(),
            ellipsoid: id.ellipsoid(),
            reference_epoch: id.reference_epoch(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn menu_indexes() {
        for (pos, id) in FrameId::ALL.iter().enumerate() {
            assert_eq!(id.index() as usize, pos + 1);
            assert_eq!(FrameId::from_index(id.index()).unwrap(), *id);
        }
        assert!(FrameId::from_index(0).is_err());
        assert!(FrameId::from_index(27).is_err());
    }

    #[test]
    fn datum_families() {
        assert_eq!(FrameId::Nad83Pa11.datum(), Datum::Nad83);
        assert_eq!(FrameId::Wgs84G2139.datum(), Datum::Wgs84);
        assert_eq!(FrameId::Itrf96.datum(), Datum::Itrf);
        assert_eq!(FrameId::Wgs72.ellipsoid(), Ellipsoid::WGS72);
        assert_eq!(FrameId::Itrf2020.ellipsoid(), Ellipsoid::GRS80);
    }
}
