use std::fmt;
use std::str::FromStr;

use crate::prelude::CoreError;

/// Closed set of conversions an ingestion profile may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// Seconds since 2001-01-01 to unix time.
    Since20010101,
    Unix,
    /// Seconds since 1969-12-31T23:00 to unix time.
    Since19691231,
    /// Hours of the day to unix time, anchored at midnight of `ncD`.
    BeginOfDay,
    KmToM,
    /// Height above sea level to range above the instrument at `altitude`.
    SeaLevelToRange,
    DbToLinear,
    LinearToDb,
    SwitchSign,
    /// MIRA azimuth shifted by `mira_azi_zero`, wrapped to `[0, 360)`.
    MiraAzimuthOffset,
    TransposeDim,
    TransposeDimInvertThird,
    DivideBy2,
    Identity,
}

impl Conversion {
    pub const ALL: [Conversion; 14] = [
        Conversion::Since20010101,
        Conversion::Unix,
        Conversion::Since19691231,
        Conversion::BeginOfDay,
        Conversion::KmToM,
        Conversion::SeaLevelToRange,
        Conversion::DbToLinear,
        Conversion::LinearToDb,
        Conversion::SwitchSign,
        Conversion::MiraAzimuthOffset,
        Conversion::TransposeDim,
        Conversion::TransposeDimInvertThird,
        Conversion::DivideBy2,
        Conversion::Identity,
    ];

    /// Name used in configuration.
    pub fn name(self) -> &'static str {
        match self {
            Conversion::Since20010101 => "since20010101",
            Conversion::Unix => "unix",
            Conversion::Since19691231 => "since19691231",
            Conversion::BeginOfDay => "beginofday",
            Conversion::KmToM => "km2m",
            Conversion::SeaLevelToRange => "sealevel2range",
            Conversion::DbToLinear => "z2lin",
            Conversion::LinearToDb => "lin2z",
            Conversion::SwitchSign => "switchsign",
            Conversion::MiraAzimuthOffset => "mira_azi_offset",
            Conversion::TransposeDim => "transposedim",
            Conversion::TransposeDimInvertThird => "transposedim+invert3rd",
            Conversion::DivideBy2 => "divideby2",
            Conversion::Identity => "none",
        }
    }

    pub fn required_params(self) -> &'static [&'static str] {
        match self {
            Conversion::BeginOfDay => &["ncD"],
            Conversion::SeaLevelToRange => &["altitude"],
            Conversion::MiraAzimuthOffset => &["mira_azi_zero"],
            _ => &[],
        }
    }

    /// Whether the mask must follow the value through an axis permutation.
    pub fn reorders_axes(self) -> bool {
        matches!(
            self,
            Conversion::TransposeDim | Conversion::TransposeDimInvertThird
        )
    }
}

impl FromStr for Conversion {
    type Err = CoreError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Conversion::ALL
            .iter()
            .copied()
            .find(|conversion| conversion.name() == name)
            .ok_or_else(|| CoreError::UnknownConverter(name.to_string()))
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
