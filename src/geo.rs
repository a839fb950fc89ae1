use derive_more::Constructor;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{space0, space1};
use nom::combinator::all_consuming;
use nom::number::complete::double;
use nom::sequence::{delimited, separated_pair};
use nom::IResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

/// Mean earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A single reported device position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::new(
                ErrorKind::InvalidPosition,
                &format!("latitude {} out of range", latitude),
            ));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::new(
                ErrorKind::InvalidPosition,
                &format!("longitude {} out of range", longitude),
            ));
        }

        Ok(Position {
            latitude,
            longitude,
        })
    }

    /// Great-circle distance in meters (haversine).
    pub fn distance_to(&self, other: &Position) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().min(1.0).asin()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

fn coordinates(input: &str) -> IResult<&str, (f64, f64)> {
    all_consuming(delimited(
        space0,
        separated_pair(
            double,
            alt((delimited(space0, tag(","), space0), space1)),
            double,
        ),
        space0,
    ))(input)
}

impl FromStr for Position {
    type Err = Error;

    /// Parses `"lat,lon"` or `"lat lon"`.
    fn from_str(s: &str) -> Result<Self> {
        let (_, (latitude, longitude)) = coordinates(s)?;
        Position::new(latitude, longitude)
    }
}

/// A fixed location watched by the proximity monitor.
#[derive(Debug, Clone, PartialEq, Constructor, Serialize, Deserialize)]
pub struct PointOfInterest {
    #[serde(default)]
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl PointOfInterest {
    pub fn position(&self) -> Position {
        Position {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.position().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fixes() {
        let expected = Position::new(37.867993, -122.259592).unwrap();

        assert_eq!("37.867993,-122.259592".parse::<Position>().unwrap(), expected);
        assert_eq!("37.867993, -122.259592".parse::<Position>().unwrap(), expected);
        assert_eq!("  37.867993 -122.259592 ".parse::<Position>().unwrap(), expected);
    }

    #[test]
    fn reject_malformed_fixes() {
        assert!(matches!(
            "37.8".parse::<Position>().unwrap_err().kind,
            ErrorKind::ParseError
        ));
        assert!(matches!(
            "north,south".parse::<Position>().unwrap_err().kind,
            ErrorKind::ParseError
        ));
        assert!(matches!(
            "1,2,3".parse::<Position>().unwrap_err().kind,
            ErrorKind::ParseError
        ));
        assert!(matches!(
            "91,0".parse::<Position>().unwrap_err().kind,
            ErrorKind::InvalidPosition
        ));
        assert!(matches!(
            "0,-181".parse::<Position>().unwrap_err().kind,
            ErrorKind::InvalidPosition
        ));
    }

    #[test]
    fn distance_of_identical_points_is_zero() {
        let p = Position::new(37.867993, -122.259592).unwrap();
        assert_eq!(p.distance_to(&p), 0.0);
    }

    #[test]
    fn distance_is_symmetric_and_plausible() {
        let a = Position::new(37.867993, -122.259592).unwrap();
        // About 0.0001 degrees of latitude north, roughly 11 meters.
        let b = Position::new(37.868093, -122.259592).unwrap();

        let d = a.distance_to(&b);
        assert!((d - b.distance_to(&a)).abs() < 1e-9);
        assert!(d > 10.0 && d < 12.5, "unexpected distance {}", d);

        // One degree of longitude on the equator.
        let equator = Position::new(0.0, 0.0).unwrap();
        let east = Position::new(0.0, 1.0).unwrap();
        assert!((equator.distance_to(&east) - 111_195.0).abs() < 10.0);
    }

    #[test]
    fn poi_label_falls_back_to_coordinates() {
        let named = PointOfInterest::new(Some("Corner Bar".to_owned()), 1.0, 2.0);
        let anonymous = PointOfInterest::new(None, 1.0, 2.0);

        assert_eq!(named.label(), "Corner Bar");
        assert_eq!(anonymous.label(), "1.000000,2.000000");
    }
}
