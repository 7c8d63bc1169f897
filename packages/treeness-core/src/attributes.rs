//! Attribute-holder capabilities that entity types compose next to their tree state.
//!
//! Each capability is a trait over an embedded [`Attribute`]: the entity supplies
//! access to the slot and receives `get`/`set`/`clear` as provided methods.
//! Setters store a copy of the caller's value, never the caller's instance.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single optional attribute value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attribute<V> {
    value: Option<V>,
}

impl<V> Default for Attribute<V> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<V: Clone> Attribute<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Store a copy of `value`.
    pub fn set(&mut self, value: &V) {
        self.value = Some(value.clone());
    }

    pub fn clear(&mut self) -> Option<V> {
        self.value.take()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

/// Geographic coordinate in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gps {
    latitude: f64,
    longitude: f64,
}

impl Gps {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::IllegalArgument(format!(
                "latitude out of range: {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::IllegalArgument(format!(
                "longitude out of range: {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StreetAddress {
    pub lines: Vec<String>,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl StreetAddress {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn locality(mut self, locality: impl Into<String>) -> Self {
        self.locality = Some(locality.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

pub trait Describable {
    fn description_attribute(&self) -> &Attribute<String>;
    fn description_attribute_mut(&mut self) -> &mut Attribute<String>;

    fn description(&self) -> Option<&str> {
        self.description_attribute().get().map(String::as_str)
    }

    fn set_description(&mut self, description: &str) {
        self.description_attribute_mut().set(&description.to_owned());
    }

    fn clear_description(&mut self) -> Option<String> {
        self.description_attribute_mut().clear()
    }
}

pub trait HasGps {
    fn gps_attribute(&self) -> &Attribute<Gps>;
    fn gps_attribute_mut(&mut self) -> &mut Attribute<Gps>;

    fn gps(&self) -> Option<&Gps> {
        self.gps_attribute().get()
    }

    fn set_gps(&mut self, gps: &Gps) {
        self.gps_attribute_mut().set(gps);
    }

    fn clear_gps(&mut self) -> Option<Gps> {
        self.gps_attribute_mut().clear()
    }
}

pub trait HasStreetAddress {
    fn street_address_attribute(&self) -> &Attribute<StreetAddress>;
    fn street_address_attribute_mut(&mut self) -> &mut Attribute<StreetAddress>;

    fn street_address(&self) -> Option<&StreetAddress> {
        self.street_address_attribute().get()
    }

    fn set_street_address(&mut self, address: &StreetAddress) {
        self.street_address_attribute_mut().set(address);
    }

    fn clear_street_address(&mut self) -> Option<StreetAddress> {
        self.street_address_attribute_mut().clear()
    }
}

pub trait Versionable {
    fn version_attribute(&self) -> &Attribute<u64>;
    fn version_attribute_mut(&mut self) -> &mut Attribute<u64>;

    fn version(&self) -> Option<u64> {
        self.version_attribute().get().copied()
    }

    fn set_version(&mut self, version: u64) {
        self.version_attribute_mut().set(&version);
    }

    /// Bump the version, starting from 1 when unset. Returns the new version.
    fn increment_version(&mut self) -> u64 {
        let next = self.version().map_or(1, |v| v.saturating_add(1));
        self.set_version(next);
        next
    }
}
