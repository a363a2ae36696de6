//! Source of the device position.

use async_trait::async_trait;

use crate::{error::LocationError, model::Coordinates};

#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

/// Position taken from the `home` entry of the configuration. A terminal has no
/// positioning hardware, so an unset home reads as a denied permission.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocation {
    home: Option<Coordinates>,
}

impl ConfiguredLocation {
    pub fn new(home: Option<Coordinates>) -> Self {
        Self { home }
    }
}

#[async_trait]
impl Geolocator for ConfiguredLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        self.home.ok_or(LocationError::PermissionDenied)
    }
}
