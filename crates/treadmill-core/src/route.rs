//! Screen routes and the hand-off from the landing screen to a scene.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::scene::ScenePreset;
use crate::sim::{SessionController, SessionParams, SessionProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Landing,
    VrScene,
    Runway,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::VrScene => "/vrscene",
            Route::Runway => "/scene2",
        }
    }

    /// The scene shown on this route. The landing screen has none.
    pub fn scene(&self) -> Option<ScenePreset> {
        match self {
            Route::Landing => None,
            Route::VrScene => Some(ScenePreset::vr()),
            Route::Runway => Some(ScenePreset::runway()),
        }
    }
}

impl FromStr for Route {
    type Err = ValidationError;

    /// Paths match case-insensitively and ignore a trailing slash.
    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let normalized = path.trim().trim_end_matches('/').to_ascii_lowercase();
        match normalized.as_str() {
            "" => Ok(Route::Landing),
            "/vrscene" => Ok(Route::VrScene),
            "/scene2" | "/runway" => Ok(Route::Runway),
            _ => Err(ValidationError::UnknownRoute(path.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Navigation from the landing screen into a scene, carrying the user's
/// name and planned duration through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRequest {
    pub route: Route,
    pub profile: SessionProfile,
}

impl LaunchRequest {
    pub fn new(route: Route, user_name: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            route,
            profile: SessionProfile {
                user_name: user_name.into(),
                duration_minutes,
            },
        }
    }

    /// Build the idle session for the target scene, or `None` for the landing screen.
    pub fn launch(&self, params: &SessionParams) -> Option<SessionController> {
        self.route
            .scene()
            .map(|scene| scene.build(params, self.profile.clone()))
    }
}
