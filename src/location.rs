//! Location authorization state machine and the platform location seam.

use serde::Serialize;

use crate::models::Coordinate;

/// Deep link into the system settings page of the app
pub const SETTINGS_URL: &str = "app-settings:";

/// Platform-reported permission to use the device location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    #[default]
    NotDetermined,
    Denied,
    Restricted,
    AuthorizedWhenInUse,
    AuthorizedAlways,
}

impl AuthorizationStatus {
    pub fn is_authorized(self) -> bool {
        matches!(
            self,
            AuthorizationStatus::AuthorizedWhenInUse | AuthorizationStatus::AuthorizedAlways
        )
    }
}

/// UI or platform action triggered by an authorization state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationEffect {
    ShowUserTrackingControl,
    StartLocationUpdates,
    ShowSettingsWarning,
    RequestWhenInUseAuthorization,
}

/// Effects for a status observed with no prior knowledge (screen setup).
pub fn effects_for(status: AuthorizationStatus) -> Vec<AuthorizationEffect> {
    use AuthorizationEffect::*;

    match status {
        AuthorizationStatus::AuthorizedWhenInUse | AuthorizationStatus::AuthorizedAlways => {
            vec![ShowUserTrackingControl, StartLocationUpdates]
        }
        AuthorizationStatus::Denied => vec![ShowSettingsWarning],
        AuthorizationStatus::NotDetermined => vec![RequestWhenInUseAuthorization],
        AuthorizationStatus::Restricted => Vec::new(),
    }
}

/// Effects for a platform-reported change. Re-reporting the current status
/// does nothing, so the denied warning is shown once per transition.
pub fn transition(
    current: AuthorizationStatus,
    reported: AuthorizationStatus,
) -> Vec<AuthorizationEffect> {
    if current == reported {
        return Vec::new();
    }
    effects_for(reported)
}

/// Device location services as seen by the map controller
pub trait LocationProvider {
    /// Whether location services are switched on at all
    fn services_enabled(&self) -> bool;

    fn authorization_status(&self) -> AuthorizationStatus;

    /// Ask the user for when-in-use permission; the answer arrives later
    /// through `MapController::on_authorization_changed`.
    fn request_when_in_use_authorization(&mut self);

    fn start_updating_location(&mut self);

    /// Last known device location
    fn location(&self) -> Option<Coordinate>;

    /// Open the system settings page (see [`SETTINGS_URL`])
    fn open_settings(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use AuthorizationEffect::*;
    use AuthorizationStatus::*;

    #[test]
    fn test_effects_per_status() {
        assert_eq!(
            effects_for(AuthorizedWhenInUse),
            vec![ShowUserTrackingControl, StartLocationUpdates]
        );
        assert_eq!(
            effects_for(AuthorizedAlways),
            vec![ShowUserTrackingControl, StartLocationUpdates]
        );
        assert_eq!(effects_for(Denied), vec![ShowSettingsWarning]);
        assert_eq!(
            effects_for(NotDetermined),
            vec![RequestWhenInUseAuthorization]
        );
        assert!(effects_for(Restricted).is_empty());
    }

    #[test]
    fn test_grant_after_request() {
        assert_eq!(
            transition(NotDetermined, AuthorizedWhenInUse),
            vec![ShowUserTrackingControl, StartLocationUpdates]
        );
    }

    #[test]
    fn test_denied_warning_is_one_time() {
        assert_eq!(transition(NotDetermined, Denied), vec![ShowSettingsWarning]);
        assert!(transition(Denied, Denied).is_empty());
    }

    #[test]
    fn test_is_authorized() {
        assert!(AuthorizedAlways.is_authorized());
        assert!(AuthorizedWhenInUse.is_authorized());
        assert!(!Denied.is_authorized());
        assert!(!Restricted.is_authorized());
        assert!(!NotDetermined.is_authorized());
    }
}
