//! Static service catalog for the clinic.
//!
//! Service durations drive slot sizing for the requested booking and the
//! conflict width of existing bookings. The catalog is compile-time static;
//! clinic staff change it with a deploy, not a database row.

use serde::Serialize;
use tracing::warn;

/// Fixed step at which candidate slot start times are generated. Independent
/// of any particular service's duration: two 60-minute services may start 30
/// minutes apart as long as they do not overlap existing bookings.
pub const MIN_APPOINTMENT_SEPARATION_MINUTES: i32 = 30;

/// Duration used when no service type is requested or the name is unknown.
pub const DEFAULT_SERVICE_DURATION_MINUTES: i32 = 30;

#[derive(Debug, Clone, Serialize)]
pub struct ServiceTypeDef {
    pub name: &'static str,
    pub duration_minutes: i32,
}

pub const SERVICE_CATALOG: &[ServiceTypeDef] = &[
    ServiceTypeDef { name: "consultation", duration_minutes: 30 },
    ServiceTypeDef { name: "return_visit", duration_minutes: 20 },
    ServiceTypeDef { name: "vaccination", duration_minutes: 30 },
    ServiceTypeDef { name: "deworming", duration_minutes: 20 },
    ServiceTypeDef { name: "grooming", duration_minutes: 60 },
    ServiceTypeDef { name: "dental_cleaning", duration_minutes: 60 },
    ServiceTypeDef { name: "surgery", duration_minutes: 120 },
];

/// Resolve a service type name to its duration in minutes.
///
/// Unknown names fall back to the default duration rather than failing - a
/// typo upstream should degrade bookings, not break them - but the fallback
/// is logged because it usually means a catalog bug.
pub fn resolve_service_duration(service_type: Option<&str>) -> i32 {
    let Some(name) = service_type else {
        return DEFAULT_SERVICE_DURATION_MINUTES;
    };

    match SERVICE_CATALOG.iter().find(|def| def.name == name) {
        Some(def) => def.duration_minutes,
        None => {
            warn!(
                "Unknown service type '{}', falling back to {} minute default",
                name, DEFAULT_SERVICE_DURATION_MINUTES
            );
            DEFAULT_SERVICE_DURATION_MINUTES
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_services() {
        assert_eq!(resolve_service_duration(Some("consultation")), 30);
        assert_eq!(resolve_service_duration(Some("grooming")), 60);
        assert_eq!(resolve_service_duration(Some("surgery")), 120);
    }

    #[test]
    fn missing_service_type_uses_default() {
        assert_eq!(
            resolve_service_duration(None),
            DEFAULT_SERVICE_DURATION_MINUTES
        );
    }

    #[test]
    fn unknown_service_type_uses_default() {
        assert_eq!(
            resolve_service_duration(Some("acupuncture")),
            DEFAULT_SERVICE_DURATION_MINUTES
        );
    }
}
