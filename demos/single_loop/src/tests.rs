//! Tests for the demo scenario.

#[cfg(test)]
mod scenario_tests {
    use crate::scenario::{self, SCENARIO_JSON};

    #[test]
    fn embedded_scenario_loads() {
        let s = scenario::load().unwrap();
        assert_eq!(s.lanes.len(), 2);
        assert_eq!(s.detectors.len(), 3);
        assert!(s.vehicles.iter().all(|v| v.min_speed <= v.max_speed));
    }

    #[test]
    fn inverted_speed_bounds_rejected() {
        let json = SCENARIO_JSON.replace(
            r#""min_speed": 12.0, "max_speed": 16.0"#,
            r#""min_speed": 16.0, "max_speed": 12.0"#,
        );
        assert_ne!(json, SCENARIO_JSON);
        let err = scenario::parse(&json).err().unwrap();
        assert!(err.to_string().contains("veh0"), "{err}");
    }

    #[test]
    fn negative_speed_rejected() {
        let json = SCENARIO_JSON.replace(r#""min_speed": 8.0"#, r#""min_speed": -1.0"#);
        assert!(scenario::parse(&json).is_err());
    }
}
