//! Z-score lookup for the classical safety-stock formula (§4.3).

/// Standard service-level -> Z mapping; non-standard levels snap to the
/// nearest mapped entry.
const TABLE: [(f64, f64); 4] = [(0.90, 1.28), (0.95, 1.645), (0.975, 1.96), (0.99, 2.326)];

pub fn z_for_service_level(service_level: f64) -> f64 {
    TABLE
        .iter()
        .min_by(|(a, _), (b, _)| {
            (a - service_level)
                .abs()
                .partial_cmp(&(b - service_level).abs())
                .unwrap()
        })
        .map(|(_, z)| *z)
        .unwrap_or(1.645)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_matches() {
        assert_eq!(z_for_service_level(0.90), 1.28);
        assert_eq!(z_for_service_level(0.95), 1.645);
        assert_eq!(z_for_service_level(0.975), 1.96);
        assert_eq!(z_for_service_level(0.99), 2.326);
    }

    #[test]
    fn nearest_fallback() {
        assert_eq!(z_for_service_level(0.93), 1.28);
        assert_eq!(z_for_service_level(0.96), 1.645);
        assert_eq!(z_for_service_level(0.999), 2.326);
    }
}
