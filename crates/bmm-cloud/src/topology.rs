//! Zone and region labels derived from the site ID.
//!
//! Topology is computed offline from the locally configured site and never
//! from a remote response, so it cannot fail or block.

use bmm_core::Zone;

const ZONE_PREFIX: &str = "nvidia-bmm-zone-";
const REGION_PREFIX: &str = "nvidia-bmm-region-";
pub const DEFAULT_REGION: &str = "nvidia-bmm-region-default";

pub fn zone_of(site: &str) -> String {
    format!("{ZONE_PREFIX}{site}")
}

/// Region from the site component before the first `-`.
///
/// Sites without a `-` (or with an empty leading component) map to
/// [`DEFAULT_REGION`].
pub fn region_of(site: &str) -> String {
    match site.split_once('-') {
        Some((leading, _)) if !leading.is_empty() => format!("{REGION_PREFIX}{leading}"),
        _ => DEFAULT_REGION.to_string(),
    }
}

pub fn topology_of(site: &str) -> Zone {
    Zone {
        failure_domain: zone_of(site),
        region: region_of(site),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_embeds_site() {
        assert_eq!(zone_of("site-east-1"), "nvidia-bmm-zone-site-east-1");
        assert_ne!(zone_of("a-b"), zone_of("a-c"));
    }

    #[test]
    fn region_uses_leading_component() {
        assert_eq!(region_of("site-east-1"), "nvidia-bmm-region-site");
        assert_eq!(
            region_of("8a880c71-fe4b-4e43-9e24-ebfcb8a84c5f"),
            "nvidia-bmm-region-8a880c71"
        );
    }

    #[test]
    fn region_defaults_without_separator() {
        assert_eq!(region_of("site"), DEFAULT_REGION);
        assert_eq!(region_of(""), DEFAULT_REGION);
        assert_eq!(region_of("-east"), DEFAULT_REGION);
    }

    #[test]
    fn topology_bundles_both() {
        let zone = topology_of("site-east-1");
        assert_eq!(zone.failure_domain, "nvidia-bmm-zone-site-east-1");
        assert_eq!(zone.region, "nvidia-bmm-region-site");
    }
}
