// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Container image reference comparison.

use crate::config::RollingTags;
use crate::constants::defaults;
use crate::diff::DiffBatch;
use crate::types::ClusterSide;

/// An image reference split into repository, tag and optional digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub repository: String,
    pub tag: String,
    pub digest: Option<String>,
}

impl ImageRef {
    /// Parse `repository[:tag][@digest]`. A colon only starts the tag after the last
    /// slash, so registry ports stay part of the repository.
    pub fn parse(image: &str) -> Self {
        let (name, digest) = match image.split_once('@') {
            Some((name, digest)) => (name, Some(digest.to_string())),
            None => (image, None),
        };

        let slash = name.rfind('/').map(|i| i + 1).unwrap_or(0);
        match name[slash..].rfind(':') {
            Some(colon) => {
                let split = slash + colon;
                ImageRef {
                    repository: name[..split].to_string(),
                    tag: name[split + 1..].to_string(),
                    digest,
                }
            }
            None => ImageRef {
                repository: name.to_string(),
                tag: defaults::IMAGE_TAG.to_string(),
                digest,
            },
        }
    }

    /// A digest pins the image, so only undigested references can float
    fn is_rolling(&self, rolling: &RollingTags) -> bool {
        self.digest.is_none() && rolling.matches(&self.tag)
    }
}

/// Compare two container images, attaching an advisory when a rolling tag is involved
pub fn compare_images(
    subject: &str,
    left: Option<&str>,
    right: Option<&str>,
    rolling: &RollingTags,
    batch: &mut DiffBatch,
) {
    let (left, right) = match (left, right) {
        (None, None) => return,
        (Some(l), Some(r)) => (ImageRef::parse(l), ImageRef::parse(r)),
        (l, r) => {
            batch.diff(
                subject,
                format!(
                    "{} image differs: {} vs {}",
                    subject,
                    l.unwrap_or("<none>"),
                    r.unwrap_or("<none>")
                ),
            );
            return;
        }
    };

    if left.repository != right.repository {
        batch.diff(
            subject,
            format!(
                "{} image repository differs: {} vs {}",
                subject, left.repository, right.repository
            ),
        );
    }
    if left.tag != right.tag {
        batch.diff(
            subject,
            format!("{} image tag differs: {} vs {}", subject, left.tag, right.tag),
        );
    }
    if left.digest != right.digest {
        batch.diff(
            subject,
            format!(
                "{} image digest differs: {} vs {}",
                subject,
                left.digest.as_deref().unwrap_or("<none>"),
                right.digest.as_deref().unwrap_or("<none>")
            ),
        );
    }

    match (left.is_rolling(rolling), right.is_rolling(rolling)) {
        (true, true) if left.tag == right.tag => {
            batch.advisory(
                subject,
                format!(
                    "{} uses rolling tag {}, image comparison may be unreliable",
                    subject, left.tag
                ),
            );
        }
        (l, r) => {
            for (floats, image, side) in [
                (l, &left, ClusterSide::First),
                (r, &right, ClusterSide::Second),
            ] {
                if floats {
                    batch.advisory(
                        subject,
                        format!(
                            "{} uses rolling tag {} in {}, image comparison may be unreliable",
                            subject, image.tag, side
                        ),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::Severity;
    use crate::types::{ResourceKey, ResourceKind};

    fn make_batch() -> DiffBatch {
        DiffBatch::new(ResourceKey::new(ResourceKind::Deployment, "default", "d1"))
    }

    fn make_rolling() -> RollingTags {
        RollingTags::new(["latest"]).unwrap()
    }

    #[test]
    fn test_parse_plain_image() {
        let image = ImageRef::parse("nginx:1.25");
        assert_eq!(image.repository, "nginx");
        assert_eq!(image.tag, "1.25");
        assert_eq!(image.digest, None);
    }

    #[test]
    fn test_parse_without_tag_defaults_to_latest() {
        let image = ImageRef::parse("docker.io/library/nginx");
        assert_eq!(image.repository, "docker.io/library/nginx");
        assert_eq!(image.tag, "latest");
    }

    #[test]
    fn test_parse_registry_port() {
        let image = ImageRef::parse("registry.local:5000/team/app:2.0");
        assert_eq!(image.repository, "registry.local:5000/team/app");
        assert_eq!(image.tag, "2.0");

        let untagged = ImageRef::parse("registry.local:5000/team/app");
        assert_eq!(untagged.repository, "registry.local:5000/team/app");
        assert_eq!(untagged.tag, "latest");
    }

    #[test]
    fn test_parse_digest() {
        let image = ImageRef::parse("app:1.0@sha256:abc");
        assert_eq!(image.repository, "app");
        assert_eq!(image.tag, "1.0");
        assert_eq!(image.digest.as_deref(), Some("sha256:abc"));
    }

    #[test]
    fn test_equal_images_produce_nothing() {
        let mut batch = make_batch();
        compare_images("container app", Some("app:1.0"), Some("app:1.0"), &make_rolling(), &mut batch);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_repository_and_tag_differences() {
        let mut batch = make_batch();
        compare_images(
            "container app",
            Some("registry-a/app:1.0"),
            Some("registry-b/app:1.1"),
            &make_rolling(),
            &mut batch,
        );

        let messages: Vec<&str> = batch.diffs().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "container app image repository differs: registry-a/app vs registry-b/app",
                "container app image tag differs: 1.0 vs 1.1",
            ]
        );
    }

    #[test]
    fn test_rolling_tag_is_advisory_only() {
        let mut batch = make_batch();
        compare_images("container app", Some("app"), Some("app:latest"), &make_rolling(), &mut batch);

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.diffs()[0].severity, Severity::Advisory);
        assert_eq!(
            batch.diffs()[0].message,
            "container app uses rolling tag latest, image comparison may be unreliable"
        );
        assert!(!batch.differs());
    }

    #[test]
    fn test_rolling_tag_on_one_side() {
        let mut batch = make_batch();
        compare_images("container app", Some("app:1.0"), Some("app:latest"), &make_rolling(), &mut batch);

        assert!(batch.differs());
        let advisories: Vec<_> = batch
            .diffs()
            .iter()
            .filter(|d| d.severity == Severity::Advisory)
            .collect();
        assert_eq!(advisories.len(), 1);
        assert!(advisories[0].message.ends_with("in cluster 2, image comparison may be unreliable"));
    }

    #[test]
    fn test_digest_pins_rolling_tag() {
        let mut batch = make_batch();
        compare_images(
            "container app",
            Some("app:latest@sha256:abc"),
            Some("app:latest@sha256:abc"),
            &make_rolling(),
            &mut batch,
        );
        assert!(batch.is_empty());
    }
}
