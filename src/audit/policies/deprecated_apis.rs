use crate::audit::domain::ManifestObject;

/// (apiVersion, kinds) pairs removed in Kubernetes 1.22 / OpenShift 4.9
///
/// An empty kind list means every kind served by that apiVersion was removed.
const REMOVED_IN_1_22: &[(&str, &[&str])] = &[
    ("apiextensions.k8s.io/v1beta1", &["CustomResourceDefinition"]),
    (
        "admissionregistration.k8s.io/v1beta1",
        &[
            "MutatingWebhookConfiguration",
            "ValidatingWebhookConfiguration",
        ],
    ),
    ("apiregistration.k8s.io/v1beta1", &["APIService"]),
    ("authentication.k8s.io/v1beta1", &["TokenReview"]),
    (
        "authorization.k8s.io/v1beta1",
        &[
            "LocalSubjectAccessReview",
            "SelfSubjectAccessReview",
            "SubjectAccessReview",
        ],
    ),
    ("certificates.k8s.io/v1beta1", &["CertificateSigningRequest"]),
    ("coordination.k8s.io/v1beta1", &["Lease"]),
    ("extensions/v1beta1", &["Ingress"]),
    ("networking.k8s.io/v1beta1", &["Ingress", "IngressClass"]),
    ("rbac.authorization.k8s.io/v1beta1", &[]),
    ("scheduling.k8s.io/v1beta1", &["PriorityClass"]),
    (
        "storage.k8s.io/v1beta1",
        &["CSIDriver", "CSINode", "StorageClass", "VolumeAttachment"],
    ),
];

/// DeprecatedApiPolicy flags manifests that will stop being served by the cluster
///
/// The policy only looks at the manifests shipped in the bundle; API usage
/// inside the operator's own code is out of its reach.
pub struct DeprecatedApiPolicy;

impl DeprecatedApiPolicy {
    /// Whether `object` uses an apiVersion/kind removed in Kubernetes 1.22
    pub fn is_removed(object: &ManifestObject) -> bool {
        REMOVED_IN_1_22.iter().any(|(api_version, kinds)| {
            object.api_version == *api_version
                && (kinds.is_empty() || kinds.contains(&object.kind.as_str()))
        })
    }

    /// Sorted, de-duplicated kinds of the removed APIs used by `objects`
    pub fn removed_kinds(objects: &[ManifestObject]) -> Vec<String> {
        let mut kinds: Vec<String> = objects
            .iter()
            .filter(|o| Self::is_removed(o))
            .map(|o| o.kind.clone())
            .collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }
}
