use atelier_core::Artifact;

/// 1x1 transparent PNG, served when a provider has no credential
const PLACEHOLDER_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

pub(crate) fn placeholder_image() -> Artifact {
    Artifact::encoded("image/png", PLACEHOLDER_PNG)
}
