//! SealedSecret wrapping document
//!
//! `kubeseal --recovery-unseal` wants a full SealedSecret resource on
//! stdin, so a bare ciphertext selection is wrapped into the minimal
//! document it will accept before being piped in.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SealedSecret {
    #[serde(rename = "apiVersion")]
    api_version: String,
    kind: String,
    metadata: ObjectMeta,
    spec: SealedSecretSpec,
}

#[derive(Debug, Serialize)]
struct ObjectMeta {
    name: String,
    namespace: String,
}

#[derive(Debug, Serialize)]
struct SealedSecretSpec {
    #[serde(rename = "encryptedData")]
    encrypted_data: EncryptedData,
    template: Template,
}

#[derive(Debug, Serialize)]
struct EncryptedData {
    data: String,
}

#[derive(Debug, Serialize)]
struct Template {
    metadata: ObjectMeta,
}

impl SealedSecret {
    /// Wrap a ciphertext under the given identity. The ciphertext must
    /// already be trimmed; it lands under `spec.encryptedData.data`.
    pub fn wrap(encrypted_data: &str, namespace: &str, name: &str) -> Self {
        Self {
            api_version: "bitnami.com/v1alpha1".to_string(),
            kind: "SealedSecret".to_string(),
            metadata: ObjectMeta {
                name: name.to_string(),
                namespace: namespace.to_string(),
            },
            spec: SealedSecretSpec {
                encrypted_data: EncryptedData {
                    data: encrypted_data.to_string(),
                },
                template: Template {
                    metadata: ObjectMeta {
                        name: name.to_string(),
                        namespace: namespace.to_string(),
                    },
                },
            },
        }
    }

    /// Serialize to the YAML document kubeseal expects
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_shape() {
        let doc = SealedSecret::wrap("AgBy3i...", "production", "mysecret");
        let yaml = doc.to_yaml().unwrap();

        assert!(yaml.contains("apiVersion: bitnami.com/v1alpha1"));
        assert!(yaml.contains("kind: SealedSecret"));
        assert!(yaml.contains("name: mysecret"));
        assert!(yaml.contains("namespace: production"));
        assert!(yaml.contains("encryptedData:"));
        assert!(yaml.contains("data: AgBy3i..."));
        assert!(yaml.contains("template:"));
    }

    #[test]
    fn test_wrapped_document_round_trips_fields() {
        let doc = SealedSecret::wrap("cipher", "default", "db-creds");
        let yaml = doc.to_yaml().unwrap();

        // The identity appears twice: under metadata and under the template
        assert_eq!(yaml.matches("name: db-creds").count(), 2);
        assert_eq!(yaml.matches("namespace: default").count(), 2);
    }
}
