//! Device identity — a logical thing, its access policy, and the credential
//! attachments that make both usable.
//!
//! The credential itself is an opaque, externally issued reference. It must
//! be attached to both the thing and the policy before the backend will
//! activate the identity; a partial attachment leaves the identity dangling
//! but retriable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A logical device identity registered with the Provisioning Backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    /// Thing name, also the identity's topic namespace.
    pub thing_name: String,
    /// Opaque credential reference (e.g. a certificate identifier).
    pub credential_ref: String,
    /// Keep the device shadow synchronized with the cloud copy.
    pub sync_shadow: bool,
}

/// Allow or deny.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum PolicyEffect {
    Allow,
    Deny,
}

/// One statement in an access policy. Evaluation semantics belong to the
/// Provisioning Backend; this side only declares the sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyStatement {
    pub effect: PolicyEffect,
    pub actions: Vec<String>,
    pub resources: Vec<String>,
}

impl PolicyStatement {
    pub fn allow(actions: &[&str], resources: &[String]) -> Self {
        Self {
            effect: PolicyEffect::Allow,
            actions: actions.iter().map(|a| a.to_string()).collect(),
            resources: resources.to_vec(),
        }
    }
}

/// An ordered sequence of policy statements under one policy name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyDocument {
    pub name: String,
    pub statements: Vec<PolicyStatement>,
}

/// What a credential is attached to. Both attachments must exist before the
/// identity is usable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum AttachmentTarget {
    Thing(String),
    Policy(String),
}

/// One credential-to-target attachment relation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Attachment {
    pub credential_ref: String,
    pub target: AttachmentTarget,
}

/// The set of declared attachments for an identity.
///
/// Attachment is idempotent: declaring the same relation twice is the same
/// as declaring it once.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Attachments {
    entries: BTreeSet<Attachment>,
}

impl Attachments {
    pub fn attach(&mut self, credential_ref: &str, target: AttachmentTarget) {
        self.entries.insert(Attachment {
            credential_ref: credential_ref.to_string(),
            target,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attachment> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Identity {
    /// Declare an identity, its default policy, and both credential
    /// attachments.
    ///
    /// The policy grants connect, messaging, shadow, and management
    /// capabilities. Messaging and shadow statements are scoped to the
    /// thing's own topic namespace; connect and management are broad, since
    /// the backend scopes those by principal.
    pub fn new(
        thing_name: &str,
        credential_ref: &str,
        sync_shadow: bool,
    ) -> (Identity, PolicyDocument, Attachments) {
        let identity = Identity {
            thing_name: thing_name.to_string(),
            credential_ref: credential_ref.to_string(),
            sync_shadow,
        };

        let thing_topics = vec![
            format!("topics/$aws/things/{thing_name}"),
            format!("topics/$aws/things/{thing_name}/*"),
        ];
        let shadow_resources = vec![format!("things/{thing_name}/shadow")];
        let any = vec!["*".to_string()];

        let policy = PolicyDocument {
            name: format!("{thing_name}_policy"),
            statements: vec![
                PolicyStatement::allow(&["iot:Connect"], &any),
                PolicyStatement::allow(
                    &["iot:Publish", "iot:Subscribe", "iot:Receive"],
                    &thing_topics,
                ),
                PolicyStatement::allow(
                    &[
                        "iot:GetThingShadow",
                        "iot:UpdateThingShadow",
                        "iot:DeleteThingShadow",
                    ],
                    &shadow_resources,
                ),
                PolicyStatement::allow(&["greengrass:*"], &any),
            ],
        };

        let mut attachments = Attachments::default();
        attachments.attach(credential_ref, AttachmentTarget::Policy(policy.name.clone()));
        attachments.attach(credential_ref, AttachmentTarget::Thing(thing_name.to_string()));

        (identity, policy, attachments)
    }
}
