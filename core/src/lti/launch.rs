use serde::{Deserialize, Serialize};

/// Validated identity of one LTI launch, attached to a request by the
/// launch verifier. Read-only for the grade components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchToken {
    /// Subject id of the launching user.
    pub user: String,

    #[serde(default)]
    pub platform_context: PlatformContext,

    /// Launch key the token was resolved from. Forwarded to the provider so it
    /// can act on behalf of this launch; never echoed back out.
    #[serde(default, skip_serializing)]
    pub ltik: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceClaim>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<EndpointClaim>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextClaim>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceClaim {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_link: Option<ResourceLinkRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceLinkRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// AGS endpoint claim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointClaim {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineitem: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineitems: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scope: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextClaim {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

fn non_empty(v: Option<&String>) -> Option<&str> {
    v.map(String::as_str).filter(|s| !s.trim().is_empty())
}

impl LaunchToken {
    /// `platformContext.resource.id`.
    pub fn resource_id(&self) -> Option<&str> {
        non_empty(self.platform_context.resource.as_ref()?.id.as_ref())
    }

    /// `platformContext.resource.resourceLink.id`.
    pub fn resource_link_ref_id(&self) -> Option<&str> {
        let resource = self.platform_context.resource.as_ref()?;
        non_empty(resource.resource_link.as_ref()?.id.as_ref())
    }

    /// Resource link id, preferring `resource.id` over `resource.resourceLink.id`.
    pub fn resource_link_id(&self) -> Option<&str> {
        self.resource_id().or_else(|| self.resource_link_ref_id())
    }

    /// Line item the platform pointed at during the launch, if any.
    pub fn launch_line_item(&self) -> Option<&str> {
        non_empty(self.platform_context.endpoint.as_ref()?.lineitem.as_ref())
    }

    pub fn context_id(&self) -> Option<&str> {
        non_empty(self.platform_context.context.as_ref()?.id.as_ref())
    }
}
