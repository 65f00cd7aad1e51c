use serde::{Deserialize, Serialize};

/// One gradebook column as returned by the grade service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,

    #[serde(default)]
    pub label: String,

    pub score_maximum: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_link_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Body of a create-line-item call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLineItem {
    pub label: String,
    pub score_maximum: f64,
    pub resource_link_id: String,
    pub tag: String,
}

/// Filter for a line-item query. `None` fields are not filtered on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_link_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl LineItemQuery {
    pub fn matches(&self, item: &LineItem) -> bool {
        let rl_ok = match &self.resource_link_id {
            Some(rl) => item.resource_link_id.as_deref() == Some(rl.as_str()),
            None => true,
        };
        let tag_ok = match &self.tag {
            Some(tag) => item.tag.as_deref() == Some(tag.as_str()),
            None => true,
        };
        rl_ok && tag_ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineItemOrigin {
    /// Supplied by the platform in the launch (`endpoint.lineitem`).
    Launch,
    /// First match of the line-item query.
    Existing,
    /// Created because the query came back empty.
    Created,
}

impl LineItemOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineItemOrigin::Launch => "launch",
            LineItemOrigin::Existing => "existing",
            LineItemOrigin::Created => "created",
        }
    }
}

/// Outcome of line-item resolution. `item` is absent on the launch fast path,
/// where only the line item URL is known.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLineItem {
    pub id: String,
    pub origin: LineItemOrigin,
    pub item: Option<LineItem>,
}

impl ResolvedLineItem {
    pub fn from_launch(url: &str) -> Self {
        Self {
            id: url.to_string(),
            origin: LineItemOrigin::Launch,
            item: None,
        }
    }

    pub fn from_item(item: LineItem, origin: LineItemOrigin) -> Self {
        Self {
            id: item.id.clone(),
            origin,
            item: Some(item),
        }
    }
}
